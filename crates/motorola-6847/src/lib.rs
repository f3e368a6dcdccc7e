//! Motorola MC6847 Video Display Generator (VDG).
//!
//! The VDG turns bytes fetched from video memory into a 256 × 192 active
//! picture. Its mode comes from five input pins which the Dragon wires to
//! PIA1 port B:
//!
//! | PB  | Pin    |
//! |-----|--------|
//! | 3   | CSS    |
//! | 4-6 | GM0-2  |
//! | 7   | A/G    |
//!
//! In alphanumeric mode bit 7 of a character byte selects a semigraphic
//! block and bit 6 selects inverse video. GM0 doubles as INT/EXT, which
//! turns the blocks into six-element SG6 blocks.
//!
//! This crate has no dependencies. Video memory is read through a closure,
//! so the caller decides how addresses are decoded.

#![allow(clippy::cast_possible_truncation)]

mod font;
mod palette;

pub use palette::{
    BLACK, BLUE, BUFF, CYAN, DARK_GREEN, DARK_ORANGE, GREEN, MAGENTA, ORANGE, PALETTE, RED,
    YELLOW,
};

use font::{FONT, GLYPH_ROWS};

/// Active display width in pixels.
pub const ACTIVE_WIDTH: usize = 256;
/// Active display height in scanlines.
pub const ACTIVE_HEIGHT: usize = 192;

/// Scanlines in an alphanumeric character row.
const CHAR_HEIGHT: u16 = 12;
/// First glyph row inside the 12-line cell.
const GLYPH_TOP: u16 = 3;

/// Graphics sub-modes selected by GM2-GM0 when A/G is high.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphicsMode {
    Cg1,
    Rg1,
    Cg2,
    Rg2,
    Cg3,
    Rg3,
    Cg6,
    Rg6,
}

impl GraphicsMode {
    const fn from_gm(gm: u8) -> Self {
        match gm & 0x07 {
            0 => Self::Cg1,
            1 => Self::Rg1,
            2 => Self::Cg2,
            3 => Self::Rg2,
            4 => Self::Cg3,
            5 => Self::Rg3,
            6 => Self::Cg6,
            _ => Self::Rg6,
        }
    }

    /// Colour modes use two bits per pixel; resolution modes one.
    #[must_use]
    pub const fn is_colour(self) -> bool {
        matches!(self, Self::Cg1 | Self::Cg2 | Self::Cg3 | Self::Cg6)
    }
}

/// VDG mode pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VdgMode {
    /// A/G: graphics when set.
    pub graphics: bool,
    /// GM2-GM0.
    pub gm: u8,
    /// Colour set select.
    pub css: bool,
}

impl VdgMode {
    /// Decode from the PIA1 port B output.
    #[must_use]
    pub const fn from_port_b(pb: u8) -> Self {
        Self {
            graphics: pb & 0x80 != 0,
            gm: (pb >> 4) & 0x07,
            css: pb & 0x08 != 0,
        }
    }

    /// Graphics sub-mode, or `None` in alphanumeric mode.
    #[must_use]
    pub const fn graphics_mode(&self) -> Option<GraphicsMode> {
        if self.graphics {
            Some(GraphicsMode::from_gm(self.gm))
        } else {
            None
        }
    }

    /// INT/EXT (GM0) in alphanumeric mode: blocks are SG6 instead of SG4.
    #[must_use]
    pub const fn semigraphics6(&self) -> bool {
        !self.graphics && self.gm & 0x01 != 0
    }

    /// Bytes of video memory per display row.
    #[must_use]
    pub const fn bytes_per_row(&self) -> u16 {
        match self.graphics_mode() {
            None => 32,
            Some(GraphicsMode::Cg1 | GraphicsMode::Rg1 | GraphicsMode::Rg2 | GraphicsMode::Rg3) => {
                16
            }
            Some(_) => 32,
        }
    }

    /// Scanlines each display row is repeated for.
    #[must_use]
    pub const fn lines_per_row(&self) -> u16 {
        match self.graphics_mode() {
            None => CHAR_HEIGHT,
            Some(GraphicsMode::Cg1 | GraphicsMode::Rg1 | GraphicsMode::Cg2) => 3,
            Some(GraphicsMode::Rg2 | GraphicsMode::Cg3) => 2,
            Some(_) => 1,
        }
    }

    /// Bytes of video memory in a whole frame.
    #[must_use]
    pub const fn frame_bytes(&self) -> u16 {
        self.bytes_per_row() * (ACTIVE_HEIGHT as u16 / self.lines_per_row())
    }

    /// Border palette index.
    #[must_use]
    pub const fn border(&self) -> u8 {
        match (self.graphics, self.css) {
            (false, _) => BLACK,
            (true, false) => GREEN,
            (true, true) => BUFF,
        }
    }

    /// Address of the first byte shown on active scanline `line`.
    #[must_use]
    pub const fn row_address(&self, base: u16, line: u16) -> u16 {
        base.wrapping_add((line / self.lines_per_row()) * self.bytes_per_row())
    }
}

/// Render active scanline `line` (0-191) into `out` as palette indices.
///
/// `base` is the first byte of video memory (from the SAM); `read` fetches
/// a byte without side effects.
pub fn render_line(
    mode: VdgMode,
    base: u16,
    line: u16,
    read: impl Fn(u16) -> u8,
    out: &mut [u8; ACTIVE_WIDTH],
) {
    let row = mode.row_address(base, line);
    match mode.graphics_mode() {
        None => render_alpha(mode, row, line % CHAR_HEIGHT, &read, out),
        Some(gfx) => render_graphics(mode, gfx, row, &read, out),
    }
}

fn render_alpha(
    mode: VdgMode,
    row: u16,
    cell_line: u16,
    read: &impl Fn(u16) -> u8,
    out: &mut [u8; ACTIVE_WIDTH],
) {
    let (text_fg, text_bg) = if mode.css {
        (ORANGE, DARK_ORANGE)
    } else {
        (GREEN, DARK_GREEN)
    };

    for (col, cell) in out.chunks_exact_mut(8).enumerate() {
        let byte = read(row.wrapping_add(col as u16));

        if byte & 0x80 != 0 {
            let (colour, bits) = if mode.semigraphics6() {
                // 2 × 3 blocks, 4 lines each
                let colour = (u8::from(mode.css) << 2) | ((byte >> 6) & 0x03);
                let shift = 4 - 2 * (cell_line / 4) as u8;
                (colour, (byte >> shift) & 0x03)
            } else {
                // 2 × 2 blocks, 6 lines each
                let colour = (byte >> 4) & 0x07;
                let shift = if cell_line < 6 { 2 } else { 0 };
                (colour, (byte >> shift) & 0x03)
            };
            let left = if bits & 0x02 != 0 { colour } else { BLACK };
            let right = if bits & 0x01 != 0 { colour } else { BLACK };
            cell[..4].fill(left);
            cell[4..].fill(right);
            continue;
        }

        let glyph = &FONT[usize::from(byte & 0x3F)];
        let inverse = byte & 0x40 != 0;
        let (fg, bg) = if inverse {
            (text_bg, text_fg)
        } else {
            (text_fg, text_bg)
        };

        let glyph_row = cell_line.wrapping_sub(GLYPH_TOP) as usize;
        let pattern = if glyph_row < GLYPH_ROWS {
            glyph[glyph_row]
        } else {
            0
        };
        // Glyph occupies pixels 1-5 of the 8-pixel cell.
        for (x, pixel) in cell.iter_mut().enumerate() {
            let lit = (1..=5).contains(&x) && pattern & (0x10 >> (x - 1)) != 0;
            *pixel = if lit { fg } else { bg };
        }
    }
}

fn render_graphics(
    mode: VdgMode,
    gfx: GraphicsMode,
    row: u16,
    read: &impl Fn(u16) -> u8,
    out: &mut [u8; ACTIVE_WIDTH],
) {
    let bytes = usize::from(mode.bytes_per_row());
    let css = u8::from(mode.css);

    if gfx.is_colour() {
        // Four 2-bit pixels per byte
        let width = ACTIVE_WIDTH / (bytes * 4);
        for (i, chunk) in out.chunks_exact_mut(width).enumerate() {
            let byte = read(row.wrapping_add((i / 4) as u16));
            let shift = 6 - 2 * (i % 4);
            let pixel = (byte >> shift) & 0x03;
            chunk.fill((css << 2) | pixel);
        }
    } else {
        let fg = if mode.css { BUFF } else { GREEN };
        let width = ACTIVE_WIDTH / (bytes * 8);
        for (i, chunk) in out.chunks_exact_mut(width).enumerate() {
            let byte = read(row.wrapping_add((i / 8) as u16));
            let lit = byte & (0x80 >> (i % 8)) != 0;
            chunk.fill(if lit { fg } else { BLACK });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(mode: VdgMode, line: u16, vram: &[u8]) -> [u8; ACTIVE_WIDTH] {
        let mut out = [0xFF; ACTIVE_WIDTH];
        render_line(
            mode,
            0,
            line,
            |addr| vram.get(addr as usize).copied().unwrap_or(0),
            &mut out,
        );
        out
    }

    #[test]
    fn mode_table() {
        let cases = [
            (0x00, 32, 12),
            (0x80, 16, 3), // CG1
            (0x90, 16, 3), // RG1
            (0xA0, 32, 3), // CG2
            (0xB0, 16, 2), // RG2
            (0xC0, 32, 2), // CG3
            (0xD0, 16, 1), // RG3
            (0xE0, 32, 1), // CG6
            (0xF0, 32, 1), // RG6
        ];
        for (pb, bytes, lines) in cases {
            let mode = VdgMode::from_port_b(pb);
            assert_eq!(mode.bytes_per_row(), bytes, "PB={pb:02X}");
            assert_eq!(mode.lines_per_row(), lines, "PB={pb:02X}");
        }
        assert_eq!(VdgMode::from_port_b(0xF0).frame_bytes(), 6144);
        assert_eq!(VdgMode::from_port_b(0x00).frame_bytes(), 512);
    }

    #[test]
    fn alpha_text_glyph_rows() {
        let vram = [0x01u8; 32]; // "A"
        let mode = VdgMode::default();

        let blank = render(mode, 0, &vram);
        assert!(blank.iter().all(|&p| p == DARK_GREEN));

        // First glyph row of "A" is 0x04: middle pixel lit
        let top = render(mode, GLYPH_TOP, &vram);
        assert_eq!(&top[..8], &[9, 9, 9, 0, 9, 9, 9, 9]);
    }

    #[test]
    fn inverse_and_css_swap_colours() {
        let vram = [0x60u8; 32]; // inverse space
        let mut mode = VdgMode::default();
        assert!(render(mode, 5, &vram).iter().all(|&p| p == GREEN));

        mode.css = true;
        assert!(render(mode, 5, &vram).iter().all(|&p| p == ORANGE));
    }

    #[test]
    fn semigraphics4_block() {
        // Blue (colour 2), top-left and bottom-right elements
        let mut vram = [0u8; 32];
        vram[0] = 0x80 | (2 << 4) | 0b1001;
        let mode = VdgMode::default();

        let top = render(mode, 0, &vram);
        assert_eq!(&top[..8], &[BLUE, BLUE, BLUE, BLUE, BLACK, BLACK, BLACK, BLACK]);

        let bottom = render(mode, 11, &vram);
        assert_eq!(&bottom[..8], &[BLACK, BLACK, BLACK, BLACK, BLUE, BLUE, BLUE, BLUE]);
    }

    #[test]
    fn semigraphics6_block() {
        let mut vram = [0u8; 32];
        vram[0] = 0x80 | 0b00_1100; // colour bits 10 (blue), middle row lit
        let mode = VdgMode::from_port_b(0x10);
        assert!(mode.semigraphics6());

        assert!(render(mode, 0, &vram)[..8].iter().all(|&p| p == BLACK));
        assert!(render(mode, 5, &vram)[..8].iter().all(|&p| p == BLUE));
    }

    #[test]
    fn rg6_pixels() {
        let mut vram = [0u8; 32];
        vram[0] = 0b1010_0000;
        let mode = VdgMode::from_port_b(0xF0);
        let line = render(mode, 0, &vram);
        assert_eq!(&line[..4], &[GREEN, BLACK, GREEN, BLACK]);

        let buff = render(VdgMode::from_port_b(0xF8), 0, &vram);
        assert_eq!(buff[0], BUFF);
    }

    #[test]
    fn cg1_pixels_are_four_wide() {
        let mut vram = [0u8; 16];
        vram[0] = 0b11_10_01_00;
        let mode = VdgMode::from_port_b(0x88); // CG1 with CSS
        let line = render(mode, 0, &vram);
        assert_eq!(&line[..16], &[
            ORANGE, ORANGE, ORANGE, ORANGE,
            MAGENTA, MAGENTA, MAGENTA, MAGENTA,
            CYAN, CYAN, CYAN, CYAN,
            BUFF, BUFF, BUFF, BUFF,
        ]);
    }

    #[test]
    fn rows_repeat_for_lines_per_row() {
        let mode = VdgMode::from_port_b(0x80);
        assert_eq!(mode.row_address(0x0600, 0), 0x0600);
        assert_eq!(mode.row_address(0x0600, 2), 0x0600);
        assert_eq!(mode.row_address(0x0600, 3), 0x0610);
    }

    #[test]
    fn border_colours() {
        assert_eq!(VdgMode::from_port_b(0x00).border(), BLACK);
        assert_eq!(VdgMode::from_port_b(0xF0).border(), GREEN);
        assert_eq!(VdgMode::from_port_b(0xF8).border(), BUFF);
    }
}
