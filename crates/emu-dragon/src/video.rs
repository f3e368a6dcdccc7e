//! Video controller: turns VDG output into a double-buffered frame.
//!
//! The frame is 320 × 240 palette indices: the 256 × 192 active area with
//! a 32 pixel border left and right and 24 lines above and below. Rows are
//! painted into a back buffer as the beam reaches them and the buffers
//! swap at the end of the frame, so the front buffer always holds a
//! complete picture.

use emu_core::Bus;
use motorola_6847::{ACTIVE_HEIGHT, ACTIVE_WIDTH, BLACK, PALETTE, VdgMode};

use crate::bus::DragonBus;

pub const FRAME_WIDTH: usize = 320;
pub const FRAME_HEIGHT: usize = 240;
pub const BORDER_X: usize = (FRAME_WIDTH - ACTIVE_WIDTH) / 2;
pub const BORDER_Y: usize = (FRAME_HEIGHT - ACTIVE_HEIGHT) / 2;

/// Scanline (counted from the start of the frame) shown as row 0.
pub const FIRST_VISIBLE_LINE: u16 = 13;
/// First scanline of the active area.
pub const ACTIVE_START_LINE: u16 = FIRST_VISIBLE_LINE + BORDER_Y as u16;
/// First scanline after the active area; FSYNC falls here.
pub const ACTIVE_END_LINE: u16 = ACTIVE_START_LINE + ACTIVE_HEIGHT as u16;

/// A 320 × 240 frame of palette indices.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    pixels: Vec<u8>,
}

impl FrameBuffer {
    /// Black frame.
    #[must_use]
    pub fn new() -> Self {
        Self {
            pixels: vec![BLACK; FRAME_WIDTH * FRAME_HEIGHT],
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        FRAME_WIDTH
    }

    #[must_use]
    pub fn height(&self) -> usize {
        FRAME_HEIGHT
    }

    /// Row-major palette indices.
    #[must_use]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Palette index at (x, y). Out-of-range reads give black.
    #[must_use]
    pub fn pixel(&self, x: usize, y: usize) -> u8 {
        if x < FRAME_WIDTH && y < FRAME_HEIGHT {
            self.pixels[y * FRAME_WIDTH + x]
        } else {
            BLACK
        }
    }

    /// Overwrite with the contents of `other` without reallocating.
    pub fn copy_from(&mut self, other: &Self) {
        self.pixels.copy_from_slice(&other.pixels);
    }

    fn row_mut(&mut self, y: usize) -> &mut [u8] {
        &mut self.pixels[y * FRAME_WIDTH..(y + 1) * FRAME_WIDTH]
    }

    /// The frame as ARGB32.
    #[must_use]
    pub fn to_argb(&self) -> Vec<u32> {
        self.pixels
            .iter()
            .map(|&index| PALETTE.get(usize::from(index)).copied().unwrap_or(0xFF00_0000))
            .collect()
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("width", &FRAME_WIDTH)
            .field("height", &FRAME_HEIGHT)
            .finish_non_exhaustive()
    }
}

/// Double-buffered VDG output.
pub struct VideoController {
    front: FrameBuffer,
    back: FrameBuffer,
    frame_count: u64,
    /// Next frame row the beam will paint.
    row: u16,
}

impl VideoController {
    #[must_use]
    pub fn new() -> Self {
        Self {
            front: FrameBuffer::new(),
            back: FrameBuffer::new(),
            frame_count: 0,
            row: 0,
        }
    }

    /// VDG mode pins as driven by PIA1 port B.
    #[must_use]
    pub fn mode(bus: &DragonBus) -> VdgMode {
        VdgMode::from_port_b(bus.pia1.port_b_output())
    }

    /// Paint frame row `row` (0-239) of the back buffer from the current
    /// video memory and mode.
    pub fn render_line(&mut self, bus: &DragonBus, row: usize) {
        if row >= FRAME_HEIGHT {
            return;
        }
        let mode = Self::mode(bus);
        let border = mode.border();
        let out = self.back.row_mut(row);

        if !(BORDER_Y..BORDER_Y + ACTIVE_HEIGHT).contains(&row) {
            out.fill(border);
        } else {
            let mut active = [BLACK; ACTIVE_WIDTH];
            let line = (row - BORDER_Y) as u16;
            motorola_6847::render_line(
                mode,
                bus.sam.display_base(),
                line,
                |addr| bus.peek(addr),
                &mut active,
            );
            out[..BORDER_X].fill(border);
            out[BORDER_X..BORDER_X + ACTIVE_WIDTH].copy_from_slice(&active);
            out[BORDER_X + ACTIVE_WIDTH..].fill(border);
        }
        self.row = row as u16 + 1;
    }

    /// Publish the back buffer.
    pub fn end_frame(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
        self.frame_count += 1;
        self.row = 0;
    }

    /// Paint and publish a whole frame from the current bus state.
    pub fn render_frame(&mut self, bus: &DragonBus) -> &FrameBuffer {
        for row in 0..FRAME_HEIGHT {
            self.render_line(bus, row);
        }
        self.end_frame();
        &self.front
    }

    /// Last completed frame.
    #[must_use]
    pub fn frame(&self) -> &FrameBuffer {
        &self.front
    }

    /// Frames published since power-on.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    #[must_use]
    pub fn row(&self) -> u16 {
        self.row
    }

    /// Put back counters and the displayed picture. `picture` is a full
    /// frame of palette indices.
    pub(crate) fn restore(&mut self, frame_count: u64, row: u16, picture: &[u8]) {
        self.frame_count = frame_count;
        self.row = row;
        self.front.pixels.copy_from_slice(picture);
        self.back.copy_from(&self.front);
    }
}

impl Default for VideoController {
    fn default() -> Self {
        Self::new()
    }
}
