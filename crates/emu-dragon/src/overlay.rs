//! Touch-screen keyboard.
//!
//! The second screen shows a picture of the Dragon keyboard. Touches are
//! mapped to keys through a table of rectangles, so a different picture
//! only needs a different table.

use crate::input::DragonKey;

/// Touch screen size.
pub const SCREEN_WIDTH: u16 = 256;
pub const SCREEN_HEIGHT: u16 = 192;

/// A key's rectangle on the touch screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRegion {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
    pub key: DragonKey,
}

impl KeyRegion {
    #[must_use]
    pub fn contains(&self, x: u16, y: u16) -> bool {
        x >= self.x && x - self.x < self.width && y >= self.y && y - self.y < self.height
    }
}

/// Key table for the touch screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyboardOverlay {
    regions: Vec<KeyRegion>,
}

const KEY_PITCH: u16 = 18;
const ROW_PITCH: u16 = 24;
const KEY_HEIGHT: u16 = 22;
const FIRST_ROW_Y: u16 = 36;

/// Default layout: left indent and (key, width in key units) per row.
const DEFAULT_LAYOUT: [(u16, &[(DragonKey, u16)]); 5] = {
    use DragonKey as K;
    [
        (
            4,
            &[
                (K::N1, 1),
                (K::N2, 1),
                (K::N3, 1),
                (K::N4, 1),
                (K::N5, 1),
                (K::N6, 1),
                (K::N7, 1),
                (K::N8, 1),
                (K::N9, 1),
                (K::N0, 1),
                (K::Colon, 1),
                (K::Minus, 1),
                (K::Break, 1),
            ],
        ),
        (
            2,
            &[
                (K::Up, 1),
                (K::Q, 1),
                (K::W, 1),
                (K::E, 1),
                (K::R, 1),
                (K::T, 1),
                (K::Y, 1),
                (K::U, 1),
                (K::I, 1),
                (K::O, 1),
                (K::P, 1),
                (K::At, 1),
                (K::Left, 1),
                (K::Right, 1),
            ],
        ),
        (
            4,
            &[
                (K::Down, 1),
                (K::A, 1),
                (K::S, 1),
                (K::D, 1),
                (K::F, 1),
                (K::G, 1),
                (K::H, 1),
                (K::J, 1),
                (K::K, 1),
                (K::L, 1),
                (K::Semicolon, 1),
                (K::Enter, 2),
            ],
        ),
        (
            2,
            &[
                (K::Shift, 2),
                (K::Z, 1),
                (K::X, 1),
                (K::C, 1),
                (K::V, 1),
                (K::B, 1),
                (K::N, 1),
                (K::M, 1),
                (K::Comma, 1),
                (K::Period, 1),
                (K::Slash, 1),
                (K::Shift, 2),
            ],
        ),
        (40, &[(K::Clear, 2), (K::Space, 8)]),
    ]
};

impl KeyboardOverlay {
    /// Overlay with a custom key table. Earlier regions win where they
    /// overlap.
    #[must_use]
    pub fn new(regions: Vec<KeyRegion>) -> Self {
        Self { regions }
    }

    /// Key under a touch point, or `None` between and outside keys.
    #[must_use]
    pub fn hit_test(&self, x: u16, y: u16) -> Option<DragonKey> {
        self.regions
            .iter()
            .find(|region| region.contains(x, y))
            .map(|region| region.key)
    }

    #[must_use]
    pub fn regions(&self) -> &[KeyRegion] {
        &self.regions
    }
}

impl Default for KeyboardOverlay {
    /// Dragon keyboard rows, keys 18 pixels apart with a 2 pixel gap.
    fn default() -> Self {
        let mut regions = Vec::new();
        for (row, (indent, keys)) in DEFAULT_LAYOUT.iter().enumerate() {
            let y = FIRST_ROW_Y + row as u16 * ROW_PITCH;
            let mut x = *indent;
            for &(key, units) in *keys {
                let width = units * KEY_PITCH;
                regions.push(KeyRegion {
                    x,
                    y,
                    width: width - 2,
                    height: KEY_HEIGHT,
                    key,
                });
                x += width;
            }
        }
        Self::new(regions)
    }
}
