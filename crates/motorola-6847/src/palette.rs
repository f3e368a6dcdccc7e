//! MC6847 colour palette.
//!
//! The VDG produces nine colours plus the dark text backgrounds. Indices
//! are stable: colour graphics use `css * 4 + pixel` directly.

pub const GREEN: u8 = 0;
pub const YELLOW: u8 = 1;
pub const BLUE: u8 = 2;
pub const RED: u8 = 3;
pub const BUFF: u8 = 4;
pub const CYAN: u8 = 5;
pub const MAGENTA: u8 = 6;
pub const ORANGE: u8 = 7;
pub const BLACK: u8 = 8;
pub const DARK_GREEN: u8 = 9;
pub const DARK_ORANGE: u8 = 10;

/// ARGB32 values for each palette index.
pub const PALETTE: [u32; 11] = [
    0xFF07_FF00, // 0: Green
    0xFFFF_FF00, // 1: Yellow
    0xFF3B_08FF, // 2: Blue
    0xFFCC_003B, // 3: Red
    0xFFFF_FFFF, // 4: Buff
    0xFF07_E399, // 5: Cyan
    0xFFFF_1CFF, // 6: Magenta
    0xFFFF_8100, // 7: Orange
    0xFF00_0000, // 8: Black
    0xFF00_3F00, // 9: Dark green
    0xFF4A_1E00, // 10: Dark orange
];
