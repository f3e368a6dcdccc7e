//! Motorola MC6883 / SN74LS783 Synchronous Address Multiplexer (SAM).
//!
//! The SAM holds a 16-bit control register that is written one bit at a
//! time: an access to `$FFC0 + 2n` clears bit `n`, an access to
//! `$FFC0 + 2n + 1` sets it. The data bus value is ignored.
//!
//! | Bits  | Name  | Function |
//! |-------|-------|----------|
//! | 0-2   | V0-V2 | VDG addressing mode |
//! | 3-9   | F0-F6 | Display base address / 512 |
//! | 10    | P1    | Page select (upper 32K of 64K RAM in map type 0) |
//! | 11-12 | R0-R1 | MPU rate |
//! | 13-14 | M0-M1 | Memory size (0 = 4K, 1 = 16K, 2/3 = 64K) |
//! | 15    | TY    | Map type (1 = all RAM) |

/// First SAM control address.
pub const SAM_BASE: u16 = 0xFFC0;
/// Last SAM control address.
pub const SAM_END: u16 = 0xFFDF;

/// SAM control register.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sam6883 {
    reg: u16,
}

impl Sam6883 {
    #[must_use]
    pub const fn new() -> Self {
        Self { reg: 0 }
    }

    /// Clear every bit, as the RESET pin does.
    pub fn reset(&mut self) {
        self.reg = 0;
    }

    /// Handle an access to `$FFC0-$FFDF`. Other addresses are ignored.
    pub fn access(&mut self, addr: u16) {
        if !(SAM_BASE..=SAM_END).contains(&addr) {
            return;
        }
        let offset = addr - SAM_BASE;
        let mask = 1u16 << (offset >> 1);
        if offset & 1 == 0 {
            self.reg &= !mask;
        } else {
            self.reg |= mask;
        }
    }

    /// Raw 16-bit control register.
    #[must_use]
    pub const fn register(&self) -> u16 {
        self.reg
    }

    /// Restore the raw control register.
    pub fn set_register(&mut self, value: u16) {
        self.reg = value;
    }

    /// V0-V2 VDG addressing mode.
    #[must_use]
    pub const fn vdg_mode(&self) -> u8 {
        (self.reg & 0x07) as u8
    }

    /// F0-F6 display offset field.
    #[must_use]
    pub const fn display_offset(&self) -> u8 {
        ((self.reg >> 3) & 0x7F) as u8
    }

    /// First byte of video memory.
    #[must_use]
    pub const fn display_base(&self) -> u16 {
        (self.display_offset() as u16) << 9
    }

    /// P1 page bit.
    #[must_use]
    pub const fn page(&self) -> bool {
        self.reg & 0x0400 != 0
    }

    /// R0-R1 MPU rate.
    #[must_use]
    pub const fn rate(&self) -> u8 {
        ((self.reg >> 11) & 0x03) as u8
    }

    /// M0-M1 memory size.
    #[must_use]
    pub const fn memory_size(&self) -> u8 {
        ((self.reg >> 13) & 0x03) as u8
    }

    /// TY map type: `true` when the whole address space below `$FF00` is RAM.
    #[must_use]
    pub const fn all_ram(&self) -> bool {
        self.reg & 0x8000 != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn even_clears_odd_sets() {
        let mut sam = Sam6883::new();
        sam.access(0xFFC1);
        assert_eq!(sam.vdg_mode(), 1);
        sam.access(0xFFC5);
        assert_eq!(sam.vdg_mode(), 5);
        sam.access(0xFFC0);
        assert_eq!(sam.vdg_mode(), 4);
    }

    #[test]
    fn display_base_from_f_bits() {
        let mut sam = Sam6883::new();
        // F1 set: offset 2 -> $0400
        sam.access(0xFFC9);
        assert_eq!(sam.display_offset(), 2);
        assert_eq!(sam.display_base(), 0x0400);
        // F6 set as well
        sam.access(0xFFD3);
        assert_eq!(sam.display_base(), 0x0400 | (64 << 9));
    }

    #[test]
    fn page_rate_size_and_map_type() {
        let mut sam = Sam6883::new();
        sam.access(0xFFD5); // P1
        sam.access(0xFFD7); // R0
        sam.access(0xFFDB); // M0
        sam.access(0xFFDD); // M1
        sam.access(0xFFDF); // TY
        assert!(sam.page());
        assert_eq!(sam.rate(), 1);
        assert_eq!(sam.memory_size(), 3);
        assert!(sam.all_ram());
    }

    #[test]
    fn out_of_range_ignored() {
        let mut sam = Sam6883::new();
        sam.access(0xFFBF);
        sam.access(0xFFE1);
        assert_eq!(sam.register(), 0);
    }
}
