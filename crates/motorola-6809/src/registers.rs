//! 6809 programmer-visible registers.

/// Carry.
pub const CC_C: u8 = 0x01;
/// Overflow.
pub const CC_V: u8 = 0x02;
/// Zero.
pub const CC_Z: u8 = 0x04;
/// Negative.
pub const CC_N: u8 = 0x08;
/// IRQ mask.
pub const CC_I: u8 = 0x10;
/// Half carry (from bit 3, set by 8-bit adds only).
pub const CC_H: u8 = 0x20;
/// FIRQ mask.
pub const CC_F: u8 = 0x40;
/// Entire state stacked (tells RTI how much to pull).
pub const CC_E: u8 = 0x80;

/// 6809 register set.
///
/// - A, B: 8-bit accumulators, concatenated as D (A high)
/// - X, Y: 16-bit index registers
/// - U: user stack pointer
/// - S: hardware stack pointer
/// - DP: direct page (high byte of direct-mode addresses)
/// - CC: condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    pub b: u8,
    pub dp: u8,
    pub cc: u8,
    pub x: u16,
    pub y: u16,
    pub u: u16,
    pub s: u16,
    pub pc: u16,
}

impl Registers {
    /// Register state after reset (PC is loaded separately from the vector).
    #[must_use]
    pub const fn new() -> Self {
        Self {
            a: 0,
            b: 0,
            dp: 0,
            cc: CC_I | CC_F,
            x: 0,
            y: 0,
            u: 0,
            s: 0,
            pc: 0,
        }
    }

    #[must_use]
    pub const fn d(&self) -> u16 {
        ((self.a as u16) << 8) | self.b as u16
    }

    pub fn set_d(&mut self, value: u16) {
        let [a, b] = value.to_be_bytes();
        self.a = a;
        self.b = b;
    }

    #[must_use]
    pub const fn flag(&self, mask: u8) -> bool {
        self.cc & mask != 0
    }

    pub fn set_flag(&mut self, mask: u8, value: bool) {
        if value {
            self.cc |= mask;
        } else {
            self.cc &= !mask;
        }
    }

    /// Read a register by its TFR/EXG postbyte code.
    ///
    /// 8-bit registers read as `$FF` in the high byte; undefined codes read
    /// as `$FFFF`.
    #[must_use]
    pub const fn by_code(&self, code: u8) -> u16 {
        match code {
            0x0 => self.d(),
            0x1 => self.x,
            0x2 => self.y,
            0x3 => self.u,
            0x4 => self.s,
            0x5 => self.pc,
            0x8 => 0xFF00 | self.a as u16,
            0x9 => 0xFF00 | self.b as u16,
            0xA => 0xFF00 | self.cc as u16,
            0xB => 0xFF00 | self.dp as u16,
            _ => 0xFFFF,
        }
    }

    /// Write a register by its TFR/EXG postbyte code. 8-bit targets take
    /// the low byte.
    pub fn set_by_code(&mut self, code: u8, value: u16) {
        match code {
            0x0 => self.set_d(value),
            0x1 => self.x = value,
            0x2 => self.y = value,
            0x3 => self.u = value,
            0x4 => self.s = value,
            0x5 => self.pc = value,
            0x8 => self.a = value as u8,
            0x9 => self.b = value as u8,
            0xA => self.cc = value as u8,
            0xB => self.dp = value as u8,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn d_is_a_high_b_low() {
        let mut regs = Registers::new();
        regs.set_d(0x1234);
        assert_eq!(regs.a, 0x12);
        assert_eq!(regs.b, 0x34);
        assert_eq!(regs.d(), 0x1234);
    }

    #[test]
    fn reset_masks_both_interrupts() {
        let regs = Registers::new();
        assert!(regs.flag(CC_I));
        assert!(regs.flag(CC_F));
        assert!(!regs.flag(CC_E));
    }

    #[test]
    fn eight_bit_codes_read_with_ff_high_byte() {
        let mut regs = Registers::new();
        regs.a = 0x42;
        assert_eq!(regs.by_code(0x8), 0xFF42);
        assert_eq!(regs.by_code(0x7), 0xFFFF);
    }
}
