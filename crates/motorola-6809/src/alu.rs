//! 6809 ALU operations.
//!
//! Every operation takes the incoming condition codes and returns the result
//! together with the new codes. Bits an instruction does not document as
//! affected pass through unchanged.

use crate::registers::{CC_C, CC_H, CC_N, CC_V, CC_Z};

const NZVC: u8 = CC_N | CC_Z | CC_V | CC_C;
const NZV: u8 = CC_N | CC_Z | CC_V;
const NZC: u8 = CC_N | CC_Z | CC_C;

/// Result of an ALU operation with condition codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluResult<T> {
    pub value: T,
    pub cc: u8,
}

fn nz8(value: u8) -> u8 {
    let mut cc = 0;
    if value == 0 {
        cc |= CC_Z;
    }
    if value & 0x80 != 0 {
        cc |= CC_N;
    }
    cc
}

fn nz16(value: u16) -> u8 {
    let mut cc = 0;
    if value == 0 {
        cc |= CC_Z;
    }
    if value & 0x8000 != 0 {
        cc |= CC_N;
    }
    cc
}

/// ADD/ADC: sets H, N, Z, V, C.
#[must_use]
pub fn add8(cc: u8, a: u8, m: u8, carry: bool) -> AluResult<u8> {
    let sum = u16::from(a) + u16::from(m) + u16::from(carry);
    let value = sum as u8;

    let mut flags = (cc & !(NZVC | CC_H)) | nz8(value);
    if (a ^ m ^ value) & 0x10 != 0 {
        flags |= CC_H;
    }
    if (a ^ value) & (m ^ value) & 0x80 != 0 {
        flags |= CC_V;
    }
    if sum > 0xFF {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// SUB/SBC/CMP/NEG: sets N, Z, V, C (C = borrow). H is left alone.
#[must_use]
pub fn sub8(cc: u8, a: u8, m: u8, borrow: bool) -> AluResult<u8> {
    let value = a.wrapping_sub(m).wrapping_sub(u8::from(borrow));

    let mut flags = (cc & !NZVC) | nz8(value);
    if (a ^ m) & (a ^ value) & 0x80 != 0 {
        flags |= CC_V;
    }
    if u16::from(a) < u16::from(m) + u16::from(borrow) {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// ADDD: sets N, Z, V, C.
#[must_use]
pub fn add16(cc: u8, a: u16, m: u16) -> AluResult<u16> {
    let sum = u32::from(a) + u32::from(m);
    let value = sum as u16;

    let mut flags = (cc & !NZVC) | nz16(value);
    if (a ^ value) & (m ^ value) & 0x8000 != 0 {
        flags |= CC_V;
    }
    if sum > 0xFFFF {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// SUBD/CMPD/CMPX/CMPY/CMPU/CMPS: sets N, Z, V, C.
#[must_use]
pub fn sub16(cc: u8, a: u16, m: u16) -> AluResult<u16> {
    let value = a.wrapping_sub(m);

    let mut flags = (cc & !NZVC) | nz16(value);
    if (a ^ m) & (a ^ value) & 0x8000 != 0 {
        flags |= CC_V;
    }
    if a < m {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// NEG: two's complement. C set unless the operand was zero, V set for $80.
#[must_use]
pub fn neg8(cc: u8, m: u8) -> AluResult<u8> {
    sub8(cc, 0, m, false)
}

/// COM: one's complement. V cleared, C set.
#[must_use]
pub fn com8(cc: u8, m: u8) -> AluResult<u8> {
    let value = !m;
    AluResult {
        value,
        cc: (cc & !NZVC) | nz8(value) | CC_C,
    }
}

/// LSR: N cleared, C from bit 0. V unaffected.
#[must_use]
pub fn lsr8(cc: u8, m: u8) -> AluResult<u8> {
    let value = m >> 1;
    let mut flags = (cc & !NZC) | nz8(value);
    if m & 0x01 != 0 {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// ROR: carry into bit 7, bit 0 into carry.
#[must_use]
pub fn ror8(cc: u8, m: u8) -> AluResult<u8> {
    let carry_in = if cc & CC_C != 0 { 0x80 } else { 0 };
    let value = (m >> 1) | carry_in;
    let mut flags = (cc & !NZC) | nz8(value);
    if m & 0x01 != 0 {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// ASR: bit 7 preserved, bit 0 into carry.
#[must_use]
pub fn asr8(cc: u8, m: u8) -> AluResult<u8> {
    let value = (m >> 1) | (m & 0x80);
    let mut flags = (cc & !NZC) | nz8(value);
    if m & 0x01 != 0 {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// ASL/LSL: bit 7 into carry, V = bit 7 XOR bit 6 of the operand.
#[must_use]
pub fn asl8(cc: u8, m: u8) -> AluResult<u8> {
    let value = m << 1;
    let mut flags = (cc & !NZVC) | nz8(value);
    if m & 0x80 != 0 {
        flags |= CC_C;
    }
    if (m ^ (m << 1)) & 0x80 != 0 {
        flags |= CC_V;
    }
    AluResult { value, cc: flags }
}

/// ROL: carry into bit 0, bit 7 into carry, V = bit 7 XOR bit 6.
#[must_use]
pub fn rol8(cc: u8, m: u8) -> AluResult<u8> {
    let value = (m << 1) | u8::from(cc & CC_C != 0);
    let mut flags = (cc & !NZVC) | nz8(value);
    if m & 0x80 != 0 {
        flags |= CC_C;
    }
    if (m ^ (m << 1)) & 0x80 != 0 {
        flags |= CC_V;
    }
    AluResult { value, cc: flags }
}

/// DEC: C unaffected, V set when decrementing $80.
#[must_use]
pub fn dec8(cc: u8, m: u8) -> AluResult<u8> {
    let value = m.wrapping_sub(1);
    let mut flags = (cc & !NZV) | nz8(value);
    if m == 0x80 {
        flags |= CC_V;
    }
    AluResult { value, cc: flags }
}

/// INC: C unaffected, V set when incrementing $7F.
#[must_use]
pub fn inc8(cc: u8, m: u8) -> AluResult<u8> {
    let value = m.wrapping_add(1);
    let mut flags = (cc & !NZV) | nz8(value);
    if m == 0x7F {
        flags |= CC_V;
    }
    AluResult { value, cc: flags }
}

/// Flags for AND/OR/EOR/BIT/LD/ST/TST on a byte: N, Z set, V cleared.
#[must_use]
pub fn logic8(cc: u8, value: u8) -> u8 {
    (cc & !NZV) | nz8(value)
}

/// Flags for 16-bit loads and stores: N, Z set, V cleared.
#[must_use]
pub fn logic16(cc: u8, value: u16) -> u8 {
    (cc & !NZV) | nz16(value)
}

/// CLR: N, V, C cleared, Z set.
#[must_use]
pub fn clr(cc: u8) -> u8 {
    (cc & !NZVC) | CC_Z
}

/// DAA: decimal adjust A after a BCD addition.
#[must_use]
pub fn daa(cc: u8, a: u8) -> AluResult<u8> {
    let low = a & 0x0F;
    let high = a & 0xF0;
    let mut correction: u16 = 0;

    if cc & CC_H != 0 || low > 0x09 {
        correction |= 0x06;
    }
    if cc & CC_C != 0 || high > 0x90 || (high > 0x80 && low > 0x09) {
        correction |= 0x60;
    }

    let sum = u16::from(a) + correction;
    let value = sum as u8;
    // Carry is sticky: DAA may set it but never clears it.
    let mut flags = (cc & !(CC_N | CC_Z | CC_V)) | nz8(value);
    if sum > 0xFF {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}

/// MUL: unsigned A × B into D. Z from the result, C = bit 7 of the result.
#[must_use]
pub fn mul(cc: u8, a: u8, b: u8) -> AluResult<u16> {
    let value = u16::from(a) * u16::from(b);
    let mut flags = cc & !(CC_Z | CC_C);
    if value == 0 {
        flags |= CC_Z;
    }
    if value & 0x0080 != 0 {
        flags |= CC_C;
    }
    AluResult { value, cc: flags }
}
