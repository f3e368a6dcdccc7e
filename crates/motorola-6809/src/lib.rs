//! Motorola 6809 CPU interpreter.
//!
//! Each call to `step()` executes one whole instruction (or one interrupt
//! acknowledge) and returns its cycle cost from the MC6809 data sheet.
//! Undefined opcodes execute as 2-cycle no-ops.

mod addressing;
pub mod alu;
mod cpu;
mod registers;

pub use cpu::{InterruptLines, M6809, WaitState};
pub use registers::{CC_C, CC_E, CC_F, CC_H, CC_I, CC_N, CC_V, CC_Z, Registers};

/// Interrupt and reset vectors (big-endian words).
pub mod vectors {
    pub const SWI3: u16 = 0xFFF2;
    pub const SWI2: u16 = 0xFFF4;
    pub const FIRQ: u16 = 0xFFF6;
    pub const IRQ: u16 = 0xFFF8;
    pub const SWI: u16 = 0xFFFA;
    pub const NMI: u16 = 0xFFFC;
    pub const RESET: u16 = 0xFFFE;
}
