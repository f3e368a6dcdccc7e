//! CPU core trait.

use crate::Bus;

/// A CPU core driven one instruction at a time.
///
/// `step` executes exactly one instruction (or one interrupt acknowledge
/// sequence) and reports how many CPU cycles it took. The caller owns the
/// cycle budget and decides when to call back into video and audio.
pub trait Cpu {
    /// The type used for register inspection.
    type Registers;

    /// Execute one instruction or acknowledge one pending interrupt.
    ///
    /// Interrupt lines are sampled once, at the start of the call.
    fn step<B: Bus>(&mut self, bus: &mut B) -> u32;

    /// Returns the current program counter, zero-extended.
    fn pc(&self) -> u32;

    /// Returns a copy of all registers for inspection.
    fn registers(&self) -> Self::Registers;

    /// Returns true while the CPU is idling waiting for an interrupt.
    fn is_halted(&self) -> bool;

    /// Drive the maskable interrupt line (level sensitive).
    fn set_irq(&mut self, asserted: bool);

    /// Signal a non-maskable interrupt edge.
    fn nmi(&mut self);

    /// Reset the CPU and load the reset vector through the bus.
    fn reset<B: Bus>(&mut self, bus: &mut B);
}
