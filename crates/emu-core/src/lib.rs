//! Core traits and types shared by the chip crates and the machine crate.
//!
//! Time is counted in CPU cycles. The machine derives every other rate
//! (scanlines, audio samples) from the master crystal.

mod bus;
mod clock;
mod cpu;
mod observable;
mod ticks;

pub use bus::{Bus, SimpleBus};
pub use clock::MasterClock;
pub use cpu::Cpu;
pub use observable::{Observable, Value, parse_address};
pub use ticks::Ticks;
