//! Dragon 32/64 emulator core.
//!
//! A 6809E CPU, SAM 6883 address multiplexer, two 6821 PIAs and an MC6847
//! VDG, stepped one frame at a time. The machine produces a 320 × 240
//! palette-indexed frame and mono 16-bit audio per frame, takes input as
//! a key matrix, two joysticks and touches on an on-screen keyboard, and
//! saves and restores its whole state as a versioned snapshot.

mod bus;
#[cfg(feature = "native")]
pub mod capture;
mod cartridge;
mod config;
mod dragon;
mod error;
pub mod handoff;
pub mod input;
mod joystick;
mod keyboard;
pub mod overlay;
mod scheduler;
pub mod snapshot;
mod sound;
mod version;
pub mod video;

pub use bus::{AudioEvent, AudioLevels, AudioWrite, Device, DragonBus, decode};
pub use cartridge::Cartridge;
pub use config::{CYCLES_PER_LINE, DEFAULT_SAMPLE_RATE, DragonConfig, DragonModel, VideoStandard};
pub use dragon::{Dragon, FrameOutput};
pub use error::{DragonError, Result};
pub use handoff::{EmulatorEnd, HostEnd};
pub use input::{DragonKey, HostInput, InputQueue};
pub use joystick::{AXIS_CENTRE, AXIS_MAX, DigitalPad, JoystickState};
pub use keyboard::KeyboardMatrix;
pub use overlay::{KeyRegion, KeyboardOverlay};
pub use scheduler::{FrameScheduler, SchedulerState, TickOutput};
pub use sound::{SoundGenerator, SoundState};
pub use version::{NAME, VERSION, version_string};
pub use video::{FrameBuffer, VideoController};
