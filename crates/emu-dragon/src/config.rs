//! Machine configuration.

use emu_core::MasterClock;

use crate::cartridge::Cartridge;

/// Default audio output rate.
pub const DEFAULT_SAMPLE_RATE: u32 = 44_100;

/// CPU cycles per scanline (both standards).
pub const CYCLES_PER_LINE: u32 = 57;

/// Supported Dragon models.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragonModel {
    /// 32K RAM, 16K BASIC ROM.
    Dragon32,
    /// 64K RAM, two 16K BASIC ROMs selected by PIA1 PB2.
    Dragon64,
}

impl DragonModel {
    /// Fitted RAM in bytes.
    #[must_use]
    pub const fn ram_size(self) -> usize {
        match self {
            Self::Dragon32 => 0x8000,
            Self::Dragon64 => 0x1_0000,
        }
    }

    /// Number of 16K BASIC ROM banks.
    #[must_use]
    pub const fn rom_banks(self) -> usize {
        match self {
            Self::Dragon32 => 1,
            Self::Dragon64 => 2,
        }
    }

    /// Expected BASIC ROM image size.
    #[must_use]
    pub const fn rom_size(self) -> usize {
        self.rom_banks() * 0x4000
    }

    /// Identifier stored in snapshots.
    #[must_use]
    pub const fn id(self) -> u8 {
        match self {
            Self::Dragon32 => 0,
            Self::Dragon64 => 1,
        }
    }

    #[must_use]
    pub const fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(Self::Dragon32),
            1 => Some(Self::Dragon64),
            _ => None,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Dragon32 => "Dragon 32",
            Self::Dragon64 => "Dragon 64",
        }
    }
}

/// Television standard: sets the CPU clock and lines per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoStandard {
    /// 14.218 MHz crystal / 16, 312 lines.
    #[default]
    Pal,
    /// 14.31818 MHz crystal / 16, 262 lines.
    Ntsc,
}

impl VideoStandard {
    /// Master crystal for this standard.
    #[must_use]
    pub const fn crystal(self) -> MasterClock {
        match self {
            Self::Pal => MasterClock::new(14_218_000),
            Self::Ntsc => MasterClock::new(14_318_180),
        }
    }

    /// CPU clock: the crystal divided by 16 in the SAM.
    #[must_use]
    pub const fn cpu_hz(self) -> u32 {
        self.crystal().divided(16) as u32
    }

    #[must_use]
    pub const fn lines_per_frame(self) -> u16 {
        match self {
            Self::Pal => 312,
            Self::Ntsc => 262,
        }
    }

    /// 17,784 (PAL) or 14,934 (NTSC).
    #[must_use]
    pub const fn cycles_per_frame(self) -> u32 {
        CYCLES_PER_LINE * self.lines_per_frame() as u32
    }

    #[must_use]
    pub fn frames_per_second(self) -> f64 {
        f64::from(self.cpu_hz()) / f64::from(self.cycles_per_frame())
    }
}

/// Configuration for creating a [`Dragon`](crate::Dragon).
pub struct DragonConfig {
    pub model: DragonModel,
    pub video_standard: VideoStandard,
    /// BASIC ROM image: 16,384 bytes (Dragon 32) or 32,768 bytes (Dragon 64).
    pub basic_rom: Vec<u8>,
    pub cartridge: Option<Cartridge>,
    pub sample_rate: u32,
}

impl DragonConfig {
    /// PAL machine with no cartridge at the default sample rate.
    #[must_use]
    pub fn new(model: DragonModel, basic_rom: Vec<u8>) -> Self {
        Self {
            model,
            video_standard: VideoStandard::Pal,
            basic_rom,
            cartridge: None,
            sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}
