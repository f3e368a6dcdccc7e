//! Texas Instruments SN76489 Programmable Sound Generator.
//!
//! Three square-wave tone generators with 10-bit dividers and one noise
//! generator, each with a 4-bit attenuator (2 dB steps, $F = off). The chip
//! is write-only and takes one byte at a time:
//!
//! | Byte        | Meaning |
//! |-------------|---------|
//! | `1 RRR dddd` | Latch register RRR, write low 4 bits |
//! | `0 x dddddd` | Data: high 6 bits of a tone period, or low 4 bits otherwise |
//!
//! | RRR | Register |
//! |-----|----------|
//! | 0/2/4 | Tone 0/1/2 period |
//! | 1/3/5 | Tone 0/1/2 attenuation |
//! | 6     | Noise control (bit 2 white, bits 1-0 rate) |
//! | 7     | Noise attenuation |
//!
//! The generators step at the input clock / 16. Output samples are produced
//! on demand: each call to [`Sn76489::next_sample`] advances the chip by the
//! number of steps owed for one sample, using an integer remainder so the
//! long-run rate is exact and the output is fully deterministic.

/// Amplitude per attenuation level. Four channels at full volume sum to
/// just under `i16::MAX`.
const VOLUME_TABLE: [i16; 16] = [
    8191, 6506, 5168, 4105, 3261, 2590, 2057, 1634, 1298, 1031, 819, 650, 517, 410, 326, 0,
];

/// LFSR value after a noise control write.
const LFSR_RESET: u16 = 0x4000;

/// Complete chip state, for snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sn76489State {
    pub periods: [u16; 3],
    pub attenuation: [u8; 4],
    pub noise_control: u8,
    pub latched: u8,
    pub counters: [u16; 4],
    pub outputs: [bool; 4],
    pub lfsr: u16,
    pub remainder: u64,
}

/// SN76489 PSG.
pub struct Sn76489 {
    /// Tone periods (10 bits).
    periods: [u16; 3],
    /// Attenuation for tone 0-2 and noise.
    attenuation: [u8; 4],
    noise_control: u8,
    /// Register selected by the last latch byte.
    latched: u8,
    /// Down-counters for tone 0-2 and noise.
    counters: [u16; 4],
    /// Square-wave outputs; index 3 is the noise shift clock.
    outputs: [bool; 4],
    lfsr: u16,

    /// Generator steps per second (clock / 16).
    step_rate: u64,
    sample_rate: u64,
    remainder: u64,
}

impl Sn76489 {
    /// Create a silent PSG.
    ///
    /// `clock_hz` is the chip input clock (3,579,545 Hz on the sound
    /// cartridge); `sample_rate` is the output rate.
    #[must_use]
    pub fn new(clock_hz: u32, sample_rate: u32) -> Self {
        Self {
            periods: [0; 3],
            attenuation: [0x0F; 4],
            noise_control: 0,
            latched: 0,
            counters: [0; 4],
            outputs: [false; 4],
            lfsr: LFSR_RESET,
            step_rate: u64::from(clock_hz / 16),
            sample_rate: u64::from(sample_rate.max(1)),
            remainder: 0,
        }
    }

    /// Return to the power-on state (all channels off).
    pub fn reset(&mut self) {
        let (step_rate, sample_rate) = (self.step_rate, self.sample_rate);
        *self = Self {
            step_rate,
            sample_rate,
            ..Self::new(0, 1)
        };
    }

    /// Write a byte to the data port.
    pub fn write(&mut self, value: u8) {
        if value & 0x80 != 0 {
            self.latched = (value >> 4) & 0x07;
            self.write_low(value & 0x0F);
        } else if self.latched & 1 == 0 && self.latched < 6 {
            let ch = usize::from(self.latched >> 1);
            self.periods[ch] = (self.periods[ch] & 0x000F) | (u16::from(value & 0x3F) << 4);
        } else {
            self.write_low(value & 0x0F);
        }
    }

    fn write_low(&mut self, data: u8) {
        match self.latched {
            0 | 2 | 4 => {
                let ch = usize::from(self.latched >> 1);
                self.periods[ch] = (self.periods[ch] & 0x03F0) | u16::from(data);
            }
            1 | 3 | 5 => self.attenuation[usize::from(self.latched >> 1)] = data,
            6 => {
                self.noise_control = data & 0x07;
                self.lfsr = LFSR_RESET;
            }
            _ => self.attenuation[3] = data,
        }
    }

    /// Tone period for channel 0-2.
    #[must_use]
    pub fn period(&self, channel: usize) -> u16 {
        self.periods[channel % 3]
    }

    /// Attenuation for channel 0-3 (3 = noise).
    #[must_use]
    pub fn attenuation(&self, channel: usize) -> u8 {
        self.attenuation[channel % 4]
    }

    /// Noise control register.
    #[must_use]
    pub fn noise_control(&self) -> u8 {
        self.noise_control
    }

    /// Produce the next output sample.
    pub fn next_sample(&mut self) -> i16 {
        let owed = self.step_rate + self.remainder;
        let steps = owed / self.sample_rate;
        self.remainder = owed % self.sample_rate;

        if steps == 0 {
            return self.level();
        }

        let mut sum: i64 = 0;
        for _ in 0..steps {
            self.step();
            sum += i64::from(self.level());
        }
        (sum / steps as i64) as i16
    }

    /// Advance all generators by one step (clock / 16).
    fn step(&mut self) {
        for ch in 0..3 {
            if self.counters[ch] > 0 {
                self.counters[ch] -= 1;
            }
            if self.counters[ch] == 0 {
                // A period of 0 behaves as 1024
                self.counters[ch] = if self.periods[ch] == 0 {
                    0x400
                } else {
                    self.periods[ch]
                };
                self.outputs[ch] = !self.outputs[ch];
            }
        }

        if self.counters[3] > 0 {
            self.counters[3] -= 1;
        }
        if self.counters[3] == 0 {
            self.counters[3] = match self.noise_control & 0x03 {
                0 => 0x10,
                1 => 0x20,
                2 => 0x40,
                _ => self.periods[2].max(1),
            };
            self.outputs[3] = !self.outputs[3];
            if self.outputs[3] {
                self.shift_noise();
            }
        }
    }

    fn shift_noise(&mut self) {
        let feedback = if self.noise_control & 0x04 != 0 {
            (self.lfsr ^ (self.lfsr >> 1)) & 1
        } else {
            self.lfsr & 1
        };
        self.lfsr = (self.lfsr >> 1) | (feedback << 14);
    }

    /// Current mixed level of all four channels.
    fn level(&self) -> i16 {
        let mut level = 0i16;
        for ch in 0..3 {
            let amp = VOLUME_TABLE[usize::from(self.attenuation[ch] & 0x0F)];
            level += if self.outputs[ch] { amp } else { -amp };
        }
        let amp = VOLUME_TABLE[usize::from(self.attenuation[3] & 0x0F)];
        level += if self.lfsr & 1 != 0 { amp } else { -amp };
        level
    }

    /// Snapshot of the full chip state.
    #[must_use]
    pub fn state(&self) -> Sn76489State {
        Sn76489State {
            periods: self.periods,
            attenuation: self.attenuation,
            noise_control: self.noise_control,
            latched: self.latched,
            counters: self.counters,
            outputs: self.outputs,
            lfsr: self.lfsr,
            remainder: self.remainder,
        }
    }

    /// Restore a state captured by [`Sn76489::state`].
    pub fn restore(&mut self, state: &Sn76489State) {
        self.periods = state.periods;
        self.attenuation = state.attenuation;
        self.noise_control = state.noise_control;
        self.latched = state.latched;
        self.counters = state.counters;
        self.outputs = state.outputs;
        self.lfsr = state.lfsr;
        self.remainder = state.remainder;
    }
}
