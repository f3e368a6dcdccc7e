//! Master clock configuration.

/// Master crystal of a machine.
///
/// Every component rate derives from this frequency by integer division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterClock {
    /// Crystal frequency in Hz (e.g. `14_218_000` for a PAL Dragon).
    pub frequency_hz: u64,
}

impl MasterClock {
    #[must_use]
    pub const fn new(frequency_hz: u64) -> Self {
        Self { frequency_hz }
    }

    /// Frequency of a clock derived by dividing the crystal.
    #[must_use]
    pub const fn divided(&self, divider: u64) -> u64 {
        self.frequency_hz / divider
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pal_dragon_cpu_clock() {
        let clock = MasterClock::new(14_218_000);
        assert_eq!(clock.divided(16), 888_625);
    }
}
