//! Running CPU cycle counter.

/// Total CPU cycles since power-on. Stored in snapshots, so it never wraps
/// in practice (a u64 at 0.89 MHz lasts for millennia).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ticks(u64);

impl Ticks {
    pub const ZERO: Self = Self(0);

    #[must_use]
    pub const fn new(count: u64) -> Self {
        Self(count)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Instruction steps report their cost as `u32`.
impl core::ops::AddAssign<u32> for Ticks {
    fn add_assign(&mut self, rhs: u32) {
        self.0 = self.0.wrapping_add(u64::from(rhs));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_step_costs() {
        let mut t = Ticks::ZERO;
        t += 5;
        t += 3;
        assert_eq!(t, Ticks::new(8));
        assert_eq!(t.get(), 8);
    }
}
