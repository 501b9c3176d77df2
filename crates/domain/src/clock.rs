//! Round countdown state.
//!
//! The server is authoritative: every pushed timer value overwrites
//! `remaining` unconditionally. Local ticks only interpolate between pushes
//! for smooth display and floor at zero. Reaching zero is a condition other
//! components observe; the clock itself takes no action.

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RoundClock {
    remaining: u32,
    total: u32,
}

impl RoundClock {
    /// Arm the clock from the round-start payload. `total` is fixed for the
    /// round and only used for the presentation fill ratio.
    pub fn start(&mut self, remaining: u32, total: u32) {
        self.remaining = remaining;
        self.total = total;
    }

    /// Local one-second tick. Returns the new remaining value.
    pub fn tick(&mut self) -> u32 {
        self.remaining = self.remaining.saturating_sub(1);
        self.remaining
    }

    /// Overwrite with the server-pushed value.
    pub fn sync(&mut self, remaining: u32) {
        self.remaining = remaining;
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Fraction of the round still left, for timer bars.
    pub fn fill_ratio(&self) -> f32 {
        if self.total == 0 {
            0.0
        } else {
            self.remaining as f32 / self.total as f32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_floor_at_zero() {
        let mut clock = RoundClock::default();
        clock.start(2, 30);
        assert_eq!(clock.tick(), 1);
        assert_eq!(clock.tick(), 0);
        assert_eq!(clock.tick(), 0);
        assert!(clock.is_expired());
    }

    #[test]
    fn server_sync_overwrites_local_ticks() {
        let mut clock = RoundClock::default();
        clock.start(30, 30);
        clock.tick();
        clock.tick();
        clock.sync(29);
        assert_eq!(clock.remaining(), 29);
        // Sync can also move the clock forward; the server wins either way.
        clock.sync(30);
        assert_eq!(clock.remaining(), 30);
    }

    #[test]
    fn fill_ratio_handles_zero_total() {
        let clock = RoundClock::default();
        assert_eq!(clock.fill_ratio(), 0.0);
        let mut clock = RoundClock::default();
        clock.start(15, 30);
        assert!((clock.fill_ratio() - 0.5).abs() < f32::EPSILON);
    }
}
