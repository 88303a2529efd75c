//! Dimming shutoff timer for the steady state.
//!
//! Each second of a 5-click hold adds five minutes. While running, the
//! output fades linearly from the level it had when the timer was set (or
//! last adjusted by hand) down toward the floor, and the light turns off
//! when the timer reaches zero.

/// Minutes added per second of holding.
pub const SUNSET_TIMER_UNIT: u8 = 5;

/// Remaining minutes at or below which ramping extends the timer.
const NEARLY_EXPIRED: u8 = 4;

/// Remaining minutes after ramping a nearly expired timer.
const EXTENDED: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub(crate) struct SunsetTimer {
    minutes: u8,
    peak: u8,
    ticks: u16,
    orig_level: u8,
}

impl SunsetTimer {
    pub(crate) const fn new() -> Self {
        Self {
            minutes: 0,
            peak: 0,
            ticks: 0,
            orig_level: 0,
        }
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.minutes > 0
    }

    #[inline]
    pub(crate) fn minutes(&self) -> u8 {
        self.minutes
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::new();
    }

    /// Handles one frame of the set-timer hold. Returns true on the frames
    /// that add time, which the caller acknowledges with a blink.
    pub(crate) fn hold(&mut self, arg: u16, ticks_per_second: u16, level: u8) -> bool {
        if arg % ticks_per_second != 0 {
            return false;
        }
        if !self.is_active() {
            self.orig_level = level;
        }
        if self.minutes < u8::MAX - SUNSET_TIMER_UNIT {
            self.minutes += SUNSET_TIMER_UNIT;
            self.peak = self.minutes;
            self.ticks = 0;
        }
        true
    }

    /// Keeps a nearly expired timer from shutting off right after the user
    /// adjusted the brightness.
    pub(crate) fn extend_if_nearly_expired(&mut self) {
        if self.is_active() && self.minutes < NEARLY_EXPIRED {
            self.minutes = EXTENDED;
            self.peak = EXTENDED;
        }
    }

    /// Counts one awake tick. Returns true when the timer just ran out.
    pub(crate) fn tick(&mut self, ticks_per_minute: u16) -> bool {
        if !self.is_active() {
            return false;
        }
        self.ticks += 1;
        if self.ticks < ticks_per_minute {
            return false;
        }
        self.ticks = 0;
        self.minutes -= 1;
        !self.is_active()
    }

    /// Makes `level` the starting point of the fade.
    #[inline]
    pub(crate) fn rebase(&mut self, level: u8) {
        self.orig_level = level;
    }

    /// Output for the time remaining, never below 1.
    pub(crate) fn dimmed_level(&self) -> u8 {
        if self.peak == 0 {
            return self.orig_level;
        }
        let dimmed =
            self.orig_level as u16 * self.minutes.saturating_sub(1) as u16 / self.peak as u16;
        (dimmed as u8).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hold_adds_time_once_per_second() {
        let mut timer = SunsetTimer::new();
        assert!(timer.hold(0, 62, 100));
        assert!(!timer.hold(30, 62, 100));
        assert!(timer.hold(62, 62, 100));
        assert_eq!(timer.minutes(), 10);
    }

    #[test]
    fn expires_after_counted_minutes() {
        let mut timer = SunsetTimer::new();
        timer.hold(0, 62, 100);
        let mut expired_at = None;
        for tick in 1..=5 * 10 {
            if timer.tick(10) {
                expired_at = Some(tick);
                break;
            }
        }
        assert_eq!(expired_at, Some(50));
        assert!(!timer.is_active());
    }

    #[test]
    fn dims_linearly_with_floor_of_one() {
        let mut timer = SunsetTimer::new();
        timer.hold(0, 62, 100);
        // 5 of 5 minutes left: 100 * 4 / 5
        assert_eq!(timer.dimmed_level(), 80);
        for _ in 0..4 * 10 {
            timer.tick(10);
        }
        assert_eq!(timer.minutes(), 1);
        assert_eq!(timer.dimmed_level(), 1);
    }

    #[test]
    fn ramping_extends_nearly_expired_timer() {
        let mut timer = SunsetTimer::new();
        timer.hold(0, 62, 100);
        for _ in 0..4 * 10 {
            timer.tick(10);
        }
        timer.extend_if_nearly_expired();
        assert_eq!(timer.minutes(), 3);
    }
}
