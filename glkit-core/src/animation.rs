//! Pausable animation time.
//!
//! The clock never reads the system time itself; callers pass `now` in
//! seconds from whatever monotonic source they have (an `Instant` on
//! native, `performance.now()` on the web).

/// Animation time that can be paused, resumed and reset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationClock {
    start: f64,
    active: bool,
    /// When the clock was paused; time stands still from here on.
    paused_at: f64,
}

impl AnimationClock {
    /// A running clock whose time is zero at `now`.
    pub fn new(now: f64) -> Self {
        Self {
            start: now,
            active: true,
            paused_at: now,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Pauses or resumes. Resuming skips the paused interval so the
    /// animation continues where it stopped.
    pub fn set_active(&mut self, active: bool, now: f64) {
        if active == self.active {
            return;
        }
        if active {
            self.start += now - self.paused_at;
        } else {
            self.paused_at = now;
        }
        self.active = active;
        log::debug!("animation {}", if active { "resumed" } else { "paused" });
    }

    pub fn toggle(&mut self, now: f64) {
        self.set_active(!self.active, now);
    }

    /// Restarts from zero, keeping the paused/running state.
    pub fn reset(&mut self, now: f64) {
        self.start = now;
        self.paused_at = now;
    }

    /// Seconds of animation elapsed at `now`.
    pub fn time(&self, now: f64) -> f64 {
        if self.active {
            now - self.start
        } else {
            self.paused_at - self.start
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_clock() {
        let clock = AnimationClock::new(10.0);
        assert!(clock.is_active());
        assert_eq!(clock.time(10.0), 0.0);
        assert_eq!(clock.time(12.5), 2.5);
    }

    #[test]
    fn test_pause_and_resume() {
        let mut clock = AnimationClock::new(0.0);
        clock.set_active(false, 2.0);
        assert!(!clock.is_active());
        assert_eq!(clock.time(7.0), 2.0);

        clock.set_active(true, 5.0);
        assert_eq!(clock.time(5.0), 2.0);
        assert_eq!(clock.time(6.0), 3.0);
    }

    #[test]
    fn test_redundant_set_active_is_ignored() {
        let mut clock = AnimationClock::new(0.0);
        clock.set_active(false, 1.0);
        clock.set_active(false, 3.0);
        assert_eq!(clock.time(4.0), 1.0);
        clock.set_active(true, 4.0);
        clock.set_active(true, 9.0);
        assert_eq!(clock.time(10.0), 7.0);
    }

    #[test]
    fn test_reset() {
        let mut clock = AnimationClock::new(0.0);
        clock.reset(3.0);
        assert_eq!(clock.time(4.0), 1.0);

        clock.toggle(5.0);
        clock.reset(6.0);
        assert!(!clock.is_active());
        assert_eq!(clock.time(8.0), 0.0);
        clock.toggle(8.0);
        assert_eq!(clock.time(9.0), 1.0);
    }
}
