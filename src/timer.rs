use std::time::Duration;

/// Length of every timed session
pub const SESSION_DURATION_MS: u64 = 30_000;

/// Countdown driven by a virtual millisecond clock.
///
/// The owner passes the current clock reading into every call, so the timer
/// never reads wall time itself. Paused spans are accumulated and excluded
/// from the elapsed time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundTimer {
    duration_ms: u64,
    start_ms: u64,
    paused_total_ms: u64,
    paused_at: Option<u64>,
}

impl RoundTimer {
    pub fn start(duration_ms: u64, now_ms: u64) -> Self {
        Self {
            duration_ms,
            start_ms: now_ms,
            paused_total_ms: 0,
            paused_at: None,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn is_paused(&self) -> bool {
        self.paused_at.is_some()
    }

    pub fn elapsed_ms(&self, now_ms: u64) -> u64 {
        let now = self.paused_at.unwrap_or(now_ms);
        now.saturating_sub(self.start_ms)
            .saturating_sub(self.paused_total_ms)
    }

    pub fn time_left_ms(&self, now_ms: u64) -> u64 {
        self.duration_ms.saturating_sub(self.elapsed_ms(now_ms))
    }

    pub fn time_left(&self, now_ms: u64) -> Duration {
        Duration::from_millis(self.time_left_ms(now_ms))
    }

    /// Fraction of the duration still remaining, in `0.0..=1.0`
    pub fn progress(&self, now_ms: u64) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.time_left_ms(now_ms) as f64 / self.duration_ms as f64
    }

    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.time_left_ms(now_ms) == 0
    }

    pub fn pause(&mut self, now_ms: u64) {
        if self.paused_at.is_none() {
            self.paused_at = Some(now_ms);
        }
    }

    pub fn resume(&mut self, now_ms: u64) {
        if let Some(paused_at) = self.paused_at.take() {
            self.paused_total_ms += now_ms.saturating_sub(paused_at);
        }
    }
}

/// Subtracts a tick delta from a countdown.
/// Returns true when this tick brought the countdown to zero.
pub(crate) fn count_down(remaining: &mut Duration, elapsed: Duration) -> bool {
    if remaining.is_zero() {
        return false;
    }
    *remaining = remaining.saturating_sub(elapsed);
    remaining.is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fresh_timer_has_full_duration() {
        let timer = RoundTimer::start(SESSION_DURATION_MS, 1_000);
        assert_eq!(timer.time_left_ms(1_000), 30_000);
        assert!(!timer.is_expired(1_000));
        assert_eq!(timer.progress(1_000), 1.0);
    }

    #[test]
    fn test_time_left_saturates_at_zero() {
        let timer = RoundTimer::start(SESSION_DURATION_MS, 0);
        assert_eq!(timer.time_left_ms(29_999), 1);
        assert_eq!(timer.time_left_ms(30_000), 0);
        assert_eq!(timer.time_left_ms(90_000), 0);
        assert!(timer.is_expired(30_000));
    }

    #[test]
    fn test_pause_freezes_and_resume_subtracts() {
        let mut timer = RoundTimer::start(10_000, 0);
        timer.pause(2_000);
        assert!(timer.is_paused());
        assert_eq!(timer.time_left_ms(2_000), 8_000);
        assert_eq!(timer.time_left_ms(7_000), 8_000);

        timer.resume(7_000);
        assert!(!timer.is_paused());
        assert_eq!(timer.time_left_ms(7_000), 8_000);
        assert_eq!(timer.time_left_ms(9_000), 6_000);
    }

    #[test]
    fn test_double_pause_and_double_resume_are_noops() {
        let mut timer = RoundTimer::start(10_000, 0);
        timer.pause(1_000);
        timer.pause(3_000);
        timer.resume(4_000);
        timer.resume(6_000);
        // only the 1s..4s span counts as paused
        assert_eq!(timer.time_left_ms(6_000), 10_000 - 3_000);
    }

    #[test]
    fn test_count_down() {
        let mut remaining = Duration::from_millis(500);
        assert!(!count_down(&mut remaining, Duration::from_millis(200)));
        assert_eq!(remaining, Duration::from_millis(300));
        assert!(count_down(&mut remaining, Duration::from_millis(400)));
        assert!(remaining.is_zero());
        assert!(!count_down(&mut remaining, Duration::from_millis(10)));
    }

    #[test]
    fn test_count_down_keeps_submillisecond_steps() {
        let mut remaining = Duration::from_millis(500);
        let mut steps = 0;
        while !count_down(&mut remaining, Duration::from_micros(999)) {
            steps += 1;
        }
        // 500 whole steps fall 0.5 ms short; the 501st finishes it
        assert_eq!(steps, 500);
    }

    proptest! {
        #[test]
        fn time_left_is_monotonic_while_running(steps in proptest::collection::vec(0u64..5_000, 1..40)) {
            let timer = RoundTimer::start(SESSION_DURATION_MS, 0);
            let mut now = 0;
            let mut last = timer.time_left_ms(now);
            for step in steps {
                now += step;
                let left = timer.time_left_ms(now);
                prop_assert!(left <= last);
                prop_assert_eq!(timer.is_expired(now), left == 0);
                last = left;
            }
        }

        #[test]
        fn time_left_is_constant_while_paused(pause_at in 0u64..40_000, waits in proptest::collection::vec(0u64..5_000, 1..20)) {
            let mut timer = RoundTimer::start(SESSION_DURATION_MS, 0);
            timer.pause(pause_at);
            let frozen = timer.time_left_ms(pause_at);
            let mut now = pause_at;
            for wait in waits {
                now += wait;
                prop_assert_eq!(timer.time_left_ms(now), frozen);
            }
            timer.resume(now);
            prop_assert_eq!(timer.time_left_ms(now), frozen);
        }
    }
}
