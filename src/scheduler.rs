//! Tick scheduler.
//!
//! Single-threaded, non-preemptive, run-to-completion.  Each periodic
//! task owns a [`TaskClock`] holding its last-run timestamp and fixed
//! interval; on every loop iteration the service asks each clock whether
//! its interval has elapsed.
//!
//! Two invariants:
//!
//! - Elapsed time uses `u32` **wrapping subtraction**, so the schedule
//!   survives the ~49.7-day millisecond-counter wraparound.
//! - On fire, `last_run` is set to *now*, not `last_run + interval`:
//!   jitter accumulates as drift.  Accepted — correcting it is an
//!   explicit non-goal.

use crate::config::StationConfig;

/// One periodic task's timing state.
#[derive(Debug, Clone, Copy)]
pub struct TaskClock {
    interval_ms: u32,
    last_run_ms: u32,
}

impl TaskClock {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms,
            last_run_ms: 0,
        }
    }

    /// True when the interval has elapsed since the last fire; records
    /// `now_ms` as the new last-run time in that case.
    pub fn fire(&mut self, now_ms: u32) -> bool {
        if now_ms.wrapping_sub(self.last_run_ms) >= self.interval_ms {
            self.last_run_ms = now_ms;
            true
        } else {
            false
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }
}

/// The station's three periodic tasks.
pub struct StationSchedule {
    /// Fast: anemometer pulse aggregation (~1 s).
    pub wind: TaskClock,
    /// Medium: sampling → alarm → display refresh (~2 s).
    pub sampling: TaskClock,
    /// Slow: outbound report upload (~5 s).
    pub report: TaskClock,
}

impl StationSchedule {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            wind: TaskClock::new(config.wind_interval_ms),
            sampling: TaskClock::new(config.sampling_interval_ms),
            report: TaskClock::new(config.report_interval_ms),
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn does_not_fire_before_the_interval() {
        let mut clock = TaskClock::new(2000);
        assert!(clock.fire(2000), "first interval boundary fires");
        assert!(!clock.fire(2001));
        assert!(!clock.fire(3999));
        assert!(clock.fire(4000));
    }

    #[test]
    fn last_run_advances_to_now_not_by_interval() {
        let mut clock = TaskClock::new(2000);
        // Fire late at t=2500 — the next fire is due at 4500, not 4000.
        assert!(clock.fire(2500));
        assert!(!clock.fire(4000));
        assert!(clock.fire(4500));
    }

    #[test]
    fn survives_millis_wraparound() {
        let mut clock = TaskClock::new(2000);
        let near_wrap = u32::MAX - 500;
        assert!(clock.fire(near_wrap));
        // 1999 ms elapsed across the wrap boundary — not yet.
        assert!(!clock.fire(near_wrap.wrapping_add(1999)));
        // 2000 ms elapsed — fires on the far side of the wrap.
        assert!(clock.fire(near_wrap.wrapping_add(2000)));
    }

    #[test]
    fn schedule_uses_configured_intervals() {
        let sched = StationSchedule::new(&StationConfig::default());
        assert_eq!(sched.wind.interval_ms(), 1000);
        assert_eq!(sched.sampling.interval_ms(), 2000);
        assert_eq!(sched.report.interval_ms(), 5000);
    }

    #[test]
    fn independent_clocks_interleave() {
        let cfg = StationConfig::default();
        let mut sched = StationSchedule::new(&cfg);
        let mut wind_fires = 0;
        let mut sample_fires = 0;
        let mut report_fires = 0;
        // 10 s of 100 ms iterations, starting after boot settling.
        for t in (1000..=11_000).step_by(100) {
            if sched.wind.fire(t) {
                wind_fires += 1;
            }
            if sched.sampling.fire(t) {
                sample_fires += 1;
            }
            if sched.report.fire(t) {
                report_fires += 1;
            }
        }
        assert_eq!(wind_fires, 11);
        assert_eq!(sample_fires, 5);
        assert_eq!(report_fires, 2);
    }
}
