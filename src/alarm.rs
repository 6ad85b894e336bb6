//! Alarm monitor.
//!
//! Runs **every sampling tick after the snapshot** and compares the
//! tracked concentrations against fixed thresholds in priority order
//! (smoke > CO > LPG).  Two outputs with different trigger semantics:
//!
//! - **Siren** — level-driven: asserted HIGH on every tick while any
//!   condition holds, LOW otherwise.  Re-asserting each tick means a
//!   glitched output pin recovers within one tick.
//! - **Notification** — edge-driven: one free-text message on the
//!   Inactive → Active transition, guarded by the pre-tick active flag
//!   so a sustained alarm never repeats it.
//!
//! The alarm clears only when *all* conditions are simultaneously below
//! threshold.

use core::fmt;

use log::{error, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{AlertSink, EventSink, SirenPort};
use crate::config::StationConfig;
use crate::readings::Readings;

/// Which condition tripped the alarm, in checking priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlarmCause {
    Smoke,
    CarbonMonoxide,
    Lpg,
}

impl fmt::Display for AlarmCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Smoke => write!(f, "Smoke"),
            Self::CarbonMonoxide => write!(f, "Carbon monoxide (CO)"),
            Self::Lpg => write!(f, "Gas leak (LPG)"),
        }
    }
}

/// Alarm monitor state machine.
pub struct AlarmMonitor {
    smoke_threshold_ppm: u32,
    co_threshold_ppm: u32,
    lpg_threshold_ppm: u32,
    active: bool,
    /// The condition that most recently tripped the alarm.
    last_cause: Option<AlarmCause>,
}

impl AlarmMonitor {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            smoke_threshold_ppm: config.smoke_alarm_ppm,
            co_threshold_ppm: config.co_alarm_ppm,
            lpg_threshold_ppm: config.lpg_alarm_ppm,
            active: false,
            last_cause: None,
        }
    }

    /// True while any alarm condition holds.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// The condition that most recently tripped the alarm (sticky across
    /// clear, for diagnostics).
    pub fn last_cause(&self) -> Option<AlarmCause> {
        self.last_cause
    }

    /// Evaluate the snapshot, drive the siren, and notify on the edge.
    pub fn evaluate(
        &mut self,
        readings: &Readings,
        siren: &mut impl SirenPort,
        alerts: &mut impl AlertSink,
        events: &mut impl EventSink,
    ) {
        match self.first_exceeded(readings) {
            Some((cause, level)) => {
                if !self.active {
                    error!("ALARM RAISED: {} at {} ppm", cause, level);
                    self.send_notification(cause, level, alerts);
                    events.emit(&AppEvent::AlarmRaised { cause, level });
                }
                self.active = true;
                self.last_cause = Some(cause);
                siren.set_siren(true);
            }
            None => {
                if self.active {
                    info!("ALARM CLEARED: all conditions below threshold");
                    events.emit(&AppEvent::AlarmCleared);
                }
                self.active = false;
                siren.set_siren(false);
            }
        }
    }

    // ── Internal ──────────────────────────────────────────────────

    /// First exceeded condition in priority order; later conditions are
    /// not reported this tick even when simultaneously exceeded.
    fn first_exceeded(&self, r: &Readings) -> Option<(AlarmCause, u32)> {
        if r.smoke_ppm > self.smoke_threshold_ppm {
            Some((AlarmCause::Smoke, r.smoke_ppm))
        } else if r.co_ppm > self.co_threshold_ppm {
            Some((AlarmCause::CarbonMonoxide, r.co_ppm))
        } else if r.lpg_ppm > self.lpg_threshold_ppm {
            Some((AlarmCause::Lpg, r.lpg_ppm))
        } else {
            None
        }
    }

    fn send_notification(&self, cause: AlarmCause, level: u32, alerts: &mut impl AlertSink) {
        let message = format!("{} alert! Level detected: {} ppm", cause, level);
        if let Err(e) = alerts.notify(&message) {
            warn!("alarm: notification delivery failed ({e}), not retrying");
        }
    }
}
