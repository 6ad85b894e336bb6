//! Outbound application events.
//!
//! The [`StationService`](super::service::StationService) emits these
//! through the [`EventSink`](super::ports::EventSink) port.  Adapters on
//! the other side decide what to do with them — log to serial, mirror to
//! a debug console, etc.

use crate::alarm::AlarmCause;
use crate::error::CommsError;
use crate::readings::Readings;
use crate::sensors::gas::GasChannelId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Boot calibration has started (station unusable until it finishes).
    CalibrationStarted,

    /// Boot calibration finished; clean-air baselines in channel order (kΩ).
    CalibrationCompleted {
        baselines: [f32; GasChannelId::COUNT],
    },

    /// A fresh snapshot was sampled.
    Readings(Readings),

    /// The alarm transitioned Inactive → Active.
    AlarmRaised { cause: AlarmCause, level: u32 },

    /// All alarm conditions dropped below threshold.
    AlarmCleared,

    /// The periodic report was accepted by the ingestion endpoint.
    ReportSubmitted,

    /// The periodic report attempt failed (no retry until the next tick).
    ReportFailed(CommsError),
}
