//! Port traits — the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ StationService (domain)
//! ```
//!
//! Driven adapters (sensors, siren, panel UART, HTTP uplink, clock)
//! implement these traits.  The
//! [`StationService`](super::service::StationService) consumes them via
//! generics, so the domain core never touches hardware directly.

use crate::app::events::AppEvent;
use crate::error::CommsError;
use crate::readings::Readings;
use crate::report::Report;
use crate::sensors::gas::GasChannelId;

/// Longest inbound panel command the station accepts.
pub const MAX_PANEL_COMMAND: usize = 32;

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this to obtain sensor data.
pub trait SensorPort {
    /// Read every sensor and return a fresh snapshot.
    fn read_all(&mut self) -> Readings;

    /// Close the current anemometer aggregation window; returns the wind
    /// speed (km/h) that subsequent snapshots will carry.
    fn wind_tick(&mut self) -> f32;

    /// Blocking clean-air baseline calibration of every gas channel.
    fn calibrate(&mut self, samples: u16, delay_ms: u32);

    /// Clean-air baselines in channel order (0.0 = uncalibrated).
    fn baselines(&self) -> [f32; GasChannelId::COUNT];
}

// ───────────────────────────────────────────────────────────────
// Siren port (driven adapter: domain → actuator)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the alarm actuator.  The level is re-asserted on
/// every alarm evaluation, not only on edges.
pub trait SirenPort {
    fn set_siren(&mut self, active: bool);
}

// ───────────────────────────────────────────────────────────────
// Panel ports (driven adapter: domain ↔ serial display)
// ───────────────────────────────────────────────────────────────

/// Outbound panel sink.  Frames arrive fully encoded (terminator
/// included); the sink just moves bytes.  Best-effort — a wedged panel
/// must not stall the sampling pipeline.
pub trait PanelSink {
    fn send(&mut self, frame: &[u8]);
}

/// Inbound panel source.  Non-blocking; yields at most one complete
/// line-terminated command per poll.
pub trait PanelSource {
    fn poll_command(&mut self) -> Option<heapless::String<MAX_PANEL_COMMAND>>;
}

// ───────────────────────────────────────────────────────────────
// Uplink ports (driven adapter: domain → cloud collaborators)
// ───────────────────────────────────────────────────────────────

/// Hands one report to the ingestion endpoint.  Single attempt; the
/// caller logs the outcome and waits for the next scheduled tick.
pub trait ReportSink {
    fn submit(&mut self, report: &Report) -> Result<(), CommsError>;
}

/// Delivers one free-text alarm notification.  Invoked only on
/// Inactive → Active edges; failure is logged, never retried.
pub trait AlertSink {
    fn notify(&mut self, message: &str) -> Result<(), CommsError>;
}

/// Network connectivity boundary.
pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), CommsError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    /// Drive reconnection/backoff; call once per loop iteration.
    fn poll(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Clock port (driven adapter: domain ← wall-clock time)
// ───────────────────────────────────────────────────────────────

/// Broken-down local time for panel/report timestamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Wall-clock source.  `local_time` returns `None` until the clock has
/// been synchronised (e.g. pre-NTP); callers substitute placeholders.
pub trait ClockPort {
    /// Milliseconds since boot (monotonic, wraps at `u32::MAX`).
    fn uptime_ms(&self) -> u32;

    fn local_time(&self) -> Option<LocalTime>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
/// Adapters decide where they go (serial log, debug console, etc.).
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
