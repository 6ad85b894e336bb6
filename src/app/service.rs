//! Station service — the hexagonal core.
//!
//! [`StationService`] owns the schedule, the alarm monitor, the panel
//! link, and the latest readings snapshot.  All I/O flows through port
//! traits injected at call sites, making the entire service testable
//! with mock adapters.
//!
//! ```text
//!   SensorPort ──▶ ┌────────────────────────────┐ ──▶ PanelSink
//!                  │       StationService       │ ──▶ ReportSink
//!  PanelSource ──▶ │  Schedule · Alarm · Panel  │ ──▶ AlertSink
//!                  └────────────────────────────┘ ──▶ SirenPort
//! ```
//!
//! One `tick` call runs at most one of each scheduled task to
//! completion; consumers of the snapshot (alarm, display, report) always
//! run strictly after the producer within the same tick, so no
//! cross-tick locking is needed.

use log::{info, warn};

use crate::alarm::AlarmMonitor;
use crate::config::StationConfig;
use crate::display::PanelLink;
use crate::readings::Readings;
use crate::report::Report;
use crate::scheduler::StationSchedule;

use super::events::AppEvent;
use super::ports::{
    AlertSink, ClockPort, ConnectivityPort, EventSink, PanelSink, PanelSource, ReportSink,
    SensorPort, SirenPort,
};

/// The application service orchestrates all domain logic.
pub struct StationService {
    schedule: StationSchedule,
    alarm: AlarmMonitor,
    panel: PanelLink,
    latest: Readings,
    calibration_samples: u16,
    calibration_delay_ms: u32,
    calibrated: bool,
    tick_count: u64,
}

impl StationService {
    pub fn new(config: &StationConfig) -> Self {
        Self {
            schedule: StationSchedule::new(config),
            alarm: AlarmMonitor::new(config),
            panel: PanelLink::new(),
            latest: Readings::default(),
            calibration_samples: config.calibration_samples,
            calibration_delay_ms: config.calibration_delay_ms,
            calibrated: false,
            tick_count: 0,
        }
    }

    // ── Boot ──────────────────────────────────────────────────

    /// Establish clean-air baselines for every gas channel.
    ///
    /// Blocking and run exactly once, before the first tick; the station
    /// assumes clean air at power-up (unchecked) and never recalibrates.
    pub fn calibrate(
        &mut self,
        hw: &mut impl SensorPort,
        panel_sink: &mut impl PanelSink,
        events: &mut impl EventSink,
    ) {
        if self.calibrated {
            warn!("calibrate called twice; ignoring");
            return;
        }
        events.emit(&AppEvent::CalibrationStarted);
        self.panel.boot_status(panel_sink, "Calibrating sensors...");
        hw.calibrate(self.calibration_samples, self.calibration_delay_ms);
        self.calibrated = true;
        let baselines = hw.baselines();
        events.emit(&AppEvent::CalibrationCompleted { baselines });
        info!("calibration complete: {baselines:?}");
    }

    // ── Per-iteration orchestration ───────────────────────────

    /// Run one scheduler iteration.
    ///
    /// The `hw` parameter satisfies **both** [`SensorPort`] and
    /// [`SirenPort`], and `uplink` bundles connectivity with the two
    /// outbound sinks — this avoids double mutable borrows while keeping
    /// each port boundary explicit.
    pub fn tick(
        &mut self,
        now_ms: u32,
        hw: &mut (impl SensorPort + SirenPort),
        panel_io: &mut (impl PanelSink + PanelSource),
        uplink: &mut (impl ConnectivityPort + ReportSink + AlertSink),
        clock: &impl ClockPort,
        events: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // (a) Drain and apply at most one pending panel command.
        if let Some(line) = panel_io.poll_command() {
            self.panel.handle_command(&line);
        }

        // (b) Fast: close the anemometer window.
        if self.schedule.wind.fire(now_ms) {
            let _ = hw.wind_tick();
        }

        // (c) Medium: sample → alarm → display, in that order.
        if self.schedule.sampling.fire(now_ms) {
            self.latest = hw.read_all();
            events.emit(&AppEvent::Readings(self.latest));
            self.alarm.evaluate(&self.latest, hw, uplink, events);
            self.panel.refresh(&self.latest, clock.local_time(), panel_io);
        }

        // (d) Slow: hand the latest snapshot to the reporting collaborator.
        // Skipped while offline; retried at the next scheduled tick only.
        if self.schedule.report.fire(now_ms) && uplink.is_connected() {
            let report = Report::from_readings(&self.latest);
            match uplink.submit(&report) {
                Ok(()) => events.emit(&AppEvent::ReportSubmitted),
                Err(e) => {
                    warn!("report: submit failed ({e}), next attempt in {} ms",
                        self.schedule.report.interval_ms());
                    events.emit(&AppEvent::ReportFailed(e));
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// The most recent snapshot (zeroed before the first sampling tick).
    pub fn latest(&self) -> &Readings {
        &self.latest
    }

    pub fn alarm_active(&self) -> bool {
        self.alarm.is_active()
    }

    pub fn is_calibrated(&self) -> bool {
        self.calibrated
    }

    /// Iterations executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Panel link (pause flags, boot sequence helpers).
    pub fn panel(&self) -> &PanelLink {
        &self.panel
    }
}
