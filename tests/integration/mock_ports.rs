//! Mock port adapters for integration tests.
//!
//! Record every actuator/sink call so tests can assert on the full
//! command history without touching real hardware or the network.

use std::collections::VecDeque;

use airstation::app::events::AppEvent;
use airstation::app::ports::{
    AlertSink, ClockPort, ConnectivityPort, EventSink, LocalTime, PanelSink, PanelSource,
    ReportSink, SensorPort, SirenPort, MAX_PANEL_COMMAND,
};
use airstation::readings::Readings;
use airstation::report::Report;
use airstation::sensors::gas::GasChannelId;
use airstation::CommsError;

// ── MockHardware (SensorPort + SirenPort) ─────────────────────

pub struct MockHardware {
    /// What the next `read_all` returns.
    pub readings: Readings,
    pub wind_kmh: f32,
    pub read_all_calls: u32,
    pub wind_tick_calls: u32,
    pub calibrated_with: Option<(u16, u32)>,
    /// Every siren level command, in order.
    pub siren_history: Vec<bool>,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            readings: Readings::default(),
            wind_kmh: 0.0,
            read_all_calls: 0,
            wind_tick_calls: 0,
            calibrated_with: None,
            siren_history: Vec::new(),
        }
    }

    pub fn siren_on(&self) -> bool {
        self.siren_history.last().copied().unwrap_or(false)
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> Readings {
        self.read_all_calls += 1;
        let mut r = self.readings;
        r.wind_kmh = self.wind_kmh;
        r
    }

    fn wind_tick(&mut self) -> f32 {
        self.wind_tick_calls += 1;
        self.wind_kmh
    }

    fn calibrate(&mut self, samples: u16, delay_ms: u32) {
        self.calibrated_with = Some((samples, delay_ms));
    }

    fn baselines(&self) -> [f32; GasChannelId::COUNT] {
        if self.calibrated_with.is_some() {
            [7.5, 180.0, 12.0, 22.5]
        } else {
            [0.0; GasChannelId::COUNT]
        }
    }
}

impl SirenPort for MockHardware {
    fn set_siren(&mut self, active: bool) {
        self.siren_history.push(active);
    }
}

// ── MockPanel (PanelSink + PanelSource) ───────────────────────

pub struct MockPanel {
    pub frames: Vec<Vec<u8>>,
    pub inbound: VecDeque<&'static str>,
}

impl MockPanel {
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            inbound: VecDeque::new(),
        }
    }

    /// Decoded command texts (terminator stripped).
    pub fn commands(&self) -> Vec<String> {
        self.frames
            .iter()
            .map(|f| String::from_utf8_lossy(&f[..f.len() - 3]).into_owned())
            .collect()
    }

    pub fn has_command_starting(&self, prefix: &str) -> bool {
        self.commands().iter().any(|c| c.starts_with(prefix))
    }
}

impl PanelSink for MockPanel {
    fn send(&mut self, frame: &[u8]) {
        self.frames.push(frame.to_vec());
    }
}

impl PanelSource for MockPanel {
    fn poll_command(&mut self) -> Option<heapless::String<MAX_PANEL_COMMAND>> {
        self.inbound
            .pop_front()
            .and_then(|s| heapless::String::try_from(s).ok())
    }
}

// ── MockUplink (ConnectivityPort + ReportSink + AlertSink) ────

pub struct MockUplink {
    pub connected: bool,
    pub reports: Vec<Report>,
    pub alerts: Vec<String>,
    pub fail_submit: bool,
}

impl MockUplink {
    pub fn new(connected: bool) -> Self {
        Self {
            connected,
            reports: Vec::new(),
            alerts: Vec::new(),
            fail_submit: false,
        }
    }
}

impl ConnectivityPort for MockUplink {
    fn connect(&mut self) -> Result<(), CommsError> {
        self.connected = true;
        Ok(())
    }

    fn disconnect(&mut self) {
        self.connected = false;
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn poll(&mut self) {}
}

impl ReportSink for MockUplink {
    fn submit(&mut self, report: &Report) -> Result<(), CommsError> {
        if self.fail_submit {
            return Err(CommsError::RequestFailed);
        }
        self.reports.push(*report);
        Ok(())
    }
}

impl AlertSink for MockUplink {
    fn notify(&mut self, message: &str) -> Result<(), CommsError> {
        self.alerts.push(message.to_string());
        Ok(())
    }
}

// ── MockClock ─────────────────────────────────────────────────

pub struct MockClock {
    pub now: Option<LocalTime>,
}

impl MockClock {
    pub fn unsynced() -> Self {
        Self { now: None }
    }
}

impl ClockPort for MockClock {
    fn uptime_ms(&self) -> u32 {
        0
    }

    fn local_time(&self) -> Option<LocalTime> {
        self.now
    }
}

// ── Recording event sink ──────────────────────────────────────

pub struct RecordingSink {
    pub events: Vec<String>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.events.iter().filter(|e| e.contains(needle)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(format!("{:?}", event));
    }
}
