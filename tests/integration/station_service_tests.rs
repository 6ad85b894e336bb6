//! Integration tests for the StationService orchestration pipeline.
//!
//! These run on the host and verify the full tick: scheduled sampling,
//! alarm evaluation with siren + notification side effects, display
//! refresh with pause flags, and report cadence — all through mock
//! adapters, no real hardware.

use crate::mock_ports::{MockClock, MockHardware, MockPanel, MockUplink, RecordingSink};

use airstation::app::service::StationService;
use airstation::config::StationConfig;
use airstation::readings::Readings;

struct Fixture {
    service: StationService,
    hw: MockHardware,
    panel: MockPanel,
    uplink: MockUplink,
    clock: MockClock,
    sink: RecordingSink,
}

fn fixture() -> Fixture {
    Fixture {
        service: StationService::new(&StationConfig::default()),
        hw: MockHardware::new(),
        panel: MockPanel::new(),
        uplink: MockUplink::new(true),
        clock: MockClock::unsynced(),
        sink: RecordingSink::new(),
    }
}

impl Fixture {
    fn tick(&mut self, now_ms: u32) {
        self.service.tick(
            now_ms,
            &mut self.hw,
            &mut self.panel,
            &mut self.uplink,
            &self.clock,
            &mut self.sink,
        );
    }
}

// ── Calibration ───────────────────────────────────────────────

#[test]
fn calibrate_forwards_config_and_reports_baselines() {
    let mut f = fixture();
    assert!(!f.service.is_calibrated());

    f.service.calibrate(&mut f.hw, &mut f.panel, &mut f.sink);

    assert!(f.service.is_calibrated());
    assert_eq!(f.hw.calibrated_with, Some((50, 100)));
    assert_eq!(f.sink.count_containing("CalibrationStarted"), 1);
    assert_eq!(f.sink.count_containing("CalibrationCompleted"), 1);
    // Boot status reached the panel.
    assert!(f.panel.has_command_starting("page0.t_status.txt"));
}

#[test]
fn second_calibrate_call_is_ignored() {
    let mut f = fixture();
    f.service.calibrate(&mut f.hw, &mut f.panel, &mut f.sink);
    f.service.calibrate(&mut f.hw, &mut f.panel, &mut f.sink);
    assert_eq!(f.sink.count_containing("CalibrationStarted"), 1);
}

// ── Sampling tick ─────────────────────────────────────────────

#[test]
fn sampling_tick_samples_then_refreshes_the_panel() {
    let mut f = fixture();
    f.hw.readings = Readings {
        temperature_c: 21.0,
        smoke_ppm: 10,
        ..Readings::default()
    };

    // Before the interval elapses nothing runs.
    f.tick(100);
    assert_eq!(f.hw.read_all_calls, 0);
    assert!(f.panel.frames.is_empty());

    f.tick(2000);
    assert_eq!(f.hw.read_all_calls, 1);
    assert!(f.panel.has_command_starting("page1.temp.txt=\"21.0\""));
    assert_eq!(f.sink.count_containing("Readings"), 1);
    assert_eq!(f.service.latest().temperature_c, 21.0);
}

#[test]
fn sampling_does_not_rerun_within_the_interval() {
    let mut f = fixture();
    f.tick(2000);
    f.tick(2100);
    f.tick(3999);
    assert_eq!(f.hw.read_all_calls, 1);
    f.tick(4000);
    assert_eq!(f.hw.read_all_calls, 2);
}

#[test]
fn wind_tick_runs_on_its_own_faster_clock() {
    let mut f = fixture();
    for t in (0..=4000).step_by(100) {
        f.tick(t);
    }
    assert_eq!(f.hw.wind_tick_calls, 4, "wind fires each second");
    assert_eq!(f.hw.read_all_calls, 2, "sampling fires every two seconds");
}

// ── Alarm pipeline ────────────────────────────────────────────

#[test]
fn smoke_alarm_edge_notifies_once_and_holds_the_siren() {
    let mut f = fixture();
    f.hw.readings = Readings {
        smoke_ppm: 401,
        ..Readings::default()
    };

    f.tick(2000);
    assert!(f.service.alarm_active());
    assert!(f.hw.siren_on());
    assert_eq!(f.uplink.alerts.len(), 1);
    assert!(f.uplink.alerts[0].contains("Smoke"));
    assert!(f.uplink.alerts[0].contains("401"));

    // Sustained: siren re-asserted, no repeat notification.
    f.tick(4000);
    assert!(f.hw.siren_on());
    assert_eq!(f.hw.siren_history.len(), 2);
    assert_eq!(f.uplink.alerts.len(), 1);

    // All conditions clear: siren drops, no clear notification.
    f.hw.readings = Readings::default();
    f.tick(6000);
    assert!(!f.service.alarm_active());
    assert!(!f.hw.siren_on());
    assert_eq!(f.uplink.alerts.len(), 1);
    assert_eq!(f.sink.count_containing("AlarmCleared"), 1);
}

#[test]
fn simultaneous_smoke_and_co_notify_smoke_only() {
    let mut f = fixture();
    f.hw.readings = Readings {
        smoke_ppm: 401,
        co_ppm: 150,
        ..Readings::default()
    };

    f.tick(2000);
    assert_eq!(f.uplink.alerts.len(), 1);
    assert!(f.uplink.alerts[0].contains("Smoke"));
    assert!(f.hw.siren_on());
}

// ── Display pause flags ───────────────────────────────────────

#[test]
fn inbound_toggle_pauses_exactly_one_waveform() {
    let mut f = fixture();
    f.panel.inbound.push_back("p2_s0_toggle");

    f.tick(2000);
    assert!(!f.panel.has_command_starting("add page2.s0"));
    assert!(f.panel.has_command_starting("add page2.s1"));
    // Text fields never pause.
    assert!(f.panel.has_command_starting("page2.temp.txt"));
}

#[test]
fn at_most_one_inbound_command_is_applied_per_tick() {
    let mut f = fixture();
    f.panel.inbound.push_back("p2_s0_toggle");
    f.panel.inbound.push_back("p2_s1_toggle");

    f.tick(2000);
    assert!(!f.panel.has_command_starting("add page2.s0"), "first toggle applied");
    assert!(f.panel.has_command_starting("add page2.s1"), "second toggle still queued");

    f.tick(4000);
    let page2_s1_appends = f
        .panel
        .commands()
        .iter()
        .filter(|c| c.starts_with("add page2.s1"))
        .count();
    assert_eq!(page2_s1_appends, 1, "second tick applied the queued toggle");
}

#[test]
fn unknown_inbound_commands_are_ignored() {
    let mut f = fixture();
    f.panel.inbound.push_back("format_flash");
    f.tick(2000);
    assert!(f.panel.has_command_starting("add page2.s0"));
    assert!(f.panel.has_command_starting("add page2.s1"));
}

// ── Report cadence ────────────────────────────────────────────

#[test]
fn report_fires_on_the_slow_clock_only() {
    let mut f = fixture();
    f.hw.readings = Readings {
        co2_ppm: 415,
        ..Readings::default()
    };

    for t in (0..5000).step_by(500) {
        f.tick(t);
    }
    assert!(f.uplink.reports.is_empty(), "not before the slow interval");

    f.tick(5000);
    assert_eq!(f.uplink.reports.len(), 1);
    assert_eq!(f.uplink.reports[0].co2_ppm, 415);
    assert_eq!(f.sink.count_containing("ReportSubmitted"), 1);
}

#[test]
fn report_is_skipped_while_offline() {
    let mut f = fixture();
    f.uplink.connected = false;

    for t in (0..=20_000).step_by(1000) {
        f.tick(t);
    }
    assert!(f.uplink.reports.is_empty());
    assert_eq!(f.sink.count_containing("ReportFailed"), 0, "offline is a skip, not a failure");
}

#[test]
fn failed_report_is_logged_and_not_retried_early() {
    let mut f = fixture();
    f.uplink.fail_submit = true;

    f.tick(5000);
    assert_eq!(f.sink.count_containing("ReportFailed"), 1);

    // No retry until the next slow tick.
    f.tick(5500);
    f.tick(6000);
    assert_eq!(f.sink.count_containing("ReportFailed"), 1);
    f.tick(10_000);
    assert_eq!(f.sink.count_containing("ReportFailed"), 2);
}

#[test]
fn report_carries_the_latest_snapshot() {
    let mut f = fixture();
    f.hw.readings = Readings {
        smoke_ppm: 77,
        ..Readings::default()
    };
    f.tick(2000);

    f.hw.readings = Readings {
        smoke_ppm: 99,
        ..Readings::default()
    };
    f.tick(4000);
    f.tick(5000);

    assert_eq!(f.uplink.reports.len(), 1);
    assert_eq!(
        f.uplink.reports[0].smoke_ppm, 99,
        "the report hands over the most recent vector, not the first"
    );
}
