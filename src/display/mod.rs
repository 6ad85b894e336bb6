//! Display panel synchronisation.
//!
//! [`PanelLink`] turns the current [`Readings`] snapshot into the panel's
//! command protocol, page by page.  It owns the per-widget pause flags
//! toggled by inbound panel commands and consults them to decide whether
//! a waveform-append goes out this tick — text and gauge fields never
//! pause.
//!
//! The panel is write-mostly: the only inbound traffic is single-line
//! toggle commands, parsed by [`PanelLink::handle_command`].  Anything
//! unrecognised is silently ignored.

pub mod codec;
pub mod scale;

use core::fmt::Write as _;

use log::{debug, warn};

use crate::app::ports::{LocalTime, PanelSink};
use crate::error::DisplayError;
use crate::readings::{Readings, AQI_MAX};
use codec::Frame;
use scale::{map_range, waveform_sample, waveform_sample_log};

/// Shown in the time/date fields while the wall clock is unsynchronised.
const TIME_PLACEHOLDER: &str = "--:--";
const DATE_PLACEHOLDER: &str = "----------";

/// Log-scaled waveforms span this source range (ppm).
const LOG_WAVE_MIN: f32 = 100.0;
const LOG_WAVE_MAX: f32 = 10_000.0;

// ───────────────────────────────────────────────────────────────
//  Pause flags
// ───────────────────────────────────────────────────────────────

/// One independent pause flag per waveform widget.  Toggled from the
/// panel; consulted read-only during refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PauseFlags {
    pub p2_s0: bool,
    pub p2_s1: bool,
    pub p3_s0: bool,
    pub p4_s0: bool,
    pub p5_s0: bool,
    pub p7_s0: bool,
    pub p8_s0: bool,
    pub p8_s1: bool,
    pub p10_s0: bool,
}

impl PauseFlags {
    /// Apply a toggle command.  Returns `false` for anything that is not
    /// exactly a documented command.
    pub fn apply(&mut self, command: &str) -> bool {
        let flag = match command {
            "p2_s0_toggle" => &mut self.p2_s0,
            "p2_s1_toggle" => &mut self.p2_s1,
            "p3_toggle" => &mut self.p3_s0,
            "p4_toggle" => &mut self.p4_s0,
            "p5_toggle" => &mut self.p5_s0,
            "p7_toggle" => &mut self.p7_s0,
            "p8_s0_toggle" => &mut self.p8_s0,
            "p8_s1_toggle" => &mut self.p8_s1,
            "p10_toggle" => &mut self.p10_s0,
            _ => return false,
        };
        *flag = !*flag;
        true
    }
}

// ───────────────────────────────────────────────────────────────
//  Panel link
// ───────────────────────────────────────────────────────────────

/// Drives the external display panel.
pub struct PanelLink {
    flags: PauseFlags,
}

impl PanelLink {
    pub fn new() -> Self {
        Self {
            flags: PauseFlags::default(),
        }
    }

    pub fn flags(&self) -> PauseFlags {
        self.flags
    }

    /// Consume one inbound panel line.  Leading/trailing whitespace and
    /// NUL terminators are stripped; unrecognised commands are ignored.
    pub fn handle_command(&mut self, line: &str) -> bool {
        let command = line.trim_matches(|c: char| c == '\0' || c.is_whitespace());
        if command.is_empty() {
            return false;
        }
        if self.flags.apply(command) {
            debug!("panel: toggled '{command}' → {:?}", self.flags);
            true
        } else {
            debug!("panel: ignoring unknown command '{command}'");
            false
        }
    }

    // ── Boot sequence ─────────────────────────────────────────

    /// Switch the panel to a page.
    pub fn show_page(&self, sink: &mut impl PanelSink, index: u8) {
        let mut cmd: heapless::String<16> = heapless::String::new();
        let _ = write!(cmd, "page {index}");
        self.push(sink, codec::raw(&cmd));
    }

    /// Update the boot status line on page 0.
    pub fn boot_status(&self, sink: &mut impl PanelSink, text: &str) {
        self.push(sink, codec::set_text("page0.t_status", text));
    }

    /// Drive the boot loading bar (0–100).
    pub fn loading_progress(&self, sink: &mut impl PanelSink, percent: i32) {
        self.push(sink, codec::set_value("page0.j_loading", percent));
    }

    // ── Per-tick refresh ──────────────────────────────────────

    /// Serialise the snapshot into panel commands, all pages.
    pub fn refresh(&self, r: &Readings, now: Option<LocalTime>, sink: &mut impl PanelSink) {
        self.page1_dashboard(r, now, sink);
        self.page2_climate(r, sink);
        self.page3_mq2(r, sink);
        self.page4_mq3(r, sink);
        self.page5_mq3_zoom(r, sink);
        self.page7_mq7(r, sink);
        self.page8_mq135_charts(r, sink);
        self.page9_mq135_indicators(r, sink);
        self.page10_anemometer(r, sink);
    }

    fn page1_dashboard(&self, r: &Readings, now: Option<LocalTime>, sink: &mut impl PanelSink) {
        self.text_f(sink, "page1.temp", r.temperature_c, 1);
        self.text_f(sink, "page1.hum", r.humidity_pct, 1);
        self.text_f(sink, "page1.wind", r.wind_kmh, 2);
        self.text_int(sink, "page1.smoke", r.smoke_ppm as i64);
        self.text_int(sink, "page1.lpg", r.lpg_ppm as i64);
        self.text_int(sink, "page1.h2", r.h2_ppm as i64);
        self.text_f(sink, "page1.alcohol", r.alcohol_mgl, 2);
        self.text_f(sink, "page1.benzene", r.benzene_mgl, 2);
        self.text_int(sink, "page1.co", r.co_ppm as i64);
        self.text_int(sink, "page1.co2", r.co2_ppm as i64);
        self.text_int(sink, "page1.toluene", r.toluene_ppm as i64);
        self.text_int(sink, "page1.ammonia", r.ammonia_ppm as i64);
        self.text_int(sink, "page1.aqi", i64::from(r.aqi));

        self.value(sink, "page1.j0", map_range(r.temperature_c, -10.0, 60.0, 0.0, 100.0) as i32);
        self.value(sink, "g_lpg", map_range(r.lpg_ppm as f32, 0.0, 1000.0, 0.0, 180.0) as i32);
        self.value(
            sink,
            "g_alcohol",
            map_range(r.alcohol_mgl * 1000.0, 0.0, 1500.0, 0.0, 180.0) as i32,
        );
        self.value(
            sink,
            "g_aqi",
            map_range(f32::from(r.aqi), 0.0, f32::from(AQI_MAX), 0.0, 180.0) as i32,
        );

        // Dashboard CO2 trend has no pause control.
        self.wave(sink, "page1.s0", 0, waveform_sample(r.co2_ppm as f32, 0.0, 1000.0));

        match now {
            Some(t) => {
                let mut s: heapless::String<16> = heapless::String::new();
                let _ = write!(s, "{:02}:{:02}", t.hour, t.minute);
                self.push(sink, codec::set_text("page1.time", &s));
                s.clear();
                let _ = write!(s, "{:04}-{:02}-{:02}", t.year, t.month, t.day);
                self.push(sink, codec::set_text("page1.date", &s));
            }
            None => {
                self.push(sink, codec::set_text("page1.time", TIME_PLACEHOLDER));
                self.push(sink, codec::set_text("page1.date", DATE_PLACEHOLDER));
            }
        }
    }

    fn page2_climate(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_f(sink, "page2.temp", r.temperature_c, 1);
        self.text_f(sink, "page2.hum", r.humidity_pct, 1);
        self.value(sink, "page2.j0", map_range(r.temperature_c, -10.0, 60.0, 0.0, 100.0) as i32);
        self.value(sink, "page2.j1", map_range(r.humidity_pct, 0.0, 100.0, 0.0, 100.0) as i32);
        if !self.flags.p2_s0 {
            self.wave(sink, "page2.s0", 0, waveform_sample(r.temperature_c, -10.0, 60.0));
        }
        if !self.flags.p2_s1 {
            self.wave(sink, "page2.s1", 0, waveform_sample(r.humidity_pct, 0.0, 100.0));
        }
    }

    fn page3_mq2(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_int(sink, "page3.smoke", r.smoke_ppm as i64);
        self.text_int(sink, "page3.lpg", r.lpg_ppm as i64);
        self.text_int(sink, "page3.h2", r.h2_ppm as i64);
        self.value(sink, "g_smoke", map_range(r.smoke_ppm as f32, 0.0, 1000.0, 0.0, 180.0) as i32);
        if !self.flags.p3_s0 {
            self.wave(sink, "page3.s0", 0, self.log_wave(r.smoke_ppm));
            self.wave(sink, "page3.s0", 1, self.log_wave(r.lpg_ppm));
            self.wave(sink, "page3.s0", 2, self.log_wave(r.h2_ppm));
        }
    }

    fn page4_mq3(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_f(sink, "page4.alcohol", r.alcohol_mgl, 2);
        self.text_f(sink, "page4.benzene", r.benzene_mgl, 2);
        self.value(
            sink,
            "g_alcohol_p4",
            map_range(r.alcohol_mgl * 1000.0, 0.0, 1500.0, 0.0, 180.0) as i32,
        );
        if !self.flags.p4_s0 {
            self.wave(sink, "page4.s0", 0, waveform_sample(r.alcohol_mgl, 0.0, 10.0));
            self.wave(sink, "page4.s0", 1, waveform_sample(r.benzene_mgl, 0.0, 10.0));
        }
    }

    /// Same MQ-3 data as page 4, zoomed into the low range.
    fn page5_mq3_zoom(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_f(sink, "page5.alcohol", r.alcohol_mgl, 2);
        self.text_f(sink, "page5.benzene", r.benzene_mgl, 2);
        self.value(
            sink,
            "g_alcohol_p5",
            map_range(r.alcohol_mgl * 1000.0, 0.0, 1500.0, 0.0, 180.0) as i32,
        );
        if !self.flags.p5_s0 {
            self.wave(sink, "page5.s0", 0, waveform_sample(r.alcohol_mgl, 0.0, 4.0));
            self.wave(sink, "page5.s0", 1, waveform_sample(r.benzene_mgl, 0.0, 4.0));
        }
    }

    fn page7_mq7(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_int(sink, "page7.co", r.co_ppm as i64);
        self.text_int(sink, "page7.co2", r.co2_ppm as i64);
        if !self.flags.p7_s0 {
            self.wave(sink, "page7.s0", 0, waveform_sample(r.co_ppm as f32, 0.0, 1000.0));
            self.wave(sink, "page7.s0", 1, waveform_sample(r.co2_ppm as f32, 0.0, 1000.0));
        }
    }

    fn page8_mq135_charts(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_int(sink, "page8.toluene", r.toluene_ppm as i64);
        self.text_int(sink, "page8.ammonia", r.ammonia_ppm as i64);
        self.text_int(sink, "page8.aqi", i64::from(r.aqi));
        if !self.flags.p8_s0 {
            self.wave(sink, "page8.s0", 0, self.log_wave(r.toluene_ppm));
            self.wave(sink, "page8.s0", 1, self.log_wave(r.ammonia_ppm));
        }
        if !self.flags.p8_s1 {
            self.wave(
                sink,
                "page8.s1",
                0,
                waveform_sample(f32::from(r.aqi), 0.0, f32::from(AQI_MAX)),
            );
        }
    }

    fn page9_mq135_indicators(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_int(sink, "page9.toluene", r.toluene_ppm as i64);
        self.text_int(sink, "page9.ammonia", r.ammonia_ppm as i64);
        self.text_int(sink, "page9.aqi", i64::from(r.aqi));
        self.value(sink, "page9.j0", (r.toluene_ppm / 100).min(100) as i32);
        self.value(sink, "page9.j1", (r.ammonia_ppm / 100).min(100) as i32);
        self.value(
            sink,
            "g_aqi_p9",
            map_range(f32::from(r.aqi), 0.0, f32::from(AQI_MAX), 0.0, 180.0) as i32,
        );
    }

    fn page10_anemometer(&self, r: &Readings, sink: &mut impl PanelSink) {
        self.text_f(sink, "page10.wind", r.wind_kmh, 2);
        if !self.flags.p10_s0 {
            self.wave(sink, "page10.s0", 0, waveform_sample(r.wind_kmh, 0.0, 70.0));
        }
    }

    // ── Helpers ───────────────────────────────────────────────

    fn log_wave(&self, ppm: u32) -> u8 {
        waveform_sample_log(ppm as f32, LOG_WAVE_MIN, LOG_WAVE_MAX)
    }

    fn text_f(&self, sink: &mut impl PanelSink, obj: &str, value: f32, decimals: usize) {
        let mut s: heapless::String<16> = heapless::String::new();
        let _ = write!(s, "{:.*}", decimals, value);
        self.push(sink, codec::set_text(obj, &s));
    }

    fn text_int(&self, sink: &mut impl PanelSink, obj: &str, value: i64) {
        let mut s: heapless::String<16> = heapless::String::new();
        let _ = write!(s, "{value}");
        self.push(sink, codec::set_text(obj, &s));
    }

    fn value(&self, sink: &mut impl PanelSink, obj: &str, value: i32) {
        self.push(sink, codec::set_value(obj, value));
    }

    fn wave(&self, sink: &mut impl PanelSink, obj: &str, channel: u8, sample: u8) {
        self.push(sink, codec::waveform_append(obj, channel, sample));
    }

    fn push(&self, sink: &mut impl PanelSink, frame: Result<Frame, DisplayError>) {
        match frame {
            Ok(f) => sink.send(&f),
            // Encoding failure drops the single command, never the refresh.
            Err(e) => warn!("panel: {e}"),
        }
    }
}

impl Default for PanelLink {
    fn default() -> Self {
        Self::new()
    }
}

// ───────────────────────────────────────────────────────────────
//  Tests
// ───────────────────────────────────────────────────────────────
