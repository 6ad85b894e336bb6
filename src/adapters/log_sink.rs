//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the logger (UART / USB-CDC in production).  A future MQTT or BLE
//! adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Readings(r) => {
                info!(
                    "READ  | T={:.1}\u{00b0}C RH={:.1}% wind={:.2}km/h | \
                     smoke={} LPG={} H2={} CO={} CO2={} | \
                     tol={} NH3={} | AQI={}",
                    r.temperature_c,
                    r.humidity_pct,
                    r.wind_kmh,
                    r.smoke_ppm,
                    r.lpg_ppm,
                    r.h2_ppm,
                    r.co_ppm,
                    r.co2_ppm,
                    r.toluene_ppm,
                    r.ammonia_ppm,
                    r.aqi,
                );
            }
            AppEvent::CalibrationStarted => {
                info!("CALIB | started (station blocked until baselines exist)");
            }
            AppEvent::CalibrationCompleted { baselines } => {
                info!(
                    "CALIB | done: MQ2={:.2} MQ3={:.2} MQ7={:.2} MQ135={:.2} k\u{03a9}",
                    baselines[0], baselines[1], baselines[2], baselines[3],
                );
            }
            AppEvent::AlarmRaised { cause, level } => {
                warn!("ALARM | raised: {cause} at {level} ppm");
            }
            AppEvent::AlarmCleared => {
                info!("ALARM | cleared");
            }
            AppEvent::ReportSubmitted => {
                info!("UPLNK | report submitted");
            }
            AppEvent::ReportFailed(e) => {
                warn!("UPLNK | report failed: {e}");
            }
        }
    }
}
