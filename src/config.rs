//! System configuration parameters
//!
//! All tunable parameters for the AirStation system.  Defaults carry the
//! production values from the deployed hardware characterisation.

use serde::{Deserialize, Serialize};

/// Core station configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StationConfig {
    // --- Alarm thresholds ---
    /// Smoke concentration (ppm) above which the alarm trips.
    pub smoke_alarm_ppm: u32,
    /// Carbon monoxide concentration (ppm) above which the alarm trips.
    pub co_alarm_ppm: u32,
    /// LPG concentration (ppm) above which the alarm trips.
    pub lpg_alarm_ppm: u32,

    // --- Calibration ---
    /// Clean-air samples averaged per channel at boot.
    pub calibration_samples: u16,
    /// Delay between calibration samples (milliseconds).
    pub calibration_delay_ms: u32,

    // --- Timing ---
    /// Wind-speed aggregation interval (milliseconds).
    pub wind_interval_ms: u32,
    /// Sampling + alarm + display refresh interval (milliseconds).
    pub sampling_interval_ms: u32,
    /// Outbound report interval (milliseconds).
    pub report_interval_ms: u32,

    // --- Reporting ---
    /// HTTP timeout for the report upload (milliseconds).
    pub report_timeout_ms: u32,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            // Alarm thresholds
            smoke_alarm_ppm: 400,
            co_alarm_ppm: 100,
            lpg_alarm_ppm: 1000,

            // Calibration: 50 samples, 100 ms apart (~5 s per channel)
            calibration_samples: 50,
            calibration_delay_ms: 100,

            // Timing
            wind_interval_ms: 1000,
            sampling_interval_ms: 2000,
            report_interval_ms: 5000,

            // Reporting
            report_timeout_ms: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_sane() {
        let c = StationConfig::default();
        assert!(c.smoke_alarm_ppm > 0);
        assert!(c.co_alarm_ppm > 0);
        assert!(c.lpg_alarm_ppm > 0);
        assert!(c.calibration_samples > 0);
        assert!(c.wind_interval_ms > 0);
        assert!(c.sampling_interval_ms > 0);
        assert!(c.report_interval_ms > 0);
    }

    #[test]
    fn serde_roundtrip() {
        let c = StationConfig::default();
        let json = serde_json::to_string(&c).unwrap();
        let c2: StationConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(c.smoke_alarm_ppm, c2.smoke_alarm_ppm);
        assert_eq!(c.calibration_samples, c2.calibration_samples);
        assert_eq!(c.report_interval_ms, c2.report_interval_ms);
    }

    #[test]
    fn timing_ratios_make_sense() {
        let c = StationConfig::default();
        assert!(
            c.wind_interval_ms < c.sampling_interval_ms,
            "wind aggregation should run faster than the sampling pipeline"
        );
        assert!(
            c.sampling_interval_ms < c.report_interval_ms,
            "sampling should run faster than outbound reporting"
        );
    }
}
