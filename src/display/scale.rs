//! Widget value rescaling.
//!
//! Two strategies, chosen per widget:
//!
//! - [`map_range`] — proportional rescale for gauges, progress bars and
//!   linear waveforms.  Unclamped (callers clamp waveform samples to the
//!   panel's 0..=255 byte range themselves, matching the widget).
//! - [`map_log`] — log10 rescale for waveform channels whose readings
//!   span several orders of magnitude (smoke, LPG, H2, toluene,
//!   ammonia).  Pinned to the endpoints outside `(in_min, in_max)`, so
//!   it is total even for zero readings.

/// Proportional rescale of `value` from `in_min..in_max` to
/// `out_min..out_max`.
pub fn map_range(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    (value - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

/// Logarithmic rescale.  Returns `out_min` for `value <= in_min` and
/// `out_max` for `value >= in_max`; in between, interpolates linearly in
/// log10 space.  Monotonic non-decreasing across the whole input range.
pub fn map_log(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if value <= in_min {
        return out_min;
    }
    if value >= in_max {
        return out_max;
    }
    let log_in_min = in_min.log10();
    let log_in_max = in_max.log10();
    out_min + (out_max - out_min) * (value.log10() - log_in_min) / (log_in_max - log_in_min)
}

/// Rescale and clamp to a panel waveform sample byte.
pub fn waveform_sample(value: f32, in_min: f32, in_max: f32) -> u8 {
    map_range(value, in_min, in_max, 0.0, 255.0).clamp(0.0, 255.0) as u8
}

/// Log-rescale to a panel waveform sample byte.
pub fn waveform_sample_log(value: f32, in_min: f32, in_max: f32) -> u8 {
    map_log(value, in_min, in_max, 0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_range_endpoints() {
        assert_eq!(map_range(-10.0, -10.0, 60.0, 0.0, 100.0), 0.0);
        assert_eq!(map_range(60.0, -10.0, 60.0, 0.0, 100.0), 100.0);
        assert!((map_range(25.0, -10.0, 60.0, 0.0, 100.0) - 50.0).abs() < 1e-4);
    }

    #[test]
    fn map_range_extrapolates_beyond_the_source_range() {
        // Gauge widgets tolerate over-rotation; only waveform bytes clamp.
        assert!(map_range(2000.0, 0.0, 1000.0, 0.0, 180.0) > 180.0);
    }

    #[test]
    fn map_log_pins_the_endpoints() {
        assert_eq!(map_log(0.0, 100.0, 10_000.0, 0.0, 255.0), 0.0);
        assert_eq!(map_log(100.0, 100.0, 10_000.0, 0.0, 255.0), 0.0);
        assert_eq!(map_log(10_000.0, 100.0, 10_000.0, 0.0, 255.0), 255.0);
        assert_eq!(map_log(99_999.0, 100.0, 10_000.0, 0.0, 255.0), 255.0);
    }

    #[test]
    fn map_log_midpoint_is_the_geometric_mean() {
        // 1000 is the log-midpoint of (100, 10000) → half of the output span.
        let mid = map_log(1000.0, 100.0, 10_000.0, 0.0, 255.0);
        assert!((mid - 127.5).abs() < 0.01, "mid = {mid}");
    }

    #[test]
    fn waveform_sample_clamps_to_byte_range() {
        assert_eq!(waveform_sample(-40.0, 0.0, 70.0), 0);
        assert_eq!(waveform_sample(1_000.0, 0.0, 70.0), 255);
    }
}
