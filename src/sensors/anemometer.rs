//! Cup anemometer driver.
//!
//! The rotor closes a reed switch once per revolution; a GPIO ISR
//! increments an atomic counter on each falling edge.  The scheduler's
//! fast tick samples and resets the counter to derive wind speed.
//!
//! The `AtomicU32` + `swap(0)` pair replaces the classic
//! interrupts-off/read/reset/interrupts-on critical section with a
//! lock-free equivalent that preserves the same contract: no pulse is
//! lost or double-counted across the read-and-reset boundary.

use core::sync::atomic::{AtomicU32, Ordering};

/// Rotor characterisation: km/h per pulse over a one-second window,
/// scaled by 100 (8.75 / 100 km/h per pulse).
const KMH_PER_PULSE_X100: f32 = 8.75;

/// Global atomic counter incremented by the GPIO ISR.
/// `static` because ISR callbacks in ESP-IDF cannot capture closures.
static WIND_PULSE_COUNT: AtomicU32 = AtomicU32::new(0);

/// Called from the GPIO ISR on each falling edge.
pub fn pulse_isr_handler() {
    WIND_PULSE_COUNT.fetch_add(1, Ordering::Relaxed);
}

/// Inject rotor pulses (host/test builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_add_pulses(n: u32) {
    WIND_PULSE_COUNT.fetch_add(n, Ordering::Relaxed);
}

/// Result of one aggregation window.
#[derive(Debug, Clone, Copy)]
pub struct WindReading {
    /// Pulses counted since the previous read.
    pub pulse_count: u32,
    /// Wind speed (km/h) over the nominal one-second window.
    pub speed_kmh: f32,
}

/// Anemometer driver.
pub struct Anemometer {
    _gpio: i32,
}

impl Anemometer {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// Atomically sample-and-reset the pulse counter and compute speed.
    ///
    /// Call once per fast-tick window (nominally 1 s); the speed formula
    /// assumes that window.
    pub fn read(&mut self) -> WindReading {
        let count = WIND_PULSE_COUNT.swap(0, Ordering::Relaxed);
        WindReading {
            pulse_count: count,
            speed_kmh: count as f32 * KMH_PER_PULSE_X100 / 100.0,
        }
    }
}
