//! ESP32 time adapter.
//!
//! Implements [`ClockPort`]: a monotonic millisecond uptime for the
//! scheduler and broken-down local time for panel/report timestamping.
//!
//! - **`target_os = "espidf"`** — uptime wraps `esp_timer_get_time()`;
//!   local time comes from `gettimeofday` + `localtime_r`, valid only
//!   once SNTP has synchronised the clock.
//! - **all other targets** — `std::time::Instant` uptime, no wall clock.

use crate::app::ports::{ClockPort, LocalTime};

/// Time adapter for the ESP32 platform.
pub struct Esp32TimeAdapter {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    #[cfg(target_os = "espidf")]
    fn platform_uptime_ms(&self) -> u32 {
        ((unsafe { esp_idf_svc::sys::esp_timer_get_time() }) / 1000) as u32
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_uptime_ms(&self) -> u32 {
        self.start.elapsed().as_millis() as u32
    }

    #[cfg(target_os = "espidf")]
    fn platform_local_time(&self) -> Option<LocalTime> {
        use core::ptr;

        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        // SAFETY: plain libc-style call writing into a stack struct.
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Reject obviously unsynced time (e.g. before 2020-01-01).
        const EPOCH_2020: i64 = 1_577_836_800;
        if i64::from(tv.tv_sec) < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        // SAFETY: localtime_r writes into the zeroed tm; null on failure.
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        Some(LocalTime {
            year: (tm.tm_year + 1900).clamp(0, i32::from(u16::MAX)) as u16,
            month: (tm.tm_mon + 1) as u8,
            day: tm.tm_mday as u8,
            hour: tm.tm_hour as u8,
            minute: tm.tm_min as u8,
            second: tm.tm_sec as u8,
        })
    }

    /// On non-ESP targets (simulation) the wall clock is never synced.
    #[cfg(not(target_os = "espidf"))]
    fn platform_local_time(&self) -> Option<LocalTime> {
        None
    }
}

impl ClockPort for Esp32TimeAdapter {
    fn uptime_ms(&self) -> u32 {
        self.platform_uptime_ms()
    }

    fn local_time(&self) -> Option<LocalTime> {
        self.platform_local_time()
    }
}
