//! DHT22 temperature/humidity sensor driver.
//!
//! Single-wire protocol bit-banged over a GPIO: host pulls the line low
//! for ≥1 ms, the sensor answers with 40 data bits encoded in pulse
//! widths (26–28 µs high = 0, ~70 µs high = 1), checksum = sum of the
//! four data bytes.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: bit-bangs the wire with raw GPIO reads and µs timing.
//! On host/test: reads injected values from static atomics.
//!
//! A failed or non-finite reading degrades to 0.0 with a warning — the
//! sampling pipeline never faults on a flaky climate sensor.

use core::sync::atomic::AtomicU32;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

use log::warn;

use crate::error::SensorError;

static SIM_TEMPERATURE_BITS: AtomicU32 = AtomicU32::new(0);
static SIM_HUMIDITY_BITS: AtomicU32 = AtomicU32::new(0);

/// Inject a climate reading (host/test builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_climate(temperature_c: f32, humidity_pct: f32) {
    SIM_TEMPERATURE_BITS.store(temperature_c.to_bits(), Ordering::Relaxed);
    SIM_HUMIDITY_BITS.store(humidity_pct.to_bits(), Ordering::Relaxed);
}

#[derive(Debug, Clone, Copy)]
pub struct ClimateReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

pub struct ClimateSensor {
    _gpio: i32,
}

impl ClimateSensor {
    pub fn new(gpio: i32) -> Self {
        Self { _gpio: gpio }
    }

    /// Read temperature and humidity.  Degrades to zeros on failure.
    pub fn read(&mut self) -> ClimateReading {
        match self.read_raw() {
            Ok((t, h)) if t.is_finite() && h.is_finite() => ClimateReading {
                temperature_c: t,
                humidity_pct: h,
            },
            Ok(_) => {
                warn!("climate: non-finite reading, degrading to zero");
                ClimateReading {
                    temperature_c: 0.0,
                    humidity_pct: 0.0,
                }
            }
            Err(e) => {
                warn!("climate: read failed ({e}), degrading to zero");
                ClimateReading {
                    temperature_c: 0.0,
                    humidity_pct: 0.0,
                }
            }
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_raw(&mut self) -> Result<(f32, f32), SensorError> {
        Ok((
            f32::from_bits(SIM_TEMPERATURE_BITS.load(Ordering::Relaxed)),
            f32::from_bits(SIM_HUMIDITY_BITS.load(Ordering::Relaxed)),
        ))
    }

    #[cfg(target_os = "espidf")]
    fn read_raw(&mut self) -> Result<(f32, f32), SensorError> {
        let raw = self.read_wire()?;
        let humidity = f32::from(u16::from(raw[0]) << 8 | u16::from(raw[1])) / 10.0;
        let mag = f32::from(u16::from(raw[2] & 0x7F) << 8 | u16::from(raw[3])) / 10.0;
        let temperature = if raw[2] & 0x80 != 0 { -mag } else { mag };
        Ok((temperature, humidity))
    }

    /// Clock the 40-bit frame off the wire.  Timing-critical; runs with
    /// interrupts left enabled, so an ISR landing mid-frame surfaces as a
    /// checksum error and the reading is retried on the next tick.
    #[cfg(target_os = "espidf")]
    fn read_wire(&mut self) -> Result<[u8; 4], SensorError> {
        use esp_idf_svc::sys::{
            esp_rom_delay_us, gpio_get_level, gpio_mode_t_GPIO_MODE_INPUT,
            gpio_mode_t_GPIO_MODE_OUTPUT_OD, gpio_set_direction, gpio_set_level,
        };

        let pin = self._gpio;

        // Host start signal: pull low ≥1 ms, release, wait for the sensor
        // to take over the line.
        // SAFETY: pin was configured by hw_init; single-threaded main-loop
        // access only.
        unsafe {
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_OUTPUT_OD);
            gpio_set_level(pin, 0);
            esp_rom_delay_us(1200);
            gpio_set_level(pin, 1);
            gpio_set_direction(pin, gpio_mode_t_GPIO_MODE_INPUT);
        }

        let wait_level = |level: i32, timeout_us: u32| -> Result<(), SensorError> {
            for _ in 0..timeout_us {
                // SAFETY: read-only register access on a configured input.
                if unsafe { gpio_get_level(pin) } == level {
                    return Ok(());
                }
                unsafe { esp_rom_delay_us(1) };
            }
            Err(SensorError::ReadTimeout)
        };

        // Sensor response: ~80 µs low, ~80 µs high.
        wait_level(0, 100)?;
        wait_level(1, 100)?;
        wait_level(0, 100)?;

        let mut bits = [0u8; 5];
        for i in 0..40 {
            // Each bit: ~50 µs low, then a high whose width encodes the bit.
            wait_level(1, 80)?;
            let mut high_us = 0u32;
            // SAFETY: as above — polling a configured input pin.
            while unsafe { gpio_get_level(pin) } == 1 {
                high_us += 1;
                if high_us > 100 {
                    return Err(SensorError::ReadTimeout);
                }
                unsafe { esp_rom_delay_us(1) };
            }
            if high_us > 40 {
                bits[i / 8] |= 1 << (7 - (i % 8));
            }
        }

        let sum = bits[0]
            .wrapping_add(bits[1])
            .wrapping_add(bits[2])
            .wrapping_add(bits[3]);
        if sum != bits[4] {
            return Err(SensorError::OutOfRange);
        }
        Ok([bits[0], bits[1], bits[2], bits[3]])
    }
}
