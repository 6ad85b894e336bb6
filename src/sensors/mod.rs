//! Sensor subsystem — individual drivers and the aggregating [`SensorHub`].
//!
//! The hub owns every sensor driver, runs the one-shot boot calibration,
//! and produces a fresh [`Readings`] snapshot each sampling tick.

pub mod anemometer;
pub mod climate;
pub mod gas;

use log::info;

use crate::pins;
use crate::readings::{composite_index, Readings};
use anemometer::Anemometer;
use climate::ClimateSensor;
use gas::{Gas, GasChannel, GasChannelId};

/// Aggregates all sensor drivers and produces a unified snapshot.
pub struct SensorHub {
    mq2: GasChannel,
    mq3: GasChannel,
    mq7: GasChannel,
    mq135: GasChannel,
    climate: ClimateSensor,
    anemometer: Anemometer,
    /// Wind speed from the most recent aggregation window, carried into
    /// every snapshot until the next window closes.
    last_wind_kmh: f32,
}

impl SensorHub {
    pub fn new() -> Self {
        Self {
            mq2: GasChannel::new(GasChannelId::Mq2),
            mq3: GasChannel::new(GasChannelId::Mq3),
            mq7: GasChannel::new(GasChannelId::Mq7),
            mq135: GasChannel::new(GasChannelId::Mq135),
            climate: ClimateSensor::new(pins::DHT_GPIO),
            anemometer: Anemometer::new(pins::ANEMOMETER_GPIO),
            last_wind_kmh: 0.0,
        }
    }

    /// Establish the clean-air baseline of every gas channel.
    ///
    /// Blocking — with production parameters (50 samples, 100 ms apart)
    /// this holds startup for ~5 s per channel.  The station is not
    /// usable until baselines exist.
    pub fn calibrate(&mut self, samples: u16, delay_ms: u32) {
        for channel in [&mut self.mq2, &mut self.mq3, &mut self.mq7, &mut self.mq135] {
            let id = channel.id();
            let r0 = channel.calibrate(samples, delay_ms);
            info!("calibration: {:?} R0 = {:.2} kΩ", id, r0);
        }
    }

    /// Clean-air baselines in channel order (0.0 = uncalibrated).
    pub fn baselines(&self) -> [f32; GasChannelId::COUNT] {
        [
            self.mq2.r0_kohm(),
            self.mq3.r0_kohm(),
            self.mq7.r0_kohm(),
            self.mq135.r0_kohm(),
        ]
    }

    /// Close the current anemometer window and cache the wind speed.
    pub fn wind_tick(&mut self) -> f32 {
        let wind = self.anemometer.read();
        self.last_wind_kmh = wind.speed_kmh;
        self.last_wind_kmh
    }

    /// Read every sensor and assemble a fresh snapshot.
    ///
    /// Gas curves sharing a physical channel each re-sample the ADC —
    /// see the note in [`gas`].  ppm estimates are truncated to integers;
    /// the MQ-3 mg/L estimates stay fractional.
    pub fn read_all(&mut self) -> Readings {
        let climate = self.climate.read();

        let lpg_ppm = self.mq2.read_gas(Gas::Lpg) as u32;
        let smoke_ppm = self.mq2.read_gas(Gas::Smoke) as u32;
        let h2_ppm = self.mq2.read_gas(Gas::Hydrogen) as u32;
        let alcohol_mgl = self.mq3.read_gas(Gas::Alcohol);
        let benzene_mgl = self.mq3.read_gas(Gas::Benzene);
        let co_ppm = self.mq7.read_gas(Gas::CarbonMonoxide) as u32;
        let toluene_ppm = self.mq135.read_gas(Gas::Toluene) as u32;
        let ammonia_ppm = self.mq135.read_gas(Gas::Ammonia) as u32;
        let co2_ppm = self.mq135.read_gas(Gas::CarbonDioxide) as u32;

        Readings {
            temperature_c: climate.temperature_c,
            humidity_pct: climate.humidity_pct,
            wind_kmh: self.last_wind_kmh,
            lpg_ppm,
            smoke_ppm,
            h2_ppm,
            alcohol_mgl,
            benzene_mgl,
            co_ppm,
            toluene_ppm,
            ammonia_ppm,
            co2_ppm,
            aqi: composite_index(smoke_ppm, co_ppm, toluene_ppm, ammonia_ppm),
        }
    }
}

impl Default for SensorHub {
    fn default() -> Self {
        Self::new()
    }
}
