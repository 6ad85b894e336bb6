//! MQ-series gas sensor bank.
//!
//! Each physical channel (MQ-2/3/7/135) is an analog voltage read through
//! an ESP32 ADC1 pin and a known load resistor.  Concentrations come from
//! per-gas power-law curves over the resistance ratio Rs/R0, where R0 is
//! the clean-air baseline established once at boot.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: reads from per-channel static `AtomicU16`s for injection.
//!
//! One physical channel can serve several gas curves (MQ-2 yields LPG,
//! smoke and H2).  Every `read_gas` call re-samples the ADC, so curves
//! sharing a channel may see different instantaneous samples within one
//! sampling tick.  Flagged for product review; kept because the deployed
//! characterisation was done against this exact behaviour.

use core::sync::atomic::AtomicU16;
#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::Ordering;

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::pins;

/// ADC supply rail (volts).
pub const SUPPLY_VOLTS: f32 = 3.3;
/// 12-bit ADC full-scale code.
pub const ADC_MAX_CODE: f32 = 4095.0;

static SIM_GAS_ADC: [AtomicU16; GasChannelId::COUNT] = [
    AtomicU16::new(0),
    AtomicU16::new(0),
    AtomicU16::new(0),
    AtomicU16::new(0),
];

/// Inject a raw ADC code for a channel (host/test builds only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_gas_adc(channel: GasChannelId, raw: u16) {
    SIM_GAS_ADC[channel.index()].store(raw, Ordering::Relaxed);
}

// ───────────────────────────────────────────────────────────────
//  Channels
// ───────────────────────────────────────────────────────────────

/// The four physical MQ sensors on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GasChannelId {
    Mq2,
    Mq3,
    Mq7,
    Mq135,
}

impl GasChannelId {
    pub const COUNT: usize = 4;

    pub const ALL: [Self; Self::COUNT] = [Self::Mq2, Self::Mq3, Self::Mq7, Self::Mq135];

    pub const fn index(self) -> usize {
        match self {
            Self::Mq2 => 0,
            Self::Mq3 => 1,
            Self::Mq7 => 2,
            Self::Mq135 => 3,
        }
    }

    /// Load resistance of the channel's voltage divider (kΩ).
    pub const fn load_kohm(self) -> f32 {
        match self {
            Self::Mq2 => 5.0,
            Self::Mq3 => 200.0,
            Self::Mq7 => 10.0,
            Self::Mq135 => 20.0,
        }
    }

    /// ADC1 oneshot channel for this sensor.
    pub const fn adc_channel(self) -> u32 {
        match self {
            Self::Mq2 => pins::ADC1_CH_MQ2,
            Self::Mq3 => pins::ADC1_CH_MQ3,
            Self::Mq7 => pins::ADC1_CH_MQ7,
            Self::Mq135 => pins::ADC1_CH_MQ135,
        }
    }
}

// ───────────────────────────────────────────────────────────────
//  Gas curves
// ───────────────────────────────────────────────────────────────

/// Power-law calibration pair: concentration = `a * (Rs/R0)^b`.
/// Constants come from the datasheet curves of the deployed sensors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GasCurve {
    pub a: f32,
    pub b: f32,
}

/// Every gas the station estimates, each bound to one physical channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gas {
    Lpg,
    Smoke,
    Hydrogen,
    Alcohol,
    Benzene,
    CarbonMonoxide,
    Toluene,
    Ammonia,
    CarbonDioxide,
}

impl Gas {
    pub const fn curve(self) -> GasCurve {
        match self {
            Self::Lpg => GasCurve { a: 574.25, b: -2.222 },
            Self::Smoke => GasCurve { a: 305.33, b: -3.401 },
            Self::Hydrogen => GasCurve { a: 98.866, b: -2.732 },
            Self::Alcohol => GasCurve { a: 0.4, b: -1.5 },
            Self::Benzene => GasCurve { a: 0.2, b: -1.4 },
            Self::CarbonMonoxide => GasCurve { a: 99.042, b: -1.518 },
            Self::Toluene => GasCurve { a: 4.83, b: -2.62 },
            Self::Ammonia => GasCurve { a: 102.2, b: -2.473 },
            Self::CarbonDioxide => GasCurve { a: 116.602, b: -2.769 },
        }
    }

    pub const fn channel(self) -> GasChannelId {
        match self {
            Self::Lpg | Self::Smoke | Self::Hydrogen => GasChannelId::Mq2,
            Self::Alcohol | Self::Benzene => GasChannelId::Mq3,
            Self::CarbonMonoxide => GasChannelId::Mq7,
            Self::Toluene | Self::Ammonia | Self::CarbonDioxide => GasChannelId::Mq135,
        }
    }
}

// ───────────────────────────────────────────────────────────────
//  Resistance model
// ───────────────────────────────────────────────────────────────

/// Infer the sensor resistance (kΩ) from a raw ADC code and the channel's
/// load resistor.  A zero measured voltage means an open or disconnected
/// sensor and yields 0.0 — never a division fault.
pub fn resistance_from_adc(raw: u16, load_kohm: f32) -> f32 {
    let volts = f32::from(raw) * (SUPPLY_VOLTS / ADC_MAX_CODE);
    if volts == 0.0 {
        return 0.0;
    }
    load_kohm * (SUPPLY_VOLTS - volts) / volts
}

/// Evaluate a power-law curve over the resistance ratio.  Degenerate
/// inputs (Rs ≤ 0, uncalibrated R0 ≤ 0, ratio ≤ 0) yield 0.0 — "no
/// reading" is always representable and never NaN or negative.
pub fn concentration(curve: GasCurve, rs_kohm: f32, r0_kohm: f32) -> f32 {
    if rs_kohm <= 0.0 || r0_kohm <= 0.0 {
        return 0.0;
    }
    let ratio = rs_kohm / r0_kohm;
    if ratio <= 0.0 {
        return 0.0;
    }
    curve.a * ratio.powf(curve.b)
}

// ───────────────────────────────────────────────────────────────
//  Channel driver
// ───────────────────────────────────────────────────────────────

/// One physical MQ channel: ADC sampling plus the clean-air baseline.
///
/// `r0` stays 0.0 (uncalibrated) until [`calibrate`](Self::calibrate)
/// runs; every concentration read before that returns 0.
pub struct GasChannel {
    id: GasChannelId,
    load_kohm: f32,
    r0_kohm: f32,
}

impl GasChannel {
    pub fn new(id: GasChannelId) -> Self {
        Self {
            id,
            load_kohm: id.load_kohm(),
            r0_kohm: 0.0,
        }
    }

    pub fn id(&self) -> GasChannelId {
        self.id
    }

    /// Clean-air baseline (kΩ); 0.0 before calibration.
    pub fn r0_kohm(&self) -> f32 {
        self.r0_kohm
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> u16 {
        hw_init::adc1_read(self.id.adc_channel())
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> u16 {
        SIM_GAS_ADC[self.id.index()].load(Ordering::Relaxed)
    }

    /// Sample the ADC once and infer the sensor resistance (kΩ).
    pub fn read_resistance(&self) -> f32 {
        resistance_from_adc(self.read_adc(), self.load_kohm)
    }

    /// Establish the clean-air baseline: `samples` resistance reads,
    /// `delay_ms` apart, arithmetic-meaned into `r0`.
    ///
    /// Blocking.  Runs exactly once during startup — the station assumes
    /// clean air at power-up and has no recalibration path afterwards.
    pub fn calibrate(&mut self, samples: u16, delay_ms: u32) -> f32 {
        let samples = samples.max(1);
        let mut sum = 0.0f32;
        for _ in 0..samples {
            sum += self.read_resistance();
            if delay_ms > 0 {
                std::thread::sleep(std::time::Duration::from_millis(u64::from(delay_ms)));
            }
        }
        self.r0_kohm = sum / f32::from(samples);
        self.r0_kohm
    }

    /// Estimate one gas concentration.  Re-samples the ADC on every call,
    /// including for curves that share this channel.
    pub fn read_gas(&self, gas: Gas) -> f32 {
        debug_assert_eq!(gas.channel(), self.id);
        concentration(gas.curve(), self.read_resistance(), self.r0_kohm)
    }
}

// ───────────────────────────────────────────────────────────────
//  Tests
// ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_adc_sample_gives_zero_resistance() {
        assert_eq!(resistance_from_adc(0, 5.0), 0.0);
    }

    #[test]
    fn midscale_sample_matches_divider_equation() {
        // Half-scale ADC → measured voltage = supply/2 → Rs == load.
        let half = (ADC_MAX_CODE / 2.0) as u16;
        let rs = resistance_from_adc(half, 10.0);
        assert!((rs - 10.0).abs() < 0.02, "rs = {rs}");
    }

    #[test]
    fn uncalibrated_channel_reads_zero() {
        assert_eq!(concentration(Gas::Smoke.curve(), 4.2, 0.0), 0.0);
    }

    #[test]
    fn degenerate_resistance_reads_zero() {
        assert_eq!(concentration(Gas::Smoke.curve(), 0.0, 9.5), 0.0);
        assert_eq!(concentration(Gas::Smoke.curve(), -1.0, 9.5), 0.0);
    }

    #[test]
    fn clean_air_ratio_of_one_returns_curve_a() {
        let c = concentration(Gas::Lpg.curve(), 7.5, 7.5);
        assert!((c - 574.25).abs() < 0.01);
    }

    #[test]
    fn concentration_rises_as_resistance_drops() {
        // MQ curves have negative exponents: lower Rs/R0 → higher ppm.
        let clean = concentration(Gas::CarbonMonoxide.curve(), 10.0, 10.0);
        let dirty = concentration(Gas::CarbonMonoxide.curve(), 2.0, 10.0);
        assert!(dirty > clean);
    }

    #[test]
    fn every_gas_maps_to_a_board_channel() {
        for gas in [
            Gas::Lpg,
            Gas::Smoke,
            Gas::Hydrogen,
            Gas::Alcohol,
            Gas::Benzene,
            Gas::CarbonMonoxide,
            Gas::Toluene,
            Gas::Ammonia,
            Gas::CarbonDioxide,
        ] {
            assert!(GasChannelId::ALL.contains(&gas.channel()));
            let curve = gas.curve();
            assert!(curve.a > 0.0);
            assert!(curve.b < 0.0, "MQ curves decay with the ratio");
        }
    }
}
