//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`] and the siren driver, exposing them through
//! [`SensorPort`] and [`SirenPort`].  This is the only module in the
//! system that touches actual sensing/actuation hardware.  On
//! non-espidf targets, the underlying drivers use cfg-gated simulation
//! stubs.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{SensorPort, SirenPort};
use crate::drivers::siren::SirenDriver;
use crate::readings::Readings;
use crate::sensors::gas::GasChannelId;
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct StationHardware<P: OutputPin> {
    sensors: SensorHub,
    siren: SirenDriver<P>,
}

impl<P: OutputPin> StationHardware<P> {
    pub fn new(sensors: SensorHub, siren: SirenDriver<P>) -> Self {
        Self { sensors, siren }
    }

    pub fn siren_active(&self) -> bool {
        self.siren.is_active()
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl<P: OutputPin> SensorPort for StationHardware<P> {
    fn read_all(&mut self) -> Readings {
        self.sensors.read_all()
    }

    fn wind_tick(&mut self) -> f32 {
        self.sensors.wind_tick()
    }

    fn calibrate(&mut self, samples: u16, delay_ms: u32) {
        self.sensors.calibrate(samples, delay_ms);
    }

    fn baselines(&self) -> [f32; GasChannelId::COUNT] {
        self.sensors.baselines()
    }
}

// ── SirenPort implementation ──────────────────────────────────

impl<P: OutputPin> SirenPort for StationHardware<P> {
    fn set_siren(&mut self, active: bool) {
        self.siren.set_siren(active);
    }
}
