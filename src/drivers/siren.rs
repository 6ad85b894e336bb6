//! Siren actuator driver.
//!
//! A single binary output line through a relay: HIGH = alarm active,
//! LOW = inactive.  The alarm monitor re-asserts the level on every
//! evaluation tick, not only on edges.
//!
//! Generic over [`embedded_hal::digital::OutputPin`]: on ESP-IDF this is
//! an `esp_idf_hal` `PinDriver`, on the host the in-memory [`SimPin`].

use embedded_hal::digital::OutputPin;
use log::warn;

use crate::app::ports::SirenPort;

pub struct SirenDriver<P: OutputPin> {
    pin: P,
    active: bool,
}

impl<P: OutputPin> SirenDriver<P> {
    /// Takes ownership of the output pin and drives it LOW.
    pub fn new(mut pin: P) -> Self {
        if pin.set_low().is_err() {
            warn!("siren: initial GPIO write failed");
        }
        Self { pin, active: false }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl<P: OutputPin> SirenPort for SirenDriver<P> {
    fn set_siren(&mut self, active: bool) {
        let res = if active {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        if res.is_err() {
            warn!("siren: GPIO write failed");
        }
        self.active = active;
    }
}

/// Host-side stand-in for the siren GPIO.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default)]
pub struct SimPin {
    pub level: bool,
}

#[cfg(not(target_os = "espidf"))]
impl embedded_hal::digital::ErrorType for SimPin {
    type Error = core::convert::Infallible;
}

#[cfg(not(target_os = "espidf"))]
impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.level = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.level = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_follows_the_commanded_state() {
        let mut siren = SirenDriver::new(SimPin::default());
        assert!(!siren.is_active());

        siren.set_siren(true);
        assert!(siren.is_active());
        siren.set_siren(true);
        assert!(siren.is_active(), "re-assertion is idempotent");
        siren.set_siren(false);
        assert!(!siren.is_active());
    }
}
