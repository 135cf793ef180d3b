//! `embedded-hal` 1.0 adapters for the actuator ports.
//!
//! Lets any board-support pin or PWM channel (esp-idf-hal `PinDriver`,
//! `LedcDriver`, a test double, ...) stand in for the raw `hw_init`
//! drivers.  HAL errors are logged and otherwise ignored: a failed write
//! is healed by the next quantum.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::pwm::SetDutyCycle;
use log::warn;

use crate::app::ports::{IntensityActuator, LevelActuator};

pub struct HalLevel<P> {
    pin: P,
}

impl<P: OutputPin> HalLevel<P> {
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P: OutputPin> LevelActuator for HalLevel<P> {
    fn set_level(&mut self, high: bool) {
        if let Err(e) = self.pin.set_state(PinState::from(high)) {
            warn!("hal: set_state failed: {:?}", e);
        }
    }
}

pub struct HalIntensity<P> {
    pwm: P,
}

impl<P: SetDutyCycle> HalIntensity<P> {
    pub fn new(pwm: P) -> Self {
        Self { pwm }
    }

    pub fn into_inner(self) -> P {
        self.pwm
    }
}

impl<P: SetDutyCycle> IntensityActuator for HalIntensity<P> {
    fn max_intensity(&self) -> u16 {
        self.pwm.max_duty_cycle()
    }

    fn set_intensity(&mut self, duty: u16) {
        let duty = duty.min(self.pwm.max_duty_cycle());
        if let Err(e) = self.pwm.set_duty_cycle(duty) {
            warn!("hal: set_duty_cycle failed: {:?}", e);
        }
    }
}
