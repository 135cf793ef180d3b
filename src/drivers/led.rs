//! LED drivers backed by the raw `hw_init` helpers.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: writes the GPIO level / LEDC duty through `hw_init`.
//! On host/test: the `hw_init` stubs accept every write, and the driver
//! still tracks what it last applied.

use log::warn;

use crate::app::ports::{IntensityActuator, LevelActuator};
use crate::drivers::hw_init;
use crate::pins;

/// On/off LED on a plain GPIO output.
pub struct DigitalLed {
    gpio: i32,
    level: bool,
}

impl DigitalLed {
    /// `gpio` must already be configured by [`hw_init::init_gpio_output`].
    pub fn new(gpio: i32) -> Self {
        Self { gpio, level: false }
    }

    pub fn level(&self) -> bool {
        self.level
    }
}

impl LevelActuator for DigitalLed {
    fn set_level(&mut self, high: bool) {
        hw_init::gpio_write(self.gpio, high);
        self.level = high;
    }
}

/// Dimmable LED on one LEDC channel.
pub struct PwmLed {
    channel: u32,
    max: u16,
    duty: u16,
}

impl PwmLed {
    /// `channel` must already be bound by [`hw_init::init_ledc`].
    pub fn new(channel: u32) -> Self {
        Self {
            channel,
            max: pins::PWM_MAX_DUTY,
            duty: 0,
        }
    }

    pub fn duty(&self) -> u16 {
        self.duty
    }
}

impl IntensityActuator for PwmLed {
    fn max_intensity(&self) -> u16 {
        self.max
    }

    fn set_intensity(&mut self, duty: u16) {
        let duty = duty.min(self.max);
        if !hw_init::ledc_set(self.channel, u32::from(duty)) {
            warn!("led: LEDC CH{} rejected duty {}", self.channel, duty);
            return;
        }
        self.duty = duty;
    }
}
