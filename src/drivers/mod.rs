//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod hal_adapters;
pub mod hw_init;
pub mod led;
pub mod task_pin;
pub mod uart;
