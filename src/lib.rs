//! LED toggle firmware library.
//!
//! A button ISR and an HTTP route flip one shared LED mode; three
//! periodic Consumer Tasks (PWM fader, UART reporter, GPIO level follower)
//! poll it independently.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module, so everything here
//! also builds and tests on the host.

#![deny(unused_must_use)]

pub mod adapters;
pub mod app;
pub mod config;
pub mod drivers;
pub mod error;
pub mod pins;
pub mod runtime;
pub mod state;
pub mod time_driver;

pub use error::{Error, Result};
