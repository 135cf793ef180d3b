//! System configuration parameters
//!
//! Cadences, ramp shape and transport settings for the LED firmware.
//! Values can be overridden via NVS; Wi-Fi credentials default to the
//! `WIFI_SSID` / `WIFI_PASS` build environment variables.

use heapless::String;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::app::ports::{ConfigError, ConfigPort};
use crate::state::Mode;

/// What the fader does once the ramp would pass `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RampEnd {
    /// Rest for one idle period, then ramp again from 0.
    Restart,
    /// Stay at `max` until the mode changes.
    Hold,
}

/// PWM fader task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaderConfig {
    /// Quantum between duty steps while ramping (milliseconds).
    pub ramp_period_ms: u32,
    /// Quantum while off, and the rest after a completed ramp (milliseconds).
    pub idle_period_ms: u32,
    /// Duty increment per ramp quantum.
    pub step: u16,
    /// Maximum duty (8-bit LEDC resolution → 255).
    pub max: u16,
    pub end: RampEnd,
}

/// UART status reporter task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReporterConfig {
    pub period_ms: u32,
}

/// Digital level follower task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub period_ms: u32,
    /// Drive the pin LOW for `Mode::On`.
    pub active_low: bool,
}

impl LevelConfig {
    /// Electrical level that represents `mode` on the pin.
    pub const fn level_for(&self, mode: Mode) -> bool {
        mode.is_on() != self.active_low
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PwmConfig {
    pub freq_hz: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UartConfig {
    pub baud: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WifiConfig {
    pub ssid: String<32>,
    pub password: String<64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    pub port: u16,
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    pub fader: FaderConfig,
    pub reporter: ReporterConfig,
    pub level: LevelConfig,
    pub pwm: PwmConfig,
    pub uart: UartConfig,
    pub wifi: WifiConfig,
    pub http: HttpConfig,
}

impl Default for FaderConfig {
    fn default() -> Self {
        Self {
            ramp_period_ms: 20,
            idle_period_ms: 500,
            step: 10,
            max: 255,
            end: RampEnd::Restart,
        }
    }
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            ssid: bounded(option_env!("WIFI_SSID").unwrap_or("")),
            password: bounded(option_env!("WIFI_PASS").unwrap_or("")),
        }
    }
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            fader: FaderConfig::default(),
            reporter: ReporterConfig { period_ms: 2000 },
            level: LevelConfig {
                period_ms: 10,
                active_low: true,
            },
            pwm: PwmConfig { freq_hz: 5000 },
            uart: UartConfig { baud: 115_200 },
            wifi: WifiConfig::default(),
            http: HttpConfig { port: 80 },
        }
    }
}

impl SystemConfig {
    /// Range-check every field.  Called before persisting and after loading.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let f = &self.fader;
        if f.ramp_period_ms == 0 || f.idle_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("fader periods must be non-zero"));
        }
        if f.max == 0 {
            return Err(ConfigError::ValidationFailed("fader max must be non-zero"));
        }
        if f.step == 0 || f.step > f.max {
            return Err(ConfigError::ValidationFailed("fader step must be in 1..=max"));
        }
        if self.reporter.period_ms == 0 || self.level.period_ms == 0 {
            return Err(ConfigError::ValidationFailed("task periods must be non-zero"));
        }
        if f.ramp_period_ms >= self.reporter.period_ms {
            return Err(ConfigError::ValidationFailed(
                "fader ramp must poll faster than the reporter",
            ));
        }
        if self.pwm.freq_hz == 0 || self.uart.baud == 0 {
            return Err(ConfigError::ValidationFailed("pwm/uart rates must be non-zero"));
        }
        Ok(())
    }

    /// Boot-time config: the stored blob if it loads and validates,
    /// otherwise the defaults.  A first boot persists the defaults.
    pub fn load_or_default<P: ConfigPort>(port: &mut P) -> Self {
        match port.load() {
            Ok(cfg) => match cfg.validate() {
                Ok(()) => return cfg,
                Err(e) => warn!("config: stored config rejected ({}), using defaults", e),
            },
            Err(ConfigError::NotFound) => {
                info!("config: no stored config, persisting defaults");
                let cfg = Self::default();
                if let Err(e) = port.save(&cfg) {
                    warn!("config: could not persist defaults: {}", e);
                }
                return cfg;
            }
            Err(e) => warn!("config: load failed ({}), using defaults", e),
        }
        Self::default()
    }
}

/// Copy as much of `s` as fits into a bounded string.
fn bounded<const N: usize>(s: &str) -> String<N> {
    let mut out = String::new();
    for c in s.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}
