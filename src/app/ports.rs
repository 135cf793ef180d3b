//! Port traits — the boundary between the coordination core and the outside world.
//!
//! ```text
//!   Actuator adapter ◀── Port trait ◀── Consumer Task (core)
//! ```
//!
//! Consumer Tasks own one port each and command it once per quantum.
//! Adapters (ESP-IDF GPIO/LEDC/UART, embedded-hal pins, test mocks)
//! implement these traits; the core never sees driver internals.

use core::time::Duration;

use crate::config::SystemConfig;

// ───────────────────────────────────────────────────────────────
// Actuator ports (driven adapters: core → hardware)
// ───────────────────────────────────────────────────────────────

/// Discrete digital output.
pub trait LevelActuator {
    fn set_level(&mut self, high: bool);
}

/// Continuous (PWM-style) output.
///
/// `set_intensity` must be synchronous, idempotent and cheap enough to
/// call every scheduling quantum.
pub trait IntensityActuator {
    /// Largest value accepted by [`set_intensity`](Self::set_intensity).
    fn max_intensity(&self) -> u16;

    /// Apply `value`; values above `max_intensity()` are clamped.
    fn set_intensity(&mut self, value: u16);
}

/// Byte-oriented output channel (UART, USB-CDC, ...).
pub trait ByteSink {
    /// Write `bytes`, returning how many were accepted.  Backpressure is
    /// whatever the channel itself enforces.
    fn write_bytes(&mut self, bytes: &[u8]) -> usize;
}

// ───────────────────────────────────────────────────────────────
// Consumer task (scheduled by the runtime)
// ───────────────────────────────────────────────────────────────

/// An independently scheduled periodic unit.
///
/// `step` runs exactly one quantum: read the shared state once, command
/// the actuator once, and return how long to sleep before the next
/// quantum.  It never blocks.
pub trait ConsumerTask {
    fn name(&self) -> &'static str;

    fn step(&mut self) -> Duration;
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: core ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists system configuration.
///
/// Implementations MUST run [`SystemConfig::validate`] before persisting
/// and reject invalid values rather than clamping them.
pub trait ConfigPort {
    /// Load configuration.  Returns [`ConfigError::NotFound`] on first boot.
    fn load(&self) -> Result<SystemConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&mut self, config: &SystemConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations and config validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// No config found in storage (first boot).
    NotFound,
    /// Stored config failed to deserialize.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "config not found"),
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
