//! Consumer Tasks — periodic readers of the shared LED mode.
//!
//! | Task               | Actuator            | Cadence (default)        |
//! |--------------------|---------------------|--------------------------|
//! | [`Fader`]          | PWM duty            | 20 ms ramping, 500 ms idle |
//! | [`StatusReporter`] | UART byte stream    | 2000 ms                  |
//! | [`LevelFollower`]  | GPIO level          | 10 ms                    |
//!
//! No ordering exists between tasks: after a toggle each one sees the
//! new mode on its own next poll.

pub mod fader;
pub mod level;
pub mod reporter;

pub use fader::Fader;
pub use level::LevelFollower;
pub use reporter::StatusReporter;
