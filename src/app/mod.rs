//! Application core — pure coordination logic, zero I/O.
//!
//! Event Sources ([`sources`]) write the shared LED mode; Consumer Tasks
//! ([`tasks`]) poll it on their own cadence and drive one actuator each.
//! All hardware access goes through the traits in [`ports`], so the whole
//! core runs on the host under test.

pub mod ports;
pub mod sources;
pub mod tasks;
