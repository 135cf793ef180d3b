//! Mock actuators for integration tests.
//!
//! Each mock records every call into a shared log.  Tests keep a clone of
//! the log handle and assert on the full history after the task that owns
//! the mock has run.  Handles are `Send` so the same mocks also work with
//! the threaded runtime.

use std::sync::{Arc, Mutex, MutexGuard};

use ledtoggle::app::ports::{ByteSink, IntensityActuator, LevelActuator};

/// Shared, clonable call history.
#[derive(Debug)]
pub struct Log<T>(Arc<Mutex<Vec<T>>>);

impl<T> Clone for Log<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> Default for Log<T> {
    fn default() -> Self {
        Self(Arc::new(Mutex::new(Vec::new())))
    }
}

#[allow(dead_code)]
impl<T: Clone> Log<T> {
    pub fn entries(&self) -> MutexGuard<'_, Vec<T>> {
        self.0.lock().unwrap()
    }

    pub fn snapshot(&self) -> Vec<T> {
        self.entries().clone()
    }

    pub fn last(&self) -> Option<T> {
        self.entries().last().cloned()
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    fn push(&self, v: T) {
        self.entries().push(v);
    }
}

// ── PWM ───────────────────────────────────────────────────────

pub struct MockPwm {
    pub max: u16,
    pub duties: Log<u16>,
}

impl MockPwm {
    pub fn new(max: u16) -> Self {
        Self {
            max,
            duties: Log::default(),
        }
    }
}

impl IntensityActuator for MockPwm {
    fn max_intensity(&self) -> u16 {
        self.max
    }

    fn set_intensity(&mut self, value: u16) {
        assert!(value <= self.max, "duty {} above max {}", value, self.max);
        self.duties.push(value);
    }
}

// ── GPIO ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockPin {
    pub levels: Log<bool>,
}

impl LevelActuator for MockPin {
    fn set_level(&mut self, high: bool) {
        self.levels.push(high);
    }
}

// ── UART ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct MockUart {
    pub bytes: Log<u8>,
}

impl ByteSink for MockUart {
    fn write_bytes(&mut self, bytes: &[u8]) -> usize {
        self.bytes.entries().extend_from_slice(bytes);
        bytes.len()
    }
}

/// Split captured UART bytes into status lines (terminator stripped).
#[allow(dead_code)]
pub fn lines(bytes: &Log<u8>) -> Vec<String> {
    String::from_utf8(bytes.snapshot())
        .unwrap()
        .lines()
        .map(str::to_owned)
        .collect()
}
