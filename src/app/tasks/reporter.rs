//! UART status reporter.
//!
//! Every `period_ms` it snapshots the mode and writes one status line.
//! The line depends only on that snapshot: transitions between two
//! reports are not queued or replayed.

use core::time::Duration;

use log::{debug, warn};

use crate::app::ports::{ByteSink, ConsumerTask};
use crate::config::ReporterConfig;
use crate::state::{Mode, StateReader};

pub const REPORT_ON: &str = "LED is ON\n";
pub const REPORT_OFF: &str = "LED is BLINKING\n";

/// Status line for `mode`.
pub const fn message(mode: Mode) -> &'static str {
    match mode {
        Mode::On => REPORT_ON,
        Mode::Off => REPORT_OFF,
    }
}

pub struct StatusReporter<'a, S: ByteSink> {
    reader: StateReader<'a>,
    sink: S,
    period: Duration,
    last_reported: Option<Mode>,
}

impl<'a, S: ByteSink> StatusReporter<'a, S> {
    pub fn new(reader: StateReader<'a>, sink: S, cfg: &ReporterConfig) -> Self {
        Self {
            reader,
            sink,
            period: Duration::from_millis(cfg.period_ms as u64),
            last_reported: None,
        }
    }

    /// Mode carried by the most recent report.
    pub fn last_reported(&self) -> Option<Mode> {
        self.last_reported
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: ByteSink> ConsumerTask for StatusReporter<'_, S> {
    fn name(&self) -> &'static str {
        "reporter"
    }

    fn step(&mut self) -> Duration {
        let mode = self.reader.read();
        if self.last_reported != Some(mode) {
            debug!("reporter: observed {:?}", mode);
        }

        let line = message(mode);
        let written = self.sink.write_bytes(line.as_bytes());
        if written < line.len() {
            warn!("reporter: short write ({}/{} bytes)", written, line.len());
        }
        self.last_reported = Some(mode);
        self.period
    }
}
