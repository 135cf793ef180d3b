//! Digital level follower — mirrors the mode onto one GPIO.
//!
//! Re-applies the level every quantum even when unchanged; GPIO writes
//! are idempotent and this heals any glitch within one period.

use core::time::Duration;

use log::debug;

use crate::app::ports::{ConsumerTask, LevelActuator};
use crate::config::LevelConfig;
use crate::state::{Mode, StateReader};

pub struct LevelFollower<'a, L: LevelActuator> {
    reader: StateReader<'a>,
    out: L,
    period: Duration,
    cfg: LevelConfig,
    last_mode: Option<Mode>,
}

impl<'a, L: LevelActuator> LevelFollower<'a, L> {
    pub fn new(reader: StateReader<'a>, out: L, cfg: &LevelConfig) -> Self {
        Self {
            reader,
            out,
            period: Duration::from_millis(cfg.period_ms as u64),
            cfg: *cfg,
            last_mode: None,
        }
    }

    /// Electrical level that represents `mode` on this pin.
    pub fn level_for(&self, mode: Mode) -> bool {
        self.cfg.level_for(mode)
    }

    pub fn actuator(&self) -> &L {
        &self.out
    }
}

impl<L: LevelActuator> ConsumerTask for LevelFollower<'_, L> {
    fn name(&self) -> &'static str {
        "level"
    }

    fn step(&mut self) -> Duration {
        let mode = self.reader.read();
        if self.last_mode != Some(mode) {
            debug!("level: observed {:?}", mode);
            self.last_mode = Some(mode);
        }
        let high = self.level_for(mode);
        self.out.set_level(high);
        self.period
    }
}
