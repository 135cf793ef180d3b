//! PWM fader — ramps LED intensity while the mode is `On`.
//!
//! ```text
//!  duty
//!  max ┤          ╭─╮ rest      ╭─╮
//!      │        ╭─╯ │          ╭╯ │
//!      │      ╭─╯   │        ╭─╯  │
//!    0 ┼──────╯     ╰────────╯    ╰──────── (Off → 0 every idle period)
//!        Off  │ On: +step / ramp_period │ Off
//! ```
//!
//! The mode is re-read every quantum.  While `On`, duty advances by
//! `step` each `ramp_period_ms`.  When the next step would pass `max`:
//!
//! - [`RampEnd::Restart`]: the output holds its last value for one
//!   `idle_period_ms`, then the ramp starts again from 0.  Every pass
//!   through the ramp starts from scratch rather than resuming.
//! - [`RampEnd::Hold`]: duty clamps to `max` and stays there.
//!
//! While `Off`, duty 0 is applied every `idle_period_ms`.

use core::time::Duration;

use log::debug;

use crate::app::ports::{ConsumerTask, IntensityActuator};
use crate::config::{FaderConfig, RampEnd};
use crate::state::{Mode, StateReader};

pub struct Fader<'a, A: IntensityActuator> {
    reader: StateReader<'a>,
    out: A,
    ramp_period: Duration,
    idle_period: Duration,
    step: u16,
    max: u16,
    end: RampEnd,
    /// Current position in the ramp; `None` means the next `On` quantum
    /// starts from 0.
    ramp: Option<u16>,
    applied: u16,
    last_mode: Option<Mode>,
}

impl<'a, A: IntensityActuator> Fader<'a, A> {
    pub fn new(reader: StateReader<'a>, out: A, cfg: &FaderConfig) -> Self {
        let max = cfg.max.min(out.max_intensity());
        Self {
            reader,
            out,
            ramp_period: Duration::from_millis(cfg.ramp_period_ms as u64),
            idle_period: Duration::from_millis(cfg.idle_period_ms as u64),
            step: cfg.step.max(1),
            max,
            end: cfg.end,
            ramp: None,
            applied: 0,
            last_mode: None,
        }
    }

    /// Last duty handed to the actuator.
    pub fn duty(&self) -> u16 {
        self.applied
    }

    pub fn actuator(&self) -> &A {
        &self.out
    }

    fn apply(&mut self, duty: u16) {
        self.applied = duty;
        self.out.set_intensity(duty);
    }

    fn on_quantum(&mut self) -> Duration {
        let Some(duty) = self.ramp else {
            self.ramp = Some(0);
            self.apply(0);
            return self.ramp_period;
        };

        let next = duty.saturating_add(self.step);
        if next <= self.max {
            self.ramp = Some(next);
            self.apply(next);
            return self.ramp_period;
        }

        match self.end {
            RampEnd::Restart => {
                self.ramp = None;
            }
            RampEnd::Hold => {
                self.ramp = Some(self.max);
                self.apply(self.max);
            }
        }
        self.idle_period
    }
}

impl<A: IntensityActuator> ConsumerTask for Fader<'_, A> {
    fn name(&self) -> &'static str {
        "fader"
    }

    fn step(&mut self) -> Duration {
        let mode = self.reader.read();
        if self.last_mode != Some(mode) {
            debug!("fader: observed {:?}", mode);
            self.last_mode = Some(mode);
        }

        match mode {
            Mode::On => self.on_quantum(),
            Mode::Off => {
                self.ramp = None;
                self.apply(0);
                self.idle_period
            }
        }
    }
}
