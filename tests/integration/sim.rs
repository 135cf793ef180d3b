//! Virtual-time harness for Consumer Tasks.
//!
//! Discrete-event loop: every task has a due time; the earliest due task
//! steps, and its returned delay sets its next due time.  Ties go to the
//! task added first.  No real sleeping happens, so a 10 s scenario runs in
//! microseconds and is fully deterministic.

use core::time::Duration;

use ledtoggle::app::ports::ConsumerTask;

struct Slot<'a> {
    due: Duration,
    task: Box<dyn ConsumerTask + 'a>,
    stepped_at: Vec<Duration>,
}

pub struct Sim<'a> {
    now: Duration,
    slots: Vec<Slot<'a>>,
}

/// Handle returned by [`Sim::add`].
#[derive(Debug, Clone, Copy)]
pub struct TaskId(usize);

#[allow(dead_code)]
impl<'a> Sim<'a> {
    pub fn new() -> Self {
        Self {
            now: Duration::ZERO,
            slots: Vec::new(),
        }
    }

    /// Register `task`; its first quantum is due immediately.
    pub fn add(&mut self, task: impl ConsumerTask + 'a) -> TaskId {
        self.slots.push(Slot {
            due: self.now,
            task: Box::new(task),
            stepped_at: Vec::new(),
        });
        TaskId(self.slots.len() - 1)
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    /// Run every quantum due at or before `t`, then set the clock to `t`.
    pub fn run_until(&mut self, t: Duration) {
        while let Some(idx) = self.next_due(t) {
            let slot = &mut self.slots[idx];
            self.now = slot.due;
            slot.stepped_at.push(slot.due);
            let delay = slot.task.step();
            slot.due += delay;
        }
        self.now = t;
    }

    pub fn run_for(&mut self, d: Duration) {
        self.run_until(self.now + d);
    }

    /// Virtual times at which `id` has stepped.
    pub fn steps(&self, id: TaskId) -> &[Duration] {
        &self.slots[id.0].stepped_at
    }

    /// Name reported by the task behind `id`.
    pub fn name(&self, id: TaskId) -> &'static str {
        self.slots[id.0].task.name()
    }

    fn next_due(&self, limit: Duration) -> Option<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= limit)
            .min_by_key(|(i, s)| (s.due, *i))
            .map(|(i, _)| i)
    }
}

pub fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

// ── Standard rig: the three Consumer Tasks on mock actuators ──

use ledtoggle::app::tasks::{Fader, LevelFollower, StatusReporter};
use ledtoggle::config::SystemConfig;
use ledtoggle::state::ControlState;

use crate::mock_hw::{Log, MockPin, MockPwm, MockUart};

#[allow(dead_code)]
pub struct Rig {
    pub fader: TaskId,
    pub reporter: TaskId,
    pub level: TaskId,
    pub duties: Log<u16>,
    pub uart: Log<u8>,
    pub levels: Log<bool>,
}

/// Attach fader, reporter and level follower reading `state` to `sim`.
pub fn attach<'a>(sim: &mut Sim<'a>, state: &'a ControlState, cfg: &SystemConfig) -> Rig {
    let pwm = MockPwm::new(255);
    let uart = MockUart::default();
    let pin = MockPin::default();
    let (duties, bytes, levels) = (pwm.duties.clone(), uart.bytes.clone(), pin.levels.clone());

    let fader = sim.add(Fader::new(state.reader(), pwm, &cfg.fader));
    let reporter = sim.add(StatusReporter::new(state.reader(), uart, &cfg.reporter));
    let level = sim.add(LevelFollower::new(state.reader(), pin, &cfg.level));

    Rig {
        fader,
        reporter,
        level,
        duties,
        uart: bytes,
        levels,
    }
}
