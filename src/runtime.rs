//! Consumer Task runtime — one reactor-driven thread, one future per task.
//!
//! ```text
//!  ┌──────────────────────────────────────────────────────┐
//!  │  consumers thread (APP core, pri 10)                 │
//!  │  ┌────────────────────────────────────────────────┐  │
//!  │  │  futures_lite::block_on                        │  │
//!  │  │  ┌──────────────────────────────────────────┐  │  │
//!  │  │  │  edge_executor::LocalExecutor            │  │  │
//!  │  │  │  ┌────────┐  ┌──────────┐  ┌─────────┐   │  │  │
//!  │  │  │  │ fader  │  │ reporter │  │  level  │   │  │  │
//!  │  │  │  │ 20/500 │  │  2000 ms │  │  10 ms  │   │  │  │
//!  │  │  │  └────────┘  └──────────┘  └─────────┘   │  │  │
//!  │  │  └──────────────────────────────────────────┘  │  │
//!  │  └────────────────────────────────────────────────┘  │
//!  └──────────────────────────────────────────────────────┘
//! ```
//!
//! Each task sleeps on an `async_io_mini::Timer` between quanta, so a slow
//! actuator write in one task delays only that task's own next step.

use std::io;
use std::thread::JoinHandle;

use log::info;

use crate::app::ports::{ByteSink, ConsumerTask, IntensityActuator, LevelActuator};
use crate::app::tasks::{Fader, LevelFollower, StatusReporter};
use crate::config::SystemConfig;
use crate::drivers::task_pin::{self, Core, TaskSpec};
use crate::state::ControlState;

/// Placement of the consumers thread.
pub const CONSUMERS_TASK: TaskSpec = TaskSpec {
    name: "consumers\0",
    core: Core::App,
    priority: 10,
    stack_kb: 8,
};

/// Drive `task` forever: one quantum, then sleep for the delay it returned.
pub async fn run_periodic<T: ConsumerTask>(mut task: T) {
    info!("runtime: '{}' started", task.name());
    loop {
        let delay = task.step();
        async_io_mini::Timer::after(delay).await;
    }
}

/// Actuators owned by the consumers thread.
pub struct Actuators<A, S, L> {
    pub pwm: A,
    pub uart: S,
    pub level: L,
}

/// Run the three Consumer Tasks on the calling thread.  Never returns.
pub fn run_consumers<A, S, L>(
    state: &'static ControlState,
    cfg: &SystemConfig,
    out: Actuators<A, S, L>,
) where
    A: IntensityActuator + 'static,
    S: ByteSink + 'static,
    L: LevelActuator + 'static,
{
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();

    executor
        .spawn(run_periodic(Fader::new(state.reader(), out.pwm, &cfg.fader)))
        .detach();
    executor
        .spawn(run_periodic(StatusReporter::new(
            state.reader(),
            out.uart,
            &cfg.reporter,
        )))
        .detach();
    executor
        .spawn(run_periodic(LevelFollower::new(
            state.reader(),
            out.level,
            &cfg.level,
        )))
        .detach();

    info!("runtime: consumer tasks scheduled");
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

/// Start the consumers thread per `placement`.  The actuators move into it.
pub fn spawn_consumers<A, S, L>(
    state: &'static ControlState,
    cfg: &SystemConfig,
    out: Actuators<A, S, L>,
    placement: TaskSpec,
) -> io::Result<JoinHandle<()>>
where
    A: IntensityActuator + Send + 'static,
    S: ByteSink + Send + 'static,
    L: LevelActuator + Send + 'static,
{
    let cfg = cfg.clone();
    task_pin::spawn_on_core(placement, move || run_consumers(state, &cfg, out))
}
