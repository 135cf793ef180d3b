//! The threaded runtime on the host: real timers, short cadences.

use std::thread;
use std::time::Duration;

use ledtoggle::config::{FaderConfig, LevelConfig, ReporterConfig, SystemConfig};
use ledtoggle::drivers::task_pin::TaskSpec;
use ledtoggle::runtime::{self, Actuators, CONSUMERS_TASK};
use ledtoggle::state::{ControlState, Mode};

use crate::mock_hw::{MockPin, MockPwm, MockUart, lines};

fn fast_config() -> SystemConfig {
    SystemConfig {
        fader: FaderConfig {
            ramp_period_ms: 2,
            idle_period_ms: 10,
            ..FaderConfig::default()
        },
        reporter: ReporterConfig { period_ms: 25 },
        level: LevelConfig {
            period_ms: 2,
            active_low: true,
        },
        ..SystemConfig::default()
    }
}

#[test]
fn spawned_consumers_follow_the_shared_mode() {
    let state: &'static ControlState = Box::leak(Box::new(ControlState::new()));
    let cfg = fast_config();
    cfg.validate().unwrap();

    let pwm = MockPwm::new(255);
    let uart = MockUart::default();
    let pin = MockPin::default();
    let (duties, bytes, levels) = (pwm.duties.clone(), uart.bytes.clone(), pin.levels.clone());

    // The thread runs forever; it is left detached when the test exits.
    let _handle = runtime::spawn_consumers(
        state,
        &cfg,
        Actuators {
            pwm,
            uart,
            level: pin,
        },
        TaskSpec {
            stack_kb: 256,
            ..CONSUMERS_TASK
        },
    )
    .unwrap();

    thread::sleep(Duration::from_millis(150));
    assert!(lines(&bytes).iter().all(|l| l == "LED is BLINKING"));
    assert!(!lines(&bytes).is_empty());
    assert_eq!(levels.last(), Some(true));
    assert!(duties.snapshot().iter().all(|&d| d == 0));

    state.writer().write(Mode::On);
    thread::sleep(Duration::from_millis(300));

    assert_eq!(lines(&bytes).last().map(String::as_str), Some("LED is ON"));
    assert_eq!(levels.last(), Some(false));
    assert!(duties.snapshot().iter().any(|&d| d > 0));
}
