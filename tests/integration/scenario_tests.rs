//! End-to-end scenarios: Event Sources → shared mode → Consumer Tasks,
//! on virtual time with the default cadences.

use ledtoggle::app::sources::{IsrToggle, ToggleEndpoint};
use ledtoggle::app::tasks::reporter::{REPORT_OFF, REPORT_ON};
use ledtoggle::config::SystemConfig;
use ledtoggle::state::{ControlState, Mode};

use crate::mock_hw::lines;
use crate::sim::{Sim, attach, ms};

fn trimmed(s: &str) -> String {
    s.trim_end().to_owned()
}

/// One button edge from `Off`: the reporter's next line says ON and the
/// fader starts ramping from 0 within one idle period.
#[test]
fn single_edge_reaches_every_consumer() {
    let state = ControlState::new();
    let cfg = SystemConfig::default();
    let mut sim = Sim::new();
    let rig = attach(&mut sim, &state, &cfg);

    sim.run_until(ms(3010));
    assert!(lines(&rig.uart).iter().all(|l| *l == trimmed(REPORT_OFF)));
    assert!(rig.duties.snapshot().iter().all(|&d| d == 0));
    let duties_before = rig.duties.len();
    let lines_before = lines(&rig.uart).len();

    IsrToggle::new(state.writer()).fire();
    assert_eq!(state.reader().read(), Mode::On);

    // Within one reporter period the next line is the ON message.
    sim.run_for(ms(2000));
    let out = lines(&rig.uart);
    assert_eq!(out.len(), lines_before + 1);
    assert_eq!(out[lines_before], trimmed(REPORT_ON));

    // Within one idle period (+ a few ramp quanta) intensity rises from 0.
    let after: Vec<u16> = rig.duties.snapshot()[duties_before..].to_vec();
    assert_eq!(after[0], 0);
    assert!(after[1] > after[0]);
    let first_on_step = sim
        .steps(rig.fader)
        .iter()
        .find(|t| **t > ms(3010))
        .copied()
        .unwrap();
    assert!(first_on_step <= ms(3010) + ms(cfg.fader.idle_period_ms as u64));

    // Level follower (active-low) pulls the pin low on its next 10 ms poll.
    assert_eq!(rig.levels.last(), Some(false));
}

/// HTTP toggle from `On` returns "Off" and leaves `Off`; again returns "On".
#[test]
fn request_toggle_round_trip() {
    let state = ControlState::new();
    state.writer().write(Mode::On);
    let endpoint = ToggleEndpoint::new(state.writer(), state.reader());

    assert_eq!(endpoint.toggle(), "Off");
    assert_eq!(state.reader().read(), Mode::Off);
    assert_eq!(endpoint.current(), Mode::Off);
    assert_eq!(endpoint.toggle(), "On");
    assert_eq!(state.reader().read(), Mode::On);
}

/// Two edges inside one polling gap cancel out: no task ever sees `On`.
#[test]
fn bounce_pair_between_polls_is_invisible() {
    let state = ControlState::new();
    let cfg = SystemConfig::default();
    let mut sim = Sim::new();
    let rig = attach(&mut sim, &state, &cfg);
    let isr = IsrToggle::new(state.writer());

    for burst_at in [1005, 2503, 4999] {
        sim.run_until(ms(burst_at));
        isr.fire();
        isr.fire();
    }
    sim.run_until(ms(7000));

    assert!(lines(&rig.uart).iter().all(|l| *l == trimmed(REPORT_OFF)));
    assert!(rig.duties.snapshot().iter().all(|&d| d == 0));
    assert!(rig.levels.snapshot().iter().all(|&high| high), "active-low pin stays high");
}

/// An odd burst settles on `On`; each task sees exactly one transition.
#[test]
fn odd_burst_is_seen_as_one_transition() {
    let state = ControlState::new();
    let cfg = SystemConfig::default();
    let mut sim = Sim::new();
    let rig = attach(&mut sim, &state, &cfg);
    let isr = IsrToggle::new(state.writer());

    sim.run_until(ms(1005));
    for _ in 0..3 {
        isr.fire();
    }
    sim.run_until(ms(5000));

    let levels = rig.levels.snapshot();
    let flips = levels.windows(2).filter(|w| w[0] != w[1]).count();
    assert_eq!(flips, 1);

    let out = lines(&rig.uart);
    let first_on = out.iter().position(|l| *l == trimmed(REPORT_ON)).unwrap();
    assert!(out[first_on..].iter().all(|l| *l == trimmed(REPORT_ON)));
}

/// Consumers observe a toggle on their own cycles, in no fixed order.
#[test]
fn consumers_catch_up_on_their_own_cadence() {
    let state = ControlState::new();
    let cfg = SystemConfig::default();
    let mut sim = Sim::new();
    let rig = attach(&mut sim, &state, &cfg);

    sim.run_until(ms(2001));
    state.writer().toggle();

    // 9 ms later only the level follower (10 ms) has had a chance.
    sim.run_for(ms(9));
    assert_eq!(rig.levels.last(), Some(false));
    assert_eq!(lines(&rig.uart).last().map(String::as_str), Some("LED is BLINKING"));
    assert_eq!(rig.duties.last(), Some(0));

    sim.run_until(ms(4000));
    assert_eq!(lines(&rig.uart).last().map(String::as_str), Some("LED is ON"));
    assert!(rig.duties.last().unwrap() > 0);
}
