//! Fuzz target: `Fader` under arbitrary toggle/poll histories
//!
//! The first three bytes pick `step`, `max` and the ramp end; every
//! following byte is one operation (odd = toggle, even = poll).
//! Invariants checked:
//! - Applied duty never exceeds `max`
//! - Every `Off` poll applies 0
//!
//! cargo fuzz run fuzz_fader_history

#![no_main]

use ledtoggle::app::ports::{ConsumerTask, IntensityActuator};
use ledtoggle::app::tasks::Fader;
use ledtoggle::config::{FaderConfig, RampEnd};
use ledtoggle::state::{ControlState, Mode};
use libfuzzer_sys::fuzz_target;

struct Last(u16);

impl IntensityActuator for Last {
    fn max_intensity(&self) -> u16 {
        255
    }

    fn set_intensity(&mut self, value: u16) {
        self.0 = value;
    }
}

fuzz_target!(|data: &[u8]| {
    let [step, max, end, ops @ ..] = data else {
        return;
    };
    let max = u16::from(*max).max(1);
    let step = u16::from(*step).clamp(1, max);
    let end = if end & 1 == 0 { RampEnd::Restart } else { RampEnd::Hold };

    let state = ControlState::new();
    let cfg = FaderConfig { step, max, end, ..FaderConfig::default() };
    let mut fader = Fader::new(state.reader(), Last(0), &cfg);

    for op in ops {
        if op & 1 == 1 {
            state.writer().toggle();
            continue;
        }
        let mode = state.reader().read();
        fader.step();
        assert!(fader.actuator().0 <= max);
        if mode == Mode::Off {
            assert_eq!(fader.actuator().0, 0);
        }
    }
});
