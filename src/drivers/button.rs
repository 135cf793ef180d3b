//! Push-button interrupt source.
//!
//! ## Hardware
//!
//! Active-low momentary switch with internal pull-up.  The GPIO fires on
//! the falling edge and the ISR flips the shared LED mode with a single
//! atomic XOR.  No debounce: each edge the hardware delivers is one toggle,
//! so a bouncy switch may toggle several times per press.

use crate::app::sources::IsrToggle;
use crate::drivers::hw_init::{self, HwInitError};
use crate::state::LED_MODE;

/// The only producer bound to the button.  Lives in a static so the ISR
/// can reach it without a context pointer.
static BUTTON_TOGGLE: IsrToggle<'static> = IsrToggle::new(LED_MODE.writer());

/// ISR body.  Lock-free, allocation-free and log-free, so it is safe to call
/// from interrupt context.
#[inline]
pub fn button_isr_handler() {
    BUTTON_TOGGLE.fire();
}

#[cfg(target_os = "espidf")]
unsafe extern "C" fn button_isr_trampoline(_arg: *mut core::ffi::c_void) {
    button_isr_handler();
}

/// Configure `pin` as a falling-edge input and attach the toggle ISR.
///
/// Requires the GPIO ISR service ([`hw_init::init_isr_service`]) to be
/// installed first.
#[cfg(target_os = "espidf")]
pub fn init_button(pin: i32) -> Result<(), HwInitError> {
    hw_init::init_gpio_falling_edge_input(pin)?;
    hw_init::add_isr(pin, button_isr_trampoline)
}

#[cfg(not(target_os = "espidf"))]
pub fn init_button(pin: i32) -> Result<(), HwInitError> {
    hw_init::init_gpio_falling_edge_input(pin)?;
    log::info!("button(sim): GPIO{} ISR not attached", pin);
    Ok(())
}
