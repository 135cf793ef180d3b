//! GPIO / peripheral assignments for the ESP32-WROVER dev board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// User button (BOOT button, active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// Falling edge toggles the LED mode.
pub const BUTTON_GPIO: i32 = 0;

// ---------------------------------------------------------------------------
// LEDs
// ---------------------------------------------------------------------------

/// On-board LED, driven by the fader through LEDC.
pub const PWM_LED_GPIO: i32 = 2;
/// External indicator LED (wired to 3V3, so active-low), driven by the
/// level follower.
pub const LEVEL_LED_GPIO: i32 = 13;

// ---------------------------------------------------------------------------
// UART status output
// ---------------------------------------------------------------------------

/// UART1 — UART0 stays with the console/logger.
pub const STATUS_UART_PORT: i32 = 1;
pub const UART_TX_GPIO: i32 = 4;
pub const UART_RX_GPIO: i32 = 5;
/// Driver RX ring size (bytes).  TX is unbuffered: writes block until sent.
pub const UART_RX_BUF: i32 = 2048;

// ---------------------------------------------------------------------------
// PWM configuration
// ---------------------------------------------------------------------------

/// LEDC timer resolution (bits).  8-bit gives 0 – 255 duty levels.
pub const PWM_RESOLUTION_BITS: u32 = 8;
/// Largest duty at [`PWM_RESOLUTION_BITS`].
pub const PWM_MAX_DUTY: u16 = (1 << PWM_RESOLUTION_BITS) - 1;
/// LEDC channel used by the fader.
pub const LEDC_CH_FADER: u32 = 0;
