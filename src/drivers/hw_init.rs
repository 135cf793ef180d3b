//! One-shot peripheral initialisation and raw register helpers.
//!
//! Configures GPIO directions, the LEDC timer/channel, the status UART and
//! the GPIO ISR service using raw ESP-IDF sys calls.  Called once from
//! `main()` before any Consumer Task starts.
//!
//! Every helper has a host stub so the drivers above it compile and run
//! under `cargo test`.

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;

#[cfg(target_os = "espidf")]
use log::info;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.  Each carries the
/// raw `esp_err_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    GpioConfigFailed(i32),
    LedcInitFailed(i32),
    UartInitFailed(i32),
    IsrInstallFailed(i32),
    IsrAddFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
            Self::LedcInitFailed(rc) => write!(f, "LEDC timer/channel config failed (rc={})", rc),
            Self::UartInitFailed(rc) => write!(f, "UART driver setup failed (rc={})", rc),
            Self::IsrInstallFailed(rc) => write!(f, "GPIO ISR service install failed (rc={})", rc),
            Self::IsrAddFailed(rc) => write!(f, "GPIO ISR handler add failed (rc={})", rc),
        }
    }
}

#[cfg(target_os = "espidf")]
fn check(ret: esp_err_t, err: fn(i32) -> HwInitError) -> Result<(), HwInitError> {
    if ret == ESP_OK as esp_err_t { Ok(()) } else { Err(err(ret)) }
}

// ── Execution context ─────────────────────────────────────────

/// True when called from interrupt context.
#[cfg(target_os = "espidf")]
pub fn in_isr() -> bool {
    esp_idf_hal::interrupt::active()
}

#[cfg(not(target_os = "espidf"))]
pub fn in_isr() -> bool {
    false
}

// ── GPIO Outputs ──────────────────────────────────────────────

/// Configure `pin` as a push-pull output and drive it to `initial`.
#[cfg(target_os = "espidf")]
pub fn init_gpio_output(pin: i32, initial: bool) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
        ..Default::default()
    };
    // SAFETY: called once per pin from the single boot path.
    check(unsafe { gpio_config(&cfg) }, HwInitError::GpioConfigFailed)?;
    gpio_write(pin, initial);
    info!("hw_init: GPIO{} output (initial={})", pin, initial);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_gpio_output(pin: i32, initial: bool) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): GPIO{} output (initial={})", pin, initial);
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn gpio_write(pin: i32, high: bool) {
    // SAFETY: gpio_set_level writes to an already-configured output pin;
    // each pin is owned by exactly one driver.
    unsafe {
        gpio_set_level(pin, u32::from(high));
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn gpio_write(_pin: i32, _high: bool) {}

// ── GPIO Inputs ───────────────────────────────────────────────

/// Configure `pin` as a pulled-up input that interrupts on the falling edge.
#[cfg(target_os = "espidf")]
pub fn init_gpio_falling_edge_input(pin: i32) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pin,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_ENABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_NEGEDGE,
        ..Default::default()
    };
    // SAFETY: single boot path, before the ISR is attached.
    check(unsafe { gpio_config(&cfg) }, HwInitError::GpioConfigFailed)?;
    info!("hw_init: GPIO{} input (pull-up, falling edge)", pin);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_gpio_falling_edge_input(pin: i32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): GPIO{} input (pull-up, falling edge)", pin);
    Ok(())
}

// ── LEDC PWM ─────────────────────────────────────────────────

/// Configure LEDC timer 0 at `freq_hz` / 8-bit and bind `channel` to `gpio`
/// with duty 0.
#[cfg(target_os = "espidf")]
pub fn init_ledc(channel: u32, gpio: i32, freq_hz: u32) -> Result<(), HwInitError> {
    let timer = ledc_timer_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        timer_num: ledc_timer_t_LEDC_TIMER_0,
        duty_resolution: ledc_timer_bit_t_LEDC_TIMER_8_BIT,
        freq_hz,
        clk_cfg: soc_periph_ledc_clk_src_legacy_t_LEDC_AUTO_CLK,
        ..Default::default()
    };
    // SAFETY: single boot path; the timer and channel are not yet in use.
    check(unsafe { ledc_timer_config(&timer) }, HwInitError::LedcInitFailed)?;

    let chan = ledc_channel_config_t {
        speed_mode: ledc_mode_t_LEDC_LOW_SPEED_MODE,
        channel,
        timer_sel: ledc_timer_t_LEDC_TIMER_0,
        intr_type: ledc_intr_type_t_LEDC_INTR_DISABLE,
        gpio_num: gpio,
        duty: 0,
        hpoint: 0,
        ..Default::default()
    };
    check(unsafe { ledc_channel_config(&chan) }, HwInitError::LedcInitFailed)?;

    info!("hw_init: LEDC CH{} on GPIO{} ({} Hz, 8-bit)", channel, gpio, freq_hz);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_ledc(channel: u32, gpio: i32, freq_hz: u32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): LEDC CH{} on GPIO{} ({} Hz)", channel, gpio, freq_hz);
    Ok(())
}

/// Set and latch the duty of a configured LEDC channel.  Returns `false`
/// if the driver rejected the write.
#[cfg(target_os = "espidf")]
pub fn ledc_set(channel: u32, duty: u32) -> bool {
    // SAFETY: the channel was configured in init_ledc(); only the fader
    // task writes it.
    unsafe {
        ledc_set_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel, duty) == ESP_OK as esp_err_t
            && ledc_update_duty(ledc_mode_t_LEDC_LOW_SPEED_MODE, channel) == ESP_OK as esp_err_t
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn ledc_set(_channel: u32, _duty: u32) -> bool {
    true
}

// ── UART ──────────────────────────────────────────────────────

/// Install the UART driver on `port` at `baud`, 8N1, no flow control.
#[cfg(target_os = "espidf")]
pub fn init_uart(port: i32, baud: u32, tx: i32, rx: i32) -> Result<(), HwInitError> {
    const PIN_NO_CHANGE: i32 = -1;

    let cfg = uart_config_t {
        baud_rate: baud as i32,
        data_bits: uart_word_length_t_UART_DATA_8_BITS,
        parity: uart_parity_t_UART_PARITY_DISABLE,
        stop_bits: uart_stop_bits_t_UART_STOP_BITS_1,
        flow_ctrl: uart_hw_flowcontrol_t_UART_HW_FLOWCTRL_DISABLE,
        ..Default::default()
    };
    // SAFETY: single boot path; the port is not used until this returns.
    unsafe {
        check(uart_param_config(port, &cfg), HwInitError::UartInitFailed)?;
        check(
            uart_set_pin(port, tx, rx, PIN_NO_CHANGE, PIN_NO_CHANGE),
            HwInitError::UartInitFailed,
        )?;
        check(
            uart_driver_install(
                port,
                crate::pins::UART_RX_BUF,
                0,
                0,
                core::ptr::null_mut(),
                0,
            ),
            HwInitError::UartInitFailed,
        )?;
    }
    info!("hw_init: UART{} {} baud (tx={}, rx={})", port, baud, tx, rx);
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_uart(port: i32, baud: u32, tx: i32, rx: i32) -> Result<(), HwInitError> {
    log::info!("hw_init(sim): UART{} {} baud (tx={}, rx={})", port, baud, tx, rx);
    Ok(())
}

/// Blocking write.  Returns the number of bytes queued, 0 on error.
#[cfg(target_os = "espidf")]
pub fn uart_write(port: i32, bytes: &[u8]) -> usize {
    // SAFETY: the driver was installed in init_uart(); `bytes` outlives the call.
    let n = unsafe { uart_write_bytes(port, bytes.as_ptr().cast(), bytes.len()) };
    n.max(0) as usize
}

#[cfg(not(target_os = "espidf"))]
pub fn uart_write(_port: i32, bytes: &[u8]) -> usize {
    bytes.len()
}

// ── GPIO ISR Service ──────────────────────────────────────────

/// Signature of a per-pin GPIO ISR trampoline.
#[cfg(target_os = "espidf")]
pub type IsrFn = unsafe extern "C" fn(*mut core::ffi::c_void);

/// Install the per-pin GPIO ISR service.  Idempotent.
#[cfg(target_os = "espidf")]
pub fn init_isr_service() -> Result<(), HwInitError> {
    // SAFETY: ESP_ERR_INVALID_STATE means the service is already installed.
    let ret = unsafe { gpio_install_isr_service(0) };
    if ret != ESP_OK as esp_err_t && ret != ESP_ERR_INVALID_STATE as esp_err_t {
        return Err(HwInitError::IsrInstallFailed(ret));
    }
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_isr_service() -> Result<(), HwInitError> {
    log::info!("hw_init(sim): ISR service skipped");
    Ok(())
}

/// Attach `handler` to `pin` and enable its interrupt.
#[cfg(target_os = "espidf")]
pub fn add_isr(pin: i32, handler: IsrFn) -> Result<(), HwInitError> {
    // SAFETY: `handler` is a static function that only touches atomics;
    // the ISR service was installed by init_isr_service().
    unsafe {
        check(
            gpio_isr_handler_add(pin, Some(handler), core::ptr::null_mut()),
            HwInitError::IsrAddFailed,
        )?;
        check(gpio_intr_enable(pin), HwInitError::IsrAddFailed)?;
    }
    info!("hw_init: ISR attached to GPIO{}", pin);
    Ok(())
}
