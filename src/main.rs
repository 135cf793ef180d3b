//! LED toggle firmware — main entry point.
//!
//! ```text
//!   button ISR ──┐                      ┌──► fader    (LEDC PWM)
//!                ├──► LED_MODE (u8) ────┼──► reporter (UART1)
//!   GET /toggle ─┘                      └──► level    (GPIO)
//! ```
//!
//! Boot order: NVS → config → peripherals → ISR → consumers → Wi-Fi →
//! wait for link → HTTP.  After boot the main task only services Wi-Fi
//! reconnects; if the network cannot come up it parks instead.
#![deny(unused_must_use)]

use anyhow::{Context, Result};
use log::{error, info, warn};

use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;

use ledtoggle::adapters::http::{self, Routes};
use ledtoggle::adapters::nvs::NvsAdapter;
use ledtoggle::adapters::wifi::{ConnectivityPort, LINK_POLL_INTERVAL, WifiAdapter};
use ledtoggle::config::SystemConfig;
use ledtoggle::drivers::led::{DigitalLed, PwmLed};
use ledtoggle::drivers::uart::UartSink;
use ledtoggle::drivers::{button, hw_init};
use ledtoggle::pins;
use ledtoggle::runtime::{self, Actuators, CONSUMERS_TASK};
use ledtoggle::state::{LED_MODE, LINK_STATUS, Mode};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("ledtoggle v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. NVS + config ───────────────────────────────────────
    let cfg = match NvsAdapter::new() {
        Ok(mut nvs) => SystemConfig::load_or_default(&mut nvs),
        Err(e) => {
            warn!("NVS init failed ({}), running with defaults", e);
            SystemConfig::default()
        }
    };
    cfg.validate().map_err(ledtoggle::Error::from)?;

    // ── 3. Peripherals ────────────────────────────────────────
    // Off level until the follower's first step.
    let level_idle = cfg.level.level_for(Mode::Off);
    hw_init::init_gpio_output(pins::LEVEL_LED_GPIO, level_idle).map_err(ledtoggle::Error::from)?;
    hw_init::init_ledc(pins::LEDC_CH_FADER, pins::PWM_LED_GPIO, cfg.pwm.freq_hz)
        .map_err(ledtoggle::Error::from)?;
    hw_init::init_uart(
        pins::STATUS_UART_PORT,
        cfg.uart.baud,
        pins::UART_TX_GPIO,
        pins::UART_RX_GPIO,
    )
    .map_err(ledtoggle::Error::from)?;

    // ── 4. Button ISR ─────────────────────────────────────────
    hw_init::init_isr_service().map_err(ledtoggle::Error::from)?;
    button::init_button(pins::BUTTON_GPIO).map_err(ledtoggle::Error::from)?;

    // ── 5. Consumer Tasks ─────────────────────────────────────
    let actuators = Actuators {
        pwm: PwmLed::new(pins::LEDC_CH_FADER),
        uart: UartSink::new(pins::STATUS_UART_PORT),
        level: DigitalLed::new(pins::LEVEL_LED_GPIO),
    };
    let _consumers = runtime::spawn_consumers(&LED_MODE, &cfg, actuators, CONSUMERS_TASK)
        .context("spawning consumer tasks")?;

    // ── 6. Network ────────────────────────────────────────────
    // Wi-Fi and HTTP are optional: on failure the button and the
    // Consumer Tasks keep running without them.
    if let Err(e) = serve_network(&cfg) {
        error!("network disabled: {:#}", e);
    }
    loop {
        std::thread::park();
    }
}

/// Bring up Wi-Fi, wait for the first link, start HTTP, then service
/// reconnects.  Only returns on error.
fn serve_network(cfg: &SystemConfig) -> Result<()> {
    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs_part = EspDefaultNvsPartition::take().ok();

    let mut wifi = WifiAdapter::new(peripherals.modem, sysloop, nvs_part, &LINK_STATUS)
        .map_err(ledtoggle::Error::from)?;
    wifi.start(&cfg.wifi).map_err(ledtoggle::Error::from)?;

    while !LINK_STATUS.read().connected {
        std::thread::sleep(LINK_POLL_INTERVAL);
        wifi.poll();
    }

    let _server = http::start(cfg.http.port, Routes::new(&LED_MODE, &LINK_STATUS))
        .context("starting HTTP server")?;

    info!("Boot complete");

    loop {
        std::thread::sleep(LINK_POLL_INTERVAL);
        wifi.poll();
    }
}
