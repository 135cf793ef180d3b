//! Host rendition of the boot sequence: NVS → config → Wi-Fi → HTTP routes.

use ledtoggle::adapters::http::Routes;
use ledtoggle::adapters::nvs::NvsAdapter;
use ledtoggle::adapters::wifi::{ConnectivityError, ConnectivityPort, WifiAdapter, WifiState};
use ledtoggle::app::ports::{ConfigPort, ConsumerTask};
use ledtoggle::app::sources::IsrToggle;
use ledtoggle::app::tasks::StatusReporter;
use ledtoggle::config::{SystemConfig, WifiConfig};
use ledtoggle::drivers::button::button_isr_handler;
use ledtoggle::state::{ControlState, GuardedCell, LinkStatus, Mode};

use crate::mock_hw::{MockUart, lines};

fn leak<T>(v: T) -> &'static T {
    Box::leak(Box::new(v))
}

#[test]
fn first_boot_then_reboot_keeps_saved_config() {
    let mut nvs = NvsAdapter::new().unwrap();
    let first = SystemConfig::load_or_default(&mut nvs);
    assert_eq!(first, SystemConfig::default());

    let mut tuned = first.clone();
    tuned.reporter.period_ms = 1000;
    nvs.save(&tuned).unwrap();

    assert_eq!(SystemConfig::load_or_default(&mut nvs), tuned);
}

#[test]
fn corrupt_blob_boots_with_defaults() {
    let mut nvs = NvsAdapter::new().unwrap();
    nvs.put_raw(b"\x00");
    assert_eq!(SystemConfig::load_or_default(&mut nvs), SystemConfig::default());
}

#[test]
fn state_route_tracks_link_and_toggles() {
    let state = leak(ControlState::new());
    let link = leak(GuardedCell::new(LinkStatus::DOWN));
    let routes = Routes::new(state, link);

    assert_eq!(
        routes.state().unwrap(),
        r#"{"led":"Off","connected":false,"ip":"0.0.0.0"}"#
    );

    let mut wifi = WifiAdapter::new(link);
    assert_eq!(wifi.connect(), Err(ConnectivityError::NoCredentials));
    wifi.set_credentials("Workshop", "hunter2hunter2").unwrap();
    wifi.connect().unwrap();

    assert_eq!(routes.toggle(), "On");
    assert_eq!(
        routes.state().unwrap(),
        r#"{"led":"On","connected":true,"ip":"192.168.4.2"}"#
    );

    wifi.disconnect();
    assert!(routes.state().unwrap().contains(r#""connected":false"#));
}

#[test]
fn button_and_http_share_the_global_mode() {
    use ledtoggle::state::{LED_MODE, LINK_STATUS};

    let routes = Routes::new(&LED_MODE, &LINK_STATUS);
    let before = LED_MODE.reader().read();
    button_isr_handler();
    let token = routes.toggle();
    assert_eq!(token, before.as_str(), "ISR edge + HTTP toggle cancel out");
    assert_eq!(LED_MODE.reader().read(), before);
}

#[test]
fn missing_credentials_leave_the_core_running() {
    let state = leak(ControlState::new());
    let link = leak(GuardedCell::new(LinkStatus::DOWN));
    let cfg = SystemConfig {
        wifi: WifiConfig {
            ssid: heapless::String::new(),
            password: heapless::String::new(),
        },
        ..SystemConfig::default()
    };
    // Stored config passes validation; only the Wi-Fi bring-up rejects it.
    cfg.validate().unwrap();

    let mut wifi = WifiAdapter::new(link);
    assert_eq!(wifi.start(&cfg.wifi), Err(ConnectivityError::InvalidSsid));
    wifi.poll();
    assert_eq!(wifi.state(), WifiState::Disconnected);
    assert_eq!(link.read(), LinkStatus::DOWN);

    let uart = MockUart::default();
    let bytes = uart.bytes.clone();
    let mut reporter = StatusReporter::new(state.reader(), uart, &cfg.reporter);
    reporter.step();
    IsrToggle::new(state.writer()).fire();
    reporter.step();

    assert_eq!(state.reader().read(), Mode::On);
    assert_eq!(lines(&bytes), ["LED is BLINKING", "LED is ON"]);
}
