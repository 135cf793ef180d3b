//! WiFi station-mode adapter.
//!
//! Implements [`ConnectivityPort`] and publishes every link change into a
//! [`GuardedCell<LinkStatus>`] so the HTTP `/state` route can report it
//! without touching the driver.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: `esp_idf_svc::wifi::BlockingWifi` over `EspWifi`.
//! - **all other targets**: simulation stubs for host-side tests.
//!
//! ## Reconnection policy
//!
//! On disconnect the adapter waits an exponential backoff (2 s → 4 s →
//! 8 s … capped at 60 s) between attempts.  `poll()` is expected every
//! 500 ms from the boot loop.

use core::fmt;
use core::time::Duration;
use log::{error, info, warn};

use crate::config::WifiConfig;
use crate::state::{GuardedCell, LinkStatus};

#[cfg(target_os = "espidf")]
use esp_idf_svc::{
    eventloop::EspSystemEventLoop,
    hal::modem::Modem,
    nvs::EspDefaultNvsPartition,
    wifi::{AuthMethod, BlockingWifi, ClientConfiguration, Configuration, EspWifi},
};

// ───────────────────────────────────────────────────────────────
// Port trait
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityError {
    NoCredentials,
    InvalidSsid,
    InvalidPassword,
    ConnectionFailed,
    AlreadyConnected,
    DriverInitFailed,
}

impl fmt::Display for ConnectivityError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCredentials => write!(f, "no WiFi credentials configured"),
            Self::InvalidSsid => write!(f, "SSID invalid (must be 1-32 printable ASCII bytes)"),
            Self::InvalidPassword => write!(
                f,
                "password invalid (must be 8-64 bytes for WPA2, or empty for open)"
            ),
            Self::ConnectionFailed => write!(f, "WiFi connection failed"),
            Self::AlreadyConnected => write!(f, "already connected to AP"),
            Self::DriverInitFailed => write!(f, "WiFi driver initialisation failed"),
        }
    }
}

pub trait ConnectivityPort {
    fn connect(&mut self) -> Result<(), ConnectivityError>;
    fn disconnect(&mut self);
    fn is_connected(&self) -> bool;
    fn poll(&mut self);
    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError>;
}

// ───────────────────────────────────────────────────────────────
// Connection state
// ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiState {
    Disconnected,
    Connecting,
    Connected,
    Reconnecting { attempt: u32 },
}

/// Boot-loop cadence while waiting for the link.
pub const LINK_POLL_INTERVAL: Duration = Duration::from_millis(500);

const INITIAL_BACKOFF_SECS: u32 = 2;
const MAX_BACKOFF_SECS: u32 = 60;
const POLLS_PER_SEC: u32 = 2;

// ───────────────────────────────────────────────────────────────
// Validation
// ───────────────────────────────────────────────────────────────

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}

fn validate_ssid(ssid: &str) -> Result<(), ConnectivityError> {
    if ssid.is_empty() || ssid.len() > 32 {
        return Err(ConnectivityError::InvalidSsid);
    }
    if !is_printable_ascii(ssid) {
        return Err(ConnectivityError::InvalidSsid);
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ConnectivityError> {
    if password.is_empty() {
        return Ok(());
    }
    if password.len() < 8 || password.len() > 64 {
        return Err(ConnectivityError::InvalidPassword);
    }
    Ok(())
}

// ───────────────────────────────────────────────────────────────
// WiFi adapter
// ───────────────────────────────────────────────────────────────

pub struct WifiAdapter {
    state: WifiState,
    ssid: heapless::String<32>,
    password: heapless::String<64>,
    link: &'static GuardedCell<LinkStatus>,
    backoff_secs: u32,
    /// Polls left before the next reconnect attempt.
    backoff_polls: u32,
    #[cfg(target_os = "espidf")]
    wifi: BlockingWifi<EspWifi<'static>>,
    /// Simulation: number of upcoming platform_connect() calls that fail.
    #[cfg(not(target_os = "espidf"))]
    sim_failures: u32,
    #[cfg(not(target_os = "espidf"))]
    sim_connect_counter: u32,
}

impl WifiAdapter {
    #[cfg(target_os = "espidf")]
    pub fn new(
        modem: Modem,
        sysloop: EspSystemEventLoop,
        nvs: Option<EspDefaultNvsPartition>,
        link: &'static GuardedCell<LinkStatus>,
    ) -> Result<Self, ConnectivityError> {
        let driver = EspWifi::new(modem, sysloop.clone(), nvs).map_err(|e| {
            error!("WiFi: EspWifi::new failed: {}", e);
            ConnectivityError::DriverInitFailed
        })?;
        let wifi = BlockingWifi::wrap(driver, sysloop).map_err(|e| {
            error!("WiFi: BlockingWifi::wrap failed: {}", e);
            ConnectivityError::DriverInitFailed
        })?;
        link.write(LinkStatus::DOWN);
        Ok(Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            link,
            backoff_secs: INITIAL_BACKOFF_SECS,
            backoff_polls: 0,
            wifi,
        })
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn new(link: &'static GuardedCell<LinkStatus>) -> Self {
        link.write(LinkStatus::DOWN);
        Self {
            state: WifiState::Disconnected,
            ssid: heapless::String::new(),
            password: heapless::String::new(),
            link,
            backoff_secs: INITIAL_BACKOFF_SECS,
            backoff_polls: 0,
            sim_failures: 0,
            sim_connect_counter: 0,
        }
    }

    /// Apply the credentials from `cfg`.
    pub fn configure(&mut self, cfg: &WifiConfig) -> Result<(), ConnectivityError> {
        self.set_credentials(cfg.ssid.as_str(), cfg.password.as_str())
    }

    /// Apply `cfg` and make the first connection attempt.
    ///
    /// Only a credential error is returned.  A failed attempt leaves the
    /// adapter in `Reconnecting` for `poll()` to retry.
    pub fn start(&mut self, cfg: &WifiConfig) -> Result<(), ConnectivityError> {
        self.configure(cfg)?;
        if let Err(e) = self.connect() {
            warn!("WiFi: initial connect failed ({}), retrying in background", e);
        }
        Ok(())
    }

    pub fn state(&self) -> WifiState {
        self.state
    }

    pub fn backoff_secs(&self) -> u32 {
        self.backoff_secs
    }

    /// Make the next `n` simulated connection attempts fail.
    #[cfg(not(target_os = "espidf"))]
    pub fn fail_next_attempts(&mut self, n: u32) {
        self.sim_failures = n;
    }

    fn on_connected(&mut self, ip: [u8; 4]) {
        self.state = WifiState::Connected;
        self.backoff_secs = INITIAL_BACKOFF_SECS;
        self.backoff_polls = 0;
        self.link.write(LinkStatus::up(ip));
        info!("WiFi: connected, IP {}.{}.{}.{}", ip[0], ip[1], ip[2], ip[3]);
    }

    fn on_link_lost(&mut self) {
        self.link.write(LinkStatus::DOWN);
        self.state = WifiState::Reconnecting { attempt: 0 };
        self.backoff_polls = self.backoff_secs * POLLS_PER_SEC;
    }

    // ── Platform-specific ─────────────────────────────────────

    #[cfg(target_os = "espidf")]
    fn platform_connect(&mut self) -> Result<[u8; 4], ConnectivityError> {
        let auth_method = if self.password.is_empty() {
            AuthMethod::None
        } else {
            AuthMethod::WPA2Personal
        };
        let client = ClientConfiguration {
            ssid: self.ssid.clone(),
            password: self.password.clone(),
            auth_method,
            ..Default::default()
        };

        let failed = |e: esp_idf_svc::sys::EspError| {
            warn!("WiFi(espidf): {}", e);
            ConnectivityError::ConnectionFailed
        };
        self.wifi
            .set_configuration(&Configuration::Client(client))
            .map_err(failed)?;
        if !self.wifi.is_started().map_err(failed)? {
            self.wifi.start().map_err(failed)?;
        }
        self.wifi.connect().map_err(failed)?;
        self.wifi.wait_netif_up().map_err(failed)?;

        let ip_info = self.wifi.wifi().sta_netif().get_ip_info().map_err(failed)?;
        Ok(ip_info.ip.octets())
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_connect(&mut self) -> Result<[u8; 4], ConnectivityError> {
        self.sim_connect_counter = self.sim_connect_counter.wrapping_add(1);
        if self.sim_failures > 0 {
            self.sim_failures -= 1;
            warn!(
                "WiFi(sim): simulated association failure (attempt {})",
                self.sim_connect_counter
            );
            return Err(ConnectivityError::ConnectionFailed);
        }
        info!(
            "WiFi(sim): connected to '{}' (attempt {})",
            self.ssid, self.sim_connect_counter
        );
        Ok([192, 168, 4, 2])
    }

    #[cfg(target_os = "espidf")]
    fn platform_disconnect(&mut self) {
        if let Err(e) = self.wifi.disconnect() {
            warn!("WiFi(espidf): disconnect failed: {}", e);
        }
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_disconnect(&mut self) {
        info!("WiFi(sim): disconnected");
    }

    #[cfg(target_os = "espidf")]
    fn platform_is_connected(&self) -> bool {
        self.wifi.is_connected().unwrap_or(false)
    }

    #[cfg(not(target_os = "espidf"))]
    fn platform_is_connected(&self) -> bool {
        self.state == WifiState::Connected
    }
}

// ───────────────────────────────────────────────────────────────
// ConnectivityPort
// ───────────────────────────────────────────────────────────────

impl ConnectivityPort for WifiAdapter {
    fn connect(&mut self) -> Result<(), ConnectivityError> {
        if self.ssid.is_empty() {
            return Err(ConnectivityError::NoCredentials);
        }
        if self.state == WifiState::Connected {
            return Err(ConnectivityError::AlreadyConnected);
        }

        info!("WiFi: connecting to '{}'", self.ssid);
        self.state = WifiState::Connecting;

        match self.platform_connect() {
            Ok(ip) => {
                self.on_connected(ip);
                Ok(())
            }
            Err(e) => {
                error!("WiFi: connection failed: {}", e);
                self.on_link_lost();
                Err(e)
            }
        }
    }

    fn disconnect(&mut self) {
        self.platform_disconnect();
        self.state = WifiState::Disconnected;
        self.link.write(LinkStatus::DOWN);
        info!("WiFi: disconnected");
    }

    fn is_connected(&self) -> bool {
        self.state == WifiState::Connected && self.platform_is_connected()
    }

    fn poll(&mut self) {
        match self.state {
            WifiState::Reconnecting { attempt } => {
                if self.backoff_polls > 0 {
                    self.backoff_polls -= 1;
                    return;
                }
                info!(
                    "WiFi: reconnect attempt {} (backoff {}s)",
                    attempt, self.backoff_secs
                );
                match self.platform_connect() {
                    Ok(ip) => self.on_connected(ip),
                    Err(_) => {
                        self.backoff_secs = (self.backoff_secs * 2).min(MAX_BACKOFF_SECS);
                        self.backoff_polls = self.backoff_secs * POLLS_PER_SEC;
                        self.state = WifiState::Reconnecting {
                            attempt: attempt + 1,
                        };
                    }
                }
            }
            WifiState::Connected => {
                if !self.platform_is_connected() {
                    warn!("WiFi: connection lost, entering reconnect");
                    self.on_link_lost();
                }
            }
            _ => {}
        }
    }

    fn set_credentials(&mut self, ssid: &str, password: &str) -> Result<(), ConnectivityError> {
        validate_ssid(ssid)?;
        validate_password(password)?;
        self.ssid.clear();
        self.ssid
            .push_str(ssid)
            .map_err(|()| ConnectivityError::InvalidSsid)?;
        self.password.clear();
        self.password
            .push_str(password)
            .map_err(|()| ConnectivityError::InvalidPassword)?;
        info!("WiFi: credentials updated (SSID='{}')", self.ssid);
        Ok(())
    }
}

// ───────────────────────────────────────────────────────────────
// Tests
// ───────────────────────────────────────────────────────────────
