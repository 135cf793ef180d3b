//! Adapters — concrete implementations of the port traits and network glue.
//!
//! | Adapter | Implements       | Connects to               |
//! |---------|------------------|---------------------------|
//! | `http`  | Event Source     | ESP-IDF httpd             |
//! | `nvs`   | ConfigPort       | NVS / in-memory store     |
//! | `wifi`  | ConnectivityPort | ESP-IDF WiFi STA          |

pub mod http;
pub mod nvs;
pub mod wifi;
