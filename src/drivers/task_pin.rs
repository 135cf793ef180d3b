//! Core-pinned thread spawning for ESP32 dual-core.
//!
//! Wraps `esp_pthread_set_cfg()` so that `std::thread::spawn` creates a
//! FreeRTOS task pinned to a specific CPU core with explicit priority
//! and stack size.  On non-ESP targets, falls back to plain thread spawn.
//!
//! `esp_pthread_set_cfg()` sets thread-local configuration that applies to
//! the *next* `pthread_create()` from the calling thread, so the
//! config→spawn pair must not be interleaved with other thread creation on
//! the same thread.

use std::io;
use std::thread::JoinHandle;

/// CPU core identifiers for the ESP32 Xtensa LX6 dual-core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Core {
    /// Core 0 (PRO_CPU) — protocol stacks (WiFi, lwIP, httpd).
    Pro = 0,
    /// Core 1 (APP_CPU) — Consumer Tasks.
    App = 1,
}

/// Placement of one spawned thread.
#[derive(Debug, Clone, Copy)]
pub struct TaskSpec {
    /// Null-terminated (e.g. `"consumers\0"`); the terminator is stripped
    /// for the Rust thread name.
    pub name: &'static str,
    pub core: Core,
    pub priority: u8,
    pub stack_kb: usize,
}

impl TaskSpec {
    fn display_name(&self) -> &'static str {
        self.name.trim_end_matches('\0')
    }
}

/// Spawn a thread pinned according to `placement`.
#[cfg(target_os = "espidf")]
pub fn spawn_on_core(
    placement: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    // SAFETY: `cfg` is fully initialised from the IDF default and
    // `placement.name` is 'static and null-terminated.
    let ret = unsafe {
        let mut cfg = esp_idf_sys::esp_create_default_pthread_config();
        cfg.pin_to_core = placement.core as i32;
        cfg.prio = i32::from(placement.priority);
        cfg.stack_size = (placement.stack_kb * 1024) as i32;
        cfg.thread_name = placement.name.as_ptr().cast();
        esp_idf_sys::esp_pthread_set_cfg(&cfg)
    };
    if ret != esp_idf_sys::ESP_OK as i32 {
        return Err(io::Error::other(format!("esp_pthread_set_cfg failed: {ret}")));
    }

    log::info!(
        "Spawning '{}' on {:?} (pri={}, stack={}KB)",
        placement.display_name(),
        placement.core,
        placement.priority,
        placement.stack_kb
    );

    std::thread::Builder::new()
        .name(placement.display_name().into())
        .spawn(f)
}

/// Simulation fallback — ignores core affinity and priority.
#[cfg(not(target_os = "espidf"))]
pub fn spawn_on_core(
    placement: TaskSpec,
    f: impl FnOnce() + Send + 'static,
) -> io::Result<JoinHandle<()>> {
    log::info!(
        "Spawning '{}' (sim, no core pinning, stack={}KB)",
        placement.display_name(),
        placement.stack_kb
    );

    std::thread::Builder::new()
        .name(placement.display_name().into())
        .stack_size(placement.stack_kb * 1024)
        .spawn(f)
}
