//! Shared control state — the single value every execution context agrees on.
//!
//! ```text
//! ┌──────────────┐  StateWriter   ┌──────────────┐  StateReader   ┌──────────────┐
//! │ Button ISR   │───────────────▶│              │───────────────▶│ Fader        │
//! │ (IsrToggle)  │                │ ControlState │───────────────▶│ Reporter     │
//! │ HTTP handler │───────────────▶│  (AtomicU8)  │───────────────▶│ LevelFollower│
//! └──────────────┘                └──────────────┘                └──────────────┘
//! ```
//!
//! [`Mode`] fits in one byte, so [`ControlState`] is a bare `AtomicU8`:
//! readers can never observe a torn value and every operation is a single
//! lock-free instruction sequence, safe from interrupt context.
//!
//! State that does not fit in one word goes in a [`GuardedCell`], which
//! pairs it with a critical-section mutex (interrupts masked while held).

use core::cell::Cell;
use core::sync::atomic::{AtomicU8, Ordering};

use embassy_sync::blocking_mutex::CriticalSectionMutex;

// ═══════════════════════════════════════════════════════════════
//  Mode
// ═══════════════════════════════════════════════════════════════

/// Desired actuator mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Off = 0,
    On = 1,
}

impl Mode {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Off => Self::On,
            Self::On => Self::Off,
        }
    }

    pub const fn is_on(self) -> bool {
        matches!(self, Self::On)
    }

    /// Response token used by the toggle endpoint.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "Off",
            Self::On => "On",
        }
    }

    const fn from_raw(raw: u8) -> Self {
        // Only 0 and 1 are ever stored; bit 0 is authoritative.
        if raw & 1 == 0 { Self::Off } else { Self::On }
    }
}

impl core::fmt::Display for Mode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ═══════════════════════════════════════════════════════════════
//  ControlState
// ═══════════════════════════════════════════════════════════════

/// The process-wide mode cell.  Starts [`Mode::Off`] and is never reset.
///
/// Nothing reads or writes the cell directly: Event Sources receive a
/// [`StateWriter`], Consumer Tasks a [`StateReader`].
pub struct ControlState {
    raw: AtomicU8,
}

impl ControlState {
    pub const fn new() -> Self {
        Self {
            raw: AtomicU8::new(Mode::Off as u8),
        }
    }

    /// Read-only capability for Consumer Tasks.
    pub const fn reader(&self) -> StateReader<'_> {
        StateReader { state: self }
    }

    /// Write capability for Event Sources.
    pub const fn writer(&self) -> StateWriter<'_> {
        StateWriter { state: self }
    }
}

impl Default for ControlState {
    fn default() -> Self {
        Self::new()
    }
}

/// Read-only handle.  Never blocks, never fails.
#[derive(Clone, Copy)]
pub struct StateReader<'a> {
    state: &'a ControlState,
}

impl StateReader<'_> {
    pub fn read(&self) -> Mode {
        Mode::from_raw(self.state.raw.load(Ordering::Acquire))
    }
}

/// Write handle.  Every method is a single atomic operation with no
/// allocation, locking or logging, so it may be called from an ISR.
#[derive(Clone, Copy)]
pub struct StateWriter<'a> {
    state: &'a ControlState,
}

impl StateWriter<'_> {
    /// Overwrite the mode (last writer wins).  Returns the previous mode.
    #[inline]
    pub fn write(&self, mode: Mode) -> Mode {
        Mode::from_raw(self.state.raw.swap(mode as u8, Ordering::AcqRel))
    }

    /// Flip the mode and return the value this call produced.
    ///
    /// One read-modify-write: two racing toggles from different cores
    /// both land, and each caller gets back the value its own flip wrote.
    #[inline]
    pub fn toggle(&self) -> Mode {
        let prev = self.state.raw.fetch_xor(1, Ordering::AcqRel);
        Mode::from_raw(prev).toggled()
    }
}

// ═══════════════════════════════════════════════════════════════
//  GuardedCell — widened shared state
// ═══════════════════════════════════════════════════════════════

/// A `Copy` value wider than one bus word, shared across contexts.
///
/// Every access runs inside a critical section (interrupts masked), so the
/// lock is safe to take from an ISR and never blocks.  Keep `T` small: the
/// critical section lasts for the copy in or out.
pub struct GuardedCell<T: Copy> {
    inner: CriticalSectionMutex<Cell<T>>,
}

impl<T: Copy> GuardedCell<T> {
    pub const fn new(value: T) -> Self {
        Self {
            inner: CriticalSectionMutex::new(Cell::new(value)),
        }
    }

    pub fn read(&self) -> T {
        self.inner.lock(Cell::get)
    }

    pub fn write(&self, value: T) {
        self.inner.lock(|c| c.set(value));
    }

    /// Apply `f` to the current value atomically and return the new value.
    pub fn update(&self, f: impl FnOnce(T) -> T) -> T {
        self.inner.lock(|c| {
            let next = f(c.get());
            c.set(next);
            next
        })
    }
}

/// Network link status published by the Wi-Fi adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkStatus {
    pub connected: bool,
    pub ip: [u8; 4],
}

impl LinkStatus {
    pub const DOWN: Self = Self {
        connected: false,
        ip: [0; 4],
    };

    pub const fn up(ip: [u8; 4]) -> Self {
        Self { connected: true, ip }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Process-wide instances
// ═══════════════════════════════════════════════════════════════

/// LED mode shared by the button ISR, the HTTP toggle route and all
/// Consumer Tasks.
pub static LED_MODE: ControlState = ControlState::new();

/// Wi-Fi link status shared by the Wi-Fi event path and HTTP routes.
pub static LINK_STATUS: GuardedCell<LinkStatus> = GuardedCell::new(LinkStatus::DOWN);

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
