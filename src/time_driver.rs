//! Tick source and wake scheduler behind `async_io_mini::Timer`.
//!
//! async-io-mini reads time through the `embassy-time-driver` symbols
//! `_embassy_time_now` / `_embassy_time_schedule_wake`.  Ticks are
//! microseconds (the driver's default 1 MHz rate): `esp_timer_get_time` on
//! target, a process-local `Instant` epoch on host.
//!
//! Pending wakes live in one deadline-ordered heap serviced by a single
//! `timer-wake` thread, started on first use.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::{Condvar, Mutex, MutexGuard, Once, PoisonError};
use std::task::Waker;
use std::time::Duration;

use log::error;

const WAKE_THREAD_STACK: usize = 4096;

struct Pending {
    at: u64,
    waker: Waker,
}

// Reversed on `at` so the max-heap pops the earliest deadline.
impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        other.at.cmp(&self.at)
    }
}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.at == other.at
    }
}

impl Eq for Pending {}

static PENDING: Mutex<BinaryHeap<Pending>> = Mutex::new(BinaryHeap::new());
static CHANGED: Condvar = Condvar::new();
static WAKE_THREAD: Once = Once::new();

fn pending() -> MutexGuard<'static, BinaryHeap<Pending>> {
    PENDING.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Current tick count (microseconds).
#[cfg(target_os = "espidf")]
#[unsafe(no_mangle)]
pub fn _embassy_time_now() -> u64 {
    unsafe { esp_idf_svc::sys::esp_timer_get_time() as u64 }
}

/// Current tick count (microseconds since first use).
#[cfg(not(target_os = "espidf"))]
#[unsafe(no_mangle)]
pub fn _embassy_time_now() -> u64 {
    use std::sync::OnceLock;
    use std::time::Instant;

    static EPOCH: OnceLock<Instant> = OnceLock::new();
    EPOCH.get_or_init(Instant::now).elapsed().as_micros() as u64
}

/// Wake `waker` once the tick count reaches `at`.
#[unsafe(no_mangle)]
pub fn _embassy_time_schedule_wake(at: u64, waker: &Waker) {
    WAKE_THREAD.call_once(|| {
        if let Err(e) = std::thread::Builder::new()
            .name("timer-wake".into())
            .stack_size(WAKE_THREAD_STACK)
            .spawn(wake_loop)
        {
            error!("timer: wake thread spawn failed: {}", e);
        }
    });

    pending().push(Pending {
        at,
        waker: waker.clone(),
    });
    CHANGED.notify_one();
}

fn wake_loop() {
    let mut due = Vec::new();
    let mut heap = pending();
    loop {
        let now = _embassy_time_now();
        while heap.peek().is_some_and(|p| p.at <= now) {
            if let Some(p) = heap.pop() {
                due.push(p.waker);
            }
        }

        if !due.is_empty() {
            drop(heap);
            for waker in due.drain(..) {
                waker.wake();
            }
            heap = pending();
            continue;
        }

        heap = match heap.peek().map(|p| p.at - now) {
            Some(wait) => {
                CHANGED
                    .wait_timeout(heap, Duration::from_micros(wait))
                    .unwrap_or_else(PoisonError::into_inner)
                    .0
            }
            None => CHANGED.wait(heap).unwrap_or_else(PoisonError::into_inner),
        };
    }
}
