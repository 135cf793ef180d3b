//! Real-thread stress of the shared state primitives.

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use ledtoggle::state::{ControlState, GuardedCell, LinkStatus, Mode};

const WRITERS: usize = 4;
const TOGGLES_PER_WRITER: usize = 25_001;

/// Concurrent toggles are never lost: the final mode matches the parity
/// of the total number of toggles.
#[test]
fn concurrent_toggles_are_not_lost() {
    let state = ControlState::new();
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let readers: Vec<_> = (0..2)
            .map(|_| {
                s.spawn(|| {
                    let r = state.reader();
                    let mut seen = [0usize; 2];
                    while !done.load(Ordering::Acquire) {
                        match r.read() {
                            Mode::Off => seen[0] += 1,
                            Mode::On => seen[1] += 1,
                        }
                    }
                    seen
                })
            })
            .collect();

        let writers: Vec<_> = (0..WRITERS)
            .map(|_| {
                s.spawn(|| {
                    let w = state.writer();
                    for _ in 0..TOGGLES_PER_WRITER {
                        w.toggle();
                    }
                })
            })
            .collect();
        for h in writers {
            h.join().unwrap();
        }
        done.store(true, Ordering::Release);
        for h in readers {
            h.join().unwrap();
        }
    });

    let total = WRITERS * TOGGLES_PER_WRITER;
    let expected = if total % 2 == 1 { Mode::On } else { Mode::Off };
    assert_eq!(state.reader().read(), expected);
}

/// A multi-byte value behind a `GuardedCell` is never observed half-written.
#[test]
fn guarded_link_status_is_never_torn() {
    let cell = GuardedCell::new(LinkStatus::DOWN);
    let done = AtomicBool::new(false);

    thread::scope(|s| {
        let reader = s.spawn(|| {
            let mut reads = 0usize;
            while !done.load(Ordering::Acquire) {
                let v = cell.read();
                if v.connected {
                    assert!(v.ip[0] != 0);
                    assert!(v.ip.iter().all(|&b| b == v.ip[0]), "torn read: {:?}", v.ip);
                } else {
                    assert_eq!(v.ip, [0; 4], "torn read: {:?}", v);
                }
                reads += 1;
            }
            reads
        });

        s.spawn(|| {
            for i in 0..50_000u32 {
                let next = match i % 3 {
                    0 => LinkStatus::up([10; 4]),
                    1 => LinkStatus::up([172; 4]),
                    _ => LinkStatus::DOWN,
                };
                cell.write(next);
            }
            done.store(true, Ordering::Release);
        })
        .join()
        .unwrap();

        assert!(reader.join().unwrap() > 0);
    });
}
