//! Timer Module - Host-pumped timer wheel for staggered reveals
//!
//! Stagger delays run outside the synchronous dispatch path, but the engine
//! owns no threads: the host event loop advances a logical clock by calling
//! `pump(now_ms)` once per frame, and due callbacks run then, in deadline
//! order (schedule order breaks ties).
//!
//! A scheduled callback may be superseded only by `cancel`; pumping past
//! several deadlines at once still fires every due callback exactly once.
//!
//! # Example
//!
//! ```ignore
//! use spark_motion::state::timer;
//!
//! let handle = timer::schedule(200, || println!("revealed"));
//!
//! // Host frame loop:
//! timer::pump(16);
//! timer::pump(216); // fires here
//! ```

use std::cell::RefCell;

// =============================================================================
// TIMER WHEEL
// =============================================================================

/// Handle returned by `schedule`, used to cancel a pending callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerHandle(u64);

struct TimerEntry {
    id: u64,
    deadline_ms: u64,
    callback: Box<dyn FnOnce()>,
}

struct TimerWheel {
    now_ms: u64,
    next_id: u64,
    entries: Vec<TimerEntry>,
}

impl TimerWheel {
    const fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            entries: Vec::new(),
        }
    }

    /// Index of the due entry with the earliest (deadline, id) pair.
    /// Ids are monotonic, so they double as the schedule-order tie-break.
    fn next_due(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.deadline_ms > self.now_ms {
                continue;
            }
            match best {
                None => best = Some(i),
                Some(j) => {
                    let current = (self.entries[j].deadline_ms, self.entries[j].id);
                    let candidate = (entry.deadline_ms, entry.id);
                    if candidate < current {
                        best = Some(i);
                    }
                }
            }
        }
        best
    }
}

thread_local! {
    static WHEEL: RefCell<TimerWheel> = const { RefCell::new(TimerWheel::new()) };
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Schedule a callback to run `delay_ms` after the current pumped time.
pub fn schedule(delay_ms: u64, callback: impl FnOnce() + 'static) -> TimerHandle {
    WHEEL.with(|wheel| {
        let mut wheel = wheel.borrow_mut();
        let id = wheel.next_id;
        wheel.next_id += 1;
        let deadline_ms = wheel.now_ms + delay_ms;
        wheel.entries.push(TimerEntry {
            id,
            deadline_ms,
            callback: Box::new(callback),
        });
        TimerHandle(id)
    })
}

/// Cancel a pending callback. Cancelling an already-fired or unknown
/// handle is a no-op.
pub fn cancel(handle: TimerHandle) {
    WHEEL.with(|wheel| {
        wheel
            .borrow_mut()
            .entries
            .retain(|entry| entry.id != handle.0);
    });
}

/// Advance the logical clock and run every due callback.
///
/// Callbacks run outside the wheel borrow, so they may schedule or cancel
/// further timers; a callback scheduled for a deadline at or before the
/// pumped time fires within the same pump.
pub fn pump(now_ms: u64) {
    WHEEL.with(|wheel| {
        let mut wheel = wheel.borrow_mut();
        // The clock never runs backwards
        if now_ms > wheel.now_ms {
            wheel.now_ms = now_ms;
        }
    });

    loop {
        let due = WHEEL.with(|wheel| {
            let mut wheel = wheel.borrow_mut();
            wheel.next_due().map(|i| wheel.entries.remove(i))
        });
        match due {
            Some(entry) => (entry.callback)(),
            None => break,
        }
    }
}

/// The last pumped time in milliseconds.
pub fn now_ms() -> u64 {
    WHEEL.with(|wheel| wheel.borrow().now_ms)
}

/// Number of callbacks still pending.
pub fn pending_count() -> usize {
    WHEEL.with(|wheel| wheel.borrow().entries.len())
}

/// Deadline of a pending timer, if it has not fired or been cancelled.
pub fn deadline_of(handle: TimerHandle) -> Option<u64> {
    WHEEL.with(|wheel| {
        wheel
            .borrow()
            .entries
            .iter()
            .find(|entry| entry.id == handle.0)
            .map(|entry| entry.deadline_ms)
    })
}

/// Reset the wheel: drop all pending callbacks and rewind the clock
/// (for testing).
pub fn reset_timer_state() {
    WHEEL.with(|wheel| {
        let mut wheel = wheel.borrow_mut();
        wheel.entries.clear();
        wheel.now_ms = 0;
        wheel.next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================
