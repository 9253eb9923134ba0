//! Tracked-Element Registry - Index allocation and lifecycle.
//!
//! Every element the engine animates is a `usize` index into this registry:
//! - Free index pool for O(1) reuse
//! - Registration sequence numbers (document order)
//! - Destroy callbacks registered per index, run on release
//!
//! Releasing an index synchronously runs its destroy callbacks and removes
//! its visibility subscriptions, so no observer or timer callback can fire
//! against disposed state.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::state::visibility;

// =============================================================================
// Registry State
// =============================================================================

thread_local! {
    /// Map from allocated index to its registration sequence number.
    static ALLOCATED: RefCell<HashMap<usize, u64>> = RefCell::new(HashMap::new());

    /// Pool of freed indices for reuse.
    static FREE_INDICES: RefCell<Vec<usize>> = RefCell::new(Vec::new());

    /// Next index to allocate if the pool is empty.
    static NEXT_INDEX: RefCell<usize> = const { RefCell::new(0) };

    /// Monotonic registration counter. Reused indices get a fresh number,
    /// so ordering always reflects the latest registration.
    static NEXT_SEQ: RefCell<u64> = const { RefCell::new(0) };

    /// Destroy callbacks registered per index.
    static DESTROY_CALLBACKS: RefCell<HashMap<usize, Vec<Box<dyn FnOnce()>>>> =
        RefCell::new(HashMap::new());
}

// =============================================================================
// Allocation
// =============================================================================

/// Allocate an index for a new tracked element.
///
/// Reuses a freed index when one is available, otherwise extends the range.
pub fn allocate_index() -> usize {
    let index = FREE_INDICES.with(|free| {
        let mut free = free.borrow_mut();
        if let Some(index) = free.pop() {
            index
        } else {
            NEXT_INDEX.with(|next| {
                let mut next = next.borrow_mut();
                let index = *next;
                *next += 1;
                index
            })
        }
    });

    let seq = NEXT_SEQ.with(|counter| {
        let mut counter = counter.borrow_mut();
        let seq = *counter;
        *counter += 1;
        seq
    });

    ALLOCATED.with(|map| {
        map.borrow_mut().insert(index, seq);
    });

    index
}

/// Release an index back to the pool.
///
/// Runs destroy callbacks first (pending timers, subscriptions), then drops
/// the element's visibility registrations. Releasing an unallocated index
/// is a no-op.
pub fn release_index(index: usize) {
    let removed = ALLOCATED.with(|map| map.borrow_mut().remove(&index));
    if removed.is_none() {
        return;
    }

    // Take callbacks out before running them so a callback can re-enter
    // the registry without hitting a live borrow.
    let callbacks = DESTROY_CALLBACKS.with(|map| map.borrow_mut().remove(&index));
    if let Some(callbacks) = callbacks {
        for callback in callbacks {
            callback();
        }
    }

    visibility::cleanup_index(index);

    FREE_INDICES.with(|free| {
        free.borrow_mut().push(index);
    });
}

/// Check whether an index is currently allocated.
pub fn is_allocated(index: usize) -> bool {
    ALLOCATED.with(|map| map.borrow().contains_key(&index))
}

/// Registration sequence number for an index.
///
/// Lower numbers registered earlier (document order). Returns None for
/// unallocated indices.
pub fn registration_order(index: usize) -> Option<u64> {
    ALLOCATED.with(|map| map.borrow().get(&index).copied())
}

/// Number of currently allocated indices.
pub fn allocated_count() -> usize {
    ALLOCATED.with(|map| map.borrow().len())
}

// =============================================================================
// Destroy Callbacks
// =============================================================================

/// Register a callback to run when the index is released.
///
/// Callbacks run in registration order. Registering against an unallocated
/// index is a no-op.
pub fn on_destroy(index: usize, callback: impl FnOnce() + 'static) {
    if !is_allocated(index) {
        return;
    }
    DESTROY_CALLBACKS.with(|map| {
        map.borrow_mut()
            .entry(index)
            .or_default()
            .push(Box::new(callback));
    });
}

// =============================================================================
// Reset
// =============================================================================

/// Reset the registry (for testing).
pub fn reset_registry() {
    ALLOCATED.with(|map| map.borrow_mut().clear());
    FREE_INDICES.with(|free| free.borrow_mut().clear());
    NEXT_INDEX.with(|next| *next.borrow_mut() = 0);
    NEXT_SEQ.with(|counter| *counter.borrow_mut() = 0);
    DESTROY_CALLBACKS.with(|map| map.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_registry();
        crate::state::visibility::reset_visibility_state();
    }

    #[test]
    fn test_allocate_sequential() {
        setup();

        assert_eq!(allocate_index(), 0);
        assert_eq!(allocate_index(), 1);
        assert_eq!(allocate_index(), 2);
        assert_eq!(allocated_count(), 3);
    }

    #[test]
    fn test_release_and_reuse() {
        setup();

        let a = allocate_index();
        let b = allocate_index();
        assert_eq!((a, b), (0, 1));

        release_index(a);
        assert!(!is_allocated(a));
        assert_eq!(allocated_count(), 1);

        // Freed index is reused
        let c = allocate_index();
        assert_eq!(c, a);
    }

    #[test]
    fn test_registration_order_monotonic() {
        setup();

        let a = allocate_index();
        let b = allocate_index();
        assert!(registration_order(a) < registration_order(b));

        // Reuse gets a fresh, later sequence number
        release_index(a);
        let c = allocate_index();
        assert_eq!(c, a);
        assert!(registration_order(c) > registration_order(b));
    }

    #[test]
    fn test_registration_order_unallocated() {
        setup();

        assert_eq!(registration_order(99), None);
    }

    #[test]
    fn test_on_destroy_runs_on_release() {
        setup();

        let ran = Rc::new(Cell::new(0));
        let ran_clone = ran.clone();

        let index = allocate_index();
        on_destroy(index, move || {
            ran_clone.set(ran_clone.get() + 1);
        });

        assert_eq!(ran.get(), 0);
        release_index(index);
        assert_eq!(ran.get(), 1);

        // Callbacks are consumed; a second release is a no-op
        release_index(index);
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn test_on_destroy_order() {
        setup();

        let log = Rc::new(RefCell::new(Vec::new()));
        let index = allocate_index();

        let log_a = log.clone();
        on_destroy(index, move || log_a.borrow_mut().push("a"));
        let log_b = log.clone();
        on_destroy(index, move || log_b.borrow_mut().push("b"));

        release_index(index);
        assert_eq!(*log.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_on_destroy_unallocated_noop() {
        setup();

        let ran = Rc::new(Cell::new(false));
        let ran_clone = ran.clone();
        on_destroy(42, move || ran_clone.set(true));

        // Nothing registered, nothing to run
        let index = allocate_index();
        release_index(index);
        assert!(!ran.get());
    }

    #[test]
    fn test_release_unallocated_noop() {
        setup();

        release_index(7);
        assert_eq!(allocated_count(), 0);
        // Free pool untouched: next allocation starts at 0
        assert_eq!(allocate_index(), 0);
    }

    #[test]
    fn test_reset_registry() {
        setup();

        allocate_index();
        allocate_index();
        reset_registry();

        assert_eq!(allocated_count(), 0);
        assert_eq!(allocate_index(), 0);
    }
}
