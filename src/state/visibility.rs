//! Visibility Module - Intersection subscriptions and dispatch
//!
//! Subscription registry for viewport intersection events.
//! Does NOT own a platform observer: a platform adapter pushes raw
//! intersection booleans in via `dispatch`, and watch hooks let the adapter
//! mirror registrations onto whatever intersection primitive it wraps.
//!
//! # API
//!
//! - `observe(index, options, on_change)` - Subscribe to an element's stream
//! - `dispatch(index, is_intersecting)` - Push a platform intersection event
//! - `register_watch_hooks(hooks)` - Adapter-side watch/unwatch mirroring
//! - `set_probe_available(false)` - Fail-open when the platform primitive is missing
//!
//! # Example
//!
//! ```ignore
//! use spark_motion::state::visibility;
//!
//! let cleanup = visibility::observe(index, ObserveOptions::default(), |seen| {
//!     println!("intersecting: {}", seen);
//! });
//!
//! // Platform adapter, on each intersection callback:
//! visibility::dispatch(index, true);
//!
//! // On unmount:
//! cleanup();
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

// =============================================================================
// TYPES
// =============================================================================

/// Options for one intersection subscription.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserveOptions {
    /// Fraction of the element that must overlap the viewport to count as
    /// intersecting, in [0,1].
    pub threshold: f32,
    /// Signed pixel inset applied to the viewport bounds before intersection
    /// is computed. Negative values shrink the viewport (later triggering),
    /// positive values grow it (earlier triggering).
    pub root_margin: f32,
    /// If true, Visible is terminal: Hidden events after the first Visible
    /// are suppressed and the subscription is dropped to save resources.
    pub once: bool,
}

impl Default for ObserveOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: 0.0,
            once: true,
        }
    }
}

/// Adapter hooks mirroring subscriptions onto a platform intersection
/// primitive. `on_watch` fires when an element gains its first subscription,
/// `on_unwatch` when it loses its last.
#[derive(Clone)]
pub struct WatchHooks {
    pub on_watch: Rc<dyn Fn(usize, &ObserveOptions)>,
    pub on_unwatch: Rc<dyn Fn(usize)>,
}

// =============================================================================
// SUBSCRIPTION REGISTRY
// =============================================================================

struct Subscription {
    id: usize,
    options: ObserveOptions,
    on_change: Box<dyn Fn(bool)>,
    /// Set after the first intersecting event; with `once` this suppresses
    /// every later event and retires the subscription.
    seen_visible: bool,
    /// Tombstone shared with the cleanup closure, so a cleanup that runs
    /// while this subscription is mid-dispatch still takes effect.
    dead: Rc<Cell<bool>>,
}

thread_local! {
    static SUBSCRIPTIONS: RefCell<HashMap<usize, Vec<Subscription>>> =
        RefCell::new(HashMap::new());

    static NEXT_SUB_ID: RefCell<usize> = const { RefCell::new(0) };

    /// Whether the platform intersection primitive exists. When false,
    /// observe() fails open: every subscription fires Visible immediately.
    static PROBE_AVAILABLE: Cell<bool> = const { Cell::new(true) };

    static WATCH_HOOKS: RefCell<Option<WatchHooks>> = const { RefCell::new(None) };
}

// =============================================================================
// AVAILABILITY
// =============================================================================

/// Report whether the platform intersection primitive is available.
///
/// Defaults to true. Set to false by the platform adapter when the
/// primitive is missing; from then on content fails open to visible
/// rather than staying permanently hidden.
pub fn set_probe_available(available: bool) {
    PROBE_AVAILABLE.with(|flag| flag.set(available));
}

/// Check whether the platform intersection primitive is available.
pub fn probe_available() -> bool {
    PROBE_AVAILABLE.with(|flag| flag.get())
}

// =============================================================================
// WATCH HOOKS
// =============================================================================

/// Register adapter hooks. Returns a cleanup function that unregisters them.
///
/// Only one set of hooks is active at a time; registering replaces the
/// previous set.
pub fn register_watch_hooks(hooks: WatchHooks) -> impl FnOnce() {
    WATCH_HOOKS.with(|slot| {
        *slot.borrow_mut() = Some(hooks);
    });

    move || {
        WATCH_HOOKS.with(|slot| {
            *slot.borrow_mut() = None;
        });
    }
}

fn fire_watch(index: usize, options: &ObserveOptions) {
    let hook = WATCH_HOOKS.with(|slot| slot.borrow().as_ref().map(|h| h.on_watch.clone()));
    if let Some(hook) = hook {
        hook(index, options);
    }
}

fn fire_unwatch(index: usize) {
    let hook = WATCH_HOOKS.with(|slot| slot.borrow().as_ref().map(|h| h.on_unwatch.clone()));
    if let Some(hook) = hook {
        hook(index);
    }
}

// =============================================================================
// OBSERVE
// =============================================================================

/// Subscribe to an element's intersection stream. Returns a cleanup function.
///
/// The callback receives the raw intersecting boolean for every dispatched
/// event, filtered by the `once` rule. If the platform primitive is
/// unavailable the callback fires `true` immediately and nothing is
/// registered (fail-open).
pub fn observe(
    index: usize,
    options: ObserveOptions,
    on_change: impl Fn(bool) + 'static,
) -> impl FnOnce() {
    let dead = Rc::new(Cell::new(false));

    if !probe_available() {
        // Fail-open: content must never stay permanently hidden.
        on_change(true);
        let dead_clone = dead.clone();
        return Box::new(move || {
            dead_clone.set(true);
        }) as Box<dyn FnOnce()>;
    }

    let id = NEXT_SUB_ID.with(|counter| {
        let mut counter = counter.borrow_mut();
        let id = *counter;
        *counter += 1;
        id
    });

    let first_for_index = SUBSCRIPTIONS.with(|map| {
        let mut map = map.borrow_mut();
        let subs = map.entry(index).or_default();
        let first = subs.is_empty();
        subs.push(Subscription {
            id,
            options,
            on_change: Box::new(on_change),
            seen_visible: false,
            dead: dead.clone(),
        });
        first
    });

    if first_for_index {
        fire_watch(index, &options);
    }

    let dead_clone = dead.clone();
    Box::new(move || {
        dead_clone.set(true);
        remove_subscription(index, id);
    }) as Box<dyn FnOnce()>
}

fn remove_subscription(index: usize, id: usize) {
    let now_empty = SUBSCRIPTIONS.with(|map| {
        let mut map = map.borrow_mut();
        let Some(subs) = map.get_mut(&index) else {
            return false;
        };
        subs.retain(|sub| sub.id != id);
        if subs.is_empty() {
            map.remove(&index);
            true
        } else {
            false
        }
    });

    if now_empty {
        fire_unwatch(index);
    }
}

/// Number of live subscriptions for an element.
pub fn observer_count(index: usize) -> usize {
    SUBSCRIPTIONS.with(|map| map.borrow().get(&index).map(|subs| subs.len()).unwrap_or(0))
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a platform intersection event to an element's subscriptions.
///
/// Dispatching against an unknown or disposed index is a no-op. `once`
/// subscriptions that have seen Visible are retired after delivery, and the
/// unwatch hook fires when the element loses its last subscription.
pub fn dispatch(index: usize, is_intersecting: bool) {
    // Take the element's subscriptions out of the registry before invoking
    // callbacks, so handlers can observe/cleanup without hitting a live
    // borrow. Subscriptions added re-entrantly are merged back afterwards.
    let mut subs = SUBSCRIPTIONS
        .with(|map| map.borrow_mut().remove(&index))
        .unwrap_or_default();
    if subs.is_empty() {
        return;
    }

    for sub in subs.iter_mut() {
        if sub.dead.get() {
            continue;
        }
        if sub.options.once && sub.seen_visible {
            // Visible is terminal: later events are suppressed.
            continue;
        }
        if is_intersecting {
            sub.seen_visible = true;
        }
        (sub.on_change)(is_intersecting);
    }

    let mut kept: Vec<Subscription> = subs
        .into_iter()
        .filter(|sub| !sub.dead.get() && !(sub.options.once && sub.seen_visible))
        .collect();

    let now_empty = SUBSCRIPTIONS.with(|map| {
        let mut map = map.borrow_mut();
        if let Some(mut newer) = map.remove(&index) {
            kept.append(&mut newer);
        }
        if kept.is_empty() {
            true
        } else {
            map.insert(index, kept);
            false
        }
    });

    if now_empty {
        fire_unwatch(index);
    }
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Drop every subscription for an element index.
/// Called when the element is released to prevent stale callbacks.
pub fn cleanup_index(index: usize) {
    let had_subs = SUBSCRIPTIONS.with(|map| {
        let mut map = map.borrow_mut();
        match map.remove(&index) {
            Some(subs) => {
                for sub in &subs {
                    sub.dead.set(true);
                }
                true
            }
            None => false,
        }
    });

    if had_subs {
        fire_unwatch(index);
    }
}

/// Reset all visibility state (for testing).
pub fn reset_visibility_state() {
    SUBSCRIPTIONS.with(|map| map.borrow_mut().clear());
    NEXT_SUB_ID.with(|counter| *counter.borrow_mut() = 0);
    PROBE_AVAILABLE.with(|flag| flag.set(true));
    WATCH_HOOKS.with(|slot| *slot.borrow_mut() = None);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn setup() {
        reset_visibility_state();
    }

    #[test]
    fn test_observe_receives_events() {
        setup();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let _cleanup = observe(0, ObserveOptions { once: false, ..Default::default() }, move |v| {
            seen_clone.borrow_mut().push(v);
        });

        dispatch(0, true);
        dispatch(0, false);
        dispatch(0, true);

        assert_eq!(*seen.borrow(), vec![true, false, true]);
    }

    #[test]
    fn test_once_suppresses_after_first_visible() {
        setup();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let _cleanup = observe(0, ObserveOptions::default(), move |v| {
            seen_clone.borrow_mut().push(v);
        });

        dispatch(0, false);
        dispatch(0, true);
        dispatch(0, false);
        dispatch(0, true);

        // Hidden before first Visible is delivered; everything after the
        // first Visible is suppressed.
        assert_eq!(*seen.borrow(), vec![false, true]);
    }

    #[test]
    fn test_once_subscription_retired_after_visible() {
        setup();

        let _cleanup = observe(0, ObserveOptions::default(), |_| {});
        assert_eq!(observer_count(0), 1);

        dispatch(0, true);
        assert_eq!(observer_count(0), 0);
    }

    #[test]
    fn test_dispatch_unknown_index_noop() {
        setup();

        // Nothing registered: must not panic or fire anything
        dispatch(42, true);
    }

    #[test]
    fn test_cleanup_stops_delivery() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup = observe(0, ObserveOptions { once: false, ..Default::default() }, move |_| {
            count_clone.set(count_clone.get() + 1);
        });

        dispatch(0, true);
        assert_eq!(count.get(), 1);

        cleanup();
        assert_eq!(observer_count(0), 0);

        dispatch(0, true);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_fail_open_when_probe_unavailable() {
        setup();
        set_probe_available(false);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();

        let cleanup = observe(0, ObserveOptions::default(), move |v| {
            seen_clone.borrow_mut().push(v);
        });

        // Fired true immediately, nothing registered
        assert_eq!(*seen.borrow(), vec![true]);
        assert_eq!(observer_count(0), 0);

        // Cleanup is safe to call
        cleanup();
    }

    #[test]
    fn test_watch_hooks_fire_on_first_and_last() {
        setup();

        let watched = Rc::new(Cell::new(0));
        let unwatched = Rc::new(Cell::new(0));
        let watched_clone = watched.clone();
        let unwatched_clone = unwatched.clone();

        let _hooks_cleanup = register_watch_hooks(WatchHooks {
            on_watch: Rc::new(move |_, _| watched_clone.set(watched_clone.get() + 1)),
            on_unwatch: Rc::new(move |_| unwatched_clone.set(unwatched_clone.get() + 1)),
        });

        let opts = ObserveOptions { once: false, ..Default::default() };
        let cleanup_a = observe(0, opts, |_| {});
        let cleanup_b = observe(0, opts, |_| {});

        // Only the first subscription watches
        assert_eq!(watched.get(), 1);

        cleanup_a();
        assert_eq!(unwatched.get(), 0);

        cleanup_b();
        assert_eq!(unwatched.get(), 1);
    }

    #[test]
    fn test_unwatch_fires_when_once_retires_last() {
        setup();

        let unwatched = Rc::new(Cell::new(0));
        let unwatched_clone = unwatched.clone();

        let _hooks_cleanup = register_watch_hooks(WatchHooks {
            on_watch: Rc::new(|_, _| {}),
            on_unwatch: Rc::new(move |_| unwatched_clone.set(unwatched_clone.get() + 1)),
        });

        let _cleanup = observe(0, ObserveOptions::default(), |_| {});
        dispatch(0, true);

        assert_eq!(observer_count(0), 0);
        assert_eq!(unwatched.get(), 1);
    }

    #[test]
    fn test_cleanup_index_tombstones() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let _cleanup = observe(0, ObserveOptions { once: false, ..Default::default() }, move |_| {
            count_clone.set(count_clone.get() + 1);
        });

        cleanup_index(0);
        dispatch(0, true);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_cleanup_during_dispatch() {
        setup();

        // The first handler disposes the second element mid-dispatch of its
        // own index; the tombstone keeps delivery consistent.
        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();

        let cleanup_cell: Rc<RefCell<Option<Box<dyn FnOnce()>>>> =
            Rc::new(RefCell::new(None));

        let cleanup_inner = cleanup_cell.clone();
        let _cleanup_a = observe(0, ObserveOptions { once: false, ..Default::default() }, move |_| {
            if let Some(cleanup) = cleanup_inner.borrow_mut().take() {
                cleanup();
            }
        });

        let cleanup_b = observe(0, ObserveOptions { once: false, ..Default::default() }, move |_| {
            count_clone.set(count_clone.get() + 1);
        });
        *cleanup_cell.borrow_mut() = Some(Box::new(cleanup_b));

        dispatch(0, true);
        // b was cleaned up by a's handler before its own delivery
        assert_eq!(count.get(), 0);

        dispatch(0, true);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn test_multiple_elements_independent() {
        setup();

        let a = Rc::new(Cell::new(0));
        let b = Rc::new(Cell::new(0));
        let a_clone = a.clone();
        let b_clone = b.clone();

        let opts = ObserveOptions { once: false, ..Default::default() };
        let _ca = observe(0, opts, move |_| a_clone.set(a_clone.get() + 1));
        let _cb = observe(1, opts, move |_| b_clone.set(b_clone.get() + 1));

        dispatch(0, true);
        dispatch(0, false);
        dispatch(1, true);

        assert_eq!(a.get(), 2);
        assert_eq!(b.get(), 1);
    }
}
