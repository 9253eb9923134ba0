//! Scroll Module - Process-wide scroll signal and per-range progress
//!
//! One platform listener samples the scroll offset and publishes it here;
//! every consumer reads the published value. Progress is derived per
//! reference range:
//!
//! - Document mode: offset / scrollable height, clamped to [0,1]
//! - Element mode: 0 when the element's leading edge enters the viewport's
//!   trailing edge, 1 when its trailing edge exits the viewport's leading
//!   edge, linear in between
//!
//! Consumers of the same range share one progress signal through a
//! refcounted registry: the entry is created on first subscribe and torn
//! down when the last subscriber leaves, so N consumers never cost N
//! recomputations.

use std::cell::RefCell;
use std::collections::HashMap;

use spark_signals::{Signal, signal};

// =============================================================================
// SCROLL RANGE
// =============================================================================

/// Reference range a progress value is computed against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRange {
    /// Progress across the whole scrollable document.
    Document,
    /// Progress across one element's entry/exit bounds. `top` and `height`
    /// are in document coordinates.
    Element { top: f32, height: f32 },
}

/// Hashable identity for a range. Float fields are keyed by their bit
/// patterns; two ranges share a registry entry only when identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RangeKey {
    Document,
    Element { top: u32, height: u32 },
}

fn key_of(range: ScrollRange) -> RangeKey {
    match range {
        ScrollRange::Document => RangeKey::Document,
        ScrollRange::Element { top, height } => RangeKey::Element {
            top: top.to_bits(),
            height: height.to_bits(),
        },
    }
}

// =============================================================================
// PUBLISHED STATE
// =============================================================================

thread_local! {
    /// Raw scroll offset, written only by the platform listener.
    static SCROLL_OFFSET: Signal<f32> = signal(0.0);

    /// Viewport height in pixels.
    static VIEWPORT_HEIGHT: Signal<f32> = signal(0.0);

    /// Total document height in pixels.
    static DOCUMENT_HEIGHT: Signal<f32> = signal(0.0);
}

/// Current raw scroll offset.
pub fn scroll_offset() -> f32 {
    SCROLL_OFFSET.with(|s| s.get())
}

/// Current viewport height.
pub fn viewport_height() -> f32 {
    VIEWPORT_HEIGHT.with(|s| s.get())
}

/// Current document height.
pub fn document_height() -> f32 {
    DOCUMENT_HEIGHT.with(|s| s.get())
}

/// Publish a new scroll offset and recompute every subscribed range.
///
/// Called once per frame by the single platform scroll listener. The value
/// is published before any consumer runs, so all reads within the frame see
/// the same offset.
pub fn publish_scroll(offset: f32) {
    SCROLL_OFFSET.with(|s| s.set(offset));
    recompute_all();
}

/// Publish a new viewport height (resize notification) and recompute.
pub fn publish_viewport_height(height: f32) {
    VIEWPORT_HEIGHT.with(|s| s.set(height));
    recompute_all();
}

/// Publish a new document height (layout change) and recompute.
pub fn publish_document_height(height: f32) {
    DOCUMENT_HEIGHT.with(|s| s.set(height));
    recompute_all();
}

// =============================================================================
// PROGRESS
// =============================================================================

fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

/// Progress in [0,1] for a range at the current published scroll state.
pub fn progress_for(range: ScrollRange) -> f32 {
    progress_at(range, scroll_offset(), viewport_height(), document_height())
}

/// Pure progress computation for explicit scroll/viewport/document values.
pub fn progress_at(range: ScrollRange, offset: f32, viewport_h: f32, document_h: f32) -> f32 {
    match range {
        ScrollRange::Document => {
            let scrollable = document_h - viewport_h;
            if scrollable <= 0.0 {
                0.0
            } else {
                clamp01(offset / scrollable)
            }
        }
        ScrollRange::Element { top, height } => {
            // 0 when the element top meets the viewport bottom, 1 when the
            // element bottom meets the viewport top.
            let span = viewport_h + height;
            if span <= 0.0 {
                0.0
            } else {
                clamp01((offset + viewport_h - top) / span)
            }
        }
    }
}

// =============================================================================
// SHARED RANGE REGISTRY
// =============================================================================

/// Registry entry for one distinct range: the shared progress signal plus
/// the number of live subscribers.
struct RangeEntry {
    range: ScrollRange,
    progress: Signal<f32>,
    subscribers: usize,
}

thread_local! {
    static RANGES: RefCell<HashMap<RangeKey, RangeEntry>> = RefCell::new(HashMap::new());
}

fn recompute_all() {
    // Collect the signals first so no registry borrow is live while
    // setting them (a set may re-run subscriber effects).
    let updates: Vec<(Signal<f32>, f32)> = RANGES.with(|ranges| {
        ranges
            .borrow()
            .values()
            .map(|entry| (entry.progress.clone(), progress_for(entry.range)))
            .collect()
    });
    for (progress, value) in updates {
        progress.set(value);
    }
}

/// Subscribe to a range's progress signal.
///
/// Consumers of the same range share one signal; the registry entry is
/// created on first subscribe and removed when the returned unsubscribe
/// function brings the count back to zero.
///
/// # Returns
///
/// The shared progress signal and an unsubscribe function.
pub fn subscribe_progress(range: ScrollRange) -> (Signal<f32>, Box<dyn FnOnce()>) {
    let key = key_of(range);

    let progress = RANGES.with(|ranges| {
        let mut ranges = ranges.borrow_mut();
        let entry = ranges.entry(key).or_insert_with(|| RangeEntry {
            range,
            progress: signal(progress_for(range)),
            subscribers: 0,
        });
        entry.subscribers += 1;
        entry.progress.clone()
    });

    let unsubscribe = Box::new(move || {
        RANGES.with(|ranges| {
            let mut ranges = ranges.borrow_mut();
            if let Some(entry) = ranges.get_mut(&key) {
                entry.subscribers = entry.subscribers.saturating_sub(1);
                if entry.subscribers == 0 {
                    ranges.remove(&key);
                }
            }
        });
    }) as Box<dyn FnOnce()>;

    (progress, unsubscribe)
}

/// Number of subscribers for a range (0 if no entry).
pub fn subscriber_count(range: ScrollRange) -> usize {
    RANGES.with(|ranges| {
        ranges
            .borrow()
            .get(&key_of(range))
            .map(|entry| entry.subscribers)
            .unwrap_or(0)
    })
}

/// Number of distinct subscribed ranges.
pub fn range_count() -> usize {
    RANGES.with(|ranges| ranges.borrow().len())
}

// =============================================================================
// RESET
// =============================================================================

/// Reset all scroll state (for testing).
pub fn reset_scroll_state() {
    RANGES.with(|ranges| ranges.borrow_mut().clear());
    SCROLL_OFFSET.with(|s| s.set(0.0));
    VIEWPORT_HEIGHT.with(|s| s.set(0.0));
    DOCUMENT_HEIGHT.with(|s| s.set(0.0));
}

// =============================================================================
// TESTS
// =============================================================================
