//! Continuous scroll-linked primitives - scroll_map and parallax.
//!
//! These emit plain values rather than transition commands: the mapped
//! output tracks scroll progress continuously, and the rendering layer
//! applies it directly with no interpolation of its own.

use spark_signals::effect;

use crate::mapping::Mapping;
use crate::state::scroll;
use crate::types::Cleanup;

use super::types::{ParallaxProps, ScrollMapProps};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle for a mounted scroll-linked value. Unmounting (or dropping)
/// stops the effect and drops the shared range subscription.
pub struct ScrollMapMount {
    cleanup: Option<Cleanup>,
}

impl ScrollMapMount {
    /// Unmount: stop emission and release the range subscription.
    pub fn unmount(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for ScrollMapMount {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// Mount Functions
// =============================================================================

/// Mount a scroll-linked mapped value.
///
/// Subscribes to the range's shared progress signal (refcounted; consumers
/// of the same range share one subscription) and emits the mapped value on
/// every recomputation, starting with the current one.
pub fn scroll_map(props: ScrollMapProps) -> ScrollMapMount {
    let (progress, unsubscribe) = scroll::subscribe_progress(props.range);
    let mapping = props.mapping;
    let on_update = props.on_update;

    let stop = effect(move || {
        let value = mapping.evaluate(progress.get());
        if let Some(on_update) = &on_update {
            on_update(value);
        }
    });

    let cleanup: Cleanup = Box::new(move || {
        stop();
        unsubscribe();
    });

    ScrollMapMount {
        cleanup: Some(cleanup),
    }
}

/// Mount a parallax drift: progress 0 maps to `-y_offset`, progress 1 to
/// `+y_offset`, linear in between.
///
/// # Example
///
/// ```ignore
/// use spark_motion::primitives::{parallax, ParallaxProps};
/// use spark_motion::state::scroll::{self, ScrollRange};
/// use std::rc::Rc;
///
/// let _mount = parallax(ParallaxProps {
///     y_offset: 50.0,
///     range: ScrollRange::Element { top: 1200.0, height: 400.0 },
///     on_update: Some(Rc::new(|y| set_translate_y(y))),
/// });
///
/// // Platform scroll listener, once per frame:
/// scroll::publish_scroll(offset);
/// ```
pub fn parallax(props: ParallaxProps) -> ScrollMapMount {
    scroll_map(ScrollMapProps {
        range: props.range,
        mapping: Mapping::two_point(-props.y_offset, props.y_offset),
        on_update: props.on_update,
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::scroll::ScrollRange;
    use crate::types::ValueCallback;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() {
        scroll::reset_scroll_state();
    }

    fn recording_sink() -> (Rc<RefCell<Vec<f32>>>, ValueCallback) {
        let log: Rc<RefCell<Vec<f32>>> = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let sink: ValueCallback = Rc::new(move |value| log_clone.borrow_mut().push(value));
        (log, sink)
    }

    #[test]
    fn test_parallax_tracks_element_progress() {
        setup();
        scroll::publish_viewport_height(800.0);

        let (log, sink) = recording_sink();
        let _mount = parallax(ParallaxProps {
            y_offset: 50.0,
            range: ScrollRange::Element { top: 800.0, height: 200.0 },
            on_update: Some(sink),
        });

        // Initial emission at progress 0
        assert_eq!(*log.borrow(), vec![-50.0]);

        scroll::publish_scroll(500.0);
        assert_eq!(log.borrow().last(), Some(&0.0));

        scroll::publish_scroll(1000.0);
        assert_eq!(log.borrow().last(), Some(&50.0));
    }

    #[test]
    fn test_scroll_map_heading_fade() {
        setup();
        scroll::publish_viewport_height(800.0);
        scroll::publish_document_height(8800.0);

        let (log, sink) = recording_sink();
        let _mount = scroll_map(ScrollMapProps {
            range: ScrollRange::Document,
            mapping: Mapping::fade_window(0.2),
            on_update: Some(sink),
        });

        assert_eq!(*log.borrow(), vec![0.0]);

        // 10% of the document: halfway through the fade window
        scroll::publish_scroll(800.0);
        assert!((log.borrow().last().unwrap() - 0.5).abs() < 1e-6);

        scroll::publish_scroll(4000.0);
        assert_eq!(log.borrow().last(), Some(&1.0));
    }

    #[test]
    fn test_shared_subscription_released_on_unmount() {
        setup();

        let range = ScrollRange::Document;
        let (_log, sink) = recording_sink();
        let mount = parallax(ParallaxProps {
            range,
            on_update: Some(sink),
            ..Default::default()
        });

        assert_eq!(scroll::subscriber_count(range), 1);
        mount.unmount();
        assert_eq!(scroll::subscriber_count(range), 0);
    }

    #[test]
    fn test_unmount_stops_emission() {
        setup();
        scroll::publish_viewport_height(800.0);
        scroll::publish_document_height(1800.0);

        let (log, sink) = recording_sink();
        let mount = parallax(ParallaxProps {
            range: ScrollRange::Document,
            on_update: Some(sink),
            ..Default::default()
        });

        let before = log.borrow().len();
        mount.unmount();

        scroll::publish_scroll(500.0);
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_two_consumers_share_one_range_entry() {
        setup();

        let range = ScrollRange::Document;
        let (_la, sink_a) = recording_sink();
        let (_lb, sink_b) = recording_sink();

        let _a = parallax(ParallaxProps { range, on_update: Some(sink_a), ..Default::default() });
        let _b = parallax(ParallaxProps { range, on_update: Some(sink_b), ..Default::default() });

        assert_eq!(scroll::range_count(), 1);
        assert_eq!(scroll::subscriber_count(range), 2);
    }
}
