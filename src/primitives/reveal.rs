//! Reveal primitives - scroll_reveal, fade_in, scale_in.
//!
//! Each mount allocates a tracked element, subscribes it to visibility
//! events, and forwards state changes to the rendering layer as transition
//! commands. The hidden variant is emitted once at mount with an instant
//! transition so the element starts in place.

use crate::engine::registry;
use crate::reveal::{RevealMachine, RevealVariants};
use crate::state::visibility::{self, ObserveOptions};
use crate::types::{
    Cleanup, Easing, REVEAL_EASE, RevealState, Transition, TransitionCallback,
    TransitionCommand, VisualTarget,
};

use super::types::{FADE_MARGIN, FadeInProps, RevealProps, ScaleInProps};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle for a mounted reveal. Unmounting (or dropping) removes the
/// visibility subscription and releases the element index.
pub struct RevealMount {
    index: usize,
    machine: RevealMachine,
    cleanup: Option<Cleanup>,
}

impl RevealMount {
    /// Tracked element index, for routing platform events.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current reveal state.
    pub fn state(&self) -> RevealState {
        self.machine.state()
    }

    /// The underlying machine, for reactive reads.
    pub fn machine(&self) -> &RevealMachine {
        &self.machine
    }

    /// Unmount: synchronously remove the observer registration.
    pub fn unmount(mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

impl Drop for RevealMount {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup.take() {
            cleanup();
        }
    }
}

// =============================================================================
// Shared wiring
// =============================================================================

fn emit(
    sink: &Option<TransitionCallback>,
    element: usize,
    target: VisualTarget,
    transition: Transition,
) {
    if let Some(sink) = sink {
        sink(&TransitionCommand {
            element,
            target,
            transition,
        });
    }
}

fn mount_reveal(
    variants: RevealVariants,
    transition: Transition,
    options: ObserveOptions,
    sink: Option<TransitionCallback>,
) -> RevealMount {
    let index = registry::allocate_index();
    let machine = RevealMachine::new(options.once);

    // Instant initial placement in the hidden variant
    emit(&sink, index, variants.hidden, Transition::NONE);

    let observer_machine = machine.clone();
    let observer_sink = sink.clone();
    let vis_cleanup = visibility::observe(index, options, move |is_intersecting| {
        let before = observer_machine.state();
        observer_machine.on_intersection(is_intersecting);
        let after = observer_machine.state();
        if after != before {
            emit(
                &observer_sink,
                index,
                variants.target_for(after),
                transition,
            );
        }
    });

    let cleanup: Cleanup = Box::new(move || {
        vis_cleanup();
        registry::release_index(index);
    });

    RevealMount {
        index,
        machine,
        cleanup: Some(cleanup),
    }
}

// =============================================================================
// Mount Functions
// =============================================================================

/// Mount a directional scroll reveal.
///
/// # Example
///
/// ```ignore
/// use spark_motion::primitives::{scroll_reveal, RevealProps};
/// use spark_motion::state::visibility;
/// use std::rc::Rc;
///
/// let mount = scroll_reveal(RevealProps {
///     delay_ms: 200,
///     on_transition: Some(Rc::new(|cmd| apply_to_node(cmd))),
///     ..Default::default()
/// });
///
/// // Platform adapter, when the element crosses the threshold:
/// visibility::dispatch(mount.index(), true);
/// ```
pub fn scroll_reveal(props: RevealProps) -> RevealMount {
    mount_reveal(
        RevealVariants::from_direction(props.direction, props.distance),
        Transition::new(props.duration, props.delay_ms, REVEAL_EASE),
        ObserveOptions {
            threshold: props.threshold,
            root_margin: props.root_margin,
            once: props.once,
        },
        props.on_transition,
    )
}

/// Mount a fade-in reveal with a late-triggering viewport inset.
pub fn fade_in(props: FadeInProps) -> RevealMount {
    mount_reveal(
        RevealVariants::from_direction(props.direction, props.distance),
        Transition::new(props.duration, props.delay_ms, REVEAL_EASE),
        ObserveOptions {
            root_margin: FADE_MARGIN,
            ..Default::default()
        },
        props.on_transition,
    )
}

/// Mount a scale-in reveal: grow from a shrunken, transparent state.
pub fn scale_in(props: ScaleInProps) -> RevealMount {
    mount_reveal(
        RevealVariants::scale_in(props.from_scale),
        Transition::new(props.duration, props.delay_ms, Easing::EaseOut),
        ObserveOptions::default(),
        props.on_transition,
    )
}

// =============================================================================
// Tests
// =============================================================================
