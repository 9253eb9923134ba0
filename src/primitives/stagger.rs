//! Stagger primitive - a container gate over sequentially revealed items.
//!
//! The container is a tracked element like any reveal; items register in
//! document order and inherit the container's delay ramp. Item reveals are
//! emitted with no transition delay because the ramp itself is realized by
//! the timer wheel, not by the rendering layer.

use spark_signals::effect;

use std::cell::Cell;

use crate::engine::registry;
use crate::reveal::{RevealVariants, StaggerGroup};
use crate::state::visibility::{self, ObserveOptions};
use crate::types::{
    Direction, Easing, RevealState, Transition, TransitionCallback, TransitionCommand,
    VisualTarget,
};

use super::types::{STAGGER_FADE_DURATION, StaggerItemProps, StaggerProps};

// =============================================================================
// Mount Handle
// =============================================================================

/// Handle for a mounted stagger container.
///
/// Items are added through [`StaggerMount::item`]; unmounting (or dropping)
/// removes the container's observer registration, cancels pending item
/// reveals and releases every allocated index.
pub struct StaggerMount {
    index: usize,
    group: StaggerGroup,
    sink: Option<TransitionCallback>,
    item_indices: Vec<usize>,
    item_stops: Vec<Box<dyn FnOnce()>>,
    vis_cleanup: Option<Box<dyn FnOnce()>>,
}

impl StaggerMount {
    /// Tracked element index of the container gate.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The underlying group, for reactive reads.
    pub fn group(&self) -> &StaggerGroup {
        &self.group
    }

    /// Tracked element indices of the items, in registration order.
    pub fn item_indices(&self) -> &[usize] {
        &self.item_indices
    }

    /// Register the next item, in document order.
    ///
    /// Returns the item's tracked element index. The item starts in its
    /// hidden variant and reveals on the group's delay ramp.
    pub fn item(&mut self, props: StaggerItemProps) -> usize {
        let index = registry::allocate_index();
        let machine = self.group.add_child();
        let variants = RevealVariants::from_direction(Direction::Up, props.distance);
        let transition = Transition {
            duration: props.duration,
            // The ramp delay runs on the timer wheel, not in the transition
            delay: 0.0,
            easing: Easing::EaseOut,
        };

        let sink = self.sink.clone();
        let first_run = Cell::new(true);
        let stop = effect(move || {
            let state = machine.state();
            let applied = if first_run.get() {
                first_run.set(false);
                Transition::NONE
            } else {
                transition
            };
            emit(&sink, index, variants.target_for(state), applied);
        });

        self.item_indices.push(index);
        self.item_stops.push(Box::new(stop));
        index
    }

    /// Unmount: remove the observer registration, cancel pending reveals
    /// and release all indices.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        for stop in self.item_stops.drain(..) {
            stop();
        }
        if let Some(cleanup) = self.vis_cleanup.take() {
            cleanup();
        }
        self.group.dispose();
        for index in self.item_indices.drain(..) {
            registry::release_index(index);
        }
        registry::release_index(self.index);
    }
}

impl Drop for StaggerMount {
    fn drop(&mut self) {
        self.teardown();
    }
}

// =============================================================================
// Mount Function
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

/// Mount a stagger container.
///
/// # Example
///
/// ```ignore
/// use spark_motion::primitives::{stagger_container, StaggerProps, StaggerItemProps};
/// use spark_motion::state::{timer, visibility};
///
/// let mut mount = stagger_container(StaggerProps::default());
/// let first = mount.item(StaggerItemProps::default());
/// let second = mount.item(StaggerItemProps::default());
///
/// visibility::dispatch(mount.index(), true); // gate opens
/// timer::pump(300);                          // items reveal on the ramp
/// ```
pub fn stagger_container(props: StaggerProps) -> StaggerMount {
    let index = registry::allocate_index();
    let group = StaggerGroup::new(props.base_delay_ms, props.step_ms, props.once);
    let sink = props.on_transition;

    // The container itself fades in when the gate opens
    let container_variants = RevealVariants::from_direction(Direction::Fade, 0.0);
    let container_transition = Transition {
        duration: STAGGER_FADE_DURATION,
        delay: 0.0,
        easing: Easing::EaseOut,
    };
    emit(&sink, index, container_variants.hidden, Transition::NONE);

    let observer_group = group.clone();
    let observer_sink = sink.clone();
    let vis_cleanup = visibility::observe(
        index,
        ObserveOptions {
            threshold: props.threshold,
            root_margin: 0.0,
            once: props.once,
        },
        move |is_intersecting| {
            let before = observer_group.gate().state();
            observer_group.on_intersection(is_intersecting);
            let after = observer_group.gate().state();
            if after != before {
                emit(
                    &observer_sink,
                    index,
                    container_variants.target_for(after),
                    container_transition,
                );
            }
        },
    );

    StaggerMount {
        index,
        group,
        sink,
        item_indices: Vec::new(),
        item_stops: Vec::new(),
        vis_cleanup: Some(Box::new(vis_cleanup)),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::timer;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup() {
        registry::reset_registry();
        visibility::reset_visibility_state();
        timer::reset_timer_state();
    }

    fn recording_sink() -> (Rc<RefCell<Vec<TransitionCommand>>>, TransitionCallback) {
        let log: Rc<RefCell<Vec<TransitionCommand>>> = Rc::new(RefCell::new(Vec::new()));
        let log_clone = log.clone();
        let sink: TransitionCallback = Rc::new(move |cmd| log_clone.borrow_mut().push(cmd.clone()));
        (log, sink)
    }

    fn commands_for(log: &Rc<RefCell<Vec<TransitionCommand>>>, element: usize) -> Vec<TransitionCommand> {
        log.borrow()
            .iter()
            .filter(|cmd| cmd.element == element)
            .cloned()
            .collect()
    }

    #[test]
    fn test_items_reveal_on_ramp() {
        setup();

        let (log, sink) = recording_sink();
        let mut mount = stagger_container(StaggerProps {
            base_delay_ms: 200,
            step_ms: 100,
            on_transition: Some(sink),
            ..Default::default()
        });
        let first = mount.item(StaggerItemProps::default());
        let second = mount.item(StaggerItemProps::default());
        let third = mount.item(StaggerItemProps::default());

        visibility::dispatch(mount.index(), true);

        // Gate opened, items still hidden
        assert_eq!(mount.group().gate().state(), RevealState::Visible);
        assert_eq!(commands_for(&log, first).len(), 1);

        timer::pump(200);
        assert_eq!(commands_for(&log, first).last().unwrap().target, VisualTarget::VISIBLE);
        assert_eq!(commands_for(&log, second).len(), 1);

        timer::pump(300);
        assert_eq!(commands_for(&log, second).last().unwrap().target, VisualTarget::VISIBLE);

        timer::pump(400);
        assert_eq!(commands_for(&log, third).last().unwrap().target, VisualTarget::VISIBLE);
    }

    #[test]
    fn test_container_fade_command() {
        setup();

        let (log, sink) = recording_sink();
        let mount = stagger_container(StaggerProps {
            on_transition: Some(sink),
            ..Default::default()
        });

        visibility::dispatch(mount.index(), true);

        let commands = commands_for(&log, mount.index());
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].target.opacity, 0.0);
        assert_eq!(commands[1].target.opacity, 1.0);
        assert!((commands[1].transition.duration - STAGGER_FADE_DURATION).abs() < 1e-6);
    }

    #[test]
    fn test_item_commands_carry_no_transition_delay() {
        setup();

        let (log, sink) = recording_sink();
        let mut mount = stagger_container(StaggerProps {
            on_transition: Some(sink),
            ..Default::default()
        });
        let item = mount.item(StaggerItemProps::default());

        visibility::dispatch(mount.index(), true);
        timer::pump(200);

        let commands = commands_for(&log, item);
        let visible = commands.last().unwrap();
        assert_eq!(visible.transition.delay, 0.0);
        assert!((visible.transition.duration - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_item_initial_placement() {
        setup();

        let (log, sink) = recording_sink();
        let mut mount = stagger_container(StaggerProps {
            on_transition: Some(sink),
            ..Default::default()
        });
        let item = mount.item(StaggerItemProps::default());

        let commands = commands_for(&log, item);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].target.y, 20.0);
        assert_eq!(commands[0].target.opacity, 0.0);
        assert_eq!(commands[0].transition, Transition::NONE);
    }

    #[test]
    fn test_unmount_cancels_pending_reveals() {
        setup();

        let (log, sink) = recording_sink();
        let mut mount = stagger_container(StaggerProps {
            on_transition: Some(sink),
            ..Default::default()
        });
        let item = mount.item(StaggerItemProps::default());
        let container = mount.index();

        visibility::dispatch(container, true);
        assert_eq!(timer::pending_count(), 1);

        mount.unmount();
        assert_eq!(timer::pending_count(), 0);
        assert!(!registry::is_allocated(container));
        assert!(!registry::is_allocated(item));

        // The scheduled reveal never fires
        let before = log.borrow().len();
        timer::pump(1000);
        assert_eq!(log.borrow().len(), before);
    }

    #[test]
    fn test_repeat_container_reverts_items() {
        setup();

        let (log, sink) = recording_sink();
        let mut mount = stagger_container(StaggerProps {
            once: false,
            base_delay_ms: 100,
            step_ms: 0,
            on_transition: Some(sink),
            ..Default::default()
        });
        let item = mount.item(StaggerItemProps::default());

        visibility::dispatch(mount.index(), true);
        timer::pump(100);
        assert_eq!(commands_for(&log, item).last().unwrap().target, VisualTarget::VISIBLE);

        visibility::dispatch(mount.index(), false);
        let commands = commands_for(&log, item);
        assert_eq!(commands.last().unwrap().target.opacity, 0.0);
    }

    #[test]
    fn test_item_indices_in_document_order() {
        setup();

        let mut mount = stagger_container(StaggerProps::default());
        let first = mount.item(StaggerItemProps::default());
        let second = mount.item(StaggerItemProps::default());

        assert_eq!(mount.item_indices(), &[first, second]);
        assert!(registry::registration_order(first) < registry::registration_order(second));
    }
}
