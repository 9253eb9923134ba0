//! Stagger coordinator: ordered children under one parent gate.
//!
//! The group is itself a reveal machine; children never become visible
//! before it does. When the gate opens, every child's reveal is scheduled
//! on the timer wheel at `base_delay + i * step` relative to that moment.
//! Children do not wait for their own intersection: the delay ramp is
//! anchored to group visibility, which is what distinguishes a stagger
//! from independent per-element reveals.
//!
//! A scheduled reveal is superseded only by disposal. A repeat group
//! (`once = false`) that returns to Hidden cancels pending reveals and
//! reverts its children; a one-shot group ignores Hidden entirely.

use std::cell::RefCell;
use std::rc::Rc;

use crate::state::timer::{self, TimerHandle};
use crate::types::RevealState;

use super::machine::RevealMachine;

// =============================================================================
// Defaults
// =============================================================================

/// Default delay before the first child reveals, in milliseconds.
pub const DEFAULT_BASE_DELAY_MS: u64 = 200;

/// Default delay between consecutive children, in milliseconds.
pub const DEFAULT_STAGGER_STEP_MS: u64 = 100;

// =============================================================================
// StaggerGroup
// =============================================================================

struct ChildSlot {
    machine: RevealMachine,
    pending: Option<TimerHandle>,
}

/// A parent gate over an ordered sequence of child reveal machines.
///
/// Child order is registration order; there is no dynamic priority.
///
/// # Example
///
/// ```ignore
/// use spark_motion::reveal::StaggerGroup;
///
/// let group = StaggerGroup::new(200, 100, true);
/// let first = group.add_child();
/// let second = group.add_child();
///
/// group.on_intersection(true); // schedules reveals at 200ms and 300ms
/// timer::pump(300);            // both children visible now
/// ```
///
/// Clones share the same gate and children, so a group can be captured by
/// observers and handles at once.
#[derive(Clone)]
pub struct StaggerGroup {
    gate: RevealMachine,
    base_delay_ms: u64,
    step_ms: u64,
    children: Rc<RefCell<Vec<ChildSlot>>>,
}

impl StaggerGroup {
    /// Create a group with the given delay ramp.
    pub fn new(base_delay_ms: u64, step_ms: u64, once: bool) -> Self {
        Self {
            gate: RevealMachine::new(once),
            base_delay_ms,
            step_ms,
            children: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// The group's own reveal machine (the gate).
    pub fn gate(&self) -> &RevealMachine {
        &self.gate
    }

    /// Number of registered children.
    pub fn len(&self) -> usize {
        self.children.borrow().len()
    }

    /// Whether the group has no children.
    pub fn is_empty(&self) -> bool {
        self.children.borrow().is_empty()
    }

    /// Effective reveal delay for the child at `index`.
    pub fn effective_delay_ms(&self, index: usize) -> u64 {
        self.base_delay_ms + index as u64 * self.step_ms
    }

    /// Number of children with a scheduled, not-yet-fired reveal.
    pub fn pending_count(&self) -> usize {
        self.children
            .borrow()
            .iter()
            .filter(|slot| slot.pending.is_some())
            .count()
    }

    /// Register the next child, in document order.
    ///
    /// Returns the child's machine. Children inherit the group's `once`
    /// mode. A child added while the gate is already open is scheduled
    /// immediately at its position in the ramp.
    pub fn add_child(&self) -> RevealMachine {
        let machine = RevealMachine::new(self.gate.once());
        let index = {
            let mut children = self.children.borrow_mut();
            children.push(ChildSlot {
                machine: machine.clone(),
                pending: None,
            });
            children.len() - 1
        };

        if self.gate.state() == RevealState::Visible {
            self.schedule_child(index);
        }

        machine
    }

    /// Apply one intersection event to the gate, scheduling or reverting
    /// children as the gate state changes.
    pub fn on_intersection(&self, is_intersecting: bool) {
        let before = self.gate.state();
        self.gate.on_intersection(is_intersecting);
        let after = self.gate.state();

        if before == after {
            return;
        }
        match after {
            RevealState::Visible => {
                let count = self.children.borrow().len();
                for index in 0..count {
                    self.schedule_child(index);
                }
            }
            RevealState::Hidden => {
                // Repeat group closed: cancel the ramp and revert children
                let machines: Vec<RevealMachine> = {
                    let mut children = self.children.borrow_mut();
                    for slot in children.iter_mut() {
                        if let Some(handle) = slot.pending.take() {
                            timer::cancel(handle);
                        }
                    }
                    children.iter().map(|slot| slot.machine.clone()).collect()
                };
                for machine in machines {
                    machine.on_intersection(false);
                }
            }
        }
    }

    /// Cancel every pending reveal. Called on unmount so no timer fires
    /// against disposed state.
    pub fn dispose(&self) {
        let mut children = self.children.borrow_mut();
        for slot in children.iter_mut() {
            if let Some(handle) = slot.pending.take() {
                timer::cancel(handle);
            }
        }
    }

    fn schedule_child(&self, index: usize) {
        {
            let children = self.children.borrow();
            let Some(slot) = children.get(index) else {
                return;
            };
            if slot.pending.is_some() || slot.machine.state() == RevealState::Visible {
                return;
            }
        }

        let children = Rc::clone(&self.children);
        let handle = timer::schedule(self.effective_delay_ms(index), move || {
            // Clone the machine out before transitioning so the borrow is
            // not live while downstream effects run.
            let machine = {
                let mut children = children.borrow_mut();
                children.get_mut(index).map(|slot| {
                    slot.pending = None;
                    slot.machine.clone()
                })
            };
            if let Some(machine) = machine {
                machine.on_intersection(true);
            }
        });

        if let Some(slot) = self.children.borrow_mut().get_mut(index) {
            slot.pending = Some(handle);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::timer::{pending_count as wheel_pending, pump, reset_timer_state};

    fn setup() {
        reset_timer_state();
    }

    #[test]
    fn test_delay_ramp() {
        setup();

        let group = StaggerGroup::new(200, 100, true);
        group.add_child();
        group.add_child();
        group.add_child();

        assert_eq!(group.effective_delay_ms(0), 200);
        assert_eq!(group.effective_delay_ms(1), 300);
        assert_eq!(group.effective_delay_ms(2), 400);
    }

    #[test]
    fn test_children_wait_for_gate() {
        setup();

        let group = StaggerGroup::new(200, 100, true);
        let child = group.add_child();

        // Nothing scheduled until the gate opens
        pump(1000);
        assert_eq!(child.state(), RevealState::Hidden);
        assert_eq!(group.pending_count(), 0);
    }

    #[test]
    fn test_gate_opens_then_ramp_fires_in_order() {
        setup();

        let group = StaggerGroup::new(200, 100, true);
        let first = group.add_child();
        let second = group.add_child();
        let third = group.add_child();

        group.on_intersection(true);
        assert_eq!(group.gate().state(), RevealState::Visible);
        assert_eq!(group.pending_count(), 3);

        // No child fires before the gate did, and none before its delay
        pump(199);
        assert_eq!(first.state(), RevealState::Hidden);

        pump(200);
        assert_eq!(first.state(), RevealState::Visible);
        assert_eq!(second.state(), RevealState::Hidden);

        pump(300);
        assert_eq!(second.state(), RevealState::Visible);
        assert_eq!(third.state(), RevealState::Hidden);

        pump(400);
        assert_eq!(third.state(), RevealState::Visible);
        assert_eq!(group.pending_count(), 0);
    }

    #[test]
    fn test_child_added_after_gate_open() {
        setup();

        let group = StaggerGroup::new(200, 100, true);
        group.add_child();
        group.on_intersection(true);
        pump(200);

        // Late child takes position 1 in the ramp, anchored to now
        let late = group.add_child();
        assert_eq!(group.pending_count(), 1);

        pump(200 + 300);
        assert_eq!(late.state(), RevealState::Visible);
    }

    #[test]
    fn test_once_gate_ignores_hidden() {
        setup();

        let group = StaggerGroup::new(100, 50, true);
        let child = group.add_child();

        group.on_intersection(true);
        // Scrolled away before the reveal fired: the schedule stands
        group.on_intersection(false);
        assert_eq!(group.pending_count(), 1);

        pump(100);
        assert_eq!(child.state(), RevealState::Visible);
    }

    #[test]
    fn test_repeat_group_reverts_children() {
        setup();

        let group = StaggerGroup::new(100, 50, false);
        let first = group.add_child();
        let second = group.add_child();

        group.on_intersection(true);
        pump(100);
        assert_eq!(first.state(), RevealState::Visible);
        assert_eq!(second.state(), RevealState::Hidden); // due at 150

        group.on_intersection(false);
        // Fired child reverts, pending child is cancelled
        assert_eq!(first.state(), RevealState::Hidden);
        assert_eq!(group.pending_count(), 0);

        pump(1000);
        assert_eq!(second.state(), RevealState::Hidden);
    }

    #[test]
    fn test_repeat_group_reopens() {
        setup();

        let group = StaggerGroup::new(100, 0, false);
        let child = group.add_child();

        group.on_intersection(true);
        pump(100);
        group.on_intersection(false);
        assert_eq!(child.state(), RevealState::Hidden);

        group.on_intersection(true);
        pump(200);
        assert_eq!(child.state(), RevealState::Visible);
    }

    #[test]
    fn test_duplicate_open_does_not_reschedule() {
        setup();

        let group = StaggerGroup::new(100, 50, true);
        group.add_child();

        group.on_intersection(true);
        group.on_intersection(true);
        assert_eq!(group.pending_count(), 1);
    }

    #[test]
    fn test_dispose_cancels_pending() {
        setup();

        let group = StaggerGroup::new(100, 50, true);
        let first = group.add_child();
        let second = group.add_child();

        group.on_intersection(true);
        assert_eq!(wheel_pending(), 2);

        group.dispose();
        assert_eq!(wheel_pending(), 0);

        pump(1000);
        assert_eq!(first.state(), RevealState::Hidden);
        assert_eq!(second.state(), RevealState::Hidden);
    }

    #[test]
    fn test_empty_group() {
        setup();

        let group = StaggerGroup::new(100, 50, true);
        assert!(group.is_empty());
        assert_eq!(group.len(), 0);

        group.on_intersection(true);
        assert_eq!(group.pending_count(), 0);
    }
}
