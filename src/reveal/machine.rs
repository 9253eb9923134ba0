//! Reveal state machine and variant resolution.
//!
//! A machine holds one element's Hidden/Visible state in a signal and
//! applies the transition rules on every intersection event. Variant
//! tables resolve a state to the visual target the rendering layer
//! interpolates toward.

use spark_signals::{Signal, signal};

use crate::types::{Direction, RevealState, VisualTarget};

// =============================================================================
// Defaults
// =============================================================================

/// Default slide distance in pixels for directional reveals.
pub const DEFAULT_DISTANCE: f32 = 50.0;

/// Default reveal duration in seconds.
pub const DEFAULT_DURATION: f32 = 0.6;

/// Default intersection threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.1;

/// Default starting scale for scale-in reveals.
pub const DEFAULT_SCALE_FROM: f32 = 0.8;

// =============================================================================
// RevealMachine
// =============================================================================

/// Per-element reveal state over a reactive signal.
///
/// Clones share the same underlying state, so a machine can be captured by
/// observers, timers and effects at once.
///
/// # Example
///
/// ```ignore
/// use spark_motion::reveal::RevealMachine;
///
/// let machine = RevealMachine::new(true);
/// machine.on_intersection(true);
/// machine.on_intersection(false); // suppressed: once is terminal
/// assert_eq!(machine.state(), RevealState::Visible);
/// ```
#[derive(Clone)]
pub struct RevealMachine {
    state: Signal<RevealState>,
    once: bool,
}

impl RevealMachine {
    /// Create a machine in the Hidden state.
    ///
    /// With `once = true` the first Visible transition is terminal;
    /// otherwise the state mirrors the latest intersection boolean.
    pub fn new(once: bool) -> Self {
        Self {
            state: signal(RevealState::Hidden),
            once,
        }
    }

    /// Current state.
    pub fn state(&self) -> RevealState {
        self.state.get()
    }

    /// Reactive state signal for consumers building deriveds/effects.
    pub fn state_signal(&self) -> Signal<RevealState> {
        self.state.clone()
    }

    /// Whether Visible is terminal for this machine.
    pub fn once(&self) -> bool {
        self.once
    }

    /// Apply one intersection event.
    ///
    /// Idempotent under repeated identical events: the signal only changes
    /// when the resolved state differs.
    pub fn on_intersection(&self, is_intersecting: bool) {
        let current = self.state.get();
        let next = match (current, is_intersecting) {
            (_, true) => RevealState::Visible,
            (RevealState::Visible, false) if self.once => RevealState::Visible,
            (_, false) => RevealState::Hidden,
        };
        if next != current {
            self.state.set(next);
        }
    }
}

// =============================================================================
// RevealVariants
// =============================================================================

/// The hidden/visible visual targets for one element.
///
/// Consumers resolve the machine's current state against this table and
/// hand the resulting target to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealVariants {
    pub hidden: VisualTarget,
    pub visible: VisualTarget,
}

impl RevealVariants {
    /// Directional slide variants: the hidden target is offset `distance`
    /// pixels along the direction's axis at opacity 0.
    pub fn from_direction(direction: Direction, distance: f32) -> Self {
        let hidden = match direction {
            Direction::Up => VisualTarget::hidden_at(0.0, distance),
            Direction::Down => VisualTarget::hidden_at(0.0, -distance),
            Direction::Left => VisualTarget::hidden_at(distance, 0.0),
            Direction::Right => VisualTarget::hidden_at(-distance, 0.0),
            Direction::Fade => VisualTarget::hidden_at(0.0, 0.0),
        };
        Self {
            hidden,
            visible: VisualTarget::VISIBLE,
        }
    }

    /// Scale-in variants: the hidden target is shrunk to `from_scale` at
    /// opacity 0, with no positional offset.
    pub fn scale_in(from_scale: f32) -> Self {
        Self {
            hidden: VisualTarget {
                x: 0.0,
                y: 0.0,
                opacity: 0.0,
                scale: from_scale,
            },
            visible: VisualTarget::VISIBLE,
        }
    }

    /// Resolve a state to its target.
    pub fn target_for(&self, state: RevealState) -> VisualTarget {
        match state {
            RevealState::Hidden => self.hidden,
            RevealState::Visible => self.visible,
        }
    }
}

impl Default for RevealVariants {
    fn default() -> Self {
        Self::from_direction(Direction::Up, DEFAULT_DISTANCE)
    }
}

// =============================================================================
// Tests
// =============================================================================
