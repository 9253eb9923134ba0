//! Core types shared across the engine.
//!
//! The engine decides *when* an element changes visual state and *to what
//! value*; the actual interpolation is performed by an external rendering
//! layer. These types describe that handoff: a target set of visual
//! properties plus the timing the rendering layer should interpolate with.

use std::rc::Rc;

// =============================================================================
// Reveal State
// =============================================================================

/// Visual state of a tracked element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RevealState {
    /// Initial state: element carries its hidden variant (offset, opacity 0).
    #[default]
    Hidden,
    /// Element has been revealed. Terminal when tracked with `once = true`.
    Visible,
}

// =============================================================================
// Direction
// =============================================================================

/// Direction an element slides in from when revealed.
///
/// The hidden variant offsets the element along the axis; `Fade` carries no
/// offset and animates opacity only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Slide up into place (hidden state is offset downward).
    #[default]
    Up,
    /// Slide down into place.
    Down,
    /// Slide in from the right.
    Left,
    /// Slide in from the left.
    Right,
    /// Opacity only, no offset.
    Fade,
}

impl Direction {
    /// Parse from string (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            "fade" | "none" => Some(Self::Fade),
            _ => None,
        }
    }

    /// Get all directions as a slice.
    pub const fn all() -> &'static [Direction] {
        &[
            Self::Up,
            Self::Down,
            Self::Left,
            Self::Right,
            Self::Fade,
        ]
    }
}

// =============================================================================
// Visual Target
// =============================================================================

/// Target visual properties for one element state.
///
/// Offsets are in pixels, opacity in [0,1], scale as a multiplier.
/// The rendering layer interpolates the element's current style toward
/// this target; the engine never touches pixels itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualTarget {
    /// Horizontal offset from the element's resting position.
    pub x: f32,
    /// Vertical offset from the element's resting position.
    pub y: f32,
    /// Opacity (0 = fully transparent, 1 = opaque).
    pub opacity: f32,
    /// Scale multiplier (1 = natural size).
    pub scale: f32,
}

impl VisualTarget {
    /// The resting, fully revealed state: no offset, full opacity, natural size.
    pub const VISIBLE: VisualTarget = VisualTarget {
        x: 0.0,
        y: 0.0,
        opacity: 1.0,
        scale: 1.0,
    };

    /// A fully transparent target at the given offset.
    pub const fn hidden_at(x: f32, y: f32) -> VisualTarget {
        VisualTarget {
            x,
            y,
            opacity: 0.0,
            scale: 1.0,
        }
    }
}

impl Default for VisualTarget {
    fn default() -> Self {
        Self::VISIBLE
    }
}

// =============================================================================
// Easing
// =============================================================================

/// Easing curve forwarded to the rendering layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Easing {
    /// No easing. Value mappings interpolate linearly unless composed
    /// with a curve before evaluation.
    Linear,
    /// Standard ease-out.
    EaseOut,
    /// Cubic bezier control points (x1, y1, x2, y2).
    CubicBezier(f32, f32, f32, f32),
}

/// The fixed reveal curve used by reveal transitions unless overridden.
pub const REVEAL_EASE: Easing = Easing::CubicBezier(0.25, 0.46, 0.45, 0.94);

// =============================================================================
// Transition
// =============================================================================

/// Timing handed to the rendering layer alongside a [`VisualTarget`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    /// Interpolation duration in seconds.
    pub duration: f32,
    /// Delay before interpolation starts, in seconds.
    pub delay: f32,
    /// Easing curve.
    pub easing: Easing,
}

impl Transition {
    /// Instant placement: zero duration, zero delay.
    ///
    /// Used when an element is first mounted in its hidden state, so the
    /// rendering layer positions it without animating.
    pub const NONE: Transition = Transition {
        duration: 0.0,
        delay: 0.0,
        easing: Easing::Linear,
    };

    /// Build a transition from a duration in seconds and a delay in
    /// **milliseconds**.
    ///
    /// Callers specify delays in milliseconds; the rendering layer consumes
    /// seconds, so the conversion happens here and nowhere else.
    pub fn new(duration: f32, delay_ms: u32, easing: Easing) -> Self {
        Self {
            duration,
            delay: delay_ms as f32 / 1000.0,
            easing,
        }
    }
}

// =============================================================================
// Transition Command
// =============================================================================

/// A discrete animation request emitted to the rendering layer:
/// drive `element` toward `target` using `transition`.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionCommand {
    /// Tracked element index the command applies to.
    pub element: usize,
    /// Visual properties to interpolate toward.
    pub target: VisualTarget,
    /// Duration, delay and easing for the interpolation.
    pub transition: Transition,
}

// =============================================================================
// Callback Types
// =============================================================================

/// Cleanup function returned by mounting primitives.
///
/// Call this to unmount and release resources.
pub type Cleanup = Box<dyn FnOnce()>;

/// Rendering-layer sink for discrete transition commands (Rc for shared
/// ownership in closures, the standard pattern for event callbacks here).
pub type TransitionCallback = Rc<dyn Fn(&TransitionCommand)>;

/// Rendering-layer sink for continuous scalar values (parallax offsets,
/// mapped opacities). Called with the latest value on every recomputation.
pub type ValueCallback = Rc<dyn Fn(f32)>;

// =============================================================================
// Tests
// =============================================================================
