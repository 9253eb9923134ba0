//! Tilt Module - Pointer-driven 3D tilt state machine
//!
//! Maps pointer coordinates over an element to a rotation/brightness frame
//! while the pointer is inside the element's bounds. The tracker holds no
//! reference to visual nodes: it only emits values, and an external layer
//! applies them. On pointer leave every override is cleared, never leaving
//! an element partially tilted.
//!
//! # Example
//!
//! ```ignore
//! use spark_motion::state::tilt::{TiltTracker, PointerBounds};
//!
//! let tracker = TiltTracker::new();
//! let bounds = PointerBounds { left: 0.0, top: 0.0, width: 200.0, height: 100.0 };
//!
//! tracker.pointer_enter();
//! if let Some(frame) = tracker.pointer_move(150.0, 25.0, bounds) {
//!     // hand frame.rotate_x / frame.brightness to the style layer
//! }
//! tracker.pointer_leave(); // frame() is None again
//! ```

use spark_signals::{Signal, signal};

// =============================================================================
// CONSTANTS
// =============================================================================

/// Degrees of rotation per unit of normalized pointer offset.
pub const TILT_SENSITIVITY: f32 = 8.0;

/// Uniform scale applied while tilted.
pub const TILT_SCALE: f32 = 1.02;

/// Depth translation in pixels while tilted.
pub const TILT_DEPTH: f32 = 20.0;

/// Brightness at the exact center of the element.
pub const TILT_BASE_BRIGHTNESS: f32 = 1.05;

/// Brightness gain per unit of combined offset magnitude.
pub const TILT_BRIGHTNESS_GAIN: f32 = 0.1;

// =============================================================================
// TYPES
// =============================================================================

/// Pointer-session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TiltPhase {
    /// Pointer outside the element; no overrides active.
    #[default]
    Inactive,
    /// Pointer inside the element; frames are emitted per move.
    Active,
}

/// Bounding box of the tilted element, in the pointer's coordinate space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerBounds {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// One tilt frame: the style overrides for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltFrame {
    /// Rotation around the horizontal axis, degrees.
    pub rotate_x: f32,
    /// Rotation around the vertical axis, degrees.
    pub rotate_y: f32,
    /// Uniform scale multiplier.
    pub scale: f32,
    /// Depth translation, pixels.
    pub translate_z: f32,
    /// Brightness filter multiplier.
    pub brightness: f32,
}

// =============================================================================
// PURE MAPPING
// =============================================================================

/// Compute the tilt frame for a normalized pointer offset.
///
/// `dx` and `dy` are offsets from the element center in [-0.5, 0.5]
/// (0 at the center, ±0.5 at the edges). Pure function: same offsets,
/// same frame.
pub fn tilt_frame(dx: f32, dy: f32) -> TiltFrame {
    TiltFrame {
        rotate_x: dy * TILT_SENSITIVITY,
        rotate_y: dx * -TILT_SENSITIVITY,
        scale: TILT_SCALE,
        translate_z: TILT_DEPTH,
        brightness: TILT_BASE_BRIGHTNESS + (dx + dy).abs() * TILT_BRIGHTNESS_GAIN,
    }
}

/// Normalize a pointer position against element bounds to [-0.5, 0.5]
/// offsets from the center. Degenerate bounds yield the center.
pub fn normalized_offset(x: f32, y: f32, bounds: PointerBounds) -> (f32, f32) {
    let dx = if bounds.width > 0.0 {
        ((x - bounds.left) / bounds.width - 0.5).clamp(-0.5, 0.5)
    } else {
        0.0
    };
    let dy = if bounds.height > 0.0 {
        ((y - bounds.top) / bounds.height - 0.5).clamp(-0.5, 0.5)
    } else {
        0.0
    };
    (dx, dy)
}

// =============================================================================
// TRACKER
// =============================================================================

/// Per-element tilt tracker.
///
/// Ephemeral pointer-session state: Active between enter and leave,
/// destroyed (frame cleared) on leave, never persisted.
#[derive(Clone)]
pub struct TiltTracker {
    phase: Signal<TiltPhase>,
    frame: Signal<Option<TiltFrame>>,
}

impl TiltTracker {
    pub fn new() -> Self {
        Self {
            phase: signal(TiltPhase::Inactive),
            frame: signal(None),
        }
    }

    /// Current phase.
    pub fn phase(&self) -> TiltPhase {
        self.phase.get()
    }

    /// Current frame: `Some` while the pointer is over the element,
    /// `None` when the element carries its default styling.
    pub fn frame(&self) -> Option<TiltFrame> {
        self.frame.get()
    }

    /// Reactive frame signal for consumers building deriveds/effects.
    pub fn frame_signal(&self) -> Signal<Option<TiltFrame>> {
        self.frame.clone()
    }

    /// Pointer entered the element bounds.
    pub fn pointer_enter(&self) {
        self.phase.set(TiltPhase::Active);
    }

    /// Pointer moved within the element bounds.
    ///
    /// Returns the emitted frame, or None when the tracker is Inactive
    /// (moves before enter or after leave are ignored).
    pub fn pointer_move(&self, x: f32, y: f32, bounds: PointerBounds) -> Option<TiltFrame> {
        if self.phase.get() != TiltPhase::Active {
            return None;
        }
        let (dx, dy) = normalized_offset(x, y, bounds);
        let frame = tilt_frame(dx, dy);
        self.frame.set(Some(frame));
        Some(frame)
    }

    /// Pointer left the element: clear every override back to default.
    pub fn pointer_leave(&self) {
        self.phase.set(TiltPhase::Inactive);
        self.frame.set(None);
    }
}

impl Default for TiltTracker {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// TESTS
// =============================================================================
