//! Mapping Module - Piecewise-linear value mapping
//!
//! Pure functions from a progress (or intersection ratio) input to an
//! output value, via breakpoints:
//!
//! - Two-breakpoint mappings for parallax offsets and narrow fade windows
//! - N-breakpoint piecewise mappings, clamped outside the domain
//! - Modulo-wrapped evaluation for hue cycling (wrap, never clamp)
//!
//! Interpolation is linear; compose an easing function over the input
//! before evaluation if a curve is wanted.

use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Construction errors for a [`Mapping`].
///
/// Malformed breakpoints are rejected up front rather than producing
/// undefined interpolation later.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MappingError {
    /// A mapping needs at least two breakpoints.
    #[error("mapping needs at least 2 breakpoints, got {0}")]
    TooFewBreakpoints(usize),
    /// Breakpoint inputs must be sorted in non-decreasing order.
    #[error("mapping breakpoint {0} is out of order")]
    UnsortedBreakpoints(usize),
}

// =============================================================================
// MAPPING
// =============================================================================

/// An immutable ordered set of (input, output) breakpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct Mapping {
    points: Vec<(f32, f32)>,
}

impl Mapping {
    /// Build a mapping from breakpoints.
    ///
    /// Rejects fewer than two breakpoints and inputs that are not sorted
    /// in non-decreasing order.
    pub fn new(points: Vec<(f32, f32)>) -> Result<Self, MappingError> {
        if points.len() < 2 {
            return Err(MappingError::TooFewBreakpoints(points.len()));
        }
        for i in 1..points.len() {
            if points[i].0 < points[i - 1].0 {
                return Err(MappingError::UnsortedBreakpoints(i));
            }
        }
        Ok(Self { points })
    }

    /// The common two-breakpoint mapping: input 0 maps to `a`, input 1
    /// maps to `b`.
    pub fn two_point(a: f32, b: f32) -> Self {
        Self {
            points: vec![(0.0, a), (1.0, b)],
        }
    }

    /// A fade window: 0 until input 0, rising linearly to 1 at `end`.
    ///
    /// Used for headings that fade in over a narrow early slice of
    /// document progress.
    pub fn fade_window(end: f32) -> Self {
        Self {
            points: vec![(0.0, 0.0), (end.max(0.0), 1.0)],
        }
    }

    /// The breakpoints.
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// Evaluate at `x`: linear interpolation between the bracketing
    /// breakpoints, clamped to the first/last output outside the domain.
    pub fn evaluate(&self, x: f32) -> f32 {
        let points = &self.points;
        let first = points[0];
        let last = points[points.len() - 1];

        if x <= first.0 {
            return first.1;
        }
        if x >= last.0 {
            return last.1;
        }
        for pair in points.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if x <= x1 {
                if x1 == x0 {
                    // Step between coincident inputs
                    return y1;
                }
                let t = (x - x0) / (x1 - x0);
                return y0 + (y1 - y0) * t;
            }
        }
        last.1
    }

    /// Evaluate at `x` and wrap the output into [0, modulus).
    ///
    /// Wrapping is Euclidean, so outputs below zero wrap up rather than
    /// clamping: a raw output of 370 with modulus 360 yields 10, and -10
    /// yields 350.
    pub fn evaluate_wrapped(&self, x: f32, modulus: f32) -> f32 {
        self.evaluate(x).rem_euclid(modulus)
    }
}

// =============================================================================
// DERIVED VALUE HELPERS
// =============================================================================

/// Degrees in a full hue circle.
pub const HUE_TURN: f32 = 360.0;

/// Hue pair for a color-cycling gradient at the given progress.
///
/// The base hue sweeps the full circle offset by a half turn; the companion
/// sits 60 degrees further around. Both wrap into [0,360).
pub fn hue_cycle(progress: f32) -> (f32, f32) {
    let base = (progress * HUE_TURN + 180.0).rem_euclid(HUE_TURN);
    let companion = (base + 60.0).rem_euclid(HUE_TURN);
    (base, companion)
}

/// Vertical offset for an element drifting against scroll at `speed`.
///
/// A speed of 0.5 moves the element at half the scroll rate, opposite the
/// scroll direction.
pub fn drift_offset(scroll_offset: f32, speed: f32) -> f32 {
    -(scroll_offset * speed)
}

/// Scale/opacity pair for a heading shrinking over the first `window`
/// pixels of scroll: scale eases from 1 to 0.9, opacity from 1 to 0.7.
pub fn shrink_on_scroll(scroll_offset: f32, window: f32) -> (f32, f32) {
    let progress = if window > 0.0 {
        (scroll_offset / window).clamp(0.0, 1.0)
    } else {
        1.0
    };
    (1.0 - progress * 0.1, 1.0 - progress * 0.3)
}

// =============================================================================
// TESTS
// =============================================================================
