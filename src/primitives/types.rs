//! Primitive props - configuration for the page-facing surface.
//!
//! Defaults follow the engine-wide conventions: slide up 50px over 0.6s,
//! reveal once at a 0.1 intersection threshold, delays in milliseconds.

use crate::mapping::Mapping;
use crate::reveal::{
    DEFAULT_BASE_DELAY_MS, DEFAULT_DISTANCE, DEFAULT_DURATION, DEFAULT_SCALE_FROM,
    DEFAULT_STAGGER_STEP_MS, DEFAULT_THRESHOLD,
};
use crate::state::scroll::ScrollRange;
use crate::types::{Direction, TransitionCallback, ValueCallback};

// =============================================================================
// Reveal Props
// =============================================================================

/// Properties for `scroll_reveal`.
pub struct RevealProps {
    /// Direction the element slides in from.
    pub direction: Direction,
    /// Delay before the reveal starts, in milliseconds.
    pub delay_ms: u32,
    /// Reveal duration in seconds.
    pub duration: f32,
    /// Slide distance in pixels.
    pub distance: f32,
    /// Intersection threshold in [0,1].
    pub threshold: f32,
    /// Signed viewport inset in pixels for early/late triggering.
    pub root_margin: f32,
    /// Whether the reveal fires once (Visible terminal) or tracks
    /// visibility both ways.
    pub once: bool,
    /// Rendering-layer sink for transition commands.
    pub on_transition: Option<TransitionCallback>,
}

impl Default for RevealProps {
    fn default() -> Self {
        Self {
            direction: Direction::Up,
            delay_ms: 0,
            duration: DEFAULT_DURATION,
            distance: DEFAULT_DISTANCE,
            threshold: DEFAULT_THRESHOLD,
            root_margin: 0.0,
            once: true,
            on_transition: None,
        }
    }
}

// =============================================================================
// Fade-In Props
// =============================================================================

/// Slide distance for fade-in reveals.
pub const FADE_DISTANCE: f32 = 30.0;

/// Viewport inset for fade-in reveals: 50px late, so elements fade in only
/// once they are comfortably on screen.
pub const FADE_MARGIN: f32 = -50.0;

/// Properties for `fade_in`: an opacity-first reveal with a late-triggering
/// viewport inset.
pub struct FadeInProps {
    /// Optional slide direction; `Fade` animates opacity only.
    pub direction: Direction,
    /// Delay before the reveal starts, in milliseconds.
    pub delay_ms: u32,
    /// Reveal duration in seconds.
    pub duration: f32,
    /// Slide distance in pixels (ignored for `Fade`).
    pub distance: f32,
    /// Rendering-layer sink for transition commands.
    pub on_transition: Option<TransitionCallback>,
}

impl Default for FadeInProps {
    fn default() -> Self {
        Self {
            direction: Direction::Fade,
            delay_ms: 0,
            duration: DEFAULT_DURATION,
            distance: FADE_DISTANCE,
            on_transition: None,
        }
    }
}

// =============================================================================
// Scale-In Props
// =============================================================================

/// Properties for `scale_in`: grow from a shrunken, transparent state.
pub struct ScaleInProps {
    /// Starting scale of the hidden state.
    pub from_scale: f32,
    /// Delay before the reveal starts, in milliseconds.
    pub delay_ms: u32,
    /// Reveal duration in seconds.
    pub duration: f32,
    /// Rendering-layer sink for transition commands.
    pub on_transition: Option<TransitionCallback>,
}

impl Default for ScaleInProps {
    fn default() -> Self {
        Self {
            from_scale: DEFAULT_SCALE_FROM,
            delay_ms: 0,
            duration: DEFAULT_DURATION,
            on_transition: None,
        }
    }
}

// =============================================================================
// Stagger Props
// =============================================================================

/// Duration of the container's own fade once its gate opens, in seconds.
pub const STAGGER_FADE_DURATION: f32 = 0.3;

/// Slide distance for stagger items.
pub const STAGGER_ITEM_DISTANCE: f32 = 20.0;

/// Duration of each stagger item's reveal, in seconds.
pub const STAGGER_ITEM_DURATION: f32 = 0.5;

/// Properties for `stagger_container`.
pub struct StaggerProps {
    /// Delay before the first child reveals, in milliseconds.
    pub base_delay_ms: u64,
    /// Delay between consecutive children, in milliseconds.
    pub step_ms: u64,
    /// Intersection threshold for the container gate.
    pub threshold: f32,
    /// Whether the group reveals once or tracks visibility both ways.
    pub once: bool,
    /// Rendering-layer sink shared by the container and its items.
    pub on_transition: Option<TransitionCallback>,
}

impl Default for StaggerProps {
    fn default() -> Self {
        Self {
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            step_ms: DEFAULT_STAGGER_STEP_MS,
            threshold: DEFAULT_THRESHOLD,
            once: true,
            on_transition: None,
        }
    }
}

/// Properties for one item of a stagger container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StaggerItemProps {
    /// Slide distance in pixels.
    pub distance: f32,
    /// Reveal duration in seconds.
    pub duration: f32,
}

impl Default for StaggerItemProps {
    fn default() -> Self {
        Self {
            distance: STAGGER_ITEM_DISTANCE,
            duration: STAGGER_ITEM_DURATION,
        }
    }
}

// =============================================================================
// Scroll-Map / Parallax Props
// =============================================================================

/// Default parallax travel in pixels.
pub const PARALLAX_OFFSET: f32 = 50.0;

/// Properties for `scroll_map`: feed a range's progress through a mapping
/// into a value sink.
pub struct ScrollMapProps {
    /// Reference range the progress is computed against.
    pub range: ScrollRange,
    /// Breakpoint mapping applied to the progress.
    pub mapping: Mapping,
    /// Rendering-layer sink for the mapped value.
    pub on_update: Option<ValueCallback>,
}

/// Properties for `parallax`: a two-point vertical drift across a range.
pub struct ParallaxProps {
    /// Travel in pixels: progress 0 maps to `-y_offset`, progress 1 to
    /// `+y_offset`.
    pub y_offset: f32,
    /// Reference range; element-relative bounds give the classic
    /// entry-to-exit drift.
    pub range: ScrollRange,
    /// Rendering-layer sink for the current vertical offset.
    pub on_update: Option<ValueCallback>,
}

impl Default for ParallaxProps {
    fn default() -> Self {
        Self {
            y_offset: PARALLAX_OFFSET,
            range: ScrollRange::Document,
            on_update: None,
        }
    }
}
