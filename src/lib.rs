//! # spark-motion
//!
//! Scroll-synchronized animation engine for Rust.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for
//! fine-grained reactivity.
//!
//! ## Architecture
//!
//! The engine decides *when* each tracked element changes visual state and
//! *to what value*; pixel-level interpolation belongs to an external
//! rendering layer. Two signal sources drive everything:
//!
//! ```text
//! visibility::dispatch ─→ RevealMachine / StaggerGroup ─→ transition commands
//! scroll::publish_*    ─→ range progress ─→ Mapping ─→ continuous values
//! ```
//!
//! Platform events arrive through explicit dispatch/publish entry points,
//! so the same state machines run against any platform's intersection and
//! scroll primitives. Stagger delays run on a host-pumped timer wheel; the
//! engine owns no threads.
//!
//! ## Modules
//!
//! - [`types`] - Core types (Direction, VisualTarget, Transition, etc.)
//! - [`engine`] - Tracked-element registry and lifecycle
//! - [`state`] - Visibility, scroll, timer and tilt state systems
//! - [`reveal`] - Reveal state machines and stagger groups
//! - [`mapping`] - Piecewise-linear value mapping
//! - [`primitives`] - Declarative page-facing surface

pub mod engine;
pub mod mapping;
pub mod primitives;
pub mod reveal;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{
    allocate_index, allocated_count, is_allocated, on_destroy, registration_order,
    release_index, reset_registry,
};

pub use mapping::{Mapping, MappingError, drift_offset, hue_cycle, shrink_on_scroll};

pub use reveal::{
    DEFAULT_DISTANCE, DEFAULT_DURATION, DEFAULT_THRESHOLD, RevealMachine, RevealVariants,
    StaggerGroup,
};

pub use state::{
    scroll::{ScrollRange, progress_at, progress_for, publish_scroll, subscribe_progress},
    tilt::{PointerBounds, TiltFrame, TiltPhase, TiltTracker, tilt_frame},
    timer::{TimerHandle, cancel, pump, schedule},
    visibility::{ObserveOptions, WatchHooks, dispatch, observe, register_watch_hooks},
};

pub use primitives::{
    FadeInProps, ParallaxProps, RevealMount, RevealProps, ScaleInProps, ScrollMapMount,
    ScrollMapProps, StaggerItemProps, StaggerMount, StaggerProps, fade_in, parallax,
    scale_in, scroll_map, scroll_reveal, stagger_container,
};
