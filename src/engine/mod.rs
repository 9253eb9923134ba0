//! Engine Module - Tracked-element lifecycle
//!
//! - Index allocation with a free pool for O(1) reuse
//! - Registration order (document order) for stagger tie-breaks
//! - Destroy callbacks run on release

pub(crate) mod registry;

pub use registry::*;
