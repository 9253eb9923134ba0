//! Primitives Module - Declarative page-facing surface
//!
//! Wrap content in a reveal/stagger/parallax primitive, hand it a sink into
//! the rendering layer, and unmount when done. Each mount function returns
//! a handle whose `unmount` (or drop) synchronously removes observer
//! registrations and cancels pending timers.

mod parallax;
mod reveal;
mod stagger;
mod types;

pub use parallax::*;
pub use reveal::*;
pub use stagger::*;
pub use types::*;
