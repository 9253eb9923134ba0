//! State Module - Event-driven runtime state systems
//!
//! The signal sources and schedulers that drive the engine:
//!
//! - **Visibility** - Intersection subscriptions, dispatch, fail-open fallback
//! - **Scroll** - Process-wide scroll signal, per-range progress, refcounted sharing
//! - **Timer** - Host-pumped timer wheel for staggered reveals
//! - **Tilt** - Pointer-driven 3D tilt state machine

pub mod scroll;
pub mod tilt;
pub mod timer;
pub mod visibility;
