//! Reveal Module - Hidden/Visible state machines and stagger groups
//!
//! - **Machine** - Per-element reveal state driven by intersection events,
//!   plus the variant tables consumers render against
//! - **Stagger** - Ordered children revealed on a deterministic delay ramp
//!   once their parent group becomes visible

mod machine;
mod stagger;

pub use machine::*;
pub use stagger::*;
