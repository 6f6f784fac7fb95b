//! Data model of the kinetic effect engine.
//!
//! ```text
//!   DOM events ─▶ Signal ──▶ Mapper ──▶ StyleCommand ──▶ Applier
//!   (pointer,     (samples)  (pure)     (Transform,      (CSS, DOM,
//!    scroll,                             Progress,        test surface)
//!    visibility)                         Steps, Glow…)
//! ```
//!
//! Everything here is plain data: serializable, `Copy` where possible,
//! and free of host types so it crosses the WASM boundary as JSON.

pub mod commands;
pub mod label;
pub mod samples;
pub mod transform;
pub mod types;

pub use commands::{Axis, StepActivation, StyleCommand, TransformOrder};
pub use label::Label;
pub use samples::{PointerSample, ScrollSample, Signal, SignalKind, VisibilitySample};
pub use transform::{Easing, TransformState, Transition};
pub use types::{Point, Rect, ViewportSize};
