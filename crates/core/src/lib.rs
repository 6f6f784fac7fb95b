//! Interaction-to-transform pipeline.
//!
//! ```text
//!   host events ─▶ SignalSampler ──▶ EffectBinding ──▶ Runner/mappers ──▶ Applier
//!                  (per-element      (owns the        (pure mapping,      (CSS, DOM,
//!                   subscriptions,    subscription)    hover + reveal      StyleSurface)
//!                   liveness)                          state)
//! ```
//!
//! Presets are stateless templates; binding one to an [`ElementScope`]
//! yields an [`EffectBinding`] that lives exactly as long as the element is
//! mounted.

pub mod applier;
pub mod binding;
pub mod css;
pub mod error;
pub mod mappers;
pub mod preset;
pub mod runner;
pub mod sampler;
pub mod scope;
pub mod table;

pub use applier::{Applier, SharedApplier, StyleSurface};
pub use binding::EffectBinding;
pub use error::{ConfigError, EffectError, SampleError, TableError};
pub use preset::{Effect, Preset};
pub use runner::{Context, Runner};
pub use sampler::{
    Dispatch, DispatchReport, SignalSampler, Subscription, TransformClaim, ViewportState,
};
pub use scope::{ElementId, ElementScope};
pub use table::PresetTable;
