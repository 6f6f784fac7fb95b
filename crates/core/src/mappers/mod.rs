//! Pure functions from a sample (plus static configuration and measured
//! geometry) to a target visual state.
//!
//! Every mapper is total: out-of-range input is clamped and non-finite
//! input yields the identity transform. Stateful concerns (hover tracking,
//! the one-shot reveal latch) live in [`crate::runner`].

pub mod cursor;
pub mod glow;
pub mod grid;
pub mod magnetic;
pub mod parallax;
pub mod progress;
pub mod reveal;
pub mod steps;
pub mod tilt;

use kinetic_protocol::{Point, Signal};

use crate::error::SampleError;

/// Reject a signal whose coordinates cannot be mapped.
pub fn validate(signal: &Signal) -> Result<(), SampleError> {
    let field = match signal {
        Signal::PointerMove(sample) => sample.non_finite_field(),
        Signal::Scroll(sample) => sample.non_finite_field(),
        Signal::PointerLeave | Signal::Visibility(_) => None,
    };
    match field {
        Some(field) => Err(SampleError::NonFinite {
            kind: signal.kind(),
            field,
        }),
        None => Ok(()),
    }
}

/// Scale `offset` down so its length does not exceed `max`. `None` leaves
/// it unbounded.
pub(crate) fn cap_magnitude(offset: Point, max: Option<f64>) -> Point {
    let Some(max) = max else {
        return offset;
    };
    let len = offset.x.hypot(offset.y);
    if len <= max || len == 0.0 {
        return offset;
    }
    let k = max / len;
    Point::new(offset.x * k, offset.y * k)
}
