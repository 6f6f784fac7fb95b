use kinetic_protocol::{PointerSample, TransformState};

/// Custom cursor: the ring and dot sit exactly under the pointer.
pub fn map_cursor(sample: &PointerSample) -> TransformState {
    if !sample.position().is_finite() {
        return TransformState::IDENTITY;
    }
    TransformState::translate(sample.x, sample.y)
}
