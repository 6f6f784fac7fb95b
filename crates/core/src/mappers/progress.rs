use kinetic_protocol::ScrollSample;

/// Width of a reading-progress bar, 0–100.
pub fn map_progress(sample: &ScrollSample) -> f64 {
    sample.progress() * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_tracks_progress() {
        assert_eq!(map_progress(&ScrollSample::new(0.0, 800.0, 1800.0)), 0.0);
        assert!((map_progress(&ScrollSample::new(250.0, 800.0, 1800.0)) - 25.0).abs() < 1e-9);
        assert_eq!(map_progress(&ScrollSample::new(1000.0, 800.0, 1800.0)), 100.0);
    }

    #[test]
    fn short_document_shows_empty_bar() {
        assert_eq!(map_progress(&ScrollSample::new(0.0, 800.0, 800.0)), 0.0);
    }
}
