use kinetic_protocol::{Rect, StepActivation};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepConfig {
    pub count: usize,
}

impl StepConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::ZeroSteps);
        }
        Ok(())
    }
}

/// How far the viewport has travelled through a tall region: 0 while the
/// region's bottom edge is at or below the viewport's bottom, 1 once it
/// reaches the top.
pub fn region_fraction(region: &Rect, viewport_height: f64) -> f64 {
    if viewport_height.is_nan() || viewport_height <= 0.0 || !region.bottom().is_finite() {
        return 0.0;
    }
    (1.0 - region.bottom() / viewport_height).clamp(0.0, 1.0)
}

/// `floor(fraction * count)`, clamped to `[0, count - 1]`.
pub fn active_step(fraction: f64, count: usize) -> usize {
    if count == 0 {
        return 0;
    }
    let fraction = if fraction.is_finite() {
        fraction.clamp(0.0, 1.0)
    } else {
        0.0
    };
    ((fraction * count as f64).floor() as usize).min(count - 1)
}

pub fn map_steps(fraction: f64, config: &StepConfig) -> StepActivation {
    StepActivation {
        active_step: active_step(fraction, config.count),
        count: config.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_steps() {
        assert_eq!(active_step(0.0, 4), 0);
        assert_eq!(active_step(0.24, 4), 0);
        assert_eq!(active_step(0.25, 4), 1);
        assert_eq!(active_step(0.5, 4), 2);
        assert_eq!(active_step(0.99, 4), 3);
        assert_eq!(active_step(1.0, 4), 3);
    }

    #[test]
    fn out_of_range_fraction_is_clamped() {
        assert_eq!(active_step(-0.5, 4), 0);
        assert_eq!(active_step(7.0, 4), 3);
        assert_eq!(active_step(f64::NAN, 4), 0);
    }

    #[test]
    fn scrolling_back_deactivates() {
        let cfg = StepConfig { count: 4 };
        let down = map_steps(0.8, &cfg);
        assert!(down.is_active(3));
        let up = map_steps(0.3, &cfg);
        assert!(up.is_active(1));
        assert!(!up.is_active(2));
    }

    #[test]
    fn region_fraction_follows_bottom_edge() {
        // Region 2 viewports tall, its bottom still below the fold.
        assert_eq!(region_fraction(&Rect::new(0.0, 0.0, 100.0, 1600.0), 800.0), 0.0);
        // Bottom edge halfway up the viewport.
        let half = region_fraction(&Rect::new(0.0, -1200.0, 100.0, 1600.0), 800.0);
        assert!((half - 0.5).abs() < 1e-9);
        // Scrolled past.
        assert_eq!(region_fraction(&Rect::new(0.0, -2000.0, 100.0, 1600.0), 800.0), 1.0);
        assert_eq!(region_fraction(&Rect::default(), 0.0), 0.0);
    }

    #[test]
    fn zero_steps_rejected() {
        assert_eq!(StepConfig { count: 0 }.validate(), Err(ConfigError::ZeroSteps));
    }
}
