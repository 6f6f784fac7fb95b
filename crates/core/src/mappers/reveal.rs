use kinetic_protocol::{TransformState, VisibilitySample};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Delay between consecutive words of a split-text reveal.
pub const WORD_STAGGER_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Minimum visible ratio that counts as "in view".
    pub threshold: f64,
    /// How far below its resting place the element waits, in px.
    pub hidden_offset_px: f64,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            hidden_offset_px: 20.0,
        }
    }
}

impl RevealConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        ConfigError::finite("hidden_offset_px", self.hidden_offset_px)
    }

    pub fn hidden_state(&self) -> TransformState {
        TransformState::translate(0.0, self.hidden_offset_px).with_opacity(0.0)
    }

    pub fn shown_state(&self) -> TransformState {
        TransformState::IDENTITY
    }

    pub fn counts_as_visible(&self, sample: &VisibilitySample) -> bool {
        sample.is_visible && sample.ratio >= self.threshold
    }
}

/// One-shot reveal: flips to shown on the first qualifying visibility
/// sample and ignores everything after, including the element leaving the
/// viewport again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RevealLatch {
    revealed: bool,
}

impl RevealLatch {
    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Returns the shown state exactly once, on the hidden → shown edge.
    pub fn observe(
        &mut self,
        sample: &VisibilitySample,
        config: &RevealConfig,
    ) -> Option<TransformState> {
        if self.revealed || !config.counts_as_visible(sample) {
            return None;
        }
        self.revealed = true;
        Some(config.shown_state())
    }

    pub fn state(&self, config: &RevealConfig) -> TransformState {
        if self.revealed {
            config.shown_state()
        } else {
            config.hidden_state()
        }
    }
}

/// Transition delays for a split-text reveal of `count` words: word `i`
/// starts `base_delay_ms + i * step_ms` after the reveal.
pub fn stagger_delays(count: usize, base_delay_ms: f64, step_ms: f64) -> Vec<f64> {
    (0..count)
        .map(|i| base_delay_ms + i as f64 * step_ms)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_hidden_below() {
        let cfg = RevealConfig::default();
        let t = RevealLatch::default().state(&cfg);
        assert_eq!(t.opacity, 0.0);
        assert_eq!(t.translate_y, 20.0);
    }

    #[test]
    fn reveal_is_one_shot() {
        let cfg = RevealConfig::default();
        let mut latch = RevealLatch::default();
        assert_eq!(latch.observe(&VisibilitySample::hidden(), &cfg), None);
        assert_eq!(
            latch.observe(&VisibilitySample::visible(), &cfg),
            Some(TransformState::IDENTITY)
        );
        assert_eq!(latch.observe(&VisibilitySample::hidden(), &cfg), None);
        assert_eq!(latch.observe(&VisibilitySample::visible(), &cfg), None);
        assert_eq!(latch.state(&cfg).opacity, 1.0);
    }

    #[test]
    fn threshold_gates_reveal() {
        let cfg = RevealConfig {
            threshold: 0.3,
            ..RevealConfig::default()
        };
        let mut latch = RevealLatch::default();
        assert_eq!(latch.observe(&VisibilitySample::new(true, 0.2), &cfg), None);
        assert!(!latch.is_revealed());
        assert!(latch.observe(&VisibilitySample::new(true, 0.3), &cfg).is_some());
    }

    #[test]
    fn stagger() {
        assert_eq!(stagger_delays(3, 100.0, WORD_STAGGER_MS), vec![100.0, 150.0, 200.0]);
        assert!(stagger_delays(0, 0.0, WORD_STAGGER_MS).is_empty());
    }

    #[test]
    fn threshold_outside_unit_range_rejected() {
        let cfg = RevealConfig {
            threshold: 1.5,
            ..RevealConfig::default()
        };
        assert_eq!(cfg.validate(), Err(ConfigError::ThresholdOutOfRange(1.5)));
    }
}
