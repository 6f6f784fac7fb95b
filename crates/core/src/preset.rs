//! Named, stateless effect templates.
//!
//! A [`Preset`] fixes which signal an effect listens to, how samples map to
//! style, and the transition the host animates with. Binding one to an
//! element produces an [`EffectBinding`](crate::binding::EffectBinding).

use kinetic_protocol::{Axis, Easing, Label, SignalKind, Transition};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::mappers::glow::GlowConfig;
use crate::mappers::grid::PointerParallaxConfig;
use crate::mappers::magnetic::MagneticConfig;
use crate::mappers::parallax::ParallaxConfig;
use crate::mappers::reveal::{RevealConfig, WORD_STAGGER_MS};
use crate::mappers::steps::StepConfig;
use crate::mappers::tilt::TiltConfig;

/// What a preset does with its samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    /// Hover-gated pull toward the pointer.
    MagneticPull(MagneticConfig),
    /// Hover-gated 3D rotation toward the pointer.
    Tilt(TiltConfig),
    /// Vertical drift proportional to scroll distance from viewport centre.
    Parallax(ParallaxConfig),
    /// One-shot fade-up when the element first scrolls into view.
    FadeReveal(RevealConfig),
    /// Reading-progress bar.
    ScrollProgress { axis: Axis },
    /// Timeline steps lit by scroll progress through a tall region.
    StepActivation(StepConfig),
    /// Custom cursor following the raw pointer.
    CursorFollow,
    /// Background grid shifting with the pointer across the viewport.
    PointerParallax(PointerParallaxConfig),
    /// Radial highlight tracking the pointer inside a card.
    Glow(GlowConfig),
}

impl Effect {
    pub fn signal_kind(&self) -> SignalKind {
        match self {
            Self::MagneticPull(_)
            | Self::Tilt(_)
            | Self::CursorFollow
            | Self::PointerParallax(_)
            | Self::Glow(_) => SignalKind::PointerMove,
            Self::Parallax(_) | Self::ScrollProgress { .. } | Self::StepActivation(_) => {
                SignalKind::Scroll
            }
            Self::FadeReveal(_) => SignalKind::VisibilityChange,
        }
    }

    /// Effects that follow the pointer only while it is over their
    /// element and return to rest when it leaves.
    pub fn is_hover_gated(&self) -> bool {
        matches!(self, Self::MagneticPull(_) | Self::Tilt(_))
    }

    /// Effects whose commands set the element's `transform` and `opacity`.
    /// An element carries at most one of these at a time.
    pub fn writes_transform(&self) -> bool {
        !matches!(
            self,
            Self::ScrollProgress { .. } | Self::StepActivation(_) | Self::Glow(_)
        )
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::MagneticPull(c) => c.validate(),
            Self::Tilt(c) => c.validate(),
            Self::Parallax(c) => c.validate(),
            Self::FadeReveal(c) => c.validate(),
            Self::StepActivation(c) => c.validate(),
            Self::PointerParallax(c) => c.validate(),
            Self::Glow(c) => c.validate(),
            Self::ScrollProgress { .. } | Self::CursorFollow => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Preset {
    pub name: Label,
    pub effect: Effect,
    #[serde(default)]
    pub transition: Transition,
}

impl Preset {
    pub fn new(name: impl Into<Label>, effect: Effect, transition: Transition) -> Self {
        Self {
            name: name.into(),
            effect,
            transition,
        }
    }

    pub fn signal_kind(&self) -> SignalKind {
        self.effect.signal_kind()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        ConfigError::non_negative("transition.duration_ms", self.transition.duration_ms)?;
        ConfigError::non_negative("transition.delay_ms", self.transition.delay_ms)?;
        self.effect.validate()
    }

    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.transition.delay_ms = delay_ms;
        self
    }

    // --- Builtin catalogue ---

    pub fn magnetic_pull() -> Self {
        Self::new(
            "magnetic-pull",
            Effect::MagneticPull(MagneticConfig::default()),
            Transition::new(200.0, Easing::EaseInOut),
        )
    }

    /// Inner label of a magnetic button; bind it anchored to the button.
    pub fn magnetic_content() -> Self {
        Self::new(
            "magnetic-content",
            Effect::MagneticPull(MagneticConfig::content()),
            Transition::new(200.0, Easing::EaseInOut),
        )
    }

    pub fn tilt() -> Self {
        Self::new(
            "tilt",
            Effect::Tilt(TiltConfig::default()),
            Transition::new(300.0, Easing::EaseInOut),
        )
    }

    pub fn parallax(speed: f64) -> Self {
        Self::new(
            "parallax",
            Effect::Parallax(ParallaxConfig {
                speed,
                ..ParallaxConfig::default()
            }),
            Transition::new(150.0, Easing::EaseInOut),
        )
    }

    /// Word-level reveal, as used by split text.
    pub fn fade_reveal(delay_ms: f64) -> Self {
        Self::new(
            "fade-reveal",
            Effect::FadeReveal(RevealConfig::default()),
            Transition::new(600.0, Easing::Ease).with_delay(delay_ms),
        )
    }

    /// Whole-section reveal: waits for 30% visibility and rises further.
    pub fn section_reveal() -> Self {
        Self::new(
            "section-reveal",
            Effect::FadeReveal(RevealConfig {
                threshold: 0.3,
                hidden_offset_px: 80.0,
            }),
            Transition::new(1000.0, Easing::EaseInOut),
        )
    }

    /// One preset per word of a split-text heading, each delayed
    /// [`WORD_STAGGER_MS`] after the previous.
    pub fn split_text(word_count: usize, base_delay_ms: f64) -> Vec<Self> {
        crate::mappers::reveal::stagger_delays(word_count, base_delay_ms, WORD_STAGGER_MS)
            .into_iter()
            .map(Self::fade_reveal)
            .collect()
    }

    pub fn scroll_progress() -> Self {
        Self::new(
            "scroll-progress",
            Effect::ScrollProgress {
                axis: Axis::Horizontal,
            },
            Transition::new(150.0, Easing::EaseInOut),
        )
    }

    pub fn step_activation(count: usize) -> Self {
        Self::new(
            "step-activation",
            Effect::StepActivation(StepConfig { count }),
            Transition::new(500.0, Easing::EaseInOut),
        )
    }

    pub fn cursor_ring() -> Self {
        Self::new(
            "cursor-ring",
            Effect::CursorFollow,
            Transition::new(200.0, Easing::EaseInOut),
        )
    }

    pub fn cursor_dot() -> Self {
        Self::new("cursor-dot", Effect::CursorFollow, Transition::INSTANT)
    }

    pub fn hero_grid() -> Self {
        Self::new(
            "hero-grid",
            Effect::PointerParallax(PointerParallaxConfig::default()),
            Transition::INSTANT,
        )
    }

    pub fn glow_card() -> Self {
        Self::new(
            "glow-card",
            Effect::Glow(GlowConfig::default()),
            Transition::INSTANT,
        )
    }

    /// Every builtin, keyed by name. The process timeline has four steps.
    pub fn builtins() -> Vec<Self> {
        vec![
            Self::magnetic_pull(),
            Self::magnetic_content(),
            Self::tilt(),
            Self::parallax(0.5),
            Self::fade_reveal(0.0),
            Self::section_reveal(),
            Self::scroll_progress(),
            Self::step_activation(4),
            Self::cursor_ring(),
            Self::cursor_dot(),
            Self::hero_grid(),
            Self::glow_card(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_valid_and_uniquely_named() {
        let builtins = Preset::builtins();
        for preset in &builtins {
            assert!(preset.validate().is_ok(), "{} failed validation", preset.name);
        }
        let mut names: Vec<_> = builtins.iter().map(|p| p.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), builtins.len());
    }

    #[test]
    fn signal_kinds() {
        assert_eq!(Preset::magnetic_pull().signal_kind(), SignalKind::PointerMove);
        assert_eq!(Preset::parallax(0.5).signal_kind(), SignalKind::Scroll);
        assert_eq!(Preset::step_activation(4).signal_kind(), SignalKind::Scroll);
        assert_eq!(
            Preset::section_reveal().signal_kind(),
            SignalKind::VisibilityChange
        );
    }

    #[test]
    fn hover_gating_and_transform_ownership() {
        assert!(Preset::magnetic_content().effect.is_hover_gated());
        assert!(Preset::tilt().effect.is_hover_gated());
        assert!(!Preset::glow_card().effect.is_hover_gated());
        assert!(!Preset::cursor_ring().effect.is_hover_gated());

        assert!(Preset::fade_reveal(0.0).effect.writes_transform());
        assert!(Preset::parallax(0.5).effect.writes_transform());
        assert!(Preset::hero_grid().effect.writes_transform());
        assert!(!Preset::scroll_progress().effect.writes_transform());
        assert!(!Preset::step_activation(4).effect.writes_transform());
        assert!(!Preset::glow_card().effect.writes_transform());
    }

    #[test]
    fn negative_delay_fails_fast() {
        let preset = Preset::fade_reveal(-10.0);
        assert!(matches!(
            preset.validate(),
            Err(ConfigError::Negative {
                field: "transition.delay_ms",
                ..
            })
        ));
    }

    #[test]
    fn split_text_staggers_words() {
        let words = Preset::split_text(3, 200.0);
        let delays: Vec<f64> = words.iter().map(|p| p.transition.delay_ms).collect();
        assert_eq!(delays, vec![200.0, 250.0, 300.0]);
    }

    #[test]
    fn zero_step_timeline_rejected() {
        assert_eq!(
            Preset::step_activation(0).validate(),
            Err(ConfigError::ZeroSteps)
        );
    }

    #[test]
    fn json_shape() {
        let json = serde_json::to_string(&Preset::tilt()).unwrap_or_default();
        assert!(json.contains(r#""tilt":{"tilt_range_deg":20.0"#));
        let back: Preset = serde_json::from_str(&json).unwrap_or_else(|_| Preset::cursor_dot());
        assert_eq!(back, Preset::tilt());
    }
}
