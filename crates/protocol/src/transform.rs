use serde::{Deserialize, Serialize};

/// The computed visual offset, rotation, scale and opacity of one element
/// at one instant. Recomputed on every sample; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformState {
    pub translate_x: f64,
    pub translate_y: f64,
    pub rotate_x_deg: f64,
    pub rotate_y_deg: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl TransformState {
    pub const IDENTITY: Self = Self {
        translate_x: 0.0,
        translate_y: 0.0,
        rotate_x_deg: 0.0,
        rotate_y_deg: 0.0,
        scale: 1.0,
        opacity: 1.0,
    };

    pub fn translate(x: f64, y: f64) -> Self {
        Self {
            translate_x: x,
            translate_y: y,
            ..Self::IDENTITY
        }
    }

    pub fn rotate(x_deg: f64, y_deg: f64) -> Self {
        Self {
            rotate_x_deg: x_deg,
            rotate_y_deg: y_deg,
            ..Self::IDENTITY
        }
    }

    pub fn with_opacity(self, opacity: f64) -> Self {
        Self { opacity, ..self }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn is_finite(&self) -> bool {
        [
            self.translate_x,
            self.translate_y,
            self.rotate_x_deg,
            self.rotate_y_deg,
            self.scale,
            self.opacity,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Replace every non-finite component with its identity value and
    /// clamp opacity to `[0, 1]`.
    pub fn sanitized(self) -> Self {
        fn or(v: f64, fallback: f64) -> f64 {
            if v.is_finite() { v } else { fallback }
        }
        let id = Self::IDENTITY;
        Self {
            translate_x: or(self.translate_x, id.translate_x),
            translate_y: or(self.translate_y, id.translate_y),
            rotate_x_deg: or(self.rotate_x_deg, id.rotate_x_deg),
            rotate_y_deg: or(self.rotate_y_deg, id.rotate_y_deg),
            scale: or(self.scale, id.scale),
            opacity: or(self.opacity, id.opacity).clamp(0.0, 1.0),
        }
    }
}

impl Default for TransformState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    Linear,
    #[default]
    Ease,
    EaseOut,
    EaseInOut,
}

impl Easing {
    pub fn as_css(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Ease => "ease",
            Self::EaseOut => "ease-out",
            Self::EaseInOut => "ease-in-out",
        }
    }
}

/// Interpolation timing handed to the presentation layer. The engine never
/// steps frames itself; it sets a target and lets the host animate toward
/// it with this timing.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    pub duration_ms: f64,
    pub delay_ms: f64,
    pub easing: Easing,
}

impl Transition {
    /// No interpolation: the target state is shown immediately.
    pub const INSTANT: Self = Self {
        duration_ms: 0.0,
        delay_ms: 0.0,
        easing: Easing::Linear,
    };

    pub fn new(duration_ms: f64, easing: Easing) -> Self {
        Self {
            duration_ms,
            delay_ms: 0.0,
            easing,
        }
    }

    pub fn with_delay(self, delay_ms: f64) -> Self {
        Self { delay_ms, ..self }
    }

    pub fn is_instant(&self) -> bool {
        self.duration_ms <= 0.0 && self.delay_ms <= 0.0
    }

    /// CSS `transition` value for `property`, e.g. `transform 200ms ease 0ms`.
    pub fn to_css(&self, property: &str) -> String {
        format!(
            "{property} {}ms {} {}ms",
            self.duration_ms,
            self.easing.as_css(),
            self.delay_ms
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_identity() {
        let t = TransformState::default();
        assert!(t.is_identity());
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.opacity, 1.0);
    }

    #[test]
    fn sanitized_replaces_non_finite() {
        let t = TransformState {
            translate_x: f64::NAN,
            translate_y: 4.0,
            rotate_x_deg: f64::INFINITY,
            rotate_y_deg: 2.0,
            scale: f64::NEG_INFINITY,
            opacity: 3.0,
        }
        .sanitized();
        assert!(t.is_finite());
        assert_eq!(t.translate_x, 0.0);
        assert_eq!(t.translate_y, 4.0);
        assert_eq!(t.rotate_x_deg, 0.0);
        assert_eq!(t.scale, 1.0);
        assert_eq!(t.opacity, 1.0);
    }

    #[test]
    fn transition_css() {
        let t = Transition::new(600.0, Easing::Ease).with_delay(50.0);
        assert_eq!(t.to_css("opacity"), "opacity 600ms ease 50ms");
        assert!(Transition::INSTANT.is_instant());
    }

    #[test]
    fn partial_json_fills_identity() {
        let t: TransformState =
            serde_json::from_str(r#"{"translate_y": 20.0, "opacity": 0.0}"#).unwrap_or_default();
        assert_eq!(t.translate_y, 20.0);
        assert_eq!(t.opacity, 0.0);
        assert_eq!(t.scale, 1.0);
    }
}
