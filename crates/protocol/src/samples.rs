use serde::{Deserialize, Serialize};

use crate::types::Point;

/// One raw pointer event, in viewport-relative coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
}

impl PointerSample {
    pub fn new(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms }
    }

    pub fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, 0.0)
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Name of the first non-finite coordinate, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !self.x.is_finite() {
            Some("x")
        } else if !self.y.is_finite() {
            Some("y")
        } else {
            None
        }
    }
}

/// Document scroll position together with the sizes needed to turn it
/// into a progress fraction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollSample {
    pub offset_px: f64,
    pub viewport_height_px: f64,
    pub document_height_px: f64,
}

impl ScrollSample {
    pub fn new(offset_px: f64, viewport_height_px: f64, document_height_px: f64) -> Self {
        Self {
            offset_px,
            viewport_height_px,
            document_height_px,
        }
    }

    /// Scroll progress through the document, clamped to `[0, 1]`.
    ///
    /// A document that does not scroll (`document <= viewport`) reports 0.
    pub fn progress(&self) -> f64 {
        let scrollable = self.document_height_px - self.viewport_height_px;
        if scrollable.is_nan() || scrollable <= 0.0 || !self.offset_px.is_finite() {
            return 0.0;
        }
        (self.offset_px / scrollable).clamp(0.0, 1.0)
    }

    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !self.offset_px.is_finite() {
            Some("offset_px")
        } else if !self.viewport_height_px.is_finite() {
            Some("viewport_height_px")
        } else if !self.document_height_px.is_finite() {
            Some("document_height_px")
        } else {
            None
        }
    }
}

/// Intersection observation for one element.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySample {
    pub is_visible: bool,
    /// Visible fraction of the element, `[0, 1]`.
    pub ratio: f64,
}

impl VisibilitySample {
    pub fn new(is_visible: bool, ratio: f64) -> Self {
        Self {
            is_visible,
            ratio: if ratio.is_finite() {
                ratio.clamp(0.0, 1.0)
            } else {
                0.0
            },
        }
    }

    pub fn visible() -> Self {
        Self::new(true, 1.0)
    }

    pub fn hidden() -> Self {
        Self::new(false, 0.0)
    }
}

/// The channel a signal travels on. Subscriptions are keyed by
/// `(element, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalKind {
    PointerMove,
    Scroll,
    VisibilityChange,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PointerMove => write!(f, "pointer-move"),
            Self::Scroll => write!(f, "scroll"),
            Self::VisibilityChange => write!(f, "visibility-change"),
        }
    }
}

/// A raw environmental event consumed by the effect engine.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "type", content = "sample")]
pub enum Signal {
    PointerMove(PointerSample),
    /// The pointer left the target element. Carried on the
    /// [`SignalKind::PointerMove`] channel.
    PointerLeave,
    Scroll(ScrollSample),
    Visibility(VisibilitySample),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Self::PointerMove(_) | Self::PointerLeave => SignalKind::PointerMove,
            Self::Scroll(_) => SignalKind::Scroll,
            Self::Visibility(_) => SignalKind::VisibilityChange,
        }
    }
}
