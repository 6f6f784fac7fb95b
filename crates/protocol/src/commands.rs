use serde::{Deserialize, Serialize};

use crate::transform::TransformState;
use crate::types::Point;

/// A single, stateless style instruction for one bound element.
///
/// Mappers produce these; appliers write them onto the presentation layer.
/// Each command carries the full target state so writing it twice is the
/// same as writing it once.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleCommand {
    /// Set the element's composed transform and opacity, optionally inside
    /// a `perspective(..)` for 3D rotations.
    Transform {
        state: TransformState,
        perspective_px: Option<f64>,
        #[serde(default)]
        order: TransformOrder,
    },

    /// Fill a bar along `axis` to `percent` (0–100).
    Progress { axis: Axis, percent: f64 },

    /// Activate the steps of a timeline up to and including `active_step`.
    Steps(StepActivation),

    /// Centre a radial glow of `radius_px` at `position`, relative to the
    /// element's own box.
    Glow { position: Point, radius_px: f64 },

    /// Return the element to its untransformed state.
    Reset,
}

impl StyleCommand {
    pub fn transform(state: TransformState) -> Self {
        Self::Transform {
            state,
            perspective_px: None,
            order: TransformOrder::default(),
        }
    }

    /// The transform this command implies, if it sets one.
    pub fn transform_state(&self) -> Option<TransformState> {
        match self {
            Self::Transform { state, .. } => Some(*state),
            Self::Reset => Some(TransformState::IDENTITY),
            _ => None,
        }
    }
}

/// Order in which translation and rotation compose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransformOrder {
    /// Move in screen space, then rotate in place.
    #[default]
    TranslateRotate,
    /// Rotate first so the translation runs along the tilted plane.
    RotateTranslate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    /// The CSS size property a progress bar along this axis drives.
    pub fn css_property(&self) -> &'static str {
        match self {
            Self::Horizontal => "width",
            Self::Vertical => "height",
        }
    }
}

/// Which steps of an `count`-step timeline are reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepActivation {
    pub active_step: usize,
    pub count: usize,
}

impl StepActivation {
    pub fn is_active(&self, index: usize) -> bool {
        index <= self.active_step && index < self.count
    }

    pub fn activated(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.count).filter(|&i| self.is_active(i))
    }

    /// Fill of the connecting line, 0–100. A single-step timeline is
    /// always full.
    pub fn line_percent(&self) -> f64 {
        if self.count <= 1 {
            return 100.0;
        }
        self.active_step.min(self.count - 1) as f64 / (self.count - 1) as f64 * 100.0
    }
}
