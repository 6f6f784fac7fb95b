use kinetic_protocol::SignalKind;
use thiserror::Error;

use crate::scope::ElementId;

/// A signal carried a coordinate that cannot be mapped. The binding keeps
/// its last good state instead of propagating the value.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SampleError {
    #[error("non-finite {field} in {kind} sample")]
    NonFinite {
        kind: SignalKind,
        field: &'static str,
    },
}

/// A preset or viewport parameter outside its valid range. Raised when a
/// binding is created, never while samples are processed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be finite")]
    NonFinite { field: &'static str },
    #[error("{field} must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("step activation needs at least one step")]
    ZeroSteps,
    #[error("visibility threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),
    #[error("unknown preset: {0}")]
    UnknownPreset(String),
    #[error("{0} already has a binding that owns its transform")]
    TransformOwned(ElementId),
}

impl ConfigError {
    /// Check a parameter that must be a finite, non-negative number.
    pub(crate) fn non_negative(field: &'static str, value: f64) -> Result<(), Self> {
        if !value.is_finite() {
            return Err(Self::NonFinite { field });
        }
        if value < 0.0 {
            return Err(Self::Negative { field, value });
        }
        Ok(())
    }

    pub(crate) fn finite(field: &'static str, value: f64) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::NonFinite { field })
        }
    }
}

#[derive(Debug, Error)]
pub enum TableError {
    #[error("preset table is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("preset {name}: {source}")]
    Invalid {
        name: String,
        #[source]
        source: ConfigError,
    },
}

#[derive(Debug, Error)]
pub enum EffectError {
    #[error("invalid sample: {0}")]
    Sample(#[from] SampleError),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("preset table: {0}")]
    Table(#[from] TableError),
}
