use thiserror::Error;

use crate::features::FeatureSide;

/// Everything that can go wrong between taking a native model and handing out a snapshot.
///
/// Engine failures carry no detail beyond the call that reported them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("engine call `{call}` failed")]
    EngineFailure { call: &'static str },

    #[error("{side} enumeration failed in `{call}`{}", .index.map(|i| format!(" at index {i}")).unwrap_or_default())]
    EnumerationFailure {
        side: FeatureSide,
        index: Option<usize>,
        call: &'static str,
    },

    #[error("unsupported feature type: {0}")]
    UnsupportedFeatureType(String),

    #[error("malformed type info: {0}")]
    MalformedTypeInfo(String),

    #[error("model handle used after detach")]
    UseAfterDetach,
}

impl ModelError {
    #[inline]
    pub(crate) fn engine(call: &'static str) -> Self {
        ModelError::EngineFailure { call }
    }

    /// True for errors caused by the model's content rather than the engine or the caller.
    pub fn is_type_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFeatureType(_) | Self::MalformedTypeInfo(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
