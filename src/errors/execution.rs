// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use thiserror::Error;

use crate::engine::Mode;
use crate::errors::ValidationError;

/// Errors that abort a `fit_transform` or `transform` invocation.
///
/// No variant carries a partial result: an invocation either produces the full
/// table or one of these.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A stateful feature has no learned parameters yet
    #[error("Feature '{feature}' has not been fitted; call fit_transform first")]
    NotFitted { feature: String },

    /// A feature's computation failed
    #[error("Feature '{feature}' failed during {mode}: {source}")]
    Computation {
        feature: String,
        mode: Mode,
        #[source]
        source: anyhow::Error,
    },

    /// The request could not be resolved against the registry
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Fitted state could not be (de)serialized
    #[error("Fitted state serialization failed: {0}")]
    StateSerialization(#[from] serde_json::Error),

    /// Internal error (task join failures, invocation state violations)
    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl ExecutionError {
    /// Name of the feature this error is attributed to, if any.
    pub fn feature(&self) -> Option<&str> {
        match self {
            ExecutionError::NotFitted { feature } | ExecutionError::Computation { feature, .. } => {
                Some(feature)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computation_error_carries_feature_and_mode() {
        let err = ExecutionError::Computation {
            feature: "pickup_hour".into(),
            mode: Mode::Transform,
            source: anyhow::anyhow!("boom"),
        };
        assert_eq!(err.feature(), Some("pickup_hour"));
        assert_eq!(
            err.to_string(),
            "Feature 'pickup_hour' failed during transform: boom"
        );
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: ExecutionError = ValidationError::UnknownFeature { name: "x".into() }.into();
        assert_eq!(err.to_string(), "Feature 'x' is not registered");
        assert_eq!(err.feature(), None);
    }
}
