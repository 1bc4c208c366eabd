//! Error types for consequence-engine
//!
//! Every failure in the crate is a deterministic function of its input and is
//! surfaced synchronously; nothing here is retried.

use thiserror::Error;

use crate::config::ConfigError;

/// Main error type for consequence-engine operations
#[derive(Debug, Error)]
pub enum EngineError {
    /// Structural violation in one solver artifact (fatal for that artifact only)
    #[error("Malformed artifact '{artifact}': {reason}")]
    MalformedArtifact { artifact: String, reason: String },

    /// Query names a predicate absent from the target space
    #[error("Unknown predicate '{predicate}' in instance '{instance}'")]
    UnknownPredicate { predicate: String, instance: String },

    /// Stale or mistyped artifact-set reference
    #[error("Unknown artifact set: {0}")]
    UnknownArtifactSet(String),

    /// Stale or mistyped instance reference
    #[error("Unknown instance '{instance}' in artifact set '{artifact_set}'")]
    UnknownInstance {
        artifact_set: String,
        instance: String,
    },

    /// Artifacts of one compilation event cannot be reconciled
    #[error("Composition mismatch: {0}")]
    CompositionMismatch(String),

    /// Internal cache invariant violated (programming defect)
    #[error("Cache inconsistency: {0}")]
    CacheInconsistency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Metric registration error
    #[error("Metrics error: {0}")]
    Metrics(#[from] prometheus::Error),
}

impl EngineError {
    pub fn malformed(artifact: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::MalformedArtifact {
            artifact: artifact.into(),
            reason: reason.into(),
        }
    }

    pub fn unknown_predicate(predicate: impl Into<String>, instance: impl Into<String>) -> Self {
        EngineError::UnknownPredicate {
            predicate: predicate.into(),
            instance: instance.into(),
        }
    }

    pub fn unknown_instance(artifact_set: impl Into<String>, instance: impl Into<String>) -> Self {
        EngineError::UnknownInstance {
            artifact_set: artifact_set.into(),
            instance: instance.into(),
        }
    }

    pub fn composition(message: impl Into<String>) -> Self {
        EngineError::CompositionMismatch(message.into())
    }

    pub fn cache_inconsistency(message: impl Into<String>) -> Self {
        EngineError::CacheInconsistency(message.into())
    }

    /// Stable snake_case code for callers that map errors onto responses
    pub fn as_code(&self) -> &'static str {
        match self {
            EngineError::MalformedArtifact { .. } => "malformed_artifact",
            EngineError::UnknownPredicate { .. } => "unknown_predicate",
            EngineError::UnknownArtifactSet(_) => "unknown_artifact_set",
            EngineError::UnknownInstance { .. } => "unknown_instance",
            EngineError::CompositionMismatch(_) => "composition_mismatch",
            EngineError::CacheInconsistency(_) => "cache_inconsistency",
            EngineError::Config(_) => "config",
            EngineError::Io(_) => "io",
            EngineError::Metrics(_) => "metrics",
        }
    }

    /// True for errors caused by the caller's reference or input rather than
    /// by the engine itself
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            EngineError::MalformedArtifact { .. }
                | EngineError::UnknownPredicate { .. }
                | EngineError::UnknownArtifactSet(_)
                | EngineError::UnknownInstance { .. }
                | EngineError::CompositionMismatch(_)
        )
    }
}

/// Result type alias for consequence-engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
