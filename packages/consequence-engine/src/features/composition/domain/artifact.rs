//! Inputs of one compilation event

use crate::errors::{EngineError, Result};
use crate::shared::models::{InstanceName, SolutionSpace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Stable identity of a compiled source program (e.g. a contract id)
///
/// Survives recompilation; the revision distinguishes compilations.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactSetId(String);

impl ArtifactSetId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ArtifactSetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ArtifactSetId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl Borrow<str> for ArtifactSetId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactSetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One solver invocation's loaded output
#[derive(Debug, Clone)]
pub struct ProducedArtifact {
    pub instance_name: InstanceName,
    /// Where the artifact came from (file path or caller label)
    pub reference: String,
    pub produced_at: DateTime<Utc>,
    pub space: Arc<SolutionSpace>,
}

impl ProducedArtifact {
    /// Artifact whose instance name is taken from its space
    pub fn new(
        reference: impl Into<String>,
        produced_at: DateTime<Utc>,
        space: impl Into<Arc<SolutionSpace>>,
    ) -> Self {
        let space = space.into();
        Self {
            instance_name: space.instance_name().clone(),
            reference: reference.into(),
            produced_at,
            space,
        }
    }
}

/// One invocation in the compiler's cascade metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionEntry {
    pub instance: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub results_file: Option<String>,
}

/// Invocation order of one compilation; the last entry is authoritative
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    #[serde(default)]
    pub executions: Vec<ExecutionEntry>,
}

impl ExecutionRecord {
    pub fn from_instances<I, S>(instances: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            executions: instances
                .into_iter()
                .map(|instance| ExecutionEntry {
                    instance: instance.into(),
                    results_file: None,
                })
                .collect(),
        }
    }

    /// Parse the compiler's cascade metadata; unknown fields are ignored
    pub fn from_json_slice(reference: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| {
            EngineError::malformed(reference, format!("invalid execution record: {}", e))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.executions.is_empty()
    }

    pub fn instances(&self) -> impl Iterator<Item = &str> {
        self.executions.iter().map(|entry| entry.instance.as_str())
    }
}

/// An artifact the source could not load
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedArtifact {
    pub reference: String,
    pub code: String,
    pub reason: String,
}

impl RejectedArtifact {
    pub fn new(reference: impl Into<String>, error: &EngineError) -> Self {
        Self {
            reference: reference.into(),
            code: error.as_code().to_string(),
            reason: error.to_string(),
        }
    }
}

/// Everything one compilation event produced
#[derive(Debug, Clone, Default)]
pub struct CompilationOutput {
    pub artifacts: Vec<ProducedArtifact>,
    pub execution_record: Option<ExecutionRecord>,
    pub rejected: Vec<RejectedArtifact>,
}

impl CompilationOutput {
    pub fn new(artifacts: Vec<ProducedArtifact>) -> Self {
        Self {
            artifacts,
            ..Default::default()
        }
    }

    pub fn with_execution_record(mut self, record: ExecutionRecord) -> Self {
        self.execution_record = Some(record);
        self
    }
}
