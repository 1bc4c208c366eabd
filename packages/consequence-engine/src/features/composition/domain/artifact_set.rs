//! Reconciled output of one compilation event

use super::artifact::{ArtifactSetId, RejectedArtifact};
use crate::errors::{EngineError, Result};
use crate::shared::models::{InstanceName, SolutionSpace};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// How the final instance was determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum ResolutionStrategy {
    /// Taken verbatim from the compiler's execution record
    ExplicitOrder,
    /// Inferred from production timestamps; `ambiguous` when the two latest
    /// artifacts share a timestamp
    ProductionTimestamp { ambiguous: bool },
}

impl ResolutionStrategy {
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, ResolutionStrategy::ProductionTimestamp { ambiguous: true })
    }
}

/// Tagged collection of the solution spaces of one compilation
///
/// `execution_order` is a permutation of the keys of `component_spaces` and
/// `final_instance_name` is one of those keys.
#[derive(Debug, Clone)]
pub struct CompilationArtifactSet {
    pub(crate) id: ArtifactSetId,
    pub(crate) revision: u64,
    pub(crate) component_spaces: BTreeMap<InstanceName, Arc<SolutionSpace>>,
    pub(crate) references: BTreeMap<InstanceName, String>,
    pub(crate) final_instance_name: InstanceName,
    pub(crate) execution_order: Vec<InstanceName>,
    pub(crate) strategy: ResolutionStrategy,
    pub(crate) rejected: Vec<RejectedArtifact>,
    pub(crate) fingerprint: blake3::Hash,
    pub(crate) compiled_at: DateTime<Utc>,
}

impl CompilationArtifactSet {
    pub fn id(&self) -> &ArtifactSetId {
        &self.id
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Same set published under another revision
    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn component_spaces(&self) -> &BTreeMap<InstanceName, Arc<SolutionSpace>> {
        &self.component_spaces
    }

    pub fn final_instance_name(&self) -> &InstanceName {
        &self.final_instance_name
    }

    pub fn execution_order(&self) -> &[InstanceName] {
        &self.execution_order
    }

    pub fn strategy(&self) -> ResolutionStrategy {
        self.strategy
    }

    pub fn rejected(&self) -> &[RejectedArtifact] {
        &self.rejected
    }

    pub fn fingerprint(&self) -> &blake3::Hash {
        &self.fingerprint
    }

    pub fn compiled_at(&self) -> DateTime<Utc> {
        self.compiled_at
    }

    pub fn reference_of(&self, instance: &str) -> Option<&str> {
        self.references.get(instance).map(String::as_str)
    }

    /// Resolve an instance reference; `None` means the final instance
    pub fn resolve_instance(&self, instance: Option<&str>) -> Result<&InstanceName> {
        let wanted = instance.unwrap_or(self.final_instance_name.as_str());
        self.component_spaces
            .get_key_value(wanted)
            .map(|(name, _)| name)
            .ok_or_else(|| EngineError::unknown_instance(self.id.as_str(), wanted))
    }

    /// Space of an instance; `None` means the final instance
    pub fn space(&self, instance: Option<&str>) -> Result<&Arc<SolutionSpace>> {
        let wanted = instance.unwrap_or(self.final_instance_name.as_str());
        self.component_spaces
            .get(wanted)
            .ok_or_else(|| EngineError::unknown_instance(self.id.as_str(), wanted))
    }

    pub fn final_space(&self) -> Result<&Arc<SolutionSpace>> {
        self.space(None)
    }

    pub fn summary(&self) -> ArtifactSetSummary {
        ArtifactSetSummary {
            id: self.id.to_string(),
            revision: self.revision,
            final_instance: self.final_instance_name.to_string(),
            execution_order: self
                .execution_order
                .iter()
                .map(|name| name.to_string())
                .collect(),
            strategy: self.strategy,
            fingerprint: self.fingerprint.to_hex().to_string(),
            compiled_at: self.compiled_at,
            instances: self
                .execution_order
                .iter()
                .filter_map(|name| self.component_spaces.get(name))
                .map(|space| InstanceSummary {
                    name: space.instance_name().to_string(),
                    reference: self
                        .references
                        .get(space.instance_name())
                        .cloned()
                        .unwrap_or_default(),
                    satisfiable: space.satisfiable(),
                    total_solutions: space.total_solutions(),
                    predicate_names: space.distinct_names(),
                    fingerprint: space.fingerprint_hex(),
                })
                .collect(),
            rejected: self.rejected.clone(),
        }
    }
}

/// Serializable view of an artifact set
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactSetSummary {
    pub id: String,
    pub revision: u64,
    pub final_instance: String,
    pub execution_order: Vec<String>,
    #[serde(flatten)]
    pub strategy: ResolutionStrategy,
    pub fingerprint: String,
    pub compiled_at: DateTime<Utc>,
    pub instances: Vec<InstanceSummary>,
    pub rejected: Vec<RejectedArtifact>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSummary {
    pub name: String,
    pub reference: String,
    pub satisfiable: bool,
    pub total_solutions: usize,
    pub predicate_names: usize,
    pub fingerprint: String,
}
