//! Core types for the query cache

use crate::features::composition::ArtifactSetId;
use crate::features::consequence::AnalysisKind;
use crate::shared::models::InstanceName;
use chrono::{DateTime, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// (artifact set, instance, analysis kind, predicate)
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct QueryKey {
    pub artifact_set: ArtifactSetId,
    pub instance: InstanceName,
    pub kind: AnalysisKind,
    pub predicate: String,
}

impl QueryKey {
    pub fn new(
        artifact_set: ArtifactSetId,
        instance: InstanceName,
        kind: AnalysisKind,
        predicate: impl Into<String>,
    ) -> Self {
        Self {
            artifact_set,
            instance,
            kind,
            predicate: predicate.into(),
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}#{}#{}#{}",
            self.artifact_set, self.instance, self.kind, self.predicate
        )
    }
}

/// Cached value with the artifact-set revision it was computed from
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub key: QueryKey,
    pub value: Arc<T>,
    pub revision: u64,
    pub created_at: DateTime<Utc>,
}

/// All entries of one artifact set, tagged with the set's revision
#[derive(Debug)]
pub(crate) struct SetBucket<T> {
    pub(crate) revision: u64,
    pub(crate) entries: FxHashMap<QueryKey, CacheEntry<T>>,
}

impl<T> SetBucket<T> {
    pub(crate) fn new(revision: u64) -> Self {
        Self {
            revision,
            entries: FxHashMap::default(),
        }
    }
}

/// Point-in-time cache statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheStats {
    pub enabled: bool,
    pub hits: u64,
    pub misses: u64,
    pub invalidations: u64,
    pub entries: usize,
    pub artifact_sets: usize,
    pub hit_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_display() {
        let key = QueryKey::new(
            ArtifactSetId::new("contract-7"),
            InstanceName::new("composite_B").unwrap(),
            AnalysisKind::Violation,
            "pay_rent",
        );
        assert_eq!(key.to_string(), "contract-7#composite_B#violation#pay_rent");
    }
}
