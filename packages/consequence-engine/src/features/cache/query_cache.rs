//! Revision-tagged memoization of analysis results
//!
//! Entries are grouped per artifact set into buckets carrying the set's
//! revision. A single `RwLock` guards all buckets, so invalidating a set is
//! atomic with respect to every concurrent lookup and store.
//!
//! Buckets are only installed by `invalidate_before`, the fence a publisher
//! runs before a new revision becomes visible.
//!
//! Rules:
//! - lookup with a revision other than the bucket's: miss
//! - store into a missing bucket (set removed or never published): discarded
//! - store from a revision other than the bucket's: discarded
//! - failed computations store nothing

use super::metrics::QueryCacheMetrics;
use super::types::{CacheEntry, CacheStats, QueryKey, SetBucket};
use crate::config::CacheConfig;
use crate::errors::{EngineError, Result};
use crate::features::composition::ArtifactSetId;
use chrono::Utc;
use parking_lot::RwLock;
use prometheus::Registry;
use rustc_hash::FxHashMap;
use std::sync::Arc;
use tracing::debug;

pub struct QueryCache<T> {
    config: CacheConfig,
    buckets: RwLock<FxHashMap<ArtifactSetId, SetBucket<T>>>,
    metrics: Arc<QueryCacheMetrics>,
}

impl<T> QueryCache<T> {
    pub fn new(config: CacheConfig, registry: &Registry) -> Result<Self> {
        Ok(Self {
            config,
            buckets: RwLock::new(FxHashMap::default()),
            metrics: Arc::new(QueryCacheMetrics::new(registry)?),
        })
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Cached value for `key` at `revision`, computing and storing it on a
    /// miss
    ///
    /// `compute` runs outside the lock; concurrent misses on the same key may
    /// both compute, and the first store wins.
    pub fn get_or_compute<F>(&self, key: QueryKey, revision: u64, compute: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        if !self.config.enabled {
            return compute().map(Arc::new);
        }

        if let Some(value) = self.lookup(&key, revision)? {
            self.metrics.hits.inc();
            debug!(key = %key, revision, "Query cache hit");
            return Ok(value);
        }

        self.metrics.misses.inc();
        debug!(key = %key, revision, "Query cache miss");

        let timer = self.metrics.compute_seconds.start_timer();
        let computed = compute();
        timer.observe_duration();

        let value = Arc::new(computed?);
        self.store(key, revision, Arc::clone(&value));
        Ok(value)
    }

    fn lookup(&self, key: &QueryKey, revision: u64) -> Result<Option<Arc<T>>> {
        let buckets = self.buckets.read();
        let Some(bucket) = buckets.get(&key.artifact_set) else {
            return Ok(None);
        };
        if bucket.revision != revision {
            return Ok(None);
        }
        match bucket.entries.get(key) {
            Some(entry) if entry.revision != bucket.revision => {
                Err(EngineError::cache_inconsistency(format!(
                    "entry {} carries revision {} inside a revision {} bucket",
                    key, entry.revision, bucket.revision
                )))
            }
            Some(entry) => Ok(Some(Arc::clone(&entry.value))),
            None => Ok(None),
        }
    }

    fn store(&self, key: QueryKey, revision: u64, value: Arc<T>) {
        let mut buckets = self.buckets.write();
        let Some(bucket) = buckets.get_mut(&key.artifact_set) else {
            debug!(key = %key, revision, "Discarding result for an unpublished artifact set");
            return;
        };

        if revision != bucket.revision {
            debug!(
                key = %key,
                revision,
                current = bucket.revision,
                "Discarding result computed from a superseded revision"
            );
            return;
        }
        if bucket.entries.len() >= self.config.max_entries_per_set
            && !bucket.entries.contains_key(&key)
        {
            debug!(key = %key, "Artifact-set bucket full; result not cached");
            return;
        }

        // First store wins so concurrent misses hand out one Arc afterwards
        bucket.entries.entry(key.clone()).or_insert(CacheEntry {
            key,
            value,
            revision,
            created_at: Utc::now(),
        });

        let total: usize = buckets.values().map(|bucket| bucket.entries.len()).sum();
        self.metrics.entries.set(total as i64);
    }

    /// Drop every entry of `artifact_set`
    pub fn invalidate(&self, artifact_set: &ArtifactSetId) {
        let mut buckets = self.buckets.write();
        let removed = buckets
            .remove(artifact_set)
            .map(|bucket| bucket.entries.len())
            .unwrap_or(0);
        self.after_invalidation(&buckets, artifact_set, removed);
    }

    /// Drop every entry of `artifact_set` and fence out stores from
    /// revisions older than `revision`
    pub fn invalidate_before(&self, artifact_set: &ArtifactSetId, revision: u64) {
        let mut buckets = self.buckets.write();
        let removed = buckets
            .insert(artifact_set.clone(), SetBucket::new(revision))
            .map(|bucket| bucket.entries.len())
            .unwrap_or(0);
        self.after_invalidation(&buckets, artifact_set, removed);
    }

    fn after_invalidation(
        &self,
        buckets: &FxHashMap<ArtifactSetId, SetBucket<T>>,
        artifact_set: &ArtifactSetId,
        removed: usize,
    ) {
        self.metrics.invalidations.inc();
        let total: usize = buckets.values().map(|bucket| bucket.entries.len()).sum();
        self.metrics.entries.set(total as i64);
        debug!(artifact_set = %artifact_set, removed, "Invalidated query cache");
    }

    pub fn len(&self) -> usize {
        self.buckets
            .read()
            .values()
            .map(|bucket| bucket.entries.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries_for(&self, artifact_set: &ArtifactSetId) -> usize {
        self.buckets
            .read()
            .get(artifact_set)
            .map(|bucket| bucket.entries.len())
            .unwrap_or(0)
    }

    pub fn revision_of(&self, artifact_set: &ArtifactSetId) -> Option<u64> {
        self.buckets.read().get(artifact_set).map(|bucket| bucket.revision)
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.buckets
            .read()
            .get(&key.artifact_set)
            .map(|bucket| bucket.entries.contains_key(key))
            .unwrap_or(false)
    }

    pub fn metrics(&self) -> Arc<QueryCacheMetrics> {
        Arc::clone(&self.metrics)
    }

    pub fn stats(&self) -> CacheStats {
        let buckets = self.buckets.read();
        CacheStats {
            enabled: self.config.enabled,
            hits: self.metrics.hits.get(),
            misses: self.metrics.misses.get(),
            invalidations: self.metrics.invalidations.get(),
            entries: buckets.values().map(|bucket| bucket.entries.len()).sum(),
            artifact_sets: buckets.len(),
            hit_rate: self.metrics.hit_rate(),
        }
    }

    #[cfg(test)]
    pub(crate) fn corrupt_entry_revision(&self, key: &QueryKey, revision: u64) {
        if let Some(entry) = self
            .buckets
            .write()
            .get_mut(&key.artifact_set)
            .and_then(|bucket| bucket.entries.get_mut(key))
        {
            entry.revision = revision;
        }
    }
}
