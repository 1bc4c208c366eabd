//! Consequence Service - compile events and cached queries
//!
//! ```text
//!   compile_event(id, output)              query(id, instance?, predicate, kind)
//!          │                                         │
//!          ▼                                         ▼
//!   CompositionResolver                     published artifact set
//!          │                                         │
//!          ▼                                         ▼
//!   next revision ─► QueryCache fence ◄───── QueryCache::get_or_compute
//!          │                                         │ miss
//!          ▼                                         ▼
//!   publish Arc<CompilationArtifactSet>      ConsequenceAnalyzer
//! ```
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use consequence_engine::usecases::ConsequenceService;
//! use consequence_engine::{AnalysisKind, DirectoryArtifactSource, EngineConfig};
//!
//! let service = ConsequenceService::new(EngineConfig::default())?;
//! service.compile_from_source("lease-42", &DirectoryArtifactSource::new("out/"))?;
//! let result = service.query("lease-42", None, "pay_rent", AnalysisKind::Violation)?;
//! for entry in &result.consequences {
//!     println!("{} {}", entry.relation.as_str(), entry.full_expression);
//! }
//! ```

use crate::config::EngineConfig;
use crate::errors::{EngineError, Result};
use crate::features::cache::{CacheStats, QueryCache, QueryKey};
use crate::features::composition::{
    ArtifactSetId, ArtifactSource, CompilationArtifactSet, CompilationOutput,
    CompositionResolver,
};
use crate::features::consequence::{
    AnalysisKind, AnalysisResult, ConsequenceAnalyzer, ScenarioSamples, SpaceAnalysis,
    SupportProfile,
};
use crate::shared::models::{InstanceName, SolutionSpace};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use prometheus::{register_int_counter_with_registry, IntCounter, Opts, Registry};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Exposed surface of the engine
///
/// Thread-safe; share it behind an `Arc`.
pub struct ConsequenceService {
    config: EngineConfig,
    resolver: CompositionResolver,
    analyzer: ConsequenceAnalyzer,
    sets: DashMap<ArtifactSetId, Arc<CompilationArtifactSet>>,
    revision: AtomicU64,
    cache: QueryCache<AnalysisResult>,
    compilations: IntCounter,
    registry: Registry,
}

impl ConsequenceService {
    pub fn new(config: EngineConfig) -> Result<Self> {
        Self::with_registry(config, Registry::new())
    }

    /// Service whose metrics are registered in `registry`
    pub fn with_registry(config: EngineConfig, registry: Registry) -> Result<Self> {
        config.validate()?;
        let cache = QueryCache::new(config.cache.clone(), &registry)?;
        let compilations = register_int_counter_with_registry!(
            Opts::new(
                "consequence_compilations_total",
                "Published compilation events"
            ),
            registry
        )?;
        Ok(Self {
            analyzer: ConsequenceAnalyzer::new(config.analysis.clone()),
            resolver: CompositionResolver::new(),
            sets: DashMap::new(),
            revision: AtomicU64::new(0),
            cache,
            compilations,
            registry,
            config,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve and publish the artifacts of one compilation event
    ///
    /// Cache entries of `artifact_set_id` are invalidated before the new set
    /// becomes visible. If resolution fails the previously published set
    /// stays in place.
    pub fn compile_event(
        &self,
        artifact_set_id: impl Into<ArtifactSetId>,
        output: CompilationOutput,
    ) -> Result<Arc<CompilationArtifactSet>> {
        let id = artifact_set_id.into();
        let resolved = self.resolver.resolve(id.clone(), output)?;

        // Revision assignment, invalidation and publication happen under the
        // entry's shard lock, so publications of one id are totally ordered
        let published = match self.sets.entry(id.clone()) {
            Entry::Occupied(mut entry) => {
                let set = self.fence(&id, resolved);
                entry.insert(Arc::clone(&set));
                set
            }
            Entry::Vacant(entry) => {
                let set = self.fence(&id, resolved);
                entry.insert(Arc::clone(&set));
                set
            }
        };

        self.compilations.inc();
        if published.strategy().is_ambiguous() {
            warn!(
                artifact_set = %id,
                final_instance = %published.final_instance_name(),
                "Final instance chosen from ambiguous production timestamps"
            );
        }
        info!(
            artifact_set = %id,
            revision = published.revision(),
            instances = published.execution_order().len(),
            final_instance = %published.final_instance_name(),
            rejected = published.rejected().len(),
            "Published compilation"
        );
        Ok(published)
    }

    fn fence(&self, id: &ArtifactSetId, set: CompilationArtifactSet) -> Arc<CompilationArtifactSet> {
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        self.cache.invalidate_before(id, revision);
        Arc::new(set.with_revision(revision))
    }

    /// Collect from `source`, then `compile_event`
    pub fn compile_from_source(
        &self,
        artifact_set_id: impl Into<ArtifactSetId>,
        source: &dyn ArtifactSource,
    ) -> Result<Arc<CompilationArtifactSet>> {
        let id = artifact_set_id.into();
        debug!(artifact_set = %id, source = %source.describe(), "Collecting artifacts");
        let output = source.collect()?;
        self.compile_event(id, output)
    }

    /// Consequences of `predicate_name` in one instance; `None` is the final
    /// instance
    pub fn query(
        &self,
        artifact_set_id: &str,
        instance: Option<&str>,
        predicate_name: &str,
        kind: AnalysisKind,
    ) -> Result<Arc<AnalysisResult>> {
        let set = self.artifact_set(artifact_set_id)?;
        let instance_name = set.resolve_instance(instance)?;
        let space = set.space(Some(instance_name.as_str()))?;
        self.cached_analysis(&set, instance_name, space, predicate_name, kind)
    }

    fn cached_analysis(
        &self,
        set: &CompilationArtifactSet,
        instance_name: &InstanceName,
        space: &SolutionSpace,
        predicate_name: &str,
        kind: AnalysisKind,
    ) -> Result<Arc<AnalysisResult>> {
        if !space.contains_name(predicate_name) {
            return Err(EngineError::unknown_predicate(
                predicate_name,
                instance_name.as_str(),
            ));
        }
        let key = QueryKey::new(set.id().clone(), instance_name.clone(), kind, predicate_name);
        self.cache.get_or_compute(key, set.revision(), || {
            self.analyzer.analyze(space, predicate_name, kind)
        })
    }

    /// Violation and fulfillment results for every predicate of an instance,
    /// each served through the cache
    pub fn analyze_instance(
        &self,
        artifact_set_id: &str,
        instance: Option<&str>,
    ) -> Result<SpaceAnalysis> {
        let set = self.artifact_set(artifact_set_id)?;
        let instance_name = set.resolve_instance(instance)?;
        let space = set.space(Some(instance_name.as_str()))?;
        let names: Vec<String> = space.predicate_names().map(str::to_string).collect();

        let analyze = |name: &String| -> Result<(AnalysisResult, AnalysisResult)> {
            let violation =
                self.cached_analysis(&set, instance_name, space, name, AnalysisKind::Violation)?;
            let fulfillment =
                self.cached_analysis(&set, instance_name, space, name, AnalysisKind::Fulfillment)?;
            Ok((violation.as_ref().clone(), fulfillment.as_ref().clone()))
        };

        let pairs: Vec<(AnalysisResult, AnalysisResult)> = if self.config.analysis.parallel {
            names.par_iter().map(analyze).collect::<Result<_>>()?
        } else {
            names.iter().map(analyze).collect::<Result<_>>()?
        };
        let (violation_results, fulfillment_results) = pairs.into_iter().unzip();

        Ok(SpaceAnalysis {
            instance_name: instance_name.to_string(),
            satisfiable: space.satisfiable(),
            total_solutions: space.total_solutions(),
            predicate_names: names,
            violation_results,
            fulfillment_results,
        })
    }

    /// Example fulfillment and violation scenarios; `limit` defaults to the
    /// configured sample limit
    pub fn sample_scenarios(
        &self,
        artifact_set_id: &str,
        instance: Option<&str>,
        predicate_name: &str,
        limit: Option<usize>,
    ) -> Result<ScenarioSamples> {
        let set = self.artifact_set(artifact_set_id)?;
        let space = set.space(instance)?;
        let limit = limit.unwrap_or(self.config.analysis.sample_limit);
        self.analyzer.sample_scenarios(space, predicate_name, limit)
    }

    pub fn support_profile(
        &self,
        artifact_set_id: &str,
        instance: Option<&str>,
    ) -> Result<SupportProfile> {
        let set = self.artifact_set(artifact_set_id)?;
        let space = set.space(instance)?;
        Ok(self.analyzer.support_profile(space))
    }

    /// Currently published set
    pub fn artifact_set(&self, artifact_set_id: &str) -> Result<Arc<CompilationArtifactSet>> {
        self.sets
            .get(artifact_set_id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| EngineError::UnknownArtifactSet(artifact_set_id.to_string()))
    }

    /// Ids of all published sets, sorted
    pub fn artifact_set_ids(&self) -> Vec<ArtifactSetId> {
        let mut ids: Vec<ArtifactSetId> = self.sets.iter().map(|entry| entry.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Unpublish a set and drop its cache entries
    ///
    /// Readers that already hold the set may finish their analysis, but
    /// their results are no longer cached.
    pub fn remove_artifact_set(&self, artifact_set_id: &str) -> Result<Arc<CompilationArtifactSet>> {
        // Same shard lock as compile_event, so a concurrent publication of
        // this id is never fenced away
        let (id, set) = match self.sets.entry(ArtifactSetId::from(artifact_set_id)) {
            Entry::Occupied(entry) => {
                self.cache.invalidate(entry.key());
                entry.remove_entry()
            }
            Entry::Vacant(_) => {
                return Err(EngineError::UnknownArtifactSet(artifact_set_id.to_string()))
            }
        };
        info!(artifact_set = %id, revision = set.revision(), "Removed artifact set");
        Ok(set)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn cache(&self) -> &QueryCache<AnalysisResult> {
        &self.cache
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
