/*
 * Consequence Engine - invariant discovery over compiled legal contracts
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Predicate, Solution, SolutionSpace)
 * - features/    : Vertical slices (solution_model → composition → consequence → cache)
 * - usecases/    : ConsequenceService (compile_event / query)
 * - config/      : Versioned YAML configuration
 *
 * Concurrency:
 * - Solution spaces are immutable and shared via Arc
 * - The query cache is the only mutable shared structure
 * - Whole-instance reports fan out over rayon
 */

#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;
pub mod usecases;

pub use config::{AnalysisConfig, ArtifactLayout, CacheConfig, ConfigError, EngineConfig};
pub use errors::{EngineError, Result};
pub use features::cache::{CacheStats, QueryCache, QueryKey};
pub use features::composition::{
    ArtifactSetId, ArtifactSource, CompilationArtifactSet, CompilationOutput,
    CompositionResolver, DirectoryArtifactSource, ExecutionRecord, ProducedArtifact,
    ResolutionStrategy,
};
pub use features::consequence::{
    AnalysisKind, AnalysisResult, ConsequenceAnalyzer, ConsequenceEntry, Relation,
    ScenarioMarker,
};
pub use features::solution_model::SolutionModelLoader;
pub use shared::models::{InstanceName, Predicate, PredicateId, PredicateKind, Solution, SolutionSpace};
pub use usecases::ConsequenceService;
