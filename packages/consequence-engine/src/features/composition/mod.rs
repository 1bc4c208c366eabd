/*
 * Composition Resolver
 *
 * One source program may be compiled into several solver invocations
 * (components validated in isolation plus one authoritative composite).
 * This feature reconciles them into a CompilationArtifactSet.
 *
 * Architecture:
 * - Domain: ProducedArtifact, ExecutionRecord, CompilationArtifactSet
 * - Application: CompositionResolver (explicit order, timestamp fallback)
 * - Infrastructure: DirectoryArtifactSource (compiler output directory)
 * - Ports: ArtifactSource trait
 */

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::CompositionResolver;
pub use domain::{
    ArtifactSetId, ArtifactSetSummary, CompilationArtifactSet, CompilationOutput,
    ExecutionEntry, ExecutionRecord, InstanceSummary, ProducedArtifact, RejectedArtifact,
    ResolutionStrategy,
};
pub use infrastructure::DirectoryArtifactSource;
pub use ports::ArtifactSource;
