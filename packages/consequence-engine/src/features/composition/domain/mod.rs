/*
 * Composition Domain Models
 *
 * A compilation event yields one artifact per solver invocation plus an
 * optional execution record. The resolver turns them into a
 * CompilationArtifactSet with an explicit final instance.
 */

mod artifact;
mod artifact_set;

pub use artifact::{
    ArtifactSetId, CompilationOutput, ExecutionEntry, ExecutionRecord, ProducedArtifact,
    RejectedArtifact,
};
pub use artifact_set::{
    ArtifactSetSummary, CompilationArtifactSet, InstanceSummary, ResolutionStrategy,
};
