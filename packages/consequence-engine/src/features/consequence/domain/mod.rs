/*
 * Consequence Domain Models
 */

mod analysis;
mod report;

pub use analysis::{AnalysisKind, AnalysisResult, ConsequenceEntry, Relation, ScenarioMarker};
pub use report::{
    PredicateSupport, ScenarioSample, ScenarioSamples, SpaceAnalysis, SupportProfile,
};
