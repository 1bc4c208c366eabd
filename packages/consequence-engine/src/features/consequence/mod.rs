/*
 * Consequence Analysis
 *
 * Answers "when predicate P is violated (or fulfilled), which other
 * predicates invariably hold or never hold?" over one solution space.
 *
 * Architecture:
 * - Domain: AnalysisKind, ConsequenceEntry, AnalysisResult, report types
 * - Application: ConsequenceAnalyzer (partition + invariant counting,
 *   whole-instance reports, scenario samples, support profile)
 *
 * The analyzer is pure; caching lives in the cache feature.
 */

pub mod application;
pub mod domain;

pub use application::ConsequenceAnalyzer;
pub use domain::{
    AnalysisKind, AnalysisResult, ConsequenceEntry, PredicateSupport, Relation, ScenarioMarker,
    ScenarioSample, ScenarioSamples, SpaceAnalysis, SupportProfile,
};
