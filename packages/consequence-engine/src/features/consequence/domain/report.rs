//! Whole-instance reports

use super::analysis::AnalysisResult;
use crate::shared::models::PredicateKind;
use serde::{Deserialize, Serialize};

/// Violation and fulfillment analysis of every predicate name in one space
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpaceAnalysis {
    pub instance_name: String,
    pub satisfiable: bool,
    pub total_solutions: usize,
    /// Lexical order; the two result lists follow it
    pub predicate_names: Vec<String>,
    pub violation_results: Vec<AnalysisResult>,
    pub fulfillment_results: Vec<AnalysisResult>,
}

impl SpaceAnalysis {
    pub fn violation_of(&self, predicate_name: &str) -> Option<&AnalysisResult> {
        self.violation_results
            .iter()
            .find(|result| result.predicate_name == predicate_name)
    }

    pub fn fulfillment_of(&self, predicate_name: &str) -> Option<&AnalysisResult> {
        self.fulfillment_results
            .iter()
            .find(|result| result.predicate_name == predicate_name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSample {
    pub solution_id: usize,
    /// Expressions of the predicates true in the solution, by id
    pub expressions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioSamples {
    pub predicate_name: String,
    pub total_fulfillment: usize,
    pub total_violation: usize,
    pub fulfillment: Vec<ScenarioSample>,
    pub violation: Vec<ScenarioSample>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredicateSupport {
    pub predicate_name: String,
    pub predicate_kind: PredicateKind,
    /// Solutions in which the predicate holds
    pub support: usize,
    pub ratio: f64,
    /// Holds in every solution of a non-empty space
    pub essential: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportProfile {
    pub instance_name: String,
    pub total_solutions: usize,
    pub predicates: Vec<PredicateSupport>,
    /// Names of the essential predicates
    pub core: Vec<String>,
}

impl SupportProfile {
    pub fn support_of(&self, predicate_name: &str) -> Option<&PredicateSupport> {
        self.predicates
            .iter()
            .find(|support| support.predicate_name == predicate_name)
    }
}
