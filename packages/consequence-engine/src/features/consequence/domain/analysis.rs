//! Per-predicate analysis results

use crate::shared::models::PredicateKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which scenarios of the target predicate are examined
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisKind {
    /// Solutions where the target is absent
    Violation,
    /// Solutions where the target is present
    Fulfillment,
}

impl AnalysisKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisKind::Violation => "violation",
            AnalysisKind::Fulfillment => "fulfillment",
        }
    }

    /// Presence of the target that puts a solution in the matching partition
    pub fn target_present(&self) -> bool {
        matches!(self, AnalysisKind::Fulfillment)
    }

    pub fn opposite(&self) -> Self {
        match self {
            AnalysisKind::Violation => AnalysisKind::Fulfillment,
            AnalysisKind::Fulfillment => AnalysisKind::Violation,
        }
    }
}

impl FromStr for AnalysisKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "violation" => Ok(AnalysisKind::Violation),
            "fulfillment" => Ok(AnalysisKind::Fulfillment),
            other => Err(format!(
                "Unknown analysis kind '{}'. Valid kinds: violation, fulfillment",
                other
            )),
        }
    }
}

impl fmt::Display for AnalysisKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    AlwaysPresent,
    AlwaysAbsent,
}

impl Relation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::AlwaysPresent => "always_present",
            Relation::AlwaysAbsent => "always_absent",
        }
    }
}

/// A predicate whose truth value is fixed across every matching scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsequenceEntry {
    pub predicate_name: String,
    pub predicate_kind: PredicateKind,
    pub full_expression: String,
    pub relation: Relation,
    /// Matching scenarios in which the predicate holds (0 or `scenario_total`)
    pub occurrence_count: usize,
    pub scenario_total: usize,
}

/// Why a result carries no consequences
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioMarker {
    /// The space has no solutions at all
    Unsatisfiable,
    /// Violation query on a predicate that holds everywhere
    PresentInAllSolutions,
    /// Fulfillment query on a predicate that never holds
    AbsentFromAllSolutions,
}

impl ScenarioMarker {
    pub fn message(&self, predicate_name: &str) -> String {
        match self {
            ScenarioMarker::Unsatisfiable => {
                "Instance has no solutions; the program is unsatisfiable".to_string()
            }
            ScenarioMarker::PresentInAllSolutions => {
                format!("Predicate '{}' is present in all solutions", predicate_name)
            }
            ScenarioMarker::AbsentFromAllSolutions => {
                format!("Predicate '{}' is never fulfilled", predicate_name)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub predicate_name: String,
    pub analysis_kind: AnalysisKind,
    pub total_matching_scenarios: usize,
    pub total_solutions: usize,
    /// always_present entries first, then always_absent
    pub consequences: Vec<ConsequenceEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marker: Option<ScenarioMarker>,
}

impl AnalysisResult {
    pub fn always_present(&self) -> impl Iterator<Item = &ConsequenceEntry> {
        self.consequences
            .iter()
            .filter(|entry| entry.relation == Relation::AlwaysPresent)
    }

    pub fn always_absent(&self) -> impl Iterator<Item = &ConsequenceEntry> {
        self.consequences
            .iter()
            .filter(|entry| entry.relation == Relation::AlwaysAbsent)
    }

    pub fn always_present_count(&self) -> usize {
        self.always_present().count()
    }

    pub fn always_absent_count(&self) -> usize {
        self.always_absent().count()
    }

    /// Scenarios of the opposite kind
    pub fn complement_scenarios(&self) -> usize {
        self.total_solutions
            .saturating_sub(self.total_matching_scenarios)
    }

    pub fn message(&self) -> Option<String> {
        self.marker.map(|marker| marker.message(&self.predicate_name))
    }
}
