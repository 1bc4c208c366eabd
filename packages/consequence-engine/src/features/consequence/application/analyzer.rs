/*
 * Consequence Analyzer
 *
 * Partitions the solutions of one space by the presence of a target
 * predicate and reports every other predicate whose truth value is fixed
 * across the matching partition.
 *
 * # Algorithm
 * - Bind the target name to all of its ids; it holds in a solution if any
 *   bound id is true
 * - Select matching solutions (target absent for violation, present for
 *   fulfillment)
 * - One pass over the matching solutions counts, per other name, the
 *   solutions in which some bound id is true
 * - Count 0 → always_absent, count == |matching| → always_present
 *
 * # Time Complexity
 * O(Σ |true ids| over matching solutions + names)
 *
 * # Output order
 * always_present entries first, then always_absent, each by the smallest
 * id bound to the name.
 */

use crate::config::AnalysisConfig;
use crate::errors::{EngineError, Result};
use crate::features::consequence::domain::{
    AnalysisKind, AnalysisResult, ConsequenceEntry, PredicateSupport, Relation, ScenarioMarker,
    ScenarioSample, ScenarioSamples, SpaceAnalysis, SupportProfile,
};
use crate::shared::models::{PredicateId, PredicateKind, Solution, SolutionSpace};
use rayon::prelude::*;
use rustc_hash::FxHashMap;
use tracing::debug;

/// Stateless analyzer over immutable solution spaces
#[derive(Debug, Clone, Default)]
pub struct ConsequenceAnalyzer {
    config: AnalysisConfig,
}

impl ConsequenceAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Violation or fulfillment analysis of `predicate_name`
    ///
    /// Returns `UnknownPredicate` if no id is bound to the name, even when
    /// the space is unsatisfiable.
    pub fn analyze(
        &self,
        space: &SolutionSpace,
        predicate_name: &str,
        kind: AnalysisKind,
    ) -> Result<AnalysisResult> {
        let target_ids = bound_ids(space, predicate_name)?;

        let matching: Vec<&Solution> = space
            .solutions()
            .iter()
            .filter(|solution| solution.holds_any(target_ids) == kind.target_present())
            .collect();

        let marker = if space.solutions().is_empty() {
            Some(ScenarioMarker::Unsatisfiable)
        } else if matching.is_empty() {
            Some(match kind {
                AnalysisKind::Violation => ScenarioMarker::PresentInAllSolutions,
                AnalysisKind::Fulfillment => ScenarioMarker::AbsentFromAllSolutions,
            })
        } else {
            None
        };

        let consequences = if marker.is_some() {
            Vec::new()
        } else {
            invariant_consequences(space, predicate_name, &matching)
        };

        debug!(
            instance = %space.instance_name(),
            predicate = predicate_name,
            kind = kind.as_str(),
            matching = matching.len(),
            consequences = consequences.len(),
            "Analyzed predicate"
        );

        Ok(AnalysisResult {
            predicate_name: predicate_name.to_string(),
            analysis_kind: kind,
            total_matching_scenarios: matching.len(),
            total_solutions: space.total_solutions(),
            consequences,
            marker,
        })
    }

    /// Both analyses for every distinct predicate name, in name order
    pub fn analyze_space(&self, space: &SolutionSpace) -> Result<SpaceAnalysis> {
        let names: Vec<String> = space.predicate_names().map(str::to_string).collect();

        let pairs: Vec<(AnalysisResult, AnalysisResult)> = if self.config.parallel {
            names
                .par_iter()
                .map(|name| self.analyze_both(space, name))
                .collect::<Result<_>>()?
        } else {
            names
                .iter()
                .map(|name| self.analyze_both(space, name))
                .collect::<Result<_>>()?
        };
        let (violation_results, fulfillment_results) = pairs.into_iter().unzip();

        Ok(SpaceAnalysis {
            instance_name: space.instance_name().to_string(),
            satisfiable: space.satisfiable(),
            total_solutions: space.total_solutions(),
            predicate_names: names,
            violation_results,
            fulfillment_results,
        })
    }

    fn analyze_both(
        &self,
        space: &SolutionSpace,
        name: &str,
    ) -> Result<(AnalysisResult, AnalysisResult)> {
        Ok((
            self.analyze(space, name, AnalysisKind::Violation)?,
            self.analyze(space, name, AnalysisKind::Fulfillment)?,
        ))
    }

    /// First `limit` fulfillment and violation solutions of a predicate
    pub fn sample_scenarios(
        &self,
        space: &SolutionSpace,
        predicate_name: &str,
        limit: usize,
    ) -> Result<ScenarioSamples> {
        let target_ids = bound_ids(space, predicate_name)?;

        let (fulfilled, violated): (Vec<&Solution>, Vec<&Solution>) = space
            .solutions()
            .iter()
            .partition(|solution| solution.holds_any(target_ids));

        let sample = |solutions: &[&Solution]| -> Vec<ScenarioSample> {
            solutions
                .iter()
                .take(limit)
                .map(|solution| ScenarioSample {
                    solution_id: solution.id,
                    expressions: solution
                        .true_predicate_ids
                        .iter()
                        .filter_map(|id| space.predicate(*id))
                        .map(|predicate| predicate.full_expression.clone())
                        .collect(),
                })
                .collect()
        };

        Ok(ScenarioSamples {
            predicate_name: predicate_name.to_string(),
            total_fulfillment: fulfilled.len(),
            total_violation: violated.len(),
            fulfillment: sample(&fulfilled[..]),
            violation: sample(&violated[..]),
        })
    }

    /// Per-name support across all solutions and the essential core
    pub fn support_profile(&self, space: &SolutionSpace) -> SupportProfile {
        let total = space.total_solutions();

        let predicates: Vec<PredicateSupport> = space
            .name_bindings()
            .map(|(name, ids)| {
                let support = space
                    .solutions()
                    .iter()
                    .filter(|solution| solution.holds_any(ids))
                    .count();
                PredicateSupport {
                    predicate_name: name.to_string(),
                    predicate_kind: kind_of(space, ids),
                    support,
                    ratio: if total == 0 {
                        0.0
                    } else {
                        support as f64 / total as f64
                    },
                    essential: total > 0 && support == total,
                }
            })
            .collect();

        let core = predicates
            .iter()
            .filter(|support| support.essential)
            .map(|support| support.predicate_name.clone())
            .collect();

        SupportProfile {
            instance_name: space.instance_name().to_string(),
            total_solutions: total,
            predicates,
            core,
        }
    }
}

fn bound_ids<'a>(space: &'a SolutionSpace, predicate_name: &str) -> Result<&'a [PredicateId]> {
    match space.ids_for(predicate_name) {
        Some(ids) if !ids.is_empty() => Ok(ids),
        _ => Err(EngineError::unknown_predicate(
            predicate_name,
            space.instance_name().as_str(),
        )),
    }
}

fn kind_of(space: &SolutionSpace, ids: &[PredicateId]) -> PredicateKind {
    ids.first()
        .and_then(|id| space.predicate(*id))
        .map(|predicate| predicate.kind)
        .unwrap_or(PredicateKind::Act)
}

fn invariant_consequences(
    space: &SolutionSpace,
    target: &str,
    matching: &[&Solution],
) -> Vec<ConsequenceEntry> {
    let bindings: Vec<(&str, &[PredicateId])> = space.name_bindings().collect();

    let mut owner: FxHashMap<PredicateId, usize> = FxHashMap::default();
    for (index, (_, ids)) in bindings.iter().enumerate() {
        for id in ids.iter() {
            owner.insert(*id, index);
        }
    }

    // Several ids may share a name; count each name once per solution
    let mut counts = vec![0usize; bindings.len()];
    let mut last_seen = vec![usize::MAX; bindings.len()];
    for (position, solution) in matching.iter().enumerate() {
        for id in &solution.true_predicate_ids {
            if let Some(&index) = owner.get(id) {
                if last_seen[index] != position {
                    last_seen[index] = position;
                    counts[index] += 1;
                }
            }
        }
    }

    let scenario_total = matching.len();
    let mut present = Vec::new();
    let mut absent = Vec::new();
    for (index, (name, ids)) in bindings.iter().enumerate() {
        if *name == target {
            continue;
        }
        let relation = match counts[index] {
            0 => Relation::AlwaysAbsent,
            count if count == scenario_total => Relation::AlwaysPresent,
            _ => continue,
        };
        let Some(&first_id) = ids.first() else {
            continue;
        };
        let full_expression = ids
            .iter()
            .filter_map(|id| space.predicate(*id))
            .map(|predicate| predicate.full_expression.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        let entry = ConsequenceEntry {
            predicate_name: name.to_string(),
            predicate_kind: kind_of(space, ids),
            full_expression,
            relation,
            occurrence_count: counts[index],
            scenario_total,
        };
        match relation {
            Relation::AlwaysPresent => present.push((first_id, entry)),
            Relation::AlwaysAbsent => absent.push((first_id, entry)),
        }
    }

    present.sort_by_key(|(id, _)| *id);
    absent.sort_by_key(|(id, _)| *id);
    present
        .into_iter()
        .chain(absent)
        .map(|(_, entry)| entry)
        .collect()
}
