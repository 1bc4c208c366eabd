//! Property tests for the consequence analyzer and the cached query path

#[path = "../common/mod.rs"]
mod common;

use consequence_engine::{
    AnalysisKind, CompilationOutput, ConsequenceAnalyzer, ConsequenceService, EngineConfig,
    InstanceName, Predicate, PredicateId, PredicateKind, ProducedArtifact, Relation,
    SolutionSpace,
};
use proptest::prelude::*;
use std::collections::BTreeSet;
use std::sync::Arc;

const NAMES: [&str; 4] = ["pay_rent", "grant_use", "notify", "return_system"];

/// Up to 6 predicates over a small name pool (so names repeat) and up to 12
/// solutions over those ids
fn arb_space() -> impl Strategy<Value = SolutionSpace> {
    prop::collection::vec(0..NAMES.len(), 1..=6).prop_flat_map(|name_indexes| {
        let count = name_indexes.len();
        let solutions = prop::collection::vec(prop::collection::vec(any::<bool>(), count), 0..12);
        (Just(name_indexes), solutions).prop_map(|(name_indexes, solutions)| {
            let predicates = name_indexes
                .iter()
                .enumerate()
                .map(|(position, index)| {
                    Predicate::new(
                        position as u32 + 1,
                        NAMES[*index],
                        PredicateKind::Act,
                        vec![format!("party{}", position)],
                    )
                })
                .collect();
            let satisfiable = !solutions.is_empty();
            let solutions: Vec<Vec<PredicateId>> = solutions
                .into_iter()
                .map(|flags| {
                    flags
                        .into_iter()
                        .enumerate()
                        .filter(|(_, on)| *on)
                        .map(|(position, _)| PredicateId(position as u32 + 1))
                        .collect()
                })
                .collect();
            SolutionSpace::new(
                InstanceName::new("generated").unwrap(),
                predicates,
                solutions,
                satisfiable,
            )
            .unwrap()
        })
    })
}

fn holds(space: &SolutionSpace, solution: &BTreeSet<PredicateId>, name: &str) -> bool {
    space
        .ids_for(name)
        .map(|ids| ids.iter().any(|id| solution.contains(id)))
        .unwrap_or(false)
}

proptest! {
    #[test]
    fn violation_and_fulfillment_partition_solutions(space in arb_space()) {
        let analyzer = ConsequenceAnalyzer::default();
        for name in space.predicate_names() {
            let violation = analyzer.analyze(&space, name, AnalysisKind::Violation).unwrap();
            let fulfillment = analyzer.analyze(&space, name, AnalysisKind::Fulfillment).unwrap();
            prop_assert_eq!(
                violation.total_matching_scenarios + fulfillment.total_matching_scenarios,
                space.total_solutions()
            );
            prop_assert_eq!(violation.complement_scenarios(), fulfillment.total_matching_scenarios);
        }
    }

    #[test]
    fn relations_hold_exactly_at_the_extremes(space in arb_space()) {
        let analyzer = ConsequenceAnalyzer::default();
        for target in space.predicate_names() {
            for kind in [AnalysisKind::Violation, AnalysisKind::Fulfillment] {
                let result = analyzer.analyze(&space, target, kind).unwrap();
                let matching: Vec<&BTreeSet<PredicateId>> = space
                    .solutions()
                    .iter()
                    .map(|solution| &solution.true_predicate_ids)
                    .filter(|solution| holds(&space, solution, target) == kind.target_present())
                    .collect();

                if matching.is_empty() {
                    prop_assert!(result.consequences.is_empty());
                    prop_assert!(result.marker.is_some());
                    continue;
                }

                for other in space.predicate_names().filter(|name| *name != target) {
                    let count = matching
                        .iter()
                        .filter(|solution| holds(&space, solution, other))
                        .count();
                    let reported = result
                        .consequences
                        .iter()
                        .find(|entry| entry.predicate_name == other);
                    match reported {
                        Some(entry) => {
                            prop_assert_eq!(entry.occurrence_count, count);
                            prop_assert_eq!(entry.scenario_total, matching.len());
                            let expected = if count == 0 {
                                Relation::AlwaysAbsent
                            } else {
                                Relation::AlwaysPresent
                            };
                            prop_assert!(count == 0 || count == matching.len());
                            prop_assert_eq!(entry.relation, expected);
                        }
                        None => prop_assert!(count > 0 && count < matching.len()),
                    }
                }

                // always_present block precedes always_absent block
                let first_absent = result
                    .consequences
                    .iter()
                    .position(|entry| entry.relation == Relation::AlwaysAbsent)
                    .unwrap_or(result.consequences.len());
                prop_assert!(result.consequences[first_absent..]
                    .iter()
                    .all(|entry| entry.relation == Relation::AlwaysAbsent));
            }
        }
    }

    #[test]
    fn cached_queries_match_direct_analysis(space in arb_space()) {
        let service = ConsequenceService::new(EngineConfig::default()).unwrap();
        let analyzer = ConsequenceAnalyzer::default();
        let direct: Vec<_> = space
            .predicate_names()
            .map(|name| analyzer.analyze(&space, name, AnalysisKind::Violation).unwrap())
            .collect();
        let names: Vec<String> = space.predicate_names().map(str::to_string).collect();

        let artifact = ProducedArtifact::new("generated", common::at(0), Arc::new(space));
        service.compile_event("generated", CompilationOutput::new(vec![artifact])).unwrap();

        for _ in 0..2 {
            for (name, expected) in names.iter().zip(&direct) {
                let cached = service
                    .query("generated", None, name, AnalysisKind::Violation)
                    .unwrap();
                prop_assert_eq!(cached.as_ref(), expected);
            }
        }
        prop_assert_eq!(service.cache_stats().misses as usize, names.len());
    }
}
