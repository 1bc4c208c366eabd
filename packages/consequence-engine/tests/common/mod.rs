//! Shared fixtures for integration tests

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use consequence_engine::{
    CompilationOutput, ConsequenceService, EngineConfig, InstanceName, Predicate, PredicateId,
    PredicateKind, ProducedArtifact, SolutionSpace,
};
use serde_json::json;
use std::sync::Arc;

pub fn at(seconds: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

pub fn ids(raw: &[u32]) -> Vec<PredicateId> {
    raw.iter().copied().map(PredicateId).collect()
}

/// Four solutions; `pay_rent` absent in the last two, where `return_system`
/// always holds and `grant_use` never does
///
/// ids: 1 pay_rent, 2 return_system, 3 grant_use, 4 lease_signed
pub fn lease_space(instance: &str) -> SolutionSpace {
    let predicates = vec![
        Predicate::new(
            1,
            "pay_rent",
            PredicateKind::Obligation,
            vec!["tenant".into(), "landlord".into()],
        ),
        Predicate::new(2, "return_system", PredicateKind::Obligation, vec!["tenant".into()]),
        Predicate::new(3, "grant_use", PredicateKind::Obligation, vec!["landlord".into()]),
        Predicate::new(4, "lease_signed", PredicateKind::Fact, vec![]),
    ];
    let solutions = vec![ids(&[1, 3, 4]), ids(&[1, 2, 3, 4]), ids(&[2, 4]), ids(&[2])];
    SolutionSpace::new(InstanceName::new(instance).unwrap(), predicates, solutions, true).unwrap()
}

/// Two solutions in which `pay_rent` always holds
pub fn strict_space(instance: &str) -> SolutionSpace {
    let predicates = vec![
        Predicate::new(1, "pay_rent", PredicateKind::Obligation, vec!["tenant".into()]),
        Predicate::new(2, "grant_use", PredicateKind::Obligation, vec!["landlord".into()]),
    ];
    let solutions = vec![ids(&[1]), ids(&[1, 2])];
    SolutionSpace::new(InstanceName::new(instance).unwrap(), predicates, solutions, true).unwrap()
}

/// `pay_rent` holds in one solution and is violated in `generation` others,
/// so each generation has a distinct violation count
pub fn generation_space(instance: &str, generation: u32) -> SolutionSpace {
    let mut predicates = vec![Predicate::new(
        1,
        "pay_rent",
        PredicateKind::Obligation,
        vec!["tenant".into()],
    )];
    let mut solutions = vec![ids(&[1])];
    for id in 2..=generation + 1 {
        predicates.push(Predicate::new(id, "clause", PredicateKind::Act, vec![format!("c{}", id)]));
        solutions.push(ids(&[id]));
    }
    SolutionSpace::new(InstanceName::new(instance).unwrap(), predicates, solutions, true).unwrap()
}

pub fn generation_output(generation: u32) -> CompilationOutput {
    CompilationOutput::new(vec![artifact(generation_space("composite_B", generation), 30)])
}

pub fn artifact(space: SolutionSpace, seconds: i64) -> ProducedArtifact {
    let reference = format!("laml_results_{}.json", space.instance_name());
    ProducedArtifact::new(reference, at(seconds), Arc::new(space))
}

/// core_A and core_C components, composite_B written last
pub fn cascade_output() -> CompilationOutput {
    CompilationOutput::new(vec![
        artifact(strict_space("core_A"), 10),
        artifact(lease_space("composite_B"), 30),
        artifact(strict_space("core_C"), 20),
    ])
}

pub fn service() -> ConsequenceService {
    ConsequenceService::new(EngineConfig::default()).unwrap()
}

/// Artifact JSON in the compiler's format for `lease_space`
pub fn lease_artifact_json() -> String {
    json!({
        "mappings": {
            "1": {"predicate": "pay_rent", "args": ["tenant", "landlord"], "full": "pay_rent(tenant, landlord)", "type": "obligation"},
            "2": {"predicate": "return_system", "args": ["tenant"], "type": "obligation"},
            "3": {"predicate": "grant_use", "args": ["landlord"], "type": "obligation"},
            "4": {"predicate": "lease_signed", "args": [], "type": "fact"}
        },
        "solutions": [[1, 3, 4], [1, 2, 3, 4], [2, 4], [2]],
        "num_solutions": 4,
        "satisfiable": true
    })
    .to_string()
}

pub fn strict_artifact_json() -> String {
    json!({
        "mappings": {
            "1": {"predicate": "pay_rent", "args": ["tenant"], "type": "obligation"},
            "2": {"predicate": "grant_use", "args": ["landlord"], "type": "obligation"}
        },
        "solutions": [[1], [1, 2]],
        "num_solutions": 2,
        "satisfiable": true
    })
    .to_string()
}
