//! Composition of multi-invocation compilations

mod common;

use common::*;
use consequence_engine::{
    CompilationOutput, CompositionResolver, ExecutionRecord, ResolutionStrategy,
};
use pretty_assertions::assert_eq;

fn order(set: &consequence_engine::CompilationArtifactSet) -> Vec<String> {
    set.execution_order()
        .iter()
        .map(|name| name.to_string())
        .collect()
}

#[test]
fn test_fallback_selects_latest_artifact() {
    let set = CompositionResolver::new()
        .resolve("lease".into(), cascade_output())
        .unwrap();
    assert_eq!(set.final_instance_name().as_str(), "composite_B");
    assert_eq!(order(&set), vec!["core_A", "core_C", "composite_B"]);
    assert!(!set.strategy().is_ambiguous());
    assert_eq!(set.component_spaces().len(), 3);
}

#[test]
fn test_explicit_record_overrides_timestamps() {
    // Record says core_C ran last even though composite_B is newest
    let output = cascade_output().with_execution_record(ExecutionRecord::from_instances([
        "core_A",
        "composite_B",
        "core_C",
    ]));
    let set = CompositionResolver::new()
        .resolve("lease".into(), output)
        .unwrap();
    assert_eq!(set.final_instance_name().as_str(), "core_C");
    assert_eq!(set.strategy(), ResolutionStrategy::ExplicitOrder);
    assert_eq!(order(&set), vec!["core_A", "composite_B", "core_C"]);
}

#[test]
fn test_record_subset_drops_unlisted_artifacts() {
    let output = cascade_output()
        .with_execution_record(ExecutionRecord::from_instances(["core_A", "composite_B"]));
    let set = CompositionResolver::new()
        .resolve("lease".into(), output)
        .unwrap();
    assert_eq!(set.component_spaces().len(), 2);
    assert!(set.space(Some("core_C")).is_err());
    assert_eq!(set.final_space().unwrap().instance_name().as_str(), "composite_B");
}

#[test]
fn test_ambiguous_timestamps_are_flagged() {
    let output = CompilationOutput::new(vec![
        artifact(strict_space("core_A"), 10),
        artifact(lease_space("composite_B"), 20),
        artifact(strict_space("core_C"), 20),
    ]);
    let set = CompositionResolver::new()
        .resolve("lease".into(), output)
        .unwrap();
    assert_eq!(
        set.strategy(),
        ResolutionStrategy::ProductionTimestamp { ambiguous: true }
    );
    // ties broken by instance name
    assert_eq!(set.final_instance_name().as_str(), "core_C");
}

#[test]
fn test_fingerprint_follows_content() {
    let a = CompositionResolver::new()
        .resolve("lease".into(), cascade_output())
        .unwrap();
    let b = CompositionResolver::new()
        .resolve("lease".into(), cascade_output())
        .unwrap();
    assert_eq!(a.fingerprint(), b.fingerprint());

    let changed = CompilationOutput::new(vec![
        artifact(strict_space("core_A"), 10),
        artifact(strict_space("composite_B"), 30),
        artifact(strict_space("core_C"), 20),
    ]);
    let c = CompositionResolver::new()
        .resolve("lease".into(), changed)
        .unwrap();
    assert_ne!(a.fingerprint(), c.fingerprint());
}

#[test]
fn test_summary_serializes_strategy_inline() {
    let set = CompositionResolver::new()
        .resolve("lease".into(), cascade_output())
        .unwrap();
    let json = serde_json::to_value(set.summary()).unwrap();
    assert_eq!(json["final_instance"], "composite_B");
    assert_eq!(json["strategy"], "production_timestamp");
    assert_eq!(json["ambiguous"], false);
    assert_eq!(json["instances"].as_array().unwrap().len(), 3);
}
