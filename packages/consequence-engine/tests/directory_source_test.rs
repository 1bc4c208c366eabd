//! Directory-backed artifact collection

mod common;

use common::*;
use consequence_engine::{AnalysisKind, ArtifactSource, DirectoryArtifactSource, ResolutionStrategy};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, content: &str) {
    fs::write(dir.path().join(name), content).unwrap();
}

#[test]
fn test_collects_results_and_execution_record() {
    let dir = TempDir::new().unwrap();
    write(&dir, "laml_results_core_A.json", &strict_artifact_json());
    write(&dir, "laml_results_composite_B.json", &lease_artifact_json());
    write(
        &dir,
        "laml_results_combined.json",
        r#"{"executions": [
            {"instance": "core_A", "results_file": "laml_results_core_A.json"},
            {"instance": "composite_B", "results_file": "laml_results_composite_B.json"}
        ]}"#,
    );
    write(&dir, "notes.txt", "not an artifact");

    let output = DirectoryArtifactSource::new(dir.path()).collect().unwrap();
    assert_eq!(output.artifacts.len(), 2);
    assert!(output.rejected.is_empty());
    let record = output.execution_record.clone().unwrap();
    assert_eq!(record.instances().collect::<Vec<_>>(), vec!["core_A", "composite_B"]);

    let service = service();
    let set = service.compile_event("lease", output).unwrap();
    assert_eq!(set.strategy(), ResolutionStrategy::ExplicitOrder);
    assert_eq!(set.final_instance_name().as_str(), "composite_B");

    let result = service
        .query("lease", None, "pay_rent", AnalysisKind::Violation)
        .unwrap();
    assert_eq!(result.total_matching_scenarios, 2);
    assert_eq!(result.consequences.len(), 2);
}

#[test]
fn test_malformed_artifact_is_rejected_alone() {
    let dir = TempDir::new().unwrap();
    write(&dir, "laml_results_core_A.json", &strict_artifact_json());
    write(
        &dir,
        "laml_results_broken.json",
        r#"{"mappings": {"1": {"predicate": "a"}}, "solutions": [[2]], "satisfiable": true}"#,
    );

    let output = DirectoryArtifactSource::new(dir.path()).collect().unwrap();
    assert_eq!(output.artifacts.len(), 1);
    assert_eq!(output.rejected.len(), 1);
    assert_eq!(output.rejected[0].code, "malformed_artifact");
    assert!(output.rejected[0].reference.ends_with("laml_results_broken.json"));
    assert!(output.execution_record.is_none());
}

#[test]
fn test_unreadable_execution_record_is_ignored() {
    let dir = TempDir::new().unwrap();
    write(&dir, "laml_results_core_A.json", &strict_artifact_json());
    write(&dir, "laml_results_combined.json", "{ truncated");

    let output = DirectoryArtifactSource::new(dir.path()).collect().unwrap();
    assert_eq!(output.artifacts.len(), 1);
    assert!(output.execution_record.is_none());
}

#[test]
fn test_compile_from_source_uses_timestamps_without_record() {
    let dir = TempDir::new().unwrap();
    write(&dir, "laml_results_only.json", &lease_artifact_json());

    let service = service();
    let source = DirectoryArtifactSource::new(dir.path());
    let set = service.compile_from_source("lease", &source).unwrap();
    assert_eq!(set.final_instance_name().as_str(), "only");
    assert!(matches!(
        set.strategy(),
        ResolutionStrategy::ProductionTimestamp { .. }
    ));
}

#[test]
fn test_empty_directory_fails_composition() {
    let dir = TempDir::new().unwrap();
    let service = service();
    let err = service
        .compile_from_source("lease", &DirectoryArtifactSource::new(dir.path()))
        .unwrap_err();
    assert_eq!(err.as_code(), "composition_mismatch");
}

#[test]
fn test_missing_directory_is_io_error() {
    let dir = TempDir::new().unwrap();
    let source = DirectoryArtifactSource::new(dir.path().join("absent"));
    assert_eq!(source.collect().unwrap_err().as_code(), "io");
}
