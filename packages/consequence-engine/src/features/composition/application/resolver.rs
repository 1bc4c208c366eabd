/*
 * Composition Resolver
 *
 * Reconciles the artifacts of one compilation event.
 *
 * # Strategy
 * 1. Explicit execution record (non-empty): trusted verbatim, final = last
 *    entry, artifacts it does not name are dropped
 * 2. Otherwise: order by (produced_at, instance name), final = last;
 *    flagged ambiguous when the two latest artifacts share a timestamp
 *
 * The resolver establishes naming and ordering only; it never inspects
 * solution contents.
 */

use crate::errors::{EngineError, Result};
use crate::features::composition::domain::{
    ArtifactSetId, CompilationArtifactSet, CompilationOutput, ExecutionRecord, ProducedArtifact,
    ResolutionStrategy,
};
use crate::shared::models::InstanceName;
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct CompositionResolver;

impl CompositionResolver {
    pub fn new() -> Self {
        Self
    }

    /// Build an artifact set at revision 0; the publisher assigns the real
    /// revision
    pub fn resolve(
        &self,
        id: ArtifactSetId,
        output: CompilationOutput,
    ) -> Result<CompilationArtifactSet> {
        let CompilationOutput {
            artifacts,
            execution_record,
            rejected,
        } = output;

        if artifacts.is_empty() {
            return Err(EngineError::composition(format!(
                "compilation of '{}' produced no loadable artifacts",
                id
            )));
        }

        let mut by_name: BTreeMap<InstanceName, ProducedArtifact> = BTreeMap::new();
        for artifact in artifacts {
            if let Some(previous) = by_name.get(&artifact.instance_name) {
                return Err(EngineError::composition(format!(
                    "instance '{}' produced twice ({} and {})",
                    artifact.instance_name, previous.reference, artifact.reference
                )));
            }
            by_name.insert(artifact.instance_name.clone(), artifact);
        }

        let record = match execution_record {
            Some(record) if record.is_empty() => {
                warn!(
                    artifact_set = %id,
                    "Execution record lists no invocations; falling back to production timestamps"
                );
                None
            }
            other => other,
        };

        let (execution_order, strategy) = match record {
            Some(record) => (
                explicit_order(&id, &record, &by_name)?,
                ResolutionStrategy::ExplicitOrder,
            ),
            None => timestamp_order(&id, &by_name),
        };

        let final_instance_name = match execution_order.last() {
            Some(name) => name.clone(),
            None => {
                return Err(EngineError::composition(format!(
                    "no instance of '{}' could be ordered",
                    id
                )))
            }
        };

        let ordered: BTreeSet<&InstanceName> = execution_order.iter().collect();
        let mut component_spaces = BTreeMap::new();
        let mut references = BTreeMap::new();
        for (name, artifact) in by_name {
            if !ordered.contains(&name) {
                warn!(
                    artifact_set = %id,
                    instance = %name,
                    reference = %artifact.reference,
                    "Artifact not named by the execution record; dropped"
                );
                continue;
            }
            references.insert(name.clone(), artifact.reference);
            component_spaces.insert(name, artifact.space);
        }

        let fingerprint = {
            let mut hasher = blake3::Hasher::new();
            for name in &execution_order {
                hasher.update(name.as_str().as_bytes());
                hasher.update(&[0]);
                if let Some(space) = component_spaces.get(name) {
                    hasher.update(space.fingerprint().as_bytes());
                }
            }
            hasher.finalize()
        };

        debug!(
            artifact_set = %id,
            instances = execution_order.len(),
            final_instance = %final_instance_name,
            strategy = ?strategy,
            "Resolved compilation artifacts"
        );

        Ok(CompilationArtifactSet {
            id,
            revision: 0,
            component_spaces,
            references,
            final_instance_name,
            execution_order,
            strategy,
            rejected,
            fingerprint,
            compiled_at: Utc::now(),
        })
    }
}

fn explicit_order(
    id: &ArtifactSetId,
    record: &ExecutionRecord,
    by_name: &BTreeMap<InstanceName, ProducedArtifact>,
) -> Result<Vec<InstanceName>> {
    let mut order = Vec::with_capacity(record.executions.len());
    let mut seen = BTreeSet::new();
    for entry in &record.executions {
        let name = InstanceName::new(entry.instance.as_str()).map_err(|_| {
            EngineError::composition(format!(
                "execution record of '{}' names an invalid instance '{}'",
                id, entry.instance
            ))
        })?;
        if !seen.insert(name.clone()) {
            return Err(EngineError::composition(format!(
                "execution record of '{}' lists instance '{}' more than once",
                id, name
            )));
        }
        if !by_name.contains_key(&name) {
            return Err(EngineError::composition(format!(
                "execution record of '{}' names instance '{}' but no artifact was produced for it",
                id, name
            )));
        }
        order.push(name);
    }
    Ok(order)
}

fn timestamp_order(
    id: &ArtifactSetId,
    by_name: &BTreeMap<InstanceName, ProducedArtifact>,
) -> (Vec<InstanceName>, ResolutionStrategy) {
    let mut artifacts: Vec<&ProducedArtifact> = by_name.values().collect();
    artifacts.sort_by(|a, b| {
        a.produced_at
            .cmp(&b.produced_at)
            .then_with(|| a.instance_name.cmp(&b.instance_name))
    });

    let ambiguous = match artifacts.as_slice() {
        [.., previous, last] => previous.produced_at == last.produced_at,
        _ => false,
    };

    if ambiguous {
        warn!(
            artifact_set = %id,
            "Latest artifacts share a production timestamp; final instance chosen by name"
        );
    } else {
        debug!(artifact_set = %id, "No execution record; ordering by production timestamp");
    }

    let order = artifacts
        .into_iter()
        .map(|artifact| artifact.instance_name.clone())
        .collect();
    (order, ResolutionStrategy::ProductionTimestamp { ambiguous })
}
