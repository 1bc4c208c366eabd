//! Solver artifact → SolutionSpace

use crate::config::ArtifactLayout;
use crate::errors::{EngineError, Result};
use crate::features::solution_model::domain::RawArtifact;
use crate::features::solution_model::infrastructure::{file_name_of, read_artifact_bytes};
use crate::shared::models::{
    render_expression, InstanceName, Predicate, PredicateId, PredicateKind, SolutionSpace,
};
use std::path::Path;
use tracing::debug;

/// Parses solver artifacts into validated solution spaces
///
/// Stateless apart from the file layout used to derive instance names from
/// paths; safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct SolutionModelLoader {
    layout: ArtifactLayout,
}

impl SolutionModelLoader {
    pub fn new(layout: ArtifactLayout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &ArtifactLayout {
        &self.layout
    }

    pub fn load_str(&self, instance: &str, content: &str) -> Result<SolutionSpace> {
        self.load_slice(instance, content.as_bytes())
    }

    pub fn load_slice(&self, instance: &str, bytes: &[u8]) -> Result<SolutionSpace> {
        let instance_name = InstanceName::new(instance)?;
        let raw: RawArtifact = serde_json::from_slice(bytes)
            .map_err(|e| EngineError::malformed(instance, format!("invalid JSON: {}", e)))?;
        Self::from_raw(instance_name, raw)
    }

    /// Load `<dir>/<results_prefix><instance>.json`; the instance name is the
    /// file stem with the prefix stripped
    pub fn load_path(&self, path: impl AsRef<Path>) -> Result<SolutionSpace> {
        let path = path.as_ref();
        let instance = self.instance_name_for_path(path)?;
        let bytes = read_artifact_bytes(path)?;
        self.load_slice(instance.as_str(), &bytes)
    }

    pub fn instance_name_for_path(&self, path: &Path) -> Result<InstanceName> {
        let file_name = file_name_of(path)?;
        let instance = match self.layout.instance_name_for(&file_name) {
            Some(instance) => instance,
            None => file_name
                .strip_suffix(".json")
                .unwrap_or(file_name.as_str())
                .to_string(),
        };
        InstanceName::new(instance)
    }

    /// Validate a parsed artifact
    pub fn from_raw(instance_name: InstanceName, raw: RawArtifact) -> Result<SolutionSpace> {
        let artifact = instance_name.as_str().to_string();

        if let Some(declared) = raw.num_solutions {
            if declared != raw.solutions.len() {
                return Err(EngineError::malformed(
                    &artifact,
                    format!(
                        "num_solutions is {} but {} solutions are listed",
                        declared,
                        raw.solutions.len()
                    ),
                ));
            }
        }

        let mut predicates = Vec::with_capacity(raw.mappings.len());
        for (key, mapping) in raw.mappings {
            let id = parse_mapping_key(&key).ok_or_else(|| {
                EngineError::malformed(
                    &artifact,
                    format!("mapping key '{}' is not a non-negative integer", key),
                )
            })?;

            let kind = match mapping.kind.as_deref() {
                Some(kind) => kind
                    .parse::<PredicateKind>()
                    .map_err(|reason| EngineError::malformed(&artifact, reason))?,
                None => PredicateKind::infer_from_name(&mapping.predicate),
            };
            let full_expression = mapping
                .full
                .unwrap_or_else(|| render_expression(&mapping.predicate, &mapping.args));

            predicates.push(Predicate {
                id: PredicateId(id),
                name: mapping.predicate,
                kind,
                arguments: mapping.args,
                full_expression,
            });
        }

        let satisfiable = raw.satisfiable.unwrap_or(!raw.solutions.is_empty());
        let solutions = raw
            .solutions
            .into_iter()
            .map(|ids| ids.into_iter().map(PredicateId));

        let space = SolutionSpace::new(instance_name, predicates, solutions, satisfiable)?;
        debug!(
            instance = %space.instance_name(),
            predicates = space.predicates().len(),
            solutions = space.total_solutions(),
            satisfiable = space.satisfiable(),
            "Loaded solution space"
        );
        Ok(space)
    }
}

/// Decimal digits only; leading zeros are allowed, signs and whitespace are not
fn parse_mapping_key(key: &str) -> Option<u32> {
    if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    key.parse().ok()
}
