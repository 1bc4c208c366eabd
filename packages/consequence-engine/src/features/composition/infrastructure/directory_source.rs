//! Artifact source backed by a compiler output directory
//!
//! Layout:
//! ```text
//! out/
//!   laml_results_core_lease.json      one per solver invocation
//!   laml_results_composite_B.json
//!   laml_results_combined.json        optional execution record
//! ```

use crate::config::ArtifactLayout;
use crate::errors::{EngineError, Result};
use crate::features::composition::domain::{
    CompilationOutput, ExecutionRecord, ProducedArtifact, RejectedArtifact,
};
use crate::features::composition::ports::ArtifactSource;
use crate::features::solution_model::SolutionModelLoader;
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct DirectoryArtifactSource {
    root: PathBuf,
    loader: SolutionModelLoader,
}

impl DirectoryArtifactSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_layout(root, ArtifactLayout::default())
    }

    pub fn with_layout(root: impl Into<PathBuf>, layout: ArtifactLayout) -> Self {
        Self {
            root: root.into(),
            loader: SolutionModelLoader::new(layout),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn layout(&self) -> &ArtifactLayout {
        self.loader.layout()
    }

    /// Result artifact paths, sorted by file name
    fn artifact_paths(&self) -> Result<Vec<PathBuf>> {
        let mut paths = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let file_name = entry.file_name();
            let Some(file_name) = file_name.to_str() else {
                continue;
            };
            if self.layout().instance_name_for(file_name).is_some() {
                paths.push(entry.path());
            }
        }
        paths.sort();
        Ok(paths)
    }

    fn load_artifact(&self, path: &Path) -> Result<ProducedArtifact> {
        let produced_at: DateTime<Utc> = fs::metadata(path)?.modified()?.into();
        let space = self.loader.load_path(path)?;
        Ok(ProducedArtifact::new(
            path.display().to_string(),
            produced_at,
            Arc::new(space),
        ))
    }

    fn read_execution_record(&self) -> Option<ExecutionRecord> {
        let path = self.root.join(&self.layout().execution_record_file);
        if !path.is_file() {
            return None;
        }
        let reference = path.display().to_string();
        let parsed = fs::read(&path)
            .map_err(EngineError::from)
            .and_then(|bytes| ExecutionRecord::from_json_slice(&reference, &bytes));
        match parsed {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(path = %reference, error = %e, "Ignoring unreadable execution record");
                None
            }
        }
    }
}

impl ArtifactSource for DirectoryArtifactSource {
    fn collect(&self) -> Result<CompilationOutput> {
        let mut output = CompilationOutput::default();

        for path in self.artifact_paths()? {
            match self.load_artifact(&path) {
                Ok(artifact) => {
                    debug!(
                        instance = %artifact.instance_name,
                        path = %path.display(),
                        "Collected artifact"
                    );
                    output.artifacts.push(artifact);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Rejected artifact");
                    output
                        .rejected
                        .push(RejectedArtifact::new(path.display().to_string(), &e));
                }
            }
        }

        output.execution_record = self.read_execution_record();

        info!(
            root = %self.root.display(),
            artifacts = output.artifacts.len(),
            rejected = output.rejected.len(),
            execution_record = output.execution_record.is_some(),
            "Collected compilation output"
        );
        Ok(output)
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}
