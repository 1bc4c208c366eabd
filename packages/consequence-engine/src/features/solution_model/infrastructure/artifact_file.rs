use crate::errors::{EngineError, Result};
use std::fs;
use std::path::Path;

/// Read a whole artifact file into memory
pub fn read_artifact_bytes(path: &Path) -> Result<Vec<u8>> {
    let bytes = fs::read(path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Read solver artifact");
    Ok(bytes)
}

/// UTF-8 file name of `path`
pub fn file_name_of(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            EngineError::malformed(
                path.display().to_string(),
                "artifact path has no UTF-8 file name",
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = read_artifact_bytes(&dir.path().join("laml_results_gone.json")).unwrap_err();
        assert_eq!(err.as_code(), "io");
    }

    #[test]
    fn test_file_name() {
        let name = file_name_of(Path::new("/tmp/out/laml_results_core.json")).unwrap();
        assert_eq!(name, "laml_results_core.json");
        assert!(file_name_of(Path::new("/")).is_err());
    }
}
