//! Engine configuration sections and YAML I/O

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Supported schema versions
const SUPPORTED_VERSIONS: &[u32] = &[1];

/// Upper bound for `cache.max_entries_per_set`
const MAX_ENTRIES_PER_SET_LIMIT: usize = 1_000_000;

/// Upper bound for `analysis.sample_limit`
const SAMPLE_LIMIT_MAX: usize = 1_000;

/// Query cache settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CacheConfig {
    /// Disable to turn the cache into a pass-through
    pub enabled: bool,

    /// Results beyond this count per artifact set are computed but not stored
    pub max_entries_per_set: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries_per_set: 4096,
        }
    }
}

/// File naming used by the solver when it writes results to a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ArtifactLayout {
    /// Result artifacts are named `<results_prefix><instance>.json`
    pub results_prefix: String,

    /// Cascade metadata listing invocations in order
    pub execution_record_file: String,
}

impl Default for ArtifactLayout {
    fn default() -> Self {
        Self {
            results_prefix: "laml_results_".to_string(),
            execution_record_file: "laml_results_combined.json".to_string(),
        }
    }
}

impl ArtifactLayout {
    /// Instance name for a result file name, or None if the file is not a
    /// result artifact under this layout
    pub fn instance_name_for(&self, file_name: &str) -> Option<String> {
        if file_name == self.execution_record_file {
            return None;
        }
        let stem = file_name.strip_suffix(".json")?;
        let instance = stem.strip_prefix(self.results_prefix.as_str())?;
        if instance.is_empty() {
            None
        } else {
            Some(instance.to_string())
        }
    }
}

/// Analyzer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct AnalysisConfig {
    /// Default number of scenarios returned by scenario sampling
    pub sample_limit: usize,

    /// Fan whole-instance reports out over the rayon pool
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_limit: 5,
            parallel: true,
        }
    }
}

/// Top-level engine configuration (YAML schema v1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Schema version (always 1 for v1)
    pub version: Option<u32>,

    #[serde(default)]
    pub cache: CacheConfig,

    #[serde(default)]
    pub layout: ArtifactLayout,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: Some(1),
            cache: CacheConfig::default(),
            layout: ArtifactLayout::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load and validate configuration from a YAML file
    pub fn from_yaml(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&content)
    }

    /// Parse and validate configuration from YAML text
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let config: EngineConfig = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> ConfigResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Version and range checks
    pub fn validate(&self) -> ConfigResult<()> {
        match self.version {
            None => return Err(ConfigError::MissingVersion),
            Some(found) if !SUPPORTED_VERSIONS.contains(&found) => {
                return Err(ConfigError::UnsupportedVersion {
                    found,
                    supported: SUPPORTED_VERSIONS.to_vec(),
                })
            }
            Some(_) => {}
        }

        if self.cache.max_entries_per_set == 0
            || self.cache.max_entries_per_set > MAX_ENTRIES_PER_SET_LIMIT
        {
            return Err(ConfigError::Range {
                field: "cache.max_entries_per_set".to_string(),
                value: self.cache.max_entries_per_set.to_string(),
                min: "1".to_string(),
                max: MAX_ENTRIES_PER_SET_LIMIT.to_string(),
                hint: "Set cache.enabled: false to disable caching instead.".to_string(),
            });
        }

        if self.analysis.sample_limit == 0 || self.analysis.sample_limit > SAMPLE_LIMIT_MAX {
            return Err(ConfigError::Range {
                field: "analysis.sample_limit".to_string(),
                value: self.analysis.sample_limit.to_string(),
                min: "1".to_string(),
                max: SAMPLE_LIMIT_MAX.to_string(),
                hint: String::new(),
            });
        }

        if self.layout.results_prefix.is_empty() {
            return Err(ConfigError::Empty {
                field: "layout.results_prefix".to_string(),
            });
        }
        if self.layout.execution_record_file.is_empty() {
            return Err(ConfigError::Empty {
                field: "layout.execution_record_file".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_is_valid() {
        assert!(EngineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_yaml_roundtrip() {
        let mut config = EngineConfig::default();
        config.cache.max_entries_per_set = 128;

        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("version: 1"));
        assert!(yaml.contains("max_entries_per_set: 128"));

        let recovered = EngineConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(recovered, config);
    }

    #[test]
    fn test_yaml_loading_partial_sections() {
        let yaml_content = r#"
version: 1
cache:
  enabled: false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml_content.as_bytes()).unwrap();

        let config = EngineConfig::from_yaml(temp_file.path()).unwrap();
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.max_entries_per_set, 4096);
        assert_eq!(config.layout, ArtifactLayout::default());
    }

    #[test]
    fn test_yaml_missing_version() {
        let result = EngineConfig::from_yaml_str("cache:\n  enabled: true\n");
        assert!(matches!(result, Err(ConfigError::MissingVersion)));
    }

    #[test]
    fn test_yaml_unsupported_version() {
        let result = EngineConfig::from_yaml_str("version: 2\n");
        assert!(matches!(
            result,
            Err(ConfigError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_yaml_unknown_field_rejected() {
        let result = EngineConfig::from_yaml_str("version: 1\ncache:\n  ttl: 60\n");
        assert!(matches!(result, Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn test_range_validation() {
        let mut config = EngineConfig::default();
        config.analysis.sample_limit = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("analysis.sample_limit"));
    }

    #[test]
    fn test_layout_instance_name() {
        let layout = ArtifactLayout::default();
        assert_eq!(
            layout.instance_name_for("laml_results_core_lease.json"),
            Some("core_lease".to_string())
        );
        assert_eq!(layout.instance_name_for("laml_results_combined.json"), None);
        assert_eq!(layout.instance_name_for("laml_results_.json"), None);
        assert_eq!(layout.instance_name_for("notes.txt"), None);
        assert_eq!(layout.instance_name_for("other_core_lease.json"), None);
    }
}
