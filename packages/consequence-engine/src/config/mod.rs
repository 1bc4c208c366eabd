//! Engine configuration
//!
//! A single versioned YAML document with three sections:
//!
//! ```yaml
//! version: 1
//! cache:
//!   enabled: true
//!   max_entries_per_set: 4096
//! layout:
//!   results_prefix: laml_results_
//!   execution_record_file: laml_results_combined.json
//! analysis:
//!   sample_limit: 5
//!   parallel: true
//! ```
//!
//! Every section is optional; omitted sections take their defaults.

pub mod engine_config;
pub mod error;

pub use engine_config::{AnalysisConfig, ArtifactLayout, CacheConfig, EngineConfig};
pub use error::{ConfigError, ConfigResult};
