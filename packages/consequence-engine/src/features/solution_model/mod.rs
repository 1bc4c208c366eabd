/*
 * Solution Model Loader
 *
 * Parses one solver-output artifact into an immutable SolutionSpace.
 *
 * Architecture:
 * - Domain: wire types mirroring the compiler's JSON output
 * - Application: SolutionModelLoader (validation, kind inference)
 * - Infrastructure: artifact file access
 *
 * A malformed artifact fails on its own; callers decide whether the rest of
 * a compilation can proceed.
 */

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::SolutionModelLoader;
pub use domain::{RawArtifact, RawMapping, RawMappings};
