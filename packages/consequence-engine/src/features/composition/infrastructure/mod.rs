/*
 * Composition Infrastructure
 */

mod directory_source;

pub use directory_source::DirectoryArtifactSource;
