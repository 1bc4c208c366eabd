/*
 * Composition Ports
 *
 * Interfaces for external integration.
 */

use crate::errors::Result;
use crate::features::composition::domain::CompilationOutput;

/// Supplier of one compilation event's artifacts
///
/// Implementations load what they can; individual malformed artifacts go to
/// `CompilationOutput::rejected` instead of failing the whole collection.
pub trait ArtifactSource: Send + Sync {
    fn collect(&self) -> Result<CompilationOutput>;

    /// Human-readable location, for logs
    fn describe(&self) -> String {
        "artifact source".to_string()
    }
}
