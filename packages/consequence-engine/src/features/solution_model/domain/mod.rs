/*
 * Solution Model Domain
 *
 * Wire types for one solver artifact. Validation happens in the loader;
 * these types only mirror the JSON shape.
 */

mod wire;

pub use wire::{RawArtifact, RawMapping, RawMappings};
