//! Filesystem access for solver artifacts

mod artifact_file;

pub use artifact_file::{file_name_of, read_artifact_bytes};
