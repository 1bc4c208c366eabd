//! Usecase Layer - compile events and consequence queries
//!
//! Entry point for callers that own compilation triggers (upload handlers,
//! recompilation jobs, the bundled CLI).

pub mod consequence_service;

pub use consequence_service::ConsequenceService;
