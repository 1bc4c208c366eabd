//! Shared models

pub mod models;
