//! Data model shared by every feature slice

mod instance;
mod predicate;
mod solution_space;

pub use instance::InstanceName;
pub use predicate::{render_expression, Predicate, PredicateId, PredicateKind};
pub use solution_space::{Solution, SolutionSpace};
