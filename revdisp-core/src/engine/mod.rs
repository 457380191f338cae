//! Dependency-ordered evaluation of the program calculators.

mod graph;
mod orchestrator;

pub use graph::DependencyGraph;
pub use orchestrator::Orchestrator;
