pub mod pipeline;
pub mod types;

pub use pipeline::Orchestrator;
