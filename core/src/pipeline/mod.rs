// core/src/pipeline/mod.rs

//! The `ActionPipeline` type: construction, handler registration, execution.

pub mod definition;
pub mod execution;
pub mod hooks;

pub use definition::ActionPipeline;
