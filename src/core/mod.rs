//! Core pipeline logic

pub mod anonymize;
pub mod load;
pub mod pipeline;
pub mod transform;
pub mod validate;

pub use pipeline::PipelineCoordinator;
