//! Loading of transformed batches into the target store

pub mod loader;
pub mod summary;

pub use loader::BatchLoader;
pub use summary::{LoadError, LoadErrorKind, LoadSummary};
