//! External adapters: source files, target store, reject sink

pub mod extract;
pub mod postgres;
pub mod sink;
pub mod store;

pub use sink::{CsvRejectSink, MemoryRejectSink, RejectSink};
pub use store::{RowFailure, TargetStore, UpsertOutcome};
