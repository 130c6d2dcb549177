//! Domain models and types for Tamiz.
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`ClienteId`])
//! - **Pipeline records** ([`RawRecord`], [`CustomerRecord`], [`CardRecord`],
//!   [`RejectedRow`], [`FieldStatus`])
//! - **Error types** ([`TamizError`]) and the [`Result`] alias
//!
//! Validation outcomes are data here, not errors: only infrastructure
//! failures travel through [`TamizError`].

pub mod errors;
pub mod ids;
pub mod records;
pub mod result;

pub use errors::TamizError;
pub use ids::ClienteId;
pub use records::{
    CardRecord, CustomerRecord, EntityKind, FieldFailure, FieldStatus, RawRecord, RejectedRow,
};
pub use result::Result;
