//! Target store abstraction
//!
//! [`TargetStore`] is what the loader talks to. The PostgreSQL adapter is
//! the production implementation; tests supply in-memory ones.

use crate::domain::{CardRecord, CustomerRecord, Result};
use async_trait::async_trait;

/// One row that a store demoted to a rejection inside an otherwise
/// successful batch (e.g., a foreign-key violation)
#[derive(Debug, Clone)]
pub struct RowFailure {
    /// Position of the record in the upserted batch
    pub index: usize,

    /// The record's upsert key (`cod_cliente` or `tarjeta_hash`)
    pub key: String,

    /// Store-reported error message
    pub error: String,
}

impl RowFailure {
    /// Create a new row failure
    pub fn new(index: usize, key: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            index,
            key: key.into(),
            error: error.into(),
        }
    }
}

/// Outcome of an upsert batch
#[derive(Debug, Clone, Default)]
pub struct UpsertOutcome {
    /// Number of rows applied (inserted or updated)
    pub applied: usize,

    /// Rows the store refused for per-row reasons; the batch as a whole
    /// still committed
    pub row_failures: Vec<RowFailure>,
}

impl UpsertOutcome {
    /// Create an empty outcome
    pub fn new() -> Self {
        Self::default()
    }
}

/// Trait for the relational target store
#[async_trait]
pub trait TargetStore: Send + Sync {
    /// Test connectivity to the store
    async fn test_connection(&self) -> Result<()>;

    /// Upsert a batch of customer records, keyed by `cod_cliente`
    ///
    /// The batch is atomic: either the returned outcome's applied rows are
    /// all committed, or the call errors and nothing is. Per-row constraint
    /// violations are demoted into `row_failures` rather than failing the
    /// batch.
    async fn upsert_customers(&self, records: &[CustomerRecord]) -> Result<UpsertOutcome>;

    /// Upsert a batch of card records, keyed by `tarjeta_hash`
    async fn upsert_cards(&self, records: &[CardRecord]) -> Result<UpsertOutcome>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_outcome_default_is_empty() {
        let outcome = UpsertOutcome::new();
        assert_eq!(outcome.applied, 0);
        assert!(outcome.row_failures.is_empty());
    }

    #[test]
    fn test_row_failure_creation() {
        let failure = RowFailure::new(3, "C001", "violates foreign key constraint");
        assert_eq!(failure.index, 3);
        assert_eq!(failure.key, "C001");
        assert!(failure.error.contains("foreign key"));
    }
}
