//! Row transformation: validation + anonymization of one raw record
//!
//! [`RowTransformer`] applies the field validators and the anonymizer to a
//! single [`RawRecord`](crate::domain::RawRecord), producing an accepted
//! record with the raw sensitive values stripped, or a
//! [`RejectedRow`](crate::domain::RejectedRow) carrying the raw values and
//! every failing field. Pure: no I/O, no state beyond the salt and the
//! run's load date.

mod card;
mod customer;

use crate::core::anonymize::Anonymizer;
use crate::domain::RejectedRow;
use chrono::NaiveDate;

/// Outcome of transforming one row: the `Err` arm is data, not an error
pub type TransformResult<T> = std::result::Result<T, RejectedRow>;

/// Applies validators and the anonymizer to raw rows
pub struct RowTransformer {
    anonymizer: Anonymizer,
    load_date: NaiveDate,
}

impl RowTransformer {
    /// Creates a transformer for one run
    ///
    /// Both the salt (inside the anonymizer) and the load date are fixed
    /// for the lifetime of the run.
    pub fn new(anonymizer: Anonymizer, load_date: NaiveDate) -> Self {
        Self {
            anonymizer,
            load_date,
        }
    }

    pub(crate) fn anonymizer(&self) -> &Anonymizer {
        &self.anonymizer
    }

    pub(crate) fn load_date(&self) -> NaiveDate {
        self.load_date
    }
}
