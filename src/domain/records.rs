//! Record types flowing through the pipeline
//!
//! A [`RawRecord`] is one CSV row exactly as read. The transformer turns it
//! into a [`CustomerRecord`] or [`CardRecord`] (raw sensitive values already
//! stripped) or a [`RejectedRow`] (raw values preserved verbatim for the
//! audit sink).

use crate::domain::ids::ClienteId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Rejection reason for a failed mandatory field (business key or document/card number)
pub const REASON_MISSING_KEY_FIELD: &str = "missing_key_field";
/// Rejection reason for a malformed email
pub const REASON_INVALID_EMAIL: &str = "invalid_email";
/// Rejection reason for a blank email
pub const REASON_MISSING_EMAIL: &str = "missing_email";
/// Rejection reason for a malformed phone number
pub const REASON_INVALID_PHONE: &str = "invalid_phone";
/// Rejection reason for a blank phone number
pub const REASON_MISSING_PHONE: &str = "missing_phone";
/// Rejection reason for a row-level store constraint violation
pub const REASON_STORE_CONSTRAINT: &str = "store_constraint";

/// One CSV row as read: column name -> cell value, untyped.
///
/// Missing columns read as empty strings, so the transformer tolerates
/// upstream schema drift (extra columns ignored, absent columns treated as
/// blank). Backed by a `BTreeMap` so the serialized payload in the reject
/// sink is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord(BTreeMap<String, String>);

impl RawRecord {
    /// Creates an empty record
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a record from `(column, value)` pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Sets a cell value
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.0.insert(column.into(), value.into());
    }

    /// Returns the cell for `column`, or `""` when the column is absent
    pub fn get(&self, column: &str) -> &str {
        self.0.get(column).map(String::as_str).unwrap_or("")
    }

    /// Iterates over `(column, value)` pairs in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of populated columns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no columns are populated
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Validation outcome of a single field.
///
/// Internal tri-state; the legacy paired `_ok`/`_ko` flag columns are an
/// encoding detail of the target schema, produced only at the store
/// boundary via [`FieldStatus::ok_flag`] / [`FieldStatus::ko_flag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    /// Normalized value passed validation
    Valid,
    /// Value present but malformed
    Invalid,
    /// Value blank or column absent
    Missing,
}

impl FieldStatus {
    /// True only for `Valid`
    pub fn is_valid(self) -> bool {
        matches!(self, FieldStatus::Valid)
    }

    /// Single-character `_ok` marker for the target schema
    pub fn ok_flag(self) -> &'static str {
        if self.is_valid() {
            "Y"
        } else {
            "N"
        }
    }

    /// Single-character `_ko` marker for the target schema
    ///
    /// Exactly one of `ok_flag`/`ko_flag` is `"Y"` for any status.
    pub fn ko_flag(self) -> &'static str {
        if self.is_valid() {
            "N"
        } else {
            "Y"
        }
    }
}

/// Entity type of a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// Customer rows (`clientes` table)
    Cliente,
    /// Card rows (`tarjetas` table)
    Tarjeta,
}

impl EntityKind {
    /// Lowercase name used in sink file names and logs
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Cliente => "clientes",
            EntityKind::Tarjeta => "tarjetas",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `(field, reason)` failure inside a rejected row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFailure {
    /// Column name that failed
    pub field: String,
    /// Machine-readable reason (see the `REASON_*` constants)
    pub reason: String,
}

impl FieldFailure {
    /// Creates a new field failure
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// A row diverted from the store to the audit sink.
///
/// Carries the original raw values verbatim (for manual follow-up) and the
/// complete list of failing fields, not just the first. Never persisted to
/// the target tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// Which batch the row belonged to
    pub entity: EntityKind,
    /// Original raw record, unmodified
    pub raw: RawRecord,
    /// Every failing field with its reason; never empty
    pub failures: Vec<FieldFailure>,
    /// Batch load date, stamped by the loader
    pub fecha_carga: NaiveDate,
}

impl RejectedRow {
    /// Creates a rejected row
    pub fn new(
        entity: EntityKind,
        raw: RawRecord,
        failures: Vec<FieldFailure>,
        fecha_carga: NaiveDate,
    ) -> Self {
        debug_assert!(!failures.is_empty(), "a rejection must carry reasons");
        Self {
            entity,
            raw,
            failures,
            fecha_carga,
        }
    }

    /// `field:reason` pairs joined with `|`, the sink's compact encoding
    pub fn reasons_joined(&self) -> String {
        self.failures
            .iter()
            .map(|f| format!("{}:{}", f.field, f.reason))
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// A validated, anonymized customer row ready for upsert.
///
/// The raw document number never appears here; only its salted hash. The
/// upsert key is `cod_cliente`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerRecord {
    /// Business identifier, upsert key
    pub cod_cliente: ClienteId,
    /// Given name, cleaned free text
    pub nombre: String,
    /// First surname, cleaned free text
    pub apellido1: String,
    /// Second surname, cleaned free text
    pub apellido2: String,
    /// Salted SHA-256 of the normalized document number (or the no-value sentinel)
    pub dni_hash: String,
    /// Document number validation outcome
    pub dni_status: FieldStatus,
    /// Normalized email (trimmed, lowercased); stored even when invalid
    pub correo: String,
    /// Email validation outcome
    pub correo_status: FieldStatus,
    /// Normalized phone (digits, country code stripped); stored even when invalid
    pub telefono: String,
    /// Phone validation outcome
    pub telefono_status: FieldStatus,
    /// Batch load date, overwritten on every successful reload
    pub fecha_carga: NaiveDate,
}

/// A validated, anonymized card row ready for upsert.
///
/// The raw card number never appears here; only its salted hash (the upsert
/// key) and the display-safe mask.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardRecord {
    /// Owning customer; foreign key into `clientes`
    pub cod_cliente: ClienteId,
    /// Salted SHA-256 of the digits-only card number, upsert key
    pub tarjeta_hash: String,
    /// Length-preserving mask exposing only the last 4 digits
    pub tarjeta_mask: String,
    /// Card number validation outcome
    pub tarjeta_status: FieldStatus,
    /// Batch load date, overwritten on every successful reload
    pub fecha_carga: NaiveDate,
}
