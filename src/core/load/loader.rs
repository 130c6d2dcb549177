//! Batch loading into the target store
//!
//! Takes the transformer's per-row outcomes, upserts the accepted records
//! and diverts every rejection (validation-time and store-time alike) to
//! the reject sink. A row the store refuses for a per-row constraint is
//! demoted to a rejection; any other store error aborts the run. A sink
//! write failure after the store committed is recorded in the summary's
//! errors instead of raised, so a committed batch is never reported as a
//! failed run.

use crate::adapters::sink::RejectSink;
use crate::adapters::store::{RowFailure, TargetStore};
use crate::core::load::summary::{LoadError, LoadErrorKind, LoadSummary};
use crate::core::transform::TransformResult;
use crate::domain::records::REASON_STORE_CONSTRAINT;
use crate::domain::{
    CardRecord, CustomerRecord, EntityKind, FieldFailure, RawRecord, RejectedRow, Result,
};
use chrono::NaiveDate;
use std::sync::Arc;

/// Loads transformed batches into the store and the reject sink
pub struct BatchLoader {
    store: Arc<dyn TargetStore>,
    sink: Arc<dyn RejectSink>,
    dry_run: bool,
}

impl BatchLoader {
    /// Create a new batch loader
    pub fn new(store: Arc<dyn TargetStore>, sink: Arc<dyn RejectSink>, dry_run: bool) -> Self {
        Self {
            store,
            sink,
            dry_run,
        }
    }

    /// Load a batch of customer rows
    ///
    /// Every input row is accounted for exactly once in the returned
    /// summary: upserted, or appended to the reject sink.
    pub async fn load_customers(
        &self,
        results: Vec<TransformResult<CustomerRecord>>,
        load_date: NaiveDate,
    ) -> Result<LoadSummary> {
        let mut summary = LoadSummary::new();
        summary.total_rows = results.len();

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for result in results {
            match result {
                Ok(mut record) => {
                    record.fecha_carga = load_date;
                    accepted.push(record);
                }
                Err(mut row) => {
                    row.fecha_carga = load_date;
                    rejected.push(row);
                }
            }
        }

        if self.dry_run {
            tracing::info!(
                entity = EntityKind::Cliente.as_str(),
                would_upsert = accepted.len(),
                would_reject = rejected.len(),
                "Dry run: skipping store and sink writes"
            );
            summary.accepted = accepted.len();
            summary.rejected = rejected.len();
            return Ok(summary);
        }

        if !accepted.is_empty() {
            let outcome = self.store.upsert_customers(&accepted).await?;
            summary.accepted = outcome.applied;
            for failure in &outcome.row_failures {
                tracing::warn!(
                    entity = EntityKind::Cliente.as_str(),
                    key = %failure.key,
                    error = %failure.error,
                    "Store refused row; diverting to reject sink"
                );
            }
            rejected.extend(demote_customers(&accepted, &outcome.row_failures, load_date));
        }

        summary.rejected = rejected.len();
        self.sink_rejected(EntityKind::Cliente, &rejected, &mut summary);

        Ok(summary)
    }

    /// Load a batch of card rows
    pub async fn load_cards(
        &self,
        results: Vec<TransformResult<CardRecord>>,
        load_date: NaiveDate,
    ) -> Result<LoadSummary> {
        let mut summary = LoadSummary::new();
        summary.total_rows = results.len();

        let mut accepted = Vec::new();
        let mut rejected = Vec::new();
        for result in results {
            match result {
                Ok(mut record) => {
                    record.fecha_carga = load_date;
                    accepted.push(record);
                }
                Err(mut row) => {
                    row.fecha_carga = load_date;
                    rejected.push(row);
                }
            }
        }

        if self.dry_run {
            tracing::info!(
                entity = EntityKind::Tarjeta.as_str(),
                would_upsert = accepted.len(),
                would_reject = rejected.len(),
                "Dry run: skipping store and sink writes"
            );
            summary.accepted = accepted.len();
            summary.rejected = rejected.len();
            return Ok(summary);
        }

        if !accepted.is_empty() {
            let outcome = self.store.upsert_cards(&accepted).await?;
            summary.accepted = outcome.applied;
            for failure in &outcome.row_failures {
                tracing::warn!(
                    entity = EntityKind::Tarjeta.as_str(),
                    key = %failure.key,
                    error = %failure.error,
                    "Store refused row; diverting to reject sink"
                );
            }
            rejected.extend(demote_cards(&accepted, &outcome.row_failures, load_date));
        }

        summary.rejected = rejected.len();
        self.sink_rejected(EntityKind::Tarjeta, &rejected, &mut summary);

        Ok(summary)
    }

    /// Append rejections to the sink, recording a failure in the summary
    ///
    /// By the time the sink is written the store transaction has already
    /// committed, so a sink error must not be raised: the run completed,
    /// with errors.
    fn sink_rejected(&self, entity: EntityKind, rejected: &[RejectedRow], summary: &mut LoadSummary) {
        if rejected.is_empty() {
            return;
        }
        if let Err(e) = self.sink.append(rejected) {
            tracing::error!(
                entity = entity.as_str(),
                rows = rejected.len(),
                error = %e,
                "Failed to write rejected rows to the sink"
            );
            summary.add_error(
                LoadError::new(LoadErrorKind::Sink, e.to_string())
                    .with_context(entity.as_str().to_string()),
            );
        }
    }
}

/// Rebuilds rejections for customer rows the store refused
///
/// The raw source values were stripped at transform time, so the payload
/// carries the record's safe fields only (key, hashes, contact fields).
/// Failures address the batch by index, so duplicate keys in one batch
/// each sink their own record.
fn demote_customers(
    records: &[CustomerRecord],
    failures: &[RowFailure],
    load_date: NaiveDate,
) -> Vec<RejectedRow> {
    failures
        .iter()
        .filter_map(|failure| {
            records
                .get(failure.index)
                .map(|record| {
                    let raw = RawRecord::from_pairs([
                        ("cod_cliente", record.cod_cliente.as_str()),
                        ("dni_hash", record.dni_hash.as_str()),
                        ("correo", record.correo.as_str()),
                        ("telefono", record.telefono.as_str()),
                    ]);
                    RejectedRow::new(
                        EntityKind::Cliente,
                        raw,
                        vec![FieldFailure::new("cod_cliente", REASON_STORE_CONSTRAINT)],
                        load_date,
                    )
                })
        })
        .collect()
}

/// Rebuilds rejections for card rows the store refused
fn demote_cards(
    records: &[CardRecord],
    failures: &[RowFailure],
    load_date: NaiveDate,
) -> Vec<RejectedRow> {
    failures
        .iter()
        .filter_map(|failure| {
            records
                .get(failure.index)
                .map(|record| {
                    let raw = RawRecord::from_pairs([
                        ("cod_cliente", record.cod_cliente.as_str()),
                        ("tarjeta_hash", record.tarjeta_hash.as_str()),
                        ("tarjeta_mask", record.tarjeta_mask.as_str()),
                    ]);
                    RejectedRow::new(
                        EntityKind::Tarjeta,
                        raw,
                        vec![FieldFailure::new("tarjeta_hash", REASON_STORE_CONSTRAINT)],
                        load_date,
                    )
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::sink::MemoryRejectSink;
    use crate::adapters::store::UpsertOutcome;
    use crate::config::secret_string;
    use crate::core::anonymize::Anonymizer;
    use crate::core::transform::RowTransformer;
    use crate::domain::TamizError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Store stub recording what it was asked to upsert
    #[derive(Default)]
    struct RecordingStore {
        customers: Mutex<Vec<CustomerRecord>>,
        cards: Mutex<Vec<CardRecord>>,
        fail_keys: Vec<String>,
    }

    #[async_trait]
    impl TargetStore for RecordingStore {
        async fn test_connection(&self) -> Result<()> {
            Ok(())
        }

        async fn upsert_customers(&self, records: &[CustomerRecord]) -> Result<UpsertOutcome> {
            let mut outcome = UpsertOutcome::new();
            for (index, record) in records.iter().enumerate() {
                if self.fail_keys.contains(&record.cod_cliente.as_str().to_string()) {
                    outcome.row_failures.push(RowFailure::new(
                        index,
                        record.cod_cliente.as_str(),
                        "duplicate key value violates unique constraint",
                    ));
                } else {
                    self.customers.lock().unwrap().push(record.clone());
                    outcome.applied += 1;
                }
            }
            Ok(outcome)
        }

        async fn upsert_cards(&self, records: &[CardRecord]) -> Result<UpsertOutcome> {
            let mut outcome = UpsertOutcome::new();
            for (index, record) in records.iter().enumerate() {
                if self.fail_keys.contains(&record.tarjeta_hash) {
                    outcome.row_failures.push(RowFailure::new(
                        index,
                        record.tarjeta_hash.clone(),
                        "violates foreign key constraint",
                    ));
                } else {
                    self.cards.lock().unwrap().push(record.clone());
                    outcome.applied += 1;
                }
            }
            Ok(outcome)
        }
    }

    fn transformer(load_date: NaiveDate) -> RowTransformer {
        RowTransformer::new(
            Anonymizer::new(secret_string("MI_SALT_SECRETA".to_string())),
            load_date,
        )
    }

    fn load_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn valid_customer(cod: &str) -> TransformResult<CustomerRecord> {
        transformer(load_date()).transform_customer(&RawRecord::from_pairs([
            ("cod_cliente", cod),
            ("dni", "12345678Z"),
            ("correo", "a@example.com"),
            ("telefono", "600123456"),
        ]))
    }

    fn invalid_customer() -> TransformResult<CustomerRecord> {
        transformer(load_date()).transform_customer(&RawRecord::from_pairs([
            ("cod_cliente", ""),
            ("dni", "12345678Z"),
        ]))
    }

    #[tokio::test]
    async fn test_every_row_accounted_for() {
        let store = Arc::new(RecordingStore::default());
        let sink = Arc::new(MemoryRejectSink::new());
        let loader = BatchLoader::new(store.clone(), sink.clone(), false);

        let summary = loader
            .load_customers(
                vec![valid_customer("C001"), invalid_customer(), valid_customer("C002")],
                load_date(),
            )
            .await
            .unwrap();

        assert_eq!(summary.total_rows, 3);
        assert_eq!(summary.accepted, 2);
        assert_eq!(summary.rejected, 1);
        assert_eq!(store.customers.lock().unwrap().len(), 2);
        assert_eq!(sink.rows().len(), 1);
    }

    #[tokio::test]
    async fn test_store_row_failures_become_rejections() {
        let mut store = RecordingStore::default();
        store.fail_keys = vec!["C002".to_string()];
        let store = Arc::new(store);
        let sink = Arc::new(MemoryRejectSink::new());
        let loader = BatchLoader::new(store.clone(), sink.clone(), false);

        let summary = loader
            .load_customers(vec![valid_customer("C001"), valid_customer("C002")], load_date())
            .await
            .unwrap();

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected, 1);

        let rows = sink.rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].raw.get("cod_cliente"), "C002");
        assert_eq!(rows[0].failures[0].reason, REASON_STORE_CONSTRAINT);
        // The raw document number is long gone; only the hash travels
        assert_eq!(rows[0].raw.get("dni_hash").len(), 64);
    }

    #[tokio::test]
    async fn test_sink_failure_reported_not_raised() {
        struct FailingSink;
        impl RejectSink for FailingSink {
            fn append(&self, _: &[RejectedRow]) -> Result<()> {
                Err(TamizError::Sink("disk full".to_string()))
            }
        }

        let store = Arc::new(RecordingStore::default());
        let loader = BatchLoader::new(store.clone(), Arc::new(FailingSink), false);

        let summary = loader
            .load_customers(vec![valid_customer("C001"), invalid_customer()], load_date())
            .await
            .unwrap();

        // The store already committed; the sink failure lives in the summary
        assert_eq!(store.customers.lock().unwrap().len(), 1);
        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected, 1);
        assert!(!summary.is_successful());
        assert_eq!(summary.errors.len(), 1);
        assert_eq!(summary.errors[0].kind, LoadErrorKind::Sink);
        assert_eq!(summary.errors[0].context.as_deref(), Some("clientes"));
    }

    #[tokio::test]
    async fn test_duplicate_keys_each_sink_their_own_record() {
        let mut store = RecordingStore::default();
        store.fail_keys = vec!["C001".to_string()];
        let store = Arc::new(store);
        let sink = Arc::new(MemoryRejectSink::new());
        let loader = BatchLoader::new(store, sink.clone(), false);

        let first = transformer(load_date()).transform_customer(&RawRecord::from_pairs([
            ("cod_cliente", "C001"),
            ("dni", "12345678Z"),
            ("telefono", "600111111"),
        ]));
        let second = transformer(load_date()).transform_customer(&RawRecord::from_pairs([
            ("cod_cliente", "C001"),
            ("dni", "12345678Z"),
            ("telefono", "600222222"),
        ]));

        let summary = loader
            .load_customers(vec![first, second], load_date())
            .await
            .unwrap();

        assert_eq!(summary.rejected, 2);
        let phones: Vec<String> = sink
            .rows()
            .iter()
            .map(|r| r.raw.get("telefono").to_string())
            .collect();
        assert_eq!(phones, vec!["600111111".to_string(), "600222222".to_string()]);
    }

    #[tokio::test]
    async fn test_dry_run_touches_nothing() {
        let store = Arc::new(RecordingStore::default());
        let sink = Arc::new(MemoryRejectSink::new());
        let loader = BatchLoader::new(store.clone(), sink.clone(), true);

        let summary = loader
            .load_customers(vec![valid_customer("C001"), invalid_customer()], load_date())
            .await
            .unwrap();

        assert_eq!(summary.accepted, 1);
        assert_eq!(summary.rejected, 1);
        assert!(store.customers.lock().unwrap().is_empty());
        assert!(sink.rows().is_empty());
    }

    #[tokio::test]
    async fn test_load_date_is_authoritative() {
        let store = Arc::new(RecordingStore::default());
        let sink = Arc::new(MemoryRejectSink::new());
        let loader = BatchLoader::new(store.clone(), sink, false);

        // Record stamped with one date, run executed with another
        let run_date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        loader
            .load_customers(vec![valid_customer("C001")], run_date)
            .await
            .unwrap();

        assert_eq!(store.customers.lock().unwrap()[0].fecha_carga, run_date);
    }

    #[tokio::test]
    async fn test_card_fk_demotion() {
        let date = load_date();
        let card = transformer(date)
            .transform_card(&RawRecord::from_pairs([
                ("cod_cliente", "C404"),
                ("numero_tarjeta", "4111111111111111"),
            ]))
            .unwrap();

        let mut store = RecordingStore::default();
        store.fail_keys = vec![card.tarjeta_hash.clone()];
        let store = Arc::new(store);
        let sink = Arc::new(MemoryRejectSink::new());
        let loader = BatchLoader::new(store.clone(), sink.clone(), false);

        let summary = loader.load_cards(vec![Ok(card)], date).await.unwrap();

        assert_eq!(summary.accepted, 0);
        assert_eq!(summary.rejected, 1);
        let rows = sink.rows();
        assert_eq!(rows[0].entity, EntityKind::Tarjeta);
        assert_eq!(rows[0].raw.get("cod_cliente"), "C404");
    }

    #[tokio::test]
    async fn test_empty_batch_is_a_noop() {
        let store = Arc::new(RecordingStore::default());
        let sink = Arc::new(MemoryRejectSink::new());
        let loader = BatchLoader::new(store, sink.clone(), false);

        let summary = loader.load_customers(vec![], load_date()).await.unwrap();

        assert_eq!(summary.total_rows, 0);
        assert!(summary.is_successful());
        assert!(sink.rows().is_empty());
    }
}
