//! Pipeline coordination
//!
//! Wires extraction, transformation and loading together for one run.
//! Customers load before cards so card rows referencing a customer
//! accepted in the same run satisfy the foreign key.

use crate::adapters::extract::read_records;
use crate::adapters::postgres::{PostgresClient, PostgresStore};
use crate::adapters::sink::CsvRejectSink;
use crate::config::TamizConfig;
use crate::core::anonymize::Anonymizer;
use crate::core::load::{BatchLoader, LoadSummary};
use crate::core::transform::RowTransformer;
use crate::domain::Result;
use chrono::NaiveDate;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Coordinates one end-to-end load run
pub struct PipelineCoordinator {
    transformer: RowTransformer,
    loader: BatchLoader,
    load_date: NaiveDate,
}

impl PipelineCoordinator {
    /// Builds the pipeline from validated configuration
    ///
    /// Connects to PostgreSQL, verifies the connection and bootstraps the
    /// schema before anything is read.
    pub async fn new(config: &TamizConfig) -> Result<Self> {
        let client = PostgresClient::new(config.postgresql.clone()).await?;
        client.test_connection().await?;
        client.ensure_schema().await?;

        let store = Arc::new(PostgresStore::new(client));
        let sink = Arc::new(CsvRejectSink::new(config.rejects.dir.clone())?);

        let load_date = config.load.effective_load_date();
        let transformer = RowTransformer::new(
            Anonymizer::new(config.anonymization.salt.clone()),
            load_date,
        );
        let loader = BatchLoader::new(store, sink, config.application.dry_run);

        Ok(Self {
            transformer,
            loader,
            load_date,
        })
    }

    /// Runs the pipeline over the given source files
    ///
    /// Either file may be absent; an entity with no source file is simply
    /// skipped. Returns the merged summary for the run.
    pub async fn run(
        &self,
        clientes: Option<&Path>,
        tarjetas: Option<&Path>,
    ) -> Result<LoadSummary> {
        let started = Instant::now();
        let mut summary = LoadSummary::new();

        if let Some(path) = clientes {
            tracing::info!(file = %path.display(), "Loading customers");
            let raws = read_records(path)?;
            let results = raws
                .iter()
                .map(|raw| self.transformer.transform_customer(raw))
                .collect();
            summary.merge(self.loader.load_customers(results, self.load_date).await?);
        }

        if let Some(path) = tarjetas {
            tracing::info!(file = %path.display(), "Loading cards");
            let raws = read_records(path)?;
            let results = raws
                .iter()
                .map(|raw| self.transformer.transform_card(raw))
                .collect();
            summary.merge(self.loader.load_cards(results, self.load_date).await?);
        }

        summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}
