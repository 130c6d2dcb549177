//! Reject sinks
//!
//! Rejected rows are appended to per-entity CSV files so a run never
//! overwrites the evidence from a previous one. The sink is append-only:
//! replaying a file accumulates rejections rather than replacing them.

use crate::domain::{EntityKind, RejectedRow, Result, TamizError};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Trait for recording rejected rows
pub trait RejectSink: Send + Sync {
    /// Append a batch of rejections
    fn append(&self, rejected: &[RejectedRow]) -> Result<()>;
}

/// CSV reject sink writing under a configured directory
///
/// One file per entity (`rows_rejected_clientes.csv`,
/// `rows_rejected_tarjetas.csv`); the header is written only when the file
/// is created. The raw row travels as a JSON payload column so no source
/// value is lost, whatever columns the extract carried.
pub struct CsvRejectSink {
    dir: PathBuf,
}

impl CsvRejectSink {
    /// Creates the sink, ensuring the directory exists
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn file_for(&self, entity: EntityKind) -> PathBuf {
        self.dir.join(format!("rows_rejected_{}.csv", entity.as_str()))
    }

    fn append_entity(&self, path: &Path, rows: &[RejectedRow]) -> Result<()> {
        let needs_header = !path.exists()
            || std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(file);

        if needs_header {
            writer
                .write_record(["fecha_carga", "entidad", "motivos", "payload"])
                .map_err(|e| TamizError::Sink(e.to_string()))?;
        }

        for row in rows {
            let payload = serde_json::to_string(&row.raw)?;
            writer
                .write_record([
                    row.fecha_carga.to_string().as_str(),
                    row.entity.as_str(),
                    row.reasons_joined().as_str(),
                    payload.as_str(),
                ])
                .map_err(|e| TamizError::Sink(e.to_string()))?;
        }

        writer.flush()?;
        Ok(())
    }
}

impl RejectSink for CsvRejectSink {
    fn append(&self, rejected: &[RejectedRow]) -> Result<()> {
        for entity in [EntityKind::Cliente, EntityKind::Tarjeta] {
            let rows: Vec<&RejectedRow> =
                rejected.iter().filter(|r| r.entity == entity).collect();
            if rows.is_empty() {
                continue;
            }
            let owned: Vec<RejectedRow> = rows.into_iter().cloned().collect();
            let path = self.file_for(entity);
            self.append_entity(&path, &owned)?;
            tracing::info!(
                entity = entity.as_str(),
                count = owned.len(),
                file = %path.display(),
                "Appended rejected rows"
            );
        }
        Ok(())
    }
}

/// In-memory reject sink for tests
#[derive(Default)]
pub struct MemoryRejectSink {
    rows: Mutex<Vec<RejectedRow>>,
}

impl MemoryRejectSink {
    /// Creates an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything appended so far
    pub fn rows(&self) -> Vec<RejectedRow> {
        self.rows.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl RejectSink for MemoryRejectSink {
    fn append(&self, rejected: &[RejectedRow]) -> Result<()> {
        let mut rows = self
            .rows
            .lock()
            .map_err(|_| TamizError::Sink("sink mutex poisoned".to_string()))?;
        rows.extend_from_slice(rejected);
        Ok(())
    }
}
