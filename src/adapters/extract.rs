//! CSV extraction
//!
//! Reads `;`-delimited source files into [`RawRecord`]s. Headers are
//! normalized (trimmed, lower-cased, accents folded, spaces collapsed to
//! underscores) so extracts produced by different upstream tools map to
//! the same column names. Cell bytes are decoded as UTF-8 with lossy
//! replacement, so a stray legacy-encoded byte never kills a run.

use crate::core::validate::clean_text;
use crate::domain::{RawRecord, Result, TamizError};
use std::path::Path;

/// Normalizes one header cell into a canonical column name
fn normalize_header(header: &str) -> String {
    clean_text(header)
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Reads every row of a `;`-delimited CSV file
///
/// Returns one [`RawRecord`] per data row, keyed by normalized header
/// name. Rows shorter than the header keep only the columns they carry;
/// extra cells without a header are dropped.
pub fn read_records(path: &Path) -> Result<Vec<RawRecord>> {
    if !path.exists() {
        return Err(TamizError::Extract(format!(
            "Source file not found: {}",
            path.display()
        )));
    }

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_path(path)
        .map_err(|e| TamizError::Extract(format!("Failed to open {}: {}", path.display(), e)))?;

    let headers: Vec<String> = reader
        .byte_headers()
        .map_err(|e| TamizError::Extract(format!("Failed to read header: {}", e)))?
        .iter()
        .map(|cell| normalize_header(&String::from_utf8_lossy(cell)))
        .collect();

    if headers.iter().all(|h| h.is_empty()) {
        return Err(TamizError::Extract(format!(
            "Source file has no usable header: {}",
            path.display()
        )));
    }

    let mut records = Vec::new();
    for (line, result) in reader.byte_records().enumerate() {
        let row = result
            .map_err(|e| TamizError::Extract(format!("Failed to read row {}: {}", line + 2, e)))?;

        let mut record = RawRecord::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() {
                continue;
            }
            record.insert(header, String::from_utf8_lossy(cell).into_owned());
        }
        records.push(record);
    }

    tracing::info!(
        file = %path.display(),
        rows = records.len(),
        "Extracted source file"
    );
    Ok(records)
}
