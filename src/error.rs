use thiserror::Error;

use crate::types::ACTIVITY_FILTER;

/// Failures that abort a report run.
///
/// Rows that are individually malformed (bad dates, blank technicians) are
/// not errors; they are dropped and counted by the normalizer. Only
/// conditions that make the whole source unusable end up here.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("missing columns in source file: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    #[error("no rows with Descrizione = \"{ACTIVITY_FILTER}\" found in the source file")]
    NoMatchingActivity,

    #[error("unsupported source format: {0} (expected .csv or .xlsx)")]
    UnsupportedFormat(String),

    #[error("failed to read source: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid XLSX data: {0}")]
    Xlsx(#[from] calamine::XlsxError),

    #[error("failed to serialize summary: {0}")]
    Json(#[from] serde_json::Error),
}
