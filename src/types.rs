use chrono::NaiveDateTime;
use serde::Serialize;
use tabled::Tabled;

/// The single activity type the whole report is scoped to.
pub const ACTIVITY_FILTER: &str = "Attivazione con Appuntamento";

/// Status value that counts a record as successfully completed.
pub const STATUS_COMPLETED: &str = "Espletamento OK";

/// Completion-rate target, in percent. Rows at or above it are on target.
pub const TARGET_RESA: u32 = 75;

/// One spreadsheet row projected onto the canonical four columns.
/// Everything is untrusted free-form text at this stage.
#[derive(Debug, Clone)]
pub struct RawRecord {
    pub closure_timestamp: String,
    pub technician: String,
    pub status: String,
    pub description: String,
}

/// A validated activity record, as produced by the normalizer.
///
/// `closure_day` and `month_name` are derived from `closure_date` once, so
/// the filter and report stages can compare plain strings. `technician` is
/// in canonical form (trimmed, single-spaced, upper-cased).
#[derive(Debug, Clone)]
pub struct NormalizedRecord {
    pub closure_date: NaiveDateTime,
    pub closure_day: String,
    pub month_name: String,
    pub technician: String,
    pub status: String,
}

#[derive(Debug, Serialize, Tabled, Clone)]
pub struct ReportRow {
    #[serde(rename = "Data")]
    #[tabled(rename = "Data")]
    pub data: String,
    #[serde(rename = "Tecnico")]
    #[tabled(rename = "Tecnico")]
    pub tecnico: String,
    #[serde(rename = "Impianti gestiti")]
    #[tabled(rename = "Impianti gestiti")]
    pub gestiti: usize,
    #[serde(rename = "Impianti espletati")]
    #[tabled(rename = "Impianti espletati")]
    pub espletati: usize,
    #[serde(rename = "Resa")]
    #[tabled(rename = "Resa", display_with = "display_resa")]
    pub resa: Option<u32>,
}

impl ReportRow {
    /// Whether this row meets the completion target.
    ///
    /// `None` when the row has no rate (zero managed records): such a row
    /// is neither on nor below target.
    pub fn on_target(&self) -> Option<bool> {
        self.resa.map(|r| r >= TARGET_RESA)
    }
}

pub fn display_resa(resa: &Option<u32>) -> String {
    match resa {
        Some(r) => format!("{}%", r),
        None => String::new(),
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub updated_to: Option<String>,
    pub total_records: usize,
    pub total_technicians: usize,
    pub daily_rows: usize,
    pub monthly_rows: usize,
    pub monthly_on_target: usize,
}
