use crate::error::PipelineError;
use crate::types::{NormalizedRecord, RawRecord, ACTIVITY_FILTER};
use crate::util::{canonicalize_technician, month_name, parse_timestamp};
use chrono::Datelike;

/// Counters describing what happened to the raw rows during normalization.
#[derive(Debug, Clone, Default)]
pub struct NormalizeReport {
    pub total_rows: usize,
    pub matching_rows: usize,
    pub parse_errors: usize,
    pub missing_technician: usize,
}

/// Turn the raw rows into validated records.
///
/// Rows are kept only when the description matches the fixed activity type.
/// Of those, rows with unparseable closure timestamps or a blank/"NAN"
/// technician are dropped and counted, never fatal. The run fails only when
/// not a single row matches the activity filter, so the caller can tell
/// "wrong file" apart from "empty result".
pub fn normalize(
    rows: &[RawRecord],
) -> Result<(Vec<NormalizedRecord>, NormalizeReport), PipelineError> {
    let mut report = NormalizeReport {
        total_rows: rows.len(),
        ..Default::default()
    };
    let mut records = Vec::new();

    for row in rows {
        if row.description != ACTIVITY_FILTER {
            continue;
        }
        report.matching_rows += 1;

        let Some(closure_date) = parse_timestamp(&row.closure_timestamp) else {
            report.parse_errors += 1;
            continue;
        };

        let technician = canonicalize_technician(&row.technician);
        if technician.is_empty() || technician == "NAN" {
            report.missing_technician += 1;
            continue;
        }

        records.push(NormalizedRecord {
            closure_day: closure_date.format("%d/%m/%Y").to_string(),
            month_name: month_name(closure_date.month()).to_string(),
            closure_date,
            technician,
            status: row.status.clone(),
        });
    }

    if report.matching_rows == 0 {
        return Err(PipelineError::NoMatchingActivity);
    }
    Ok((records, report))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(timestamp: &str, technician: &str, status: &str, description: &str) -> RawRecord {
        RawRecord {
            closure_timestamp: timestamp.to_string(),
            technician: technician.to_string(),
            status: status.to_string(),
            description: description.to_string(),
        }
    }

    fn attivazione(timestamp: &str, technician: &str, status: &str) -> RawRecord {
        raw(timestamp, technician, status, ACTIVITY_FILTER)
    }

    #[test]
    fn keeps_only_the_scoped_activity() {
        let rows = vec![
            attivazione("01/03/2024 10:00", "Mario Rossi", "Espletamento OK"),
            raw("01/03/2024 09:00", "Luca Bianchi", "Espletamento OK", "Altro"),
        ];
        let (records, report) = normalize(&rows).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.total_rows, 2);
        assert_eq!(report.matching_rows, 1);
    }

    #[test]
    fn derives_day_and_month_fields() {
        let rows = vec![attivazione("05/03/2024 14:30", "Mario Rossi", "Espletamento OK")];
        let (records, _) = normalize(&rows).unwrap();
        assert_eq!(records[0].closure_day, "05/03/2024");
        assert_eq!(records[0].month_name, "Marzo");
        assert_eq!(records[0].technician, "MARIO ROSSI");
        assert_eq!(records[0].status, "Espletamento OK");
    }

    #[test]
    fn unparseable_dates_are_dropped_and_counted() {
        let rows = vec![
            attivazione("01/03/2024 10:00", "Mario", "Espletamento OK"),
            attivazione("not a date", "Luca", "Espletamento OK"),
        ];
        let (records, report) = normalize(&rows).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(report.parse_errors, 1);
    }

    #[test]
    fn all_dates_malformed_is_empty_not_an_error() {
        let rows = vec![attivazione("???", "Mario", "Espletamento OK")];
        let (records, report) = normalize(&rows).unwrap();
        assert!(records.is_empty());
        assert_eq!(report.matching_rows, 1);
        assert_eq!(report.parse_errors, 1);
    }

    #[test]
    fn no_matching_activity_is_a_distinct_error() {
        let rows = vec![raw("01/03/2024", "Mario", "OK", "Altro")];
        assert!(matches!(
            normalize(&rows),
            Err(PipelineError::NoMatchingActivity)
        ));
        assert!(matches!(
            normalize(&[]),
            Err(PipelineError::NoMatchingActivity)
        ));
    }

    #[test]
    fn blank_and_nan_technicians_are_excluded() {
        let rows = vec![
            attivazione("01/03/2024 10:00", "   ", "Espletamento OK"),
            attivazione("01/03/2024 11:00", "nan", "Espletamento OK"),
            attivazione("01/03/2024 12:00", "Mario", "Espletamento OK"),
        ];
        let (records, report) = normalize(&rows).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].technician, "MARIO");
        assert_eq!(report.missing_technician, 2);
    }

    #[test]
    fn technician_variants_canonicalize_to_one_identity() {
        let rows = vec![
            attivazione("01/03/2024 10:00", "MARIO ROSSI", "Espletamento OK"),
            attivazione("01/03/2024 11:00", "  mario   rossi ", "In lavorazione"),
        ];
        let (records, _) = normalize(&rows).unwrap();
        assert_eq!(records[0].technician, records[1].technician);
    }
}
