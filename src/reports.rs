use crate::types::{NormalizedRecord, ReportRow, SummaryStats, STATUS_COMPLETED};
use chrono::{Datelike, NaiveDateTime};
use std::collections::{HashMap, HashSet};

/// Which field buckets the aggregation: calendar day for the daily report,
/// Italian month name for the monthly roll-up.
#[derive(Debug, Clone, Copy)]
pub enum BucketKey {
    Day,
    Month,
}

/// Group records by (bucket, technician) and compute managed count,
/// completed count, and rounded completion rate per group.
///
/// Empty input yields an empty table, never an error. Output order is
/// chronological by bucket, then technician.
pub fn aggregate(data: &[NormalizedRecord], bucket: BucketKey) -> Vec<ReportRow> {
    #[derive(Default)]
    struct Acc {
        sort_key: i64,
        gestiti: usize,
        espletati: usize,
    }

    let mut map: HashMap<(String, String), Acc> = HashMap::new();
    for r in data {
        let (label, sort_key) = match bucket {
            BucketKey::Day => (
                r.closure_day.clone(),
                i64::from(r.closure_date.date().num_days_from_ce()),
            ),
            BucketKey::Month => (r.month_name.clone(), i64::from(r.closure_date.month())),
        };
        let e = map.entry((label, r.technician.clone())).or_default();
        e.sort_key = sort_key;
        e.gestiti += 1;
        if r.status == STATUS_COMPLETED {
            e.espletati += 1;
        }
    }

    let mut rows: Vec<(i64, ReportRow)> = map
        .into_iter()
        .map(|((data, tecnico), acc)| {
            let resa = if acc.gestiti > 0 {
                Some(((acc.espletati as f64 / acc.gestiti as f64) * 100.0).round() as u32)
            } else {
                None
            };
            (
                acc.sort_key,
                ReportRow {
                    data,
                    tecnico,
                    gestiti: acc.gestiti,
                    espletati: acc.espletati,
                    resa,
                },
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.tecnico.cmp(&b.1.tecnico)));
    rows.into_iter().map(|(_, row)| row).collect()
}

pub fn daily_report(data: &[NormalizedRecord]) -> Vec<ReportRow> {
    aggregate(data, BucketKey::Day)
}

pub fn monthly_report(data: &[NormalizedRecord]) -> Vec<ReportRow> {
    aggregate(data, BucketKey::Month)
}

/// Most recent closure timestamp in the dataset, for the "data as of"
/// line shown before the reports.
pub fn latest_closure(data: &[NormalizedRecord]) -> Option<NaiveDateTime> {
    data.iter().map(|r| r.closure_date).max()
}

pub fn generate_summary(
    data: &[NormalizedRecord],
    daily: &[ReportRow],
    monthly: &[ReportRow],
) -> SummaryStats {
    let technicians: HashSet<&str> = data.iter().map(|r| r.technician.as_str()).collect();
    SummaryStats {
        updated_to: latest_closure(data).map(|d| d.format("%d/%m/%Y").to_string()),
        total_records: data.len(),
        total_technicians: technicians.len(),
        daily_rows: daily.len(),
        monthly_rows: monthly.len(),
        monthly_on_target: monthly
            .iter()
            .filter(|r| r.on_target() == Some(true))
            .count(),
    }
}
