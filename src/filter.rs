use crate::types::NormalizedRecord;
use crate::util::MESI;
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

/// A user selection for one filter dimension: everything, or one exact value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    All,
    Only(String),
}

impl Selector {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(v) => v == value,
        }
    }
}

/// The two record sets the reports are built from.
///
/// The daily view applies all three selectors. The monthly view ignores the
/// day selector on purpose: drilling into one day must still show the whole
/// month's totals per technician.
pub struct FilteredViews {
    pub daily: Vec<NormalizedRecord>,
    pub monthly: Vec<NormalizedRecord>,
}

pub fn split_views(
    records: &[NormalizedRecord],
    month: &Selector,
    day: &Selector,
    technician: &Selector,
) -> FilteredViews {
    let daily = records
        .iter()
        .filter(|r| {
            month.matches(&r.month_name)
                && day.matches(&r.closure_day)
                && technician.matches(&r.technician)
        })
        .cloned()
        .collect();
    let monthly = records
        .iter()
        .filter(|r| month.matches(&r.month_name) && technician.matches(&r.technician))
        .cloned()
        .collect();
    FilteredViews { daily, monthly }
}

/// Months present in the data, in calendar order.
pub fn month_options(records: &[NormalizedRecord]) -> Vec<String> {
    MESI.iter()
        .filter(|m| records.iter().any(|r| r.month_name == **m))
        .map(|m| m.to_string())
        .collect()
}

/// Distinct closure days after the month filter, in chronological order.
/// Sorting is by the underlying date, not the `dd/mm/yyyy` string.
pub fn day_options(records: &[NormalizedRecord], month: &Selector) -> Vec<String> {
    let days: BTreeMap<NaiveDate, String> = records
        .iter()
        .filter(|r| month.matches(&r.month_name))
        .map(|r| (r.closure_date.date(), r.closure_day.clone()))
        .collect();
    days.into_values().collect()
}

/// Distinct technicians after the month filter, in lexicographic order.
pub fn technician_options(records: &[NormalizedRecord], month: &Selector) -> Vec<String> {
    let technicians: BTreeSet<String> = records
        .iter()
        .filter(|r| month.matches(&r.month_name))
        .map(|r| r.technician.clone())
        .collect();
    technicians.into_iter().collect()
}
