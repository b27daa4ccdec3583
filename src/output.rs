use crate::error::PipelineError;
use crate::types::{ReportRow, TARGET_RESA};
use serde::Serialize;
use tabled::{settings::Style, Table};

pub fn write_csv<T: Serialize>(path: &str, rows: &[T]) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_path(path)?;
    for r in rows {
        wtr.serialize(r)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<(), PipelineError> {
    let s = serde_json::to_string_pretty(value)?;
    std::fs::write(path, s)?;
    Ok(())
}

/// Print a capped preview of a report, followed by a tally of rows at or
/// above the completion target.
pub fn preview_report(rows: &[ReportRow], max_rows: usize) {
    if rows.is_empty() {
        println!("(no rows)\n");
        return;
    }
    let slice: Vec<ReportRow> = rows.iter().cloned().take(max_rows).collect();
    let table_str = Table::new(slice).with(Style::markdown()).to_string();
    println!("{}", table_str);

    let rated = rows.iter().filter(|r| r.resa.is_some()).count();
    let on_target = rows.iter().filter(|r| r.on_target() == Some(true)).count();
    println!("({} of {} rows at or above the {}% target)\n", on_target, rated, TARGET_RESA);
}
