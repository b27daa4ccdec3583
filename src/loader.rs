use crate::error::PipelineError;
use crate::types::RawRecord;
use calamine::{open_workbook_from_rs, Data, Reader, Xlsx};
use csv::ReaderBuilder;
use std::io::Cursor;

/// Accepted header spellings for the technician column, tried in order.
/// The export has used all three over time.
const TECNICO_HEADERS: [&str; 3] = ["Tecnico (TechnicianName)", "TechnicianName", "Tecnico"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    Xlsx,
}

impl SourceFormat {
    /// Detect format from the filename extension.
    pub fn from_path(path: &str) -> Option<Self> {
        let lower = path.to_lowercase();
        if lower.ends_with(".csv") {
            Some(Self::Csv)
        } else if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
            Some(Self::Xlsx)
        } else {
            None
        }
    }
}

struct ColumnMap {
    data: usize,
    tecnico: usize,
    stato: usize,
    descrizione: usize,
}

/// Locate the four logical columns among the source headers.
///
/// Reports every unresolved column at once, sorted, so the operator sees
/// the complete list instead of fixing the file one column at a time.
fn resolve_columns(headers: &[String]) -> Result<ColumnMap, PipelineError> {
    let data = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case("data chiusura"));
    let tecnico = TECNICO_HEADERS
        .iter()
        .find_map(|cand| headers.iter().position(|h| h == cand));
    let stato = headers.iter().position(|h| h == "Stato");
    let descrizione = headers.iter().position(|h| h == "Descrizione");

    match (data, tecnico, stato, descrizione) {
        (Some(data), Some(tecnico), Some(stato), Some(descrizione)) => Ok(ColumnMap {
            data,
            tecnico,
            stato,
            descrizione,
        }),
        _ => {
            let mut missing = Vec::new();
            if data.is_none() {
                missing.push("Data".to_string());
            }
            if tecnico.is_none() {
                missing.push("Tecnico".to_string());
            }
            if stato.is_none() {
                missing.push("Stato".to_string());
            }
            if descrizione.is_none() {
                missing.push("Descrizione".to_string());
            }
            missing.sort();
            Err(PipelineError::MissingColumns(missing))
        }
    }
}

/// Load the raw records from a file on disk, detecting the format from the
/// extension.
pub fn load_records(path: &str) -> Result<Vec<RawRecord>, PipelineError> {
    let format = SourceFormat::from_path(path)
        .ok_or_else(|| PipelineError::UnsupportedFormat(path.to_string()))?;
    let bytes = std::fs::read(path)?;
    load_records_from_bytes(&bytes, format)
}

/// Load the raw records from in-memory content. Uploaded bytes and local
/// files go through the same path.
pub fn load_records_from_bytes(
    data: &[u8],
    format: SourceFormat,
) -> Result<Vec<RawRecord>, PipelineError> {
    let (headers, rows) = match format {
        SourceFormat::Csv => parse_csv_rows(data)?,
        SourceFormat::Xlsx => parse_xlsx_rows(data)?,
    };
    let cols = resolve_columns(&headers)?;

    let records = rows
        .into_iter()
        .map(|row| {
            let field = |idx: usize| row.get(idx).cloned().unwrap_or_default();
            RawRecord {
                closure_timestamp: field(cols.data),
                technician: field(cols.tecnico),
                status: field(cols.stato),
                description: field(cols.descrizione),
            }
        })
        .collect();
    Ok(records)
}

/// Parse CSV bytes into (headers, rows). Individual records that fail to
/// parse are skipped, not fatal.
fn parse_csv_rows(data: &[u8]) -> Result<(Vec<String>, Vec<Vec<String>>), PipelineError> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(data);
    let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = match result {
            Ok(r) => r,
            Err(_) => continue,
        };
        rows.push(record.iter().map(|f| f.to_string()).collect());
    }
    Ok((headers, rows))
}

/// Parse XLSX bytes into (headers, rows) from the first sheet, treating the
/// first row as headers. A workbook with no sheet or no rows yields empty
/// headers, which the column resolution then reports as missing columns.
fn parse_xlsx_rows(data: &[u8]) -> Result<(Vec<String>, Vec<Vec<String>>), PipelineError> {
    let mut workbook: Xlsx<_> = open_workbook_from_rs(Cursor::new(data))?;
    let Some(sheet_name) = workbook.sheet_names().first().cloned() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let range = workbook.worksheet_range(&sheet_name)?;

    let mut row_iter = range.rows();
    let Some(header_row) = row_iter.next() else {
        return Ok((Vec::new(), Vec::new()));
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let rows = row_iter
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect();
    Ok((headers, rows))
}

/// Render a cell as text. Date-typed cells are rendered day-first so the
/// normalizer sees the same dialect as the CSV export.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| d.format("%d/%m/%Y %H:%M:%S").to_string())
            .unwrap_or_default(),
        Data::Empty => String::new(),
        other => other.to_string().trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn csv_records(content: &str) -> Result<Vec<RawRecord>, PipelineError> {
        load_records_from_bytes(content.as_bytes(), SourceFormat::Csv)
    }

    #[test]
    fn detects_format_from_extension() {
        assert_eq!(SourceFormat::from_path("export.csv"), Some(SourceFormat::Csv));
        assert_eq!(SourceFormat::from_path("Export.XLSX"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_path("legacy.xls"), Some(SourceFormat::Xlsx));
        assert_eq!(SourceFormat::from_path("export.pdf"), None);
    }

    #[test]
    fn projects_the_four_columns_preserving_order() {
        let records = csv_records(
            "Data Chiusura,Tecnico,Stato,Descrizione,Extra\n\
             01/03/2024 10:00,Mario Rossi,Espletamento OK,Attivazione con Appuntamento,x\n\
             02/03/2024 11:00,Luca Bianchi,In lavorazione,Attivazione con Appuntamento,y\n",
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].closure_timestamp, "01/03/2024 10:00");
        assert_eq!(records[0].technician, "Mario Rossi");
        assert_eq!(records[1].status, "In lavorazione");
    }

    #[test]
    fn accepts_each_technician_header_spelling() {
        for header in ["Tecnico (TechnicianName)", "TechnicianName", "Tecnico"] {
            let content = format!(
                "Data Chiusura,{},Stato,Descrizione\n01/03/2024,Mario,OK,Altro\n",
                header
            );
            let records = csv_records(&content).unwrap();
            assert_eq!(records[0].technician, "Mario");
        }
    }

    #[test]
    fn closure_header_match_is_case_insensitive_and_trimmed() {
        let records = csv_records(
            " data chiusura ,Tecnico,Stato,Descrizione\n01/03/2024,Mario,OK,Altro\n",
        )
        .unwrap();
        assert_eq!(records[0].closure_timestamp, "01/03/2024");
    }

    #[test]
    fn missing_columns_are_reported_all_at_once() {
        let err = csv_records("Data Chiusura,Tecnico\n01/03/2024,Mario\n").unwrap_err();
        match err {
            PipelineError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["Descrizione".to_string(), "Stato".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn missing_status_column_is_named() {
        let err =
            csv_records("Data Chiusura,Tecnico,Descrizione\n01/03/2024,Mario,Altro\n").unwrap_err();
        match err {
            PipelineError::MissingColumns(missing) => {
                assert_eq!(missing, vec!["Stato".to_string()]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let err = load_records("export.pdf").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedFormat(_)));
    }

    #[test]
    fn short_rows_fill_missing_fields_with_empty_text() {
        let records = csv_records(
            "Data Chiusura,Tecnico,Stato,Descrizione\n01/03/2024,Mario\n",
        )
        .unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].status, "");
        assert_eq!(records[0].description, "");
    }
}
