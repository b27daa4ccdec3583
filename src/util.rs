// Utility helpers for parsing and text normalization.
//
// This module centralizes all the "dirty" timestamp/name handling so the
// rest of the code can assume clean, typed values.
use chrono::{NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Italian month names, indexed by month number - 1.
pub const MESI: [&str; 12] = [
    "Gennaio",
    "Febbraio",
    "Marzo",
    "Aprile",
    "Maggio",
    "Giugno",
    "Luglio",
    "Agosto",
    "Settembre",
    "Ottobre",
    "Novembre",
    "Dicembre",
];

/// Italian name for a 1-based month number, as returned by `Datelike::month`.
pub fn month_name(month: u32) -> &'static str {
    MESI[month as usize - 1]
}

/// Parse a closure timestamp while being forgiving about the dialects that
/// show up in delivery exports.
///
/// - Day-first `dd/mm/yyyy` (the export's native format), with an optional
///   `HH:MM` or `HH:MM:SS` time part, slash- or dash-separated.
/// - ISO `yyyy-mm-dd`, which is how spreadsheet date cells render.
/// - Date-only values parse to midnight.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    const DATETIME_FORMATS: [&str; 6] = [
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
        "%d-%m-%Y %H:%M:%S",
        "%d-%m-%Y %H:%M",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
    ];
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    const DATE_FORMATS: [&str; 3] = ["%d/%m/%Y", "%d-%m-%Y", "%Y-%m-%d"];
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Canonical form of a technician name: trimmed, internal whitespace runs
/// collapsed to a single space, upper-cased.
///
/// Idempotent: canonicalizing an already-canonical value returns it
/// unchanged.
pub fn canonicalize_technician(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase()
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}
