// Entry point and high-level CLI flow.
//
// The binary mirrors the workflow of the delivery dashboard:
// - Option [1] loads and normalizes the activity export, printing diagnostics.
// - Option [2] asks for month/day/technician filters, prints the daily
//   breakdown and the monthly per-technician summary, and exports both
//   plus a JSON run summary.
// - After generating reports, the user can choose to go back to the
//   selection menu or exit.
mod error;
mod filter;
mod loader;
mod normalize;
mod output;
mod reports;
mod types;
mod util;

use filter::Selector;
use once_cell::sync::Lazy;
use std::io::{self, Write};
use std::sync::Mutex;
use types::NormalizedRecord;

const DEFAULT_SOURCE: &str = "deliveryopenfiber.xlsx";

// Simple in-memory app state so we only load/normalize the export once but
// can generate reports with different filters in a single run.
static APP_STATE: Lazy<Mutex<AppState>> = Lazy::new(|| Mutex::new(AppState { data: None }));

struct AppState {
    data: Option<Vec<NormalizedRecord>>,
}

/// Read a single line of input after printing the common "Enter choice:" prompt.
fn read_choice() -> String {
    print!("Enter choice: ");
    let _ = io::stdout().flush();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf.trim().to_string()
}

/// Ask the user whether to go back to the report selection menu after
/// generating reports.
///
/// Returns `true` if the user chose `Y`, `false` if they chose `N`.
fn prompt_back_to_menu() -> bool {
    loop {
        print!("Back to Report Selection (Y/N): ");
        let _ = io::stdout().flush();
        let mut buf = String::new();
        io::stdin().read_line(&mut buf).ok();
        let resp = buf.trim().to_uppercase();
        match resp.as_str() {
            "Y" => return true,
            "N" => return false,
            _ => println!("Invalid choice. Please enter Y or N."),
        }
    }
}

/// Present a numbered option list and read one selection.
///
/// `0` or an empty line selects "Tutti" (no filter); any other number picks
/// the corresponding option.
fn prompt_selector(label: &str, options: &[String]) -> Selector {
    loop {
        println!("{} [0 = Tutti]", label);
        for (i, opt) in options.iter().enumerate() {
            println!("  [{}] {}", i + 1, opt);
        }
        let choice = read_choice();
        if choice.is_empty() {
            return Selector::All;
        }
        match choice.parse::<usize>() {
            Ok(0) => return Selector::All,
            Ok(n) if n <= options.len() => return Selector::Only(options[n - 1].clone()),
            _ => println!(
                "Invalid choice. Please enter a number between 0 and {}.",
                options.len()
            ),
        }
    }
}

/// Handle option [1]: load the export and normalize it.
///
/// On success, we store the `Vec<NormalizedRecord>` in `APP_STATE` and print
/// a short textual summary of what happened.
fn handle_load() {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SOURCE.to_string());
    let raw = match loader::load_records(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to load file: {}\n", e);
            return;
        }
    };
    match normalize::normalize(&raw) {
        Ok((data, report)) => {
            println!(
                "Processing dataset... ({} rows loaded, {} matching \"{}\")",
                util::format_int(report.total_rows as i64),
                util::format_int(report.matching_rows as i64),
                types::ACTIVITY_FILTER
            );
            if report.parse_errors > 0 {
                println!(
                    "Note: {} rows skipped due to unparseable closure dates.",
                    util::format_int(report.parse_errors as i64)
                );
            }
            if report.missing_technician > 0 {
                println!(
                    "Note: {} rows skipped due to a missing technician name.",
                    util::format_int(report.missing_technician as i64)
                );
            }
            println!("");
            let mut state = APP_STATE.lock().unwrap();
            state.data = Some(data);
        }
        Err(e) => {
            eprintln!("Failed to process file: {}\n", e);
        }
    }
}

/// Handle option [2]: prompt for filters, then generate both reports and the
/// JSON summary.
fn handle_generate_reports() {
    let data = {
        let state = APP_STATE.lock().unwrap();
        state.data.clone()
    };
    let Some(data) = data else {
        println!("Error: No data loaded. Please load the export first (option 1).\n");
        return;
    };

    if let Some(latest) = reports::latest_closure(&data) {
        println!("Dati aggiornati al: {}\n", latest.format("%d/%m/%Y"));
    }

    let month = prompt_selector("Seleziona un mese", &filter::month_options(&data));
    let day = prompt_selector("Seleziona un giorno", &filter::day_options(&data, &month));
    let technician =
        prompt_selector("Seleziona un tecnico", &filter::technician_options(&data, &month));

    let views = filter::split_views(&data, &month, &day, &technician);

    println!("\nGenerating reports...\n");

    let daily = reports::daily_report(&views.daily);
    let file_daily = "report_giornaliero.csv";
    if let Err(e) = output::write_csv(file_daily, &daily) {
        eprintln!("Write error: {}", e);
    }
    println!("Dettaglio Giornaliero\n");
    output::preview_report(&daily, 10);
    println!("(Full table exported to {})\n", file_daily);

    let monthly = reports::monthly_report(&views.monthly);
    let file_monthly = "report_mensile.csv";
    if let Err(e) = output::write_csv(file_monthly, &monthly) {
        eprintln!("Write error: {}", e);
    }
    println!("Riepilogo Mensile per Tecnico\n");
    output::preview_report(&monthly, 10);
    println!("(Full table exported to {})\n", file_monthly);

    let summary = reports::generate_summary(&data, &daily, &monthly);
    if let Err(e) = output::write_json("summary.json", &summary) {
        eprintln!("Write error: {}", e);
    }
    println!(
        "Summary Stats (summary.json): {} records, {} technicians, {}/{} monthly rows on target\n",
        util::format_int(summary.total_records as i64),
        util::format_int(summary.total_technicians as i64),
        summary.monthly_on_target,
        summary.monthly_rows
    );
}

fn main() {
    loop {
        println!("Avanzamento Produzione Delivery");
        println!("[1] Load the delivery export");
        println!("[2] Generate Reports\n");
        match read_choice().as_str() {
            "1" => {
                handle_load();
            }
            "2" => {
                println!("");
                handle_generate_reports();
                if !prompt_back_to_menu() {
                    println!("Exiting the program.");
                    break;
                }
            }
            _ => {
                println!("Invalid choice. Please enter 1 or 2.\n");
            }
        }
    }
}
