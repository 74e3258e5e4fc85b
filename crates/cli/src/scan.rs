//! `commonfields scan` / `commonfields run` — load sheets, detect shared
//! values, print and export the ranked report.

use std::path::PathBuf;

use tracing::{info, warn};

use commonfields_detect::{detect, Report};
use commonfields_io::json::ReportMeta;
use commonfields_io::xlsx::{self, ExportOutcome};
use commonfields_io::LoadOptions;

use crate::config::{check_unique_sheets, validate_sheet_name};
use crate::CliError;

/// Everything a scan needs, whether it came from flags or a config file.
#[derive(Debug, Clone)]
pub struct ScanSettings {
    pub workbook: PathBuf,
    pub sheets: Vec<String>,
    pub header_row: usize,
    pub write_workbook: bool,
    pub report_sheet: String,
    pub suffix: String,
    pub destination: Option<PathBuf>,
    pub csv: Option<PathBuf>,
    pub json: Option<PathBuf>,
}

impl ScanSettings {
    fn check(&self) -> Result<(), CliError> {
        check_unique_sheets(&self.sheets).map_err(CliError::args)?;
        if self.write_workbook {
            validate_sheet_name(&self.report_sheet).map_err(CliError::args)?;
            if self.suffix.is_empty() && self.destination.is_none() {
                return Err(CliError::args("--suffix must not be empty")
                    .with_hint("the source workbook is never overwritten; use --output to pick a file"));
            }
        }
        Ok(())
    }

    fn destination(&self) -> PathBuf {
        self.destination
            .clone()
            .unwrap_or_else(|| xlsx::updated_path(&self.workbook, &self.suffix))
    }
}

pub fn cmd_scan(settings: ScanSettings, json_output: bool, quiet: bool) -> Result<(), CliError> {
    settings.check()?;

    let tables = xlsx::load_tables(
        &settings.workbook,
        &settings.sheets,
        &LoadOptions { header_row: settings.header_row },
    )
    .map_err(CliError::load)?;

    if tables.len() < 2 {
        warn!(tables = tables.len(), "fewer than two sheets selected, no value can be shared");
    }

    let grid = commonfields_io::to_grid(tables).map_err(|e| CliError::args(e.to_string()))?;
    let report = detect(&grid);
    info!(
        tables = grid.column_count(),
        rows = grid.row_count(),
        common = report.len(),
        "detection finished"
    );

    let meta = ReportMeta::new(settings.workbook.display().to_string());

    // Stdout
    if json_output {
        let json = commonfields_io::json::report_to_string(&report, &meta)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
        println!("{json}");
    } else {
        print!("{}", render_table(&report));
    }

    // Flat exports
    if let Some(ref path) = settings.csv {
        commonfields_io::csv::export_report(&report, path).map_err(CliError::export)?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }
    if let Some(ref path) = settings.json {
        commonfields_io::json::export_report(&report, &meta, path).map_err(CliError::export)?;
        if !quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    // Derived workbook
    if settings.write_workbook {
        let destination = settings.destination();
        let result = xlsx::export_report(&report, &settings.workbook, &destination, &settings.report_sheet)
            .map_err(CliError::export)?;

        if !quiet {
            match result.outcome {
                ExportOutcome::Copied { sheets, replaced } => {
                    eprintln!(
                        "wrote {} ({} sheet(s) copied{}, report in '{}')",
                        result.path.display(),
                        sheets,
                        if replaced { ", previous report replaced" } else { "" },
                        settings.report_sheet,
                    );
                }
                ExportOutcome::ReportOnly { ref reason } => {
                    eprintln!("note: could not copy existing sheets: {reason}");
                    eprintln!("wrote {} (report sheet only)", result.path.display());
                }
                ExportOutcome::Fresh => {
                    eprintln!("wrote {} (report sheet only)", result.path.display());
                }
            }
        }
    }

    if !quiet {
        eprintln!("{}", summary_line(&report));
    }

    Ok(())
}

/// One-line human summary for stderr.
pub fn summary_line(report: &Report) -> String {
    let s = report.summary();
    if s.common_values == 0 {
        return format!("{} sheet(s) scanned, no common values", s.tables);
    }
    format!(
        "{} sheet(s) scanned, {} common value(s), {} in every sheet, max match count {}",
        s.tables, s.common_values, s.values_in_all_tables, s.max_match_count
    )
}

/// Ranked table for the terminal: value, match count, and the sheets that
/// contain it.
pub fn render_table(report: &Report) -> String {
    if report.is_empty() {
        return String::new();
    }

    let rows: Vec<(String, String, String)> = report
        .records()
        .iter()
        .map(|r| {
            let sheets: Vec<&str> = report
                .columns()
                .iter()
                .enumerate()
                .filter(|(i, _)| r.in_column(*i))
                .map(|(_, name)| name.as_str())
                .collect();
            (r.value.clone(), r.match_count.to_string(), sheets.join(", "))
        })
        .collect();

    let value_width = rows
        .iter()
        .map(|(v, _, _)| v.chars().count())
        .chain(std::iter::once("VALUE".len()))
        .max()
        .unwrap_or(0);
    let count_width = "MATCHES".len();

    let mut out = format!("{:<value_width$}  {:>count_width$}  SHEETS\n", "VALUE", "MATCHES");
    for (value, count, sheets) in rows {
        let pad = value_width - value.chars().count();
        out.push_str(&format!(
            "{value}{:pad$}  {count:>count_width$}  {sheets}\n",
            ""
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonfields_detect::{Cell, Grid};

    fn report() -> Report {
        let grid = Grid::from_tables(vec![
            ("A", vec![Cell::from("id"), Cell::from("name")]),
            ("B", vec![Cell::from("id"), Cell::from("email")]),
            ("C", vec![Cell::from("name"), Cell::from("id")]),
        ])
        .unwrap();
        detect(&grid)
    }

    #[test]
    fn table_lists_sheets_per_value() {
        let out = render_table(&report());
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "VALUE  MATCHES  SHEETS");
        assert_eq!(lines[1], "id           3  A, B, C");
        assert_eq!(lines[2], "name         2  A, C");
    }

    #[test]
    fn table_is_empty_without_matches() {
        let grid = Grid::from_tables(vec![("A", vec![Cell::from("x")]), ("B", vec![Cell::from("y")])]).unwrap();
        assert_eq!(render_table(&detect(&grid)), "");
        assert_eq!(summary_line(&detect(&grid)), "2 sheet(s) scanned, no common values");
    }

    #[test]
    fn summary_mentions_counts() {
        assert_eq!(
            summary_line(&report()),
            "3 sheet(s) scanned, 2 common value(s), 1 in every sheet, max match count 3"
        );
    }

    #[test]
    fn settings_reject_empty_suffix() {
        let settings = ScanSettings {
            workbook: PathBuf::from("book.xlsx"),
            sheets: Vec::new(),
            header_row: 0,
            write_workbook: true,
            report_sheet: "tab".into(),
            suffix: String::new(),
            destination: None,
            csv: None,
            json: None,
        };
        let err = settings.check().unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
    }

    #[test]
    fn default_destination_uses_suffix() {
        let settings = ScanSettings {
            workbook: PathBuf::from("/data/book.xlsx"),
            sheets: Vec::new(),
            header_row: 0,
            write_workbook: true,
            report_sheet: "tab".into(),
            suffix: "_updated".into(),
            destination: None,
            csv: None,
            json: None,
        };
        assert_eq!(settings.destination(), PathBuf::from("/data/book_updated.xlsx"));
    }
}
