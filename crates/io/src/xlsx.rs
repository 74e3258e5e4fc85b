// Excel import/export: sheet enumeration, header loading, report export

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

use calamine::{open_workbook_auto, Data, Range, Reader, Sheets};
use commonfields_detect::classify::{classify, CellClass};
use commonfields_detect::{Cell, Report};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet, XlsxError};
use tracing::{debug, info, warn};

use crate::error::IoError;

/// One source table: its name and its ordered column labels.
///
/// Labels are indexed by sheet column, so a sheet whose data starts in
/// column C has two leading `Cell::Missing` entries.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub labels: Vec<Cell>,
}

impl Table {
    /// Labels that carry a value, with their sheet column index.
    pub fn present_labels(&self) -> Vec<(usize, String)> {
        self.labels
            .iter()
            .enumerate()
            .filter_map(|(col, cell)| match classify(cell) {
                CellClass::Present(v) => Some((col, v)),
                CellClass::Missing | CellClass::Empty => None,
            })
            .collect()
    }
}

/// Options controlling how column labels are read.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Row holding the column labels, counted from the first used row.
    pub header_row: usize,
}

/// Result of writing the derived workbook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Source sheets were copied and the report sheet appended.
    /// `replaced` is set when a sheet with the report's name was dropped.
    Copied { sheets: usize, replaced: bool },
    /// Copying the source failed; the file holds only the report sheet.
    ReportOnly { reason: String },
    /// There was no source workbook; the file holds only the report sheet.
    Fresh,
}

#[derive(Debug, Clone)]
pub struct ExportResult {
    pub path: PathBuf,
    pub outcome: ExportOutcome,
    pub rows_exported: usize,
    pub export_duration_ms: u128,
}

fn open(path: &Path) -> Result<Sheets<BufReader<File>>, IoError> {
    if !path.exists() {
        return Err(IoError::load(path, "file not found"));
    }
    open_workbook_auto(path).map_err(|e| IoError::load(path, format!("failed to open Excel file: {e}")))
}

/// List every sheet in a workbook (xlsx, xlsm, xls, xlsb, ods), in order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, IoError> {
    let workbook = open(path)?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read the column labels of the named sheets. An empty `sheets` slice
/// loads every sheet in workbook order.
pub fn load_tables(path: &Path, sheets: &[String], options: &LoadOptions) -> Result<Vec<Table>, IoError> {
    let start_time = Instant::now();
    let mut workbook = open(path)?;
    let available: Vec<String> = workbook.sheet_names().to_vec();

    if available.is_empty() {
        return Err(IoError::load(path, "workbook contains no sheets"));
    }

    let wanted: Vec<String> = if sheets.is_empty() {
        available.clone()
    } else {
        sheets.to_vec()
    };

    let mut tables = Vec::with_capacity(wanted.len());
    for name in &wanted {
        if !available.iter().any(|s| s == name) {
            return Err(IoError::load(
                path,
                format!("sheet '{name}' not found (available: {})", available.join(", ")),
            ));
        }

        let range = workbook
            .worksheet_range(name)
            .map_err(|e| IoError::load(path, format!("failed to read sheet '{name}': {e}")))?;

        let labels = header_labels(&range, options.header_row);
        debug!(sheet = %name, labels = labels.len(), "loaded sheet header");

        tables.push(Table {
            name: name.clone(),
            labels,
        });
    }

    debug!(
        tables = tables.len(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "workbook loaded"
    );
    Ok(tables)
}

fn header_labels(range: &Range<Data>, header_row: usize) -> Vec<Cell> {
    let Some((_, start_col)) = range.start() else {
        return Vec::new();
    };
    let Some(row) = range.rows().nth(header_row) else {
        return Vec::new();
    };

    let mut labels = vec![Cell::Missing; start_col as usize];
    labels.extend(row.iter().map(data_to_cell));

    while matches!(
        labels.last().map(classify),
        Some(CellClass::Missing | CellClass::Empty)
    ) {
        labels.pop();
    }
    labels
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => Cell::Missing,
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(n) => Cell::Int(*n),
        Data::Float(n) => Cell::Float(*n),
        Data::Bool(b) => Cell::Bool(*b),
        // Dates compare by serial, the way Excel stores them
        Data::DateTime(dt) => Cell::Float(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Missing,
    }
}

/// `<dir>/<stem><suffix>.xlsx` next to the source workbook.
pub fn updated_path(source: &Path, suffix: &str) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "workbook".to_string());
    source.with_file_name(format!("{stem}{suffix}.xlsx"))
}

/// Write `report` as sheet `sheet_name` into a copy of `source` saved at
/// `destination`. The source file is never modified.
///
/// Existing sheets are copied by value. A source sheet with the report's
/// name is left out so the fresh report replaces it. If copying fails for
/// any reason the report sheet alone is written to `destination`.
pub fn export_report(
    report: &Report,
    source: &Path,
    destination: &Path,
    sheet_name: &str,
) -> Result<ExportResult, IoError> {
    let start_time = Instant::now();

    if same_file(source, destination) {
        return Err(IoError::export(destination, "destination is the source workbook"));
    }

    let outcome = if source.exists() {
        match write_with_copies(report, source, destination, sheet_name) {
            Ok((sheets, replaced)) => ExportOutcome::Copied { sheets, replaced },
            Err(reason) => {
                warn!(%reason, "copying existing sheets failed, writing report sheet only");
                write_report_only(report, destination, sheet_name)?;
                ExportOutcome::ReportOnly { reason }
            }
        }
    } else {
        write_report_only(report, destination, sheet_name)?;
        ExportOutcome::Fresh
    };

    info!(
        path = %destination.display(),
        sheet = sheet_name,
        rows = report.len(),
        "report exported"
    );

    Ok(ExportResult {
        path: destination.to_path_buf(),
        outcome,
        rows_exported: report.len(),
        export_duration_ms: start_time.elapsed().as_millis(),
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn write_with_copies(
    report: &Report,
    source: &Path,
    destination: &Path,
    sheet_name: &str,
) -> Result<(usize, bool), String> {
    let mut source_book = open_workbook_auto(source)
        .map_err(|e| format!("failed to open {}: {e}", source.display()))?;

    let mut xlsx_workbook = XlsxWorkbook::new();
    let mut copied = 0;
    let mut replaced = false;

    // Excel sheet names are case-insensitive
    let target = sheet_name.to_lowercase();

    for name in source_book.sheet_names().to_vec() {
        if name.to_lowercase() == target {
            debug!(sheet = %name, "dropping existing report sheet");
            replaced = true;
            continue;
        }

        let range = source_book
            .worksheet_range(&name)
            .map_err(|e| format!("failed to read sheet '{name}': {e}"))?;

        let worksheet = xlsx_workbook.add_worksheet();
        worksheet
            .set_name(&name)
            .map_err(|e| format!("failed to create sheet '{name}': {e}"))?;
        copy_range(worksheet, &range).map_err(|e| format!("failed to copy sheet '{name}': {e}"))?;
        copied += 1;
    }

    write_report_sheet(&mut xlsx_workbook, report, sheet_name)
        .map_err(|e| format!("failed to write report sheet: {e}"))?;

    xlsx_workbook
        .save(destination)
        .map_err(|e| format!("failed to save XLSX file: {e}"))?;

    Ok((copied, replaced))
}

fn write_report_only(report: &Report, destination: &Path, sheet_name: &str) -> Result<(), IoError> {
    let mut xlsx_workbook = XlsxWorkbook::new();
    write_report_sheet(&mut xlsx_workbook, report, sheet_name)
        .map_err(|e| IoError::export(destination, format!("failed to write report sheet: {e}")))?;
    xlsx_workbook
        .save(destination)
        .map_err(|e| IoError::export(destination, format!("failed to save XLSX file: {e}")))
}

/// Copy cell values of a calamine range, keeping their sheet positions.
fn copy_range(worksheet: &mut Worksheet, range: &Range<Data>) -> Result<(), XlsxError> {
    let Some((start_row, start_col)) = range.start() else {
        return Ok(());
    };

    for (row_idx, row) in range.rows().enumerate() {
        let row32 = start_row + row_idx as u32;
        for (col_idx, cell) in row.iter().enumerate() {
            let col16 = (start_col as usize + col_idx) as u16;
            match cell {
                Data::Empty => {}
                Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                    worksheet.write_string(row32, col16, s)?;
                }
                Data::Float(n) => {
                    worksheet.write_number(row32, col16, *n)?;
                }
                Data::Int(n) => {
                    worksheet.write_number(row32, col16, *n as f64)?;
                }
                Data::Bool(b) => {
                    worksheet.write_boolean(row32, col16, *b)?;
                }
                Data::DateTime(dt) => {
                    worksheet.write_number(row32, col16, dt.as_f64())?;
                }
                Data::Error(e) => {
                    worksheet.write_string(row32, col16, e.to_string())?;
                }
            }
        }
    }
    Ok(())
}

/// Header row, then one row per record. Match_Count is numeric; absent
/// columns are left blank.
fn write_report_sheet(xlsx_workbook: &mut XlsxWorkbook, report: &Report, sheet_name: &str) -> Result<(), XlsxError> {
    let header_format = Format::new().set_bold();

    let worksheet = xlsx_workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, title) in report.header().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, title, &header_format)?;
    }

    for (i, record) in report.records().iter().enumerate() {
        let row32 = i as u32 + 1;
        worksheet.write_string(row32, 0, &record.value)?;
        worksheet.write_number(row32, 1, record.match_count as f64)?;
        for (col, cell) in record.cells.iter().enumerate() {
            if let Some(value) = cell {
                worksheet.write_string(row32, col as u16 + 2, value)?;
            }
        }
    }

    worksheet.set_freeze_panes(1, 0)?;
    worksheet.autofit();
    Ok(())
}
