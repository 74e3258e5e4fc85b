// CSV export of the ranked report

use std::io::Write;
use std::path::Path;

use commonfields_detect::Report;

use crate::error::IoError;

pub fn export_report(report: &Report, path: &Path) -> Result<(), IoError> {
    let writer = csv::Writer::from_path(path).map_err(|e| IoError::export(path, e.to_string()))?;
    write_report(report, writer).map_err(|e| IoError::export(path, e.to_string()))
}

/// Header row then one row per record. The header is written even when
/// the report has no rows.
pub fn write_report<W: Write>(report: &Report, mut writer: csv::Writer<W>) -> Result<(), csv::Error> {
    writer.write_record(report.header())?;
    for row in report.rows() {
        writer.write_record(&row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn report_to_string(report: &Report) -> Result<String, csv::Error> {
    let mut buf = Vec::new();
    write_report(report, csv::Writer::from_writer(&mut buf))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
