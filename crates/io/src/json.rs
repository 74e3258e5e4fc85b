// JSON export of the ranked report

use std::path::Path;

use commonfields_detect::{CommonValueRecord, Report, ReportSummary};
use serde::Serialize;

use crate::error::IoError;

#[derive(Debug, Clone, Serialize)]
pub struct ReportMeta {
    pub workbook: String,
    pub engine_version: String,
    pub run_at: String,
}

impl ReportMeta {
    pub fn new(workbook: impl Into<String>) -> Self {
        Self {
            workbook: workbook.into(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Full JSON document: meta, summary, tabular header and records.
#[derive(Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub meta: &'a ReportMeta,
    pub summary: ReportSummary,
    pub header: Vec<String>,
    pub records: &'a [CommonValueRecord],
}

impl<'a> ReportDocument<'a> {
    pub fn new(report: &'a Report, meta: &'a ReportMeta) -> Self {
        Self {
            meta,
            summary: report.summary(),
            header: report.header(),
            records: report.records(),
        }
    }
}

pub fn report_to_string(report: &Report, meta: &ReportMeta) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&ReportDocument::new(report, meta))
}

pub fn export_report(report: &Report, meta: &ReportMeta, path: &Path) -> Result<(), IoError> {
    let json = report_to_string(report, meta).map_err(|e| IoError::export(path, format!("JSON serialization error: {e}")))?;
    std::fs::write(path, json).map_err(|e| IoError::export(path, e.to_string()))
}
