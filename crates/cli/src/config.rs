use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use commonfields_io::{DEFAULT_REPORT_SHEET, DEFAULT_SUFFIX};

use crate::scan::ScanSettings;

/// Characters Excel refuses in sheet names.
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const MAX_SHEET_NAME_LEN: usize = 31;

#[derive(Debug)]
pub enum ConfigError {
    /// Config file could not be read.
    Read(String),
    /// TOML parse / deserialization error.
    Parse(String),
    /// Config validation error (empty workbook path, duplicate sheet, etc.).
    Validation(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read(msg) => write!(f, "cannot read config: {msg}"),
            Self::Parse(msg) => write!(f, "config parse error: {msg}"),
            Self::Validation(msg) => write!(f, "config validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Run config
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub workbook: String,
    /// Sheets to scan. Empty means every sheet in the workbook.
    #[serde(default)]
    pub sheets: Vec<String>,
    #[serde(default)]
    pub header_row: usize,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_sheet")]
    pub sheet: String,
    #[serde(default = "default_suffix")]
    pub suffix: String,
    #[serde(default = "default_true")]
    pub write_workbook: bool,
    /// Explicit destination workbook; defaults to `<stem><suffix>.xlsx`.
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
}

fn default_sheet() -> String {
    DEFAULT_REPORT_SHEET.to_string()
}

fn default_suffix() -> String {
    DEFAULT_SUFFIX.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sheet: default_sheet(),
            suffix: default_suffix(),
            write_workbook: true,
            path: None,
            csv: None,
            json: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RunConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let input = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", path.display())))?;
        Self::from_toml(&input)
    }

    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let config: RunConfig = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workbook.trim().is_empty() {
            return Err(ConfigError::Validation("workbook must not be empty".into()));
        }

        check_unique_sheets(&self.sheets).map_err(ConfigError::Validation)?;

        validate_sheet_name(&self.output.sheet)
            .map_err(|e| ConfigError::Validation(format!("output.sheet: {e}")))?;

        if self.output.suffix.is_empty() && self.output.path.is_none() {
            return Err(ConfigError::Validation(
                "output.suffix must not be empty (the source workbook is never overwritten)".into(),
            ));
        }

        Ok(())
    }

    /// Resolve relative paths against `base_dir` (the config file's directory).
    pub fn into_settings(self, base_dir: &Path) -> ScanSettings {
        let resolve = |p: &str| -> PathBuf {
            let path = Path::new(p);
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                base_dir.join(path)
            }
        };

        ScanSettings {
            workbook: resolve(&self.workbook),
            sheets: self.sheets,
            header_row: self.header_row,
            write_workbook: self.output.write_workbook,
            report_sheet: self.output.sheet,
            suffix: self.output.suffix,
            destination: self.output.path.as_deref().map(resolve),
            csv: self.output.csv.as_deref().map(resolve),
            json: self.output.json.as_deref().map(resolve),
        }
    }
}

pub fn check_unique_sheets(sheets: &[String]) -> Result<(), String> {
    let mut seen = HashSet::new();
    for sheet in sheets {
        if sheet.is_empty() {
            return Err("sheet names must not be empty".into());
        }
        if !seen.insert(sheet.as_str()) {
            return Err(format!("sheet '{sheet}' listed more than once"));
        }
    }
    Ok(())
}

/// Excel's rules for a worksheet name.
pub fn validate_sheet_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("sheet name must not be empty".into());
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(format!("sheet name '{name}' is longer than {MAX_SHEET_NAME_LEN} characters"));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_CHARS.contains(c)) {
        return Err(format!("sheet name '{name}' contains invalid character '{c}'"));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(format!("sheet name '{name}' must not start or end with an apostrophe"));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
workbook = "data/source.xlsx"
sheets = ["sheet_0", "sheet_1", "sheet_2"]
header_row = 1

[output]
sheet = "keys"
suffix = "_keys"
write_workbook = false
csv = "out/common.csv"
json = "/tmp/common.json"
"#;

    #[test]
    fn parse_full() {
        let config = RunConfig::from_toml(FULL).unwrap();
        assert_eq!(config.workbook, "data/source.xlsx");
        assert_eq!(config.sheets.len(), 3);
        assert_eq!(config.header_row, 1);
        assert_eq!(config.output.sheet, "keys");
        assert_eq!(config.output.suffix, "_keys");
        assert!(!config.output.write_workbook);
    }

    #[test]
    fn parse_minimal_uses_defaults() {
        let config = RunConfig::from_toml(r#"workbook = "book.xlsx""#).unwrap();
        assert!(config.sheets.is_empty());
        assert_eq!(config.header_row, 0);
        assert_eq!(config.output.sheet, "common_fields_tab");
        assert_eq!(config.output.suffix, "_updated");
        assert!(config.output.write_workbook);
        assert!(config.output.csv.is_none());
    }

    #[test]
    fn partial_output_table_keeps_defaults() {
        let config = RunConfig::from_toml(
            r#"
workbook = "book.xlsx"
[output]
csv = "c.csv"
"#,
        )
        .unwrap();
        assert_eq!(config.output.sheet, "common_fields_tab");
        assert!(config.output.write_workbook);
        assert_eq!(config.output.csv.as_deref(), Some("c.csv"));
    }

    #[test]
    fn resolves_relative_paths() {
        let settings = RunConfig::from_toml(FULL).unwrap().into_settings(Path::new("/work"));
        assert_eq!(settings.workbook, PathBuf::from("/work/data/source.xlsx"));
        assert_eq!(settings.csv, Some(PathBuf::from("/work/out/common.csv")));
        assert_eq!(settings.json, Some(PathBuf::from("/tmp/common.json")));
        assert_eq!(settings.destination, None);
        assert_eq!(settings.report_sheet, "keys");
    }

    #[test]
    fn reject_missing_workbook() {
        let err = RunConfig::from_toml(r#"sheets = ["a"]"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn reject_empty_workbook() {
        let err = RunConfig::from_toml(r#"workbook = "  ""#).unwrap_err();
        assert!(err.to_string().contains("workbook must not be empty"));
    }

    #[test]
    fn reject_duplicate_sheet() {
        let err = RunConfig::from_toml(
            r#"
workbook = "b.xlsx"
sheets = ["a", "b", "a"]
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("'a' listed more than once"));
    }

    #[test]
    fn reject_invalid_report_sheet() {
        let err = RunConfig::from_toml(
            r#"
workbook = "b.xlsx"
[output]
sheet = "keys/2024"
"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("invalid character '/'"));
    }

    #[test]
    fn reject_empty_suffix_without_path() {
        let err = RunConfig::from_toml(
            r#"
workbook = "b.xlsx"
[output]
suffix = ""
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }

    #[test]
    fn reject_unknown_field() {
        let err = RunConfig::from_toml(
            r#"
workbook = "b.xlsx"
sheet = "typo"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn sheet_name_rules() {
        assert!(validate_sheet_name("common_fields_tab").is_ok());
        assert!(validate_sheet_name("").is_err());
        assert!(validate_sheet_name(&"x".repeat(32)).is_err());
        assert!(validate_sheet_name(&"x".repeat(31)).is_ok());
        assert!(validate_sheet_name("'quoted").is_err());
        assert!(validate_sheet_name("a:b").is_err());
    }
}
