// commonfields CLI - find column labels shared across workbook sheets

mod config;
mod exit_codes;
mod inspect;
mod scan;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commonfields_io::{IoError, DEFAULT_REPORT_SHEET, DEFAULT_SUFFIX};

use config::{ConfigError, RunConfig};
use exit_codes::{EXIT_ERROR, EXIT_EXPORT, EXIT_INVALID_CONFIG, EXIT_LOAD, EXIT_SUCCESS, EXIT_USAGE};
use scan::ScanSettings;

#[derive(Parser)]
#[command(name = "commonfields")]
#[command(about = "Find values shared by two or more sheets of a workbook, ranked by how many sheets share them")]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short = 'v', action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the sheets of a workbook
    #[command(after_help = "\
Examples:
  commonfields sheets data.xlsx
  commonfields sheets data.xlsx --json")]
    Sheets {
        /// Workbook (xlsx, xlsm, xls, xlsb, ods)
        workbook: PathBuf,

        /// Output JSON instead of one name per line
        #[arg(long)]
        json: bool,
    },

    /// Show the column labels of each sheet
    #[command(after_help = "\
Examples:
  commonfields columns data.xlsx
  commonfields columns data.xlsx --sheet orders --sheet customers
  commonfields columns data.xlsx --header-row 2 --json")]
    Columns {
        /// Workbook (xlsx, xlsm, xls, xlsb, ods)
        workbook: PathBuf,

        /// Sheet to include. Repeatable; default is every sheet.
        #[arg(long = "sheet", short = 's', value_name = "NAME")]
        sheets: Vec<String>,

        /// Row holding the column labels, counted from the first used row
        #[arg(long, default_value_t = 0)]
        header_row: usize,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Find column labels shared by two or more sheets
    #[command(after_help = "\
Examples:
  commonfields scan data.xlsx
  commonfields scan data.xlsx --sheet orders --sheet customers --sheet items
  commonfields scan data.xlsx --write
  commonfields scan data.xlsx --write --report-sheet keys --suffix _keys
  commonfields scan data.xlsx --csv common.csv --json-out common.json
  commonfields scan data.xlsx --json | jq '.records[0]'")]
    Scan {
        /// Workbook (xlsx, xlsm, xls, xlsb, ods)
        workbook: PathBuf,

        /// Sheet to include. Repeatable; default is every sheet.
        #[arg(long = "sheet", short = 's', value_name = "NAME")]
        sheets: Vec<String>,

        /// Row holding the column labels, counted from the first used row
        #[arg(long, default_value_t = 0)]
        header_row: usize,

        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Also write the report as CSV
        #[arg(long, value_name = "PATH")]
        csv: Option<PathBuf>,

        /// Also write the report as a JSON file
        #[arg(long, value_name = "PATH")]
        json_out: Option<PathBuf>,

        /// Write a copy of the workbook with the report added as a new sheet
        #[arg(long)]
        write: bool,

        /// Destination workbook (implies --write; default <stem><suffix>.xlsx)
        #[arg(long, short = 'o', value_name = "PATH")]
        output: Option<PathBuf>,

        /// Name of the report sheet
        #[arg(long, default_value = DEFAULT_REPORT_SHEET)]
        report_sheet: String,

        /// Suffix appended to the workbook name for the derived file
        #[arg(long, default_value = DEFAULT_SUFFIX)]
        suffix: String,

        /// Suppress stderr notes and summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Run a scan from a TOML config file
    #[command(after_help = "\
Paths in the config are resolved relative to the config file's directory.

Examples:
  commonfields run commonfields.toml
  commonfields run commonfields.toml --json")]
    Run {
        /// Path to the config file
        config: PathBuf,

        /// Print the report as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Suppress stderr notes and summary
        #[arg(long, short = 'q')]
        quiet: bool,
    },

    /// Validate a config file without running
    Validate {
        /// Path to the config file
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Sheets { workbook, json } => inspect::cmd_sheets(workbook, json),
        Commands::Columns {
            workbook,
            sheets,
            header_row,
            json,
        } => inspect::cmd_columns(workbook, sheets, header_row, json),
        Commands::Scan {
            workbook,
            sheets,
            header_row,
            json,
            csv,
            json_out,
            write,
            output,
            report_sheet,
            suffix,
            quiet,
        } => {
            let settings = ScanSettings {
                workbook,
                sheets,
                header_row,
                write_workbook: write || output.is_some(),
                report_sheet,
                suffix,
                destination: output,
                csv,
                json: json_out,
            };
            scan::cmd_scan(settings, json, quiet)
        }
        Commands::Run { config, json, quiet } => cmd_run(&config, json, quiet),
        Commands::Validate { config } => cmd_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn cmd_run(config_path: &Path, json: bool, quiet: bool) -> Result<(), CliError> {
    let config = RunConfig::load(config_path).map_err(CliError::config)?;

    // Resolve file paths relative to config file's directory
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));
    scan::cmd_scan(config.into_settings(base_dir), json, quiet)
}

fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let config = RunConfig::load(config_path).map_err(CliError::config)?;
    let sheets = if config.sheets.is_empty() {
        "all sheets".to_string()
    } else {
        format!("{} sheet(s)", config.sheets.len())
    };
    eprintln!("config OK: {} ({sheets})", config.workbook);
    Ok(())
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn general(msg: impl Into<String>) -> Self {
        Self { code: EXIT_ERROR, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn load(err: IoError) -> Self {
        let hint = match &err {
            IoError::Load { message, .. } if message.contains("not found (available") => {
                Some("run `commonfields sheets <WORKBOOK>` to list sheet names".to_string())
            }
            _ => None,
        };
        Self { code: EXIT_LOAD, message: err.to_string(), hint }
    }

    pub fn export(err: IoError) -> Self {
        Self { code: EXIT_EXPORT, message: err.to_string(), hint: None }
    }

    pub fn config(err: ConfigError) -> Self {
        Self { code: EXIT_INVALID_CONFIG, message: err.to_string(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
