//! `commonfields sheets` and `commonfields columns` — exploratory views of a
//! workbook before scanning it.

use std::path::PathBuf;

use serde::Serialize;

use commonfields_io::xlsx::{self, Table};
use commonfields_io::{column_letter, LoadOptions};

use crate::config::check_unique_sheets;
use crate::CliError;

#[derive(Serialize)]
struct SheetEntry<'a> {
    index: usize,
    name: &'a str,
}

#[derive(Serialize)]
struct ColumnEntry {
    column: String,
    label: String,
}

#[derive(Serialize)]
struct SheetColumns<'a> {
    sheet: &'a str,
    columns: Vec<ColumnEntry>,
}

pub fn cmd_sheets(workbook: PathBuf, json: bool) -> Result<(), CliError> {
    let names = xlsx::sheet_names(&workbook).map_err(CliError::load)?;

    if json {
        let entries: Vec<SheetEntry> = names
            .iter()
            .enumerate()
            .map(|(index, name)| SheetEntry { index, name })
            .collect();
        print_json(&entries)?;
    } else {
        for name in &names {
            println!("{name}");
        }
    }
    Ok(())
}

pub fn cmd_columns(
    workbook: PathBuf,
    sheets: Vec<String>,
    header_row: usize,
    json: bool,
) -> Result<(), CliError> {
    check_unique_sheets(&sheets).map_err(CliError::args)?;

    let tables = xlsx::load_tables(&workbook, &sheets, &LoadOptions { header_row }).map_err(CliError::load)?;

    if json {
        let entries: Vec<SheetColumns> = tables.iter().map(sheet_columns).collect();
        print_json(&entries)?;
    } else {
        for (i, table) in tables.iter().enumerate() {
            if i > 0 {
                println!();
            }
            print!("{}", render_columns(table));
        }
    }
    Ok(())
}

fn sheet_columns(table: &Table) -> SheetColumns<'_> {
    SheetColumns {
        sheet: &table.name,
        columns: table
            .present_labels()
            .into_iter()
            .map(|(col, label)| ColumnEntry {
                column: column_letter(col),
                label,
            })
            .collect(),
    }
}

fn render_columns(table: &Table) -> String {
    let labels = table.present_labels();
    let mut out = format!("{} ({} column(s))\n", table.name, labels.len());
    for (col, label) in labels {
        out.push_str(&format!("  {:<3} {label}\n", column_letter(col)));
    }
    out
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;
    println!("{json}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonfields_detect::Cell;

    fn table() -> Table {
        Table {
            name: "orders".into(),
            labels: vec![Cell::Missing, Cell::from("order_id"), Cell::from(""), Cell::Int(2024)],
        }
    }

    #[test]
    fn render_skips_blank_labels() {
        assert_eq!(
            render_columns(&table()),
            "orders (2 column(s))\n  B   order_id\n  D   2024\n"
        );
    }

    #[test]
    fn json_entries_carry_letters() {
        let t = table();
        let value = serde_json::to_value(sheet_columns(&t)).unwrap();
        assert_eq!(value["sheet"], "orders");
        assert_eq!(value["columns"][0]["column"], "B");
        assert_eq!(value["columns"][1]["label"], "2024");
    }
}
