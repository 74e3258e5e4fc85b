// File I/O operations: table loading and report export

pub mod csv;
pub mod error;
pub mod json;
pub mod xlsx;

pub use error::IoError;
pub use xlsx::{LoadOptions, Table};

use commonfields_detect::{DetectError, Grid};

/// Default name of the sheet the report is written to.
pub const DEFAULT_REPORT_SHEET: &str = "common_fields_tab";

/// Default suffix appended to the workbook stem for the derived output file.
pub const DEFAULT_SUFFIX: &str = "_updated";

/// Pad loaded tables into a detector grid, keeping load order.
pub fn to_grid(tables: Vec<Table>) -> Result<Grid, DetectError> {
    Grid::from_tables(tables.into_iter().map(|t| (t.name, t.labels)))
}

/// Convert column index to Excel column letter (0 = A, 25 = Z, 26 = AA, etc.)
pub fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use commonfields_detect::Cell;

    #[test]
    fn test_column_letter() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
        assert_eq!(column_letter(701), "ZZ");
        assert_eq!(column_letter(702), "AAA");
    }

    #[test]
    fn test_to_grid_pads() {
        let tables = vec![
            Table { name: "a".into(), labels: vec![Cell::from("x"), Cell::from("y")] },
            Table { name: "b".into(), labels: vec![Cell::from("x")] },
        ];
        let grid = to_grid(tables).unwrap();
        assert_eq!(grid.column_names(), &["a", "b"]);
        assert_eq!(grid.row_count(), 2);
        assert_eq!(grid.get(1, 1), Some(&Cell::padding()));
    }
}
