use std::collections::HashSet;

use crate::error::DetectError;
use crate::model::Cell;

/// Rectangular, column-major table of field labels. One column per source
/// table; short columns are padded with the empty-string sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Grid {
    names: Vec<String>,
    columns: Vec<Vec<Cell>>,
    rows: usize,
}

impl Grid {
    /// Build a grid from `(table name, labels)` pairs, padding every column
    /// to the longest one.
    pub fn from_tables<I, S>(tables: I) -> Result<Self, DetectError>
    where
        I: IntoIterator<Item = (S, Vec<Cell>)>,
        S: Into<String>,
    {
        let (names, mut columns): (Vec<String>, Vec<Vec<Cell>>) =
            tables.into_iter().map(|(n, c)| (n.into(), c)).unzip();

        let rows = columns.iter().map(Vec::len).max().unwrap_or(0);
        for column in &mut columns {
            column.resize(rows, Cell::padding());
        }

        Self::from_columns(names, columns)
    }

    /// Build a grid from already padded columns.
    pub fn from_columns(names: Vec<String>, columns: Vec<Vec<Cell>>) -> Result<Self, DetectError> {
        if names.len() != columns.len() {
            return Err(DetectError::ColumnCountMismatch {
                names: names.len(),
                columns: columns.len(),
            });
        }

        let mut seen = HashSet::new();
        for name in &names {
            if !seen.insert(name.as_str()) {
                return Err(DetectError::DuplicateColumn(name.clone()));
            }
        }

        let rows = columns.first().map_or(0, Vec::len);
        for (name, column) in names.iter().zip(&columns) {
            if column.len() != rows {
                return Err(DetectError::NotRectangular {
                    column: name.clone(),
                    expected: rows,
                    found: column.len(),
                });
            }
        }

        Ok(Self { names, columns, rows })
    }

    pub fn column_names(&self) -> &[String] {
        &self.names
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column(&self, index: usize) -> Option<&[Cell]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Cell> {
        self.columns.get(column)?.get(row)
    }

    /// Columns in grid order, each with its name.
    pub fn iter_columns(&self) -> impl Iterator<Item = (&str, &[Cell])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.columns.iter().map(Vec::as_slice))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(xs: &[&str]) -> Vec<Cell> {
        xs.iter().map(|s| Cell::from(*s)).collect()
    }

    #[test]
    fn pads_to_longest_table() {
        let grid = Grid::from_tables(vec![
            ("A", labels(&["id", "name", "email"])),
            ("B", labels(&["id"])),
        ])
        .unwrap();

        assert_eq!(grid.column_count(), 2);
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.get(1, 0), Some(&Cell::from("id")));
        assert_eq!(grid.get(1, 1), Some(&Cell::padding()));
        assert_eq!(grid.get(1, 2), Some(&Cell::padding()));
        assert_eq!(grid.get(1, 3), None);
    }

    #[test]
    fn empty_table_list_is_empty_grid() {
        let grid = Grid::from_tables(Vec::<(String, Vec<Cell>)>::new()).unwrap();
        assert_eq!(grid.column_count(), 0);
        assert_eq!(grid.row_count(), 0);
    }

    #[test]
    fn rejects_duplicate_table_name() {
        let err = Grid::from_tables(vec![("A", labels(&["x"])), ("A", labels(&["y"]))]).unwrap_err();
        assert_eq!(err, DetectError::DuplicateColumn("A".into()));
    }

    #[test]
    fn rejects_ragged_columns() {
        let err = Grid::from_columns(
            vec!["A".into(), "B".into()],
            vec![labels(&["x", "y"]), labels(&["x"])],
        )
        .unwrap_err();
        assert!(err.to_string().contains("not rectangular"));
        assert!(err.to_string().contains("'B'"));
    }

    #[test]
    fn rejects_name_count_mismatch() {
        let err = Grid::from_columns(vec!["A".into()], vec![labels(&["x"]), labels(&["y"])]).unwrap_err();
        assert_eq!(err, DetectError::ColumnCountMismatch { names: 1, columns: 2 });
    }

    #[test]
    fn iter_columns_keeps_order() {
        let grid = Grid::from_tables(vec![("Z", labels(&["a"])), ("A", labels(&["b"]))]).unwrap();
        let names: Vec<&str> = grid.iter_columns().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["Z", "A"]);
    }
}
