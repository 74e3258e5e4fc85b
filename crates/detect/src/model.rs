use serde::Serialize;

/// Leading column of the tabular report.
pub const VALUE_HEADER: &str = "Value";
/// Second column of the tabular report.
pub const MATCH_COUNT_HEADER: &str = "Match_Count";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A single source cell as handed over by the table loader.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Missing,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Cell {
    /// The empty-string sentinel used to pad short columns.
    pub fn padding() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for Cell {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for Cell {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Missing, Into::into)
    }
}

/// Where a value was observed: grid column index and row index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub column: usize,
    pub row: usize,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A value found in two or more distinct columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommonValueRecord {
    pub value: String,
    /// Distinct columns containing the value, not raw occurrences.
    pub match_count: usize,
    /// One entry per grid column: the value where it occurs, `None` elsewhere.
    pub cells: Vec<Option<String>>,
    pub positions: Vec<Position>,
}

impl CommonValueRecord {
    pub fn in_column(&self, column: usize) -> bool {
        matches!(self.cells.get(column), Some(Some(_)))
    }

    /// Flat row: value, match count, then one cell per column ("" when absent).
    pub fn to_row(&self) -> Vec<String> {
        let mut row = Vec::with_capacity(self.cells.len() + 2);
        row.push(self.value.clone());
        row.push(self.match_count.to_string());
        row.extend(self.cells.iter().map(|c| c.clone().unwrap_or_default()));
        row
    }
}

/// Ranked detector output. Records are sorted by match count descending,
/// ties in first-discovered order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
    columns: Vec<String>,
    records: Vec<CommonValueRecord>,
}

impl Report {
    pub(crate) fn new(columns: Vec<String>, records: Vec<CommonValueRecord>) -> Self {
        Self { columns, records }
    }

    /// Grid column names, in grid order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[CommonValueRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// `[Value, Match_Count, <grid columns...>]`. Present even with zero rows.
    pub fn header(&self) -> Vec<String> {
        let mut header = Vec::with_capacity(self.columns.len() + 2);
        header.push(VALUE_HEADER.to_string());
        header.push(MATCH_COUNT_HEADER.to_string());
        header.extend(self.columns.iter().cloned());
        header
    }

    pub fn rows(&self) -> Vec<Vec<String>> {
        self.records.iter().map(CommonValueRecord::to_row).collect()
    }

    pub fn get(&self, value: &str) -> Option<&CommonValueRecord> {
        self.records.iter().find(|r| r.value == value)
    }

    pub fn summary(&self) -> ReportSummary {
        let tables = self.columns.len();
        let max_match_count = self.records.iter().map(|r| r.match_count).max().unwrap_or(0);
        let values_in_all_tables = self
            .records
            .iter()
            .filter(|r| r.match_count == tables)
            .count();

        ReportSummary {
            tables,
            common_values: self.records.len(),
            max_match_count,
            values_in_all_tables,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub tables: usize,
    pub common_values: usize,
    pub max_match_count: usize,
    pub values_in_all_tables: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: &str, cells: &[bool]) -> CommonValueRecord {
        CommonValueRecord {
            value: value.into(),
            match_count: cells.iter().filter(|c| **c).count(),
            cells: cells
                .iter()
                .map(|c| c.then(|| value.to_string()))
                .collect(),
            positions: Vec::new(),
        }
    }

    #[test]
    fn header_leads_with_value_and_match_count() {
        let report = Report::new(vec!["A".into(), "B".into()], Vec::new());
        assert_eq!(report.header(), vec!["Value", "Match_Count", "A", "B"]);
        assert!(report.rows().is_empty());
    }

    #[test]
    fn row_uses_empty_marker_for_absent_columns() {
        let r = record("id", &[true, false, true]);
        assert_eq!(r.to_row(), vec!["id", "2", "id", "", "id"]);
        assert!(r.in_column(0));
        assert!(!r.in_column(1));
        assert!(!r.in_column(7));
    }

    #[test]
    fn summary_counts() {
        let report = Report::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![record("id", &[true, true, true]), record("name", &[true, false, true])],
        );
        let s = report.summary();
        assert_eq!(s.tables, 3);
        assert_eq!(s.common_values, 2);
        assert_eq!(s.max_match_count, 3);
        assert_eq!(s.values_in_all_tables, 1);
    }

    #[test]
    fn option_converts_to_missing() {
        assert_eq!(Cell::from(None::<&str>), Cell::Missing);
        assert_eq!(Cell::from(Some("x")), Cell::Text("x".into()));
    }
}
