use std::fmt;

/// Grid precondition violations. Detection itself never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetectError {
    /// Two source tables share a name.
    DuplicateColumn(String),
    /// Column names and column data disagree in count.
    ColumnCountMismatch { names: usize, columns: usize },
    /// A column is shorter or longer than the first one.
    NotRectangular { column: String, expected: usize, found: usize },
}

impl fmt::Display for DetectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateColumn(name) => write!(f, "duplicate table name: '{name}'"),
            Self::ColumnCountMismatch { names, columns } => {
                write!(f, "{names} column name(s) for {columns} column(s)")
            }
            Self::NotRectangular { column, expected, found } => {
                write!(
                    f,
                    "grid is not rectangular: column '{column}' has {found} row(s), expected {expected}"
                )
            }
        }
    }
}

impl std::error::Error for DetectError {}
