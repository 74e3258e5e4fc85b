use crate::model::Cell;

/// Outcome of inspecting a cell before it takes part in matching.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellClass {
    /// No value at all (blank cell, NaN).
    Missing,
    /// The empty string, including grid padding.
    Empty,
    /// A value, already normalized to its string form.
    Present(String),
}

impl CellClass {
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Present(v) => Some(v),
            Self::Missing | Self::Empty => None,
        }
    }
}

/// Classify a cell. Only `Present` cells take part in matching.
pub fn classify(cell: &Cell) -> CellClass {
    match cell {
        Cell::Missing => CellClass::Missing,
        Cell::Float(n) if n.is_nan() => CellClass::Missing,
        Cell::Text(s) if s.is_empty() => CellClass::Empty,
        other => CellClass::Present(normalize(other)),
    }
}

/// String form used for equality. Matching is on this form only, so
/// `Int(5)`, `Float(5.0)` and `Text("5")` are the same value.
pub fn normalize(cell: &Cell) -> String {
    match cell {
        Cell::Missing => String::new(),
        Cell::Text(s) => s.clone(),
        Cell::Int(n) => n.to_string(),
        Cell::Float(n) => format_float(*n),
        Cell::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
    }
}

/// Integers without decimals, everything else in shortest round-trip form.
fn format_float(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_and_nan_are_missing() {
        assert_eq!(classify(&Cell::Missing), CellClass::Missing);
        assert_eq!(classify(&Cell::Float(f64::NAN)), CellClass::Missing);
    }

    #[test]
    fn empty_string_is_empty() {
        assert_eq!(classify(&Cell::padding()), CellClass::Empty);
        assert_eq!(classify(&Cell::Text(String::new())), CellClass::Empty);
    }

    #[test]
    fn whitespace_is_a_value() {
        assert_eq!(classify(&Cell::from(" ")), CellClass::Present(" ".into()));
    }

    #[test]
    fn numbers_stringify() {
        assert_eq!(normalize(&Cell::Int(100)), "100");
        assert_eq!(normalize(&Cell::Float(100.0)), "100");
        assert_eq!(normalize(&Cell::Float(-3.0)), "-3");
        assert_eq!(normalize(&Cell::Float(2.5)), "2.5");
        assert_eq!(normalize(&Cell::Float(1e20)), "100000000000000000000");
        assert_eq!(normalize(&Cell::Float(f64::INFINITY)), "inf");
    }

    #[test]
    fn bools_stringify_upper() {
        assert_eq!(normalize(&Cell::Bool(true)), "TRUE");
        assert_eq!(normalize(&Cell::Bool(false)), "FALSE");
    }

    #[test]
    fn present_value_accessor() {
        assert_eq!(classify(&Cell::Int(7)).value(), Some("7"));
        assert_eq!(classify(&Cell::Missing).value(), None);
    }
}
