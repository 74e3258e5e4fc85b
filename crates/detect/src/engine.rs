use std::collections::{BTreeSet, HashMap};

use crate::classify::{classify, CellClass};
use crate::grid::Grid;
use crate::model::{CommonValueRecord, Position, Report};

/// Every position a value was seen at, plus the distinct columns involved.
struct Occurrences {
    value: String,
    columns: BTreeSet<usize>,
    positions: Vec<Position>,
}

/// Find every value that appears in two or more columns of the grid.
///
/// Records are ranked by match count (distinct columns), highest first.
/// Equal counts keep discovery order: column-major, left to right, top to
/// bottom. An input with no shared values yields an empty report that still
/// carries the grid's column schema.
pub fn detect(grid: &Grid) -> Report {
    // value -> index into `found`, which preserves first-seen order
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut found: Vec<Occurrences> = Vec::new();

    for (col, (_, cells)) in grid.iter_columns().enumerate() {
        for (row, cell) in cells.iter().enumerate() {
            let value = match classify(cell) {
                CellClass::Present(v) => v,
                CellClass::Missing | CellClass::Empty => continue,
            };

            let slot = match index.get(&value) {
                Some(&i) => i,
                None => {
                    index.insert(value.clone(), found.len());
                    found.push(Occurrences {
                        value,
                        columns: BTreeSet::new(),
                        positions: Vec::new(),
                    });
                    found.len() - 1
                }
            };

            let entry = &mut found[slot];
            entry.columns.insert(col);
            entry.positions.push(Position { column: col, row });
        }
    }

    let column_count = grid.column_count();
    let mut records: Vec<CommonValueRecord> = found
        .into_iter()
        .filter(|o| o.columns.len() >= 2)
        .map(|o| build_record(o, column_count))
        .collect();

    // Stable: ties stay in discovery order
    records.sort_by(|a, b| b.match_count.cmp(&a.match_count));

    Report::new(grid.column_names().to_vec(), records)
}

fn build_record(occ: Occurrences, column_count: usize) -> CommonValueRecord {
    let cells = (0..column_count)
        .map(|c| occ.columns.contains(&c).then(|| occ.value.clone()))
        .collect();

    CommonValueRecord {
        match_count: occ.columns.len(),
        value: occ.value,
        cells,
        positions: occ.positions,
    }
}
