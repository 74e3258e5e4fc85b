//! `commonfields-detect` — Cross-table common value detector.
//!
//! Pure engine crate: receives a padded grid of column labels, returns a
//! ranked report of values shared by two or more columns.
//! No CLI or IO dependencies.

pub mod classify;
pub mod engine;
pub mod error;
pub mod grid;
pub mod model;

pub use classify::CellClass;
pub use engine::detect;
pub use error::DetectError;
pub use grid::Grid;
pub use model::{Cell, CommonValueRecord, Position, Report, ReportSummary};
