//! The Difference Analyzer and Column Diff Engine (§4.3, §4.4).

pub mod analyzer;
pub mod column;
pub mod types;

pub use analyzer::{analyze, SchemaDifference};
pub use column::diff_table;
pub use types::{diff_map, diff_tables, MapDifference, TableDifference};
