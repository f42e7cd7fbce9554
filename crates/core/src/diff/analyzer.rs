//! The Difference Analyzer (§4.3): partitions every keyed category between
//! two schemas into added / removed / modified, plus the table partition
//! the Column Diff Engine iterates over.

use crate::diff::types::{diff_map, diff_tables, MapDifference, TableDifference};
use crate::model::{ChangeStream, Constraint, Index, RowDeletionPolicy, Schema};

/// Every category difference the Plan Generator needs, computed once up
/// front from the pair of canonical schemas.
pub struct SchemaDifference<'a> {
    pub tables: TableDifference<'a>,
    pub indexes: MapDifference<'a, Index>,
    pub constraints: MapDifference<'a, Constraint>,
    pub ttls: MapDifference<'a, RowDeletionPolicy>,
    pub change_streams: MapDifference<'a, ChangeStream>,
}

#[must_use]
pub fn analyze<'a>(original: &'a Schema, new: &'a Schema) -> SchemaDifference<'a> {
    SchemaDifference {
        tables: diff_tables(&original.tables, &new.tables),
        indexes: diff_map(&original.indexes, &new.indexes, |a, b| {
            a.canonical_text == b.canonical_text
        }),
        constraints: diff_map(&original.constraints, &new.constraints, |a, b| {
            a.canonical_text() == b.canonical_text()
        }),
        ttls: diff_map(&original.ttls, &new.ttls, |a, b| {
            a.canonical_text == b.canonical_text
        }),
        change_streams: diff_map(&original.change_streams, &new.change_streams, |a, b| {
            a.canonical_text == b.canonical_text
        }),
    }
}
