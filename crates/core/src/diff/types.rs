//! Shared result shapes produced by the Difference Analyzer (§4.3).

use std::collections::BTreeMap;

use crate::model::Table;

/// The outcome of comparing one keyed category (indexes, constraints, row
/// deletion policies, change streams) between two schemas, by canonical-text
/// equality. Entries are in ascending key order, matching `BTreeMap` iteration.
#[derive(Debug, Clone)]
pub struct MapDifference<'a, T> {
    pub added: Vec<&'a T>,
    pub removed: Vec<&'a T>,
    /// `(original, new)` pairs whose canonical text differs.
    pub modified: Vec<(&'a T, &'a T)>,
}

/// Compares two keyed maps, classifying each key as added, removed, or
/// modified using `eq` for canonical-text equality. Keys present in both with
/// equal canonical text are omitted entirely.
pub fn diff_map<'a, T>(
    original: &'a BTreeMap<String, T>,
    new: &'a BTreeMap<String, T>,
    eq: impl Fn(&T, &T) -> bool,
) -> MapDifference<'a, T> {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut modified = Vec::new();

    for (key, original_value) in original {
        match new.get(key) {
            None => removed.push(original_value),
            Some(new_value) if !eq(original_value, new_value) => {
                modified.push((original_value, new_value));
            }
            Some(_) => {}
        }
    }
    for (key, new_value) in new {
        if !original.contains_key(key) {
            added.push(new_value);
        }
    }

    MapDifference {
        added,
        removed,
        modified,
    }
}

/// The partition of the `tables` category: added and removed by name, plus
/// the original/new pairs for every name present in both (§4.5 step 9's
/// "for every table in `original` ∩ `new`, in original-side iteration order").
#[derive(Debug, Clone)]
pub struct TableDifference<'a> {
    /// New-side creation order.
    pub added: Vec<&'a Table>,
    /// Original-side creation order.
    pub removed: Vec<&'a Table>,
    /// `(original, new)` pairs, in original-side iteration order.
    pub common: Vec<(&'a Table, &'a Table)>,
}

pub fn diff_tables<'a>(original: &'a [Table], new: &'a [Table]) -> TableDifference<'a> {
    let mut removed = Vec::new();
    let mut common = Vec::new();

    for table in original {
        match new.iter().find(|candidate| candidate.name == table.name) {
            Some(new_table) => common.push((table, new_table)),
            None => removed.push(table),
        }
    }

    let added = new
        .iter()
        .filter(|table| !original.iter().any(|candidate| candidate.name == table.name))
        .collect();

    TableDifference {
        added,
        removed,
        common,
    }
}
