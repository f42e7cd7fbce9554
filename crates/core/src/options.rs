//! The options-diff canonical form (§4.6), shared by the database-level
//! options diff (Plan Generator step 1) and the column options-diff
//! compatibility rule (§4.4.1 rule 4).

use crate::model::OptionMap;

/// Computes the canonical `SET OPTIONS (...)` body for the change from `old`
/// to `new`, or `None` if the two maps are equal.
///
/// Keys present only in `old` are rendered `key=NULL` (clearing the option);
/// keys present in `new` (whether changed or newly added) are rendered
/// `key=<new value>`. Entries are joined in ascending key order; the final
/// sort is keyed on `key` alone, not on the rendered `key=value` string, so a
/// key that is a prefix of another (`a` vs `a1`) still sorts correctly.
#[must_use]
pub fn diff_options(old: &OptionMap, new: &OptionMap) -> Option<String> {
    let mut entries: Vec<(&str, String)> = Vec::new();

    for (key, old_value) in old {
        if !new.contains_key(key) {
            entries.push((key, format!("{key}=NULL")));
        }
    }
    for (key, new_value) in new {
        if old.get(key) != Some(new_value) {
            entries.push((key, format!("{key}={new_value}")));
        }
    }
    entries.sort_by(|(a, _), (b, _)| a.cmp(b));

    if entries.is_empty() {
        None
    } else {
        Some(
            entries
                .into_iter()
                .map(|(_, rendered)| rendered)
                .collect::<Vec<_>>()
                .join(", "),
        )
    }
}
