//! The Column Diff Engine (§4.4/§4.4.1): table-level invariants plus the
//! ordered per-column compatibility rule pipeline.

use crate::error::PlanError;
use crate::model::{Column, RootType, Table, TypeTree};
use crate::options::diff_options;
use crate::policy::DiffPolicy;
use crate::Result;

/// Produces the `ALTER TABLE` statements needed to turn `original` into `new`
/// (§4.4). Fatal on a table-level invariant violation or an incompatible
/// per-column change.
pub fn diff_table(original: &Table, new: &Table, policy: &DiffPolicy) -> Result<Vec<String>> {
    if original.interleave.is_some() != new.interleave.is_some() {
        return Err(PlanError::IncompatibleInterleaveChange {
            table: new.name.clone(),
            before: describe_interleave(original),
            after: describe_interleave(new),
        }
        .into());
    }

    let mut statements = Vec::new();

    if let (Some(before), Some(after)) = (&original.interleave, &new.interleave) {
        if before.parent != after.parent {
            return Err(PlanError::IncompatibleInterleaveChange {
                table: new.name.clone(),
                before: describe_interleave(original),
                after: describe_interleave(new),
            }
            .into());
        }
        if before.on_delete != after.on_delete {
            statements.push(format!(
                "ALTER TABLE {} SET {}",
                new.name,
                after.on_delete.canonical_text()
            ));
        }
    }

    if original.primary_key != new.primary_key {
        return Err(PlanError::IncompatiblePrimaryKeyChange {
            table: new.name.clone(),
            before: original.primary_key.clone(),
            after: new.primary_key.clone(),
        }
        .into());
    }

    for column in &original.columns {
        if new.column(&column.name).is_none() && policy.allow_drop_statements {
            statements.push(format!(
                "ALTER TABLE {} DROP COLUMN {}",
                new.name, column.name
            ));
        }
    }

    for column in &new.columns {
        if original.column(&column.name).is_none() {
            statements.push(format!(
                "ALTER TABLE {} ADD COLUMN {}",
                new.name,
                render_column_definition(column)
            ));
        }
    }

    for original_column in &original.columns {
        if let Some(new_column) = new.column(&original_column.name) {
            statements.extend(diff_column(&new.name, original_column, new_column)?);
        }
    }

    Ok(statements)
}

fn diff_column(table: &str, original: &Column, new: &Column) -> Result<Vec<String>> {
    let mut statements = Vec::new();
    let type_changed = original.canonical_type != new.canonical_type;

    if type_changed && !type_change_allowed(&original.type_tree, &new.type_tree) {
        return Err(PlanError::IncompatibleTypeChange {
            table: table.to_string(),
            column: new.name.clone(),
            before: original.canonical_type.clone(),
            after: new.canonical_type.clone(),
        }
        .into());
    }

    if original.generated != new.generated {
        return Err(PlanError::IncompatibleGenerationChange {
            table: table.to_string(),
            column: new.name.clone(),
        }
        .into());
    }

    if original.not_null != new.not_null || type_changed {
        let mut statement = format!(
            "ALTER TABLE {table} ALTER COLUMN {} {}",
            new.name, new.canonical_type
        );
        if new.not_null {
            statement.push_str(" NOT NULL");
        }
        statements.push(statement);
    }

    if let Some(options_diff) = diff_options(&original.options, &new.options) {
        statements.push(format!(
            "ALTER TABLE {table} ALTER COLUMN {} SET OPTIONS ({options_diff})",
            new.name
        ));
    }

    if original.default != new.default {
        match &new.default {
            None => statements.push(format!(
                "ALTER TABLE {table} ALTER COLUMN {} DROP DEFAULT",
                new.name
            )),
            Some(expr) => statements.push(format!(
                "ALTER TABLE {table} ALTER COLUMN {} SET DEFAULT ({expr})",
                new.name
            )),
        }
    }

    Ok(statements)
}

/// §4.4.1 rule 1: a type change is in-place alterable only if it is purely a
/// length change within `STRING` or `BYTES` at the same array depth.
fn type_change_allowed(before: &TypeTree, after: &TypeTree) -> bool {
    before.array_depth == after.array_depth
        && before.root == after.root
        && matches!(before.root, RootType::String | RootType::Bytes)
}

pub(crate) fn render_column_definition(column: &Column) -> String {
    let mut text = format!("{} {}", column.name, column.canonical_type);
    if let Some(generated) = &column.generated {
        text.push_str(&format!(" AS ({generated}) STORED"));
    }
    if column.not_null {
        text.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        text.push_str(&format!(" DEFAULT ({default})"));
    }
    if !column.options.is_empty() {
        let options = column
            .options
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        text.push_str(&format!(" OPTIONS ({options})"));
    }
    text
}

fn describe_interleave(table: &Table) -> String {
    table.interleave.as_ref().map_or_else(
        || "none".to_string(),
        |interleave| format!("INTERLEAVE IN PARENT {}", interleave.parent),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Length, OnDeleteAction};

    fn string_type(len: u64) -> (String, TypeTree) {
        (
            format!("STRING({len})"),
            TypeTree {
                root: RootType::String,
                array_depth: 0,
                length: Some(Length::Value(len)),
            },
        )
    }

    fn column(name: &str, canonical_type: &str, type_tree: TypeTree) -> Column {
        Column {
            name: name.to_string(),
            canonical_type: canonical_type.to_string(),
            type_tree,
            not_null: false,
            default: None,
            generated: None,
            options: Default::default(),
        }
    }

    #[test]
    fn string_length_change_is_alterable() {
        let (before_type, before_tree) = string_type(100);
        let (after_type, after_tree) = string_type(200);
        let before = column("name", &before_type, before_tree);
        let after = column("name", &after_type, after_tree);
        let statements = diff_column("T", &before, &after).unwrap();
        assert_eq!(
            statements,
            vec!["ALTER TABLE T ALTER COLUMN name STRING(200)".to_string()]
        );
    }

    #[test]
    fn root_type_change_is_incompatible() {
        let (before_type, before_tree) = string_type(100);
        let before = column("name", &before_type, before_tree);
        let after = column(
            "name",
            "INT64",
            TypeTree {
                root: RootType::Int64,
                array_depth: 0,
                length: None,
            },
        );
        let result = diff_column("T", &before, &after);
        assert!(result.is_err());
    }

    #[test]
    fn on_delete_change_emits_set_statement() {
        let original = Table {
            name: "C".to_string(),
            columns: vec![],
            primary_key: "(id)".to_string(),
            interleave: Some(crate::model::Interleave {
                parent: "P".to_string(),
                on_delete: OnDeleteAction::NoAction,
            }),
        };
        let mut new = original.clone();
        new.interleave = Some(crate::model::Interleave {
            parent: "P".to_string(),
            on_delete: OnDeleteAction::CascadeDelete,
        });
        let statements = diff_table(&original, &new, &DiffPolicy::default()).unwrap();
        assert_eq!(statements, vec!["ALTER TABLE C SET ON DELETE CASCADE".to_string()]);
    }
}
