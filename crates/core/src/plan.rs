//! The Plan Generator (§4.5): applies the fixed 18-step ordering protocol to
//! the category differences, gated by the recreate policy and by
//! `allow-drop-statements`.

use crate::diff::column::render_column_definition;
use crate::diff::{analyze, diff_table};
use crate::error::{PlanError, RecreateKind};
use crate::model::{OnDeleteAction, Schema, Table};
use crate::options::diff_options;
use crate::policy::DiffPolicy;
use crate::Result;

/// Computes the ordered migration statement list transforming `original`
/// into `new` under `policy` (§4.5). The §4.5-gate recreate check is
/// evaluated before any statement is emitted, so failure here is atomic.
pub fn plan(original: &Schema, new: &Schema, policy: &DiffPolicy) -> Result<Vec<String>> {
    let difference = analyze(original, new);

    if !difference.indexes.modified.is_empty() && !policy.allow_recreate_indexes {
        return Err(PlanError::RecreateNotPermitted {
            kind: RecreateKind::Index,
            names: difference
                .indexes
                .modified
                .iter()
                .map(|(original, _)| original.name.clone())
                .collect(),
        }
        .into());
    }
    if !difference.constraints.modified.is_empty() && !policy.allow_recreate_constraints {
        return Err(PlanError::RecreateNotPermitted {
            kind: RecreateKind::Constraint,
            names: difference
                .constraints
                .modified
                .iter()
                .map(|(original, _)| original.name.clone())
                .collect(),
        }
        .into());
    }

    let database_name = resolve_database_name(original, new)?;

    let mut statements = Vec::new();

    // Step 1: ALTER DATABASE SET OPTIONS.
    if let Some(options_diff) = diff_options(&original.database_options, &new.database_options) {
        let Some(name) = database_name else {
            return Err(PlanError::MissingDatabaseName.into());
        };
        statements.push(format!("ALTER DATABASE {name} SET OPTIONS ({options_diff})"));
    }

    // Step 2: DROP INDEX (removed).
    if policy.allow_drop_statements {
        for index in &difference.indexes.removed {
            statements.push(format!("DROP INDEX {}", index.name));
        }
    }

    // Step 3: DROP CHANGE STREAM (removed).
    if policy.allow_drop_statements {
        for change_stream in &difference.change_streams.removed {
            statements.push(format!("DROP CHANGE STREAM {}", change_stream.name));
        }
    }

    // Step 4: DROP INDEX (modified).
    for (index, _) in &difference.indexes.modified {
        statements.push(format!("DROP INDEX {}", index.name));
    }

    // Step 5: DROP CONSTRAINT (removed).
    for constraint in &difference.constraints.removed {
        statements.push(format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            constraint.table, constraint.name
        ));
    }

    // Step 6: DROP CONSTRAINT (modified) — original-side owning table.
    for (original_constraint, _) in &difference.constraints.modified {
        statements.push(format!(
            "ALTER TABLE {} DROP CONSTRAINT {}",
            original_constraint.table, original_constraint.name
        ));
    }

    // Step 7: DROP ROW DELETION POLICY (removed).
    for ttl in &difference.ttls.removed {
        statements.push(format!(
            "ALTER TABLE {} DROP ROW DELETION POLICY",
            ttl.table
        ));
    }

    // Step 8: DROP TABLE (removed), reverse original creation order.
    if policy.allow_drop_statements {
        for table in difference.tables.removed.iter().rev() {
            statements.push(format!("DROP TABLE {}", table.name));
        }
    }

    // Step 9: ALTER TABLE for modified tables, original-side iteration order.
    for (original_table, new_table) in difference.tables.common {
        statements.extend(diff_table(original_table, new_table, policy)?);
    }

    // Step 10: CREATE TABLE (added), new-side creation order.
    for table in difference.tables.added {
        statements.push(render_create_table(table));
    }

    // Step 11: ADD ROW DELETION POLICY (added).
    for ttl in &difference.ttls.added {
        statements.push(format!(
            "ALTER TABLE {} ADD {}",
            ttl.table, ttl.canonical_text
        ));
    }

    // Step 12: REPLACE ROW DELETION POLICY (modified).
    for (_, new_ttl) in &difference.ttls.modified {
        statements.push(format!(
            "ALTER TABLE {} REPLACE {}",
            new_ttl.table, new_ttl.canonical_text
        ));
    }

    // Step 13: CREATE INDEX (added).
    for index in &difference.indexes.added {
        statements.push(index.canonical_text.clone());
    }

    // Step 14: CREATE INDEX (modified), new-side statement.
    for (_, new_index) in &difference.indexes.modified {
        statements.push(new_index.canonical_text.clone());
    }

    // Step 15: ADD CONSTRAINT (added), new-side owning table.
    for constraint in &difference.constraints.added {
        statements.push(format!(
            "ALTER TABLE {} ADD {}",
            constraint.table,
            constraint.body.canonical_text(&constraint.name)
        ));
    }

    // Step 16: ADD CONSTRAINT (modified), new-side form.
    for (_, new_constraint) in &difference.constraints.modified {
        statements.push(format!(
            "ALTER TABLE {} ADD {}",
            new_constraint.table,
            new_constraint.body.canonical_text(&new_constraint.name)
        ));
    }

    // Step 17: CREATE CHANGE STREAM (added).
    for change_stream in &difference.change_streams.added {
        statements.push(change_stream.canonical_text.clone());
    }

    // Step 18: ALTER CHANGE STREAM (modified) — FOR before OPTIONS.
    for (original_stream, new_stream) in &difference.change_streams.modified {
        if original_stream.for_clause != new_stream.for_clause {
            statements.push(format!(
                "ALTER CHANGE STREAM {} SET FOR {}",
                new_stream.name, new_stream.for_clause
            ));
        }
        if original_stream.options_clause != new_stream.options_clause {
            statements.push(format!(
                "ALTER CHANGE STREAM {} SET OPTIONS ({})",
                new_stream.name, new_stream.options_clause
            ));
        }
    }

    Ok(statements)
}

/// Resolves the database name used for `ALTER DATABASE` emission (§4.2):
/// unique across both inputs, preferring whichever side supplies one.
fn resolve_database_name(original: &Schema, new: &Schema) -> Result<Option<String>> {
    match (&original.database_name, &new.database_name) {
        (Some(original_name), Some(new_name)) if original_name != new_name => {
            Err(PlanError::ConflictingDatabaseName {
                original: original_name.clone(),
                new: new_name.clone(),
            }
            .into())
        }
        (_, Some(new_name)) => Ok(Some(new_name.clone())),
        (Some(original_name), None) => Ok(Some(original_name.clone())),
        (None, None) => Ok(None),
    }
}

fn render_create_table(table: &Table) -> String {
    let columns = table
        .columns
        .iter()
        .map(render_column_definition)
        .collect::<Vec<_>>()
        .join(", ");
    let mut text = format!(
        "CREATE TABLE {} ({}) PRIMARY KEY {}",
        table.name, columns, table.primary_key
    );
    if let Some(interleave) = &table.interleave {
        text.push_str(&format!(", INTERLEAVE IN PARENT {}", interleave.parent));
        if interleave.on_delete != OnDeleteAction::NoAction {
            text.push(' ');
            text.push_str(interleave.on_delete.canonical_text());
        }
    }
    text
}
