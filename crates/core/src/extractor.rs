//! The Schema Extractor (§4.2): folds a parsed statement list into one
//! canonical [`Schema`], promoting inline constraints and row-deletion
//! policies into their own top-level maps along the way.

use std::collections::btree_map::Entry;

use crate::ddl::{AlterTableAction, ParsedConstraint, Statement, StatementKind};
use crate::error::ExtractError;
use crate::model::{ChangeStream, Constraint, ConstraintBody, Interleave, RowDeletionPolicy, Schema, Table};
use crate::Result;

/// Folds `statements` into a canonical [`Schema`]. Fatal on any unsupported
/// statement, anonymous constraint, conflicting database name, or duplicate
/// name within a single input (§4.2).
pub fn extract(statements: &[Statement]) -> Result<Schema> {
    let mut schema = Schema::default();

    for statement in statements {
        match &statement.kind {
            StatementKind::CreateTable(create) => {
                if schema.table(&create.name).is_some() {
                    return Err(ExtractError::DuplicateName {
                        kind: "table",
                        name: create.name.clone(),
                    }
                    .into());
                }

                let interleave = create
                    .interleave
                    .as_ref()
                    .map(|interleave| Interleave {
                        parent: interleave.parent.clone(),
                        on_delete: interleave.on_delete,
                    });

                schema.tables.push(Table {
                    name: create.name.clone(),
                    columns: create.columns.clone(),
                    primary_key: create.primary_key.clone(),
                    interleave,
                });

                for constraint in &create.constraints {
                    insert_constraint(&mut schema, &create.name, constraint)?;
                }

                if let Some(clause) = &create.row_deletion_policy {
                    insert_ttl(&mut schema, &create.name, clause.clone())?;
                }
            }

            StatementKind::CreateIndex(index) => match schema.indexes.entry(index.name.clone()) {
                Entry::Vacant(entry) => {
                    entry.insert(index.clone());
                }
                Entry::Occupied(_) => {
                    return Err(ExtractError::DuplicateName {
                        kind: "index",
                        name: index.name.clone(),
                    }
                    .into());
                }
            },

            StatementKind::AlterTable(alter) => match &alter.action {
                AlterTableAction::AddConstraint(constraint) => {
                    insert_constraint(&mut schema, &alter.table, constraint)?;
                }
                AlterTableAction::AddRowDeletionPolicy(clause) => {
                    insert_ttl(&mut schema, &alter.table, clause.clone())?;
                }
                AlterTableAction::Unsupported(description) => {
                    return Err(ExtractError::UnsupportedStatement {
                        statement: description.clone(),
                    }
                    .into());
                }
            },

            StatementKind::AlterDatabase(alter) => {
                if let Some(name) = &alter.database {
                    match &schema.database_name {
                        Some(existing) if existing != name => {
                            return Err(ExtractError::ConflictingDatabaseName {
                                first: existing.clone(),
                                second: name.clone(),
                            }
                            .into());
                        }
                        _ => schema.database_name = Some(name.clone()),
                    }
                }
                for (key, value) in &alter.options {
                    schema.database_options.insert(key.clone(), value.clone());
                }
            }

            StatementKind::CreateChangeStream(change_stream) => {
                let built = ChangeStream::from_parsed(
                    change_stream.name.clone(),
                    change_stream.for_clause.clone(),
                    change_stream.options_clause.clone(),
                );
                match schema.change_streams.entry(built.name.clone()) {
                    Entry::Vacant(entry) => {
                        entry.insert(built);
                    }
                    Entry::Occupied(_) => {
                        return Err(ExtractError::DuplicateName {
                            kind: "change stream",
                            name: built.name,
                        }
                        .into());
                    }
                }
            }
        }
    }

    Ok(schema)
}

fn insert_constraint(schema: &mut Schema, table: &str, constraint: &ParsedConstraint) -> Result<()> {
    let Some(name) = &constraint.name else {
        return Err(ExtractError::AnonymousConstraint {
            table: table.to_string(),
            body: describe_constraint_body(&constraint.body),
        }
        .into());
    };

    match schema.constraints.entry(name.clone()) {
        Entry::Vacant(entry) => {
            entry.insert(Constraint {
                name: name.clone(),
                table: table.to_string(),
                body: constraint.body.clone(),
            });
            Ok(())
        }
        Entry::Occupied(_) => Err(ExtractError::DuplicateName {
            kind: "constraint",
            name: name.clone(),
        }
        .into()),
    }
}

fn insert_ttl(schema: &mut Schema, table: &str, canonical_text: String) -> Result<()> {
    match schema.ttls.entry(table.to_string()) {
        Entry::Vacant(entry) => {
            entry.insert(RowDeletionPolicy {
                table: table.to_string(),
                canonical_text,
            });
            Ok(())
        }
        Entry::Occupied(_) => Err(ExtractError::DuplicateName {
            kind: "row deletion policy",
            name: table.to_string(),
        }
        .into()),
    }
}

fn describe_constraint_body(body: &ConstraintBody) -> String {
    match body {
        ConstraintBody::Check(expr) => format!("CHECK ({expr})"),
        ConstraintBody::ForeignKey(clause) => format!("FOREIGN KEY {clause}"),
    }
}
