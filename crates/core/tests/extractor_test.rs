use std::collections::BTreeMap;

use spandiff_core::{
    AlterDatabaseStatement, AlterTableAction, AlterTableStatement, Column, ConstraintBody,
    CreateTableStatement, Length, ParsedConstraint, RootType, Statement, StatementKind, TypeTree,
};

fn int64_column(name: &str) -> Column {
    Column {
        name: name.to_string(),
        canonical_type: "INT64".to_string(),
        type_tree: TypeTree {
            root: RootType::Int64,
            array_depth: 0,
            length: None,
        },
        not_null: false,
        default: None,
        generated: None,
        options: BTreeMap::new(),
    }
}

fn create_table(name: &str, constraints: Vec<ParsedConstraint>) -> Statement {
    Statement::new(
        StatementKind::CreateTable(CreateTableStatement {
            name: name.to_string(),
            columns: vec![int64_column("id")],
            primary_key: "(id)".to_string(),
            interleave: None,
            constraints,
            row_deletion_policy: None,
        }),
        format!("CREATE TABLE {name} (id INT64) PRIMARY KEY (id)"),
    )
}

#[test]
fn create_table_is_inserted_in_order() {
    let statements = vec![create_table("A", vec![]), create_table("B", vec![])];
    let schema = spandiff_core::extract(&statements).unwrap();
    assert_eq!(
        schema.tables.iter().map(|t| t.name.clone()).collect::<Vec<_>>(),
        vec!["A".to_string(), "B".to_string()]
    );
}

#[test]
fn inline_constraint_is_lifted_into_constraints_map() {
    let constraint = ParsedConstraint {
        name: Some("ck_positive".to_string()),
        body: ConstraintBody::Check("id > 0".to_string()),
    };
    let statements = vec![create_table("A", vec![constraint])];
    let schema = spandiff_core::extract(&statements).unwrap();
    let constraint = schema.constraints.get("ck_positive").unwrap();
    assert_eq!(constraint.table, "A");
}

#[test]
fn anonymous_inline_constraint_is_rejected() {
    let constraint = ParsedConstraint {
        name: None,
        body: ConstraintBody::Check("id > 0".to_string()),
    };
    let statements = vec![create_table("A", vec![constraint])];
    let result = spandiff_core::extract(&statements);
    assert!(result.is_err());
}

#[test]
fn duplicate_table_name_is_rejected() {
    let statements = vec![create_table("A", vec![]), create_table("A", vec![])];
    let result = spandiff_core::extract(&statements);
    assert!(result.is_err());
}

#[test]
fn unsupported_alter_table_child_is_rejected() {
    let statements = vec![Statement::new(
        StatementKind::AlterTable(AlterTableStatement {
            table: "A".to_string(),
            action: AlterTableAction::Unsupported("RENAME COLUMN a TO b".to_string()),
        }),
        "ALTER TABLE A RENAME COLUMN a TO b".to_string(),
    )];
    let result = spandiff_core::extract(&statements);
    assert!(result.is_err());
}

#[test]
fn conflicting_database_names_within_one_input_is_rejected() {
    let statements = vec![
        Statement::new(
            StatementKind::AlterDatabase(AlterDatabaseStatement {
                database: Some("A".to_string()),
                options: BTreeMap::new(),
            }),
            "ALTER DATABASE A SET OPTIONS ()".to_string(),
        ),
        Statement::new(
            StatementKind::AlterDatabase(AlterDatabaseStatement {
                database: Some("B".to_string()),
                options: BTreeMap::new(),
            }),
            "ALTER DATABASE B SET OPTIONS ()".to_string(),
        ),
    ];
    let result = spandiff_core::extract(&statements);
    assert!(result.is_err());
}

#[test]
fn database_options_merge_across_statements() {
    let mut first_options = BTreeMap::new();
    first_options.insert("a".to_string(), "'1'".to_string());
    let mut second_options = BTreeMap::new();
    second_options.insert("b".to_string(), "'2'".to_string());

    let statements = vec![
        Statement::new(
            StatementKind::AlterDatabase(AlterDatabaseStatement {
                database: Some("D".to_string()),
                options: first_options,
            }),
            "ALTER DATABASE D SET OPTIONS (a='1')".to_string(),
        ),
        Statement::new(
            StatementKind::AlterDatabase(AlterDatabaseStatement {
                database: None,
                options: second_options,
            }),
            "ALTER DATABASE D SET OPTIONS (b='2')".to_string(),
        ),
    ];
    let schema = spandiff_core::extract(&statements).unwrap();
    assert_eq!(schema.database_name, Some("D".to_string()));
    assert_eq!(schema.database_options.len(), 2);
}
