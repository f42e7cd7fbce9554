use std::collections::BTreeMap;

use spandiff_core::{
    Column, DiffPolicy, Index, Interleave, Length, OnDeleteAction, RootType, Schema, Table,
    TypeTree,
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

fn string_column(name: &str, length: u64) -> Column {
    Column {
        name: name.to_string(),
        canonical_type: format!("STRING({length})"),
        type_tree: TypeTree {
            root: RootType::String,
            array_depth: 0,
            length: Some(Length::Value(length)),
        },
        not_null: false,
        default: None,
        generated: None,
        options: BTreeMap::new(),
    }
}

fn table(name: &str, columns: Vec<Column>) -> Table {
    Table {
        name: name.to_string(),
        columns,
        primary_key: "(id)".to_string(),
        interleave: None,
    }
}

fn schema(tables: Vec<Table>) -> Schema {
    Schema {
        tables,
        ..Schema::default()
    }
}

#[test]
fn diffing_a_schema_against_itself_is_empty() {
    let s = schema(vec![table("T", vec![int64_column("id"), string_column("name", 100)])]);
    let result = spandiff_core::plan(&s, &s, &DiffPolicy::default()).unwrap();
    assert!(result.is_empty());
}

#[test]
fn scenario_1_added_column() {
    let original = schema(vec![table("T", vec![int64_column("id")])]);
    let new = schema(vec![table(
        "T",
        vec![int64_column("id"), string_column("name", 100)],
    )]);
    let result = spandiff_core::plan(&original, &new, &DiffPolicy::default()).unwrap();
    assert_eq!(result, vec!["ALTER TABLE T ADD COLUMN name STRING(100)".to_string()]);
}

#[test]
fn scenario_2_compatible_length_change() {
    let original = schema(vec![table(
        "T",
        vec![int64_column("id"), string_column("name", 100)],
    )]);
    let new = schema(vec![table(
        "T",
        vec![int64_column("id"), string_column("name", 200)],
    )]);
    let result = spandiff_core::plan(&original, &new, &DiffPolicy::default()).unwrap();
    assert_eq!(
        result,
        vec!["ALTER TABLE T ALTER COLUMN name STRING(200)".to_string()]
    );
}

#[test]
fn scenario_2_incompatible_type_change_is_fatal() {
    let original = schema(vec![table(
        "T",
        vec![int64_column("id"), string_column("name", 100)],
    )]);
    let new = schema(vec![table(
        "T",
        vec![int64_column("id"), int64_column("name")],
    )]);
    let result = spandiff_core::plan(&original, &new, &DiffPolicy::default());
    assert!(result.is_err());
}

#[test]
fn scenario_3_recreate_index_pair_is_ordered() {
    let mut original = Schema::default();
    original.indexes.insert(
        "I".to_string(),
        Index {
            name: "I".to_string(),
            canonical_text: "CREATE INDEX I ON T(x)".to_string(),
        },
    );
    let mut new = Schema::default();
    new.indexes.insert(
        "I".to_string(),
        Index {
            name: "I".to_string(),
            canonical_text: "CREATE INDEX I ON T(y)".to_string(),
        },
    );
    let policy = DiffPolicy::new(true, false, false);
    let result = spandiff_core::plan(&original, &new, &policy).unwrap();
    assert_eq!(
        result,
        vec![
            "DROP INDEX I".to_string(),
            "CREATE INDEX I ON T(y)".to_string(),
        ]
    );
}

#[test]
fn scenario_3_recreate_without_flag_is_fatal() {
    let mut original = Schema::default();
    original.indexes.insert(
        "I".to_string(),
        Index {
            name: "I".to_string(),
            canonical_text: "CREATE INDEX I ON T(x)".to_string(),
        },
    );
    let mut new = Schema::default();
    new.indexes.insert(
        "I".to_string(),
        Index {
            name: "I".to_string(),
            canonical_text: "CREATE INDEX I ON T(y)".to_string(),
        },
    );
    let result = spandiff_core::plan(&original, &new, &DiffPolicy::default());
    assert!(result.is_err());
}

#[test]
fn scenario_4_database_options_added() {
    let original = Schema::default();
    let mut new = Schema::default();
    new.database_name = Some("D".to_string());
    new.database_options
        .insert("version_retention_period".to_string(), "'7d'".to_string());
    let result = spandiff_core::plan(&original, &new, &DiffPolicy::default()).unwrap();
    assert_eq!(
        result,
        vec!["ALTER DATABASE D SET OPTIONS (version_retention_period='7d')".to_string()]
    );
}

#[test]
fn scenario_5_conflicting_database_name_is_fatal() {
    let mut original = Schema::default();
    original.database_name = Some("A".to_string());
    original
        .database_options
        .insert("x".to_string(), "'1'".to_string());
    let mut new = Schema::default();
    new.database_name = Some("B".to_string());
    new.database_options.insert("x".to_string(), "'2'".to_string());
    let result = spandiff_core::plan(&original, &new, &DiffPolicy::default());
    assert!(result.is_err());
}

#[test]
fn scenario_6_interleaved_tables_drop_child_before_parent() {
    let parent = table("P", vec![int64_column("id")]);
    let mut child = table("C", vec![int64_column("id")]);
    child.interleave = Some(Interleave {
        parent: "P".to_string(),
        on_delete: OnDeleteAction::NoAction,
    });
    let original = schema(vec![parent, child]);
    let new = Schema::default();
    let policy = DiffPolicy::new(false, false, true);
    let result = spandiff_core::plan(&original, &new, &policy).unwrap();
    assert_eq!(
        result,
        vec!["DROP TABLE C".to_string(), "DROP TABLE P".to_string()]
    );
}

#[test]
fn creation_ordering_follows_new_side_order() {
    let original = Schema::default();
    let parent = table("P", vec![int64_column("id")]);
    let mut child = table("C", vec![int64_column("id")]);
    child.interleave = Some(Interleave {
        parent: "P".to_string(),
        on_delete: OnDeleteAction::NoAction,
    });
    let new = schema(vec![parent, child]);
    let result = spandiff_core::plan(&original, &new, &DiffPolicy::default()).unwrap();
    assert_eq!(result.len(), 2);
    assert!(result[0].starts_with("CREATE TABLE P"));
    assert!(result[1].starts_with("CREATE TABLE C"));
}

#[test]
fn policy_gating_suppresses_drops_but_not_recreates() {
    let mut original = Schema::default();
    original.indexes.insert(
        "I".to_string(),
        Index {
            name: "I".to_string(),
            canonical_text: "CREATE INDEX I ON T(x)".to_string(),
        },
    );
    original.tables.push(table("Gone", vec![int64_column("id")]));

    let mut new = Schema::default();
    new.indexes.insert(
        "I".to_string(),
        Index {
            name: "I".to_string(),
            canonical_text: "CREATE INDEX I ON T(y)".to_string(),
        },
    );

    let policy = DiffPolicy::new(true, false, false);
    let result = spandiff_core::plan(&original, &new, &policy).unwrap();

    assert!(!result.iter().any(|stmt| stmt.starts_with("DROP TABLE")));
    assert!(result.contains(&"DROP INDEX I".to_string()));
    assert!(result.contains(&"CREATE INDEX I ON T(y)".to_string()));
}
