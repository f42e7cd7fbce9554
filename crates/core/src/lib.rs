//! Canonical schema model, structural diff, and ordered migration-plan
//! generation for Cloud Spanner DDL.
//!
//! The crate is a pure function of its inputs (§5): two DDL strings, a
//! [`DdlParser`] implementation, and a [`DiffPolicy`]. It performs no I/O and
//! holds no state across calls.

pub mod ddl;
pub mod diff;
mod error;
mod extractor;
mod model;
mod options;
mod plan;
mod policy;

pub use ddl::{
    AlterDatabaseStatement, AlterTableAction, AlterTableStatement, CreateChangeStreamStatement,
    CreateTableStatement, DdlParser, ParsedConstraint, ParsedInterleave, Statement, StatementKind,
};
pub use diff::{analyze, diff_table, MapDifference, SchemaDifference, TableDifference};
pub use error::{Error, ExtractError, ParseError, PlanError, RecreateKind, Result};
pub use extractor::extract;
pub use model::{
    ChangeStream, Column, Constraint, ConstraintBody, Index, Interleave, Length, OnDeleteAction,
    OptionMap, RootType, RowDeletionPolicy, Schema, Table, TypeTree,
};
pub use options::diff_options;
pub use plan::plan;
pub use policy::DiffPolicy;

/// Parses both inputs with `parser`, extracts a [`Schema`] from each, and
/// generates the ordered migration statement list (§2's full data flow).
pub fn generate_migration(
    original_ddl: &str,
    new_ddl: &str,
    parser: &dyn DdlParser,
    policy: &DiffPolicy,
) -> Result<Vec<String>> {
    let original_schema = extract(&parser.parse_ddl(original_ddl)?)?;
    let new_schema = extract(&parser.parse_ddl(new_ddl)?)?;
    plan(&original_schema, &new_schema, policy)
}
