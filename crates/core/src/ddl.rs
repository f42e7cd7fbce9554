//! The consumed parser interface (§6): the shape of the abstract syntax tree
//! the core expects an external parser to hand it, and the trait a parser
//! implementation must provide. The core never parses DDL text itself.

use crate::model::{ChangeStream, Column, ConstraintBody, Index, OnDeleteAction, OptionMap};

/// A constraint as produced by the parser, before the Extractor has decided
/// whether it is anonymous (fatal) or promotable into [`crate::Schema::constraints`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConstraint {
    pub name: Option<String>,
    pub body: ConstraintBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedInterleave {
    pub parent: String,
    pub on_delete: OnDeleteAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    pub name: String,
    pub columns: Vec<Column>,
    pub primary_key: String,
    pub interleave: Option<ParsedInterleave>,
    pub constraints: Vec<ParsedConstraint>,
    /// Canonical text of the inline row-deletion-policy clause, table name excluded.
    pub row_deletion_policy: Option<String>,
}

/// The only `ALTER TABLE` shapes the Extractor understands (§4.2). Any other
/// child is represented as `Unsupported` so the Extractor can raise a fatal
/// *unsupported-statement* error with the offending description attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlterTableAction {
    AddConstraint(ParsedConstraint),
    AddRowDeletionPolicy(String),
    Unsupported(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlterTableStatement {
    pub table: String,
    pub action: AlterTableAction,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AlterDatabaseStatement {
    pub database: Option<String>,
    pub options: OptionMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateChangeStreamStatement {
    pub name: String,
    pub for_clause: String,
    pub options_clause: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementKind {
    CreateTable(CreateTableStatement),
    CreateIndex(Index),
    AlterTable(AlterTableStatement),
    AlterDatabase(AlterDatabaseStatement),
    CreateChangeStream(CreateChangeStreamStatement),
}

impl StatementKind {
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::CreateTable(_) => "create-table",
            Self::CreateIndex(_) => "create-index",
            Self::AlterTable(_) => "alter-table",
            Self::AlterDatabase(_) => "alter-database",
            Self::CreateChangeStream(_) => "create-change-stream",
        }
    }
}

/// One parsed DDL statement: a kind tag, its structured sub-nodes, and the
/// trimmed source fragment it came from (used for error messages).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub kind: StatementKind,
    pub source_fragment: String,
}

impl Statement {
    #[must_use]
    pub fn new(kind: StatementKind, source_fragment: impl Into<String>) -> Self {
        Self {
            kind,
            source_fragment: source_fragment.into(),
        }
    }
}

impl ChangeStream {
    #[must_use]
    pub fn from_parsed(name: String, for_clause: String, options_clause: String) -> Self {
        let canonical_text = render_change_stream(&name, &for_clause, &options_clause);
        Self {
            name,
            for_clause,
            options_clause,
            canonical_text,
        }
    }
}

fn render_change_stream(name: &str, for_clause: &str, options_clause: &str) -> String {
    let mut text = format!("CREATE CHANGE STREAM {name} FOR {for_clause}");
    if !options_clause.is_empty() {
        text.push_str(" OPTIONS (");
        text.push_str(options_clause);
        text.push(')');
    }
    text
}

/// The parser interface the core consumes (§6): `parse_ddl(text) -> [Statement]`.
///
/// Comments beginning with `--` through end-of-line must already be stripped and
/// statements already split on top-level `;` by the time an implementation is
/// handed a fragment to convert — or an implementation may perform that
/// splitting itself inside `parse_ddl` and return the full statement list for
/// the whole input, whichever is more natural for the parser. Either way, the
/// contract `parse_ddl(text) -> Vec<Statement>` is what the core depends on.
pub trait DdlParser {
    fn parse_ddl(&self, ddl: &str) -> crate::Result<Vec<Statement>>;
}
