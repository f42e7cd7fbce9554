//! The canonical schema model (§3). Every object is immutable once produced by
//! [`crate::extract`]; downstream components (the Difference Analyzer, the Column
//! Diff Engine, the Plan Generator) only ever read it.

use std::collections::BTreeMap;

/// An option map as it appears in `SET OPTIONS (...)` / column `OPTIONS (...)`
/// clauses: key to a verbatim (already quoted/typed) value literal.
pub type OptionMap = BTreeMap<String, String>;

/// The root of a (possibly array-wrapped) column type, per §9's "recursive
/// variant (scalar | ARRAY-of | ...)" note. `Other` covers STRUCT and any
/// PG-prefixed type, which are always treated as opaque for compatibility
/// purposes (§9 open question).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootType {
    Bool,
    Int64,
    Float32,
    Float64,
    String,
    Bytes,
    Date,
    Timestamp,
    Numeric,
    Json,
    TokenList,
    Other(String),
}

impl RootType {
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Bool => "BOOL",
            Self::Int64 => "INT64",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::String => "STRING",
            Self::Bytes => "BYTES",
            Self::Date => "DATE",
            Self::Timestamp => "TIMESTAMP",
            Self::Numeric => "NUMERIC",
            Self::Json => "JSON",
            Self::TokenList => "TOKENLIST",
            Self::Other(name) => name,
        }
    }
}

/// The length argument of a parameterized type (`STRING(256)`, `BYTES(MAX)`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Length {
    Max,
    Value(u64),
}

/// A column type decomposed into root type, array nesting depth, and length
/// argument — the shape the type-change compatibility rule (§4.4.1 rule 1)
/// inspects instead of comparing canonical strings directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTree {
    pub root: RootType,
    pub array_depth: u32,
    pub length: Option<Length>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// e.g. `STRING(256)`, `ARRAY<BYTES(MAX)>`, `INT64`.
    pub canonical_type: String,
    pub type_tree: TypeTree,
    pub not_null: bool,
    pub default: Option<String>,
    pub generated: Option<String>,
    pub options: OptionMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnDeleteAction {
    NoAction,
    CascadeDelete,
}

impl OnDeleteAction {
    #[must_use]
    pub fn canonical_text(self) -> &'static str {
        match self {
            Self::NoAction => "ON DELETE NO ACTION",
            Self::CascadeDelete => "ON DELETE CASCADE",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interleave {
    pub parent: String,
    pub on_delete: OnDeleteAction,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    /// Insertion-ordered: declaration order in the `CREATE TABLE` statement.
    pub columns: Vec<Column>,
    /// Canonicalized text, e.g. `(id)` or `(a, b DESC)`.
    pub primary_key: String,
    pub interleave: Option<Interleave>,
}

impl Table {
    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.name == name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintBody {
    Check(String),
    ForeignKey(String),
}

impl ConstraintBody {
    #[must_use]
    pub fn canonical_text(&self, name: &str) -> String {
        match self {
            Self::Check(expr) => format!("CONSTRAINT {name} CHECK ({expr})"),
            Self::ForeignKey(clause) => format!("CONSTRAINT {name} FOREIGN KEY {clause}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    pub name: String,
    pub table: String,
    pub body: ConstraintBody,
}

impl Constraint {
    #[must_use]
    pub fn canonical_text(&self) -> String {
        format!("{}: {}", self.table, self.body.canonical_text(&self.name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Index {
    pub name: String,
    /// The full `CREATE INDEX ...` statement, used both as the diff identity
    /// and verbatim as the statement to emit on create/recreate.
    pub canonical_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowDeletionPolicy {
    pub table: String,
    /// e.g. `ROW DELETION POLICY (OLDER_THAN(ts, INTERVAL 7 DAY))`.
    pub canonical_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStream {
    pub name: String,
    pub for_clause: String,
    pub options_clause: String,
    pub canonical_text: String,
}

/// The canonical in-memory schema (§3). Produced once by [`crate::extract`] and
/// read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    /// Insertion-ordered: creation order in the source DDL.
    pub tables: Vec<Table>,
    pub indexes: BTreeMap<String, Index>,
    pub constraints: BTreeMap<String, Constraint>,
    /// Keyed by owning table name; at most one per table.
    pub ttls: BTreeMap<String, RowDeletionPolicy>,
    pub change_streams: BTreeMap<String, ChangeStream>,
    pub database_options: OptionMap,
    /// The database name discovered from `ALTER DATABASE` statements in this
    /// input alone, if any (§4.2).
    pub database_name: Option<String>,
}

impl Schema {
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.name == name)
    }
}
