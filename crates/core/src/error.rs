use thiserror::Error;

/// Unified error type returned by every public entry point in this crate.
///
/// Mirrors the layered shape of the diff pipeline: a parse failure belongs to the
/// (external) parser, extraction failures belong to folding statements into a
/// [`crate::Schema`], and plan failures belong to comparing two schemas under a
/// [`crate::DiffPolicy`].
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
    #[error(transparent)]
    Plan(#[from] PlanError),
}

/// Raised by a [`crate::ddl::DdlParser`] implementation when a fragment cannot be
/// converted into a [`crate::ddl::Statement`]. The core crate never constructs this
/// variant itself; it exists so the parser crate and the core crate share one error type.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to parse DDL fragment `{fragment}`: {message}")]
    InvalidFragment { fragment: String, message: String },
}

/// Raised while folding a statement list into a [`crate::Schema`].
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("unsupported statement: {statement}")]
    UnsupportedStatement { statement: String },

    #[error("constraint on `{table}` has no explicit name: {body}")]
    AnonymousConstraint { table: String, body: String },

    #[error("input declares conflicting database names: `{first}` and `{second}`")]
    ConflictingDatabaseName { first: String, second: String },

    #[error("duplicate {kind} name `{name}`")]
    DuplicateName { kind: &'static str, name: String },
}

/// Which recreate-gated category a [`PlanError::RecreateNotPermitted`] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecreateKind {
    Index,
    Constraint,
}

impl std::fmt::Display for RecreateKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Index => write!(f, "index"),
            Self::Constraint => write!(f, "constraint"),
        }
    }
}

/// Raised while comparing two schemas and generating an ordered migration plan.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("original and new schemas declare conflicting database names: `{original}` vs `{new}`")]
    ConflictingDatabaseName { original: String, new: String },

    #[error(
        "database options changed but no ALTER DATABASE statement supplied a database name"
    )]
    MissingDatabaseName,

    #[error("recreate not permitted for modified {kind}(s): {names:?}")]
    RecreateNotPermitted {
        kind: RecreateKind,
        names: Vec<String>,
    },

    #[error("table `{table}`: interleave clause changed from {before} to {after}")]
    IncompatibleInterleaveChange {
        table: String,
        before: String,
        after: String,
    },

    #[error("table `{table}`: primary key changed from `{before}` to `{after}`")]
    IncompatiblePrimaryKeyChange {
        table: String,
        before: String,
        after: String,
    },

    #[error(
        "column `{table}.{column}`: type change from `{before}` to `{after}` is not in-place alterable"
    )]
    IncompatibleTypeChange {
        table: String,
        column: String,
        before: String,
        after: String,
    },

    #[error("column `{table}.{column}`: generation clause changed")]
    IncompatibleGenerationChange { table: String, column: String },
}

pub type Result<T> = std::result::Result<T, Error>;
