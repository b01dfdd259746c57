//! Error types for sqlweave
//!
//! Every variant of [`BuildError`] describes a construction bug: a malformed schema,
//! a JOIN condition naming a table the statement never declared, an empty IN list,
//! and so on. An `Err` is not a runtime condition to recover from or retry; fix the
//! code that assembled the statement.
//!
//! Fragments that are merely not applicable (an ORDER BY column taken from a query
//! string that the schema does not have, for example) are never reported here. They
//! are dropped from the output and logged at `trace` level.

use thiserror::Error;

/// Result type alias for statement construction.
pub type BuildResult<T> = Result<T, BuildError>;

/// Construction errors raised while declaring schemas or building statements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Schema declared without a table name.
    #[error("schema has no table name")]
    EmptyTableName,

    /// Schema declared without any column.
    #[error("schema \"{0}\" has no columns")]
    NoColumns(String),

    /// Primary key is not one of the declared columns.
    #[error("primary key \"{primary_key}\" is not defined in columns of \"{table}\"")]
    PrimaryKeyNotInColumns { table: String, primary_key: String },

    /// Same column declared twice in one schema.
    #[error("column \"{column}\" is declared more than once in \"{table}\"")]
    DuplicateColumn { table: String, column: String },

    /// More than one field of a model (flattened records included) marks the primary key.
    #[error("\"{table}\" marks more than one primary key: {columns:?}")]
    MultiplePrimaryKeys { table: String, columns: Vec<String> },

    /// Identifier that cannot be emitted safely.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),

    /// A JOIN condition references a table that is neither the joined table nor registered.
    #[error("table \"{0}\" is not declared in query builder")]
    UnknownJoinTable(String),

    /// A JOIN condition references a column its table does not declare.
    #[error("column \"{column}\" is not declared in table \"{table}\"")]
    UnknownJoinColumn { table: String, column: String },

    /// IN / NOT IN placeholder list with zero slots.
    #[error("invalid bind variable for IN query, does not have argument")]
    EmptyInList,

    /// A column that must belong to the target schema does not.
    #[error("column \"{column}\" is not defined in schema \"{table}\"")]
    ColumnNotInSchema { table: String, column: String },

    /// INSERT / UPDATE without a single assignable column.
    #[error("no column defined on {statement} table \"{table}\"")]
    NoAssignableColumns {
        statement: &'static str,
        table: String,
    },

    /// SELECT built before `from()` was called.
    #[error("select statement has no FROM table")]
    MissingFrom,

    /// UPDATE / DELETE condition that is not a plain column comparison.
    #[error("condition on \"{0}\" is not a column comparison")]
    NotAComparison(String),

    /// Join method name that is not INNER, LEFT, RIGHT or FULL.
    #[error("unrecognized join method: {0}")]
    InvalidJoinMethod(String),

    /// `*` used where a single column is required.
    #[error("all columns (*) is not supported by {0}")]
    UnsupportedAllColumns(&'static str),

    /// Every field of an explicit SELECT list was dropped.
    #[error("no field of the select list resolves against \"{0}\"")]
    NoSelectedFields(String),

    /// A JOIN whose ON condition renders to nothing.
    #[error("join on \"{0}\" has an empty condition")]
    EmptyJoinCondition(String),
}

impl BuildError {
    /// Create a column-not-in-schema error.
    pub fn column_not_in_schema(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::ColumnNotInSchema {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Create an unknown join column error.
    pub fn unknown_join_column(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self::UnknownJoinColumn {
            table: table.into(),
            column: column.into(),
        }
    }

    /// Check if this error came from schema declaration rather than statement assembly.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            Self::EmptyTableName
                | Self::NoColumns(_)
                | Self::PrimaryKeyNotInColumns { .. }
                | Self::DuplicateColumn { .. }
                | Self::MultiplePrimaryKeys { .. }
                | Self::InvalidIdentifier(_)
        )
    }
}
