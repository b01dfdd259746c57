//! # sqlweave
//!
//! Compose SQL statement text from table schemas.
//!
//! ## Features
//!
//! - **Schema-driven**: tables are described once by a [`Schema`], built by hand or
//!   from a `#[derive(Model)]` struct
//! - **Deferred references**: predicates name columns before the FROM or JOIN table is
//!   known and are resolved when the statement is built
//! - **Forgiving WHERE**: comparisons on columns the statement does not know are dropped
//! - **Strict JOIN**: an ON condition that cannot be resolved is an error
//! - **Placeholders only**: values are never interpolated, statements carry `?` or `:name`
//! - **Dialects**: Postgres (default) and MySQL quoting
//!
//! ## Statements
//!
//! ```ignore
//! use sqlweave::prelude::*;
//!
//! let person = Schema::builder()
//!     .table_name("Person")
//!     .columns(["id", "fullName", "createdAt"])
//!     .build()?;
//!
//! // SELECT "Person"."id", "Person"."fullName" FROM "Person" WHERE "Person"."fullName" = ?
//! let sql = select([col("id"), col("fullName")])
//!     .from(&person)
//!     .filter(Predicate::eq(col("fullName")))
//!     .build()?;
//!
//! // INSERT INTO "Person"("fullName", "createdAt") VALUES (:fullName, :createdAt)
//! let sql = insert(&person).build()?;
//!
//! // DELETE FROM "Person" WHERE "id" = ?
//! let sql = delete(&person).build()?;
//! ```
//!
//! ## Request filters
//!
//! The [`filter`] module turns query-string parameters into a predicate plus the
//! argument list matching its placeholders.

pub mod config;
pub mod dialect;
pub mod error;
pub mod filter;
mod ident;
pub mod prelude;
pub mod query;
pub mod schema;

pub use config::QueryConfig;
pub use dialect::{Dialect, DialectKind, MySql, Postgres};
pub use error::{BuildError, BuildResult};
pub use schema::{FieldDescriptor, Model, Schema, SchemaOptions};

pub use query::{
    ALL_COLUMNS, Column, ColumnFormat, ColumnSet, Comparison, Count, DeleteBuilder, InsertBuilder,
    JoinMethod, Logic, Lower, Operand, Operator, Predicate, SchemaQueries, SelectBuilder,
    SelectField, SortDir, Statement, UpdateBuilder, Variable, VariableFormat, col, columns, count,
    delete, from_columns, insert, lower, on, select, select_from, update,
};

#[cfg(feature = "derive")]
pub use sqlweave_derive::Model;
