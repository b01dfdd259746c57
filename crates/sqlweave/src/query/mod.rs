//! Statement builders.
//!
//! Columns, conditions and select fields are plain values that can be assembled
//! before the statement knows its tables. A column created with [`col`] binds to the
//! FROM table when the statement is built; one created with [`on`] binds to the
//! table of its JOIN. Building never alters the inputs, so one condition can be
//! reused across statements with different tables.
//!
//! # Usage
//!
//! ```ignore
//! use sqlweave::query::*;
//!
//! // SELECT "Person"."id", "Person"."fullName" FROM "Person"
//! //   WHERE "Person"."fullName" LIKE ? ORDER BY "Person"."createdAt" DESC LIMIT 10
//! let sql = select([col("id"), col("fullName")])
//!     .from(&person)
//!     .filter(Predicate::like(col("fullName")))
//!     .order_by(col("createdAt"), SortDir::Desc)
//!     .limit(10)
//!     .build()?;
//!
//! // INSERT INTO "Person"("createdAt", "fullName") VALUES (:createdAt, :fullName)
//! let sql = insert(&person).build()?;
//!
//! // UPDATE "Person" SET "fullName" = :fullName WHERE "id" = :id
//! let sql = update(&person).columns(["fullName"]).build()?;
//!
//! // DELETE FROM "Person" WHERE "id" = ?
//! let sql = delete(&person).build()?;
//! ```

mod column;
mod delete;
mod insert;
mod predicate;
mod resolve;
mod schema_queries;
mod select;
mod traits;
mod update;
mod variable;

pub use column::{
    ALL_COLUMNS, Column, ColumnFormat, ColumnSet, Count, Lower, SelectField, col, columns, count,
    from_columns, lower, on,
};
pub use delete::{DeleteBuilder, delete};
pub use insert::{InsertBuilder, insert};
pub use predicate::{Comparison, Logic, Operand, Operator, Predicate};
pub use schema_queries::SchemaQueries;
pub use select::{JoinMethod, SelectBuilder, SortDir, select, select_from};
pub use traits::Statement;
pub use update::{UpdateBuilder, update};
pub use variable::{Variable, VariableFormat};

pub(crate) use resolve::kept_by_select_from;
