//! Convenient imports for typical `sqlweave` usage.
//!
//! ```ignore
//! use sqlweave::prelude::*;
//! ```

pub use crate::{BuildError, BuildResult, QueryConfig, Schema, SchemaOptions};
pub use crate::{DialectKind, MySql, Postgres};
pub use crate::{JoinMethod, Predicate, SortDir, Statement, VariableFormat};
pub use crate::{col, columns, count, delete, insert, lower, on, select, select_from, update};
pub use crate::SchemaQueries;

pub use crate::Model;
