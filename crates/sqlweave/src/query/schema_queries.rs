//! Canned statements for one table.

use crate::config::QueryConfig;
use crate::error::BuildResult;
use crate::schema::Schema;

use super::column::{ALL_COLUMNS, col, count};
use super::delete::DeleteBuilder;
use super::insert::InsertBuilder;
use super::predicate::Predicate;
use super::select::SelectBuilder;
use super::traits::Statement;
use super::update::UpdateBuilder;

/// Ready-made statements over a single schema.
///
/// ```ignore
/// let q = SchemaQueries::new(&person);
/// assert_eq!(
///     q.delete()?,
///     r#"DELETE FROM "Person" WHERE "id" = ?"#,
/// );
/// ```
#[derive(Debug, Clone)]
pub struct SchemaQueries {
    schema: Schema,
    config: QueryConfig,
}

impl SchemaQueries {
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema: schema.clone(),
            config: QueryConfig::default(),
        }
    }

    /// Build with `config` instead of the defaults.
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// `SELECT <all columns> FROM "T" WHERE "T"."pk" = ?`
    pub fn find_by_pk(&self) -> BuildResult<String> {
        SelectBuilder::new()
            .config(&self.config)
            .field(col(ALL_COLUMNS))
            .from(&self.schema)
            .filter(Predicate::eq(col(self.schema.primary_key())))
            .build()
    }

    /// INSERT of every insertable column.
    pub fn insert(&self) -> BuildResult<String> {
        InsertBuilder::new(&self.schema).config(&self.config).build()
    }

    /// UPDATE of every non-key column, matched by primary key.
    pub fn update(&self) -> BuildResult<String> {
        UpdateBuilder::new(&self.schema)
            .config(&self.config)
            .filter(Predicate::eq(col(self.schema.primary_key())))
            .build()
    }

    /// DELETE matched by primary key.
    pub fn delete(&self) -> BuildResult<String> {
        DeleteBuilder::new(&self.schema)
            .config(&self.config)
            .filter(Predicate::eq(col(self.schema.primary_key())))
            .build()
    }

    /// `SELECT COUNT("T"."pk") AS "count" FROM "T" [WHERE ...]`
    pub fn count(&self, filter: Option<Predicate>) -> BuildResult<String> {
        let mut q = SelectBuilder::new()
            .config(&self.config)
            .field(count(self.schema.primary_key()).alias("count"))
            .from(&self.schema);
        if let Some(filter) = filter {
            q = q.filter(filter);
        }
        q.build()
    }

    /// `SELECT COUNT("T"."pk") > 0 AS "isExists" FROM "T" [WHERE ...]`
    pub fn is_exists(&self, filter: Option<Predicate>) -> BuildResult<String> {
        let exists = Predicate::gt(count(self.schema.primary_key()))
            .var(0i64)
            .alias("isExists");
        let mut q = SelectBuilder::new()
            .config(&self.config)
            .field(exists)
            .from(&self.schema);
        if let Some(filter) = filter {
            q = q.filter(filter);
        }
        q.build()
    }
}
