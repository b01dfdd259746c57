//! DELETE statement builder.

use std::sync::Arc;

use tracing::debug;

use crate::config::QueryConfig;
use crate::dialect::{Dialect, default_dialect};
use crate::error::BuildResult;
use crate::schema::Schema;

use super::predicate::Predicate;
use super::traits::Statement;
use super::update::write_mutation_where;
use super::variable::VariableFormat;

/// DELETE statement builder.
///
/// Without a condition the row is matched by primary key, so a DELETE never
/// targets the whole table.
#[derive(Clone, Debug)]
pub struct DeleteBuilder {
    schema: Schema,
    filter: Option<Predicate>,
    format: VariableFormat,
    dialect: Arc<dyn Dialect>,
}

impl DeleteBuilder {
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema: schema.clone(),
            filter: None,
            format: VariableFormat::Positional,
            dialect: default_dialect(),
        }
    }

    /// Condition selecting the rows to delete. Under named style BETWEEN and IN
    /// bind `:column_0`, `:column_1` and so on.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    pub fn variable_format(mut self, format: VariableFormat) -> Self {
        self.format = format;
        self
    }

    pub fn dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    /// Apply a [`QueryConfig`].
    pub fn config(mut self, config: &QueryConfig) -> Self {
        self.dialect = config.dialect.dialect();
        if let Some(format) = config.variable_format {
            self.format = format;
        }
        self
    }

    fn build_delete_sql(&self) -> BuildResult<String> {
        let dialect = self.dialect.as_ref();
        let mut sql = String::from("DELETE FROM ");
        dialect.write_identifier(&mut sql, self.schema.table_name());
        write_mutation_where(&mut sql, dialect, self.filter.as_ref(), &self.schema, self.format)?;
        Ok(sql)
    }
}

impl Statement for DeleteBuilder {
    const KIND: &'static str = "delete";

    fn build(&self) -> BuildResult<String> {
        let sql = self.build_delete_sql()?;
        debug!(sql = %sql, "built delete statement");
        Ok(sql)
    }
}

/// Start a DELETE from `schema`.
pub fn delete(schema: &Schema) -> DeleteBuilder {
    DeleteBuilder::new(schema)
}
