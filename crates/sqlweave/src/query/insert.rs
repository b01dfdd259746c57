//! INSERT statement builder.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::QueryConfig;
use crate::dialect::{Dialect, default_dialect};
use crate::error::{BuildError, BuildResult};
use crate::schema::Schema;

use super::column::ALL_COLUMNS;
use super::traits::Statement;
use super::variable::VariableFormat;

/// Columns a mutation assigns.
#[derive(Debug, Clone)]
pub(crate) enum Assign {
    /// The schema's insert or update columns.
    All,
    /// An explicit list, filtered against the schema.
    Only(Vec<String>),
}

impl Assign {
    pub(crate) fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() || names.iter().any(|n| n == ALL_COLUMNS) {
            Assign::All
        } else {
            Assign::Only(names)
        }
    }
}

pub(crate) fn write_placeholder(
    out: &mut String,
    dialect: &dyn Dialect,
    format: VariableFormat,
    column: &str,
) {
    match format {
        VariableFormat::Positional => out.push_str(dialect.placeholder()),
        VariableFormat::Named => {
            out.push(':');
            out.push_str(column);
        }
    }
}

/// INSERT statement builder.
///
/// Placeholders are named after their column (`:fullName`) unless
/// [`VariableFormat::Positional`] is requested.
#[derive(Clone, Debug)]
pub struct InsertBuilder {
    schema: Schema,
    columns: Assign,
    format: VariableFormat,
    returning: bool,
    dialect: Arc<dyn Dialect>,
}

impl InsertBuilder {
    /// Insert every insertable column of `schema`.
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema: schema.clone(),
            columns: Assign::All,
            format: VariableFormat::Named,
            returning: false,
            dialect: default_dialect(),
        }
    }

    /// Insert only `names`; unknown names are ignored, `"*"` means all.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Assign::from_names(names);
        self
    }

    /// Placeholder style.
    pub fn variable_format(mut self, format: VariableFormat) -> Self {
        self.format = format;
        self
    }

    /// Append `RETURNING "pk"` on dialects that support it.
    pub fn returning_primary_key(mut self) -> Self {
        self.returning = true;
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

    fn build_insert_sql(&self) -> BuildResult<String> {
        let columns = match &self.columns {
            Assign::All => self.schema.insert_columns(),
            Assign::Only(names) => self.schema.filter(names),
        };
        if columns.is_empty() {
            return Err(BuildError::NoAssignableColumns {
                statement: "insert",
                table: self.schema.table_name().to_string(),
            });
        }

        let dialect = self.dialect.as_ref();
        let mut sql = String::from("INSERT INTO ");
        dialect.write_identifier(&mut sql, self.schema.table_name());
        sql.push('(');
        for (i, c) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            dialect.write_identifier(&mut sql, c);
        }
        sql.push_str(") VALUES (");
        for (i, c) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            write_placeholder(&mut sql, dialect, self.format, c);
        }
        sql.push(')');

        if self.returning {
            if dialect.supports_returning() {
                sql.push_str(" RETURNING ");
                dialect.write_identifier(&mut sql, self.schema.primary_key());
            } else {
                trace!(dialect = dialect.name(), "RETURNING not supported, omitted");
            }
        }
        Ok(sql)
    }
}

impl Statement for InsertBuilder {
    const KIND: &'static str = "insert";

    fn build(&self) -> BuildResult<String> {
        let sql = self.build_insert_sql()?;
        debug!(sql = %sql, "built insert statement");
        Ok(sql)
    }
}

/// Start an INSERT into `schema`.
pub fn insert(schema: &Schema) -> InsertBuilder {
    InsertBuilder::new(schema)
}
