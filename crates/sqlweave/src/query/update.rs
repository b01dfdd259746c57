//! UPDATE statement builder.

use std::sync::Arc;

use tracing::debug;

use crate::config::QueryConfig;
use crate::dialect::{Dialect, default_dialect};
use crate::error::{BuildError, BuildResult};
use crate::schema::Schema;

use super::column::{ColumnFormat, TableRef};
use super::insert::{Assign, write_placeholder};
use super::predicate::{Operand, Predicate};
use super::traits::Statement;
use super::variable::{Variable, VariableFormat};

/// Rewrite a mutation condition for `schema`: columns print bare and placeholders
/// follow `format`.
///
/// Scalar comparisons get `?` or `:column`. Under named style BETWEEN binds
/// `:column_0 AND :column_1` and IN binds `(:column_0, :column_1, ...)`. Literal
/// and column right-hand sides are left alone.
pub(crate) fn rewrite_condition(
    node: &Predicate,
    schema: &Schema,
    format: VariableFormat,
) -> BuildResult<Predicate> {
    match node {
        Predicate::Logical(logic, children) => Ok(Predicate::Logical(
            *logic,
            children
                .iter()
                .map(|child| rewrite_condition(child, schema, format))
                .collect::<BuildResult<_>>()?,
        )),
        Predicate::Comparison(c) => {
            let mut c = c.clone();
            let lhs = c.operand.column().name.clone();
            let Operand::Column(column) = &mut c.operand else {
                return Err(BuildError::NotAComparison(lhs));
            };
            if !schema.is_column_exist(&column.name) {
                return Err(BuildError::column_not_in_schema(
                    schema.table_name(),
                    column.name.clone(),
                ));
            }
            column.table = TableRef::Schema(schema.clone());
            column.format = Some(ColumnFormat::Bare);
            let name = column.name.clone();

            c.variable = match c.variable.take() {
                None => None,
                Some(v @ (Variable::Int(_) | Variable::Bool(_))) => Some(v),
                Some(Variable::Column(mut other)) => {
                    if !schema.is_column_exist(&other.name) {
                        return Err(BuildError::column_not_in_schema(
                            schema.table_name(),
                            other.name.clone(),
                        ));
                    }
                    other.table = TableRef::Schema(schema.clone());
                    other.format = Some(ColumnFormat::Bare);
                    Some(Variable::Column(other))
                }
                Some(Variable::Positional | Variable::Named(_)) => Some(match format {
                    VariableFormat::Positional => Variable::Positional,
                    VariableFormat::Named => Variable::Named(name),
                }),
                Some(Variable::Range | Variable::NamedRange(_)) => Some(match format {
                    VariableFormat::Positional => Variable::Range,
                    VariableFormat::Named => Variable::NamedRange(name),
                }),
                Some(Variable::List(n) | Variable::NamedList(_, n)) => Some(match format {
                    VariableFormat::Positional => Variable::List(n),
                    VariableFormat::Named => Variable::NamedList(name, n),
                }),
            };
            Ok(Predicate::Comparison(c))
        }
    }
}

/// WHERE clause of an UPDATE or DELETE; the primary-key match when absent or empty.
pub(crate) fn write_mutation_where(
    out: &mut String,
    dialect: &dyn Dialect,
    filter: Option<&Predicate>,
    schema: &Schema,
    format: VariableFormat,
) -> BuildResult<()> {
    let mut cond = String::new();
    if let Some(filter) = filter {
        rewrite_condition(filter, schema, format)?.write(&mut cond, dialect)?;
    }
    if cond.is_empty() {
        let pk = Predicate::eq(schema.primary_key());
        rewrite_condition(&pk, schema, format)?.write(&mut cond, dialect)?;
    }
    out.push_str(" WHERE ");
    out.push_str(&cond);
    Ok(())
}

/// UPDATE statement builder.
///
/// Assigns every column but the primary key unless told otherwise, and matches
/// the row by primary key when no condition is given.
#[derive(Clone, Debug)]
pub struct UpdateBuilder {
    schema: Schema,
    columns: Assign,
    filter: Option<Predicate>,
    format: VariableFormat,
    dialect: Arc<dyn Dialect>,
}

impl UpdateBuilder {
    pub fn new(schema: &Schema) -> Self {
        Self {
            schema: schema.clone(),
            columns: Assign::All,
            filter: None,
            format: VariableFormat::Named,
            dialect: default_dialect(),
        }
    }

    /// Assign only `names`; unknown names and the primary key are ignored.
    pub fn columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Assign::from_names(names);
        self
    }

    /// Condition selecting the rows to update. Every column must belong to the
    /// updated table. Under named style BETWEEN and IN bind `:column_0`,
    /// `:column_1` and so on.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Placeholder style for assignments and conditions alike.
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

    fn build_update_sql(&self) -> BuildResult<String> {
        let pk = self.schema.primary_key();
        let columns: Vec<String> = match &self.columns {
            Assign::All => self.schema.update_columns(),
            Assign::Only(names) => self
                .schema
                .filter(names)
                .into_iter()
                .filter(|c| c != pk)
                .collect(),
        };
        if columns.is_empty() {
            return Err(BuildError::NoAssignableColumns {
                statement: "update",
                table: self.schema.table_name().to_string(),
            });
        }

        let dialect = self.dialect.as_ref();
        let mut sql = String::from("UPDATE ");
        dialect.write_identifier(&mut sql, self.schema.table_name());
        sql.push_str(" SET ");
        for (i, c) in columns.iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            dialect.write_identifier(&mut sql, c);
            sql.push_str(" = ");
            write_placeholder(&mut sql, dialect, self.format, c);
        }
        write_mutation_where(&mut sql, dialect, self.filter.as_ref(), &self.schema, self.format)?;
        Ok(sql)
    }
}

impl Statement for UpdateBuilder {
    const KIND: &'static str = "update";

    fn build(&self) -> BuildResult<String> {
        let sql = self.build_update_sql()?;
        debug!(sql = %sql, "built update statement");
        Ok(sql)
    }
}

/// Start an UPDATE of `schema`.
pub fn update(schema: &Schema) -> UpdateBuilder {
    UpdateBuilder::new(schema)
}
