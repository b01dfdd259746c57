//! SELECT statement builder.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::QueryConfig;
use crate::dialect::{Dialect, default_dialect};
use crate::error::{BuildError, BuildResult};
use crate::ident;
use crate::schema::Schema;

use super::column::{Column, ColumnFormat, Lower, SelectField, TableRef, write_column};
use super::predicate::Predicate;
use super::resolve::{
    Registered, Registry, bind_pending, filter_and_alias, resolve_deferred, resolve_join_condition,
    stamp,
};
use super::traits::Statement;

/// JOIN flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JoinMethod {
    #[default]
    Inner,
    Left,
    Right,
    Full,
}

impl JoinMethod {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinMethod::Inner => "INNER JOIN",
            JoinMethod::Left => "LEFT JOIN",
            JoinMethod::Right => "RIGHT JOIN",
            JoinMethod::Full => "FULL OUTER JOIN",
        }
    }
}

impl FromStr for JoinMethod {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INNER" | "INNER JOIN" | "JOIN" => Ok(JoinMethod::Inner),
            "LEFT" | "LEFT JOIN" => Ok(JoinMethod::Left),
            "RIGHT" | "RIGHT JOIN" => Ok(JoinMethod::Right),
            "FULL" | "FULL JOIN" | "FULL OUTER JOIN" => Ok(JoinMethod::Full),
            _ => Err(BuildError::InvalidJoinMethod(s.to_string())),
        }
    }
}

impl fmt::Display for JoinMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDir {
    #[default]
    Asc,
    Desc,
}

impl SortDir {
    pub fn as_sql(self) -> &'static str {
        match self {
            SortDir::Asc => "ASC",
            SortDir::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone)]
struct JoinClause {
    method: JoinMethod,
    table: Registered,
    on: Predicate,
}

#[derive(Debug, Clone)]
enum OrderTarget {
    Column(Column),
    Lower(Lower),
}

#[derive(Debug, Clone)]
struct OrderBy {
    target: OrderTarget,
    dir: SortDir,
}

/// SELECT statement builder.
///
/// Fields, conditions and ORDER BY columns may leave their table unspecified; they
/// bind to the FROM table when the statement is built. With a JOIN, select-list
/// columns switch to `"table"."col" AS "table.col"` so every output name stays
/// unique.
#[derive(Clone, Debug)]
pub struct SelectBuilder {
    fields: Vec<SelectField>,
    from: Option<Registered>,
    joins: Vec<JoinClause>,
    filter: Option<Predicate>,
    order_by: Vec<OrderBy>,
    limit: Option<u64>,
    offset: Option<u64>,
    dialect: Arc<dyn Dialect>,
    build_error: Option<BuildError>,
}

impl Default for SelectBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectBuilder {
    /// Empty builder; without fields every column of the FROM table is selected.
    pub fn new() -> Self {
        Self {
            fields: Vec::new(),
            from: None,
            joins: Vec::new(),
            filter: None,
            order_by: Vec::new(),
            limit: None,
            offset: None,
            dialect: default_dialect(),
            build_error: None,
        }
    }

    /// Use `dialect` for quoting.
    pub fn dialect(mut self, dialect: impl Dialect + 'static) -> Self {
        self.dialect = Arc::new(dialect);
        self
    }

    /// Apply a [`QueryConfig`].
    pub fn config(mut self, config: &QueryConfig) -> Self {
        self.dialect = config.dialect.dialect();
        self
    }

    // ==================== SELECT list ====================

    /// Append one field.
    pub fn field(mut self, field: impl Into<SelectField>) -> Self {
        self.fields.push(field.into());
        self
    }

    /// Append several fields.
    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<SelectField>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Drop every field, keeping FROM, JOIN, WHERE and paging.
    pub fn reset_fields(mut self) -> Self {
        self.fields.clear();
        self
    }

    // ==================== FROM / JOIN ====================

    /// Set the FROM table.
    pub fn from(mut self, schema: &Schema) -> Self {
        self.from = Some(Registered::new(schema.clone(), None));
        self
    }

    /// Set the FROM table under `alias`.
    pub fn from_as(mut self, schema: &Schema, alias: impl Into<String>) -> Self {
        self.from = Some(Registered::new(schema.clone(), Some(alias.into())));
        self
    }

    /// Add a JOIN. Its ON condition may use [`on`](super::column::on) for columns
    /// of `schema` and plain columns for the FROM table.
    pub fn join(mut self, method: JoinMethod, schema: &Schema, on: Predicate) -> Self {
        self.joins.push(JoinClause {
            method,
            table: Registered::new(schema.clone(), None),
            on,
        });
        self
    }

    /// Add a JOIN under `alias`.
    pub fn join_as(
        mut self,
        method: JoinMethod,
        schema: &Schema,
        alias: impl Into<String>,
        on: Predicate,
    ) -> Self {
        self.joins.push(JoinClause {
            method,
            table: Registered::new(schema.clone(), Some(alias.into())),
            on,
        });
        self
    }

    /// Add a JOIN whose method is given by name (`"inner"`, `"left"`, ...).
    ///
    /// An unrecognized name fails the build.
    pub fn join_named(self, method: &str, schema: &Schema, on: Predicate) -> Self {
        match method.parse::<JoinMethod>() {
            Ok(m) => self.join(m, schema, on),
            Err(e) => {
                let mut s = self;
                s.build_error.get_or_insert(e);
                s
            }
        }
    }

    /// Add INNER JOIN.
    pub fn inner_join(self, schema: &Schema, on: Predicate) -> Self {
        self.join(JoinMethod::Inner, schema, on)
    }

    /// Add LEFT JOIN.
    pub fn left_join(self, schema: &Schema, on: Predicate) -> Self {
        self.join(JoinMethod::Left, schema, on)
    }

    /// Add RIGHT JOIN.
    pub fn right_join(self, schema: &Schema, on: Predicate) -> Self {
        self.join(JoinMethod::Right, schema, on)
    }

    /// Add FULL OUTER JOIN.
    pub fn full_join(self, schema: &Schema, on: Predicate) -> Self {
        self.join(JoinMethod::Full, schema, on)
    }

    // ==================== WHERE ====================

    /// Set the WHERE condition, replacing any previous one.
    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filter = Some(predicate);
        self
    }

    /// Set the WHERE condition to all of `predicates`.
    pub fn filter_all(self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.filter(Predicate::and(predicates))
    }

    /// Remove the WHERE condition.
    pub fn reset_filter(mut self) -> Self {
        self.filter = None;
        self
    }

    // ==================== ORDER BY / paging ====================

    /// Append an ORDER BY column.
    ///
    /// A column pinned to a schema that lacks it is ignored, so values from a
    /// query string can be passed straight through.
    pub fn order_by(mut self, column: impl Into<Column>, dir: SortDir) -> Self {
        let column = column.into();
        if let TableRef::Schema(s) = &column.table {
            if !s.is_column_exist(&column.name) {
                trace!(
                    table = s.reference(),
                    column = %column.name,
                    "ignoring order by on unknown column"
                );
                return self;
            }
        }
        self.order_by.push(OrderBy {
            target: OrderTarget::Column(column),
            dir,
        });
        self
    }

    /// Append an ORDER BY on `LOWER(column)`; an aliased LOWER sorts by its alias.
    pub fn order_by_lower(mut self, lower: Lower, dir: SortDir) -> Self {
        self.order_by.push(OrderBy {
            target: OrderTarget::Lower(lower),
            dir,
        });
        self
    }

    pub fn reset_order_by(mut self) -> Self {
        self.order_by.clear();
        self
    }

    /// Set LIMIT.
    pub fn limit(mut self, n: u64) -> Self {
        self.limit = Some(n);
        self
    }

    pub fn reset_limit(mut self) -> Self {
        self.limit = None;
        self
    }

    /// Set OFFSET.
    pub fn skip(mut self, n: u64) -> Self {
        self.offset = Some(n);
        self
    }

    pub fn reset_skip(mut self) -> Self {
        self.offset = None;
        self
    }

    // ==================== Build helpers ====================

    fn build_select_sql(&self) -> BuildResult<String> {
        if let Some(err) = &self.build_error {
            return Err(err.clone());
        }
        let from = self.from.as_ref().ok_or(BuildError::MissingFrom)?;
        self.validate_aliases()?;
        let dialect = self.dialect.as_ref();

        let mut registry = Registry::default();
        registry.push(from.clone());

        let mut joins_sql = String::new();
        for join in &self.joins {
            let on = resolve_join_condition(&join.on, &from.schema, &join.table, &registry)?;
            let mut cond = String::new();
            on.write(&mut cond, dialect)?;
            if cond.is_empty() {
                return Err(BuildError::EmptyJoinCondition(join.table.reference().to_string()));
            }
            joins_sql.push(' ');
            joins_sql.push_str(join.method.as_sql());
            joins_sql.push(' ');
            write_table(&mut joins_sql, dialect, &join.table);
            joins_sql.push_str(" ON ");
            joins_sql.push_str(&cond);
            registry.push(join.table.clone());
        }

        let format = if registry.len() > 1 {
            ColumnFormat::JoinQualified
        } else {
            ColumnFormat::Qualified
        };

        let mut fields_sql = String::new();
        if self.fields.is_empty() {
            write_all_columns(&mut fields_sql, dialect, from, format);
        }
        for field in &self.fields {
            let mut part = String::new();
            self.write_field(&mut part, field, from, &registry, format)?;
            if part.is_empty() {
                continue;
            }
            if !fields_sql.is_empty() {
                fields_sql.push_str(", ");
            }
            fields_sql.push_str(&part);
        }
        if fields_sql.is_empty() {
            return Err(BuildError::NoSelectedFields(from.reference().to_string()));
        }

        let mut sql = String::from("SELECT ");
        sql.push_str(&fields_sql);
        sql.push_str(" FROM ");
        write_table(&mut sql, dialect, from);
        sql.push_str(&joins_sql);

        if let Some(filter) = &self.filter {
            let resolved = resolve_deferred(filter, &from.schema, None);
            if let Some(filtered) = filter_and_alias(&resolved, &registry) {
                let mut cond = String::new();
                filtered.write(&mut cond, dialect)?;
                if !cond.is_empty() {
                    sql.push_str(" WHERE ");
                    sql.push_str(&cond);
                }
            }
        }

        let mut order_sql = String::new();
        for order in &self.order_by {
            let mut part = String::new();
            self.write_order(&mut part, order, from, &registry)?;
            if part.is_empty() {
                continue;
            }
            if !order_sql.is_empty() {
                order_sql.push_str(", ");
            }
            order_sql.push_str(&part);
        }
        if !order_sql.is_empty() {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_sql);
        }

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        Ok(sql)
    }

    /// Check every alias given to a table, field or ORDER BY expression.
    fn validate_aliases(&self) -> BuildResult<()> {
        let tables = self.from.iter().chain(self.joins.iter().map(|j| &j.table));
        for alias in tables.filter_map(|t| t.alias.as_deref()) {
            ident::validate("alias", alias)?;
        }
        for alias in self.fields.iter().filter_map(SelectField::alias) {
            ident::validate("alias", alias)?;
        }
        for order in &self.order_by {
            if let OrderTarget::Lower(Lower { alias: Some(alias), .. }) = &order.target {
                ident::validate("alias", alias)?;
            }
        }
        Ok(())
    }

    fn write_field(
        &self,
        out: &mut String,
        field: &SelectField,
        from: &Registered,
        registry: &Registry,
        format: ColumnFormat,
    ) -> BuildResult<()> {
        let dialect = self.dialect.as_ref();
        match field {
            SelectField::Column(c) => {
                let mut c = c.clone();
                bind_pending(&mut c, &from.schema, None);
                if c.is_all_columns() {
                    if let TableRef::Schema(s) = &c.table {
                        match registry.lookup(s) {
                            Some(entry) => write_all_columns(out, dialect, entry, format),
                            None => {
                                trace!(table = s.reference(), "table not registered, dropping *")
                            }
                        }
                    }
                    return Ok(());
                }
                if stamp(&mut c, registry) {
                    c.write_select(out, dialect, format);
                }
            }
            SelectField::Columns(set) => {
                let mut set = set.clone();
                let schema = match &set.table {
                    TableRef::PendingFrom => from.schema.clone(),
                    TableRef::Schema(s) => s.clone(),
                    _ => return Ok(()),
                };
                let Some(entry) = registry.lookup(&schema) else {
                    trace!(table = schema.reference(), "table not registered, dropping column set");
                    return Ok(());
                };
                set.columns = entry.schema.filter(&set.columns);
                set.qualifier = Some(entry.reference().to_string());
                set.write(out, dialect, format);
            }
            SelectField::Count(count) => {
                let mut count = count.clone();
                if let TableRef::Schema(s) = &count.column.table {
                    if !s.is_column_exist(&count.column.name) {
                        return Err(BuildError::column_not_in_schema(
                            s.table_name(),
                            count.column.name.clone(),
                        ));
                    }
                }
                bind_pending(&mut count.column, &from.schema, None);
                if !stamp(&mut count.column, registry) {
                    return Ok(());
                }
                count.write(out, dialect);
                if let Some(alias) = &count.alias {
                    out.push_str(" AS ");
                    dialect.write_identifier(out, alias);
                }
            }
            SelectField::Lower(lower) => {
                if let Some(lower) = resolve_lower(lower, from, registry)? {
                    lower.write_select(out, dialect);
                }
            }
            SelectField::Predicate(p) => {
                let resolved = resolve_deferred(p, &from.schema, None);
                if let Some(filtered) = filter_and_alias(&resolved, registry) {
                    if !filtered.is_empty() {
                        filtered.write_select(out, dialect)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn write_order(
        &self,
        out: &mut String,
        order: &OrderBy,
        from: &Registered,
        registry: &Registry,
    ) -> BuildResult<()> {
        let dialect = self.dialect.as_ref();
        match &order.target {
            OrderTarget::Column(c) => {
                let mut c = c.clone();
                bind_pending(&mut c, &from.schema, None);
                if c.is_all_columns() || !stamp(&mut c, registry) {
                    trace!(column = %c.name, "dropping order by");
                    return Ok(());
                }
                c.write(out, dialect, ColumnFormat::Qualified);
            }
            OrderTarget::Lower(lower) => match resolve_lower(lower, from, registry)? {
                Some(lower) => lower.write_order(out, dialect),
                None => return Ok(()),
            },
        }
        out.push(' ');
        out.push_str(order.dir.as_sql());
        Ok(())
    }
}

fn resolve_lower(
    lower: &Lower,
    from: &Registered,
    registry: &Registry,
) -> BuildResult<Option<Lower>> {
    if lower.column.is_all_columns() {
        return Err(BuildError::UnsupportedAllColumns("LOWER"));
    }
    let mut lower = lower.clone();
    bind_pending(&mut lower.column, &from.schema, None);
    if !stamp(&mut lower.column, registry) {
        return Ok(None);
    }
    Ok(Some(lower))
}

fn write_table(out: &mut String, dialect: &dyn Dialect, table: &Registered) {
    dialect.write_identifier(out, table.schema.table_name());
    if let Some(alias) = table.display_alias() {
        out.push_str(" AS ");
        dialect.write_identifier(out, alias);
    }
}

fn write_all_columns(
    out: &mut String,
    dialect: &dyn Dialect,
    table: &Registered,
    format: ColumnFormat,
) {
    for (i, name) in table.schema.columns().iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        write_column(out, dialect, Some(table.reference()), name, format);
    }
}

impl Statement for SelectBuilder {
    const KIND: &'static str = "select";

    fn build(&self) -> BuildResult<String> {
        let sql = self.build_select_sql()?;
        debug!(sql = %sql, "built select statement");
        Ok(sql)
    }
}

/// Start a SELECT with `fields`.
pub fn select<I, F>(fields: I) -> SelectBuilder
where
    I: IntoIterator<Item = F>,
    F: Into<SelectField>,
{
    SelectBuilder::new().fields(fields)
}

/// Start a SELECT of every column of `schema`.
pub fn select_from(schema: &Schema) -> SelectBuilder {
    SelectBuilder::new().from(schema)
}
