//! Column references and select-list fields.
//!
//! A [`Column`] names a column of some table. The table is either given up front
//! ([`Column::of`]) or left pending until the statement knows it: [`col`] binds to
//! whatever table ends up in FROM, [`on`] binds to the table of the enclosing JOIN.

use crate::dialect::Dialect;
use crate::schema::Schema;

use super::predicate::Predicate;

/// Column name that selects every column of a schema.
pub const ALL_COLUMNS: &str = "*";

/// How a column reference is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnFormat {
    /// `"table"."col"`
    #[default]
    Qualified,
    /// `"col"`
    Bare,
    /// `"table"."col" AS "table.col"`
    JoinQualified,
}

/// Table a column belongs to.
#[derive(Debug, Clone)]
pub(crate) enum TableRef {
    /// A concrete schema.
    Schema(Schema),
    /// The schema passed to `from()`, known at build time.
    PendingFrom,
    /// The schema of the enclosing `join()`, known at build time.
    PendingJoin,
    /// Bound to a schema that lacks the column; never written.
    Skip,
    /// Written regardless of table registration (`COUNT(*)`).
    Force,
}

/// Reference to one column.
#[derive(Debug, Clone)]
pub struct Column {
    pub(crate) name: String,
    pub(crate) table: TableRef,
    pub(crate) format: Option<ColumnFormat>,
    pub(crate) alias: Option<String>,
    /// Table reference to print, stamped from the statement's registry.
    pub(crate) qualifier: Option<String>,
}

/// Column of the table declared in FROM.
pub fn col(name: impl Into<String>) -> Column {
    Column::new(name)
}

/// Column of the table declared in the enclosing JOIN. Used as the right-hand side
/// of an ON condition: `eq(col("id").of(&person)).var(on("personId"))`.
pub fn on(name: impl Into<String>) -> Column {
    let mut c = Column::new(name);
    c.table = TableRef::PendingJoin;
    c
}

impl Column {
    /// Column of the table declared in FROM.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: TableRef::PendingFrom,
            format: None,
            alias: None,
            qualifier: None,
        }
    }

    /// Pin the column to a schema.
    pub fn of(mut self, schema: &Schema) -> Self {
        self.table = TableRef::Schema(schema.clone());
        self
    }

    /// Output alias in a select list (`... AS "alias"`).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Force a rendering format.
    pub fn format(mut self, format: ColumnFormat) -> Self {
        self.format = Some(format);
        self
    }

    /// Column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the `*` column.
    pub fn is_all_columns(&self) -> bool {
        self.name == ALL_COLUMNS
    }

    pub(crate) fn is_pending_from(&self) -> bool {
        matches!(self.table, TableRef::PendingFrom)
    }

    pub(crate) fn is_pending_join(&self) -> bool {
        matches!(self.table, TableRef::PendingJoin)
    }

    /// Bind a pending column to `schema`, marking it skipped if the schema lacks it.
    pub(crate) fn bind(&mut self, schema: &Schema) {
        if !self.is_all_columns() && !schema.is_column_exist(&self.name) {
            self.table = TableRef::Skip;
            return;
        }
        self.table = TableRef::Schema(schema.clone());
    }

    /// Write the column in `format` unless the column carries its own.
    pub(crate) fn write(&self, out: &mut String, dialect: &dyn Dialect, format: ColumnFormat) {
        let format = self.format.unwrap_or(format);
        let qualifier = self.display_table();
        write_column(out, dialect, qualifier, &self.name, format);
    }

    /// Write the column as a select-list entry, honoring its alias.
    pub(crate) fn write_select(
        &self,
        out: &mut String,
        dialect: &dyn Dialect,
        format: ColumnFormat,
    ) {
        match &self.alias {
            Some(alias) => {
                let format = match self.format.unwrap_or(format) {
                    ColumnFormat::JoinQualified => ColumnFormat::Qualified,
                    f => f,
                };
                write_column(out, dialect, self.display_table(), &self.name, format);
                out.push_str(" AS ");
                dialect.write_identifier(out, alias);
            }
            None => self.write(out, dialect, format),
        }
    }

    fn display_table(&self) -> Option<&str> {
        if let Some(q) = &self.qualifier {
            return Some(q);
        }
        match &self.table {
            TableRef::Schema(s) => Some(s.reference()),
            _ => None,
        }
    }
}

impl From<&str> for Column {
    fn from(name: &str) -> Self {
        Column::new(name)
    }
}

impl From<String> for Column {
    fn from(name: String) -> Self {
        Column::new(name)
    }
}

pub(crate) fn write_column(
    out: &mut String,
    dialect: &dyn Dialect,
    table: Option<&str>,
    name: &str,
    format: ColumnFormat,
) {
    let table = match (format, table) {
        (ColumnFormat::Bare, _) | (_, None) => {
            dialect.write_identifier(out, name);
            return;
        }
        (_, Some(t)) => t,
    };

    dialect.write_identifier(out, table);
    out.push('.');
    if name == ALL_COLUMNS {
        out.push('*');
        return;
    }
    dialect.write_identifier(out, name);
    if format == ColumnFormat::JoinQualified {
        out.push_str(" AS ");
        dialect.write_identifier(out, &format!("{table}.{name}"));
    }
}

/// A fixed list of columns from one table.
#[derive(Debug, Clone)]
pub struct ColumnSet {
    pub(crate) columns: Vec<String>,
    pub(crate) table: TableRef,
    pub(crate) qualifier: Option<String>,
}

/// Select `names` from `schema`, keeping only columns the schema declares.
pub fn columns<I, S>(schema: &Schema, names: I) -> ColumnSet
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let names: Vec<String> = names.into_iter().map(|s| s.as_ref().to_string()).collect();
    let columns = if names.len() == 1 && names[0] == ALL_COLUMNS {
        schema.columns().to_vec()
    } else {
        schema.filter(&names)
    };
    ColumnSet {
        columns,
        table: TableRef::Schema(schema.clone()),
        qualifier: None,
    }
}

/// Select `names` from the table declared in FROM.
pub fn from_columns<I, S>(names: I) -> ColumnSet
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    ColumnSet {
        columns: names.into_iter().map(Into::into).collect(),
        table: TableRef::PendingFrom,
        qualifier: None,
    }
}

impl ColumnSet {
    /// Column names, in selection order.
    pub fn names(&self) -> &[String] {
        &self.columns
    }

    pub(crate) fn write(&self, out: &mut String, dialect: &dyn Dialect, format: ColumnFormat) {
        let table = self.qualifier.as_deref().or(match &self.table {
            TableRef::Schema(s) => Some(s.reference()),
            _ => None,
        });
        for (i, name) in self.columns.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            write_column(out, dialect, table, name, format);
        }
    }
}

/// `COUNT(column)`.
#[derive(Debug, Clone)]
pub struct Count {
    pub(crate) column: Column,
    pub(crate) alias: Option<String>,
}

/// Count rows by `column`; `"*"` yields `COUNT(*)`.
pub fn count(column: impl Into<String>) -> Count {
    let mut c = Column::new(column);
    if c.is_all_columns() {
        c.table = TableRef::Force;
    }
    Count {
        column: c,
        alias: None,
    }
}

impl Count {
    /// Pin the counted column to a schema. The column must exist in it.
    pub fn of(mut self, schema: &Schema) -> Self {
        if !self.column.is_all_columns() {
            self.column.table = TableRef::Schema(schema.clone());
        }
        self
    }

    /// Output alias (`COUNT(...) AS "alias"`).
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub(crate) fn write(&self, out: &mut String, dialect: &dyn Dialect) {
        if self.column.is_all_columns() {
            out.push_str("COUNT(*)");
            return;
        }
        out.push_str("COUNT(");
        self.column.write(out, dialect, ColumnFormat::Qualified);
        out.push(')');
    }
}

/// `LOWER(column)`.
#[derive(Debug, Clone)]
pub struct Lower {
    pub(crate) column: Column,
    pub(crate) alias: Option<String>,
}

/// Wrap `column` with `LOWER()`. `*` is rejected when the statement is built.
pub fn lower(column: impl Into<Column>) -> Lower {
    Lower {
        column: column.into(),
        alias: None,
    }
}

impl Lower {
    /// Output alias. ORDER BY refers to the alias once set.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub(crate) fn write_expr(&self, out: &mut String, dialect: &dyn Dialect) {
        out.push_str("LOWER(");
        self.column.write(out, dialect, ColumnFormat::Qualified);
        out.push(')');
    }

    pub(crate) fn write_select(&self, out: &mut String, dialect: &dyn Dialect) {
        self.write_expr(out, dialect);
        if let Some(alias) = &self.alias {
            out.push_str(" AS ");
            dialect.write_identifier(out, alias);
        }
    }

    pub(crate) fn write_order(&self, out: &mut String, dialect: &dyn Dialect) {
        match &self.alias {
            Some(alias) => dialect.write_identifier(out, alias),
            None => self.write_expr(out, dialect),
        }
    }
}

/// One entry of a SELECT list.
#[derive(Debug, Clone)]
pub enum SelectField {
    Column(Column),
    Columns(ColumnSet),
    Count(Count),
    Lower(Lower),
    /// A condition evaluated per row, e.g. `COUNT("id") > 0 AS "isExists"`.
    Predicate(Predicate),
}

impl SelectField {
    /// Output alias of the field, if any.
    pub fn alias(&self) -> Option<&str> {
        match self {
            SelectField::Column(c) => c.alias.as_deref(),
            SelectField::Columns(_) => None,
            SelectField::Count(c) => c.alias.as_deref(),
            SelectField::Lower(l) => l.alias.as_deref(),
            SelectField::Predicate(Predicate::Comparison(c)) => c.alias.as_deref(),
            SelectField::Predicate(Predicate::Logical(..)) => None,
        }
    }
}

impl From<Column> for SelectField {
    fn from(c: Column) -> Self {
        SelectField::Column(c)
    }
}

impl From<&str> for SelectField {
    fn from(name: &str) -> Self {
        SelectField::Column(Column::new(name))
    }
}

impl From<ColumnSet> for SelectField {
    fn from(c: ColumnSet) -> Self {
        SelectField::Columns(c)
    }
}

impl From<Count> for SelectField {
    fn from(c: Count) -> Self {
        SelectField::Count(c)
    }
}

impl From<Lower> for SelectField {
    fn from(l: Lower) -> Self {
        SelectField::Lower(l)
    }
}

impl From<Predicate> for SelectField {
    fn from(p: Predicate) -> Self {
        SelectField::Predicate(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{MySql, Postgres};

    fn person() -> Schema {
        Schema::builder()
            .table_name("Person")
            .columns(["createdAt", "updatedAt", "id", "fullName"])
            .build()
            .unwrap()
    }

    fn render(c: &Column, format: ColumnFormat) -> String {
        let mut out = String::new();
        c.write(&mut out, &Postgres, format);
        out
    }

    #[test]
    fn three_formats() {
        let c = col("id").of(&person());
        assert_eq!(render(&c, ColumnFormat::Bare), r#""id""#);
        assert_eq!(render(&c, ColumnFormat::Qualified), r#""Person"."id""#);
        assert_eq!(
            render(&c, ColumnFormat::JoinQualified),
            r#""Person"."id" AS "Person.id""#
        );
    }

    #[test]
    fn explicit_format_wins() {
        let c = col("id").of(&person()).format(ColumnFormat::Bare);
        assert_eq!(render(&c, ColumnFormat::JoinQualified), r#""id""#);
    }

    #[test]
    fn mysql_uses_backticks() {
        let mut out = String::new();
        col("id").of(&person()).write(&mut out, &MySql, ColumnFormat::JoinQualified);
        assert_eq!(out, "`Person`.`id` AS `Person.id`");
    }

    #[test]
    fn bind_marks_missing_column_skipped() {
        let mut c = col("age");
        c.bind(&person());
        assert!(matches!(c.table, TableRef::Skip));

        let mut all = col(ALL_COLUMNS);
        all.bind(&person());
        assert!(matches!(all.table, TableRef::Schema(_)));
    }

    #[test]
    fn column_set_filters_unknown_names() {
        let set = columns(&person(), ["id", "fullName", "gender"]);
        assert_eq!(set.names(), ["id", "fullName"]);
    }

    #[test]
    fn count_all_is_forced() {
        let c = count("*");
        assert!(matches!(c.column.table, TableRef::Force));
        let mut out = String::new();
        c.write(&mut out, &Postgres);
        assert_eq!(out, "COUNT(*)");
    }

    #[test]
    fn lower_order_uses_alias() {
        let l = lower(col("title").of(&person())).alias("lowerTitle");
        let mut out = String::new();
        l.write_order(&mut out, &Postgres);
        assert_eq!(out, r#""lowerTitle""#);
    }
}
