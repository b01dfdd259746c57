//! Table descriptions.
//!
//! A [`Schema`] is an immutable description of one table: its name, its ordered
//! column set, the primary key, whether that key is auto-incremented, and an
//! optional alias. Schemas are cheap to clone (the description is shared) and are
//! referenced by columns and predicates when composing statements.
//!
//! Schemas come from an explicit column list or from a type deriving [`Model`]:
//!
//! ```ignore
//! use sqlweave::{Model, Schema};
//!
//! #[derive(Model)]
//! #[orm(rename_all = "camelCase")]
//! struct Person {
//!     created_at: i64,
//!     id: i64,
//!     full_name: String,
//!     #[orm(skip)]
//!     age: i32,
//! }
//!
//! let person = Schema::from_model::<Person>()?;
//! let manual = Schema::builder()
//!     .table_name("Person")
//!     .columns(["createdAt", "id", "fullName"])
//!     .build()?;
//! assert_eq!(person.columns(), manual.columns());
//! # Ok::<(), sqlweave::BuildError>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{BuildError, BuildResult};
use crate::ident;

const DEFAULT_PRIMARY_KEY: &str = "id";

/// Describes one field of a record type, in declaration order.
#[derive(Debug, Clone, Copy)]
pub enum FieldDescriptor {
    /// A field stored in the named column.
    Column(&'static str),
    /// The primary key field, stored in the named column.
    Id(&'static str),
    /// An embedded record whose columns are inlined at this position.
    Flatten(fn() -> &'static [FieldDescriptor]),
}

/// A record type that maps onto one table.
///
/// Usually implemented with `#[derive(Model)]`.
pub trait Model {
    /// Table name (the type name unless overridden).
    fn table_name() -> &'static str;

    /// Field descriptors in declaration order, skipped fields excluded.
    fn fields() -> &'static [FieldDescriptor];

    /// Primary key column marked on the type or on a flattened field, if any.
    fn primary_key() -> Option<&'static str> {
        find_primary_key(Self::fields())
    }
}

/// First `Id` descriptor, searching flattened records depth first.
fn find_primary_key(fields: &[FieldDescriptor]) -> Option<&'static str> {
    fields.iter().find_map(|field| match field {
        FieldDescriptor::Id(name) => Some(*name),
        FieldDescriptor::Column(_) => None,
        FieldDescriptor::Flatten(nested) => find_primary_key(nested()),
    })
}

impl<T: Model> Model for Box<T> {
    fn table_name() -> &'static str {
        T::table_name()
    }

    fn fields() -> &'static [FieldDescriptor] {
        T::fields()
    }

    fn primary_key() -> Option<&'static str> {
        T::primary_key()
    }
}

impl<T: Model> Model for Option<T> {
    fn table_name() -> &'static str {
        T::table_name()
    }

    fn fields() -> &'static [FieldDescriptor] {
        T::fields()
    }

    fn primary_key() -> Option<&'static str> {
        T::primary_key()
    }
}

/// Flatten descriptors into column names, depth first, noting primary key columns.
fn collect_columns(fields: &[FieldDescriptor], out: &mut Vec<String>, ids: &mut Vec<String>) {
    for field in fields {
        match field {
            FieldDescriptor::Column(name) => out.push((*name).to_string()),
            FieldDescriptor::Id(name) => {
                out.push((*name).to_string());
                ids.push((*name).to_string());
            }
            FieldDescriptor::Flatten(nested) => collect_columns(nested(), out, ids),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ModelRef {
    table_name: fn() -> &'static str,
    fields: fn() -> &'static [FieldDescriptor],
    primary_key: fn() -> Option<&'static str>,
}

/// Options used to construct a [`Schema`].
///
/// Defaults: primary key `"id"` (or the model's `#[orm(id)]` field), auto-increment
/// enabled, no alias.
#[derive(Debug, Clone)]
pub struct SchemaOptions {
    table_name: Option<String>,
    columns: Vec<String>,
    primary_key: Option<String>,
    auto_increment: bool,
    alias: Option<String>,
    model: Option<ModelRef>,
}

impl Default for SchemaOptions {
    fn default() -> Self {
        Self {
            table_name: None,
            columns: Vec::new(),
            primary_key: None,
            auto_increment: true,
            alias: None,
            model: None,
        }
    }
}

impl SchemaOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the table name. Overrides the name taken from a model.
    pub fn table_name(mut self, name: impl Into<String>) -> Self {
        self.table_name = Some(name.into());
        self
    }

    /// Set the column list. Ignored when a model is set.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the primary key column (default `"id"`).
    pub fn primary_key(mut self, pk: impl Into<String>) -> Self {
        self.primary_key = Some(pk.into());
        self
    }

    /// Set whether the primary key is generated by the database (default `true`).
    pub fn auto_increment(mut self, ai: bool) -> Self {
        self.auto_increment = ai;
        self
    }

    /// Set the alias used as the table reference in statements.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    /// Take the table name and columns from a [`Model`] type.
    pub fn model<M: Model>(mut self) -> Self {
        self.model = Some(ModelRef {
            table_name: M::table_name,
            fields: M::fields,
            primary_key: M::primary_key,
        });
        self
    }

    /// Validate the options and construct the schema.
    pub fn build(self) -> BuildResult<Schema> {
        let (model_table, model_pk, columns, ids) = match self.model {
            Some(m) => {
                let mut cols = Vec::new();
                let mut ids = Vec::new();
                collect_columns((m.fields)(), &mut cols, &mut ids);
                (Some((m.table_name)()), (m.primary_key)(), cols, ids)
            }
            None => (None, None, self.columns, Vec::new()),
        };
        let primary_key = self
            .primary_key
            .or_else(|| model_pk.map(str::to_string))
            .unwrap_or_else(|| DEFAULT_PRIMARY_KEY.to_string());

        let table_name = match self.table_name {
            Some(name) if !name.is_empty() => name,
            _ => match model_table {
                Some(name) if !name.is_empty() => name.to_string(),
                _ => return Err(BuildError::EmptyTableName),
            },
        };
        ident::validate("table", &table_name)?;

        if ids.len() > 1 {
            return Err(BuildError::MultiplePrimaryKeys {
                table: table_name,
                columns: ids,
            });
        }

        if columns.is_empty() {
            return Err(BuildError::NoColumns(table_name));
        }

        let mut positions = HashMap::with_capacity(columns.len());
        for (i, col) in columns.iter().enumerate() {
            ident::validate("column", col)?;
            if positions.insert(col.clone(), i).is_some() {
                return Err(BuildError::DuplicateColumn {
                    table: table_name,
                    column: col.clone(),
                });
            }
        }

        if !positions.contains_key(&primary_key) {
            return Err(BuildError::PrimaryKeyNotInColumns {
                table: table_name,
                primary_key,
            });
        }

        if let Some(alias) = &self.alias {
            ident::validate("alias", alias)?;
        }

        Ok(Schema(Arc::new(SchemaInner {
            table_name,
            columns,
            positions,
            primary_key,
            auto_increment: self.auto_increment,
            alias: self.alias,
        })))
    }
}

#[derive(Debug, PartialEq, Eq)]
struct SchemaInner {
    table_name: String,
    columns: Vec<String>,
    positions: HashMap<String, usize>,
    primary_key: String,
    auto_increment: bool,
    alias: Option<String>,
}

/// Immutable description of one table.
#[derive(Clone, PartialEq, Eq)]
pub struct Schema(Arc<SchemaInner>);

impl Schema {
    /// Start building a schema.
    pub fn builder() -> SchemaOptions {
        SchemaOptions::new()
    }

    /// Build a schema from a [`Model`] type with default options.
    pub fn from_model<M: Model>() -> BuildResult<Schema> {
        SchemaOptions::new().model::<M>().build()
    }

    /// Table name.
    pub fn table_name(&self) -> &str {
        &self.0.table_name
    }

    /// Primary key column.
    pub fn primary_key(&self) -> &str {
        &self.0.primary_key
    }

    /// Whether the primary key is generated by the database.
    pub fn auto_increment(&self) -> bool {
        self.0.auto_increment
    }

    /// Alias, if any.
    pub fn alias(&self) -> Option<&str> {
        self.0.alias.as_deref()
    }

    /// The key used to resolve this table inside a statement: alias if set, else table name.
    pub fn reference(&self) -> &str {
        self.0.alias.as_deref().unwrap_or(&self.0.table_name)
    }

    /// Return a copy of this schema under another alias.
    pub fn with_alias(&self, alias: impl Into<String>) -> BuildResult<Schema> {
        let alias = alias.into();
        ident::validate("alias", &alias)?;
        Ok(Schema(Arc::new(SchemaInner {
            table_name: self.0.table_name.clone(),
            columns: self.0.columns.clone(),
            positions: self.0.positions.clone(),
            primary_key: self.0.primary_key.clone(),
            auto_increment: self.0.auto_increment,
            alias: Some(alias),
        })))
    }

    /// Whether `column` is declared in this schema.
    pub fn is_column_exist(&self, column: &str) -> bool {
        self.0.positions.contains_key(column)
    }

    /// Columns in declaration order.
    pub fn columns(&self) -> &[String] {
        &self.0.columns
    }

    /// Number of columns.
    pub fn count_columns(&self) -> usize {
        self.0.columns.len()
    }

    /// Columns written by an INSERT: all of them, minus the primary key if auto-incremented.
    pub fn insert_columns(&self) -> Vec<String> {
        if self.0.auto_increment {
            self.columns_without_pk()
        } else {
            self.0.columns.clone()
        }
    }

    /// Columns written by an UPDATE: all of them minus the primary key.
    pub fn update_columns(&self) -> Vec<String> {
        self.columns_without_pk()
    }

    /// Keep only the requested columns that exist, in request order.
    pub fn filter<I, S>(&self, columns: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        columns
            .into_iter()
            .filter(|c| self.is_column_exist(c.as_ref()))
            .map(|c| c.as_ref().to_string())
            .collect()
    }

    /// Whether two handles point at the same declared table instance.
    pub fn same_instance(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn columns_without_pk(&self) -> Vec<String> {
        self.0
            .columns
            .iter()
            .filter(|c| **c != self.0.primary_key)
            .cloned()
            .collect()
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("table_name", &self.0.table_name)
            .field("alias", &self.0.alias)
            .field("columns", &self.0.columns)
            .field("primary_key", &self.0.primary_key)
            .field("auto_increment", &self.0.auto_increment)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BaseModel;

    impl Model for BaseModel {
        fn table_name() -> &'static str {
            "BaseModel"
        }

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::Column("createdAt"),
                FieldDescriptor::Column("updatedAt"),
                FieldDescriptor::Column("id"),
            ];
            FIELDS
        }
    }

    struct Person;

    impl Model for Person {
        fn table_name() -> &'static str {
            "Person"
        }

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::Column("createdAt"),
                FieldDescriptor::Column("updatedAt"),
                FieldDescriptor::Column("id"),
                FieldDescriptor::Column("fullName"),
                FieldDescriptor::Column("birthDate"),
                FieldDescriptor::Column("NickName"),
            ];
            FIELDS
        }
    }

    struct PersonEmbedded;

    impl Model for PersonEmbedded {
        fn table_name() -> &'static str {
            "PersonEmbedded"
        }

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::Flatten(<Box<BaseModel> as Model>::fields),
                FieldDescriptor::Column("fullName"),
                FieldDescriptor::Column("birthDate"),
                FieldDescriptor::Column("NickName"),
            ];
            FIELDS
        }
    }

    fn person() -> Schema {
        Schema::from_model::<Person>().unwrap()
    }

    #[test]
    fn model_columns_in_declaration_order() {
        assert_eq!(
            person().columns(),
            ["createdAt", "updatedAt", "id", "fullName", "birthDate", "NickName"]
        );
        assert_eq!(person().table_name(), "Person");
        assert_eq!(person().primary_key(), "id");
    }

    #[test]
    fn embedded_model_flattens_in_place() {
        let emb = Schema::builder()
            .model::<PersonEmbedded>()
            .table_name("Person")
            .build()
            .unwrap();
        assert_eq!(emb.table_name(), person().table_name());
        assert_eq!(emb.columns(), person().columns());
    }

    #[test]
    fn manual_matches_model() {
        let manual = Schema::builder()
            .table_name("Person")
            .columns(["createdAt", "updatedAt", "id", "fullName", "birthDate", "NickName"])
            .auto_increment(false)
            .build()
            .unwrap();
        let model = Schema::builder()
            .model::<Person>()
            .auto_increment(false)
            .build()
            .unwrap();

        assert_eq!(manual.table_name(), model.table_name());
        assert_eq!(manual.columns(), model.columns());
        assert_eq!(manual.primary_key(), model.primary_key());
        assert_eq!(manual.auto_increment(), model.auto_increment());
        assert_eq!(manual.count_columns(), model.count_columns());
        assert!(!manual.is_column_exist("age"));
    }

    #[test]
    fn insert_and_update_columns() {
        let p = person();
        let without_pk = ["createdAt", "updatedAt", "fullName", "birthDate", "NickName"];
        assert_eq!(p.insert_columns(), without_pk);
        assert_eq!(p.update_columns(), without_pk);

        let no_ai = Schema::builder()
            .model::<Person>()
            .auto_increment(false)
            .build()
            .unwrap();
        assert_eq!(no_ai.insert_columns(), no_ai.columns());
        assert_eq!(no_ai.update_columns(), without_pk);
    }

    #[test]
    fn custom_primary_key() {
        let s = Schema::builder()
            .table_name("Log")
            .columns(["logId", "message"])
            .primary_key("logId")
            .build()
            .unwrap();
        assert_eq!(s.primary_key(), "logId");
    }

    #[test]
    fn reference_prefers_alias() {
        let p = person();
        assert_eq!(p.reference(), "Person");
        let aliased = p.with_alias("p").unwrap();
        assert_eq!(aliased.reference(), "p");
        assert_eq!(aliased.table_name(), "Person");
        assert!(!aliased.same_instance(&p));
    }

    #[test]
    fn filter_keeps_existing_in_request_order() {
        assert_eq!(person().filter(["fullName", "gender", "id"]), ["fullName", "id"]);
    }

    #[test]
    fn rejects_missing_columns() {
        let err = Schema::builder().table_name("Customer").build().unwrap_err();
        assert_eq!(err, BuildError::NoColumns("Customer".to_string()));
    }

    #[test]
    fn rejects_missing_table_name() {
        let err = Schema::builder().columns(["id", "name"]).build().unwrap_err();
        assert_eq!(err, BuildError::EmptyTableName);
        assert!(err.is_schema_error());
    }

    #[test]
    fn rejects_primary_key_outside_columns() {
        let err = Schema::builder()
            .table_name("Customer")
            .columns(["createdAt", "name"])
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::PrimaryKeyNotInColumns { .. }));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let err = Schema::builder()
            .table_name("Customer")
            .columns(["id", "name", "id"])
            .build()
            .unwrap_err();
        assert!(matches!(err, BuildError::DuplicateColumn { .. }));
    }

    struct Audited;

    impl Model for Audited {
        fn table_name() -> &'static str {
            "Audited"
        }

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::Id("auditId"),
                FieldDescriptor::Column("changedAt"),
            ];
            FIELDS
        }
    }

    struct Entry;

    impl Model for Entry {
        fn table_name() -> &'static str {
            "Entry"
        }

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::Flatten(<Audited as Model>::fields),
                FieldDescriptor::Column("body"),
            ];
            FIELDS
        }
    }

    struct TwoKeys;

    impl Model for TwoKeys {
        fn table_name() -> &'static str {
            "TwoKeys"
        }

        fn fields() -> &'static [FieldDescriptor] {
            const FIELDS: &[FieldDescriptor] = &[
                FieldDescriptor::Flatten(<Audited as Model>::fields),
                FieldDescriptor::Id("entryId"),
            ];
            FIELDS
        }
    }

    #[test]
    fn primary_key_found_in_flattened_record() {
        assert_eq!(Entry::primary_key(), Some("auditId"));
        let s = Schema::from_model::<Entry>().unwrap();
        assert_eq!(s.primary_key(), "auditId");
        assert_eq!(s.columns(), ["auditId", "changedAt", "body"]);
        assert_eq!(s.insert_columns(), ["changedAt", "body"]);
    }

    #[test]
    fn rejects_primary_key_marked_twice_across_flatten() {
        let err = Schema::from_model::<TwoKeys>().unwrap_err();
        assert_eq!(
            err,
            BuildError::MultiplePrimaryKeys {
                table: "TwoKeys".to_string(),
                columns: vec!["auditId".to_string(), "entryId".to_string()],
            }
        );
    }
}
