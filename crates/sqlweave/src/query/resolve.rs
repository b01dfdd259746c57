//! Table registry and reference resolution.
//!
//! Resolution never touches the caller's nodes: every pass takes a node by
//! reference and returns a resolved copy, so a predicate can be shared between
//! builders with different FROM and JOIN tables.

use tracing::trace;

use crate::error::{BuildError, BuildResult};
use crate::schema::Schema;

use super::column::{Column, TableRef};
use super::predicate::{Comparison, Predicate};

/// One table declared by FROM or JOIN.
#[derive(Debug, Clone)]
pub(crate) struct Registered {
    pub(crate) schema: Schema,
    /// Alias given to `from_as` / `join_as`, overriding the schema's own.
    pub(crate) alias: Option<String>,
}

impl Registered {
    pub(crate) fn new(schema: Schema, alias: Option<String>) -> Self {
        Self { schema, alias }
    }

    /// Key used in output SQL and for lookups.
    pub(crate) fn reference(&self) -> &str {
        self.alias.as_deref().unwrap_or_else(|| self.schema.reference())
    }

    /// Alias to print after the table name, if any.
    pub(crate) fn display_alias(&self) -> Option<&str> {
        self.alias.as_deref().or_else(|| self.schema.alias())
    }

    fn matches(&self, schema: &Schema) -> bool {
        self.reference() == schema.reference()
            || self.schema.same_instance(schema)
            || self.schema == *schema
    }
}

/// Tables of one statement, in declaration order.
#[derive(Debug, Default)]
pub(crate) struct Registry {
    tables: Vec<Registered>,
}

impl Registry {
    pub(crate) fn push(&mut self, table: Registered) {
        self.tables.push(table);
    }

    pub(crate) fn len(&self) -> usize {
        self.tables.len()
    }

    /// Find the entry a schema-bound node belongs to.
    ///
    /// A node matches by reference first; a node bound to the very schema passed to
    /// `from_as` / `join_as` matches that entry even though the alias differs.
    pub(crate) fn lookup(&self, schema: &Schema) -> Option<&Registered> {
        self.find_by_reference(schema.reference())
            .or_else(|| self.tables.iter().find(|t| t.matches(schema)))
    }

    pub(crate) fn find_by_reference(&self, reference: &str) -> Option<&Registered> {
        self.tables.iter().find(|t| t.reference() == reference)
    }
}

/// Bind FROM-pending and JOIN-pending columns of a copy of `node`.
pub(crate) fn resolve_deferred(
    node: &Predicate,
    from: &Schema,
    join: Option<&Schema>,
) -> Predicate {
    let mut node = node.clone();
    node.for_each_comparison_mut(&mut |c: &mut Comparison| {
        bind_pending(c.operand.column_mut(), from, join);
        if let Some(v) = c.variable.as_mut().and_then(|v| v.column_mut()) {
            bind_pending(v, from, join);
        }
    });
    node
}

pub(crate) fn bind_pending(column: &mut Column, from: &Schema, join: Option<&Schema>) {
    if column.is_pending_from() {
        column.bind(from);
    } else if let (true, Some(join)) = (column.is_pending_join(), join) {
        column.bind(join);
    }
}

/// Stamp the display table of `column` from the registry.
///
/// Returns `false` when the column cannot be written: it is pending, skipped,
/// bound to an unregistered table, or missing from its table.
pub(crate) fn stamp(column: &mut Column, registry: &Registry) -> bool {
    match &column.table {
        TableRef::Force => true,
        TableRef::Skip | TableRef::PendingFrom | TableRef::PendingJoin => false,
        TableRef::Schema(schema) => {
            let Some(entry) = registry.lookup(schema) else {
                trace!(
                    table = schema.reference(),
                    column = %column.name,
                    "table not registered, dropping"
                );
                return false;
            };
            if !column.is_all_columns() && !entry.schema.is_column_exist(&column.name) {
                trace!(
                    table = entry.reference(),
                    column = %column.name,
                    "column not in table, dropping"
                );
                return false;
            }
            column.qualifier = Some(entry.reference().to_string());
            true
        }
    }
}

/// Drop comparisons that do not resolve against `registry` and stamp the rest.
///
/// Groups are kept even when all their children go; they render to nothing.
pub(crate) fn filter_and_alias(node: &Predicate, registry: &Registry) -> Option<Predicate> {
    match node {
        Predicate::Comparison(c) => {
            let mut c = c.clone();
            let operand = c.operand.column();
            if operand.is_all_columns() && !matches!(operand.table, TableRef::Force) {
                trace!("all-columns comparison, dropping");
                return None;
            }
            if !stamp(c.operand.column_mut(), registry) {
                trace!(column = %c.operand.column().name, "dropping comparison");
                return None;
            }
            if let Some(v) = c.variable.as_mut().and_then(|v| v.column_mut()) {
                if !stamp(v, registry) {
                    trace!(column = %v.name, "dropping comparison on unresolved right-hand column");
                    return None;
                }
            }
            Some(Predicate::Comparison(c))
        }
        Predicate::Logical(logic, children) => Some(Predicate::Logical(
            *logic,
            children
                .iter()
                .filter_map(|child| filter_and_alias(child, registry))
                .collect(),
        )),
    }
}

/// Whether a SELECT whose only table is `schema` keeps comparison `c` in WHERE.
pub(crate) fn kept_by_select_from(c: &Comparison, schema: &Schema) -> bool {
    let mut registry = Registry::default();
    registry.push(Registered::new(schema.clone(), None));
    let node = resolve_deferred(&Predicate::Comparison(c.clone()), schema, None);
    filter_and_alias(&node, &registry).is_some()
}

/// Resolve an ON condition for `join`, whose earlier tables are in `registry`.
///
/// Unlike WHERE, nothing is dropped: a column that belongs neither to the joined
/// table nor to a registered one is a construction error.
pub(crate) fn resolve_join_condition(
    on: &Predicate,
    from: &Schema,
    join: &Registered,
    registry: &Registry,
) -> BuildResult<Predicate> {
    let mut resolved = on.clone();
    let mut result = Ok(());
    resolved.for_each_comparison_mut(&mut |c: &mut Comparison| {
        if result.is_err() {
            return;
        }
        result = bind_join_column(c.operand.column_mut(), from, join, registry).and_then(|_| {
            match c.variable.as_mut().and_then(|v| v.column_mut()) {
                Some(v) => bind_join_column(v, from, join, registry),
                None => Ok(()),
            }
        });
    });
    result.map(|_| resolved)
}

/// Bind one ON-condition column to the joined table or an already registered one.
pub(crate) fn bind_join_column(
    column: &mut Column,
    from: &Schema,
    join: &Registered,
    registry: &Registry,
) -> BuildResult<()> {
    let owner = match &column.table {
        TableRef::Force => return Ok(()),
        TableRef::Skip => {
            return Err(BuildError::unknown_join_column(
                join.reference(),
                column.name.clone(),
            ));
        }
        TableRef::PendingJoin => join,
        TableRef::PendingFrom => registry
            .lookup(from)
            .ok_or_else(|| BuildError::UnknownJoinTable(from.reference().to_string()))?,
        TableRef::Schema(s) => {
            if join.reference() == s.reference() {
                join
            } else if let Some(entry) = registry.find_by_reference(s.reference()) {
                entry
            } else if join.matches(s) {
                join
            } else {
                registry
                    .lookup(s)
                    .ok_or_else(|| BuildError::UnknownJoinTable(s.reference().to_string()))?
            }
        }
    };

    if column.is_all_columns() {
        return Err(BuildError::UnsupportedAllColumns("JOIN condition"));
    }
    if !owner.schema.is_column_exist(&column.name) {
        return Err(BuildError::unknown_join_column(
            owner.reference(),
            column.name.clone(),
        ));
    }
    column.table = TableRef::Schema(owner.schema.clone());
    column.qualifier = Some(owner.reference().to_string());
    Ok(())
}
