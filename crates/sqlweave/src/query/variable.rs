//! Right-hand side of a comparison.

use serde::{Deserialize, Serialize};

use crate::dialect::Dialect;
use crate::error::{BuildError, BuildResult};

use super::column::{Column, ColumnFormat};

/// Placeholder style used by INSERT, UPDATE and DELETE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableFormat {
    /// `?`
    #[default]
    Positional,
    /// `:column`
    Named,
}

/// Value slot written after an operator.
#[derive(Debug, Clone)]
pub enum Variable {
    /// `?`
    Positional,
    /// `? AND ?`
    Range,
    /// `(?, ?, ...)` with the given number of slots.
    List(usize),
    /// `:name`
    Named(String),
    /// `:name_0 AND :name_1`
    NamedRange(String),
    /// `(:name_0, :name_1, ...)` with the given number of slots.
    NamedList(String, usize),
    /// Integer literal.
    Int(i64),
    /// `TRUE` / `FALSE`.
    Bool(bool),
    /// Another column, e.g. the joined side of an ON condition.
    Column(Column),
}

impl Variable {
    /// Named placeholder for `column`.
    pub fn named(column: impl Into<String>) -> Self {
        Variable::Named(column.into())
    }

    /// Number of values the slot binds.
    pub(crate) fn arg_count(&self) -> usize {
        match self {
            Variable::Positional | Variable::Named(_) => 1,
            Variable::Range | Variable::NamedRange(_) => 2,
            Variable::List(n) | Variable::NamedList(_, n) => *n,
            Variable::Int(_) | Variable::Bool(_) | Variable::Column(_) => 0,
        }
    }

    pub(crate) fn column_mut(&mut self) -> Option<&mut Column> {
        match self {
            Variable::Column(c) => Some(c),
            _ => None,
        }
    }

    pub(crate) fn write(&self, out: &mut String, dialect: &dyn Dialect) -> BuildResult<()> {
        match self {
            Variable::Positional => out.push_str(dialect.placeholder()),
            Variable::Range => {
                out.push_str(dialect.placeholder());
                out.push_str(" AND ");
                out.push_str(dialect.placeholder());
            }
            Variable::List(0) | Variable::NamedList(_, 0) => return Err(BuildError::EmptyInList),
            Variable::List(n) => {
                out.push('(');
                for i in 0..*n {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(dialect.placeholder());
                }
                out.push(')');
            }
            Variable::Named(name) => {
                out.push(':');
                out.push_str(name);
            }
            Variable::NamedRange(name) => {
                out.push_str(&format!(":{name}_0 AND :{name}_1"));
            }
            Variable::NamedList(name, n) => {
                out.push('(');
                for i in 0..*n {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    out.push_str(&format!(":{name}_{i}"));
                }
                out.push(')');
            }
            Variable::Int(v) => out.push_str(&v.to_string()),
            Variable::Bool(true) => out.push_str("TRUE"),
            Variable::Bool(false) => out.push_str("FALSE"),
            Variable::Column(c) => c.write(out, dialect, ColumnFormat::Qualified),
        }
        Ok(())
    }
}

impl From<Column> for Variable {
    fn from(c: Column) -> Self {
        Variable::Column(c)
    }
}

impl From<i64> for Variable {
    fn from(v: i64) -> Self {
        Variable::Int(v)
    }
}

impl From<bool> for Variable {
    fn from(v: bool) -> Self {
        Variable::Bool(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Postgres;

    fn render(v: Variable) -> BuildResult<String> {
        let mut out = String::new();
        v.write(&mut out, &Postgres)?;
        Ok(out)
    }

    #[test]
    fn placeholders() {
        assert_eq!(render(Variable::Positional).unwrap(), "?");
        assert_eq!(render(Variable::Range).unwrap(), "? AND ?");
        assert_eq!(render(Variable::named("fullName")).unwrap(), ":fullName");
    }

    #[test]
    fn list_sizes() {
        assert_eq!(render(Variable::List(1)).unwrap(), "(?)");
        assert_eq!(render(Variable::List(3)).unwrap(), "(?, ?, ?)");
        assert_eq!(render(Variable::List(0)), Err(BuildError::EmptyInList));
    }

    #[test]
    fn named_range_and_list() {
        assert_eq!(
            render(Variable::NamedRange("createdAt".into())).unwrap(),
            ":createdAt_0 AND :createdAt_1"
        );
        assert_eq!(
            render(Variable::NamedList("id".into(), 3)).unwrap(),
            "(:id_0, :id_1, :id_2)"
        );
        assert_eq!(
            render(Variable::NamedList("id".into(), 0)),
            Err(BuildError::EmptyInList)
        );
    }

    #[test]
    fn literals() {
        assert_eq!(render(0i64.into()).unwrap(), "0");
        assert_eq!(render((-42i64).into()).unwrap(), "-42");
        assert_eq!(render(true.into()).unwrap(), "TRUE");
        assert_eq!(render(false.into()).unwrap(), "FALSE");
    }
}
