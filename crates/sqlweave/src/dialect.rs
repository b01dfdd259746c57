//! SQL dialect support.
//!
//! The query engine never hardcodes a quote character: every identifier goes
//! through a [`Dialect`]. Two dialects ship with the crate, [`Postgres`] (double
//! quotes) and [`MySql`] (backticks).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::ident;

/// Trait for SQL dialect-specific behavior.
pub trait Dialect: fmt::Debug + Send + Sync {
    /// Returns the name of the dialect.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// Returns the positional placeholder.
    fn placeholder(&self) -> &'static str {
        "?"
    }

    /// Returns whether the dialect supports `INSERT ... RETURNING`.
    fn supports_returning(&self) -> bool {
        false
    }

    /// Quotes an identifier, escaping embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        ident::quoted(name, self.quote_char())
    }

    /// Appends a quoted identifier to `out`.
    fn write_identifier(&self, out: &mut String, name: &str) {
        ident::write_quoted(out, name, self.quote_char());
    }
}

/// PostgreSQL: `"identifier"`, `?` placeholders (rebound by the driver layer).
#[derive(Debug, Clone, Copy, Default)]
pub struct Postgres;

impl Dialect for Postgres {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn supports_returning(&self) -> bool {
        true
    }
}

/// MySQL: `` `identifier` ``, `?` placeholders.
#[derive(Debug, Clone, Copy, Default)]
pub struct MySql;

impl Dialect for MySql {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_char(&self) -> char {
        '`'
    }
}

/// Built-in dialect selector, usable from configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    #[default]
    Postgres,
    #[serde(alias = "mariadb")]
    Mysql,
}

impl DialectKind {
    /// Instantiate the dialect.
    pub fn dialect(self) -> Arc<dyn Dialect> {
        match self {
            DialectKind::Postgres => Arc::new(Postgres),
            DialectKind::Mysql => Arc::new(MySql),
        }
    }
}

pub(crate) fn default_dialect() -> Arc<dyn Dialect> {
    Arc::new(Postgres)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn postgres_quotes_with_double_quotes() {
        assert_eq!(Postgres.quote_identifier("Person"), r#""Person""#);
        assert!(Postgres.supports_returning());
    }

    #[test]
    fn mysql_quotes_with_backticks() {
        assert_eq!(MySql.quote_identifier("Person"), "`Person`");
        assert!(!MySql.supports_returning());
    }

    #[test]
    fn kind_builds_matching_dialect() {
        assert_eq!(DialectKind::Mysql.dialect().name(), "mysql");
        assert_eq!(DialectKind::default().dialect().name(), "postgres");
    }
}
