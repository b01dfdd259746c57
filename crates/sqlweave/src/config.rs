use serde::{Deserialize, Serialize};

use crate::dialect::DialectKind;
use crate::query::VariableFormat;

/// Statement rendering settings shared by every builder.
///
/// Deserializes from configuration files:
///
/// ```toml
/// dialect = "mysql"
/// variable_format = "positional"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryConfig {
    /// SQL dialect used for quoting. Default: Postgres.
    pub dialect: DialectKind,
    /// Placeholder style for INSERT, UPDATE and DELETE. `None` keeps each
    /// statement's default (named for INSERT and UPDATE, positional for DELETE).
    pub variable_format: Option<VariableFormat>,
}

impl QueryConfig {
    /// Create a new configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the dialect.
    pub fn with_dialect(mut self, dialect: DialectKind) -> Self {
        self.dialect = dialect;
        self
    }

    /// Force one placeholder style on every mutation statement.
    pub fn with_variable_format(mut self, format: VariableFormat) -> Self {
        self.variable_format = Some(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = QueryConfig::new();
        assert_eq!(c.dialect, DialectKind::Postgres);
        assert_eq!(c.variable_format, None);
    }

    #[test]
    fn deserializes_from_json() {
        let c: QueryConfig =
            serde_json::from_str(r#"{"dialect":"mariadb","variable_format":"named"}"#).unwrap();
        assert_eq!(c.dialect, DialectKind::Mysql);
        assert_eq!(c.variable_format, Some(VariableFormat::Named));

        let c: QueryConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(c, QueryConfig::default());
    }

    #[test]
    fn builder_methods() {
        let c = QueryConfig::new()
            .with_dialect(DialectKind::Mysql)
            .with_variable_format(VariableFormat::Positional);
        assert_eq!(c.dialect.dialect().name(), "mysql");
        assert_eq!(c.variable_format, Some(VariableFormat::Positional));
    }
}
