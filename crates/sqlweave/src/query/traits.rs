//! Trait definitions for statement builders.

use crate::error::BuildResult;

/// A builder that renders one SQL statement.
pub trait Statement {
    /// Statement keyword, used in log output.
    const KIND: &'static str;

    /// Render the statement.
    ///
    /// Building does not consume or alter the builder; calling it twice yields the
    /// same text.
    fn build(&self) -> BuildResult<String>;

    /// Debug helper: the SQL text, or the error message.
    fn to_sql(&self) -> String {
        match self.build() {
            Ok(sql) => sql,
            Err(e) => format!("<invalid {}: {e}>", Self::KIND),
        }
    }
}
