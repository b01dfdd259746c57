//! SQL identifier handling.
//!
//! Table names, column names and aliases are always emitted quoted, so any
//! character is allowed except NUL. The dialect's quote character is escaped by
//! doubling it (`"a""b"` / `` `a``b` ``).

use crate::error::{BuildError, BuildResult};

/// Validate a table, column or alias name before it is stored in a schema.
pub(crate) fn validate(kind: &str, name: &str) -> BuildResult<()> {
    if name.is_empty() {
        return Err(BuildError::InvalidIdentifier(format!("empty {kind} name")));
    }
    if name.contains('\0') {
        return Err(BuildError::InvalidIdentifier(format!(
            "{kind} name cannot contain NUL character"
        )));
    }
    Ok(())
}

/// Append `name` wrapped in `quote`, doubling embedded quote characters.
pub(crate) fn write_quoted(out: &mut String, name: &str, quote: char) {
    out.reserve(name.len() + 2);
    out.push(quote);
    for ch in name.chars() {
        if ch == quote {
            out.push(quote);
        }
        out.push(ch);
    }
    out.push(quote);
}

/// Quote `name` with `quote` into a new string.
pub(crate) fn quoted(name: &str, quote: char) -> String {
    let mut out = String::with_capacity(name.len() + 2);
    write_quoted(&mut out, name, quote);
    out
}
