//! Derive macros for sqlweave
//!
//! Provides `#[derive(Model)]`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod model;

/// Derive `Model` metadata for a struct.
///
/// # Example
///
/// ```ignore
/// use sqlweave::Model;
///
/// #[derive(Model)]
/// #[orm(table = "Person", rename_all = "camelCase")]
/// struct Person {
///     #[orm(flatten)]
///     base: BaseModel,
///     full_name: String,
///     #[orm(column = "nick")]
///     nick_name: Option<String>,
///     #[orm(skip)]
///     age: i32,
/// }
/// ```
///
/// # Generated
///
/// - `fn table_name() -> &'static str` - Table name
/// - `fn fields() -> &'static [FieldDescriptor]` - Columns in declaration order
/// - `FieldDescriptor::Id` for the `#[orm(id)]` field, found through `#[orm(flatten)]` too
///
/// # Attributes
///
/// - `#[orm(table = "name")]` - Table name (default: the struct name)
/// - `#[orm(rename_all = "camelCase")]` - Derive column names from field names
///   (`lowercase`, `UPPERCASE`, `camelCase`, `PascalCase`, `snake_case`,
///   `SCREAMING_SNAKE_CASE`, `kebab-case`)
/// - `#[orm(column = "name")]` - Map field to a different column name
/// - `#[orm(id)]` - Mark field as primary key
/// - `#[orm(skip)]` - Leave the field out of the table
/// - `#[orm(flatten)]` - Inline the columns of an embedded `Model`
#[proc_macro_derive(Model, attributes(orm))]
pub fn derive_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    model::expand(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
