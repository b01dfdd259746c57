//! Attribute parsing for Model derive macro.
//!
//! Handles parsing of struct-level and field-level `#[orm(...)]` attributes.

use heck::{ToKebabCase, ToLowerCamelCase, ToShoutySnakeCase, ToSnakeCase, ToUpperCamelCase};
use syn::{DeriveInput, LitStr, Result};

/// Field-name to column-name conversion for `#[orm(rename_all = "...")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum RenameRule {
    Lower,
    Upper,
    Camel,
    Pascal,
    Snake,
    ScreamingSnake,
    Kebab,
}

impl RenameRule {
    fn parse(lit: &LitStr) -> Result<Self> {
        Ok(match lit.value().as_str() {
            "lowercase" => RenameRule::Lower,
            "UPPERCASE" => RenameRule::Upper,
            "camelCase" => RenameRule::Camel,
            "PascalCase" => RenameRule::Pascal,
            "snake_case" => RenameRule::Snake,
            "SCREAMING_SNAKE_CASE" => RenameRule::ScreamingSnake,
            "kebab-case" => RenameRule::Kebab,
            other => {
                return Err(syn::Error::new_spanned(
                    lit,
                    format!("unknown rename_all rule \"{other}\""),
                ));
            }
        })
    }

    pub(super) fn apply(self, field: &str) -> String {
        match self {
            RenameRule::Lower => field.to_lowercase(),
            RenameRule::Upper => field.to_uppercase(),
            RenameRule::Camel => field.to_lower_camel_case(),
            RenameRule::Pascal => field.to_upper_camel_case(),
            RenameRule::Snake => field.to_snake_case(),
            RenameRule::ScreamingSnake => field.to_shouty_snake_case(),
            RenameRule::Kebab => field.to_kebab_case(),
        }
    }
}

/// Struct-level `#[orm(table = "...", rename_all = "...")]`.
#[derive(Default)]
pub(super) struct StructAttr {
    pub table: Option<String>,
    pub rename_all: Option<RenameRule>,
}

/// Field-level `#[orm(column = "...")]`, `#[orm(skip)]`, `#[orm(flatten)]`, `#[orm(id)]`.
#[derive(Default)]
pub(super) struct FieldAttr {
    pub column: Option<String>,
    pub skip: bool,
    pub flatten: bool,
    pub is_id: bool,
}

pub(super) fn parse_struct_attr(input: &DeriveInput) -> Result<StructAttr> {
    let mut out = StructAttr::default();
    for attr in &input.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("table") {
                let lit: LitStr = meta.value()?.parse()?;
                if lit.value().is_empty() {
                    return Err(meta.error("table name cannot be empty"));
                }
                out.table = Some(lit.value());
                Ok(())
            } else if meta.path.is_ident("rename_all") {
                let lit: LitStr = meta.value()?.parse()?;
                out.rename_all = Some(RenameRule::parse(&lit)?);
                Ok(())
            } else {
                Err(meta.error("unsupported orm attribute, expected `table` or `rename_all`"))
            }
        })?;
    }
    Ok(out)
}

pub(super) fn parse_field_attr(field: &syn::Field) -> Result<FieldAttr> {
    let mut out = FieldAttr::default();
    for attr in &field.attrs {
        if !attr.path().is_ident("orm") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("column") {
                let lit: LitStr = meta.value()?.parse()?;
                out.column = Some(lit.value());
            } else if meta.path.is_ident("skip") {
                out.skip = true;
            } else if meta.path.is_ident("flatten") {
                out.flatten = true;
            } else if meta.path.is_ident("id") {
                out.is_id = true;
            } else {
                return Err(meta.error(
                    "unsupported orm attribute, expected `column`, `skip`, `flatten` or `id`",
                ));
            }
            Ok(())
        })?;
    }

    if out.flatten && (out.column.is_some() || out.is_id) {
        return Err(syn::Error::new_spanned(
            field,
            "a flattened field cannot carry `column` or `id`",
        ));
    }
    if out.skip && out.is_id {
        return Err(syn::Error::new_spanned(
            field,
            "the primary key field cannot be skipped",
        ));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_rules() {
        assert_eq!(RenameRule::Camel.apply("full_name"), "fullName");
        assert_eq!(RenameRule::Pascal.apply("full_name"), "FullName");
        assert_eq!(RenameRule::Snake.apply("fullName"), "full_name");
        assert_eq!(RenameRule::ScreamingSnake.apply("full_name"), "FULL_NAME");
        assert_eq!(RenameRule::Kebab.apply("full_name"), "full-name");
        assert_eq!(RenameRule::Lower.apply("Full_Name"), "full_name");
    }

    #[test]
    fn parses_struct_attrs() {
        let input: DeriveInput = syn::parse_quote! {
            #[orm(table = "people", rename_all = "camelCase")]
            struct Person { id: i64 }
        };
        let attr = parse_struct_attr(&input).unwrap();
        assert_eq!(attr.table.as_deref(), Some("people"));
        assert_eq!(attr.rename_all, Some(RenameRule::Camel));
    }

    #[test]
    fn rejects_unknown_rule() {
        let input: DeriveInput = syn::parse_quote! {
            #[orm(rename_all = "Title Case")]
            struct Person { id: i64 }
        };
        assert!(parse_struct_attr(&input).is_err());
    }

    #[test]
    fn parses_field_attrs() {
        let field: syn::Field = syn::parse_quote! {
            #[orm(column = "nick", id)]
            nick_name: String
        };
        let attr = parse_field_attr(&field).unwrap();
        assert_eq!(attr.column.as_deref(), Some("nick"));
        assert!(attr.is_id);
        assert!(!attr.skip);
    }

    #[test]
    fn rejects_flatten_with_column() {
        let field: syn::Field = syn::parse_quote! {
            #[orm(flatten, column = "x")]
            base: Base
        };
        assert!(parse_field_attr(&field).is_err());
    }
}
