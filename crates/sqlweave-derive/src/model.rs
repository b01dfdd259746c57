//! Model derive macro implementation
//!
//! Generates an `impl ::sqlweave::Model` whose field descriptor table lists the
//! struct's columns in declaration order. Flattened fields point at the nested
//! type's own table and are expanded when the schema is built, primary key marker
//! included.

mod attrs;

use attrs::{parse_field_attr, parse_struct_attr};
use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Data, DeriveInput, Fields, Result};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Model can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Model can only be derived for structs",
            ));
        }
    };

    let struct_attr = parse_struct_attr(&input)?;
    let table_name = struct_attr.table.unwrap_or_else(|| name.unraw().to_string());

    let mut descriptors = Vec::with_capacity(fields.len());
    let mut has_id = false;

    for field in fields {
        let attr = parse_field_attr(field)?;
        if attr.skip {
            continue;
        }

        if attr.flatten {
            let ty = &field.ty;
            descriptors.push(quote! {
                ::sqlweave::FieldDescriptor::Flatten(<#ty as ::sqlweave::Model>::fields)
            });
            continue;
        }

        let field_name = match &field.ident {
            Some(ident) => ident.unraw().to_string(),
            None => {
                return Err(syn::Error::new_spanned(field, "field has no name"));
            }
        };
        let column = match attr.column {
            Some(c) => c,
            None => match struct_attr.rename_all {
                Some(rule) => rule.apply(&field_name),
                None => field_name,
            },
        };
        if column.is_empty() {
            return Err(syn::Error::new_spanned(field, "column name cannot be empty"));
        }

        if attr.is_id {
            if has_id {
                return Err(syn::Error::new_spanned(
                    field,
                    "only one field can be marked #[orm(id)]",
                ));
            }
            has_id = true;
            descriptors.push(quote! {
                ::sqlweave::FieldDescriptor::Id(#column)
            });
        } else {
            descriptors.push(quote! {
                ::sqlweave::FieldDescriptor::Column(#column)
            });
        }
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::sqlweave::Model for #name #ty_generics #where_clause {
            fn table_name() -> &'static str {
                #table_name
            }

            fn fields() -> &'static [::sqlweave::FieldDescriptor] {
                const FIELDS: &[::sqlweave::FieldDescriptor] = &[#(#descriptors),*];
                FIELDS
            }
        }
    })
}
