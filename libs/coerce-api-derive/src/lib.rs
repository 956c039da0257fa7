use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, GenericParam, Index, LitStr, parse_macro_input, parse_quote};

/// Derive macro exposing a struct as a `Value::Record`.
///
/// Generates `impl coerce_api::AsValue` whose record carries the struct name
/// and every field, in declaration order, each viewed through its own
/// `AsValue` impl. Records built this way take part in the structural
/// zero/empty checks and in introspection.
///
/// # Example
///
/// ```ignore
/// #[derive(AsValue)]
/// pub struct Endpoint {
///     pub host: String,
///     #[value(rename = "port_number")]
///     pub port: u16,
///     #[value(skip)]
///     pub cache: Vec<u8>,
/// }
/// ```
///
/// Tuple structs name their fields `"0"`, `"1"`, ... Type parameters get an
/// `AsValue` bound.
#[proc_macro_derive(AsValue, attributes(value))]
pub fn derive_as_value(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_impl(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn derive_impl(mut input: DeriveInput) -> Result<TokenStream, syn::Error> {
    let name = input.ident.clone();
    let name_str = name.to_string();

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &name,
            "AsValue can only be derived for structs",
        ));
    };

    let mut field_tokens = Vec::new();

    match &data.fields {
        Fields::Named(fields) => {
            for field in &fields.named {
                let Some(ident) = &field.ident else {
                    continue;
                };
                let Some(label) = field_label(&field.attrs, ident.to_string())? else {
                    continue;
                };
                field_tokens.push(quote! {
                    (#label, ::coerce_api::AsValue::as_value(&self.#ident))
                });
            }
        }
        Fields::Unnamed(fields) => {
            for (i, field) in fields.unnamed.iter().enumerate() {
                let Some(label) = field_label(&field.attrs, i.to_string())? else {
                    continue;
                };
                let index = Index::from(i);
                field_tokens.push(quote! {
                    (#label, ::coerce_api::AsValue::as_value(&self.#index))
                });
            }
        }
        Fields::Unit => {}
    }

    for param in &mut input.generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::coerce_api::AsValue));
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::coerce_api::AsValue for #name #ty_generics #where_clause {
            fn as_value(&self) -> ::coerce_api::Value<'_> {
                ::coerce_api::Value::Record {
                    name: #name_str,
                    fields: ::std::vec![
                        #(#field_tokens),*
                    ],
                }
            }
        }
    };

    Ok(expanded)
}

/// Read `#[value(...)]` on a field. `None` when the field is skipped.
fn field_label(attrs: &[syn::Attribute], default: String) -> Result<Option<String>, syn::Error> {
    let mut label = default;
    let mut skip = false;

    for attr in attrs {
        if !attr.path().is_ident("value") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                label = value.value();
                Ok(())
            } else if meta.path.is_ident("skip") {
                skip = true;
                Ok(())
            } else {
                Err(meta.error("unknown attribute (expected 'rename' or 'skip')"))
            }
        })?;
    }

    Ok(if skip { None } else { Some(label) })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(input: DeriveInput) -> String {
        derive_impl(input).unwrap().to_string()
    }

    #[test]
    fn named_fields_keep_order_and_renames() {
        let out = expand(parse_quote! {
            struct Endpoint {
                host: String,
                #[value(rename = "port_number")]
                port: u16,
                #[value(skip)]
                cache: Vec<u8>,
            }
        });
        let host = out.find("\"host\"").unwrap();
        let port = out.find("\"port_number\"").unwrap();
        assert!(host < port);
        assert!(!out.contains("cache"));
        assert!(out.contains("\"Endpoint\""));
    }

    #[test]
    fn type_parameters_get_as_value_bound() {
        let out = expand(parse_quote! {
            struct Wrapper<T>(T);
        });
        let compact: String = out.split_whitespace().collect();
        assert!(compact.contains("T:::coerce_api::AsValue"));
        assert!(out.contains("\"0\""));
    }

    #[test]
    fn enums_are_rejected() {
        let err = derive_impl(parse_quote! {
            enum Mode { A, B }
        })
        .unwrap_err();
        assert!(err.to_string().contains("only be derived for structs"));
    }

    #[test]
    fn unknown_field_attribute_is_an_error() {
        let err = derive_impl(parse_quote! {
            struct S {
                #[value(flatten)]
                inner: u8,
            }
        })
        .unwrap_err();
        assert!(err.to_string().contains("unknown attribute"));
    }
}
