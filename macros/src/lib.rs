//! Derive macros for formbind
//!
//! This crate generates the per-record metadata and binding code that
//! `formbind-core` walks at runtime.
//!
//! # Available Macros
//!
//! - `#[derive(Bind)]` - Makes a struct bindable from a form or path source
//! - `#[derive(Structured)]` - Binds a nested record from one JSON value
//! - `#[derive(Param)]` - Routes a type through its own `DecodeParam` impl
//!
//! # Example
//!
//! ```ignore
//! use formbind_core::bind_form;
//! use formbind_macros::Bind;
//!
//! #[derive(Bind, Default)]
//! struct Filter {
//!     #[bind(form = "ids", collection_format = "csv")]
//!     pub ids: Vec<u64>,
//!
//!     #[bind(form = "since", time_format = "%Y-%m-%d", time_location = "Europe/Berlin")]
//!     pub since: chrono::DateTime<chrono::FixedOffset>,
//!
//!     #[bind(skip)]
//!     pub cached: Option<String>,
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod attrs;

use attrs::FieldAttrs;
use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Fields, parse_macro_input, parse_quote};

/// Derive macro for bindable records
///
/// Generates a `formbind_core::Bind` impl: a `const SHAPE` describing every
/// field and a `bind_fields` method that binds the `pub` ones in declaration
/// order. Fields without `pub` are recorded but never written.
///
/// # Attributes
///
/// - `#[bind(form = "name,default=value")]` - Tag in the `form` namespace
/// - `#[bind(uri = "name")]` - Tag in the `uri` namespace (any identifier
///   works as a namespace)
/// - `#[bind(skip)]` - Never bind this field
/// - `#[bind(flatten)]` - Bind the field's own fields from the same source
/// - `#[bind(time_format = "...")]` - `chrono` format or `unix`, `unixmilli`,
///   `unixmicro`, `unixnano`
/// - `#[bind(time_location = "Asia/Shanghai")]` - Zone for zone-less times
/// - `#[bind(time_utc)]` - Convert parsed times to UTC
/// - `#[bind(collection_format = "csv")]` - One of `multi`, `csv`, `ssv`,
///   `tsv`, `pipes`
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to an enum, a union or a struct without named fields
/// - `collection_format` names an unknown format
/// - A `flatten` field also carries a tag
/// - The same namespace is tagged twice on one field
///
/// # Example
///
/// ```ignore
/// #[derive(Bind, Default)]
/// struct Page {
///     #[bind(uri = "id")]
///     pub id: u64,
///
///     #[bind(form = "size,default=20")]
///     pub size: u32,
/// }
/// ```
#[proc_macro_derive(Bind, attributes(bind))]
pub fn derive_bind(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_bind(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand_bind(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "Bind can only be derived for structs",
        ));
    };
    let Fields::Named(fields) = &data.fields else {
        return Err(syn::Error::new_spanned(
            name,
            "Bind requires a struct with named fields",
        ));
    };

    let mut specs = Vec::with_capacity(fields.named.len());
    let mut bindings = Vec::new();

    for (index, field) in fields.named.iter().enumerate() {
        let Some(ident) = &field.ident else {
            continue;
        };
        let field_attrs = FieldAttrs::parse(&field.attrs)?;
        specs.push(attrs::field_spec(field, ident, &field_attrs));

        if !attrs::is_public(field) || field_attrs.skip {
            continue;
        }
        let bind_fn = if field_attrs.flatten {
            quote! { ::formbind_core::bind_flattened }
        } else {
            quote! { ::formbind_core::bind_field }
        };
        bindings.push(quote! {
            #bind_fn(&mut self.#ident, &Self::SHAPE.fields[#index], source, ctx)?;
        });
    }

    let record_name = name.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::formbind_core::Bind for #name #ty_generics #where_clause {
            const SHAPE: ::formbind_core::RecordShape = ::formbind_core::RecordShape {
                name: #record_name,
                fields: &[#(#specs),*],
            };

            #[allow(unused_variables)]
            fn bind_fields(
                &mut self,
                source: &::formbind_core::Source,
                ctx: &::formbind_core::BindContext<'_>,
            ) -> ::core::result::Result<(), ::formbind_core::BindError> {
                #(#bindings)*
                ::core::result::Result::Ok(())
            }
        }
    })
}

/// Derive macro for nested records bound from structured text
///
/// The first source value is decoded as JSON with `serde` and replaces the
/// whole record. The type must also implement `serde::Deserialize`.
///
/// # Example
///
/// ```ignore
/// #[derive(Structured, Deserialize, Default)]
/// struct Address {
///     city: String,
///     zip: String,
/// }
///
/// #[derive(Bind, Default)]
/// struct Signup {
///     #[bind(form = "address")]
///     pub address: Address,
/// }
/// ```
#[proc_macro_derive(Structured)]
pub fn derive_structured(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let mut generics = input.generics.clone();
    if !generics.params.is_empty() {
        generics
            .make_where_clause()
            .predicates
            .push(parse_quote!(Self: ::formbind_core::__private::DeserializeOwned));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::formbind_core::Coerce for #name #ty_generics #where_clause {
            fn coerce(
                &mut self,
                values: &[::std::string::String],
                field: &::formbind_core::Field<'_>,
            ) -> ::core::result::Result<(), ::formbind_core::BindError> {
                ::formbind_core::coerce::decode_structured(self, values, field)
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for types with a custom parameter decoder
///
/// The type implements `formbind_core::DecodeParam` by hand; the derive makes
/// the binder hand it the first source value instead of applying any generic
/// rule, including inside `Option`, `Box`, `Vec` and arrays.
///
/// # Example
///
/// ```ignore
/// #[derive(Param, Default)]
/// struct Hex(i64);
///
/// impl DecodeParam for Hex {
///     fn decode_param(&mut self, param: &str) -> Result<(), ParamError> {
///         self.0 = i64::from_str_radix(param, 16)?;
///         Ok(())
///     }
/// }
/// ```
#[proc_macro_derive(Param)]
pub fn derive_param(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::formbind_core::Coerce for #name #ty_generics #where_clause {
            fn param_decoder(
                &mut self,
            ) -> ::core::option::Option<&mut dyn ::formbind_core::DecodeParam> {
                ::core::option::Option::Some(self)
            }

            fn coerce(
                &mut self,
                values: &[::std::string::String],
                field: &::formbind_core::Field<'_>,
            ) -> ::core::result::Result<(), ::formbind_core::BindError> {
                ::formbind_core::param::decode_first(self, values, field)
            }
        }
    };

    TokenStream::from(expanded)
}
