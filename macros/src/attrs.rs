//! Parsing of `#[bind(...)]` field attributes.
//!
//! Reserved keys are `skip`, `flatten`, `time_format`, `time_location`,
//! `time_utc` and `collection_format`. Any other `key = "..."` pair declares
//! the field's tag in the `key` namespace.

use proc_macro2::TokenStream;
use quote::quote;
use syn::ext::IdentExt;
use syn::{Attribute, Field, Ident, LitStr, Token, Visibility};

/// Everything `#[bind(...)]` can say about one field.
#[derive(Default)]
pub struct FieldAttrs {
    pub skip: bool,
    pub flatten: bool,
    pub tags: Vec<(String, LitStr)>,
    pub time_format: Option<LitStr>,
    pub time_location: Option<LitStr>,
    pub time_utc: bool,
    pub collection: Option<Ident>,
}

impl FieldAttrs {
    pub fn parse(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut parsed = Self::default();

        for attr in attrs.iter().filter(|attr| attr.path().is_ident("bind")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("skip") {
                    parsed.skip = true;
                    return Ok(());
                }
                if meta.path.is_ident("flatten") {
                    parsed.flatten = true;
                    return Ok(());
                }
                if meta.path.is_ident("time_utc") {
                    // Presence is what counts; a value is accepted and ignored.
                    if meta.input.peek(Token![=]) {
                        let _: syn::Lit = meta.value()?.parse()?;
                    }
                    parsed.time_utc = true;
                    return Ok(());
                }
                if meta.path.is_ident("time_format") {
                    parsed.time_format = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if meta.path.is_ident("time_location") {
                    parsed.time_location = Some(meta.value()?.parse()?);
                    return Ok(());
                }
                if meta.path.is_ident("collection_format") {
                    let format: LitStr = meta.value()?.parse()?;
                    parsed.collection = Some(collection_variant(&format)?);
                    return Ok(());
                }

                let Some(namespace) = meta.path.get_ident() else {
                    return Err(meta.error("expected a tag namespace such as `form` or `uri`"));
                };
                let namespace = namespace.unraw().to_string();
                let tag: LitStr = meta.value()?.parse()?;
                if parsed.tags.iter().any(|(existing, _)| *existing == namespace) {
                    return Err(syn::Error::new(
                        tag.span(),
                        format!("duplicate `{namespace}` tag"),
                    ));
                }
                parsed.tags.push((namespace, tag));
                Ok(())
            })?;
        }

        if parsed.flatten {
            if let Some((_, tag)) = parsed.tags.first() {
                return Err(syn::Error::new(
                    tag.span(),
                    "`flatten` fields are bound through their own fields and take no tag",
                ));
            }
        }

        Ok(parsed)
    }

    fn has_time_directives(&self) -> bool {
        self.time_format.is_some() || self.time_location.is_some() || self.time_utc
    }
}

fn collection_variant(format: &LitStr) -> syn::Result<Ident> {
    let variant = match format.value().as_str() {
        "multi" => "Multi",
        "csv" => "Csv",
        "ssv" => "Ssv",
        "tsv" => "Tsv",
        "pipes" => "Pipes",
        other => {
            return Err(syn::Error::new(
                format.span(),
                format!("unsupported collection_format `{other}` (expected multi, csv, ssv, tsv or pipes)"),
            ));
        }
    };
    Ok(Ident::new(variant, format.span()))
}

pub fn is_public(field: &Field) -> bool {
    matches!(field.vis, Visibility::Public(_))
}

/// `FieldSpec` builder expression for one field.
pub fn field_spec(field: &Field, ident: &Ident, attrs: &FieldAttrs) -> TokenStream {
    let name = ident.unraw().to_string();
    let mut spec = quote! { ::formbind_core::FieldSpec::new(#name) };

    if is_public(field) {
        spec.extend(quote! { .exported() });
    }
    if attrs.skip {
        spec.extend(quote! { .skipped() });
    }
    if attrs.flatten {
        spec.extend(quote! { .flattened() });
    }
    if !attrs.tags.is_empty() {
        let namespaces = attrs.tags.iter().map(|(namespace, _)| namespace);
        let tags = attrs.tags.iter().map(|(_, tag)| tag);
        spec.extend(quote! { .with_tags(&[#((#namespaces, #tags)),*]) });
    }
    if attrs.has_time_directives() {
        let format = optional(attrs.time_format.as_ref());
        let location = optional(attrs.time_location.as_ref());
        let utc = attrs.time_utc;
        spec.extend(quote! {
            .with_time(::formbind_core::TimeDirectives {
                format: #format,
                location: #location,
                utc: #utc,
            })
        });
    }
    if let Some(variant) = &attrs.collection {
        spec.extend(quote! { .with_collection(::formbind_core::CollectionFormat::#variant) });
    }

    spec
}

fn optional(lit: Option<&LitStr>) -> TokenStream {
    match lit {
        Some(lit) => quote! { ::core::option::Option::Some(#lit) },
        None => quote! { ::core::option::Option::None },
    }
}
