//! PermissionCatalog derive implementation
//!
//! Turns a fieldless enum annotated with `#[permission(...)]` attributes into a
//! closed catalog: enumeration, stable identifiers, domains and bit indexes.

use proc_macro2::TokenStream;
use quote::quote;
use std::collections::HashSet;
use syn::{parse2, Attribute, Data, DeriveInput, Error, Expr, Fields, Lit, LitStr, Meta, Result};

/// Bitsets over the catalog are `u64`, so a catalog cannot grow past this.
const MAX_VARIANTS: usize = 64;

struct Entry {
    ident: syn::Ident,
    identifier: LitStr,
    domain: syn::Ident,
    description: String,
}

pub fn derive_permission_catalog(input: TokenStream) -> Result<TokenStream> {
    let input: DeriveInput = parse2(input)?;
    let name = &input.ident;
    let domain_type = extract_domain_type(&input)?;

    let Data::Enum(data_enum) = &input.data else {
        return Err(Error::new_spanned(&input, "PermissionCatalog can only be derived for enums"));
    };

    if data_enum.variants.is_empty() {
        return Err(Error::new_spanned(&input, "PermissionCatalog needs at least one permission"));
    }
    if data_enum.variants.len() > MAX_VARIANTS {
        return Err(Error::new_spanned(
            &input,
            format!("PermissionCatalog supports at most {} permissions", MAX_VARIANTS),
        ));
    }

    let mut entries = Vec::with_capacity(data_enum.variants.len());
    let mut seen = HashSet::new();

    for variant in &data_enum.variants {
        if !matches!(variant.fields, Fields::Unit) {
            return Err(Error::new_spanned(
                variant,
                "PermissionCatalog only supports unit variants (no fields)",
            ));
        }
        if let Some((_, discriminant)) = &variant.discriminant {
            return Err(Error::new_spanned(
                discriminant,
                "PermissionCatalog assigns bit indexes itself; remove the explicit discriminant",
            ));
        }

        let (identifier, domain) = extract_permission(variant)?;
        validate_identifier(&identifier)?;
        if !seen.insert(identifier.value()) {
            return Err(Error::new_spanned(
                &identifier,
                format!("duplicate permission identifier `{}`", identifier.value()),
            ));
        }

        let description =
            extract_doc(&variant.attrs).unwrap_or_else(|| identifier.value());

        entries.push(Entry { ident: variant.ident.clone(), identifier, domain, description });
    }

    let count = entries.len();
    let all = entries.iter().map(|e| {
        let ident = &e.ident;
        quote! { #name::#ident }
    });
    let index_arms = entries.iter().enumerate().map(|(i, e)| {
        let ident = &e.ident;
        let i = i as u32;
        quote! { #name::#ident => #i, }
    });
    let identifier_arms = entries.iter().map(|e| {
        let ident = &e.ident;
        let id = &e.identifier;
        quote! { #name::#ident => #id, }
    });
    let domain_arms = entries.iter().map(|e| {
        let ident = &e.ident;
        let domain = &e.domain;
        quote! { #name::#ident => #domain_type::#domain, }
    });
    let description_arms = entries.iter().map(|e| {
        let ident = &e.ident;
        let description = &e.description;
        quote! { #name::#ident => #description, }
    });
    let parse_arms = entries.iter().map(|e| {
        let ident = &e.ident;
        let id = &e.identifier;
        quote! { #id => ::core::option::Option::Some(#name::#ident), }
    });

    Ok(quote! {
        impl #name {
            /// Every permission in the catalog, in declaration order.
            pub const ALL: &'static [#name] = &[#(#all),*];

            /// Number of permissions in the catalog.
            pub const COUNT: usize = #count;

            /// Position of this permission in [`Self::ALL`]; doubles as its bit index.
            pub const fn index(&self) -> u32 {
                match self {
                    #(#index_arms)*
                }
            }

            /// Stable `domain:action` identifier.
            pub const fn identifier(&self) -> &'static str {
                match self {
                    #(#identifier_arms)*
                }
            }

            /// Domain this permission is grouped under.
            pub const fn domain(&self) -> #domain_type {
                match self {
                    #(#domain_arms)*
                }
            }

            /// Human-readable description taken from the variant's doc comment.
            pub const fn description(&self) -> &'static str {
                match self {
                    #(#description_arms)*
                }
            }

            /// Look up a permission by its identifier.
            pub fn from_identifier(identifier: &str) -> ::core::option::Option<Self> {
                match identifier {
                    #(#parse_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}

/// Extract `#[domain_type(Path)]` from the enum, defaulting to `Domain`.
fn extract_domain_type(input: &DeriveInput) -> Result<syn::Path> {
    for attr in &input.attrs {
        if attr.path().is_ident("domain_type") {
            return attr.parse_args::<syn::Path>();
        }
    }
    syn::parse_str("Domain")
}

/// Extract `#[permission(id = "...", domain = Variant)]` from a variant.
fn extract_permission(variant: &syn::Variant) -> Result<(LitStr, syn::Ident)> {
    let mut identifier: Option<LitStr> = None;
    let mut domain: Option<syn::Ident> = None;

    for attr in &variant.attrs {
        if !attr.path().is_ident("permission") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("id") {
                identifier = Some(meta.value()?.parse()?);
                Ok(())
            } else if meta.path.is_ident("domain") {
                domain = Some(meta.value()?.parse()?);
                Ok(())
            } else {
                Err(meta.error("expected `id = \"...\"` or `domain = Variant`"))
            }
        })?;
    }

    match (identifier, domain) {
        (Some(identifier), Some(domain)) => Ok((identifier, domain)),
        _ => Err(Error::new_spanned(
            variant,
            "every permission needs #[permission(id = \"domain:action\", domain = Variant)]",
        )),
    }
}

/// Identifiers are `domain:action`, lowercase ASCII letters and underscores.
fn validate_identifier(identifier: &LitStr) -> Result<()> {
    let value = identifier.value();
    let valid_part = |part: &str| {
        part.starts_with(|c: char| c.is_ascii_lowercase())
            && part.chars().all(|c| c.is_ascii_lowercase() || c == '_')
    };

    match value.split_once(':') {
        Some((domain, action)) if valid_part(domain) && valid_part(action) => Ok(()),
        _ => Err(Error::new_spanned(
            identifier,
            format!("permission identifier `{}` must look like `domain:action`", value),
        )),
    }
}

/// First non-empty doc line of a variant.
fn extract_doc(attrs: &[Attribute]) -> Option<String> {
    attrs.iter().filter(|attr| attr.path().is_ident("doc")).find_map(|attr| {
        let Meta::NameValue(meta) = &attr.meta else {
            return None;
        };
        let Expr::Lit(expr) = &meta.value else {
            return None;
        };
        let Lit::Str(doc) = &expr.lit else {
            return None;
        };
        let line = doc.value().trim().to_string();
        (!line.is_empty()).then_some(line)
    })
}
