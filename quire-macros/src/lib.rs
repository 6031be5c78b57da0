//! Procedural macros for Quire
//!
//! This crate provides the derive that turns a plain permission enum into a
//! closed, statically checked capability catalog.

use proc_macro::TokenStream;

mod permission_catalog;

/// Derive macro for permission catalogs
///
/// Generates `ALL`, `COUNT`, `index()`, `identifier()`, `domain()`,
/// `description()` and `from_identifier()` from `#[permission(...)]`
/// attributes on the enum's variants. The variant's doc comment becomes its
/// description.
///
/// Duplicate or malformed identifiers, explicit discriminants and catalogs
/// larger than 64 entries are rejected at compile time.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(PermissionCatalog)]
/// #[domain_type(Domain)]
/// enum Permission {
///     /// Write new posts
///     #[permission(id = "content:create", domain = Content)]
///     CreateContent,
///
///     /// Enter the administration area
///     #[permission(id = "system:admin_access", domain = System)]
///     AdminAccess,
/// }
/// ```
#[proc_macro_derive(PermissionCatalog, attributes(permission, domain_type))]
pub fn derive_permission_catalog(input: TokenStream) -> TokenStream {
    permission_catalog::derive_permission_catalog(input.into())
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}
