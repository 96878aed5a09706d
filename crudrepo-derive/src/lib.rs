//! Derive macros for `crudrepo`.
//!
//! - [`Fields`](macro@Fields) declares the attribute names a type exposes, which
//!   the repository builder compares against the entity's columns.
//! - [`ToActiveModel`](macro@ToActiveModel) converts a complete value (domain or
//!   create input) into a Sea-ORM active model, every field `Set`.
//! - [`Patch`](macro@Patch) converts a partial value whose fields are all
//!   `Option<_>`; only `Some` fields are `Set`.
//!
//! ```rust,ignore
//! #[derive(Fields, ToActiveModel)]
//! #[repo(active_model = "super::user::ActiveModel")]
//! pub struct NewUser {
//!     pub name: String,
//!     pub email: String,
//! }
//!
//! #[derive(Fields, Patch)]
//! #[repo(active_model = "super::user::ActiveModel")]
//! pub struct UserPatch {
//!     pub name: Option<String>,
//!     pub bio: Option<Option<String>>,
//! }
//! ```

mod attribute_parser;
mod codegen;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Implements `crudrepo::Fields` from the struct's named fields.
///
/// Field attributes:
/// - `#[repo(skip)]` leaves the field out of the list
/// - `#[repo(rename = "column")]` lists the field under another name; the
///   active model derives assign that active model field
#[proc_macro_derive(Fields, attributes(repo))]
pub fn derive_fields(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    codegen::fields_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Implements `sea_orm::IntoActiveModel` setting every non-skipped field.
///
/// Columns the struct does not name keep what `ActiveModelBehavior::new`
/// gives them, usually `NotSet` so database defaults apply on insert.
#[proc_macro_derive(ToActiveModel, attributes(repo))]
pub fn derive_to_active_model(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    codegen::to_active_model_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Implements `sea_orm::IntoActiveModel` for a partial update.
///
/// Every non-skipped field must be an `Option`; `None` leaves the column
/// `NotSet`. The model starts all `NotSet`, so values that
/// `ActiveModelBehavior::new` assigns never reach a patch. Nullable columns take `Option<Option<T>>` so that `Some(None)`
/// writes `NULL`.
#[proc_macro_derive(Patch, attributes(repo))]
pub fn derive_patch(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    codegen::patch_impl(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
