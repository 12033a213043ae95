#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Zelopack workspace: error enums, API data
//! models, API handlers and feature slice handles.
//!
//! Examples below are `ignore`d because they only compile inside consuming crates.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Defines a crate-level error enum.
///
/// # Generated items
///
/// * `#[derive(Debug, thiserror::Error)]` unless already present.
/// * `Result<T, E = ErrorName>` alias in the same module.
/// * `<ErrorName>Ext` trait adding `.context(...)` to `Result<T, ErrorName>` and to
///   `Result<T, Source>` for every variant that wraps a `source`.
/// * `From<Source>` for those variants, so `?` converts upstream errors.
/// * `From<&'static str>` / `From<String>` when an `Internal` variant exists.
/// * a private `format_context` helper for use inside `#[error(...)]` strings.
///
/// # Requirements
///
/// Variants use named fields. A variant with a `source` must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// # Example
///
/// ```rust,ignore
/// use std::borrow::Cow;
///
/// #[zelo_derive::zelo_error]
/// pub enum FactorError {
///     #[error("I/O failure{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal factor error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn read(path: &str) -> Result<String> {
///     std::fs::read_to_string(path).context("reading factor overrides")
/// }
/// ```
#[proc_macro_attribute]
pub fn zelo_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}

/// Defines an API data transfer object.
///
/// Adds `Debug`, `Serialize`, `Deserialize` when missing, `utoipa::ToSchema` behind the
/// `server` feature, `rename_all = "camelCase"` and `deny_unknown_fields`.
///
/// # Arguments
///
/// * `rename_all = "..."` overrides the serde rename policy.
/// * `deny_unknown_fields = false` disables strict field checking.
///
/// ```rust,ignore
/// #[zelo_derive::api_model(deny_unknown_fields = false)]
/// pub struct CatalogQuery {
///     pub q: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Wraps an Axum handler and registers it with `utoipa::path` under the `server` feature.
///
/// ```rust,ignore
/// #[zelo_derive::api_handler(get, path = "/health", responses((status = OK)), tag = "System")]
/// pub async fn health_handler() -> &'static str {
///     "up"
/// }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Turns a struct into a feature slice handle.
///
/// The fields move into a generated `<Name>Inner` struct; `<Name>` becomes a cheap
/// `Arc` clone that derefs to it and implements `FeatureSlice` for kernel registration.
///
/// ```rust,ignore
/// #[zelo_derive::zelo_slice]
/// pub struct Calculators {
///     pub factors: FactorStore,
/// }
///
/// let slice = Calculators::new(CalculatorsInner { factors });
/// ```
///
/// `#[zelo_slice(status = method)]` reports the slice's health through an inherent
/// `fn method(&self) -> SliceStatus` instead of the always-ready default.
#[proc_macro_attribute]
pub fn zelo_slice(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::slice::expand_slice(attr.into(), input).into()
}
