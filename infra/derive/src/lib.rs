#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Atlas workspace: error enums, API models,
//! documented handlers and the runtime entry point.
//!
//! Examples below are `ignore`d because a proc-macro crate cannot use its own
//! macros; the consuming crates exercise them in their tests.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, ItemFn, ItemStruct, parse_macro_input};

/// Turns an `async fn main` into a blocking `fn main` running on an
/// `atlas_runtime` profile.
///
/// Accepted profiles: `high_performance`, `memory_efficient`, `default`
/// (also used when no argument is given). The function must return a `Result`.
///
/// ```rust,ignore
/// #[atlas_runtime::main(high_performance)]
/// async fn main() -> anyhow::Result<()> {
///     Ok(())
/// }
/// ```
#[proc_macro_attribute]
pub fn main(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::runtime::expand_main(args.into(), input).into()
}

/// Declares a JSON data transfer object.
///
/// * Derives `Debug`, `Serialize`, `Deserialize` and `utoipa::ToSchema` when missing.
/// * Applies `#[serde(rename_all = "camelCase")]` unless `rename_all = "..."` is given.
/// * Applies `#[serde(deny_unknown_fields)]` unless `deny_unknown_fields = false`.
///
/// ```rust,ignore
/// #[api_model(deny_unknown_fields = false)]
/// pub struct CountryPayload {
///     pub name: Option<String>,
/// }
/// ```
#[proc_macro_attribute]
pub fn api_model(attr: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemStruct);
    macros::api::expand_api_model(attr.into(), input).into()
}

/// Registers an axum handler with `utoipa::path`.
///
/// Arguments are passed through to `utoipa::path` unchanged.
///
/// ```rust,ignore
/// #[api_handler(
///     get,
///     path = "/health",
///     responses((status = OK, body = HealthResponse)),
///     tag = "System"
/// )]
/// pub async fn health_handler() -> impl IntoResponse { /* ... */ }
/// ```
#[proc_macro_attribute]
pub fn api_handler(args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as ItemFn);
    macros::api::expand_api_handler(args.into(), input).into()
}

/// Declares a crate error enum.
///
/// Generates, next to the enum:
/// * `#[derive(Debug, thiserror::Error)]` when missing;
/// * a `<Name>Ext` trait adding `.context(...)` to `Result<T, Name>` and to
///   `Result<T, Source>` for every variant wrapping a `source`;
/// * `From<Source>` for those variants;
/// * `From<&'static str>` and `From<String>` when an `Internal` variant exists;
/// * a private `format_context` helper for the `#[error(...)]` strings.
///
/// Every variant must use named fields. Variants carrying a source must also carry
/// `context: Option<Cow<'static, str>>`.
///
/// ```rust,ignore
/// #[atlas_error]
/// pub enum CacheError {
///     #[error("Serialization error{}: {source}", format_context(.context))]
///     Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal cache error{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
/// ```
#[proc_macro_attribute]
pub fn atlas_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
