//! Derive macros for shapehash.
//!
//! - `#[derive(HashAppend)]` with `#[hash_append(...)]` attributes
//! - `#[derive(WriteJson)]` / `#[derive(ReadJson)]` with `#[json(...)]`
//!
//! Container attributes, first match wins:
//!
//! ```ignore
//! #[hash_append(member = "method")]   // self.method(hash)
//! #[hash_append(with = "path::func")] // func(hash, self)
//! #[hash_append(sequence)]            // iterate &self
//! ```
//!
//! Without a hook, tuple and unit structs are products, structs with named
//! fields and data-carrying enums are plain data, and fieldless enums hash
//! their discriminant. A field can carry its own `with = "..."` hook.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod hash_append;
mod json;
mod resolve;

/// Derive `HashAppend`.
///
/// ```ignore
/// #[derive(HashAppend)]
/// struct Player {
///     name: String,
///     health: Ratio,
///     #[hash_append(with = "append_rounded")]
///     speed: f32,
/// }
/// ```
#[proc_macro_derive(HashAppend, attributes(hash_append))]
pub fn derive_hash_append(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    hash_append::expand(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive `WriteJson`.
///
/// `#[json(with = "module")]` calls `module::write_json(writer, &value)`;
/// `#[json(member = "method")]` calls `value.method(writer)`.
#[proc_macro_derive(WriteJson, attributes(json))]
pub fn derive_write_json(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    json::expand_write(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Derive `ReadJson`.
///
/// `#[json(with = "module")]` calls `module::read_json(reader)`. A `member`
/// hook cannot be read back and is rejected.
#[proc_macro_derive(ReadJson, attributes(json))]
pub fn derive_read_json(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    json::expand_read(input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
