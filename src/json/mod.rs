//! JSON front end.
//!
//! The same structural view used for hashing drives a JSON encoding:
//! products with named members become objects, tuples and sequences
//! become arrays, fieldless enums become strings. Derive [`WriteJson`] and
//! [`ReadJson`] to opt a type in, using `#[json(...)]` attributes the same
//! way `#[hash_append(...)]` customizes hashing.
//!
//! # Example
//!
//! ```
//! use shapehash::json;
//!
//! let pairs = vec![(1u8, "one".to_string()), (2, "two".to_string())];
//! let text = json::to_string(&pairs).unwrap();
//! assert_eq!(text, r#"[[1,"one"],[2,"two"]]"#);
//!
//! let back: Vec<(u8, String)> = json::from_str(&text).unwrap();
//! assert_eq!(back, pairs);
//! ```

mod config;
mod read;
mod write;

use std::fmt::Write;

pub use config::{DEFAULT_MAX_DEPTH, ReadConfig, WriteConfig};
pub use read::{ArrayReader, JsonReader, ReadJson};
pub use write::{ArrayWriter, JsonWriter, ObjectWriter, WriteJson};

pub use crate::error::{JsonError, JsonResult, Position};

#[cfg(feature = "derive")]
pub use shapehash_macros::{ReadJson, WriteJson};

/// Write `value` as compact JSON.
pub fn to_string<T: WriteJson + ?Sized>(value: &T) -> JsonResult<String> {
    to_string_with(value, WriteConfig::COMPACT)
}

/// Write `value` as indented JSON.
pub fn to_string_pretty<T: WriteJson + ?Sized>(value: &T) -> JsonResult<String> {
    to_string_with(value, WriteConfig::PRETTY)
}

/// Write `value` with an explicit configuration.
pub fn to_string_with<T: WriteJson + ?Sized>(value: &T, config: WriteConfig) -> JsonResult<String> {
    let mut out = String::new();
    write_to(&mut out, value, config)?;
    Ok(out)
}

/// Write `value` to any `fmt::Write` sink.
pub fn write_to<W, T>(out: &mut W, value: &T, config: WriteConfig) -> JsonResult<()>
where
    W: Write,
    T: WriteJson + ?Sized,
{
    log::trace!(
        "writing {} as json (pretty: {})",
        std::any::type_name::<T>(),
        config.pretty
    );
    JsonWriter::with_config(out, config).write(value)
}

/// Read a `T` from JSON text, rejecting unknown members.
pub fn from_str<T: ReadJson>(input: &str) -> JsonResult<T> {
    from_str_with(input, ReadConfig::STRICT)
}

/// Read a `T` from JSON text with an explicit configuration.
///
/// The whole input must be consumed; trailing non-whitespace is an error.
pub fn from_str_with<T: ReadJson>(input: &str, config: ReadConfig) -> JsonResult<T> {
    log::trace!(
        "reading {} from {} bytes of json",
        std::any::type_name::<T>(),
        input.len()
    );
    let mut reader = JsonReader::with_config(input, config);
    let value = reader.read()?;
    reader.end()?;
    Ok(value)
}
