//! JSON output.
//!
//! [`JsonWriter`] is the output sink every [`WriteJson`] impl writes to.
//! Composite values are written through [`ObjectWriter`] and
//! [`ArrayWriter`], which take care of separators and indentation.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::fmt::{self, Write};
use std::rc::Rc;
use std::sync::Arc;

use compact_str::CompactString;

use super::config::WriteConfig;
use crate::error::{JsonError, JsonResult};

/// A type that can write itself as JSON.
pub trait WriteJson {
    /// Write `self` to `writer`.
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()>;
}

// =============================================================================
// JsonWriter
// =============================================================================

/// JSON output sink over any `fmt::Write`.
pub struct JsonWriter<'w, W: Write> {
    out: &'w mut W,
    config: WriteConfig,
    depth: usize,
}

impl<'w, W: Write> JsonWriter<'w, W> {
    /// Compact writer.
    pub fn new(out: &'w mut W) -> Self {
        Self::with_config(out, WriteConfig::COMPACT)
    }

    /// Writer with explicit configuration.
    pub fn with_config(out: &'w mut W, config: WriteConfig) -> Self {
        Self {
            out,
            config,
            depth: 0,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> WriteConfig {
        self.config
    }

    /// Write any value.
    #[inline]
    pub fn write<T: WriteJson + ?Sized>(&mut self, value: &T) -> JsonResult<()> {
        value.write_json(self)
    }

    /// Write `null`.
    pub fn write_null(&mut self) -> JsonResult<()> {
        Ok(self.out.write_str("null")?)
    }

    /// Write `true` or `false`.
    pub fn write_bool(&mut self, value: bool) -> JsonResult<()> {
        Ok(self.out.write_str(if value { "true" } else { "false" })?)
    }

    /// Write an integer.
    pub fn write_integer<I: fmt::Display>(&mut self, value: I) -> JsonResult<()> {
        Ok(write!(self.out, "{value}")?)
    }

    /// Write a finite `f64`.
    pub fn write_f64(&mut self, value: f64) -> JsonResult<()> {
        if !value.is_finite() {
            return Err(JsonError::NonFinite(value));
        }
        Ok(write!(self.out, "{value}")?)
    }

    /// Write a finite `f32` with its own shortest representation.
    pub fn write_f32(&mut self, value: f32) -> JsonResult<()> {
        if !value.is_finite() {
            return Err(JsonError::NonFinite(value.into()));
        }
        Ok(write!(self.out, "{value}")?)
    }

    /// Write a quoted, escaped string.
    pub fn write_str(&mut self, value: &str) -> JsonResult<()> {
        self.out.write_char('"')?;
        write_escaped(self.out, value)?;
        Ok(self.out.write_char('"')?)
    }

    /// Begin an object.
    pub fn object(&mut self) -> JsonResult<ObjectWriter<'_, 'w, W>> {
        self.out.write_char('{')?;
        self.depth += 1;
        Ok(ObjectWriter {
            writer: self,
            count: 0,
        })
    }

    /// Begin an array.
    pub fn array(&mut self) -> JsonResult<ArrayWriter<'_, 'w, W>> {
        self.out.write_char('[')?;
        self.depth += 1;
        Ok(ArrayWriter {
            writer: self,
            count: 0,
        })
    }

    /// Write every item as one array.
    pub fn write_sequence<I>(&mut self, items: I) -> JsonResult<()>
    where
        I: IntoIterator,
        I::Item: WriteJson,
    {
        let mut array = self.array()?;
        for item in items {
            array.element(&item)?;
        }
        array.finish()
    }

    /// `{"variant": payload}`, the encoding for data-carrying enum variants.
    pub fn write_variant<F>(&mut self, variant: &str, payload: F) -> JsonResult<()>
    where
        F: FnOnce(&mut JsonWriter<'_, W>) -> JsonResult<()>,
    {
        let mut object = self.object()?;
        object.field_with(variant, payload)?;
        object.finish()
    }

    fn separator(&mut self, count: usize) -> JsonResult<()> {
        if count > 0 {
            self.out.write_char(',')?;
        }
        if self.config.pretty {
            self.newline(self.depth)?;
        }
        Ok(())
    }

    fn close(&mut self, count: usize, closer: char) -> JsonResult<()> {
        self.depth -= 1;
        if self.config.pretty && count > 0 {
            self.newline(self.depth)?;
        }
        Ok(self.out.write_char(closer)?)
    }

    fn newline(&mut self, depth: usize) -> JsonResult<()> {
        self.out.write_char('\n')?;
        for _ in 0..depth * self.config.indent {
            self.out.write_char(' ')?;
        }
        Ok(())
    }
}

/// Members of an object being written.
#[must_use = "the closing brace is only written by `finish`"]
pub struct ObjectWriter<'a, 'w, W: Write> {
    writer: &'a mut JsonWriter<'w, W>,
    count: usize,
}

impl<W: Write> ObjectWriter<'_, '_, W> {
    /// Write one member.
    pub fn field<T: WriteJson + ?Sized>(&mut self, name: &str, value: &T) -> JsonResult<&mut Self> {
        self.field_with(name, |writer| value.write_json(writer))
    }

    /// Write one member through a custom function.
    pub fn field_with<F>(&mut self, name: &str, write: F) -> JsonResult<&mut Self>
    where
        F: FnOnce(&mut JsonWriter<'_, W>) -> JsonResult<()>,
    {
        self.writer.separator(self.count)?;
        self.writer.write_str(name)?;
        self.writer
            .out
            .write_str(if self.writer.config.pretty { ": " } else { ":" })?;
        write(&mut *self.writer)?;
        self.count += 1;
        Ok(self)
    }

    /// Members written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Write the closing brace.
    pub fn finish(self) -> JsonResult<()> {
        self.writer.close(self.count, '}')
    }
}

/// Elements of an array being written.
#[must_use = "the closing bracket is only written by `finish`"]
pub struct ArrayWriter<'a, 'w, W: Write> {
    writer: &'a mut JsonWriter<'w, W>,
    count: usize,
}

impl<W: Write> ArrayWriter<'_, '_, W> {
    /// Write one element.
    pub fn element<T: WriteJson + ?Sized>(&mut self, value: &T) -> JsonResult<&mut Self> {
        self.element_with(|writer| value.write_json(writer))
    }

    /// Write one element through a custom function.
    pub fn element_with<F>(&mut self, write: F) -> JsonResult<&mut Self>
    where
        F: FnOnce(&mut JsonWriter<'_, W>) -> JsonResult<()>,
    {
        self.writer.separator(self.count)?;
        write(&mut *self.writer)?;
        self.count += 1;
        Ok(self)
    }

    /// Elements written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Write the closing bracket.
    pub fn finish(self) -> JsonResult<()> {
        self.writer.close(self.count, ']')
    }
}

/// Escape `"`, `\` and control characters.
fn write_escaped<W: Write>(out: &mut W, s: &str) -> fmt::Result {
    let mut last = 0;
    for (i, ch) in s.char_indices() {
        let escaped = match ch {
            '"' => "\\\"",
            '\\' => "\\\\",
            '\n' => "\\n",
            '\r' => "\\r",
            '\t' => "\\t",
            '\u{0008}' => "\\b",
            '\u{000C}' => "\\f",
            c if (c as u32) < 0x20 => {
                out.write_str(&s[last..i])?;
                write!(out, "\\u{:04x}", c as u32)?;
                last = i + 1;
                continue;
            }
            _ => continue,
        };
        out.write_str(&s[last..i])?;
        out.write_str(escaped)?;
        last = i + 1;
    }
    out.write_str(&s[last..])
}

// =============================================================================
// WriteJson implementations
// =============================================================================

macro_rules! integer_impls {
    ($($t:ty),* $(,)?) => {
        $(
            impl WriteJson for $t {
                #[inline]
                fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
                    writer.write_integer(*self)
                }
            }
        )*
    };
}

integer_impls!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl WriteJson for f32 {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        writer.write_f32(*self)
    }
}

impl WriteJson for f64 {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        writer.write_f64(*self)
    }
}

impl WriteJson for bool {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        writer.write_bool(*self)
    }
}

impl WriteJson for char {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        let mut buf = [0u8; 4];
        writer.write_str(self.encode_utf8(&mut buf))
    }
}

impl WriteJson for str {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        writer.write_str(self)
    }
}

impl WriteJson for String {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        writer.write_str(self)
    }
}

impl WriteJson for CompactString {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        writer.write_str(self)
    }
}

macro_rules! deref_impls {
    ($([$($params:tt)*] $ty:ty;)*) => {
        $(
            impl<$($params)*> WriteJson for $ty {
                #[inline]
                fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
                    (**self).write_json(writer)
                }
            }
        )*
    };
}

deref_impls! {
    ['a, T: WriteJson + ?Sized] &'a T;
    ['a, T: WriteJson + ?Sized] &'a mut T;
    [T: WriteJson + ?Sized] Box<T>;
    [T: WriteJson + ?Sized] Rc<T>;
    [T: WriteJson + ?Sized] Arc<T>;
}

impl<T: WriteJson + ToOwned + ?Sized> WriteJson for Cow<'_, T> {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        (**self).write_json(writer)
    }
}

macro_rules! sequence_impls {
    ($([$($params:tt)*] $ty:ty;)*) => {
        $(
            impl<$($params)*> WriteJson for $ty {
                #[inline]
                fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
                    writer.write_sequence(self.iter())
                }
            }
        )*
    };
}

sequence_impls! {
    [T: WriteJson] [T];
    [T: WriteJson, const N: usize] [T; N];
    [T: WriteJson] Vec<T>;
    [T: WriteJson] VecDeque<T>;
    [T: WriteJson] LinkedList<T>;
    [T: WriteJson] Option<T>;
    [T: WriteJson] BTreeSet<T>;
    [K: WriteJson, V: WriteJson] BTreeMap<K, V>;
}

impl<T: WriteJson + Ord, S> WriteJson for HashSet<T, S> {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        let mut items: Vec<&T> = self.iter().collect();
        items.sort_unstable();
        writer.write_sequence(items)
    }
}

impl<K: WriteJson + Ord, V: WriteJson, S> WriteJson for HashMap<K, V, S> {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        writer.write_sequence(entries)
    }
}

impl WriteJson for () {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        writer.array()?.finish()
    }
}

macro_rules! tuple_impls {
    ($(($($name:ident $idx:tt)+))+) => {
        $(
            impl<$($name: WriteJson),+> WriteJson for ($($name,)+) {
                fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
                    let mut array = writer.array()?;
                    $(array.element(&self.$idx)?;)+
                    array.finish()
                }
            }
        )+
    };
}

tuple_impls! {
    (T0 0)
    (T0 0 T1 1)
    (T0 0 T1 1 T2 2)
    (T0 0 T1 1 T2 2 T3 3)
    (T0 0 T1 1 T2 2 T3 3 T4 4)
    (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5)
    (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6)
    (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7)
    (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8)
    (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9)
    (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10)
    (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10 T11 11)
}

impl<T: WriteJson, E: WriteJson> WriteJson for Result<T, E> {
    fn write_json<W: Write>(&self, writer: &mut JsonWriter<'_, W>) -> JsonResult<()> {
        match self {
            Ok(value) => writer.write_variant("Ok", |w| w.write(&(value,))),
            Err(err) => writer.write_variant("Err", |w| w.write(&(err,))),
        }
    }
}
