//! JSON input.
//!
//! [`JsonReader`] is a type-directed parser: the [`ReadJson`] impl of the
//! target type decides what to expect next, so there is no intermediate
//! value tree. Positions are tracked for every error.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::rc::Rc;
use std::sync::Arc;

use compact_str::CompactString;

use super::config::ReadConfig;
use crate::error::{JsonError, JsonResult, Position};

/// A type that can be read from JSON.
pub trait ReadJson: Sized {
    /// Read one value of this type from `reader`.
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self>;
}

// =============================================================================
// JsonReader
// =============================================================================

/// Type-directed JSON parser over a string slice.
pub struct JsonReader<'a> {
    src: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    depth: usize,
    key_at: Position,
    config: ReadConfig,
}

impl<'a> JsonReader<'a> {
    /// Strict reader.
    pub fn new(src: &'a str) -> Self {
        Self::with_config(src, ReadConfig::STRICT)
    }

    /// Reader with explicit configuration.
    pub fn with_config(src: &'a str, config: ReadConfig) -> Self {
        Self {
            src,
            pos: 0,
            line: 1,
            column: 1,
            depth: 0,
            key_at: Position::START,
            config,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> ReadConfig {
        self.config
    }

    /// Current position.
    pub fn position(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    /// Position of the next token.
    pub fn peek_position(&mut self) -> Position {
        self.skip_space();
        self.position()
    }

    /// Read any value.
    #[inline]
    pub fn read<T: ReadJson>(&mut self) -> JsonResult<T> {
        T::read_json(self)
    }

    /// Require that only whitespace remains.
    pub fn end(&mut self) -> JsonResult<()> {
        match self.peek_token() {
            None => Ok(()),
            Some(_) => Err(self.error("trailing characters after value")),
        }
    }

    /// Syntax error at the current position.
    pub fn error(&self, message: impl Into<String>) -> JsonError {
        JsonError::syntax(self.position(), message)
    }

    // -------------------------------------------------------------------------
    // Bytes
    // -------------------------------------------------------------------------

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.src.as_bytes().get(self.pos).copied()
    }

    #[inline]
    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        if byte == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(byte)
    }

    fn skip_space(&mut self) {
        while let Some(b' ' | b'\t' | b'\n' | b'\r') = self.peek() {
            self.bump();
        }
    }

    /// Skip whitespace and return the next byte without consuming it.
    pub fn peek_token(&mut self) -> Option<u8> {
        self.skip_space();
        self.peek()
    }

    fn expect(&mut self, byte: u8) -> JsonResult<()> {
        if self.peek_token() == Some(byte) {
            self.bump();
            Ok(())
        } else {
            Err(self.error(format!("expected '{}'", byte as char)))
        }
    }

    fn expect_literal(&mut self, literal: &str) -> JsonResult<()> {
        self.skip_space();
        if self.src.as_bytes()[self.pos..].starts_with(literal.as_bytes()) {
            for _ in 0..literal.len() {
                self.bump();
            }
            Ok(())
        } else {
            Err(self.error(format!("expected '{literal}'")))
        }
    }

    fn enter(&mut self) -> JsonResult<()> {
        if self.depth >= self.config.max_depth {
            return Err(JsonError::DepthLimit {
                at: self.position(),
                limit: self.config.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    // -------------------------------------------------------------------------
    // Scalars
    // -------------------------------------------------------------------------

    /// Read `null`.
    pub fn read_null(&mut self) -> JsonResult<()> {
        self.expect_literal("null")
    }

    /// Read `true` or `false`.
    pub fn read_bool(&mut self) -> JsonResult<bool> {
        match self.peek_token() {
            Some(b't') => self.expect_literal("true").map(|()| true),
            Some(b'f') => self.expect_literal("false").map(|()| false),
            _ => Err(self.error("expected 'true' or 'false'")),
        }
    }

    fn scan_digits(&mut self) -> usize {
        let mut count = 0;
        while let Some(b'0'..=b'9') = self.peek() {
            self.bump();
            count += 1;
        }
        count
    }

    /// Scan one number token, returning where it starts and its text.
    fn scan_number(&mut self) -> JsonResult<(Position, &'a str)> {
        self.skip_space();
        let at = self.position();
        let start = self.pos;
        if self.peek() == Some(b'-') {
            self.bump();
        }
        let leading_zero = self.peek() == Some(b'0');
        match self.scan_digits() {
            0 => return Err(self.error("expected number")),
            n if n > 1 && leading_zero => return Err(JsonError::syntax(at, "leading zeros in number")),
            _ => {}
        }
        if self.peek() == Some(b'.') {
            self.bump();
            if self.scan_digits() == 0 {
                return Err(self.error("expected digits after '.'"));
            }
        }
        if let Some(b'e' | b'E') = self.peek() {
            self.bump();
            if let Some(b'+' | b'-') = self.peek() {
                self.bump();
            }
            if self.scan_digits() == 0 {
                return Err(self.error("expected exponent digits"));
            }
        }
        let src = self.src;
        Ok((at, &src[start..self.pos]))
    }

    /// Read an integer that must fit `I`.
    pub fn read_integer<I>(&mut self) -> JsonResult<I>
    where
        I: TryFrom<i128> + TryFrom<u128>,
    {
        let (at, literal) = self.scan_number()?;
        if literal.contains(['.', 'e', 'E']) {
            return Err(JsonError::syntax(at, format!("expected integer, found {literal}")));
        }
        let out_of_range = || JsonError::OutOfRange {
            at,
            literal: literal.to_string(),
            ty: std::any::type_name::<I>(),
        };
        if literal.starts_with('-') {
            let wide: i128 = literal.parse().map_err(|_| out_of_range())?;
            <I as TryFrom<i128>>::try_from(wide).map_err(|_| out_of_range())
        } else {
            let wide: u128 = literal.parse().map_err(|_| out_of_range())?;
            <I as TryFrom<u128>>::try_from(wide).map_err(|_| out_of_range())
        }
    }

    /// Read a floating-point number. Literals beyond the `f64` range are
    /// rejected rather than read as infinity.
    pub fn read_f64(&mut self) -> JsonResult<f64> {
        let (at, literal) = self.scan_number()?;
        let value: f64 = literal
            .parse()
            .map_err(|_| JsonError::syntax(at, format!("invalid number {literal}")))?;
        if !value.is_finite() {
            return Err(JsonError::OutOfRange {
                at,
                literal: literal.to_string(),
                ty: "f64",
            });
        }
        Ok(value)
    }

    /// Read a floating-point number as `f32`.
    pub fn read_f32(&mut self) -> JsonResult<f32> {
        let (at, literal) = self.scan_number()?;
        let value: f32 = literal
            .parse()
            .map_err(|_| JsonError::syntax(at, format!("invalid number {literal}")))?;
        if !value.is_finite() {
            return Err(JsonError::OutOfRange {
                at,
                literal: literal.to_string(),
                ty: "f32",
            });
        }
        Ok(value)
    }

    /// Read a string, unescaping it.
    pub fn read_string(&mut self) -> JsonResult<String> {
        self.scan_string().map(String::from)
    }

    fn scan_string(&mut self) -> JsonResult<CompactString> {
        self.skip_space();
        let at = self.position();
        if self.peek() != Some(b'"') {
            return Err(self.error("expected string"));
        }
        self.bump();

        let src = self.src;
        let mut out = CompactString::default();
        let mut run = self.pos;
        loop {
            match self.peek() {
                None => return Err(JsonError::syntax(at, "unterminated string")),
                Some(b'"') => {
                    out.push_str(&src[run..self.pos]);
                    self.bump();
                    return Ok(out);
                }
                Some(b'\\') => {
                    out.push_str(&src[run..self.pos]);
                    self.bump();
                    out.push(self.scan_escape()?);
                    run = self.pos;
                }
                Some(byte) if byte < 0x20 => {
                    return Err(self.error("control character in string"));
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
    }

    fn scan_escape(&mut self) -> JsonResult<char> {
        let at = self.position();
        let Some(byte) = self.bump() else {
            return Err(self.error("unterminated escape"));
        };
        let ch = match byte {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{0008}',
            b'f' => '\u{000C}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => {
                let high = self.scan_hex4()?;
                let code = if (0xD800..0xDC00).contains(&high) {
                    if self.bump() != Some(b'\\') || self.bump() != Some(b'u') {
                        return Err(JsonError::syntax(at, "unpaired surrogate"));
                    }
                    let low = self.scan_hex4()?;
                    if !(0xDC00..0xE000).contains(&low) {
                        return Err(JsonError::syntax(at, "invalid low surrogate"));
                    }
                    0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00)
                } else {
                    high
                };
                char::from_u32(code).ok_or_else(|| JsonError::syntax(at, "unpaired surrogate"))?
            }
            other => {
                return Err(JsonError::syntax(
                    at,
                    format!("invalid escape '\\{}'", other as char),
                ));
            }
        };
        Ok(ch)
    }

    fn scan_hex4(&mut self) -> JsonResult<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let Some(digit) = self.bump().and_then(|b| (b as char).to_digit(16)) else {
                return Err(self.error("expected four hex digits"));
            };
            code = code * 16 + digit;
        }
        Ok(code)
    }

    // -------------------------------------------------------------------------
    // Composites
    // -------------------------------------------------------------------------

    /// Begin an array of any length.
    pub fn array(&mut self) -> JsonResult<ArrayReader<'_, 'a>> {
        self.open_array(None)
    }

    /// Begin an array that must have exactly `arity` elements.
    pub fn tuple(&mut self, arity: usize) -> JsonResult<ArrayReader<'_, 'a>> {
        self.open_array(Some(arity))
    }

    fn open_array(&mut self, arity: Option<usize>) -> JsonResult<ArrayReader<'_, 'a>> {
        let at = self.peek_position();
        self.expect(b'[')?;
        self.enter()?;
        Ok(ArrayReader {
            reader: self,
            at,
            count: 0,
            arity,
            done: false,
        })
    }

    /// Read a whole array into any collection.
    pub fn read_sequence<T, C>(&mut self) -> JsonResult<C>
    where
        T: ReadJson,
        C: FromIterator<T>,
    {
        let mut items = Vec::new();
        let mut array = self.array()?;
        while let Some(item) = array.next_element()? {
            items.push(item);
        }
        array.finish()?;
        Ok(items.into_iter().collect())
    }

    /// Read an object, calling `member` with each key.
    ///
    /// `member` must consume exactly one value (or fail).
    pub fn read_object<F>(&mut self, mut member: F) -> JsonResult<()>
    where
        F: FnMut(&mut Self, &str) -> JsonResult<()>,
    {
        self.expect(b'{')?;
        self.enter()?;
        let result = self.read_members(&mut member);
        self.leave();
        result
    }

    fn read_members<F>(&mut self, member: &mut F) -> JsonResult<()>
    where
        F: FnMut(&mut Self, &str) -> JsonResult<()>,
    {
        if self.peek_token() == Some(b'}') {
            self.bump();
            return Ok(());
        }
        loop {
            self.skip_space();
            self.key_at = self.position();
            let key = self.scan_string()?;
            self.expect(b':')?;
            member(self, &key)?;
            match self.peek_token() {
                Some(b',') => {
                    self.bump();
                }
                Some(b'}') => {
                    self.bump();
                    break;
                }
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
        Ok(())
    }

    /// Read a variant name written as a bare string.
    pub fn read_variant_name(&mut self) -> JsonResult<(Position, CompactString)> {
        let at = self.peek_position();
        let name = self.scan_string()?;
        Ok((at, name))
    }

    /// Read `{"variant": payload}`, letting `payload` consume the value.
    pub fn read_variant<T, F>(&mut self, payload: F) -> JsonResult<T>
    where
        F: FnOnce(&mut Self, Position, &str) -> JsonResult<T>,
    {
        self.expect(b'{')?;
        self.enter()?;
        let result = self.read_variant_body(payload);
        self.leave();
        result
    }

    fn read_variant_body<T, F>(&mut self, payload: F) -> JsonResult<T>
    where
        F: FnOnce(&mut Self, Position, &str) -> JsonResult<T>,
    {
        let (at, name) = self.read_variant_name()?;
        self.expect(b':')?;
        let value = payload(self, at, &name)?;
        self.expect(b'}')?;
        Ok(value)
    }

    /// Skip one value of any shape.
    pub fn skip_value(&mut self) -> JsonResult<()> {
        match self.peek_token() {
            Some(b'{') => self.read_object(|reader, _| reader.skip_value()),
            Some(b'[') => self.read_sequence::<Ignored, Ignored>().map(|_| ()),
            Some(b'"') => self.scan_string().map(|_| ()),
            Some(b't' | b'f') => self.read_bool().map(|_| ()),
            Some(b'n') => self.read_null(),
            Some(b'-' | b'0'..=b'9') => self.scan_number().map(|_| ()),
            _ => Err(self.error("expected value")),
        }
    }

    // -------------------------------------------------------------------------
    // Member bookkeeping for derived impls
    // -------------------------------------------------------------------------

    /// Handle a key the target type does not have: an error in strict mode,
    /// otherwise the value is skipped.
    pub fn skip_unknown(&mut self, key: &str, ty: &'static str) -> JsonResult<()> {
        if self.config.deny_unknown_fields {
            return Err(JsonError::UnknownField {
                at: self.key_at,
                field: key.to_string(),
                ty,
            });
        }
        log::debug!("skipping unknown member '{key}' of '{ty}' at {}", self.key_at);
        self.skip_value()
    }

    /// Error for a member read twice.
    pub fn duplicate_field(&self, field: &'static str, ty: &'static str) -> JsonError {
        JsonError::DuplicateField {
            at: self.key_at,
            field,
            ty,
        }
    }

    /// Error for a member never read; `at` is where the object started.
    pub fn missing_field(&self, at: Position, field: &'static str, ty: &'static str) -> JsonError {
        JsonError::MissingField { at, field, ty }
    }

    /// Error for a variant name the target enum does not have.
    pub fn unknown_variant(&self, at: Position, variant: &str, ty: &'static str) -> JsonError {
        JsonError::UnknownVariant {
            at,
            variant: variant.to_string(),
            ty,
        }
    }
}

/// Elements of an array being read.
pub struct ArrayReader<'r, 'a> {
    reader: &'r mut JsonReader<'a>,
    at: Position,
    count: usize,
    arity: Option<usize>,
    done: bool,
}

impl<'a> ArrayReader<'_, 'a> {
    /// Read the next element, or `None` at the closing bracket.
    pub fn next_element<T: ReadJson>(&mut self) -> JsonResult<Option<T>> {
        self.next_element_with(T::read_json)
    }

    /// Like [`next_element`](Self::next_element) with a custom read function.
    pub fn next_element_with<T, F>(&mut self, read: F) -> JsonResult<Option<T>>
    where
        F: FnOnce(&mut JsonReader<'a>) -> JsonResult<T>,
    {
        if self.done {
            return Ok(None);
        }
        match self.reader.peek_token() {
            Some(b']') => {
                self.reader.bump();
                self.done = true;
                return Ok(None);
            }
            Some(b',') if self.count > 0 => {
                self.reader.bump();
            }
            _ if self.count == 0 => {}
            _ => return Err(self.reader.error("expected ',' or ']'")),
        }
        let value = read(self.reader)?;
        self.count += 1;
        Ok(Some(value))
    }

    /// Read the next element of a fixed-arity array.
    pub fn element<T: ReadJson>(&mut self) -> JsonResult<T> {
        self.element_with(T::read_json)
    }

    /// Like [`element`](Self::element) with a custom read function.
    pub fn element_with<T, F>(&mut self, read: F) -> JsonResult<T>
    where
        F: FnOnce(&mut JsonReader<'a>) -> JsonResult<T>,
    {
        match self.next_element_with(read)? {
            Some(value) => Ok(value),
            None => Err(JsonError::Arity {
                at: self.at,
                expected: self.arity.unwrap_or(self.count + 1),
                found: self.count,
            }),
        }
    }

    /// Elements read so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Consume the closing bracket, rejecting extra elements of a
    /// fixed-arity array.
    pub fn finish(mut self) -> JsonResult<()> {
        while self.next_element::<Ignored>()?.is_some() {}
        match self.arity {
            Some(expected) if self.count != expected => Err(JsonError::Arity {
                at: self.at,
                expected,
                found: self.count,
            }),
            _ => Ok(()),
        }
    }
}

// Closes the nesting level opened by `open_array`, on error paths too.
impl Drop for ArrayReader<'_, '_> {
    fn drop(&mut self) {
        self.reader.leave();
    }
}

/// Placeholder target that accepts and discards any value.
struct Ignored;

impl ReadJson for Ignored {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.skip_value().map(|()| Ignored)
    }
}

impl FromIterator<Ignored> for Ignored {
    fn from_iter<I: IntoIterator<Item = Ignored>>(iter: I) -> Self {
        iter.into_iter().for_each(drop);
        Ignored
    }
}

// =============================================================================
// ReadJson implementations
// =============================================================================

macro_rules! integer_impls {
    ($($t:ty),* $(,)?) => {
        $(
            impl ReadJson for $t {
                #[inline]
                fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
                    reader.read_integer()
                }
            }
        )*
    };
}

integer_impls!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl ReadJson for f32 {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.read_f32()
    }
}

impl ReadJson for f64 {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.read_f64()
    }
}

impl ReadJson for bool {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.read_bool()
    }
}

impl ReadJson for char {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        let at = reader.peek_position();
        let s = reader.scan_string()?;
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(ch),
            _ => Err(JsonError::syntax(at, "expected a single-character string")),
        }
    }
}

impl ReadJson for String {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.read_string()
    }
}

impl ReadJson for CompactString {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.scan_string()
    }
}

macro_rules! wrapper_impls {
    ($($wrapper:ident),* $(,)?) => {
        $(
            impl<T: ReadJson> ReadJson for $wrapper<T> {
                #[inline]
                fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
                    T::read_json(reader).map($wrapper::new)
                }
            }
        )*
    };
}

wrapper_impls!(Box, Rc, Arc);

macro_rules! sequence_impls {
    ($([$($params:tt)*] $ty:ty => $item:ty;)*) => {
        $(
            impl<$($params)*> ReadJson for $ty {
                #[inline]
                fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
                    reader.read_sequence::<$item, Self>()
                }
            }
        )*
    };
}

sequence_impls! {
    [T: ReadJson] Vec<T> => T;
    [T: ReadJson] VecDeque<T> => T;
    [T: ReadJson] LinkedList<T> => T;
    [T: ReadJson + Ord] BTreeSet<T> => T;
    [K: ReadJson + Ord, V: ReadJson] BTreeMap<K, V> => (K, V);
    [T: ReadJson + Eq + Hash, S: BuildHasher + Default] HashSet<T, S> => T;
    [K: ReadJson + Eq + Hash, V: ReadJson, S: BuildHasher + Default] HashMap<K, V, S> => (K, V);
}

impl<T: ReadJson> ReadJson for Option<T> {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        let mut array = reader.array()?;
        let value = array.next_element()?;
        if value.is_some() && array.next_element::<Ignored>()?.is_some() {
            return Err(JsonError::Arity {
                at: array.at,
                expected: 1,
                found: 2,
            });
        }
        array.finish()?;
        Ok(value)
    }
}

impl<T: ReadJson, const N: usize> ReadJson for [T; N] {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        let mut array = reader.tuple(N)?;
        let at = array.at;
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(array.element()?);
        }
        array.finish()?;
        items.try_into().map_err(|items: Vec<T>| JsonError::Arity {
            at,
            expected: N,
            found: items.len(),
        })
    }
}

impl ReadJson for () {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.tuple(0)?.finish()
    }
}

macro_rules! tuple_impls {
    ($($len:literal => ($($name:ident)+))+) => {
        $(
            impl<$($name: ReadJson),+> ReadJson for ($($name,)+) {
                fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
                    let mut array = reader.tuple($len)?;
                    let value = ($(array.element::<$name>()?,)+);
                    array.finish()?;
                    Ok(value)
                }
            }
        )+
    };
}

tuple_impls! {
    1 => (T0)
    2 => (T0 T1)
    3 => (T0 T1 T2)
    4 => (T0 T1 T2 T3)
    5 => (T0 T1 T2 T3 T4)
    6 => (T0 T1 T2 T3 T4 T5)
    7 => (T0 T1 T2 T3 T4 T5 T6)
    8 => (T0 T1 T2 T3 T4 T5 T6 T7)
    9 => (T0 T1 T2 T3 T4 T5 T6 T7 T8)
    10 => (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9)
    11 => (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10)
    12 => (T0 T1 T2 T3 T4 T5 T6 T7 T8 T9 T10 T11)
}

impl<T: ReadJson, E: ReadJson> ReadJson for Result<T, E> {
    fn read_json(reader: &mut JsonReader<'_>) -> JsonResult<Self> {
        reader.read_variant(|reader, at, name| match name {
            "Ok" => reader.read::<(T,)>().map(|(value,)| Ok(value)),
            "Err" => reader.read::<(E,)>().map(|(err,)| Err(err)),
            other => Err(reader.unknown_variant(at, other, "Result")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json::{from_str, from_str_with};

    #[test]
    fn test_scalars() {
        assert_eq!(from_str::<u8>(" 42 ").unwrap(), 42);
        assert_eq!(from_str::<i64>("-7").unwrap(), -7);
        assert!(from_str::<bool>("true").unwrap());
        assert_eq!(from_str::<f64>("1.5e2").unwrap(), 150.0);
        assert_eq!(from_str::<f32>("0.1").unwrap(), 0.1f32);
        assert_eq!(from_str::<char>("\"x\"").unwrap(), 'x');
    }

    #[test]
    fn test_integer_range_and_shape() {
        assert!(matches!(from_str::<u8>("256"), Err(JsonError::OutOfRange { .. })));
        assert!(matches!(from_str::<u32>("-1"), Err(JsonError::OutOfRange { .. })));
        assert!(matches!(from_str::<i32>("1.0"), Err(JsonError::Syntax { .. })));
        assert!(matches!(from_str::<i32>("01"), Err(JsonError::Syntax { .. })));
    }

    #[test]
    fn test_strings_and_escapes() {
        assert_eq!(from_str::<String>(r#""a\"b\\c\n""#).unwrap(), "a\"b\\c\n");
        assert_eq!(from_str::<String>(r#""é😀""#).unwrap(), "é😀");
        assert_eq!(from_str::<String>("\"héllo\"").unwrap(), "héllo");
        assert!(from_str::<String>(r#""\ud83d""#).is_err());
        assert!(from_str::<String>("\"open").is_err());
    }

    #[test]
    fn test_sequences() {
        assert_eq!(from_str::<Vec<u8>>("[1, 2 ,3]").unwrap(), vec![1, 2, 3]);
        assert_eq!(from_str::<Vec<u8>>("[]").unwrap(), Vec::<u8>::new());
        assert_eq!(from_str::<Option<u8>>("[]").unwrap(), None);
        assert_eq!(from_str::<Option<u8>>("[5]").unwrap(), Some(5));
        assert!(matches!(from_str::<Option<u8>>("[5,6]"), Err(JsonError::Arity { .. })));
        assert!(from_str::<Vec<u8>>("[1,]").is_err());
        assert!(from_str::<Vec<u8>>("[,1]").is_err());

        let map: BTreeMap<String, u8> = from_str(r#"[["a",1],["b",2]]"#).unwrap();
        assert_eq!(map.get("b"), Some(&2));
    }

    #[test]
    fn test_fixed_arity() {
        assert_eq!(from_str::<(u8, String)>(r#"[1,"a"]"#).unwrap(), (1, "a".to_string()));
        assert_eq!(from_str::<[u8; 3]>("[1,2,3]").unwrap(), [1, 2, 3]);

        match from_str::<(u8, u8)>("[1]") {
            Err(JsonError::Arity { expected, found, .. }) => assert_eq!((expected, found), (2, 1)),
            other => panic!("expected arity error, got {other:?}"),
        }
        match from_str::<(u8, u8)>("[1,2,3,4]") {
            Err(JsonError::Arity { expected, found, .. }) => assert_eq!((expected, found), (2, 4)),
            other => panic!("expected arity error, got {other:?}"),
        }
        from_str::<()>("[]").unwrap();
    }

    #[test]
    fn test_result() {
        let ok: Result<u8, String> = from_str(r#"{"Ok":[1]}"#).unwrap();
        assert_eq!(ok, Ok(1));
        let err: Result<u8, String> = from_str(r#"{"Err":["bad"]}"#).unwrap();
        assert_eq!(err, Err("bad".to_string()));
        assert!(matches!(
            from_str::<Result<u8, u8>>(r#"{"Maybe":[1]}"#),
            Err(JsonError::UnknownVariant { .. })
        ));
    }

    #[test]
    fn test_error_positions() {
        let err = from_str::<Vec<u8>>("[1,\n  x]").unwrap_err();
        assert_eq!(err.position(), Some(Position { line: 2, column: 3 }));
        assert_eq!(err.to_string(), "error @ 2:3: expected number");
    }

    #[test]
    fn test_trailing_input() {
        assert!(from_str::<u8>("1 2").is_err());
    }

    #[test]
    fn test_depth_limit() {
        let deep = format!("{}{}", "[".repeat(8), "]".repeat(8));
        let config = ReadConfig::STRICT.with_max_depth(4);
        assert!(matches!(
            from_str_with::<Vec<Vec<Vec<Vec<Vec<Vec<Vec<Vec<u8>>>>>>>>>(&deep, config),
            Err(JsonError::DepthLimit { limit: 4, .. })
        ));
    }

    #[test]
    fn test_float_range() {
        assert_eq!(from_str::<f64>("1e308").unwrap(), 1e308);
        assert!(matches!(
            from_str::<f64>("1e400"),
            Err(JsonError::OutOfRange { ty: "f64", .. })
        ));
        assert!(matches!(
            from_str::<f32>("-1e39"),
            Err(JsonError::OutOfRange { ty: "f32", .. })
        ));
        // underflow rounds to zero
        assert_eq!(from_str::<f64>("1e-400").unwrap(), 0.0);
    }

    #[test]
    fn test_depth_restored_after_error() {
        let mut reader = JsonReader::new("[1,2]");
        assert!(matches!(reader.read::<Option<u8>>(), Err(JsonError::Arity { .. })));
        assert_eq!(reader.depth, 0);

        let mut reader = JsonReader::new(r#"{"a":1}"#);
        assert!(reader.read_object(|r, _| Err(r.error("rejected"))).is_err());
        assert_eq!(reader.depth, 0);

        let mut reader = JsonReader::new(r#"{"Line":[1]}"#);
        let result = reader.read_variant(|r, _, _| r.read::<(u8, u8)>());
        assert!(matches!(result, Err(JsonError::Arity { .. })));
        assert_eq!(reader.depth, 0);
    }

    #[test]
    fn test_skip_value() {
        let mut reader = JsonReader::new(r#"{"a":[1,{"b":null}],"c":"x"} 7"#);
        reader.skip_value().unwrap();
        assert_eq!(reader.read::<u8>().unwrap(), 7);
        reader.end().unwrap();
    }
}
