//! Structural traversal primitives.
//!
//! The building blocks every [`HashAppend`] implementation bottoms out in:
//!
//! - **scalar**: fixed-width little-endian bit patterns ([`Scalar`])
//! - **address**: pointer identity, never the pointee ([`append_address`])
//! - **sequence**: elements, then the element count ([`append_sequence`])
//! - **product**: parts, then the part count ([`Parts`])
//!
//! The trailing counts keep differently shaped values apart: without them
//! `[1, 2]` followed by `0` and `[1, 2, 0]` would feed identical bytes.
//!
//! Derive output calls into this module, so its items are public API.

use crate::{Accumulator, HashAppend};

/// Bit pattern hashed for a null pointer.
pub const NULL_ADDRESS: u64 = 0;

// =============================================================================
// Scalars
// =============================================================================

/// Types encoded as a single fixed-width bit pattern.
pub trait Scalar: Copy {
    /// Feed this value's bit pattern to `hash`.
    fn append_bits<H: Accumulator>(self, hash: &mut H);
}

macro_rules! int_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                #[inline]
                fn append_bits<H: Accumulator>(self, hash: &mut H) {
                    hash.consume(&self.to_le_bytes());
                }
            }
        )*
    };
}

int_scalar!(u8, u16, u32, u64, u128, i8, i16, i32, i64, i128);

// Pointer-width integers are widened so digests do not depend on the target.
impl Scalar for usize {
    #[inline]
    fn append_bits<H: Accumulator>(self, hash: &mut H) {
        (self as u64).append_bits(hash);
    }
}

impl Scalar for isize {
    #[inline]
    fn append_bits<H: Accumulator>(self, hash: &mut H) {
        (self as i64).append_bits(hash);
    }
}

impl Scalar for bool {
    #[inline]
    fn append_bits<H: Accumulator>(self, hash: &mut H) {
        (self as u8).append_bits(hash);
    }
}

impl Scalar for char {
    #[inline]
    fn append_bits<H: Accumulator>(self, hash: &mut H) {
        (self as u32).append_bits(hash);
    }
}

macro_rules! float_scalar {
    ($($t:ty),* $(,)?) => {
        $(
            impl Scalar for $t {
                /// `-0.0 == 0.0`, so both zeros hash as `+0.0`.
                #[inline]
                fn append_bits<H: Accumulator>(self, hash: &mut H) {
                    let value = if self == 0.0 { 0.0 } else { self };
                    value.to_bits().append_bits(hash);
                }
            }
        )*
    };
}

float_scalar!(f32, f64);

/// Append a scalar's bit pattern.
#[inline]
pub fn append_scalar<H: Accumulator, S: Scalar>(hash: &mut H, value: S) {
    value.append_bits(hash);
}

/// Append a length or part-count marker (always 64 bits).
#[inline]
pub fn append_count<H: Accumulator>(hash: &mut H, count: usize) {
    (count as u64).append_bits(hash);
}

/// Append an enum variant's declaration index.
#[inline]
pub fn append_discriminant<H: Accumulator>(hash: &mut H, index: u32) {
    index.append_bits(hash);
}

/// Append a pointer's address.
///
/// Only the address is hashed: two pointers to equal values at different
/// locations hash differently. Fat-pointer metadata is dropped. A null
/// pointer hashes as [`NULL_ADDRESS`].
#[inline]
pub fn append_address<H: Accumulator, T: ?Sized>(hash: &mut H, ptr: *const T) {
    let bits = if ptr.is_null() {
        NULL_ADDRESS
    } else {
        ptr.cast::<()>() as usize as u64
    };
    bits.append_bits(hash);
}

// =============================================================================
// Sequences
// =============================================================================

/// Append every item in iteration order, then the item count.
pub fn append_sequence<H, I>(hash: &mut H, items: I)
where
    H: Accumulator,
    I: IntoIterator,
    I::Item: HashAppend,
{
    let mut count = 0usize;
    for item in items {
        item.hash_append(hash);
        count += 1;
    }
    append_count(hash, count);
}

// =============================================================================
// Products
// =============================================================================

/// Walker over the parts of a product or plain-data value.
///
/// Each [`part`](Self::part) is appended as it arrives; [`finish`](Self::finish)
/// appends the part count.
///
/// ```
/// use shapehash::engine::Parts;
/// use shapehash::{digest, Fnv1a64};
///
/// let mut a = Fnv1a64::new();
/// let mut parts = Parts::with_arity(&mut a, 2);
/// parts.part(&1u8).part("x");
/// parts.finish();
///
/// assert_eq!(shapehash::Accumulator::finish(&a), digest::<Fnv1a64, _>(&(1u8, "x")));
/// ```
#[must_use = "a product's count marker is only appended by `finish`"]
pub struct Parts<'h, H: Accumulator> {
    hash: &'h mut H,
    count: usize,
    arity: Option<usize>,
}

impl<'h, H: Accumulator> Parts<'h, H> {
    /// Walker with no declared arity.
    #[inline]
    pub fn new(hash: &'h mut H) -> Self {
        Self {
            hash,
            count: 0,
            arity: None,
        }
    }

    /// Walker that must receive exactly `arity` parts.
    #[inline]
    pub fn with_arity(hash: &'h mut H, arity: usize) -> Self {
        Self {
            hash,
            count: 0,
            arity: Some(arity),
        }
    }

    /// Append one part.
    #[inline]
    pub fn part<T: HashAppend + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.hash_append(&mut *self.hash);
        self.count += 1;
        self
    }

    /// Append one part through a custom function.
    #[inline]
    pub fn part_with<F>(&mut self, append: F) -> &mut Self
    where
        F: FnOnce(&mut H),
    {
        append(&mut *self.hash);
        self.count += 1;
        self
    }

    /// Parts appended so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Append the part count.
    ///
    /// # Panics
    ///
    /// Panics if the walker was created with [`with_arity`](Self::with_arity)
    /// and a different number of parts was appended. Such a type's shape
    /// declaration is wrong; there is no meaningful digest to return.
    pub fn finish(self) {
        if let Some(arity) = self.arity {
            assert_eq!(
                self.count, arity,
                "malformed product shape: declared {arity} parts, appended {}",
                self.count
            );
        }
        append_count(self.hash, self.count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ByteRecorder;

    fn bytes_of<S: Scalar>(value: S) -> Vec<u8> {
        let mut rec = ByteRecorder::new();
        append_scalar(&mut rec, value);
        rec.bytes().to_vec()
    }

    #[test]
    fn test_scalars_are_little_endian_fixed_width() {
        assert_eq!(bytes_of(0x0102u16), vec![0x02, 0x01]);
        assert_eq!(bytes_of(-1i32), vec![0xff; 4]);
        assert_eq!(bytes_of(true), vec![1]);
        assert_eq!(bytes_of('A'), vec![0x41, 0, 0, 0]);
        assert_eq!(bytes_of(7usize).len(), 8);
        assert_eq!(bytes_of(-7isize).len(), 8);
    }

    #[test]
    fn test_negative_zero_normalized() {
        assert_eq!(bytes_of(-0.0f64), bytes_of(0.0f64));
        assert_eq!(bytes_of(-0.0f32), bytes_of(0.0f32));
        assert_ne!(bytes_of(-1.0f64), bytes_of(1.0f64));
    }

    #[test]
    fn test_sequence_appends_count() {
        let mut rec = ByteRecorder::new();
        append_sequence(&mut rec, [1u8, 2].iter());
        assert_eq!(rec.bytes(), &[1, 2, 2, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_null_address_is_fixed() {
        let mut rec = ByteRecorder::new();
        append_address(&mut rec, std::ptr::null::<u8>());
        assert_eq!(rec.bytes(), &NULL_ADDRESS.to_le_bytes());
    }

    #[test]
    fn test_parts_count() {
        let mut rec = ByteRecorder::new();
        let mut parts = Parts::new(&mut rec);
        parts.part(&9u8).part_with(|h| append_scalar(h, 3u8));
        assert_eq!(parts.count(), 2);
        parts.finish();
        assert_eq!(rec.bytes(), &[9, 3, 2, 0, 0, 0, 0, 0, 0, 0]);
    }

    #[test]
    #[should_panic(expected = "malformed product shape")]
    fn test_parts_arity_mismatch_panics() {
        let mut rec = ByteRecorder::new();
        let mut parts = Parts::with_arity(&mut rec, 2);
        parts.part(&1u8);
        parts.finish();
    }
}
