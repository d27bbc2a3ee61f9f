//! Streaming byte accumulators.
//!
//! An [`Accumulator`] consumes raw byte spans and produces a fixed-width
//! unsigned digest. Traversal code never looks at the digest; it only feeds
//! bytes, so any accumulator can be paired with any [`HashAppend`] type.
//!
//! - [`Fnv1a32`] / [`Fnv1a64`]: FNV-1a multiplicative hash (the default)
//! - [`StableHasher`]: BLAKE3-backed, truncated to 64 bits
//! - [`ByteRecorder`]: records the encoded bytes for inspection
//! - [`HasherAccumulator`]: adapts any `std::hash::Hasher`
//!
//! [`HashAppend`]: crate::HashAppend

mod fnv;
mod recorder;
mod stable;

pub use fnv::{Fnv1a, Fnv1a32, Fnv1a64};
pub use recorder::ByteRecorder;
pub use stable::StableHasher;

use std::fmt;
use std::hash::Hasher;

// =============================================================================
// Accumulator
// =============================================================================

/// A byte-consuming digest function.
///
/// Implementations must be chunking-invariant: feeding `a` then `b` must
/// finish to the same digest as feeding `a ++ b` in a single call.
pub trait Accumulator {
    /// The finished digest type.
    type Output: DigestWord;

    /// Append raw bytes to the running state.
    fn consume(&mut self, bytes: &[u8]);

    /// Return the digest of everything consumed so far.
    ///
    /// Does not reset the state; calling it twice returns the same value.
    fn finish(&self) -> Self::Output;
}

impl<H: Accumulator + ?Sized> Accumulator for &mut H {
    type Output = H::Output;

    #[inline]
    fn consume(&mut self, bytes: &[u8]) {
        (**self).consume(bytes);
    }

    #[inline]
    fn finish(&self) -> Self::Output {
        (**self).finish()
    }
}

// =============================================================================
// DigestWord
// =============================================================================

mod sealed {
    pub trait Sealed {}
}

/// Unsigned integer types an accumulator may produce.
///
/// Sealed: only the built-in unsigned integers qualify.
pub trait DigestWord:
    sealed::Sealed + Copy + Eq + Ord + fmt::Debug + fmt::LowerHex + Send + Sync + 'static
{
    /// Width of the digest in bits.
    const BITS: u32;

    /// Fold the digest into 64 bits (xor of the high and low halves for
    /// 128-bit digests, zero-extension for narrower ones).
    fn fold_u64(self) -> u64;
}

macro_rules! impl_digest_word {
    ($($t:ty),* $(,)?) => {
        $(
            impl sealed::Sealed for $t {}

            impl DigestWord for $t {
                const BITS: u32 = <$t>::BITS;

                #[inline]
                fn fold_u64(self) -> u64 {
                    self as u64
                }
            }
        )*
    };
}

impl_digest_word!(u8, u16, u32, u64, usize);

impl sealed::Sealed for u128 {}

impl DigestWord for u128 {
    const BITS: u32 = u128::BITS;

    #[inline]
    fn fold_u64(self) -> u64 {
        (self as u64) ^ ((self >> 64) as u64)
    }
}

// =============================================================================
// std::hash::Hasher adapter
// =============================================================================

/// Drives any `std::hash::Hasher` as an [`Accumulator`].
///
/// ```
/// use rustc_hash::FxHasher;
/// use shapehash::{hash_append, Accumulator, HasherAccumulator};
///
/// let mut acc = HasherAccumulator::new(FxHasher::default());
/// hash_append(&mut acc, &(1u8, "one"));
/// let _digest: u64 = acc.finish();
/// ```
#[derive(Debug, Clone, Default)]
pub struct HasherAccumulator<S> {
    inner: S,
}

impl<S: Hasher> HasherAccumulator<S> {
    /// Wrap a hasher.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Unwrap the hasher.
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Hasher> Accumulator for HasherAccumulator<S> {
    type Output = u64;

    #[inline]
    fn consume(&mut self, bytes: &[u8]) {
        self.inner.write(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        self.inner.finish()
    }
}
