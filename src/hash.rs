//! Encoding entry points.
//!
//! ```
//! use shapehash::{digest, fnv1a64, hash_append, Accumulator, Fnv1a64};
//!
//! // One-shot: fresh accumulator, one value, finished digest.
//! let key = fnv1a64(&("player", 7u32));
//!
//! // Streaming: feed several values into one accumulator.
//! let mut acc = Fnv1a64::new();
//! hash_append(&mut acc, "player");
//! hash_append(&mut acc, &7u32);
//! let _streamed = acc.finish();
//!
//! assert_eq!(key, digest::<Fnv1a64, _>(&("player", 7u32)));
//! ```

use std::fmt;
use std::marker::PhantomData;

use crate::accumulator::{Fnv1a32, Fnv1a64, StableHasher};
use crate::{Accumulator, HashAppend};

/// Feed one structural traversal of `value` into `hash`.
#[inline]
pub fn hash_append<H, T>(hash: &mut H, value: &T)
where
    H: Accumulator,
    T: HashAppend + ?Sized,
{
    value.hash_append(hash);
}

/// Digest `value` with a fresh `H`.
#[inline]
pub fn digest<H, T>(value: &T) -> H::Output
where
    H: Accumulator + Default,
    T: HashAppend + ?Sized,
{
    let mut hash = H::default();
    value.hash_append(&mut hash);
    hash.finish()
}

macro_rules! digest_shortcuts {
    ($($name:ident => $acc:ident),* $(,)?) => {
        ::paste::paste! {
            $(
                #[doc = "Digest a value with [`" $acc "`]."]
                #[inline]
                pub fn $name<T: HashAppend + ?Sized>(value: &T) -> <$acc as Accumulator>::Output {
                    digest::<$acc, T>(value)
                }
            )*
        }
    };
}

digest_shortcuts! {
    fnv1a32 => Fnv1a32,
    fnv1a64 => Fnv1a64,
    stable_digest => StableHasher,
}

/// A hash-function object over accumulator `H`.
///
/// Zero-sized; each call builds and drops its own accumulator, so one
/// instance can be shared freely across threads.
pub struct StructuralHash<H> {
    _accumulator: PhantomData<fn() -> H>,
}

impl<H: Accumulator + Default> StructuralHash<H> {
    /// Create the function object.
    pub const fn new() -> Self {
        Self {
            _accumulator: PhantomData,
        }
    }

    /// Digest `value`.
    #[inline]
    pub fn hash<T: HashAppend + ?Sized>(&self, value: &T) -> H::Output {
        digest::<H, T>(value)
    }
}

impl<H: Accumulator + Default> Default for StructuralHash<H> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H> Clone for StructuralHash<H> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<H> Copy for StructuralHash<H> {}

impl<H> fmt::Debug for StructuralHash<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructuralHash")
            .field("accumulator", &std::any::type_name::<H>())
            .finish()
    }
}
