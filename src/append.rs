//! The [`HashAppend`] trait and its implementations for std types.
//!
//! Std types are registered here by hand, following the same priority
//! ladder the derive uses for user types:
//!
//! | Types | Class |
//! |---|---|
//! | integers, `bool`, `char`, `f32`, `f64` | scalar |
//! | `*const T`, `*mut T`, `NonNull<T>` | scalar (address) |
//! | `str`, `String`, `[T]`, `[T; N]`, `Vec`, `VecDeque`, `LinkedList`, `Option` | sequence |
//! | `BTreeSet`, `BTreeMap`, `HashSet`, `HashMap` | sequence |
//! | tuples up to 12, `()`, `PhantomData` | product |
//! | `Result` | plain-data (variant index, payload) |
//! | `&T`, `&mut T`, `Box`, `Rc`, `Arc`, `Cow` | same as the pointee |
//!
//! Unordered collections are walked in sorted order so that equal sets and
//! maps always produce equal digests.

use std::borrow::Cow;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, LinkedList, VecDeque};
use std::marker::PhantomData;
use std::ptr::NonNull;
use std::rc::Rc;
use std::sync::Arc;

use crate::engine::{self, Parts, Scalar};
use crate::{Accumulator, TraversalClass};

/// A type that can feed its structure to an [`Accumulator`].
///
/// Usually derived:
///
/// ```
/// use shapehash::{fnv1a64, HashAppend};
///
/// #[derive(HashAppend)]
/// struct Ratio {
///     max: i32,
///     current: i32,
/// }
///
/// let full = fnv1a64(&Ratio { max: 100, current: 100 });
/// let hurt = fnv1a64(&Ratio { max: 100, current: 99 });
/// assert_ne!(full, hurt);
/// ```
///
/// Implementing it by hand registers a custom encoding for the type; this
/// always takes precedence over any automatic traversal because the
/// automatic paths are only ever produced by the derive.
pub trait HashAppend {
    /// The strategy this implementation uses.
    const CLASS: TraversalClass;

    /// Feed `self` to `hash`.
    fn hash_append<H: Accumulator>(&self, hash: &mut H);
}

// =============================================================================
// Scalars
// =============================================================================

macro_rules! scalar_impls {
    ($($t:ty),* $(,)?) => {
        $(
            impl HashAppend for $t {
                const CLASS: TraversalClass = TraversalClass::Scalar;

                #[inline]
                fn hash_append<H: Accumulator>(&self, hash: &mut H) {
                    Scalar::append_bits(*self, hash);
                }
            }
        )*
    };
}

scalar_impls!(
    u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, bool, char, f32, f64,
);

impl<T: ?Sized> HashAppend for *const T {
    const CLASS: TraversalClass = TraversalClass::Scalar;

    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        engine::append_address(hash, *self);
    }
}

impl<T: ?Sized> HashAppend for *mut T {
    const CLASS: TraversalClass = TraversalClass::Scalar;

    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        engine::append_address(hash, self.cast_const());
    }
}

impl<T: ?Sized> HashAppend for NonNull<T> {
    const CLASS: TraversalClass = TraversalClass::Scalar;

    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        engine::append_address(hash, self.as_ptr().cast_const());
    }
}

// =============================================================================
// Transparent wrappers
// =============================================================================

macro_rules! deref_impls {
    ($([$($params:tt)*] $ty:ty;)*) => {
        $(
            impl<$($params)*> HashAppend for $ty {
                const CLASS: TraversalClass = T::CLASS;

                #[inline]
                fn hash_append<H: Accumulator>(&self, hash: &mut H) {
                    (**self).hash_append(hash);
                }
            }
        )*
    };
}

deref_impls! {
    ['a, T: HashAppend + ?Sized] &'a T;
    ['a, T: HashAppend + ?Sized] &'a mut T;
    [T: HashAppend + ?Sized] Box<T>;
    [T: HashAppend + ?Sized] Rc<T>;
    [T: HashAppend + ?Sized] Arc<T>;
}

impl<T> HashAppend for Cow<'_, T>
where
    T: HashAppend + ToOwned + ?Sized,
{
    const CLASS: TraversalClass = T::CLASS;

    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        (**self).hash_append(hash);
    }
}

// =============================================================================
// Sequences
// =============================================================================

impl HashAppend for str {
    const CLASS: TraversalClass = TraversalClass::Sequence;

    /// Same bytes as appending each `u8` then the count, in one call.
    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        hash.consume(self.as_bytes());
        engine::append_count(hash, self.len());
    }
}

impl HashAppend for String {
    const CLASS: TraversalClass = TraversalClass::Sequence;

    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        self.as_str().hash_append(hash);
    }
}

macro_rules! sequence_impls {
    ($([$($params:tt)*] $ty:ty;)*) => {
        $(
            impl<$($params)*> HashAppend for $ty {
                const CLASS: TraversalClass = TraversalClass::Sequence;

                #[inline]
                fn hash_append<H: Accumulator>(&self, hash: &mut H) {
                    engine::append_sequence(hash, self.iter());
                }
            }
        )*
    };
}

sequence_impls! {
    [T: HashAppend] [T];
    [T: HashAppend, const N: usize] [T; N];
    [T: HashAppend] Vec<T>;
    [T: HashAppend] VecDeque<T>;
    [T: HashAppend] LinkedList<T>;
    [T: HashAppend] Option<T>;
    [T: HashAppend] BTreeSet<T>;
    [K: HashAppend, V: HashAppend] BTreeMap<K, V>;
}

impl<T: HashAppend + Ord, S> HashAppend for HashSet<T, S> {
    const CLASS: TraversalClass = TraversalClass::Sequence;

    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        let mut items: Vec<&T> = self.iter().collect();
        items.sort_unstable();
        engine::append_sequence(hash, items);
    }
}

impl<K: HashAppend + Ord, V: HashAppend, S> HashAppend for HashMap<K, V, S> {
    const CLASS: TraversalClass = TraversalClass::Sequence;

    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        let mut entries: Vec<(&K, &V)> = self.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        engine::append_sequence(hash, entries);
    }
}

// =============================================================================
// Products
// =============================================================================

impl HashAppend for () {
    const CLASS: TraversalClass = TraversalClass::Product;

    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        Parts::with_arity(hash, 0).finish();
    }
}

impl<T: ?Sized> HashAppend for PhantomData<T> {
    const CLASS: TraversalClass = TraversalClass::Product;

    #[inline]
    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        Parts::with_arity(hash, 0).finish();
    }
}

macro_rules! tuple_impls {
    ($($len:literal => ($($name:ident $idx:tt)+))+) => {
        $(
            impl<$($name: HashAppend),+> HashAppend for ($($name,)+) {
                const CLASS: TraversalClass = TraversalClass::Product;

                #[inline]
                fn hash_append<H: Accumulator>(&self, hash: &mut H) {
                    let mut parts = Parts::with_arity(hash, $len);
                    $(parts.part(&self.$idx);)+
                    parts.finish();
                }
            }
        )+
    };
}

tuple_impls! {
    1 => (T0 0)
    2 => (T0 0 T1 1)
    3 => (T0 0 T1 1 T2 2)
    4 => (T0 0 T1 1 T2 2 T3 3)
    5 => (T0 0 T1 1 T2 2 T3 3 T4 4)
    6 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5)
    7 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6)
    8 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7)
    9 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8)
    10 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9)
    11 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10)
    12 => (T0 0 T1 1 T2 2 T3 3 T4 4 T5 5 T6 6 T7 7 T8 8 T9 9 T10 10 T11 11)
}

// =============================================================================
// Sums
// =============================================================================

impl<T: HashAppend, E: HashAppend> HashAppend for Result<T, E> {
    const CLASS: TraversalClass = TraversalClass::PlainData;

    fn hash_append<H: Accumulator>(&self, hash: &mut H) {
        match self {
            Ok(value) => {
                engine::append_discriminant(hash, 0);
                let mut parts = Parts::with_arity(hash, 1);
                parts.part(value);
                parts.finish();
            }
            Err(err) => {
                engine::append_discriminant(hash, 1);
                let mut parts = Parts::with_arity(hash, 1);
                parts.part(err);
                parts.finish();
            }
        }
    }
}
