//! Lookup table keyed by structural digests.
//!
//! [`DigestMap`] accepts any `K: HashAppend + Eq` as a key without the key
//! type implementing `std::hash::Hash`. Keys are bucketed by their folded
//! digest; keys whose digests collide share a bucket and are told apart
//! with `Eq`.

use std::fmt;
use std::marker::PhantomData;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{digest, Accumulator, DigestWord, Fnv1a64, HashAppend};

type Bucket<K, V> = SmallVec<[(K, V); 1]>;

/// Hash map parameterized by a structural accumulator `H`.
///
/// ```
/// use shapehash::{DigestMap, HashAppend};
///
/// #[derive(HashAppend, PartialEq, Eq)]
/// struct Cell {
///     x: i32,
///     y: i32,
/// }
///
/// let mut map: DigestMap<Cell, &str> = DigestMap::new();
/// map.insert(Cell { x: 1, y: 2 }, "wall");
/// assert_eq!(map.get(&Cell { x: 1, y: 2 }), Some(&"wall"));
/// assert_eq!(map.get(&Cell { x: 2, y: 1 }), None);
/// ```
pub struct DigestMap<K, V, H = Fnv1a64> {
    buckets: FxHashMap<u64, Bucket<K, V>>,
    len: usize,
    _accumulator: PhantomData<fn() -> H>,
}

impl<K, V, H> DigestMap<K, V, H>
where
    K: HashAppend + Eq,
    H: Accumulator + Default,
{
    /// Create an empty map.
    pub fn new() -> Self {
        Self {
            buckets: FxHashMap::default(),
            len: 0,
            _accumulator: PhantomData,
        }
    }

    #[inline]
    fn slot(key: &K) -> u64 {
        digest::<H, K>(key).fold_u64()
    }

    /// Insert a value, returning the previous value for an equal key.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let bucket = self.buckets.entry(Self::slot(&key)).or_default();
        if let Some((_, existing)) = bucket.iter_mut().find(|(k, _)| *k == key) {
            return Some(std::mem::replace(existing, value));
        }
        bucket.push((key, value));
        self.len += 1;
        None
    }

    /// Look up a value.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.buckets
            .get(&Self::slot(key))?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Look up a value mutably.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.buckets
            .get_mut(&Self::slot(key))?
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// True if an equal key is present.
    pub fn contains_key(&self, key: &K) -> bool {
        self.get(key).is_some()
    }

    /// Remove a key, returning its value.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let slot = Self::slot(key);
        let bucket = self.buckets.get_mut(&slot)?;
        let index = bucket.iter().position(|(k, _)| k == key)?;
        let (_, value) = bucket.swap_remove(index);
        if bucket.is_empty() {
            self.buckets.remove(&slot);
        }
        self.len -= 1;
        Some(value)
    }
}

impl<K, V, H> DigestMap<K, V, H> {
    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Iterate over entries in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.buckets
            .values()
            .flat_map(|bucket| bucket.iter().map(|(k, v)| (k, v)))
    }

    /// Number of distinct digests in use.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }
}

impl<K, V, H> Default for DigestMap<K, V, H>
where
    K: HashAppend + Eq,
    H: Accumulator + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, H> Extend<(K, V)> for DigestMap<K, V, H>
where
    K: HashAppend + Eq,
    H: Accumulator + Default,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K, V, H> FromIterator<(K, V)> for DigestMap<K, V, H>
where
    K: HashAppend + Eq,
    H: Accumulator + Default,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K: fmt::Debug, V: fmt::Debug, H> fmt::Debug for DigestMap<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}
