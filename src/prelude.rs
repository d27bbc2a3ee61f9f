//! Prelude module for common imports.
//!
//! ```
//! use shapehash::prelude::*;
//!
//! let key = fnv1a64(&(1u8, "one"));
//! assert_eq!(key, digest::<Fnv1a64, _>(&(1u8, "one")));
//! ```

// Accumulators
pub use crate::accumulator::{Accumulator, ByteRecorder, Fnv1a32, Fnv1a64, StableHasher};

// Traversal
pub use crate::append::HashAppend;
pub use crate::class::{TraversalClass, class_of};
pub use crate::engine::Parts;

// Entry points
pub use crate::hash::{StructuralHash, digest, fnv1a32, fnv1a64, hash_append, stable_digest};

// Lookup table
pub use crate::map::DigestMap;

// JSON
#[cfg(feature = "json")]
pub use crate::json::{JsonError, JsonResult, ReadJson, WriteJson, from_str, to_string};

// Derives
#[cfg(feature = "derive")]
pub use shapehash_macros::HashAppend;
