//! Batch digests over slices using rayon.
//!
//! Only available with the `parallel` feature. Each value gets its own
//! accumulator; a single digest is never split across threads.

use rayon::prelude::*;

use crate::{digest, Accumulator, HashAppend};

/// Digest every value in `values`, preserving order.
pub fn digest_all<H, T>(values: &[T]) -> Vec<H::Output>
where
    H: Accumulator + Default,
    T: HashAppend + Sync,
{
    values.par_iter().map(|value| digest::<H, T>(value)).collect()
}

/// Digest every value and pair it with its digest.
pub fn digest_pairs<H, T>(values: &[T]) -> Vec<(&T, H::Output)>
where
    H: Accumulator + Default,
    T: HashAppend + Sync,
{
    values
        .par_iter()
        .map(|value| (value, digest::<H, T>(value)))
        .collect()
}
