//! BLAKE3-backed accumulator.
//!
//! Produces the same digest across processes and platforms for the same
//! byte stream, with far better distribution than FNV at a higher cost.

use super::Accumulator;

/// A deterministic accumulator using blake3.
///
/// The digest is the first 8 bytes of the BLAKE3 output, read as a
/// little-endian `u64`.
#[derive(Debug, Clone)]
pub struct StableHasher {
    inner: blake3::Hasher,
}

impl StableHasher {
    /// Create a new StableHasher
    #[inline]
    pub fn new() -> Self {
        Self {
            inner: blake3::Hasher::new(),
        }
    }

    /// Full 32-byte BLAKE3 output of everything consumed so far.
    pub fn finish_wide(&self) -> [u8; 32] {
        *self.inner.finalize().as_bytes()
    }
}

impl Default for StableHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Accumulator for StableHasher {
    type Output = u64;

    #[inline]
    fn consume(&mut self, bytes: &[u8]) {
        self.inner.update(bytes);
    }

    #[inline]
    fn finish(&self) -> u64 {
        let wide = self.finish_wide();
        let mut head = [0u8; 8];
        head.copy_from_slice(&wide[..8]);
        u64::from_le_bytes(head)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_blake3_prefix() {
        let mut acc = StableHasher::new();
        acc.consume(b"hello");

        let expected = blake3::hash(b"hello");
        assert_eq!(acc.finish_wide(), *expected.as_bytes());
        assert_eq!(acc.finish().to_le_bytes(), expected.as_bytes()[..8]);
    }

    #[test]
    fn test_chunking_invariance() {
        let mut split = StableHasher::new();
        split.consume(b"hel");
        split.consume(b"lo");

        let mut whole = StableHasher::new();
        whole.consume(b"hello");

        assert_eq!(split.finish(), whole.finish());
    }
}
