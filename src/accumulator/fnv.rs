//! FNV-1a streaming hash.
//!
//! `code = (code ^ byte) * PRIME` for every input byte, starting from
//! `OFFSET`. Fast and well distributed for table keys; not collision
//! resistant.

use super::{Accumulator, DigestWord};

/// A word width with FNV-1a parameters.
pub trait FnvWord: DigestWord {
    /// FNV prime for this width.
    const PRIME: Self;
    /// FNV offset basis for this width.
    const OFFSET: Self;

    /// Mix one byte into the code.
    fn step(self, byte: u8) -> Self;
}

/// FNV-1a accumulator over a word of type `W`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fnv1a<W: FnvWord> {
    code: W,
}

impl<W: FnvWord> Fnv1a<W> {
    /// Create an accumulator at the offset basis.
    #[inline]
    pub const fn new() -> Self {
        Self { code: W::OFFSET }
    }
}

impl<W: FnvWord> Default for Fnv1a<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: FnvWord> Accumulator for Fnv1a<W> {
    type Output = W;

    #[inline]
    fn consume(&mut self, bytes: &[u8]) {
        let mut code = self.code;
        for &byte in bytes {
            code = code.step(byte);
        }
        self.code = code;
    }

    #[inline]
    fn finish(&self) -> W {
        self.code
    }
}

macro_rules! fnv_width {
    ($bits:literal, $word:ty, prime = $prime:literal, offset = $offset:literal) => {
        ::paste::paste! {
            #[doc = "FNV-1a prime for " $bits "-bit digests."]
            pub const [<FNV $bits _PRIME>]: $word = $prime;

            #[doc = "FNV-1a offset basis for " $bits "-bit digests."]
            pub const [<FNV $bits _OFFSET>]: $word = $offset;

            impl FnvWord for $word {
                const PRIME: Self = [<FNV $bits _PRIME>];
                const OFFSET: Self = [<FNV $bits _OFFSET>];

                #[inline]
                fn step(self, byte: u8) -> Self {
                    (self ^ byte as $word).wrapping_mul(Self::PRIME)
                }
            }

            #[doc = "FNV-1a with a " $bits "-bit digest."]
            pub type [<Fnv1a $bits>] = Fnv1a<$word>;
        }
    };
}

fnv_width!(32, u32, prime = 16_777_619, offset = 2_166_136_261);
fnv_width!(64, u64, prime = 1_099_511_628_211, offset = 14_695_981_039_346_656_037);

#[cfg(test)]
mod tests {
    use super::*;

    fn fnv64(bytes: &[u8]) -> u64 {
        let mut acc = Fnv1a64::new();
        acc.consume(bytes);
        acc.finish()
    }

    fn fnv32(bytes: &[u8]) -> u32 {
        let mut acc = Fnv1a32::new();
        acc.consume(bytes);
        acc.finish()
    }

    #[test]
    fn test_empty_input_is_offset_basis() {
        assert_eq!(fnv32(b""), FNV32_OFFSET);
        assert_eq!(fnv64(b""), FNV64_OFFSET);
    }

    #[test]
    fn test_reference_vectors() {
        assert_eq!(fnv32(b"a"), 0xe40c_292c);
        assert_eq!(fnv32(b"foobar"), 0xbf9c_f968);
        assert_eq!(fnv64(b"a"), 0xaf63_dc4c_8601_ec8c);
        assert_eq!(fnv64(b"foobar"), 0x8594_4171_f739_67e8);
    }

    #[test]
    fn test_chunking_invariance() {
        let whole = fnv64(b"structural hashing");

        let mut acc = Fnv1a64::new();
        acc.consume(b"struc");
        acc.consume(b"");
        acc.consume(b"tural ");
        acc.consume(b"hashing");

        assert_eq!(acc.finish(), whole);
    }

    #[test]
    fn test_finish_does_not_reset() {
        let mut acc = Fnv1a32::new();
        acc.consume(b"x");
        assert_eq!(acc.finish(), acc.finish());
    }
}
