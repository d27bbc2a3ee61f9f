//! Byte-recording accumulator for inspecting encodings.

use std::fmt::Write as _;

use smallvec::SmallVec;

use super::Accumulator;

/// Records every consumed byte instead of hashing.
///
/// The "digest" is the number of bytes recorded. Useful for checking what
/// a traversal actually feeds to a real accumulator.
///
/// ```
/// use shapehash::{hash_append, ByteRecorder};
///
/// let mut rec = ByteRecorder::new();
/// hash_append(&mut rec, &42u16);
/// assert_eq!(rec.bytes(), &[42, 0]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ByteRecorder {
    buf: SmallVec<[u8; 64]>,
}

impl ByteRecorder {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes recorded so far.
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes recorded.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Hex dump, 16 space-separated bytes per line.
    pub fn hex_dump(&self) -> String {
        let mut out = String::with_capacity(self.buf.len() * 3 + self.buf.len() / 16 + 1);
        for line in self.buf.chunks(16) {
            for (i, byte) in line.iter().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                let _ = write!(out, "{byte:02x}");
            }
            out.push('\n');
        }
        out
    }
}

impl Accumulator for ByteRecorder {
    type Output = usize;

    #[inline]
    fn consume(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    #[inline]
    fn finish(&self) -> usize {
        self.buf.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut rec = ByteRecorder::new();
        rec.consume(&[1, 2]);
        rec.consume(&[3]);
        assert_eq!(rec.bytes(), &[1, 2, 3]);
        assert_eq!(rec.finish(), 3);
    }

    #[test]
    fn test_hex_dump_wraps_every_sixteen_bytes() {
        let mut rec = ByteRecorder::new();
        rec.consume(&[0xab; 17]);
        let dump = rec.hex_dump();
        let lines: Vec<_> = dump.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].split(' ').count(), 16);
        assert_eq!(lines[1], "ab");
    }

    #[test]
    fn test_empty_dump() {
        assert!(ByteRecorder::new().is_empty());
        assert_eq!(ByteRecorder::new().hex_dump(), "");
    }
}
