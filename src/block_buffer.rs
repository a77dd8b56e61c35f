//! Fixed-capacity buffer that packs whole record serializations back to
//! back, ready to be handed to a BGZF compressor.

use crate::error::{BlockBufferError, Result};
use crate::record::BamRecord;

/// BGZF logical block size (`0xFF00`), used as the default capacity.
pub const DEFAULT_CAPACITY: usize = 0xFF00;

/// A fixed-capacity, heap-allocated write buffer with a cursor. Content
/// below the cursor is always a concatenation of complete record
/// serializations — there are no partial writes, ever, observable from
/// outside [`Self::write`].
#[derive(Debug, Clone)]
pub struct BamBlockBuffer {
    buf: Box<[u8]>,
    cursor: usize,
}

impl Default for BamBlockBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl BamBlockBuffer {
    /// Builds a buffer with the default BGZF block capacity.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Builds a buffer with a caller-chosen capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: vec![0u8; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    /// Total capacity in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Current write cursor.
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Serializes `record` into the buffer and advances the cursor.
    ///
    /// Returns the number of bytes written, or `0` if `record` would not
    /// fit in the remaining space — the caller must flush (e.g. compress
    /// [`Self::view`] and [`Self::reset`]) and retry. A `0` return never
    /// advances the cursor.
    ///
    /// # Errors
    /// Returns [`BlockBufferError::RecordExceedsCapacity`] if `record`
    /// alone is larger than the buffer's total capacity — retrying after a
    /// flush could never succeed.
    pub fn write(&mut self, record: &BamRecord) -> Result<usize> {
        let n = record.wire_len();
        if n > self.buf.len() {
            return Err(BlockBufferError::RecordExceedsCapacity(n, self.buf.len()).into());
        }
        if self.cursor + n > self.buf.len() {
            return Ok(0);
        }
        record.write_into(&mut self.buf[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }

    /// Rewinds the cursor to the start without clearing the bytes.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }

    /// A read-only view of the written region, `buffer[0..cursor]`.
    #[must_use]
    pub fn view(&self) -> &[u8] {
        &self.buf[..self.cursor]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_record(name: &[u8]) -> BamRecord {
        let mut r = BamRecord::default();
        r.set_read_name(name).unwrap();
        r.set_sequence(b"ACGT", None).unwrap();
        r
    }

    #[test]
    fn writes_fill_sequentially_and_view_matches_sum_of_sizes() {
        let mut buf = BamBlockBuffer::with_capacity(256);
        let r1 = small_record(b"r1");
        let r2 = small_record(b"r2");
        let n1 = buf.write(&r1).unwrap();
        let n2 = buf.write(&r2).unwrap();
        assert_eq!(buf.view().len(), n1 + n2);
        assert_eq!(&buf.view()[..n1], &r1.to_bytes()[..]);
        assert_eq!(&buf.view()[n1..n1 + n2], &r2.to_bytes()[..]);
    }

    #[test]
    fn write_never_exceeds_capacity_and_zero_return_does_not_advance() {
        let r = small_record(b"r");
        let cap = r.wire_len() + 2;
        let mut buf = BamBlockBuffer::with_capacity(cap);
        assert!(buf.write(&r).unwrap() > 0);
        let cursor_before = buf.cursor();
        let result = buf.write(&r).unwrap();
        assert_eq!(result, 0);
        assert_eq!(buf.cursor(), cursor_before);
    }

    #[test]
    fn record_larger_than_capacity_errors() {
        let r = small_record(b"a-somewhat-longer-read-name-here");
        let mut buf = BamBlockBuffer::with_capacity(4);
        assert!(buf.write(&r).is_err());
    }

    #[test]
    fn reset_rewinds_cursor() {
        let mut buf = BamBlockBuffer::with_capacity(256);
        buf.write(&small_record(b"r")).unwrap();
        assert!(buf.cursor() > 0);
        buf.reset();
        assert_eq!(buf.cursor(), 0);
        assert_eq!(buf.view().len(), 0);
    }
}
