//! Parses back-to-back BAM records out of a borrowed byte buffer.

use crate::error::{IteratorError, Result};
use crate::record::BamRecord;

/// Single-pass, non-restartable iterator over records packed back-to-back
/// in `buffer`. Borrows its input for the iterator's whole lifetime; the
/// records it yields own their data and outlive it.
#[derive(Debug)]
pub struct BamIterator<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> BamIterator<'a> {
    /// Wraps `buffer` for iteration starting at its first byte.
    #[must_use]
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Byte offset of the next record to be parsed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}

impl<'a> Iterator for BamIterator<'a> {
    type Item = Result<BamRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position == self.buffer.len() {
            return None;
        }
        if self.buffer.len() - self.position < 36 {
            return Some(Err(IteratorError::TruncatedHeader.into()));
        }
        match BamRecord::decode(&self.buffer[self.position..]) {
            Ok((record, consumed)) => {
                self.position += consumed;
                Some(Ok(record))
            }
            Err(err) => Some(Err(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::TagInput;

    fn sample_records() -> Vec<BamRecord> {
        let mut a = BamRecord::new(0, 100, b"read1", 60, 0, -1, -1).unwrap();
        a.set_sequence(b"ACGT", None).unwrap();
        a.set_cigar(crate::Cigar::from_string("4M").unwrap()).unwrap();
        a.set_tag(*b"NM", TagInput::Int(0), None).unwrap();

        let mut b = BamRecord::new(0, 200, b"read2", 0, 4, -1, -1).unwrap();
        b.set_sequence(b"TTTT", None).unwrap();

        vec![a, b]
    }

    #[test]
    fn iterates_back_to_back_records_in_order() {
        let records = sample_records();
        let mut buf = Vec::new();
        for r in &records {
            buf.extend_from_slice(&r.to_bytes());
        }
        let decoded: Vec<BamRecord> = BamIterator::new(&buf).collect::<Result<_>>().unwrap();
        assert_eq!(decoded, records);
    }

    #[test]
    fn empty_buffer_yields_nothing() {
        assert!(BamIterator::new(&[]).next().is_none());
    }

    #[test]
    fn short_buffer_is_truncated() {
        let buf = vec![0u8; 10];
        let mut it = BamIterator::new(&buf);
        let err = it.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Iterator(IteratorError::TruncatedHeader)
        ));
    }

    #[test]
    fn block_size_larger_than_buffer_is_truncated() {
        let mut buf = vec![0u8; 40];
        <byteorder::LittleEndian as byteorder::ByteOrder>::write_u32(&mut buf[0..4], 1000);
        let mut it = BamIterator::new(&buf);
        let err = it.next().unwrap().unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Iterator(IteratorError::TruncatedRecord { .. })
        ));
    }
}
