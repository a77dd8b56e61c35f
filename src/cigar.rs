//! CIGAR container: an owned, immutable-after-construction array of 32-bit
//! CIGAR words.
//!
//! Each word packs an operation code (low 4 bits, `0..=9`) and a run length
//! (upper 28 bits). The type never validates alignment semantics — only that
//! words are well-formed.

use crate::error::{CigarError, Result};
use byteorder::{ByteOrder, LittleEndian};

/// Maximum run length a CIGAR word can encode (`2^28 - 1`).
pub const MAX_OP_LEN: u32 = 0x0FFF_FFFF;

/// Operator code for soft-clip (`S`), used to detect the oversized-CIGAR
/// placeholder.
pub(crate) const OP_SOFT_CLIP: u8 = 4;

/// `MIDNSHP=XB` in on-wire operator order; index is the 4-bit op code.
const OPS: [u8; 10] = *b"MIDNSHP=XB";

fn op_code(letter: u8) -> Option<u8> {
    OPS.iter().position(|&c| c == letter).map(|i| i as u8)
}

fn op_letter(code: u8) -> Option<u8> {
    OPS.get(code as usize).copied()
}

/// An owned sequence of CIGAR words.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Cigar {
    words: Vec<u32>,
}

impl Cigar {
    /// Builds a CIGAR directly from already-packed 32-bit words, with no
    /// validation. Used internally to reconstruct the logical CIGAR from a
    /// decoded `CG B I` tag.
    #[must_use]
    pub(crate) fn from_words(words: Vec<u32>) -> Self {
        Self { words }
    }

    /// Packs a single `(op, len)` pair into its on-wire 32-bit representation.
    ///
    /// # Errors
    /// Returns [`CigarError::InvalidOperatorCode`] if `op > 9` or
    /// [`CigarError::LengthOutOfRange`] if `len > MAX_OP_LEN`.
    pub fn pack_word(op: u8, len: u32) -> Result<u32> {
        if op > 9 {
            return Err(CigarError::InvalidOperatorCode(op).into());
        }
        if len > MAX_OP_LEN {
            return Err(CigarError::LengthOutOfRange(len).into());
        }
        Ok((len << 4) | u32::from(op))
    }

    /// Parses a CIGAR string such as `"3M1I2D"`.
    ///
    /// # Errors
    /// Returns [`CigarError::MalformedString`] on a malformed run-length or
    /// operator character, or [`CigarError::LengthOutOfRange`] on a run
    /// length exceeding [`MAX_OP_LEN`].
    pub fn from_string(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let mut words = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let start = i;
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            if i == start {
                return Err(CigarError::MalformedString(start).into());
            }
            let len: u32 = std::str::from_utf8(&bytes[start..i])
                .ok()
                .and_then(|digits| digits.parse().ok())
                .ok_or(CigarError::MalformedString(start))?;
            if i >= bytes.len() {
                return Err(CigarError::MalformedString(i).into());
            }
            let letter = bytes[i];
            let op = op_code(letter).ok_or(CigarError::InvalidOperator(letter as char))?;
            i += 1;
            words.push(Self::pack_word(op, len)?);
        }
        Ok(Self { words })
    }

    /// Builds a CIGAR from an iterator of `(op, len)` pairs.
    ///
    /// # Errors
    /// Returns [`CigarError::InvalidOperatorCode`] or
    /// [`CigarError::LengthOutOfRange`] if any pair is out of range.
    pub fn from_pairs<I: IntoIterator<Item = (u8, u32)>>(pairs: I) -> Result<Self> {
        let words = pairs
            .into_iter()
            .map(|(op, len)| Self::pack_word(op, len))
            .collect::<Result<Vec<u32>>>()?;
        Ok(Self { words })
    }

    /// Reinterprets a raw byte buffer as a little-endian `u32` CIGAR array.
    ///
    /// No content validation is performed beyond the length check.
    ///
    /// # Errors
    /// Returns [`CigarError::InvalidBufferLength`] if `buf.len()` is not a
    /// multiple of 4.
    pub fn from_buffer(buf: &[u8]) -> Result<Self> {
        if buf.len() % 4 != 0 {
            return Err(CigarError::InvalidBufferLength(buf.len()).into());
        }
        let words = buf.chunks_exact(4).map(LittleEndian::read_u32).collect();
        Ok(Self { words })
    }

    /// Number of CIGAR operations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Returns `true` if this CIGAR has no operations.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Iterates over `(op, len)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (u8, u32)> + '_ {
        self.words.iter().map(|&w| ((w & 0xF) as u8, w >> 4))
    }

    /// Read-only view of the underlying 32-bit little-endian words.
    #[must_use]
    pub fn words(&self) -> &[u32] {
        &self.words
    }

    /// A memoryview-compatible byte buffer of the underlying words (element
    /// size 4, little-endian), built with an explicit per-word serializer
    /// rather than a struct-layout cast so the result is correct on every
    /// target regardless of host endianness.
    #[must_use]
    pub fn as_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.words.len() * 4];
        for (chunk, &word) in out.chunks_exact_mut(4).zip(&self.words) {
            LittleEndian::write_u32(chunk, word);
        }
        out
    }

    /// Sum of the run lengths of reference-consuming operations (`M D N = X`).
    ///
    /// Used when building the oversized-CIGAR placeholder's `skip` run.
    #[must_use]
    pub fn reference_consumed_len(&self) -> u64 {
        self.iter()
            .filter(|(op, _)| matches!(op, 0 | 2 | 3 | 7 | 8))
            .map(|(_, len)| u64::from(len))
            .sum()
    }

    /// Renders the CIGAR as a string such as `"3M1I2D"`.
    #[must_use]
    pub fn to_string_repr(&self) -> String {
        let mut out = String::with_capacity(self.words.len() * 2);
        for (op, len) in self.iter() {
            out.push_str(&len.to_string());
            out.push(op_letter(op).unwrap_or(b'?') as char);
        }
        out
    }
}

impl std::fmt::Display for Cigar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_string_repr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_basic_string() {
        let cigar = Cigar::from_string("3M1I2D").unwrap();
        assert_eq!(
            cigar.iter().collect::<Vec<_>>(),
            vec![(0, 3), (1, 1), (2, 2)]
        );
        assert_eq!(cigar.to_string_repr(), "3M1I2D");
    }

    #[test]
    fn zero_length_op_is_valid() {
        let cigar = Cigar::from_string("0M").unwrap();
        assert_eq!(cigar.iter().collect::<Vec<_>>(), vec![(0, 0)]);
    }

    #[test]
    fn rejects_length_out_of_range() {
        let err = Cigar::from_string("268435456M").unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Cigar(CigarError::LengthOutOfRange(268_435_456))
        ));
    }

    #[test]
    fn rejects_bad_operator() {
        assert!(Cigar::from_string("3Q").is_err());
    }

    #[test]
    fn from_pairs_round_trips_through_string() {
        let cigar = Cigar::from_pairs([(0u8, 3u32), (1, 1), (2, 2)]).unwrap();
        assert_eq!(Cigar::from_string(&cigar.to_string_repr()).unwrap(), cigar);
    }

    #[test]
    fn from_buffer_reinterprets_le_words() {
        let word = Cigar::pack_word(0, 3).unwrap();
        let mut buf = [0u8; 4];
        LittleEndian::write_u32(&mut buf, word);
        let cigar = Cigar::from_buffer(&buf).unwrap();
        assert_eq!(cigar.iter().collect::<Vec<_>>(), vec![(0, 3)]);
    }

    #[test]
    fn from_buffer_rejects_non_multiple_of_four() {
        assert!(Cigar::from_buffer(&[0, 1, 2]).is_err());
    }

    #[test]
    fn empty_cigar_round_trips() {
        let cigar = Cigar::from_string("").unwrap();
        assert!(cigar.is_empty());
        assert_eq!(cigar.to_string_repr(), "");
    }

    #[test]
    fn reference_consumed_len_excludes_insertions_and_softclips() {
        let cigar = Cigar::from_string("3M2S1I4D").unwrap();
        assert_eq!(cigar.reference_consumed_len(), 7);
    }

    #[test]
    fn as_bytes_matches_from_buffer_round_trip() {
        let cigar = Cigar::from_string("3M1I2D").unwrap();
        assert_eq!(Cigar::from_buffer(&cigar.as_bytes()).unwrap(), cigar);
    }
}
