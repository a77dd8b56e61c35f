//! BGZF virtual file offset: a packed 48+16-bit value used by BAM indexes.

use crate::error::{OffsetError, Result};
use byteorder::{ByteOrder, LittleEndian};

const COFFSET_MAX: u64 = (1 << 48) - 1;
const UOFFSET_MAX: u32 = (1 << 16) - 1;

/// A packed virtual file offset: high 48 bits are the compressed-file byte
/// offset (`coffset`), low 16 bits are the intra-block uncompressed offset
/// (`uoffset`). Ordered by the packed integer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VirtualFileOffset(u64);

impl VirtualFileOffset {
    /// Packs `coffset` and `uoffset` as `(coffset << 16) | uoffset` — the
    /// spec's corrected composition (the AND in one source variant was a
    /// bug; see `spec.md` §9).
    ///
    /// # Errors
    /// Returns [`OffsetError::CoffsetOutOfRange`] if `coffset > 2^48 - 1`,
    /// or [`OffsetError::UoffsetOutOfRange`] if `uoffset > 0xFFFF`.
    pub fn new(coffset: u64, uoffset: u32) -> Result<Self> {
        if coffset > COFFSET_MAX {
            return Err(OffsetError::CoffsetOutOfRange(coffset).into());
        }
        if uoffset > UOFFSET_MAX {
            return Err(OffsetError::UoffsetOutOfRange(uoffset).into());
        }
        Ok(Self((coffset << 16) | u64::from(uoffset)))
    }

    fn from_packed(value: u64) -> Self {
        Self(value)
    }

    /// Decodes exactly 8 little-endian bytes as a packed offset.
    ///
    /// # Errors
    /// Returns [`OffsetError::LengthInvalid`] if `bytes.len() != 8`.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != 8 {
            return Err(OffsetError::LengthInvalid(bytes.len(), 8).into());
        }
        Ok(Self::from_packed(LittleEndian::read_u64(bytes)))
    }

    /// The compressed-file byte offset component.
    #[must_use]
    pub fn coffset(&self) -> u64 {
        self.0 >> 16
    }

    /// The intra-block uncompressed offset component.
    #[must_use]
    pub fn uoffset(&self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// The packed 64-bit value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }

    /// Decodes a packed byte blob into a list of offsets, 8 bytes each.
    ///
    /// # Errors
    /// Returns [`OffsetError::LengthInvalid`] if `buf.len()` is not a
    /// multiple of 8.
    pub fn decode_list(buf: &[u8]) -> Result<Vec<Self>> {
        if buf.len() % 8 != 0 {
            return Err(OffsetError::LengthInvalid(buf.len(), 8).into());
        }
        buf.chunks_exact(8).map(Self::from_bytes).collect()
    }

    /// Decodes a packed byte blob into a list of `(start, end)` chunk
    /// pairs, 16 bytes each.
    ///
    /// # Errors
    /// Returns [`OffsetError::LengthInvalid`] if `buf.len()` is not a
    /// multiple of 16.
    pub fn decode_chunks(buf: &[u8]) -> Result<Vec<(Self, Self)>> {
        if buf.len() % 16 != 0 {
            return Err(OffsetError::LengthInvalid(buf.len(), 16).into());
        }
        buf.chunks_exact(16)
            .map(|chunk| Ok((Self::from_bytes(&chunk[0..8])?, Self::from_bytes(&chunk[8..16])?)))
            .collect()
    }
}
