//! Error taxonomy for the codec.
//!
//! One `thiserror` enum per concern, matching the kinds of failure each
//! component can produce on its own; a crate-wide [`Error`] aggregates all
//! of them via `#[from]` so callers can propagate with `?` regardless of
//! which layer raised.

/// Errors raised while constructing or parsing a [`crate::Cigar`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CigarError {
    #[error("invalid CIGAR operator character {0:?}")]
    InvalidOperator(char),

    #[error("CIGAR run length {0} exceeds the maximum of 268435455 (2^28 - 1)")]
    LengthOutOfRange(u32),

    #[error("CIGAR operator code {0} is not one of the 10 defined operators")]
    InvalidOperatorCode(u8),

    #[error("buffer length {0} is not a multiple of 4 bytes")]
    InvalidBufferLength(usize),

    #[error("malformed CIGAR string at byte offset {0}")]
    MalformedString(usize),
}

/// Errors raised while packing or unpacking the IUPAC-encoded sequence.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("byte {0:#04x} at index {1} is not a valid IUPAC nucleotide code")]
    InvalidNucleotide(u8, usize),

    #[error("quality length ({got}) does not match sequence length ({expected})")]
    LengthMismatch { expected: usize, got: usize },
}

/// Errors raised while reading or writing auxiliary tags.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TagError {
    #[error("unknown tag type byte {0:#04x} ({0:?})")]
    InvalidTagType(u8),

    #[error("tag block ended mid-entry")]
    Truncated,

    #[error("tag {0:?} not found")]
    NotFound([u8; 2]),

    #[error("value does not fit in the target tag type")]
    OutOfRange,

    #[error("array byte length {0} is not a multiple of the element size {1}")]
    LengthMismatch(usize, usize),

    #[error("wrong value kind for tag {0:?}")]
    TypeError(&'static str),

    #[error("decoding tag type {0:?} is not supported")]
    NotSupported(char),
}

/// Errors raised while constructing or mutating a [`crate::BamRecord`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("read name length {0} exceeds the maximum of 254")]
    ReadNameTooLong(usize),

    #[error("read name bytes are not ASCII")]
    NonAsciiReadName,

    #[error("block_size {0} exceeds the u32 range")]
    BlockSizeOverflow(u64),

    #[error("CIGAR with {0} operations exceeds the 65535-operation on-wire limit")]
    CigarTooLong(usize),
}

/// Errors raised while iterating records out of a byte buffer.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IteratorError {
    #[error("buffer ended before a complete record header could be read")]
    TruncatedHeader,

    #[error("record claims {claimed} bytes but only {available} remain in the buffer")]
    TruncatedRecord { claimed: usize, available: usize },

    #[error("read name is not ASCII")]
    NonAsciiReadName,
}

/// Errors raised while constructing or decoding a [`crate::VirtualFileOffset`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum OffsetError {
    #[error("compressed offset {0:#x} exceeds the 48-bit range")]
    CoffsetOutOfRange(u64),

    #[error("uncompressed offset {0:#x} exceeds the 16-bit range")]
    UoffsetOutOfRange(u32),

    #[error("buffer length {0} is not a valid multiple for this decode ({1})")]
    LengthInvalid(usize, usize),
}

/// Errors raised by [`crate::BamBlockBuffer`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BlockBufferError {
    #[error("record is larger than the buffer's total capacity ({0} > {1})")]
    RecordExceedsCapacity(usize, usize),
}

/// The crate-wide error type. Every component-specific error converts into
/// this via `?`.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Cigar(#[from] CigarError),

    #[error(transparent)]
    Sequence(#[from] SequenceError),

    #[error(transparent)]
    Tag(#[from] TagError),

    #[error(transparent)]
    Record(#[from] RecordError),

    #[error(transparent)]
    Iterator(#[from] IteratorError),

    #[error(transparent)]
    Offset(#[from] OffsetError),

    #[error(transparent)]
    BlockBuffer(#[from] BlockBufferError),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
