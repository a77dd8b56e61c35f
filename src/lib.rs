//! In-memory codec for BAM alignment records.
//!
//! This crate decodes, represents, mutates, and re-encodes BAM alignment
//! records — the binary form of SAM — together with their auxiliary tag
//! block, CIGAR array, 4-bit packed IUPAC sequence, and base-quality array.
//! It also provides a fixed-capacity buffer that packs whole records
//! back-to-back for later compression into a BGZF container, and a value
//! type for the virtual file offsets used by BGZF indexes.
//!
//! BGZF compression, file I/O, the SAM text format, index construction,
//! and header (`@HD`/`@SQ`) parsing are out of scope — this crate consumes
//! already-decompressed BAM record bytes and emits uncompressed record
//! bytes.

#![allow(clippy::module_inception)]

pub mod block_buffer;
pub mod cigar;
pub mod error;
pub mod iterator;
pub mod iupac;
pub mod offset;
pub mod record;
pub mod tag;
mod utils;

pub use block_buffer::BamBlockBuffer;
pub use cigar::Cigar;
pub use error::{
    BlockBufferError, CigarError, Error, IteratorError, OffsetError, RecordError, Result,
    SequenceError, TagError,
};
pub use iterator::BamIterator;
pub use offset::VirtualFileOffset;
pub use record::BamRecord;
pub use tag::{TagArrayView, TagInput, TagType, TagValue};
