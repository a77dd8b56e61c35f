//! The in-memory BAM record: a fixed 32-byte header plus five owned
//! variable-length children (read name, CIGAR, packed sequence, qualities,
//! tags).
//!
//! `block_size` is never stored — it is always recomputed from the current
//! children, which makes invariant 4 of `spec.md` §3 (`block_size == 32 +
//! l_read_name + 4*n_cigar_op + ceil(l_seq/2) + l_seq + len(tags)`) true by
//! construction instead of something every mutator must remember to keep in
//! sync.

use crate::cigar::{Cigar, OP_SOFT_CLIP};
use crate::error::{IteratorError, RecordError, Result};
use crate::iupac;
use crate::tag::{self, TagInput, TagType, TagValue};
use crate::utils::{is_ascii_fast, packed_seq_len};
use byteorder::{ByteOrder, LittleEndian};

/// Fixed on-wire header size, excluding the `block_size` field itself.
const HEADER_SIZE: usize = 32;

/// Maximum number of CIGAR operations the on-wire `n_cigar_op` field can
/// name directly; beyond this a record needs the oversized-CIGAR escape
/// (`RecordError::CigarTooLong`, since this crate refuses it — see
/// `DESIGN.md`).
const MAX_INLINE_CIGAR_OPS: usize = 0xFFFF;

/// An in-memory BAM alignment record.
#[derive(Debug, Clone, PartialEq)]
pub struct BamRecord {
    ref_id: i32,
    pos: i32,
    mapq: u8,
    bin: u16,
    flag: u16,
    next_ref_id: i32,
    next_pos: i32,
    tlen: i32,
    read_name: Vec<u8>,
    cigar: Cigar,
    l_seq: u32,
    seq: Vec<u8>,
    qual: Vec<u8>,
    tags: Vec<u8>,
}

impl Default for BamRecord {
    fn default() -> Self {
        Self {
            ref_id: -1,
            pos: -1,
            mapq: 255,
            bin: 0,
            flag: 0,
            next_ref_id: -1,
            next_pos: -1,
            tlen: 0,
            read_name: Vec::new(),
            cigar: Cigar::default(),
            l_seq: 0,
            seq: Vec::new(),
            qual: Vec::new(),
            tags: Vec::new(),
        }
    }
}

impl BamRecord {
    /// Builds an empty, unmapped record with the given identifying fields
    /// and the spec's defaults for everything else (`mapq = 255`, `flag =
    /// 0`, empty name/CIGAR/sequence/tags).
    ///
    /// # Errors
    /// Returns [`RecordError::NonAsciiReadName`] or
    /// [`RecordError::ReadNameTooLong`] if `read_name` is invalid.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        ref_id: i32,
        pos: i32,
        read_name: &[u8],
        mapq: u8,
        flag: u16,
        next_ref_id: i32,
        next_pos: i32,
    ) -> Result<Self> {
        let mut record = Self {
            ref_id,
            pos,
            mapq,
            flag,
            next_ref_id,
            next_pos,
            ..Self::default()
        };
        record.set_read_name(read_name)?;
        Ok(record)
    }

    // -- fixed-header accessors --------------------------------------

    #[must_use]
    pub fn ref_id(&self) -> i32 {
        self.ref_id
    }

    pub fn set_ref_id(&mut self, ref_id: i32) {
        self.ref_id = ref_id;
    }

    #[must_use]
    pub fn pos(&self) -> i32 {
        self.pos
    }

    pub fn set_pos(&mut self, pos: i32) {
        self.pos = pos;
    }

    #[must_use]
    pub fn mapq(&self) -> u8 {
        self.mapq
    }

    pub fn set_mapq(&mut self, mapq: u8) {
        self.mapq = mapq;
    }

    #[must_use]
    pub fn bin(&self) -> u16 {
        self.bin
    }

    /// `bin` is reserved/derivative on-wire data; this crate stores
    /// whatever the caller sets and never recomputes it from `pos`/CIGAR.
    pub fn set_bin(&mut self, bin: u16) {
        self.bin = bin;
    }

    #[must_use]
    pub fn flag(&self) -> u16 {
        self.flag
    }

    pub fn set_flag(&mut self, flag: u16) {
        self.flag = flag;
    }

    #[must_use]
    pub fn next_ref_id(&self) -> i32 {
        self.next_ref_id
    }

    pub fn set_next_ref_id(&mut self, next_ref_id: i32) {
        self.next_ref_id = next_ref_id;
    }

    #[must_use]
    pub fn next_pos(&self) -> i32 {
        self.next_pos
    }

    pub fn set_next_pos(&mut self, next_pos: i32) {
        self.next_pos = next_pos;
    }

    #[must_use]
    pub fn tlen(&self) -> i32 {
        self.tlen
    }

    pub fn set_tlen(&mut self, tlen: i32) {
        self.tlen = tlen;
    }

    #[must_use]
    pub fn l_seq(&self) -> u32 {
        self.l_seq
    }

    // -- flag bit convenience accessors --------------------------------

    #[must_use]
    pub fn paired(&self) -> bool {
        self.flag & 1 != 0
    }

    #[must_use]
    pub fn proper_pair(&self) -> bool {
        self.flag & 2 != 0
    }

    #[must_use]
    pub fn unmapped(&self) -> bool {
        self.flag & 4 != 0
    }

    #[must_use]
    pub fn mate_unmapped(&self) -> bool {
        self.flag & 8 != 0
    }

    #[must_use]
    pub fn reverse(&self) -> bool {
        self.flag & 16 != 0
    }

    #[must_use]
    pub fn mate_reverse(&self) -> bool {
        self.flag & 32 != 0
    }

    #[must_use]
    pub fn read1(&self) -> bool {
        self.flag & 64 != 0
    }

    #[must_use]
    pub fn read2(&self) -> bool {
        self.flag & 128 != 0
    }

    #[must_use]
    pub fn secondary(&self) -> bool {
        self.flag & 256 != 0
    }

    #[must_use]
    pub fn qcfail(&self) -> bool {
        self.flag & 512 != 0
    }

    #[must_use]
    pub fn duplicate(&self) -> bool {
        self.flag & 1024 != 0
    }

    #[must_use]
    pub fn supplementary(&self) -> bool {
        self.flag & 2048 != 0
    }

    // -- read name --------------------------------------------------

    /// The logical read name, without the trailing NUL.
    #[must_use]
    pub fn read_name(&self) -> &[u8] {
        &self.read_name
    }

    /// `l_read_name` as it would appear on the wire: the logical name
    /// length plus one for the NUL terminator.
    #[must_use]
    pub fn l_read_name(&self) -> u8 {
        (self.read_name.len() + 1) as u8
    }

    /// Sets the read name.
    ///
    /// # Errors
    /// Returns [`RecordError::NonAsciiReadName`] if `name` has any
    /// non-ASCII byte, or [`RecordError::ReadNameTooLong`] if
    /// `name.len() > 254`.
    pub fn set_read_name(&mut self, name: &[u8]) -> Result<()> {
        if name.len() > 254 {
            return Err(RecordError::ReadNameTooLong(name.len()).into());
        }
        if !is_ascii_fast(name) {
            return Err(RecordError::NonAsciiReadName.into());
        }
        let mut candidate = self.clone();
        candidate.read_name = name.to_vec();
        candidate.validate_size()?;
        *self = candidate;
        Ok(())
    }

    // -- cigar --------------------------------------------------------

    /// The on-wire CIGAR word count. Always the length of the stored
    /// (possibly placeholder) array — never the logical length when the
    /// oversized-CIGAR escape is in play, since that distinction only
    /// exists for records this crate did not itself write.
    #[must_use]
    pub fn n_cigar_op(&self) -> u16 {
        self.cigar.len() as u16
    }

    /// The raw on-wire CIGAR array, exactly as stored (and as it will be
    /// serialized). For records using the oversized-CIGAR escape, this is
    /// the 2-op placeholder, not the logical CIGAR — use [`Self::cigar`]
    /// for that.
    #[must_use]
    pub fn raw_cigar(&self) -> &Cigar {
        &self.cigar
    }

    /// The logical CIGAR. Detects the oversized-CIGAR placeholder (exactly
    /// 2 ops, first a soft-clip of length `l_seq`) and, only when a `CG B
    /// I` tag is actually present, decodes the real array from it —
    /// otherwise a legitimate 2-op CIGAR is returned as-is (the corrected
    /// heuristic from `spec.md` §9's REDESIGN FLAG).
    ///
    /// # Errors
    /// Propagates a [`crate::error::TagError`] if a `CG` tag is present
    /// but malformed.
    pub fn cigar(&self) -> Result<Cigar> {
        if self.looks_like_oversized_placeholder() {
            if let Ok(TagValue::Array(view)) = tag::get(&self.tags, *b"CG") {
                if view.subtype() == b'I' {
                    let words: Vec<u32> = view.iter_i64().map(|v| v as u32).collect();
                    return Ok(Cigar::from_words(words));
                }
            }
        }
        Ok(self.cigar.clone())
    }

    fn looks_like_oversized_placeholder(&self) -> bool {
        let words = self.cigar.words();
        words.len() == 2 && (words[0] & 0xF) as u8 == OP_SOFT_CLIP && (words[0] >> 4) == self.l_seq
    }

    /// Sets the CIGAR.
    ///
    /// This crate takes the "refuse" option from `spec.md` §4.4/§9 for the
    /// oversized-CIGAR escape: a CIGAR with more than 65,535 operations is
    /// rejected rather than spliced into a `CG B I` tag. Records that
    /// already use the escape (decoded from elsewhere) are still read
    /// correctly through [`Self::cigar`].
    ///
    /// # Errors
    /// Returns [`RecordError::CigarTooLong`] if `cigar.len() >
    /// 65535`, or [`RecordError::BlockSizeOverflow`] if the new
    /// `block_size` would exceed `u32::MAX`.
    pub fn set_cigar(&mut self, cigar: Cigar) -> Result<()> {
        if cigar.len() > MAX_INLINE_CIGAR_OPS {
            return Err(RecordError::CigarTooLong(cigar.len()).into());
        }
        let mut candidate = self.clone();
        candidate.cigar = cigar;
        candidate.validate_size()?;
        *self = candidate;
        Ok(())
    }

    // -- sequence / quality -------------------------------------------

    /// The packed 4-bit sequence bytes, exactly as stored on the wire.
    #[must_use]
    pub fn packed_sequence(&self) -> &[u8] {
        &self.seq
    }

    /// Unpacks the sequence back to ASCII IUPAC text.
    #[must_use]
    pub fn sequence(&self) -> Vec<u8> {
        iupac::unpack(&self.seq, self.l_seq as usize)
    }

    /// The Phred quality array; all `0xFF` means "omitted".
    #[must_use]
    pub fn qual(&self) -> &[u8] {
        &self.qual
    }

    /// Packs `text` as the sequence and stores `qual` (or `0xFF`-fills if
    /// absent).
    ///
    /// # Errors
    /// Returns [`crate::error::SequenceError::InvalidNucleotide`] for any
    /// non-IUPAC byte in `text`, or
    /// [`crate::error::SequenceError::LengthMismatch`] if `qual` is given
    /// and its length does not equal `text.len()`.
    pub fn set_sequence(&mut self, text: &[u8], qual: Option<&[u8]>) -> Result<()> {
        let packed = iupac::pack(text)?;
        let qual = match qual {
            Some(q) => {
                if q.len() != text.len() {
                    return Err(crate::error::SequenceError::LengthMismatch {
                        expected: text.len(),
                        got: q.len(),
                    }
                    .into());
                }
                q.to_vec()
            }
            None => vec![0xFF; text.len()],
        };
        let mut candidate = self.clone();
        candidate.seq = packed;
        candidate.qual = qual;
        candidate.l_seq = text.len() as u32;
        candidate.validate_size()?;
        *self = candidate;
        Ok(())
    }

    // -- tags -----------------------------------------------------------

    /// The opaque tag blob, exactly as stored on the wire.
    #[must_use]
    pub fn tag_bytes(&self) -> &[u8] {
        &self.tags
    }

    /// Reads tag `name`.
    ///
    /// # Errors
    /// Returns [`crate::error::TagError::NotFound`] if absent, or
    /// propagates a decode error from the tag codec.
    pub fn get_tag(&self, name: [u8; 2]) -> Result<TagValue<'_>> {
        tag::get(&self.tags, name)
    }

    /// Writes (or overwrites) tag `name`.
    ///
    /// # Errors
    /// Propagates any [`crate::error::TagError`] from encoding, or
    /// [`RecordError::BlockSizeOverflow`] if the new tag block would push
    /// `block_size` past `u32::MAX`.
    pub fn set_tag(&mut self, name: [u8; 2], value: TagInput, explicit: Option<TagType>) -> Result<()> {
        let new_tags = tag::set(&self.tags, name, value, explicit)?;
        let mut candidate = self.clone();
        candidate.tags = new_tags;
        candidate.validate_size()?;
        *self = candidate;
        Ok(())
    }

    /// Removes tag `name`, if present.
    ///
    /// # Errors
    /// Propagates any error from scanning the tag blob.
    pub fn remove_tag(&mut self, name: [u8; 2]) -> Result<()> {
        self.tags = tag::remove(&self.tags, name)?;
        Ok(())
    }

    // -- sizing / serialization -----------------------------------------

    fn candidate_block_size(&self) -> u64 {
        HEADER_SIZE as u64
            + u64::from(self.l_read_name())
            + 4 * self.cigar.len() as u64
            + packed_seq_len(self.l_seq) as u64
            + u64::from(self.l_seq)
            + self.tags.len() as u64
    }

    fn validate_size(&self) -> Result<()> {
        let size = self.candidate_block_size();
        if size > u64::from(u32::MAX) {
            return Err(RecordError::BlockSizeOverflow(size).into());
        }
        Ok(())
    }

    /// `block_size` as it would appear on the wire: the total serialized
    /// size excluding the 4 bytes of the field itself. Always consistent
    /// with the current children — there is no separate stored field to
    /// go stale.
    #[must_use]
    pub fn block_size(&self) -> u32 {
        self.candidate_block_size() as u32
    }

    /// Total on-wire length of this record, including the 4-byte
    /// `block_size` prefix.
    #[must_use]
    pub fn wire_len(&self) -> usize {
        4 + self.block_size() as usize
    }

    /// Serializes this record into `dst`, which must be at least
    /// [`Self::wire_len`] bytes. Returns the number of bytes written.
    ///
    /// # Panics
    /// Panics if `dst` is shorter than [`Self::wire_len`].
    pub fn write_into(&self, dst: &mut [u8]) -> usize {
        let len = self.wire_len();
        assert!(dst.len() >= len, "destination buffer too small for record");
        LittleEndian::write_u32(&mut dst[0..4], self.block_size());
        LittleEndian::write_i32(&mut dst[4..8], self.ref_id);
        LittleEndian::write_i32(&mut dst[8..12], self.pos);
        dst[12] = self.l_read_name();
        dst[13] = self.mapq;
        LittleEndian::write_u16(&mut dst[14..16], self.bin);
        LittleEndian::write_u16(&mut dst[16..18], self.n_cigar_op());
        LittleEndian::write_u16(&mut dst[18..20], self.flag);
        LittleEndian::write_u32(&mut dst[20..24], self.l_seq);
        LittleEndian::write_i32(&mut dst[24..28], self.next_ref_id);
        LittleEndian::write_i32(&mut dst[28..32], self.next_pos);
        LittleEndian::write_i32(&mut dst[32..36], self.tlen);

        let mut cursor = 36;
        dst[cursor..cursor + self.read_name.len()].copy_from_slice(&self.read_name);
        cursor += self.read_name.len();
        dst[cursor] = 0;
        cursor += 1;

        for &word in self.cigar.words() {
            LittleEndian::write_u32(&mut dst[cursor..cursor + 4], word);
            cursor += 4;
        }

        dst[cursor..cursor + self.seq.len()].copy_from_slice(&self.seq);
        cursor += self.seq.len();

        dst[cursor..cursor + self.qual.len()].copy_from_slice(&self.qual);
        cursor += self.qual.len();

        dst[cursor..cursor + self.tags.len()].copy_from_slice(&self.tags);
        cursor += self.tags.len();

        debug_assert_eq!(cursor, len);
        len
    }

    /// Serializes this record to a freshly allocated byte vector.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = vec![0u8; self.wire_len()];
        self.write_into(&mut buf);
        buf
    }

    /// Decodes one record from the front of `buf`, returning the record
    /// and the number of bytes consumed (`4 + block_size`).
    ///
    /// `buf` must hold at least one full record; the caller (typically
    /// [`crate::iterator::BamIterator`]) is responsible for the
    /// end-of-stream and "fewer than 36 bytes remain" checks described in
    /// `spec.md` §4.5.
    ///
    /// # Errors
    /// Returns [`IteratorError::TruncatedHeader`] if `buf` is shorter than
    /// 36 bytes, [`IteratorError::TruncatedRecord`] if `block_size` claims
    /// more bytes than `buf` holds, or [`IteratorError::NonAsciiReadName`]
    /// if the read name is not ASCII.
    pub fn decode(buf: &[u8]) -> Result<(Self, usize)> {
        if buf.len() < 36 {
            return Err(IteratorError::TruncatedHeader.into());
        }
        let block_size = LittleEndian::read_u32(&buf[0..4]);
        let record_len = 4 + block_size as usize;
        if record_len > buf.len() {
            return Err(IteratorError::TruncatedRecord {
                claimed: record_len,
                available: buf.len(),
            }
            .into());
        }

        let ref_id = LittleEndian::read_i32(&buf[4..8]);
        let pos = LittleEndian::read_i32(&buf[8..12]);
        let l_read_name = buf[12];
        let mapq = buf[13];
        let bin = LittleEndian::read_u16(&buf[14..16]);
        let n_cigar_op = LittleEndian::read_u16(&buf[16..18]) as usize;
        let flag = LittleEndian::read_u16(&buf[18..20]);
        let l_seq = LittleEndian::read_u32(&buf[20..24]);
        let next_ref_id = LittleEndian::read_i32(&buf[24..28]);
        let next_pos = LittleEndian::read_i32(&buf[28..32]);
        let tlen = LittleEndian::read_i32(&buf[32..36]);

        let mut cursor = 36;
        let name_field_len = l_read_name as usize;
        if cursor + name_field_len > buf.len() {
            return Err(IteratorError::TruncatedRecord {
                claimed: record_len,
                available: buf.len(),
            }
            .into());
        }
        let name_with_nul = &buf[cursor..cursor + name_field_len];
        let read_name = if name_with_nul.is_empty() {
            &name_with_nul[..]
        } else {
            &name_with_nul[..name_with_nul.len() - 1]
        };
        if !is_ascii_fast(read_name) {
            return Err(IteratorError::NonAsciiReadName.into());
        }
        let read_name = read_name.to_vec();
        cursor += name_field_len;

        // n_cigar_op, l_seq, and block_size are three redundant length
        // encodings that need not agree on malformed input; check each
        // child's end against record_len before slicing rather than
        // trusting the header counters to be mutually consistent.
        let truncated_record = || IteratorError::TruncatedRecord {
            claimed: record_len,
            available: buf.len(),
        };

        let cigar_bytes_len = n_cigar_op * 4;
        if cursor + cigar_bytes_len > record_len {
            return Err(truncated_record().into());
        }
        let cigar = Cigar::from_words(
            buf[cursor..cursor + cigar_bytes_len]
                .chunks_exact(4)
                .map(LittleEndian::read_u32)
                .collect(),
        );
        cursor += cigar_bytes_len;

        let seq_len = packed_seq_len(l_seq);
        if cursor + seq_len > record_len {
            return Err(truncated_record().into());
        }
        let seq = buf[cursor..cursor + seq_len].to_vec();
        cursor += seq_len;

        let qual_len = l_seq as usize;
        if cursor + qual_len > record_len {
            return Err(truncated_record().into());
        }
        let qual = buf[cursor..cursor + qual_len].to_vec();
        cursor += qual_len;

        // cursor <= record_len here: each check above bounded the running
        // total, so the tags slice never overruns.
        let tags = buf[cursor..record_len].to_vec();

        let record = Self {
            ref_id,
            pos,
            mapq,
            bin,
            flag,
            next_ref_id,
            next_pos,
            tlen,
            read_name,
            cigar,
            l_seq,
            seq,
            qual,
            tags,
        };
        Ok((record, record_len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_unmapped_record_round_trips() {
        let mut record = BamRecord::new(-1, -1, b"r", 255, 4, -1, -1).unwrap();
        record.set_flag(4);
        assert_eq!(record.block_size(), 34);
        let bytes = record.to_bytes();
        assert_eq!(bytes.len(), 38);
        let (decoded, consumed) = BamRecord::decode(&bytes).unwrap();
        assert_eq!(consumed, 38);
        assert_eq!(decoded, record);
    }

    #[test]
    fn decode_rejects_oversized_n_cigar_op_without_panicking() {
        // block_size (40) and record_len (44) are internally consistent and
        // pass the outer truncation check, but n_cigar_op (65535) claims far
        // more cigar bytes than record_len actually holds.
        let mut buf = vec![0u8; 1000];
        LittleEndian::write_u32(&mut buf[0..4], 40);
        buf[12] = 1; // l_read_name
        LittleEndian::write_u16(&mut buf[16..18], 0xFFFF); // n_cigar_op
        let err = BamRecord::decode(&buf).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Iterator(IteratorError::TruncatedRecord { .. })
        ));
    }

    #[test]
    fn decode_rejects_l_seq_that_overruns_record_len_via_qual() {
        // n_cigar_op is 0 and l_seq is small enough that the packed seq
        // bytes still fit within record_len, but the (larger) qual array
        // alone pushes the cursor a few bytes past record_len.
        let mut buf = vec![0u8; 100];
        LittleEndian::write_u32(&mut buf[0..4], 40); // record_len = 44
        buf[12] = 1; // l_read_name
        LittleEndian::write_u32(&mut buf[20..24], 10); // l_seq: seq fits, qual doesn't
        let err = BamRecord::decode(&buf).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Iterator(IteratorError::TruncatedRecord { .. })
        ));
    }

    #[test]
    fn block_size_tracks_children() {
        let mut record = BamRecord::default();
        record.set_sequence(b"ACGT", None).unwrap();
        record.set_cigar(Cigar::from_string("4M").unwrap()).unwrap();
        record.set_read_name(b"r1").unwrap();
        assert_eq!(
            record.block_size(),
            32 + 3 /* "r1\0" */ + 4 /* 1 cigar word */ + 2 /* packed seq */ + 4 /* qual */
        );
    }

    #[test]
    fn sequence_pack_matches_spec_example() {
        let mut record = BamRecord::default();
        record.set_sequence(b"ACGT", None).unwrap();
        assert_eq!(record.packed_sequence(), &[0x12, 0x48]);
        assert_eq!(record.qual(), &[0xFF, 0xFF, 0xFF, 0xFF]);
        assert_eq!(record.sequence(), b"ACGT");

        record.set_sequence(b"ACG", None).unwrap();
        assert_eq!(record.packed_sequence(), &[0x12, 0x40]);
        assert_eq!(record.sequence(), b"ACG");
    }

    #[test]
    fn tag_round_trip_through_record() {
        let mut record = BamRecord::default();
        record.set_tag(*b"NM", TagInput::Int(3), None).unwrap();
        record.set_tag(*b"MD", TagInput::Text("10A5"), None).unwrap();
        assert_eq!(record.get_tag(*b"NM").unwrap(), TagValue::Int(3));
        assert_eq!(record.get_tag(*b"MD").unwrap(), TagValue::Text("10A5"));
        record.remove_tag(*b"NM").unwrap();
        assert_eq!(record.tag_bytes().len(), 8);
        assert!(record.get_tag(*b"NM").is_err());
    }

    #[test]
    fn oversized_cigar_is_refused() {
        let pairs = (0..70_000u32).map(|_| (0u8, 1u32));
        let cigar = Cigar::from_pairs(pairs).unwrap();
        let mut record = BamRecord::default();
        let err = record.set_cigar(cigar).unwrap_err();
        assert!(matches!(
            err,
            crate::Error::Record(RecordError::CigarTooLong(70_000))
        ));
    }

    #[test]
    fn cg_tag_escape_is_decoded_only_when_present() {
        let mut record = BamRecord::default();
        record.set_sequence(&vec![b'A'; 10], None).unwrap();
        // A legitimate 2-op CIGAR that happens to match the placeholder
        // shape but carries no CG tag must be returned as-is.
        record
            .set_cigar(Cigar::from_pairs([(OP_SOFT_CLIP, 10), (3, 5)]).unwrap())
            .unwrap();
        let logical = record.cigar().unwrap();
        assert_eq!(logical.iter().collect::<Vec<_>>(), vec![(4, 10), (3, 5)]);

        // Now attach a CG tag out-of-band (as if this record had been
        // decoded from a producer that uses the escape) and confirm the
        // real array wins.
        record
            .set_tag(*b"CG", TagInput::ArrayU32(&[(3 << 4) | 0, (2 << 4) | 2]), None)
            .unwrap();
        let logical = record.cigar().unwrap();
        assert_eq!(logical.iter().collect::<Vec<_>>(), vec![(0, 3), (2, 2)]);
    }

    #[test]
    fn flag_bit_accessors() {
        let mut record = BamRecord::default();
        record.set_flag(0b1111_1111_1111);
        assert!(record.paired());
        assert!(record.proper_pair());
        assert!(record.unmapped());
        assert!(record.mate_unmapped());
        assert!(record.reverse());
        assert!(record.mate_reverse());
        assert!(record.read1());
        assert!(record.read2());
        assert!(record.secondary());
        assert!(record.qcfail());
        assert!(record.duplicate());
        assert!(record.supplementary());
    }

    #[test]
    fn read_name_too_long_is_rejected() {
        let mut record = BamRecord::default();
        let name = vec![b'x'; 255];
        assert!(record.set_read_name(&name).is_err());
    }

    #[test]
    fn non_ascii_read_name_is_rejected() {
        let mut record = BamRecord::default();
        assert!(record.set_read_name(b"r\xFF").is_err());
    }
}
