//! Auxiliary tag block codec.
//!
//! A tag blob is a concatenation of entries with no outer framing: each
//! entry is a two-byte name, a one-byte type, and a type-specific payload.
//! This module locates, decodes, and splices entries inside that opaque
//! blob; [`crate::record::BamRecord`] owns the blob and is the only public
//! entry point for mutation.

pub mod registry;

use crate::error::{Result, TagError};
use byteorder::{ByteOrder, LittleEndian};

/// A decoded scalar or array tag value, borrowed from the parent blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TagValue<'a> {
    /// `A` — single printable ASCII character.
    Char(u8),
    /// Any of `c C s S i I`, widened to a signed 64-bit integer.
    Int(i64),
    /// `f` or `d`, widened to a 64-bit float.
    Float(f64),
    /// `Z` — NUL-terminated text, with the terminator stripped.
    Text(&'a str),
    /// `B` — a typed array view over the raw element bytes.
    Array(TagArrayView<'a>),
}

/// A read-only view over a `B`-type tag's elements. Borrows directly from
/// the parent record's tag blob, so it cannot outlive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagArrayView<'a> {
    subtype: u8,
    bytes: &'a [u8],
}

impl<'a> TagArrayView<'a> {
    /// The element type letter: one of `c C s S i I f`.
    #[must_use]
    pub fn subtype(&self) -> u8 {
        self.subtype
    }

    /// Number of elements in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len() / element_size(self.subtype).unwrap_or(1)
    }

    /// Returns `true` if the array has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The raw little-endian element bytes, with no subtype/count prefix.
    #[must_use]
    pub fn raw_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Decodes every element as a signed 64-bit integer. Meaningless if
    /// [`Self::subtype`] is `f`.
    pub fn iter_i64(&self) -> impl Iterator<Item = i64> + '_ {
        let subtype = self.subtype;
        let size = element_size(subtype).unwrap_or(1);
        self.bytes.chunks_exact(size).map(move |chunk| match subtype {
            b'c' => i64::from(chunk[0] as i8),
            b'C' => i64::from(chunk[0]),
            b's' => i64::from(LittleEndian::read_i16(chunk)),
            b'S' => i64::from(LittleEndian::read_u16(chunk)),
            b'i' => i64::from(LittleEndian::read_i32(chunk)),
            b'I' => i64::from(LittleEndian::read_u32(chunk)),
            _ => 0,
        })
    }

    /// Decodes every element as a 64-bit float. Meaningless unless
    /// [`Self::subtype`] is `f`.
    pub fn iter_f64(&self) -> impl Iterator<Item = f64> + '_ {
        self.bytes
            .chunks_exact(4)
            .map(|chunk| f64::from(LittleEndian::read_f32(chunk)))
    }
}

/// Byte size of one element of array subtype `sub`.
fn element_size(sub: u8) -> Option<usize> {
    match sub {
        b'c' | b'C' => Some(1),
        b's' | b'S' => Some(2),
        b'i' | b'I' | b'f' => Some(4),
        _ => None,
    }
}

/// The on-wire type of a tag entry, fully resolved (including array
/// subtype where applicable).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagType {
    Char,
    Int8,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float,
    Double,
    Text,
    Array(u8),
}

impl TagType {
    fn wire_letter(self) -> u8 {
        match self {
            TagType::Char => b'A',
            TagType::Int8 => b'c',
            TagType::UInt8 => b'C',
            TagType::Int16 => b's',
            TagType::UInt16 => b'S',
            TagType::Int32 => b'i',
            TagType::UInt32 => b'I',
            TagType::Float => b'f',
            TagType::Double => b'd',
            TagType::Text => b'Z',
            TagType::Array(_) => b'B',
        }
    }

    fn from_registry(letter: u8, subtype: u8) -> Option<Self> {
        match letter {
            b'A' => Some(TagType::Char),
            b'c' => Some(TagType::Int8),
            b'C' => Some(TagType::UInt8),
            b's' => Some(TagType::Int16),
            b'S' => Some(TagType::UInt16),
            b'i' => Some(TagType::Int32),
            b'I' => Some(TagType::UInt32),
            b'f' => Some(TagType::Float),
            b'd' => Some(TagType::Double),
            b'Z' => Some(TagType::Text),
            b'B' => Some(TagType::Array(subtype)),
            _ => None,
        }
    }

    /// Parses an explicit type override such as `"i"`, `"Z"`, or `"B C"`.
    ///
    /// # Errors
    /// Returns [`TagError::InvalidTagType`] if `s` does not name a
    /// supported scalar or array type.
    pub fn parse(s: &str) -> Result<Self> {
        let letters: Vec<u8> = s.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
        match letters.as_slice() {
            [b'B', sub] => Self::from_registry(b'B', *sub).ok_or(TagError::InvalidTagType(*sub).into()),
            [letter] if *letter != b'B' => {
                Self::from_registry(*letter, 0).ok_or(TagError::InvalidTagType(*letter).into())
            }
            _ => Err(TagError::InvalidTagType(*letters.first().unwrap_or(&0)).into()),
        }
    }
}

/// A value supplied by a caller writing a tag, not yet bound to a
/// particular on-wire type.
#[derive(Debug, Clone, Copy)]
pub enum TagInput<'a> {
    Char(u8),
    Int(i64),
    Float(f64),
    Text(&'a str),
    ArrayI8(&'a [i8]),
    ArrayU8(&'a [u8]),
    ArrayI16(&'a [i16]),
    ArrayU16(&'a [u16]),
    ArrayI32(&'a [i32]),
    ArrayU32(&'a [u32]),
    ArrayF32(&'a [f32]),
}

impl<'a> TagInput<'a> {
    /// The type this input would resolve to absent a registry entry or
    /// explicit override: text -> `Z`, integer -> `I`, float -> `f`,
    /// array -> `B` with the matching subtype.
    fn inferred_type(&self) -> TagType {
        match self {
            TagInput::Char(_) => TagType::Char,
            TagInput::Int(_) => TagType::UInt32,
            TagInput::Float(_) => TagType::Float,
            TagInput::Text(_) => TagType::Text,
            TagInput::ArrayI8(_) => TagType::Array(b'c'),
            TagInput::ArrayU8(_) => TagType::Array(b'C'),
            TagInput::ArrayI16(_) => TagType::Array(b's'),
            TagInput::ArrayU16(_) => TagType::Array(b'S'),
            TagInput::ArrayI32(_) => TagType::Array(b'i'),
            TagInput::ArrayU32(_) => TagType::Array(b'I'),
            TagInput::ArrayF32(_) => TagType::Array(b'f'),
        }
    }
}

/// Returns the byte offset one past the end of the tag entry starting at
/// `pos`, without decoding its value.
fn entry_end(bytes: &[u8], pos: usize) -> Result<usize> {
    if pos + 3 > bytes.len() {
        return Err(TagError::Truncated.into());
    }
    let type_byte = bytes[pos + 2];
    let payload_start = pos + 3;
    let payload_len = match type_byte {
        b'A' | b'c' | b'C' => 1,
        b's' | b'S' => 2,
        b'i' | b'I' | b'f' => 4,
        b'd' => 8,
        b'Z' | b'H' => {
            let nul = memchr::memchr(0, &bytes[payload_start..]).ok_or(TagError::Truncated)?;
            nul + 1
        }
        b'B' => {
            if payload_start + 5 > bytes.len() {
                return Err(TagError::Truncated.into());
            }
            let subtype = bytes[payload_start];
            let count = LittleEndian::read_u32(&bytes[payload_start + 1..payload_start + 5]) as usize;
            let elem_size = element_size(subtype).ok_or(TagError::InvalidTagType(subtype))?;
            5 + count * elem_size
        }
        other => return Err(TagError::InvalidTagType(other).into()),
    };
    let end = payload_start + payload_len;
    if end > bytes.len() {
        return Err(TagError::Truncated.into());
    }
    Ok(end)
}

/// Locates the `(start, end)` byte span of the entry named `tag`, if any.
///
/// # Errors
/// Returns [`TagError::Truncated`] if an entry's self-described length
/// runs past the end of `bytes`, or [`TagError::InvalidTagType`] on an
/// unrecognized type byte, while scanning.
pub fn find(bytes: &[u8], tag: [u8; 2]) -> Result<Option<(usize, usize)>> {
    let mut pos = 0;
    while pos < bytes.len() {
        if pos + 2 > bytes.len() {
            return Err(TagError::Truncated.into());
        }
        let end = entry_end(bytes, pos)?;
        if bytes[pos] == tag[0] && bytes[pos + 1] == tag[1] {
            return Ok(Some((pos, end)));
        }
        pos = end;
    }
    Ok(None)
}

fn decode_value(bytes: &'_ [u8], start: usize, end: usize) -> Result<TagValue<'_>> {
    let type_byte = bytes[start + 2];
    let payload = &bytes[start + 3..end];
    match type_byte {
        b'A' => Ok(TagValue::Char(payload[0])),
        b'c' => Ok(TagValue::Int(i64::from(payload[0] as i8))),
        b'C' => Ok(TagValue::Int(i64::from(payload[0]))),
        b's' => Ok(TagValue::Int(i64::from(LittleEndian::read_i16(payload)))),
        b'S' => Ok(TagValue::Int(i64::from(LittleEndian::read_u16(payload)))),
        b'i' => Ok(TagValue::Int(i64::from(LittleEndian::read_i32(payload)))),
        b'I' => Ok(TagValue::Int(i64::from(LittleEndian::read_u32(payload)))),
        b'f' => Ok(TagValue::Float(f64::from(LittleEndian::read_f32(payload)))),
        b'd' => Ok(TagValue::Float(LittleEndian::read_f64(payload))),
        b'Z' => {
            let text = std::str::from_utf8(&payload[..payload.len() - 1])
                .map_err(|_| TagError::InvalidTagType(b'Z'))?;
            Ok(TagValue::Text(text))
        }
        b'H' => Err(TagError::NotSupported('H').into()),
        b'B' => {
            let subtype = payload[0];
            Ok(TagValue::Array(TagArrayView {
                subtype,
                bytes: &payload[5..],
            }))
        }
        other => Err(TagError::InvalidTagType(other).into()),
    }
}

/// Reads the value of tag `name`.
///
/// # Errors
/// Returns [`TagError::NotFound`] if the tag is absent, or propagates any
/// error from locating or decoding the entry.
pub fn get(bytes: &[u8], name: [u8; 2]) -> Result<TagValue<'_>> {
    let (start, end) = find(bytes, name)?.ok_or(TagError::NotFound(name))?;
    decode_value(bytes, start, end)
}

fn encode_entry(name: [u8; 2], ty: TagType, value: &TagInput) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.extend_from_slice(&name);
    out.push(ty.wire_letter());
    match (ty, value) {
        (TagType::Char, TagInput::Char(c)) => out.push(*c),
        (TagType::Int8, TagInput::Int(v)) => {
            let v = i8::try_from(*v).map_err(|_| TagError::OutOfRange)?;
            out.push(v as u8);
        }
        (TagType::UInt8, TagInput::Int(v)) => {
            let v = u8::try_from(*v).map_err(|_| TagError::OutOfRange)?;
            out.push(v);
        }
        (TagType::Int16, TagInput::Int(v)) => {
            let v = i16::try_from(*v).map_err(|_| TagError::OutOfRange)?;
            let mut buf = [0u8; 2];
            LittleEndian::write_i16(&mut buf, v);
            out.extend_from_slice(&buf);
        }
        (TagType::UInt16, TagInput::Int(v)) => {
            let v = u16::try_from(*v).map_err(|_| TagError::OutOfRange)?;
            let mut buf = [0u8; 2];
            LittleEndian::write_u16(&mut buf, v);
            out.extend_from_slice(&buf);
        }
        (TagType::Int32, TagInput::Int(v)) => {
            let v = i32::try_from(*v).map_err(|_| TagError::OutOfRange)?;
            let mut buf = [0u8; 4];
            LittleEndian::write_i32(&mut buf, v);
            out.extend_from_slice(&buf);
        }
        (TagType::UInt32, TagInput::Int(v)) => {
            let v = u32::try_from(*v).map_err(|_| TagError::OutOfRange)?;
            let mut buf = [0u8; 4];
            LittleEndian::write_u32(&mut buf, v);
            out.extend_from_slice(&buf);
        }
        (TagType::Float, TagInput::Float(v)) => {
            let mut buf = [0u8; 4];
            LittleEndian::write_f32(&mut buf, *v as f32);
            out.extend_from_slice(&buf);
        }
        (TagType::Double, TagInput::Float(v)) => {
            let mut buf = [0u8; 8];
            LittleEndian::write_f64(&mut buf, *v);
            out.extend_from_slice(&buf);
        }
        (TagType::Text, TagInput::Text(s)) => {
            if !s.is_ascii() {
                return Err(TagError::TypeError("ASCII text").into());
            }
            out.extend_from_slice(s.as_bytes());
            out.push(0);
        }
        (TagType::Array(sub), input) => encode_array(&mut out, sub, input)?,
        _ => return Err(TagError::TypeError("value does not match tag type").into()),
    }
    Ok(out)
}

fn encode_array(out: &mut Vec<u8>, subtype: u8, input: &TagInput) -> Result<()> {
    out.push(subtype);
    let count_pos = out.len();
    out.extend_from_slice(&[0u8; 4]);
    let count = match (subtype, input) {
        (b'c', TagInput::ArrayI8(items)) => {
            out.extend(items.iter().map(|&v| v as u8));
            items.len()
        }
        (b'C', TagInput::ArrayU8(items)) => {
            out.extend_from_slice(items);
            items.len()
        }
        (b's', TagInput::ArrayI16(items)) => {
            for &v in *items {
                let mut buf = [0u8; 2];
                LittleEndian::write_i16(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            items.len()
        }
        (b'S', TagInput::ArrayU16(items)) => {
            for &v in *items {
                let mut buf = [0u8; 2];
                LittleEndian::write_u16(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            items.len()
        }
        (b'i', TagInput::ArrayI32(items)) => {
            for &v in *items {
                let mut buf = [0u8; 4];
                LittleEndian::write_i32(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            items.len()
        }
        (b'I', TagInput::ArrayU32(items)) => {
            for &v in *items {
                let mut buf = [0u8; 4];
                LittleEndian::write_u32(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            items.len()
        }
        (b'f', TagInput::ArrayF32(items)) => {
            for &v in *items {
                let mut buf = [0u8; 4];
                LittleEndian::write_f32(&mut buf, v);
                out.extend_from_slice(&buf);
            }
            items.len()
        }
        _ => return Err(TagError::TypeError("array element type does not match subtype").into()),
    };
    let count = u32::try_from(count).map_err(|_| TagError::OutOfRange)?;
    LittleEndian::write_u32(&mut out[count_pos..count_pos + 4], count);
    Ok(())
}

fn resolve_type(name: [u8; 2], input: &TagInput, explicit: Option<TagType>) -> TagType {
    explicit
        .or_else(|| registry::lookup(name).and_then(|(letter, sub)| TagType::from_registry(letter, sub)))
        .unwrap_or_else(|| input.inferred_type())
}

/// Writes (or overwrites) tag `name`, returning a freshly spliced blob.
///
/// Type selection, absent an explicit override, follows the well-known tag
/// registry and then falls back to inferring from `value`'s shape.
///
/// # Errors
/// Returns [`TagError::OutOfRange`] if an integer value does not fit the
/// resolved type, or [`TagError::TypeError`] if `value`'s shape does not
/// match the resolved type.
pub fn set(bytes: &[u8], name: [u8; 2], value: TagInput, explicit: Option<TagType>) -> Result<Vec<u8>> {
    let ty = resolve_type(name, &value, explicit);
    let entry = encode_entry(name, ty, &value)?;
    let mut out = Vec::with_capacity(bytes.len() + entry.len());
    match find(bytes, name)? {
        Some((start, end)) => {
            out.extend_from_slice(&bytes[..start]);
            out.extend_from_slice(&entry);
            out.extend_from_slice(&bytes[end..]);
        }
        None => {
            out.extend_from_slice(bytes);
            out.extend_from_slice(&entry);
        }
    }
    Ok(out)
}

/// Removes tag `name` if present; a no-op splice otherwise.
///
/// # Errors
/// Propagates any error encountered while scanning the blob.
pub fn remove(bytes: &[u8], name: [u8; 2]) -> Result<Vec<u8>> {
    match find(bytes, name)? {
        Some((start, end)) => {
            let mut out = Vec::with_capacity(bytes.len() - (end - start));
            out.extend_from_slice(&bytes[..start]);
            out.extend_from_slice(&bytes[end..]);
            Ok(out)
        }
        None => Ok(bytes.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_integer_uses_registry_type() {
        let blob = set(&[], *b"NM", TagInput::Int(3), None).unwrap();
        assert_eq!(blob, b"NMi\x03\x00\x00\x00");
        assert_eq!(get(&blob, *b"NM").unwrap(), TagValue::Int(3));
    }

    #[test]
    fn set_then_get_string() {
        let blob = set(&[], *b"MD", TagInput::Text("10A5"), None).unwrap();
        assert_eq!(blob, b"MDZ10A5\x00");
        assert_eq!(get(&blob, *b"MD").unwrap(), TagValue::Text("10A5"));
    }

    #[test]
    fn appending_two_tags_and_removing_one() {
        let blob = set(&[], *b"NM", TagInput::Int(3), None).unwrap();
        let blob = set(&blob, *b"MD", TagInput::Text("10A5"), None).unwrap();
        assert!(get(&blob, *b"XX").is_err());
        let blob = remove(&blob, *b"NM").unwrap();
        assert_eq!(blob.len(), 8);
        assert!(get(&blob, *b"NM").is_err());
        assert_eq!(get(&blob, *b"MD").unwrap(), TagValue::Text("10A5"));
    }

    #[test]
    fn array_tag_round_trips() {
        let blob = set(
            &[],
            *b"ML",
            TagInput::ArrayU8(&[10, 200, 30]),
            None,
        )
        .unwrap();
        assert_eq!(blob, b"MLBC\x03\x00\x00\x00\x0A\xC8\x1E");
        let TagValue::Array(view) = get(&blob, *b"ML").unwrap() else {
            panic!("expected array");
        };
        assert_eq!(view.subtype(), b'C');
        assert_eq!(view.iter_i64().collect::<Vec<_>>(), vec![10, 200, 30]);
    }

    #[test]
    fn explicit_type_override_wins_over_registry() {
        let blob = set(&[], *b"NM", TagInput::Int(3), Some(TagType::Int16)).unwrap();
        assert_eq!(&blob[..3], b"NMs");
    }

    #[test]
    fn out_of_range_integer_is_rejected() {
        let err = set(&[], *b"NM", TagInput::Int(1 << 40), Some(TagType::Int32)).unwrap_err();
        assert!(matches!(err, crate::Error::Tag(TagError::OutOfRange)));
    }

    #[test]
    fn truncated_array_header_is_detected() {
        let err = find(b"MLBC\x05\x00\x00", *b"ML").unwrap_err();
        assert!(matches!(err, crate::Error::Tag(TagError::Truncated)));
    }

    #[test]
    fn remove_missing_tag_is_a_no_op() {
        let blob = set(&[], *b"NM", TagInput::Int(3), None).unwrap();
        let same = remove(&blob, *b"ZZ").unwrap();
        assert_eq!(blob, same);
    }

    #[test]
    fn hex_tag_is_not_supported_on_decode() {
        let mut blob = b"XHH".to_vec();
        blob.extend_from_slice(b"1A2B\x00");
        let err = get(&blob, *b"XH").unwrap_err();
        assert!(matches!(err, crate::Error::Tag(TagError::NotSupported('H'))));
    }

    #[test]
    fn double_type_requires_explicit_override() {
        let blob = set(&[], *b"XD", TagInput::Float(1.5), Some(TagType::Double)).unwrap();
        assert_eq!(&blob[..3], b"XDd");
        assert_eq!(get(&blob, *b"XD").unwrap(), TagValue::Float(1.5));
    }
}
