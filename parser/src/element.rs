//! Component E: the element reader.
//!
//! Decodes one data element at a time from a [`ByteReader`]: tag, VR,
//! length, and value, including nested items and sequences of undefined
//! length. Character-set switching (triggered by `SpecificCharacterSet`)
//! and the endianness/VR-mode heuristic both live here, since both are
//! properties of "how to read the next element" rather than of the
//! whole-file orchestration in the `object` crate.
//!
//! Unlike a decoder that holds a back-reference into its owning stream
//! to resolve `TransferSyntax` and `SpecificCharacterSet` lazily, this
//! reader carries that decode
//! context (`implicit_vr`, `little_endian`, `character_set`) as its own
//! state and applies it eagerly at the moment each value is decoded —
//! the element it returns owns a fully-typed [`Value`], not a pointer
//! back to the reader.

use dicom_core::dictionary::DataDictionary;
use dicom_core::error::{CorruptElementSnafu, CorruptElementStreamSnafu, Error, Result};
use dicom_core::header::{DataElementHeader, Header, Length, SequenceItemHeader, Tag, VR};
use dicom_core::value::{Body, DataSet, Element, Item, Value, C};
use dicom_dictionary_std::StandardDataDictionary;
use dicom_encoding::text::{SpecificCharacterSet, TextCodec};

use crate::reader::ByteReader;

/// Decodes a stream of data elements under a single, mutable decode
/// context (VR mode, endianness, specific character set).
#[derive(Debug, Clone)]
pub struct ElementReader {
    implicit_vr: bool,
    little_endian: bool,
    character_set: SpecificCharacterSet,
}

impl Default for ElementReader {
    /// Defaults on construction: implicit VR, little endian, default
    /// (ISO-IR 6) character set.
    fn default() -> Self {
        ElementReader {
            implicit_vr: true,
            little_endian: true,
            character_set: SpecificCharacterSet::default(),
        }
    }
}

impl ElementReader {
    /// Build a reader with the default decode context.
    pub fn new() -> Self {
        ElementReader::default()
    }

    /// Switch the VR mode and endianness, as happens once a transfer
    /// syntax has been negotiated.
    pub fn set_encoding(&mut self, implicit_vr: bool, little_endian: bool) {
        self.implicit_vr = implicit_vr;
        self.little_endian = little_endian;
    }

    /// The reader's current little/big-endian setting.
    pub fn is_little_endian(&self) -> bool {
        self.little_endian
    }

    /// The reader's current implicit/explicit VR setting.
    pub fn is_implicit_vr(&self) -> bool {
        self.implicit_vr
    }

    /// Switch the active character set, as happens mid-stream when
    /// `SpecificCharacterSet (0008,0005)` is decoded.
    pub fn set_character_set(&mut self, character_set: SpecificCharacterSet) {
        self.character_set = character_set;
    }

    /// The reader's current specific character set.
    pub fn character_set(&self) -> &SpecificCharacterSet {
        &self.character_set
    }

    fn read_tag(&self, reader: &mut ByteReader) -> Result<Tag> {
        let group = reader.read_u16()?;
        let element = reader.read_u16()?;
        Ok(Tag(group, element))
    }

    fn peek_tag(&self, reader: &ByteReader) -> Result<Tag> {
        let bytes = reader.peek(4)?;
        let (g, e) = if reader.is_little_endian() {
            (
                u16::from_le_bytes([bytes[0], bytes[1]]),
                u16::from_le_bytes([bytes[2], bytes[3]]),
            )
        } else {
            (
                u16::from_be_bytes([bytes[0], bytes[1]]),
                u16::from_be_bytes([bytes[2], bytes[3]]),
            )
        };
        Ok(Tag(g, e))
    }

    /// Decode a single data element at the reader's current position.
    ///
    /// `strict` governs recovery from a declared length that overflows
    /// the remaining bytes: fail outright (`strict == true`) or truncate
    /// to what remains, emitting a diagnostic (`strict == false`).
    pub fn decode_element(&mut self, reader: &mut ByteReader, strict: bool) -> Result<Element> {
        let offset = reader.position();
        reader.set_byte_order(self.little_endian);
        let tag = self.read_tag(reader)?;

        let dict_entry = StandardDataDictionary::instance().by_tag(tag);
        let dict_vr = dict_entry.map(|e| e.vr);
        let vm = dict_entry.map(|e| e.vm).unwrap_or("1");

        let (reported_vr, len) = if self.implicit_vr {
            let reported_vr = dict_vr.unwrap_or(VR::UN);
            let len = Length(reader.read_u32()?);
            (reported_vr, len)
        } else {
            let vr_bytes = reader.read_exact(2)?;
            let source_vr = VR::from_binary([vr_bytes[0], vr_bytes[1]]).unwrap_or(VR::UN);
            let reported_vr = match dict_vr {
                Some(vr) if vr != VR::UN => vr,
                _ => source_vr,
            };
            let len = if source_vr.has_explicit_long_length() {
                reader.discard(2)?;
                Length(reader.read_u32()?)
            } else {
                Length(reader.read_u16()? as u32)
            };
            (reported_vr, len)
        };

        let (body, reported_len) = if len.is_undefined() {
            let parse_embedded = reported_vr == VR::SQ;
            let items = self.decode_items(reader, parse_embedded, strict)?;
            (Body::Items(items), len)
        } else if len.0 == 0 {
            (Body::Primitive(empty_value(reported_vr)), len)
        } else {
            let mut declared = len.0 as usize;
            if declared as u64 > reader.remaining() {
                if strict {
                    return CorruptElementSnafu {
                        offset,
                        tag: Some(tag),
                        message: format!(
                            "value length {} exceeds {} remaining bytes",
                            declared,
                            reader.remaining()
                        ),
                    }
                    .fail();
                }
                tracing::warn!(
                    offset,
                    tag = %tag,
                    declared,
                    remaining = reader.remaining(),
                    "truncating element value to remaining bytes"
                );
                declared = reader.remaining() as usize;
            }
            let raw = reader.read_exact(declared)?;
            let raw = if reported_vr.is_pad_eligible() {
                strip_pad(raw)
            } else {
                raw
            };
            let value = interpret_value(reported_vr, raw, vm, &self.character_set, self.little_endian);
            (Body::Primitive(value), Length(declared as u32))
        };

        let header = DataElementHeader::new(tag, reported_vr, reported_len);
        let element = Element::new(header, body);

        if tag == Tag(0x0008, 0x0005) {
            // VM is "1-n", but only the first repertoire applies to the
            // whole value (real DICOM switches repertoire mid-value via
            // ISO 2022 escapes; this reader picks one for the value).
            let first_code = element
                .value()
                .and_then(Value::as_strs)
                .and_then(|strs| strs.first().map(|s| s.to_string()));
            if let Some(code) = first_code {
                if let Some(cs) = SpecificCharacterSet::from_code(&code) {
                    self.character_set = cs;
                }
            }
        }

        Ok(element)
    }

    /// Decode the item run of an undefined-length element, terminated by
    /// the sequence-delimiter tag `(FFFE,E0DD)`.
    ///
    /// `parse_embedded` selects whether each item's content is itself a
    /// nested dataset (the enclosing element's VR is `SQ`) or opaque
    /// bytes preserved verbatim (encapsulated pixel-data fragments).
    fn decode_items(
        &mut self,
        reader: &mut ByteReader,
        parse_embedded: bool,
        strict: bool,
    ) -> Result<C<Item>> {
        let mut items = C::new();
        loop {
            let offset = reader.position();
            let tag = self.read_tag(reader)?;
            let raw_len = Length(reader.read_u32()?);
            let header = SequenceItemHeader::new(tag, raw_len).map_err(|e| {
                CorruptElementStreamSnafu {
                    offset,
                    message: e.to_string(),
                }
                .build()
            })?;
            if header.tag() == Tag::SEQUENCE_DELIMITER {
                break;
            }
            if header.tag() != Tag::ITEM {
                return CorruptElementStreamSnafu {
                    offset,
                    message: format!("expected item-start or sequence-delimiter, found {}", tag),
                }
                .fail();
            }
            let item_len = header.len();
            let item = if item_len.is_undefined() {
                if !parse_embedded {
                    return CorruptElementStreamSnafu {
                        offset,
                        message:
                            "undefined-length item inside an opaque (non-SQ) element is unsupported"
                                .to_string(),
                    }
                    .fail();
                }
                let mut ds = DataSet::new();
                loop {
                    let peeked = self.peek_tag(reader)?;
                    if peeked == Tag::ITEM_DELIMITER {
                        reader.discard(8)?;
                        break;
                    }
                    let element = self.decode_element(reader, strict)?;
                    ds.insert(element);
                }
                Item::new_dataset(item_len, ds)
            } else if item_len.0 == 0 {
                if parse_embedded {
                    Item::new_dataset(item_len, DataSet::new())
                } else {
                    Item::new_unparsed(item_len, Vec::new())
                }
            } else {
                let mut declared = item_len.0 as usize;
                if declared as u64 > reader.remaining() {
                    if strict {
                        return CorruptElementStreamSnafu {
                            offset,
                            message: format!(
                                "item length {} exceeds {} remaining bytes",
                                declared,
                                reader.remaining()
                            ),
                        }
                        .fail();
                    }
                    declared = reader.remaining() as usize;
                }
                let bytes = reader.read_exact(declared)?.to_vec();
                if parse_embedded {
                    let mut inner = ByteReader::new(&bytes);
                    inner.set_byte_order(self.little_endian);
                    let mut ds = DataSet::new();
                    while inner.remaining() > 0 {
                        let element = self.decode_element(&mut inner, strict)?;
                        ds.insert(element);
                    }
                    Item::new_dataset(item_len, ds)
                } else {
                    Item::new_unparsed(item_len, bytes)
                }
            };
            items.push(item);
        }
        Ok(items)
    }

    /// Heuristic encoding detection, applied when no transfer syntax is
    /// known and parsing must continue regardless. Peeks 6
    /// bytes at the payload's start: the first tag's group determines
    /// endianness, the would-be VR bytes determine VR mode. Falls back
    /// to Explicit VR Little Endian if the peek fails (not enough bytes
    /// left to guess from).
    pub fn detect_encoding(reader: &ByteReader) -> (bool, bool) {
        let peeked = match reader.peek(6) {
            Ok(b) => b,
            Err(_) => return (false, true),
        };
        let group_le = u16::from_le_bytes([peeked[0], peeked[1]]);
        let little_endian = !(group_le >= 0x0800 && group_le != 0x7FE0);
        let vr_bytes = [peeked[4], peeked[5]];
        let implicit_vr = VR::from_binary(vr_bytes).is_none();
        (implicit_vr, little_endian)
    }
}

/// Pull apart the error taxonomy's elevation boundary: the element
/// reader only ever raises `CorruptElement`/`CorruptElementStream` (or
/// lower-level `InsufficientBytes`, absorbed by the `?` operator via
/// `From`); the orchestrator elevates those to `CorruptDicom`.
pub fn elevate_to_file_error(err: Error, offset: u64) -> Error {
    err.elevate(offset)
}

/// Strip at most one trailing and one leading pad byte (`0x00` or
/// `0x20`), never below length 1. Only called for VRs where
/// `is_pad_eligible()` holds.
fn strip_pad(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    let mut end = bytes.len();
    if end - start > 1 && (bytes[end - 1] == 0x00 || bytes[end - 1] == 0x20) {
        end -= 1;
    }
    if end - start > 1 && (bytes[start] == 0x00 || bytes[start] == 0x20) {
        start += 1;
    }
    &bytes[start..end]
}

/// Whether the dictionary-declared VM string permits multiple values:
/// any VM other than `{"", "1", "1-1", "0"}`.
fn supports_multi_vm(vm: &str) -> bool {
    !matches!(vm, "" | "1" | "1-1" | "0")
}

fn empty_value(vr: VR) -> Value {
    if vr.is_character_string() {
        Value::Str(String::new())
    } else {
        match vr {
            VR::FL => Value::F32(C::new()),
            VR::FD => Value::F64(C::new()),
            VR::SS => Value::I16(C::new()),
            VR::SL => Value::I32(C::new()),
            VR::US => Value::U16(C::new()),
            VR::UL => Value::U32(C::new()),
            VR::AT => Value::Tags(C::new()),
            _ => Value::Bytes(Vec::new()),
        }
    }
}

/// Component G, the value-interpretation half: render raw, already
/// length-resolved and pad-stripped bytes as a typed [`Value`] according
/// to `vr` and the dictionary-declared value multiplicity `vm`.
fn interpret_value(
    vr: VR,
    raw: &[u8],
    vm: &str,
    character_set: &SpecificCharacterSet,
    little_endian: bool,
) -> Value {
    if vr.is_character_string() {
        let text = if matches!(vr, VR::SH | VR::LO | VR::ST | VR::PN | VR::LT | VR::UT) {
            character_set
                .decode(raw)
                .unwrap_or_else(|_| String::from_utf8_lossy(raw).into_owned())
        } else {
            String::from_utf8_lossy(raw).into_owned()
        };
        if vr.forbids_vm_split() {
            return Value::Str(text);
        }
        let parts: C<String> = text.split('\\').map(|s| s.to_string()).collect();
        if parts.len() <= 1 || !supports_multi_vm(vm) {
            return Value::Str(text);
        }
        return Value::Strs(parts);
    }

    match vr {
        VR::FL => Value::F32(chunks(raw, 4, |b| {
            if little_endian {
                f32::from_le_bytes([b[0], b[1], b[2], b[3]])
            } else {
                f32::from_be_bytes([b[0], b[1], b[2], b[3]])
            }
        })),
        VR::FD => Value::F64(chunks(raw, 8, |b| {
            let arr = [b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]];
            if little_endian {
                f64::from_le_bytes(arr)
            } else {
                f64::from_be_bytes(arr)
            }
        })),
        VR::SS => Value::I16(chunks(raw, 2, |b| {
            if little_endian {
                i16::from_le_bytes([b[0], b[1]])
            } else {
                i16::from_be_bytes([b[0], b[1]])
            }
        })),
        VR::SL => Value::I32(chunks(raw, 4, |b| {
            if little_endian {
                i32::from_le_bytes([b[0], b[1], b[2], b[3]])
            } else {
                i32::from_be_bytes([b[0], b[1], b[2], b[3]])
            }
        })),
        VR::US => Value::U16(chunks(raw, 2, |b| {
            if little_endian {
                u16::from_le_bytes([b[0], b[1]])
            } else {
                u16::from_be_bytes([b[0], b[1]])
            }
        })),
        VR::UL => Value::U32(chunks(raw, 4, |b| {
            if little_endian {
                u32::from_le_bytes([b[0], b[1], b[2], b[3]])
            } else {
                u32::from_be_bytes([b[0], b[1], b[2], b[3]])
            }
        })),
        VR::AT => Value::Tags(chunks(raw, 4, |b| {
            if little_endian {
                Tag(
                    u16::from_le_bytes([b[0], b[1]]),
                    u16::from_le_bytes([b[2], b[3]]),
                )
            } else {
                Tag(
                    u16::from_be_bytes([b[0], b[1]]),
                    u16::from_be_bytes([b[2], b[3]]),
                )
            }
        })),
        // OB, OD, OF, OW, UN, SQ (unreachable here): opaque bytes, no
        // byte-swap applied at this layer.
        _ => Value::Bytes(raw.to_vec()),
    }
}

fn chunks<T>(raw: &[u8], width: usize, f: impl Fn(&[u8]) -> T) -> C<T> {
    raw.chunks_exact(width).map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader_for(bytes: &'static [u8]) -> ByteReader<'static> {
        ByteReader::new(bytes)
    }

    #[test]
    fn decodes_minimal_explicit_vr_element() {
        let mut reader = reader_for(&[
            0x28, 0x00, 0x04, 0x00, b'C', b'S', 0x0C, 0x00, b'M', b'O', b'N', b'O', b'C', b'H',
            b'R', b'O', b'M', b'E', b'2', 0x20,
        ]);
        let mut er = ElementReader::new();
        er.set_encoding(false, true);
        let element = er.decode_element(&mut reader, false).unwrap();
        assert_eq!(element.tag(), Tag(0x0028, 0x0004));
        assert_eq!(element.vr(), VR::CS);
        assert_eq!(element.value().unwrap().as_str(), Some("MONOCHROME2"));
    }

    #[test]
    fn undefined_length_item_parses_defined_length_inner_element() {
        let bytes: &[u8] = &[
            0xFE, 0xFF, 0x00, 0xE0, 0x0C, 0x00, 0x00, 0x00, 0x01, 0x7F, 0x34, 0x12, 0x04, 0x00,
            0x00, 0x00, b'L', b'e', b'o', 0x00, 0xFE, 0xFF, 0xDD, 0xE0, 0x00, 0x00, 0x00, 0x00,
        ];
        let mut reader = ByteReader::new(bytes);
        let mut er = ElementReader::new();
        er.set_encoding(true, true);
        let items = er.decode_items(&mut reader, true, false).unwrap();
        assert_eq!(items.len(), 1);
        let ds = items[0].elements().unwrap();
        let child = ds.get(Tag(0x7F01, 0x1234)).unwrap();
        assert_eq!(child.value().unwrap().as_bytes(), Some(&b"Leo\0"[..]));
    }

    #[test]
    fn lenient_mode_truncates_overlong_length() {
        let mut payload = vec![0x10, 0x00, 0x10, 0x00, b'P', b'N', 0x00, 0x01];
        payload.extend(std::iter::repeat(b'A').take(20));
        let mut reader = ByteReader::new(&payload);
        let mut er = ElementReader::new();
        er.set_encoding(false, true);
        let element = er.decode_element(&mut reader, false).unwrap();
        assert_eq!(element.value_length().get(), Some(20));
    }

    #[test]
    fn dictionary_vr_overrides_unknown_source_vr() {
        let bytes: &[u8] = &[
            0x28, 0x00, 0x07, 0x01, b'U', b'N', 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0xCE, 0x0A,
        ];
        let mut reader = ByteReader::new(bytes);
        let mut er = ElementReader::new();
        er.set_encoding(false, true);
        let element = er.decode_element(&mut reader, false).unwrap();
        assert_eq!(element.vr(), VR::US);
        assert_eq!(element.value().unwrap().as_u16s(), Some(&[2766u16][..]));
    }

    #[test]
    fn pad_strip_never_empties_a_value() {
        assert_eq!(strip_pad(&[0x20]), &[0x20]);
        assert_eq!(strip_pad(&[b'A', 0x20]), &[b'A']);
        assert_eq!(strip_pad(&[0x20, b'A', 0x20]), &[b'A']);
    }

    #[test]
    fn heuristic_detects_big_endian_from_group() {
        let bytes: &[u8] = &[0x00, 0x08, 0x05, 0x00, b'C', b'S'];
        let reader = ByteReader::new(bytes);
        let (implicit, little_endian) = ElementReader::detect_encoding(&reader);
        assert!(!little_endian);
        assert!(!implicit);
    }

    #[test]
    fn heuristic_detects_implicit_vr_from_nonvr_bytes() {
        let bytes: &[u8] = &[0x08, 0x00, 0x05, 0x00, 0x0A, 0x00];
        let reader = ByteReader::new(bytes);
        let (implicit, little_endian) = ElementReader::detect_encoding(&reader);
        assert!(little_endian);
        assert!(implicit);
    }
}
