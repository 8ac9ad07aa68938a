//! Component F: the Dicom orchestrator.
//!
//! Drives an [`ElementReader`] over a [`ByteReader`] through the whole-file
//! sequence: preamble attempt, meta-group parsing, transfer-syntax switch,
//! payload loop, and mid-stream character-set application — then hands
//! back a [`DicomFile`], the consumer-facing top-level type.
//!
//! Grounded on a `read_from` sequence (magic check, explicit-VR-LE meta
//! decoder, group-length cross-check) for steps 1-3, generalized here to
//! also drive the payload loop and character-set mid-stream switch,
//! which a higher-level `FileDicomObject` type usually does separately;
//! here there is no back-reference from a built `DicomFile` to the
//! reader or registry that produced it.

use dicom_core::error::{CorruptDicomSnafu, NotADicomSnafu, Result, UnsupportedDicomSnafu};
use dicom_core::header::Tag;
use dicom_core::value::{DataSet, Element, Value};
use dicom_encoding::text::SpecificCharacterSet;
use dicom_parser::{ByteReader, ElementReader};
use dicom_transfer_syntax_registry::TransferSyntaxRegistry;

use crate::config::ParseConfig;

const PREAMBLE_LEN: usize = 128;
const MAGIC: &[u8; 4] = b"DICM";

/// `(0002,0000)` FileMetaInformationGroupLength.
const TAG_GROUP_LENGTH: Tag = Tag(0x0002, 0x0000);
/// `(0002,0010)` TransferSyntaxUID.
const TAG_TRANSFER_SYNTAX_UID: Tag = Tag(0x0002, 0x0010);

/// A decoded DICOM Part 10 instance: its preamble (possibly all-zero)
/// and a single top-level data set intermixing file meta information
/// (group `0002`) and payload elements.
#[derive(Debug, Clone)]
pub struct DicomFile {
    preamble: [u8; PREAMBLE_LEN],
    dataset: DataSet,
    character_set: SpecificCharacterSet,
}

impl DicomFile {
    /// Parse a DICOM Part 10 instance from a complete in-memory byte
    /// buffer, using the default (lenient) [`ParseConfig`].
    pub fn parse(bytes: &[u8]) -> Result<DicomFile> {
        DicomFile::parse_with_config(bytes, &ParseConfig::default())
    }

    /// Parse a DICOM Part 10 instance under an explicit [`ParseConfig`].
    pub fn parse_with_config(bytes: &[u8], config: &ParseConfig) -> Result<DicomFile> {
        require_minimum_length(bytes)?;

        let mut reader = ByteReader::new(bytes);
        let mut element_reader = ElementReader::new();
        let mut dataset = DataSet::new();

        let preamble = attempt_preamble(&mut reader);

        // Step 2: meta-group loop, always Explicit VR Little Endian.
        element_reader.set_encoding(false, true);
        let mut group_length_element: Option<Element> = None;
        loop {
            if reader.remaining() < 2 {
                break;
            }
            let peeked = reader.peek(2).expect("checked remaining() >= 2 above");
            let group = u16::from_le_bytes([peeked[0], peeked[1]]);
            if group != 0x0002 {
                break;
            }
            let offset = reader.position();
            let element = element_reader
                .decode_element(&mut reader, config.strict_mode)
                .map_err(|e| e.elevate(offset))?;
            if element.tag() == TAG_GROUP_LENGTH {
                group_length_element = Some(element.clone());
            }
            dataset.insert(element);
        }

        if let Some(group_length) = &group_length_element {
            if let Some(declared) = group_length.value().and_then(Value::as_u32s) {
                tracing::debug!(declared = declared[0], "file meta information group length");
            } else {
                return CorruptDicomSnafu {
                    offset: 0u64,
                    message: "FileMetaInformationGroupLength value is not a u32".to_string(),
                }
                .fail();
            }
        }

        // Step 3: transfer-syntax switch.
        let transfer_syntax_uid = dataset
            .get(TAG_TRANSFER_SYNTAX_UID)
            .and_then(|e| e.value())
            .and_then(Value::as_str)
            .map(str::to_string);

        match transfer_syntax_uid {
            Some(uid) => {
                let registry = TransferSyntaxRegistry;
                match registry.get(&uid) {
                    Some(ts) => {
                        let encoding = ts.encoding();
                        element_reader.set_encoding(encoding.implicit_vr, encoding.little_endian);
                    }
                    None => {
                        return UnsupportedDicomSnafu {
                            uid: Some(uid),
                            message: "transfer syntax not in registry".to_string(),
                        }
                        .fail();
                    }
                }
            }
            None => {
                if reader.remaining() >= 6 {
                    let (implicit_vr, little_endian) = ElementReader::detect_encoding(&reader);
                    element_reader.set_encoding(implicit_vr, little_endian);
                } else {
                    element_reader.set_encoding(true, true);
                }
            }
        }

        // Step 4: payload loop, until EOF.
        while reader.remaining() > 0 {
            let offset = reader.position();
            let element = element_reader
                .decode_element(&mut reader, config.strict_mode)
                .map_err(|e| e.elevate(offset))?;
            dataset.insert(element);
        }

        let character_set = element_reader.character_set().clone();

        Ok(DicomFile {
            preamble,
            dataset,
            character_set,
        })
    }

    /// The file's 128-byte preamble. All-zero when the input had none.
    pub fn preamble(&self) -> &[u8; PREAMBLE_LEN] {
        &self.preamble
    }

    /// Iterate over every element at the top level, meta and payload
    /// alike, in tag order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.dataset.elements()
    }

    /// Look up a top-level element by tag.
    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.dataset.get(tag)
    }

    /// The character set currently in effect for character-string VR
    /// decoding (as last updated by `SpecificCharacterSet`, if present).
    pub fn character_set(&self) -> &SpecificCharacterSet {
        &self.character_set
    }

    /// The full top-level data set.
    pub fn dataset(&self) -> &DataSet {
        &self.dataset
    }

    /// Produce human-readable diagnostic lines for every top-level
    /// element, recursing into nested items.
    pub fn describe(&self) -> String {
        self.dataset
            .elements()
            .map(|e| e.describe(0))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Attempt to recognize the 128-byte preamble + `DICM` magic. Peeks 132
/// bytes; on a match, consumes them and returns the
/// preamble. On any mismatch or short read, leaves the reader untouched
/// and returns an all-zero preamble — a missing preamble is not fatal.
fn attempt_preamble(reader: &mut ByteReader) -> [u8; PREAMBLE_LEN] {
    match reader.peek(PREAMBLE_LEN + MAGIC.len()) {
        Ok(bytes) if &bytes[PREAMBLE_LEN..] == MAGIC => {
            let mut preamble = [0u8; PREAMBLE_LEN];
            preamble.copy_from_slice(&bytes[..PREAMBLE_LEN]);
            reader
                .discard(PREAMBLE_LEN + MAGIC.len())
                .expect("just peeked the same range");
            preamble
        }
        _ => {
            tracing::debug!("no DICM preamble found, continuing without one");
            [0u8; PREAMBLE_LEN]
        }
    }
}

/// Rejects input too short to be a DICOM stream at all: fewer than the
/// handful of bytes needed to read even one tag.
fn require_minimum_length(bytes: &[u8]) -> Result<()> {
    if bytes.len() < 8 {
        return NotADicomSnafu {
            message: format!("stream of {} bytes is too short to hold a single element", bytes.len()),
        }
        .fail();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_minimal_explicit_le_file(payload: &[u8]) -> Vec<u8> {
        let mut bytes = vec![0u8; 128];
        bytes.extend_from_slice(b"DICM");
        // (0002,0000) UL 4 group length
        let meta_body: Vec<u8> = {
            let mut m = Vec::new();
            // (0002,0010) UI TransferSyntaxUID = Explicit VR Little Endian
            let uid = b"1.2.840.10008.1.2.1\0";
            m.extend_from_slice(&0x0002u16.to_le_bytes());
            m.extend_from_slice(&0x0010u16.to_le_bytes());
            m.extend_from_slice(b"UI");
            m.extend_from_slice(&(uid.len() as u16).to_le_bytes());
            m.extend_from_slice(uid);
            m
        };
        bytes.extend_from_slice(&0x0002u16.to_le_bytes());
        bytes.extend_from_slice(&0x0000u16.to_le_bytes());
        bytes.extend_from_slice(b"UL");
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&(meta_body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&meta_body);
        bytes.extend_from_slice(payload);
        bytes
    }

    #[test]
    fn parses_preamble_and_transfer_syntax_switch() {
        let payload = {
            let mut p = Vec::new();
            // (0028,0004) CS PhotometricInterpretation = MONOCHROME2
            p.extend_from_slice(&0x0028u16.to_le_bytes());
            p.extend_from_slice(&0x0004u16.to_le_bytes());
            p.extend_from_slice(b"CS");
            p.extend_from_slice(&12u16.to_le_bytes());
            p.extend_from_slice(b"MONOCHROME2 ");
            p
        };
        let bytes = build_minimal_explicit_le_file(&payload);
        let file = DicomFile::parse(&bytes).unwrap();
        assert_eq!(file.preamble(), &[0u8; 128]);
        let element = file.get(Tag(0x0028, 0x0004)).unwrap();
        assert_eq!(element.value().unwrap().as_str(), Some("MONOCHROME2"));
    }

    #[test]
    fn missing_preamble_parses_normally() {
        let mut bytes = Vec::new();
        // straight into group 0002, no preamble/magic
        let uid = b"1.2.840.10008.1.2\0"; // Implicit VR Little Endian
        bytes.extend_from_slice(&0x0002u16.to_le_bytes());
        bytes.extend_from_slice(&0x0000u16.to_le_bytes());
        bytes.extend_from_slice(b"UL");
        bytes.extend_from_slice(&4u16.to_le_bytes());
        let group_len = {
            let mut m = Vec::new();
            m.extend_from_slice(&0x0002u16.to_le_bytes());
            m.extend_from_slice(&0x0010u16.to_le_bytes());
            m.extend_from_slice(b"UI");
            m.extend_from_slice(&(uid.len() as u16).to_le_bytes());
            m.extend_from_slice(uid);
            m
        };
        bytes.extend_from_slice(&(group_len.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&group_len);

        let file = DicomFile::parse(&bytes).unwrap();
        assert_eq!(file.preamble(), &[0u8; 128]);
        assert_eq!(
            file.get(TAG_TRANSFER_SYNTAX_UID)
                .and_then(|e| e.value())
                .and_then(Value::as_str),
            Some("1.2.840.10008.1.2")
        );
    }

    #[test]
    fn stream_too_short_is_not_a_dicom() {
        let err = DicomFile::parse(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, dicom_core::error::Error::NotADicom { .. }));
    }

    #[test]
    fn unsupported_transfer_syntax_is_reported() {
        let uid = b"1.2.3.4.5.6.7.8.9\0";
        let mut bytes = vec![0u8; 128];
        bytes.extend_from_slice(b"DICM");
        let meta_body = {
            let mut m = Vec::new();
            m.extend_from_slice(&0x0002u16.to_le_bytes());
            m.extend_from_slice(&0x0010u16.to_le_bytes());
            m.extend_from_slice(b"UI");
            m.extend_from_slice(&(uid.len() as u16).to_le_bytes());
            m.extend_from_slice(uid);
            m
        };
        bytes.extend_from_slice(&0x0002u16.to_le_bytes());
        bytes.extend_from_slice(&0x0000u16.to_le_bytes());
        bytes.extend_from_slice(b"UL");
        bytes.extend_from_slice(&4u16.to_le_bytes());
        bytes.extend_from_slice(&(meta_body.len() as u32).to_le_bytes());
        bytes.extend_from_slice(&meta_body);

        let err = DicomFile::parse(&bytes).unwrap_err();
        assert!(matches!(err, dicom_core::error::Error::UnsupportedDicom { .. }));
    }
}
