//! End-to-end parsing tests exercising whole Part 10 streams built as
//! literal byte vectors, rather than files on disk.

use dicom_core::header::Tag;
use dicom_core::value::Value;
use dicom_object::{DicomFile, ParseConfig};

fn explicit_vr_le_element(group: u16, element: u16, vr: &[u8; 2], value: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&group.to_le_bytes());
    out.extend_from_slice(&element.to_le_bytes());
    out.extend_from_slice(vr);
    out.extend_from_slice(&(value.len() as u16).to_le_bytes());
    out.extend_from_slice(value);
    out
}

fn wrap_with_preamble_and_meta(transfer_syntax_uid: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut bytes = vec![0u8; 128];
    bytes.extend_from_slice(b"DICM");
    let meta_body = explicit_vr_le_element(0x0002, 0x0010, b"UI", transfer_syntax_uid);
    bytes.extend_from_slice(&explicit_vr_le_element(
        0x0002,
        0x0000,
        b"UL",
        &(meta_body.len() as u32).to_le_bytes(),
    ));
    bytes.extend_from_slice(&meta_body);
    bytes.extend_from_slice(payload);
    bytes
}

#[test]
fn explicit_vr_le_sequence_with_nested_item_round_trips() {
    // One top-level element (0008,1140) SQ, undefined length, containing
    // one item with a single child element (0008,1150) UI.
    let child = explicit_vr_le_element(0x0008, 0x1150, b"UI", b"1.2.3\0");
    let mut item = Vec::new();
    item.extend_from_slice(&0xFFFEu16.to_le_bytes());
    item.extend_from_slice(&0xE000u16.to_le_bytes());
    item.extend_from_slice(&(child.len() as u32).to_le_bytes());
    item.extend_from_slice(&child);

    let mut sq = Vec::new();
    sq.extend_from_slice(&0x0008u16.to_le_bytes());
    sq.extend_from_slice(&0x1140u16.to_le_bytes());
    sq.extend_from_slice(b"SQ");
    sq.extend_from_slice(&[0, 0]); // reserved
    sq.extend_from_slice(&0xFFFF_FFFFu32.to_le_bytes()); // undefined length
    sq.extend_from_slice(&item);
    sq.extend_from_slice(&0xFFFEu16.to_le_bytes());
    sq.extend_from_slice(&0xE0DDu16.to_le_bytes());
    sq.extend_from_slice(&0u32.to_le_bytes());

    let bytes = wrap_with_preamble_and_meta(b"1.2.840.10008.1.2.1\0", &sq);
    let file = DicomFile::parse(&bytes).expect("well-formed stream parses");

    let top = file.get(Tag(0x0008, 0x1140)).expect("sequence present");
    let items = top.items().expect("sequence body is a list of items");
    assert_eq!(items.len(), 1);
    let nested = items[0].elements().expect("item holds a parsed data set");
    let referenced_sop = nested
        .get(Tag(0x0008, 0x1150))
        .and_then(|e| e.value())
        .and_then(Value::as_str);
    assert_eq!(referenced_sop, Some("1.2.3"));
}

#[test]
fn missing_preamble_and_magic_still_parses() {
    let uid = b"1.2.840.10008.1.2\0"; // Implicit VR Little Endian
    let meta_body = explicit_vr_le_element(0x0002, 0x0010, b"UI", uid);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&explicit_vr_le_element(
        0x0002,
        0x0000,
        b"UL",
        &(meta_body.len() as u32).to_le_bytes(),
    ));
    bytes.extend_from_slice(&meta_body);
    // Implicit VR LE payload: (0010,0010) PN "Doe^John", tag+length(u32)+value.
    bytes.extend_from_slice(&0x0010u16.to_le_bytes());
    bytes.extend_from_slice(&0x0010u16.to_le_bytes());
    bytes.extend_from_slice(&8u32.to_le_bytes());
    bytes.extend_from_slice(b"Doe^John");

    let file = DicomFile::parse(&bytes).expect("missing preamble is not fatal");
    assert_eq!(file.preamble(), &[0u8; 128]);
    let name = file
        .get(Tag(0x0010, 0x0010))
        .and_then(|e| e.value())
        .and_then(Value::as_str);
    assert_eq!(name, Some("Doe^John"));
}

#[test]
fn strict_mode_rejects_overlong_declared_length() {
    let mut payload = explicit_vr_le_element(0x0010, 0x0010, b"PN", b"AAAA");
    // Corrupt the 2-byte length field to claim far more than remains.
    let len_offset = 8;
    payload[len_offset..len_offset + 2].copy_from_slice(&2000u16.to_le_bytes());

    let bytes = wrap_with_preamble_and_meta(b"1.2.840.10008.1.2.1\0", &payload);
    let err = DicomFile::parse_with_config(&bytes, &ParseConfig::strict())
        .expect_err("overlong length must fail under strict mode");
    assert!(matches!(err, dicom_core::error::Error::CorruptDicom { .. }));
}

#[test]
fn lenient_mode_truncates_overlong_declared_length() {
    let mut payload = explicit_vr_le_element(0x0010, 0x0010, b"PN", b"AAAA");
    let len_offset = 8;
    payload[len_offset..len_offset + 2].copy_from_slice(&2000u16.to_le_bytes());

    let bytes = wrap_with_preamble_and_meta(b"1.2.840.10008.1.2.1\0", &payload);
    let file = DicomFile::parse_with_config(&bytes, &ParseConfig::default())
        .expect("lenient mode truncates rather than failing");
    let element = file.get(Tag(0x0010, 0x0010)).unwrap();
    assert_eq!(element.value_length().get(), Some(4));
}
