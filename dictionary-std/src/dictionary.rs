//! A hand-curated static dictionary covering the attributes this crate
//! actually needs to resolve: the group-0002 file meta attributes, the
//! common identifying/descriptive payload attributes, and the attributes
//! exercised by the object crate's integration tests.
//!
//! This is not the full PS3.6 data element dictionary (some four
//! thousand entries). A miss on `by_tag` does not return `None`: it
//! synthesizes an entry with VR `UN`, VM `"1"` and name
//! `"Unknown(GGGG,EEEE)"`, flagged via `DictionaryEntry::is_synthetic`,
//! which is the behavior the element reader actually depends on for
//! tags outside this table.

use dicom_core::dictionary::{DataDictionary, DictionaryEntryRef};
use dicom_core::header::{Tag, VR};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;

macro_rules! entries {
    ($( ($group:expr, $elem:expr, $vr:ident, $vm:expr, $alias:expr, $name:expr, $retired:expr) ),+ $(,)?) => {
        &[
            $(
                DictionaryEntryRef {
                    tag: Tag($group, $elem),
                    alias: $alias,
                    name: $name,
                    vr: VR::$vr,
                    vm: $vm,
                    retired: $retired,
                    synthetic: false,
                },
            )+
        ]
    };
}

static ENTRIES: &[DictionaryEntryRef<'static>] = entries![
    // File Meta Information (group 0002, always explicit VR little endian)
    (0x0002, 0x0000, UL, "1", "FileMetaInformationGroupLength", "File Meta Information Group Length", false),
    (0x0002, 0x0001, OB, "1", "FileMetaInformationVersion", "File Meta Information Version", false),
    (0x0002, 0x0002, UI, "1", "MediaStorageSOPClassUID", "Media Storage SOP Class UID", false),
    (0x0002, 0x0003, UI, "1", "MediaStorageSOPInstanceUID", "Media Storage SOP Instance UID", false),
    (0x0002, 0x0010, UI, "1", "TransferSyntaxUID", "Transfer Syntax UID", false),
    (0x0002, 0x0012, UI, "1", "ImplementationClassUID", "Implementation Class UID", false),
    (0x0002, 0x0013, SH, "1", "ImplementationVersionName", "Implementation Version Name", false),
    (0x0002, 0x0016, AE, "1", "SourceApplicationEntityTitle", "Source Application Entity Title", false),
    (0x0002, 0x0100, UI, "1", "PrivateInformationCreatorUID", "Private Information Creator UID", false),
    (0x0002, 0x0102, OB, "1", "PrivateInformation", "Private Information", false),
    // Identification
    (0x0008, 0x0005, CS, "1-n", "SpecificCharacterSet", "Specific Character Set", false),
    (0x0008, 0x0008, CS, "2-n", "ImageType", "Image Type", false),
    (0x0008, 0x0016, UI, "1", "SOPClassUID", "SOP Class UID", false),
    (0x0008, 0x0018, UI, "1", "SOPInstanceUID", "SOP Instance UID", false),
    (0x0008, 0x0020, DA, "1", "StudyDate", "Study Date", false),
    (0x0008, 0x0030, TM, "1", "StudyTime", "Study Time", false),
    (0x0008, 0x0050, SH, "1", "AccessionNumber", "Accession Number", false),
    (0x0008, 0x0060, CS, "1", "Modality", "Modality", false),
    (0x0008, 0x0070, LO, "1", "Manufacturer", "Manufacturer", false),
    (0x0008, 0x0090, PN, "1", "ReferringPhysicianName", "Referring Physician's Name", false),
    (0x0008, 0x1030, LO, "1", "StudyDescription", "Study Description", false),
    (0x0008, 0x103E, LO, "1", "SeriesDescription", "Series Description", false),
    // Patient
    (0x0010, 0x0010, PN, "1", "PatientName", "Patient's Name", false),
    (0x0010, 0x0020, LO, "1", "PatientID", "Patient ID", false),
    (0x0010, 0x0030, DA, "1", "PatientBirthDate", "Patient's Birth Date", false),
    (0x0010, 0x0040, CS, "1", "PatientSex", "Patient's Sex", false),
    // Study/Series/Equipment
    (0x0020, 0x000D, UI, "1", "StudyInstanceUID", "Study Instance UID", false),
    (0x0020, 0x000E, UI, "1", "SeriesInstanceUID", "Series Instance UID", false),
    (0x0020, 0x0010, SH, "1", "StudyID", "Study ID", false),
    (0x0020, 0x0011, IS, "1", "SeriesNumber", "Series Number", false),
    (0x0020, 0x0013, IS, "1", "InstanceNumber", "Instance Number", false),
    (0x0020, 0x0020, CS, "2", "PatientOrientation", "Patient Orientation", false),
    (0x0020, 0x0032, DS, "3", "ImagePositionPatient", "Image Position (Patient)", false),
    (0x0020, 0x0037, DS, "6", "ImageOrientationPatient", "Image Orientation (Patient)", false),
    // Image pixel description
    (0x0028, 0x0002, US, "1", "SamplesPerPixel", "Samples per Pixel", false),
    (0x0028, 0x0004, CS, "1", "PhotometricInterpretation", "Photometric Interpretation", false),
    (0x0028, 0x0008, IS, "1", "NumberOfFrames", "Number of Frames", false),
    (0x0028, 0x0010, US, "1", "Rows", "Rows", false),
    (0x0028, 0x0011, US, "1", "Columns", "Columns", false),
    (0x0028, 0x0030, DS, "2", "PixelSpacing", "Pixel Spacing", false),
    (0x0028, 0x0100, US, "1", "BitsAllocated", "Bits Allocated", false),
    (0x0028, 0x0101, US, "1", "BitsStored", "Bits Stored", false),
    (0x0028, 0x0102, US, "1", "HighBit", "High Bit", false),
    (0x0028, 0x0103, US, "1", "PixelRepresentation", "Pixel Representation", false),
    (0x0028, 0x0106, US, "1", "SmallestImagePixelValue", "Smallest Image Pixel Value", true),
    (0x0028, 0x0107, US, "1", "LargestImagePixelValue", "Largest Image Pixel Value", true),
    (0x0028, 0x1050, DS, "1-n", "WindowCenter", "Window Center", false),
    (0x0028, 0x1051, DS, "1-n", "WindowWidth", "Window Width", false),
    (0x0028, 0x1052, DS, "1", "RescaleIntercept", "Rescale Intercept", false),
    (0x0028, 0x1053, DS, "1", "RescaleSlope", "Rescale Slope", false),
    // Pixel Data
    (0x7FE0, 0x0010, OW, "1", "PixelData", "Pixel Data", false),
];

/// UID-indexed names: transfer syntaxes, resolvable without the
/// transfer-syntax registry duplicating its own name table.
static UID_NAMES: &[(&str, &str)] = &[
    ("1.2.840.10008.1.2", "Implicit VR Little Endian"),
    ("1.2.840.10008.1.2.1", "Explicit VR Little Endian"),
    ("1.2.840.10008.1.2.1.99", "Deflated Explicit VR Little Endian"),
    ("1.2.840.10008.1.2.2", "Explicit VR Big Endian"),
    (
        "1.2.840.10008.1.2.4.70",
        "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    ),
    ("1.2.840.10008.1.2.4.90", "JPEG 2000 Image Compression (Lossless Only)"),
    ("1.2.840.10008.1.2.4.91", "JPEG 2000 Image Compression"),
];

static BY_NAME: Lazy<HashMap<&'static str, &'static DictionaryEntryRef<'static>>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.alias, e)).collect());

static BY_TAG: Lazy<HashMap<Tag, &'static DictionaryEntryRef<'static>>> =
    Lazy::new(|| ENTRIES.iter().map(|e| (e.tag, e)).collect());

static BY_UID: Lazy<HashMap<&'static str, &'static str>> =
    Lazy::new(|| UID_NAMES.iter().copied().collect());

/// Tags not found in `ENTRIES` get a synthetic entry built on first
/// lookup and cached here, keyed by tag, so repeated lookups of the same
/// unknown tag return the same `'static` reference.
static SYNTHETIC: Lazy<Mutex<HashMap<Tag, &'static DictionaryEntryRef<'static>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

fn synthetic_entry(tag: Tag) -> &'static DictionaryEntryRef<'static> {
    let mut cache = SYNTHETIC.lock().expect("synthetic entry cache poisoned");
    cache.entry(tag).or_insert_with(|| {
        let name: &'static str = Box::leak(format!("Unknown{}", tag).into_boxed_str());
        Box::leak(Box::new(DictionaryEntryRef {
            tag,
            alias: name,
            name,
            vr: VR::UN,
            vm: "1",
            retired: false,
            synthetic: true,
        }))
    })
}

/// The standard data dictionary: a lazily-built, read-only lookup table
/// covering the attributes listed above.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardDataDictionary;

impl StandardDataDictionary {
    /// Build (or retrieve the already-built) singleton dictionary.
    pub fn instance() -> &'static StandardDataDictionary {
        static INSTANCE: StandardDataDictionary = StandardDataDictionary;
        &INSTANCE
    }
}

impl DataDictionary for StandardDataDictionary {
    type Entry = DictionaryEntryRef<'static>;

    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry> {
        Some(BY_TAG.get(&tag).copied().unwrap_or_else(|| synthetic_entry(tag)))
    }

    fn by_name(&self, name: &str) -> Option<&Self::Entry> {
        BY_NAME.get(name).copied()
    }

    fn by_uid(&self, uid: &str) -> Option<&str> {
        BY_UID.get(uid).copied()
    }
}

impl fmt::Display for StandardDataDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Standard DICOM Data Dictionary ({} entries)", ENTRIES.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::dictionary::DictionaryEntry;

    #[test]
    fn known_tag_resolves_dictionary_vr() {
        let dict = StandardDataDictionary::instance();
        let entry = dict.by_tag(Tag(0x0010, 0x0010)).expect("PatientName");
        assert_eq!(entry.vr, VR::PN);
        assert_eq!(entry.alias, "PatientName");
    }

    #[test]
    fn unknown_tag_resolves_to_synthetic_entry() {
        let dict = StandardDataDictionary::instance();
        let entry = dict.by_tag(Tag(0x0009, 0x0001)).expect("synthetic fallback");
        assert!(entry.is_synthetic());
        assert_eq!(entry.vr, VR::UN);
        assert_eq!(entry.vm, "1");
        assert_eq!(entry.name, "Unknown(0009,0001)");
        assert_eq!(entry.alias, "Unknown(0009,0001)");

        // repeated lookups of the same unknown tag are stable
        let again = dict.by_tag(Tag(0x0009, 0x0001)).unwrap();
        assert_eq!(entry.name, again.name);
    }

    #[test]
    fn known_tag_is_not_synthetic() {
        let dict = StandardDataDictionary::instance();
        let entry = dict.by_tag(Tag(0x0010, 0x0010)).unwrap();
        assert!(!entry.is_synthetic());
    }

    #[test]
    fn uid_lookup_resolves_transfer_syntax_names() {
        let dict = StandardDataDictionary::instance();
        assert_eq!(
            dict.by_uid("1.2.840.10008.1.2.1"),
            Some("Explicit VR Little Endian")
        );
        assert_eq!(dict.by_uid("1.2.3.4.5.unknown"), None);
    }

    #[test]
    fn lookup_by_name_matches_lookup_by_tag() {
        let dict = StandardDataDictionary::instance();
        let by_name = dict.by_name("TransferSyntaxUID").unwrap();
        let by_tag = dict.by_tag(Tag(0x0002, 0x0010)).unwrap();
        assert_eq!(by_name.tag, by_tag.tag);
    }

    #[test]
    fn largest_image_pixel_value_is_unsigned_short() {
        let dict = StandardDataDictionary::instance();
        let entry = dict.by_tag(Tag(0x0028, 0x0107)).unwrap();
        assert_eq!(entry.vr, VR::US);
    }
}
