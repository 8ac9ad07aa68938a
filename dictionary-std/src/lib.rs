//! The standard DICOM data dictionary: a lazily-built lookup table
//! mapping attribute tags to their typical VR, value multiplicity and
//! name.

pub mod dictionary;

pub use dictionary::StandardDataDictionary;

#[cfg(test)]
mod tests {
    use super::*;
    use dicom_core::dictionary::{DataDictionary, DictionaryEntry};
    use dicom_core::Tag;

    #[test]
    fn dictionary_singleton_is_reachable_from_crate_root() {
        let dict = StandardDataDictionary::instance();
        assert_eq!(dict.by_tag(Tag(0x7FE0, 0x0010)).unwrap().tag(), Tag(0x7FE0, 0x0010));
    }
}
