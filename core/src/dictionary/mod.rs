//! The concept of a DICOM data dictionary: the association between a tag
//! and the attribute's typical VR, value multiplicity, and name.
//!
//! Dictionaries are consulted during header decoding to resolve the
//! *reported* VR of an element (falling back to the source-encoded VR
//! only in implicit VR little endian, or when the tag is unknown).

use crate::header::{Tag, VR};
use std::fmt::Debug;

/// A dictionary of DICOM attributes, keyed by tag or by name.
///
/// Methods take no generic parameters so implementors can be used as
/// trait objects.
pub trait DataDictionary: Debug {
    /// The type of entry this dictionary yields.
    type Entry: DictionaryEntry;

    /// Fetch an entry by tag. Dictionaries that synthesize a fallback
    /// entry for unrecognized tags (see `DictionaryEntry::is_synthetic`)
    /// never return `None` here; this method is left fallible for
    /// dictionaries that don't.
    fn by_tag(&self, tag: Tag) -> Option<&Self::Entry>;

    /// Fetch an entry by its usual alias (e.g. "PatientName").
    fn by_name(&self, name: &str) -> Option<&Self::Entry>;

    /// Fetch the human-readable name registered for a UID (e.g. a
    /// transfer-syntax or SOP class UID), if any. Used by the
    /// transfer-syntax registry to resolve names for diagnostics instead
    /// of maintaining its own separate UID-to-name table.
    fn by_uid(&self, uid: &str) -> Option<&str>;
}

/// A single dictionary entry: an attribute's tag, name, human-readable
/// display name, value representation, value multiplicity, and whether
/// the standard has retired it.
pub trait DictionaryEntry {
    /// The attribute tag.
    fn tag(&self) -> Tag;
    /// The attribute's name, with no spaces, usually UpperCamelCase.
    fn alias(&self) -> &str;
    /// The attribute's human-readable display name (e.g. "Patient's
    /// Name"), as opposed to `alias()`'s programmatic form.
    fn name(&self) -> &str;
    /// The attribute's typical value representation.
    fn vr(&self) -> VR;
    /// The attribute's value multiplicity, as declared by the standard
    /// (e.g. `"1"`, `"1-n"`, `"2"`).
    fn vm(&self) -> &str;
    /// Whether the standard has formally retired this attribute.
    fn is_retired(&self) -> bool;
    /// Whether this entry was synthesized for a tag absent from the
    /// dictionary, rather than looked up from the standard.
    fn is_synthetic(&self) -> bool {
        false
    }
}

/// An owned dictionary entry.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct DictionaryEntryBuf {
    /// The attribute tag.
    pub tag: Tag,
    /// The attribute's name.
    pub alias: String,
    /// The attribute's human-readable display name.
    pub name: String,
    /// The attribute's typical VR.
    pub vr: VR,
    /// The attribute's value multiplicity.
    pub vm: String,
    /// Whether the standard has formally retired this attribute.
    pub retired: bool,
    /// Whether this entry was synthesized for a tag absent from the
    /// dictionary.
    pub synthetic: bool,
}

impl DictionaryEntry for DictionaryEntryBuf {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias.as_str()
    }
    fn name(&self) -> &str {
        self.name.as_str()
    }
    fn vr(&self) -> VR {
        self.vr
    }
    fn vm(&self) -> &str {
        self.vm.as_str()
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
    fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

/// A dictionary entry borrowing its strings from `'static` data, as
/// produced by a hand-curated static table.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DictionaryEntryRef<'a> {
    /// The attribute tag.
    pub tag: Tag,
    /// The attribute's name.
    pub alias: &'a str,
    /// The attribute's human-readable display name.
    pub name: &'a str,
    /// The attribute's typical VR.
    pub vr: VR,
    /// The attribute's value multiplicity.
    pub vm: &'a str,
    /// Whether the standard has formally retired this attribute.
    pub retired: bool,
    /// Whether this entry was synthesized for a tag absent from the
    /// dictionary.
    pub synthetic: bool,
}

impl<'a> DictionaryEntry for DictionaryEntryRef<'a> {
    fn tag(&self) -> Tag {
        self.tag
    }
    fn alias(&self) -> &str {
        self.alias
    }
    fn name(&self) -> &str {
        self.name
    }
    fn vr(&self) -> VR {
        self.vr
    }
    fn vm(&self) -> &str {
        self.vm
    }
    fn is_retired(&self) -> bool {
        self.retired
    }
    fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}
