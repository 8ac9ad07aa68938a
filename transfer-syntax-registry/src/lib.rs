#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
//! Component C: the transfer-syntax registry.
//!
//! Maps a DICOM transfer-syntax UID to the [`Encoding`] it implies (byte
//! order and implicit/explicit VR), plus whether its payload is
//! encapsulated. The registry is a closed enumeration of seven
//! well-known syntaxes: any other UID is unsupported. Unlike an
//! `inventory`-extensible, pixel-codec-aware registry, this one is a
//! fixed array built once behind a `once_cell::sync::Lazy` lookup map —
//! read-only after process start, with no runtime registration
//! extension point, since pixel codec adapters (JPEG/JPEG2000/RLE/etc.)
//! are out of scope here.

use dicom_core::dictionary::DataDictionary;
use dicom_dictionary_std::StandardDataDictionary;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

pub mod entries;

pub use dicom_core::Encoding;

/// A single registered transfer syntax: its UID, fallback display name,
/// the wire [`Encoding`] it implies, and whether its payload is
/// encapsulated (pixel-data-style content kept opaque rather than
/// parsed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferSyntax {
    uid: &'static str,
    fallback_name: &'static str,
    encoding: Encoding,
    encapsulated: bool,
}

impl TransferSyntax {
    /// The transfer syntax's UID.
    pub fn uid(&self) -> &'static str {
        self.uid
    }

    /// The transfer syntax's human-readable name, resolved from the data
    /// dictionary's UID index rather than a registry-local name table.
    /// Falls back to this entry's own name if the dictionary has none
    /// registered for the UID.
    pub fn name(&self) -> &'static str {
        StandardDataDictionary::instance()
            .by_uid(self.uid)
            .unwrap_or(self.fallback_name)
    }

    /// The wire encoding implied by this transfer syntax.
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Whether this transfer syntax's payload is encapsulated (its items
    /// are preserved as opaque byte regions rather than parsed further).
    pub fn is_encapsulated(&self) -> bool {
        self.encapsulated
    }
}

impl fmt::Display for TransferSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.uid)
    }
}

static BY_UID: Lazy<HashMap<&'static str, &'static TransferSyntax>> =
    Lazy::new(|| entries::ALL.iter().map(|ts| (ts.uid, ts)).collect());

/// The transfer syntax registry: a read-only, process-lifetime lookup
/// table from UID to [`TransferSyntax`].
#[derive(Debug, Default, Clone, Copy)]
pub struct TransferSyntaxRegistry;

impl TransferSyntaxRegistry {
    /// Look up a transfer syntax by UID. Trailing whitespace and NUL
    /// padding (as commonly appended to pad a UI value to even length)
    /// are trimmed before lookup.
    pub fn get(&self, uid: &str) -> Option<&'static TransferSyntax> {
        let uid = uid.trim_end_matches(|c: char| c.is_whitespace() || c == '\0');
        BY_UID.get(uid).copied()
    }

    /// Whether the given UID names a supported transfer syntax.
    pub fn is_supported(&self, uid: &str) -> bool {
        self.get(uid).is_some()
    }

    /// Iterate over every registered transfer syntax.
    pub fn iter(&self) -> impl Iterator<Item = &'static TransferSyntax> {
        entries::ALL.iter()
    }
}

/// The default transfer syntax assumed when a file's meta information is
/// absent or does not declare one: Implicit VR Little Endian.
pub fn default() -> TransferSyntax {
    entries::IMPLICIT_VR_LITTLE_ENDIAN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_mandatory_transfer_syntaxes() {
        let reg = TransferSyntaxRegistry;
        let implicit = reg.get("1.2.840.10008.1.2").expect("implicit VR LE");
        assert!(implicit.encoding().implicit_vr);
        assert!(implicit.encoding().little_endian);

        let explicit_be = reg.get("1.2.840.10008.1.2.2").expect("explicit VR BE");
        assert!(!explicit_be.encoding().implicit_vr);
        assert!(!explicit_be.encoding().little_endian);
    }

    #[test]
    fn trims_trailing_nul_padding() {
        let reg = TransferSyntaxRegistry;
        assert!(reg.get("1.2.840.10008.1.2.1\0").is_some());
    }

    #[test]
    fn unknown_uid_is_unsupported() {
        let reg = TransferSyntaxRegistry;
        assert!(!reg.is_supported("1.2.3.4.5.6.7.8.9"));
        assert!(reg.get("1.2.3.4.5.6.7.8.9").is_none());
    }

    #[test]
    fn encapsulated_syntaxes_flagged() {
        let reg = TransferSyntaxRegistry;
        let jpeg2000 = reg.get("1.2.840.10008.1.2.4.91").unwrap();
        assert!(jpeg2000.is_encapsulated());
        let explicit_le = reg.get("1.2.840.10008.1.2.1").unwrap();
        assert!(!explicit_le.is_encapsulated());
    }

    #[test]
    fn default_is_implicit_vr_little_endian() {
        assert_eq!(default().uid(), "1.2.840.10008.1.2");
    }
}
