//! Core data types for interpreting DICOM data elements: the attribute tag,
//! the value representation, the length field, and the header trait shared
//! by data elements, sequence items, and delimiters.

use std::fmt;
use std::str::FromStr;

/// A DICOM data element tag: a 32-bit identifier conceptually split into a
/// 16-bit group number and a 16-bit element number.
///
/// Displayed in the conventional `(GGGG,EEEE)` hexadecimal form.
#[derive(Debug, Default, PartialEq, Eq, Hash, Clone, Copy, PartialOrd, Ord)]
pub struct Tag(pub u16, pub u16);

impl Tag {
    /// Item-start sentinel tag: `(FFFE,E000)`.
    pub const ITEM: Tag = Tag(0xFFFE, 0xE000);
    /// Item-delimiter sentinel tag: `(FFFE,E00D)`.
    pub const ITEM_DELIMITER: Tag = Tag(0xFFFE, 0xE00D);
    /// Sequence-delimiter sentinel tag: `(FFFE,E0DD)`.
    pub const SEQUENCE_DELIMITER: Tag = Tag(0xFFFE, 0xE0DD);
    /// The standard Pixel Data tag: `(7FE0,0010)`.
    pub const PIXEL_DATA: Tag = Tag(0x7FE0, 0x0010);

    /// Retrieve the group portion of the tag.
    #[inline]
    pub fn group(self) -> u16 {
        self.0
    }

    /// Retrieve the element portion of the tag.
    #[inline]
    pub fn element(self) -> u16 {
        self.1
    }

    /// Build a tag from its 32-bit combined representation, as produced by
    /// `(group << 16) | element`.
    #[inline]
    pub fn from_u32(value: u32) -> Tag {
        Tag((value >> 16) as u16, value as u16)
    }

    /// Combine the tag into its 32-bit representation.
    #[inline]
    pub fn to_u32(self) -> u32 {
        ((self.0 as u32) << 16) | self.1 as u32
    }
}

impl From<(u16, u16)> for Tag {
    fn from(value: (u16, u16)) -> Self {
        Tag(value.0, value.1)
    }
}

impl PartialEq<(u16, u16)> for Tag {
    fn eq(&self, other: &(u16, u16)) -> bool {
        self.0 == other.0 && self.1 == other.1
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:04X},{:04X})", self.0, self.1)
    }
}

/// The DICOM value representation, as a 2-character code.
///
/// This is the closed set used by the element stream parser; VRs outside
/// this set never appear on the wire that this crate is asked to decode.
/// `UN` ("unknown") is the default when a tag is absent from the data
/// dictionary.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[allow(missing_docs)]
pub enum VR {
    AE,
    AS,
    AT,
    CS,
    DA,
    DS,
    DT,
    FL,
    FD,
    IS,
    LO,
    LT,
    OB,
    OD,
    OF,
    OW,
    PN,
    SH,
    SL,
    SQ,
    SS,
    ST,
    TM,
    UI,
    UL,
    UN,
    US,
    UT,
}

impl VR {
    /// Parse a VR from its 2 ASCII bytes as found on the wire in explicit-VR
    /// encoding. Returns `None` for byte pairs outside the closed VR set
    /// (callers fall back to `VR::UN`, per the reader's source-VR rule).
    pub fn from_binary(bytes: [u8; 2]) -> Option<VR> {
        match &bytes {
            b"AE" => Some(VR::AE),
            b"AS" => Some(VR::AS),
            b"AT" => Some(VR::AT),
            b"CS" => Some(VR::CS),
            b"DA" => Some(VR::DA),
            b"DS" => Some(VR::DS),
            b"DT" => Some(VR::DT),
            b"FL" => Some(VR::FL),
            b"FD" => Some(VR::FD),
            b"IS" => Some(VR::IS),
            b"LO" => Some(VR::LO),
            b"LT" => Some(VR::LT),
            b"OB" => Some(VR::OB),
            b"OD" => Some(VR::OD),
            b"OF" => Some(VR::OF),
            b"OW" => Some(VR::OW),
            b"PN" => Some(VR::PN),
            b"SH" => Some(VR::SH),
            b"SL" => Some(VR::SL),
            b"SQ" => Some(VR::SQ),
            b"SS" => Some(VR::SS),
            b"ST" => Some(VR::ST),
            b"TM" => Some(VR::TM),
            b"UI" => Some(VR::UI),
            b"UL" => Some(VR::UL),
            b"UN" => Some(VR::UN),
            b"US" => Some(VR::US),
            b"UT" => Some(VR::UT),
            _ => None,
        }
    }

    /// The 2-character ASCII representation of this VR.
    pub fn to_bytes(self) -> [u8; 2] {
        let s: &str = self.into();
        let b = s.as_bytes();
        [b[0], b[1]]
    }

    /// Whether, in explicit-VR encoding, this VR's length field is a
    /// 2-reserved-bytes-then-u32 (as opposed to a plain u16).
    pub fn has_explicit_long_length(self) -> bool {
        matches!(self, VR::OB | VR::OW | VR::SQ | VR::UN | VR::UT)
    }

    /// Whether this VR is a character-string VR eligible for padding
    /// strip and, if the dictionary VM allows, backslash-delimited
    /// multi-value splitting.
    pub fn is_character_string(self) -> bool {
        matches!(
            self,
            VR::AE
                | VR::AS
                | VR::CS
                | VR::DA
                | VR::DS
                | VR::DT
                | VR::IS
                | VR::LO
                | VR::LT
                | VR::PN
                | VR::SH
                | VR::ST
                | VR::TM
                | VR::UI
                | VR::UT
        )
    }

    /// Whether this VR is always a scalar string, never split on
    /// backslash even though it is a character-string VR.
    pub fn forbids_vm_split(self) -> bool {
        matches!(self, VR::LT | VR::ST | VR::UT)
    }

    /// Whether this VR's value is eligible for the single-byte pad strip
    /// (`0x00` or `0x20`) described in the element reader algorithm.
    pub fn is_pad_eligible(self) -> bool {
        matches!(
            self,
            VR::UI
                | VR::OB
                | VR::CS
                | VR::DS
                | VR::IS
                | VR::AE
                | VR::AS
                | VR::DA
                | VR::DT
                | VR::LO
                | VR::LT
                | VR::OD
                | VR::OF
                | VR::OW
                | VR::PN
                | VR::SH
                | VR::ST
                | VR::TM
                | VR::UT
        )
    }
}

impl FromStr for VR {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 2 {
            return Err(());
        }
        let bytes = s.as_bytes();
        VR::from_binary([bytes[0], bytes[1]]).ok_or(())
    }
}

impl From<VR> for &'static str {
    fn from(vr: VR) -> &'static str {
        match vr {
            VR::AE => "AE",
            VR::AS => "AS",
            VR::AT => "AT",
            VR::CS => "CS",
            VR::DA => "DA",
            VR::DS => "DS",
            VR::DT => "DT",
            VR::FL => "FL",
            VR::FD => "FD",
            VR::IS => "IS",
            VR::LO => "LO",
            VR::LT => "LT",
            VR::OB => "OB",
            VR::OD => "OD",
            VR::OF => "OF",
            VR::OW => "OW",
            VR::PN => "PN",
            VR::SH => "SH",
            VR::SL => "SL",
            VR::SQ => "SQ",
            VR::SS => "SS",
            VR::ST => "ST",
            VR::TM => "TM",
            VR::UI => "UI",
            VR::UL => "UL",
            VR::UN => "UN",
            VR::US => "US",
            VR::UT => "UT",
        }
    }
}

impl fmt::Display for VR {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s: &str = (*self).into();
        f.write_str(s)
    }
}

/// The wire encoding a transfer syntax implies: whether VRs are implicit
/// (absent from the stream, resolved via the data dictionary) and
/// whether multi-byte primitives are little-endian. Derived from a
/// transfer-syntax UID via the transfer-syntax registry, or guessed by
/// the element reader's heuristic when no transfer syntax is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Encoding {
    /// Whether the VR is implicit (absent from the stream).
    pub implicit_vr: bool,
    /// Whether multi-byte primitives are little-endian.
    pub little_endian: bool,
}

impl Encoding {
    /// The default encoding assumed before any transfer syntax has been
    /// negotiated: Explicit VR Little Endian.
    pub const DEFAULT: Encoding = Encoding {
        implicit_vr: false,
        little_endian: true,
    };
}

impl Default for Encoding {
    fn default() -> Self {
        Encoding::DEFAULT
    }
}

/// A data element's value length. `0xFFFF_FFFF` is the reserved sentinel
/// for "undefined length," signaling delimiter-terminated content (a
/// sequence or an encapsulated-pixel-data item run) rather than a fixed
/// byte count.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub struct Length(pub u32);

impl Length {
    /// The reserved sentinel value signaling undefined length.
    pub const UNDEFINED: Length = Length(0xFFFF_FFFF);

    /// Whether this length is the undefined-length sentinel.
    #[inline]
    pub fn is_undefined(self) -> bool {
        self == Length::UNDEFINED
    }

    /// Whether this length is an ordinary, defined byte count.
    #[inline]
    pub fn is_defined(self) -> bool {
        !self.is_undefined()
    }

    /// Retrieve the defined length as `Some(n)`, or `None` if undefined.
    #[inline]
    pub fn get(self) -> Option<u32> {
        if self.is_undefined() {
            None
        } else {
            Some(self.0)
        }
    }
}

impl From<u32> for Length {
    fn from(value: u32) -> Self {
        Length(value)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_undefined() {
            f.write_str("undefined")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Common behavior of anything carrying a DICOM header: a tag and a
/// length. Shared by data elements, sequence items, and the item/sequence
/// delimiters, so that delimiter recognition reads the same regardless of
/// which concrete header type is at hand.
pub trait Header {
    /// The element's tag.
    fn tag(&self) -> Tag;

    /// The value's length, as specified by the header. May be undefined,
    /// which is the case for sequences and encapsulated pixel data.
    fn len(&self) -> Length;

    /// Whether the length is zero (has no meaning for undefined-length
    /// headers, which always report `false`).
    fn is_empty(&self) -> bool {
        self.len().get() == Some(0)
    }

    /// Whether this is an item-start header: tag `(FFFE,E000)`.
    fn is_item(&self) -> bool {
        self.tag() == Tag::ITEM
    }

    /// Whether this is an item-delimiter header: tag `(FFFE,E00D)`.
    fn is_item_delimiter(&self) -> bool {
        self.tag() == Tag::ITEM_DELIMITER
    }

    /// Whether this is a sequence-delimiter header: tag `(FFFE,E0DD)`.
    fn is_sequence_delimiter(&self) -> bool {
        self.tag() == Tag::SEQUENCE_DELIMITER
    }
}

/// The header of a single data element: tag, reported VR, and length.
///
/// The reported VR is the *dictionary* VR (unless the dictionary has no
/// entry, in which case it is the source VR read from the stream) per the
/// VR-governance rule in the element reader algorithm; the *source* VR is
/// tracked separately only long enough to decide the length-field width
/// and is not retained on this type.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DataElementHeader {
    /// The element's tag.
    pub tag: Tag,
    /// The VR reported to consumers (dictionary VR, or source VR if the
    /// tag is unknown to the dictionary).
    pub vr: VR,
    /// The value's length.
    pub len: Length,
}

impl DataElementHeader {
    /// Build a new data element header.
    pub fn new(tag: Tag, vr: VR, len: Length) -> Self {
        DataElementHeader { tag, vr, len }
    }
}

impl Header for DataElementHeader {
    fn tag(&self) -> Tag {
        self.tag
    }

    fn len(&self) -> Length {
        self.len
    }
}

/// The header of a sequence item, or one of the two delimiters
/// (item-delimiter, sequence-delimiter) that terminate undefined-length
/// constructs. All three share the same wire shape (tag + 4-byte length)
/// so they are modeled as one type distinguished by `tag()`.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SequenceItemHeader {
    /// The header's tag: `(FFFE,E000)` for an item, `(FFFE,E00D)` for an
    /// item delimiter, or `(FFFE,E0DD)` for a sequence delimiter.
    pub tag: Tag,
    /// The item's length (undefined length is legal here; the two
    /// delimiter tags always carry length zero).
    pub len: Length,
}

impl SequenceItemHeader {
    /// Build a sequence item header, validating that the tag is one of
    /// the three recognized sentinel tags and that the delimiter tags
    /// carry a zero length, as the undefined-length decoding algorithm
    /// requires.
    pub fn new<T: Into<Tag>>(tag: T, len: Length) -> Result<Self, SequenceItemHeaderError> {
        let tag = tag.into();
        match tag {
            Tag::ITEM => Ok(SequenceItemHeader { tag, len }),
            Tag::ITEM_DELIMITER | Tag::SEQUENCE_DELIMITER => {
                if len.get() == Some(0) {
                    Ok(SequenceItemHeader { tag, len })
                } else {
                    Err(SequenceItemHeaderError::NonZeroDelimiterLength { tag, len })
                }
            }
            tag => Err(SequenceItemHeaderError::UnexpectedTag { tag }),
        }
    }
}

impl Header for SequenceItemHeader {
    fn tag(&self) -> Tag {
        self.tag
    }

    fn len(&self) -> Length {
        self.len
    }
}

/// Errors constructing a [`SequenceItemHeader`] from a raw tag and length.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SequenceItemHeaderError {
    /// The tag was not one of the three recognized sentinels.
    UnexpectedTag {
        /// The unrecognized tag.
        tag: Tag,
    },
    /// A delimiter tag (item- or sequence-delimiter) carried a nonzero
    /// length.
    NonZeroDelimiterLength {
        /// The delimiter tag.
        tag: Tag,
        /// The (incorrectly) nonzero length that was read.
        len: Length,
    },
}

impl fmt::Display for SequenceItemHeaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequenceItemHeaderError::UnexpectedTag { tag } => {
                write!(f, "unexpected tag {} where an item or delimiter was expected", tag)
            }
            SequenceItemHeaderError::NonZeroDelimiterLength { tag, len } => {
                write!(f, "delimiter {} carries nonzero length {}", tag, len)
            }
        }
    }
}

impl std::error::Error for SequenceItemHeaderError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_display_is_hex_pair() {
        assert_eq!(Tag(0x0028, 0x0004).to_string(), "(0028,0004)");
        assert_eq!(Tag(0xFFFE, 0xE000).to_string(), "(FFFE,E000)");
    }

    #[test]
    fn tag_roundtrips_through_u32() {
        let tag = Tag(0x7FE0, 0x0010);
        assert_eq!(Tag::from_u32(tag.to_u32()), tag);
        assert_eq!(tag.to_u32(), 0x7FE0_0010);
    }

    #[test]
    fn vr_from_binary_known_and_unknown() {
        assert_eq!(VR::from_binary(*b"CS"), Some(VR::CS));
        assert_eq!(VR::from_binary(*b"SQ"), Some(VR::SQ));
        assert_eq!(VR::from_binary(*b"ZZ"), None);
    }

    #[test]
    fn vr_explicit_long_length_set() {
        assert!(VR::OB.has_explicit_long_length());
        assert!(VR::SQ.has_explicit_long_length());
        assert!(VR::UN.has_explicit_long_length());
        assert!(!VR::CS.has_explicit_long_length());
        assert!(!VR::US.has_explicit_long_length());
    }

    #[test]
    fn length_undefined_sentinel() {
        assert!(Length::UNDEFINED.is_undefined());
        assert_eq!(Length::UNDEFINED.get(), None);
        assert_eq!(Length(12).get(), Some(12));
    }

    #[test]
    fn header_trait_recognizes_delimiters() {
        let item = SequenceItemHeader::new(Tag::ITEM, Length(12)).unwrap();
        assert!(item.is_item());
        assert!(!item.is_item_delimiter());

        let delim = SequenceItemHeader::new(Tag::SEQUENCE_DELIMITER, Length(0)).unwrap();
        assert!(delim.is_sequence_delimiter());
    }

    #[test]
    fn sequence_item_header_rejects_nonzero_delimiter_length() {
        let err = SequenceItemHeader::new(Tag::ITEM_DELIMITER, Length(4)).unwrap_err();
        assert!(matches!(
            err,
            SequenceItemHeaderError::NonZeroDelimiterLength { .. }
        ));
    }

    #[test]
    fn sequence_item_header_rejects_unexpected_tag() {
        let err = SequenceItemHeader::new(Tag(0x0008, 0x0000), Length(4)).unwrap_err();
        assert!(matches!(err, SequenceItemHeaderError::UnexpectedTag { .. }));
    }
}
