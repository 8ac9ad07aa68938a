//! The value layer: typed representations of a data element's decoded
//! content, plus the `Element`/`Item`/`DataSet` tree that an orchestrator
//! assembles from them.
//!
//! Values are decoded eagerly at element-construction time into the
//! tagged variant family [`Value`], rather than kept as untyped bytes with
//! a VR tag consumers switch on at read time. There is no back-reference
//! from an `Element` to the reader or character set that produced it: the
//! decode context (endianness, character set) is applied once, up front,
//! and the result is owned outright.

use std::collections::BTreeMap;
use std::fmt;

use smallvec::SmallVec;

use crate::header::{DataElementHeader, Header, Length, Tag, VR};

/// A small-multiplicity collection, inlined up to 2 elements before
/// spilling to the heap — most DICOM value multiplicities are 1 or 2.
pub type C<T> = SmallVec<[T; 2]>;

/// A decoded data element value, tagged by its Rust representation
/// rather than requiring a runtime VR switch at the point of use.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Opaque bytes: VRs `{OB, OD, OF, OW, UN, UT}` and any value kept
    /// unparsed (e.g. a truncated read).
    Bytes(Vec<u8>),
    /// A single character string.
    Str(String),
    /// A backslash-delimited list of character strings.
    Strs(C<String>),
    /// `FL` values.
    F32(C<f32>),
    /// `FD` values.
    F64(C<f64>),
    /// `SS` values.
    I16(C<i16>),
    /// `SL` values.
    I32(C<i32>),
    /// `US` values.
    U16(C<u16>),
    /// `UL` values.
    U32(C<u32>),
    /// `AT` values: tag references.
    Tags(C<Tag>),
}

/// Discriminant of [`Value`], used for diagnostics and cast-mismatch
/// reporting without cloning the value itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum ValueType {
    Bytes,
    Str,
    Strs,
    F32,
    F64,
    I16,
    I32,
    U16,
    U32,
    Tags,
}

impl Value {
    /// The variant discriminant of this value.
    pub fn value_type(&self) -> ValueType {
        match self {
            Value::Bytes(_) => ValueType::Bytes,
            Value::Str(_) => ValueType::Str,
            Value::Strs(_) => ValueType::Strs,
            Value::F32(_) => ValueType::F32,
            Value::F64(_) => ValueType::F64,
            Value::I16(_) => ValueType::I16,
            Value::I32(_) => ValueType::I32,
            Value::U16(_) => ValueType::U16,
            Value::U32(_) => ValueType::U32,
            Value::Tags(_) => ValueType::Tags,
        }
    }

    /// The raw, pre-decoded byte count this value occupied on the wire,
    /// used by `describe()` to decide whether to render the value inline.
    pub fn byte_len(&self) -> usize {
        match self {
            Value::Bytes(b) => b.len(),
            Value::Str(s) => s.len(),
            Value::Strs(v) => v.iter().map(|s| s.len() + 1).sum(),
            Value::F32(v) => v.len() * 4,
            Value::F64(v) => v.len() * 8,
            Value::I16(v) => v.len() * 2,
            Value::I32(v) => v.len() * 4,
            Value::U16(v) => v.len() * 2,
            Value::U32(v) => v.len() * 4,
            Value::Tags(v) => v.len() * 4,
        }
    }

    /// View this value as a single string, if it holds exactly one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s.as_str()),
            Value::Strs(v) if v.len() == 1 => Some(v[0].as_str()),
            _ => None,
        }
    }

    /// View this value as a list of strings.
    pub fn as_strs(&self) -> Option<Vec<&str>> {
        match self {
            Value::Str(s) => Some(vec![s.as_str()]),
            Value::Strs(v) => Some(v.iter().map(|s| s.as_str()).collect()),
            _ => None,
        }
    }

    /// View this value as raw bytes, regardless of variant (every
    /// variant can be re-rendered as bytes for diagnostics; prefer the
    /// typed accessors for anything but display).
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// View this value as `f32`s.
    pub fn as_f32s(&self) -> Option<&[f32]> {
        match self {
            Value::F32(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// View this value as `f64`s.
    pub fn as_f64s(&self) -> Option<&[f64]> {
        match self {
            Value::F64(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// View this value as `i16`s.
    pub fn as_i16s(&self) -> Option<&[i16]> {
        match self {
            Value::I16(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// View this value as `i32`s.
    pub fn as_i32s(&self) -> Option<&[i32]> {
        match self {
            Value::I32(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// View this value as `u16`s.
    pub fn as_u16s(&self) -> Option<&[u16]> {
        match self {
            Value::U16(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// View this value as `u32`s.
    pub fn as_u32s(&self) -> Option<&[u32]> {
        match self {
            Value::U32(v) => Some(v.as_slice()),
            _ => None,
        }
    }

    /// View this value as tag references.
    pub fn as_tags(&self) -> Option<&[Tag]> {
        match self {
            Value::Tags(v) => Some(v.as_slice()),
            _ => None,
        }
    }
}

/// The body of a sequence item: either a nested, fully-parsed dataset (the
/// item's parent VR is `SQ`), or an opaque byte block preserved verbatim
/// (the item's parent VR is something else, as with encapsulated pixel
/// data fragments).
///
/// Modeled as a two-variant enum rather than a struct with two optional
/// fields (a literal reading of "elements: mapping ..., unparsed: optional
/// byte block") because exactly one of the two is ever meaningful for a
/// given item; see DESIGN.md for this decision.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemBody {
    /// A nested dataset, present when the item's parent VR is `SQ`.
    Elements(DataSet),
    /// An opaque byte block, present when the item's parent VR is not
    /// `SQ` (encapsulated pixel-data fragments and the like).
    Unparsed(Vec<u8>),
}

/// A single item within a sequence or an undefined-length encapsulated
/// element.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// The item's length as declared on the wire (may be undefined, in
    /// which case the item was itself delimiter-terminated).
    pub len: Length,
    /// The item's content.
    pub body: ItemBody,
}

impl Item {
    /// Build an item holding a nested, parsed dataset.
    pub fn new_dataset(len: Length, dataset: DataSet) -> Self {
        Item {
            len,
            body: ItemBody::Elements(dataset),
        }
    }

    /// Build an item holding an opaque byte block.
    pub fn new_unparsed(len: Length, bytes: Vec<u8>) -> Self {
        Item {
            len,
            body: ItemBody::Unparsed(bytes),
        }
    }

    /// The item's nested dataset, if parsed.
    pub fn elements(&self) -> Option<&DataSet> {
        match &self.body {
            ItemBody::Elements(ds) => Some(ds),
            ItemBody::Unparsed(_) => None,
        }
    }

    /// The item's opaque bytes, if unparsed.
    pub fn unparsed(&self) -> Option<&[u8]> {
        match &self.body {
            ItemBody::Unparsed(b) => Some(b.as_slice()),
            ItemBody::Elements(_) => None,
        }
    }
}

/// The body of a data element: either a decoded primitive value, or a
/// sequence of items (present whenever the element's length was
/// undefined, or whenever the reported VR is `SQ`).
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// A decoded primitive value.
    Primitive(Value),
    /// An ordered list of items.
    Items(C<Item>),
}

/// A single decoded data element, owning its header and its fully
/// decoded body.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    header: DataElementHeader,
    body: Body,
}

impl Element {
    /// Build a new element from its header and body.
    pub fn new(header: DataElementHeader, body: Body) -> Self {
        Element { header, body }
    }

    /// The element's tag.
    pub fn tag(&self) -> Tag {
        self.header.tag
    }

    /// The element's reported VR (dictionary VR, unless the tag is
    /// unknown to the dictionary, in which case the source VR).
    pub fn vr(&self) -> VR {
        self.header.vr
    }

    /// The element's value length as declared on the wire.
    pub fn value_length(&self) -> Length {
        self.header.len
    }

    /// The element's header.
    pub fn header(&self) -> &DataElementHeader {
        &self.header
    }

    /// The element's decoded value, if this is not a sequence.
    pub fn value(&self) -> Option<&Value> {
        match &self.body {
            Body::Primitive(v) => Some(v),
            Body::Items(_) => None,
        }
    }

    /// The element's items, if this is a sequence or undefined-length
    /// encapsulated element.
    pub fn items(&self) -> Option<&[Item]> {
        match &self.body {
            Body::Items(items) => Some(items.as_slice()),
            Body::Primitive(_) => None,
        }
    }

    /// Raw bytes backing this element's value, when available: any
    /// primitive value can be re-rendered as bytes for diagnostics.
    pub fn raw_bytes(&self) -> Option<&[u8]> {
        match &self.body {
            Body::Primitive(Value::Bytes(b)) => Some(b.as_slice()),
            _ => None,
        }
    }

    /// Produce human-readable diagnostic lines for this element,
    /// indented by `indent` levels, recursing into nested items.
    pub fn describe(&self, indent: usize) -> String {
        let pad = "  ".repeat(indent);
        let name_line = format!("{}{} {}", pad, self.tag(), self.vr());
        match &self.body {
            Body::Primitive(value) => {
                if value.byte_len() <= 256 {
                    format!("{} {}", name_line, describe_value(value))
                } else {
                    format!("{} <{} bytes>", name_line, value.byte_len())
                }
            }
            Body::Items(items) => {
                let mut out = format!("{} ({} item(s))", name_line, items.len());
                for (i, item) in items.iter().enumerate() {
                    out.push('\n');
                    out.push_str(&"  ".repeat(indent + 1));
                    out.push_str(&format!("item #{}", i));
                    match &item.body {
                        ItemBody::Elements(ds) => {
                            for element in ds.elements() {
                                out.push('\n');
                                out.push_str(&element.describe(indent + 2));
                            }
                        }
                        ItemBody::Unparsed(bytes) => {
                            out.push_str(&format!(" <{} opaque bytes>", bytes.len()));
                        }
                    }
                }
                out
            }
        }
    }
}

fn describe_value(value: &Value) -> String {
    match value {
        Value::Bytes(b) => format!("<{} bytes>", b.len()),
        Value::Str(s) => s.clone(),
        Value::Strs(v) => v.join("\\"),
        Value::F32(v) => format!("{:?}", v.as_slice()),
        Value::F64(v) => format!("{:?}", v.as_slice()),
        Value::I16(v) => format!("{:?}", v.as_slice()),
        Value::I32(v) => format!("{:?}", v.as_slice()),
        Value::U16(v) => format!("{:?}", v.as_slice()),
        Value::U32(v) => format!("{:?}", v.as_slice()),
        Value::Tags(v) => v
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

/// A mapping from tag to element at one nesting level. Backed by a
/// `BTreeMap` so iteration is always tag-sorted without a separate sort
/// pass, matching the data model's "sortable by tag for display"
/// requirement.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct DataSet {
    map: BTreeMap<Tag, Element>,
}

impl DataSet {
    /// Build an empty data set.
    pub fn new() -> Self {
        DataSet {
            map: BTreeMap::new(),
        }
    }

    /// Insert an element, keyed by its own tag. Replaces any existing
    /// element with the same tag.
    pub fn insert(&mut self, element: Element) {
        self.map.insert(element.tag(), element);
    }

    /// Look up an element by tag.
    pub fn get(&self, tag: Tag) -> Option<&Element> {
        self.map.get(&tag)
    }

    /// Iterate over the elements, in tag order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.map.values()
    }

    /// The number of elements at this nesting level.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether this data set has no elements.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

impl fmt::Display for DataSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for element in self.elements() {
            writeln!(f, "{}", element.describe(0))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_as_str_from_scalar_and_list() {
        let scalar = Value::Str("MONOCHROME2".to_string());
        assert_eq!(scalar.as_str(), Some("MONOCHROME2"));

        let mut list = C::new();
        list.push("A".to_string());
        let single_item_list = Value::Strs(list);
        assert_eq!(single_item_list.as_str(), Some("A"));
    }

    #[test]
    fn value_as_strs_splits_list() {
        let mut list = C::new();
        list.push("A".to_string());
        list.push("B".to_string());
        let value = Value::Strs(list);
        assert_eq!(value.as_strs(), Some(vec!["A", "B"]));
    }

    #[test]
    fn dataset_iterates_in_tag_order() {
        let mut ds = DataSet::new();
        ds.insert(Element::new(
            DataElementHeader::new(Tag(0x0010, 0x0010), VR::PN, Length(4)),
            Body::Primitive(Value::Str("Doe".to_string())),
        ));
        ds.insert(Element::new(
            DataElementHeader::new(Tag(0x0008, 0x0005), VR::CS, Length(4)),
            Body::Primitive(Value::Str("ISO_IR 100".to_string())),
        ));
        let tags: Vec<_> = ds.elements().map(|e| e.tag()).collect();
        assert_eq!(tags, vec![Tag(0x0008, 0x0005), Tag(0x0010, 0x0010)]);
    }

    #[test]
    fn item_distinguishes_parsed_and_unparsed() {
        let parsed = Item::new_dataset(Length(0), DataSet::new());
        assert!(parsed.elements().is_some());
        assert!(parsed.unparsed().is_none());

        let unparsed = Item::new_unparsed(Length(4), vec![1, 2, 3, 4]);
        assert!(unparsed.elements().is_none());
        assert_eq!(unparsed.unparsed(), Some(&[1u8, 2, 3, 4][..]));
    }

    #[test]
    fn describe_truncates_large_values() {
        let element = Element::new(
            DataElementHeader::new(Tag(0x7FE0, 0x0010), VR::OW, Length(1000)),
            Body::Primitive(Value::Bytes(vec![0; 1000])),
        );
        let desc = element.describe(0);
        assert!(desc.contains("1000 bytes"));
    }
}
