#![crate_type = "lib"]
#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
#![recursion_limit = "60"]

//! Core types for DICOM Part 10 element stream parsing: tags, VRs,
//! lengths, headers, decoded values, the data dictionary trait, and the
//! closed error taxonomy shared by every crate in this workspace.

pub mod dictionary;
pub mod error;
pub mod header;
pub mod value;

pub use dictionary::{DataDictionary, DictionaryEntry};
pub use error::{Error, Result};
pub use header::{DataElementHeader, Encoding, Header, Length, SequenceItemHeader, Tag, VR};
pub use value::{Body, DataSet, Element, Item, ItemBody, Value, ValueType, C};
