#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    unused_qualifications,
    unused_import_braces
)]
//! Component D: the character-set registry.
//!
//! Maps the value of the `SpecificCharacterSet` attribute to a [`TextCodec`],
//! which re-encodes the character-string VRs to UTF-8 before they reach a
//! consumer. See [`text`] for the supported identifiers.

pub mod text;

pub use text::{SpecificCharacterSet, TextCodec};
