#![deny(trivial_casts, trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
//! The middle-level element stream parser: components A (byte reader)
//! and E (element reader) of the DICOM Part 10 decoder.
//!
//! This crate knows how to decode one data element at a time — tag, VR,
//! length, value, including nested sequences and items — but nothing
//! about whole-file structure (preamble, meta group, transfer-syntax
//! negotiation). That orchestration lives in `dicom-object`, which
//! drives an [`ElementReader`] over a [`ByteReader`].

pub mod element;
pub mod reader;

pub use element::ElementReader;
pub use reader::{ByteOrder, ByteReader};
