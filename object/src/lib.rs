#![deny(trivial_numeric_casts, unsafe_code, unstable_features)]
#![warn(
    missing_debug_implementations,
    missing_docs,
    unused_qualifications,
    unused_import_braces
)]
//! A high-level API for reading DICOM Part 10 objects.
//!
//! Drives the lower-level byte and element readers from `dicom-parser`
//! through a whole file: preamble, file meta information, transfer
//! syntax negotiation, and the payload data set, exposing the result as
//! a single [`DicomFile`].

pub mod config;
pub mod file;

pub use config::ParseConfig;
pub use file::DicomFile;

pub use dicom_core::error::{Error, Result};
