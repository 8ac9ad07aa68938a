//! The closed error taxonomy shared by every crate in this workspace.
//!
//! A single `Error` enum is used end to end instead of one error type per
//! crate glued together with `From` impls: callers at the edge of the
//! library match one exhaustive set of kinds regardless of which layer
//! (byte reader, element reader, orchestrator) raised them.

use crate::header::Tag;
use snafu::{Backtrace, Snafu};

/// Result type alias used throughout this workspace.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// The error taxonomy for DICOM Part 10 element stream parsing.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Preamble is missing, the stream is too short to contain the magic
    /// code, or the magic bytes are not `DICM` on a path that required it.
    #[snafu(display("not a DICOM stream: {message}"))]
    NotADicom {
        /// Human-readable description of what was expected.
        message: String,
        /// Backtrace to the call site.
        backtrace: Backtrace,
    },

    /// A whole-file level invariant was broken: missing or corrupt
    /// meta-length element, meta-length value not a u32, malformed
    /// transfer-syntax UID.
    #[snafu(display("corrupt DICOM file at offset {offset}: {message}"))]
    CorruptDicom {
        /// Byte offset at which the inconsistency was detected.
        offset: u64,
        /// Human-readable description.
        message: String,
        /// Backtrace to the call site.
        backtrace: Backtrace,
    },

    /// Within a single element: tag/VR/length truncated, or value length
    /// exceeds remaining bytes in strict mode.
    #[snafu(display("corrupt element at offset {offset} (tag {tag:?}): {message}"))]
    CorruptElement {
        /// Byte offset of the element header.
        offset: u64,
        /// Tag of the offending element, when known.
        tag: Option<Tag>,
        /// Human-readable description.
        message: String,
        /// Backtrace to the call site.
        backtrace: Backtrace,
    },

    /// Lower-level byte reader failure encountered while decoding a
    /// delimiter or sequence/item boundary: insufficient bytes, or
    /// unexpected EOF during a delimiter scan.
    #[snafu(display("corrupt element stream at offset {offset}: {message}"))]
    CorruptElementStream {
        /// Byte offset at which the stream became unreadable.
        offset: u64,
        /// Human-readable description.
        message: String,
        /// Backtrace to the call site.
        backtrace: Backtrace,
    },

    /// A read request asked for more bytes than remain in the source.
    /// Absorbed into `CorruptElement` at the element reader, or in
    /// lenient mode, downgraded by the caller into a truncation.
    #[snafu(display("insufficient bytes at offset {offset}: needed {needed}, had {available}"))]
    InsufficientBytes {
        /// Byte offset of the read attempt.
        offset: u64,
        /// Bytes requested.
        needed: usize,
        /// Bytes actually available.
        available: usize,
        /// Backtrace to the call site.
        backtrace: Backtrace,
    },

    /// A valid file whose declared transfer-syntax UID is not in the
    /// registry, or which uses a feature beyond this crate's scope.
    #[snafu(display("unsupported DICOM transfer syntax {uid:?}: {message}"))]
    UnsupportedDicom {
        /// The unsupported transfer-syntax UID, if one was found.
        uid: Option<String>,
        /// Human-readable description.
        message: String,
        /// Backtrace to the call site.
        backtrace: Backtrace,
    },
}

impl Error {
    /// Elevate a per-element or per-stream error to a whole-file
    /// `CorruptDicom`, enriching it with the file-level offset.
    ///
    /// Implements the propagation policy of the error taxonomy: the
    /// orchestrator elevates `CorruptElement`/`CorruptElementStream` to
    /// `CorruptDicom`; `UnsupportedDicom` and `NotADicom` pass through
    /// unchanged.
    pub fn elevate(self, offset: u64) -> Error {
        match self {
            Error::CorruptElement { message, tag, .. } => {
                let message = match tag {
                    Some(tag) => format!("element {} at {}: {}", tag, offset, message),
                    None => message,
                };
                CorruptDicomSnafu { offset, message }.build()
            }
            Error::CorruptElementStream { message, .. } => {
                CorruptDicomSnafu { offset, message }.build()
            }
            other => other,
        }
    }
}
