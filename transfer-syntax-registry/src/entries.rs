//! The closed set of transfer syntaxes this crate understands.
//!
//! Each entry names a UID, a human-readable name, the wire [`Encoding`] it
//! implies, and whether its payload is encapsulated (pixel data kept
//! opaque rather than interpreted). Any UID outside this table is
//! `UnsupportedDicom` at the orchestrator.

use crate::{Encoding, TransferSyntax};

pub const IMPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax {
    uid: "1.2.840.10008.1.2",
    fallback_name: "Implicit VR Little Endian",
    encoding: Encoding {
        implicit_vr: true,
        little_endian: true,
    },
    encapsulated: false,
};

pub const EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax {
    uid: "1.2.840.10008.1.2.1",
    fallback_name: "Explicit VR Little Endian",
    encoding: Encoding {
        implicit_vr: false,
        little_endian: true,
    },
    encapsulated: false,
};

/// Deflated Explicit VR Little Endian. Decompression of the deflated body
/// is out of scope; the wire encoding rule for elements that follow
/// inflation is otherwise identical to plain Explicit VR Little Endian.
pub const DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN: TransferSyntax = TransferSyntax {
    uid: "1.2.840.10008.1.2.1.99",
    fallback_name: "Deflated Explicit VR Little Endian",
    encoding: Encoding {
        implicit_vr: false,
        little_endian: true,
    },
    encapsulated: false,
};

pub const EXPLICIT_VR_BIG_ENDIAN: TransferSyntax = TransferSyntax {
    uid: "1.2.840.10008.1.2.2",
    fallback_name: "Explicit VR Big Endian",
    encoding: Encoding {
        implicit_vr: false,
        little_endian: false,
    },
    encapsulated: false,
};

pub const JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION: TransferSyntax = TransferSyntax {
    uid: "1.2.840.10008.1.2.4.70",
    fallback_name: "JPEG Lossless, Non-Hierarchical, First-Order Prediction",
    encoding: Encoding {
        implicit_vr: false,
        little_endian: true,
    },
    encapsulated: true,
};

pub const JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY: TransferSyntax = TransferSyntax {
    uid: "1.2.840.10008.1.2.4.90",
    fallback_name: "JPEG 2000 Image Compression (Lossless Only)",
    encoding: Encoding {
        implicit_vr: false,
        little_endian: true,
    },
    encapsulated: true,
};

pub const JPEG_2000_IMAGE_COMPRESSION: TransferSyntax = TransferSyntax {
    uid: "1.2.840.10008.1.2.4.91",
    fallback_name: "JPEG 2000 Image Compression",
    encoding: Encoding {
        implicit_vr: false,
        little_endian: true,
    },
    encapsulated: true,
};

pub(crate) const ALL: &[TransferSyntax] = &[
    IMPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_LITTLE_ENDIAN,
    DEFLATED_EXPLICIT_VR_LITTLE_ENDIAN,
    EXPLICIT_VR_BIG_ENDIAN,
    JPEG_LOSSLESS_NON_HIERARCHICAL_FIRST_ORDER_PREDICTION,
    JPEG_2000_IMAGE_COMPRESSION_LOSSLESS_ONLY,
    JPEG_2000_IMAGE_COMPRESSION,
];
