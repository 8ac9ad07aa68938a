//! Explicit parse configuration.
//!
//! Some DICOM toolkits thread a handful of independent builder options
//! through an options struct, and elsewhere keep strict-mode recovery as
//! a process-wide global. Here the single knob that matters — whether an
//! overlong value truncates or aborts the parse — is carried as an
//! explicit struct passed at parse time, with no global fallback.

/// Configuration for a single parse attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// When `true`, an element whose declared value length overflows
    /// the remaining bytes aborts the whole parse with `CorruptElement`.
    /// When `false` (the default), the length is truncated to what
    /// remains and a diagnostic is emitted.
    pub strict_mode: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            strict_mode: false,
        }
    }
}

impl ParseConfig {
    /// Build the default, lenient configuration.
    pub fn new() -> Self {
        ParseConfig::default()
    }

    /// Build a configuration with strict-mode recovery enabled.
    pub fn strict() -> Self {
        ParseConfig {
            strict_mode: true,
        }
    }
}
