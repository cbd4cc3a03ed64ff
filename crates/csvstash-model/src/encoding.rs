//! Candidate text encodings for CSV normalization.

use std::fmt;

/// A text encoding the normalizer knows how to parse.
///
/// Detection tries the variants in the order of [`SourceEncoding::CANDIDATES`]
/// and commits to the first one that parses the whole file. UTF-8 is the
/// normalization target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceEncoding {
    /// UTF-8 (target encoding).
    Utf8,
    /// Korean legacy code page 949 (superset of EUC-KR).
    Cp949,
    /// UTF-16, endianness taken from the BOM (little-endian without one).
    Utf16,
}

impl SourceEncoding {
    /// Detection priority: target first, then the legacy encodings.
    pub const CANDIDATES: [SourceEncoding; 3] = [
        SourceEncoding::Utf8,
        SourceEncoding::Cp949,
        SourceEncoding::Utf16,
    ];

    /// The encoding every normalized file ends up in.
    pub const TARGET: SourceEncoding = SourceEncoding::Utf8;

    /// Returns the canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceEncoding::Utf8 => "utf-8",
            SourceEncoding::Cp949 => "cp949",
            SourceEncoding::Utf16 => "utf-16",
        }
    }

    /// Returns true for the normalization target.
    pub fn is_target(&self) -> bool {
        *self == Self::TARGET
    }
}

impl fmt::Display for SourceEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
