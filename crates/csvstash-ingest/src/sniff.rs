//! Byte-level encoding sniffing.
//!
//! Looks at a bounded prefix of a file and guesses the encoding used to read
//! and write text next to it. Independent of the content-level detection in
//! [`crate::detect`]; the two may report different labels for the same
//! bytes (`ascii` versus `utf-8`, `EUC-KR` versus `cp949`).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use encoding_rs::{Decoder, EUC_KR, Encoding, UTF_8, UTF_16BE, UTF_16LE};
use tracing::debug;

use crate::error::{IngestError, Result};

/// Maximum number of bytes inspected.
pub const SNIFF_LIMIT: usize = 10_000;

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Encoding reported by the sniffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SniffedEncoding {
    /// Only 7-bit bytes seen; handled as UTF-8.
    Ascii,
    Utf8,
    /// UTF-8 with a byte order mark.
    Utf8Sig,
    Utf16Le,
    Utf16Be,
    EucKr,
}

impl SniffedEncoding {
    /// Label in the form the operator sees it.
    pub fn label(&self) -> &'static str {
        match self {
            SniffedEncoding::Ascii => "ascii",
            SniffedEncoding::Utf8 => "utf-8",
            SniffedEncoding::Utf8Sig => "UTF-8-SIG",
            SniffedEncoding::Utf16Le => "UTF-16LE",
            SniffedEncoding::Utf16Be => "UTF-16BE",
            SniffedEncoding::EucKr => "EUC-KR",
        }
    }

    /// The `encoding_rs` encoding used for I/O.
    pub fn encoding(&self) -> &'static Encoding {
        match self {
            SniffedEncoding::Ascii | SniffedEncoding::Utf8 | SniffedEncoding::Utf8Sig => UTF_8,
            SniffedEncoding::Utf16Le => UTF_16LE,
            SniffedEncoding::Utf16Be => UTF_16BE,
            SniffedEncoding::EucKr => EUC_KR,
        }
    }

    pub fn has_bom(&self) -> bool {
        matches!(
            self,
            SniffedEncoding::Utf8Sig | SniffedEncoding::Utf16Le | SniffedEncoding::Utf16Be
        )
    }

    /// Streaming decoder that drops a leading BOM.
    pub fn new_decoder(&self) -> Decoder {
        self.encoding().new_decoder_with_bom_removal()
    }

    /// Encode `text`, writing a BOM when the sniffed file had one.
    ///
    /// Returns `None` if `text` has characters the encoding cannot represent.
    pub fn encode(&self, text: &str) -> Option<Vec<u8>> {
        match self {
            SniffedEncoding::Utf16Le => Some(encode_utf16(text, u16::to_le_bytes)),
            SniffedEncoding::Utf16Be => Some(encode_utf16(text, u16::to_be_bytes)),
            _ => {
                let mut out = Vec::with_capacity(text.len() + UTF8_BOM.len());
                if self.has_bom() {
                    out.extend_from_slice(&UTF8_BOM);
                }
                let (bytes, _, had_unmappable) = self.encoding().encode(text);
                if had_unmappable {
                    return None;
                }
                out.extend_from_slice(&bytes);
                Some(out)
            }
        }
    }
}

impl std::fmt::Display for SniffedEncoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// encoding_rs only decodes UTF-16; encoding goes through the code units.
fn encode_utf16(text: &str, to_bytes: fn(u16) -> [u8; 2]) -> Vec<u8> {
    let mut out = Vec::with_capacity(2 + text.len() * 2);
    out.extend_from_slice(&to_bytes(0xFEFF));
    for unit in text.encode_utf16() {
        out.extend_from_slice(&to_bytes(unit));
    }
    out
}

/// Sniff the encoding of the file at `path` from its first [`SNIFF_LIMIT`] bytes.
///
/// Returns `Ok(None)` when the encoding cannot be determined (including an
/// empty file).
pub fn sniff(path: &Path) -> Result<Option<SniffedEncoding>> {
    let file = File::open(path).map_err(|e| IngestError::read(path, e))?;
    let size = file
        .metadata()
        .map_err(|e| IngestError::read(path, e))?
        .len();

    let mut sample = Vec::with_capacity(size.min(SNIFF_LIMIT as u64) as usize);
    file.take(SNIFF_LIMIT as u64)
        .read_to_end(&mut sample)
        .map_err(|e| IngestError::read(path, e))?;

    let truncated = size > sample.len() as u64;
    let sniffed = sniff_sample(&sample, truncated);
    debug!(
        path = %path.display(),
        sampled = sample.len(),
        encoding = sniffed.map_or("unknown", |s| s.label()),
        "sniffed byte encoding"
    );
    Ok(sniffed)
}

/// Sniff an in-memory buffer, looking at most at [`SNIFF_LIMIT`] bytes.
pub fn sniff_bytes(bytes: &[u8]) -> Option<SniffedEncoding> {
    let end = bytes.len().min(SNIFF_LIMIT);
    sniff_sample(&bytes[..end], bytes.len() > SNIFF_LIMIT)
}

fn sniff_sample(sample: &[u8], truncated: bool) -> Option<SniffedEncoding> {
    if sample.is_empty() {
        return None;
    }

    if let Some((encoding, _)) = Encoding::for_bom(sample) {
        return Some(if encoding == UTF_8 {
            SniffedEncoding::Utf8Sig
        } else if encoding == UTF_16LE {
            SniffedEncoding::Utf16Le
        } else {
            SniffedEncoding::Utf16Be
        });
    }

    if sample.is_ascii() {
        return Some(SniffedEncoding::Ascii);
    }
    if is_utf8(sample, truncated) {
        return Some(SniffedEncoding::Utf8);
    }
    if is_euc_kr(sample, truncated) {
        return Some(SniffedEncoding::EucKr);
    }
    None
}

/// A multi-byte sequence cut by the sample boundary still counts as UTF-8.
fn is_utf8(sample: &[u8], truncated: bool) -> bool {
    match std::str::from_utf8(sample) {
        Ok(_) => true,
        Err(e) => truncated && e.error_len().is_none(),
    }
}

fn is_euc_kr(sample: &[u8], truncated: bool) -> bool {
    let decodes = |bytes: &[u8]| {
        EUC_KR
            .decode_without_bom_handling_and_without_replacement(bytes)
            .is_some()
    };
    decodes(sample) || (truncated && decodes(&sample[..sample.len() - 1]))
}
