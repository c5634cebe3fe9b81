//! Text decoding with an ordered list of encoding fallbacks.
//!
//! Rosters exported from older spreadsheet tools are frequently Latin-1 or
//! Windows-1252 rather than UTF-8. Each encoding in the list is tried
//! strictly (no replacement characters) and the first success wins.

use encoding_rs::WINDOWS_1252;
use serde::{Deserialize, Serialize};
use std::fmt;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// A character encoding the loader knows how to try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextEncoding {
    /// Strict UTF-8. A leading byte-order mark is dropped.
    Utf8,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
    /// Windows code page 1252.
    Windows1252,
}

impl TextEncoding {
    /// Attempt order used when the caller does not override it.
    pub const DEFAULT_ORDER: [TextEncoding; 3] = [
        TextEncoding::Utf8,
        TextEncoding::Latin1,
        TextEncoding::Windows1252,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TextEncoding::Utf8 => "utf-8",
            TextEncoding::Latin1 => "iso-8859-1",
            TextEncoding::Windows1252 => "windows-1252",
        }
    }

    /// Decode `bytes` without replacement; `None` if any sequence is invalid.
    pub fn decode_strict(&self, bytes: &[u8]) -> Option<String> {
        match self {
            TextEncoding::Utf8 => {
                let body = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
                std::str::from_utf8(body).ok().map(str::to_owned)
            }
            TextEncoding::Latin1 => Some(bytes.iter().map(|&b| char::from(b)).collect()),
            TextEncoding::Windows1252 => WINDOWS_1252
                .decode_without_bom_handling_and_without_replacement(bytes)
                .map(|text| text.into_owned()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Every attempted encoding rejected the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub tried: Vec<TextEncoding>,
}

/// Decode `bytes` with the first encoding in `order` that accepts them.
pub fn decode(bytes: &[u8], order: &[TextEncoding]) -> Result<(String, TextEncoding), DecodeError> {
    order
        .iter()
        .find_map(|enc| enc.decode_strict(bytes).map(|text| (text, *enc)))
        .ok_or_else(|| DecodeError {
            tried: order.to_vec(),
        })
}
