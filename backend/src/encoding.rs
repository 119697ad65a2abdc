//! Character encoding detection and conversion for uploaded XML files.
//!
//! Digitization projects deliver files in a mix of UTF-8 and UTF-16 with or
//! without a BOM. Everything is normalized to UTF-8 with Unix line endings
//! before parsing.

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use tracing::warn;

/// Decode raw file bytes to a UTF-8 string, honouring a BOM when present.
pub fn decode_xml_bytes(bytes: &[u8]) -> String {
    let (encoding, has_bom) = detect_encoding(bytes);

    let bytes_without_bom = if has_bom {
        match encoding {
            e if e == UTF_16LE || e == UTF_16BE => &bytes[2..],
            _ => &bytes[3..],
        }
    } else {
        bytes
    };

    let (decoded, _encoding_used, had_errors) = encoding.decode(bytes_without_bom);
    if had_errors {
        warn!("Encoding errors detected while decoding input ({})", encoding.name());
    }

    decoded.replace("\r\n", "\n")
}

/// Detect file encoding by examining the BOM. No BOM means UTF-8.
fn detect_encoding(bytes: &[u8]) -> (&'static Encoding, bool) {
    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        return (UTF_16LE, true);
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        return (UTF_16BE, true);
    }

    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        return (UTF_8, true);
    }

    (UTF_8, false)
}
