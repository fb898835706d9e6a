//! Text encoding detection and strict decoding.

use chardetng::EncodingDetector;
use encoding_rs::Encoding;
use std::borrow::Cow;

use super::ContentError;

/// Best-guess encoding for `bytes`. A BOM wins; otherwise chardetng guesses from the byte
/// distribution (no TLD hint, UTF-8 allowed). No accuracy guarantee.
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode `bytes` under `encoding`, stripping a matching BOM. Malformed sequences are an
/// error, never replaced.
pub fn decode_text<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
) -> Result<Cow<'a, str>, ContentError> {
    let body = match Encoding::for_bom(bytes) {
        Some((bom_encoding, bom_len)) if bom_encoding == encoding => &bytes[bom_len..],
        _ => bytes,
    };
    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or(ContentError::Decode {
            encoding: encoding.name(),
        })
}
