//! Character encoding detection and transcoding.
//!
//! Fetched pages and stylesheets arrive as bytes. The charset is taken from,
//! in order: a byte-order mark, the `Content-Type` response header, a
//! `<meta>` declaration in the first kilobyte, and finally UTF-8.

use encoding_rs::{Encoding, UTF_8};

use crate::patterns::{CONTENT_TYPE_CHARSET, META_CHARSET};

const META_SCAN_LIMIT: usize = 1024;

/// Encoding named by a `Content-Type` header value, if any.
#[must_use]
pub fn encoding_from_content_type(content_type: &str) -> Option<&'static Encoding> {
    let label = CONTENT_TYPE_CHARSET.captures(content_type)?.get(1)?;
    Encoding::for_label(label.as_str().trim().as_bytes())
}

/// Encoding declared by a `<meta>` tag near the top of `html`.
#[must_use]
pub fn encoding_from_meta(html: &[u8]) -> Option<&'static Encoding> {
    let head = String::from_utf8_lossy(&html[..html.len().min(META_SCAN_LIMIT)]);
    let label = META_CHARSET.captures(&head)?.get(1)?;
    Encoding::for_label(label.as_str().as_bytes())
}

/// Pick the encoding of a response body.
#[must_use]
pub fn detect_encoding(body: &[u8], content_type: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(body) {
        return encoding;
    }
    content_type
        .and_then(encoding_from_content_type)
        .or_else(|| encoding_from_meta(body))
        .unwrap_or(UTF_8)
}

/// Decode a response body to UTF-8, replacing invalid sequences with U+FFFD.
///
/// # Examples
///
/// ```
/// use rs_siteclone::encoding::decode_body;
///
/// let body = b"<p>Caf\xE9</p>";
/// assert_eq!(decode_body(body, Some("text/html; charset=ISO-8859-1")), "<p>Café</p>");
/// ```
#[must_use]
pub fn decode_body(body: &[u8], content_type: Option<&str>) -> String {
    let encoding = detect_encoding(body, content_type);
    // decode() strips a BOM and handles the UTF-8 case without copying twice
    let (decoded, _used, _had_errors) = encoding.decode(body);
    decoded.into_owned()
}
