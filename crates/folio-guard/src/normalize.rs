//! Input normalization: trim, then best-effort percent-decoding

use percent_encoding::percent_decode_str;
use std::borrow::Cow;

/// Trim surrounding whitespace and percent-decode the result.
///
/// Trimming also strips the byte order mark `U+FEFF`, but not `U+0085`.
/// Decoding is strict: a `%` that does not start a two-digit hex escape, or
/// escapes that decode to invalid UTF-8, leave the trimmed text as it was.
pub fn normalize(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim_matches(is_trimmable);
    match decode_strict(trimmed) {
        Some(decoded) => Cow::Owned(decoded),
        None => Cow::Borrowed(trimmed),
    }
}

fn is_trimmable(ch: char) -> bool {
    ch == '\u{FEFF}' || (ch.is_whitespace() && ch != '\u{85}')
}

/// Percent-decode `text`, or `None` when there is nothing to decode or the
/// escapes are malformed.
pub fn decode_strict(text: &str) -> Option<String> {
    if !text.contains('%') || !escapes_well_formed(text) {
        return None;
    }

    percent_decode_str(text)
        .decode_utf8()
        .ok()
        .map(|decoded| decoded.into_owned())
}

fn escapes_well_formed(text: &str) -> bool {
    let bytes = text.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !valid {
                return false;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    true
}
