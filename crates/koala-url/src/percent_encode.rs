//! Percent-encoding per the URL Standard's five percent-encode sets.
//!
//! [URL Standard § 1.4 Percent-encoded bytes](https://url.spec.whatwg.org/#percent-encoded-bytes)

use std::fmt::Write as _;

/// One of the URL Standard's named percent-encode sets. Each set is a
/// superset of the one before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PercentEncodeSet {
    /// [C0 control percent-encode set](https://url.spec.whatwg.org/#c0-control-percent-encode-set)
    C0Control,
    /// [Fragment percent-encode set](https://url.spec.whatwg.org/#fragment-percent-encode-set)
    Fragment,
    /// [Query percent-encode set](https://url.spec.whatwg.org/#query-percent-encode-set)
    Query,
    /// [Special-query percent-encode set](https://url.spec.whatwg.org/#special-query-percent-encode-set)
    SpecialQuery,
    /// [Path percent-encode set](https://url.spec.whatwg.org/#path-percent-encode-set)
    Path,
    /// [Userinfo percent-encode set](https://url.spec.whatwg.org/#userinfo-percent-encode-set)
    Userinfo,
}

impl PercentEncodeSet {
    fn contains(self, byte: u8) -> bool {
        let is_c0 = byte < 0x20 || byte > 0x7e;
        match self {
            Self::C0Control => is_c0,
            Self::Fragment => is_c0 || matches!(byte, b' ' | b'"' | b'<' | b'>' | b'`'),
            Self::Query => is_c0 || matches!(byte, b' ' | b'"' | b'#' | b'<' | b'>'),
            Self::SpecialQuery => Self::Query.contains(byte) || byte == b'\'',
            Self::Path => Self::Query.contains(byte) || matches!(byte, b'?' | b'`' | b'{' | b'}'),
            Self::Userinfo => {
                Self::Path.contains(byte)
                    || matches!(
                        byte,
                        b'/' | b':' | b';' | b'=' | b'@' | b'[' | b'\\' | b']' | b'^' | b'|'
                    )
            }
        }
    }
}

/// [URL Standard § 1.4 percent-encode after encoding](https://url.spec.whatwg.org/#string-percent-encode-after-encoding)
#[must_use]
pub fn percent_encode(input: &str, set: PercentEncodeSet) -> String {
    let mut out = String::with_capacity(input.len());
    for &byte in input.as_bytes() {
        if set.contains(byte) {
            write!(out, "%{byte:02X}").expect("write! to String never fails");
        } else {
            out.push(byte as char);
        }
    }
    out
}

/// [URL Standard § 1.4 percent-decode](https://url.spec.whatwg.org/#percent-decode)
///
/// Tolerant: a `%` not followed by two hex digits is passed through
/// literally.
#[must_use]
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() && is_hex(bytes[i + 1]) && is_hex(bytes[i + 2]) {
            let hi = hex_value(bytes[i + 1]);
            let lo = hex_value(bytes[i + 2]);
            out.push((hi << 4) | lo);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    // The percent-decode algorithm operates on bytes and may legitimately
    // produce invalid UTF-8 (e.g. a decoded arbitrary byte); callers that
    // need a `String` accept lossy replacement the way browsers display it.
    String::from_utf8_lossy(&out).into_owned()
}

/// RFC 3986 normalization: uppercase all percent-encoded triplets.
#[must_use]
pub fn percent_encoded_triplets_to_upper(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() && is_hex(bytes[i + 1]) && is_hex(bytes[i + 2]) {
            out.push('%');
            out.push((bytes[i + 1] as char).to_ascii_uppercase());
            out.push((bytes[i + 2] as char).to_ascii_uppercase());
            i += 3;
        } else {
            out.push(bytes[i] as char);
            i += 1;
        }
    }
    out
}

/// RFC 3986 normalization: decode percent-encoded triplets that encode an
/// unreserved character (ALPHA / DIGIT / `-` / `.` / `_` / `~`).
#[must_use]
pub fn percent_decode_unreserved(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() && is_hex(bytes[i + 1]) && is_hex(bytes[i + 2]) {
            let value = (hex_value(bytes[i + 1]) << 4) | hex_value(bytes[i + 2]);
            if value < 128 && (value.is_ascii_alphanumeric() || matches!(value, b'-' | b'.' | b'_' | b'~')) {
                out.push(value as char);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i] as char);
        i += 1;
    }
    out
}

fn is_hex(byte: u8) -> bool {
    byte.is_ascii_hexdigit()
}

fn hex_value(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_c0_and_non_ascii() {
        assert_eq!(percent_encode(" ", PercentEncodeSet::C0Control), "%20");
        assert_eq!(percent_encode("a", PercentEncodeSet::C0Control), "a");
    }

    #[test]
    fn userinfo_set_is_strict_superset_of_path() {
        assert_eq!(percent_encode("/", PercentEncodeSet::Userinfo), "%2F");
        assert_eq!(percent_encode("/", PercentEncodeSet::Path), "/");
    }

    #[test]
    fn decode_is_tolerant_of_malformed_triplets() {
        assert_eq!(percent_decode("%zz"), "%zz");
        assert_eq!(percent_decode("%2F"), "/");
    }

    #[test]
    fn encode_then_decode_is_identity() {
        let original = "hello world/?#";
        let encoded = percent_encode(original, PercentEncodeSet::Userinfo);
        assert_eq!(percent_decode(&encoded), original);
    }

    #[test]
    fn triplet_uppercase_is_idempotent() {
        let once = percent_encoded_triplets_to_upper("%2f%41");
        let twice = percent_encoded_triplets_to_upper(&once);
        assert_eq!(once, twice);
        assert_eq!(once, "%2F%41");
    }

    #[test]
    fn decode_unreserved_keeps_reserved_triplets_encoded() {
        assert_eq!(percent_decode_unreserved("%41%2F"), "A%2F");
    }
}
