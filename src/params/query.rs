//! Canonical query string serialization.
//!
//! Keys are sorted so equal parameter sets always produce byte-identical
//! URLs, which is what the CDN cache keys on. Encoding follows
//! `application/x-www-form-urlencoded`, except that commas stay literal:
//! `rect` values are comma separated and the CDN accepts them unescaped.
//!
//! Minimal percent coding without external dependencies.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use super::ParamValue;

/// Serialize `(key, value)` pairs into a sorted query string (no leading `?`).
///
/// Sorting is by byte order of the key, independent of input order and locale.
pub fn serialize<'k, 'v, I>(pairs: I) -> String
where
    I: IntoIterator<Item = (&'k str, &'v ParamValue)>,
{
    let mut pairs: Vec<(&str, &ParamValue)> = pairs.into_iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = String::new();
    for (i, (key, value)) in pairs.iter().enumerate() {
        if i > 0 {
            out.push('&');
        }
        encode_component(key, &mut out);
        out.push('=');
        encode_component(&value.to_string(), &mut out);
    }
    tracing::trace!(query = %out, "serialized query");
    out
}

/// Form-encode one key or value, leaving commas literal.
fn encode_component(s: &str, out: &mut String) {
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'*' | b'-' | b'.' | b'_' | b',' => {
                out.push(b as char);
            }
            b' ' => out.push('+'),
            _ => {
                out.push('%');
                out.push(hex_upper(b >> 4));
                out.push(hex_upper(b & 0x0f));
            }
        }
    }
}

fn hex_upper(nibble: u8) -> char {
    match nibble {
        0..=9 => (b'0' + nibble) as char,
        _ => (b'A' + nibble - 10) as char,
    }
}

// ---- Tokenizer (for parsing passthrough parameters) ----

/// Split query string on '&', dropping a leading '?'.
pub(crate) fn split_query(query: &str) -> impl Iterator<Item = &str> {
    let query = query.strip_prefix('?').unwrap_or(query);
    query.split('&').filter(|s| !s.is_empty())
}

/// Split a single "key=value" pair on the first '='.
pub(crate) fn split_pair(pair: &str) -> (&str, &str) {
    pair.split_once('=').unwrap_or((pair, ""))
}

/// Percent-decode a URL component. Also handles '+' as space.
pub(crate) fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut decoded = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'+' => {
                decoded.push(b' ');
                i += 1;
            }
            b'%' if i + 2 < bytes.len() => {
                if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                    decoded.push(hi << 4 | lo);
                    i += 3;
                } else {
                    decoded.push(b'%');
                    i += 1;
                }
            }
            b => {
                decoded.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&decoded).into_owned()
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::borrow::Cow;

    fn int(v: i64) -> ParamValue {
        ParamValue::Int(v)
    }

    fn text(v: &'static str) -> ParamValue {
        ParamValue::Str(Cow::Borrowed(v))
    }

    #[test]
    fn sorts_keys() {
        let rect = text("0,0,750,750");
        let fpx = ParamValue::Float(0.333);
        let fpy = ParamValue::Float(0.333);
        let (w, h, fit, q, auto) = (int(375), int(100), text("crop"), int(75), text("format"));
        let pairs = [
            ("rect", &rect),
            ("fp-x", &fpx),
            ("fp-y", &fpy),
            ("w", &w),
            ("h", &h),
            ("fit", &fit),
            ("q", &q),
            ("auto", &auto),
        ];
        assert_eq!(
            serialize(pairs),
            "auto=format&fit=crop&fp-x=0.333&fp-y=0.333&h=100&q=75&rect=0,0,750,750&w=375"
        );
    }

    #[test]
    fn commas_stay_literal_other_reserved_bytes_encoded() {
        let v = text("a,b c&d=e/é");
        assert_eq!(serialize([("k", &v)]), "k=a,b+c%26d%3De%2F%C3%A9");
    }

    #[test]
    fn integral_floats_print_without_fraction() {
        let one = ParamValue::Float(1.0);
        let zero = ParamValue::Float(0.0);
        assert_eq!(serialize([("fp-y", &zero), ("fp-x", &one)]), "fp-x=1&fp-y=0");
    }

    #[test]
    fn empty_input() {
        assert_eq!(serialize(core::iter::empty::<(&str, &ParamValue)>()), "");
    }

    #[test]
    fn percent_decoding_works() {
        assert_eq!(percent_decode("a%2Cb+c"), "a,b c");
        assert_eq!(percent_decode("%C3%A9"), "é");
        assert_eq!(percent_decode("100%"), "100%");
        assert_eq!(percent_decode("%zz"), "%zz");
    }

    #[test]
    fn tokenizer_strips_question_mark() {
        let pairs: Vec<_> = split_query("?a=1&&b").map(split_pair).collect();
        assert_eq!(pairs, [("a", "1"), ("b", "")]);
    }
}
