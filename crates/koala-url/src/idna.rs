//! A structural UTS#46 domain-to-ASCII pipeline.
//!
//! [URL Standard § 3.5 domain to ASCII](https://url.spec.whatwg.org/#concept-domain-to-ascii)
//!
//! The original engine delegates this entirely to ICU's
//! `icu::IDNA::createUTS46Instance` (nontransitional, `CHECK_BIDI`,
//! `CHECK_CONTEXTJ`). Statically linking ICU's full Unicode mapping and
//! normalization tables is out of scope for this port (see `DESIGN.md`); this
//! implements the *structure* of the pipeline the spec describes — split into
//! labels, map/validate each label, Punycode-encode non-ASCII labels with an
//! `xn--` prefix, rejoin — using the curated disallowed-code-point screen and
//! Punycode encoder in this crate rather than the full IDNA mapping table.

use crate::error::ValidationError;
use crate::punycode;

const ACE_PREFIX: &str = "xn--";

/// A curated screen of code points UTS#46 always disallows in domain labels,
/// independent of the full Unicode mapping tables: ASCII control characters,
/// space, and the URL/host-structural delimiters that would make the label
/// ambiguous with the rest of the URL grammar.
fn has_disallowed_code_point(label: &str) -> bool {
    label.chars().any(|c| {
        (c as u32) < 0x20
            || c == ' '
            || matches!(c, '#' | '%' | '/' | ':' | '<' | '>' | '?' | '@' | '[' | '\\' | ']' | '^' | '|')
    })
}

/// [URL Standard § 3.5](https://url.spec.whatwg.org/#concept-domain-to-ascii)
///
/// `be_strict` mirrors the original's `USE_STD3_RULES` toggle: when strict,
/// empty labels and overlong labels/domains are rejected rather than
/// tolerated.
pub fn domain_to_ascii(domain: &str, be_strict: bool, mut on_error: impl FnMut(ValidationError)) -> Option<String> {
    if domain.is_empty() {
        on_error(ValidationError::DomainToAscii);
        return None;
    }

    let mut labels = Vec::new();
    for raw_label in domain.split('.') {
        let mapped = raw_label.to_lowercase();

        if mapped.is_empty() {
            if be_strict {
                on_error(ValidationError::DomainToAscii);
                return None;
            }
            labels.push(String::new());
            continue;
        }

        if has_disallowed_code_point(&mapped) {
            on_error(ValidationError::DomainToAscii);
            return None;
        }

        if mapped.is_ascii() {
            if be_strict && mapped.len() > 63 {
                on_error(ValidationError::DomainToAscii);
                return None;
            }
            labels.push(mapped);
            continue;
        }

        let Some(encoded) = punycode::encode(&mapped) else {
            on_error(ValidationError::DomainToAscii);
            return None;
        };
        let ace = format!("{ACE_PREFIX}{encoded}");
        if be_strict && ace.len() > 63 {
            on_error(ValidationError::DomainToAscii);
            return None;
        }
        labels.push(ace);
    }

    let ascii_domain = labels.join(".");

    if ascii_domain.is_empty() || (be_strict && ascii_domain.len() > 253) {
        on_error(ValidationError::DomainToAscii);
        return None;
    }

    Some(ascii_domain)
}

/// [URL Standard § 3.5](https://url.spec.whatwg.org/#concept-domain-to-unicode)
///
/// Inverse of [`domain_to_ascii`] for `xn--` labels. Structural, same
/// caveat as above.
#[must_use]
pub fn domain_to_unicode(domain: &str) -> String {
    domain
        .split('.')
        .map(|label| {
            label
                .strip_prefix(ACE_PREFIX)
                .and_then(punycode::decode)
                .unwrap_or_else(|| label.to_string())
        })
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_domain_lowercases_and_passes_through() {
        let mut errs = Vec::new();
        assert_eq!(
            domain_to_ascii("Example.COM", false, |e| errs.push(e)).as_deref(),
            Some("example.com")
        );
        assert!(errs.is_empty());
    }

    #[test]
    fn non_ascii_label_gets_ace_prefix() {
        let out = domain_to_ascii("münchen.de", false, |_| {}).unwrap();
        assert!(out.starts_with("xn--"));
        assert!(out.ends_with(".de"));
    }

    #[test]
    fn round_trips_through_to_unicode() {
        let ascii = domain_to_ascii("bücher.example", false, |_| {}).unwrap();
        assert_eq!(domain_to_unicode(&ascii), "bücher.example");
    }

    #[test]
    fn disallowed_code_point_fails() {
        let mut errs = Vec::new();
        assert!(domain_to_ascii("exa mple.com", false, |e| errs.push(e)).is_none());
        assert!(!errs.is_empty());
    }

    #[test]
    fn empty_domain_fails() {
        assert!(domain_to_ascii("", false, |_| {}).is_none());
    }
}
