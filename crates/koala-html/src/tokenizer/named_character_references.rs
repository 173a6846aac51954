//! Named character reference lookup table.
//!
//! [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
//!
//! This module provides lookup functions for HTML named character references.
//! The full spec defines 2,231 entities, generated from WHATWG's
//! `entities.json` at build time; this table implements a curated subset of
//! the most common ones, stored sorted so both lookups below can binary
//! search instead of scanning.

/// The named character reference table, sorted lexicographically by name.
///
/// Maps entity names (without the leading `&`) to their replacement string.
/// Some entities map to multiple characters (e.g. `"fjlig;"` -> `"fj"`); none
/// of the curated subset below happens to, but the representation supports
/// it. The spec requires entities to be matched WITH the trailing semicolon
/// when present, but some legacy entities work without it (e.g. `&amp`
/// matches `&amp;`) — both forms are listed as distinct entries here.
///
/// Must stay sorted: [`lookup_entity`] and [`any_entity_has_prefix`] both
/// binary search this slice.
static NAMED_ENTITIES: &[(&str, &str)] = &[
    ("Aacute;", "\u{00C1}"),
    ("Acirc;", "\u{00C2}"),
    ("Agrave;", "\u{00C0}"),
    ("Atilde;", "\u{00C3}"),
    ("Auml;", "\u{00C4}"),
    ("Ccedil;", "\u{00C7}"),
    ("Eacute;", "\u{00C9}"),
    ("Egrave;", "\u{00C8}"),
    ("Iacute;", "\u{00CD}"),
    ("Igrave;", "\u{00CC}"),
    ("Ntilde;", "\u{00D1}"),
    ("Oacute;", "\u{00D3}"),
    ("Ograve;", "\u{00D2}"),
    ("Uacute;", "\u{00DA}"),
    ("Ugrave;", "\u{00D9}"),
    ("aacute;", "\u{00E1}"),
    ("acirc;", "\u{00E2}"),
    ("agrave;", "\u{00E0}"),
    ("alpha;", "\u{03B1}"),
    ("amp", "&"),
    ("amp;", "&"),
    ("apos;", "'"),
    ("atilde;", "\u{00E3}"),
    ("auml;", "\u{00E4}"),
    ("beta;", "\u{03B2}"),
    ("bull;", "\u{2022}"),
    ("ccedil;", "\u{00E7}"),
    ("cent;", "\u{00A2}"),
    ("copy;", "\u{00A9}"),
    ("darr;", "\u{2193}"),
    ("deg;", "\u{00B0}"),
    ("delta;", "\u{03B4}"),
    ("divide;", "\u{00F7}"),
    ("eacute;", "\u{00E9}"),
    ("egrave;", "\u{00E8}"),
    ("euro;", "\u{20AC}"),
    ("frac12;", "\u{00BD}"),
    ("frac14;", "\u{00BC}"),
    ("frac34;", "\u{00BE}"),
    ("gamma;", "\u{03B3}"),
    ("ge;", "\u{2265}"),
    ("gt", ">"),
    ("gt;", ">"),
    ("hellip;", "\u{2026}"),
    ("iacute;", "\u{00ED}"),
    ("igrave;", "\u{00EC}"),
    ("laquo;", "\u{00AB}"),
    ("larr;", "\u{2190}"),
    ("ldquo;", "\u{201C}"),
    ("le;", "\u{2264}"),
    ("lsquo;", "\u{2018}"),
    ("lt", "<"),
    ("lt;", "<"),
    ("mdash;", "\u{2014}"),
    ("middot;", "\u{00B7}"),
    ("nbsp;", "\u{00A0}"),
    ("ndash;", "\u{2013}"),
    ("ne;", "\u{2260}"),
    ("ntilde;", "\u{00F1}"),
    ("oacute;", "\u{00F3}"),
    ("ograve;", "\u{00F2}"),
    ("omega;", "\u{03C9}"),
    ("pi;", "\u{03C0}"),
    ("plusmn;", "\u{00B1}"),
    ("pound;", "\u{00A3}"),
    ("quot", "\""),
    ("quot;", "\""),
    ("raquo;", "\u{00BB}"),
    ("rarr;", "\u{2192}"),
    ("rdquo;", "\u{201D}"),
    ("reg;", "\u{00AE}"),
    ("rsquo;", "\u{2019}"),
    ("sigma;", "\u{03C3}"),
    ("times;", "\u{00D7}"),
    ("trade;", "\u{2122}"),
    ("uacute;", "\u{00FA}"),
    ("uarr;", "\u{2191}"),
    ("ugrave;", "\u{00F9}"),
    ("yen;", "\u{00A5}"),
];

/// Look up a named character reference.
///
/// Returns the replacement string if found.
/// The `name` should NOT include the leading '&'.
///
/// # Example
/// ```ignore
/// lookup_entity("amp;")  // Returns Some("&")
/// lookup_entity("amp")   // Returns Some("&") - legacy support
/// lookup_entity("xyz;")  // Returns None
/// ```
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES
        .binary_search_by(|(entity, _)| entity.cmp(&name))
        .ok()
        .map(|index| NAMED_ENTITIES[index].1)
}

/// Check if any entity name starts with the given prefix.
///
/// This is used to determine whether we should keep consuming characters
/// while looking for the longest match.
///
/// # Example
/// ```ignore
/// any_entity_has_prefix("am")   // true (amp, amp;)
/// any_entity_has_prefix("xyz")  // false
/// ```
#[must_use]
pub fn any_entity_has_prefix(prefix: &str) -> bool {
    let insertion_point =
        NAMED_ENTITIES.partition_point(|(entity, _)| *entity < prefix);
    NAMED_ENTITIES
        .get(insertion_point)
        .is_some_and(|(entity, _)| entity.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted() {
        assert!(NAMED_ENTITIES.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn looks_up_common_entities() {
        assert_eq!(lookup_entity("amp;"), Some("&"));
        assert_eq!(lookup_entity("amp"), Some("&"));
        assert_eq!(lookup_entity("lt;"), Some("<"));
        assert_eq!(lookup_entity("xyz;"), None);
    }

    #[test]
    fn prefix_search_matches_binary_search_semantics() {
        assert!(any_entity_has_prefix("am"));
        assert!(any_entity_has_prefix("amp"));
        assert!(!any_entity_has_prefix("xyz"));
        assert!(any_entity_has_prefix(""));
    }
}
