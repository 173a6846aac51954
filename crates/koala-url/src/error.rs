//! Named URL validation errors.
//!
//! [URL Standard § 1.3 Url validation errors](https://url.spec.whatwg.org/#url-validation)
//!
//! These are non-fatal: the parser keeps going and reports them to an
//! optional sink. Only a transition to the `Failure` state aborts parsing.

use strum_macros::Display;

/// A single named validation error produced while parsing a URL.
///
/// `Display` renders the WHATWG kebab-case error name, matching
/// `koala-html`'s `ParseErrorKind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ValidationError {
    /// Unicode ToASCII records an error or returns the empty string.
    DomainToAscii,
    /// Unicode ToUnicode records an error.
    DomainToUnicode,
    /// The input's host contains a forbidden domain code point.
    DomainInvalidCodePoint,
    /// An opaque host (in a URL that is not special) contains a forbidden
    /// host code point.
    HostInvalidCodePoint,
    /// An IPv4 address ends with a U+002E (.).
    Ipv4EmptyPart,
    /// An IPv4 address does not consist of exactly 4 parts.
    Ipv4TooManyParts,
    /// An IPv4 address part is not numeric.
    Ipv4NonNumericPart,
    /// The IPv4 address contains numbers expressed using hexadecimal or
    /// octal digits.
    Ipv4NonDecimalPart,
    /// An IPv4 address part exceeds 255.
    Ipv4OutOfRangePart,
    /// An IPv6 address is missing the closing U+005D (]).
    Ipv6Unclosed,
    /// An IPv6 address begins with improper compression.
    Ipv6InvalidCompression,
    /// An IPv6 address contains more than 8 pieces.
    Ipv6TooManyPieces,
    /// An IPv6 address is compressed in more than one spot.
    Ipv6MultipleCompression,
    /// An IPv6 address contains a code point that is neither an ASCII hex
    /// digit nor a U+003A (:), or it unexpectedly ends.
    Ipv6InvalidCodePoint,
    /// An uncompressed IPv6 address contains fewer than 8 pieces.
    Ipv6TooFewPieces,
    /// An IPv6 address with IPv4 address syntax: the IPv6 address has more
    /// than 6 pieces.
    Ipv4InIpv6TooManyPieces,
    /// An IPv6 address with IPv4 address syntax: an IPv4 part is empty or
    /// non-digit, has a leading 0, or there are too many IPv4 parts.
    Ipv4InIpv6InvalidCodePoint,
    /// An IPv6 address with IPv4 address syntax: an IPv4 part exceeds 255.
    Ipv4InIpv6OutOfRangePart,
    /// An IPv6 address with IPv4 address syntax: the IPv4 address contains
    /// too few parts.
    Ipv4InIpv6TooFewParts,
    /// A code point is found that is not a URL unit.
    InvalidUrlUnit,
    /// The input's scheme is not followed by "//".
    SpecialSchemeMissingFollowingSolidus,
    /// The input is missing a scheme, and either no base URL was given or
    /// the base URL has an opaque path.
    MissingSchemeNonRelativeUrl,
    /// The URL has a special scheme and uses U+005C (\\) instead of
    /// U+002F (/).
    InvalidReverseSolidus,
    /// The input includes credentials.
    InvalidCredentials,
    /// The input has a special scheme but does not contain a host.
    HostMissing,
    /// The input's port is too big.
    PortOutOfRange,
    /// The input's port is invalid.
    PortInvalid,
    /// The input is a relative-URL string that starts with a Windows drive
    /// letter and the base URL's scheme is "file".
    FileInvalidWindowsDriveLetter,
    /// A file: URL's host is a Windows drive letter.
    FileInvalidWindowsDriveLetterHost,
}

impl ValidationError {
    /// One-sentence description, matching the WHATWG spec's prose for this
    /// error.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::DomainToAscii => "Unicode ToASCII records an error or returns the empty string",
            Self::DomainToUnicode => "Unicode ToUnicode records an error",
            Self::DomainInvalidCodePoint => "The input's host contains a forbidden domain code point",
            Self::HostInvalidCodePoint => {
                "An opaque host (in a URL that is not special) contains a forbidden host code point"
            }
            Self::Ipv4EmptyPart => "An IPv4 address ends with a U+002E (.)",
            Self::Ipv4TooManyParts => "An IPv4 address does not consist of exactly 4 parts",
            Self::Ipv4NonNumericPart => "An IPv4 address part is not numeric",
            Self::Ipv4NonDecimalPart => {
                "The IPv4 address contains numbers expressed using hexadecimal or octal digits"
            }
            Self::Ipv4OutOfRangePart => "An IPv4 address part exceeds 255",
            Self::Ipv6Unclosed => "An IPv6 address is missing the closing U+005D (])",
            Self::Ipv6InvalidCompression => "An IPv6 address begins with improper compression",
            Self::Ipv6TooManyPieces => "An IPv6 address contains more than 8 pieces",
            Self::Ipv6MultipleCompression => "An IPv6 address is compressed in more than one spot",
            Self::Ipv6InvalidCodePoint => {
                "An IPv6 address contains a code point that is neither an ASCII hex digit nor a U+003A (:), or it unexpectedly ends"
            }
            Self::Ipv6TooFewPieces => "An uncompressed IPv6 address contains fewer than 8 pieces",
            Self::Ipv4InIpv6TooManyPieces => {
                "An IPv6 address with IPv4 address syntax: the IPv6 address has more than 6 pieces"
            }
            Self::Ipv4InIpv6InvalidCodePoint => {
                "An IPv6 address with IPv4 address syntax: an IPv4 part is empty or contains a non-ASCII digit, an IPv4 part contains a leading 0, or there are too many IPv4 parts"
            }
            Self::Ipv4InIpv6OutOfRangePart => {
                "An IPv6 address with IPv4 address syntax: an IPv4 part exceeds 255"
            }
            Self::Ipv4InIpv6TooFewParts => {
                "An IPv6 address with IPv4 address syntax: an IPv4 address contains too few parts"
            }
            Self::InvalidUrlUnit => "A code point is found that is not a URL unit",
            Self::SpecialSchemeMissingFollowingSolidus => "The input's scheme is not followed by \"//\"",
            Self::MissingSchemeNonRelativeUrl => {
                "The input is missing a scheme, because it does not begin with an ASCII alpha, and either no base URL was provided or the base URL cannot be used as a base URL because it has an opaque path"
            }
            Self::InvalidReverseSolidus => {
                "The URL has a special scheme and it uses U+005C (\\) instead of U+002F (/)"
            }
            Self::InvalidCredentials => "The input includes credentials",
            Self::HostMissing => "The input has a special scheme, but does not contain a host",
            Self::PortOutOfRange => "The input's port is too big",
            Self::PortInvalid => "The input's port is invalid",
            Self::FileInvalidWindowsDriveLetter => {
                "The input is a relative-URL string that starts with a Windows drive letter and the base URL's scheme is \"file\""
            }
            Self::FileInvalidWindowsDriveLetterHost => "A file: URL's host is a Windows drive letter",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_displays_as_kebab_case() {
        assert_eq!(ValidationError::Ipv6TooManyPieces.to_string(), "ipv6-too-many-pieces");
        assert_eq!(ValidationError::HostMissing.to_string(), "host-missing");
    }

    #[test]
    fn every_variant_has_a_description() {
        assert!(!ValidationError::DomainToAscii.description().is_empty());
        assert!(!ValidationError::FileInvalidWindowsDriveLetterHost.description().is_empty());
    }
}
