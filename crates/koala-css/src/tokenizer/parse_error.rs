//! Named CSS tokenizer parse errors.
//!
//! [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization)
//!
//! Mirrors the shape of `koala_html`'s `ParseError`/`ParseErrorKind` split: a
//! fixed, named kind plus the source position it was raised at, rather than
//! a bare string or a silently dropped error.

use std::fmt;

use strum_macros::Display;

/// A single named tokenizer parse error, tied to the position in the input
/// it was raised at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CssParseError {
    /// The kind of error.
    pub kind: CssParseErrorKind,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number (counted in Unicode scalar values).
    pub column: usize,
}

impl fmt::Display for CssParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parse error at {}:{}", self.kind, self.line, self.column)
    }
}

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
///
/// `Display` renders a kebab-case name, matching `koala_html::ParseErrorKind`'s
/// idiom, via [`strum_macros::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum CssParseErrorKind {
    /// A quote, `(`, or non-printable code point inside an otherwise
    /// unquoted `url(...)` token.
    DisallowedCharacterInUrl,
    /// EOF reached while inside a `/* ... */` comment.
    EofInComment,
    /// EOF reached immediately after a `\` that should start an escape.
    EofInEscapeSequence,
    /// EOF reached inside a quoted string.
    EofInString,
    /// EOF reached inside an unquoted `url(...)` token.
    EofInUrl,
    /// A `\` followed by a newline outside a string (not a valid escape).
    InvalidEscapeSequence,
    /// A raw, unescaped newline inside a quoted string.
    NewlineInString,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_displays_as_kebab_case() {
        assert_eq!(
            CssParseErrorKind::EofInComment.to_string(),
            "eof-in-comment"
        );
        assert_eq!(
            CssParseErrorKind::DisallowedCharacterInUrl.to_string(),
            "disallowed-character-in-url"
        );
    }

    #[test]
    fn error_formats_with_position() {
        let err = CssParseError {
            kind: CssParseErrorKind::NewlineInString,
            line: 2,
            column: 5,
        };
        assert_eq!(err.to_string(), "newline-in-string parse error at 2:5");
    }
}
