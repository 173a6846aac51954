//! Named tokenizer parse errors.
//!
//! [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! The HTML parsing spec names every parse error so implementations and test
//! suites can refer to them by a stable identifier. This enum carries the
//! subset the tokenizer and parser in this crate actually detect, plus the
//! source position at which each was raised.

use std::fmt;

use strum_macros::Display;

/// A single named tokenizer or tree-construction parse error, tied to the
/// position in the input it was raised at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// 1-based line number.
    pub line: usize,
    /// 1-based column number (counted in UTF-8 scalar values).
    pub column: usize,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} parse error at {}:{}", self.kind, self.line, self.column)
    }
}

/// [§ 13.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// `Display` renders the WHATWG kebab-case error name (e.g.
/// `unexpected-null-character`), via [`strum_macros::Display`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ParseErrorKind {
    /// A U+0000 NULL character was found where the spec says to treat it as
    /// an error (and usually replace it with U+FFFD).
    UnexpectedNullCharacter,
    /// EOF was reached while still looking for the start of a tag name.
    EofBeforeTagName,
    /// The first character after `<` wasn't `/`, an ASCII alpha, `?`, or EOF.
    InvalidFirstCharacterOfTagName,
    /// A `<?` was found where a tag or comment was expected.
    UnexpectedQuestionMarkInsteadOfTagName,
    /// A `<!` was found that isn't a valid comment, DOCTYPE, or CDATA start.
    IncorrectlyOpenedComment,
    /// EOF was reached inside a DOCTYPE.
    EofInDoctype,
    /// No whitespace between `DOCTYPE` and the DOCTYPE's name.
    MissingWhitespaceBeforeDoctypeName,
    /// A DOCTYPE with no name (`<!DOCTYPE>`).
    MissingDoctypeName,
    /// EOF was reached inside a start or end tag.
    EofInTag,
    /// A stray `/` inside a tag outside the self-closing-flag position.
    UnexpectedSolidusInTag,
    /// An end tag (`</>`) with no tag name.
    MissingEndTagName,
    /// A `=` appeared where an attribute name was expected.
    UnexpectedEqualsSignBeforeAttributeName,
    /// A quote character appeared inside an unquoted attribute name.
    UnexpectedCharacterInAttributeName,
    /// `>` immediately after `=` in an attribute, with no value.
    MissingAttributeValue,
    /// A `"`, `'`, or `<` appeared inside an unquoted attribute value.
    UnexpectedCharacterInUnquotedAttributeValue,
    /// No whitespace between two attributes.
    MissingWhitespaceBetweenAttributes,
    /// `<!---->`-style abrupt close of a comment that never had content.
    AbruptClosingOfEmptyComment,
    /// EOF was reached inside a comment.
    EofInComment,
    /// A `<!--` appeared inside a comment's body.
    NestedComment,
    /// A comment closed with `--!>` rather than `-->`.
    IncorrectlyClosedComment,
    /// A character reference was not terminated by `;`.
    MissingSemicolonAfterCharacterReference,
    /// A named character reference matched no entry in the reference table.
    UnknownNamedCharacterReference,
    /// The same attribute name was seen twice on a single tag.
    DuplicateAttribute,
    /// EOF while consuming script-data comment-like text in escaped/double
    /// escaped script data.
    EofInScriptHtmlCommentLikeText,
    /// EOF before a CDATA section was closed (relevant in foreign content).
    EofInCdata,
    /// `<![CDATA[` appeared outside foreign content.
    CdataInHtmlContent,
    /// A C0 control character (other than ASCII whitespace) in the input
    /// stream.
    ControlCharacterInInputStream,
    /// A noncharacter code point in the input stream.
    NoncharacterInInputStream,
    /// A surrogate code point in the input stream.
    SurrogateInInputStream,
    /// A numeric character reference resolved to a surrogate.
    SurrogateCharacterReference,
    /// A numeric character reference resolved to a noncharacter.
    NoncharacterCharacterReference,
    /// A numeric character reference resolved to a disallowed control
    /// character.
    ControlCharacterReference,
    /// A numeric character reference resolved to U+0000.
    NullCharacterReference,
    /// A numeric character reference resolved to a code point greater than
    /// U+10FFFF.
    CharacterReferenceOutsideUnicodeRange,
    /// `&#` or `&#x` was followed by no digits at all.
    AbsenceOfDigitsInNumericCharacterReference,
    /// No whitespace after the `PUBLIC` keyword in a DOCTYPE.
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// No whitespace after the `SYSTEM` keyword in a DOCTYPE.
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// Expected a quote to start the DOCTYPE public identifier.
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// Expected a quote to start the DOCTYPE system identifier.
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// `PUBLIC` keyword with no identifier following it.
    MissingDoctypePublicIdentifier,
    /// `SYSTEM` keyword with no identifier following it.
    MissingDoctypeSystemIdentifier,
    /// DOCTYPE closed (`>`) in the middle of its public identifier.
    AbruptDoctypePublicIdentifier,
    /// DOCTYPE closed (`>`) in the middle of its system identifier.
    AbruptDoctypeSystemIdentifier,
    /// Extra characters between the DOCTYPE system identifier and `>`.
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// Text other than `PUBLIC`/`SYSTEM` found after a DOCTYPE's name.
    InvalidCharacterSequenceAfterDoctypeName,
    /// No whitespace between the DOCTYPE public and system identifiers.
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_displays_as_kebab_case() {
        assert_eq!(
            ParseErrorKind::UnexpectedNullCharacter.to_string(),
            "unexpected-null-character"
        );
        assert_eq!(
            ParseErrorKind::EofInScriptHtmlCommentLikeText.to_string(),
            "eof-in-script-html-comment-like-text"
        );
    }

    #[test]
    fn error_formats_with_position() {
        let err = ParseError {
            kind: ParseErrorKind::EofInTag,
            line: 3,
            column: 7,
        };
        assert_eq!(err.to_string(), "eof-in-tag parse error at 3:7");
    }
}
