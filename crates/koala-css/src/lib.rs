//! CSS tokenizer for the Koala renderer.
//!
//! # Scope
//!
//! This crate implements the CSS Syntax Module Level 3 tokenization step
//! ([§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)):
//! a byte stream goes in, a stream of CSS tokens comes out. Parsing those
//! tokens into rules/declarations, selector matching, the cascade, computed
//! styles, and layout/paint are a different system and are not implemented
//! here.
//!
//! - All token types: ident, function, at-keyword, hash, string, url,
//!   number, dimension, percentage, delim, and the fixed punctuation tokens.
//! - Comment handling (`/* ... */`).
//! - Escape sequences, including hex escapes with saturation at
//!   `U+10FFFF`/replacement for surrogates.
//! - Numeric value saturation into the 32-bit signed integer range.
//! - A fixed parse-error taxonomy delivered to the caller, never silently
//!   dropped.
//!
//! # Not implemented (out of scope)
//!
//! Rule/declaration parsing, selectors, the cascade, computed styles, and
//! layout/paint.

/// CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
pub mod tokenizer;

pub use tokenizer::{CSSToken, CSSTokenizer, CssParseError, HashType, NumericType};
