//! HTML tokenizer and parser for the Koala browser.
//!
//! # Scope
//!
//! This crate implements:
//! - **HTML Tokenizer** ([WHATWG § 13.2.5](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)):
//!   Data, RCDATA, RAWTEXT, ScriptData, PLAINTEXT and all tag/attribute/
//!   comment/DOCTYPE/CDATA/character-reference sub-states.
//! - **HTML Parser / Tree Builder** ([WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)):
//!   Initial, BeforeHtml, BeforeHead, InHead, InHeadNoscript, AfterHead,
//!   InBody, Text, InTable, InTableText, InTableBody, InRow, InCell,
//!   AfterBody, InFrameset, AfterFrameset, AfterAfterBody, plus
//!   parse-error-passthrough stubs for InCaption, InColumnGroup, InSelect,
//!   InSelectInTable, InTemplate, AfterAfterFrameset.
//!
//! # Known gaps
//!
//! - InSelect/InSelectInTable/InTemplate/InCaption/InColumnGroup/
//!   AfterAfterFrameset are inert passthroughs rather than full algorithms.
//!
//! The adoption agency algorithm ([§ 13.2.6.4.7](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm))
//! is implemented and reparents misnested formatting elements (e.g.
//! `<b>1<p>2</b>3</p>`), including the `<a>`-reopen-closes-the-previous-one
//! case.

/// HTML parser and tree construction.
pub mod parser;
/// HTML tokenizer for converting input into tokens.
pub mod tokenizer;

pub use parser::{HTMLParser, InsertionMode, ParseIssue, print_tree};
pub use tokenizer::{Attribute, HTMLTokenizer, Token, TokenizerState};

use koala_dom::{DomTree, NodeId};

/// Configuration accepted by [`parse`] and [`parse_fragment`].
///
/// Mirrors the two knobs spec.md §6's external interface names: the
/// scripting flag (governs `<noscript>` handling) and whether comments
/// survive into the DOM.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    /// Whether script execution is assumed enabled. Affects only
    /// `<noscript>`: when `true` its contents are raw text; when `false`
    /// they are parsed as ordinary HTML. This crate never executes script.
    pub scripting: bool,
    /// Whether Comment tokens are inserted into the DOM. Defaults to
    /// `true` when using [`ParseOptions::default`].
    pub include_comments: bool,
}

impl ParseOptions {
    /// Options with comments included and scripting disabled, matching
    /// [`ParseOptions::default`]'s fields but usable in a `const` context.
    #[must_use]
    pub const fn new() -> Self {
        ParseOptions { scripting: false, include_comments: true }
    }
}

/// Callbacks observing a parse, per spec.md §6's `Callbacks` record.
///
/// Both are optional; a parse that supplies neither behaves exactly like
/// [`parse`]/[`parse_fragment`] without callbacks.
#[derive(Default)]
pub struct Callbacks<'a> {
    /// Invoked once per recoverable tokenizer parse error, in stream order.
    pub on_error: Option<Box<dyn FnMut(tokenizer::ParseError) + 'a>>,
    /// Invoked once per element popped off the stack of open elements, in
    /// closing order, with the finished tree and the closed element's id.
    pub on_element_closed: Option<Box<dyn FnMut(&DomTree, NodeId) + 'a>>,
}

/// Parse a complete HTML document from UTF-8 source text.
///
/// Runs the tokenizer to completion and feeds its tokens to the tree
/// constructor, matching spec.md §6's `parse(input, options) -> Document`
/// entry point. This parser never fails: malformed input still yields a
/// `DomTree`, degenerate for empty input.
#[must_use]
pub fn parse(input: &str, options: ParseOptions, mut callbacks: Callbacks<'_>) -> DomTree {
    let mut tokenizer =
        HTMLTokenizer::new(input.to_string()).with_scripting(options.scripting);
    tokenizer.run();
    let (tokens, errors) = tokenizer.into_tokens_and_errors();
    if let Some(on_error) = callbacks.on_error.as_mut() {
        for error in errors {
            on_error(error);
        }
    }

    let parser = HTMLParser::new(tokens)
        .with_scripting(options.scripting)
        .with_include_comments(options.include_comments);
    let (tree, _issues, closed) = parser.run_with_closed_elements();
    if let Some(on_element_closed) = callbacks.on_element_closed.as_mut() {
        for node_id in closed {
            on_element_closed(&tree, node_id);
        }
    }
    tree
}

/// Select the tokenizer state fragment parsing should start in, from the
/// context element's tag name.
///
/// Per [§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)
/// step 4: `title`/`textarea` select RCDATA; `style`/`xmp`/`iframe`/
/// `noembed`/`noframes` select RAWTEXT; `script` selects script data;
/// `noscript` selects RAWTEXT only when scripting is enabled; `plaintext`
/// selects PLAINTEXT; anything else starts in Data.
#[must_use]
pub fn fragment_initial_state(context_tag: &str, scripting: bool) -> TokenizerState {
    match context_tag {
        "title" | "textarea" => TokenizerState::RCDATA,
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => TokenizerState::RAWTEXT,
        "script" => TokenizerState::ScriptData,
        "noscript" if scripting => TokenizerState::RAWTEXT,
        "plaintext" => TokenizerState::PLAINTEXT,
        _ => TokenizerState::Data,
    }
}

/// Parse an HTML fragment for insertion into `context_tag` (e.g. the
/// element behind an `innerHTML` assignment), per spec.md §6's
/// `parse_fragment(context_element, input, options)` entry point.
///
/// Returns the synthetic context element's `NodeId` in the returned tree;
/// its children are the parsed fragment.
#[must_use]
pub fn parse_fragment(
    context_tag: &str,
    input: &str,
    options: ParseOptions,
    mut callbacks: Callbacks<'_>,
) -> DomTree {
    let initial_state = fragment_initial_state(context_tag, options.scripting);
    let mut tokenizer = HTMLTokenizer::new(input.to_string())
        .with_scripting(options.scripting)
        .with_initial_state(initial_state);
    tokenizer.run();
    let (tokens, errors) = tokenizer.into_tokens_and_errors();
    if let Some(on_error) = callbacks.on_error.as_mut() {
        for error in errors {
            on_error(error);
        }
    }

    let parser = HTMLParser::new_fragment(context_tag, tokens)
        .with_scripting(options.scripting)
        .with_include_comments(options.include_comments);
    let (tree, _issues, closed) = parser.run_with_closed_elements();
    if let Some(on_element_closed) = callbacks.on_element_closed.as_mut() {
        for node_id in closed {
            on_element_closed(&tree, node_id);
        }
    }
    tree
}
