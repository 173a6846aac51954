use strum_macros::Display;

use koala_common::warning::warn_once;
use koala_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};

use super::foreign_content::{
    adjust_foreign_attributes, adjust_mathml_attributes, adjust_svg_attributes,
};
use crate::tokenizer::{Attribute, Token};

/// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
///
/// "The insertion mode is a state variable that controls the primary operation
/// of the tree construction stage."
#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum InsertionMode {
    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    Initial,
    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    BeforeHtml,
    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    BeforeHead,
    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    InHead,
    /// [§ 13.2.6.4.5 The "in head noscript" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
    InHeadNoscript,
    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    AfterHead,
    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    InBody,
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    Text,
    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    InTable,
    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    InTableText,
    /// [§ 13.2.6.4.11 The "in caption" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
    InCaption,
    /// [§ 13.2.6.4.12 The "in column group" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incolumngroup)
    InColumnGroup,
    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    InTableBody,
    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    InRow,
    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    InCell,
    /// [§ 13.2.6.4.16 The "in select" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselect)
    InSelect,
    /// [§ 13.2.6.4.17 The "in select in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inselectintable)
    InSelectInTable,
    /// [§ 13.2.6.4.18 The "in template" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intemplate)
    InTemplate,
    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    AfterBody,
    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    InFrameset,
    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    AfterFrameset,
    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    AfterAfterBody,
    /// [§ 13.2.6.4.23 The "after after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
    AfterAfterFrameset,
}

/// [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
///
/// "This specification defines the parsing rules for HTML documents...
/// The handling of parse errors is well-defined."
#[derive(Debug, Clone)]
pub struct ParseIssue {
    /// Description of the parse error per the spec's error definitions.
    pub message: String,
    /// Index into the token stream where this error was encountered.
    pub token_index: usize,
    /// "Parse errors are only errors with the content—they are not, for instance,
    /// errors in the syntax of the specification itself."
    pub is_error: bool,
}

/// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
///
/// "The list of active formatting elements... is used to handle mis-nested
/// formatting element tags."
///
/// The list contains entries that are either elements or markers.
#[derive(Debug, Clone)]
pub enum ActiveFormattingElement {
    /// A formatting element entry.
    ///
    /// "The list contains elements in the formatting category..."
    /// Formatting elements are: a, b, big, code, em, font, i, nobr, s, small,
    /// strike, strong, tt, u.
    Element {
        /// The NodeId of the element in the DOM tree.
        node_id: NodeId,
        /// The original token, kept to recreate the element if needed during
        /// the adoption agency algorithm or when reconstructing.
        token: Token,
    },
    /// A marker entry.
    ///
    /// "A marker is an entry in the list of active formatting elements that is
    /// distinct from any element."
    ///
    /// Markers are pushed when entering: applet, object, marquee, template,
    /// td, th, caption. They scope the list so that formatting elements from
    /// outside these elements don't affect content inside.
    Marker,
}

/// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
///
/// The HTML parser builds a DOM tree from a stream of tokens.
pub struct HTMLParser {
    /// [§ 13.2.4.1 The insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-insertion-mode)
    insertion_mode: InsertionMode,

    /// [§ 13.2.4.2 The original insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#original-insertion-mode)
    original_insertion_mode: Option<InsertionMode>,

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Stores NodeIds into the arena.
    stack_of_open_elements: Vec<NodeId>,

    /// [§ 13.2.4.4 The element pointers](https://html.spec.whatwg.org/multipage/parsing.html#the-element-pointers)
    head_element_pointer: Option<NodeId>,

    /// [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    ///
    /// "The list of active formatting elements... is used to handle mis-nested
    /// formatting element tags."
    ///
    /// Initially, the list is empty.
    active_formatting_elements: Vec<ActiveFormattingElement>,

    /// DOM tree with parent/sibling pointers.
    /// NodeId::ROOT (index 0) is the Document node.
    tree: DomTree,

    /// Input tokens from the tokenizer.
    tokens: Vec<Token>,

    /// Current position in token stream.
    token_index: usize,

    /// Whether we've stopped parsing.
    stopped: bool,

    /// Parse issues (errors and warnings) encountered during parsing.
    issues: Vec<ParseIssue>,

    /// If true, panic on unhandled tokens or unexpected states.
    strict_mode: bool,

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#frameset-ok-flag)
    ///
    /// "the frameset-ok flag, which is set to "ok" when the parser is
    /// created" (we represent "ok" as `true`).
    frameset_ok: bool,

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "If foster parenting is enabled and the last element of the stack is a
    /// table, tbody, tfoot, thead, or tr element..." This flag is toggled on
    /// for the duration of an "in table" anything-else fallback into "in body".
    foster_parenting: bool,

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    pending_table_characters: String,

    /// Set after opening `pre`, `listing`, or `textarea`; consumes exactly
    /// one leading U+000A LINE FEED character token as an authoring
    /// convenience, per the "insert an HTML element" steps for those tags.
    ignore_next_lf: bool,

    /// [HTML Standard § 2.1.1 Scripting](https://html.spec.whatwg.org/multipage/webappapis.html#enabling-and-disabling-scripting)
    ///
    /// Configuration flag passed in at parser construction, matching the
    /// tokenizer's own `scripting` flag. Governs whether `<noscript>` is
    /// treated as raw text (scripting enabled) or as a real element whose
    /// contents are parsed as HTML (scripting disabled).
    scripting: bool,

    /// Whether Comment tokens are inserted into the DOM. Comments are kept
    /// by default; set via [`Self::with_include_comments`].
    include_comments: bool,

    /// Elements popped off the stack of open elements, in the order they
    /// closed. Surfaced to callers through [`Self::run_with_closed_elements`]
    /// as the `on_element_closed` callback from spec.md §6's external
    /// interface, minus the re-entrancy a live callback would allow.
    closed_elements: Vec<NodeId>,
}

impl HTMLParser {
    /// Create a new parser from a token stream.
    pub fn new(tokens: Vec<Token>) -> Self {
        // DomTree::new() creates the Document node at NodeId::ROOT
        HTMLParser {
            insertion_mode: InsertionMode::Initial,
            original_insertion_mode: None,
            stack_of_open_elements: Vec::new(),
            head_element_pointer: None,
            active_formatting_elements: Vec::new(),
            tree: DomTree::new(),
            tokens,
            token_index: 0,
            stopped: false,
            issues: Vec::new(),
            strict_mode: false,
            frameset_ok: true,
            foster_parenting: false,
            pending_table_characters: String::new(),
            ignore_next_lf: false,
            scripting: false,
            include_comments: true,
            closed_elements: Vec::new(),
        }
    }

    /// Pop the current node off the stack of open elements, recording it as
    /// closed for [`Self::run_with_closed_elements`].
    fn pop_open_element(&mut self) -> Option<NodeId> {
        let id = self.stack_of_open_elements.pop();
        if let Some(id) = id {
            self.closed_elements.push(id);
        }
        id
    }

    /// Enable strict mode - panics on unhandled tokens.
    pub fn with_strict_mode(mut self) -> Self {
        self.strict_mode = true;
        self
    }

    /// Set the scripting flag (disabled by default). Must match the flag the
    /// tokenizer that produced `tokens` was constructed with, since the
    /// `<noscript>` handling in both stages has to agree on which mode it's
    /// in.
    #[must_use]
    pub fn with_scripting(mut self, scripting: bool) -> Self {
        self.scripting = scripting;
        self
    }

    /// Control whether Comment tokens are inserted into the DOM (enabled by
    /// default).
    #[must_use]
    pub fn with_include_comments(mut self, include_comments: bool) -> Self {
        self.include_comments = include_comments;
        self
    }

    /// Create a parser for the "parsing HTML fragments" algorithm
    /// ([§ 13.4](https://html.spec.whatwg.org/multipage/parsing.html#parsing-html-fragments)).
    ///
    /// `context_tag` names the element the fragment would be inserted into
    /// (e.g. via `innerHTML`): it seeds the stack of open elements with a
    /// matching element and enters "in body" directly, skipping the
    /// document-level `Initial`/`BeforeHtml`/`BeforeHead` bookkeeping a full
    /// document parse performs. Selecting the tokenizer's initial lexical
    /// state to match `context_tag` is the caller's responsibility — see
    /// [`crate::parse_fragment`], which does both together.
    #[must_use]
    pub fn new_fragment(context_tag: &str, tokens: Vec<Token>) -> Self {
        let mut parser = Self::new(tokens);
        let context_id = parser.create_element(context_tag, &[]);
        parser.append_child(NodeId::ROOT, context_id);
        parser.stack_of_open_elements.push(context_id);
        parser.insertion_mode = InsertionMode::InBody;
        parser
    }

    /// Get all parse issues (errors and warnings) encountered during parsing.
    pub fn get_issues(&self) -> &[ParseIssue] {
        &self.issues
    }

    /// Record a parse warning (for unhandled but recoverable situations).
    ///
    /// Logs via koala-common's warning system and stores the issue for later retrieval.
    fn parse_warning(&mut self, message: &str) {
        warn_once("HTML Parser", message);
        self.issues.push(ParseIssue {
            message: message.to_string(),
            token_index: self.token_index,
            is_error: false,
        });
    }

    /// Run the parser and return the DOM tree.
    ///
    /// The returned DomTree preserves parent/sibling relationships
    /// for efficient traversal.
    pub fn run(mut self) -> DomTree {
        while !self.stopped && self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            self.process_token(&token);
            self.token_index += 1;
        }
        self.tree
    }

    /// Run the parser and return both the DomTree and any parse issues.
    pub fn run_with_issues(mut self) -> (DomTree, Vec<ParseIssue>) {
        while !self.stopped && self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            self.process_token(&token);
            self.token_index += 1;
        }
        let issues = std::mem::take(&mut self.issues);
        (self.tree, issues)
    }

    /// Run the parser, returning the DOM tree, parse issues, and the
    /// elements closed during tree construction in closing order (the
    /// `on_element_closed` observable from spec.md §6's external
    /// interface).
    pub fn run_with_closed_elements(mut self) -> (DomTree, Vec<ParseIssue>, Vec<NodeId>) {
        while !self.stopped && self.token_index < self.tokens.len() {
            let token = self.tokens[self.token_index].clone();
            self.process_token(&token);
            self.token_index += 1;
        }
        let issues = std::mem::take(&mut self.issues);
        let closed = std::mem::take(&mut self.closed_elements);
        (self.tree, issues, closed)
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction-dispatcher)
    fn process_token(&mut self, token: &Token) {
        if self.ignore_next_lf {
            self.ignore_next_lf = false;
            if matches!(token, Token::Character { data: '\n' }) {
                return;
            }
        }

        match self.insertion_mode {
            InsertionMode::Initial => self.handle_initial_mode(token),
            InsertionMode::BeforeHtml => self.handle_before_html_mode(token),
            InsertionMode::BeforeHead => self.handle_before_head_mode(token),
            InsertionMode::InHead => self.handle_in_head_mode(token),
            InsertionMode::InHeadNoscript => {
                // TODO: [§ 13.2.6.4.5](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inheadnoscript)
                self.handle_in_head_noscript_mode(token)
            }
            InsertionMode::AfterHead => self.handle_after_head_mode(token),
            InsertionMode::InBody => self.handle_in_body_mode(token),
            InsertionMode::Text => self.handle_text_mode(token),

            // [§ 13.2.6.4.9-15](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
            InsertionMode::InTable => self.handle_in_table_mode(token),
            InsertionMode::InTableText => self.handle_in_table_text_mode(token),

            // [§ 13.2.6.4.11-12](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incaption)
            // Parse-error passthroughs: "in table" switches into these modes
            // for <caption>/<colgroup> but their own token handling is left
            // unimplemented, so content is dropped with a parse warning
            // rather than panicking.
            InsertionMode::InCaption => self.handle_passthrough_mode(token, "in caption"),
            InsertionMode::InColumnGroup => self.handle_passthrough_mode(token, "in column group"),

            InsertionMode::InTableBody => self.handle_in_table_body_mode(token),
            InsertionMode::InRow => self.handle_in_row_mode(token),
            InsertionMode::InCell => self.handle_in_cell_mode(token),

            InsertionMode::InSelect => self.handle_passthrough_mode(token, "in select"),
            InsertionMode::InSelectInTable => {
                self.handle_passthrough_mode(token, "in select in table")
            }
            InsertionMode::InTemplate => self.handle_passthrough_mode(token, "in template"),

            InsertionMode::AfterBody => self.handle_after_body_mode(token),

            // [§ 13.2.6.4.20-21](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
            InsertionMode::InFrameset => self.handle_in_frameset_mode(token),
            InsertionMode::AfterFrameset => self.handle_after_frameset_mode(token),

            InsertionMode::AfterAfterBody => self.handle_after_after_body_mode(token),

            // [§ 13.2.6.4.23](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-frameset-insertion-mode)
            InsertionMode::AfterAfterFrameset => {
                self.handle_passthrough_mode(token, "after after frameset")
            }
        }
    }

    /// [§ 13.2.6 Tree construction](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction)
    ///
    /// "Reprocess the token" - process the same token again in a new insertion mode.
    /// Used when switching modes requires the current token to be handled differently.
    fn reprocess_token(&mut self, token: &Token) {
        self.process_token(token);
    }

    /// [§ 12.1.4 ASCII whitespace](https://infra.spec.whatwg.org/#ascii-whitespace)
    ///
    /// "ASCII whitespace is U+0009 TAB, U+000A LF, U+000C FF, U+000D CR,
    /// or U+0020 SPACE."
    fn is_whitespace(c: char) -> bool {
        matches!(c, '\t' | '\n' | '\x0C' | '\r' | ' ')
    }

    /// [§ 13.2 Parsing HTML documents, "quirks mode" condition table](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-initial)
    ///
    /// Determine which quirks mode a DOCTYPE token selects, following the
    /// four-way branch from the "initial" insertion mode: force-quirks, a
    /// non-"html" name, a recognized legacy public/system identifier prefix,
    /// or none of the above (no-quirks).
    fn quirks_mode_for_doctype(
        name: Option<&str>,
        public_id: Option<&str>,
        system_id: Option<&str>,
        force_quirks: bool,
    ) -> koala_dom::QuirksMode {
        const QUIRKS_EXACT_PUBLIC_IDS: &[&str] =
            &["-//w3o//dtd w3 html strict 3.0//en//", "-/w3d/dtd html 4.0 transitional/en", "html"];
        const QUIRKS_PUBLIC_ID_PREFIXES: &[&str] = &[
            "+//silmaril//dtd html pro v0r11 19970101//",
            "-//advasoft ltd//dtd html 3.0 aswedit + extensions//",
            "-//as//dtd html 3.0 aswedit + extensions//",
            "-//ietf//dtd html 2.0//",
            "-//ietf//dtd html 3.2//",
            "-//w3c//dtd html 4.01 frameset//",
            "-//w3c//dtd html 4.01 transitional//",
            "-//w3c//dtd html 3.2//",
        ];
        const QUIRKS_SYSTEM_ID: &str =
            "http://www.ibm.com/data/dtd/v11/ibmxhtml1-transitional.dtd";
        const LIMITED_QUIRKS_PUBLIC_ID_PREFIXES: &[&str] =
            &["-//w3c//dtd xhtml 1.0 frameset//", "-//w3c//dtd xhtml 1.0 transitional//"];

        if force_quirks || !matches!(name, Some("html")) {
            return koala_dom::QuirksMode::Quirks;
        }

        let public_id = public_id.unwrap_or("").to_ascii_lowercase();
        let system_id = system_id.unwrap_or("").to_ascii_lowercase();
        let starts_with_any =
            |needles: &[&str]| needles.iter().any(|needle| public_id.starts_with(needle));

        if QUIRKS_EXACT_PUBLIC_IDS.contains(&public_id.as_str())
            || system_id == QUIRKS_SYSTEM_ID
            || starts_with_any(QUIRKS_PUBLIC_ID_PREFIXES)
        {
            return koala_dom::QuirksMode::Quirks;
        }

        if starts_with_any(LIMITED_QUIRKS_PUBLIC_ID_PREFIXES) {
            return koala_dom::QuirksMode::LimitedQuirks;
        }

        koala_dom::QuirksMode::NoQuirks
    }

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#current-node)
    ///
    /// "The current node is the bottommost node in this stack of open elements."
    fn current_node(&self) -> Option<NodeId> {
        self.stack_of_open_elements.last().copied()
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
    ///
    /// "The adjusted insertion location is the current node, if the stack
    /// of open elements is not empty."
    ///
    /// The foster-parenting branch of this algorithm lives in
    /// [`Self::insert_node`] and [`Self::foster_parent_location`], which
    /// call this only when foster parenting does not apply.
    fn insertion_location(&self) -> NodeId {
        self.current_node().unwrap_or(NodeId::ROOT)
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node, foster-parenting branch](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// "If foster parenting is enabled and the last element of the stack of
    /// open elements is one of table, tbody, tfoot, thead, or tr, then..."
    /// find the last such "table" element in the stack; if it has a parent,
    /// the foster parent is that parent and the insertion point is
    /// immediately before the table. Otherwise the foster parent is the
    /// element immediately above it on the stack of open elements.
    fn foster_parent_location(&self) -> (NodeId, Option<NodeId>) {
        let Some(last_table_pos) = self
            .stack_of_open_elements
            .iter()
            .rposition(|&id| self.get_tag_name(id) == Some("table"))
        else {
            // "If there is no table element in the stack of open elements,
            // the foster parent element is the first element in the stack"
            let first = self.stack_of_open_elements.first().copied().unwrap_or(NodeId::ROOT);
            return (first, None);
        };

        let table_id = self.stack_of_open_elements[last_table_pos];
        if let Some(parent) = self.tree.parent(table_id) {
            return (parent, Some(table_id));
        }

        let above = self
            .stack_of_open_elements
            .get(last_table_pos.wrapping_sub(1))
            .copied()
            .unwrap_or(table_id);
        (above, None)
    }

    /// Insert a node at the appropriate place for inserting a node, honouring
    /// the foster-parenting flag.
    ///
    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    fn insert_node(&mut self, node_id: NodeId) {
        if self.foster_parenting
            && matches!(self.current_node().and_then(|id| self.get_tag_name(id)), Some("table" | "tbody" | "tfoot" | "thead" | "tr"))
        {
            let (parent, before) = self.foster_parent_location();
            self.tree.insert_before(parent, node_id, before);
        } else {
            let parent_id = self.insertion_location();
            self.append_child(parent_id, node_id);
        }
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#creating-and-inserting-nodes)
    ///
    /// Convert token attributes to the AttributesMap used by ElementData.
    fn attributes_to_map(attributes: &[Attribute]) -> AttributesMap {
        attributes
            .iter()
            .map(|attr| (attr.name.clone(), attr.value.clone()))
            .collect()
    }

    /// [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#create-an-element-for-the-token)
    ///
    /// "Create an element for a token"
    ///
    /// Creates a new element node in the DOM arena.
    /// NOTE: This is a simplified version; full algorithm handles namespaces,
    /// custom elements, and the "will execute script" flag.
    fn create_element(&mut self, tag_name: &str, attributes: &[Attribute]) -> NodeId {
        self.tree.alloc(NodeType::Element(ElementData {
            tag_name: tag_name.to_string(),
            attrs: Self::attributes_to_map(attributes),
        }))
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// Create a Text node with the given data.
    fn create_text_node(&mut self, data: String) -> NodeId {
        self.tree.alloc(NodeType::Text(data))
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// Create a Comment node with the given data.
    fn create_comment_node(&mut self, data: String) -> NodeId {
        self.tree.alloc(NodeType::Comment(data))
    }

    /// [§ 4.2.2 Append](https://dom.spec.whatwg.org/#concept-node-append)
    ///
    /// "To append a node to a parent, pre-insert node into parent before null."
    fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) {
        self.tree.append_child(parent_id, child_id);
    }

    /// [§ 13.2.6.1 Insert a character](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-character)
    ///
    /// "When the steps below require the user agent to insert a character
    /// while processing a token, the user agent must run the following steps..."
    fn insert_character(&mut self, c: char) {
        // STEP 1: "Let the adjusted insertion location be the appropriate place
        //         for inserting a node."
        let (parent_id, before) = if self.foster_parenting
            && matches!(
                self.current_node().and_then(|id| self.get_tag_name(id)),
                Some("table" | "tbody" | "tfoot" | "thead" | "tr")
            ) {
            self.foster_parent_location()
        } else {
            (self.insertion_location(), None)
        };

        // STEP 2: "If there is a Text node immediately before the adjusted
        //         insertion location, then append data to that Text node's data."
        let preceding = before.map_or_else(
            || self.tree.children(parent_id).last().copied(),
            |anchor| {
                let siblings = self.tree.children(parent_id);
                let anchor_pos = siblings.iter().position(|&id| id == anchor)?;
                anchor_pos.checked_sub(1).map(|i| siblings[i])
            },
        );
        if let Some(last_child_id) = preceding {
            if let Some(arena_node) = self.tree.get_mut(last_child_id) {
                if let NodeType::Text(ref mut text_data) = arena_node.node_type {
                    text_data.push(c);
                    return;
                }
            }
        }

        // STEP 3: "Otherwise, create a new Text node whose data is data and
        //         whose node document is the same as that of the element in
        //         which the adjusted insertion location finds itself, and
        //         insert the newly created node at the adjusted insertion location."
        let text_id = self.create_text_node(c.to_string());
        self.tree.insert_before(parent_id, text_id, before);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// "When the steps below require the user agent to insert a comment
    /// while processing a comment token, optionally with an explicitly
    /// insertion position position..."
    fn insert_comment(&mut self, data: &str) {
        if !self.include_comments {
            return;
        }
        // STEP 1: "Create a Comment node..."
        let comment_id = self.create_comment_node(data.to_string());
        // STEP 2: "Insert the newly created node at the adjusted insertion
        //         location", honouring foster parenting.
        self.insert_node(comment_id);
    }

    /// [§ 13.2.6.1 Insert a comment](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-comment)
    ///
    /// Insert a comment as the last child of the Document node.
    /// Used for comments that appear after </html>.
    fn insert_comment_to_document(&mut self, data: &str) {
        if !self.include_comments {
            return;
        }
        let comment_id = self.create_comment_node(data.to_string());
        self.append_child(NodeId::ROOT, comment_id);
    }

    /// [§ 13.2.6.1 Insert an HTML element](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
    ///
    /// "When the steps below require the user agent to insert an HTML element
    /// for a token, the user agent must insert a foreign element for the token,
    /// in the HTML namespace."
    fn insert_html_element(&mut self, token: &Token) -> NodeId {
        if let Token::StartTag {
            name, attributes, ..
        } = token
        {
            // STEP 1: "Create an element for the token"
            let element_id = self.create_element(name, attributes);

            // STEP 2-3: "Let the adjusted insertion location be the appropriate
            //         place for inserting a node. Append the new element
            //         there", honouring foster parenting.
            self.insert_node(element_id);

            // STEP 4: "Push the element onto the stack of open elements."
            self.stack_of_open_elements.push(element_id);

            element_id
        } else {
            panic!("insert_html_element called with non-StartTag token");
        }
    }

    /// [§ 13.2.4.3 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Get the tag name of a node (local name of the element).
    fn get_tag_name(&self, id: NodeId) -> Option<&str> {
        self.tree.as_element(id).map(|data| data.tag_name.as_str())
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#the-stack-of-open-elements)
    ///
    /// Pop elements from the stack of open elements until we find one
    /// with the given tag name (inclusive). This is a common operation
    /// referenced throughout § 13.2.6 tree construction.
    ///
    /// STEP 1: Pop the current node from the stack.
    /// STEP 2: If popped node matches target tag name, stop.
    /// STEP 3: Otherwise, repeat from STEP 1.
    fn pop_until_tag(&mut self, tag_name: &str) {
        while let Some(id) = self.pop_open_element() {
            // STEP 2: Check if we've reached the target element
            if self.get_tag_name(id) == Some(tag_name) {
                break;
            }
            // STEP 3: Continue popping
        }
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// Pop elements until one of the given tag names is found (inclusive).
    ///
    /// Used for heading elements per spec: "If the stack of open elements has
    /// an h1, h2, h3, h4, h5, or h6 element in scope, then...pop elements from
    /// the stack of open elements until an h1, h2, h3, h4, h5, or h6 element
    /// has been popped from the stack."
    ///
    /// STEP 1: Pop the current node from the stack.
    /// STEP 2: If popped node matches any target tag name, stop.
    /// STEP 3: Otherwise, repeat from STEP 1.
    fn pop_until_one_of(&mut self, tag_names: &[&str]) {
        while let Some(idx) = self.pop_open_element() {
            if let Some(name) = self.get_tag_name(idx) {
                // STEP 2: Check if we've reached any of the target elements
                if tag_names.contains(&name) {
                    break;
                }
            }
            // STEP 3: Continue popping
        }
    }

    /// [§ 13.2.4.2 The stack of open elements](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    ///
    /// "The stack of open elements is said to have an element target node in a
    /// specific scope consisting of a list of element types list when the
    /// following algorithm terminates in a match state:"
    ///
    /// STEP 1: "Initialize node to be the current node (the bottommost node
    ///          of the stack)."
    ///
    /// STEP 2: "If node is the target node, terminate in a match state."
    ///
    /// STEP 3: "Otherwise, if node is one of the element types in list,
    ///          terminate in a failure state."
    ///
    /// STEP 4: "Otherwise, set node to the previous entry in the stack of
    ///          open elements and return to step 2."
    ///
    /// The scope markers for "has an element in scope" (default scope) are:
    /// - applet, caption, html, table, td, th, marquee, object, template
    /// - MathML: mi, mo, mn, ms, mtext, annotation-xml
    /// - SVG: foreignObject, desc, title
    ///
    /// Other scope types add additional markers:
    /// - "has an element in list item scope": adds ol, ul
    /// - "has an element in button scope": adds button
    /// - "has an element in table scope": html, table, template only
    /// - "has an element in select scope": optgroup, option only (inverted)
    ///
    const DEFAULT_SCOPE_MARKERS: &'static [&'static str] = &[
        "applet", "caption", "html", "table", "td", "th", "marquee", "object", "template", "mi",
        "mo", "mn", "ms", "mtext", "annotation-xml", "foreignObject", "desc", "title",
    ];

    const TABLE_SCOPE_MARKERS: &'static [&'static str] = &["html", "table", "template"];

    /// Generic "has an element in a specific scope" per
    /// [§ 13.2.4.2](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-the-specific-scope).
    ///
    /// Walks the stack of open elements from the top down; returns true if
    /// `tag_name` is reached before any element in `markers`.
    fn has_element_in_specific_scope(&self, tag_name: &str, markers: &[&str]) -> bool {
        for &idx in self.stack_of_open_elements.iter().rev() {
            let Some(node_tag) = self.get_tag_name(idx) else {
                continue;
            };
            if node_tag == tag_name {
                return true;
            }
            if markers.contains(&node_tag) {
                return false;
            }
        }
        false
    }

    /// [§ 13.2.4.2 Has an element in scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-scope)
    fn has_element_in_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, Self::DEFAULT_SCOPE_MARKERS)
    }

    /// [§ 13.2.4.2 Has an element in button scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-button-scope)
    fn has_element_in_button_scope(&self, tag_name: &str) -> bool {
        let mut markers = Self::DEFAULT_SCOPE_MARKERS.to_vec();
        markers.push("button");
        self.has_element_in_specific_scope(tag_name, &markers)
    }

    /// [§ 13.2.4.2 Has an element in list item scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-list-item-scope)
    fn has_element_in_list_item_scope(&self, tag_name: &str) -> bool {
        let mut markers = Self::DEFAULT_SCOPE_MARKERS.to_vec();
        markers.push("ol");
        markers.push("ul");
        self.has_element_in_specific_scope(tag_name, &markers)
    }

    /// [§ 13.2.4.2 Has an element in table scope](https://html.spec.whatwg.org/multipage/parsing.html#has-an-element-in-table-scope)
    fn has_element_in_table_scope(&self, tag_name: &str) -> bool {
        self.has_element_in_specific_scope(tag_name, Self::TABLE_SCOPE_MARKERS)
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// This helper combines two spec operations commonly used together:
    ///
    /// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    /// "While the current node is a dd, dt, li, optgroup, option, p, rb, rp, rt,
    ///  or rtc element, the UA must pop the current node off the stack."
    ///
    /// Then: Check if element is in scope and pop until found.
    ///
    /// Used for elements like <li>, <p>, <dd>, <dt> that implicitly close
    /// when a new one is encountered.
    ///
    const IMPLIED_END_TAG_ELEMENTS: &'static [&'static str] =
        &["dd", "dt", "li", "optgroup", "option", "p", "rb", "rp", "rt", "rtc"];

    /// [§ 13.2.6.2 Generate implied end tags](https://html.spec.whatwg.org/multipage/parsing.html#generate-implied-end-tags)
    ///
    /// "While the current node is a dd, dt, li, optgroup, option, p, rb, rp,
    /// rt, or rtc element, the UA must pop the current node off the stack of
    /// open elements." `exclude` names an element that must not be popped
    /// even if it matches.
    fn generate_implied_end_tags(&mut self, exclude: Option<&str>) {
        while let Some(&current) = self.stack_of_open_elements.last() {
            let Some(tag) = self.get_tag_name(current) else {
                break;
            };
            if Some(tag) == exclude || !Self::IMPLIED_END_TAG_ELEMENTS.contains(&tag) {
                break;
            }
            let _ = self.pop_open_element();
        }
    }

    /// [§ 13.2.6.2 Close a p element](https://html.spec.whatwg.org/multipage/parsing.html#close-a-p-element)
    ///
    /// "Generate implied end tags, except for p elements. ... Pop elements
    /// from the stack of open elements until a p element has been popped
    /// from the stack."
    fn close_a_p_element(&mut self) {
        self.generate_implied_end_tags(Some("p"));
        self.pop_until_tag("p");
    }

    fn close_element_if_in_scope(&mut self, tag_name: &str) {
        // STEP 1: Check if element is in (button) scope.
        if self.has_element_in_button_scope(tag_name) {
            if tag_name == "p" {
                self.close_a_p_element();
            } else {
                self.generate_implied_end_tags(Some(tag_name));
                self.pop_until_tag(tag_name);
            }
        }
    }
    /// [§ 13.2.4.3 Reconstruct the active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
    ///
    /// "When the steps below require the UA to reconstruct the active formatting
    /// elements, the UA must perform the following steps:"
    ///
    /// This algorithm has two phases:
    /// - Rewind phase (steps 4-6): Walk backwards to find where to start
    /// - Create phase (steps 7-10): Walk forwards, creating elements
    fn reconstruct_active_formatting_elements(&mut self) {
        // STEP 1: "If there are no entries in the list of active formatting
        //          elements, then there is nothing to reconstruct; stop this
        //          algorithm."
        if self.active_formatting_elements.is_empty() {
            return;
        }

        // STEP 2: "If the last (most recently added) entry in the list of active
        //          formatting elements is a marker, or if it is an element that
        //          is in the stack of open elements, then there is nothing to
        //          reconstruct; stop this algorithm."
        if let Some(last) = self.active_formatting_elements.last() {
            match last {
                ActiveFormattingElement::Marker => return,
                ActiveFormattingElement::Element { node_id, .. } => {
                    if self.stack_of_open_elements.contains(node_id) {
                        return;
                    }
                }
            }
        }

        // STEP 3: "Let entry be the last (most recently added) element in the
        //          list of active formatting elements."
        let mut entry_index = self.active_formatting_elements.len() - 1;

        // STEP 4-6: Rewind phase
        // "Rewind: If there are no entries before entry in the list of active
        //  formatting elements, then jump to the step labeled create."
        loop {
            // STEP 4: If at the beginning, jump to create (don't decrement)
            if entry_index == 0 {
                break;
            }

            // STEP 5: "Let entry be the entry one earlier than entry in the list
            //          of active formatting elements."
            entry_index -= 1;

            // STEP 6: "If entry is neither a marker nor an element that is also
            //          in the stack of open elements, go to the step labeled rewind."
            match &self.active_formatting_elements[entry_index] {
                ActiveFormattingElement::Marker => {
                    // Found marker, advance one position and start creating
                    entry_index += 1;
                    break;
                }
                ActiveFormattingElement::Element { node_id, .. } => {
                    if self.stack_of_open_elements.contains(node_id) {
                        // Found element in stack, advance one position and start creating
                        entry_index += 1;
                        break;
                    }
                    // Otherwise continue rewinding (implicit via loop)
                }
            }
        }

        // STEP 7-10: Create phase (advance and create loop)
        // "Advance: Let entry be the element one later than entry in the list
        //  of active formatting elements."
        loop {
            // STEP 8: "Create: Insert an HTML element for the token for which
            //          the element entry was created, to obtain new element."
            //
            // Clone the token first to avoid borrow checker issues
            let token = match &self.active_formatting_elements[entry_index] {
                ActiveFormattingElement::Element { token, .. } => token.clone(),
                ActiveFormattingElement::Marker => {
                    // Shouldn't happen after rewind, but handle gracefully
                    entry_index += 1;
                    if entry_index >= self.active_formatting_elements.len() {
                        break;
                    }
                    continue;
                }
            };

            let new_element_id = self.insert_html_element(&token);

            // STEP 9: "Replace the entry for entry in the list with an entry
            //          for new element."
            self.active_formatting_elements[entry_index] = ActiveFormattingElement::Element {
                node_id: new_element_id,
                token,
            };

            // STEP 10: "If the entry for new element in the list of active
            //           formatting elements is not the last entry in the list,
            //           return to the step labeled advance."
            entry_index += 1;
            if entry_index >= self.active_formatting_elements.len() {
                break;
            }
        }
    }

    /// [§ 13.2.4.3 The list of active formatting elements, "Noah's Ark clause"](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
    ///
    /// "If there are already three elements in the list of active formatting
    /// elements after the last marker, if any, or anywhere in the list if
    /// there is no marker, that have the same tag name, namespace, and
    /// attributes as element, then remove the earliest such element from
    /// the list."
    ///
    /// Followed by "Insert the new element into the list of active
    /// formatting elements."
    fn push_active_formatting_element(&mut self, node_id: NodeId, token: Token) {
        let Some(tag_name) = self.get_tag_name(node_id).map(str::to_string) else {
            return;
        };
        let attrs = self.tree.as_element(node_id).map(|data| data.attrs.clone());

        let matches_last_marker = self
            .active_formatting_elements
            .iter()
            .rev()
            .take_while(|entry| !matches!(entry, ActiveFormattingElement::Marker))
            .filter(|entry| match entry {
                ActiveFormattingElement::Element { node_id: existing, .. } => {
                    self.get_tag_name(*existing) == Some(tag_name.as_str())
                        && self.tree.as_element(*existing).map(|data| &data.attrs) == attrs.as_ref()
                }
                ActiveFormattingElement::Marker => false,
            })
            .count();

        if matches_last_marker >= 3 {
            if let Some(earliest) = self
                .active_formatting_elements
                .iter()
                .position(|entry| match entry {
                    ActiveFormattingElement::Element { node_id: existing, .. } => {
                        self.get_tag_name(*existing) == Some(tag_name.as_str())
                            && self.tree.as_element(*existing).map(|data| &data.attrs) == attrs.as_ref()
                    }
                    ActiveFormattingElement::Marker => false,
                })
            {
                let _ = self.active_formatting_elements.remove(earliest);
            }
        }

        self.active_formatting_elements.push(ActiveFormattingElement::Element { node_id, token });
    }

    /// [§ 13.2.4.3 Clear the list of active formatting elements up to the last marker](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-list-of-active-formatting-elements-up-to-the-last-marker)
    fn clear_active_formatting_elements_to_last_marker(&mut self) {
        while let Some(entry) = self.active_formatting_elements.pop() {
            if matches!(entry, ActiveFormattingElement::Marker) {
                break;
            }
        }
    }

    /// [§ 13.2.6.4.7 Special category](https://html.spec.whatwg.org/multipage/parsing.html#special)
    ///
    /// "The following elements have varying levels of special parsing rules"
    /// — used by the adoption agency algorithm to find the "furthest block".
    const SPECIAL_ELEMENTS: &'static [&'static str] = &[
        "address", "applet", "area", "article", "aside", "base", "basefont", "bgsound",
        "blockquote", "body", "br", "button", "caption", "center", "col", "colgroup", "dd",
        "details", "dir", "div", "dl", "dt", "embed", "fieldset", "figcaption", "figure",
        "footer", "form", "frame", "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "head",
        "header", "hgroup", "hr", "html", "iframe", "img", "input", "keygen", "li", "link",
        "listing", "main", "marquee", "menu", "meta", "nav", "noembed", "noframes", "noscript",
        "object", "ol", "optgroup", "option", "p", "param", "plaintext", "pre", "script",
        "section", "select", "source", "style", "summary", "table", "tbody", "td", "template",
        "textarea", "tfoot", "th", "thead", "title", "tr", "track", "ul", "wbr", "xmp", "mi",
        "mo", "mn", "ms", "mtext", "annotation-xml", "foreignObject", "desc",
    ];

    fn is_special_element(&self, id: NodeId) -> bool {
        self.get_tag_name(id).is_some_and(|tag| Self::SPECIAL_ELEMENTS.contains(&tag))
    }

    /// The position of `id` in the list of active formatting elements, if
    /// it names an [`ActiveFormattingElement::Element`] entry there.
    fn formatting_element_index(&self, id: NodeId) -> Option<usize> {
        self.active_formatting_elements.iter().position(|entry| {
            matches!(entry, ActiveFormattingElement::Element { node_id, .. } if *node_id == id)
        })
    }

    /// The last entry in the list of active formatting elements, before the
    /// last marker, whose tag name is `tag_name`; `None` if there is none
    /// (the search stops at the first marker encountered, per
    /// [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)).
    fn last_formatting_element_since_marker(&self, tag_name: &str) -> Option<(usize, NodeId)> {
        self.active_formatting_elements
            .iter()
            .enumerate()
            .rev()
            .take_while(|(_, entry)| !matches!(entry, ActiveFormattingElement::Marker))
            .find_map(|(index, entry)| match entry {
                ActiveFormattingElement::Element { node_id, .. }
                    if self.get_tag_name(*node_id) == Some(tag_name) =>
                {
                    Some((index, *node_id))
                }
                _ => None,
            })
    }

    /// [§ 13.2.6.4.7 "in body" - Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// The fallback walk used both directly (non-formatting end tags) and by
    /// the adoption agency algorithm when no matching formatting element is
    /// found on the list of active formatting elements.
    fn any_other_end_tag(&mut self, tag_name: &str) {
        for index in (0..self.stack_of_open_elements.len()).rev() {
            let node = self.stack_of_open_elements[index];
            if self.get_tag_name(node) == Some(tag_name) {
                self.generate_implied_end_tags(Some(tag_name));
                // "Pop all the nodes from the current node up to node,
                // including node, then stop."
                while self.stack_of_open_elements.len() > index {
                    let _ = self.pop_open_element();
                }
                return;
            }
            if self.is_special_element(node) {
                // "parse error; ignore the token."
                return;
            }
        }
    }

    /// [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm)
    ///
    /// Handles misnested formatting elements, e.g. `<b>1<p>2</b>3` closes
    /// `<b>` but reopens an equivalent element around the text that follows
    /// inside `<p>`. `tag_name` is the end tag's name (the algorithm's
    /// "subject").
    fn run_adoption_agency(&mut self, tag_name: &str) {
        // STEP 1: "If the current node... has the same tag name as the
        // subject, and the current node is not in the list of active
        // formatting elements, then pop the current node off the stack of
        // open elements, and return."
        if let Some(&current) = self.stack_of_open_elements.last() {
            if self.get_tag_name(current) == Some(tag_name)
                && self.formatting_element_index(current).is_none()
            {
                let _ = self.pop_open_element();
                return;
            }
        }

        let mut outer_loop_counter = 0;
        loop {
            // STEP 2-3: "If outer loop counter is greater than or equal to
            // 8, then return."
            if outer_loop_counter >= 8 {
                return;
            }
            outer_loop_counter += 1;

            // STEP 4-5: "Let formatting element be the last element in the
            // list of active formatting elements that... has the tag name
            // subject... If there is no such element, then return and
            // instead act as described in the 'any other end tag' entry."
            let Some((fe_list_index, formatting_element)) =
                self.last_formatting_element_since_marker(tag_name)
            else {
                self.any_other_end_tag(tag_name);
                return;
            };

            let Some(fe_stack_index) =
                self.stack_of_open_elements.iter().position(|&id| id == formatting_element)
            else {
                // STEP 6: "If formatting element is not in the stack of open
                // elements, then this is a parse error; remove the element
                // from the list, and return."
                self.active_formatting_elements.remove(fe_list_index);
                return;
            };

            // STEP 7: "If formatting element is in the stack of open
            // elements, but the element is not in scope, then this is a
            // parse error; return."
            if !self.has_element_in_scope(tag_name) {
                return;
            }

            // STEP 8: "If formatting element is not the current node, this
            // is a parse error. (But do not return.)"

            // STEP 9: "Let furthest block be the topmost node in the stack
            // of open elements that is lower in the stack than formatting
            // element, and is an element in the special category."
            let furthest_block = self.stack_of_open_elements[fe_stack_index + 1..]
                .iter()
                .copied()
                .find(|&id| self.is_special_element(id));

            let Some(furthest_block) = furthest_block else {
                // STEP 10: "If there is no furthest block, then the UA must
                // first pop all the nodes from the bottom of the stack of
                // open elements, from the current node up to and including
                // formatting element, then remove formatting element from
                // the list of active formatting elements, and return."
                while self.stack_of_open_elements.len() > fe_stack_index {
                    let _ = self.pop_open_element();
                }
                self.active_formatting_elements.remove(fe_list_index);
                return;
            };

            // STEP 11: "Let common ancestor be the element immediately
            // above formatting element in the stack of open elements."
            let common_ancestor = if fe_stack_index == 0 {
                NodeId::ROOT
            } else {
                self.stack_of_open_elements[fe_stack_index - 1]
            };

            // STEP 12: "Let a bookmark note the position of formatting
            // element in the list of active formatting elements relative to
            // the elements on either side of it in the list."
            let mut bookmark = fe_list_index;

            // STEP 13: "Let node and last node be furthest block."
            //
            // `node_index` tracks `node`'s position in the stack of open
            // elements directly (rather than re-finding it by id each pass):
            // once an element is removed or replaced in place, searching by
            // id again is ambiguous, whereas the index walk below only ever
            // moves monotonically toward `formatting_element` and removals
            // only ever happen at or above the current index, so indices
            // below it stay valid.
            let mut node_index =
                self.stack_of_open_elements.iter().position(|&id| id == furthest_block).unwrap_or(fe_stack_index);
            let mut last_node = furthest_block;

            // STEP 14: "Let inner loop counter be 0."
            let mut inner_loop_counter = 0;

            loop {
                // STEP 14.1: "Increment inner loop counter."
                inner_loop_counter += 1;

                // STEP 14.2: "Let node be the element immediately above
                // node in the stack of open elements."
                if node_index == 0 {
                    break;
                }
                node_index -= 1;
                let node = self.stack_of_open_elements[node_index];

                // STEP 14.3: "If node is formatting element, then break."
                if node == formatting_element {
                    break;
                }

                // STEP 14.4: "If inner loop counter is greater than 3 and
                // node is in the list of active formatting elements, then
                // remove node from the list."
                if inner_loop_counter > 3 {
                    if let Some(idx) = self.formatting_element_index(node) {
                        self.active_formatting_elements.remove(idx);
                        if idx < bookmark {
                            bookmark = bookmark.saturating_sub(1);
                        }
                    }
                }

                // STEP 14.5: "If node is not in the list of active
                // formatting elements, then remove node from the stack of
                // open elements and continue."
                let Some(node_fe_index) = self.formatting_element_index(node) else {
                    self.stack_of_open_elements.remove(node_index);
                    continue;
                };

                // STEP 14.6: "Create an element for the token for which
                // node was created, in the HTML namespace, with common
                // ancestor as the intended parent; replace the entry for
                // node in the list of active formatting elements with an
                // entry for the new element; replace the entry for node in
                // the stack of open elements with an entry for the new
                // element."
                let Some(ActiveFormattingElement::Element { token: node_token, .. }) =
                    self.active_formatting_elements.get(node_fe_index).cloned()
                else {
                    continue;
                };
                let new_node = if let Token::StartTag { name, attributes, .. } = &node_token {
                    self.create_element(name, attributes)
                } else {
                    continue;
                };
                self.active_formatting_elements[node_fe_index] = ActiveFormattingElement::Element {
                    node_id: new_node,
                    token: node_token,
                };
                self.stack_of_open_elements[node_index] = new_node;

                // STEP 14.7: "If last node is furthest block, then move the
                // bookmark to be immediately after the new node in the list
                // of active formatting elements."
                if last_node == furthest_block {
                    bookmark = node_fe_index + 1;
                }

                // STEP 14.8: "Insert last node into new node, first removing
                // it from its previous parent node if any."
                self.tree.detach(last_node);
                self.tree.append_child(new_node, last_node);

                // STEP 14.9: "Let last node be node."
                last_node = new_node;
            }

            // STEP 15: "Insert whatever last node ended up being, in the
            // last step above, into common ancestor, in the appropriate
            // place for inserting a node, but using common ancestor as the
            // override target."
            self.tree.detach(last_node);
            self.insert_node_with_override_target(common_ancestor, last_node);

            // STEP 16: "Create an element for the token for which
            // formatting element was created, in the HTML namespace, with
            // furthest block as the intended parent."
            let Some(ActiveFormattingElement::Element { token: fe_token, .. }) =
                self.formatting_element_index(formatting_element).and_then(|idx| self.active_formatting_elements.get(idx).cloned())
            else {
                return;
            };
            let new_element = if let Token::StartTag { name, attributes, .. } = &fe_token {
                self.create_element(name, attributes)
            } else {
                return;
            };

            // STEP 17: "Take all of the child nodes of furthest block and
            // append them to the new element."
            let children: Vec<NodeId> = self.tree.children(furthest_block).to_vec();
            for child in children {
                self.tree.detach(child);
                self.tree.append_child(new_element, child);
            }

            // STEP 18: "Append that new element to furthest block."
            self.tree.append_child(furthest_block, new_element);

            // STEP 19: "Remove formatting element from the list of active
            // formatting elements, and insert the new element into the list
            // of active formatting elements at the position of the
            // aforementioned bookmark."
            if let Some(idx) = self.formatting_element_index(formatting_element) {
                self.active_formatting_elements.remove(idx);
                if idx < bookmark {
                    bookmark = bookmark.saturating_sub(1);
                }
            }
            let bookmark = bookmark.min(self.active_formatting_elements.len());
            self.active_formatting_elements.insert(
                bookmark,
                ActiveFormattingElement::Element { node_id: new_element, token: fe_token },
            );

            // STEP 20: "Remove formatting element from the stack of open
            // elements, and insert the new element into the stack of open
            // elements immediately below the position of furthest block in
            // that stack."
            self.stack_of_open_elements.retain(|&id| id != formatting_element);
            let Some(insert_at) = self.stack_of_open_elements.iter().position(|&id| id == furthest_block) else {
                return;
            };
            self.stack_of_open_elements.insert(insert_at + 1, new_element);

            // STEP 21: "Go to step 2 of the outer loop."
        }
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// The override-target variant used by the adoption agency algorithm:
    /// the foster-parenting check is made against `target` rather than the
    /// current node.
    fn insert_node_with_override_target(&mut self, target: NodeId, node_id: NodeId) {
        if self.foster_parenting
            && matches!(self.get_tag_name(target), Some("table" | "tbody" | "tfoot" | "thead" | "tr"))
        {
            let (parent, before) = self.foster_parent_location();
            self.tree.insert_before(parent, node_id, before);
        } else {
            self.tree.append_child(target, node_id);
        }
    }

    /// [§ 13.2.6.4.1 The "initial" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-initial-insertion-mode)
    fn handle_initial_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_to_document(data);
            }

            // "A DOCTYPE token"
            // "If the DOCTYPE token's name is not "html", or the token's public identifier is not
            // missing, or the token's system identifier is neither missing nor "about:legacy-compat",
            // then there is a parse error."
            // "Append a DocumentType node to the Document node, with its name set to the name
            // given in the DOCTYPE token... Then, if the document is not an iframe srcdoc
            // document, and the parser cannot change the mode flag is false, set the Document
            // to quirks mode / limited-quirks mode per the rules given in the definition of the
            // quirks mode..."
            // "Then, switch the insertion mode to "before html"."
            Token::Doctype {
                name,
                public_identifier,
                system_identifier,
                force_quirks,
            } => {
                self.tree.set_doctype(koala_dom::DoctypeInfo {
                    name: name.clone().unwrap_or_default(),
                    public_id: public_identifier.clone().unwrap_or_default(),
                    system_id: system_identifier.clone().unwrap_or_default(),
                });
                self.tree.set_quirks_mode(Self::quirks_mode_for_doctype(
                    name.as_deref(),
                    public_identifier.as_deref(),
                    system_identifier.as_deref(),
                    *force_quirks,
                ));
                self.insertion_mode = InsertionMode::BeforeHtml;
            }

            // "Anything else"
            // "If the document is not an iframe srcdoc document, then this is a parse error;
            // if the parser cannot change the mode flag is false, set the Document to quirks mode."
            // "In any case, switch the insertion mode to "before html", then reprocess the token."
            _ => {
                self.insertion_mode = InsertionMode::BeforeHtml;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    fn handle_before_html_mode(&mut self, token: &Token) {
        match token {
            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {}

            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_to_document(data);
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => {}

            // "A start tag whose tag name is "html""
            // "Create an element for the token in the HTML namespace, with the Document as the
            // intended parent. Append it to the Document object. Put this element in the stack
            // of open elements."
            // ...
            // "Switch the insertion mode to "before head"."
            Token::StartTag {
                name, attributes, ..
            } if name == "html" => {
                let html_idx = self.create_element(name, attributes);
                self.append_child(NodeId::ROOT, html_idx);
                self.stack_of_open_elements.push(html_idx);
                self.insertion_mode = InsertionMode::BeforeHead;
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.handle_before_html_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {}

            // "Anything else"
            _ => {
                self.handle_before_html_anything_else(token);
            }
        }
    }

    /// [§ 13.2.6.4.2 The "before html" insertion mode - Anything else](https://html.spec.whatwg.org/multipage/parsing.html#the-before-html-insertion-mode)
    ///
    /// "Anything else":
    /// "Create an html element whose node document is the Document object.
    /// Append it to the Document object. Put this element in the stack of
    /// open elements. Switch the insertion mode to "before head", then
    /// reprocess the token."
    fn handle_before_html_anything_else(&mut self, token: &Token) {
        // STEP 1: "Create an html element whose node document is the Document object."
        let html_idx = self.create_element("html", &[]);

        // STEP 2: "Append it to the Document object."
        self.append_child(NodeId::ROOT, html_idx);

        // STEP 3: "Put this element in the stack of open elements."
        self.stack_of_open_elements.push(html_idx);

        // STEP 4: "Switch the insertion mode to 'before head'."
        self.insertion_mode = InsertionMode::BeforeHead;

        // STEP 5: "Reprocess the token."
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    fn handle_before_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Ignore the token."
            Token::Character { data } if Self::is_whitespace(*data) => {}

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {}

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }

            // "A start tag whose tag name is "head""
            // "Insert an HTML element for the token."
            // "Set the head element pointer to the newly created head element."
            // "Switch the insertion mode to "in head"."
            Token::StartTag { name, .. } if name == "head" => {
                let head_idx = self.insert_html_element(token);
                self.head_element_pointer = Some(head_idx);
                self.insertion_mode = InsertionMode::InHead;
            }

            // "An end tag whose tag name is one of: "head", "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "head" | "body" | "html" | "br") =>
            {
                self.handle_before_head_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {}

            // "Anything else"
            _ => {
                self.handle_before_head_anything_else(token);
            }
        }
    }

    /// [§ 13.2.6.4.3 The "before head" insertion mode - Anything else](https://html.spec.whatwg.org/multipage/parsing.html#the-before-head-insertion-mode)
    ///
    /// "Anything else":
    /// "Insert an HTML element for a "head" start tag token with no attributes.
    /// Set the head element pointer to the newly created head element.
    /// Switch the insertion mode to "in head". Reprocess the current token."
    fn handle_before_head_anything_else(&mut self, token: &Token) {
        // STEP 1: "Insert an HTML element for a 'head' start tag token with no attributes."
        let head_idx = self.create_element("head", &[]);
        let parent_idx = self.insertion_location();
        self.append_child(parent_idx, head_idx);
        self.stack_of_open_elements.push(head_idx);

        // STEP 2: "Set the head element pointer to the newly created head element."
        self.head_element_pointer = Some(head_idx);

        // STEP 3: "Switch the insertion mode to 'in head'."
        self.insertion_mode = InsertionMode::InHead;

        // STEP 4: "Reprocess the current token."
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    fn handle_in_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {}

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }

            // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link""
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            //
            // "A start tag whose tag name is "meta""
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            // ...
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base" | "basefont" | "bgsound" | "link" | "meta"
                ) =>
            {
                let _ = self.insert_html_element(token);
                let _ = self.pop_open_element();
            }

            // "A start tag whose tag name is "title""
            // "Follow the generic RCDATA element parsing algorithm."
            //
            // [§ 13.2.6.2 The generic RCDATA element parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#generic-rcdata-element-parsing-algorithm):
            // 1. "Insert an HTML element for the token."
            // 2. "If the parser was created as part of the HTML fragment parsing algorithm, then
            //     mark the script element as "already started"." (N/A)
            // 3. "Let the original insertion mode be the current insertion mode."
            // 4. "Switch the insertion mode to "text"."
            Token::StartTag { name, .. } if name == "title" => {
                let _ = self.insert_html_element(token);
                // "Let the original insertion mode be the current insertion mode."
                self.original_insertion_mode = Some(self.insertion_mode.clone());
                self.insertion_mode = InsertionMode::Text;
                // NOTE: The spec also says "Switch the tokenizer to the RCDATA state."
                // We don't have tokenizer integration, so we rely on the tokenizer
                // emitting character tokens that the Text mode will handle.
            }

            // "A start tag whose tag name is one of: "noframes", "style"" (unconditionally),
            // or "noscript" if the scripting flag is enabled.
            // "Follow the generic raw text element parsing algorithm."
            //
            // [§ 13.2.6.3 The generic raw text element parsing algorithm](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm):
            // 1. "Insert an HTML element for the token."
            // 2. "Let the original insertion mode be the current insertion mode."
            // 3. "Switch the insertion mode to "text"."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "style" | "noframes")
                    || (name == "noscript" && self.scripting) =>
            {
                let _ = self.insert_html_element(token);
                // "Let the original insertion mode be the current insertion mode."
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::Text;
                // NOTE: The tokenizer handles switching to RAWTEXT state for these elements
            }

            // "A start tag whose tag name is "noscript", if the scripting flag is disabled"
            // "Insert an HTML element for the token."
            // "Switch the insertion mode to "in head noscript"."
            Token::StartTag { name, .. } if name == "noscript" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InHeadNoscript;
            }

            // [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
            // "A start tag whose tag name is "script""
            // "Run these steps:"
            // 1-8. (Simplified) Insert an HTML element for the token.
            // 9. "Switch the tokenizer to the script data state."
            // 10. "Let the original insertion mode be the current insertion mode."
            // 11. "Switch the insertion mode to "text"."
            Token::StartTag { name, .. } if name == "script" => {
                let _ = self.insert_html_element(token);
                // "Let the original insertion mode be the current insertion mode."
                self.original_insertion_mode = Some(self.insertion_mode.clone());
                self.insertion_mode = InsertionMode::Text;
                // NOTE: The tokenizer handles switching to ScriptData state for script elements
            }

            // [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
            // "A start tag whose tag name is "template""
            //
            // Full spec requires:
            // 1. Insert an HTML element for the token.
            // 2. Insert a marker at the end of the list of active formatting elements.
            // 3. Set the frameset-ok flag to "not ok".
            // 4. Switch the insertion mode to "in template".
            // 5. Push "in template" onto the stack of template insertion modes.
            //
            // NOTE: InTemplate mode is not yet implemented. For now, we insert the element
            // and stay in current mode to avoid an infinite reprocessing loop. Template
            // content will be parsed as regular HTML content (incorrect per spec, but
            // prevents stack overflow).
            Token::StartTag { name, .. } if name == "template" => {
                let _ = self.insert_html_element(token);
                // TODO: Implement full template handling with InTemplate mode
            }

            // "An end tag whose tag name is "head""
            // "Pop the current node (which will be the head element) off the stack of open elements."
            // "Switch the insertion mode to "after head"."
            Token::EndTag { name, .. } if name == "head" => {
                let _ = self.pop_open_element();
                self.insertion_mode = InsertionMode::AfterHead;
            }

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.handle_in_head_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {}

            // "Anything else"
            _ => {
                self.handle_in_head_anything_else(token);
            }
        }
    }

    /// [§ 13.2.6.4.4 The "in head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inhead)
    ///
    /// "Anything else":
    /// "Pop the current node (which will be the head element) off the stack of open elements."
    /// "Switch the insertion mode to "after head"."
    /// "Reprocess the token."
    fn handle_in_head_anything_else(&mut self, token: &Token) {
        // STEP 1: "Pop the current node (which will be the head element)
        // off the stack of open elements."
        let _ = self.pop_open_element();

        // STEP 2: "Switch the insertion mode to "after head"."
        self.insertion_mode = InsertionMode::AfterHead;

        // STEP 3: "Reprocess the token."
        self.reprocess_token(token);
    }
    fn handle_in_head_noscript_mode(&mut self, token: &Token) {
        // A DOCTYPE token
        match token {
            Token::Doctype { .. } => {
                // TODO: Parse error. Ignore the token.
            }
            // A start tag whose tag name is "html"
            Token::StartTag { name, .. } if name == "html" => {
                // Process the token using the rules for the "in body" insertion mode.
                self.handle_in_body_mode(token);
            }
            // "An end tag whose tag name is "noscript""
            // "Pop the current node (which will be a noscript element) from the stack of
            //  open elements; the new current node will be a head element."
            // "Switch the insertion mode to "in head"."
            Token::EndTag { name, .. } if name == "noscript" => {
                let _ = self.pop_open_element();
                self.insertion_mode = InsertionMode::InHead;
            }

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            //  U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.handle_in_head_mode(token);
            }

            // "A comment token"
            // "Process the token using the rules for the "in head" insertion mode."
            Token::Comment { .. } => {
                self.handle_in_head_mode(token);
            }

            // "A start tag whose tag name is one of: "basefont", "bgsound", "link", "meta",
            //  "noframes", "style""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "basefont" | "bgsound" | "link" | "meta" | "noframes" | "style"
                ) =>
            {
                self.handle_in_head_mode(token);
            }

            // "An end tag whose tag name is "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if name == "br" => {
                // Pop the current node (which will be a noscript element) from the stack of open elements.
                let _ = self.pop_open_element();
                // Switch the insertion mode to "in head".
                self.insertion_mode = InsertionMode::InHead;
                // Reprocess the token.
                self.reprocess_token(token);
            }

            // "A start tag whose tag name is one of: "head", "noscript""
            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "head" | "noscript") => {
                // Parse error. Ignore the token.
            }
            Token::EndTag { .. } => {
                // Parse error. Ignore the token.
            }

            // Anything else
            _ => {
                // TODO: Parse error.

                // Pop the current node (which will be a noscript element) from the stack of open elements; the new current node will be a head element.
                let _ = self.pop_open_element();
                // Switch the insertion mode to "in head".
                self.insertion_mode = InsertionMode::InHead;
                // Reprocess the token.
                self.reprocess_token(token);
            }
        }
    }
    /// [§ 13.2.6.4.8 The "text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incdata)
    fn handle_text_mode(&mut self, token: &Token) {
        match token {
            // "A character token"
            // "Insert the character."
            Token::Character { data } => {
                self.insert_character(*data);
            }

            // "An end-of-file token"
            // "Parse error."
            // "If the current node is a script element, then set its already started to true."
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode and reprocess the token."
            Token::EndOfFile => {
                // Parse error (logged implicitly)
                let _ = self.pop_open_element();
                self.insertion_mode = self
                    .original_insertion_mode
                    .unwrap_or(InsertionMode::InBody);
                // NOTE: Spec says to reprocess, but EOF is terminal so we just switch mode.
            }

            // "An end tag whose tag name is "script""
            // (Complex script handling - not implemented)
            //
            // "Any other end tag"
            // "Pop the current node off the stack of open elements."
            // "Switch the insertion mode to the original insertion mode."
            Token::EndTag { .. } => {
                let _ = self.pop_open_element();
                self.insertion_mode = self
                    .original_insertion_mode
                    .unwrap_or(InsertionMode::InBody);
            }

            // NOTE: Start tags and other tokens should not appear in text mode
            // per the tokenizer's behavior. If they do, it indicates a bug.
            _ => {
                panic!(
                    "Unexpected token in Text mode: {:?}. This indicates a tokenizer or parser bug.",
                    token
                );
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    fn handle_after_head_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Insert the character."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.insert_character(*data);
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {}

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }

            // "A start tag whose tag name is "body""
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in body"."
            Token::StartTag { name, .. } if name == "body" => {
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InBody;
            }

            // "A start tag whose tag name is "head""
            // "Parse error. Ignore the token."
            Token::StartTag { name, .. } if name == "head" => {}

            // "An end tag whose tag name is one of: "body", "html", "br""
            // "Act as described in the "anything else" entry below."
            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "html" | "br") => {
                self.handle_after_head_anything_else(token);
            }

            // "Any other end tag"
            // "Parse error. Ignore the token."
            Token::EndTag { .. } => {}

            // "Anything else"
            _ => {
                self.handle_after_head_anything_else(token);
            }
        }
    }

    /// [§ 13.2.6.4.6 The "after head" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-head-insertion-mode)
    ///
    /// "Anything else":
    /// "Insert an HTML element for a "body" start tag token with no attributes."
    /// "Switch the insertion mode to "in body"."
    /// "Reprocess the current token."
    fn handle_after_head_anything_else(&mut self, token: &Token) {
        // STEP 1: "Insert an HTML element for a "body" start tag token with
        // no attributes."
        //
        // [§ 13.2.6.1 Creating and inserting nodes](https://html.spec.whatwg.org/multipage/parsing.html#insert-an-html-element)
        // We manually create the body element and insert it, since we don't
        // have a real "body" start tag token.
        let body_idx = self.create_element("body", &[]);
        let parent_idx = self.insertion_location();
        self.append_child(parent_idx, body_idx);
        self.stack_of_open_elements.push(body_idx);

        // STEP 2: "Switch the insertion mode to "in body"."
        self.insertion_mode = InsertionMode::InBody;

        // STEP 3: "Reprocess the current token."
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.7 The "in body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
    ///
    /// This is the main tree construction mode for document content. The spec
    /// organizes token handling as follows:
    ///
    /// - Character tokens (NULL, whitespace, other)
    /// - Comment tokens
    /// - DOCTYPE tokens (parse error, ignore)
    /// - Start tag tokens (html, base/link/meta, head, body, frameset, formatting
    ///   elements, block elements, void elements, etc.)
    /// - End tag tokens (body, html, block elements, formatting elements, etc.)
    /// - End-of-file token
    ///
    /// ## Implemented:
    /// - Block-level start/end tags (div, p, headings, lists, etc.)
    /// - Void elements (br, hr, img, etc.)
    /// - Character and comment insertion
    /// - Basic formatting tags (b, i, strong, em, etc.)
    ///
    /// ## Not Implemented:
    /// - [§ 13.2.4.3] List of active formatting elements
    /// - [§ 13.2.6.4.7] Adoption agency algorithm (for misnested formatting)
    /// - [§ 13.2.6.1] Foster parenting (for table content errors)
    /// - Form element pointer
    /// - Frameset handling
    /// - Template element handling
    fn handle_in_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is U+0000 NULL"
            // "Parse error. Ignore the token."
            Token::Character { data: '\0' } => {}

            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the character."
            //
            // "Any other character token"
            // "Reconstruct the active formatting elements, if any."
            // "Insert the character."
            // "Set the frameset-ok flag to "not ok"."
            Token::Character { data } => {
                self.reconstruct_active_formatting_elements();
                self.insert_character(*data);
                if !Self::is_whitespace(*data) {
                    self.frameset_ok = false;
                }
            }

            // "A comment token"
            // "Insert a comment."
            Token::Comment { data } => {
                self.insert_comment(data);
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {}

            // "A start tag whose tag name is "html""
            // "Parse error."
            // "If there is a template element on the stack of open elements, then ignore the token."
            // "Otherwise, for each attribute on the token, check to see if the attribute is already
            // present on the top element of the stack of open elements. If it is not, add the
            // attribute and its corresponding value to that element."
            Token::StartTag { name, .. } if name == "html" => {
                // Parse error. Simplified: ignore attribute merging.
            }

            // "A start tag whose tag name is one of: "address", "article", "aside", "blockquote",
            // "center", "details", "dialog", "dir", "div", "dl", "fieldset", "figcaption", "figure",
            // "footer", "header", "hgroup", "main", "menu", "nav", "ol", "p", "search", "section",
            // "summary", "ul""
            // "If the stack of open elements has a p element in button scope, then close a p element."
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "address"
                        | "article"
                        | "aside"
                        | "blockquote"
                        | "center"
                        | "details"
                        | "dialog"
                        | "dir"
                        | "div"
                        | "dl"
                        | "fieldset"
                        | "figcaption"
                        | "figure"
                        | "footer"
                        | "header"
                        | "hgroup"
                        | "main"
                        | "menu"
                        | "nav"
                        | "ol"
                        | "search"
                        | "section"
                        | "summary"
                        | "ul"
                ) =>
            {
                // "If the stack of open elements has a p element in button scope, then close a p element."
                self.close_element_if_in_scope("p");
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "p"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is "p""
            // "If the stack of open elements has a p element in button scope, then close a p element."
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. } if name == "p" => {
                // Close any existing <p> element first
                self.close_element_if_in_scope("p");
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "form"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is "form""
            // "If the form element pointer is not null, and there is no template element on the
            //  stack of open elements, then this is a parse error; ignore the token."
            // "Otherwise:"
            // "If the stack of open elements has a p element in button scope, then close a p element."
            // "Insert an HTML element for the token, and, if there is no template element on the
            //  stack of open elements, set the form element pointer to point to the element created."
            Token::StartTag { name, .. } if name == "form" => {
                // NOTE: Simplified - we skip form element pointer tracking
                self.close_element_if_in_scope("p");
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tags "pre", "listing"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "A start tag whose tag name is one of: "pre", "listing""
            Token::StartTag { name, .. } if matches!(name.as_str(), "pre" | "listing") => {
                // STEP 1: Close any p element in button scope.
                // "If the stack of open elements has a p element in button scope, then close a p element."
                self.close_element_if_in_scope("p");

                // STEP 2: Insert the element.
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);

                // STEP 3: Skip leading newline.
                // "If the next token is a U+000A LINE FEED (LF) character token, then ignore that
                //  token and move on to the next one. (Newlines at the start of pre blocks are
                //  ignored as an authoring convenience.)"
                self.ignore_next_lf = true;

                // STEP 4: Set frameset-ok flag.
                // "Set the frameset-ok flag to "not ok"."
                self.frameset_ok = false;
            }

            // [§ 13.2.6.4.7 "in body" - Start tag h1-h6](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            // "If the stack of open elements has a p element in button scope, then close a p element."
            // "If the current node is an HTML element whose tag name is one of "h1", "h2", "h3",
            //  "h4", "h5", or "h6", then this is a parse error; pop the current node off the stack
            //  of open elements."
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") =>
            {
                self.close_element_if_in_scope("p");
                // If currently in a heading, close it (headings don't nest)
                if let Some(idx) = self.current_node() {
                    if let Some(tag) = self.get_tag_name(idx) {
                        if matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6") {
                            let _ = self.pop_open_element();
                        }
                    }
                }
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "a"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is "a""
            // ... complex adoption agency handling for nested <a> tags ...
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Push onto the list of active formatting elements that element."
            Token::StartTag { name, .. } if name == "a" => {
                // "If the list of active formatting elements contains an a
                // element between the end of the list and the last marker...
                // then run the adoption agency algorithm for the token, then
                // remove that element from the list of active formatting
                // elements and the stack of open elements if the adoption
                // agency algorithm didn't already remove it."
                if self.last_formatting_element_since_marker("a").is_some() {
                    self.run_adoption_agency("a");
                }
                self.reconstruct_active_formatting_elements();
                let node_id = self.insert_html_element(token);
                self.push_active_formatting_element(node_id, token.clone());
            }

            // [§ 13.2.6.4.7 "in body" - Formatting element start tags](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "A start tag whose tag name is one of: "b", "big", "code", "em", "font", "i",
            //  "s", "small", "strike", "strong", "tt", "u""
            //
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Push onto the list of active formatting elements that element."
            //
            // [§ 13.2.4.3 The list of active formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#the-list-of-active-formatting-elements)
            //
            // Reconstructs the list before insertion and records the new
            // element onto it afterwards (Noah's Ark clause included), so
            // that formatting reopened implicitly across block boundaries
            // (e.g. `<p><b>bold<p>still bold</b>`) is represented.
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "b" | "big"
                        | "code"
                        | "em"
                        | "font"
                        | "i"
                        | "s"
                        | "small"
                        | "strike"
                        | "strong"
                        | "tt"
                        | "u"
                        | "nobr"
                ) =>
            {
                self.reconstruct_active_formatting_elements();
                let node_id = self.insert_html_element(token);
                self.push_active_formatting_element(node_id, token.clone());
            }

            // [§ 13.2.6.4.7 "in body" - Other inline formatting-adjacent start tags](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // Not part of the WHATWG "formatting elements" set tracked in
            // the list of active formatting elements; inserted directly.
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "span"
                        | "label"
                        | "abbr"
                        | "cite"
                        | "dfn"
                        | "kbd"
                        | "mark"
                        | "q"
                        | "ruby"
                        | "samp"
                        | "sub"
                        | "sup"
                        | "time"
                        | "var"
                        | "bdi"
                        | "bdo"
                        | "data"
                ) =>
            {
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "li"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is "li""
            // "Run these steps:
            //  1. Set the frameset-ok flag to "not ok".
            //  2. Initialize node to be the current node (the bottommost node of the stack).
            //  3. Loop: If node is an li element, then run these substeps:
            //     - Generate implied end tags, except for li elements.
            //     - If the current node is not an li element, then this is a parse error.
            //     - Pop elements from the stack of open elements until an li element has been popped.
            //     - Jump to the step labeled done below.
            //  ...
            //  8. Done: If the stack of open elements has a p element in button scope, then close a p element.
            //  9. Insert an HTML element for the token."
            Token::StartTag { name, .. } if name == "li" => {
                // Close any existing <li> element first
                self.close_element_if_in_scope("li");
                // Close any <p> in button scope
                self.close_element_if_in_scope("p");
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tags "dd", "dt"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // Similar to <li> but checks for dd/dt
            Token::StartTag { name, .. } if matches!(name.as_str(), "dd" | "dt") => {
                // Close any existing <dd> or <dt> element
                self.close_element_if_in_scope("dd");
                self.close_element_if_in_scope("dt");
                self.close_element_if_in_scope("p");
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "button"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "A start tag whose tag name is "button""
            Token::StartTag { name, .. } if name == "button" => {
                // STEP 1: Close any existing button in scope.
                if self.has_element_in_scope("button") {
                    // "If the stack of open elements has a button element in scope, then this is a
                    //  parse error; run these substeps:
                    //    TODO: 1. Generate implied end tags.
                    //    2. Pop elements from the stack of open elements until a button element
                    //       has been popped from the stack."
                    self.pop_until_tag("button");
                }
                // STEP 2: Reconstruct active formatting elements.
                // "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();

                // STEP 3: Insert the button element.
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);

                // STEP 4: Set frameset-ok flag.
                self.frameset_ok = false;
            }

            // [§ 13.2.6.4.7 "in body" - Start tags "applet", "marquee", "object"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is one of: "applet", "marquee", "object""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            // "Insert a marker at the end of the list of active formatting elements."
            // "Set the frameset-ok flag to "not ok"."
            Token::StartTag { name, .. }
                if matches!(name.as_str(), "applet" | "marquee" | "object") =>
            {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                self.active_formatting_elements.push(ActiveFormattingElement::Marker);
                self.frameset_ok = false;
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "select"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "A start tag whose tag name is "select""
            Token::StartTag { name, .. } if name == "select" => {
                // STEP 1: Reconstruct the active formatting elements.
                // "Reconstruct the active formatting elements, if any."
                self.reconstruct_active_formatting_elements();

                // STEP 2: Insert the select element.
                // "Insert an HTML element for the token."
                let _ = self.insert_html_element(token);

                // TODO: STEP 3: Set the frameset-ok flag.
                // "Set the frameset-ok flag to "not ok"."
            }

            // [§ 13.2.6.4.7 "in body" - Start tags "optgroup", "option"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is one of: "optgroup", "option""
            // "If the current node is an option element, then pop the current node off the stack."
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            Token::StartTag { name, .. } if matches!(name.as_str(), "optgroup" | "option") => {
                // Close current option if any
                if let Some(&node_id) = self.stack_of_open_elements.last() {
                    if self.get_tag_name(node_id) == Some("option") {
                        let _ = self.pop_open_element();
                    }
                }
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "iframe"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is "iframe""
            // "Set the frameset-ok flag to "not ok"."
            // "Follow the generic raw text element parsing algorithm."
            Token::StartTag { name, .. } if name == "iframe" => {
                let _ = self.insert_html_element(token);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::Text;
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "textarea"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is "textarea""
            // "Insert an HTML element for the token."
            // "If the next token is a U+000A LINE FEED (LF) character token, then ignore that token."
            // "Switch the tokenizer to the RCDATA state."
            // "Let the original insertion mode be the current insertion mode."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "text"."
            // NOTE: Tokenizer state switching handled by tokenizer based on tag name.
            Token::StartTag { name, .. } if name == "textarea" => {
                let _ = self.insert_html_element(token);
                self.ignore_next_lf = true;
                self.original_insertion_mode = Some(self.insertion_mode);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::Text;
            }

            // [§ 13.2.6.4.7 "in body" - End tags "dd", "dt", "li"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            Token::EndTag { name, .. } if matches!(name.as_str(), "dd" | "dt" | "li") => {
                self.pop_until_tag(name);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "table"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is "table""
            // "If the Document is not set to quirks mode, and the stack of open elements has a p
            //  element in button scope, then close a p element."
            // "Insert an HTML element for the token."
            // "Set the frameset-ok flag to "not ok"."
            // "Switch the insertion mode to "in table"."
            Token::StartTag { name, .. } if name == "table" => {
                if self.tree.quirks_mode() != koala_dom::QuirksMode::Quirks {
                    self.close_element_if_in_scope("p");
                }
                let _ = self.insert_html_element(token);
                self.frameset_ok = false;
                self.insertion_mode = InsertionMode::InTable;
            }

            // "A start tag whose tag name is one of: "area", "br", "embed", "img", "keygen", "wbr""
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token. Immediately pop the current node off the
            // stack of open elements."
            // "Acknowledge the token's self-closing flag, if it is set."
            // "Set the frameset-ok flag to "not ok"."
            //
            // "A start tag whose tag name is "input""
            // (similar handling for void element)
            //
            // "A start tag whose tag name is "hr""
            // (similar handling for void element)
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "area" | "br" | "embed" | "img" | "keygen" | "wbr" | "input" | "hr"
                ) =>
            {
                let _ = self.insert_html_element(token);
                let _ = self.pop_open_element();
            }

            // [§ 13.2.6.4.7 "in body"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "A start tag whose tag name is one of: "base", "basefont", "bgsound", "link",
            // "meta", "noframes", "script", "style", "template", "title""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "base"
                        | "basefont"
                        | "bgsound"
                        | "link"
                        | "meta"
                        | "noframes"
                        | "script"
                        | "style"
                        | "template"
                        | "title"
                ) =>
            {
                self.handle_in_head_mode(token);
            }

            // [§ 13.2.6.4.7 "in body" - Start tag "noscript"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // Behaviour depends on the scripting flag passed in at parser
            // construction ([`Self::with_scripting`]).
            Token::StartTag { name, .. } if name == "noscript" && self.scripting => {
                // "If the scripting flag is enabled: follow the generic raw
                // text element parsing algorithm."
                //
                // [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#generic-raw-text-element-parsing-algorithm):
                // contents become a single raw text child instead of parsed
                // markup. The tokenizer already switched to RAWTEXT for this
                // tag (see `HTMLTokenizer::with_scripting`), so here we only
                // need to insert the element and enter "text" mode.
                let _ = self.insert_html_element(token);
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::Text;
            }
            // "If the scripting flag is disabled" there is no dedicated rule
            // for `<noscript>` in "in body": it falls to "any other start
            // tag" below, parsed as an ordinary element with real children
            // and no insertion-mode switch.

            // "An end tag whose tag name is one of: "address", "article", "aside", "blockquote",
            // "button", "center", "details", "dialog", "dir", "div", "dl", "fieldset", "figcaption",
            // "figure", "footer", "header", "hgroup", "listing", "main", "menu", "nav", "ol", "pre",
            // "search", "section", "summary", "ul""
            // "If the stack of open elements does not have an element in scope that is an HTML
            // element with the same tag name as that of the token, then this is a parse error;
            // ignore the token."
            // "Otherwise, run these steps:"
            // 1. "Generate implied end tags."
            // 2. "If the current node is not an HTML element with the same tag name as that of
            //     the token, then this is a parse error."
            // 3. "Pop elements from the stack of open elements until an HTML element with the
            //     same tag name as the token has been popped from the stack."
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "address"
                        | "article"
                        | "aside"
                        | "blockquote"
                        | "button"
                        | "center"
                        | "details"
                        | "dialog"
                        | "dir"
                        | "div"
                        | "dl"
                        | "fieldset"
                        | "figcaption"
                        | "figure"
                        | "footer"
                        | "header"
                        | "hgroup"
                        | "listing"
                        | "main"
                        | "menu"
                        | "nav"
                        | "ol"
                        | "pre"
                        | "search"
                        | "section"
                        | "summary"
                        | "ul"
                ) =>
            {
                // NOTE: We skip scope checking and implied end tag generation for simplicity.
                self.pop_until_tag(name);
            }

            // [§ 13.2.6.4.7 "in body" - End tag h1-h6](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "An end tag whose tag name is one of: "h1", "h2", "h3", "h4", "h5", "h6""
            // "If the stack of open elements does not have an element in scope that is an HTML
            // element and whose tag name is one of "h1", "h2", "h3", "h4", "h5", "h6", then this
            // is a parse error; ignore the token."
            // "Otherwise, run these steps:"
            // 1. "Generate implied end tags."
            // 2. "If the current node is not an HTML element with the same tag name as that of
            //     the token, then this is a parse error."
            // 3. "Pop elements from the stack of open elements until an HTML element whose tag
            //     name is one of "h1", "h2", "h3", "h4", "h5", "h6" has been popped from the stack."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "h1" | "h2" | "h3" | "h4" | "h5" | "h6") =>
            {
                // Pop until any heading element is found (spec allows closing h2 with </h1>, etc.)
                self.pop_until_one_of(&["h1", "h2", "h3", "h4", "h5", "h6"]);
            }

            // [§ 13.2.6.4.7 "in body" - End tag "p"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "An end tag whose tag name is "p""
            // "If the stack of open elements does not have a p element in button scope, then
            // this is a parse error; act as if a start tag with the tag name "p" had been seen,
            // then reprocess the current token."
            // "Otherwise, run these steps:"
            // 1. "Generate implied end tags, except for p elements."
            // 2. "If the current node is not a p element, then this is a parse error."
            // 3. "Pop elements from the stack of open elements until a p element has been
            //     popped from the stack."
            Token::EndTag { name, .. } if name == "p" => {
                // NOTE: We skip the scope check for simplicity
                self.pop_until_tag("p");
            }

            // [§ 13.2.6.4.7 "in body" - End tag "applet", "marquee", "object"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "An end tag whose tag name is one of: "applet", "marquee", "object""
            // "If the stack of open elements does not have an element in scope that is an HTML
            //  element with the same tag name as that of the token, then this is a parse error;
            //  ignore the token."
            // "Otherwise, run these steps:"
            // 1. "Generate implied end tags."
            // 2. "If the current node is not an HTML element with the same tag name as that of
            //     the token, then this is a parse error."
            // 3. "Pop elements from the stack of open elements until an HTML element with the
            //     same tag name as the token has been popped from the stack."
            // 4. "Clear the list of active formatting elements up to the last marker."
            Token::EndTag { name, .. }
                if matches!(name.as_str(), "applet" | "marquee" | "object") =>
            {
                if self.has_element_in_scope(name) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag(name);
                    self.clear_active_formatting_elements_to_last_marker();
                }
                // Otherwise: parse error, ignore the token
            }

            // [§ 13.2.6.4.7 "in body" - End tag "template"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "An end tag whose tag name is "template""
            // "Process the token using the rules for the "in head" insertion mode."
            Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }

            // [§ 13.2.6.4.7 "in body" - End tag "select"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "An end tag whose tag name is "select""
            // "Parse error."
            // "If the stack of open elements does not have a select element in select scope,
            //  ignore the token. (fragment case)"
            // "Otherwise:"
            // "Pop elements from the stack of open elements until a select element has been
            //  popped from the stack."
            // "Reset the insertion mode appropriately."
            Token::EndTag { name, .. } if name == "select" => {
                // NOTE: Using has_element_in_scope instead of select scope (simplified)
                if self.has_element_in_scope("select") {
                    self.pop_until_tag("select");
                    self.reset_insertion_mode_appropriately();
                }
                // Otherwise: ignore the token (fragment case or parse error)
            }

            // [§ 13.2.6.4.7 "in body" - End tags "optgroup", "option"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // These fall under "Any other end tag" rules since there's no specific
            // handler in InBody mode. Using simplified pop-until-tag behavior.
            Token::EndTag { name, .. } if matches!(name.as_str(), "optgroup" | "option") => {
                if self.has_element_in_scope(name) {
                    self.pop_until_tag(name);
                }
                // Otherwise: ignore the token
            }

            // [§ 13.2.6.4.7 "in body" - End tag "iframe", "noembed", "noframes"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // These are raw text elements, end tags follow "any other end tag" rules.
            // NOTE: Simplified implementation.
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "iframe" | "noembed" | "noframes" | "noscript"
                ) =>
            {
                if self.has_element_in_scope(name) {
                    // TODO: generate_implied_end_tags(Some(name)) before popping
                    self.pop_until_tag(name);
                }
                // Otherwise: parse error, ignore the token (stray end tag)
            }

            // [§ 13.2.6.4.7 "in body" - End tags "svg", "math"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // These are foreign content elements. End tags fall under "Any other end tag" rules:
            // [§ 13.2.6.4.7 Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // 1. "Initialize node to be the current node (the bottommost node of the stack)."
            // 2. "Loop: If node is an HTML element with the same tag name as the token, then:"
            //    a. "Generate implied end tags, except for HTML elements with the same tag name."
            //    b. "If node is not the current node, then this is a parse error."
            //    c. "Pop all the nodes from the current node up to node, including node, then stop."
            // 3. "Otherwise, if node is in the special category, parse error; ignore the token."
            // 4. "Set node to the previous entry in the stack of open elements."
            // 5. "Return to the step labeled loop."
            Token::EndTag { name, .. } if matches!(name.as_str(), "svg" | "math") => {
                if self.has_element_in_scope(name) {
                    self.pop_until_tag(name);
                }
                // Otherwise: parse error, ignore the token
            }

            // [§ 13.2.6.4.7 "in body" - End tags for formatting elements](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // The WHATWG list of formatting elements (the same set tracked on
            // the list of active formatting elements, see the matching
            // start-tag handler above): these run the real
            // [§ 13.2.6.4.7 Adoption agency algorithm](https://html.spec.whatwg.org/multipage/parsing.html#adoption-agency-algorithm),
            // which handles misnesting like `<b>text<i>more</b>text</i>` by
            // "adopting" nodes between the formatting element and the
            // misnested end tag instead of just popping the stack.
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "a" | "b"
                        | "big"
                        | "code"
                        | "em"
                        | "font"
                        | "i"
                        | "nobr"
                        | "s"
                        | "small"
                        | "strike"
                        | "strong"
                        | "tt"
                        | "u"
                ) =>
            {
                self.run_adoption_agency(name);
            }

            // [§ 13.2.6.4.7 "in body" - Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // Not part of the WHATWG "formatting elements" set tracked on the
            // list of active formatting elements, so these stay on the
            // simplified pop-until-tag path (works for properly nested
            // content, same known limitation as before for misnesting).
            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "span"
                        | "cite"
                        | "q"
                        | "dfn"
                        | "abbr"
                        | "ruby"
                        | "rt"
                        | "rp"
                        | "data"
                        | "time"
                        | "var"
                        | "samp"
                        | "kbd"
                        | "sub"
                        | "sup"
                        | "mark"
                        | "bdi"
                        | "bdo"
                        | "wbr"
                        | "label"
                ) =>
            {
                self.pop_until_tag(name);
            }

            // [§ 13.2.6.4.7 "in body" - End tag "form"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // "An end tag whose tag name is "form""
            // (Complex handling involving form element pointer - simplified here)
            Token::EndTag { name, .. } if name == "form" => {
                // NOTE: Simplified - just pop until form
                self.pop_until_tag("form");
            }

            // "An end tag whose tag name is "body""
            // "If the stack of open elements does not have a body element in scope, this is a
            // parse error; ignore the token."
            // "Otherwise, if there is a node in the stack of open elements that is not either a
            // dd element, a dt element, an li element, an optgroup element, an option element,
            // a p element, an rb element, an rp element, an rt element, an rtc element, a tbody
            // element, a td element, a tfoot element, a th element, a thead element, a tr element,
            // the body element, or the html element, then this is a parse error."
            // "Switch the insertion mode to "after body"."
            Token::EndTag { name, .. } if name == "body" => {
                self.insertion_mode = InsertionMode::AfterBody;
            }

            // "An end tag whose tag name is "html""
            // "If the stack of open elements does not have a body element in scope, this is a
            // parse error; ignore the token."
            // "Otherwise, if there is a node in the stack of open elements that is not either
            // [list of elements], then this is a parse error."
            // "Switch the insertion mode to "after body"."
            // "Reprocess the token."
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterBody;
                self.reprocess_token(token);
            }

            // "An end-of-file token"
            // "If the stack of template insertion modes is not empty, then process the token
            // using the rules for the "in template" insertion mode."
            // "Otherwise, follow these steps:"
            // 1. "If there is a node in the stack of open elements that is not either [list],
            //     then this is a parse error."
            // 2. "Stop parsing."
            Token::EndOfFile => {
                self.stopped = true;
            }

            // ===== FOREIGN CONTENT (SVG and MathML) =====
            //
            // [§ 13.2.6.4.7 "in body" - A start tag whose tag name is "math"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            // [§ 13.2.6.4.7 "in body" - A start tag whose tag name is "svg"](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "A start tag whose tag name is 'math'":
            // "A start tag whose tag name is 'svg'":
            //   "Reconstruct the active formatting elements, if any.
            //    Adjust MathML attributes for the token. (This fixes the case of MathML
            //    attributes that are not all lowercase.)
            //    Adjust foreign attributes for the token. (This fixes the use of namespaced
            //    attributes, in particular XLink.)
            //    Insert a foreign element for the token, in the [MathML/SVG] namespace.
            //    If the token has its self-closing flag set, pop the current node off the
            //    stack of open elements and acknowledge the token's self-closing flag."
            //
            // NOTE: Current implementation adjusts attributes per spec but treats the
            // element as HTML (no namespace). Full foreign content parsing (§ 13.2.6.5)
            // is not yet implemented.
            Token::StartTag {
                name,
                attributes,
                self_closing,
            } if name == "svg" => {
                // STEP 1: Reconstruct the active formatting elements, if any.
                //   [§ 13.2.4.3](https://html.spec.whatwg.org/multipage/parsing.html#reconstruct-the-active-formatting-elements)
                self.reconstruct_active_formatting_elements();

                // STEP 2: Adjust attributes for foreign content
                //   [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#adjust-svg-attributes)
                let mut adjusted_attributes = attributes.clone();
                adjust_svg_attributes(&mut adjusted_attributes);
                adjust_foreign_attributes(&mut adjusted_attributes);

                // STEP 3: Insert a foreign element for the token
                //   [§ 13.2.6.1](https://html.spec.whatwg.org/multipage/parsing.html#insert-a-foreign-element)
                //   NOTE: We insert as HTML element since our DOM doesn't support namespaces yet.
                //   Full implementation would use SVG namespace "http://www.w3.org/2000/svg"
                let adjusted_token = Token::StartTag {
                    name: name.clone(),
                    attributes: adjusted_attributes,
                    self_closing: *self_closing,
                };
                let element_id = self.insert_html_element(&adjusted_token);

                // STEP 4: Handle self-closing flag
                //   "If the token has its self-closing flag set, pop the current node off
                //    the stack of open elements and acknowledge the token's self-closing flag."
                if *self_closing {
                    let _ = self.pop_open_element();
                    // NOTE: Acknowledging the self-closing flag prevents a parse error.
                    // Since we don't track parse errors for this, we just pop.
                }

                // STEP 5: If not self-closing, future tokens should be processed by
                //   "in foreign content" rules (§ 13.2.6.5). This is not yet implemented.
                //   For now, we continue processing as HTML which works for simple cases.
                let _ = element_id;
            }

            Token::StartTag {
                name,
                attributes,
                self_closing,
            } if name == "math" => {
                // STEP 1: Reconstruct the active formatting elements, if any.
                self.reconstruct_active_formatting_elements();

                // STEP 2: Adjust attributes for foreign content
                //   [§ 13.2.6.3](https://html.spec.whatwg.org/multipage/parsing.html#adjust-mathml-attributes)
                let mut adjusted_attributes = attributes.clone();
                adjust_mathml_attributes(&mut adjusted_attributes);
                adjust_foreign_attributes(&mut adjusted_attributes);

                // STEP 3: Insert a foreign element for the token
                //   NOTE: We insert as HTML element since our DOM doesn't support namespaces yet.
                //   Full implementation would use MathML namespace "http://www.w3.org/1998/Math/MathML"
                let adjusted_token = Token::StartTag {
                    name: name.clone(),
                    attributes: adjusted_attributes,
                    self_closing: *self_closing,
                };
                let element_id = self.insert_html_element(&adjusted_token);

                // STEP 4: Handle self-closing flag
                if *self_closing {
                    let _ = self.pop_open_element();
                }

                let _ = element_id;
            }

            // [§ 13.2.6.4.7 "in body" - Any other start tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "Any other start tag"
            // "Reconstruct the active formatting elements, if any."
            // "Insert an HTML element for the token."
            //
            // This handles all elements not explicitly listed in the spec, including:
            // - Custom elements (contain hyphen, e.g., <my-widget>)
            // - Web component elements (slot)
            // - Text-level semantics (ins, del, abbr, dfn, time, data, code, var, samp, kbd,
            //   mark, ruby, rt, rp, bdi, bdo, q, cite, sub, sup, small, etc.)
            // - Any other valid HTML element without special parsing rules
            Token::StartTag { name, .. } => {
                self.reconstruct_active_formatting_elements();
                let _ = self.insert_html_element(token);
                // Log unknown standard elements so we can add explicit handlers if needed
                if !name.contains('-') {
                    warn_once(
                        "HTML Parser",
                        &format!("using generic handler for <{}>", name),
                    );
                }
            }

            // [§ 13.2.6.4.7 "in body" - Any other end tag](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inbody)
            //
            // "Any other end tag"
            // 1. "Initialize node to be the current node (the bottommost node of the stack)."
            // 2. "Loop: If node is an HTML element with the same tag name as the token, then:"
            //    a. "Generate implied end tags, except for elements with the same tag name"
            //    b. "If node is not the current node, then this is a parse error."
            //    c. "Pop all the nodes from the current node up to node, including node, then stop."
            // 3. "Otherwise, if node is in the special category, parse error; ignore the token."
            // 4. "Set node to the previous entry in the stack of open elements."
            // 5. "Return to the step labeled loop."
            //
            // NOTE: Simplified implementation - we just pop up to and including the tag.
            // Full implementation would check special category at each step.
            Token::EndTag { name, .. } => {
                if self.has_element_in_scope(name) {
                    self.pop_until_tag(name);
                }
                // Otherwise: parse error, ignore the token
            }
        }
    }

    /// [§ 13.2.6.3 Clearing the stack back to a table context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-context)
    fn clear_stack_back_to_table_context(&mut self) {
        while let Some(&id) = self.stack_of_open_elements.last() {
            if matches!(self.get_tag_name(id), Some("table" | "template" | "html")) {
                break;
            }
            let _ = self.pop_open_element();
        }
    }

    /// [§ 13.2.6.3 Clearing the stack back to a table body context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-body-context)
    fn clear_stack_back_to_table_body_context(&mut self) {
        while let Some(&id) = self.stack_of_open_elements.last() {
            if matches!(self.get_tag_name(id), Some("tbody" | "tfoot" | "thead" | "template" | "html")) {
                break;
            }
            let _ = self.pop_open_element();
        }
    }

    /// [§ 13.2.6.3 Clearing the stack back to a table row context](https://html.spec.whatwg.org/multipage/parsing.html#clear-the-stack-back-to-a-table-row-context)
    fn clear_stack_back_to_table_row_context(&mut self) {
        while let Some(&id) = self.stack_of_open_elements.last() {
            if matches!(self.get_tag_name(id), Some("tr" | "template" | "html")) {
                break;
            }
            let _ = self.pop_open_element();
        }
    }

    /// [§ 13.2.4.1 Reset the insertion mode appropriately](https://html.spec.whatwg.org/multipage/parsing.html#reset-the-insertion-mode-appropriately)
    ///
    /// Walks the stack of open elements from the top, picking the mode
    /// that matches the first context-establishing element found. Narrowed
    /// to the insertion modes this parser implements: a `select` ancestor
    /// falls back to "in body" rather than the unimplemented select modes.
    fn reset_insertion_mode_appropriately(&mut self) {
        for &id in self.stack_of_open_elements.iter().rev() {
            match self.get_tag_name(id) {
                Some("td" | "th") => {
                    self.insertion_mode = InsertionMode::InCell;
                    return;
                }
                Some("tr") => {
                    self.insertion_mode = InsertionMode::InRow;
                    return;
                }
                Some("tbody" | "thead" | "tfoot") => {
                    self.insertion_mode = InsertionMode::InTableBody;
                    return;
                }
                Some("table") => {
                    self.insertion_mode = InsertionMode::InTable;
                    return;
                }
                Some("head") => {
                    self.insertion_mode = InsertionMode::InHead;
                    return;
                }
                Some("body") => {
                    self.insertion_mode = InsertionMode::InBody;
                    return;
                }
                Some("frameset") => {
                    self.insertion_mode = InsertionMode::InFrameset;
                    return;
                }
                Some("html") => {
                    self.insertion_mode = if self.head_element_pointer.is_some() {
                        InsertionMode::AfterHead
                    } else {
                        InsertionMode::BeforeHead
                    };
                    return;
                }
                _ => {}
            }
        }
        self.insertion_mode = InsertionMode::InBody;
    }

    /// [§ 13.2.6.1 Appropriate place for inserting a node, "anything else" branch](https://html.spec.whatwg.org/multipage/parsing.html#appropriate-place-for-inserting-a-node)
    ///
    /// Used by the "in table" insertion mode for tokens that don't belong
    /// to table structure: "enable foster parenting, process the token
    /// using the rules for the 'in body' insertion mode, and then disable
    /// foster parenting."
    fn handle_in_table_anything_else(&mut self, token: &Token) {
        self.parse_warning("foster-parenting misplaced content out of table");
        self.foster_parenting = true;
        self.handle_in_body_mode(token);
        self.foster_parenting = false;
    }

    /// [§ 13.2.6.4.9 The "in table" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intable)
    fn handle_in_table_mode(&mut self, token: &Token) {
        let start_tag = |t: &str| Token::StartTag {
            name: t.to_string(),
            self_closing: false,
            attributes: Vec::new(),
        };

        match token {
            Token::Character { .. }
                if matches!(
                    self.current_node().and_then(|id| self.get_tag_name(id)),
                    Some("table" | "tbody" | "tfoot" | "thead" | "tr")
                ) =>
            {
                self.pending_table_characters.clear();
                self.original_insertion_mode = Some(self.insertion_mode);
                self.insertion_mode = InsertionMode::InTableText;
                self.reprocess_token(token);
            }

            Token::Comment { data } => self.insert_comment(data),

            Token::Doctype { .. } => self.parse_warning("unexpected DOCTYPE in table"),

            Token::StartTag { name, .. } if name == "caption" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCaption;
            }

            Token::StartTag { name, .. } if name == "colgroup" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InColumnGroup;
            }

            Token::StartTag { name, .. } if name == "col" => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(&start_tag("colgroup"));
                self.insertion_mode = InsertionMode::InColumnGroup;
                self.reprocess_token(token);
            }

            Token::StartTag { name, .. } if matches!(name.as_str(), "tbody" | "tfoot" | "thead") => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InTableBody;
            }

            Token::StartTag { name, .. } if matches!(name.as_str(), "td" | "th" | "tr") => {
                self.clear_stack_back_to_table_context();
                let _ = self.insert_html_element(&start_tag("tbody"));
                self.insertion_mode = InsertionMode::InTableBody;
                self.reprocess_token(token);
            }

            Token::StartTag { name, .. } if name == "table" => {
                self.parse_warning("nested <table> start tag");
                if self.has_element_in_table_scope("table") {
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                    self.reprocess_token(token);
                }
            }

            Token::EndTag { name, .. } if name == "table" => {
                if self.has_element_in_table_scope("table") {
                    self.pop_until_tag("table");
                    self.reset_insertion_mode_appropriately();
                } else {
                    self.parse_warning("</table> without a matching <table> in scope");
                }
            }

            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "tbody" | "td" | "tfoot"
                        | "th" | "thead" | "tr"
                ) =>
            {
                self.parse_warning("stray table-context end tag ignored");
            }

            Token::StartTag { name, .. } if matches!(name.as_str(), "style" | "script" | "template") => {
                self.handle_in_head_mode(token);
            }
            Token::EndTag { name, .. } if name == "template" => {
                self.handle_in_head_mode(token);
            }

            Token::StartTag { name, .. } if name == "form" => {
                self.parse_warning("<form> inside <table>, inserting without updating form pointer");
                let _ = self.insert_html_element(token);
                let _ = self.pop_open_element();
            }

            Token::EndOfFile => self.handle_in_body_mode(token),

            _ => self.handle_in_table_anything_else(token),
        }
    }

    /// [§ 13.2.6.4.10 The "in table text" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intabletext)
    fn handle_in_table_text_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data: '\0' } => {
                self.parse_warning("ignored U+0000 NULL in table text");
            }
            Token::Character { data } => {
                self.pending_table_characters.push(*data);
            }
            _ => {
                let pending = std::mem::take(&mut self.pending_table_characters);
                let all_whitespace = pending.chars().all(Self::is_whitespace);
                if !all_whitespace {
                    self.parse_warning("non-whitespace table text; foster parenting");
                    self.foster_parenting = true;
                }
                for c in pending.chars() {
                    self.insert_character(c);
                }
                if !all_whitespace {
                    self.foster_parenting = false;
                    self.frameset_ok = false;
                }
                self.insertion_mode =
                    self.original_insertion_mode.take().unwrap_or(InsertionMode::InTable);
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.13 The "in table body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-intablebody)
    fn handle_in_table_body_mode(&mut self, token: &Token) {
        let start_tag = |t: &str| Token::StartTag {
            name: t.to_string(),
            self_closing: false,
            attributes: Vec::new(),
        };

        match token {
            Token::StartTag { name, .. } if name == "tr" => {
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InRow;
            }

            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.parse_warning("<th>/<td> without an enclosing <tr>; implying one");
                self.clear_stack_back_to_table_body_context();
                let _ = self.insert_html_element(&start_tag("tr"));
                self.insertion_mode = InsertionMode::InRow;
                self.reprocess_token(token);
            }

            Token::EndTag { name, .. } if matches!(name.as_str(), "tbody" | "tfoot" | "thead") => {
                if self.has_element_in_table_scope(name) {
                    self.clear_stack_back_to_table_body_context();
                    let _ = self.pop_open_element();
                    self.insertion_mode = InsertionMode::InTable;
                } else {
                    self.parse_warning("stray table-section end tag ignored");
                }
            }

            Token::StartTag { name, .. }
                if matches!(name.as_str(), "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead") =>
            {
                self.end_table_section_and_reprocess(token);
            }
            Token::EndTag { name, .. } if name == "table" => {
                self.end_table_section_and_reprocess(token);
            }

            Token::EndTag { name, .. }
                if matches!(
                    name.as_str(),
                    "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th" | "tr"
                ) =>
            {
                self.parse_warning("stray end tag ignored in table-body context");
            }

            _ => self.handle_in_table_mode(token),
        }
    }

    /// Shared "close the current table section and reprocess" step used by
    /// the "in table body" insertion mode for tokens that imply the
    /// current `tbody`/`thead`/`tfoot` has ended.
    fn end_table_section_and_reprocess(&mut self, token: &Token) {
        if !(self.has_element_in_table_scope("tbody")
            || self.has_element_in_table_scope("thead")
            || self.has_element_in_table_scope("tfoot"))
        {
            self.parse_warning("no table section in scope; ignoring token");
            return;
        }
        self.clear_stack_back_to_table_body_context();
        let _ = self.pop_open_element();
        self.insertion_mode = InsertionMode::InTable;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.14 The "in row" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inrow)
    fn handle_in_row_mode(&mut self, token: &Token) {
        match token {
            Token::StartTag { name, .. } if matches!(name.as_str(), "th" | "td") => {
                self.clear_stack_back_to_table_row_context();
                let _ = self.insert_html_element(token);
                self.insertion_mode = InsertionMode::InCell;
            }

            Token::EndTag { name, .. } if name == "tr" => {
                if self.has_element_in_table_scope("tr") {
                    self.clear_stack_back_to_table_row_context();
                    let _ = self.pop_open_element();
                    self.insertion_mode = InsertionMode::InTableBody;
                } else {
                    self.parse_warning("</tr> without matching <tr> in scope");
                }
            }

            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "tfoot" | "thead" | "tr"
                ) =>
            {
                self.close_row_for_reprocess(token);
            }
            Token::EndTag { name, .. } if name == "table" => {
                self.close_row_for_reprocess(token);
            }

            Token::EndTag { name, .. } if matches!(name.as_str(), "tbody" | "tfoot" | "thead") => {
                if self.has_element_in_table_scope(name) {
                    self.close_row_for_reprocess(token);
                } else {
                    self.parse_warning("no matching table section in scope; ignoring end tag");
                }
            }

            Token::EndTag { name, .. }
                if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html" | "td" | "th") =>
            {
                self.parse_warning("stray end tag ignored in row context");
            }

            _ => self.handle_in_table_mode(token),
        }
    }

    /// Shared "close the current row and reprocess" step: fails harmlessly
    /// (with a parse warning) if there is no `tr` in table scope.
    fn close_row_for_reprocess(&mut self, token: &Token) {
        if !self.has_element_in_table_scope("tr") {
            self.parse_warning("no <tr> in table scope; ignoring");
            return;
        }
        self.clear_stack_back_to_table_row_context();
        let _ = self.pop_open_element();
        self.insertion_mode = InsertionMode::InTableBody;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.15 The "in cell" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-incell)
    fn handle_in_cell_mode(&mut self, token: &Token) {
        match token {
            Token::EndTag { name, .. } if matches!(name.as_str(), "td" | "th") => {
                if self.has_element_in_table_scope(name) {
                    self.generate_implied_end_tags(None);
                    self.pop_until_tag(name);
                    self.insertion_mode = InsertionMode::InRow;
                } else {
                    self.parse_warning("stray table-cell end tag ignored");
                }
            }

            Token::StartTag { name, .. }
                if matches!(
                    name.as_str(),
                    "caption" | "col" | "colgroup" | "tbody" | "td" | "tfoot" | "th" | "thead" | "tr"
                ) =>
            {
                self.close_cell_for_reprocess(token);
            }

            Token::EndTag { name, .. } if matches!(name.as_str(), "body" | "caption" | "col" | "colgroup" | "html") => {
                self.parse_warning("stray end tag ignored in table-cell context");
            }

            Token::EndTag { name, .. } if matches!(name.as_str(), "table" | "tbody" | "tfoot" | "thead" | "tr") => {
                if self.has_element_in_table_scope(name) {
                    self.close_cell_for_reprocess(token);
                } else {
                    self.parse_warning("stray end tag ignored in table-cell context");
                }
            }

            _ => self.handle_in_body_mode(token),
        }
    }

    /// Shared "close the current cell and reprocess" step used by the
    /// "in cell" insertion mode.
    fn close_cell_for_reprocess(&mut self, token: &Token) {
        if !(self.has_element_in_table_scope("td") || self.has_element_in_table_scope("th")) {
            self.parse_warning("no table cell in scope; ignoring");
            return;
        }
        self.generate_implied_end_tags(None);
        self.pop_until_one_of(&["td", "th"]);
        self.insertion_mode = InsertionMode::InRow;
        self.reprocess_token(token);
    }

    /// [§ 13.2.6.4.20 The "in frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-inframeset)
    fn handle_in_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_warning("unexpected DOCTYPE in frameset"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::StartTag { name, .. } if name == "frameset" => {
                let _ = self.insert_html_element(token);
            }
            Token::EndTag { name, .. } if name == "frameset" => {
                if self.stack_of_open_elements.len() <= 1 {
                    self.parse_warning("stray </frameset> for the root element ignored");
                } else {
                    let _ = self.pop_open_element();
                    if self.current_node().and_then(|id| self.get_tag_name(id)) != Some("frameset") {
                        self.insertion_mode = InsertionMode::AfterFrameset;
                    }
                }
            }
            Token::StartTag { name, .. } if name == "frame" => {
                let _ = self.insert_html_element(token);
                let _ = self.pop_open_element();
            }
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),
            Token::EndOfFile => self.stopped = true,
            _ => self.parse_warning("token ignored in frameset context"),
        }
    }

    /// [§ 13.2.6.4.21 The "after frameset" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterframeset)
    fn handle_after_frameset_mode(&mut self, token: &Token) {
        match token {
            Token::Character { data } if Self::is_whitespace(*data) => self.insert_character(*data),
            Token::Comment { data } => self.insert_comment(data),
            Token::Doctype { .. } => self.parse_warning("unexpected DOCTYPE after frameset"),
            Token::StartTag { name, .. } if name == "html" => self.handle_in_body_mode(token),
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterFrameset;
            }
            Token::StartTag { name, .. } if name == "noframes" => self.handle_in_head_mode(token),
            Token::EndOfFile => self.stopped = true,
            _ => self.parse_warning("token ignored after frameset"),
        }
    }

    /// Shared handler for insertion modes intentionally left as
    /// parse-error passthroughs ("in caption", "in column group",
    /// "in select", "in select in table", "in template", and
    /// "after after frameset"): comments are inserted, EOF stops
    /// parsing, and every other token is recorded as a parse warning
    /// and otherwise ignored rather than reaching the table/select
    /// semantics those modes would normally apply.
    fn handle_passthrough_mode(&mut self, token: &Token, mode_name: &str) {
        match token {
            Token::Comment { data } => self.insert_comment(data),
            Token::EndOfFile => self.stopped = true,
            _ => {
                self.parse_warning(&format!("{mode_name} insertion mode not implemented; token ignored"));
            }
        }
    }

    /// [§ 13.2.6.4.19 The "after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#parsing-main-afterbody)
    fn handle_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Character { data } if Self::is_whitespace(*data) => {
                self.handle_in_body_mode(token);
            }

            // "A comment token"
            // "Insert a comment as the last child of the first element in the stack of open
            // elements (the html element)."
            Token::Comment { data } => {
                if let Some(&html_idx) = self.stack_of_open_elements.first() {
                    let comment_idx = self.create_comment_node(data.clone());
                    self.append_child(html_idx, comment_idx);
                }
            }

            // "A DOCTYPE token"
            // "Parse error. Ignore the token."
            Token::Doctype { .. } => {}

            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }

            // "An end tag whose tag name is "html""
            // "If the parser was created as part of the HTML fragment parsing algorithm, this is
            // a parse error; ignore the token. (fragment case)"
            // "Otherwise, switch the insertion mode to "after after body"."
            Token::EndTag { name, .. } if name == "html" => {
                self.insertion_mode = InsertionMode::AfterAfterBody;
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {
                self.stopped = true;
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the token."
            _ => {
                self.insertion_mode = InsertionMode::InBody;
                self.reprocess_token(token);
            }
        }
    }

    /// [§ 13.2.6.4.22 The "after after body" insertion mode](https://html.spec.whatwg.org/multipage/parsing.html#the-after-after-body-insertion-mode)
    fn handle_after_after_body_mode(&mut self, token: &Token) {
        match token {
            // "A comment token"
            // "Insert a comment as the last child of the Document object."
            Token::Comment { data } => {
                self.insert_comment_to_document(data);
            }

            // "A DOCTYPE token"
            // "A character token that is one of U+0009 CHARACTER TABULATION, U+000A LINE FEED (LF),
            // U+000C FORM FEED (FF), U+000D CARRIAGE RETURN (CR), or U+0020 SPACE"
            // "A start tag whose tag name is "html""
            // "Process the token using the rules for the "in body" insertion mode."
            Token::Doctype { .. } => {
                self.handle_in_body_mode(token);
            }

            Token::Character { data } if Self::is_whitespace(*data) => {
                self.handle_in_body_mode(token);
            }

            Token::StartTag { name, .. } if name == "html" => {
                self.handle_in_body_mode(token);
            }

            // "An end-of-file token"
            // "Stop parsing."
            Token::EndOfFile => {
                self.stopped = true;
            }

            // "Anything else"
            // "Parse error. Switch the insertion mode to "in body" and reprocess the token."
            _ => {
                self.insertion_mode = InsertionMode::InBody;
                self.reprocess_token(token);
            }
        }
    }
}

/// Print a DOM tree for debugging.
pub fn print_tree(tree: &DomTree, id: NodeId, indent: usize) {
    let prefix = "  ".repeat(indent);
    if let Some(node) = tree.get(id) {
        match &node.node_type {
            NodeType::Document => {
                println!("{}Document", prefix);
            }
            NodeType::Element(data) => {
                if data.attrs.is_empty() {
                    println!("{}<{}>", prefix, data.tag_name);
                } else {
                    let attrs: Vec<String> = data
                        .attrs
                        .iter()
                        .map(|(k, v)| {
                            if v.is_empty() {
                                k.clone()
                            } else {
                                format!("{}=\"{}\"", k, v)
                            }
                        })
                        .collect();
                    println!("{}<{} {}>", prefix, data.tag_name, attrs.join(" "));
                }
            }
            NodeType::Text(data) => {
                let display = data.replace('\n', "\\n").replace(' ', "\u{00B7}");
                println!("{}\"{}\"", prefix, display);
            }
            NodeType::Comment(data) => {
                println!("{}<!-- {} -->", prefix, data);
            }
        }
        for &child_id in tree.children(id) {
            print_tree(tree, child_id, indent + 1);
        }
    }
}
