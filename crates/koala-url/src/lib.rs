//! A WHATWG [URL Standard](https://url.spec.whatwg.org/) parser.
//!
//! Grounded on the original engine's `url::UrlParser` (`url.cpp`): a
//! 22-state basic-URL-parser state machine operating on a code-point
//! pointer with `peek`/`advance`/`back` primitives, plus [`Host`] parsing
//! (IPv4/IPv6/opaque/domain) and a structural UTS#46 domain-to-ASCII step.
//!
//! Unlike the HTML/CSS tokenizers in this workspace, this parser is not
//! iterator-driven: [`UrlParser::parse`] runs the whole state machine to
//! completion and returns a [`Url`] or `None`, matching
//! [§ 7 API](https://url.spec.whatwg.org/#api).

pub mod error;
pub mod host;
mod idna;
pub mod percent_encode;
mod punycode;

use std::fmt;

use koala_common::text;

pub use error::ValidationError;
pub use host::Host;
use percent_encode::{percent_decode_unreserved, percent_encode, percent_encoded_triplets_to_upper, PercentEncodeSet};

const SPECIAL_SCHEMES: &[(&str, u16)] = &[
    ("ftp", 21),
    ("file", 0),
    ("http", 80),
    ("https", 443),
    ("ws", 80),
    ("wss", 443),
];

fn is_special_scheme(scheme: &str) -> bool {
    SPECIAL_SCHEMES.iter().any(|(s, _)| *s == scheme)
}

fn special_scheme_port(scheme: &str) -> Option<u16> {
    SPECIAL_SCHEMES.iter().find(|(s, _)| *s == scheme).map(|(_, p)| *p)
}

/// [URL Standard § 4.1 URL path](https://url.spec.whatwg.org/#concept-url-path)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlPath {
    /// A single undifferentiated string, for URLs that cannot be a base
    /// (e.g. `mailto:`).
    Opaque(String),
    /// An ordered list of path segments.
    List(Vec<String>),
}

impl UrlPath {
    fn list_mut(&mut self) -> &mut Vec<String> {
        match self {
            Self::List(segments) => segments,
            Self::Opaque(_) => panic!("list_mut called on an opaque path"),
        }
    }

    fn list(&self) -> &[String] {
        match self {
            Self::List(segments) => segments,
            Self::Opaque(_) => panic!("list called on an opaque path"),
        }
    }
}

/// [URL Standard § 4.1 URL](https://url.spec.whatwg.org/#concept-url)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Url {
    /// Always lowercase ASCII.
    pub scheme: String,
    /// Userinfo username, percent-encoded.
    pub user: String,
    /// Userinfo password, percent-encoded.
    pub passwd: String,
    /// The host, if any.
    pub host: Option<Host>,
    /// The port, `None` when it equals the special scheme's default port.
    pub port: Option<u16>,
    /// The path.
    pub path: UrlPath,
    /// The query string, percent-encoded, excluding the leading `?`.
    pub query: Option<String>,
    /// The fragment, percent-encoded, excluding the leading `#`.
    pub fragment: Option<String>,
}

impl Default for Url {
    fn default() -> Self {
        Self {
            scheme: String::new(),
            user: String::new(),
            passwd: String::new(),
            host: None,
            port: None,
            path: UrlPath::List(Vec::new()),
            query: None,
            fragment: None,
        }
    }
}

impl Url {
    /// [URL Standard § 4.1 includes credentials](https://url.spec.whatwg.org/#include-credentials)
    #[must_use]
    pub fn includes_credentials(&self) -> bool {
        !self.user.is_empty() || !self.passwd.is_empty()
    }

    /// [URL Standard § 4.1 cannot-have-a-username/password/port](https://url.spec.whatwg.org/#cannot-have-a-username-password-port)
    #[must_use]
    pub fn has_opaque_path(&self) -> bool {
        matches!(self.path, UrlPath::Opaque(_))
    }

    /// [URL Standard § 4.3 URL path serializer](https://url.spec.whatwg.org/#url-path-serializer)
    #[must_use]
    pub fn serialize_path(&self) -> String {
        match &self.path {
            UrlPath::Opaque(s) => s.clone(),
            UrlPath::List(segments) => segments.iter().map(|s| format!("/{s}")).collect(),
        }
    }

    /// [URL Standard § 4.3 URL serializer](https://url.spec.whatwg.org/#concept-url-serializer)
    #[must_use]
    pub fn serialize(&self, exclude_fragment: bool, rfc3986_norm: bool) -> String {
        let mut output = format!("{}:", self.scheme);

        if let Some(host) = &self.host {
            output.push_str("//");

            if self.includes_credentials() {
                output.push_str(&self.user);
                if !self.passwd.is_empty() {
                    output.push(':');
                    output.push_str(&self.passwd);
                }
                output.push('@');
            }

            output.push_str(&host.serialize());

            if let Some(port) = self.port {
                output.push(':');
                output.push_str(&port.to_string());
            }
        }

        if self.host.is_none() {
            if let UrlPath::List(segments) = &self.path {
                if segments.len() > 1 && segments[0].is_empty() {
                    output.push_str("/.");
                }
            }
        }

        output.push_str(&self.serialize_path());

        if let Some(query) = &self.query {
            output.push('?');
            output.push_str(query);
        }

        if !exclude_fragment {
            if let Some(fragment) = &self.fragment {
                output.push('#');
                output.push_str(fragment);
            }
        }

        if rfc3986_norm {
            let upper = percent_encoded_triplets_to_upper(&output);
            return percent_decode_unreserved(&upper);
        }

        output
    }

    /// [URL Standard § 4.5 URL origin](https://url.spec.whatwg.org/#concept-url-origin)
    #[must_use]
    pub fn origin(&self) -> Origin {
        if self.scheme == "blob" {
            let mut parser = UrlParser::new();
            let Some(path_url) = parser.parse(self.serialize_path(), None) else {
                return Origin::opaque();
            };
            if path_url.scheme != "http" && path_url.scheme != "https" {
                return Origin::opaque();
            }
            return path_url.origin();
        }

        if matches!(self.scheme.as_str(), "ftp" | "http" | "https" | "ws" | "wss") {
            return Origin {
                scheme: self.scheme.clone(),
                host: self.host.clone(),
                port: self.port,
                opaque: false,
            };
        }

        Origin::opaque()
    }
}

impl fmt::Display for Url {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize(false, false))
    }
}

/// [HTML Standard § 2.8 Origin](https://html.spec.whatwg.org/multipage/browsers.html#concept-origin)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Empty when `opaque` is true.
    pub scheme: String,
    /// `None` when `opaque` is true.
    pub host: Option<Host>,
    /// The port, if any.
    pub port: Option<u16>,
    /// Whether this is an opaque origin (serializes to `"null"`).
    pub opaque: bool,
}

impl Origin {
    fn opaque() -> Self {
        Self {
            scheme: String::new(),
            host: None,
            port: None,
            opaque: true,
        }
    }

    /// [HTML Standard § 2.8 ASCII serialisation of an origin](https://html.spec.whatwg.org/multipage/browsers.html#ascii-serialisation-of-an-origin)
    #[must_use]
    pub fn serialize(&self) -> String {
        if self.opaque {
            return "null".to_string();
        }

        let mut out = format!("{}://", self.scheme);
        if let Some(host) = &self.host {
            out.push_str(&host.serialize());
        }
        if let Some(port) = self.port {
            out.push(':');
            out.push_str(&port.to_string());
        }
        out
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.serialize())
    }
}

/// [§FileAPI Unicode Blob URLs](https://w3c.github.io/FileAPI/#unicodeBlobURL)
#[must_use]
pub fn blob_url_create(origin: &Origin) -> String {
    format!("blob:{}/{}", origin.serialize(), new_uuid_v4())
}

/// A UUIDv4, built from two process-seeded 64-bit hashes.
///
/// `std::collections::hash_map::RandomState` draws its keys from the OS
/// entropy source at construction time; hashing a handful of distinct
/// nonces with it is enough unpredictability for a Blob URL's path
/// component, without pulling in a dedicated RNG crate.
fn new_uuid_v4() -> String {
    use std::collections::hash_map::RandomState;
    use std::hash::{BuildHasher, Hash, Hasher};

    fn draw(nonce: u64) -> u64 {
        let mut hasher = RandomState::new().build_hasher();
        nonce.hash(&mut hasher);
        std::time::Instant::now().hash(&mut hasher);
        hasher.finish()
    }

    let hi = draw(1);
    let lo = draw(2);
    let mut bytes = [0u8; 16];
    bytes[..8].copy_from_slice(&hi.to_be_bytes());
    bytes[8..].copy_from_slice(&lo.to_be_bytes());

    bytes[6] = (bytes[6] & 0x0f) | 0x40; // version 4
    bytes[8] = (bytes[8] & 0x3f) | 0x80; // variant 1

    format!(
        "{:02x}{:02x}{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}-{:02x}{:02x}{:02x}{:02x}{:02x}{:02x}",
        bytes[0], bytes[1], bytes[2], bytes[3],
        bytes[4], bytes[5],
        bytes[6], bytes[7],
        bytes[8], bytes[9],
        bytes[10], bytes[11], bytes[12], bytes[13], bytes[14], bytes[15],
    )
}

/// Releases any process-wide resources held by the domain-to-ASCII layer.
///
/// The original engine links ICU and calls `u_cleanup()` here (`url.cpp`) to
/// release ICU's global caches before process exit, since ICU holds them for
/// the lifetime of the process otherwise. This crate's IDNA implementation
/// (`idna`, `punycode`) holds no such global state, so there is nothing to
/// release — this function exists only so callers ported from the original
/// embedding contract (which calls `icu_cleanup()` once at shutdown) have
/// something to call.
pub fn icu_cleanup() {}

/// [URL Standard § 4.4 Basic URL parser states](https://url.spec.whatwg.org/#scheme-start-state)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    SchemeStart,
    Scheme,
    NoScheme,
    SpecialRelativeOrAuthority,
    PathOrAuthority,
    Relative,
    RelativeSlash,
    SpecialAuthoritySlashes,
    SpecialAuthorityIgnoreSlashes,
    Authority,
    Host,
    Hostname,
    Port,
    File,
    FileSlash,
    FileHost,
    PathStart,
    Path,
    OpaquePath,
    Query,
    Fragment,
    Failure,
    Terminate,
}

/// A [basic URL parser](https://url.spec.whatwg.org/#concept-basic-url-parser).
///
/// Reusable across calls to `parse`; holds only an optional validation-error
/// sink as persistent state.
#[derive(Default)]
pub struct UrlParser {
    on_error: Option<Box<dyn FnMut(ValidationError)>>,
}

impl UrlParser {
    /// A parser with no error sink.
    #[must_use]
    pub fn new() -> Self {
        Self { on_error: None }
    }

    /// Set the sink validation errors are delivered to.
    pub fn set_on_error(&mut self, on_error: impl FnMut(ValidationError) + 'static) {
        self.on_error = Some(Box::new(on_error));
    }

    fn report(&mut self, err: ValidationError) {
        if let Some(sink) = &mut self.on_error {
            sink(err);
        }
    }

    /// [URL Standard § 4.4 concept-url-parser](https://url.spec.whatwg.org/#concept-url-parser)
    pub fn parse(&mut self, input: impl Into<String>, base: Option<Url>) -> Option<Url> {
        let input = input.into();
        if input.is_empty() && base.is_none() {
            return None;
        }
        self.parse_basic(input, base, None, None)
    }

    /// [URL Standard § 4.4 concept-basic-url-parser](https://url.spec.whatwg.org/#concept-basic-url-parser)
    ///
    /// Per `SPEC_FULL.md`'s note on the original's `parse_basic`: when `url`
    /// is `Some`, parsing continues an already-partially-constructed URL
    /// (used by setter algorithms via `state_override`) rather than
    /// discarding it.
    pub fn parse_basic(
        &mut self,
        input: String,
        base: Option<Url>,
        url: Option<Url>,
        state_override: Option<()>,
    ) -> Option<Url> {
        let mut state = BasicParser::new(input, base, url, state_override, self);
        state.run()
    }
}

struct BasicParser<'p> {
    parser: &'p mut UrlParser,
    base: Option<Url>,
    state_override: Option<ParserState>,
    url: Url,
    state: ParserState,
    buffer: String,
    at_sign_seen: bool,
    inside_brackets: bool,
    password_token_seen: bool,
    chars: Vec<char>,
    pos: i64,
}

impl<'p> BasicParser<'p> {
    fn new(
        mut input: String,
        base: Option<Url>,
        url: Option<Url>,
        _state_override: Option<()>,
        parser: &'p mut UrlParser,
    ) -> Self {
        let existing_url = url.is_some();
        let mut resolved_url = url.unwrap_or_default();

        if !existing_url {
            let mut trimmed = false;
            while input.starts_with(is_c0_or_space) {
                input.remove(0);
                trimmed = true;
            }
            while input.ends_with(is_c0_or_space) {
                input.pop();
                trimmed = true;
            }
            if trimmed {
                parser.report(ValidationError::InvalidUrlUnit);
            }
        }

        let before = input.len();
        input.retain(|c| !matches!(c, '\t' | '\n' | '\r'));
        if input.len() != before {
            parser.report(ValidationError::InvalidUrlUnit);
        }

        if !existing_url {
            resolved_url = Url::default();
        }

        let chars: Vec<char> = input.chars().collect();

        Self {
            parser,
            base,
            state_override: None,
            url: resolved_url,
            state: ParserState::SchemeStart,
            buffer: String::new(),
            at_sign_seen: false,
            inside_brackets: false,
            password_token_seen: false,
            chars,
            pos: 0,
        }
    }

    fn report(&mut self, err: ValidationError) {
        self.parser.report(err);
    }

    fn is_eof(&self) -> bool {
        self.pos < 0 || self.pos as usize >= self.chars.len()
    }

    fn peek(&self) -> Option<char> {
        if self.pos < 0 {
            return None;
        }
        self.chars.get(self.pos as usize).copied()
    }

    fn current_as_string(&self) -> String {
        self.peek().map(String::from).unwrap_or_default()
    }

    fn remaining_from(&self, n: i64) -> String {
        let start = self.pos + n;
        if start < 0 {
            return self.chars.iter().collect();
        }
        let start = start as usize;
        if start >= self.chars.len() {
            return String::new();
        }
        self.chars[start..].iter().collect()
    }

    fn advance(&mut self, n: i64) {
        self.pos += n;
    }

    fn back(&mut self, n: i64) {
        self.pos -= n;
    }

    fn reset_pos(&mut self) {
        self.pos = 0;
    }

    fn run(&mut self) -> Option<Url> {
        loop {
            match self.state {
                ParserState::SchemeStart => self.state_scheme_start(),
                ParserState::Scheme => self.state_scheme(),
                ParserState::NoScheme => self.state_no_scheme(),
                ParserState::SpecialRelativeOrAuthority => self.state_special_relative_or_authority(),
                ParserState::PathOrAuthority => self.state_path_or_authority(),
                ParserState::Relative => self.state_relative(),
                ParserState::RelativeSlash => self.state_relative_slash(),
                ParserState::SpecialAuthoritySlashes => self.state_special_authority_slashes(),
                ParserState::SpecialAuthorityIgnoreSlashes => self.state_special_authority_ignore_slashes(),
                ParserState::Authority => self.state_authority(),
                ParserState::Host | ParserState::Hostname => self.state_host(),
                ParserState::Port => self.state_port(),
                ParserState::File => self.state_file(),
                ParserState::FileSlash => self.state_file_slash(),
                ParserState::FileHost => self.state_file_host(),
                ParserState::PathStart => self.state_path_start(),
                ParserState::Path => self.state_path(),
                ParserState::OpaquePath => self.state_opaque_path(),
                ParserState::Query => self.state_query(),
                ParserState::Fragment => self.state_fragment(),
                ParserState::Failure => return None,
                ParserState::Terminate => return Some(self.url.clone()),
            }

            if self.is_eof() && self.pos != i64::MIN {
                if matches!(self.state, ParserState::Failure) {
                    return None;
                }
                if self.pos >= self.chars.len() as i64 {
                    break;
                }
            }

            self.advance(1);
        }

        Some(self.url.clone())
    }

    // https://url.spec.whatwg.org/#scheme-start-state
    fn state_scheme_start(&mut self) {
        if let Some(c) = self.peek() {
            if c.is_ascii_alphabetic() {
                self.buffer.push(c.to_ascii_lowercase());
                self.state = ParserState::Scheme;
                return;
            }
        }
        if self.state_override.is_none() {
            self.state = ParserState::NoScheme;
            self.back(1);
        } else {
            self.state = ParserState::Failure;
        }
    }

    // https://url.spec.whatwg.org/#scheme-state
    fn state_scheme(&mut self) {
        if let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.') {
                self.buffer.push(c.to_ascii_lowercase());
                return;
            }
            if c == ':' {
                if self.state_override.is_some() {
                    if is_special_scheme(&self.url.scheme) && !is_special_scheme(&self.buffer) {
                        self.state = ParserState::Terminate;
                        return;
                    }
                    if !is_special_scheme(&self.url.scheme) && is_special_scheme(&self.buffer) {
                        self.state = ParserState::Terminate;
                        return;
                    }
                    if (self.url.includes_credentials() || self.url.port.is_some()) && self.buffer == "file" {
                        self.state = ParserState::Terminate;
                        return;
                    }
                    if self.url.scheme == "file" && matches!(self.url.host, Some(Host::Empty)) {
                        self.state = ParserState::Terminate;
                        return;
                    }
                }

                self.url.scheme = std::mem::take(&mut self.buffer);

                if self.state_override.is_some() {
                    if is_special_scheme(&self.url.scheme) && self.url.port == special_scheme_port(&self.url.scheme) {
                        self.url.port = None;
                    }
                    self.state = ParserState::Terminate;
                    return;
                }

                self.buffer.clear();

                if self.url.scheme == "file" {
                    if !self.remaining_from(1).starts_with("//") {
                        self.report(ValidationError::SpecialSchemeMissingFollowingSolidus);
                    }
                    self.state = ParserState::File;
                } else if is_special_scheme(&self.url.scheme)
                    && self.base.as_ref().is_some_and(|b| b.scheme == self.url.scheme)
                {
                    self.state = ParserState::SpecialRelativeOrAuthority;
                } else if is_special_scheme(&self.url.scheme) {
                    self.state = ParserState::SpecialAuthoritySlashes;
                } else if self.remaining_from(1).starts_with('/') {
                    self.state = ParserState::PathOrAuthority;
                    self.advance(1);
                } else {
                    self.url.path = UrlPath::Opaque(String::new());
                    self.state = ParserState::OpaquePath;
                }
                return;
            }
        }

        if self.state_override.is_none() {
            self.buffer.clear();
            self.state = ParserState::NoScheme;
            self.reset_pos();
            self.back(1);
        } else {
            self.state = ParserState::Failure;
        }
    }

    // https://url.spec.whatwg.org/#no-scheme-state
    fn state_no_scheme(&mut self) {
        let c = self.peek();

        if self.base.is_none() || (self.base.as_ref().is_some_and(Url::has_opaque_path) && c != Some('#')) {
            self.report(ValidationError::MissingSchemeNonRelativeUrl);
            self.state = ParserState::Failure;
            return;
        }

        let base = self.base.clone().expect("checked above");
        if base.has_opaque_path() && c == Some('#') {
            self.url.scheme = base.scheme;
            self.url.path = base.path;
            self.url.query = base.query;
            self.url.fragment = Some(String::new());
            self.state = ParserState::Fragment;
        } else if base.scheme != "file" {
            self.state = ParserState::Relative;
            self.back(1);
        } else {
            self.state = ParserState::File;
            self.back(1);
        }
    }

    // https://url.spec.whatwg.org/#special-relative-or-authority-state
    fn state_special_relative_or_authority(&mut self) {
        if self.peek() == Some('/') && self.remaining_from(1).starts_with('/') {
            self.state = ParserState::SpecialAuthorityIgnoreSlashes;
            self.advance(1);
        } else {
            self.report(ValidationError::SpecialSchemeMissingFollowingSolidus);
            self.state = ParserState::Relative;
            self.back(1);
        }
    }

    // https://url.spec.whatwg.org/#path-or-authority-state
    fn state_path_or_authority(&mut self) {
        if self.peek() == Some('/') {
            self.state = ParserState::Authority;
        } else {
            self.state = ParserState::Path;
            self.back(1);
        }
    }

    // https://url.spec.whatwg.org/#relative-state
    fn state_relative(&mut self) {
        let base = self.base.clone().expect("relative state requires a base");
        debug_assert_ne!(base.scheme, "file");
        self.url.scheme.clone_from(&base.scheme);

        let c = self.peek();
        if c == Some('/') {
            self.state = ParserState::RelativeSlash;
        } else if is_special_scheme(&self.url.scheme) && c == Some('\\') {
            self.report(ValidationError::InvalidReverseSolidus);
            self.state = ParserState::RelativeSlash;
        } else {
            self.url.user.clone_from(&base.user);
            self.url.passwd.clone_from(&base.passwd);
            self.url.host.clone_from(&base.host);
            self.url.port = base.port;
            self.url.path = base.path.clone();
            self.url.query.clone_from(&base.query);

            if c == Some('?') {
                self.url.query = Some(String::new());
                self.state = ParserState::Query;
            } else if c == Some('#') {
                self.url.fragment = Some(String::new());
                self.state = ParserState::Fragment;
            } else if !self.is_eof() {
                self.url.query = None;
                shorten_url_path(&mut self.url);
                self.state = ParserState::Path;
                self.back(1);
            }
        }
    }

    // https://url.spec.whatwg.org/#relative-slash-state
    fn state_relative_slash(&mut self) {
        let c = self.peek();
        if is_special_scheme(&self.url.scheme) && matches!(c, Some('/') | Some('\\')) {
            if c == Some('\\') {
                self.report(ValidationError::InvalidReverseSolidus);
            }
            self.state = ParserState::SpecialAuthorityIgnoreSlashes;
        } else if c == Some('/') {
            self.state = ParserState::Authority;
        } else {
            let base = self.base.clone().expect("relative-slash state requires a base");
            self.url.user = base.user;
            self.url.passwd = base.passwd;
            self.url.host = base.host;
            self.url.port = base.port;
            self.state = ParserState::Path;
            self.back(1);
        }
    }

    // https://url.spec.whatwg.org/#special-authority-slashes-state
    fn state_special_authority_slashes(&mut self) {
        if self.peek() == Some('/') && self.remaining_from(1).starts_with('/') {
            self.state = ParserState::SpecialAuthorityIgnoreSlashes;
            self.advance(1);
        } else {
            self.report(ValidationError::SpecialSchemeMissingFollowingSolidus);
            self.state = ParserState::SpecialAuthorityIgnoreSlashes;
            self.back(1);
        }
    }

    // https://url.spec.whatwg.org/#special-authority-ignore-slashes-state
    fn state_special_authority_ignore_slashes(&mut self) {
        let c = self.peek();
        if c != Some('/') && c != Some('\\') {
            self.state = ParserState::Authority;
            self.back(1);
        } else {
            self.report(ValidationError::SpecialSchemeMissingFollowingSolidus);
        }
    }

    // https://url.spec.whatwg.org/#authority-state
    fn state_authority(&mut self) {
        let c = self.peek();
        if c == Some('@') {
            self.report(ValidationError::InvalidCredentials);

            if self.at_sign_seen {
                self.buffer.insert_str(0, "%40");
            }
            self.at_sign_seen = true;

            for ch in self.buffer.clone().chars() {
                if ch == ':' && !self.password_token_seen {
                    self.password_token_seen = true;
                    continue;
                }
                let encoded = percent_encode(&ch.to_string(), PercentEncodeSet::Userinfo);
                if self.password_token_seen {
                    self.url.passwd.push_str(&encoded);
                } else {
                    self.url.user.push_str(&encoded);
                }
            }

            self.buffer.clear();
        } else if self.is_eof()
            || c == Some('/')
            || c == Some('?')
            || c == Some('#')
            || (is_special_scheme(&self.url.scheme) && c == Some('\\'))
        {
            if self.at_sign_seen && self.buffer.is_empty() {
                self.report(ValidationError::HostMissing);
                self.state = ParserState::Failure;
                return;
            }

            self.back(self.buffer.chars().count() as i64 + 1);
            self.buffer.clear();
            self.state = ParserState::Host;
        } else if let Some(c) = c {
            self.buffer.push(c);
        }
    }

    // https://url.spec.whatwg.org/#host-state
    fn state_host(&mut self) {
        let c = self.peek();

        if self.state_override.is_some() && self.url.scheme == "file" {
            self.back(1);
            self.state = ParserState::FileHost;
        } else if c == Some(':') && !self.inside_brackets {
            if self.buffer.is_empty() {
                self.report(ValidationError::HostMissing);
                self.state = ParserState::Failure;
                return;
            }
            if self.state_override == Some(ParserState::Hostname) {
                self.state = ParserState::Terminate;
                return;
            }

            let not_special = !is_special_scheme(&self.url.scheme);
            let buffer = std::mem::take(&mut self.buffer);
            let Some(host) = self.parse_host(&buffer, not_special) else {
                self.state = ParserState::Failure;
                return;
            };
            self.url.host = Some(host);
            self.state = ParserState::Port;
        } else if self.is_eof()
            || c == Some('/')
            || c == Some('?')
            || c == Some('#')
            || (is_special_scheme(&self.url.scheme) && c == Some('\\'))
        {
            self.back(1);

            if is_special_scheme(&self.url.scheme) && self.buffer.is_empty() {
                self.report(ValidationError::HostMissing);
                self.state = ParserState::Failure;
                return;
            }

            if self.state_override.is_some()
                && self.buffer.is_empty()
                && (self.url.includes_credentials() || self.url.port.is_some())
            {
                self.state = ParserState::Terminate;
                return;
            }

            let not_special = !is_special_scheme(&self.url.scheme);
            let buffer = std::mem::take(&mut self.buffer);
            let Some(host) = self.parse_host(&buffer, not_special) else {
                self.state = ParserState::Failure;
                return;
            };
            self.url.host = Some(host);

            self.state = ParserState::PathStart;
            if self.state_override.is_some() {
                self.state = ParserState::Terminate;
            }
        } else if let Some(c) = c {
            if c == '[' {
                self.inside_brackets = true;
            }
            if c == ']' {
                self.inside_brackets = false;
            }
            self.buffer.push(c);
        }
    }

    fn parse_host(&mut self, input: &str, is_not_special: bool) -> Option<Host> {
        let parser = &mut self.parser;
        host::parse_host(input, is_not_special, |e| parser.report(e))
    }

    // https://url.spec.whatwg.org/#port-state
    fn state_port(&mut self) {
        let c = self.peek();
        if let Some(c) = c {
            if c.is_ascii_digit() {
                self.buffer.push(c);
                return;
            }
        }

        if self.is_eof()
            || c == Some('/')
            || c == Some('?')
            || c == Some('#')
            || (is_special_scheme(&self.url.scheme) && c == Some('\\'))
            || self.state_override.is_some()
        {
            if !self.buffer.is_empty() {
                let Ok(port) = self.buffer.parse::<u32>() else {
                    self.state = ParserState::Failure;
                    return;
                };
                if port > u32::from(u16::MAX) {
                    self.report(ValidationError::PortOutOfRange);
                    self.state = ParserState::Failure;
                    return;
                }
                let port = port as u16;
                if is_special_scheme(&self.url.scheme) && Some(port) == special_scheme_port(&self.url.scheme) {
                    self.url.port = None;
                } else {
                    self.url.port = Some(port);
                }
                self.buffer.clear();
            }

            if self.state_override.is_some() {
                self.state = ParserState::Terminate;
                return;
            }

            self.state = ParserState::PathStart;
            self.back(1);
        } else {
            self.report(ValidationError::PortInvalid);
            self.state = ParserState::Failure;
        }
    }

    // https://url.spec.whatwg.org/#file-state
    fn state_file(&mut self) {
        self.url.scheme = "file".to_string();
        self.url.host = Some(Host::Empty);

        let c = self.peek();
        if matches!(c, Some('/') | Some('\\')) {
            if c == Some('\\') {
                self.report(ValidationError::InvalidReverseSolidus);
            }
            self.state = ParserState::FileSlash;
        } else if self.base.as_ref().is_some_and(|b| b.scheme == "file") {
            let base = self.base.clone().expect("checked above");
            self.url.host = base.host;
            self.url.path = base.path;
            self.url.query = base.query;

            if c == Some('?') {
                self.url.query = Some(String::new());
                self.state = ParserState::Query;
            } else if c == Some('#') {
                self.url.fragment = Some(String::new());
                self.state = ParserState::Fragment;
            } else if !self.is_eof() {
                self.url.query = None;
                if !starts_with_windows_drive_letter(&self.remaining_from(0)) {
                    shorten_url_path(&mut self.url);
                } else {
                    self.report(ValidationError::FileInvalidWindowsDriveLetter);
                    self.url.path = UrlPath::List(Vec::new());
                }
                self.state = ParserState::Path;
                self.back(1);
            }
        } else {
            self.state = ParserState::Path;
            self.back(1);
        }
    }

    // https://url.spec.whatwg.org/#file-slash-state
    fn state_file_slash(&mut self) {
        let c = self.peek();
        if matches!(c, Some('/') | Some('\\')) {
            if c == Some('\\') {
                self.report(ValidationError::InvalidReverseSolidus);
            }
            self.state = ParserState::FileHost;
        } else {
            if let Some(base) = self.base.clone() {
                if base.scheme == "file" {
                    self.url.host = base.host;
                    let base_first = base.path.list().first().cloned();
                    if !starts_with_windows_drive_letter(&self.remaining_from(0))
                        && base_first.as_deref().is_some_and(is_normal_windows_drive_letter)
                    {
                        if let Some(first) = base_first {
                            self.url.path.list_mut().push(first);
                        }
                    }
                }
            }
            self.state = ParserState::Path;
            self.back(1);
        }
    }

    // https://url.spec.whatwg.org/#file-host-state
    fn state_file_host(&mut self) {
        let c = self.peek();
        if self.is_eof() || matches!(c, Some('/') | Some('\\') | Some('?') | Some('#')) {
            self.back(1);

            if self.state_override.is_none() && is_windows_drive_letter(&self.buffer) {
                self.report(ValidationError::FileInvalidWindowsDriveLetterHost);
                self.state = ParserState::Path;
            } else if self.buffer.is_empty() {
                self.url.host = Some(Host::Empty);
                if self.state_override.is_some() {
                    self.state = ParserState::Terminate;
                    return;
                }
                self.state = ParserState::PathStart;
            } else {
                let buffer = std::mem::take(&mut self.buffer);
                let Some(mut host) = self.parse_host(&buffer, false) else {
                    self.state = ParserState::Failure;
                    return;
                };
                if matches!(&host, Host::Domain(d) if d == "localhost") {
                    host = Host::Empty;
                }
                self.url.host = Some(host);

                if self.state_override.is_some() {
                    self.state = ParserState::Terminate;
                    return;
                }
                self.buffer.clear();
                self.state = ParserState::PathStart;
            }
        } else if let Some(c) = c {
            self.buffer.push(c);
        }
    }

    // https://url.spec.whatwg.org/#path-start-state
    fn state_path_start(&mut self) {
        let c = self.peek();
        if is_special_scheme(&self.url.scheme) {
            if c == Some('\\') {
                self.report(ValidationError::InvalidReverseSolidus);
            }
            self.state = ParserState::Path;
            if c != Some('/') && c != Some('\\') {
                self.back(1);
            }
        } else if self.state_override.is_none() && c == Some('?') {
            self.url.query = Some(String::new());
            self.state = ParserState::Query;
        } else if self.state_override.is_none() && c == Some('#') {
            self.url.fragment = Some(String::new());
            self.state = ParserState::Fragment;
        } else if !self.is_eof() {
            self.state = ParserState::Path;
            if c != Some('/') {
                self.back(1);
            }
        } else if self.state_override.is_some() && self.url.host.is_none() {
            self.url.path.list_mut().push(String::new());
        }
    }

    // https://url.spec.whatwg.org/#path-state
    fn state_path(&mut self) {
        let c = self.peek();
        let is_slashlike = self.is_eof()
            || c == Some('/')
            || (is_special_scheme(&self.url.scheme) && c == Some('\\'))
            || (self.state_override.is_none() && matches!(c, Some('?') | Some('#')));

        if is_slashlike {
            if is_special_scheme(&self.url.scheme) && c == Some('\\') {
                self.report(ValidationError::InvalidReverseSolidus);
            }

            let lowered = self.buffer.to_ascii_lowercase();
            if self.buffer == ".." || lowered == ".%2e" || lowered == "%2e." || lowered == "%2e%2e" {
                shorten_url_path(&mut self.url);
                if c != Some('/') && !(is_special_scheme(&self.url.scheme) && c == Some('\\')) {
                    self.url.path.list_mut().push(String::new());
                }
            } else if (self.buffer == "." || lowered == "%2e")
                && (c != Some('/') && !(is_special_scheme(&self.url.scheme) && c == Some('\\')))
            {
                self.url.path.list_mut().push(String::new());
            } else if self.buffer != "." && lowered != "%2e" {
                if self.url.scheme == "file" && self.url.path.list().is_empty() && is_windows_drive_letter(&self.buffer) {
                    let mut chars: Vec<char> = self.buffer.chars().collect();
                    chars[1] = ':';
                    self.buffer = chars.into_iter().collect();
                }
                let segment = std::mem::take(&mut self.buffer);
                self.url.path.list_mut().push(segment);
            }

            self.buffer.clear();

            if c == Some('?') {
                self.url.query = Some(String::new());
                self.state = ParserState::Query;
            }
            if c == Some('#') {
                self.url.fragment = Some(String::new());
                self.state = ParserState::Fragment;
            }
        } else if let Some(c) = c {
            let rest = self.remaining_from(0);
            if !host::is_url_codepoint(rest.chars().next().map_or(0, |c| c as u32)) && c != '%' {
                self.report(ValidationError::InvalidUrlUnit);
            }

            if c == '%' {
                let ahead = self.remaining_from(1);
                let mut it = ahead.chars();
                let a = it.next();
                let b = it.next();
                if !(a.is_some_and(|c| c.is_ascii_hexdigit()) && b.is_some_and(|c| c.is_ascii_hexdigit())) {
                    self.report(ValidationError::InvalidUrlUnit);
                }
            }

            self.buffer.push_str(&percent_encode(&self.current_as_string(), PercentEncodeSet::Path));
        }
    }

    // https://url.spec.whatwg.org/#cannot-be-a-base-url-path-state
    fn state_opaque_path(&mut self) {
        let c = self.peek();
        if c == Some('?') {
            self.url.query = Some(String::new());
            self.state = ParserState::Query;
        } else if c == Some('#') {
            self.url.fragment = Some(String::new());
            self.state = ParserState::Fragment;
        } else if c == Some(' ') {
            let next = self.remaining_from(1).chars().next();
            if matches!(next, Some('?') | Some('#')) {
                push_opaque(&mut self.url, "%20");
            } else {
                push_opaque(&mut self.url, " ");
            }
        } else if let Some(c) = c {
            let rest = self.remaining_from(0);
            if !host::is_url_codepoint(rest.chars().next().map_or(0, |cp| cp as u32)) && c != '%' {
                self.report(ValidationError::InvalidUrlUnit);
            }
            if c == '%' {
                let ahead = self.remaining_from(1);
                let mut it = ahead.chars();
                let a = it.next();
                let b = it.next();
                if !(a.is_some_and(|c| c.is_ascii_hexdigit()) && b.is_some_and(|c| c.is_ascii_hexdigit())) {
                    self.report(ValidationError::InvalidUrlUnit);
                }
            }
            let encoded = percent_encode(&self.current_as_string(), PercentEncodeSet::C0Control);
            push_opaque(&mut self.url, &encoded);
        }
    }

    // https://url.spec.whatwg.org/#query-state
    fn state_query(&mut self) {
        let c = self.peek();
        if (self.state_override.is_none() && c == Some('#')) || self.is_eof() {
            let set = if is_special_scheme(&self.url.scheme) {
                PercentEncodeSet::SpecialQuery
            } else {
                PercentEncodeSet::Query
            };
            let encoded = percent_encode(&self.buffer, set);
            if let Some(query) = &mut self.url.query {
                query.push_str(&encoded);
            } else {
                self.url.query = Some(encoded);
            }
            self.buffer.clear();

            if c == Some('#') {
                self.url.fragment = Some(String::new());
                self.state = ParserState::Fragment;
            }
        } else if !self.is_eof() {
            let c = c.expect("checked above");
            let rest = self.remaining_from(0);
            if !host::is_url_codepoint(rest.chars().next().map_or(0, |cp| cp as u32)) && c != '%' {
                self.report(ValidationError::InvalidUrlUnit);
            }
            if c == '%' {
                let ahead = self.remaining_from(1);
                let mut it = ahead.chars();
                let a = it.next();
                let b = it.next();
                if !(a.is_some_and(|c| c.is_ascii_hexdigit()) && b.is_some_and(|c| c.is_ascii_hexdigit())) {
                    self.report(ValidationError::InvalidUrlUnit);
                }
            }
            self.buffer.push(c);
        }
    }

    // https://url.spec.whatwg.org/#fragment-state
    fn state_fragment(&mut self) {
        if self.is_eof() {
            return;
        }
        let c = self.peek().expect("checked above");
        let rest = self.remaining_from(0);
        if !host::is_url_codepoint(rest.chars().next().map_or(0, |cp| cp as u32)) && c != '%' {
            self.report(ValidationError::InvalidUrlUnit);
        }
        if c == '%' {
            let ahead = self.remaining_from(1);
            let mut it = ahead.chars();
            let a = it.next();
            let b = it.next();
            if !(a.is_some_and(|c| c.is_ascii_hexdigit()) && b.is_some_and(|c| c.is_ascii_hexdigit())) {
                self.report(ValidationError::InvalidUrlUnit);
            }
        }
        let encoded = percent_encode(&self.current_as_string(), PercentEncodeSet::Fragment);
        if let Some(fragment) = &mut self.url.fragment {
            fragment.push_str(&encoded);
        } else {
            self.url.fragment = Some(encoded);
        }
    }
}

fn push_opaque(url: &mut Url, s: &str) {
    if let UrlPath::Opaque(path) = &mut url.path {
        path.push_str(s);
    }
}

fn is_c0_or_space(c: char) -> bool {
    (c as u32) <= 0x20
}

// https://url.spec.whatwg.org/#start-with-a-windows-drive-letter
fn starts_with_windows_drive_letter(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    if chars.len() < 2 {
        return false;
    }
    if !chars[0].is_ascii_alphabetic() || !matches!(chars[1], ':' | '|') {
        return false;
    }
    if chars.len() == 2 {
        return true;
    }
    matches!(chars[2], '/' | '\\' | '?' | '#')
}

// https://url.spec.whatwg.org/#windows-drive-letter
fn is_windows_drive_letter(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    chars.len() == 2 && chars[0].is_ascii_alphabetic() && matches!(chars[1], ':' | '|')
}

// https://url.spec.whatwg.org/#normalized-windows-drive-letter
fn is_normal_windows_drive_letter(input: &str) -> bool {
    let chars: Vec<char> = input.chars().collect();
    chars.len() == 2 && chars[0].is_ascii_alphabetic() && chars[1] == ':'
}

// https://url.spec.whatwg.org/#shorten-a-urls-path
fn shorten_url_path(url: &mut Url) {
    debug_assert!(!matches!(url.path, UrlPath::Opaque(_)));

    if url.scheme == "file" && url.path.list().len() == 1 && is_normal_windows_drive_letter(&url.path.list()[0]) {
        return;
    }

    if !url.path.list().is_empty() {
        url.path.list_mut().pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(input: &str) -> Option<Url> {
        UrlParser::new().parse(input, None)
    }

    fn parse_with_base(input: &str, base: &str) -> Option<Url> {
        let base_url = parse(base).expect("base parses");
        UrlParser::new().parse(input, Some(base_url))
    }

    #[test]
    fn scheme_and_host_are_lowercased_userinfo_is_not() {
        let url = parse("https://User@Example.COM/Foo").unwrap();
        assert_eq!(url.serialize(false, false), "https://User@example.com/Foo");
    }

    #[test]
    fn file_path_dot_dot_normalizes() {
        let url = parse("file:///a/b/../c").unwrap();
        assert_eq!(url.path, UrlPath::List(vec!["a".into(), "c".into()]));
        assert_eq!(url.serialize(false, false), "file:///a/c");
    }

    #[test]
    fn default_port_collapses_to_none() {
        let url = parse("http://127.0.0.1:80/").unwrap();
        assert_eq!(url.port, None);
        assert_eq!(url.serialize(false, false), "http://127.0.0.1/");
    }

    #[test]
    fn empty_input_with_no_base_fails() {
        assert!(parse("").is_none());
    }

    #[test]
    fn relative_resolution_against_base() {
        let url = parse_with_base("../c", "https://example.com/a/b").unwrap();
        assert_eq!(url.serialize(false, false), "https://example.com/c");
    }

    #[test]
    fn mailto_is_opaque_path() {
        let url = parse("mailto:foo@example.com").unwrap();
        assert!(url.has_opaque_path());
        assert_eq!(url.serialize(false, false), "mailto:foo@example.com");
    }

    #[test]
    fn ipv6_host_round_trips() {
        let url = parse("http://[::1]:8080/").unwrap();
        assert_eq!(url.serialize(false, false), "http://[::1]:8080/");
    }

    #[test]
    fn origin_for_http_is_tuple() {
        let url = parse("https://example.com:1234/x").unwrap();
        let origin = url.origin();
        assert_eq!(origin.serialize(), "https://example.com:1234");
    }

    #[test]
    fn origin_for_opaque_scheme_is_null() {
        let url = parse("mailto:a@b.com").unwrap();
        assert_eq!(url.origin().serialize(), "null");
    }

    #[test]
    fn blob_url_carries_origin_and_a_path() {
        let url = parse("https://example.com/").unwrap();
        let blob = blob_url_create(&url.origin());
        assert!(blob.starts_with("blob:https://example.com/"));
    }

    #[test]
    fn idempotent_reparse_of_serialization() {
        let url = parse("https://example.com/a/b?c=d#e").unwrap();
        let reparsed = parse(&url.serialize(false, false)).unwrap();
        assert_eq!(url, reparsed);
    }
}
