//! Parser infrastructure for ZScript.
//!
//! Provides the main [`Parser`] struct: the active parse context, token
//! navigation, and the error helpers every production goes through.

use std::sync::Arc;

use bumpalo::Bump;
use tracing::debug;
use zscript_core::{
    Diagnostics, LexError, ParseError, ParseErrorKind, ParseResult, SourceFile, SourceLocation,
    Span,
};

use super::declaration::Declaration;
use super::include::{IncludeHandler, IncludeSet};
use super::options::ParserOptions;
use crate::lexer::{Token, TokenKind, Tokenizer};

/// The stream currently being parsed, with its name and archive location.
#[derive(Clone)]
pub struct ParseContext<'ast> {
    pub(super) tokenizer: Tokenizer<'ast>,
    pub(super) source_name: &'ast str,
    pub(super) location: SourceLocation,
}

impl<'ast> ParseContext<'ast> {
    pub(super) fn new(file: SourceFile, arena: &'ast Bump) -> Self {
        Self {
            tokenizer: Tokenizer::new(file.data, arena),
            source_name: arena.alloc_str(&file.name),
            location: file.location,
        }
    }

    fn empty(arena: &'ast Bump) -> Self {
        Self::new(SourceFile::new("", Arc::<[u8]>::from(Vec::new())), arena)
    }

    /// Name of the stream, as used in error messages.
    pub fn source_name(&self) -> &'ast str {
        self.source_name
    }

    /// Archive the stream came from.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// Cursor position inside the stream.
    pub fn position(&self) -> Span {
        self.tokenizer.position()
    }
}

/// A saved parse context.
///
/// Taken before an include is delegated and handed back afterwards, so the
/// includer resumes right after its `#include` line.
#[derive(Clone)]
pub struct ContextSnapshot<'ast>(ParseContext<'ast>);

impl<'ast> ContextSnapshot<'ast> {
    pub fn context(&self) -> &ParseContext<'ast> {
        &self.0
    }
}

/// Declaration parser for ZScript sources.
///
/// One parser runs one session at a time: a root stream plus everything it
/// includes. The session keeps the set of included paths, the declarations
/// found so far, and a [`Diagnostics`] log whose first error ends the session.
///
/// The `'ast` lifetime refers to the arena where token lexemes and captured
/// token runs are allocated. Declarations borrow from it and outlive the
/// streams they were parsed from.
pub struct Parser<'ast> {
    /// Arena for lexemes and captured bodies
    pub(super) arena: &'ast Bump,
    pub(super) options: ParserOptions,
    /// The stream being parsed right now
    pub(super) context: ParseContext<'ast>,
    /// Paths already included this session
    pub(super) included: IncludeSet,
    pub(super) diagnostics: Diagnostics,
    pub(super) declarations: Vec<Declaration<'ast>>,
    /// Value of the last `version "x.y"` directive
    pub(super) language_version: Option<&'ast str>,
    /// Current include nesting
    pub(super) depth: usize,
}

impl<'ast> Parser<'ast> {
    /// Create a parser with default options.
    pub fn new(arena: &'ast Bump) -> Self {
        Self::with_options(arena, ParserOptions::default())
    }

    /// Create a parser with the given options.
    pub fn with_options(arena: &'ast Bump, options: ParserOptions) -> Self {
        Self {
            arena,
            options,
            context: ParseContext::empty(arena),
            included: IncludeSet::default(),
            diagnostics: Diagnostics::new(),
            declarations: Vec::new(),
            language_version: None,
            depth: 0,
        }
    }

    /// Parse `file` as the root of a new session.
    ///
    /// Everything a previous session left behind is discarded first. On
    /// failure the returned error is the first one recorded, which is also
    /// what [`diagnostics`](Self::diagnostics) keeps.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse(&mut self, file: SourceFile, includes: &mut dyn IncludeHandler) -> ParseResult<()> {
        self.reset();
        self.run_session(file, includes)
    }

    fn run_session(&mut self, file: SourceFile, includes: &mut dyn IncludeHandler) -> ParseResult<()> {
        let root = file.name.clone();
        let result = self.parse_source(file, includes);
        debug!(
            source = %root,
            declarations = self.declarations.len(),
            includes = self.included.len(),
            failed = self.diagnostics.has_error(),
            "session finished"
        );
        if let Some(error) = self.diagnostics.error() {
            return Err(error.clone());
        }
        result
    }

    /// Parse `file`, opened from an archive under its own path, as the root
    /// of a new session.
    ///
    /// Unlike [`parse`](Self::parse), the root's path counts as visited, so
    /// an include cycle back to it fails on its first repeated edge.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_root(&mut self, file: SourceFile, includes: &mut dyn IncludeHandler) -> ParseResult<()> {
        self.reset();
        self.included.insert_root(&file.name);
        self.run_session(file, includes)
    }

    /// Parse `file` as part of the current session.
    ///
    /// Include handlers call this for the stream they resolved. The active
    /// context is replaced and not restored here; the include resolver that
    /// called the handler restores it.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_source(
        &mut self,
        file: SourceFile,
        includes: &mut dyn IncludeHandler,
    ) -> ParseResult<()> {
        if let Some(error) = self.diagnostics.error() {
            return Err(error.clone());
        }
        debug!(source = %file.name, bytes = file.len(), depth = self.depth, "parsing source");
        self.context = ParseContext::new(file, self.arena);
        self.parse_top_level(includes)
    }

    /// Forget the include set, declarations, and diagnostics.
    pub fn reset(&mut self) {
        self.context = ParseContext::empty(self.arena);
        self.included.clear();
        self.diagnostics.clear();
        self.declarations.clear();
        self.language_version = None;
        self.depth = 0;
    }

    // ========================================================================
    // Session state
    // ========================================================================

    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    /// Give up the parser for its diagnostics.
    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Whether a hard error has been recorded this session.
    pub fn has_error(&self) -> bool {
        self.diagnostics.has_error()
    }

    /// Declarations in the order they were parsed.
    pub fn declarations(&self) -> &[Declaration<'ast>] {
        &self.declarations
    }

    /// Take the declarations, leaving none behind.
    pub fn take_declarations(&mut self) -> Vec<Declaration<'ast>> {
        std::mem::take(&mut self.declarations)
    }

    /// Language version requested by a `version` directive, if any.
    pub fn language_version(&self) -> Option<&'ast str> {
        self.language_version
    }

    /// Paths included this session, in inclusion order.
    pub fn included(&self) -> &IncludeSet {
        &self.included
    }

    /// Current include nesting; zero while parsing the root stream.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The active parse context.
    pub fn context(&self) -> &ParseContext<'ast> {
        &self.context
    }

    /// Direct access to the active tokenizer.
    pub fn tokenizer(&mut self) -> &mut Tokenizer<'ast> {
        &mut self.context.tokenizer
    }

    /// Capture the active context so it can be restored later.
    pub fn save_context(&self) -> ContextSnapshot<'ast> {
        ContextSnapshot(self.context.clone())
    }

    /// Make a previously saved context active again.
    pub fn restore_context(&mut self, snapshot: ContextSnapshot<'ast>) {
        self.context = snapshot.0;
    }

    // ========================================================================
    // Token Navigation
    // ========================================================================

    /// Skip trivia, then consume the next token.
    pub(super) fn next_significant(&mut self) -> Option<Token<'ast>> {
        self.context.tokenizer.next_significant()
    }

    /// Skip trivia and consume the next token if it has the given kind.
    pub(super) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        let start = self.context.tokenizer.position();
        match self.next_significant() {
            Some(token) if token.valid && token.kind == kind => Some(token),
            _ => {
                self.context.tokenizer.set_position(start);
                None
            }
        }
    }

    /// Skip trivia and consume a token of one of the given kinds.
    ///
    /// Anything else is a hard error naming `expected` and what was found.
    pub(super) fn expect(&mut self, kinds: &[TokenKind], expected: &str) -> ParseResult<Token<'ast>> {
        let token = self.next_significant();
        match token {
            Some(token) if !token.valid => Err(self.invalid_token(&token)),
            Some(token) if kinds.contains(&token.kind) => Ok(token),
            Some(token) if matches!(token.kind, TokenKind::CloseParen | TokenKind::CloseCurly) => {
                let error = ParseError::new(
                    ParseErrorKind::MismatchedDelimiter,
                    token.span,
                    format!(
                        "expected {expected}, found {} (closing parenthesis without an opening one)",
                        describe(Some(&token))
                    ),
                );
                Err(self.fail(error))
            }
            _ => {
                let span = self.span_or_here(token.as_ref());
                let error = ParseError::expected_token(span, expected, &describe(token.as_ref()));
                Err(self.fail(error))
            }
        }
    }

    /// Skip trivia and consume an identifier; `what` names its role.
    pub(super) fn expect_identifier(&mut self, what: &str) -> ParseResult<Token<'ast>> {
        let token = self.next_significant();
        match token {
            Some(token) if !token.valid => Err(self.invalid_token(&token)),
            Some(token) if token.kind == TokenKind::Identifier => Ok(token),
            _ => {
                let span = self.span_or_here(token.as_ref());
                let error = ParseError::expected_identifier(span, what, &describe(token.as_ref()));
                Err(self.fail(error))
            }
        }
    }

    fn span_or_here(&self, token: Option<&Token<'ast>>) -> Span {
        token.map_or_else(|| self.context.tokenizer.position(), |token| token.span)
    }

    // ========================================================================
    // Error Handling
    // ========================================================================

    /// Record `error` against the active source and hand it back for `?`.
    ///
    /// Only the first error of a session is kept.
    pub(super) fn fail(&mut self, mut error: ParseError) -> ParseError {
        if error.source_name.is_none() {
            error.source_name = Some(self.context.source_name.to_string());
        }
        if self.diagnostics.report(error.clone()) {
            debug!(kind = %error.kind, at = %error.span, "parse error: {}", error.message);
        }
        error
    }

    /// Record a new error of `kind` at `span`.
    pub(super) fn error_at(
        &mut self,
        kind: ParseErrorKind,
        span: Span,
        message: impl Into<String>,
    ) -> ParseError {
        self.fail(ParseError::new(kind, span, message))
    }

    /// Record the lexer's complaint about an invalid token.
    pub(super) fn invalid_token(&mut self, token: &Token<'ast>) -> ParseError {
        let error = token
            .lex_error()
            .unwrap_or(LexError::UnexpectedChar { ch: '\u{FFFD}', span: token.span });
        self.fail(error.into())
    }

    /// Append a non-fatal message to the warning log.
    pub(super) fn warn(&mut self, message: impl Into<String>) {
        self.diagnostics.warn(message);
    }
}

/// How a found token reads in an error message. End of stream is `<null>`.
pub(crate) fn describe(token: Option<&Token<'_>>) -> String {
    match token {
        None => "<null>".to_string(),
        Some(token) => match token.kind {
            TokenKind::Identifier
            | TokenKind::String
            | TokenKind::Name
            | TokenKind::Number
            | TokenKind::Other => format!("{} \"{}\"", token.kind, token.lexeme),
            kind => kind.description().to_string(),
        },
    }
}
