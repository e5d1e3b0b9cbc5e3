//! Error types for ZScript processing.
//!
//! ## Error Hierarchy
//!
//! ```text
//! LexError      - a token could not be formed (unterminated literal, stray byte)
//! ParseError    - structural and include errors (with ParseErrorKind)
//! ArchiveError  - the archive namespace could not supply a resource
//! ```
//!
//! A `LexError` never aborts tokenization by itself; the parser turns it into
//! a `ParseError` of kind [`ParseErrorKind::InvalidToken`].

use thiserror::Error;

use crate::Span;

// ============================================================================
// Lexer Errors
// ============================================================================

/// Errors that describe why a token could not be formed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A byte that starts no token.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedChar { ch: char, span: Span },

    /// A `"string"` literal without its closing quote.
    #[error("unterminated string at {span}")]
    UnterminatedString { span: Span },

    /// A `'name'` literal without its closing quote.
    #[error("unterminated name at {span}")]
    UnterminatedName { span: Span },

    /// A `/* */` comment without its closing marker.
    #[error("unterminated comment at {span}")]
    UnterminatedComment { span: Span },
}

impl LexError {
    /// Get the span where this error occurred.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedChar { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedName { span } => *span,
            LexError::UnterminatedComment { span } => *span,
        }
    }
}

// ============================================================================
// Parse Errors
// ============================================================================

/// Categories of parse errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParseErrorKind {
    /// A specific token kind was expected but something else was found.
    ExpectedToken,
    /// The stream ended while a token was still required.
    UnexpectedEof,
    /// An identifier was expected.
    ExpectedIdentifier,
    /// A `{ }` code block was expected.
    ExpectedBlock,
    /// A top-level declaration was expected.
    ExpectedDeclaration,
    /// A closing brace or parenthesis without an opening one.
    MismatchedDelimiter,
    /// The lexer could not form a token.
    InvalidToken,
    /// A class or struct header clause is out of order or repeated.
    InvalidHeader,
    /// A `#` directive other than `include`.
    UnknownDirective,
    /// An include path broke the archive path rules.
    InvalidIncludePath,
    /// An include path was already included in this session.
    DuplicateInclude,
    /// The include handler could not supply or parse the included file.
    IncludeFailed,
}

impl ParseErrorKind {
    /// Returns a human-readable name for this error kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseErrorKind::ExpectedToken => "expected token",
            ParseErrorKind::UnexpectedEof => "unexpected end of file",
            ParseErrorKind::ExpectedIdentifier => "expected identifier",
            ParseErrorKind::ExpectedBlock => "expected block",
            ParseErrorKind::ExpectedDeclaration => "expected declaration",
            ParseErrorKind::MismatchedDelimiter => "mismatched delimiter",
            ParseErrorKind::InvalidToken => "invalid token",
            ParseErrorKind::InvalidHeader => "invalid class header",
            ParseErrorKind::UnknownDirective => "unknown directive",
            ParseErrorKind::InvalidIncludePath => "invalid include path",
            ParseErrorKind::DuplicateInclude => "duplicate include",
            ParseErrorKind::IncludeFailed => "include failed",
        }
    }
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A parse error with location and context.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} at {span}: {message}")]
pub struct ParseError {
    /// The category of this error.
    pub kind: ParseErrorKind,
    /// The source location where the error occurred.
    pub span: Span,
    /// Name of the source file the span refers to, when known.
    pub source_name: Option<String>,
    /// A detailed error message.
    pub message: String,
}

impl ParseError {
    /// Create a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            source_name: None,
            message: message.into(),
        }
    }

    /// Attach the name of the file the error occurred in.
    pub fn in_source(mut self, source_name: impl Into<String>) -> Self {
        self.source_name = Some(source_name.into());
        self
    }

    /// Create an "expected token" error. `found` is `<null>` at end of stream.
    pub fn expected_token(span: Span, expected: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedToken,
            span,
            format!("expected {expected}, found {found}"),
        )
    }

    /// Create an "expected identifier" error.
    pub fn expected_identifier(span: Span, what: &str, found: &str) -> Self {
        Self::new(
            ParseErrorKind::ExpectedIdentifier,
            span,
            format!("expected {what}, found {found}"),
        )
    }

    /// Create an "unexpected EOF" error.
    pub fn unexpected_eof(span: Span) -> Self {
        Self::new(ParseErrorKind::UnexpectedEof, span, "expected a token")
    }

    /// Create an "unmatched closer" error.
    pub fn unmatched_closer(span: Span) -> Self {
        Self::new(
            ParseErrorKind::MismatchedDelimiter,
            span,
            "closing parenthesis without an opening one",
        )
    }

    /// The error as `source: kind at line:col: message`, or without the
    /// source prefix when the name is unknown.
    pub fn located(&self) -> String {
        match &self.source_name {
            Some(name) => format!("{name}: {self}"),
            None => self.to_string(),
        }
    }

    /// Format the error with source context for display.
    ///
    /// This provides a rich error message with the relevant source line
    /// and a caret pointing to the error location.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();

        let line = self.span.line;
        let column = self.span.col;

        match &self.source_name {
            Some(name) => {
                output.push_str(&format!("Error in {} at {}:{}: {}\n", name, line, column, self.kind))
            }
            None => output.push_str(&format!("Error at {}:{}: {}\n", line, column, self.kind)),
        }

        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = Self::get_line(source, line) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));

            let indent = " ".repeat(column.saturating_sub(1) as usize);
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }

    /// Get the text of a specific line (1-indexed).
    fn get_line(source: &str, line_num: u32) -> Option<String> {
        source
            .lines()
            .nth((line_num as usize).checked_sub(1)?)
            .map(|s| s.to_string())
    }
}

impl From<LexError> for ParseError {
    fn from(error: LexError) -> Self {
        ParseError::new(ParseErrorKind::InvalidToken, error.span(), error.to_string())
    }
}

// ============================================================================
// Archive Errors
// ============================================================================

/// Errors raised by a [`ResourceArchive`](crate::ResourceArchive).
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// No resource exists at the path.
    #[error("resource \"{0}\" not found")]
    NotFound(String),

    /// The resource exists but could not be read.
    #[error("failed to read \"{path}\": {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ParseResult<T> = Result<T, ParseError>;
