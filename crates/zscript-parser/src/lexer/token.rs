//! Token types and keyword lookup for the ZScript tokenizer.

use std::fmt;

use zscript_core::{LexError, Span};

/// A token from the source stream.
///
/// The `'ast` lifetime refers to the arena where the lexeme string is
/// allocated, so tokens stay valid after the source context that produced
/// them has been swapped out for an include.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    /// The type of token.
    pub kind: TokenKind,
    /// The exact source text of this token, case preserved.
    pub lexeme: &'ast str,
    /// False when the tokenizer could not form a well-formed token here.
    pub valid: bool,
    /// Location in source. `span.offset` is the rewind position.
    pub span: Span,
}

impl<'ast> Token<'ast> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, valid: bool, span: Span) -> Self {
        Self {
            kind,
            lexeme,
            valid,
            span,
        }
    }

    /// Byte offset the token started at.
    #[inline]
    pub fn position(&self) -> u32 {
        self.span.offset
    }

    /// Whitespace, newlines and comments.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        self.kind.is_trivia()
    }

    /// Case-insensitive comparison against an identifier.
    pub fn is_identifier(&self, name: &str) -> bool {
        self.kind == TokenKind::Identifier && self.lexeme.eq_ignore_ascii_case(name)
    }

    /// The text between the delimiters of a string or name literal.
    ///
    /// Other tokens are returned unchanged.
    pub fn unquoted(&self) -> &'ast str {
        match self.kind {
            TokenKind::String | TokenKind::Name if self.valid && self.lexeme.len() >= 2 => {
                &self.lexeme[1..self.lexeme.len() - 1]
            }
            _ => self.lexeme,
        }
    }

    /// Why this token is invalid, or `None` for a well-formed token.
    pub fn lex_error(&self) -> Option<LexError> {
        if self.valid {
            return None;
        }
        let span = self.span;
        Some(match self.kind {
            TokenKind::String => LexError::UnterminatedString { span },
            TokenKind::Name => LexError::UnterminatedName { span },
            TokenKind::BlockComment => LexError::UnterminatedComment { span },
            _ => LexError::UnexpectedChar {
                ch: self.lexeme.chars().next().unwrap_or('\u{FFFD}'),
                span,
            },
        })
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.valid {
            write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
        } else {
            write!(f, "{:?}!({:?} @ {:?})", self.kind, self.lexeme, self.span)
        }
    }
}

/// All token kinds the tokenizer distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Words and literals
    // =========================================
    /// Alphanumeric/underscore run not starting with a digit
    Identifier,
    /// `"double quoted"`
    String,
    /// `'single quoted'`
    Name,
    /// Numeric literal, recognized but not evaluated
    Number,

    // =========================================
    // Trivia
    // =========================================
    /// Run of spaces, tabs, carriage returns
    Whitespace,
    /// `\n`
    Newline,
    /// `/* ... */`
    BlockComment,
    /// `// ...`
    LineComment,

    // =========================================
    // Punctuation
    // =========================================
    /// `#`
    Preprocessor,
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `=`
    OpAssign,
    /// `.`
    Dot,

    /// Any other operator, with its full lexeme (`==`, `::`, `>>>=`, ...)
    Other,
}

impl TokenKind {
    /// Whitespace, newlines and comments.
    #[inline]
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Newline | TokenKind::BlockComment | TokenKind::LineComment
        )
    }

    /// Get the string representation of this token kind for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            Identifier => "identifier",
            String => "string",
            Name => "name",
            Number => "number",
            Whitespace => "whitespace",
            Newline => "newline",
            BlockComment => "block comment",
            LineComment => "line comment",
            Preprocessor => "'#'",
            OpenParen => "'('",
            CloseParen => "')'",
            OpenCurly => "'{'",
            CloseCurly => "'}'",
            Semicolon => "';'",
            Comma => "','",
            Colon => "':'",
            OpAssign => "'='",
            Dot => "'.'",
            Other => "operator",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Words the parser gives meaning to. Everything else is a plain identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Class,
    Struct,
    Const,
    Enum,
    Version,
    Replaces,
    Native,
    Include,
}

/// Look up a keyword, ignoring case.
pub fn lookup_keyword(lexeme: &str) -> Option<Keyword> {
    const KEYWORDS: [(&str, Keyword); 8] = [
        ("class", Keyword::Class),
        ("struct", Keyword::Struct),
        ("const", Keyword::Const),
        ("enum", Keyword::Enum),
        ("version", Keyword::Version),
        ("replaces", Keyword::Replaces),
        ("native", Keyword::Native),
        ("include", Keyword::Include),
    ];

    KEYWORDS
        .iter()
        .find(|(word, _)| word.eq_ignore_ascii_case(lexeme))
        .map(|&(_, keyword)| keyword)
}

/// Operators longer than one byte, longest first so the scan is greedy.
pub(crate) const MULTI_CHAR_OPERATORS: &[&str] = &[
    ">>>=", "<>=", "<<=", ">>=", ">>>", "**=", "...", "~==", "&&", "||", "==", "!=", "<=", ">=",
    "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "**", "->", "::",
    "..",
];
