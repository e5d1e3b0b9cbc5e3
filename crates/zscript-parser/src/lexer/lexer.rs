//! Tokenizer for ZScript byte streams.
//!
//! The [`Tokenizer`] produces one [`Token`] per call, trivia included, and
//! dispatches on the first byte. It never fails: a lexeme it cannot finish
//! comes back with `valid == false` and the caller decides what to do.
//!
//! Lexemes are copied into the arena, so tokens outlive the stream that
//! produced them.

use std::sync::Arc;

use bumpalo::Bump;
use zscript_core::Span;

use super::cursor::{Cursor, is_blank, is_ident_continue, is_ident_start};
use super::token::{MULTI_CHAR_OPERATORS, Token, TokenKind};

const BOM: &str = "\u{FEFF}";

/// Cursor-based lexer over a byte stream.
///
/// Lexing is a pure function of the stream and the cursor position: setting
/// the position back to a token's start yields that token again.
#[derive(Clone)]
pub struct Tokenizer<'ast> {
    /// Low-level byte cursor.
    cursor: Cursor,
    /// Arena for allocating token lexemes.
    arena: &'ast Bump,
}

impl<'ast> Tokenizer<'ast> {
    /// Create a tokenizer positioned at the start of `source`, past any BOM.
    pub fn new(source: Arc<[u8]>, arena: &'ast Bump) -> Self {
        let mut cursor = Cursor::new(source);
        if cursor.check_str(BOM) {
            cursor.advance_bytes(BOM.len());
            cursor.reset(Span::point(cursor.offset(), 1, 1));
        }
        Self { cursor, arena }
    }

    /// The stream being tokenized.
    pub fn source(&self) -> &Arc<[u8]> {
        self.cursor.source()
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> Span {
        self.cursor.mark()
    }

    /// Move the cursor to a position obtained from [`position`](Self::position).
    #[inline]
    pub fn set_position(&mut self, position: Span) {
        self.cursor.reset(position);
    }

    /// Move the cursor back to the start of `token`, so it is read again.
    #[inline]
    pub fn rewind(&mut self, token: &Token<'_>) {
        self.cursor.reset(Span::point(token.span.offset, token.span.line, token.span.col));
    }

    /// Whether the whole stream has been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.cursor.is_eof()
    }

    /// Consume and return the next token, or `None` at end of stream.
    pub fn next_token(&mut self) -> Option<Token<'ast>> {
        if self.cursor.is_eof() {
            return None;
        }
        Some(self.scan_token())
    }

    /// Return the next token without consuming it.
    pub fn peek_token(&mut self) -> Option<Token<'ast>> {
        let start = self.cursor.mark();
        let token = self.next_token();
        self.set_position(start);
        token
    }

    /// Kind of the token that starts at `position`, without moving the cursor.
    pub fn peek_kind_at(&mut self, position: Span) -> Option<TokenKind> {
        let saved = self.cursor.mark();
        self.set_position(position);
        let kind = self.next_token().map(|t| t.kind);
        self.set_position(saved);
        kind
    }

    /// Consume whitespace, newlines and comments up to the next significant token.
    ///
    /// An invalid comment is left in place so the next read reports it.
    pub fn skip_whitespace(&mut self) {
        loop {
            let start = self.cursor.mark();
            match self.next_token() {
                Some(token) if token.is_trivia() && token.valid => continue,
                Some(_) => {
                    self.set_position(start);
                    return;
                }
                None => return,
            }
        }
    }

    /// [`skip_whitespace`](Self::skip_whitespace), then [`next_token`](Self::next_token).
    pub fn next_significant(&mut self) -> Option<Token<'ast>> {
        self.skip_whitespace();
        self.next_token()
    }

    // =========================================
    // Internal: Token scanning
    // =========================================

    fn scan_token(&mut self) -> Token<'ast> {
        let start = self.cursor.mark();

        // Caller checked for EOF.
        let Some(b) = self.cursor.peek() else {
            return self.make_token(TokenKind::Other, start, false);
        };

        match b {
            b'\n' => {
                self.cursor.advance();
                self.make_token(TokenKind::Newline, start, true)
            }
            b if is_blank(b) => {
                self.cursor.eat_while(is_blank);
                self.make_token(TokenKind::Whitespace, start, true)
            }
            b'/' => self.scan_slash(start),
            b'"' => self.scan_quoted(b'"', TokenKind::String, start),
            b'\'' => self.scan_quoted(b'\'', TokenKind::Name, start),
            b'#' => {
                self.cursor.advance();
                self.make_token(TokenKind::Preprocessor, start, true)
            }
            b if b.is_ascii_digit() => self.scan_number(start),
            b'.' if self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.scan_number(start)
            }
            b if is_ident_start(b) => {
                self.cursor.eat_while(is_ident_continue);
                self.make_token(TokenKind::Identifier, start, true)
            }
            _ => self.scan_operator(start),
        }
    }

    /// Create a token from `start` to the current position.
    fn make_token(&self, kind: TokenKind, start: Span, valid: bool) -> Token<'ast> {
        let bytes = self.cursor.slice_from(start.offset);
        let lexeme = self.arena.alloc_str(&String::from_utf8_lossy(bytes));
        let span = Span::new(start.offset, start.line, start.col, bytes.len() as u32);
        Token::new(kind, lexeme, valid, span)
    }

    // =========================================
    // Scanning: Comments and slash
    // =========================================

    fn scan_slash(&mut self, start: Span) -> Token<'ast> {
        if self.cursor.eat_str("//") {
            self.cursor.eat_while(|b| b != b'\n');
            return self.make_token(TokenKind::LineComment, start, true);
        }

        if self.cursor.eat_str("/*") {
            loop {
                if self.cursor.eat_str("*/") {
                    return self.make_token(TokenKind::BlockComment, start, true);
                }
                if self.cursor.advance().is_none() {
                    return self.make_token(TokenKind::BlockComment, start, false);
                }
            }
        }

        self.scan_operator(start)
    }

    // =========================================
    // Scanning: Strings and names
    // =========================================

    /// Scan to the closing delimiter. Names may not span lines; strings may.
    fn scan_quoted(&mut self, quote: u8, kind: TokenKind, start: Span) -> Token<'ast> {
        self.cursor.advance(); // opening quote

        loop {
            match self.cursor.peek() {
                None => return self.make_token(kind, start, false),
                Some(b'\n') if kind == TokenKind::Name => {
                    return self.make_token(kind, start, false);
                }
                Some(b'\\') => {
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(b) if b == quote => {
                    self.cursor.advance();
                    return self.make_token(kind, start, true);
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }
    }

    // =========================================
    // Scanning: Numbers
    // =========================================

    /// Decimal, hex, fractional and exponent forms plus suffix letters.
    fn scan_number(&mut self, start: Span) -> Token<'ast> {
        if self.cursor.check_str("0x") || self.cursor.check_str("0X") {
            self.cursor.advance_bytes(2);
            self.cursor.eat_while(|b| b.is_ascii_hexdigit());
        } else {
            self.cursor.eat_while(|b| b.is_ascii_digit());
            // `1.x` is member access and `1..2` a range, not fractions.
            let member_or_range = self
                .cursor
                .peek_nth(1)
                .is_some_and(|b| is_ident_start(b) || b == b'.');
            if self.cursor.peek() == Some(b'.') && !member_or_range {
                self.cursor.advance();
                self.cursor.eat_while(|b| b.is_ascii_digit());
            }
            if matches!(self.cursor.peek(), Some(b'e' | b'E'))
                && (self.cursor.peek_nth(1).is_some_and(|b| b.is_ascii_digit())
                    || matches!(self.cursor.peek_nth(1), Some(b'+' | b'-'))
                        && self.cursor.peek_nth(2).is_some_and(|b| b.is_ascii_digit()))
            {
                self.cursor.advance_bytes(2);
                self.cursor.eat_while(|b| b.is_ascii_digit());
            }
        }

        self.cursor.eat_while(|b| matches!(b, b'f' | b'F' | b'u' | b'U' | b'l' | b'L'));
        self.make_token(TokenKind::Number, start, true)
    }

    // =========================================
    // Scanning: Operators
    // =========================================

    fn scan_operator(&mut self, start: Span) -> Token<'ast> {
        if let Some(op) = MULTI_CHAR_OPERATORS.iter().find(|op| self.cursor.check_str(op)) {
            self.cursor.advance_bytes(op.len());
            return self.make_token(TokenKind::Other, start, true);
        }

        let Some(c) = self.cursor.advance() else {
            return self.make_token(TokenKind::Other, start, false);
        };

        let kind = match c {
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'{' => TokenKind::OpenCurly,
            b'}' => TokenKind::CloseCurly,
            b';' => TokenKind::Semicolon,
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'=' => TokenKind::OpAssign,
            b'.' => TokenKind::Dot,
            b'+' | b'-' | b'*' | b'/' | b'%' | b'&' | b'|' | b'^' | b'~' | b'!' | b'<' | b'>'
            | b'?' | b'@' | b'[' | b']' | b'$' => TokenKind::Other,
            _ => {
                // Keep a multi-byte character together.
                if c >= 0x80 {
                    self.cursor.eat_while(|b| (0x80..0xC0).contains(&b));
                }
                return self.make_token(TokenKind::Other, start, false);
            }
        };

        self.make_token(kind, start, true)
    }
}

/// Iterate over every token, trivia included, until end of stream.
impl<'ast> Iterator for Tokenizer<'ast> {
    type Item = Token<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenizer<'a>(source: &str, arena: &'a Bump) -> Tokenizer<'a> {
        Tokenizer::new(Arc::from(source.as_bytes()), arena)
    }

    /// Helper to collect significant tokens from source.
    fn tokenize(source: &str) -> Vec<(TokenKind, String)> {
        let arena = Bump::new();
        tokenizer(source, &arena)
            .filter(|t| !t.is_trivia())
            .map(|t| (t.kind, t.lexeme.to_string()))
            .collect()
    }

    /// Helper to get every token kind, trivia included.
    fn all_kinds(source: &str) -> Vec<TokenKind> {
        let arena = Bump::new();
        tokenizer(source, &arena).map(|t| t.kind).collect()
    }

    fn ident(s: &str) -> (TokenKind, String) {
        (TokenKind::Identifier, s.to_string())
    }

    // =========================================
    // Basic tokens
    // =========================================

    #[test]
    fn empty_source() {
        let arena = Bump::new();
        assert!(tokenizer("", &arena).next_token().is_none());
    }

    #[test]
    fn trivia_tokens() {
        assert_eq!(
            all_kinds(" \t\n// line\n/* block */"),
            vec![
                TokenKind::Whitespace,
                TokenKind::Newline,
                TokenKind::LineComment,
                TokenKind::Newline,
                TokenKind::BlockComment,
            ]
        );
    }

    #[test]
    fn bom_is_skipped() {
        let arena = Bump::new();
        let mut tokenizer = tokenizer("\u{FEFF}hello", &arena);
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.lexeme, "hello");
        assert_eq!((token.span.offset, token.span.line, token.span.col), (3, 1, 1));
    }

    // =========================================
    // Identifiers, literals, numbers
    // =========================================

    #[test]
    fn identifiers_keep_case() {
        assert_eq!(tokenize("Class _foo bar123"), vec![ident("Class"), ident("_foo"), ident("bar123")]);
    }

    #[test]
    fn strings_and_names() {
        assert_eq!(
            tokenize(r#""a \"b\"" 'Fire'"#),
            vec![
                (TokenKind::String, r#""a \"b\"""#.to_string()),
                (TokenKind::Name, "'Fire'".to_string()),
            ]
        );
    }

    #[test]
    fn strings_may_span_lines() {
        let arena = Bump::new();
        let token = tokenizer("\"a\nb\"", &arena).next_token().unwrap();
        assert!(token.valid);
        assert_eq!(token.kind, TokenKind::String);
    }

    #[test]
    fn unterminated_literals_are_invalid() {
        let arena = Bump::new();

        let string = tokenizer("\"abc", &arena).next_token().unwrap();
        assert_eq!(string.kind, TokenKind::String);
        assert!(!string.valid);

        let name = tokenizer("'abc\n'", &arena).next_token().unwrap();
        assert_eq!(name.kind, TokenKind::Name);
        assert!(!name.valid);

        let comment = tokenizer("/* open", &arena).next_token().unwrap();
        assert_eq!(comment.kind, TokenKind::BlockComment);
        assert!(!comment.valid);
    }

    #[test]
    fn numbers() {
        let numbers: Vec<String> = tokenize("1 42 0x1F 3.14 .5 1e10 2.5e-3 1.0f 10u 7.")
            .into_iter()
            .map(|(kind, text)| {
                assert_eq!(kind, TokenKind::Number);
                text
            })
            .collect();
        assert_eq!(numbers, ["1", "42", "0x1F", "3.14", ".5", "1e10", "2.5e-3", "1.0f", "10u", "7."]);
    }

    #[test]
    fn number_followed_by_member_access() {
        assert_eq!(
            tokenize("1.x 1..2"),
            vec![
                (TokenKind::Number, "1".to_string()),
                (TokenKind::Dot, ".".to_string()),
                ident("x"),
                (TokenKind::Number, "1".to_string()),
                (TokenKind::Other, "..".to_string()),
                (TokenKind::Number, "2".to_string()),
            ]
        );
    }

    // =========================================
    // Punctuation and operators
    // =========================================

    #[test]
    fn punctuation() {
        let kinds: Vec<TokenKind> = tokenize("#(){};,:=.").into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::Preprocessor,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
                TokenKind::OpenCurly,
                TokenKind::CloseCurly,
                TokenKind::Semicolon,
                TokenKind::Comma,
                TokenKind::Colon,
                TokenKind::OpAssign,
                TokenKind::Dot,
            ]
        );
    }

    #[test]
    fn operators_are_greedy() {
        assert_eq!(
            tokenize("a == b >>>= c :: d / e"),
            vec![
                ident("a"),
                (TokenKind::Other, "==".to_string()),
                ident("b"),
                (TokenKind::Other, ">>>=".to_string()),
                ident("c"),
                (TokenKind::Other, "::".to_string()),
                ident("d"),
                (TokenKind::Other, "/".to_string()),
                ident("e"),
            ]
        );
    }

    #[test]
    fn stray_bytes_are_invalid() {
        let arena = Bump::new();
        let token = tokenizer("`", &arena).next_token().unwrap();
        assert!(!token.valid);

        let token = tokenizer("é", &arena).next_token().unwrap();
        assert!(!token.valid);
        assert_eq!(token.lexeme, "é");
        assert_eq!(token.span.len, 2);
    }

    // =========================================
    // Cursor control
    // =========================================

    #[test]
    fn rewind_relexes_identically() {
        let arena = Bump::new();
        let mut tokenizer = tokenizer("class Foo : Bar", &arena);
        let _class = tokenizer.next_significant().unwrap();
        let foo = tokenizer.next_significant().unwrap();
        let colon = tokenizer.next_significant().unwrap();

        tokenizer.rewind(&foo);
        assert_eq!(tokenizer.next_significant(), Some(foo));
        assert_eq!(tokenizer.next_significant(), Some(colon));
    }

    #[test]
    fn peek_does_not_consume() {
        let arena = Bump::new();
        let mut tokenizer = tokenizer("a b", &arena);
        let peeked = tokenizer.peek_token().unwrap();
        assert_eq!(tokenizer.next_token(), Some(peeked));
        assert_eq!(tokenizer.peek_kind_at(Span::point(2, 1, 3)), Some(TokenKind::Identifier));
        assert_eq!(tokenizer.next_token().unwrap().kind, TokenKind::Whitespace);
    }

    #[test]
    fn skip_whitespace_stops_at_invalid_comment() {
        let arena = Bump::new();
        let mut tokenizer = tokenizer("  // ok\n /* broken", &arena);
        tokenizer.skip_whitespace();
        let token = tokenizer.next_token().unwrap();
        assert_eq!(token.kind, TokenKind::BlockComment);
        assert!(!token.valid);
    }

    #[test]
    fn positions_track_lines() {
        let arena = Bump::new();
        let mut tokenizer = tokenizer("a\n  b", &arena);
        tokenizer.next_significant();
        let b = tokenizer.next_significant().unwrap();
        assert_eq!(b.span, Span::new(4, 2, 3, 1));
        assert!(tokenizer.is_eof());
    }
}
