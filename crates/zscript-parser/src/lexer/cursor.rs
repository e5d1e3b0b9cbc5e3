use std::sync::Arc;

use zscript_core::Span;

/// A seekable cursor over a shared byte stream.
///
/// Tracks byte offset, line number, and column number as it advances.
/// Cloning a cursor is cheap and yields an independent position over the
/// same bytes, which is what parse-context snapshots rely on.
#[derive(Clone)]
pub struct Cursor {
    /// The bytes being scanned.
    source: Arc<[u8]>,
    /// Current byte offset from start of source.
    offset: u32,
    /// Current line number (1-indexed).
    line: u32,
    /// Current column number (1-indexed, byte-based).
    column: u32,
}

impl Cursor {
    /// Create a new cursor at the start of the source.
    pub fn new(source: Arc<[u8]>) -> Self {
        Self {
            source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Get the full source bytes.
    #[inline]
    pub fn source(&self) -> &Arc<[u8]> {
        &self.source
    }

    /// Current byte offset from start of source.
    #[inline]
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// The current position as a zero-length span.
    #[inline]
    pub fn mark(&self) -> Span {
        Span::point(self.offset, self.line, self.column)
    }

    /// Move back (or forward) to a position previously obtained from [`mark`](Self::mark)
    /// or from a token span.
    #[inline]
    pub fn reset(&mut self, mark: Span) {
        debug_assert!(mark.offset as usize <= self.source.len());
        self.offset = mark.offset;
        self.line = mark.line;
        self.column = mark.col;
    }

    #[inline]
    fn rest(&self) -> &[u8] {
        &self.source[self.offset as usize..]
    }

    /// Check if we've reached the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.offset as usize >= self.source.len()
    }

    /// Peek at the current byte without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.rest().first().copied()
    }

    /// Peek at the nth byte ahead (0 = current).
    #[inline]
    pub fn peek_nth(&self, n: usize) -> Option<u8> {
        self.rest().get(n).copied()
    }

    /// Check if the current byte satisfies a predicate.
    #[inline]
    pub fn check(&self, f: impl Fn(u8) -> bool) -> bool {
        self.peek().is_some_and(f)
    }

    /// Check if the upcoming bytes match the given string.
    #[inline]
    pub fn check_str(&self, s: &str) -> bool {
        self.rest().starts_with(s.as_bytes())
    }

    /// Consume the current byte and advance.
    ///
    /// Returns the consumed byte, or `None` if at EOF.
    #[inline]
    pub fn advance(&mut self) -> Option<u8> {
        let b = self.peek()?;
        self.offset += 1;
        if b == b'\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(b)
    }

    /// Advance by n bytes.
    pub fn advance_bytes(&mut self, n: usize) {
        for _ in 0..n {
            if self.advance().is_none() {
                break;
            }
        }
    }

    /// Consume the given string if the upcoming bytes match it.
    #[inline]
    pub fn eat_str(&mut self, s: &str) -> bool {
        if self.check_str(s) {
            self.advance_bytes(s.len());
            true
        } else {
            false
        }
    }

    /// Consume bytes while the predicate matches.
    pub fn eat_while(&mut self, f: impl Fn(u8) -> bool) {
        while self.check(&f) {
            self.advance();
        }
    }

    /// Get a slice of source from a starting offset to current position.
    #[inline]
    pub fn slice_from(&self, start: u32) -> &[u8] {
        &self.source[start as usize..self.offset as usize]
    }
}

/// Check if a byte can start an identifier.
#[inline]
pub fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

/// Check if a byte can continue an identifier.
#[inline]
pub fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Horizontal whitespace. Newlines are tokens of their own.
#[inline]
pub fn is_blank(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\r' | 0x0B | 0x0C)
}
