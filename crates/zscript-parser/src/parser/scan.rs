//! Block and expression scanners.
//!
//! Declaration bodies are not parsed, only captured: a block is a balanced
//! run of curly braces and an expression is a run of tokens up to a top-level
//! `;` or `,`. Captured runs hold significant tokens only.

use bumpalo::collections::Vec as BumpVec;
use tracing::trace;
use zscript_core::{ParseError, ParseErrorKind, ParseResult};

use super::parser::{Parser, describe};
use crate::lexer::{Token, TokenKind};

impl<'ast> Parser<'ast> {
    /// Capture a `{ ... }` block and consume a trailing `;` if present.
    ///
    /// The result excludes the outer braces. With `allow_single`, a block may
    /// instead be a single expression with its terminating `;`, which is kept.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_block(&mut self, allow_single: bool) -> ParseResult<&'ast [Token<'ast>]> {
        let first = self.next_significant();
        let first = match first {
            Some(token) if !token.valid => return Err(self.invalid_token(&token)),
            Some(token) if token.kind == TokenKind::OpenCurly => token,
            Some(token) if allow_single => {
                self.context.tokenizer.rewind(&token);
                return self.parse_single_statement();
            }
            _ => {
                let span = first.map_or_else(|| self.context.tokenizer.position(), |t| t.span);
                return Err(self.error_at(
                    ParseErrorKind::ExpectedBlock,
                    span,
                    format!(
                        "expected a code block (opening curly brace), found {}",
                        describe(first.as_ref())
                    ),
                ));
            }
        };

        let mut tokens = BumpVec::new_in(self.arena);
        tokens.push(first);
        let mut depth = 1usize;
        while depth > 0 {
            let Some(token) = self.next_significant() else {
                let span = self.context.tokenizer.position();
                return Err(self.fail(ParseError::unexpected_eof(span)));
            };
            if !token.valid {
                return Err(self.invalid_token(&token));
            }
            match token.kind {
                TokenKind::OpenCurly => depth += 1,
                TokenKind::CloseCurly => depth -= 1,
                _ => {}
            }
            tokens.push(token);
        }

        self.eat(TokenKind::Semicolon);

        let tokens = tokens.into_bump_slice();
        trace!(start = %first.span, tokens = tokens.len(), "block");
        Ok(&tokens[1..tokens.len() - 1])
    }

    fn parse_single_statement(&mut self) -> ParseResult<&'ast [Token<'ast>]> {
        let expression = self.parse_expression()?;
        let terminator = self.expect(&[TokenKind::Semicolon], "';'")?;

        let mut tokens = BumpVec::with_capacity_in(expression.len() + 1, self.arena);
        tokens.extend_from_slice(expression);
        tokens.push(terminator);
        Ok(tokens.into_bump_slice())
    }

    /// Capture tokens up to a top-level `;` or `,`, an unmatched `)`, or any `}`.
    ///
    /// The terminator is left for the caller. Parentheses nest; a `,` inside
    /// them does not end the expression.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_expression(&mut self) -> ParseResult<&'ast [Token<'ast>]> {
        let mut tokens = BumpVec::new_in(self.arena);
        let mut depth = 0usize;
        loop {
            let Some(token) = self.next_significant() else {
                let span = self.context.tokenizer.position();
                return Err(self.fail(ParseError::unexpected_eof(span)));
            };
            if !token.valid {
                return Err(self.invalid_token(&token));
            }
            match token.kind {
                TokenKind::Semicolon | TokenKind::Comma if depth == 0 => {
                    self.context.tokenizer.rewind(&token);
                    break;
                }
                TokenKind::CloseCurly => {
                    self.context.tokenizer.rewind(&token);
                    break;
                }
                TokenKind::OpenParen => depth += 1,
                TokenKind::CloseParen => match depth.checked_sub(1) {
                    Some(d) => depth = d,
                    None => {
                        self.context.tokenizer.rewind(&token);
                        break;
                    }
                },
                _ => {}
            }
            tokens.push(token);
        }
        Ok(tokens.into_bump_slice())
    }
}
