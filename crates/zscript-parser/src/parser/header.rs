//! `class` and `struct` headers.
//!
//! ```text
//! class Name [: Parent] [replaces Other] [native] { ... }
//! ```
//!
//! The clauses must appear in that order and each at most once. Unknown
//! words in a header are tolerated with a warning.

use tracing::trace;
use zscript_core::{ParseError, ParseErrorKind, ParseResult};

use super::declaration::ClassHeader;
use super::parser::{Parser, describe};
use crate::lexer::{Keyword, Token, TokenKind, lookup_keyword};

/// Most clause tokens read after the name before the body must start.
pub(super) const MAX_HEADER_CLAUSES: usize = 4;

impl<'ast> Parser<'ast> {
    /// Parse a header up to, but not including, the opening brace.
    ///
    /// The caller parses the body; if the header ended without a `{`,
    /// that is where the error surfaces.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn parse_class_header(&mut self, is_struct: bool) -> ParseResult<ClassHeader<'ast>> {
        let what = if is_struct { "struct name" } else { "class name" };
        let name = self.expect_identifier(what)?;
        let mut header = ClassHeader::new(name, is_struct);

        for _ in 0..MAX_HEADER_CLAUSES {
            let Some(token) = self.next_significant() else {
                break;
            };
            if !token.valid {
                return Err(self.invalid_token(&token));
            }

            match token.kind {
                TokenKind::OpenCurly => {
                    self.context.tokenizer.rewind(&token);
                    break;
                }
                TokenKind::Colon => {
                    if header.parent.is_some() {
                        return Err(self.header_error(&header, &token, "already has a parent"));
                    }
                    if header.replaces.is_some() || header.native.is_some() {
                        return Err(self.header_error(
                            &header,
                            &token,
                            "must name its parent before 'replaces' and 'native'",
                        ));
                    }
                    header.parent = Some(self.expect_identifier("parent class name")?);
                }
                TokenKind::Identifier => match lookup_keyword(token.lexeme) {
                    Some(Keyword::Replaces) => {
                        if header.replaces.is_some() {
                            return Err(self.header_error(&header, &token, "already replaces a class"));
                        }
                        if header.native.is_some() {
                            return Err(self.header_error(
                                &header,
                                &token,
                                "must be marked 'native' after 'replaces'",
                            ));
                        }
                        header.replaces = Some(self.expect_identifier("replaced class name")?);
                    }
                    Some(Keyword::Native) => {
                        if header.native.is_some() {
                            return Err(self.header_error(&header, &token, "is already marked 'native'"));
                        }
                        header.native = Some(token);
                    }
                    _ => self.unexpected_header_token(&header, &token)?,
                },
                _ => self.unexpected_header_token(&header, &token)?,
            }
        }

        trace!(
            name = header.name.lexeme,
            parent = header.parent.map(|t| t.lexeme),
            replaces = header.replaces.map(|t| t.lexeme),
            native = header.native.is_some(),
            "class header"
        );
        Ok(header)
    }

    /// A word in the header that is none of the known clauses.
    ///
    /// Only a warning, unless strict headers are on and `native` was seen.
    fn unexpected_header_token(
        &mut self,
        header: &ClassHeader<'ast>,
        token: &Token<'ast>,
    ) -> ParseResult<()> {
        if self.options.strict_header && header.native.is_some() {
            return Err(self.header_error(
                header,
                token,
                &format!("has {} after 'native'", describe(Some(token))),
            ));
        }
        let message = format!(
            "{}:{}: unexpected {} in {} {} header",
            self.context.source_name,
            token.span,
            describe(Some(token)),
            header.kind(),
            header.name.lexeme
        );
        self.warn(message);
        Ok(())
    }

    fn header_error(
        &mut self,
        header: &ClassHeader<'ast>,
        token: &Token<'ast>,
        problem: &str,
    ) -> ParseError {
        let message = format!("{} {} {problem}", header.kind(), header.name.lexeme);
        self.error_at(ParseErrorKind::InvalidHeader, token.span, message)
    }
}
