//! Top-level declaration parsing.
//!
//! The top-level loop dispatches on the first significant token: a `#`
//! directive, one of the declaration keywords, or an identifier that is
//! skipped. Class and struct headers live in [`header`](super::header).

use tracing::{debug, trace};
use zscript_core::{LexError, ParseError, ParseErrorKind, ParseResult};

use super::declaration::{Declaration, DeclarationKind};
use super::include::IncludeHandler;
use super::parser::{Parser, describe};
use crate::lexer::{Keyword, TokenKind, lookup_keyword};

const EXPECTED_DECLARATION: &str = "expected preprocessor statement, const, enum, or class declaration";

impl<'ast> Parser<'ast> {
    /// Parse declarations until the active stream is exhausted.
    pub(super) fn parse_top_level(&mut self, includes: &mut dyn IncludeHandler) -> ParseResult<()> {
        while let Some(token) = self.context.tokenizer.next_token() {
            if !token.valid {
                let mut error = ParseError::from(token.lex_error().unwrap_or(LexError::UnexpectedChar {
                    ch: '\u{FFFD}',
                    span: token.span,
                }));
                error.message = format!("{EXPECTED_DECLARATION} ({})", error.message);
                return Err(self.fail(error));
            }

            match token.kind {
                kind if kind.is_trivia() => {}
                TokenKind::Preprocessor => self.parse_directive(includes)?,
                TokenKind::Identifier => match lookup_keyword(token.lexeme) {
                    Some(Keyword::Class) => self.parse_class(false)?,
                    Some(Keyword::Struct) => self.parse_class(true)?,
                    Some(Keyword::Const) => self.parse_const()?,
                    Some(Keyword::Enum) => self.parse_enum()?,
                    Some(Keyword::Version) => self.parse_version()?,
                    _ => trace!(identifier = token.lexeme, at = %token.span, "skipping identifier"),
                },
                TokenKind::CloseCurly | TokenKind::CloseParen => {
                    return Err(self.fail(ParseError::unmatched_closer(token.span)));
                }
                _ => {
                    return Err(self.error_at(
                        ParseErrorKind::ExpectedDeclaration,
                        token.span,
                        format!("{EXPECTED_DECLARATION}, found {}", describe(Some(&token))),
                    ));
                }
            }
        }
        Ok(())
    }

    /// `# name ...` after the `#` has been consumed. Only `include` is known.
    fn parse_directive(&mut self, includes: &mut dyn IncludeHandler) -> ParseResult<()> {
        let name = self.expect_identifier("preprocessor directive name")?;
        match lookup_keyword(name.lexeme) {
            Some(Keyword::Include) => {
                let path = self.expect(&[TokenKind::String], "include path string")?;
                self.parse_include(&path, includes)
            }
            _ => Err(self.error_at(
                ParseErrorKind::UnknownDirective,
                name.span,
                format!("unknown preprocessor directive '{}'", name.lexeme),
            )),
        }
    }

    /// `const NAME = expression ;`
    fn parse_const(&mut self) -> ParseResult<()> {
        let name = self.expect_identifier("constant name")?;
        self.expect(&[TokenKind::OpAssign], "'='")?;
        let value = self.parse_expression()?;
        self.expect(&[TokenKind::Semicolon], "';'")?;

        self.record(Declaration::new(DeclarationKind::Const, name, self.context.source_name, value));
        Ok(())
    }

    /// `enum NAME { ... }`
    fn parse_enum(&mut self) -> ParseResult<()> {
        let name = self.expect_identifier("enum name")?;
        let body = self.parse_block(false)?;

        self.record(Declaration::new(DeclarationKind::Enum, name, self.context.source_name, body));
        Ok(())
    }

    /// `version "x.y"` with an optional `;`.
    fn parse_version(&mut self) -> ParseResult<()> {
        let version = self.expect(&[TokenKind::String], "version string")?;
        self.eat(TokenKind::Semicolon);

        trace!(version = version.unquoted(), "language version");
        self.language_version = Some(version.unquoted());
        Ok(())
    }

    /// `class` / `struct` header followed by a required body.
    fn parse_class(&mut self, is_struct: bool) -> ParseResult<()> {
        let header = self.parse_class_header(is_struct)?;
        let body = self.parse_block(false)?;

        self.record(Declaration::from_header(&header, self.context.source_name, body));
        Ok(())
    }

    fn record(&mut self, declaration: Declaration<'ast>) {
        debug!(
            kind = %declaration.kind,
            name = declaration.name,
            tokens = declaration.body.len(),
            "declaration"
        );
        if self.options.report_declarations {
            self.warn(declaration.to_string());
        }
        self.declarations.push(declaration);
    }
}
