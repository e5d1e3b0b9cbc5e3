//! Tokenizer and declaration parser for ZScript sources.
//!
//! - [`lexer`]: turns a byte stream into tokens, trivia included
//! - [`parser`]: walks the tokens and records top-level declarations,
//!   following `#include` directives through an [`IncludeHandler`]

pub mod lexer;
pub mod parser;

pub use lexer::{Keyword, Token, TokenKind, Tokenizer, lookup_keyword};
pub use parser::{
    ArchiveIncludes, ClassHeader, ContextSnapshot, Declaration, DeclarationKind, IncludeHandler,
    IncludeSet, ParseContext, Parser, ParserOptions, RejectIncludes,
};
pub use zscript_core::{ParseError, ParseErrorKind, ParseResult, SourceFile, Span};
