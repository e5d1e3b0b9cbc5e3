//! Lexical analysis for ZScript.

mod cursor;
#[allow(clippy::module_inception)]
mod lexer;
mod token;

pub use lexer::Tokenizer;
pub use token::{Keyword, Token, TokenKind, lookup_keyword};
