//! Declaration parser for ZScript.
//!
//! The parser recognizes the top-level structure of a script (`class`,
//! `struct`, `const`, `enum`, `version` and `#include`) and captures each
//! declaration's body as a run of tokens without interpreting it.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use zscript_core::SourceFile;
//! use zscript_parser::parser::{Parser, RejectIncludes};
//!
//! let arena = Bump::new();
//! let mut parser = Parser::new(&arena);
//! let file = SourceFile::from_text("zscript.txt", "class Imp : Actor { }");
//! parser.parse(file, &mut RejectIncludes).unwrap();
//! assert_eq!(parser.declarations()[0].parent, Some("Actor"));
//! ```

mod decl_parser;
mod declaration;
mod header;
mod include;
mod options;
#[allow(clippy::module_inception)]
mod parser;
mod scan;

pub use declaration::{ClassHeader, Declaration, DeclarationKind};
pub use include::{ArchiveIncludes, IncludeHandler, IncludeSet, RejectIncludes};
pub use options::ParserOptions;
pub use parser::{ContextSnapshot, ParseContext, Parser};
