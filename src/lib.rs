//! Declaration parser for ZScript.
//!
//! Recognizes the top-level structure of ZScript sources (`class`, `struct`,
//! `const`, `enum`, `version` and `#include`) across an archive of files and
//! reports what it found, the first hard error, and a log of warnings.
//!
//! # Example
//!
//! ```
//! use bumpalo::Bump;
//! use zscript::prelude::*;
//!
//! let archive = MemoryArchive::new("demo.pk3")
//!     .with_text("zscript.txt", "version \"4.10\"\n#include \"actors/imp.zs\"")
//!     .with_text("actors/imp.zs", "class Imp : Actor replaces DoomImp { }");
//!
//! let arena = Bump::new();
//! let report = zscript::parse_archive(&arena, &archive, "zscript.txt", ParserOptions::default());
//! assert!(report.success);
//! assert_eq!(report.declaration("imp").and_then(|d| d.replaces), Some("DoomImp"));
//! ```

mod report;

use bumpalo::Bump;
use tracing::debug;

pub use report::ParseReport;
pub use zscript_core::path;
pub use zscript_core::{
    ArchiveError, DirectoryArchive, Diagnostics, LexError, MemoryArchive, ParseError,
    ParseErrorKind, ParseResult, PathError, ResourceArchive, SourceFile, SourceLocation, Span,
};
pub use zscript_parser::{
    ArchiveIncludes, ClassHeader, ContextSnapshot, Declaration, DeclarationKind, IncludeHandler,
    IncludeSet, Keyword, ParseContext, Parser, ParserOptions, RejectIncludes, Token, TokenKind,
    Tokenizer, lexer, parser,
};

pub mod prelude {
    pub use crate::{
        ArchiveIncludes, Declaration, DeclarationKind, IncludeHandler, MemoryArchive, ParseError,
        ParseErrorKind, ParseReport, Parser, ParserOptions, ResourceArchive, SourceFile,
    };
}

/// Parse `root` from `archive`, resolving includes against the same archive.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn parse_archive<'ast, A>(
    arena: &'ast Bump,
    archive: &A,
    root: &str,
    options: ParserOptions,
) -> ParseReport<'ast>
where
    A: ResourceArchive + ?Sized,
{
    debug!(archive = archive.name(), root, "parsing archive");
    let mut parser = Parser::with_options(arena, options);
    match archive.open(root) {
        Ok(file) => {
            // The error is also kept in the parser's diagnostics.
            let _ = parser.parse_root(file, &mut ArchiveIncludes::new(archive));
            ParseReport::from_parser(parser)
        }
        Err(error) => {
            let mut diagnostics = Diagnostics::new();
            diagnostics.report(
                ParseError::new(
                    ParseErrorKind::IncludeFailed,
                    Span::default(),
                    format!("cannot open root file: {error}"),
                )
                .in_source(root),
            );
            ParseReport::from_parts(diagnostics, Vec::new(), None, Vec::new())
        }
    }
}

/// Parse a single self-contained source. Any `#include` is an error.
pub fn parse_source<'ast>(
    arena: &'ast Bump,
    name: &str,
    text: &str,
    options: ParserOptions,
) -> ParseReport<'ast> {
    let mut parser = Parser::with_options(arena, options);
    let _ = parser.parse(SourceFile::from_text(name, text), &mut RejectIncludes);
    ParseReport::from_parser(parser)
}
