//! Core types shared by the ZScript parser crates.
//!
//! - [`Span`] source locations
//! - [`LexError`], [`ParseError`], [`ArchiveError`]
//! - [`Diagnostics`], the sticky first-error state of a parse session
//! - the archive namespace: [`ResourceArchive`], [`MemoryArchive`],
//!   [`DirectoryArchive`] and the include path rules in [`path`]

mod archive;
mod diagnostics;
mod error;
pub mod path;
mod span;

pub use archive::{DirectoryArchive, MemoryArchive, ResourceArchive, SourceFile, SourceLocation};
pub use diagnostics::Diagnostics;
pub use error::{ArchiveError, LexError, ParseError, ParseErrorKind, ParseResult};
pub use path::PathError;
pub use span::Span;
