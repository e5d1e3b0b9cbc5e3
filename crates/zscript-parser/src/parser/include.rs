//! `#include` resolution.
//!
//! The parser validates the path and guards against repeats; turning the
//! path into a stream is up to an [`IncludeHandler`]. A handler normally
//! opens the resource and calls [`Parser::parse_source`] on it, which
//! replaces the active context. The resolver saves the context before the
//! handler runs and puts it back afterwards, unless the session failed.

use rustc_hash::FxHashSet;
use tracing::debug;
use zscript_core::path::{path_key, validate_include_path};
use zscript_core::{ParseError, ParseErrorKind, ParseResult, ResourceArchive, Span};

use super::parser::Parser;
use crate::lexer::Token;

/// Supplies the contents of included files.
pub trait IncludeHandler {
    /// Resolve `path` and parse it into `parser`'s session.
    ///
    /// `path` has already been validated and is not a repeat. Errors raised
    /// here that the parser has not recorded yet are recorded against the
    /// `#include` line.
    fn on_include(&mut self, parser: &mut Parser<'_>, path: &str) -> ParseResult<()>;
}

/// Rejects every include. For sources that must be self-contained.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectIncludes;

impl IncludeHandler for RejectIncludes {
    fn on_include(&mut self, _parser: &mut Parser<'_>, path: &str) -> ParseResult<()> {
        Err(ParseError::new(
            ParseErrorKind::IncludeFailed,
            Span::default(),
            format!("cannot include \"{path}\": includes are not supported here"),
        ))
    }
}

/// Resolves includes against a [`ResourceArchive`].
#[derive(Debug)]
pub struct ArchiveIncludes<'a, A: ResourceArchive + ?Sized> {
    archive: &'a A,
}

impl<'a, A: ResourceArchive + ?Sized> ArchiveIncludes<'a, A> {
    pub fn new(archive: &'a A) -> Self {
        Self { archive }
    }

    pub fn archive(&self) -> &'a A {
        self.archive
    }
}

impl<A: ResourceArchive + ?Sized> IncludeHandler for ArchiveIncludes<'_, A> {
    fn on_include(&mut self, parser: &mut Parser<'_>, path: &str) -> ParseResult<()> {
        let file = self.archive.open(path).map_err(|error| {
            ParseError::new(
                ParseErrorKind::IncludeFailed,
                Span::default(),
                format!("cannot include \"{path}\": {error}"),
            )
        })?;
        parser.parse_source(file, self)
    }
}

/// Paths included during a session. Membership ignores case.
#[derive(Debug, Clone, Default)]
pub struct IncludeSet {
    keys: FxHashSet<String>,
    /// As written, in inclusion order.
    paths: Vec<String>,
}

impl IncludeSet {
    /// Add `path`. Returns `false` if it was already present.
    pub fn insert(&mut self, path: &str) -> bool {
        if !self.keys.insert(path_key(path)) {
            return false;
        }
        self.paths.push(path.to_string());
        true
    }

    /// Mark the session's root as visited without listing it as an include.
    pub fn insert_root(&mut self, path: &str) {
        self.keys.insert(path_key(path));
    }

    pub fn contains(&self, path: &str) -> bool {
        self.keys.contains(&path_key(path))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.keys.clear();
        self.paths.clear();
    }
}

impl<'ast> Parser<'ast> {
    /// Handle `#include "path"`.
    pub(super) fn parse_include(
        &mut self,
        path_token: &Token<'ast>,
        includes: &mut dyn IncludeHandler,
    ) -> ParseResult<()> {
        let path = path_token.unquoted();
        let span = path_token.span;

        if let Err(reason) = validate_include_path(path) {
            return Err(self.error_at(ParseErrorKind::InvalidIncludePath, span, reason.to_string()));
        }
        if self.included.contains(path) {
            return Err(self.error_at(
                ParseErrorKind::DuplicateInclude,
                span,
                format!("file \"{path}\" is already included"),
            ));
        }
        if self.depth >= self.options.max_include_depth {
            return Err(self.error_at(
                ParseErrorKind::IncludeFailed,
                span,
                format!(
                    "cannot include \"{path}\": nesting exceeds {} levels",
                    self.options.max_include_depth
                ),
            ));
        }

        self.included.insert(path);
        let snapshot = self.save_context();

        debug!(path, from = self.context.source_name, depth = self.depth + 1, "entering include");
        self.depth += 1;
        let result = includes.on_include(self, path);
        self.depth -= 1;

        if let Err(mut error) = result {
            if !self.diagnostics.has_error() {
                if error.span == Span::default() {
                    error.span = span;
                }
                if error.source_name.is_none() {
                    error.source_name = Some(snapshot.context().source_name().to_string());
                }
                self.diagnostics.report(error.clone());
            }
            return Err(self.diagnostics.error().cloned().unwrap_or(error));
        }
        if let Some(error) = self.diagnostics.error() {
            return Err(error.clone());
        }

        self.restore_context(snapshot);
        debug!(path, to = self.context.source_name, "leaving include");
        Ok(())
    }
}
