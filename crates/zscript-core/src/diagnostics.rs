//! Session diagnostics: a sticky first error and an append-only warning log.

use tracing::warn;

use crate::ParseError;

/// Error and warning state for one parse session.
///
/// Once an error is recorded it stays recorded: later reports are dropped,
/// so the retained error is always the one that stopped the session.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    error: Option<ParseError>,
    warnings: Vec<String>,
}

impl Diagnostics {
    /// Create empty diagnostics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a hard error has been recorded.
    #[inline]
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// The first recorded error.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// The first recorded error rendered as text.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ParseError::located)
    }

    /// Record a hard error. Returns `false` if an earlier error is kept instead.
    pub fn report(&mut self, error: ParseError) -> bool {
        if self.error.is_some() {
            return false;
        }
        self.error = Some(error);
        true
    }

    /// Append a warning to the log.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(target: "zscript", "{message}");
        self.warnings.push(message);
    }

    /// All warnings in the order they were logged.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Take the warnings, leaving an empty log.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    /// Clear both the error and the warning log.
    ///
    /// Only meaningful between sessions.
    pub fn clear(&mut self) {
        self.error = None;
        self.warnings.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ParseErrorKind, Span};

    fn error(message: &str) -> ParseError {
        ParseError::new(ParseErrorKind::ExpectedToken, Span::default(), message)
    }

    #[test]
    fn first_error_wins() {
        let mut diagnostics = Diagnostics::new();
        assert!(!diagnostics.has_error());

        assert!(diagnostics.report(error("first")));
        assert!(!diagnostics.report(error("second")));

        assert!(diagnostics.has_error());
        assert_eq!(diagnostics.error().unwrap().message, "first");
    }

    #[test]
    fn error_message_includes_source_name() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(error("boom").in_source("zscript.txt"));
        assert_eq!(
            diagnostics.error_message().as_deref(),
            Some("zscript.txt: expected token at 0:0: boom")
        );
    }

    #[test]
    fn warnings_are_ordered() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn("a");
        diagnostics.warn("b");
        assert_eq!(diagnostics.warnings(), ["a", "b"]);

        let taken = diagnostics.take_warnings();
        assert_eq!(taken, vec!["a".to_string(), "b".to_string()]);
        assert!(diagnostics.warnings().is_empty());
    }

    #[test]
    fn clear_resets_everything() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.report(error("x"));
        diagnostics.warn("w");
        diagnostics.clear();

        assert!(!diagnostics.has_error());
        assert!(diagnostics.warnings().is_empty());
        assert!(diagnostics.report(error("y")));
    }
}
