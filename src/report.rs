use zscript_core::{Diagnostics, ParseError};
use zscript_parser::{Declaration, Parser};

/// Everything a finished session produced.
#[derive(Debug, Clone)]
pub struct ParseReport<'ast> {
    /// The session ended without a hard error.
    pub success: bool,
    /// The first hard error, if any.
    pub error: Option<ParseError>,
    /// The warning log, in order.
    pub warnings: Vec<String>,
    /// Declarations in parse order, including those parsed before a failure.
    pub declarations: Vec<Declaration<'ast>>,
    /// Value of the last `version` directive.
    pub language_version: Option<&'ast str>,
    /// Include paths as written, in inclusion order.
    pub included: Vec<String>,
}

impl<'ast> ParseReport<'ast> {
    /// Consume a parser after its session.
    pub fn from_parser(mut parser: Parser<'ast>) -> Self {
        let included = parser.included().iter().map(str::to_string).collect();
        let language_version = parser.language_version();
        let declarations = parser.take_declarations();
        let diagnostics = parser.into_diagnostics();
        Self::from_parts(diagnostics, declarations, language_version, included)
    }

    pub(crate) fn from_parts(
        mut diagnostics: Diagnostics,
        declarations: Vec<Declaration<'ast>>,
        language_version: Option<&'ast str>,
        included: Vec<String>,
    ) -> Self {
        let error = diagnostics.error().cloned();
        Self {
            success: error.is_none(),
            error,
            warnings: diagnostics.take_warnings(),
            declarations,
            language_version,
            included,
        }
    }

    /// The error as `source: kind at line:col: message`.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ParseError::located)
    }

    /// First declaration with this name, ignoring case.
    pub fn declaration(&self, name: &str) -> Option<&Declaration<'ast>> {
        self.declarations.iter().find(|d| d.name.eq_ignore_ascii_case(name))
    }
}
