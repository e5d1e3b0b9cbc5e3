/// Knobs that change how strictly a session treats its input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    /// Treat anything other than `{` after a `native` header clause as a hard
    /// error instead of a warning.
    pub strict_header: bool,
    /// Append a summary line to the warning log for every recognized
    /// declaration.
    pub report_declarations: bool,
    /// Deepest allowed include nesting.
    pub max_include_depth: usize,
}

impl ParserOptions {
    pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 64;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict_header(mut self, strict: bool) -> Self {
        self.strict_header = strict;
        self
    }

    pub fn report_declarations(mut self, report: bool) -> Self {
        self.report_declarations = report;
        self
    }

    pub fn max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            strict_header: false,
            report_declarations: true,
            max_include_depth: Self::DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }
}
