//! Records of the top-level declarations a session recognized.

use std::fmt;

use zscript_core::Span;

use crate::lexer::Token;

/// Which production recognized a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    Class,
    Struct,
    Const,
    Enum,
}

impl DeclarationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DeclarationKind::Class => "class",
            DeclarationKind::Struct => "struct",
            DeclarationKind::Const => "const",
            DeclarationKind::Enum => "enum",
        }
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The clauses of a `class` or `struct` header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassHeader<'ast> {
    pub is_struct: bool,
    pub name: Token<'ast>,
    /// Identifier after `:`
    pub parent: Option<Token<'ast>>,
    /// Identifier after `replaces`
    pub replaces: Option<Token<'ast>>,
    /// The `native` keyword itself
    pub native: Option<Token<'ast>>,
}

impl<'ast> ClassHeader<'ast> {
    pub fn new(name: Token<'ast>, is_struct: bool) -> Self {
        Self {
            is_struct,
            name,
            parent: None,
            replaces: None,
            native: None,
        }
    }

    pub fn kind(&self) -> DeclarationKind {
        if self.is_struct {
            DeclarationKind::Struct
        } else {
            DeclarationKind::Class
        }
    }
}

/// A recognized declaration.
///
/// `body` holds the significant tokens between the outer braces (or of the
/// initializer expression, for a `const`). Nested braces are kept.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Declaration<'ast> {
    pub kind: DeclarationKind,
    pub name: &'ast str,
    pub parent: Option<&'ast str>,
    pub replaces: Option<&'ast str>,
    pub native: bool,
    /// Stream the declaration was read from.
    pub source_name: &'ast str,
    /// Span of the name token.
    pub span: Span,
    pub body: &'ast [Token<'ast>],
}

impl<'ast> Declaration<'ast> {
    /// A declaration with no header clauses.
    pub fn new(
        kind: DeclarationKind,
        name: Token<'ast>,
        source_name: &'ast str,
        body: &'ast [Token<'ast>],
    ) -> Self {
        Self {
            kind,
            name: name.lexeme,
            parent: None,
            replaces: None,
            native: false,
            source_name,
            span: name.span,
            body,
        }
    }

    pub fn from_header(
        header: &ClassHeader<'ast>,
        source_name: &'ast str,
        body: &'ast [Token<'ast>],
    ) -> Self {
        Self {
            parent: header.parent.map(|t| t.lexeme),
            replaces: header.replaces.map(|t| t.lexeme),
            native: header.native.is_some(),
            ..Self::new(header.kind(), header.name, source_name, body)
        }
    }
}

/// The summary line written to the warning log.
impl fmt::Display for Declaration<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Found {} {}", self.kind, self.name)?;
        let mut clauses = Vec::new();
        if let Some(parent) = self.parent {
            clauses.push(format!("inherits {parent}"));
        }
        if let Some(replaces) = self.replaces {
            clauses.push(format!("replaces {replaces}"));
        }
        if self.native {
            clauses.push("native".to_string());
        }
        if !clauses.is_empty() {
            write!(f, " ({})", clauses.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::TokenKind;

    fn ident(name: &str) -> Token<'_> {
        Token::new(TokenKind::Identifier, name, true, Span::default())
    }

    #[test]
    fn summary_lists_clauses_in_order() {
        let mut header = ClassHeader::new(ident("Foo"), false);
        header.parent = Some(ident("Actor"));
        header.replaces = Some(ident("Baz"));
        header.native = Some(ident("native"));

        let decl = Declaration::from_header(&header, "zscript.txt", &[]);
        assert_eq!(decl.to_string(), "Found class Foo (inherits Actor, replaces Baz, native)");
    }

    #[test]
    fn summary_without_clauses() {
        let header = ClassHeader::new(ident("Vec"), true);
        let decl = Declaration::from_header(&header, "zscript.txt", &[]);
        assert_eq!(decl.kind, DeclarationKind::Struct);
        assert_eq!(decl.to_string(), "Found struct Vec");

        let constant = Declaration::new(DeclarationKind::Const, ident("MAX"), "zscript.txt", &[]);
        assert_eq!(constant.to_string(), "Found const MAX");
    }
}
