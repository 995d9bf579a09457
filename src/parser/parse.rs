//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, its token helpers, and the
//! unit-level rules (package, imports, names).
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, unit / package / import / name rules
//! - `declarations`: classes, class bodies, members, methods, annotations
//! - `expressions`: literal expressions
//!
//! # Error handling
//!
//! Every rule returns `Option`. `None` means a diagnostic has already been
//! recorded in the [`CompilationContext`] and the caller must give up on the
//! construct it was building. There is no resynchronization: one error
//! abandons the surrounding construct.
//!
//! ```text
//! Unit    := Package? Import* Type+
//! Package := "package" QualifiedName
//! Import  := "import" QualifiedName ( "." "*" )?
//! QualifiedName := identifier ( "." identifier )*
//! ```

use crate::parser::ast::*;
use crate::parser::context::CompilationContext;
use crate::parser::lookahead::{TokenBuffer, DEFAULT_LOOKAHEAD_CAPACITY};
use crate::parser::token::{Token, TokenKind, TokenStream};
use tracing::{debug, trace};

/// Recursive descent parser for Beagle compilation units
pub struct Parser<'ctx, S: TokenStream> {
    pub(crate) tokens: TokenBuffer<S>,
    pub(crate) context: &'ctx mut CompilationContext,
    file_name: String,
}

impl<'ctx, S: TokenStream> Parser<'ctx, S> {
    pub fn new(context: &'ctx mut CompilationContext, stream: S) -> Self {
        Self::with_capacity(context, stream, DEFAULT_LOOKAHEAD_CAPACITY)
    }

    pub fn with_capacity(context: &'ctx mut CompilationContext, stream: S, capacity: usize) -> Self {
        let file_name = stream.file_name().to_string();
        Self {
            tokens: TokenBuffer::with_capacity(stream, capacity),
            context,
            file_name,
        }
    }

    /// Parse a compilation unit.
    ///
    /// A bad import only stops the import loop; a bad package or type
    /// abandons the whole unit.
    pub fn parse(&mut self) -> Option<CompilationUnit> {
        debug!(file = %self.file_name, "parsing compilation unit");
        self.context.begin(&self.file_name);
        let unit = self.parse_unit();
        self.context.end();
        debug!(
            file = %self.file_name,
            ok = unit.is_some(),
            types = unit.as_ref().map_or(0, |u| u.types.len()),
            "finished compilation unit"
        );
        unit
    }

    fn parse_unit(&mut self) -> Option<CompilationUnit> {
        let meta = self.new_node();
        self.skip_terminators();

        let package = if self.check(TokenKind::Package) {
            Some(self.parse_package()?)
        } else {
            None
        };

        let mut unit = CompilationUnit::new(meta, self.file_name.clone(), package);
        self.skip_terminators();

        while self.check(TokenKind::Import) {
            let Some(import) = self.parse_import() else {
                break;
            };
            unit.push_import(import);
            self.skip_terminators();
        }

        loop {
            self.skip_terminators();
            if self.is_at_end() && !unit.types.is_empty() {
                break;
            }
            let decl = self.parse_type()?;
            unit.push_type(decl);
        }

        Some(unit)
    }

    /// Parse a name: one identifier, plus `"." identifier` repeats when `qualified`.
    pub(crate) fn parse_name(&mut self, qualified: bool) -> Option<QualifiedName> {
        if !self.expected(&[TokenKind::Identifier]) {
            return None;
        }

        let mut name = QualifiedName::new(self.peek().text.clone());
        self.tokens.discard(1);

        while qualified && self.tokens.lookahead(&[TokenKind::Dot, TokenKind::Identifier]) {
            name.append(self.tokens.peek(1).text.clone());
            self.tokens.discard(2);
        }

        trace!(%name, "parsed name");
        Some(name)
    }

    /// Parse an unqualified name and return its single segment.
    pub(crate) fn parse_simple_name(&mut self) -> Option<String> {
        self.parse_name(false).map(|name| name.simple_name().to_string())
    }

    /// Parse a package declaration: `"package" QualifiedName`
    pub(crate) fn parse_package(&mut self) -> Option<Package> {
        if !self.expected(&[TokenKind::Package]) {
            return None;
        }
        let meta = self.new_node();
        self.tokens.discard(1);

        let name = self.parse_name(true)?;
        Some(Package { meta, name })
    }

    /// Parse an import declaration: `"import" QualifiedName ( "." "*" )?`
    ///
    /// A single-type import must name at least `package.Type`.
    pub(crate) fn parse_import(&mut self) -> Option<TypeImport> {
        if !self.expected(&[TokenKind::Import]) {
            return None;
        }
        let meta = self.new_node();
        self.tokens.discard(1);

        let qualified = self.parse_name(true)?;

        if self.tokens.lookahead(&[TokenKind::Dot, TokenKind::Star]) {
            self.tokens.discard(2);
            return Some(TypeImport {
                meta,
                package: qualified,
                kind: ImportKind::Wildcard,
            });
        }

        if !qualified.is_qualified() {
            self.context
                .on_error(Some(meta.location), "Invalid qualified type name");
            return None;
        }

        let count = qualified.len();
        let package = qualified.slice(0, count - 1)?;
        let type_name = qualified.slice(count - 1, count)?;
        Some(TypeImport {
            meta,
            package,
            kind: ImportKind::Single(type_name),
        })
    }

    // ===== Helper methods =====

    /// Is the current token one of `kinds`? Records a diagnostic when not.
    pub(crate) fn expected(&mut self, kinds: &[TokenKind]) -> bool {
        let current = self.tokens.peek_kind(0);
        if kinds.contains(&current) {
            return true;
        }
        let found = self.peek().clone();
        self.context.throw_expected(&found, kinds);
        false
    }

    /// `expected` followed by consuming the token.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> Option<()> {
        if !self.expected(&[kind]) {
            return None;
        }
        self.tokens.discard(1);
        Some(())
    }

    pub(crate) fn check(&mut self, kind: TokenKind) -> bool {
        self.tokens.peek_kind(0) == kind
    }

    pub(crate) fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.tokens.discard(1);
            true
        } else {
            false
        }
    }

    pub(crate) fn peek(&mut self) -> &Token {
        self.tokens.peek(0)
    }

    pub(crate) fn is_at_end(&mut self) -> bool {
        self.check(TokenKind::Eof)
    }

    pub(crate) fn current_location(&mut self) -> SourceLocation {
        self.peek().location
    }

    /// Identity for a node starting at the current token.
    pub(crate) fn new_node(&mut self) -> NodeMeta {
        let location = self.current_location();
        self.context.node(location)
    }

    /// Skip any run of `;` and end-of-line markers.
    pub(crate) fn skip_terminators(&mut self) {
        while matches!(
            self.tokens.peek_kind(0),
            TokenKind::Semicolon | TokenKind::Eol
        ) {
            self.tokens.discard(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::Scanner;

    fn parse_with(source: &str) -> (Option<CompilationUnit>, CompilationContext) {
        let mut context = CompilationContext::new();
        let unit = Parser::new(&mut context, Scanner::new(source, "unit.bgl")).parse();
        (unit, context)
    }

    #[test]
    fn test_parse_package_and_class() {
        let (unit, context) = parse_with("package a.b; class C { }");
        let unit = unit.unwrap();
        assert!(!context.has_errors());
        assert_eq!(unit.package.as_ref().unwrap().name.to_string(), "a.b");
        assert_eq!(unit.types.len(), 1);
        assert_eq!(unit.types[0].name.to_string(), "C");
        assert!(unit.types[0].body.as_ref().unwrap().is_empty());
        assert_eq!(unit.file_name, "unit.bgl");
    }

    #[test]
    fn test_parse_name_segments() {
        for source in ["A", "a.B", "a.b.c.D", "a.b.c.d.e.f.G"] {
            let mut context = CompilationContext::new();
            let mut parser = Parser::new(&mut context, Scanner::new(source, "n.bgl"));
            let name = parser.parse_name(true).unwrap();
            let expected: Vec<&str> = source.split('.').collect();
            assert_eq!(name.segments(), expected.as_slice());
            assert!(parser.is_at_end());
        }
    }

    #[test]
    fn test_simple_name_leaves_dot() {
        let mut context = CompilationContext::new();
        let mut parser = Parser::new(&mut context, Scanner::new("a.b", "n.bgl"));
        assert_eq!(parser.parse_simple_name().as_deref(), Some("a"));
        assert!(parser.check(TokenKind::Dot));
    }

    #[test]
    fn test_wildcard_import() {
        let (unit, _) = parse_with("import a.b.* class C");
        let unit = unit.unwrap();
        assert_eq!(unit.imports.len(), 1);
        assert!(unit.imports[0].is_wildcard());
        assert_eq!(unit.imports[0].package.to_string(), "a.b");
    }

    #[test]
    fn test_single_type_import() {
        let (unit, _) = parse_with("import a.b.C\nclass D");
        let import = &unit.unwrap().imports[0];
        assert_eq!(import.package.to_string(), "a.b");
        assert_eq!(import.type_name().unwrap().to_string(), "C");
    }

    #[test]
    fn test_unqualified_import_stops_import_loop() {
        let (unit, context) = parse_with("import a\nimport b.C\nclass D");
        // the unit continues with the next token after the bad import,
        // which is `import` and not a type, so the unit is abandoned
        assert!(unit.is_none());
        assert_eq!(context.diagnostics()[0].message, "Invalid qualified type name");
    }

    #[test]
    fn test_unqualified_import_then_type() {
        let (unit, context) = parse_with("import a class D");
        let unit = unit.unwrap();
        assert!(unit.imports.is_empty());
        assert_eq!(unit.types.len(), 1);
        assert_eq!(context.error_count(), 1);
    }

    #[test]
    fn test_empty_input_needs_a_type() {
        let (unit, context) = parse_with("package a");
        assert!(unit.is_none());
        assert_eq!(
            context.diagnostics()[0].message,
            "Syntax error, expected 'class' but found 'end of file'"
        );
    }
}
