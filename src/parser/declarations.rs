//! Declaration parsing implementation
//!
//! This module handles parsing of class declarations and their members:
//!
//! - Classes with annotations, modifiers and an extends list
//! - Class bodies: variables, constants and methods
//! - Method parameter lists and opaque method blocks
//!
//! # Grammar
//!
//! ```text
//! Type      := Annotation* Modifiers "class" QualifiedName Extends? Body?
//! Extends   := ":" TypeRef ( "," TypeRef )*
//! Body      := "{" Member* "}"
//! Member    := Annotation* Modifiers ( Variable | Constant | Method )
//! Variable  := "var" Name ( "," Name )* ( ":" TypeRef )? ( "=" Expression ( "," Expression )* )?
//! Constant  := "const" Name ( "," Name )* ( ":" TypeRef )? "=" Expression ( "," Expression )*
//! Method    := "def" Name "(" Params? ")" ( ":" TypeRef )? Block?
//! Params    := Param ( "," Param )*
//! Param     := Name ":" TypeRef
//! Block     := "{" ... "}"
//! Annotation := "@" QualifiedName
//! Modifiers := ( "public" | "protected" | "private" | "static" )*
//! ```
//!
//! All parsing methods are implemented as `pub(crate)` methods on the [`Parser`] struct.

use crate::parser::ast::*;
use crate::parser::parse::Parser;
use crate::parser::token::{TokenKind, TokenStream};
use tracing::trace;

impl<S: TokenStream> Parser<'_, S> {
    /// Parse a type declaration (currently always a class).
    pub(crate) fn parse_type(&mut self) -> Option<TypeDeclaration> {
        let meta = self.new_node();
        let annotations = self.parse_annotations()?;
        let modifiers = self.parse_modifiers();

        if !self.expected(&[TokenKind::Class]) {
            return None;
        }
        self.parse_class(meta, annotations, modifiers)
    }

    /// Parse a class definition, starting at the `class` keyword.
    pub(crate) fn parse_class(
        &mut self,
        meta: NodeMeta,
        annotations: Vec<Annotation>,
        modifiers: Option<Modifiers>,
    ) -> Option<TypeDeclaration> {
        self.expect(TokenKind::Class)?;

        let name = self.parse_name(true)?;
        let mut decl = TypeDeclaration::new(meta, annotations, modifiers, name);

        if self.check(TokenKind::Colon) {
            for type_ref in self.parse_extends()? {
                decl.push_extends(type_ref);
            }
        }

        self.skip_terminators();

        if self.check(TokenKind::LBrace) {
            let body = self.parse_class_body()?;
            decl.set_body(body);
        }

        trace!(name = %decl.name, "parsed class");
        Some(decl)
    }

    /// Parse `":" TypeRef ( "," TypeRef )*`
    pub(crate) fn parse_extends(&mut self) -> Option<Vec<TypeReference>> {
        self.expect(TokenKind::Colon)?;

        let mut extended = vec![self.parse_type_reference()?];
        while self.match_token(TokenKind::Comma) {
            extended.push(self.parse_type_reference()?);
        }

        Some(extended)
    }

    /// Parse a class body.
    ///
    /// An unrecognized member is reported and ends the member loop; the token
    /// after the loop is consumed as the closing brace either way, so the rest
    /// of a malformed body is dropped.
    pub(crate) fn parse_class_body(&mut self) -> Option<TypeBody> {
        let meta = self.new_node();
        self.expect(TokenKind::LBrace)?;

        let mut body = TypeBody::new(meta);

        loop {
            self.skip_terminators();
            if self.check(TokenKind::RBrace) {
                break;
            }

            let member = self.new_node();
            let annotations = self.parse_annotations()?;
            let modifiers = self.parse_modifiers();

            match self.tokens.peek_kind(0) {
                TokenKind::Var | TokenKind::Const => {
                    let field = self.parse_variable_or_constant(member, annotations, modifiers)?;
                    body.push_field(field);
                }
                TokenKind::Def => {
                    let method = self.parse_method(member, annotations, modifiers)?;
                    body.push_method(method);
                }
                _ => {
                    let found = self.peek().clone();
                    self.context
                        .throw_expected(&found, &[TokenKind::Var, TokenKind::Const]);
                    break;
                }
            }
        }

        self.tokens.discard(1);
        Some(body)
    }

    /// Parse a `var` or `const` declaration, possibly naming several fields.
    pub(crate) fn parse_variable_or_constant(
        &mut self,
        meta: NodeMeta,
        annotations: Vec<Annotation>,
        modifiers: Option<Modifiers>,
    ) -> Option<FieldDeclaration> {
        if !self.expected(&[TokenKind::Var, TokenKind::Const]) {
            return None;
        }
        let kind = if self.check(TokenKind::Const) {
            FieldKind::Constant
        } else {
            FieldKind::Variable
        };
        self.tokens.discard(1);

        let mut names = Vec::new();
        loop {
            let location = self.current_location();
            names.push((self.parse_simple_name()?, location));
            if !self.match_token(TokenKind::Comma) {
                break;
            }
        }

        let declared_type = if self.match_token(TokenKind::Colon) {
            Some(self.parse_type_reference()?)
        } else {
            None
        };

        let mut initializers = Vec::new();
        if self.match_token(TokenKind::Assign) {
            loop {
                initializers.push(self.parse_expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        } else if kind == FieldKind::Constant {
            self.expected(&[TokenKind::Assign]);
            return None;
        }

        if !initializers.is_empty() && initializers.len() != names.len() {
            self.context.on_error(
                Some(meta.location),
                "Initializer count does not match declared names",
            );
            return None;
        }

        let mut decl = FieldDeclaration::new(meta, kind, annotations, modifiers, declared_type);
        let mut initializers = initializers.into_iter();
        for (name, location) in names {
            decl.push_declarator(name, location, initializers.next());
        }

        Some(decl)
    }

    /// Parse a method: `"def" Name "(" Params? ")" ( ":" TypeRef )? Block?`
    pub(crate) fn parse_method(
        &mut self,
        meta: NodeMeta,
        annotations: Vec<Annotation>,
        modifiers: Option<Modifiers>,
    ) -> Option<MethodDeclaration> {
        self.expect(TokenKind::Def)?;

        let name = self.parse_simple_name()?;
        let mut method = MethodDeclaration::new(meta, annotations, modifiers, name);

        for param in self.parse_formal_parameters()? {
            method.push_param(param);
        }

        if self.match_token(TokenKind::Colon) {
            let return_type = self.parse_type_reference()?;
            method.set_return_type(return_type);
        }

        if self.check(TokenKind::LBrace) {
            let block = self.parse_block()?;
            method.set_body(block);
        }

        Some(method)
    }

    /// Parse `"(" ( Param ( "," Param )* )? ")"`
    pub(crate) fn parse_formal_parameters(&mut self) -> Option<Vec<FormalParameter>> {
        self.expect(TokenKind::LParen)?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.parse_formal_parameter()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RParen)?;
        Some(params)
    }

    /// Parse `Name ":" TypeRef`
    pub(crate) fn parse_formal_parameter(&mut self) -> Option<FormalParameter> {
        let meta = self.new_node();
        let name = self.parse_simple_name()?;
        self.expect(TokenKind::Colon)?;
        let type_ref = self.parse_type_reference()?;
        Some(FormalParameter::new(meta, name, type_ref))
    }

    /// Skip a brace-delimited block, balancing nested braces.
    pub(crate) fn parse_block(&mut self) -> Option<Block> {
        let meta = self.new_node();
        self.expect(TokenKind::LBrace)?;

        let mut depth = 1usize;
        let mut token_count = 0usize;
        loop {
            match self.tokens.peek_kind(0) {
                // a scanner error ends the stream, so report it where it is
                TokenKind::Eof | TokenKind::Error => {
                    self.expected(&[TokenKind::RBrace]);
                    return None;
                }
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.tokens.discard(1);
                        break;
                    }
                }
                _ => {}
            }
            self.tokens.discard(1);
            token_count += 1;
        }

        Some(Block { meta, token_count })
    }

    pub(crate) fn parse_type_reference(&mut self) -> Option<TypeReference> {
        let meta = self.new_node();
        let name = self.parse_name(true)?;
        Some(TypeReference::new(meta, name))
    }

    /// Parse zero or more `"@" QualifiedName`
    pub(crate) fn parse_annotations(&mut self) -> Option<Vec<Annotation>> {
        let mut annotations = Vec::new();

        while self.check(TokenKind::At) {
            let meta = self.new_node();
            self.tokens.discard(1);
            let type_ref = self.parse_type_reference()?;
            annotations.push(Annotation::new(meta, type_ref));
        }

        Some(annotations)
    }

    /// Parse a run of modifier keywords; `None` when there are none.
    pub(crate) fn parse_modifiers(&mut self) -> Option<Modifiers> {
        let mut modifiers = Modifiers::empty();

        loop {
            let flag = match self.tokens.peek_kind(0) {
                TokenKind::Public => Modifiers::PUBLIC,
                TokenKind::Protected => Modifiers::PROTECTED,
                TokenKind::Private => Modifiers::PRIVATE,
                TokenKind::Static => Modifiers::STATIC,
                _ => break,
            };
            if modifiers.contains(flag) {
                let token = self.peek().clone();
                self.context.on_warning(
                    Some(token.location),
                    format!("Duplicate modifier '{}'", token.kind),
                );
            }
            modifiers |= flag;
            self.tokens.discard(1);
        }

        if modifiers.is_empty() {
            None
        } else {
            Some(modifiers)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::context::CompilationContext;
    use crate::parser::lexer::Scanner;
    use crate::parser::parse::Parser;

    fn parse_with(source: &str) -> (Option<CompilationUnit>, CompilationContext) {
        let mut context = CompilationContext::new();
        let unit = Parser::new(&mut context, Scanner::new(source, "decl.bgl")).parse();
        (unit, context)
    }

    fn body(unit: &CompilationUnit) -> &TypeBody {
        unit.types[0].body.as_ref().unwrap()
    }

    #[test]
    fn test_parse_extends_list() {
        let (unit, _) = parse_with("class C : A, b.B { }");
        let unit = unit.unwrap();
        let names: Vec<String> = unit.types[0].extends.iter().map(|r| r.name.to_string()).collect();
        assert_eq!(names, vec!["A", "b.B"]);
        assert_eq!(unit.types[0].base().unwrap().name.to_string(), "A");
    }

    #[test]
    fn test_parse_constant_with_literal() {
        let (unit, context) = parse_with("class C { const X = true }");
        let unit = unit.unwrap();
        assert!(!context.has_errors());
        let constant = &body(&unit).constants[0];
        assert!(constant.is_constant());
        assert_eq!(constant.declarators[0].name, "X");
        let init = constant.declarators[0].initializer.as_ref().unwrap();
        assert_eq!(init.value, LiteralValue::Boolean(true));
    }

    #[test]
    fn test_constant_without_initializer() {
        let (unit, context) = parse_with("class C { const X }");
        assert!(unit.is_none());
        assert_eq!(
            context.diagnostics()[0].message,
            "Syntax error, expected '=' but found '}'"
        );
    }

    #[test]
    fn test_variable_with_type_and_no_initializer() {
        let (unit, _) = parse_with("class C { var count: int32 }");
        let unit = unit.unwrap();
        let var = &body(&unit).variables[0];
        assert_eq!(var.declared_type.as_ref().unwrap().name.to_string(), "int32");
        assert!(var.declarators[0].initializer.is_none());
    }

    #[test]
    fn test_grouped_variables_share_type() {
        let (unit, _) = parse_with("class C { var a, b: x.T = 1, \"two\" }");
        let unit = unit.unwrap();
        let var = &body(&unit).variables[0];
        assert_eq!(var.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(var.declared_type.as_ref().unwrap().name.to_string(), "x.T");
        assert_eq!(
            var.declarators[1].initializer.as_ref().unwrap().value,
            LiteralValue::String("two".into())
        );
    }

    #[test]
    fn test_initializer_count_mismatch() {
        let (unit, context) = parse_with("class C { var a, b = 1 }");
        assert!(unit.is_none());
        assert_eq!(
            context.diagnostics()[0].message,
            "Initializer count does not match declared names"
        );
    }

    #[test]
    fn test_method_with_params_and_block() {
        let source = "class C { def run(a: int32, b: x.Y): bool { if { nested } stuff } }";
        let (unit, context) = parse_with(source);
        let unit = unit.unwrap();
        assert!(!context.has_errors());
        let method = &body(&unit).methods[0];
        assert_eq!(method.name, "run");
        assert_eq!(method.params.len(), 2);
        assert_eq!(method.params[1].type_ref.name.to_string(), "x.Y");
        assert_eq!(method.return_type.as_ref().unwrap().name.to_string(), "bool");
        assert_eq!(method.body.as_ref().unwrap().token_count, 5);
    }

    #[test]
    fn test_method_without_params_or_body() {
        let (unit, _) = parse_with("class C { def stop() }");
        let unit = unit.unwrap();
        let method = &body(&unit).methods[0];
        assert!(method.params.is_empty());
        assert!(method.body.is_none());
        assert!(method.return_type.is_none());
    }

    #[test]
    fn test_unterminated_block() {
        let (unit, context) = parse_with("class C { def run() { a");
        assert!(unit.is_none());
        assert_eq!(
            context.diagnostics()[0].message,
            "Syntax error, expected '}' but found 'end of file'"
        );
    }

    #[test]
    fn test_lexical_error_inside_block() {
        let (unit, context) = parse_with("class C { def f() { # } }");
        assert!(unit.is_none());
        assert_eq!(context.error_count(), 1);
        let diag = &context.diagnostics()[0];
        assert_eq!(
            diag.message,
            "Syntax error, expected '}' but found 'Unexpected character: '#''"
        );
        assert_eq!(diag.location, Some(SourceLocation::new(1, 21)));
    }

    #[test]
    fn test_unknown_member_truncates_body() {
        let (unit, context) = parse_with("class C { var a 42");
        let unit = unit.unwrap();
        assert_eq!(
            context.diagnostics()[0].message,
            "Syntax error, expected 'var' or 'const' but found '42'"
        );
        // `42` was consumed in place of the closing brace
        assert_eq!(body(&unit).variables.len(), 1);
        assert_eq!(unit.types.len(), 1);
    }

    #[test]
    fn test_unknown_member_leaves_closing_brace() {
        let (unit, context) = parse_with("class C { var a 42 }");
        assert!(unit.is_none());
        assert_eq!(context.error_count(), 2);
        assert_eq!(
            context.diagnostics()[1].message,
            "Syntax error, expected 'class' but found '}'"
        );
    }

    #[test]
    fn test_annotations_and_modifiers() {
        let (unit, context) = parse_with("@a.Marker public class C { @Inject static static var x }");
        let unit = unit.unwrap();
        let decl = &unit.types[0];
        assert_eq!(decl.annotations[0].type_ref.name.to_string(), "a.Marker");
        assert_eq!(decl.modifiers, Some(Modifiers::PUBLIC));
        let var = &body(&unit).variables[0];
        assert_eq!(var.annotations.len(), 1);
        assert_eq!(var.modifiers, Some(Modifiers::STATIC));
        assert_eq!(context.error_count(), 0);
        assert_eq!(context.diagnostics()[0].message, "Duplicate modifier 'static'");
    }

    #[test]
    fn test_missing_extends_identifier() {
        let (unit, context) = parse_with("class C : { }");
        assert!(unit.is_none());
        assert_eq!(
            context.diagnostics()[0].message,
            "Syntax error, expected 'identifier' but found '{'"
        );
    }
}
