//! Expression parsing implementation
//!
//! Only literal expressions exist so far:
//!
//! ```text
//! Expression := BooleanLiteral | StringLiteral | IntegerLiteral
//! ```
//!
//! Integer literals are `int32`; larger values are rejected here rather than
//! narrowed.

use crate::parser::ast::*;
use crate::parser::parse::Parser;
use crate::parser::token::{TokenKind, TokenStream};

const LITERAL_KINDS: [TokenKind; 4] = [
    TokenKind::True,
    TokenKind::False,
    TokenKind::StringLiteral,
    TokenKind::IntegerLiteral,
];

impl<S: TokenStream> Parser<'_, S> {
    /// Parse an expression (a single literal)
    pub(crate) fn parse_expression(&mut self) -> Option<Literal> {
        if !self.expected(&LITERAL_KINDS) {
            return None;
        }

        let meta = self.new_node();
        let token = self.peek().clone();

        let value = match token.kind {
            TokenKind::True => LiteralValue::Boolean(true),
            TokenKind::False => LiteralValue::Boolean(false),
            TokenKind::StringLiteral => LiteralValue::String(token.text),
            TokenKind::IntegerLiteral => match token.text.parse::<i32>() {
                Ok(n) => LiteralValue::Integer(n),
                Err(_) => {
                    self.context.on_error(
                        Some(token.location),
                        format!("Integer literal out of range for int32: {}", token.text),
                    );
                    return None;
                }
            },
            // expected() only lets literal kinds through
            _ => return None,
        };

        self.tokens.discard(1);
        Some(Literal::new(meta, value))
    }
}

#[cfg(test)]
mod tests {
    use crate::parser::ast::*;
    use crate::parser::context::CompilationContext;
    use crate::parser::parse::Parser;
    use crate::parser::token::{Token, TokenKind, TokenList};

    fn parse_expr(tokens: Vec<Token>) -> (Option<Literal>, CompilationContext) {
        let mut context = CompilationContext::new();
        let literal = Parser::new(&mut context, TokenList::new(tokens, "e.bgl")).parse_expression();
        (literal, context)
    }

    fn at(col: usize) -> SourceLocation {
        SourceLocation::new(1, col)
    }

    #[test]
    fn test_boolean_literals() {
        let (lit, _) = parse_expr(vec![Token::symbol(TokenKind::False, at(1))]);
        assert_eq!(lit.unwrap().value, LiteralValue::Boolean(false));
    }

    #[test]
    fn test_string_and_integer_literals() {
        let (s, _) = parse_expr(vec![Token::new(TokenKind::StringLiteral, "hi", at(1))]);
        let s = s.unwrap();
        assert_eq!(s.value, LiteralValue::String("hi".into()));
        assert_eq!(s.static_type(), BuiltinType::String);

        let (n, _) = parse_expr(vec![Token::new(TokenKind::IntegerLiteral, "42", at(1))]);
        assert_eq!(n.unwrap().value, LiteralValue::Integer(42));
    }

    #[test]
    fn test_integer_limited_to_int32() {
        let (max, _) = parse_expr(vec![Token::new(TokenKind::IntegerLiteral, "2147483647", at(1))]);
        assert_eq!(max.unwrap().value, LiteralValue::Integer(i32::MAX));

        let (big, context) =
            parse_expr(vec![Token::new(TokenKind::IntegerLiteral, "9999999999", at(5))]);
        assert!(big.is_none());
        let diag = &context.diagnostics()[0];
        assert_eq!(diag.message, "Integer literal out of range for int32: 9999999999");
        assert_eq!(diag.location, Some(at(5)));
    }

    #[test]
    fn test_non_literal_is_reported() {
        let (lit, context) = parse_expr(vec![Token::new(TokenKind::Identifier, "x", at(3))]);
        assert!(lit.is_none());
        let diag = &context.diagnostics()[0];
        assert_eq!(
            diag.message,
            "Syntax error, expected 'true' or 'false' or 'string literal' or 'integer literal' but found 'x'"
        );
        assert_eq!(diag.location, Some(at(3)));
    }
}
