//! Token model shared by every token source
//!
//! The parser never talks to a scanner directly. It pulls [`Token`]s through
//! the [`TokenStream`] trait, so the bundled [`Scanner`](super::lexer::Scanner)
//! and any external tokenizer (or a hand-built [`TokenList`] in tests) are
//! interchangeable.

use super::ast::SourceLocation;
use std::collections::VecDeque;
use std::fmt;

/// Every token kind the grammar knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Package,
    Import,
    Class,
    Var,
    Const,
    Def,
    True,
    False,

    // Modifier keywords
    Public,
    Protected,
    Private,
    Static,

    // Punctuation
    Dot,       // .
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    Assign,    // =
    At,        // @
    Star,      // *

    // Values
    Identifier,
    StringLiteral,
    IntegerLiteral,

    /// Lexical error; the token text holds the message.
    Error,

    // Markers
    Eol,
    Eof,
}

impl TokenKind {
    /// How the kind is spelled in diagnostics.
    pub fn spelling(self) -> &'static str {
        match self {
            TokenKind::Package => "package",
            TokenKind::Import => "import",
            TokenKind::Class => "class",
            TokenKind::Var => "var",
            TokenKind::Const => "const",
            TokenKind::Def => "def",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Public => "public",
            TokenKind::Protected => "protected",
            TokenKind::Private => "private",
            TokenKind::Static => "static",
            TokenKind::Dot => ".",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::Assign => "=",
            TokenKind::At => "@",
            TokenKind::Star => "*",
            TokenKind::Identifier => "identifier",
            TokenKind::StringLiteral => "string literal",
            TokenKind::IntegerLiteral => "integer literal",
            TokenKind::Error => "invalid token",
            TokenKind::Eol => "end of line",
            TokenKind::Eof => "end of file",
        }
    }

    /// Kinds whose text says more than their spelling.
    pub fn carries_text(self) -> bool {
        matches!(
            self,
            TokenKind::Identifier
                | TokenKind::StringLiteral
                | TokenKind::IntegerLiteral
                | TokenKind::Error
        )
    }

    /// Look up a reserved word.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "package" => TokenKind::Package,
            "import" => TokenKind::Import,
            "class" => TokenKind::Class,
            "var" => TokenKind::Var,
            "const" => TokenKind::Const,
            "def" => TokenKind::Def,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "public" => TokenKind::Public,
            "protected" => TokenKind::Protected,
            "private" => TokenKind::Private,
            "static" => TokenKind::Static,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

/// A lexical unit. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            text: text.into(),
            location,
        }
    }

    /// A token whose text is just its spelling (keywords, punctuation, markers).
    pub fn symbol(kind: TokenKind, location: SourceLocation) -> Self {
        Self::new(kind, kind.spelling(), location)
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind.carries_text() {
            f.write_str(&self.text)
        } else {
            f.write_str(self.kind.spelling())
        }
    }
}

/// Pull interface over a token source.
///
/// Implementations must eventually yield [`TokenKind::Eof`] and keep yielding
/// it on every later call.
pub trait TokenStream {
    fn next_token(&mut self) -> Token;

    /// Origin of the tokens, used to tag the compilation unit.
    fn file_name(&self) -> &str;
}

/// A [`TokenStream`] over tokens that were produced up front.
#[derive(Debug, Clone)]
pub struct TokenList {
    tokens: VecDeque<Token>,
    file_name: String,
    eof: Token,
}

impl TokenList {
    pub fn new(tokens: Vec<Token>, file_name: impl Into<String>) -> Self {
        let eof_location = tokens
            .last()
            .map(|t| t.location)
            .unwrap_or_else(|| SourceLocation::new(1, 1));
        let eof = tokens
            .iter()
            .find(|t| t.is(TokenKind::Eof))
            .cloned()
            .unwrap_or_else(|| Token::symbol(TokenKind::Eof, eof_location));
        // anything after the first Eof is unreachable
        let tokens = tokens
            .into_iter()
            .take_while(|t| !t.is(TokenKind::Eof))
            .collect();
        Self {
            tokens,
            file_name: file_name.into(),
            eof,
        }
    }
}

impl TokenStream for TokenList {
    fn next_token(&mut self) -> Token {
        self.tokens.pop_front().unwrap_or_else(|| self.eof.clone())
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1)
    }

    #[test]
    fn test_token_list_appends_eof() {
        let mut list = TokenList::new(vec![Token::new(TokenKind::Identifier, "x", loc())], "t.bgl");
        assert!(list.next_token().is(TokenKind::Identifier));
        assert!(list.next_token().is(TokenKind::Eof));
        assert!(list.next_token().is(TokenKind::Eof));
        assert_eq!(list.file_name(), "t.bgl");
    }

    #[test]
    fn test_token_list_stops_at_first_eof() {
        let mut list = TokenList::new(
            vec![
                Token::symbol(TokenKind::Eof, loc()),
                Token::symbol(TokenKind::Class, loc()),
            ],
            "t.bgl",
        );
        assert!(list.next_token().is(TokenKind::Eof));
        assert!(list.next_token().is(TokenKind::Eof));
    }

    #[test]
    fn test_display_uses_text_for_identifiers() {
        let ident = Token::new(TokenKind::Identifier, "Foo", loc());
        let brace = Token::symbol(TokenKind::LBrace, loc());
        assert_eq!(ident.to_string(), "Foo");
        assert_eq!(brace.to_string(), "{");
        assert_eq!(TokenKind::keyword("def"), Some(TokenKind::Def));
        assert_eq!(TokenKind::keyword("Def"), None);
    }
}
