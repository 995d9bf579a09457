//! Scanner for Beagle source code
//!
//! Converts raw source text into [`Token`]s. Whitespace, newlines and comments
//! are skipped, so the scanner never produces [`TokenKind::Eol`].
//!
//! The scanner can be used eagerly through [`Scanner::tokenize`], which stops
//! at the first [`LexError`], or lazily as a [`TokenStream`]. In streaming mode
//! a lexical error becomes a single [`TokenKind::Error`] token followed by
//! end of file, and the parser reports it like any other unexpected token.

use super::ast::SourceLocation;
use super::token::{Token, TokenKind, TokenStream};
use thiserror::Error;
use tracing::trace;

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Character scanner for Beagle source text
pub struct Scanner {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    file_name: String,
    finished: bool,
}

impl Scanner {
    /// Create a new scanner for the given source string.
    pub fn new(input: &str, file_name: impl Into<String>) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            file_name: file_name.into(),
            finished: false,
        }
    }

    /// Tokenize the entire input, ending with an `Eof` token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        loop {
            let token = self.scan_token()?;
            let at_end = token.is(TokenKind::Eof);
            tokens.push(token);
            if at_end {
                break;
            }
        }

        Ok(tokens)
    }

    /// Scan one token, or `Eof` once the input is exhausted.
    fn scan_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        let loc = self.current_location();
        let Some(ch) = self.advance() else {
            return Ok(Token::symbol(TokenKind::Eof, loc));
        };

        let kind = match ch {
            '"' => return self.string_literal(loc),
            '0'..='9' => return self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => return Ok(self.identifier_or_keyword(ch, loc)),

            '.' => TokenKind::Dot,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '=' => TokenKind::Assign,
            '@' => TokenKind::At,
            '*' => TokenKind::Star,

            _ => {
                return Err(LexError {
                    message: format!("Unexpected character: '{}'", ch),
                    location: loc,
                })
            }
        };

        Ok(Token::symbol(kind, loc))
    }

    /// Parse string literal; the opening quote is already consumed.
    fn string_literal(&mut self, loc: SourceLocation) -> Result<Token, LexError> {
        let mut string = String::new();

        while let Some(ch) = self.peek() {
            if ch == '"' {
                self.advance(); // consume closing quote
                return Ok(Token::new(TokenKind::StringLiteral, string, loc));
            }

            if ch == '\\' {
                self.advance();
                let escaped = self.advance().ok_or_else(|| LexError {
                    message: "Unexpected end of file in string literal".to_string(),
                    location: self.current_location(),
                })?;

                let unescaped = match escaped {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    '\\' => '\\',
                    '"' => '"',
                    '0' => '\0',
                    _ => {
                        return Err(LexError {
                            message: format!("Unknown escape sequence: \\{}", escaped),
                            location: self.current_location(),
                        });
                    }
                };
                string.push(unescaped);
            } else {
                string.push(ch);
                self.advance();
            }
        }

        Err(LexError {
            message: "Unterminated string literal".to_string(),
            location: loc,
        })
    }

    /// Parse a decimal integer literal
    fn number_literal(&mut self, first_digit: char, loc: SourceLocation) -> Result<Token, LexError> {
        let mut num_str = String::new();
        num_str.push(first_digit);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                num_str.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        if num_str.parse::<i64>().is_err() {
            return Err(LexError {
                message: format!("Invalid integer literal: {}", num_str),
                location: loc,
            });
        }

        Ok(Token::new(TokenKind::IntegerLiteral, num_str, loc))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match TokenKind::keyword(&ident) {
            Some(kind) => Token::new(kind, ident, loc),
            None => Token::new(TokenKind::Identifier, ident, loc),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment()?;
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */)
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return Ok(());
            }
            self.advance();
        }

        Err(LexError {
            message: "Unterminated block comment".to_string(),
            location: start_loc,
        })
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl TokenStream for Scanner {
    fn next_token(&mut self) -> Token {
        if self.finished {
            return Token::symbol(TokenKind::Eof, self.current_location());
        }

        match self.scan_token() {
            Ok(token) => {
                if token.is(TokenKind::Eof) {
                    self.finished = true;
                }
                trace!(kind = ?token.kind, text = %token.text, "scanned token");
                token
            }
            Err(err) => {
                self.finished = true;
                Token::new(TokenKind::Error, err.message, err.location)
            }
        }
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }
}
