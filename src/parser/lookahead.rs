//! Lookahead buffer over a [`TokenStream`]
//!
//! Tokens are pulled from the stream only when a peek reaches past the
//! materialized window, and stay buffered until discarded. The end-of-file
//! token is sticky: peeking past it returns it again and discarding it is a
//! no-op, so the buffer never asks an exhausted stream for more.

use super::token::{Token, TokenKind, TokenStream};
use std::collections::VecDeque;
use tracing::trace;

/// Default window reserved up front; the buffer grows past it on demand.
pub const DEFAULT_LOOKAHEAD_CAPACITY: usize = 16;

pub struct TokenBuffer<S: TokenStream> {
    stream: S,
    tokens: VecDeque<Token>,
    exhausted: bool,
}

impl<S: TokenStream> TokenBuffer<S> {
    pub fn new(stream: S) -> Self {
        Self::with_capacity(stream, DEFAULT_LOOKAHEAD_CAPACITY)
    }

    pub fn with_capacity(stream: S, capacity: usize) -> Self {
        Self {
            stream,
            tokens: VecDeque::with_capacity(capacity.max(1)),
            exhausted: false,
        }
    }

    pub fn file_name(&self) -> &str {
        self.stream.file_name()
    }

    /// Token `offset` positions ahead of the cursor.
    pub fn peek(&mut self, offset: usize) -> &Token {
        self.fill(offset);
        // fill() leaves at least one token, and an Eof at the back when short
        let index = offset.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    pub fn peek_kind(&mut self, offset: usize) -> TokenKind {
        self.peek(offset).kind
    }

    /// Drop up to `count` tokens from the front, never past end of file.
    pub fn discard(&mut self, count: usize) {
        for _ in 0..count {
            self.fill(0);
            match self.tokens.front() {
                Some(token) if token.is(TokenKind::Eof) => break,
                Some(_) => {
                    self.tokens.pop_front();
                }
                None => break,
            }
        }
    }

    /// Do the next tokens match `kinds`, in order? Consumes nothing.
    pub fn lookahead(&mut self, kinds: &[TokenKind]) -> bool {
        kinds
            .iter()
            .enumerate()
            .all(|(offset, kind)| self.peek_kind(offset) == *kind)
    }

    /// Number of tokens currently materialized.
    pub fn buffered(&self) -> usize {
        self.tokens.len()
    }

    fn fill(&mut self, offset: usize) {
        while self.tokens.len() <= offset && !self.exhausted {
            let token = self.stream.next_token();
            if token.is(TokenKind::Eof) {
                self.exhausted = true;
            }
            trace!(kind = ?token.kind, buffered = self.tokens.len() + 1, "pulled token");
            self.tokens.push_back(token);
        }
    }
}
