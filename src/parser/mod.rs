//! Beagle front end
//!
//! This module transforms Beagle source text into an Abstract Syntax Tree (AST):
//! - [`token`]: token model and the [`token::TokenStream`] pull interface
//! - [`lexer`]: the bundled scanner (source text → tokens)
//! - [`lookahead`]: buffered, arbitrarily deep lookahead over a token stream
//! - [`context`]: diagnostics and node-id allocation shared by a compilation
//! - [`parse`]: the parser (tokens → AST), split across [`declarations`] and [`expressions`]
//! - [`ast`]: AST node definitions
//! - [`visit`]: the visit/finish traversal protocol over the AST
//!
//! # Supported language
//!
//! A compilation unit holds an optional `package`, any number of `import`s and
//! one or more `class` declarations. Classes hold `var`, `const` and `def`
//! members. Expressions are limited to boolean, string and integer literals,
//! and method bodies are skipped without being parsed.
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser, fail-fast: the first error inside a
//! construct abandons that construct.

pub mod ast;
pub mod context;
pub mod declarations;
pub mod expressions;
pub mod lexer;
pub mod lookahead;
pub mod parse;
pub mod token;
pub mod visit;
