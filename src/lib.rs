//! # Introduction
//!
//! beaglec is the front end of a compiler for Beagle, a small class-based
//! language. It parses a compilation unit (package, imports, classes with
//! fields and methods) into an AST and lowers the declared types to text.
//!
//! ## Compilation pipeline
//!
//! ```text
//! Source → Scanner → TokenBuffer → Parser → AST → LayoutGenerator | SketchGenerator
//! ```
//!
//! 1. [`parser`]: tokenises the source, buffers lookahead, and builds an AST
//!    with parent links. Problems are recorded in a
//!    [`parser::context::CompilationContext`] rather than returned.
//! 2. [`codegen`]: two independent lowerings: C records and static
//!    initializers ([`codegen::layout`]), or an IR outline produced through the
//!    visitor protocol ([`codegen::sketch`]).
//! 3. [`driver`]: runs the pipeline for one input under a
//!    [`config::CompilerConfig`].
//!
//! ## Example
//!
//! ```
//! use beaglec::config::CompilerConfig;
//! use beaglec::driver::compile;
//!
//! let c = compile("package shapes\nclass Circle {}", "circle.bgl", &CompilerConfig::default()).unwrap();
//! assert!(c.contains("static void sinit_shapes_Circle_()"));
//! ```

pub mod codegen;
pub mod config;
pub mod driver;
pub mod parser;
