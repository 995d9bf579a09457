//! Beagle back end
//!
//! Two independent lowerings of a parsed [`CompilationUnit`]:
//! - [`layout`]: C records, storage and static initializers per type
//! - [`sketch`]: a line-oriented IR outline produced by a [`Visitor`]
//!
//! They do not share output and disagree on naming (`static_a_B_` versus
//! `%.dyn.a.B`). Both are kept until one of them grows field emission.
//!
//! Support modules:
//! - [`naming`]: symbol names derived from qualified type names
//! - [`printer`]: the text sink both passes write to
//! - [`errors`]: [`CodegenError`]
//!
//! [`CompilationUnit`]: crate::parser::ast::CompilationUnit
//! [`Visitor`]: crate::parser::visit::Visitor
//! [`CodegenError`]: errors::CodegenError

pub mod errors;
pub mod layout;
pub mod naming;
pub mod printer;
pub mod sketch;

pub use errors::CodegenError;
pub use layout::LayoutGenerator;
pub use sketch::SketchGenerator;
