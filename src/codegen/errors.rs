//! Code generation errors
//!
//! Syntax problems never reach the generators: they are reported through the
//! parser's diagnostics context. [`CodegenError`] covers what is only visible
//! once a whole unit is laid out.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// A declared type is its own ancestor
    #[error("Cyclic inheritance involving type '{type_name}'")]
    CyclicInheritance { type_name: String },

    /// Two declarations compile under the same qualified name
    #[error("Type '{type_name}' is declared more than once")]
    DuplicateType { type_name: String },
}
