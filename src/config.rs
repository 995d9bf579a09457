//! Compiler settings shared by the library driver and the CLI

use clap::ValueEnum;

use crate::codegen::layout::DEFAULT_RUNTIME_HEADER;
use crate::parser::lookahead::DEFAULT_LOOKAHEAD_CAPACITY;

/// Which lowering pass produces the output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EmitMode {
    /// C records and static initializers
    #[default]
    Layout,
    /// Line-oriented IR outline
    Sketch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Initial capacity of the parser's lookahead buffer (it grows on demand)
    pub lookahead_capacity: usize,
    /// Header named in the layout pass's `#include` line
    pub runtime_header: String,
    pub emit: EmitMode,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            lookahead_capacity: DEFAULT_LOOKAHEAD_CAPACITY,
            runtime_header: DEFAULT_RUNTIME_HEADER.to_string(),
            emit: EmitMode::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CompilerConfig::default();
        assert_eq!(config.lookahead_capacity, 16);
        assert_eq!(config.runtime_header, "beagle/base.h");
        assert_eq!(config.emit, EmitMode::Layout);
    }
}
