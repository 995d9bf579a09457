//! End-to-end compilation: source text → tokens → AST → generated text

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::codegen::{CodegenError, LayoutGenerator, SketchGenerator};
use crate::config::{CompilerConfig, EmitMode};
use crate::parser::context::{CompilationContext, Diagnostic, Severity};
use crate::parser::lexer::Scanner;
use crate::parser::parse::Parser;

#[derive(Debug, Error)]
pub enum CompileError {
    /// The unit did not parse; details are in `diagnostics`
    #[error("compilation failed with {} error(s)", count_errors(.diagnostics))]
    Parse { diagnostics: Vec<Diagnostic> },

    #[error(transparent)]
    Codegen(#[from] CodegenError),

    #[error("cannot read source: {0}")]
    Io(#[from] std::io::Error),
}

fn count_errors(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Error)
        .count()
}

/// Compile `source` with a fresh context; warnings are dropped on success.
pub fn compile(source: &str, file_name: &str, config: &CompilerConfig) -> Result<String, CompileError> {
    let mut context = CompilationContext::new();
    compile_with(source, file_name, config, &mut context)
}

/// Compile `source`, recording diagnostics in `context`.
///
/// Fails with [`CompileError::Parse`] when the unit is absent or any error
/// was recorded; the returned diagnostics are taken out of `context`.
pub fn compile_with(
    source: &str,
    file_name: &str,
    config: &CompilerConfig,
    context: &mut CompilationContext,
) -> Result<String, CompileError> {
    let scanner = Scanner::new(source, file_name);
    let unit = Parser::with_capacity(context, scanner, config.lookahead_capacity).parse();

    let unit = match unit {
        Some(unit) if !context.has_errors() => unit,
        _ => {
            debug!(file = file_name, errors = context.error_count(), "parse failed");
            return Err(CompileError::Parse {
                diagnostics: context.take_diagnostics(),
            });
        }
    };

    let output = match config.emit {
        EmitMode::Layout => LayoutGenerator::with_header(config.runtime_header.as_str()).generate(&unit)?,
        EmitMode::Sketch => SketchGenerator::generate(&unit),
    };
    info!(file = file_name, emit = ?config.emit, bytes = output.len(), "compiled");
    Ok(output)
}

/// Lines to show for a failed compilation, in the order they were recorded.
///
/// A parse failure carries its own diagnostics. Other failures happen after
/// parsing, so any warnings still in `context` come first.
pub fn failure_report(error: &CompileError, context: &CompilationContext) -> Vec<String> {
    match error {
        CompileError::Parse { diagnostics } => diagnostics.iter().map(|d| d.to_string()).collect(),
        other => context
            .diagnostics()
            .iter()
            .map(|d| d.to_string())
            .chain(std::iter::once(format!("error: {other}")))
            .collect(),
    }
}

/// Read and compile a source file.
pub fn compile_file(
    path: &Path,
    config: &CompilerConfig,
    context: &mut CompilationContext,
) -> Result<String, CompileError> {
    let source = fs::read_to_string(path)?;
    compile_with(&source, &path.to_string_lossy(), config, context)
}
