// beaglec: Beagle compiler front end

use std::fs;
use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use beaglec::config::{CompilerConfig, EmitMode};
use beaglec::driver::{compile_file, failure_report, CompileError};
use beaglec::parser::context::CompilationContext;
use beaglec::parser::lookahead::DEFAULT_LOOKAHEAD_CAPACITY;

#[derive(Parser, Debug)]
#[command(name = "beaglec")]
#[command(about = "Compile a Beagle source file", version)]
struct Args {
    /// Beagle source file (.bgl)
    input: PathBuf,

    /// Lowering pass to run
    #[arg(long, value_enum, default_value_t = EmitMode::Layout)]
    emit: EmitMode,

    /// Write output here instead of stdout
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Runtime header named in the generated #include
    #[arg(long = "header")]
    header: Option<String>,

    /// Initial lookahead buffer capacity
    #[arg(long, default_value_t = DEFAULT_LOOKAHEAD_CAPACITY)]
    lookahead: usize,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_logging();

    let args = Args::parse();

    let mut config = CompilerConfig {
        lookahead_capacity: args.lookahead,
        emit: args.emit,
        ..CompilerConfig::default()
    };
    if let Some(header) = args.header {
        config.runtime_header = header;
    }

    let mut context = CompilationContext::new();
    let output = match compile_file(&args.input, &config, &mut context) {
        Ok(output) => output,
        Err(CompileError::Io(e)) => {
            eprintln!("Error: cannot read '{}': {}", args.input.display(), e);
            process::exit(1);
        }
        Err(e) => {
            for line in failure_report(&e, &context) {
                eprintln!("{}", line);
            }
            process::exit(1);
        }
    };

    // Success can still carry warnings
    for diagnostic in context.diagnostics() {
        eprintln!("{}", diagnostic);
    }

    match args.output {
        Some(path) => fs::write(&path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}
