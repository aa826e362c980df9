// toyc: front end of a small teaching compiler

use std::fs;
use std::process;

use clap::Parser;
use tracing::{info, warn};

use toyc::config::{Cli, CompileOptions};
use toyc::driver;
use toyc::logging::init_tracing_subscriber;

/// Bad arguments or unreadable input
const USAGE_ERROR: i32 = 1;
/// Lexing, parsing or symbol resolution failed
const COMPILATION_FAILURE: i32 = -1;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if err.use_stderr() => {
            let _ = err.print();
            process::exit(USAGE_ERROR);
        }
        // --help and --version
        Err(err) => err.exit(),
    };

    init_tracing_subscriber(cli.log_level());
    let options = CompileOptions::from(&cli);

    let source = match fs::read_to_string(&options.source_path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "Error: cannot read '{}': {}",
                options.source_path.display(),
                e
            );
            process::exit(USAGE_ERROR);
        }
    };

    info!(path = %options.source_path.display(), "compiling");
    let unit = match driver::compile(&source) {
        Ok(unit) => unit,
        Err(e) => {
            eprintln!("{}", e.report());
            process::exit(COMPILATION_FAILURE);
        }
    };

    info!(
        statements = unit.program.statements.len(),
        frame_size = unit.frame_size,
        "source validated"
    );
    warn!(
        output = %options.output_path.display(),
        kind = ?options.output,
        "no code generator is linked into this build, nothing was written"
    );
}
