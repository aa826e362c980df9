//! Command-line configuration
//!
//! The compiler takes a source *base name*: `toyc prog` reads `prog.toy` and
//! targets `prog` (executable) or, with `-s`, `prog.s` (assembly).

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::filter::LevelFilter;

/// Extension appended to the base name to find the input file
pub const SOURCE_EXTENSION: &str = "toy";
pub const ASSEMBLY_EXTENSION: &str = "s";

/// Compile a toy source file
#[derive(Debug, Parser)]
#[command(name = "toyc", version)]
pub struct Cli {
    /// Source file name without the `.toy` extension
    pub source: String,

    /// Stop after generating assembly instead of linking an executable
    #[arg(short = 's', long = "assembly")]
    pub assembly: bool,

    /// Log more: -v info, -vv debug, -vvv trace
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Disable logging
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Cli {
    /// Level forced by the flags; `None` defers to `RUST_LOG`.
    pub fn log_level(&self) -> Option<LevelFilter> {
        if self.quiet {
            return Some(LevelFilter::OFF);
        }

        match self.verbose {
            0 => None,
            1 => Some(LevelFilter::INFO),
            2 => Some(LevelFilter::DEBUG),
            _ => Some(LevelFilter::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Assembly,
    Executable,
}

/// Paths and output kind resolved from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub source_path: PathBuf,
    pub output: OutputKind,
    pub output_path: PathBuf,
}

impl CompileOptions {
    pub fn from_base_name(base: &str, assembly: bool) -> Self {
        let (output, output_path) = if assembly {
            (
                OutputKind::Assembly,
                PathBuf::from(format!("{}.{}", base, ASSEMBLY_EXTENSION)),
            )
        } else {
            (OutputKind::Executable, PathBuf::from(base))
        };

        Self {
            source_path: PathBuf::from(format!("{}.{}", base, SOURCE_EXTENSION)),
            output,
            output_path,
        }
    }
}

impl From<&Cli> for CompileOptions {
    fn from(cli: &Cli) -> Self {
        CompileOptions::from_base_name(&cli.source, cli.assembly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("toyc").chain(args.iter().copied()))
    }

    #[test]
    fn test_executable_by_default() {
        let options = CompileOptions::from(&cli(&["demos/countdown"]).unwrap());

        assert_eq!(options.source_path, PathBuf::from("demos/countdown.toy"));
        assert_eq!(options.output, OutputKind::Executable);
        assert_eq!(options.output_path, PathBuf::from("demos/countdown"));
    }

    #[test]
    fn test_assembly_flag() {
        let options = CompileOptions::from(&cli(&["prog", "-s"]).unwrap());

        assert_eq!(options.output, OutputKind::Assembly);
        assert_eq!(options.output_path, PathBuf::from("prog.s"));
    }

    #[test]
    fn test_dotted_base_name_keeps_its_dots() {
        let options = CompileOptions::from_base_name("v1.2", true);
        assert_eq!(options.source_path, PathBuf::from("v1.2.toy"));
        assert_eq!(options.output_path, PathBuf::from("v1.2.s"));
    }

    #[test]
    fn test_usage_errors() {
        assert!(cli(&[]).is_err());
        assert!(cli(&["a", "b"]).is_err());
        assert!(cli(&["a", "-x"]).is_err());
        assert!(cli(&["a", "-q", "-v"]).is_err());
    }

    #[test]
    fn test_log_level() {
        assert_eq!(cli(&["a"]).unwrap().log_level(), None);
        assert_eq!(cli(&["a", "-v"]).unwrap().log_level(), Some(LevelFilter::INFO));
        assert_eq!(cli(&["a", "-vv"]).unwrap().log_level(), Some(LevelFilter::DEBUG));
        assert_eq!(cli(&["a", "-vvvv"]).unwrap().log_level(), Some(LevelFilter::TRACE));
        assert_eq!(cli(&["a", "-q"]).unwrap().log_level(), Some(LevelFilter::OFF));
    }
}
