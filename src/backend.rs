//! Boundary to intermediate-representation lowering and code generation.
//!
//! Those stages live outside this crate. They receive a [`CompiledUnit`] in
//! which every variable site is resolved and may rely on that.

use crate::config::{CompileOptions, OutputKind};
use crate::parser::ast::Program;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// A validated program ready for lowering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledUnit {
    pub program: Program,
    /// Stack frame bytes needed for all variables
    pub frame_size: u32,
}

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("Code generation failed: {0}")]
    Generation(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub trait CodeGenerator {
    fn generate_assembly(&self, unit: &CompiledUnit, path: &Path) -> Result<(), BackendError>;
    fn generate_executable(&self, unit: &CompiledUnit, path: &Path) -> Result<(), BackendError>;
}

/// Hand `unit` to `generator` for the output the options ask for.
pub fn emit(
    unit: &CompiledUnit,
    options: &CompileOptions,
    generator: &dyn CodeGenerator,
) -> Result<(), BackendError> {
    info!(
        output = %options.output_path.display(),
        kind = ?options.output,
        frame_size = unit.frame_size,
        "emitting"
    );

    match options.output {
        OutputKind::Assembly => generator.generate_assembly(unit, &options.output_path),
        OutputKind::Executable => generator.generate_executable(unit, &options.output_path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::path::PathBuf;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<(OutputKind, PathBuf, u32)>>,
    }

    impl CodeGenerator for Recorder {
        fn generate_assembly(&self, unit: &CompiledUnit, path: &Path) -> Result<(), BackendError> {
            self.calls
                .borrow_mut()
                .push((OutputKind::Assembly, path.to_path_buf(), unit.frame_size));
            Ok(())
        }

        fn generate_executable(&self, _: &CompiledUnit, _: &Path) -> Result<(), BackendError> {
            Err(BackendError::Generation("no linker".to_string()))
        }
    }

    #[test]
    fn test_emit_dispatches_on_output_kind() {
        let unit = CompiledUnit {
            program: Program::new(),
            frame_size: 24,
        };
        let recorder = Recorder::default();

        emit(&unit, &CompileOptions::from_base_name("prog", true), &recorder).unwrap();
        assert_eq!(
            recorder.calls.borrow().as_slice(),
            &[(OutputKind::Assembly, PathBuf::from("prog.s"), 24)]
        );

        let err = emit(&unit, &CompileOptions::from_base_name("prog", false), &recorder)
            .unwrap_err();
        assert_eq!(err.to_string(), "Code generation failed: no linker");
    }
}
