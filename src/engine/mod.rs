//! End-to-end compilation driver: source text to assembly, and assembly to
//! an executable.

mod toolchain;

use crate::ast::Program;
use crate::codegen::{self, CodegenError};
use crate::parser::{parse, ParseError};
use crate::semantic::{check, SemanticError, SymbolTable};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use toolchain::{RuntimeArtifact, Toolchain, ToolchainError, DEFAULT_CC};

#[derive(Error, Debug)]
pub enum CompileError {
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("Semantic error: {0}")]
    Semantic(#[from] SemanticError),
    #[error("Code generation error: {0}")]
    Codegen(#[from] CodegenError),
    #[error("Toolchain error: {0}")]
    Toolchain(#[from] ToolchainError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct CompilerEngine {
    toolchain: Toolchain,
    keep_asm: bool,
}

impl CompilerEngine {
    pub fn new(toolchain: Toolchain) -> Self {
        Self {
            toolchain,
            keep_asm: false,
        }
    }

    /// Keep the intermediate `.s` file next to the executable.
    pub fn keep_assembly(mut self, keep: bool) -> Self {
        self.keep_asm = keep;
        self
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Parses and type-checks a Mino program
    pub fn check_source(&self, source: &str) -> Result<(Program, SymbolTable), CompileError> {
        let mut program = parse(source)?;
        let symbols = check(&mut program)?;
        Ok((program, symbols))
    }

    /// Compiles a Mino program to AT&T x86-64 assembly
    pub fn compile_to_assembly(&self, source: &str) -> Result<String, CompileError> {
        let (program, _) = self.check_source(source)?;
        Ok(codegen::generate(&program)?)
    }

    /// Compiles a Mino program to an executable binary.
    ///
    /// Returns the path of the kept assembly file, if any.
    pub fn compile_to_executable(
        &self,
        source: &str,
        module_name: &str,
        output_path: &Path,
    ) -> Result<Option<PathBuf>, CompileError> {
        let asm = self.compile_to_assembly(source)?;

        let asm_path = if self.keep_asm {
            output_path.with_extension("s")
        } else {
            std::env::temp_dir().join(format!("{module_name}-{}.s", std::process::id()))
        };
        std::fs::write(&asm_path, asm)?;

        let linked = self.toolchain.link(&asm_path, output_path);

        if self.keep_asm {
            linked?;
            return Ok(Some(asm_path));
        }

        // Clean up temporary file
        let _ = std::fs::remove_file(&asm_path);
        linked?;
        Ok(None)
    }
}

impl Default for CompilerEngine {
    fn default() -> Self {
        Self::new(Toolchain::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_to_assembly() {
        let engine = CompilerEngine::default();
        let source = r#"
            #include <sys>
            func int square(int x) {
                return x * x;
            }
            func int main() {
                let msg = "squares";
                sys.IO.print(square(4));
                return 0;
            }
        "#;

        let asm = engine.compile_to_assembly(source).unwrap();
        assert!(asm.contains("square:\n"));
        assert!(asm.contains("call square\n"));
        assert!(asm.contains("call sys_IO_print\n"));
        assert!(asm.contains(".asciz \"squares\""));
    }

    #[test]
    fn test_stage_errors() {
        let engine = CompilerEngine::default();

        let err = engine.compile_to_assembly("func main( {").unwrap_err();
        assert!(matches!(err, CompileError::Parse(_)));

        let err = engine.compile_to_assembly("let x: int = 1.5;").unwrap_err();
        assert!(matches!(err, CompileError::Semantic(_)));
        assert!(err.to_string().starts_with("Semantic error: Type mismatch"));
    }

    #[test]
    fn test_missing_compiler_is_reported() {
        let engine = CompilerEngine::new(Toolchain::new("mino-test-no-such-compiler"));
        let output = std::env::temp_dir().join("mino-engine-test.out");

        let err = engine
            .compile_to_executable("func int main() { return 0; }", "engine_test", &output)
            .unwrap_err();
        assert!(matches!(err, CompileError::Toolchain(ToolchainError::NotFound { .. })));
    }
}
