//! Mino: an ahead-of-time compiler for a small statically typed language.
//!
//! The pipeline is lexer → parser → type checker → x86-64 code generator,
//! with [`engine::CompilerEngine`] tying the stages together and handing
//! the assembly to the system C toolchain.

pub mod ast;
pub mod cli;
pub mod codegen;
pub mod diagnostics;
pub mod engine;
pub mod lexer;
pub mod parser;
pub mod semantic;

pub use engine::{CompileError, CompilerEngine};

/// Compiles Mino source text to AT&T x86-64 assembly.
pub fn compile_to_assembly(source: &str) -> Result<String, CompileError> {
    CompilerEngine::default().compile_to_assembly(source)
}
