//! Scoped symbol table and type checker.

pub mod checker;
pub mod error;
pub mod symbol;
pub mod types;


use crate::ast::Program;
use checker::TypeChecker;
pub use error::SemanticError;
pub use symbol::{Signature, Symbol, SymbolKind, SymbolTable};
pub use types::TypeInfo;

/// Most arguments a call can pass, one per System V integer register.
pub const MAX_ARGUMENTS: usize = 6;

/// Type-checks the program, filling in inferred variable types. On success
/// returns the global scope.
pub fn check(program: &mut Program) -> Result<SymbolTable, SemanticError> {
    let mut checker = TypeChecker::new();
    checker.check_program(program)?;
    Ok(checker.into_symbols())
}
