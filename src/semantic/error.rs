use crate::ast::{BinaryOperator, Type};
use thiserror::Error;

/// Type checking stops at the first of these.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SemanticError {
    #[error("Symbol '{name}' already defined in this scope")]
    Redefinition { name: String, line: usize },

    #[error("Undefined variable '{name}'")]
    UndefinedVariable { name: String, line: usize },

    #[error("Undefined function '{name}'")]
    UndefinedFunction { name: String, line: usize },

    #[error("Unresolved member access '{name}'")]
    UnresolvedMember { name: String, line: usize },

    #[error("'{name}' is not a function")]
    NotAFunction { name: String, line: usize },

    #[error("Only named functions can be called")]
    InvalidCallee { line: usize },

    #[error("Function '{name}' expects {expected} argument(s) but got {found}")]
    ArgumentCount {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    #[error("Argument {position} of '{name}' expects {expected} but got {found}")]
    ArgumentType {
        name: String,
        position: usize,
        expected: Type,
        found: Type,
        line: usize,
    },

    #[error("Cannot determine the type of argument {position} of '{name}'")]
    UnknownArgumentType {
        name: String,
        position: usize,
        line: usize,
    },

    #[error("External function '{name}' only accepts int or float arguments, argument {position} is {found}")]
    ExternalArgument {
        name: String,
        position: usize,
        found: String,
        line: usize,
    },

    #[error("Call to '{name}' passes {count} arguments, at most {max} are supported", max = super::MAX_ARGUMENTS)]
    TooManyArguments { name: String, count: usize, line: usize },

    #[error("Function '{name}' declares {count} parameters, at most {max} are supported", max = super::MAX_ARGUMENTS)]
    TooManyParameters { name: String, count: usize, line: usize },

    #[error("Type mismatch in binary expression: {left} {operator} {right}")]
    BinaryMismatch {
        operator: BinaryOperator,
        left: Type,
        right: Type,
        line: usize,
    },

    #[error("Arithmetic on float values is not supported ('{operator}')")]
    FloatArithmetic { operator: BinaryOperator, line: usize },

    #[error("Cannot determine the operand types of '{operator}'")]
    UnknownOperandType { operator: BinaryOperator, line: usize },

    #[error("Cannot determine type (var '{name}')")]
    UnknownVariableType { name: String, line: usize },

    #[error("Type mismatch in variable initialization: '{name}' is {declared} but the initializer is {found}")]
    InitializerMismatch {
        name: String,
        declared: Type,
        found: Type,
        line: usize,
    },

    #[error("Cannot initialize '{name}' with a void value")]
    VoidInitializer { name: String, line: usize },

    #[error("Invalid assignment target")]
    InvalidAssignmentTarget { line: usize },

    #[error("Type mismatch in assignment: '{name}' is {expected} but the value is {found}")]
    AssignmentMismatch {
        name: String,
        expected: Type,
        found: Type,
        line: usize,
    },

    #[error("Function '{function}' returns {expected} but this returns {found}")]
    ReturnMismatch {
        function: String,
        expected: Type,
        found: Type,
        line: usize,
    },

    #[error("Function '{function}' returns void and cannot return a value")]
    ReturnValueInVoid { function: String, line: usize },

    #[error("Function '{function}' must return a value of type {expected}")]
    MissingReturnValue {
        function: String,
        expected: Type,
        line: usize,
    },

    #[error("Cannot determine the type of the value returned from '{function}'")]
    UnknownReturnType { function: String, line: usize },
}

impl SemanticError {
    pub fn line(&self) -> usize {
        match self {
            SemanticError::Redefinition { line, .. }
            | SemanticError::UndefinedVariable { line, .. }
            | SemanticError::UndefinedFunction { line, .. }
            | SemanticError::UnresolvedMember { line, .. }
            | SemanticError::NotAFunction { line, .. }
            | SemanticError::InvalidCallee { line }
            | SemanticError::ArgumentCount { line, .. }
            | SemanticError::ArgumentType { line, .. }
            | SemanticError::UnknownArgumentType { line, .. }
            | SemanticError::ExternalArgument { line, .. }
            | SemanticError::TooManyArguments { line, .. }
            | SemanticError::TooManyParameters { line, .. }
            | SemanticError::BinaryMismatch { line, .. }
            | SemanticError::FloatArithmetic { line, .. }
            | SemanticError::UnknownOperandType { line, .. }
            | SemanticError::UnknownVariableType { line, .. }
            | SemanticError::InitializerMismatch { line, .. }
            | SemanticError::VoidInitializer { line, .. }
            | SemanticError::InvalidAssignmentTarget { line }
            | SemanticError::AssignmentMismatch { line, .. }
            | SemanticError::ReturnMismatch { line, .. }
            | SemanticError::ReturnValueInVoid { line, .. }
            | SemanticError::MissingReturnValue { line, .. }
            | SemanticError::UnknownReturnType { line, .. } => *line,
        }
    }

    /// The unresolved name and what kind of thing it was expected to be, for
    /// "did you mean" suggestions.
    pub fn undefined_name(&self) -> Option<(&'static str, &str)> {
        match self {
            SemanticError::UndefinedVariable { name, .. } => Some(("variable", name.as_str())),
            SemanticError::UndefinedFunction { name, .. } => Some(("function", name.as_str())),
            SemanticError::UnresolvedMember { name, .. } => Some(("member", name.as_str())),
            _ => None,
        }
    }
}
