//! Two-pass type checker.
//!
//! The first pass declares every top-level function so calls may appear
//! before the callee. The second pass walks declarations in order and stops
//! at the first error. Variables declared without a type adopt the type of
//! their initializer, which is written back into the tree for later stages.

use super::error::SemanticError;
use super::symbol::{Signature, Symbol, SymbolKind, SymbolTable};
use super::types::compatible;
use super::MAX_ARGUMENTS;
use crate::ast::{BinaryOperator, FunctionDecl, Literal, Node, NodeKind, Program, Type, VarDecl};

/// Enclosing function of the statement being checked.
struct FunctionContext {
    name: String,
    /// `None` when the declaration names no return type.
    return_type: Option<Type>,
}

pub struct TypeChecker {
    symbols: SymbolTable,
    function: Option<FunctionContext>,
}

impl TypeChecker {
    pub fn new() -> Self {
        Self {
            symbols: SymbolTable::new(),
            function: None,
        }
    }

    pub fn into_symbols(self) -> SymbolTable {
        self.symbols
    }

    pub fn check_program(&mut self, program: &mut Program) -> Result<(), SemanticError> {
        // First pass: declare functions to support forward calls
        for stmt in &program.statements {
            if let NodeKind::FunctionDecl(func) = &stmt.kind {
                self.declare_function(func, stmt.line)?;
            }
        }

        for stmt in &mut program.statements {
            self.check_statement(stmt)?;
        }
        Ok(())
    }

    fn declare_function(&mut self, func: &FunctionDecl, line: usize) -> Result<(), SemanticError> {
        if func.parameters.len() > MAX_ARGUMENTS {
            return Err(SemanticError::TooManyParameters {
                name: func.name.clone(),
                count: func.parameters.len(),
                line,
            });
        }

        let signature = Signature {
            params: func
                .parameter_decls()
                .map(|p| p.var_type.unwrap_or(Type::Int))
                .collect(),
            return_type: func.result_type(),
        };
        self.symbols.define(Symbol::function(&func.name, signature, line))
    }

    fn check_statement(&mut self, node: &mut Node) -> Result<(), SemanticError> {
        let line = node.line;
        match &mut node.kind {
            NodeKind::FunctionDecl(func) => return self.check_function(func),
            NodeKind::VarDecl(decl) => return self.check_var_decl(decl, line),
            NodeKind::Assign { target, value } => {
                return self.check_assignment(target, value, line)
            }
            NodeKind::Return { value } => return self.check_return(value.as_deref(), line),
            NodeKind::Include { .. } => return Ok(()),
            NodeKind::Literal(_)
            | NodeKind::VariableRef { .. }
            | NodeKind::Binary { .. }
            | NodeKind::Call { .. }
            | NodeKind::MemberAccess { .. } => {}
        }

        // Expression statement, evaluated for its effect.
        self.infer(node).map(|_| ())
    }

    fn check_function(&mut self, func: &mut FunctionDecl) -> Result<(), SemanticError> {
        self.symbols.enter_scope();
        self.function = Some(FunctionContext {
            name: func.name.clone(),
            return_type: func.return_type,
        });

        let result = self.check_function_body(func);

        self.function = None;
        self.symbols.exit_scope();
        result
    }

    fn check_function_body(&mut self, func: &mut FunctionDecl) -> Result<(), SemanticError> {
        for param in &func.parameters {
            if let NodeKind::VarDecl(decl) = &param.kind {
                self.symbols
                    .define(Symbol::parameter(&decl.name, decl.var_type, param.line))?;
            }
        }

        for stmt in &mut func.body.statements {
            self.check_statement(stmt)?;
        }
        Ok(())
    }

    fn check_var_decl(&mut self, decl: &mut VarDecl, line: usize) -> Result<(), SemanticError> {
        if let Some(init) = &decl.initializer {
            let init_type = self.infer(init)?;

            match (decl.var_type, init_type) {
                (_, Some(Type::Void)) => {
                    return Err(SemanticError::VoidInitializer {
                        name: decl.name.clone(),
                        line,
                    });
                }
                (None, Some(found)) => decl.var_type = Some(found),
                (Some(declared), Some(found)) if !compatible(declared, found) => {
                    return Err(SemanticError::InitializerMismatch {
                        name: decl.name.clone(),
                        declared,
                        found,
                        line,
                    });
                }
                (Some(_), Some(_)) => {}
                (_, None) => {
                    return Err(SemanticError::UnknownVariableType {
                        name: decl.name.clone(),
                        line,
                    });
                }
            }
        }

        self.symbols
            .define(Symbol::variable(&decl.name, decl.var_type, line))
    }

    fn check_assignment(&self, target: &Node, value: &Node, line: usize) -> Result<(), SemanticError> {
        let NodeKind::VariableRef { name } = &target.kind else {
            return Err(SemanticError::InvalidAssignmentTarget { line });
        };

        let symbol = self
            .symbols
            .resolve(name)
            .ok_or_else(|| SemanticError::UndefinedVariable {
                name: name.clone(),
                line,
            })?;
        if !matches!(symbol.kind, SymbolKind::Variable | SymbolKind::Parameter) {
            return Err(SemanticError::InvalidAssignmentTarget { line });
        }

        let unknown = || SemanticError::UnknownVariableType {
            name: name.clone(),
            line,
        };
        let expected = symbol.ty.ok_or_else(unknown)?;
        let found = self.infer(value)?.ok_or_else(unknown)?;

        if !compatible(expected, found) {
            return Err(SemanticError::AssignmentMismatch {
                name: name.clone(),
                expected,
                found,
                line,
            });
        }
        Ok(())
    }

    fn check_return(&self, value: Option<&Node>, line: usize) -> Result<(), SemanticError> {
        let found = match value {
            Some(value) => Some(self.infer(value)?),
            None => None,
        };

        // A top-level return, or one in a function without a declared
        // return type, has nothing to be checked against.
        let Some(function) = &self.function else {
            return Ok(());
        };
        let Some(declared) = function.return_type else {
            return Ok(());
        };

        match (found, declared) {
            (None, Type::Void) => Ok(()),
            (None, expected) => Err(SemanticError::MissingReturnValue {
                function: function.name.clone(),
                expected,
                line,
            }),
            (Some(_), Type::Void) => Err(SemanticError::ReturnValueInVoid {
                function: function.name.clone(),
                line,
            }),
            (Some(None), _) => Err(SemanticError::UnknownReturnType {
                function: function.name.clone(),
                line,
            }),
            (Some(Some(found)), expected) if !compatible(found, expected) => {
                Err(SemanticError::ReturnMismatch {
                    function: function.name.clone(),
                    expected,
                    found,
                    line,
                })
            }
            (Some(Some(_)), _) => Ok(()),
        }
    }

    /// Infers the type of an expression. `Ok(None)` means the expression is
    /// valid but has no type, like `null`.
    fn infer(&self, node: &Node) -> Result<Option<Type>, SemanticError> {
        match &node.kind {
            NodeKind::Literal(literal) => Ok(match literal {
                Literal::Integer(_) => Some(Type::Int),
                Literal::Float(_) => Some(Type::Float),
                Literal::String(_) => Some(Type::String),
                Literal::Boolean(_) => Some(Type::Bool),
                Literal::Null => None,
            }),
            NodeKind::VariableRef { name } => {
                let symbol = self.symbols.resolve(name).ok_or_else(|| {
                    SemanticError::UndefinedVariable {
                        name: name.clone(),
                        line: node.line,
                    }
                })?;
                Ok(symbol_type(symbol))
            }
            NodeKind::MemberAccess { .. } => {
                let name = node.dotted_name().unwrap_or_default();
                match self.symbols.resolve(&name) {
                    Some(symbol) => Ok(symbol_type(symbol)),
                    None => Err(SemanticError::UnresolvedMember {
                        name,
                        line: node.line,
                    }),
                }
            }
            NodeKind::Binary { left, operator, right } => {
                self.infer_binary(left, *operator, right, node.line)
            }
            NodeKind::Call { callee, arguments } => self.infer_call(callee, arguments, node.line),
            NodeKind::FunctionDecl(_)
            | NodeKind::VarDecl(_)
            | NodeKind::Assign { .. }
            | NodeKind::Return { .. }
            | NodeKind::Include { .. } => Ok(None),
        }
    }

    fn infer_binary(
        &self,
        left: &Node,
        operator: BinaryOperator,
        right: &Node,
        line: usize,
    ) -> Result<Option<Type>, SemanticError> {
        let left = self.infer(left)?;
        let right = self.infer(right)?;

        match (left, right) {
            // Values are integers in registers; float bit patterns cannot be combined.
            (Some(Type::Float), Some(Type::Float)) => {
                Err(SemanticError::FloatArithmetic { operator, line })
            }
            (Some(left), Some(right)) if compatible(left, right) => Ok(Some(left)),
            (Some(left), Some(right)) => Err(SemanticError::BinaryMismatch {
                operator,
                left,
                right,
                line,
            }),
            _ => Err(SemanticError::UnknownOperandType { operator, line }),
        }
    }

    fn infer_call(
        &self,
        callee: &Node,
        arguments: &[Node],
        line: usize,
    ) -> Result<Option<Type>, SemanticError> {
        let Some(name) = callee.dotted_name() else {
            return Err(SemanticError::InvalidCallee { line });
        };

        if arguments.len() > MAX_ARGUMENTS {
            return Err(SemanticError::TooManyArguments {
                name,
                count: arguments.len(),
                line,
            });
        }

        let Some(symbol) = self.symbols.resolve(&name) else {
            if is_external(&name) {
                return self.infer_external_call(name, arguments, line);
            }
            return Err(SemanticError::UndefinedFunction { name, line });
        };

        let Some(signature) = &symbol.signature else {
            return Err(SemanticError::NotAFunction { name, line });
        };

        if signature.params.len() != arguments.len() {
            return Err(SemanticError::ArgumentCount {
                name,
                expected: signature.params.len(),
                found: arguments.len(),
                line,
            });
        }

        for (index, (arg, &expected)) in arguments.iter().zip(&signature.params).enumerate() {
            let position = index + 1;
            let Some(found) = self.infer(arg)? else {
                return Err(SemanticError::UnknownArgumentType { name, position, line });
            };
            if !compatible(found, expected) {
                return Err(SemanticError::ArgumentType {
                    name,
                    position,
                    expected,
                    found,
                    line,
                });
            }
        }

        Ok(Some(signature.return_type))
    }

    /// Runtime routines are not declared anywhere. Their arguments must be
    /// numeric and they are assumed to return `int`.
    fn infer_external_call(
        &self,
        name: String,
        arguments: &[Node],
        line: usize,
    ) -> Result<Option<Type>, SemanticError> {
        for (index, arg) in arguments.iter().enumerate() {
            match self.infer(arg)? {
                Some(Type::Int | Type::Float) => {}
                other => {
                    return Err(SemanticError::ExternalArgument {
                        name,
                        position: index + 1,
                        found: other.map_or("untyped", Type::name).to_string(),
                        line,
                    });
                }
            }
        }
        Ok(Some(Type::Int))
    }
}

impl Default for TypeChecker {
    fn default() -> Self {
        Self::new()
    }
}

/// A function used as a value has the type it returns.
fn symbol_type(symbol: &Symbol) -> Option<Type> {
    match &symbol.signature {
        Some(signature) => Some(signature.return_type),
        None => symbol.ty,
    }
}

/// Names in the runtime's `sys` namespace, written either dotted
/// (`sys.IO.print`) or already flattened (`sys_IO_print`).
fn is_external(name: &str) -> bool {
    name.split('.').next() == Some("sys") || name.starts_with("sys_")
}
