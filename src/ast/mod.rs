//! Program tree.
//!
//! [`Program`] is the root node and the body shape of every function. Every
//! node owns its children outright, so dropping a `Program` releases the whole
//! tree exactly once.

use std::fmt;

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Program {
    pub statements: Vec<Node>,
}

impl Program {
    pub fn new(statements: Vec<Node>) -> Self {
        Self { statements }
    }

    /// Top-level function declarations, in source order.
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDecl> {
        self.statements.iter().filter_map(|stmt| match &stmt.kind {
            NodeKind::FunctionDecl(func) => Some(func),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Node {
    pub line: usize,
    pub kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum NodeKind {
    FunctionDecl(FunctionDecl),
    VarDecl(VarDecl),
    Literal(Literal),
    VariableRef {
        name: String,
    },
    Binary {
        left: Box<Node>,
        operator: BinaryOperator,
        right: Box<Node>,
    },
    Assign {
        target: Box<Node>,
        value: Box<Node>,
    },
    Return {
        value: Option<Box<Node>>,
    },
    Call {
        callee: Box<Node>,
        arguments: Vec<Node>,
    },
    MemberAccess {
        object: Box<Node>,
        name: String,
    },
    Include {
        path: String,
    },
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct FunctionDecl {
    pub name: String,
    /// Each parameter is a `VarDecl` node with a declared type and no initializer.
    pub parameters: Vec<Node>,
    pub return_type: Option<Type>,
    pub body: Program,
}

impl FunctionDecl {
    pub fn parameter_decls(&self) -> impl Iterator<Item = &VarDecl> {
        self.parameters.iter().filter_map(|param| match &param.kind {
            NodeKind::VarDecl(decl) => Some(decl),
            _ => None,
        })
    }

    /// Local variable declarations of the body, in declaration order.
    pub fn local_decls(&self) -> impl Iterator<Item = &VarDecl> {
        self.body.statements.iter().filter_map(|stmt| match &stmt.kind {
            NodeKind::VarDecl(decl) => Some(decl),
            _ => None,
        })
    }

    /// A missing return type means the function returns nothing.
    pub fn result_type(&self) -> Type {
        self.return_type.unwrap_or(Type::Void)
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct VarDecl {
    pub name: String,
    pub var_type: Option<Type>,
    pub initializer: Option<Box<Node>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum Type {
    Int,
    Float,
    Bool,
    String,
    Void,
}

impl Type {
    pub fn name(self) -> &'static str {
        match self {
            Type::Int => "int",
            Type::Float => "float",
            Type::Bool => "bool",
            Type::String => "string",
            Type::Void => "void",
        }
    }

    pub fn from_name(name: &str) -> Option<Type> {
        match name {
            "int" => Some(Type::Int),
            "float" => Some(Type::Float),
            "bool" => Some(Type::Bool),
            "string" => Some(Type::String),
            "void" => Some(Type::Void),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub enum Literal {
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Null,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Star,
    Slash,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Star => "*",
            BinaryOperator::Slash => "/",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

// Constructors, one per node variant.
impl Node {
    pub fn new(kind: NodeKind, line: usize) -> Self {
        Self { line, kind }
    }

    pub fn function(
        name: impl Into<String>,
        parameters: Vec<Node>,
        return_type: Option<Type>,
        body: Program,
        line: usize,
    ) -> Self {
        Self::new(
            NodeKind::FunctionDecl(FunctionDecl {
                name: name.into(),
                parameters,
                return_type,
                body,
            }),
            line,
        )
    }

    pub fn var_decl(
        name: impl Into<String>,
        var_type: Option<Type>,
        initializer: Option<Node>,
        line: usize,
    ) -> Self {
        Self::new(
            NodeKind::VarDecl(VarDecl {
                name: name.into(),
                var_type,
                initializer: initializer.map(Box::new),
            }),
            line,
        )
    }

    pub fn literal(value: Literal, line: usize) -> Self {
        Self::new(NodeKind::Literal(value), line)
    }

    pub fn variable(name: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::VariableRef { name: name.into() }, line)
    }

    pub fn binary(left: Node, operator: BinaryOperator, right: Node, line: usize) -> Self {
        Self::new(
            NodeKind::Binary {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            },
            line,
        )
    }

    pub fn assign(target: Node, value: Node, line: usize) -> Self {
        Self::new(
            NodeKind::Assign {
                target: Box::new(target),
                value: Box::new(value),
            },
            line,
        )
    }

    pub fn return_stmt(value: Option<Node>, line: usize) -> Self {
        Self::new(NodeKind::Return { value: value.map(Box::new) }, line)
    }

    pub fn call(callee: Node, arguments: Vec<Node>, line: usize) -> Self {
        Self::new(
            NodeKind::Call {
                callee: Box::new(callee),
                arguments,
            },
            line,
        )
    }

    pub fn member_access(object: Node, name: impl Into<String>, line: usize) -> Self {
        Self::new(
            NodeKind::MemberAccess {
                object: Box::new(object),
                name: name.into(),
            },
            line,
        )
    }

    pub fn include(path: impl Into<String>, line: usize) -> Self {
        Self::new(NodeKind::Include { path: path.into() }, line)
    }

    /// The dotted name of a variable reference or member-access chain,
    /// e.g. `sys.IO.print`. Anything else has no name.
    pub fn dotted_name(&self) -> Option<String> {
        match &self.kind {
            NodeKind::VariableRef { name } => Some(name.clone()),
            NodeKind::MemberAccess { object, name } => {
                let mut full = object.dotted_name()?;
                full.push('.');
                full.push_str(name);
                Some(full)
            }
            _ => None,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for stmt in &self.statements {
            write_node(f, stmt, 0)?;
        }
        Ok(())
    }
}

/// Indented tree dump used by `minoc ast --tree`.
fn write_node(f: &mut fmt::Formatter<'_>, node: &Node, depth: usize) -> fmt::Result {
    let pad = "  ".repeat(depth);
    match &node.kind {
        NodeKind::FunctionDecl(func) => {
            writeln!(
                f,
                "{pad}Function {} -> {} [line {}]",
                func.name,
                func.result_type(),
                node.line
            )?;
            for param in &func.parameters {
                write_node(f, param, depth + 1)?;
            }
            for stmt in &func.body.statements {
                write_node(f, stmt, depth + 1)?;
            }
        }
        NodeKind::VarDecl(decl) => {
            match decl.var_type {
                Some(ty) => writeln!(f, "{pad}Var {}: {ty} [line {}]", decl.name, node.line)?,
                None => writeln!(f, "{pad}Var {} [line {}]", decl.name, node.line)?,
            }
            if let Some(init) = &decl.initializer {
                write_node(f, init, depth + 1)?;
            }
        }
        NodeKind::Literal(literal) => writeln!(f, "{pad}Literal {literal:?}")?,
        NodeKind::VariableRef { name } => writeln!(f, "{pad}Ref {name}")?,
        NodeKind::Binary { left, operator, right } => {
            writeln!(f, "{pad}Binary {operator}")?;
            write_node(f, left, depth + 1)?;
            write_node(f, right, depth + 1)?;
        }
        NodeKind::Assign { target, value } => {
            writeln!(f, "{pad}Assign")?;
            write_node(f, target, depth + 1)?;
            write_node(f, value, depth + 1)?;
        }
        NodeKind::Return { value } => {
            writeln!(f, "{pad}Return")?;
            if let Some(value) = value {
                write_node(f, value, depth + 1)?;
            }
        }
        NodeKind::Call { callee, arguments } => {
            let name = callee.dotted_name().unwrap_or_else(|| "<expr>".to_string());
            writeln!(f, "{pad}Call {name} ({} args)", arguments.len())?;
            for arg in arguments {
                write_node(f, arg, depth + 1)?;
            }
        }
        NodeKind::MemberAccess { .. } => {
            let name = node.dotted_name().unwrap_or_else(|| "<expr>".to_string());
            writeln!(f, "{pad}Member {name}")?;
        }
        NodeKind::Include { path } => writeln!(f, "{pad}Include {path}")?,
    }
    Ok(())
}
