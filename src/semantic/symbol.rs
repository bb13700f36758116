use super::error::SemanticError;
use super::types::TypeInfo;
use crate::ast::Type;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Variable,
    Function,
    Parameter,
    Class,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Variable => "variable",
            SymbolKind::Function => "function",
            SymbolKind::Parameter => "parameter",
            SymbolKind::Class => "class",
        };
        f.write_str(name)
    }
}

/// Parameter types and result of a declared function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub params: Vec<Type>,
    pub return_type: Type,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    /// Declared or inferred type annotation, copied out of the tree.
    pub ty: Option<Type>,
    pub signature: Option<Signature>,
    pub depth: usize,
    pub line: usize,
}

impl Symbol {
    pub fn variable(name: impl Into<String>, ty: Option<Type>, line: usize) -> Self {
        Self::new(name, SymbolKind::Variable, ty, None, line)
    }

    pub fn parameter(name: impl Into<String>, ty: Option<Type>, line: usize) -> Self {
        Self::new(name, SymbolKind::Parameter, ty, None, line)
    }

    pub fn function(name: impl Into<String>, signature: Signature, line: usize) -> Self {
        let ty = Some(signature.return_type);
        Self::new(name, SymbolKind::Function, ty, Some(signature), line)
    }

    fn new(
        name: impl Into<String>,
        kind: SymbolKind,
        ty: Option<Type>,
        signature: Option<Signature>,
        line: usize,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            ty,
            signature,
            // Set by `SymbolTable::define`.
            depth: 0,
            line,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind, self.name)?;
        if let Some(signature) = &self.signature {
            let params: Vec<_> = signature.params.iter().map(|p| p.name()).collect();
            write!(f, "({}) -> {}", params.join(", "), signature.return_type)?;
        } else if let Some(ty) = self.ty {
            write!(f, ": {ty} ({} bytes)", TypeInfo::of(ty).size)?;
        }
        write!(f, " [depth {}, line {}]", self.depth, self.line)
    }
}

/// Scoped symbol table. Every name maps to a stack of entries ordered by
/// depth, so the innermost visible declaration is always the last one.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Vec<Symbol>>,
    depth: usize,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_scope(&mut self) {
        self.depth += 1;
    }

    /// Leaves the current scope, dropping every symbol declared in it.
    /// Returns false when already at global scope.
    pub fn exit_scope(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }

        let depth = self.depth;
        self.symbols.retain(|_, entries| {
            while entries.last().is_some_and(|s| s.depth >= depth) {
                entries.pop();
            }
            !entries.is_empty()
        });
        self.depth -= 1;
        true
    }

    /// Declares a symbol at the current depth.
    pub fn define(&mut self, mut symbol: Symbol) -> Result<(), SemanticError> {
        let depth = self.depth;
        let entries = self.symbols.entry(symbol.name.clone()).or_default();
        if entries.last().is_some_and(|s| s.depth == depth) {
            return Err(SemanticError::Redefinition {
                name: symbol.name,
                line: symbol.line,
            });
        }

        symbol.depth = depth;
        entries.push(symbol);
        Ok(())
    }

    /// Finds the innermost visible declaration of `name`.
    pub fn resolve(&self, name: &str) -> Option<&Symbol> {
        self.symbols.get(name).and_then(|entries| entries.last())
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of live symbols across all scopes.
    pub fn len(&self) -> usize {
        self.symbols.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Live symbols ordered by depth, then line, then name.
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut all: Vec<_> = self.symbols.values().flatten().collect();
        all.sort_by(|a, b| {
            (a.depth, a.line, &a.name).cmp(&(b.depth, b.line, &b.name))
        });
        all
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Symbol table (depth {}, {} symbols)", self.depth, self.len())?;
        for symbol in self.symbols() {
            writeln!(f, "  {symbol}")?;
        }
        Ok(())
    }
}
