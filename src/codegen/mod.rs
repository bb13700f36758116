//! x86-64 code generation.
//!
//! Lowers a checked [`Program`] to AT&T assembly for the GNU assembler. The
//! emitter is a simple accumulator machine: every expression leaves its value
//! in `%rax`, and intermediate values are parked on the stack. Parameters and
//! locals each get an 8-byte slot below `%rbp`, parameters first.
//!
//! Only top-level functions produce code. Other top-level statements are
//! accepted by the checker but have no runtime effect.

#[cfg(test)]
mod tests;

use crate::ast::{BinaryOperator, FunctionDecl, Literal, Node, NodeKind, Program};
use std::collections::HashMap;
use std::fmt::Write;
use thiserror::Error;

/// System V integer argument registers, in order.
const ARG_REGISTERS: [&str; 6] = ["%rdi", "%rsi", "%rdx", "%rcx", "%r8", "%r9"];

/// Runtime routine `main` calls before any user code.
const RUNTIME_INIT: &str = "initSystem";

#[derive(Error, Debug)]
pub enum CodegenError {
    #[error("[line {line}] Unsupported callee: only named functions can be called")]
    UnsupportedCallee { line: usize },
    #[error("[line {line}] Call to '{name}' passes {count} arguments, at most 6 fit in registers")]
    TooManyArguments { name: String, count: usize, line: usize },
    #[error("[line {line}] Unsupported assignment target")]
    UnsupportedAssignment { line: usize },
    #[error("[line {line}] Cannot assign to '{name}': global variables have no storage")]
    GlobalAssignment { name: String, line: usize },
    #[error("Fmt error")]
    Fmt(#[from] std::fmt::Error),
}

/// Generates the assembly for a whole compilation unit.
pub fn generate(program: &Program) -> Result<String, CodegenError> {
    CodeGenerator::new().generate_program(program)
}

/// Flattens a dotted callee into a linker symbol: `sys.IO.print` becomes
/// `sys_IO_print`.
pub fn flatten_name(name: &str) -> String {
    name.replace('.', "_")
}

/// Stack slots of the function being emitted.
#[derive(Default)]
struct Frame {
    /// Parameter names followed by local names, in slot order.
    slots: Vec<String>,
}

impl Frame {
    fn for_function(func: &FunctionDecl) -> Self {
        let slots = func
            .parameter_decls()
            .chain(func.local_decls())
            .map(|decl| decl.name.clone())
            .collect();
        Self { slots }
    }

    /// `%rbp`-relative offset of a named slot.
    fn offset(&self, name: &str) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| slot == name)
            .map(slot_offset)
    }

    /// Frame size in bytes, kept a multiple of 16.
    fn size(&self) -> usize {
        (self.slots.len() * 8 + 15) & !15
    }
}

fn slot_offset(index: usize) -> usize {
    8 * (index + 1)
}

pub struct CodeGenerator {
    buf: String,
    /// String literals in first-seen order; the index is the label number.
    strings: Vec<String>,
    labels: HashMap<String, usize>,
    frame: Frame,
    /// Values currently pushed by expression evaluation.
    pushed: usize,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            strings: Vec::new(),
            labels: HashMap::new(),
            frame: Frame::default(),
            pushed: 0,
        }
    }

    // --------------------------------------------------------------------- //
    // Public API
    // --------------------------------------------------------------------- //
    pub fn generate_program(mut self, program: &Program) -> Result<String, CodegenError> {
        for stmt in &program.statements {
            self.collect_strings(stmt);
        }
        self.emit_string_pool()?;

        self.directive(".text")?;
        self.directive(".globl main")?;
        for func in program.functions() {
            self.emit_function(func)?;
        }

        self.directive(".section .note.GNU-stack,\"\",@progbits")?;
        Ok(self.buf)
    }

    // --------------------------------------------------------------------- //
    // Output helpers
    // --------------------------------------------------------------------- //
    fn ins(&mut self, instruction: &str) -> Result<(), CodegenError> {
        writeln!(self.buf, "    {instruction}")?;
        Ok(())
    }

    fn directive(&mut self, directive: &str) -> Result<(), CodegenError> {
        writeln!(self.buf, "    {directive}")?;
        Ok(())
    }

    fn label(&mut self, name: &str) -> Result<(), CodegenError> {
        writeln!(self.buf, "{name}:")?;
        Ok(())
    }

    fn push_rax(&mut self) -> Result<(), CodegenError> {
        self.pushed += 1;
        self.ins("push %rax")
    }

    fn pop(&mut self, register: &str) -> Result<(), CodegenError> {
        self.pushed -= 1;
        self.ins(&format!("pop {register}"))
    }

    // --------------------------------------------------------------------- //
    // String pool
    // --------------------------------------------------------------------- //
    fn collect_strings(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Literal(Literal::String(text)) => {
                if !self.labels.contains_key(text) {
                    self.labels.insert(text.clone(), self.strings.len());
                    self.strings.push(text.clone());
                }
            }
            NodeKind::Literal(_) | NodeKind::VariableRef { .. } | NodeKind::Include { .. } => {}
            NodeKind::FunctionDecl(func) => {
                for stmt in func.parameters.iter().chain(&func.body.statements) {
                    self.collect_strings(stmt);
                }
            }
            NodeKind::VarDecl(decl) => {
                if let Some(init) = &decl.initializer {
                    self.collect_strings(init);
                }
            }
            NodeKind::Binary { left, right, .. } => {
                self.collect_strings(left);
                self.collect_strings(right);
            }
            NodeKind::Assign { target, value } => {
                self.collect_strings(target);
                self.collect_strings(value);
            }
            NodeKind::Return { value } => {
                if let Some(value) = value {
                    self.collect_strings(value);
                }
            }
            NodeKind::Call { callee, arguments } => {
                self.collect_strings(callee);
                for arg in arguments {
                    self.collect_strings(arg);
                }
            }
            NodeKind::MemberAccess { object, .. } => self.collect_strings(object),
        }
    }

    fn emit_string_pool(&mut self) -> Result<(), CodegenError> {
        if self.strings.is_empty() {
            return Ok(());
        }

        self.directive(".section .rodata")?;
        let strings = std::mem::take(&mut self.strings);
        for (index, text) in strings.iter().enumerate() {
            self.label(&format!(".LC{index}"))?;
            self.directive(&format!(".asciz \"{}\"", escape_asm_string(text)))?;
        }
        self.strings = strings;
        Ok(())
    }

    // --------------------------------------------------------------------- //
    // Functions and statements
    // --------------------------------------------------------------------- //
    fn emit_function(&mut self, func: &FunctionDecl) -> Result<(), CodegenError> {
        self.frame = Frame::for_function(func);
        self.pushed = 0;

        if func.name != "main" {
            self.directive(&format!(".globl {}", func.name))?;
        }
        self.label(&func.name)?;
        self.ins("push %rbp")?;
        self.ins("mov %rsp, %rbp")?;
        let size = self.frame.size();
        if size > 0 {
            self.ins(&format!("sub ${size}, %rsp"))?;
        }

        for (index, register) in ARG_REGISTERS.iter().enumerate().take(func.parameters.len()) {
            self.ins(&format!("mov {register}, -{}(%rbp)", slot_offset(index)))?;
        }

        if func.name == "main" {
            self.ins(&format!("call {RUNTIME_INIT}"))?;
        }

        for stmt in &func.body.statements {
            self.emit_statement(stmt)?;
        }

        // Falling off the end returns 0.
        self.ins("mov $0, %rax")?;
        self.ins("leave")?;
        self.ins("ret")
    }

    fn emit_statement(&mut self, stmt: &Node) -> Result<(), CodegenError> {
        match &stmt.kind {
            NodeKind::VarDecl(decl) => {
                let offset = self.frame.offset(&decl.name).unwrap_or_else(|| slot_offset(0));
                match &decl.initializer {
                    Some(init) => {
                        self.emit_expr(init)?;
                        self.ins(&format!("mov %rax, -{offset}(%rbp)"))
                    }
                    None => self.ins(&format!("movq $0, -{offset}(%rbp)")),
                }
            }
            NodeKind::Return { value } => {
                match value {
                    Some(value) => self.emit_expr(value)?,
                    None => self.ins("mov $0, %rax")?,
                }
                self.ins("leave")?;
                self.ins("ret")
            }
            NodeKind::Assign { target, value } => {
                let NodeKind::VariableRef { name } = &target.kind else {
                    return Err(CodegenError::UnsupportedAssignment { line: stmt.line });
                };
                let Some(offset) = self.frame.offset(name) else {
                    return Err(CodegenError::GlobalAssignment {
                        name: name.clone(),
                        line: stmt.line,
                    });
                };
                self.emit_expr(value)?;
                self.ins(&format!("mov %rax, -{offset}(%rbp)"))
            }
            NodeKind::FunctionDecl(_) | NodeKind::Include { .. } => Ok(()),
            NodeKind::Literal(_)
            | NodeKind::VariableRef { .. }
            | NodeKind::Binary { .. }
            | NodeKind::Call { .. }
            | NodeKind::MemberAccess { .. } => self.emit_expr(stmt),
        }
    }

    // --------------------------------------------------------------------- //
    // Expressions
    // --------------------------------------------------------------------- //
    fn emit_expr(&mut self, node: &Node) -> Result<(), CodegenError> {
        match &node.kind {
            NodeKind::Literal(literal) => self.emit_literal(literal),
            NodeKind::VariableRef { name } => match self.frame.offset(name) {
                Some(offset) => self.ins(&format!("mov -{offset}(%rbp), %rax")),
                None => {
                    self.ins(&format!("# unknown name {name}, using 0"))?;
                    self.ins("mov $0, %rax")
                }
            },
            NodeKind::MemberAccess { .. } => {
                let name = node.dotted_name().unwrap_or_default();
                self.ins(&format!("# member access {name}, using 0"))?;
                self.ins("mov $0, %rax")
            }
            NodeKind::Binary { left, operator, right } => {
                self.emit_expr(left)?;
                self.push_rax()?;
                self.emit_expr(right)?;
                self.ins("mov %rax, %rdi")?;
                self.pop("%rax")?;
                match operator {
                    BinaryOperator::Plus => self.ins("add %rdi, %rax"),
                    BinaryOperator::Minus => self.ins("sub %rdi, %rax"),
                    BinaryOperator::Star => self.ins("imul %rdi, %rax"),
                    BinaryOperator::Slash => {
                        self.ins("cqo")?;
                        self.ins("idiv %rdi")
                    }
                }
            }
            NodeKind::Call { callee, arguments } => self.emit_call(callee, arguments, node.line),
            NodeKind::FunctionDecl(_)
            | NodeKind::VarDecl(_)
            | NodeKind::Assign { .. }
            | NodeKind::Return { .. }
            | NodeKind::Include { .. } => self.ins("mov $0, %rax"),
        }
    }

    fn emit_literal(&mut self, literal: &Literal) -> Result<(), CodegenError> {
        match literal {
            Literal::Integer(value) => self.ins(&format!("mov ${value}, %rax")),
            Literal::Float(value) => {
                // Floats travel as their IEEE-754 bit pattern.
                self.ins(&format!("movabs ${}, %rax    # {value:?}", value.to_bits() as i64))
            }
            Literal::Boolean(value) => self.ins(&format!("mov ${}, %rax", u8::from(*value))),
            Literal::Null => self.ins("mov $0, %rax"),
            Literal::String(text) => match self.labels.get(text) {
                Some(index) => self.ins(&format!("lea .LC{index}(%rip), %rax")),
                None => self.ins("mov $0, %rax"),
            },
        }
    }

    fn emit_call(&mut self, callee: &Node, arguments: &[Node], line: usize) -> Result<(), CodegenError> {
        let Some(name) = callee.dotted_name() else {
            return Err(CodegenError::UnsupportedCallee { line });
        };
        if arguments.len() > ARG_REGISTERS.len() {
            return Err(CodegenError::TooManyArguments {
                name,
                count: arguments.len(),
                line,
            });
        }

        for arg in arguments {
            self.emit_expr(arg)?;
            self.push_rax()?;
        }
        for register in ARG_REGISTERS[..arguments.len()].iter().rev() {
            self.pop(register)?;
        }

        // %rsp is 16-byte aligned at function entry; each parked value moves it by 8.
        let padded = self.pushed % 2 == 1;
        if padded {
            self.ins("sub $8, %rsp")?;
        }
        self.ins(&format!("call {}", flatten_name(&name)))?;
        if padded {
            self.ins("add $8, %rsp")?;
        }
        Ok(())
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Escapes text for an `.asciz` directive so the assembled bytes are exactly
/// the literal's bytes. Mino strings have no escapes, so a source `\` is a
/// plain backslash.
fn escape_asm_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for byte in text.bytes() {
        match byte {
            b'\\' => out.push_str("\\\\"),
            b'"' => out.push_str("\\\""),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b' '..=b'~' => out.push(char::from(byte)),
            _ => out.push_str(&format!("\\{byte:03o}")),
        }
    }
    out
}
