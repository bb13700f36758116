//! Main parser module that orchestrates the parsing process
//!
//! The parser is a recursive-descent consumer that pulls tokens from the
//! lexer one at a time, keeping only `current` and `previous`. Specific
//! productions live in submodules:
//! - `declarations`: `#include`, functions and variable declarations
//! - `statements`: return, assignment and expression statements
//! - `expressions`: binary chains, primaries, dotted names and calls
//! - `types`: type keywords
//! - `utils`: token to AST conversions
//!
//! Errors are collected rather than thrown. A failing production records a
//! positioned diagnostic, enters panic mode and yields `None`; the top level
//! then resynchronises and keeps going so one run reports every independent
//! mistake. Any diagnostic makes the whole parse fail.

use crate::ast::Program;
use crate::lexer::{Lexer, Token, TokenType};
use std::fmt;

#[cfg(test)]
mod tests;

mod declarations;
mod expressions;
mod statements;
mod types;
mod utils;

/// Where a syntax diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// At the offending token's text.
    Lexeme(String),
    /// At the end of input.
    End,
    /// The message came from the lexer and already describes the problem.
    Lexer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxDiagnostic {
    pub line: usize,
    pub location: Location,
    pub message: String,
}

impl fmt::Display for SyntaxDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error", self.line)?;
        match &self.location {
            Location::Lexeme(lexeme) => write!(f, " at '{lexeme}'")?,
            Location::End => write!(f, " at end")?,
            Location::Lexer => {}
        }
        write!(f, ": {}", self.message)
    }
}

/// Error type for parsing failures
#[derive(Debug)]
pub struct ParseError {
    /// Every diagnostic reported while parsing, in source order
    pub diagnostics: Vec<SyntaxDiagnostic>,
}

impl ParseError {
    /// Line of the first diagnostic
    pub fn line(&self) -> usize {
        self.diagnostics.first().map_or(1, |d| d.line)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{diagnostic}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Main entry point for parsing source text into an AST
///
/// # Returns
/// * `Result<Program, ParseError>` - Parsed program, or every syntax diagnostic
pub fn parse(source: &str) -> Result<Program, ParseError> {
    Parser::new(source).parse_program()
}

/// Main parser struct that coordinates the parsing process
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token<'src>,
    previous: Token<'src>,
    panic_mode: bool,
    diagnostics: Vec<SyntaxDiagnostic>,
    /// Number of tokens consumed so far, used to guarantee progress.
    consumed: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let placeholder = Token::new(TokenType::Eof, "", 1);
        let mut parser = Self {
            lexer: Lexer::new(source),
            current: placeholder,
            previous: placeholder,
            panic_mode: false,
            diagnostics: Vec::new(),
            consumed: 0,
        };
        parser.advance();
        parser
    }

    /// Parses the entire program
    pub fn parse_program(mut self) -> Result<Program, ParseError> {
        let mut statements = Vec::new();

        while !self.check(TokenType::Eof) {
            let before = self.consumed;
            match declarations::parse_declaration(&mut self) {
                Some(node) => {
                    statements.push(node);
                    self.panic_mode = false;
                }
                None => {
                    self.synchronize();
                    if self.consumed == before {
                        self.advance();
                    }
                }
            }
        }

        if self.had_error() {
            // The partial tree is dropped here.
            return Err(ParseError { diagnostics: self.diagnostics });
        }

        Ok(Program::new(statements))
    }

    pub fn had_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    // ------------------------------------------------------------------ //
    // Token handling
    // ------------------------------------------------------------------ //

    fn advance(&mut self) {
        self.previous = self.current;
        self.consumed += 1;

        loop {
            self.current = self.lexer.next_token();
            if !self.current.is(TokenType::Error) {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    fn check(&self, token_type: TokenType) -> bool {
        self.current.is(token_type)
    }

    fn match_token(&mut self, token_type: TokenType) -> bool {
        if !self.check(token_type) {
            return false;
        }
        self.advance();
        true
    }

    /// Consumes a token of the expected type, or reports `message` at the
    /// current token.
    fn consume(&mut self, token_type: TokenType, message: &str) -> Option<Token<'src>> {
        if self.check(token_type) {
            self.advance();
            return Some(self.previous);
        }
        self.error_at_current(message);
        None
    }

    fn current(&self) -> Token<'src> {
        self.current
    }

    fn previous(&self) -> Token<'src> {
        self.previous
    }

    // ------------------------------------------------------------------ //
    // Error handling
    // ------------------------------------------------------------------ //

    fn error_at_current(&mut self, message: &str) {
        let token = self.current;
        self.error_at(token, message);
    }

    fn error_at_previous(&mut self, message: &str) {
        let token = self.previous;
        self.error_at(token, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let location = match token.token_type {
            TokenType::Eof => Location::End,
            TokenType::Error => Location::Lexer,
            _ => Location::Lexeme(token.lexeme.to_string()),
        };
        self.diagnostics.push(SyntaxDiagnostic {
            line: token.line,
            location,
            message: message.to_string(),
        });
    }

    /// Skips tokens until a likely declaration boundary and leaves panic mode.
    fn synchronize(&mut self) {
        self.panic_mode = false;

        while !self.check(TokenType::Eof) {
            if matches!(self.previous.token_type, TokenType::Semicolon | TokenType::RightBrace) {
                return;
            }
            match self.current.token_type {
                TokenType::Func
                | TokenType::Let
                | TokenType::Var
                | TokenType::Return
                | TokenType::Include => return,
                _ => self.advance(),
            }
        }
    }
}

