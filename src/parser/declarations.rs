//! Declaration parsing module
//!
//! Handles the top-level productions: `#include` lines, function
//! declarations and variable declarations. Anything else falls through to
//! statement parsing.

use super::{expressions, statements, types, Parser};
use crate::ast::{Node, Program};
use crate::lexer::TokenType;

/// Parses one top-level declaration.
pub(super) fn parse_declaration(parser: &mut Parser<'_>) -> Option<Node> {
    if parser.match_token(TokenType::Include) {
        return parse_include(parser);
    }
    if parser.match_token(TokenType::Func) {
        return parse_function_declaration(parser);
    }
    if parser.match_token(TokenType::Let) || parser.match_token(TokenType::Var) {
        return parse_var_declaration(parser);
    }
    statements::parse_statement(parser)
}

/// Consumes every token left on the `#include` line and records its text.
fn parse_include(parser: &mut Parser<'_>) -> Option<Node> {
    let line = parser.previous().line;
    let mut path = String::new();

    while parser.current().line == line && !parser.check(TokenType::Eof) {
        path.push_str(parser.current().lexeme);
        parser.advance();
    }

    if path.is_empty() {
        parser.error_at_current("Expect file name after '#include'.");
        return None;
    }

    Some(Node::include(path, line))
}

/// Parses a function declaration after the `func` keyword.
fn parse_function_declaration(parser: &mut Parser<'_>) -> Option<Node> {
    let line = parser.previous().line;
    let return_type = types::parse_return_type(parser);
    let name = parser.consume(TokenType::Identifier, "Expect function name.")?;

    parser.consume(TokenType::LeftParen, "Expect '(' after function name.")?;
    let mut parameters = Vec::new();
    if !parser.check(TokenType::RightParen) {
        loop {
            let param_type = types::parse_value_type(parser, "Expect parameter type.")?;
            let param = parser.consume(TokenType::Identifier, "Expect parameter name.")?;
            parameters.push(Node::var_decl(param.lexeme, Some(param_type), None, param.line));
            if !parser.match_token(TokenType::Comma) {
                break;
            }
        }
    }
    parser.consume(TokenType::RightParen, "Expect ')' after parameters.")?;

    parser.consume(TokenType::LeftBrace, "Expect '{' before function body.")?;
    let body = parse_function_body(parser)?;
    parser.consume(TokenType::RightBrace, "Expect '}' after function body.")?;

    Some(Node::function(name.lexeme, parameters, return_type, body, line))
}

/// Parses statements up to the closing `}`. A broken statement is reported,
/// skipped, and parsing of the body continues so later mistakes surface too.
fn parse_function_body(parser: &mut Parser<'_>) -> Option<Program> {
    let mut statements = Vec::new();
    let mut failed = false;

    while !parser.check(TokenType::RightBrace) && !parser.check(TokenType::Eof) {
        let before = parser.consumed;
        match statements::parse_statement(parser) {
            Some(stmt) => statements.push(stmt),
            None => {
                failed = true;
                parser.synchronize();
                // A new top-level declaration means the body was never closed.
                if parser.consumed == before
                    || parser.check(TokenType::Func)
                    || parser.check(TokenType::Include)
                {
                    return None;
                }
            }
        }
    }

    if failed {
        // Still consume the brace so the caller resumes after this function.
        parser.match_token(TokenType::RightBrace);
        return None;
    }
    Some(Program::new(statements))
}

/// Parses a variable declaration after `let` or `var`.
pub(super) fn parse_var_declaration(parser: &mut Parser<'_>) -> Option<Node> {
    let name = parser.consume(TokenType::Identifier, "Expect variable name.")?;

    let var_type = if parser.match_token(TokenType::Colon) {
        Some(types::parse_value_type(parser, "Expect type after ':'.")?)
    } else if types::type_from_token(parser.current().token_type).is_some() {
        Some(types::parse_value_type(parser, "Expect variable type.")?)
    } else {
        None
    };

    let initializer = if parser.match_token(TokenType::Equal) {
        Some(expressions::parse_expression(parser)?)
    } else {
        None
    };

    parser.consume(TokenType::Semicolon, "Expect ';' after variable declaration.")?;
    Some(Node::var_decl(name.lexeme, var_type, initializer, name.line))
}
