//! Statement parsing module

use super::{declarations, expressions, Parser};
use crate::ast::Node;
use crate::lexer::TokenType;

/// Parses a single statement inside a function body.
pub(super) fn parse_statement(parser: &mut Parser<'_>) -> Option<Node> {
    if parser.match_token(TokenType::Return) {
        return parse_return_statement(parser);
    }
    if parser.match_token(TokenType::Let) || parser.match_token(TokenType::Var) {
        return declarations::parse_var_declaration(parser);
    }
    parse_expression_statement(parser)
}

/// Parses `return expression? ;` after the `return` keyword.
fn parse_return_statement(parser: &mut Parser<'_>) -> Option<Node> {
    let line = parser.previous().line;

    let value = if parser.check(TokenType::Semicolon) {
        None
    } else {
        Some(expressions::parse_expression(parser)?)
    };

    parser.consume(TokenType::Semicolon, "Expect ';' after return value.")?;
    Some(Node::return_stmt(value, line))
}

/// Parses an expression statement, or an assignment when `=` follows the
/// first expression.
fn parse_expression_statement(parser: &mut Parser<'_>) -> Option<Node> {
    let expr = expressions::parse_expression(parser)?;

    if parser.match_token(TokenType::Equal) {
        let line = parser.previous().line;
        let value = expressions::parse_expression(parser)?;
        parser.consume(TokenType::Semicolon, "Expect ';' after assignment.")?;
        return Some(Node::assign(expr, value, line));
    }

    parser.consume(TokenType::Semicolon, "Expect ';' after expression.")?;
    Some(expr)
}
