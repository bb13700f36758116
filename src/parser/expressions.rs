//! Expression parsing module
//!
//! All four arithmetic operators share a single precedence tier and associate
//! to the left, so `a - b * c` is `(a - b) * c`.

use super::{utils, Parser};
use crate::ast::{Literal, Node};
use crate::lexer::TokenType;

/// Main expression parsing entry point
pub(super) fn parse_expression(parser: &mut Parser<'_>) -> Option<Node> {
    parse_binary(parser)
}

/// Parses a left-associative chain of `+ - * /`.
fn parse_binary(parser: &mut Parser<'_>) -> Option<Node> {
    let mut expr = parse_primary(parser)?;

    while let Some(operator) = utils::binary_operator(parser.current().token_type) {
        parser.advance();
        let line = parser.previous().line;
        let right = parse_primary(parser)?;
        expr = Node::binary(expr, operator, right, line);
    }

    Some(expr)
}

/// Parses literals, dotted names, calls and parenthesised expressions.
fn parse_primary(parser: &mut Parser<'_>) -> Option<Node> {
    let token = parser.current();

    match token.token_type {
        TokenType::Number => {
            parser.advance();
            let value = utils::number_literal(parser, token)?;
            Some(Node::literal(value, token.line))
        }
        TokenType::String => {
            parser.advance();
            Some(Node::literal(utils::string_literal(token), token.line))
        }
        TokenType::True => {
            parser.advance();
            Some(Node::literal(Literal::Boolean(true), token.line))
        }
        TokenType::False => {
            parser.advance();
            Some(Node::literal(Literal::Boolean(false), token.line))
        }
        TokenType::Null => {
            parser.advance();
            Some(Node::literal(Literal::Null, token.line))
        }
        TokenType::Identifier => {
            parser.advance();
            parse_name(parser)
        }
        TokenType::LeftParen => {
            parser.advance();
            let expr = parse_expression(parser)?;
            parser.consume(TokenType::RightParen, "Expect ')' after expression.")?;
            Some(expr)
        }
        _ => {
            parser.error_at_current("Expect expression.");
            None
        }
    }
}

/// Parses the rest of `IDENT ('.' IDENT)*`, turning the chain into a call when
/// an argument list follows.
fn parse_name(parser: &mut Parser<'_>) -> Option<Node> {
    let first = parser.previous();
    let mut expr = Node::variable(first.lexeme, first.line);

    while parser.match_token(TokenType::Dot) {
        let member = parser.consume(TokenType::Identifier, "Expect member name after '.'.")?;
        expr = Node::member_access(expr, member.lexeme, member.line);
    }

    if parser.match_token(TokenType::LeftParen) {
        return finish_call(parser, expr);
    }

    Some(expr)
}

fn finish_call(parser: &mut Parser<'_>, callee: Node) -> Option<Node> {
    let line = parser.previous().line;
    let mut arguments = Vec::new();

    if !parser.check(TokenType::RightParen) {
        loop {
            arguments.push(parse_expression(parser)?);
            if !parser.match_token(TokenType::Comma) {
                break;
            }
        }
    }

    parser.consume(TokenType::RightParen, "Expect ')' after arguments.")?;
    Some(Node::call(callee, arguments, line))
}
