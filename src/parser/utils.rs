//! Token to AST conversions

use super::Parser;
use crate::ast::{BinaryOperator, Literal};
use crate::lexer::{Token, TokenType};

/// Converts an operator token to a binary operator, if it is one.
pub(super) fn binary_operator(token_type: TokenType) -> Option<BinaryOperator> {
    match token_type {
        TokenType::Plus => Some(BinaryOperator::Plus),
        TokenType::Minus => Some(BinaryOperator::Minus),
        TokenType::Star => Some(BinaryOperator::Star),
        TokenType::Slash => Some(BinaryOperator::Slash),
        _ => None,
    }
}

/// Converts a just-consumed `Number` token. Lexemes with a `.` are floats,
/// the rest are integers.
pub(super) fn number_literal(parser: &mut Parser<'_>, token: Token<'_>) -> Option<Literal> {
    let literal = if token.lexeme.contains('.') {
        token
            .lexeme
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(Literal::Float)
    } else {
        token.lexeme.parse::<i64>().ok().map(Literal::Integer)
    };

    if literal.is_none() {
        parser.error_at_previous("Number literal out of range.");
    }
    literal
}

/// Strips the surrounding quotes from a `String` token's lexeme.
pub(super) fn string_literal(token: Token<'_>) -> Literal {
    let text = token
        .lexeme
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(token.lexeme);
    Literal::String(text.to_string())
}
