//! Type keyword parsing

use super::Parser;
use crate::ast::Type;
use crate::lexer::TokenType;

/// Maps a type keyword token to its type.
pub(super) fn type_from_token(token_type: TokenType) -> Option<Type> {
    match token_type {
        TokenType::Int => Some(Type::Int),
        TokenType::Float => Some(Type::Float),
        TokenType::Bool => Some(Type::Bool),
        TokenType::StringType => Some(Type::String),
        TokenType::Void => Some(Type::Void),
        _ => None,
    }
}

/// Parses the type of a variable or parameter. `void` is only valid as a
/// return type and is rejected here.
pub(super) fn parse_value_type(parser: &mut Parser<'_>, message: &str) -> Option<Type> {
    let Some(ty) = type_from_token(parser.current().token_type) else {
        parser.error_at_current(message);
        return None;
    };
    parser.advance();

    if ty == Type::Void {
        parser.error_at_previous("Variables cannot have type 'void'.");
        return None;
    }
    Some(ty)
}

/// Parses the optional return type written between `func` and the name.
pub(super) fn parse_return_type(parser: &mut Parser<'_>) -> Option<Type> {
    let ty = type_from_token(parser.current().token_type)?;
    parser.advance();
    Some(ty)
}
