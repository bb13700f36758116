use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
pub enum TokenType {
    // Punctuation
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Comma,
    Dot,
    Semicolon,
    Colon,
    Question,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    BangEqual,
    Equal,
    EqualEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
    Ampersand,
    AmpersandAmpersand,
    Pipe,
    PipePipe,
    Arrow,

    // Literals
    Identifier,
    String,
    Number,

    // Keywords
    Func,
    Class,
    Let,
    Var,
    If,
    Else,
    While,
    For,
    Return,
    True,
    False,
    Null,
    And,
    Or,
    New,
    This,
    Super,
    Include,

    // Type keywords
    Int,
    Float,
    Bool,
    StringType,
    Void,

    // Other
    Error,
    Eof,
}

impl TokenType {
    /// Keyword lookup on the full identifier text.
    pub fn keyword(text: &str) -> Option<TokenType> {
        let token_type = match text {
            "func" => TokenType::Func,
            "class" => TokenType::Class,
            "let" => TokenType::Let,
            "var" => TokenType::Var,
            "if" => TokenType::If,
            "else" => TokenType::Else,
            "while" => TokenType::While,
            "for" => TokenType::For,
            "return" => TokenType::Return,
            "true" => TokenType::True,
            "false" => TokenType::False,
            "null" => TokenType::Null,
            "and" => TokenType::And,
            "or" => TokenType::Or,
            "new" => TokenType::New,
            "this" => TokenType::This,
            "super" => TokenType::Super,
            "int" => TokenType::Int,
            "float" => TokenType::Float,
            "bool" => TokenType::Bool,
            "string" => TokenType::StringType,
            "void" => TokenType::Void,
            _ => return None,
        };
        Some(token_type)
    }

    pub fn is_type_keyword(self) -> bool {
        matches!(
            self,
            TokenType::Int | TokenType::Float | TokenType::Bool | TokenType::StringType | TokenType::Void
        )
    }
}

/// A lexical unit. The lexeme borrows the source text; for `Error` tokens it
/// holds the lexer's diagnostic message instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct Token<'src> {
    pub token_type: TokenType,
    pub lexeme: &'src str,
    pub line: usize,
}

impl<'src> Token<'src> {
    pub fn new(token_type: TokenType, lexeme: &'src str, line: usize) -> Self {
        Self { token_type, lexeme, line }
    }

    pub fn is(&self, token_type: TokenType) -> bool {
        self.token_type == token_type
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} '{}'", self.token_type, self.lexeme)
    }
}
