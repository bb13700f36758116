//! Lexical analysis.
//!
//! The lexer is pull-based: the parser asks for one token at a time through
//! [`Lexer::next_token`]. Lexical problems never abort scanning, they come back
//! as `TokenType::Error` tokens whose lexeme is the diagnostic message.

mod token;

#[cfg(test)]
mod tests;

pub use token::{Token, TokenType};

/// Scans the whole source, including the trailing `Eof` token.
pub fn tokenize(source: &str) -> Vec<Token<'_>> {
    Lexer::new(source).collect()
}

pub struct Lexer<'src> {
    source: &'src str,
    start: usize,
    current: usize,
    line: usize,
    finished: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            start: 0,
            current: 0,
            line: 1,
            finished: false,
        }
    }

    /// Returns the next token. Once the end of input is reached every call
    /// yields another `Eof`.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();
        self.start = self.current;

        if self.is_at_end() {
            return self.make_token(TokenType::Eof);
        }

        let c = self.advance();

        if c == b'#' {
            return self.directive();
        }
        if c.is_ascii_alphabetic() || c == b'_' {
            return self.identifier();
        }
        if c.is_ascii_digit() {
            return self.number();
        }

        match c {
            b'(' => self.make_token(TokenType::LeftParen),
            b')' => self.make_token(TokenType::RightParen),
            b'{' => self.make_token(TokenType::LeftBrace),
            b'}' => self.make_token(TokenType::RightBrace),
            b'[' => self.make_token(TokenType::LeftBracket),
            b']' => self.make_token(TokenType::RightBracket),
            b';' => self.make_token(TokenType::Semicolon),
            b',' => self.make_token(TokenType::Comma),
            b'.' => self.make_token(TokenType::Dot),
            b':' => self.make_token(TokenType::Colon),
            b'?' => self.make_token(TokenType::Question),
            b'+' => self.make_token(TokenType::Plus),
            b'/' => self.make_token(TokenType::Slash),
            b'*' => self.make_token(TokenType::Star),
            b'%' => self.make_token(TokenType::Percent),
            b'!' => {
                let token_type = if self.match_char(b'=') {
                    TokenType::BangEqual
                } else {
                    TokenType::Bang
                };
                self.make_token(token_type)
            }
            b'=' => {
                let token_type = if self.match_char(b'=') {
                    TokenType::EqualEqual
                } else {
                    TokenType::Equal
                };
                self.make_token(token_type)
            }
            b'<' => {
                let token_type = if self.match_char(b'=') {
                    TokenType::LessEqual
                } else {
                    TokenType::Less
                };
                self.make_token(token_type)
            }
            b'>' => {
                let token_type = if self.match_char(b'=') {
                    TokenType::GreaterEqual
                } else {
                    TokenType::Greater
                };
                self.make_token(token_type)
            }
            b'-' => {
                let token_type = if self.match_char(b'>') {
                    TokenType::Arrow
                } else {
                    TokenType::Minus
                };
                self.make_token(token_type)
            }
            b'&' => {
                let token_type = if self.match_char(b'&') {
                    TokenType::AmpersandAmpersand
                } else {
                    TokenType::Ampersand
                };
                self.make_token(token_type)
            }
            b'|' => {
                let token_type = if self.match_char(b'|') {
                    TokenType::PipePipe
                } else {
                    TokenType::Pipe
                };
                self.make_token(token_type)
            }
            b'"' => self.string(),
            _ => {
                // Keep the cursor on a char boundary for multi-byte input.
                while !self.is_at_end() && (self.peek() & 0b1100_0000) == 0b1000_0000 {
                    self.advance();
                }
                self.error_token("Unexpected character.")
            }
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    fn skip_whitespace(&mut self) {
        loop {
            match self.peek() {
                b' ' | b'\r' | b'\t' => {
                    self.advance();
                }
                b'\n' => {
                    self.line += 1;
                    self.advance();
                }
                b'/' if self.peek_next() == b'/' => {
                    while self.peek() != b'\n' && !self.is_at_end() {
                        self.advance();
                    }
                }
                b'/' if self.peek_next() == b'*' => {
                    self.advance();
                    self.advance();
                    while !(self.peek() == b'*' && self.peek_next() == b'/') && !self.is_at_end() {
                        if self.peek() == b'\n' {
                            self.line += 1;
                        }
                        self.advance();
                    }
                    // An unterminated block comment simply runs to the end.
                    if !self.is_at_end() {
                        self.advance();
                        self.advance();
                    }
                }
                _ => return,
            }
        }
    }

    fn directive(&mut self) -> Token<'src> {
        while self.peek().is_ascii_alphabetic() {
            self.advance();
        }

        if &self.source[self.start..self.current] == "#include" {
            self.make_token(TokenType::Include)
        } else {
            self.error_token("Unknown preprocessor directive")
        }
    }

    fn identifier(&mut self) -> Token<'src> {
        while self.peek().is_ascii_alphanumeric() || self.peek() == b'_' {
            self.advance();
        }

        let text = &self.source[self.start..self.current];
        let token_type = TokenType::keyword(text).unwrap_or(TokenType::Identifier);
        self.make_token(token_type)
    }

    fn number(&mut self) -> Token<'src> {
        while self.peek().is_ascii_digit() {
            self.advance();
        }

        // Look for a fractional part
        if self.peek() == b'.' && self.peek_next().is_ascii_digit() {
            self.advance();
            while self.peek().is_ascii_digit() {
                self.advance();
            }
        }

        self.make_token(TokenType::Number)
    }

    fn string(&mut self) -> Token<'src> {
        while self.peek() != b'"' && !self.is_at_end() {
            if self.peek() == b'\n' {
                self.line += 1;
            }
            self.advance();
        }

        if self.is_at_end() {
            return self.error_token("Unterminated string.");
        }

        // The closing quote.
        self.advance();
        self.make_token(TokenType::String)
    }

    fn match_char(&mut self, expected: u8) -> bool {
        if self.is_at_end() || self.peek() != expected {
            return false;
        }
        self.current += 1;
        true
    }

    fn peek(&self) -> u8 {
        self.source.as_bytes().get(self.current).copied().unwrap_or(b'\0')
    }

    fn peek_next(&self) -> u8 {
        self.source.as_bytes().get(self.current + 1).copied().unwrap_or(b'\0')
    }

    fn advance(&mut self) -> u8 {
        let c = self.peek();
        if !self.is_at_end() {
            self.current += 1;
        }
        c
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn make_token(&self, token_type: TokenType) -> Token<'src> {
        Token::new(token_type, &self.source[self.start..self.current], self.line)
    }

    fn error_token(&self, message: &'static str) -> Token<'src> {
        Token::new(TokenType::Error, message, self.line)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = Token<'src>;

    /// Yields every token up to and including the first `Eof`.
    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let token = self.next_token();
        if token.is(TokenType::Eof) {
            self.finished = true;
        }
        Some(token)
    }
}
