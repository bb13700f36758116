use super::{tokenize, Lexer, TokenType};

fn types(source: &str) -> Vec<TokenType> {
    tokenize(source).iter().map(|t| t.token_type).collect()
}

#[test]
fn test_basic_tokenization() {
    let tokens = tokenize("let x = 42;");

    assert_eq!(tokens[0].token_type, TokenType::Let);
    assert_eq!(tokens[1].token_type, TokenType::Identifier);
    assert_eq!(tokens[1].lexeme, "x");
    assert_eq!(tokens[2].token_type, TokenType::Equal);
    assert_eq!(tokens[3].token_type, TokenType::Number);
    assert_eq!(tokens[3].lexeme, "42");
    assert_eq!(tokens[4].token_type, TokenType::Semicolon);
    assert_eq!(tokens[5].token_type, TokenType::Eof);
}

#[test]
fn test_scan_is_deterministic() {
    let source = "#include <sys>\nfunc int add(int a, int b) { return a + b; }\nlet s = \"hi\";";
    assert_eq!(tokenize(source), tokenize(source));
}

#[test]
fn test_line_comment_advances_line() {
    let tokens = tokenize("// comment\n42");

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].token_type, TokenType::Number);
    assert_eq!(tokens[0].lexeme, "42");
    assert_eq!(tokens[0].line, 2);
    assert_eq!(tokens[1].token_type, TokenType::Eof);
}

#[test]
fn test_block_comment_spanning_lines() {
    let tokens = tokenize("/* a\nb */7");

    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].token_type, TokenType::Number);
    assert_eq!(tokens[0].lexeme, "7");
    assert_eq!(tokens[0].line, 2);
}

#[test]
fn test_unterminated_block_comment_is_silent() {
    assert_eq!(types("1 /* never closed\n\n"), vec![TokenType::Number, TokenType::Eof]);
}

#[test]
fn test_keywords_are_exact_matches() {
    assert_eq!(
        types("func funcs Let let var int integer string void"),
        vec![
            TokenType::Func,
            TokenType::Identifier,
            TokenType::Identifier,
            TokenType::Let,
            TokenType::Var,
            TokenType::Int,
            TokenType::Identifier,
            TokenType::StringType,
            TokenType::Void,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_numbers() {
    let tokens = tokenize("3.14 7. .5");

    assert_eq!(tokens[0].lexeme, "3.14");
    // `7.` is a number followed by a dot, `.5` is a dot followed by a number.
    assert_eq!(tokens[1].lexeme, "7");
    assert_eq!(tokens[2].token_type, TokenType::Dot);
    assert_eq!(tokens[3].token_type, TokenType::Dot);
    assert_eq!(tokens[4].lexeme, "5");
}

#[test]
fn test_minus_is_separate_operator() {
    assert_eq!(
        types("-5 -> a"),
        vec![TokenType::Minus, TokenType::Number, TokenType::Arrow, TokenType::Identifier, TokenType::Eof]
    );
}

#[test]
fn test_operators() {
    assert_eq!(
        types("+ - * / % ! != = == < <= > >= & && | ||"),
        vec![
            TokenType::Plus,
            TokenType::Minus,
            TokenType::Star,
            TokenType::Slash,
            TokenType::Percent,
            TokenType::Bang,
            TokenType::BangEqual,
            TokenType::Equal,
            TokenType::EqualEqual,
            TokenType::Less,
            TokenType::LessEqual,
            TokenType::Greater,
            TokenType::GreaterEqual,
            TokenType::Ampersand,
            TokenType::AmpersandAmpersand,
            TokenType::Pipe,
            TokenType::PipePipe,
            TokenType::Eof,
        ]
    );
}

#[test]
fn test_string_literal() {
    let tokens = tokenize(r#"let msg = "Hello, World!";"#);

    assert_eq!(tokens[3].token_type, TokenType::String);
    assert_eq!(tokens[3].lexeme, "\"Hello, World!\"");
}

#[test]
fn test_multiline_string_counts_lines() {
    let tokens = tokenize("\"a\nb\" x");

    assert_eq!(tokens[0].token_type, TokenType::String);
    assert_eq!(tokens[1].line, 2);
}

#[test]
fn test_unterminated_string() {
    let tokens = tokenize("\"abc");

    assert_eq!(tokens[0].token_type, TokenType::Error);
    assert_eq!(tokens[0].lexeme, "Unterminated string.");
    assert_eq!(tokens[1].token_type, TokenType::Eof);
}

#[test]
fn test_include_directive() {
    let tokens = tokenize("#include <sys>");
    assert_eq!(tokens[0].token_type, TokenType::Include);
    assert_eq!(tokens[0].lexeme, "#include");

    let tokens = tokenize("#define X");
    assert_eq!(tokens[0].token_type, TokenType::Error);
    assert_eq!(tokens[0].lexeme, "Unknown preprocessor directive");
    assert_eq!(tokens[1].token_type, TokenType::Identifier);
}

#[test]
fn test_unknown_character() {
    let tokens = tokenize("a @ b é c");

    assert_eq!(tokens[1].token_type, TokenType::Error);
    assert_eq!(tokens[1].lexeme, "Unexpected character.");
    assert_eq!(tokens[2].lexeme, "b");
    assert_eq!(tokens[3].token_type, TokenType::Error);
    assert_eq!(tokens[4].lexeme, "c");
}

#[test]
fn test_eof_repeats() {
    let mut lexer = Lexer::new("x");

    assert_eq!(lexer.next_token().token_type, TokenType::Identifier);
    for _ in 0..3 {
        assert_eq!(lexer.next_token().token_type, TokenType::Eof);
    }
}

#[test]
fn test_iterator_stops_after_eof() {
    let lexer = Lexer::new("a b");
    assert_eq!(lexer.count(), 3);
}
