//! Human-readable rendering of compile errors.
//!
//! Each diagnostic becomes a block with a title, a `file:line:col` pointer,
//! the offending source line with a caret, and optional help lines.

pub mod color;

use crate::engine::CompileError;
use crate::lexer::{tokenize, TokenType};
use crate::parser::{Location, SyntaxDiagnostic};
use codemap::CodeMap;
use color::Palette;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

/// Renders every diagnostic carried by `err` against its source file.
pub fn render(file_path: &Path, source: &str, err: &CompileError, palette: Palette) -> String {
    let renderer = Renderer::new(file_path, source, palette);
    match err {
        CompileError::Parse(parse) => parse
            .diagnostics
            .iter()
            .map(|diagnostic| renderer.syntax(diagnostic))
            .collect::<String>(),
        CompileError::Semantic(semantic) => {
            let line = semantic.line();
            let mut helps = Vec::new();
            let span = match semantic.undefined_name() {
                Some((kind, name)) => {
                    helps.push(suggest_name(kind, name, source));
                    renderer.span_of(line, last_segment(name))
                }
                None => renderer.span_of(line, ""),
            };
            renderer.block("Semantic error", &semantic.to_string(), Some(span), &helps)
        }
        CompileError::Codegen(codegen) => {
            renderer.block("Code generation error", &codegen.to_string(), None, &[])
        }
        CompileError::Toolchain(toolchain) => renderer.block(
            "Toolchain error",
            &toolchain.to_string(),
            None,
            &["set MINO_CC or pass --cc to choose another C compiler".to_string()],
        ),
        CompileError::Io(io) => renderer.block("I/O error", &io.to_string(), None, &[]),
    }
}

struct Renderer {
    file: Arc<codemap::File>,
    path: String,
    palette: Palette,
}

impl Renderer {
    fn new(file_path: &Path, source: &str, palette: Palette) -> Self {
        let path = file_path.display().to_string();
        let mut map = CodeMap::new();
        let file = map.add_file(path.clone(), source.to_string());
        Self { file, path, palette }
    }

    /// Text of a 1-based line, if it exists.
    fn line_text(&self, line: usize) -> Option<&str> {
        let index = line.checked_sub(1)?;
        (index < self.file.num_lines()).then(|| self.file.source_line(index))
    }

    /// Points at `needle` on `line`, or at the first non-blank character.
    fn span_of(&self, line: usize, needle: &str) -> Span {
        let text = self.line_text(line).unwrap_or("");
        let column = find_column_in_line(text, needle);
        Span { line, column }
    }

    fn syntax(&self, diagnostic: &SyntaxDiagnostic) -> String {
        let span = match &diagnostic.location {
            Location::Lexeme(lexeme) => self.span_of(diagnostic.line, lexeme),
            Location::End => {
                let text = self.line_text(diagnostic.line).unwrap_or("");
                Span {
                    line: diagnostic.line,
                    column: text.trim_end().len() + 1,
                }
            }
            Location::Lexer => self.span_of(diagnostic.line, ""),
        };
        let helps: Vec<String> = suggest_syntax(&diagnostic.message).into_iter().collect();
        self.block("Syntax error", &diagnostic.to_string(), Some(span), &helps)
    }

    fn block(&self, title: &str, message: &str, span: Option<Span>, helps: &[String]) -> String {
        let p = &self.palette;
        let mut out = String::new();
        out.push_str(&format!("{} {}\n", p.error_tag(), p.bold(&p.red(title))));

        match span {
            Some(span) => {
                out.push_str(&format!("{}\n", p.location(&self.path, span.line, span.column)));
                let text = self.line_text(span.line).unwrap_or("");
                out.push_str(&p.caret_line(text, span.column));
                out.push('\n');
            }
            None => out.push_str(&format!("  {} {}\n", p.blue("-->"), self.path)),
        }

        out.push_str("   |\n");
        out.push_str(&format!("   = {message}\n"));
        for help in helps {
            out.push_str(&format!("   = {} {}\n", p.help_tag(), help));
        }
        out
    }
}

fn find_column_in_line(line_text: &str, needle: &str) -> usize {
    if !needle.is_empty() {
        if let Some(pos) = line_text.find(needle) {
            return line_text[..pos].chars().count() + 1;
        }
    }
    let indent = line_text.len() - line_text.trim_start().len();
    indent + 1
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

fn suggest_syntax(message: &str) -> Option<String> {
    let hint = if message.starts_with("Expect ';'") {
        "try adding a semicolon: ';'"
    } else if message.starts_with("Expect ')'") {
        "try adding a closing parenthesis: ')'"
    } else if message.starts_with("Expect '}'") {
        "try adding a brace: '}'"
    } else if message.starts_with("Expect '{'") {
        "function bodies are wrapped in braces: '{ ... }'"
    } else if message.starts_with("Expect parameter type") {
        "parameters are written as 'type name', e.g. 'int count'; use '()' for none"
    } else if message.starts_with("Expect member name") {
        "a '.' must be followed by a name, e.g. 'sys.IO.print'"
    } else if message == "Unterminated string." {
        "try adding a closing quote: '\"'"
    } else {
        return None;
    };
    Some(hint.to_string())
}

/// Suggests declared names close to `name` by edit distance.
fn suggest_name(kind: &str, name: &str, source: &str) -> String {
    let threshold = if name.len() <= 3 { 1 } else { 2 };
    let target = last_segment(name);

    let mut scored: Vec<(usize, String)> = declared_names(source)
        .into_iter()
        .filter(|candidate| candidate != target && candidate.len() >= 2)
        .map(|candidate| (edit_distance(target, &candidate), candidate))
        .filter(|(distance, _)| *distance <= threshold)
        .collect();
    scored.sort();

    let top: Vec<String> = scored.into_iter().take(3).map(|(_, s)| s).collect();
    if top.is_empty() {
        format!("{kind} '{name}' not found. Consider declaring it")
    } else {
        format!("{kind} '{name}' not found. Did you mean: {}?", top.join(", "))
    }
}

/// Names introduced by `func`, `let`/`var` and parameter declarations.
fn declared_names(source: &str) -> BTreeSet<String> {
    let tokens = tokenize(source);
    tokens
        .windows(2)
        .filter(|pair| {
            pair[1].is(TokenType::Identifier)
                && (matches!(pair[0].token_type, TokenType::Func | TokenType::Let | TokenType::Var)
                    || pair[0].token_type.is_type_keyword())
        })
        .map(|pair| pair[1].lexeme.to_string())
        .collect()
}

fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    for i in 1..=a.len() {
        let mut current = vec![i; b.len() + 1];
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            current[j] = (prev[j] + 1).min(current[j - 1] + 1).min(prev[j - 1] + cost);
        }
        prev = current;
    }
    prev[b.len()]
}
