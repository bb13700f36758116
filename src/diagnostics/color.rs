use std::io::IsTerminal;

/// ANSI styling, or plain text when disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self::new(false)
    }

    /// Colors stderr unless `--no-color` was given, `NO_COLOR` is set, or
    /// stderr is not a terminal.
    pub fn for_stderr(no_color: bool) -> Self {
        let disabled = no_color
            || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty())
            || !std::io::stderr().is_terminal();
        Self::new(!disabled)
    }

    fn paint(&self, code: &str, s: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{s}\x1b[0m")
        } else {
            s.to_string()
        }
    }

    pub fn red(&self, s: &str) -> String { self.paint("31", s) }
    pub fn yellow(&self, s: &str) -> String { self.paint("33", s) }
    pub fn blue(&self, s: &str) -> String { self.paint("34", s) }
    pub fn bold(&self, s: &str) -> String { self.paint("1", s) }

    pub fn error_tag(&self) -> String { "❌".to_string() }
    pub fn help_tag(&self) -> String { format!("{} {}", "💡", self.bold(&self.yellow("help:"))) }

    pub fn location(&self, path: &str, line: usize, column: usize) -> String {
        format!("  {} {}:{}:{}", self.blue("-->"), path, line, column)
    }

    pub fn caret_line(&self, line_text: &str, column: usize) -> String {
        let mut buf = String::new();
        buf.push_str("   |\n");
        buf.push_str(&format!("   | {}\n", line_text));
        let mut caret = String::new();
        caret.push_str("   | ");
        for _ in 1..column { caret.push(' '); }
        caret.push_str(&self.red("^"));
        buf.push_str(&caret);
        buf
    }
}
