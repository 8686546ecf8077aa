use super::ast::Pos;
use super::source::SourceFile;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosticKind {
    Lexical,
    Syntactic,
    Semantic,
}

#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    pub pos: Option<Pos>,
    pub help: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>, pos: Option<Pos>) -> Self {
        Self {
            kind,
            message: message.into(),
            pos,
            help: None,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

#[derive(Default)]
pub struct Diagnostics {
    pub items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn push(&mut self, kind: DiagnosticKind, message: impl Into<String>, pos: Option<Pos>) {
        self.items.push(Diagnostic::new(kind, message, pos));
    }

    pub fn push_diag(&mut self, diag: Diagnostic) {
        self.items.push(diag);
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.items.extend(other.items);
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }
}

/// Render one diagnostic for the terminal:
///
/// ```text
/// error: <message> at <line>:<col>
/// <line> | <source-line>
/// ```
pub fn format_diagnostic(diag: &Diagnostic, source: &SourceFile) -> String {
    let mut out = match diag.pos {
        Some(pos) => {
            let line = source.line(pos.line);
            format!(
                "error: {} at {}:{}\n{} | {}\n",
                diag.message, pos.line, pos.column, pos.line, line
            )
        }
        None => format!("error: {}\n", diag.message),
    };
    if let Some(help) = &diag.help {
        out.push_str("help: ");
        out.push_str(help);
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::ast::Pos;

    #[test]
    fn renders_message_position_and_source_line() {
        let source = SourceFile::from_literal("let x = 1;\nlet y = ;\n");
        let diag = Diagnostic::new(
            DiagnosticKind::Syntactic,
            "expected expression",
            Some(Pos::new(2, 9)),
        );
        let text = format_diagnostic(&diag, &source);
        assert_eq!(text, "error: expected expression at 2:9\n2 | let y = ;\n");
    }

    #[test]
    fn renders_help_line_when_present() {
        let source = SourceFile::from_literal("let a: u33;");
        let diag = Diagnostic::new(
            DiagnosticKind::Semantic,
            "unknown type name `u33`",
            Some(Pos::new(1, 1)),
        )
        .help("did you mean `u32`?");
        let text = format_diagnostic(&diag, &source);
        assert!(text.ends_with("help: did you mean `u32`?\n"));
    }
}
