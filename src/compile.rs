use std::path::Path;

use anyhow::{bail, Context, Result};

use crate::frontend::ast::Decl;
use crate::frontend::diagnostic::{format_diagnostic, Diagnostics};
use crate::frontend::lexer::Lexer;
use crate::frontend::parser::Parser;
use crate::frontend::source::SourceFile;
use crate::sema;

#[derive(Clone, Copy, Default)]
pub struct EmitOptions {
    pub tokens: bool,
    pub ast: bool,
}

/// Run the whole front end over one source: scan, parse, analyze.
/// Returns the declarations when the parse got through, plus every
/// diagnostic the pipeline produced.
pub fn check_source(source: &SourceFile) -> (Option<Vec<Decl>>, Diagnostics) {
    let lexed = Lexer::new(source.contents()).lex();
    let mut diags = lexed.diagnostics;

    let mut parser = Parser::new(&lexed.tokens);
    let decls = parser.parse_module();
    diags.extend(parser.diags);

    if let Some(decls) = &decls {
        diags.extend(sema::analyze(decls));
    }
    (decls, diags)
}

/// Compile one source, printing requested dumps to stdout and
/// diagnostics to stderr. Returns whether the source was clean.
pub fn run_source(source: &SourceFile, emit: EmitOptions) -> Result<bool> {
    if emit.tokens {
        let lexed = Lexer::new(source.contents()).lex();
        let json = serde_json::to_string_pretty(&lexed.tokens).context("serialize tokens")?;
        println!("{json}");
    }

    let (decls, diags) = check_source(source);

    if emit.ast {
        if let Some(decls) = &decls {
            let json = serde_json::to_string_pretty(decls).context("serialize ast")?;
            println!("{json}");
        }
    }

    if !diags.is_empty() {
        eprint!("{}", render_diags(&diags, source));
        return Ok(false);
    }
    Ok(true)
}

pub fn run_file(path: &Path, emit: EmitOptions) -> Result<bool> {
    let source = SourceFile::from_path(path);
    if !source.exists() {
        bail!("'{}' not found", path.display());
    }
    run_source(&source, emit)
}

pub fn render_diags(diags: &Diagnostics, source: &SourceFile) -> String {
    let mut out = String::new();
    for diag in &diags.items {
        out.push_str(&format_diagnostic(diag, source));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::diagnostic::DiagnosticKind;
    use crate::frontend::source::SourceFile;

    #[test]
    fn clean_program_produces_no_diagnostics() {
        let source = SourceFile::from_literal(
            r#"
            import std;
            namespace app;

            alias word = u64;

            func add(a: u64, b: u64) : u64 {
                return a + b;
            }

            func main(argc: u64) : u64 {
                let total: word = add(argc, 2);
                if total == 0 {
                    return 1;
                }
                return total;
            }
            "#,
        );
        let (decls, diags) = check_source(&source);
        let messages: Vec<_> = diags.items.iter().map(|d| d.message.as_str()).collect();
        assert!(messages.is_empty(), "unexpected diagnostics: {messages:?}");
        assert_eq!(decls.map(|d| d.len()), Some(5));
    }

    #[test]
    fn lexical_errors_do_not_stop_the_parse() {
        let source = SourceFile::from_literal("func f() : u64 { return 1 # ; }");
        let (_, diags) = check_source(&source);
        assert!(diags
            .items
            .iter()
            .any(|d| d.kind == DiagnosticKind::Lexical && d.message == "unexpected character"));
    }

    #[test]
    fn parse_failure_reports_one_syntactic_diagnostic() {
        let source = SourceFile::from_literal("func f( : u64 { return 1; }");
        let (decls, diags) = check_source(&source);
        assert!(decls.is_none());
        assert_eq!(diags.len(), 1);
        assert_eq!(diags.items[0].kind, DiagnosticKind::Syntactic);
    }

    #[test]
    fn semantic_diagnostics_are_collected() {
        let source = SourceFile::from_literal("func f() : u64 { let x: u32 = true; }");
        let (decls, diags) = check_source(&source);
        assert!(decls.is_some());
        assert!(diags
            .items
            .iter()
            .all(|d| d.kind == DiagnosticKind::Semantic));
        let messages: Vec<_> = diags.items.iter().map(|d| d.message.as_str()).collect();
        assert!(messages.contains(&"types cannot be assigned"));
        assert!(messages.contains(&"not all control paths return a value"));
    }

    #[test]
    fn rendered_diagnostics_quote_the_source_line() {
        let source = SourceFile::from_literal("func f() : u64 {\n    let x;\n    return 1;\n}");
        let (_, diags) = check_source(&source);
        let rendered = render_diags(&diags, &source);
        assert!(rendered.contains("error: cannot deduce variable type at 2:5"));
        assert!(rendered.contains("2 |     let x;"));
    }
}
