use crate::frontend::ast::{Decl, DeclKind, FuncDecl, Stmt, StmtKind, TypeExprKind};
use crate::frontend::diagnostic::{DiagnosticKind, Diagnostics};

/// Control-flow analysis: every path through a function with a return type
/// must end in a return, and statements after a terminating statement are
/// unreachable.
pub fn run(decls: &[Decl], diags: &mut Diagnostics) {
    for decl in decls {
        if let DeclKind::Func(func) = &decl.kind {
            analyze_func(func, diags);
        }
    }
}

fn analyze_func(func: &FuncDecl, diags: &mut Diagnostics) {
    let terminates = block_terminates(&func.body, diags);
    let returns_none = matches!(&func.ret.kind, TypeExprKind::Name(name) if name == "none");
    if !terminates && !returns_none {
        diags.push(
            DiagnosticKind::Semantic,
            "not all control paths return a value",
            Some(func.pos),
        );
    }
}

/// A block terminates iff some statement in it terminates. Everything
/// after the first terminating statement is unreachable.
fn block_terminates(block: &[Stmt], diags: &mut Diagnostics) -> bool {
    let mut terminated = false;
    for stmt in block {
        if terminated {
            diags.push(
                DiagnosticKind::Semantic,
                "unreachable code",
                Some(stmt.pos),
            );
            continue;
        }
        if stmt_terminates(stmt, diags) {
            terminated = true;
        }
    }
    terminated
}

fn stmt_terminates(stmt: &Stmt, diags: &mut Diagnostics) -> bool {
    match &stmt.kind {
        StmtKind::Return(_) => true,
        StmtKind::If {
            branches,
            else_body,
        } => {
            // A missing else branch is an empty block and never terminates.
            let mut terminates = true;
            for branch in branches {
                if !block_terminates(&branch.body, diags) {
                    terminates = false;
                }
            }
            if !block_terminates(else_body, diags) {
                terminates = false;
            }
            terminates
        }
        StmtKind::Let { .. } | StmtKind::Const { .. } | StmtKind::Expr(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;

    fn analyze(src: &str) -> Vec<String> {
        let lexed = Lexer::new(src).lex();
        assert!(lexed.succeeded());
        let mut parser = Parser::new(&lexed.tokens);
        let decls = parser.parse_module().expect("parse should succeed");
        let mut diags = Diagnostics::default();
        run(&decls, &mut diags);
        diags.items.into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn function_with_trailing_return_is_clean() {
        let messages = analyze("func f() : u32 { return 1; }");
        assert!(messages.is_empty());
    }

    #[test]
    fn missing_return_is_reported() {
        let messages = analyze("func f() : u32 { 1 + 1; }");
        assert_eq!(messages, vec!["not all control paths return a value"]);
    }

    #[test]
    fn none_returning_functions_may_fall_through() {
        let messages = analyze("func f() : none { 1 + 1; }");
        assert!(messages.is_empty());
    }

    #[test]
    fn if_without_else_does_not_terminate() {
        let messages = analyze("func f() : u32 { if true { return 1; } }");
        assert_eq!(messages, vec!["not all control paths return a value"]);
    }

    #[test]
    fn if_with_returning_branches_terminates() {
        let messages = analyze(
            "func f() : u32 { if true { return 1; } elif false { return 2; } else { return 3; } }",
        );
        assert!(messages.is_empty());
    }

    #[test]
    fn branch_that_falls_through_is_reported() {
        let messages = analyze(
            "func f() : u32 { if true { return 1; } else { 1 + 1; } }",
        );
        assert_eq!(messages, vec!["not all control paths return a value"]);
    }

    #[test]
    fn statements_after_return_are_unreachable() {
        let messages = analyze("func f() : u32 { return 1; 1 + 1; 2 + 2; }");
        assert_eq!(messages, vec!["unreachable code", "unreachable code"]);
    }

    #[test]
    fn unreachable_code_inside_branches_is_reported() {
        let messages =
            analyze("func f() : u32 { if true { return 1; 5; } else { return 2; } }");
        assert_eq!(messages, vec!["unreachable code"]);
    }
}
