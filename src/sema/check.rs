use std::rc::Rc;

use crate::frontend::ast::{Decl, DeclKind, Expr, ExprKind, FuncDecl, Pos, Stmt, StmtKind, TypeExpr, UnaryOp};
use crate::frontend::diagnostic::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::frontend::suggest;

use super::scope::ScopeStack;
use super::types::{same_type, Type, TypeInterner};

/// Type checking: scoped name resolution, expression typing, and the
/// statement-level rules. Typing never fails hard; any error records a
/// diagnostic and substitutes the `none` sentinel so cascades stay
/// bounded.
pub fn run(decls: &[Decl], diags: &mut Diagnostics) {
    Checker::new(diags).check_module(decls);
}

struct Checker<'d> {
    interner: TypeInterner,
    scopes: ScopeStack,
    diags: &'d mut Diagnostics,
}

impl<'d> Checker<'d> {
    fn new(diags: &'d mut Diagnostics) -> Self {
        Self {
            interner: TypeInterner::new(),
            scopes: ScopeStack::new(),
            diags,
        }
    }

    fn check_module(&mut self, decls: &[Decl]) {
        // Register aliases and function signatures first so bodies can
        // refer to them in any order.
        for decl in decls {
            match &decl.kind {
                DeclKind::Alias { name, ty } => {
                    let target = self.type_of(ty, ty.pos);
                    self.interner.install(TypeExpr::name(name.clone()), target);
                }
                DeclKind::Func(func) => {
                    let spec = TypeExpr::func(
                        func.args.iter().map(|arg| arg.ty.clone()).collect(),
                        func.ret.clone(),
                    );
                    let func_ty = self.type_of(&spec, func.pos);
                    if !self.scopes.add(&func.name, func_ty) {
                        self.error(format!("name '{}' already taken", func.name), func.pos);
                    }
                }
                DeclKind::Import(_) | DeclKind::Namespace(_) | DeclKind::Struct(_) => {}
            }
        }

        for decl in decls {
            if let DeclKind::Func(func) = &decl.kind {
                self.check_function(func);
            }
        }
    }

    fn check_function(&mut self, func: &FuncDecl) {
        self.scopes.enter();
        for arg in &func.args {
            let ty = self.type_of(&arg.ty, arg.ty.pos);
            if !self.scopes.add(&arg.name, ty) {
                self.error(
                    format!("variable name '{}' already taken", arg.name),
                    func.pos,
                );
            }
        }
        for stmt in &func.body {
            self.check_stmt(stmt);
        }
        self.scopes.exit();
    }

    fn check_stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Let { name, ty, init } | StmtKind::Const { name, ty, init } => {
                self.check_binding(name, ty.as_ref(), init.as_ref(), stmt.pos);
            }
            StmtKind::Return(expr) => {
                if let Some(expr) = expr {
                    self.check_expr(expr);
                }
            }
            StmtKind::If {
                branches,
                else_body,
            } => {
                for branch in branches {
                    self.check_expr(&branch.cond);
                    self.scopes.enter();
                    for stmt in &branch.body {
                        self.check_stmt(stmt);
                    }
                    self.scopes.exit();
                }
                self.scopes.enter();
                for stmt in else_body {
                    self.check_stmt(stmt);
                }
                self.scopes.exit();
            }
            StmtKind::Expr(expr) => {
                self.check_expr(expr);
            }
        }
    }

    fn check_binding(
        &mut self,
        name: &str,
        ty: Option<&TypeExpr>,
        init: Option<&Expr>,
        pos: Pos,
    ) {
        match (ty, init) {
            (None, None) => {
                self.error("cannot deduce variable type", pos);
            }
            (Some(spec), Some(init)) => {
                let declared = self.type_of(spec, spec.pos);
                let init_ty = self.check_expr(init);
                if !same_type(&init_ty, &declared) {
                    self.error("types cannot be assigned", pos);
                }
                self.bind(name, declared, pos);
            }
            (None, Some(init)) => {
                let init_ty = self.check_expr(init);
                self.bind(name, init_ty, pos);
            }
            (Some(spec), None) => {
                let declared = self.type_of(spec, spec.pos);
                self.bind(name, declared, pos);
            }
        }
    }

    fn bind(&mut self, name: &str, ty: Rc<Type>, pos: Pos) {
        if !self.scopes.add(name, ty) {
            self.error(format!("variable name '{name}' already taken"), pos);
        }
    }

    fn check_expr(&mut self, expr: &Expr) -> Rc<Type> {
        match &expr.kind {
            ExprKind::Integer(_) => self.interner.primitive("u64"),
            ExprKind::Float(_) => self.interner.primitive("f64"),
            ExprKind::Boolean(_) => self.interner.primitive("bool"),
            ExprKind::Name(name) => match self.scopes.lookup(name) {
                Some(ty) => ty,
                None => {
                    let mut diag = Diagnostic::new(
                        DiagnosticKind::Semantic,
                        format!("could not find variable with name {name}"),
                        Some(expr.pos),
                    );
                    if let Some(help) = suggest::did_you_mean(name, self.scopes.visible_names()) {
                        diag = diag.help(help);
                    }
                    self.diags.push_diag(diag);
                    self.interner.none_type()
                }
            },
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs_ty = self.check_expr(lhs);
                let rhs_ty = self.check_expr(rhs);
                if same_type(&lhs_ty, &rhs_ty) {
                    if op.yields_bool() {
                        self.interner.primitive("bool")
                    } else {
                        lhs_ty
                    }
                } else {
                    self.error(
                        format!("operator {op} not implemented for types"),
                        expr.pos,
                    );
                    self.interner.none_type()
                }
            }
            ExprKind::Unary { op, operand } => {
                let ty = self.check_expr(operand);
                match op {
                    UnaryOp::Not => {
                        if same_type(&ty, &self.interner.primitive("bool")) {
                            ty
                        } else {
                            self.error("operator ! requires a boolean operand", expr.pos);
                            self.interner.none_type()
                        }
                    }
                    UnaryOp::Deref => match &*ty {
                        Type::Pointer(base) => Rc::clone(base),
                        _ => {
                            self.error("cannot dereference a non-pointer value", expr.pos);
                            self.interner.none_type()
                        }
                    },
                    _ => ty,
                }
            }
            ExprKind::Call { callee, args } => {
                let callee_ty = self.check_expr(callee);
                match &*callee_ty {
                    Type::Func { ret, args: params } => {
                        if params.len() != args.len() {
                            self.error(
                                format!(
                                    "incorrect number of parameters passed to function, expected {}, got {}",
                                    params.len(),
                                    args.len()
                                ),
                                expr.pos,
                            );
                            return self.interner.none_type();
                        }
                        for (index, arg) in args.iter().enumerate() {
                            let arg_ty = self.check_expr(arg);
                            if !same_type(&arg_ty, &params[index]) {
                                self.error(
                                    format!("parameter type mismatch at index {index}"),
                                    arg.pos,
                                );
                            }
                        }
                        Rc::clone(ret)
                    }
                    _ => {
                        self.error("object is not callable", expr.pos);
                        self.interner.none_type()
                    }
                }
            }
            ExprKind::Index { lhs, index } => {
                let lhs_ty = self.check_expr(lhs);
                self.check_expr(index);
                match &*lhs_ty {
                    Type::Pointer(base) => Rc::clone(base),
                    _ => {
                        self.error("object is not indexable", expr.pos);
                        self.interner.none_type()
                    }
                }
            }
            ExprKind::Access { .. } => {
                self.error("member access is not supported yet", expr.pos);
                self.interner.none_type()
            }
            ExprKind::Cast { lhs, ty } => {
                self.check_expr(lhs);
                self.type_of(ty, ty.pos)
            }
        }
    }

    /// Resolve a type expression through the interner, reporting unknown
    /// names and falling back to the sentinel.
    fn type_of(&mut self, spec: &TypeExpr, pos: Pos) -> Rc<Type> {
        match self.interner.get(spec) {
            Ok(ty) => ty,
            Err(unknown) => {
                let mut diag = Diagnostic::new(
                    DiagnosticKind::Semantic,
                    format!("unknown type name `{unknown}`"),
                    Some(pos),
                );
                if let Some(help) = suggest::did_you_mean(&unknown, self.interner.known_names()) {
                    diag = diag.help(help);
                }
                self.diags.push_diag(diag);
                self.interner.none_type()
            }
        }
    }

    fn error(&mut self, message: impl Into<String>, pos: Pos) {
        self.diags
            .push(DiagnosticKind::Semantic, message, Some(pos));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frontend::lexer::Lexer;
    use crate::frontend::parser::Parser;

    fn check(src: &str) -> Vec<Diagnostic> {
        let lexed = Lexer::new(src).lex();
        assert!(lexed.succeeded());
        let mut parser = Parser::new(&lexed.tokens);
        let decls = parser.parse_module().expect("parse should succeed");
        let mut diags = Diagnostics::default();
        run(&decls, &mut diags);
        diags.items
    }

    fn messages(src: &str) -> Vec<String> {
        check(src).into_iter().map(|d| d.message).collect()
    }

    #[test]
    fn typed_and_initialized_let_must_agree() {
        let msgs = messages("func f() : none { let x: u32 = true; }");
        assert_eq!(msgs, vec!["types cannot be assigned"]);
    }

    #[test]
    fn integer_literals_are_u64() {
        assert!(messages("func f() : none { let x: u64 = 1; }").is_empty());
        assert_eq!(
            messages("func f() : none { let x: u32 = 1; }"),
            vec!["types cannot be assigned"]
        );
    }

    #[test]
    fn bare_let_cannot_deduce_a_type() {
        let msgs = messages("func f() : none { let x; }");
        assert_eq!(msgs, vec!["cannot deduce variable type"]);
    }

    #[test]
    fn unknown_names_are_reported() {
        let msgs = messages("func f() : none { missing + 1; }");
        assert_eq!(msgs[0], "could not find variable with name missing");
    }

    #[test]
    fn unknown_names_get_suggestions() {
        let diags = check("func f(counter: u64) : none { countr + 1; }");
        assert_eq!(diags[0].message, "could not find variable with name countr");
        assert_eq!(diags[0].help.as_deref(), Some("did you mean `counter`?"));
    }

    #[test]
    fn redeclaring_in_the_same_scope_is_rejected() {
        let msgs = messages("func f() : none { let a = 1; let a = 2; }");
        assert_eq!(msgs, vec!["variable name 'a' already taken"]);
    }

    #[test]
    fn shadowing_in_a_nested_scope_is_allowed() {
        let msgs = messages(
            "func f() : none { let a = 1; if true { let a = 2; a + a; } }",
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn argument_names_join_the_function_scope() {
        let msgs = messages("func f(a: u64) : none { let a = 1; }");
        assert_eq!(msgs, vec!["variable name 'a' already taken"]);
    }

    #[test]
    fn unknown_type_names_are_reported_with_help() {
        let diags = check("func f() : none { let x: u33; }");
        assert_eq!(diags[0].message, "unknown type name `u33`");
        assert_eq!(diags[0].help.as_deref(), Some("did you mean `u32`?"));
    }

    #[test]
    fn binary_operands_must_agree() {
        let msgs = messages("func f() : none { 1 + true; }");
        assert_eq!(msgs, vec!["operator + not implemented for types"]);
    }

    #[test]
    fn comparisons_yield_bool() {
        assert!(messages("func f() : none { let b: bool = 1 == 2; }").is_empty());
        assert_eq!(
            messages("func f() : none { let x: u64 = 1 == 2; }"),
            vec!["types cannot be assigned"]
        );
    }

    #[test]
    fn calls_resolve_registered_functions() {
        let msgs = messages(
            "func double(x: u64) : u64 { return x + x; } \
             func main() : none { double(2); }",
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn call_arity_is_checked() {
        let msgs = messages(
            "func double(x: u64) : u64 { return x; } \
             func main() : none { double(1, 2); }",
        );
        assert_eq!(
            msgs,
            vec!["incorrect number of parameters passed to function, expected 1, got 2"]
        );
    }

    #[test]
    fn call_argument_types_are_checked() {
        let msgs = messages(
            "func double(x: u64) : u64 { return x; } \
             func main() : none { double(true); }",
        );
        assert_eq!(msgs, vec!["parameter type mismatch at index 0"]);
    }

    #[test]
    fn calling_a_non_function_is_rejected() {
        let msgs = messages("func f() : none { let x = 1; x(2); }");
        assert_eq!(msgs, vec!["object is not callable"]);
    }

    #[test]
    fn casts_take_the_target_type() {
        assert!(messages("func f() : none { let x: u8 = 1 as u8; }").is_empty());
    }

    #[test]
    fn indexing_unwraps_pointers() {
        assert!(messages("func f(p: *u64) : none { let x: u64 = p[0]; }").is_empty());
        assert_eq!(
            messages("func f() : none { let x = 1; x[0]; }"),
            vec!["object is not indexable"]
        );
    }

    #[test]
    fn dereferencing_unwraps_pointers() {
        assert!(messages("func f(p: *u64) : none { let x: u64 = *p; }").is_empty());
        assert_eq!(
            messages("func f() : none { let x = 1; *x; }"),
            vec!["cannot dereference a non-pointer value"]
        );
    }

    #[test]
    fn member_access_is_not_supported_yet() {
        let msgs = messages("func f(a: u64) : none { a.field; }");
        assert_eq!(msgs, vec!["member access is not supported yet"]);
    }

    #[test]
    fn aliases_resolve_to_their_target() {
        let msgs = messages(
            "alias word = u64; func f() : none { let x: word = 1; }",
        );
        assert!(msgs.is_empty());
    }

    #[test]
    fn equal_annotations_share_one_interned_type() {
        let msgs = messages(
            "func f(p: **u8, q: **u8) : none { let same: bool = p == q; }",
        );
        assert!(msgs.is_empty());
    }
}
