use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

/// 1-based source position carried by every token and AST node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Pos {
    pub line: usize,
    pub column: usize,
}

impl Pos {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Syntactic form of a type as written in source (`u32`, `*u32`,
/// `(u32, bool) : u8`). Equality and hashing ignore the position, so a
/// type expression can key the interner and compare against literals
/// built in tests.
#[derive(Clone, Debug, Serialize)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum TypeExprKind {
    Name(String),
    Pointer(Box<TypeExpr>),
    Func {
        args: Vec<TypeExpr>,
        ret: Box<TypeExpr>,
    },
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    pub fn name(name: impl Into<String>) -> Self {
        Self::new(TypeExprKind::Name(name.into()), Pos::default())
    }

    pub fn pointer(base: TypeExpr) -> Self {
        let pos = base.pos;
        Self::new(TypeExprKind::Pointer(Box::new(base)), pos)
    }

    pub fn func(args: Vec<TypeExpr>, ret: TypeExpr) -> Self {
        Self::new(
            TypeExprKind::Func {
                args,
                ret: Box::new(ret),
            },
            Pos::default(),
        )
    }
}

impl PartialEq for TypeExpr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for TypeExpr {}

impl Hash for TypeExpr {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    Plus,
    Minus,
    Deref,
    Address,
    BitNot,
    Not,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    Shr,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    BitAnd,
    BitXor,
    BitOr,
    LogicalAnd,
    LogicalOr,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    ShlAssign,
    ShrAssign,
    BitAndAssign,
    BitXorAssign,
    BitOrAssign,
}

impl BinaryOp {
    /// Operators whose result is a boolean when both operands agree.
    pub fn yields_bool(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt
                | BinaryOp::LtEq
                | BinaryOp::Gt
                | BinaryOp::GtEq
                | BinaryOp::Eq
                | BinaryOp::NotEq
                | BinaryOp::LogicalAnd
                | BinaryOp::LogicalOr
        )
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Shl => "<<",
            BinaryOp::Shr => ">>",
            BinaryOp::Lt => "<",
            BinaryOp::LtEq => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::GtEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
            BinaryOp::BitAnd => "&",
            BinaryOp::BitXor => "^",
            BinaryOp::BitOr => "|",
            BinaryOp::LogicalAnd => "&&",
            BinaryOp::LogicalOr => "||",
            BinaryOp::Assign => "=",
            BinaryOp::AddAssign => "+=",
            BinaryOp::SubAssign => "-=",
            BinaryOp::MulAssign => "*=",
            BinaryOp::DivAssign => "/=",
            BinaryOp::RemAssign => "%=",
            BinaryOp::ShlAssign => "<<=",
            BinaryOp::ShrAssign => ">>=",
            BinaryOp::BitAndAssign => "&=",
            BinaryOp::BitXorAssign => "^=",
            BinaryOp::BitOrAssign => "|=",
        };
        f.write_str(text)
    }
}

/// Expression node. Equality ignores the position.
#[derive(Clone, Debug, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum ExprKind {
    Integer(u64),
    Float(f64),
    Boolean(bool),
    Name(String),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        lhs: Box<Expr>,
        index: Box<Expr>,
    },
    Access {
        lhs: Box<Expr>,
        field: String,
    },
    Cast {
        lhs: Box<Expr>,
        ty: TypeExpr,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, pos: Pos) -> Self {
        Self { kind, pos }
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        let pos = lhs.pos;
        Self::new(
            ExprKind::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            },
            pos,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr, pos: Pos) -> Self {
        Self::new(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            pos,
        )
    }

    pub fn call(callee: Expr, args: Vec<Expr>) -> Self {
        let pos = callee.pos;
        Self::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            pos,
        )
    }

    pub fn index(lhs: Expr, index: Expr) -> Self {
        let pos = lhs.pos;
        Self::new(
            ExprKind::Index {
                lhs: Box::new(lhs),
                index: Box::new(index),
            },
            pos,
        )
    }

    pub fn access(lhs: Expr, field: impl Into<String>) -> Self {
        let pos = lhs.pos;
        Self::new(
            ExprKind::Access {
                lhs: Box::new(lhs),
                field: field.into(),
            },
            pos,
        )
    }

    pub fn cast(lhs: Expr, ty: TypeExpr) -> Self {
        let pos = lhs.pos;
        Self::new(
            ExprKind::Cast {
                lhs: Box::new(lhs),
                ty,
            },
            pos,
        )
    }
}

impl PartialEq for Expr {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Statement node. Equality ignores the position.
#[derive(Clone, Debug, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum StmtKind {
    Let {
        name: String,
        ty: Option<TypeExpr>,
        init: Option<Expr>,
    },
    Const {
        name: String,
        ty: Option<TypeExpr>,
        init: Option<Expr>,
    },
    Return(Option<Expr>),
    If {
        branches: Vec<IfBranch>,
        else_body: Vec<Stmt>,
    },
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct IfBranch {
    pub cond: Expr,
    pub body: Vec<Stmt>,
}

impl Stmt {
    pub fn new(kind: StmtKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

impl PartialEq for Stmt {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

/// Top-level declaration. Equality ignores the position.
#[derive(Clone, Debug, Serialize)]
pub struct Decl {
    pub kind: DeclKind,
    pub pos: Pos,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub enum DeclKind {
    Import(String),
    Namespace(String),
    Alias { name: String, ty: TypeExpr },
    Func(FuncDecl),
    Struct(StructDecl),
}

#[derive(Clone, Debug, Serialize)]
pub struct FuncDecl {
    pub name: String,
    pub args: Vec<FuncArg>,
    pub ret: TypeExpr,
    pub body: Vec<Stmt>,
    pub pos: Pos,
}

impl PartialEq for FuncDecl {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.args == other.args
            && self.ret == other.ret
            && self.body == other.body
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FuncArg {
    pub name: String,
    pub ty: TypeExpr,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StructDecl {
    pub name: String,
    pub fields: Vec<StructField>,
    pub funcs: Vec<FuncDecl>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StructField {
    pub name: String,
    pub ty: TypeExpr,
}

impl Decl {
    pub fn new(kind: DeclKind, pos: Pos) -> Self {
        Self { kind, pos }
    }
}

impl PartialEq for Decl {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}
