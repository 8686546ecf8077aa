use super::ast::{
    BinaryOp, Decl, DeclKind, Expr, ExprKind, FuncArg, FuncDecl, IfBranch, Pos, Stmt, StmtKind,
    StructDecl, StructField, TypeExpr, TypeExprKind, UnaryOp,
};
use super::diagnostic::{DiagnosticKind, Diagnostics};
use super::token::{Token, TokenKind, TokenStream};

fn unary_op_for(kind: TokenKind, postfix: bool) -> UnaryOp {
    match kind {
        TokenKind::Plus => UnaryOp::Plus,
        TokenKind::Minus => UnaryOp::Minus,
        TokenKind::Star => UnaryOp::Deref,
        TokenKind::Amp => UnaryOp::Address,
        TokenKind::Tilde => UnaryOp::BitNot,
        TokenKind::Bang => UnaryOp::Not,
        TokenKind::PlusPlus => {
            if postfix {
                UnaryOp::PostInc
            } else {
                UnaryOp::PreInc
            }
        }
        TokenKind::MinusMinus => {
            if postfix {
                UnaryOp::PostDec
            } else {
                UnaryOp::PreDec
            }
        }
        _ => unreachable!("invalid token type for unary operator"),
    }
}

fn binary_op_for(kind: TokenKind) -> BinaryOp {
    match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Sub,
        TokenKind::Star => BinaryOp::Mul,
        TokenKind::Slash => BinaryOp::Div,
        TokenKind::Percent => BinaryOp::Rem,
        TokenKind::Shl => BinaryOp::Shl,
        TokenKind::Shr => BinaryOp::Shr,
        TokenKind::Lt => BinaryOp::Lt,
        TokenKind::LtEq => BinaryOp::LtEq,
        TokenKind::Gt => BinaryOp::Gt,
        TokenKind::GtEq => BinaryOp::GtEq,
        TokenKind::EqEq => BinaryOp::Eq,
        TokenKind::BangEq => BinaryOp::NotEq,
        TokenKind::Amp => BinaryOp::BitAnd,
        TokenKind::Caret => BinaryOp::BitXor,
        TokenKind::Pipe => BinaryOp::BitOr,
        TokenKind::AmpAmp => BinaryOp::LogicalAnd,
        TokenKind::PipePipe => BinaryOp::LogicalOr,
        TokenKind::Eq => BinaryOp::Assign,
        TokenKind::PlusEq => BinaryOp::AddAssign,
        TokenKind::MinusEq => BinaryOp::SubAssign,
        TokenKind::StarEq => BinaryOp::MulAssign,
        TokenKind::SlashEq => BinaryOp::DivAssign,
        TokenKind::PercentEq => BinaryOp::RemAssign,
        TokenKind::ShlEq => BinaryOp::ShlAssign,
        TokenKind::ShrEq => BinaryOp::ShrAssign,
        TokenKind::AmpEq => BinaryOp::BitAndAssign,
        TokenKind::CaretEq => BinaryOp::BitXorAssign,
        TokenKind::PipeEq => BinaryOp::BitOrAssign,
        _ => unreachable!("invalid token type for binary operator"),
    }
}

const ASSIGNMENT_OPS: &[TokenKind] = &[
    TokenKind::Eq,
    TokenKind::PlusEq,
    TokenKind::MinusEq,
    TokenKind::StarEq,
    TokenKind::SlashEq,
    TokenKind::PercentEq,
    TokenKind::ShlEq,
    TokenKind::ShrEq,
    TokenKind::AmpEq,
    TokenKind::CaretEq,
    TokenKind::PipeEq,
];

const PREFIX_OPS: &[TokenKind] = &[
    TokenKind::Plus,
    TokenKind::Minus,
    TokenKind::PlusPlus,
    TokenKind::MinusMinus,
    TokenKind::Star,
    TokenKind::Amp,
    TokenKind::Tilde,
    TokenKind::Bang,
];

const POSTFIX_STARTS: &[TokenKind] = &[
    TokenKind::LParen,
    TokenKind::LSquare,
    TokenKind::Dot,
    TokenKind::PlusPlus,
    TokenKind::MinusMinus,
];

/// Recursive-descent parser with one precedence level per method. The
/// parser does not recover: the first expectation failure records a single
/// syntactic diagnostic and unwinds through `Option`.
pub struct Parser<'a> {
    stream: TokenStream<'a>,
    pub diags: Diagnostics,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            diags: Diagnostics::default(),
        }
    }

    /// Zero or more declarations, then `eof`.
    pub fn parse_module(&mut self) -> Option<Vec<Decl>> {
        let mut decls = Vec::new();
        while !self.stream.next_is(TokenKind::Eof) {
            decls.push(self.parse_decl()?);
        }
        Some(decls)
    }

    pub fn parse_decl(&mut self) -> Option<Decl> {
        let token = self.expect_one_of(
            &[
                TokenKind::Import,
                TokenKind::Namespace,
                TokenKind::Alias,
                TokenKind::Func,
                TokenKind::Struct,
            ],
            "expected declaration",
        )?;

        match token.kind {
            TokenKind::Import => {
                let name = self.expect(TokenKind::Identifier, "expected module name")?;
                self.expect(TokenKind::Semi, "expected ';'")?;
                Some(Decl::new(
                    DeclKind::Import(name.str_value().to_string()),
                    token.pos,
                ))
            }
            TokenKind::Namespace => {
                let name = self.expect(TokenKind::Identifier, "expected namespace name")?;
                self.expect(TokenKind::Semi, "expected ';'")?;
                Some(Decl::new(
                    DeclKind::Namespace(name.str_value().to_string()),
                    token.pos,
                ))
            }
            TokenKind::Alias => {
                let name = self.expect(TokenKind::Identifier, "expected alias name")?;
                self.expect(TokenKind::Eq, "expected '='")?;
                let ty = self.parse_type()?;
                self.expect(TokenKind::Semi, "expected ';'")?;
                Some(Decl::new(
                    DeclKind::Alias {
                        name: name.str_value().to_string(),
                        ty,
                    },
                    token.pos,
                ))
            }
            TokenKind::Func => {
                let func = self.parse_func(token.pos)?;
                Some(Decl::new(DeclKind::Func(func), token.pos))
            }
            TokenKind::Struct => self.parse_struct(token.pos),
            _ => unreachable!("declaration dispatch on unmatched token"),
        }
    }

    fn parse_func(&mut self, pos: Pos) -> Option<FuncDecl> {
        let name = self.expect(TokenKind::Identifier, "expected function name")?;
        self.expect(TokenKind::LParen, "expected '('")?;

        let mut args = Vec::new();
        if !self.stream.next_is(TokenKind::RParen) {
            args.push(self.parse_func_arg()?);
            while self.stream.next_is(TokenKind::Comma) {
                self.stream.next();
                args.push(self.parse_func_arg()?);
            }
        }
        self.expect(TokenKind::RParen, "expected ')'")?;
        self.expect(TokenKind::Colon, "expected ':'")?;
        let ret = self.parse_type()?;
        let body = self.parse_block()?;

        Some(FuncDecl {
            name: name.str_value().to_string(),
            args,
            ret,
            body,
            pos,
        })
    }

    fn parse_func_arg(&mut self) -> Option<FuncArg> {
        let name = self.expect(TokenKind::Identifier, "expected argument name")?;
        self.expect(TokenKind::Colon, "expected ':'")?;
        let ty = self.parse_type()?;
        Some(FuncArg {
            name: name.str_value().to_string(),
            ty,
        })
    }

    /// Struct bodies mix `name : type ;` fields and member functions until
    /// the closing brace.
    fn parse_struct(&mut self, pos: Pos) -> Option<Decl> {
        let name = self.expect(TokenKind::Identifier, "expected struct name")?;
        self.expect(TokenKind::LCurly, "expected '{'")?;

        let mut fields = Vec::new();
        let mut funcs = Vec::new();
        while !self.stream.next_is(TokenKind::RCurly) {
            if self.stream.next_is(TokenKind::Func) {
                let func_token = self.stream.next();
                funcs.push(self.parse_func(func_token.pos)?);
            } else {
                let field = self.expect(TokenKind::Identifier, "expected a field name")?;
                self.expect(TokenKind::Colon, "expected ':'")?;
                let ty = self.parse_type()?;
                self.expect(TokenKind::Semi, "expected ';'")?;
                fields.push(StructField {
                    name: field.str_value().to_string(),
                    ty,
                });
            }
        }
        self.expect(TokenKind::RCurly, "expected '}'")?;

        Some(Decl::new(
            DeclKind::Struct(StructDecl {
                name: name.str_value().to_string(),
                fields,
                funcs,
            }),
            pos,
        ))
    }

    pub fn parse_stmt(&mut self) -> Option<Stmt> {
        if self.stream.next_is_one_of(&[
            TokenKind::Let,
            TokenKind::Const,
            TokenKind::Return,
            TokenKind::If,
        ]) {
            let token = self.stream.next();
            return match token.kind {
                TokenKind::Let | TokenKind::Const => self.parse_binding(token),
                TokenKind::Return => self.parse_return(token.pos),
                TokenKind::If => self.parse_if(token.pos),
                _ => unreachable!("statement dispatch on unmatched token"),
            };
        }

        let expr = self.parse_expr()?;
        let pos = expr.pos;
        self.expect(TokenKind::Semi, "expected ';'")?;
        Some(Stmt::new(StmtKind::Expr(expr), pos))
    }

    /// `let`/`const` with an optional `: type` and an optional `= init`.
    fn parse_binding(&mut self, keyword: Token) -> Option<Stmt> {
        let name = self.expect(TokenKind::Identifier, "expected variable name")?;

        let mut ty = None;
        if self.stream.next_is(TokenKind::Colon) {
            self.stream.next();
            ty = Some(self.parse_type()?);
        }

        let mut init = None;
        if self.stream.next_is(TokenKind::Eq) {
            self.stream.next();
            init = Some(self.parse_expr()?);
        }

        self.expect(TokenKind::Semi, "expected ';'")?;

        let name = name.str_value().to_string();
        let kind = if keyword.kind == TokenKind::Const {
            StmtKind::Const { name, ty, init }
        } else {
            StmtKind::Let { name, ty, init }
        };
        Some(Stmt::new(kind, keyword.pos))
    }

    fn parse_return(&mut self, pos: Pos) -> Option<Stmt> {
        let mut expr = None;
        if !self.stream.next_is(TokenKind::Semi) {
            expr = Some(self.parse_expr()?);
        }
        self.expect(TokenKind::Semi, "expected ';'")?;
        Some(Stmt::new(StmtKind::Return(expr), pos))
    }

    fn parse_if(&mut self, pos: Pos) -> Option<Stmt> {
        let mut branches = Vec::new();

        let cond = self.parse_expr()?;
        let body = self.parse_block()?;
        branches.push(IfBranch { cond, body });

        while self.stream.next_is(TokenKind::Elif) {
            self.stream.next();
            let cond = self.parse_expr()?;
            let body = self.parse_block()?;
            branches.push(IfBranch { cond, body });
        }

        let mut else_body = Vec::new();
        if self.stream.next_is(TokenKind::Else) {
            self.stream.next();
            else_body = self.parse_block()?;
        }

        Some(Stmt::new(
            StmtKind::If {
                branches,
                else_body,
            },
            pos,
        ))
    }

    fn parse_block(&mut self) -> Option<Vec<Stmt>> {
        self.expect(TokenKind::LCurly, "expected '{'")?;
        let mut block = Vec::new();
        while !self.stream.next_is(TokenKind::RCurly) {
            block.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RCurly, "expected '}'")?;
        Some(block)
    }

    /// Three alternatives on the leading token: a name, pointer-to, or a
    /// function type `( args ) : ret`.
    pub fn parse_type(&mut self) -> Option<TypeExpr> {
        let token = self.expect_one_of(
            &[TokenKind::Star, TokenKind::Identifier, TokenKind::LParen],
            "expected a type",
        )?;

        match token.kind {
            TokenKind::Identifier => Some(TypeExpr::new(
                TypeExprKind::Name(token.str_value().to_string()),
                token.pos,
            )),
            TokenKind::Star => {
                let base = self.parse_type()?;
                Some(TypeExpr::new(
                    TypeExprKind::Pointer(Box::new(base)),
                    token.pos,
                ))
            }
            TokenKind::LParen => {
                let mut args = Vec::new();
                if !self.stream.next_is(TokenKind::RParen) {
                    args.push(self.parse_type()?);
                    while self.stream.next_is(TokenKind::Comma) {
                        self.stream.next();
                        args.push(self.parse_type()?);
                    }
                }
                self.expect(TokenKind::RParen, "expected ')'")?;
                self.expect(TokenKind::Colon, "expected ':'")?;
                let ret = self.parse_type()?;
                Some(TypeExpr::new(
                    TypeExprKind::Func {
                        args,
                        ret: Box::new(ret),
                    },
                    token.pos,
                ))
            }
            _ => unreachable!("type dispatch on unmatched token"),
        }
    }

    pub fn parse_expr(&mut self) -> Option<Expr> {
        self.parse_assignment()
    }

    // lhs = rhs, lhs += rhs, ... (right-associative)
    fn parse_assignment(&mut self) -> Option<Expr> {
        let expr = self.parse_logical_or()?;
        if self.stream.next_is_one_of(ASSIGNMENT_OPS) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_assignment()?;
            return Some(Expr::binary(op, expr, rhs));
        }
        Some(expr)
    }

    // lhs || rhs
    fn parse_logical_or(&mut self) -> Option<Expr> {
        let mut expr = self.parse_logical_and()?;
        while self.stream.next_is(TokenKind::PipePipe) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_logical_and()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs && rhs
    fn parse_logical_and(&mut self) -> Option<Expr> {
        let mut expr = self.parse_bit_or()?;
        while self.stream.next_is(TokenKind::AmpAmp) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_bit_or()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs | rhs
    fn parse_bit_or(&mut self) -> Option<Expr> {
        let mut expr = self.parse_bit_xor()?;
        while self.stream.next_is(TokenKind::Pipe) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_bit_xor()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs ^ rhs
    fn parse_bit_xor(&mut self) -> Option<Expr> {
        let mut expr = self.parse_bit_and()?;
        while self.stream.next_is(TokenKind::Caret) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_bit_and()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs & rhs
    fn parse_bit_and(&mut self) -> Option<Expr> {
        let mut expr = self.parse_equality()?;
        while self.stream.next_is(TokenKind::Amp) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_equality()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs == rhs, lhs != rhs
    fn parse_equality(&mut self) -> Option<Expr> {
        let mut expr = self.parse_comparison()?;
        while self
            .stream
            .next_is_one_of(&[TokenKind::EqEq, TokenKind::BangEq])
        {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_comparison()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs < rhs, lhs <= rhs, lhs > rhs, lhs >= rhs
    fn parse_comparison(&mut self) -> Option<Expr> {
        let mut expr = self.parse_shift()?;
        while self.stream.next_is_one_of(&[
            TokenKind::Lt,
            TokenKind::LtEq,
            TokenKind::Gt,
            TokenKind::GtEq,
        ]) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_shift()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs << rhs, lhs >> rhs
    fn parse_shift(&mut self) -> Option<Expr> {
        let mut expr = self.parse_additive()?;
        while self
            .stream
            .next_is_one_of(&[TokenKind::Shl, TokenKind::Shr])
        {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_additive()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs + rhs, lhs - rhs
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut expr = self.parse_multiplicative()?;
        while self
            .stream
            .next_is_one_of(&[TokenKind::Plus, TokenKind::Minus])
        {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_multiplicative()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // lhs * rhs, lhs / rhs, lhs % rhs
    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut expr = self.parse_cast()?;
        while self.stream.next_is_one_of(&[
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::Percent,
        ]) {
            let op = binary_op_for(self.stream.next().kind);
            let rhs = self.parse_cast()?;
            expr = Expr::binary(op, expr, rhs);
        }
        Some(expr)
    }

    // expr as type (left-associative)
    fn parse_cast(&mut self) -> Option<Expr> {
        let mut expr = self.parse_prefix()?;
        while self.stream.next_is(TokenKind::As) {
            self.stream.next();
            let ty = self.parse_type()?;
            expr = Expr::cast(expr, ty);
        }
        Some(expr)
    }

    // +expr -expr ++expr --expr *expr &expr ~expr !expr
    fn parse_prefix(&mut self) -> Option<Expr> {
        if self.stream.next_is_one_of(PREFIX_OPS) {
            let token = self.stream.next();
            let op = unary_op_for(token.kind, false);
            let operand = self.parse_prefix()?;
            return Some(Expr::unary(op, operand, token.pos));
        }
        self.parse_postfix()
    }

    // expr(args) expr[index] expr.field expr++ expr--
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        while self.stream.next_is_one_of(POSTFIX_STARTS) {
            match self.stream.peek_kind() {
                TokenKind::LParen => {
                    self.stream.next();
                    let mut args = Vec::new();
                    if !self.stream.next_is(TokenKind::RParen) {
                        args.push(self.parse_expr()?);
                        while self.stream.next_is(TokenKind::Comma) {
                            self.stream.next();
                            args.push(self.parse_expr()?);
                        }
                    }
                    self.expect(TokenKind::RParen, "expected ')'")?;
                    expr = Expr::call(expr, args);
                }
                TokenKind::LSquare => {
                    self.stream.next();
                    let index = self.parse_expr()?;
                    self.expect(TokenKind::RSquare, "expected ']'")?;
                    expr = Expr::index(expr, index);
                }
                TokenKind::Dot => {
                    self.stream.next();
                    let field = self.expect(TokenKind::Identifier, "expected a field name")?;
                    expr = Expr::access(expr, field.str_value());
                }
                _ => {
                    let token = self.stream.next();
                    let pos = expr.pos;
                    expr = Expr::unary(unary_op_for(token.kind, true), expr, pos);
                }
            }
        }

        Some(expr)
    }

    // literal | identifier | ( expr )
    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.expect_one_of(
            &[
                TokenKind::Boolean,
                TokenKind::Integer,
                TokenKind::Float,
                TokenKind::Identifier,
                TokenKind::LParen,
            ],
            "expected expression",
        )?;

        match token.kind {
            TokenKind::Boolean => Some(Expr::new(
                ExprKind::Boolean(token.bool_value()),
                token.pos,
            )),
            TokenKind::Integer => Some(Expr::new(ExprKind::Integer(token.int_value()), token.pos)),
            TokenKind::Float => Some(Expr::new(ExprKind::Float(token.float_value()), token.pos)),
            TokenKind::Identifier => Some(Expr::new(
                ExprKind::Name(token.str_value().to_string()),
                token.pos,
            )),
            TokenKind::LParen => {
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen, "expected ')'")?;
                Some(expr)
            }
            _ => unreachable!("primary dispatch on unmatched token"),
        }
    }

    fn expect(&mut self, kind: TokenKind, msg: &str) -> Option<Token> {
        let Self { stream, diags } = self;
        stream.expect(kind, |pos| {
            diags.push(DiagnosticKind::Syntactic, msg, Some(pos));
        })
    }

    fn expect_one_of(&mut self, kinds: &[TokenKind], msg: &str) -> Option<Token> {
        let Self { stream, diags } = self;
        stream.expect_one_of(kinds, |pos| {
            diags.push(DiagnosticKind::Syntactic, msg, Some(pos));
        })
    }
}
