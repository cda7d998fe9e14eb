// src/frontend/parser.rs

use crate::errors::{LexerError, ParserError};
use crate::frontend::{Interner, Lexer, Span, Token, TokenType, ast::*};

pub struct Parser<'src> {
    lexer: Lexer<'src>,
    current: Token,
    previous: Token,
    interner: Interner,
    next_node_id: u32,
}

/// A parse error wrapping a miette-enabled ParserError
#[derive(Debug)]
pub struct ParseError {
    pub error: ParserError,
    pub span: Span,
}

impl ParseError {
    pub fn new(error: ParserError, span: Span) -> Self {
        Self { error, span }
    }
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Token::new(TokenType::Eof, "", Span::default()),
            interner: Interner::new(),
            next_node_id: 0,
        }
    }

    /// Take lexer errors collected while scanning.
    pub fn take_lexer_errors(&mut self) -> Vec<LexerError> {
        self.lexer.take_errors()
    }

    /// Consume the parser, yielding the interner for later passes.
    pub fn into_interner(self) -> Interner {
        self.interner
    }

    fn node_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let id = self.node_id();
        let start_span = self.current.span;
        let mut functions = Vec::new();

        while !self.check(TokenType::Eof) {
            functions.push(self.function()?);
        }

        let span = start_span.merge(self.previous.span);
        Ok(Program {
            id,
            functions,
            span,
        })
    }

    fn function(&mut self) -> Result<FuncDecl, ParseError> {
        let id = self.node_id();
        let start_span = self.current.span;
        self.consume(TokenType::KwFunc, "expected 'func'")?;

        let name_token = self.current.clone();
        self.consume(TokenType::Identifier, "expected function name")?;
        let name = self.interner.intern(&name_token.lexeme);

        self.consume(TokenType::LParen, "expected '(' after function name")?;
        let mut params = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                params.push(self.param()?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen, "expected ')' after parameters")?;

        let return_type = if self.match_token(TokenType::Colon) {
            Some(self.basic_type_expr()?)
        } else {
            None
        };

        let mut locals = Vec::new();
        while self.match_token(TokenType::KwVar) {
            while !self.check(TokenType::KwEndVar) {
                locals.push(self.var_decl()?);
                self.match_token(TokenType::Semicolon);
            }
            self.consume(TokenType::KwEndVar, "expected 'endvar'")?;
        }

        let body = self.statements(&[TokenType::KwEndFunc])?;
        self.consume(TokenType::KwEndFunc, "expected 'endfunc'")?;

        let span = start_span.merge(self.previous.span);
        Ok(FuncDecl {
            id,
            name,
            params,
            return_type,
            locals,
            body,
            span,
        })
    }

    fn param(&mut self) -> Result<ParamDecl, ParseError> {
        let name_token = self.current.clone();
        self.consume(TokenType::Identifier, "expected parameter name")?;
        let name = self.interner.intern(&name_token.lexeme);
        self.consume(TokenType::Colon, "expected ':' after parameter name")?;
        let ty = self.type_expr()?;
        let span = name_token.span.merge(ty.span);
        Ok(ParamDecl { name, ty, span })
    }

    fn var_decl(&mut self) -> Result<VarDecl, ParseError> {
        let start_span = self.current.span;
        let mut names = Vec::new();
        loop {
            let name_token = self.current.clone();
            self.consume(TokenType::Identifier, "expected variable name")?;
            names.push((self.interner.intern(&name_token.lexeme), name_token.span));
            if !self.match_token(TokenType::Comma) {
                break;
            }
        }
        self.consume(TokenType::Colon, "expected ':' after variable names")?;
        let ty = self.type_expr()?;
        let span = start_span.merge(ty.span);
        Ok(VarDecl { names, ty, span })
    }

    fn type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        if self.check(TokenType::KwArray) {
            let id = self.node_id();
            let start_span = self.current.span;
            self.advance();
            self.consume(TokenType::LBracket, "expected '[' after 'array'")?;
            let size_token = self.current.clone();
            self.consume(TokenType::IntLiteral, "expected array size")?;
            let size: u32 = size_token.lexeme.parse().map_err(|_| {
                ParseError::new(
                    ParserError::InvalidNumber {
                        literal: size_token.lexeme.clone(),
                        span: size_token.span.into(),
                    },
                    size_token.span,
                )
            })?;
            self.consume(TokenType::RBracket, "expected ']' after array size")?;
            self.consume(TokenType::KwOf, "expected 'of' after array size")?;
            let elem = self.basic_type()?;
            let span = start_span.merge(self.previous.span);
            Ok(TypeExpr {
                id,
                kind: TypeExprKind::Array { size, elem },
                span,
            })
        } else {
            self.basic_type_expr()
        }
    }

    fn basic_type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        let id = self.node_id();
        let span = self.current.span;
        let basic = self.basic_type()?;
        Ok(TypeExpr {
            id,
            kind: TypeExprKind::Basic(basic),
            span,
        })
    }

    fn basic_type(&mut self) -> Result<BasicType, ParseError> {
        let ty = match self.current.ty {
            TokenType::KwInt => BasicType::Int,
            TokenType::KwFloat => BasicType::Float,
            TokenType::KwBool => BasicType::Bool,
            TokenType::KwChar => BasicType::Char,
            _ => {
                return Err(self.unexpected("expected a type"));
            }
        };
        self.advance();
        Ok(ty)
    }

    /// Parse statements until one of the terminator keywords
    fn statements(&mut self, terminators: &[TokenType]) -> Result<Vec<Stmt>, ParseError> {
        let mut stmts = Vec::new();
        while !terminators.contains(&self.current.ty) && !self.check(TokenType::Eof) {
            stmts.push(self.statement()?);
        }
        Ok(stmts)
    }

    fn statement(&mut self) -> Result<Stmt, ParseError> {
        match self.current.ty {
            TokenType::KwIf => self.if_stmt(),
            TokenType::KwWhile => self.while_stmt(),
            TokenType::KwReturn => self.return_stmt(),
            TokenType::KwRead => self.read_stmt(),
            TokenType::KwWrite => self.write_stmt(),
            TokenType::Identifier => self.assign_or_call(),
            _ => Err(self.unexpected("expected a statement")),
        }
    }

    fn if_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current.span;
        self.advance(); // 'if'
        let condition = self.expression(0)?;
        self.consume(TokenType::KwThen, "expected 'then' after condition")?;
        let then_branch = self.statements(&[TokenType::KwElse, TokenType::KwEndIf])?;
        let else_branch = if self.match_token(TokenType::KwElse) {
            Some(self.statements(&[TokenType::KwEndIf])?)
        } else {
            None
        };
        self.consume(TokenType::KwEndIf, "expected 'endif'")?;
        let span = start_span.merge(self.previous.span);
        Ok(Stmt::If(IfStmt {
            condition,
            then_branch,
            else_branch,
            span,
        }))
    }

    fn while_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current.span;
        self.advance(); // 'while'
        let condition = self.expression(0)?;
        self.consume(TokenType::KwDo, "expected 'do' after condition")?;
        let body = self.statements(&[TokenType::KwEndWhile])?;
        self.consume(TokenType::KwEndWhile, "expected 'endwhile'")?;
        let span = start_span.merge(self.previous.span);
        Ok(Stmt::While(WhileStmt {
            condition,
            body,
            span,
        }))
    }

    fn return_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current.span;
        self.advance(); // 'return'
        let value = if self.check(TokenType::Semicolon) {
            None
        } else {
            Some(self.expression(0)?)
        };
        self.consume(TokenType::Semicolon, "expected ';' after return")?;
        let span = start_span.merge(self.previous.span);
        Ok(Stmt::Return(ReturnStmt { value, span }))
    }

    fn read_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current.span;
        self.advance(); // 'read'
        let target = self.left_expr()?;
        self.consume(TokenType::Semicolon, "expected ';' after read target")?;
        let span = start_span.merge(self.previous.span);
        Ok(Stmt::Read(ReadStmt { target, span }))
    }

    fn write_stmt(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current.span;
        self.advance(); // 'write'
        if self.check(TokenType::StringLiteral) {
            let token = self.current.clone();
            self.advance();
            self.consume(TokenType::Semicolon, "expected ';' after write")?;
            let span = start_span.merge(self.previous.span);
            // Strip the surrounding quotes, keep escapes for codegen
            let text = token.lexeme[1..token.lexeme.len() - 1].to_string();
            return Ok(Stmt::WriteStr(WriteStrStmt { text, span }));
        }
        let value = self.expression(0)?;
        self.consume(TokenType::Semicolon, "expected ';' after write")?;
        let span = start_span.merge(self.previous.span);
        Ok(Stmt::Write(WriteStmt { value, span }))
    }

    /// Statements starting with an identifier: assignment or procedure call
    fn assign_or_call(&mut self) -> Result<Stmt, ParseError> {
        let start_span = self.current.span;
        let name_token = self.current.clone();
        self.advance();
        let name = self.interner.intern(&name_token.lexeme);

        if self.check(TokenType::LParen) {
            let callee = Ident {
                id: self.node_id(),
                name,
                span: name_token.span,
            };
            self.advance(); // '('
            let args = self.call_args()?;
            self.consume(TokenType::Semicolon, "expected ';' after call")?;
            let span = start_span.merge(self.previous.span);
            return Ok(Stmt::Call(CallStmt { callee, args, span }));
        }

        let target = self.left_expr_from(name, name_token.span)?;
        self.consume(TokenType::Assign, "expected '=' in assignment")?;
        let value = self.expression(0)?;
        self.consume(TokenType::Semicolon, "expected ';' after assignment")?;
        let span = start_span.merge(self.previous.span);
        Ok(Stmt::Assign(AssignStmt {
            target,
            value,
            span,
        }))
    }

    fn left_expr(&mut self) -> Result<LeftExpr, ParseError> {
        let name_token = self.current.clone();
        self.consume(TokenType::Identifier, "expected identifier")?;
        let name = self.interner.intern(&name_token.lexeme);
        self.left_expr_from(name, name_token.span)
    }

    fn left_expr_from(&mut self, name: Symbol, name_span: Span) -> Result<LeftExpr, ParseError> {
        let id = self.node_id();
        let target = Ident {
            id: self.node_id(),
            name,
            span: name_span,
        };
        let index = if self.match_token(TokenType::LBracket) {
            let index = self.expression(0)?;
            self.consume(TokenType::RBracket, "expected ']' after index")?;
            Some(Box::new(index))
        } else {
            None
        };
        let span = name_span.merge(self.previous.span);
        Ok(LeftExpr {
            id,
            target,
            index,
            span,
        })
    }

    fn call_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        if !self.check(TokenType::RParen) {
            loop {
                args.push(self.expression(0)?);
                if !self.match_token(TokenType::Comma) {
                    break;
                }
            }
        }
        self.consume(TokenType::RParen, "expected ')' after arguments")?;
        Ok(args)
    }

    /// Pratt-style expression parsing by binding power
    fn expression(&mut self, min_bp: u8) -> Result<Expr, ParseError> {
        let mut lhs = self.unary()?;

        while let Some(op) = binary_op(self.current.ty) {
            let (l_bp, r_bp) = binding_power(op);
            if l_bp < min_bp {
                break;
            }
            self.advance();
            let rhs = self.expression(r_bp)?;
            let span = lhs.span.merge(rhs.span);
            lhs = Expr {
                id: self.node_id(),
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
            };
        }

        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr, ParseError> {
        let op = match self.current.ty {
            TokenType::Not => Some(UnaryOp::Not),
            TokenType::Minus => Some(UnaryOp::Neg),
            _ => None,
        };
        if let Some(op) = op {
            let start_span = self.current.span;
            let id = self.node_id();
            self.advance();
            let operand = self.unary()?;
            let span = start_span.merge(operand.span);
            return Ok(Expr {
                id,
                kind: ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            });
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Expr, ParseError> {
        let token = self.current.clone();
        match token.ty {
            TokenType::IntLiteral => {
                let id = self.node_id();
                self.advance();
                let value: i64 = token.lexeme.parse().map_err(|_| {
                    ParseError::new(
                        ParserError::InvalidNumber {
                            literal: token.lexeme.clone(),
                            span: token.span.into(),
                        },
                        token.span,
                    )
                })?;
                Ok(Expr {
                    id,
                    kind: ExprKind::Literal(Literal::Int(value)),
                    span: token.span,
                })
            }
            TokenType::FloatLiteral => {
                let id = self.node_id();
                self.advance();
                Ok(Expr {
                    id,
                    kind: ExprKind::Literal(Literal::Float(token.lexeme.clone())),
                    span: token.span,
                })
            }
            TokenType::CharLiteral => {
                let id = self.node_id();
                self.advance();
                let body = token.lexeme[1..token.lexeme.len() - 1].to_string();
                Ok(Expr {
                    id,
                    kind: ExprKind::Literal(Literal::Char(body)),
                    span: token.span,
                })
            }
            TokenType::KwTrue | TokenType::KwFalse => {
                let id = self.node_id();
                self.advance();
                Ok(Expr {
                    id,
                    kind: ExprKind::Literal(Literal::Bool(token.ty == TokenType::KwTrue)),
                    span: token.span,
                })
            }
            TokenType::LParen => {
                let id = self.node_id();
                self.advance();
                let inner = self.expression(0)?;
                self.consume(TokenType::RParen, "expected ')' after expression")?;
                let span = token.span.merge(self.previous.span);
                Ok(Expr {
                    id,
                    kind: ExprKind::Paren(Box::new(inner)),
                    span,
                })
            }
            TokenType::Identifier => {
                self.advance();
                let name = self.interner.intern(&token.lexeme);
                if self.check(TokenType::LParen) {
                    let id = self.node_id();
                    let callee = Ident {
                        id: self.node_id(),
                        name,
                        span: token.span,
                    };
                    self.advance(); // '('
                    let args = self.call_args()?;
                    let span = token.span.merge(self.previous.span);
                    return Ok(Expr {
                        id,
                        kind: ExprKind::Call { callee, args },
                        span,
                    });
                }
                if self.check(TokenType::LBracket) {
                    let id = self.node_id();
                    let array = Ident {
                        id: self.node_id(),
                        name,
                        span: token.span,
                    };
                    self.advance(); // '['
                    let index = self.expression(0)?;
                    self.consume(TokenType::RBracket, "expected ']' after index")?;
                    let span = token.span.merge(self.previous.span);
                    return Ok(Expr {
                        id,
                        kind: ExprKind::ArrayAccess {
                            array,
                            index: Box::new(index),
                        },
                        span,
                    });
                }
                let id = self.node_id();
                let ident_id = self.node_id();
                Ok(Expr {
                    id,
                    kind: ExprKind::Ident(Ident {
                        id: ident_id,
                        name,
                        span: token.span,
                    }),
                    span: token.span,
                })
            }
            _ => Err(self.unexpected("expected an expression")),
        }
    }

    // Token plumbing

    fn advance(&mut self) {
        self.previous = std::mem::replace(&mut self.current, self.lexer.next_token());
    }

    fn check(&self, ty: TokenType) -> bool {
        self.current.ty == ty
    }

    fn match_token(&mut self, ty: TokenType) -> bool {
        if self.check(ty) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn consume(&mut self, ty: TokenType, message: &str) -> Result<(), ParseError> {
        if self.check(ty) {
            self.advance();
            Ok(())
        } else {
            Err(ParseError::new(
                ParserError::ExpectedToken {
                    expected: ty.as_str().to_string(),
                    found: self.current.ty.as_str().to_string(),
                    message: message.to_string(),
                    span: self.current.span.into(),
                },
                self.current.span,
            ))
        }
    }

    fn unexpected(&self, message: &str) -> ParseError {
        ParseError::new(
            ParserError::UnexpectedToken {
                found: self.current.ty.as_str().to_string(),
                message: message.to_string(),
                span: self.current.span.into(),
            },
            self.current.span,
        )
    }
}

fn binary_op(ty: TokenType) -> Option<BinaryOp> {
    let op = match ty {
        TokenType::OrOr => BinaryOp::Or,
        TokenType::AndAnd => BinaryOp::And,
        TokenType::EqEq => BinaryOp::Eq,
        TokenType::NotEq => BinaryOp::Ne,
        TokenType::Lt => BinaryOp::Lt,
        TokenType::LtEq => BinaryOp::Le,
        TokenType::Gt => BinaryOp::Gt,
        TokenType::GtEq => BinaryOp::Ge,
        TokenType::Plus => BinaryOp::Add,
        TokenType::Minus => BinaryOp::Sub,
        TokenType::Star => BinaryOp::Mul,
        TokenType::Slash => BinaryOp::Div,
        TokenType::Percent => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

/// Left-associative binding powers, lowest for `||`
fn binding_power(op: BinaryOp) -> (u8, u8) {
    match op {
        BinaryOp::Or => (1, 2),
        BinaryOp::And => (3, 4),
        BinaryOp::Eq
        | BinaryOp::Ne
        | BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge => (5, 6),
        BinaryOp::Add | BinaryOp::Sub => (7, 8),
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => (9, 10),
    }
}
