use crate::ast::*;
use crate::lexer::{Token, TokenKind};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("expected {expected}, found {found} at line {line}, column {column}")]
    Expected {
        expected: String,
        found: String,
        line: u32,
        column: u32,
    },
    #[error("unexpected token {found} at line {line}, column {column}")]
    UnexpectedToken {
        found: String,
        line: u32,
        column: u32,
    },
    #[error("expected {expected}, found end of input")]
    UnexpectedEof { expected: String },
    #[error("integer literal '{literal}' out of range at line {line}, column {column}")]
    IntOutOfRange {
        literal: String,
        line: u32,
        column: u32,
    },
}

/// Recursive-descent parser with one token of lookahead. The first
/// malformed construct aborts the whole parse; there is no recovery.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn expect(&mut self, expected: TokenKind) -> Result<Token, ParseError> {
        match self.peek() {
            Some(t) if t.kind == expected => Ok(self.advance().unwrap()),
            Some(t) => Err(ParseError::Expected {
                expected: expected.to_string(),
                found: t.kind.to_string(),
                line: t.line,
                column: t.column,
            }),
            None => Err(ParseError::UnexpectedEof {
                expected: expected.to_string(),
            }),
        }
    }

    fn expect_identifier(&mut self) -> Result<String, ParseError> {
        Ok(self.expect(TokenKind::Identifier)?.lexeme)
    }

    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut functions = Vec::new();
        while self.peek().is_some() {
            functions.push(self.parse_function()?);
        }
        Ok(Program { functions })
    }

    fn parse_function(&mut self) -> Result<Function, ParseError> {
        self.expect(TokenKind::Function)?;
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Function { name, body })
    }

    /// `{ statement* }`
    fn parse_block(&mut self) -> Result<Vec<Stmt>, ParseError> {
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while self.peek().is_some() && !self.check(TokenKind::RBrace) {
            stmts.push(self.parse_stmt()?);
        }
        self.expect(TokenKind::RBrace)?;
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::IntType) | Some(TokenKind::BoolType) => self.parse_declaration(),
            Some(TokenKind::Identifier) => self.parse_assignment(),
            Some(TokenKind::If) => self.parse_if(),
            Some(TokenKind::While) => self.parse_while(),
            Some(TokenKind::Do) => self.parse_do_while(),
            Some(TokenKind::For) => self.parse_for(),
            Some(TokenKind::Return) => self.parse_return(),
            Some(_) => {
                let t = self.peek().unwrap();
                Err(ParseError::UnexpectedToken {
                    found: t.kind.to_string(),
                    line: t.line,
                    column: t.column,
                })
            }
            None => Err(ParseError::UnexpectedEof {
                expected: "statement".to_string(),
            }),
        }
    }

    /// `("int" | "bool") name ("=" expr)? ";"`
    fn parse_declaration(&mut self) -> Result<Stmt, ParseError> {
        let var_type = match self.peek_kind() {
            Some(TokenKind::BoolType) => Type::Bool,
            _ => Type::Int,
        };
        self.advance();
        let name = self.expect_identifier()?;
        let init = if self.check(TokenKind::Assign) {
            self.advance();
            Some(self.parse_expr()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Declaration {
            var_type,
            name,
            init,
        })
    }

    /// `name "=" expr ";"`
    fn parse_assignment(&mut self) -> Result<Stmt, ParseError> {
        let stmt = self.parse_assignment_bare()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(stmt)
    }

    /// Assignment without the trailing semicolon, shared with the for step.
    fn parse_assignment_bare(&mut self) -> Result<Stmt, ParseError> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::Assign)?;
        let value = self.parse_expr()?;
        Ok(Stmt::Assign(name, value))
    }

    fn parse_if(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::If)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let then_body = self.parse_block()?;
        let else_body = if self.check(TokenKind::Else) {
            self.advance();
            self.parse_block()?
        } else {
            Vec::new()
        };
        Ok(Stmt::If {
            cond,
            then_body,
            else_body,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        let body = self.parse_block()?;
        Ok(Stmt::While { cond, body })
    }

    fn parse_do_while(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Do)?;
        let body = self.parse_block()?;
        self.expect(TokenKind::While)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::DoWhile { body, cond })
    }

    /// All three header clauses are independently optional. The initializer
    /// and an absent initializer both end on a consumed `;`; the step is a
    /// bare assignment decided by whether `)` comes next.
    fn parse_for(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::For)?;
        self.expect(TokenKind::LParen)?;

        let init = match self.peek_kind() {
            Some(TokenKind::IntType) | Some(TokenKind::BoolType) => {
                Some(Box::new(self.parse_declaration()?))
            }
            Some(TokenKind::Identifier) => Some(Box::new(self.parse_assignment()?)),
            _ => {
                self.expect(TokenKind::Semicolon)?;
                None
            }
        };

        let cond = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr()?)
        };
        self.expect(TokenKind::Semicolon)?;

        let step = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_assignment_bare()?))
        };
        self.expect(TokenKind::RParen)?;

        let body = self.parse_block()?;
        Ok(Stmt::For {
            init,
            cond,
            step,
            body,
        })
    }

    fn parse_return(&mut self) -> Result<Stmt, ParseError> {
        self.expect(TokenKind::Return)?;
        let value = self.parse_expr()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(Stmt::Return(value))
    }

    // Expressions, lowest to highest precedence. Every binary level folds
    // repeated operators into a left-leaning tree.

    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.check(TokenKind::Or) {
            self.advance();
            let right = self.parse_and()?;
            left = Expr::BinOp(Box::new(left), BinOp::Or, Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_equality()?;
        while self.check(TokenKind::And) {
            self.advance();
            let right = self.parse_equality()?;
            left = Expr::BinOp(Box::new(left), BinOp::And, Box::new(right));
        }
        Ok(left)
    }

    fn parse_equality(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_relational()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Equal) => BinOp::Eq,
                Some(TokenKind::NotEqual) => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_relational(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_additive()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Less) => BinOp::Lt,
                Some(TokenKind::Greater) => BinOp::Gt,
                Some(TokenKind::LessEqual) => BinOp::Le,
                Some(TokenKind::GreaterEqual) => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Plus) => BinOp::Add,
                Some(TokenKind::Minus) => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;
        loop {
            let op = match self.peek_kind() {
                Some(TokenKind::Star) => BinOp::Mul,
                Some(TokenKind::Slash) => BinOp::Div,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary()?;
            left = Expr::BinOp(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    /// Prefix `-` and `!` over a primary operand; no operator chaining.
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Minus) {
            self.advance();
            let operand = self.parse_primary()?;
            return Ok(Expr::UnaryOp(UnaryOp::Neg, Box::new(operand)));
        }
        if self.check(TokenKind::Not) {
            self.advance();
            let operand = self.parse_primary()?;
            return Ok(Expr::UnaryOp(UnaryOp::Not, Box::new(operand)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::IntLiteral) => {
                let token = self.advance().unwrap();
                let value = token.lexeme.parse::<i64>().map_err(|_| {
                    ParseError::IntOutOfRange {
                        literal: token.lexeme.clone(),
                        line: token.line,
                        column: token.column,
                    }
                })?;
                Ok(Expr::IntLit(value))
            }
            Some(TokenKind::True) => {
                self.advance();
                Ok(Expr::BoolLit(true))
            }
            Some(TokenKind::False) => {
                self.advance();
                Ok(Expr::BoolLit(false))
            }
            Some(TokenKind::Identifier) => {
                let token = self.advance().unwrap();
                Ok(Expr::Var(token.lexeme))
            }
            Some(TokenKind::LParen) => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                Ok(expr)
            }
            Some(_) => {
                let t = self.peek().unwrap();
                Err(ParseError::UnexpectedToken {
                    found: t.kind.to_string(),
                    line: t.line,
                    column: t.column,
                })
            }
            None => Err(ParseError::UnexpectedEof {
                expected: "expression".to_string(),
            }),
        }
    }
}
