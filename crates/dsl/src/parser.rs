//! Recursive-descent parser for the invariant expression language
//!
//! Operator precedence, low to high:
//!
//! ```text
//! ||
//! &&
//! ==  !=
//! <  <=  >  >=
//! !
//! literal | path | call | ( expr )
//! ```
//!
//! Recursion is bounded: nesting deeper than [`MAX_PARSE_DEPTH`] is a
//! parse error, so untrusted source can never exhaust the stack. The
//! separate semantic depth bound is enforced later by the validator.

use crate::ast::{BinaryOp, Expr, Literal, Path, UnaryOp};
use crate::error::ParseError;
use crate::lexer::lex;
use crate::token::{Token, TokenKind};

/// Hard bound on parser recursion depth
pub const MAX_PARSE_DEPTH: usize = 64;

/// Parse source text into an expression tree
pub fn parse(source: &str) -> Result<Expr, ParseError> {
    let tokens = lex(source)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or(0)?;
    match parser.peek() {
        None => Ok(expr),
        Some(token) => Err(ParseError::TrailingInput { pos: token.pos }),
    }
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek().map(|t| &t.kind) == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ParseError> {
        match self.advance() {
            Some(token) if token.kind == kind => Ok(()),
            Some(token) => Err(ParseError::UnexpectedToken {
                found: token.kind.to_string(),
                expected,
                pos: token.pos,
            }),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_or(&mut self, depth: usize) -> Result<Expr, ParseError> {
        if depth > MAX_PARSE_DEPTH {
            return Err(ParseError::TooDeep {
                max: MAX_PARSE_DEPTH,
            });
        }
        let mut lhs = self.parse_and(depth)?;
        while self.eat(&TokenKind::OrOr) {
            let rhs = self.parse_and(depth)?;
            lhs = Expr::Binary {
                op: BinaryOp::Or,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_and(&mut self, depth: usize) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_equality(depth)?;
        while self.eat(&TokenKind::AndAnd) {
            let rhs = self.parse_equality(depth)?;
            lhs = Expr::Binary {
                op: BinaryOp::And,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_equality(&mut self, depth: usize) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_relational(depth)?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::EqEq) => BinaryOp::Eq,
                Some(TokenKind::NotEq) => BinaryOp::NotEq,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_relational(depth)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_relational(&mut self, depth: usize) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary(depth)?;
        loop {
            let op = match self.peek().map(|t| &t.kind) {
                Some(TokenKind::Lt) => BinaryOp::Lt,
                Some(TokenKind::Le) => BinaryOp::Le,
                Some(TokenKind::Gt) => BinaryOp::Gt,
                Some(TokenKind::Ge) => BinaryOp::Ge,
                _ => break,
            };
            self.pos += 1;
            let rhs = self.parse_unary(depth)?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self, depth: usize) -> Result<Expr, ParseError> {
        if depth > MAX_PARSE_DEPTH {
            return Err(ParseError::TooDeep {
                max: MAX_PARSE_DEPTH,
            });
        }
        if self.eat(&TokenKind::Bang) {
            let operand = self.parse_unary(depth + 1)?;
            return Ok(Expr::Unary {
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }
        self.parse_primary(depth)
    }

    fn parse_primary(&mut self, depth: usize) -> Result<Expr, ParseError> {
        let token = match self.advance() {
            Some(token) => token,
            None => return Err(ParseError::UnexpectedEnd),
        };
        match token.kind {
            TokenKind::Int(value) => Ok(Expr::Literal(Literal::Int(value))),
            TokenKind::Str(text) => Ok(Expr::Literal(Literal::Str(text))),
            TokenKind::True => Ok(Expr::Literal(Literal::Bool(true))),
            TokenKind::False => Ok(Expr::Literal(Literal::Bool(false))),
            TokenKind::Null => Ok(Expr::Literal(Literal::Null)),
            TokenKind::LParen => {
                let expr = self.parse_or(depth + 1)?;
                self.expect(TokenKind::RParen, "')'")?;
                Ok(expr)
            }
            TokenKind::Ident(name) => {
                if self.eat(&TokenKind::LParen) {
                    self.parse_call(name, depth)
                } else {
                    self.parse_path(name)
                }
            }
            other => Err(ParseError::UnexpectedToken {
                found: other.to_string(),
                expected: "literal, path, call, or '('",
                pos: token.pos,
            }),
        }
    }

    fn parse_call(&mut self, name: String, depth: usize) -> Result<Expr, ParseError> {
        let mut args = Vec::new();
        if self.eat(&TokenKind::RParen) {
            return Ok(Expr::Call { name, args });
        }
        loop {
            args.push(self.parse_or(depth + 1)?);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(TokenKind::RParen, "',' or ')'")?;
            return Ok(Expr::Call { name, args });
        }
    }

    fn parse_path(&mut self, root: String) -> Result<Expr, ParseError> {
        let mut segments = vec![root];
        while self.eat(&TokenKind::Dot) {
            match self.advance() {
                Some(Token {
                    kind: TokenKind::Ident(segment),
                    ..
                }) => segments.push(segment),
                Some(token) => {
                    return Err(ParseError::UnexpectedToken {
                        found: token.kind.to_string(),
                        expected: "path segment",
                        pos: token.pos,
                    })
                }
                None => return Err(ParseError::UnexpectedEnd),
            }
        }
        Ok(Expr::Path(Path::new(segments)))
    }
}
