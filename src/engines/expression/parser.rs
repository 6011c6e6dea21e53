use super::ast::{BinaryOp, Expr, Function};
use super::compiler::Signature;
use crate::error::{EvoartError, Result};
use std::f64::consts::PI;

/// Parenthesis/call nesting accepted before giving up.
const MAX_NESTING: usize = 128;
/// Total AST nodes accepted before giving up.
const MAX_NODES: usize = 2048;

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Op(BinaryOp),
    LParen,
    RParen,
    Comma,
}

fn tokenize(source: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        match c {
            c if c.is_whitespace() => i += 1,
            '0'..='9' | '.' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_digit() || chars[i] == '.') {
                    i += 1;
                }
                if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
                    let mut j = i + 1;
                    if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
                        j += 1;
                    }
                    if j < chars.len() && chars[j].is_ascii_digit() {
                        i = j;
                        while i < chars.len() && chars[i].is_ascii_digit() {
                            i += 1;
                        }
                    }
                }
                let text: String = chars[start..i].iter().collect();
                tokens.push(Token::Number(number_literal(&text)?));
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                tokens.push(Token::Ident(chars[start..i].iter().collect()));
            }
            'π' => {
                tokens.push(Token::Number(PI));
                i += 1;
            }
            '+' | '-' | '*' | '/' | '%' => {
                let op = match c {
                    '+' => BinaryOp::Add,
                    '-' => BinaryOp::Sub,
                    '*' => BinaryOp::Mul,
                    '/' => BinaryOp::Div,
                    _ => BinaryOp::Rem,
                };
                tokens.push(Token::Op(op));
                i += 1;
            }
            '(' => {
                tokens.push(Token::LParen);
                i += 1;
            }
            ')' => {
                tokens.push(Token::RParen);
                i += 1;
            }
            ',' => {
                tokens.push(Token::Comma);
                i += 1;
            }
            other => {
                return Err(EvoartError::Parse(format!(
                    "unexpected character '{}' at {}",
                    other, i
                )))
            }
        }
    }

    Ok(tokens)
}

/// Grammar constants `3.14159` and `6.28318` stand for π and 2π.
fn number_literal(text: &str) -> Result<f64> {
    match text {
        "3.14159" => Ok(PI),
        "6.28318" => Ok(2.0 * PI),
        _ => text
            .parse::<f64>()
            .map_err(|_| EvoartError::Parse(format!("invalid number '{}'", text))),
    }
}

struct Parser<'a> {
    tokens: Vec<Token>,
    position: usize,
    nesting: usize,
    nodes: usize,
    signature: &'a Signature,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        self.position += 1;
        token
    }

    fn expect(&mut self, expected: Token) -> Result<()> {
        match self.next() {
            Some(token) if token == expected => Ok(()),
            other => Err(EvoartError::Parse(format!(
                "expected {:?}, found {:?}",
                expected, other
            ))),
        }
    }

    fn node(&mut self, expr: Expr) -> Result<Expr> {
        self.nodes += 1;
        if self.nodes > MAX_NODES {
            return Err(EvoartError::Parse("expression too large".to_string()));
        }
        Ok(expr)
    }

    fn enter(&mut self) -> Result<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING {
            return Err(EvoartError::Parse("expression nested too deeply".to_string()));
        }
        Ok(())
    }

    // expr := term (('+' | '-') term)*
    fn expression(&mut self) -> Result<Expr> {
        let mut lhs = self.term()?;
        while let Some(Token::Op(op @ (BinaryOp::Add | BinaryOp::Sub))) = self.peek() {
            let op = *op;
            self.position += 1;
            let rhs = self.term()?;
            lhs = self.node(Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })?;
        }
        Ok(lhs)
    }

    // term := unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<Expr> {
        let mut lhs = self.unary()?;
        while let Some(Token::Op(op @ (BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem))) =
            self.peek()
        {
            let op = *op;
            self.position += 1;
            let rhs = self.unary()?;
            lhs = self.node(Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            })?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> Result<Expr> {
        match self.peek() {
            Some(Token::Op(BinaryOp::Sub)) => {
                self.position += 1;
                self.enter()?;
                let inner = self.unary()?;
                self.nesting -= 1;
                self.node(Expr::Neg(Box::new(inner)))
            }
            Some(Token::Op(BinaryOp::Add)) => {
                self.position += 1;
                self.enter()?;
                let inner = self.unary();
                self.nesting -= 1;
                inner
            }
            _ => self.primary(),
        }
    }

    fn primary(&mut self) -> Result<Expr> {
        match self.next() {
            Some(Token::Number(value)) => self.node(Expr::Number(value)),
            Some(Token::LParen) => {
                self.enter()?;
                let inner = self.expression()?;
                self.expect(Token::RParen)?;
                self.nesting -= 1;
                Ok(inner)
            }
            Some(Token::Ident(name)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.position += 1;
                    self.enter()?;
                    let call = self.call(&name)?;
                    self.nesting -= 1;
                    Ok(call)
                } else {
                    let variable = self.signature.resolve(&name).ok_or_else(|| {
                        EvoartError::Parse(format!("unbound variable '{}'", name))
                    })?;
                    self.node(Expr::Var(variable))
                }
            }
            other => Err(EvoartError::Parse(format!("unexpected token {:?}", other))),
        }
    }

    /// Arguments after the opening parenthesis of `name(`.
    fn call(&mut self, name: &str) -> Result<Expr> {
        if name == "ifpos" {
            let condition = self.expression()?;
            self.expect(Token::Comma)?;
            let then = self.expression()?;
            self.expect(Token::Comma)?;
            let otherwise = self.expression()?;
            self.expect(Token::RParen)?;
            return self.node(Expr::IfPos {
                condition: Box::new(condition),
                then: Box::new(then),
                otherwise: Box::new(otherwise),
            });
        }

        let function = Function::from_name(name)
            .ok_or_else(|| EvoartError::Parse(format!("unknown function '{}'", name)))?;
        let arg = self.expression()?;
        self.expect(Token::RParen)?;
        self.node(Expr::Call {
            function,
            arg: Box::new(arg),
        })
    }
}

/// Parse `source` into an [`Expr`], resolving variables against `signature`.
pub fn parse(source: &str, signature: &Signature) -> Result<Expr> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(EvoartError::Parse("empty expression".to_string()));
    }

    let mut parser = Parser {
        tokens,
        position: 0,
        nesting: 0,
        nodes: 0,
        signature,
    };
    let expr = parser.expression()?;

    if parser.position < parser.tokens.len() {
        return Err(EvoartError::Parse(format!(
            "trailing input at token {}",
            parser.position
        )));
    }
    Ok(expr)
}
