//! Arithmetic expressions over the field variables `x` and `y`
//!
//! Equations are parsed once into an [`Expr`] tree and evaluated directly
//! with both variables bound, so no text substitution ever happens at
//! evaluation time.
//!
//! Precedence (loosest first): `+ -`, `* /` and implicit multiplication,
//! unary sign, `^` (right associative). `3x^2` reads as `3 * (x^2)` and
//! `-x^2` as `-(x^2)`.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Free variable of a field component
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Var {
    X,
    Y,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "^",
        }
    }

    #[inline]
    fn apply(self, lhs: f64, rhs: f64) -> f64 {
        match self {
            BinaryOp::Add => lhs + rhs,
            BinaryOp::Sub => lhs - rhs,
            BinaryOp::Mul => lhs * rhs,
            BinaryOp::Div => lhs / rhs,
            BinaryOp::Pow => lhs.powf(rhs),
        }
    }
}

/// Single-argument functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Sqrt,
    Abs,
    Exp,
}

impl Func {
    pub fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Sqrt => "sqrt",
            Func::Abs => "abs",
            Func::Exp => "exp",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sin" => Some(Func::Sin),
            "cos" => Some(Func::Cos),
            "tan" => Some(Func::Tan),
            "sqrt" => Some(Func::Sqrt),
            "abs" => Some(Func::Abs),
            "exp" => Some(Func::Exp),
            _ => None,
        }
    }

    #[inline]
    fn apply(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Sqrt => v.sqrt(),
            Func::Abs => v.abs(),
            Func::Exp => v.exp(),
        }
    }
}

/// Expression tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    Num(f64),
    Var(Var),
    /// Template placeholder, numbered left to right
    Slot(usize),
    Neg(Box<Expr>),
    Binary(BinaryOp, Box<Expr>, Box<Expr>),
    Call(Func, Box<Expr>),
}

/// Expression parse failures
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected {found} at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("unknown identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("placeholder '?' at offset {0} was never filled")]
    UnfilledPlaceholder(usize),

    #[error("invalid number '{0}'")]
    InvalidNumber(String),
}

impl Expr {
    /// Parse a complete expression (placeholders are rejected)
    pub fn parse(src: &str) -> Result<Expr, ParseError> {
        Parser::new(src, false)?.parse_all()
    }

    /// Parse a template; each `?` becomes `Slot(n)` in left-to-right order.
    /// Returns the tree and the number of slots.
    pub fn parse_template(src: &str) -> Result<(Expr, usize), ParseError> {
        let mut parser = Parser::new(src, true)?;
        let expr = parser.parse_all()?;
        Ok((expr, parser.slots))
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Expr {
        Expr::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    /// Evaluate with `x` and `y` bound. Unfilled slots evaluate to NaN.
    pub fn eval(&self, x: f64, y: f64) -> f64 {
        match self {
            Expr::Num(v) => *v,
            Expr::Var(Var::X) => x,
            Expr::Var(Var::Y) => y,
            Expr::Slot(_) => f64::NAN,
            Expr::Neg(inner) => -inner.eval(x, y),
            Expr::Binary(op, lhs, rhs) => op.apply(lhs.eval(x, y), rhs.eval(x, y)),
            Expr::Call(func, arg) => func.apply(arg.eval(x, y)),
        }
    }

    /// Replace every `Slot(n)` with `values[n]`
    pub fn fill_slots(&self, values: &[f64]) -> Expr {
        match self {
            Expr::Slot(n) => match values.get(*n) {
                Some(v) => Expr::Num(*v),
                None => Expr::Slot(*n),
            },
            Expr::Num(_) | Expr::Var(_) => self.clone(),
            Expr::Neg(inner) => Expr::Neg(Box::new(inner.fill_slots(values))),
            Expr::Binary(op, lhs, rhs) => {
                Expr::binary(*op, lhs.fill_slots(values), rhs.fill_slots(values))
            }
            Expr::Call(func, arg) => Expr::Call(*func, Box::new(arg.fill_slots(values))),
        }
    }

    /// Number of unfilled slots left in the tree
    pub fn slot_count(&self) -> usize {
        match self {
            Expr::Slot(_) => 1,
            Expr::Num(_) | Expr::Var(_) => 0,
            Expr::Neg(inner) | Expr::Call(_, inner) => inner.slot_count(),
            Expr::Binary(_, lhs, rhs) => lhs.slot_count() + rhs.slot_count(),
        }
    }
}

impl fmt::Display for Expr {
    /// Fully parenthesised form; re-parses to the same tree
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Num(v) => write!(f, "{v}"),
            Expr::Var(Var::X) => f.write_str("x"),
            Expr::Var(Var::Y) => f.write_str("y"),
            Expr::Slot(_) => f.write_str("?"),
            Expr::Neg(inner) => write!(f, "(-{inner})"),
            Expr::Binary(op, lhs, rhs) => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Expr::Call(func, arg) => write!(f, "{}({arg})", func.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Num(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    Question,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Num(v) => format!("number {v}"),
            Token::Ident(name) => format!("identifier '{name}'"),
            Token::Plus => "'+'".into(),
            Token::Minus => "'-'".into(),
            Token::Star => "'*'".into(),
            Token::Slash => "'/'".into(),
            Token::Caret => "'^'".into(),
            Token::LParen => "'('".into(),
            Token::RParen => "')'".into(),
            Token::Question => "'?'".into(),
        }
    }

    /// Tokens that can start an implicitly multiplied operand
    fn starts_operand(&self) -> bool {
        matches!(
            self,
            Token::Num(_) | Token::Ident(_) | Token::LParen | Token::Question
        )
    }
}

fn tokenize(src: &str) -> Result<Vec<(Token, usize)>, ParseError> {
    let mut tokens = Vec::new();
    let mut chars = src.char_indices().peekable();

    while let Some(&(offset, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }

        if ch.is_ascii_digit() || ch == '.' {
            let mut end = offset;
            while let Some(&(i, c)) = chars.peek() {
                if c.is_ascii_digit() || c == '.' {
                    end = i + c.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            let text = &src[offset..end];
            let value = text
                .parse::<f64>()
                .map_err(|_| ParseError::InvalidNumber(text.to_string()))?;
            tokens.push((Token::Num(value), offset));
            continue;
        }

        if ch.is_ascii_alphabetic() {
            // Variables are single letters so `xy` reads as `x * y`
            let mut end = offset + ch.len_utf8();
            chars.next();
            if ch != 'x' && ch != 'y' {
                while let Some(&(i, c)) = chars.peek() {
                    if c.is_ascii_alphabetic() {
                        end = i + c.len_utf8();
                        chars.next();
                    } else {
                        break;
                    }
                }
            }
            tokens.push((Token::Ident(src[offset..end].to_string()), offset));
            continue;
        }

        let token = match ch {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => Token::Star,
            '/' => Token::Slash,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            '?' => Token::Question,
            _ => return Err(ParseError::UnexpectedChar { ch, offset }),
        };
        tokens.push((token, offset));
        chars.next();
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    allow_slots: bool,
    slots: usize,
}

impl Parser {
    fn new(src: &str, allow_slots: bool) -> Result<Self, ParseError> {
        Ok(Self {
            tokens: tokenize(src)?,
            pos: 0,
            allow_slots,
            slots: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(t, _)| t)
    }

    fn next(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(token: &Token, offset: usize) -> ParseError {
        ParseError::UnexpectedToken {
            found: token.describe(),
            offset,
        }
    }

    fn expect(&mut self, expected: Token) -> Result<(), ParseError> {
        match self.next() {
            Some((token, _)) if token == expected => Ok(()),
            Some((token, offset)) => Err(Self::unexpected(&token, offset)),
            None => Err(ParseError::UnexpectedEnd),
        }
    }

    fn parse_all(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_sum()?;
        match self.next() {
            None => Ok(expr),
            Some((token, offset)) => Err(Self::unexpected(&token, offset)),
        }
    }

    fn parse_sum(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_product()?;
        loop {
            let op = match self.peek() {
                Some(Token::Plus) => BinaryOp::Add,
                Some(Token::Minus) => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            self.pos += 1;
            let rhs = self.parse_product()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_product(&mut self) -> Result<Expr, ParseError> {
        let mut lhs = self.parse_unary()?;
        loop {
            let op = match self.peek() {
                Some(Token::Star) => {
                    self.pos += 1;
                    BinaryOp::Mul
                }
                Some(Token::Slash) => {
                    self.pos += 1;
                    BinaryOp::Div
                }
                // Implicit multiplication: `3x`, `2(x + 1)`, `4cos(y)`
                Some(token) if token.starts_operand() => BinaryOp::Mul,
                _ => return Ok(lhs),
            };
            let rhs = self.parse_unary()?;
            lhs = Expr::binary(op, lhs, rhs);
        }
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Some(Token::Minus) => {
                self.pos += 1;
                Ok(Expr::Neg(Box::new(self.parse_unary()?)))
            }
            Some(Token::Plus) => {
                self.pos += 1;
                self.parse_unary()
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> Result<Expr, ParseError> {
        let base = self.parse_primary()?;
        if self.peek() == Some(&Token::Caret) {
            self.pos += 1;
            let exponent = self.parse_unary()?;
            return Ok(Expr::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let (token, offset) = self.next().ok_or(ParseError::UnexpectedEnd)?;
        match token {
            Token::Num(v) => Ok(Expr::Num(v)),
            Token::Question => {
                if !self.allow_slots {
                    return Err(ParseError::UnfilledPlaceholder(offset));
                }
                let slot = self.slots;
                self.slots += 1;
                Ok(Expr::Slot(slot))
            }
            Token::LParen => {
                let inner = self.parse_sum()?;
                self.expect(Token::RParen)?;
                Ok(inner)
            }
            Token::Ident(name) => match name.as_str() {
                "x" => Ok(Expr::Var(Var::X)),
                "y" => Ok(Expr::Var(Var::Y)),
                _ => {
                    let func = Func::from_name(&name)
                        .ok_or_else(|| ParseError::UnknownIdentifier(name.clone()))?;
                    self.expect(Token::LParen)?;
                    let arg = self.parse_sum()?;
                    self.expect(Token::RParen)?;
                    Ok(Expr::Call(func, Box::new(arg)))
                }
            },
            other => Err(Self::unexpected(&other, offset)),
        }
    }
}
