use crate::error::{Error, Result};
use std::fmt;

mod converter;
mod evaluator;
mod tokenizer;

pub use converter::to_postfix;
pub use evaluator::evaluate;
pub use tokenizer::tokenize;

/// Separates function arguments: `log(2, 8)`.
pub const ARG_SEPARATOR: char = ',';
pub const DECIMAL_POINT: char = '.';

/// Word spelling of the modulo operator: `7 mod 3`.
pub const MOD_KEYWORD: &str = "mod";

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Number(f64),
    Operator(Operator),
    LeftParen,
    RightParen,
    ArgSeparator,
    FunctionName(String),
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,
}

impl Operator {
    pub const ALL: [Operator; 6] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Modulo,
        Operator::Power,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
            Operator::Modulo => '%',
            Operator::Power => '^',
        }
    }

    /// Higher binds tighter. Note that `%` sits below `*` and `/`.
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Power => 6,
            Operator::Multiply | Operator::Divide => 4,
            Operator::Modulo => 2,
            Operator::Add | Operator::Subtract => 1,
        }
    }

    pub fn associativity(&self) -> Associativity {
        match self {
            Operator::Power => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Applies `lhs OP rhs`. `%` truncates toward zero like Rust's `%`.
    pub fn apply(&self, lhs: f64, rhs: f64) -> Result<f64> {
        match self {
            Operator::Add => Ok(lhs + rhs),
            Operator::Subtract => Ok(lhs - rhs),
            Operator::Multiply => Ok(lhs * rhs),
            Operator::Divide => {
                if rhs == 0.0 {
                    Err(Error::DivisionByZero)
                } else {
                    Ok(lhs / rhs)
                }
            }
            Operator::Modulo => {
                if rhs == 0.0 {
                    Err(Error::DivisionByZero)
                } else {
                    Ok(lhs % rhs)
                }
            }
            Operator::Power => Ok(lhs.powf(rhs)),
        }
    }

    pub fn is_operator_symbol(c: char) -> bool {
        Operator::try_from(c).is_ok()
    }
}

impl TryFrom<char> for Operator {
    type Error = Error;

    fn try_from(value: char) -> Result<Self> {
        match value {
            '+' => Ok(Operator::Add),
            '-' => Ok(Operator::Subtract),
            '*' => Ok(Operator::Multiply),
            '/' => Ok(Operator::Divide),
            '%' => Ok(Operator::Modulo),
            '^' => Ok(Operator::Power),
            _ => Err(Error::UnknownOperator(value.to_string())),
        }
    }
}

impl TryFrom<&str> for Operator {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        let mut chars = value.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Operator::try_from(c),
            _ if value == MOD_KEYWORD => Ok(Operator::Modulo),
            _ => Err(Error::UnknownOperator(value.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One step of a postfix program.
#[derive(Debug, Clone, PartialEq)]
pub enum PostfixItem {
    Number(f64),
    Operator(Operator),
    Function(String),
    /// Emitted right before a variadic function, carrying how many
    /// arguments the call site supplied.
    ArgCount(usize),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Postfix(pub Vec<PostfixItem>);

impl Postfix {
    pub fn items(&self) -> &[PostfixItem] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for PostfixItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PostfixItem::Number(n) => write!(f, "{}", n),
            PostfixItem::Operator(op) => write!(f, "{}", op),
            PostfixItem::Function(name) => write!(f, "{}", name),
            PostfixItem::ArgCount(n) => write!(f, "#{}", n),
        }
    }
}

impl fmt::Display for Postfix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let trace = self
            .0
            .iter()
            .map(|item| item.to_string())
            .collect::<Vec<String>>()
            .join(" ");
        write!(f, "{}", trace)
    }
}
