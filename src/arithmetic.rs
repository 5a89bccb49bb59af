//! Integer arithmetic shared by every calculation strategy

use std::fmt;
use std::str::FromStr;

/// Failure while evaluating a single expression
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CalcError {
    #[error("division by zero")]
    DivisionByZero,

    #[error("integer overflow")]
    Overflow,

    #[error("mismatched parentheses")]
    MismatchedParentheses,

    #[error("invalid token: {0}")]
    InvalidToken(String),

    #[error("invalid expression")]
    InvalidExpression,

    #[error("unknown operator: {0}")]
    UnknownOperator(String),
}

/// Binary operator, all left-associative
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    /// Map a single character onto an operator
    pub fn from_char(c: char) -> Option<Operator> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '*' => Some(Operator::Multiply),
            '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    /// Binding strength: `+ -` bind at 1, `* /` at 2
    pub fn precedence(self) -> u8 {
        match self {
            Operator::Add | Operator::Subtract => 1,
            Operator::Multiply | Operator::Divide => 2,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '*',
            Operator::Divide => '/',
        }
    }

    /// Apply to two integers. Division truncates toward zero.
    pub fn apply(self, lhs: i64, rhs: i64) -> Result<i64, CalcError> {
        let result = match self {
            Operator::Add => lhs.checked_add(rhs),
            Operator::Subtract => lhs.checked_sub(rhs),
            Operator::Multiply => lhs.checked_mul(rhs),
            Operator::Divide => {
                if rhs == 0 {
                    return Err(CalcError::DivisionByZero);
                }
                lhs.checked_div(rhs)
            }
        };
        result.ok_or(CalcError::Overflow)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Operator::from_char(c).ok_or_else(|| CalcError::UnknownOperator(s.to_string()))
            }
            _ => Err(CalcError::UnknownOperator(s.to_string())),
        }
    }
}

/// Parse a run of ASCII digits into an integer
pub fn parse_integer(digits: &str) -> Result<i64, CalcError> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CalcError::InvalidToken(digits.to_string()));
    }
    digits.parse::<i64>().map_err(|_| CalcError::Overflow)
}

/// Format a float with up to 6 decimals, dropping trailing zeros and a bare point
pub fn format_float(value: f64) -> String {
    let fixed = format!("{value:.6}");
    if !fixed.contains('.') {
        return fixed;
    }
    fixed.trim_end_matches('0').trim_end_matches('.').to_string()
}
