//! Full-precedence integer evaluator: tokenize, shunting-yard, RPN

use super::{CalculationMethod, Calculator, map_lines};
use crate::arithmetic::{CalcError, Operator, parse_integer};
use crate::exceptions::Result;
use log::trace;

/// Lexical unit of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Run of consecutive digits, parsed lazily
    Number(String),
    Operator(Operator),
    LeftParen,
    RightParen,
    /// Any other character; rejected if it reaches the parser
    Other(char),
}

/// Operator stack entry during shunting-yard
#[derive(Debug, Clone, Copy)]
enum Pending {
    Operator(Operator),
    LeftParen,
}

/// Scan left to right, skipping spaces and grouping digits.
/// Any other whitespace, tabs included, becomes an [`Token::Other`].
pub fn tokenize(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ' ' => {}
            '0'..='9' => {
                let mut digits = String::from(c);
                while let Some(&next) = chars.peek() {
                    if !next.is_ascii_digit() {
                        break;
                    }
                    digits.push(next);
                    chars.next();
                }
                tokens.push(Token::Number(digits));
            }
            '(' => tokens.push(Token::LeftParen),
            ')' => tokens.push(Token::RightParen),
            other => match Operator::from_char(other) {
                Some(op) => tokens.push(Token::Operator(op)),
                None => tokens.push(Token::Other(other)),
            },
        }
    }

    tokens
}

/// Reorder infix tokens into postfix. Output holds only numbers and operators.
pub fn shunting_yard(tokens: Vec<Token>) -> std::result::Result<Vec<Token>, CalcError> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<Pending> = Vec::new();

    for token in tokens {
        match token {
            Token::Number(_) => output.push(token),
            Token::Operator(op) => {
                // left-associative: equal precedence pops too
                while let Some(&Pending::Operator(top)) = stack.last() {
                    if top.precedence() < op.precedence() {
                        break;
                    }
                    output.push(Token::Operator(top));
                    stack.pop();
                }
                stack.push(Pending::Operator(op));
            }
            Token::LeftParen => stack.push(Pending::LeftParen),
            Token::RightParen => loop {
                match stack.pop() {
                    Some(Pending::Operator(op)) => output.push(Token::Operator(op)),
                    Some(Pending::LeftParen) => break,
                    None => return Err(CalcError::MismatchedParentheses),
                }
            },
            Token::Other(c) => return Err(CalcError::InvalidToken(c.to_string())),
        }
    }

    while let Some(pending) = stack.pop() {
        match pending {
            Pending::Operator(op) => output.push(Token::Operator(op)),
            Pending::LeftParen => return Err(CalcError::MismatchedParentheses),
        }
    }

    Ok(output)
}

/// Evaluate a postfix sequence with an explicit value stack
pub fn evaluate_rpn(rpn: &[Token]) -> std::result::Result<i64, CalcError> {
    let mut values: Vec<i64> = Vec::new();

    for token in rpn {
        match token {
            Token::Number(digits) => values.push(parse_integer(digits)?),
            Token::Operator(op) => {
                let rhs = values.pop().ok_or(CalcError::InvalidExpression)?;
                let lhs = values.pop().ok_or(CalcError::InvalidExpression)?;
                values.push(op.apply(lhs, rhs)?);
            }
            Token::LeftParen | Token::RightParen => return Err(CalcError::MismatchedParentheses),
            Token::Other(c) => return Err(CalcError::InvalidToken(c.to_string())),
        }
    }

    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(CalcError::InvalidExpression),
    }
}

/// Evaluate one line. `Ok(None)` when the line has no tokens at all.
pub fn evaluate(line: &str) -> std::result::Result<Option<i64>, CalcError> {
    let tokens = tokenize(line);
    if tokens.is_empty() {
        return Ok(None);
    }
    let rpn = shunting_yard(tokens)?;
    evaluate_rpn(&rpn).map(Some)
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ParserCalculator;

impl Calculator for ParserCalculator {
    fn method(&self) -> CalculationMethod {
        CalculationMethod::Parser
    }

    fn calculate(&self, content: &str) -> Result<String> {
        Ok(map_lines(content, |line| match evaluate(line) {
            Ok(Some(value)) => value.to_string(),
            Ok(None) => line.to_string(),
            Err(e) => {
                trace!("Line left unchanged ({e}): {line:?}");
                line.to_string()
            }
        }))
    }
}
