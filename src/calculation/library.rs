//! Library strategy: hand each line to `evalexpr`
//!
//! `evalexpr` divides integers as integers. Bare integer literals are
//! rewritten as floats first so every line is evaluated in floating point,
//! then whole results print without a fractional part.

use super::{CalculationMethod, Calculator, map_lines};
use crate::arithmetic::format_float;
use crate::exceptions::Result;
use evalexpr::Value;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Append `.0` to every integer literal: digit runs that are not part of an
/// identifier, a float literal or an exponent.
pub fn promote_integers(line: &str) -> String {
    let mut promoted = String::with_capacity(line.len() + 8);
    let mut chars = line.chars().peekable();
    let mut previous: Option<char> = None;

    while let Some(c) = chars.next() {
        if !c.is_ascii_digit() || previous.is_some_and(|p| is_word_char(p) || p == '.') {
            promoted.push(c);
            previous = Some(c);
            continue;
        }

        let mut last = c;
        promoted.push(c);
        while let Some(&next) = chars.peek() {
            if !next.is_ascii_digit() {
                break;
            }
            promoted.push(next);
            last = next;
            chars.next();
        }
        if !chars.peek().is_some_and(|&next| is_word_char(next) || next == '.') {
            promoted.push_str(".0");
        }
        previous = Some(last);
    }

    promoted
}

/// Evaluate a whole line; `None` for anything that is not a numeric result
pub fn evaluate(line: &str) -> Option<String> {
    match evalexpr::eval(&promote_integers(line)) {
        Ok(Value::Int(value)) => Some(value.to_string()),
        Ok(Value::Float(value)) if value.is_finite() => Some(format_float(value)),
        Ok(_) => None,
        Err(e) => {
            log::trace!("evalexpr rejected {line:?}: {e}");
            None
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LibraryCalculator;

impl Calculator for LibraryCalculator {
    fn method(&self) -> CalculationMethod {
        CalculationMethod::Library
    }

    fn calculate(&self, content: &str) -> Result<String> {
        Ok(map_lines(content, |line| {
            evaluate(line).unwrap_or_else(|| line.to_string())
        }))
    }
}
