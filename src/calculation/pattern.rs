//! Regex strategy: rewrite flat `number operator number` triples in place

use super::{CalculationMethod, Calculator, map_lines};
use crate::arithmetic::{Operator, parse_integer};
use crate::exceptions::Result;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

#[allow(clippy::expect_used)]
static TRIPLE: Lazy<Regex> = Lazy::new(|| {
    // ASCII digits, blanks and word boundaries only
    Regex::new(r"(?-u:\b)([0-9]+)[ \t\n\f\r]*([-+*/])[ \t\n\f\r]*([0-9]+)(?-u:\b)")
        .expect("arithmetic triple pattern is valid")
});

/// Result of one match, or `None` to keep the matched text
/// (division by zero, overflow).
fn reduce(caps: &Captures<'_>) -> Option<String> {
    let lhs = parse_integer(&caps[1]).ok()?;
    let op: Operator = caps[2].parse().ok()?;
    let rhs = parse_integer(&caps[3]).ok()?;
    op.apply(lhs, rhs).ok().map(|value| value.to_string())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RegexCalculator;

impl Calculator for RegexCalculator {
    fn method(&self) -> CalculationMethod {
        CalculationMethod::Regex
    }

    fn calculate(&self, content: &str) -> Result<String> {
        Ok(map_lines(content, |line| {
            TRIPLE
                .replace_all(line, |caps: &Captures<'_>| {
                    reduce(caps).unwrap_or_else(|| caps[0].to_string())
                })
                .into_owned()
        }))
    }
}
