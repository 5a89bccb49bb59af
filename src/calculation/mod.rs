//! Evaluation of arithmetic embedded in free text
//!
//! Three interchangeable strategies share the [`Calculator`] contract:
//!
//! - [`pattern::RegexCalculator`]: flat `number operator number` triples, no precedence
//! - [`parser::ParserCalculator`]: tokenizer, shunting-yard and RPN evaluation
//! - [`library::LibraryCalculator`]: delegates each line to `evalexpr`
//!
//! Every strategy works line by line; expressions never span lines.

pub mod library;
pub mod logging;
pub mod parser;
pub mod pattern;

pub use library::LibraryCalculator;
pub use logging::with_logging;
pub use parser::ParserCalculator;
pub use pattern::RegexCalculator;

use crate::exceptions::{FileprocError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Strategy selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalculationMethod {
    Regex,
    Parser,
    Library,
}

impl CalculationMethod {
    pub const ALL: [CalculationMethod; 3] = [
        CalculationMethod::Regex,
        CalculationMethod::Parser,
        CalculationMethod::Library,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CalculationMethod::Regex => "regex",
            CalculationMethod::Parser => "parser",
            CalculationMethod::Library => "library",
        }
    }
}

impl fmt::Display for CalculationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalculationMethod {
    type Err = FileprocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "regex" => Ok(CalculationMethod::Regex),
            "parser" => Ok(CalculationMethod::Parser),
            "library" => Ok(CalculationMethod::Library),
            _ => Err(FileprocError::Config(format!(
                "unknown calculation method: {s}"
            ))),
        }
    }
}

/// Evaluates arithmetic found in text and returns the rewritten text
pub trait Calculator: fmt::Debug + Send + Sync {
    fn method(&self) -> CalculationMethod;

    fn calculate(&self, content: &str) -> Result<String>;
}

/// Apply `f` to each line. A trailing `\r` is held back from `f` and restored.
pub fn map_lines<F>(content: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    content
        .split('\n')
        .map(|line| match line.strip_suffix('\r') {
            Some(body) => {
                let mut rewritten = f(body);
                rewritten.push('\r');
                rewritten
            }
            None => f(line),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run `calculator` over raw bytes, line by line.
///
/// Lines that are not valid UTF-8 are copied through byte for byte. Each
/// run of consecutive valid lines goes to the calculator as one text.
pub fn calculate_bytes(calculator: &dyn Calculator, data: &[u8]) -> Result<Vec<u8>> {
    let mut pieces: Vec<Vec<u8>> = Vec::new();
    let mut run: Vec<&str> = Vec::new();

    for line in data.split(|&b| b == b'\n') {
        match std::str::from_utf8(line) {
            Ok(text) => run.push(text),
            Err(_) => {
                if !run.is_empty() {
                    pieces.push(calculator.calculate(&run.join("\n"))?.into_bytes());
                    run.clear();
                }
                log::trace!("Undecodable line passed through ({} bytes)", line.len());
                pieces.push(line.to_vec());
            }
        }
    }
    if !run.is_empty() {
        pieces.push(calculator.calculate(&run.join("\n"))?.into_bytes());
    }

    Ok(pieces.join(&b'\n'))
}

pub type CalculatorFactory = fn() -> Box<dyn Calculator>;

/// Method to constructor table, built once
#[derive(Debug, Clone)]
pub struct Registry {
    factories: HashMap<CalculationMethod, CalculatorFactory>,
}

impl Registry {
    /// Registry with the three built-in strategies
    pub fn builtin() -> Self {
        let mut registry = Registry {
            factories: HashMap::new(),
        };
        registry.register(CalculationMethod::Regex, regex_calculator);
        registry.register(CalculationMethod::Parser, parser_calculator);
        registry.register(CalculationMethod::Library, library_calculator);
        registry
    }

    pub fn register(&mut self, method: CalculationMethod, factory: CalculatorFactory) {
        self.factories.insert(method, factory);
    }

    pub fn create(&self, method: CalculationMethod) -> Result<Box<dyn Calculator>> {
        self.factories
            .get(&method)
            .map(|factory| factory())
            .ok_or_else(|| {
                FileprocError::Config(format!("no calculator registered for method: {method}"))
            })
    }
}

fn regex_calculator() -> Box<dyn Calculator> {
    Box::new(RegexCalculator)
}

fn parser_calculator() -> Box<dyn Calculator> {
    Box::new(ParserCalculator)
}

fn library_calculator() -> Box<dyn Calculator> {
    Box::new(LibraryCalculator)
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Construct a built-in calculator
pub fn new_calculator(method: CalculationMethod) -> Result<Box<dyn Calculator>> {
    Registry::builtin().create(method)
}
