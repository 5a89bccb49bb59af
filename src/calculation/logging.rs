//! Logging middleware for calculators

use super::{CalculationMethod, Calculator};
use crate::exceptions::Result;
use crate::logger::{Observer, field};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct LoggingCalculator {
    inner: Box<dyn Calculator>,
    observer: Arc<dyn Observer>,
}

/// Wrap `inner` so every call reports size, duration and failures
pub fn with_logging(inner: Box<dyn Calculator>, observer: Arc<dyn Observer>) -> Box<dyn Calculator> {
    Box::new(LoggingCalculator { inner, observer })
}

impl Calculator for LoggingCalculator {
    fn method(&self) -> CalculationMethod {
        self.inner.method()
    }

    fn calculate(&self, content: &str) -> Result<String> {
        let log = self.observer.with_fields(&[
            field("method", self.inner.method()),
            field("input_size", content.len()),
        ]);
        log.info("Starting calculation");

        let begin = Instant::now();
        let result = self.inner.calculate(content);
        match &result {
            Ok(output) => log
                .with_fields(&[
                    field("duration", format!("{:?}", begin.elapsed())),
                    field("output_size", output.len()),
                ])
                .info("Calculation finished"),
            Err(e) => log.with_fields(&[field("error", e)]).error("Calculation failed"),
        }
        result
    }
}
