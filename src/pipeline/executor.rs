//! Runs a pipeline over an in-memory buffer

use super::{Dispatcher, Operation};
use crate::exceptions::{FileprocError, Result};
use crate::logger::{Observer, field};
use std::sync::Arc;

/// Compiles and applies steps strictly in order, stopping at the first failure
#[derive(Debug)]
pub struct Executor {
    dispatcher: Dispatcher,
    observer: Arc<dyn Observer>,
}

impl Executor {
    pub fn new(dispatcher: Dispatcher, observer: Arc<dyn Observer>) -> Self {
        Executor {
            dispatcher,
            observer,
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Run `operations` over a copy of `input`.
    ///
    /// Each record is compiled right before it runs, so a bad record at
    /// step k only surfaces after steps 1..k-1 have executed. Errors carry the
    /// 1-based step index and operation name.
    pub fn run(&self, operations: &[Operation], input: &[u8]) -> Result<Vec<u8>> {
        self.observer
            .with_fields(&[field("steps", operations.len())])
            .info("Starting pipeline");

        let mut data = input.to_vec();
        for (i, operation) in operations.iter().enumerate() {
            let index = i + 1;
            let log = self.observer.with_fields(&[
                field("step", index),
                field("operation", &operation.name),
                field("params", format!("{:?}", operation.params)),
            ]);
            log.debug("Executing pipeline step");

            let step = self.dispatcher.compile(operation).map_err(|e| {
                log.with_fields(&[field("error", &e)]).error("Error creating step");
                FileprocError::step(index, &operation.name, e)
            })?;

            data = step(&data).map_err(|e| {
                log.with_fields(&[field("error", &e)]).error("Error processing step");
                FileprocError::step(index, &operation.name, e)
            })?;
        }

        self.observer
            .with_fields(&[field("output_size", data.len())])
            .info("Pipeline finished");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ErrorKind;
    use crate::logger::{MemoryObserver, NullObserver};
    use crate::pipeline::{OP_CALCULATE, OP_COMPRESS, OP_DECOMPRESS, OP_ENCRYPT, Params};

    fn executor() -> Executor {
        let observer: Arc<dyn Observer> = Arc::new(NullObserver);
        Executor::new(Dispatcher::new(observer.clone()), observer)
    }

    #[test]
    fn test_steps_run_in_order() {
        let ops = vec![
            Operation::with_params(OP_CALCULATE, [("type", "parser")]),
            Operation::with_params(OP_COMPRESS, [("type", "gzip")]),
            Operation::with_params(OP_DECOMPRESS, [("type", "gzip")]),
        ];
        let out = executor().run(&ops, b"(2 + 2) * 2").unwrap();
        assert_eq!(out, b"8");
    }

    #[test]
    fn test_empty_pipeline_copies_input() {
        assert_eq!(executor().run(&[], b"as is").unwrap(), b"as is");
    }

    #[test]
    fn test_repeated_runs_are_identical() {
        let ops = vec![
            Operation::with_params(OP_CALCULATE, [("type", "regex")]),
            Operation::with_params(OP_COMPRESS, [("type", "zip")]),
            Operation::with_params(OP_DECOMPRESS, [("type", "zip")]),
        ];
        let input = b"hello 3 * 5 world".to_vec();
        let executor = executor();

        let first = executor.run(&ops, &input).unwrap();
        let second = executor.run(&ops, &input).unwrap();
        assert_eq!(first, second);
        assert_eq!(first, b"hello 15 world");
        assert_eq!(input, b"hello 3 * 5 world");
    }

    #[test]
    fn test_unknown_operation_reports_step() {
        let ops = vec![
            Operation::with_params(OP_CALCULATE, [("type", "parser")]),
            Operation::new("frobnicate", Params::new()),
        ];
        let err = executor().run(&ops, b"1 + 1").unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Configuration);
        match &err {
            FileprocError::Step { index, name, .. } => {
                assert_eq!(*index, 2);
                assert_eq!(name, "frobnicate");
            }
            other => panic!("expected step error, got {other:?}"),
        }
    }

    #[test]
    fn test_failure_stops_later_steps() {
        let observer = MemoryObserver::new();
        let shared: Arc<dyn Observer> = Arc::new(observer.clone());
        let executor = Executor::new(Dispatcher::new(shared.clone()), shared);

        let ops = vec![
            Operation::with_params(OP_ENCRYPT, [("type", "aes"), ("key_file", "/nonexistent")]),
            Operation::with_params(OP_COMPRESS, [("type", "gzip")]),
        ];
        let err = executor.run(&ops, b"data").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("step 1 'encrypt'"));

        let messages = observer.messages();
        assert!(messages.contains(&"Error creating step".to_string()));
        assert!(!messages.contains(&"Starting compression".to_string()));
        assert!(!messages.contains(&"Pipeline finished".to_string()));
    }
}
