//! Logging middleware for readers and writers

use super::{FileReader, FileWriter};
use crate::exceptions::Result;
use crate::logger::{Observer, field};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct LoggingReader {
    inner: Box<dyn FileReader>,
    observer: Arc<dyn Observer>,
}

pub fn with_logging_reader(inner: Box<dyn FileReader>, observer: Arc<dyn Observer>) -> Box<dyn FileReader> {
    Box::new(LoggingReader { inner, observer })
}

impl FileReader for LoggingReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let log = self.observer.with_fields(&[field("path", path.display())]);
        log.debug("Reading file");

        let begin = Instant::now();
        let result = self.inner.read(path);
        match &result {
            Ok(data) => log
                .with_fields(&[
                    field("duration", format!("{:?}", begin.elapsed())),
                    field("size", data.len()),
                ])
                .info("File read"),
            Err(e) => log.with_fields(&[field("error", e)]).error("Failed to read file"),
        }
        result
    }
}

#[derive(Debug)]
pub struct LoggingWriter {
    inner: Box<dyn FileWriter>,
    observer: Arc<dyn Observer>,
}

pub fn with_logging_writer(inner: Box<dyn FileWriter>, observer: Arc<dyn Observer>) -> Box<dyn FileWriter> {
    Box::new(LoggingWriter { inner, observer })
}

impl FileWriter for LoggingWriter {
    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        let log = self.observer.with_fields(&[
            field("path", path.display()),
            field("size", data.len()),
        ]);
        log.debug("Writing file");

        let begin = Instant::now();
        let result = self.inner.write(path, data);
        match &result {
            Ok(()) => log
                .with_fields(&[field("duration", format!("{:?}", begin.elapsed()))])
                .info("File written"),
            Err(e) => log.with_fields(&[field("error", e)]).error("Failed to write file"),
        }
        result
    }
}
