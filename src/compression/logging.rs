//! Logging middleware for codecs

use super::{Compressor, Decompressor};
use crate::exceptions::Result;
use crate::logger::{Observer, field};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct LoggingCompressor {
    inner: Box<dyn Compressor>,
    observer: Arc<dyn Observer>,
}

pub fn with_logging_compressor(
    inner: Box<dyn Compressor>,
    observer: Arc<dyn Observer>,
) -> Box<dyn Compressor> {
    Box::new(LoggingCompressor { inner, observer })
}

impl Compressor for LoggingCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let log = self.observer.with_fields(&[field("input_size", data.len())]);
        log.info("Starting compression");

        let begin = Instant::now();
        let result = self.inner.compress(data);
        match &result {
            Ok(output) => {
                let ratio = if data.is_empty() {
                    0.0
                } else {
                    output.len() as f64 / data.len() as f64
                };
                log.with_fields(&[
                    field("duration", format!("{:?}", begin.elapsed())),
                    field("output_size", output.len()),
                    field("ratio", format!("{ratio:.3}")),
                ])
                .info("Compression finished");
            }
            Err(e) => log.with_fields(&[field("error", e)]).error("Compression failed"),
        }
        result
    }
}

#[derive(Debug)]
pub struct LoggingDecompressor {
    inner: Box<dyn Decompressor>,
    observer: Arc<dyn Observer>,
}

pub fn with_logging_decompressor(
    inner: Box<dyn Decompressor>,
    observer: Arc<dyn Observer>,
) -> Box<dyn Decompressor> {
    Box::new(LoggingDecompressor { inner, observer })
}

impl Decompressor for LoggingDecompressor {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let log = self.observer.with_fields(&[field("input_size", data.len())]);
        log.info("Starting decompression");

        let begin = Instant::now();
        let result = self.inner.decompress(data);
        match &result {
            Ok(output) => log
                .with_fields(&[
                    field("duration", format!("{:?}", begin.elapsed())),
                    field("output_size", output.len()),
                ])
                .info("Decompression finished"),
            Err(e) => log
                .with_fields(&[field("error", e)])
                .error("Decompression failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compression::{GzipCompressor, GzipDecompressor};
    use crate::logger::MemoryObserver;
    use log::Level;

    #[test]
    fn test_compressor_reports_ratio() {
        let observer = MemoryObserver::new();
        let compressor = with_logging_compressor(Box::new(GzipCompressor), Arc::new(observer.clone()));

        compressor.compress(&[b'a'; 512]).unwrap();

        let events = observer.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].message, "Compression finished");
        assert_eq!(events[1].field("input_size"), Some("512"));
        assert!(events[1].field("ratio").is_some());
    }

    #[test]
    fn test_decompressor_reports_failure() {
        let observer = MemoryObserver::new();
        let decompressor =
            with_logging_decompressor(Box::new(GzipDecompressor), Arc::new(observer.clone()));

        assert!(decompressor.decompress(b"junk").is_err());

        let events = observer.events();
        assert_eq!(events[1].level, Level::Error);
        assert_eq!(events[1].message, "Decompression failed");
        assert!(events[1].field("error").is_some());
    }

    #[test]
    fn test_decorators_stack() {
        let outer = MemoryObserver::new();
        let inner = MemoryObserver::new();
        let compressor = with_logging_compressor(
            with_logging_compressor(Box::new(GzipCompressor), Arc::new(inner.clone())),
            Arc::new(outer.clone()),
        );

        compressor.compress(b"stacked").unwrap();

        assert_eq!(outer.events().len(), 2);
        assert_eq!(inner.events().len(), 2);
    }
}
