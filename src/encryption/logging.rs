//! Logging middleware for ciphers. Key material is never logged, only its length.

use super::{Decryptor, Encryptor};
use crate::exceptions::Result;
use crate::logger::{Observer, field};
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug)]
pub struct LoggingEncryptor {
    inner: Box<dyn Encryptor>,
    observer: Arc<dyn Observer>,
}

pub fn with_logging_encryptor(
    inner: Box<dyn Encryptor>,
    observer: Arc<dyn Observer>,
) -> Box<dyn Encryptor> {
    Box::new(LoggingEncryptor { inner, observer })
}

impl Encryptor for LoggingEncryptor {
    fn encrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let log = self.observer.with_fields(&[
            field("input_size", data.len()),
            field("key_size", key.len()),
        ]);
        log.info("Starting encryption");

        let begin = Instant::now();
        let result = self.inner.encrypt(data, key);
        match &result {
            Ok(output) => log
                .with_fields(&[
                    field("duration", format!("{:?}", begin.elapsed())),
                    field("output_size", output.len()),
                ])
                .info("Encryption finished"),
            Err(e) => log.with_fields(&[field("error", e)]).error("Encryption failed"),
        }
        result
    }
}

#[derive(Debug)]
pub struct LoggingDecryptor {
    inner: Box<dyn Decryptor>,
    observer: Arc<dyn Observer>,
}

pub fn with_logging_decryptor(
    inner: Box<dyn Decryptor>,
    observer: Arc<dyn Observer>,
) -> Box<dyn Decryptor> {
    Box::new(LoggingDecryptor { inner, observer })
}

impl Decryptor for LoggingDecryptor {
    fn decrypt(&self, data: &[u8], key: &[u8]) -> Result<Vec<u8>> {
        let log = self.observer.with_fields(&[
            field("input_size", data.len()),
            field("key_size", key.len()),
        ]);
        log.info("Starting decryption");

        let begin = Instant::now();
        let result = self.inner.decrypt(data, key);
        match &result {
            Ok(output) => log
                .with_fields(&[
                    field("duration", format!("{:?}", begin.elapsed())),
                    field("output_size", output.len()),
                ])
                .info("Decryption finished"),
            Err(e) => log.with_fields(&[field("error", e)]).error("Decryption failed"),
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::{AesDecryptor, AesEncryptor};
    use crate::logger::MemoryObserver;
    use log::Level;

    #[test]
    fn test_round_trip_is_logged() {
        let observer = MemoryObserver::new();
        let shared: Arc<dyn Observer> = Arc::new(observer.clone());
        let encryptor = with_logging_encryptor(Box::new(AesEncryptor), shared.clone());
        let decryptor = with_logging_decryptor(Box::new(AesDecryptor), shared);

        let key = [1u8; 16];
        let sealed = encryptor.encrypt(b"logged", &key).unwrap();
        assert_eq!(decryptor.decrypt(&sealed, &key).unwrap(), b"logged");

        assert_eq!(
            observer.messages(),
            vec![
                "Starting encryption",
                "Encryption finished",
                "Starting decryption",
                "Decryption finished"
            ]
        );
        assert_eq!(observer.events()[0].field("key_size"), Some("16"));
    }

    #[test]
    fn test_bad_key_is_logged_as_error() {
        let observer = MemoryObserver::new();
        let encryptor = with_logging_encryptor(Box::new(AesEncryptor), Arc::new(observer.clone()));

        assert!(encryptor.encrypt(b"data", b"short").is_err());
        let events = observer.events();
        assert_eq!(events[1].level, Level::Error);
        assert_eq!(events[1].message, "Encryption failed");
    }
}
