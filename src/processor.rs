//! Loaded data plus the pipeline being assembled for it

use crate::exceptions::{FileprocError, Result};
use crate::fileio::{self, with_logging_reader, with_logging_writer};
use crate::logger::{Observer, field};
use crate::pipeline::{Dispatcher, Executor, Operation, Params, PipelineBuilder};
use std::path::Path;
use std::sync::Arc;

/// Holds the original bytes and the pipeline; every run starts from a fresh
/// copy of the original, so processing is repeatable.
#[derive(Debug)]
pub struct FileProcessor {
    original: Option<Vec<u8>>,
    builder: PipelineBuilder,
    executor: Executor,
    observer: Arc<dyn Observer>,
}

impl FileProcessor {
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&observer));
        Self::with_dispatcher(dispatcher, observer)
    }

    pub fn with_dispatcher(dispatcher: Dispatcher, observer: Arc<dyn Observer>) -> Self {
        FileProcessor {
            original: None,
            builder: PipelineBuilder::new(),
            executor: Executor::new(dispatcher, Arc::clone(&observer)),
            observer,
        }
    }

    /// Read `path` with the reader for its type. The pipeline is cleared first.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        self.builder.reset();
        self.observer.debug("Pipeline builder reset");

        let reader = with_logging_reader(fileio::reader_for(path), Arc::clone(&self.observer));
        let data = reader.read(path)?;
        self.observer
            .with_fields(&[field("path", path.display()), field("size", data.len())])
            .info("File loaded successfully");
        self.original = Some(data);
        Ok(())
    }

    /// Use `data` as the original buffer; the pipeline is kept
    pub fn load_bytes(&mut self, data: Vec<u8>) {
        self.original = Some(data);
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.original.as_deref()
    }

    /// Append a step. Parameters are checked only when the pipeline runs.
    pub fn apply(&mut self, name: &str, params: Params) {
        let log = self
            .observer
            .with_fields(&[field("operation", name), field("params", format!("{params:?}"))]);
        if !self.executor.dispatcher().knows(name) {
            log.warn("Unknown operation, the pipeline will fail when processed");
        }
        log.info("Step added to pipeline");
        self.builder.add(Operation::new(name, params));
    }

    pub fn pipeline(&self) -> &PipelineBuilder {
        &self.builder
    }

    /// Run the pipeline over a copy of the loaded data
    pub fn process(&self) -> Result<Vec<u8>> {
        let Some(original) = self.original.as_deref() else {
            self.observer.warn("Process called with no data loaded");
            return Err(FileprocError::NoData);
        };
        self.executor.run(self.builder.operations(), original)
    }

    /// Run the pipeline and write the result. Nothing is written if a step fails.
    pub fn process_file(&self, path: &Path) -> Result<()> {
        let output = self.process()?;
        let writer = with_logging_writer(fileio::writer_for(path), Arc::clone(&self.observer));
        writer.write(path, &output)?;
        self.observer
            .with_fields(&[field("path", path.display())])
            .info("File processed and saved successfully");
        Ok(())
    }

    pub fn save_pipeline(&self, path: &Path) -> Result<()> {
        let log = self.observer.with_fields(&[field("path", path.display())]);
        match self.builder.save_to_file(path) {
            Ok(()) => {
                log.info("Pipeline saved successfully");
                Ok(())
            }
            Err(e) => {
                log.with_fields(&[field("error", &e)]).error("Failed to save pipeline");
                Err(e)
            }
        }
    }

    /// Replace the current pipeline with the one stored at `path`
    pub fn load_pipeline(&mut self, path: &Path) -> Result<()> {
        let log = self.observer.with_fields(&[field("path", path.display())]);
        self.builder.reset();
        match self.builder.load_from_file(path) {
            Ok(()) => {
                log.with_fields(&[field("steps", self.builder.len())])
                    .info("Pipeline loaded successfully");
                Ok(())
            }
            Err(e) => {
                log.with_fields(&[field("error", &e)]).error("Failed to load pipeline");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encryption::{EncryptionType, generate_key};
    use crate::exceptions::ErrorKind;
    use crate::logger::NullObserver;
    use std::fs;
    use tempfile::TempDir;

    fn processor() -> FileProcessor {
        FileProcessor::new(Arc::new(NullObserver))
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_process_file_twice_is_identical() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.txt");
        fs::write(&input, "2 + 2 * 2\n(2 + 2) * 2\n").unwrap();

        let mut processor = processor();
        processor.load(&input).unwrap();
        processor.apply("calculate", params(&[("type", "parser")]));
        processor.apply("compress", params(&[("type", "gzip")]));

        let first = temp_dir.path().join("first.gz");
        let second = temp_dir.path().join("second.gz");
        processor.process_file(&first).unwrap();
        processor.process_file(&second).unwrap();
        assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());

        processor.apply("decompress", params(&[("type", "gzip")]));
        assert_eq!(processor.process().unwrap(), b"6\n8\n");
    }

    #[test]
    fn test_missing_key_file_writes_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.bin");

        let mut processor = processor();
        processor.load_bytes(b"secret".to_vec());
        processor.apply("encrypt", params(&[("type", "aes"), ("key_file", "/nonexistent")]));

        let err = processor.process_file(&output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(!output.exists());
    }

    #[test]
    fn test_unknown_operation_names_step() {
        let mut processor = processor();
        processor.load_bytes(b"1 + 1".to_vec());
        processor.apply("frobnicate", Params::new());

        let err = processor.process().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        let message = err.to_string();
        assert!(message.contains("step 1"));
        assert!(message.contains("frobnicate"));
    }

    #[test]
    fn test_process_without_data() {
        let err = processor().process().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::State);
    }

    #[test]
    fn test_load_resets_pipeline() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("input.txt");
        fs::write(&input, "x").unwrap();

        let mut processor = processor();
        processor.apply("compress", params(&[("type", "zip")]));
        processor.load(&input).unwrap();
        assert!(processor.pipeline().is_empty());
        assert_eq!(processor.data(), Some(&b"x"[..]));
    }

    #[test]
    fn test_saved_pipeline_restores_into_fresh_processor() {
        let temp_dir = TempDir::new().unwrap();
        let key = temp_dir.path().join("aes.key");
        generate_key(EncryptionType::Aes, &key, 2048).unwrap();
        let key_file = key.to_string_lossy().into_owned();
        let pipeline = temp_dir.path().join("pipeline.json");

        let mut original = processor();
        original.apply("calculate", params(&[("type", "regex")]));
        original.apply("encrypt", params(&[("type", "aes"), ("key_file", key_file.as_str())]));
        original.apply("decrypt", params(&[("type", "aes"), ("key_file", key_file.as_str())]));
        original.save_pipeline(&pipeline).unwrap();

        let mut restored = processor();
        restored.apply("frobnicate", Params::new());
        restored.load_pipeline(&pipeline).unwrap();
        assert_eq!(restored.pipeline(), original.pipeline());

        restored.load_bytes(b"hello 3 * 5 world".to_vec());
        assert_eq!(restored.process().unwrap(), b"hello 15 world");
    }

    #[test]
    fn test_json_output_is_validated() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("out.json");

        let mut processor = processor();
        processor.load_bytes(br#"{"total": "3 * 4"}"#.to_vec());
        processor.apply("calculate", params(&[("type", "regex")]));
        processor.process_file(&output).unwrap();
        assert_eq!(fs::read_to_string(&output).unwrap(), r#"{"total": "12"}"#);

        processor.apply("compress", params(&[("type", "gzip")]));
        let err = processor.process_file(&output).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }
}
