//! Resolves operation records into executable byte transforms

use super::params::{CalculationParams, CipherParams, CompressionParams};
use super::{OP_CALCULATE, OP_COMPRESS, OP_DECOMPRESS, OP_DECRYPT, OP_ENCRYPT, Operation, Params};
use crate::calculation;
use crate::compression;
use crate::encryption::{self, FileKeyLoader, KeyLoader};
use crate::exceptions::{FileprocError, Result};
use crate::logger::{Observer, field};
use std::collections::HashMap;
use std::sync::Arc;

/// One compiled pipeline step
pub type Step = Box<dyn Fn(&[u8]) -> Result<Vec<u8>> + Send + Sync>;

type StepCompiler = fn(&Dispatcher, &str, &Params) -> Result<Step>;

/// Operation name to compiler table plus the collaborators steps bind to
#[derive(Debug)]
pub struct Dispatcher {
    compilers: HashMap<&'static str, StepCompiler>,
    compression: compression::Registry,
    encryption: encryption::Registry,
    calculation: calculation::Registry,
    key_loader: Arc<dyn KeyLoader>,
    observer: Arc<dyn Observer>,
}

impl Dispatcher {
    /// Dispatcher over the built-in vocabulary, reading keys from disk
    pub fn new(observer: Arc<dyn Observer>) -> Self {
        let mut dispatcher = Dispatcher {
            compilers: HashMap::new(),
            compression: compression::Registry::builtin(),
            encryption: encryption::Registry::builtin(),
            calculation: calculation::Registry::builtin(),
            key_loader: Arc::new(FileKeyLoader),
            observer,
        };
        dispatcher.register(OP_COMPRESS, compile_compress);
        dispatcher.register(OP_DECOMPRESS, compile_decompress);
        dispatcher.register(OP_ENCRYPT, compile_encrypt);
        dispatcher.register(OP_DECRYPT, compile_decrypt);
        dispatcher.register(OP_CALCULATE, compile_calculate);
        dispatcher
    }

    pub fn with_key_loader(mut self, key_loader: Arc<dyn KeyLoader>) -> Self {
        self.key_loader = key_loader;
        self
    }

    pub(crate) fn register(&mut self, name: &'static str, compiler: StepCompiler) {
        self.compilers.insert(name, compiler);
    }

    pub fn knows(&self, name: &str) -> bool {
        self.compilers.contains_key(name)
    }

    /// Validate the record's parameters and bind its collaborator
    pub fn compile(&self, operation: &Operation) -> Result<Step> {
        let compiler = self
            .compilers
            .get(operation.name.as_str())
            .ok_or_else(|| FileprocError::UnknownOperation(operation.name.clone()))?;
        compiler(self, &operation.name, &operation.params)
    }

    fn observer_for(&self, name: &str) -> Arc<dyn Observer> {
        self.observer.with_fields(&[field("operation", name)])
    }

    fn load_key(&self, params: &CipherParams) -> Result<Vec<u8>> {
        let key = self.key_loader.load(&params.key_file)?;
        log::debug!(
            "🔑 Loaded {} key from {} ({} bytes)",
            params.kind,
            params.key_file.display(),
            key.len()
        );
        Ok(key)
    }
}

fn compile_compress(dispatcher: &Dispatcher, name: &str, params: &Params) -> Result<Step> {
    let params = CompressionParams::parse(name, params)?;
    let compressor = compression::with_logging_compressor(
        dispatcher.compression.compressor(params.kind)?,
        dispatcher.observer_for(name),
    );
    Ok(Box::new(move |data: &[u8]| compressor.compress(data)))
}

fn compile_decompress(dispatcher: &Dispatcher, name: &str, params: &Params) -> Result<Step> {
    let params = CompressionParams::parse(name, params)?;
    let decompressor = compression::with_logging_decompressor(
        dispatcher.compression.decompressor(params.kind)?,
        dispatcher.observer_for(name),
    );
    Ok(Box::new(move |data: &[u8]| decompressor.decompress(data)))
}

fn compile_encrypt(dispatcher: &Dispatcher, name: &str, params: &Params) -> Result<Step> {
    let params = CipherParams::parse(name, params)?;
    let key = dispatcher.load_key(&params)?;
    let encryptor = encryption::with_logging_encryptor(
        dispatcher.encryption.encryptor(params.kind)?,
        dispatcher.observer_for(name),
    );
    Ok(Box::new(move |data: &[u8]| encryptor.encrypt(data, &key)))
}

fn compile_decrypt(dispatcher: &Dispatcher, name: &str, params: &Params) -> Result<Step> {
    let params = CipherParams::parse(name, params)?;
    let key = dispatcher.load_key(&params)?;
    let decryptor = encryption::with_logging_decryptor(
        dispatcher.encryption.decryptor(params.kind)?,
        dispatcher.observer_for(name),
    );
    Ok(Box::new(move |data: &[u8]| decryptor.decrypt(data, &key)))
}

fn compile_calculate(dispatcher: &Dispatcher, name: &str, params: &Params) -> Result<Step> {
    let params = CalculationParams::parse(name, params)?;
    let calculator = calculation::with_logging(
        dispatcher.calculation.create(params.method)?,
        dispatcher.observer_for(name),
    );
    Ok(Box::new(move |data: &[u8]| {
        calculation::calculate_bytes(calculator.as_ref(), data)
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ErrorKind;
    use crate::logger::{MemoryObserver, NullObserver};
    use std::path::Path;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn dispatcher() -> Dispatcher {
        Dispatcher::new(Arc::new(NullObserver))
    }

    fn run(dispatcher: &Dispatcher, op: Operation, data: &[u8]) -> Result<Vec<u8>> {
        dispatcher.compile(&op)?(data)
    }

    /// Serves one fixed key and remembers which paths were asked for
    #[derive(Debug, Default)]
    struct FixedKeyLoader {
        key: Vec<u8>,
        requested: Mutex<Vec<String>>,
    }

    impl KeyLoader for FixedKeyLoader {
        fn load(&self, path: &Path) -> Result<Vec<u8>> {
            if let Ok(mut requested) = self.requested.lock() {
                requested.push(path.display().to_string());
            }
            Ok(self.key.clone())
        }
    }

    #[test]
    fn test_unknown_operation() {
        let err = dispatcher()
            .compile(&Operation::new("frobnicate", Params::new()))
            .err()
            .unwrap();
        assert!(matches!(err, FileprocError::UnknownOperation(ref name) if name == "frobnicate"));
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_missing_key_file_fails_at_compile_time() {
        let op = Operation::with_params(OP_ENCRYPT, [("type", "aes"), ("key_file", "/nonexistent")]);
        let err = dispatcher().compile(&op).err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    #[test]
    fn test_compress_round_trip_for_each_codec() {
        let dispatcher = dispatcher();
        for codec in ["gzip", "zip", "GZIP"] {
            let packed = run(
                &dispatcher,
                Operation::with_params(OP_COMPRESS, [("type", codec)]),
                b"payload payload payload",
            )
            .unwrap();
            let unpacked = run(
                &dispatcher,
                Operation::with_params(OP_DECOMPRESS, [("type", codec)]),
                &packed,
            )
            .unwrap();
            assert_eq!(unpacked, b"payload payload payload", "codec: {codec}");
        }
    }

    #[test]
    fn test_cipher_steps_use_the_key_loader() {
        let loader = Arc::new(FixedKeyLoader {
            key: vec![9u8; 32],
            ..Default::default()
        });
        let dispatcher = dispatcher().with_key_loader(loader.clone());

        let sealed = run(
            &dispatcher,
            Operation::with_params(OP_ENCRYPT, [("type", "aes"), ("key_file", "k1")]),
            b"secret",
        )
        .unwrap();
        let opened = run(
            &dispatcher,
            Operation::with_params(OP_DECRYPT, [("type", "aes"), ("key_file", "k1")]),
            &sealed,
        )
        .unwrap();

        assert_eq!(opened, b"secret");
        assert_eq!(*loader.requested.lock().unwrap(), vec!["k1", "k1"]);
    }

    #[test]
    fn test_cipher_steps_read_key_files_from_disk() {
        let temp_dir = TempDir::new().unwrap();
        let key_path = temp_dir.path().join("aes.key");
        std::fs::write(&key_path, [3u8; 16]).unwrap();
        let key_file = key_path.to_string_lossy().into_owned();

        let dispatcher = dispatcher();
        let sealed = run(
            &dispatcher,
            Operation::with_params(OP_ENCRYPT, [("type", "aes"), ("key_file", key_file.as_str())]),
            b"on disk",
        )
        .unwrap();
        let opened = run(
            &dispatcher,
            Operation::with_params(OP_DECRYPT, [("type", "aes"), ("key_file", key_file.as_str())]),
            &sealed,
        )
        .unwrap();
        assert_eq!(opened, b"on disk");
    }

    #[test]
    fn test_calculate_step() {
        let out = run(
            &dispatcher(),
            Operation::with_params(OP_CALCULATE, [("type", "parser")]),
            b"2 + 2 * 2\nhello",
        )
        .unwrap();
        assert_eq!(out, b"6\nhello");

        let out = run(
            &dispatcher(),
            Operation::with_params(OP_CALCULATE, [("type", "parser")]),
            b"2 + 2 * 2\nPreis: \x80",
        )
        .unwrap();
        assert_eq!(out, b"6\nPreis: \x80");
    }

    #[test]
    fn test_invalid_type_is_configuration_error() {
        let err = dispatcher()
            .compile(&Operation::with_params(OP_COMPRESS, [("type", "rar")]))
            .err()
            .unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn test_steps_log_with_operation_field() {
        let observer = MemoryObserver::new();
        let dispatcher = Dispatcher::new(Arc::new(observer.clone()));
        run(
            &dispatcher,
            Operation::with_params(OP_COMPRESS, [("type", "gzip")]),
            b"observed",
        )
        .unwrap();

        let events = observer.events();
        assert!(!events.is_empty());
        assert!(events.iter().all(|e| e.field("operation") == Some("compress")));
    }
}
