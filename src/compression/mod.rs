//! Compression collaborators: gzip and single-entry zip

pub mod archive;
pub mod gzip;
pub mod logging;

pub use archive::{ZipCompressor, ZipDecompressor};
pub use gzip::{GzipCompressor, GzipDecompressor};
pub use logging::{with_logging_compressor, with_logging_decompressor};

use crate::exceptions::{FileprocError, Result};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Supported codecs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionType {
    Gzip,
    Zip,
}

impl fmt::Display for CompressionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompressionType::Gzip => write!(f, "gzip"),
            CompressionType::Zip => write!(f, "zip"),
        }
    }
}

impl FromStr for CompressionType {
    type Err = FileprocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gzip" => Ok(CompressionType::Gzip),
            "zip" => Ok(CompressionType::Zip),
            _ => Err(FileprocError::Config(format!(
                "unknown compression type: {s}"
            ))),
        }
    }
}

pub trait Compressor: fmt::Debug + Send + Sync {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub trait Decompressor: fmt::Debug + Send + Sync {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>>;
}

pub type CompressorFactory = fn() -> Box<dyn Compressor>;
pub type DecompressorFactory = fn() -> Box<dyn Decompressor>;

/// Codec to constructor table, built once
#[derive(Debug, Clone)]
pub struct Registry {
    compressors: HashMap<CompressionType, CompressorFactory>,
    decompressors: HashMap<CompressionType, DecompressorFactory>,
}

impl Registry {
    pub fn builtin() -> Self {
        let mut registry = Registry {
            compressors: HashMap::new(),
            decompressors: HashMap::new(),
        };
        registry.register(CompressionType::Gzip, gzip_compressor, gzip_decompressor);
        registry.register(CompressionType::Zip, zip_compressor, zip_decompressor);
        registry
    }

    pub fn register(
        &mut self,
        kind: CompressionType,
        compressor: CompressorFactory,
        decompressor: DecompressorFactory,
    ) {
        self.compressors.insert(kind, compressor);
        self.decompressors.insert(kind, decompressor);
    }

    pub fn compressor(&self, kind: CompressionType) -> Result<Box<dyn Compressor>> {
        self.compressors
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| FileprocError::Config(format!("no compressor registered for {kind}")))
    }

    pub fn decompressor(&self, kind: CompressionType) -> Result<Box<dyn Decompressor>> {
        self.decompressors
            .get(&kind)
            .map(|factory| factory())
            .ok_or_else(|| FileprocError::Config(format!("no decompressor registered for {kind}")))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn gzip_compressor() -> Box<dyn Compressor> {
    Box::new(GzipCompressor)
}

fn gzip_decompressor() -> Box<dyn Decompressor> {
    Box::new(GzipDecompressor)
}

fn zip_compressor() -> Box<dyn Compressor> {
    Box::new(ZipCompressor)
}

fn zip_decompressor() -> Box<dyn Decompressor> {
    Box::new(ZipDecompressor)
}
