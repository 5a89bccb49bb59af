//! Gzip codec backed by flate2

use super::{Compressor, Decompressor};
use crate::exceptions::{FileprocError, Result};
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use std::io::{Read, Write};

#[derive(Debug, Clone, Copy, Default)]
pub struct GzipCompressor;

impl Compressor for GzipCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(data)
            .map_err(|e| FileprocError::Compression(format!("gzip write failed: {e}")))?;
        encoder
            .finish()
            .map_err(|e| FileprocError::Compression(format!("gzip finish failed: {e}")))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GzipDecompressor;

impl Decompressor for GzipDecompressor {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut output = Vec::new();
        decoder
            .read_to_end(&mut output)
            .map_err(|e| FileprocError::Compression(format!("gzip decode failed: {e}")))?;
        Ok(output)
    }
}
