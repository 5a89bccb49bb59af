//! Zip codec: the buffer travels as a single entry named `data`

use super::{Compressor, Decompressor};
use crate::exceptions::{FileprocError, Result};
use std::io::{Cursor, Read, Write};
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// Name of the only entry written into the archive
pub const ENTRY_NAME: &str = "data";

fn zip_error(context: &str, err: impl std::fmt::Display) -> FileprocError {
    FileprocError::Compression(format!("{context}: {err}"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ZipCompressor;

impl Compressor for ZipCompressor {
    fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file(ENTRY_NAME, SimpleFileOptions::default())
            .map_err(|e| zip_error("zip entry failed", e))?;
        writer
            .write_all(data)
            .map_err(|e| zip_error("zip write failed", e))?;
        let cursor = writer
            .finish()
            .map_err(|e| zip_error("zip finish failed", e))?;
        Ok(cursor.into_inner())
    }
}

/// Extracts the first entry, whatever its name
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipDecompressor;

impl Decompressor for ZipDecompressor {
    fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let mut archive =
            ZipArchive::new(Cursor::new(data)).map_err(|e| zip_error("invalid zip archive", e))?;
        if archive.len() == 0 {
            return Err(FileprocError::Compression(
                "no files in zip archive".to_string(),
            ));
        }
        let mut entry = archive
            .by_index(0)
            .map_err(|e| zip_error("zip entry error", e))?;
        let mut output = Vec::new();
        entry
            .read_to_end(&mut output)
            .map_err(|e| zip_error("zip read failed", e))?;
        Ok(output)
    }
}
