use super::FileReader;
use crate::exceptions::Result;
use std::fs;
use std::path::Path;

/// Whole-file read, no interpretation
#[derive(Debug, Clone, Copy, Default)]
pub struct RawReader;

impl FileReader for RawReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        Ok(fs::read(path)?)
    }
}

/// Whole-file read that rejects anything that is not JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl FileReader for JsonReader {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        let data = fs::read(path)?;
        serde_json::from_slice::<serde_json::Value>(&data)?;
        Ok(data)
    }
}
