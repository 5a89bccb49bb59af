use super::FileWriter;
use crate::exceptions::Result;
use std::fs;
use std::path::Path;

/// Whole-file write, replacing any existing file
#[derive(Debug, Clone, Copy, Default)]
pub struct RawWriter;

impl FileWriter for RawWriter {
    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        fs::write(path, data)?;
        Ok(())
    }
}

/// Writes only bytes that parse as JSON; nothing is written otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonWriter;

impl FileWriter for JsonWriter {
    fn write(&self, path: &Path, data: &[u8]) -> Result<()> {
        serde_json::from_slice::<serde_json::Value>(data)?;
        fs::write(path, data)?;
        Ok(())
    }
}
