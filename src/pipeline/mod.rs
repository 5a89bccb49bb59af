//! Operation records, the pipeline builder and its JSON persistence
//!
//! A pipeline is an ordered list of [`Operation`] records. Records are
//! accepted without validation; the [`Dispatcher`] resolves each one into an
//! executable step only when the pipeline runs.

pub mod dispatcher;
pub mod executor;
pub mod params;

pub use dispatcher::{Dispatcher, Step};
pub use executor::Executor;

use crate::exceptions::Result;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Operation names understood by the dispatcher
pub const OP_COMPRESS: &str = "compress";
pub const OP_DECOMPRESS: &str = "decompress";
pub const OP_ENCRYPT: &str = "encrypt";
pub const OP_DECRYPT: &str = "decrypt";
pub const OP_CALCULATE: &str = "calculate";

pub const OPERATIONS: [&str; 5] = [
    OP_COMPRESS,
    OP_DECOMPRESS,
    OP_ENCRYPT,
    OP_DECRYPT,
    OP_CALCULATE,
];

/// String-keyed parameters of one record
pub type Params = BTreeMap<String, String>;

/// One named, parameterized step; the unit of persistence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub name: String,
    #[serde(default, deserialize_with = "nullable_params")]
    pub params: Params,
}

/// `"params": null` reads as an empty map
fn nullable_params<'de, D>(deserializer: D) -> std::result::Result<Params, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Params>::deserialize(deserializer)?.unwrap_or_default())
}

impl Operation {
    pub fn new(name: impl Into<String>, params: Params) -> Self {
        Operation {
            name: name.into(),
            params,
        }
    }

    /// Build a record from `(key, value)` pairs
    pub fn with_params<K, V>(name: impl Into<String>, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Operation::new(
            name,
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Ordered, mutable sequence of operation records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipelineBuilder {
    operations: Vec<Operation>,
}

impl PipelineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the end. No validation happens here.
    pub fn add(&mut self, operation: Operation) {
        self.operations.push(operation);
    }

    pub fn reset(&mut self) {
        self.operations.clear();
    }

    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Write the sequence as an indented JSON array
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.operations)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Replace the in-memory sequence with the array stored at `path`.
    /// A `null` document reads as an empty pipeline.
    pub fn load_from_file(&mut self, path: &Path) -> Result<()> {
        let data = fs::read(path)?;
        self.operations =
            serde_json::from_slice::<Option<Vec<Operation>>>(&data)?.unwrap_or_default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exceptions::ErrorKind;
    use tempfile::TempDir;

    fn sample() -> PipelineBuilder {
        let mut builder = PipelineBuilder::new();
        builder.add(Operation::with_params(OP_CALCULATE, [("type", "parser")]));
        builder.add(Operation::with_params(OP_COMPRESS, [("type", "gzip")]));
        builder.add(Operation::with_params(
            OP_ENCRYPT,
            [("type", "aes"), ("key_file", "/tmp/aes.key")],
        ));
        builder
    }

    #[test]
    fn test_save_then_load_reproduces_sequence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pipeline.json");

        let original = sample();
        original.save_to_file(&path).unwrap();

        let mut restored = PipelineBuilder::new();
        restored.load_from_file(&path).unwrap();
        assert_eq!(restored, original);

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("[\n  {"));
        assert!(text.contains("\"name\": \"calculate\""));
    }

    #[test]
    fn test_load_replaces_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pipeline.json");
        fs::write(&path, r#"[{"name": "decompress", "params": {"type": "zip"}}]"#).unwrap();

        let mut builder = sample();
        builder.load_from_file(&path).unwrap();
        assert_eq!(builder.len(), 1);
        assert_eq!(builder.operations()[0].name, OP_DECOMPRESS);
    }

    #[test]
    fn test_null_or_missing_params_read_as_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pipeline.json");
        fs::write(&path, r#"[{"name": "a", "params": null}, {"name": "b"}]"#).unwrap();

        let mut builder = PipelineBuilder::new();
        builder.load_from_file(&path).unwrap();
        assert!(builder.operations().iter().all(|op| op.params.is_empty()));
    }

    #[test]
    fn test_null_document_is_empty_pipeline() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pipeline.json");
        fs::write(&path, "null").unwrap();

        let mut builder = sample();
        builder.load_from_file(&path).unwrap();
        assert!(builder.is_empty());
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().unwrap();
        let mut builder = PipelineBuilder::new();

        let err = builder
            .load_from_file(&temp_dir.path().join("missing.json"))
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);

        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "[{\"name\": ").unwrap();
        let err = builder.load_from_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
    }

    #[test]
    fn test_reset_and_unvalidated_add() {
        let mut builder = PipelineBuilder::new();
        builder.add(Operation::new("frobnicate", Params::new()));
        assert_eq!(builder.len(), 1);
        builder.reset();
        assert!(builder.is_empty());
    }
}
