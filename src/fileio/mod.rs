//! File readers and writers selected by extension

pub mod logging;
pub mod reader;
pub mod writer;

pub use logging::{with_logging_reader, with_logging_writer};
pub use reader::{JsonReader, RawReader};
pub use writer::{JsonWriter, RawWriter};

use crate::exceptions::Result;
use std::fmt;
use std::path::Path;

/// Format family of a file, from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileType {
    Text,
    Json,
    Xml,
    Yaml,
    Html,
    /// Unknown or missing extension
    Binary,
}

impl FileType {
    pub fn from_path(path: &Path) -> FileType {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match ext.as_deref() {
            Some("txt") | Some("text") => FileType::Text,
            Some("json") => FileType::Json,
            Some("xml") => FileType::Xml,
            Some("yaml") | Some("yml") => FileType::Yaml,
            Some("html") | Some("htm") => FileType::Html,
            _ => FileType::Binary,
        }
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FileType::Text => "text",
            FileType::Json => "json",
            FileType::Xml => "xml",
            FileType::Yaml => "yaml",
            FileType::Html => "html",
            FileType::Binary => "binary",
        };
        f.write_str(name)
    }
}

pub trait FileReader: fmt::Debug + Send + Sync {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
}

pub trait FileWriter: fmt::Debug + Send + Sync {
    fn write(&self, path: &Path, data: &[u8]) -> Result<()>;
}

pub fn new_reader(file_type: FileType) -> Box<dyn FileReader> {
    match file_type {
        FileType::Json => Box::new(JsonReader),
        _ => Box::new(RawReader),
    }
}

pub fn new_writer(file_type: FileType) -> Box<dyn FileWriter> {
    match file_type {
        FileType::Json => Box::new(JsonWriter),
        _ => Box::new(RawWriter),
    }
}

/// Reader for `path`'s type
pub fn reader_for(path: &Path) -> Box<dyn FileReader> {
    new_reader(FileType::from_path(path))
}

/// Writer for `path`'s type
pub fn writer_for(path: &Path) -> Box<dyn FileWriter> {
    new_writer(FileType::from_path(path))
}
