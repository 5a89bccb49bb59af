//! Error types for fileproc

use crate::arithmetic::CalcError;
use std::fmt;
use std::path::PathBuf;

/// Main error type for fileproc operations
#[derive(Debug)]
pub enum FileprocError {
    /// Operation name outside the known vocabulary
    UnknownOperation(String),

    /// Missing or invalid parameter, unknown enum value
    Config(String),

    /// IO error
    IoError(std::io::Error),

    /// Key file could not be read
    KeyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// JSON parsing error
    JsonError(serde_json::Error),

    /// Compression or decompression failed
    Compression(String),

    /// Encryption, decryption or key handling failed
    Encryption(String),

    /// Expression evaluation failed
    Calculation(CalcError),

    /// Processing was requested before any data was loaded
    NoData,

    /// A pipeline step failed; `index` is 1-based
    Step {
        index: usize,
        name: String,
        source: Box<FileprocError>,
    },

    /// Generic error with message
    Generic(String),
}

/// Coarse classification of a [`FileprocError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Unknown operation, unknown type value, missing parameter
    Configuration,
    /// Mismatched parentheses, malformed postfix
    Structural,
    /// Division by zero, overflow
    Arithmetic,
    /// Filesystem failures, including key files
    Io,
    /// Malformed JSON
    Decode,
    /// Compression codec failures
    Codec,
    /// Cipher and key failures
    Crypto,
    /// Calling an operation in the wrong state
    State,
    Other,
}

impl FileprocError {
    /// Wrap an error with the pipeline step it came from
    pub fn step(index: usize, name: &str, source: FileprocError) -> Self {
        FileprocError::Step {
            index,
            name: name.to_string(),
            source: Box::new(source),
        }
    }

    /// Classify the error; step errors report the kind of their cause
    pub fn kind(&self) -> ErrorKind {
        match self {
            FileprocError::UnknownOperation(_) | FileprocError::Config(_) => ErrorKind::Configuration,
            FileprocError::IoError(_) | FileprocError::KeyFile { .. } => ErrorKind::Io,
            FileprocError::JsonError(_) => ErrorKind::Decode,
            FileprocError::Compression(_) => ErrorKind::Codec,
            FileprocError::Encryption(_) => ErrorKind::Crypto,
            FileprocError::Calculation(err) => match err {
                CalcError::DivisionByZero | CalcError::Overflow => ErrorKind::Arithmetic,
                _ => ErrorKind::Structural,
            },
            FileprocError::NoData => ErrorKind::State,
            FileprocError::Step { source, .. } => source.kind(),
            FileprocError::Generic(_) => ErrorKind::Other,
        }
    }
}

impl fmt::Display for FileprocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileprocError::UnknownOperation(name) => write!(f, "unknown operation: {name}"),
            FileprocError::Config(msg) => write!(f, "Configuration error: {msg}"),
            FileprocError::IoError(err) => write!(f, "IO error: {err}"),
            FileprocError::KeyFile { path, source } => {
                write!(f, "failed to read key file {}: {source}", path.display())
            }
            FileprocError::JsonError(err) => write!(f, "JSON error: {err}"),
            FileprocError::Compression(msg) => write!(f, "Compression error: {msg}"),
            FileprocError::Encryption(msg) => write!(f, "Encryption error: {msg}"),
            FileprocError::Calculation(err) => write!(f, "Calculation error: {err}"),
            FileprocError::NoData => write!(f, "no data loaded to process"),
            FileprocError::Step {
                index,
                name,
                source,
            } => write!(f, "error processing step {index} '{name}': {source}"),
            FileprocError::Generic(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for FileprocError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FileprocError::IoError(err) => Some(err),
            FileprocError::KeyFile { source, .. } => Some(source),
            FileprocError::JsonError(err) => Some(err),
            FileprocError::Calculation(err) => Some(err),
            FileprocError::Step { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FileprocError {
    fn from(err: std::io::Error) -> Self {
        FileprocError::IoError(err)
    }
}

impl From<serde_json::Error> for FileprocError {
    fn from(err: serde_json::Error) -> Self {
        FileprocError::JsonError(err)
    }
}

impl From<CalcError> for FileprocError {
    fn from(err: CalcError) -> Self {
        FileprocError::Calculation(err)
    }
}

impl From<anyhow::Error> for FileprocError {
    fn from(err: anyhow::Error) -> Self {
        FileprocError::Generic(err.to_string())
    }
}

/// Result type for fileproc operations
pub type Result<T> = std::result::Result<T, FileprocError>;
