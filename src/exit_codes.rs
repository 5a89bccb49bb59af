//! Standard exit codes for the fileproc binary
//!
//! Every [`ErrorKind`] maps to one code so scripts can tell a bad pipeline
//! from a missing file without parsing messages.

use crate::exceptions::{ErrorKind, FileprocError};

/// Successful execution
pub const EXIT_SUCCESS: i32 = 0;

/// Generic error (avoid using - be more specific)
pub const EXIT_ERROR: i32 = 1;

/// Panic or unrecoverable error
pub const EXIT_PANIC: i32 = 101;

/// Invalid command-line arguments
pub const EXIT_INVALID_ARGS: i32 = 105;

/// I/O error (file not found, permission denied, disk error)
pub const EXIT_IO_ERROR: i32 = 106;

/// Cipher or key failure
pub const EXIT_CRYPTO_ERROR: i32 = 107;

/// Compression codec failure
pub const EXIT_CODEC_ERROR: i32 = 108;

/// Configuration error (unknown operation, unknown type, missing parameter)
pub const EXIT_CONFIG_ERROR: i32 = 109;

/// Malformed JSON or non-UTF-8 text
pub const EXIT_DECODE_ERROR: i32 = 111;

/// Expression evaluation failure
pub const EXIT_CALCULATION_ERROR: i32 = 112;

/// Operation requested in the wrong state (nothing loaded)
pub const EXIT_STATE_ERROR: i32 = 113;

/// Exit code for a failed run
pub fn exit_code_for(err: &FileprocError) -> i32 {
    match err.kind() {
        ErrorKind::Configuration => EXIT_CONFIG_ERROR,
        ErrorKind::Structural | ErrorKind::Arithmetic => EXIT_CALCULATION_ERROR,
        ErrorKind::Io => EXIT_IO_ERROR,
        ErrorKind::Decode => EXIT_DECODE_ERROR,
        ErrorKind::Codec => EXIT_CODEC_ERROR,
        ErrorKind::Crypto => EXIT_CRYPTO_ERROR,
        ErrorKind::State => EXIT_STATE_ERROR,
        ErrorKind::Other => EXIT_ERROR,
    }
}
