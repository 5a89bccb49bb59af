//! fileproc - pipeline-driven file transformation
//!
//! Load a buffer, assemble an ordered pipeline of named operations
//! (compress, decompress, encrypt, decrypt, calculate), run it, and write the
//! result. Pipelines persist as JSON so they can be replayed.

// Enforce strict code quality and reliability
#![deny(
    // Safety
    unsafe_code,

    // Correctness
    missing_debug_implementations,

    // Future compatibility
    future_incompatible,

    // Rust 2018 idioms
    rust_2018_idioms,
)]
#![warn(
    // Error handling best practices
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::unimplemented,
    clippy::todo,

    // Performance
    clippy::inefficient_to_string,
    clippy::large_enum_variant,

    // Code clarity and maintainability
    clippy::cognitive_complexity,
    clippy::type_complexity,

    // Best practices
    clippy::clone_on_ref_ptr,
    clippy::wildcard_imports,
    clippy::enum_glob_use,
    clippy::if_not_else,
    clippy::needless_continue,
    clippy::explicit_iter_loop,
    clippy::explicit_into_iter_loop,
)]
#![cfg_attr(
    test,
    allow(clippy::unwrap_used, clippy::expect_used, clippy::panic, clippy::clone_on_ref_ptr)
)]

pub mod api;
pub mod arithmetic;
pub mod calculation;
pub mod compression;
pub mod config;
pub mod encryption;
pub mod exceptions;
pub mod exit_codes;
pub mod fileio;
pub mod logger;
pub mod pipeline;
pub mod processor;
pub mod shell;
pub mod version;

// Re-export main API
pub use api::{calculate_file, run_pipeline_file};
pub use calculation::{CalculationMethod, Calculator, new_calculator};
pub use config::Config;
pub use exceptions::{ErrorKind, FileprocError, Result};
pub use logger::{LogObserver, MemoryObserver, NullObserver, Observer};
pub use pipeline::{Operation, PipelineBuilder};
pub use processor::FileProcessor;
