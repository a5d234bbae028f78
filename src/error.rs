//! Error handling for the template patcher.
//! Defines custom error types and results used throughout the application.

use std::io;
use thiserror::Error;

/// Custom error types for patcher operations.
///
/// Every variant is fatal for the CI job: nothing in this crate retries or
/// recovers locally.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] io::Error),

    /// Malformed template configuration, workflow definition or glob pattern
    #[error("Configuration error: {0}.")]
    ConfigParseError(String),

    /// An expected file or directory is missing
    #[error("Path '{path}' does not exist.")]
    NotFoundError { path: String },

    /// A workflow step exited with a non-zero status
    #[error("Step '{step}' failed with exit code {code}.")]
    ExternalToolError { step: String, code: i32 },

    /// Invalid job selection or step definition
    #[error("Workflow error: {0}.")]
    WorkflowError(String),

    /// Represents errors that occur while rendering the build descriptor
    #[error("Template rendering error: {0}.")]
    MinijinjaError(#[from] minijinja::Error),

    /// Represents errors that occur during git operations
    #[error("Git error: {0}.")]
    Git2Error(#[from] git2::Error),

    #[error("Checkout destination '{dest}' already exists. Use --force to replace it.")]
    CheckoutDestinationExists { dest: String },
}

/// Convenience type alias for Results with Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Builds a `NotFoundError` for the given path.
    pub fn not_found<P: AsRef<std::path::Path>>(path: P) -> Self {
        Error::NotFoundError { path: path.as_ref().display().to_string() }
    }
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
