//! Error handling for forgekit.
//! Defines custom error types and results used throughout the application.

use std::path::PathBuf;
use thiserror::Error;

/// Custom error types for forgekit operations.
///
/// An output directory that already exists is not represented here: the
/// server bundle reports it as a skipped creation instead.
#[derive(Error, Debug)]
pub enum Error {
    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    /// The template file is absent at the resolved template path.
    #[error("Can't find template at path: '{}'.", path.display())]
    TemplateNotFound { path: PathBuf },

    /// The template engine rejected the template or its context.
    #[error("Render error: {0}.")]
    RenderError(#[from] minijinja::Error),

    /// Directory creation or file write was denied.
    #[error("Failed to write '{}': {source}.", path.display())]
    WriteError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact failed while the bundle required every artifact to succeed.
    #[error("Failed to render {artifact}: {reason}")]
    ArtifactFailed { artifact: String, reason: String },

    /// Payloads could not be turned into a template context.
    #[error("Serialization error: {0}.")]
    SerializationError(#[from] serde_json::Error),

    /// Represents errors that occur during server definition parsing
    #[error("Configuration error: {0}.")]
    ConfigError(String),

    /// Represents shape validation failures in server definitions
    #[error("Validation error: {0}.")]
    ValidationError(String),
}

/// Convenience type alias for Results with forgekit's Error as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The Error to handle
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) {
    eprintln!("{err}");
    std::process::exit(1);
}
