/*!
 * Error types for the batrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when working with provider APIs
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),

    /// Error when a language code is not in the supported table
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),
}

/// Errors that can occur when starting or controlling a batch
#[derive(Error, Debug)]
pub enum BatchError {
    /// The manager was never bound to a working directory
    #[error("Working directory has not been initialized")]
    NotInitialized,

    /// A batch is already running on this manager
    #[error("A translation batch is already running")]
    AlreadyRunning,

    /// The supplied batch parameters are invalid
    #[error("Invalid batch parameters: {0}")]
    InvalidParameters(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from batch orchestration
    #[error("Batch error: {0}")]
    Batch(#[from] BatchError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
