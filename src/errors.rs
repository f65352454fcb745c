/*!
 * Error types for the bibliotrack application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use thiserror::Error;

/// Errors raised by the inventory core (session store and item mutations)
#[derive(Error, Debug)]
pub enum InventoryError {
    /// Caller-supplied input is blank or otherwise unusable
    #[error("Validation error: {0}")]
    Validation(String),

    /// The storage medium could not be read or written
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Convenience alias for results of inventory operations
pub type InventoryResult<T> = Result<T, InventoryError>;

impl From<anyhow::Error> for InventoryError {
    fn from(error: anyhow::Error) -> Self {
        // Alternate formatting keeps the whole context chain
        Self::Persistence(format!("{:#}", error))
    }
}

impl From<std::io::Error> for InventoryError {
    fn from(error: std::io::Error) -> Self {
        Self::Persistence(error.to_string())
    }
}

impl From<serde_json::Error> for InventoryError {
    fn from(error: serde_json::Error) -> Self {
        Self::Persistence(error.to_string())
    }
}

impl From<rusqlite::Error> for InventoryError {
    fn from(error: rusqlite::Error) -> Self {
        Self::Persistence(error.to_string())
    }
}

/// One failed attempt of an acquisition strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionFailure {
    /// Name of the strategy that failed
    pub strategy: String,
    /// Why it failed
    pub reason: String,
}

impl AcquisitionFailure {
    /// Create a new failure record
    pub fn new(strategy: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for AcquisitionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.strategy, self.reason)
    }
}

fn join_failures(attempts: &[AcquisitionFailure]) -> String {
    attempts
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors that can occur while acquiring a capture resource (camera, etc.)
#[derive(Error, Debug)]
pub enum AcquisitionError {
    /// The host refuses device access outside a secure context
    #[error("Secure context required: {0}")]
    SecureContextRequired(String),

    /// Every strategy was tried and none produced a handle
    #[error("No strategy could acquire the resource ({})", join_failures(.attempts))]
    Exhausted {
        /// Failures in the order the strategies were tried
        attempts: Vec<AcquisitionFailure>,
    },

    /// The strategy list was empty
    #[error("No acquisition strategies configured")]
    NoStrategies,
}

/// Errors that can occur when requesting a summary report
#[derive(Error, Debug)]
pub enum ReportError {
    /// No API key configured for the report service
    #[error("Report API key is not configured")]
    MissingApiKey,

    /// Error when making the request fails
    #[error("Report request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("Report API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing the API response fails
    #[error("Failed to parse report response: {0}")]
    ParseError(String),

    /// The API answered without any text
    #[error("Report response contained no text")]
    EmptyResponse,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from the inventory core
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    /// Error from capture resource acquisition
    #[error("Acquisition error: {0}")]
    Acquisition(#[from] AcquisitionError),

    /// Error from the report service
    #[error("Report error: {0}")]
    Report(#[from] ReportError),

    /// No session matches the given id or prefix
    #[error("Session not found: {0}")]
    SessionNotFound(String),

    /// A session id prefix matches more than one session
    #[error("Session id prefix '{prefix}' is ambiguous ({matches} sessions match)")]
    AmbiguousSession {
        /// The prefix the user typed
        prefix: String,
        /// How many sessions matched
        matches: usize,
    },

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

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
