/*!
 * Error types for the modlocalizer application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
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

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The request did not complete within the configured timeout
    #[error("Request timed out after {0} seconds")]
    Timeout(u64),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

/// Why a single item did not receive a usable translation
///
/// These never abort a run; they travel with the item's result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ItemError {
    /// The response had no entry for this item
    #[error("Missing translation in response")]
    MissingTranslation,

    /// The response had an entry for this item but no value could be read from it
    #[error("Failed to parse translation from response")]
    UnparsableTranslation,

    /// The response explicitly returned an empty translation
    #[error("Empty translation in structured response")]
    EmptyTranslation,

    /// The service call covering this item failed
    #[error("{0}")]
    Service(String),
}

impl ItemError {
    /// Whether the service silently left this item out
    pub fn is_omission(&self) -> bool {
        matches!(self, Self::MissingTranslation | Self::UnparsableTranslation)
    }
}

impl From<ProviderError> for ItemError {
    fn from(error: ProviderError) -> Self {
        Self::Service(error.to_string())
    }
}

/// Errors raised by the persistent term dictionary
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// The dictionary file exists but is not valid dictionary JSON
    #[error("Dictionary file {path:?} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The dictionary file exists but could not be read
    #[error("Failed to read dictionary file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dictionary could not be written
    #[error("Failed to write dictionary file {path:?}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Errors raised while reading or writing quest documents
#[derive(Error, Debug)]
pub enum QuestError {
    #[error("Failed to read quest file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse quest file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write quest file {path:?}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Errors raised by the plain translation file readers and writers
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("Unsupported file format: {0}")]
    Unsupported(String),

    #[error("Failed to parse {path:?}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration problems detected before any work starts
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Unsupported translation engine: {0}")]
    UnsupportedEngine(String),

    #[error("{0} is not yet implemented")]
    EngineNotImplemented(String),

    #[error("API key not found for {0}. Set it in the config file or the OPENAI_API_KEY environment variable")]
    MissingApiKey(String),

    #[error("Unsupported language code: {0}")]
    UnsupportedLanguage(String),

    #[error("Invalid setting {name}: {reason}")]
    InvalidSetting { name: String, reason: String },
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

    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    #[error("Quest error: {0}")]
    Quest(#[from] QuestError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

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
