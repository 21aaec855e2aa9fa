//! Error types for romacase.
//!
//! Uses `thiserror` for structured error definitions that provide
//! clear context about what went wrong.

use thiserror::Error;

/// Error type for a whole transformation request.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Nothing to transform
    #[error("No text selected")]
    EmptyInput,

    /// The dictionary could not be loaded
    #[error("Dictionary unavailable: {0}")]
    Dictionary(StoreError),

    /// The primary cache file could not be loaded
    #[error("Translation cache unavailable: {0}")]
    Cache(StoreError),
}

/// Error type for kanji reading resolution.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// HTTP request to the provider failed
    #[error("Provider request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Provider returned an error response
    #[error("Provider error: {0}")]
    ApiError(String),

    /// Failed to parse the provider response
    #[error("Failed to parse provider response: {0}")]
    ParseError(String),

    /// The model declined to answer
    #[error("Reading refused: {0}")]
    Refused(String),

    /// No reading known for the text
    #[error("No reading for '{0}'")]
    NoReading(String),

    /// Invalid provider configuration
    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),
}

/// Error type for the cache and dictionary files.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the file
    #[error("Failed to read file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse JSON
    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Dictionary file has the wrong shape
    #[error("Malformed dictionary: {0}")]
    MalformedDictionary(String),

    /// Failed to write the file
    #[error("Failed to save file: {0}")]
    WriteError(String),
}

/// Error type for configuration operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse config file
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Missing required configuration value
    #[error("Missing required config value: {0}")]
    MissingValue(String),

    /// Invalid configuration value
    #[error("Invalid config value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Config directory not found
    #[error("Could not determine config directory")]
    NoConfigDir,
}

/// Unknown case name given on the command line.
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Unknown case '{0}' (expected snake, upper-snake, pascal, camel, kebab or japanese)")]
pub struct CaseParseError(pub String);

/// Result type alias using anyhow for application-level error handling.
pub type Result<T> = anyhow::Result<T>;
