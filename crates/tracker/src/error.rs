//! Error types for issue tracker services.

use thiserror::Error;

/// Errors raised while configuring a tracker or resolving its endpoints.
///
/// Failures talking to the remote tracker are not represented here: the
/// dispatcher classifies and logs them instead (see [`crate::DispatchOutcome`]).
#[derive(Debug, Error)]
pub enum TrackerError {
    /// A stored URL could not be parsed
    #[error("Invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Configuration is missing or malformed
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// HTTP client could not be constructed
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors produced while loading or validating tracker properties.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required property is blank
    #[error("{0} can't be blank")]
    Missing(&'static str),

    /// A property that must be an http(s) URL is not one
    #[error("{field} is not a valid URL: {value}")]
    NotAUrl { field: &'static str, value: String },

    /// Reading the property file failed
    #[error("Failed to read properties: {0}")]
    Io(#[from] std::io::Error),

    /// The property file is not a JSON object of strings
    #[error("Failed to parse properties: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result alias used across the crate.
pub type Result<T, E = TrackerError> = std::result::Result<T, E>;
