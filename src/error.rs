use thiserror::Error;

/// Errors raised at the edges of the crate (feed fetching, configuration, CLI).
///
/// Normalization, grouping and link building never fail; they fall back
/// to documented defaults instead.
#[derive(Error, Debug)]
pub enum MenuError {
    /// Failed to reach the menu API
    #[error("Failed to fetch feed: {0}")]
    FetchError(#[from] reqwest::Error),

    /// The menu API answered with a non-success status
    #[error("Menu API returned {status} for {url}")]
    Api { status: u16, url: String },

    /// Response body or input file was not valid JSON
    #[error("Failed to decode menu records: {0}")]
    DecodeError(#[from] serde_json::Error),

    /// Unknown category slug requested
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// Category exists but has no backend claim key to query by
    #[error("Category '{0}' cannot be queried on the API")]
    UnqueryableCategory(String),

    /// Reading an input file failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Invalid command-line usage
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
