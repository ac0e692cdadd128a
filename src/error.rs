use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Configuration missing: {0}")]
    ConfigMissing(String),

    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    #[error("Config file error at {path}: {message}")]
    ConfigFile { path: PathBuf, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("Max retries exceeded ({attempts} attempts): {last_error}")]
    MaxRetries { attempts: u32, last_error: String },
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// Outcome of a search call that did not produce results.
#[derive(Debug, Error)]
#[error("search failed: {cause}")]
pub struct SearchFailure {
    #[source]
    pub cause: SearchError,
}

impl From<SearchError> for SearchFailure {
    fn from(cause: SearchError) -> Self {
        Self { cause }
    }
}
