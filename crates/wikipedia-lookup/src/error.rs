use thiserror::Error;

use crate::client::HttpError;

/// API error codes that mean the page does not (or no longer) exist
const NOT_FOUND_CODES: [&str; 3] = ["missingtitle", "pagecannotexist", "invalidtitle"];

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{0}")]
    Http(#[from] HttpError),
    /// The client failed to deserialise the response
    #[error("Failed to deserialise response: {0}")]
    Deserialisation(#[from] serde_json::Error),
    /// The API answered with its own error envelope
    #[error("API error '{code}': {info}")]
    Api { code: String, info: String },
    #[error("Page '{title}' is missing the '{field}' field")]
    MissingField { title: String, field: &'static str },
    /// Only "text" and "wikitext" can be requested
    #[error("Unsupported text format '{0}'")]
    InvalidFormat(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error parsing URL: {0}")]
    Url(#[from] url::ParseError),
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { code, .. } if NOT_FOUND_CODES.contains(&code.as_str()))
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(err) if err.is_retryable())
    }
}

/// Turn an API "no such page" error into `None`, keeping every other error
pub(crate) fn not_found_as_none<T>(result: Result<T, LookupError>) -> Result<Option<T>, LookupError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_not_found() => Ok(None),
        Err(err) => Err(err),
    }
}
