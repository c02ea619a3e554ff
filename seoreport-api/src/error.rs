use crate::endpoint::Endpoint;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure or non-2xx status. The request URL is stripped
    /// before the error is stored because it carries the API key.
    #[error("HTTP request failed: {0}")]
    HttpError(reqwest::Error),

    #[error("Unexpected response from {endpoint}: {source}")]
    SchemaError {
        endpoint: Endpoint,
        #[source]
        source: serde_json::Error,
    },

    #[error("Response from {endpoint} has no answer payload")]
    MissingAnswer { endpoint: Endpoint },

    #[error("{endpoint} rejected the request: {message}")]
    Rejected { endpoint: Endpoint, message: String },

    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to build HTTP client: {0}")]
    ClientError(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::HttpError(err.without_url())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
