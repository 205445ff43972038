use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("unauthorized (HTTP 401): {url}")]
    Unauthorized { url: String },

    #[error("not found (HTTP 404): {url}")]
    NotFound { url: String },

    #[error("rate limit exceeded (HTTP 429): {url}")]
    RateLimited { url: String },

    #[error("server error (HTTP {status}): {url}")]
    ServerError { status: u16, url: String },

    #[error("unexpected status (HTTP {status}): {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

// Transport failures (connection reset, timeout, malformed response) all
// surface as reqwest errors. Carrying the message instead of the source
// keeps the variant constructible outside of a live request.
impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
