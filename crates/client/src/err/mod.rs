use parse_query_builder::QueryError;
use thiserror::Error;

pub type ClientResult<T> = Result<T, ClientError>;

/// Errors returned by [`ParseClient`](crate::ParseClient) and the executors.
///
/// Transport and decoding failures carry the underlying error untouched.
#[derive(Error, Debug)]
pub enum ClientError {
    /// Required connection parameters are missing. Raised before any network call.
    #[error("Missing required parameters: {0}. Please check the client configuration.")]
    Configuration(String),

    /// The query could not be compiled (unsupported feature, bad argument, conflicting options).
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Response is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid server URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
