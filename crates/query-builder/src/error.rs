use crate::version::ServerVersion;
use thiserror::Error;

pub type QueryResult<T> = Result<T, QueryError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The configured server is older than the release that introduced the feature
    #[error("{feature} is only supported starting with Parse Server {required} (configured: {actual})")]
    UnsupportedFeature {
        feature: &'static str,
        required: ServerVersion,
        actual: ServerVersion,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Conflicting options: {0}")]
    ConflictingOptions(String),

    #[error("Invalid server version: {0:?}")]
    InvalidVersion(String),
}
