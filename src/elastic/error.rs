use thiserror::Error;

#[derive(Debug, Error)]
/// Errors returned by Elasticsearch operations.
pub enum ElasticError {
    /// The HTTP client could not be constructed.
    #[error("failed to build Elasticsearch client for '{url}': {message}")]
    ClientBuild {
        /// Endpoint URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The request never produced a response (connect, timeout, TLS).
    #[error("request to '{url}' failed: {message}")]
    Transport {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
    },

    /// The cluster answered with a non-success status.
    #[error("Elasticsearch returned {status} for '{url}': {body}")]
    Status {
        /// Request URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Response body (truncated).
        body: String,
    },

    /// The response body did not match the expected shape.
    #[error("failed to decode response from '{url}': {message}")]
    Decode {
        /// Request URL.
        url: String,
        /// Error message.
        message: String,
    },
}
