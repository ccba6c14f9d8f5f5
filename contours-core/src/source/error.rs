use thiserror::Error;

/// Errors from [`crate::source::BuildingSource::fetch_buildings`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not complete within the configured timeout.
    #[error("request to {url} timed out after {timeout_secs} seconds")]
    Timeout {
        /// Endpoint that was queried.
        url: String,
        /// Configured timeout in whole seconds.
        timeout_secs: u64,
    },
    /// The service answered with an HTTP error status.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Endpoint that was queried.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Error description reported by the client.
        message: String,
    },
    /// The service could not be reached.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Endpoint that was queried.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service reported a runtime error in an otherwise valid response.
    #[error("map data service reported an error: {message}")]
    Service {
        /// Remark returned by the service.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse map data response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}
