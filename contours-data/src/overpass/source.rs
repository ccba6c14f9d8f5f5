//! HTTP `BuildingSource` backed by the Overpass API.
//!
//! The [`BuildingSource`] trait is synchronous so the pipeline stays usable
//! from plain blocking code. [`OverpassBuildingSource`] bridges the async
//! `reqwest` client to that interface by blocking on a Tokio runtime it owns.

use std::time::Duration;

use contours_core::{BuildingSource, FetchError, GeoRecord, QueryPoint};
use log::{debug, info};
use reqwest::Client;
use thiserror::Error;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::geometry::records_from_elements;
use super::query::build_query;
use super::response::OverpassResponse;

/// Public Overpass API endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Default user agent for Overpass requests.
pub const DEFAULT_USER_AGENT: &str = "building-contours/0.1";

/// Default request timeout in seconds; also sent as the server-side
/// `[timeout:N]` setting.
const DEFAULT_TIMEOUT_SECS: u64 = 180;

/// Errors raised while constructing an [`OverpassBuildingSource`].
#[derive(Debug, Error)]
pub enum SourceBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Configuration for [`OverpassBuildingSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverpassConfig {
    /// Interpreter endpoint, e.g. `"https://overpass-api.de/api/interpreter"`.
    pub url: String,
    /// Client and server-side request timeout.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for OverpassConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_OVERPASS_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OverpassConfig {
    /// Create a configuration for the given interpreter endpoint.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Overpass-backed building source.
///
/// Owns a `current_thread` Tokio runtime reused across calls. When called
/// from inside a multi-threaded Tokio runtime, the caller's handle is used
/// with [`tokio::task::block_in_place`] instead, avoiding nested runtime
/// panics.
pub struct OverpassBuildingSource {
    client: Client,
    config: OverpassConfig,
    runtime: Runtime,
}

impl std::fmt::Debug for OverpassBuildingSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverpassBuildingSource")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish()
    }
}

impl OverpassBuildingSource {
    /// Create a source for the given endpoint with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn new(url: impl Into<String>) -> Result<Self, SourceBuildError> {
        Self::with_config(OverpassConfig::new(url))
    }

    /// Create a source with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: OverpassConfig) -> Result<Self, SourceBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(SourceBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(SourceBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OverpassConfig {
        &self.config
    }

    async fn fetch_async(&self, query: &QueryPoint) -> Result<Vec<GeoRecord>, FetchError> {
        let url = self.config.url.as_str();
        let ql = build_query(query, self.config.timeout.as_secs());
        debug!("posting Overpass query to {url}: {ql}");

        let body = self
            .client
            .post(url)
            .form(&[("data", ql.as_str())])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err))?
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err))?;

        let records = parse_records(&body)?;
        info!("fetched {} building records around {query}", records.len());
        Ok(records)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error) -> FetchError {
        let url = self.config.url.clone();
        if error.is_timeout() {
            return FetchError::Timeout {
                url,
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return FetchError::Http {
                url,
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        FetchError::Network {
            url,
            message: error.to_string(),
        }
    }
}

impl BuildingSource for OverpassBuildingSource {
    /// Fetch building records around `query`.
    ///
    /// # Runtime requirements
    ///
    /// Inside an existing Tokio runtime, that runtime must be multi-threaded.
    /// From a `current_thread` runtime the source falls back to its own
    /// runtime, which blocks the caller's executor for the duration of the
    /// request.
    fn fetch_buildings(&self, query: &QueryPoint) -> Result<Vec<GeoRecord>, FetchError> {
        let future = self.fetch_async(query);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            _ => self.runtime.block_on(future),
        }
    }
}

/// Decode an Overpass JSON body into records.
///
/// # Errors
///
/// Returns [`FetchError::Parse`] for malformed JSON and
/// [`FetchError::Service`] when the body carries a runtime error remark.
///
/// # Examples
///
/// ```
/// use contours_data::parse_records;
///
/// let body = r#"{"elements": [{"type": "node", "id": 1, "lat": 32.0, "lon": 34.0}]}"#;
/// let records = parse_records(body)?;
/// assert_eq!(records[0].geometry_type(), "Point");
/// # Ok::<(), contours_core::FetchError>(())
/// ```
pub fn parse_records(body: &str) -> Result<Vec<GeoRecord>, FetchError> {
    let response: OverpassResponse =
        serde_json::from_str(body).map_err(|err| FetchError::Parse {
            message: err.to_string(),
        })?;
    if let Some(remark) = response.runtime_error() {
        return Err(FetchError::Service {
            message: remark.to_owned(),
        });
    }
    Ok(records_from_elements(response.elements))
}
