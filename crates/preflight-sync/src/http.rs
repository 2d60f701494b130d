//! HTTP transport with retry, doubling backoff, and a hard timeout.
//!
//! The real client lives behind the `remote` feature. Without it every
//! call returns a network error, which callers already treat as
//! non-fatal, so the library runs fully local.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use preflight_core::errors::{PreflightError, SyncError};

/// Configuration for the transport layer.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Base URL of the aggregation server.
    pub base_url: String,
    /// Per-request timeout. Requests past this are abandoned without
    /// touching local state.
    pub timeout: Duration,
    /// Retry budget for non-4xx failures.
    pub max_retries: u32,
    /// Initial backoff, doubled per retry.
    pub initial_backoff: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: Duration::from_secs(10),
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
        }
    }
}

/// Convert a reason string into the error callers expect.
fn net_err(reason: String) -> PreflightError {
    SyncError::NetworkError { reason }.into()
}

/// Blocking JSON transport.
#[derive(Debug)]
pub struct HttpClient {
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig) -> Self {
        Self { config }
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// POST a JSON body and decode a JSON response.
    #[allow(unused_variables)]
    pub fn post<Req: Serialize, Resp: DeserializeOwned>(
        &self,
        path: &str,
        body: Option<&Req>,
    ) -> Result<Resp, PreflightError> {
        #[cfg(feature = "remote")]
        {
            let response = self.do_request(reqwest::Method::POST, path, body)?;
            response
                .json::<Resp>()
                .map_err(|e| net_err(format!("deserialization failed: {e}")))
        }

        #[cfg(not(feature = "remote"))]
        {
            Err(net_err("remote feature not enabled".into()))
        }
    }

    /// POST where only the status matters; the response body is ignored.
    #[allow(unused_variables)]
    pub fn post_unit<Req: Serialize>(
        &self,
        path: &str,
        body: Option<&Req>,
    ) -> Result<(), PreflightError> {
        #[cfg(feature = "remote")]
        {
            self.do_request(reqwest::Method::POST, path, body)
                .map(|_| ())
        }

        #[cfg(not(feature = "remote"))]
        {
            Err(net_err("remote feature not enabled".into()))
        }
    }

    /// GET and decode a JSON response.
    #[allow(unused_variables)]
    pub fn get<Resp: DeserializeOwned>(&self, path: &str) -> Result<Resp, PreflightError> {
        #[cfg(feature = "remote")]
        {
            let response = self.do_request::<()>(reqwest::Method::GET, path, None)?;
            response
                .json::<Resp>()
                .map_err(|e| net_err(format!("deserialization failed: {e}")))
        }

        #[cfg(not(feature = "remote"))]
        {
            Err(net_err("remote feature not enabled".into()))
        }
    }

    /// Unified retry loop: success returns the raw response, 4xx fails
    /// immediately, everything else burns the retry budget.
    #[cfg(feature = "remote")]
    fn do_request<Req: Serialize>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: Option<&Req>,
    ) -> Result<reqwest::blocking::Response, PreflightError> {
        let url = format!("{}{}", self.config.base_url, path);
        let client = reqwest::blocking::Client::builder()
            .timeout(self.config.timeout)
            .build()
            .map_err(|e| net_err(e.to_string()))?;

        let mut backoff = self.config.initial_backoff;
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                tracing::debug!(
                    "sync: retry {}/{} after {:?}",
                    attempt,
                    self.config.max_retries,
                    backoff
                );
                std::thread::sleep(backoff);
                backoff *= 2;
            }

            let mut request = client.request(method.clone(), &url);
            request = match body {
                Some(b) => request.json(b),
                // The server expects a JSON content type even on
                // body-less requests.
                None => request.header(reqwest::header::CONTENT_TYPE, "application/json"),
            };

            match request.send() {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status.is_client_error() {
                        let text = response.text().unwrap_or_default();
                        return Err(net_err(format!("HTTP {status}: {text}")));
                    }
                    last_err = format!("HTTP {status}");
                }
                Err(e) => {
                    last_err = e.to_string();
                }
            }
        }

        Err(net_err(format!(
            "all {} retries exhausted: {last_err}",
            self.config.max_retries
        )))
    }
}
