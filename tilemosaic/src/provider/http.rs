//! HTTP transport abstraction for testability

use super::types::{RequestHeaders, TransportError};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Trait for asynchronous tile transport.
///
/// This abstraction allows for dependency injection and easier testing by
/// enabling mock transports in tests. Implementations must report connection
/// failures, timeouts and HTTP status codes as distinct [`TransportError`]
/// variants, and return the raw body on a 2xx response.
pub trait Transport: Send + Sync {
    /// Performs an HTTP GET request.
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to request
    /// * `headers` - Static headers to send with the request
    /// * `timeout` - Upper bound for the whole request, including the body
    ///
    /// # Returns
    ///
    /// The response body as bytes or an error.
    fn get(
        &self,
        url: &str,
        headers: &RequestHeaders,
        timeout: Duration,
    ) -> impl Future<Output = Result<Vec<u8>, TransportError>> + Send;
}

/// Real transport implementation using reqwest.
///
/// Uses non-blocking I/O; each in-flight request holds one pooled
/// connection for its duration.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a new transport sized for `max_connections` parallel requests.
    pub fn new(max_connections: usize) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            // One idle connection per worker
            .pool_max_idle_per_host(max_connections)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| {
                TransportError::Request(format!("failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }
}

impl Transport for ReqwestTransport {
    async fn get(
        &self,
        url: &str,
        headers: &RequestHeaders,
        timeout: Duration,
    ) -> Result<Vec<u8>, TransportError> {
        trace!(url = url, "HTTP GET request starting");

        let mut request = self.client.get(url).timeout(timeout);
        for (name, value) in headers.pairs() {
            request = request.header(name, value);
        }

        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    url = url,
                    status = resp.status().as_u16(),
                    "HTTP response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    url = url,
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "HTTP request failed"
                );
                return Err(classify(e, timeout));
            }
        };

        if !response.status().is_success() {
            return Err(TransportError::Status(response.status().as_u16()));
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = url, bytes = bytes.len(), "HTTP response body read");
                Ok(bytes.to_vec())
            }
            Err(e) if e.is_timeout() => Err(TransportError::Timeout(timeout)),
            Err(e) => Err(TransportError::Body(e.to_string())),
        }
    }
}

fn classify(error: reqwest::Error, timeout: Duration) -> TransportError {
    if error.is_timeout() {
        TransportError::Timeout(timeout)
    } else if error.is_connect() {
        TransportError::Connect(error.to_string())
    } else {
        TransportError::Request(error.to_string())
    }
}
