//! Transport types and errors

use std::time::Duration;
use thiserror::Error;

/// Errors reported by a [`Transport`](super::Transport) for a single request.
///
/// Every variant is transient from the fetcher's point of view: the request
/// is retried and, once attempts run out, replaced by a placeholder tile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// Could not establish a connection
    #[error("connection failed: {0}")]
    Connect(String),
    /// The request did not complete within the timeout
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    /// The server answered with a non-2xx status
    #[error("HTTP {0}")]
    Status(u16),
    /// The response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),
    /// Any other request failure
    #[error("request failed: {0}")]
    Request(String),
}

/// Static headers sent with every tile request.
///
/// Some tile servers reject requests without a browser-like User-Agent or
/// a Referer pointing at their own viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaders {
    /// `User-Agent` header value
    pub user_agent: String,
    /// `Accept` header value
    pub accept: String,
    /// `Referer` header value
    pub referer: String,
}

impl RequestHeaders {
    /// Returns the headers as (name, value) pairs, skipping empty values.
    pub fn pairs(&self) -> Vec<(&'static str, &str)> {
        [
            ("User-Agent", self.user_agent.as_str()),
            ("Accept", self.accept.as_str()),
            ("Referer", self.referer.as_str()),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .collect()
    }
}

impl Default for RequestHeaders {
    fn default() -> Self {
        Self {
            user_agent: crate::config::DEFAULT_USER_AGENT.to_string(),
            accept: crate::config::DEFAULT_ACCEPT.to_string(),
            referer: crate::config::DEFAULT_REFERER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(TransportError::Status(404).to_string(), "HTTP 404");
        assert!(TransportError::Connect("refused".into())
            .to_string()
            .contains("refused"));
    }

    #[test]
    fn test_pairs_skip_empty_values() {
        let headers = RequestHeaders {
            user_agent: "agent".into(),
            accept: String::new(),
            referer: "https://example.com/".into(),
        };
        assert_eq!(
            headers.pairs(),
            vec![
                ("User-Agent", "agent"),
                ("Referer", "https://example.com/")
            ]
        );
    }
}
