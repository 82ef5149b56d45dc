//! Tile source abstraction
//!
//! This module provides the transport trait used to download tile bytes,
//! the reqwest-backed implementation, and URL templating.
//!
//! ```ignore
//! use tilemosaic::provider::{ReqwestTransport, UrlTemplate};
//!
//! let transport = ReqwestTransport::new(64)?;
//! let urls = UrlTemplate::parse("https://tiles.example.com/{prefix}_{x}_{y}.png", "0")?;
//! ```

mod http;
mod types;
mod url;

pub use http::{ReqwestTransport, Transport};
pub use types::{RequestHeaders, TransportError};
pub use url::{UrlTemplate, UrlTemplateError};

#[cfg(test)]
pub use http::tests::{MockTransport, Script};
