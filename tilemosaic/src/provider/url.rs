//! Tile URL templates.

use crate::coord::TileCoord;
use reqwest::Url;
use thiserror::Error;

/// Errors found while validating a URL template.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UrlTemplateError {
    /// A required placeholder is absent
    #[error("URL template is missing the {0} placeholder")]
    MissingPlaceholder(&'static str),
    /// The rendered URL does not parse
    #[error("URL template renders to an invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
    /// The rendered URL is not http or https
    #[error("unsupported URL scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),
}

/// Builds tile URLs from a template.
///
/// The template may contain `{x}`, `{y}` and `{prefix}` placeholders. `{x}`
/// and `{y}` are required; `{prefix}` is replaced by the layer or zoom
/// prefix configured alongside the template.
///
/// # Example
///
/// ```
/// use tilemosaic::coord::TileCoord;
/// use tilemosaic::provider::UrlTemplate;
///
/// let template = UrlTemplate::parse("https://tiles.example.com/{prefix}_{x}_{y}.png", "0")?;
/// assert_eq!(
///     template.render(TileCoord::new(3, 5)),
///     "https://tiles.example.com/0_3_5.png"
/// );
/// # Ok::<(), tilemosaic::provider::UrlTemplateError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlTemplate {
    template: String,
    prefix: String,
}

impl UrlTemplate {
    /// Validates a template and binds its prefix.
    pub fn parse(template: &str, prefix: &str) -> Result<Self, UrlTemplateError> {
        for placeholder in ["{x}", "{y}"] {
            if !template.contains(placeholder) {
                return Err(UrlTemplateError::MissingPlaceholder(placeholder));
            }
        }

        let parsed = Self {
            template: template.trim().to_string(),
            prefix: prefix.to_string(),
        };

        let sample = parsed.render(TileCoord::new(0, 0));
        let url = Url::parse(&sample).map_err(|e| UrlTemplateError::InvalidUrl {
            url: sample.clone(),
            reason: e.to_string(),
        })?;

        match url.scheme() {
            "http" | "https" => Ok(parsed),
            other => Err(UrlTemplateError::UnsupportedScheme(other.to_string())),
        }
    }

    /// Renders the URL of one tile.
    pub fn render(&self, coord: TileCoord) -> String {
        self.template
            .replace("{prefix}", &self.prefix)
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string())
    }

    /// The raw template string.
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// The prefix substituted for `{prefix}`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
