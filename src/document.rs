use reqwest::header::HeaderMap;
use scraper::Html;
use std::sync::Arc;
use url::Url;

/// Input handle for one extraction call: the final URL the document was
/// served from, its response headers, and the decoded HTML body.
///
/// The body is shared as `Arc<str>` because the parsed DOM is not `Send`;
/// every scraper worker parses its own tree from the shared text.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    url: Url,
    headers: HeaderMap,
    html: Arc<str>,
}

impl SourceDocument {
    pub fn new(url: Url, headers: HeaderMap, html: impl Into<Arc<str>>) -> Self {
        Self {
            url,
            headers,
            html: html.into(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Host of the source URL, used by the same-domain cleanup filter.
    pub fn host(&self) -> Option<&str> {
        self.url.host_str()
    }

    /// Parse a fresh DOM over the shared body.
    pub fn parse(&self) -> Html {
        Html::parse_document(&self.html)
    }

    /// Resolve an href against the document's base URL. Absolute inputs
    /// pass through; empty and unparseable ones become `None`.
    pub fn resolve(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        self.url.join(href).ok()
    }
}
