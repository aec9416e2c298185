use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no applicable scraper for {url}")]
    NoScraperFound { url: Url },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("scraper '{scraper}' aborted: {message}")]
    ScraperAborted {
        scraper: &'static str,
        message: String,
    },
}

impl Error {
    /// True for conditions a caller is expected to catch and map to an
    /// empty result instead of failing the whole request.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NoScraperFound { .. })
    }
}
