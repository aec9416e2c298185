//! The automatic-source scrapers and their registry.
//!
//! A closed set of strategies probes each document; every applicable,
//! enabled strategy runs and proposes raw candidate records. The fixed
//! order of [`ScraperKind::ALL`] doubles as the priority ranking used when
//! deduplication has to pick between scrapers' overlapping proposals.

pub mod html;
pub mod json_state;
pub mod node;
pub mod schema;
pub mod semantic_html;

use crate::article::RawArticle;
use crate::config::Config;
use crate::document::SourceDocument;
use crate::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScraperKind {
    Schema,
    SemanticHtml,
    Html,
    JsonState,
}

impl ScraperKind {
    /// Every scraper, in priority order.
    pub const ALL: [ScraperKind; 4] = [
        Self::Schema,
        Self::SemanticHtml,
        Self::Html,
        Self::JsonState,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::SemanticHtml => "semantic_html",
            Self::Html => "html",
            Self::JsonState => "json_state",
        }
    }

    pub fn enabled(self, config: &Config) -> bool {
        match self {
            Self::Schema => config.scraper.schema.enabled,
            Self::SemanticHtml => config.scraper.semantic_html.enabled,
            Self::Html => config.scraper.html.enabled,
            Self::JsonState => config.scraper.json_state.enabled,
        }
    }

    /// Whether this strategy can extract anything useful from the document.
    pub fn applicable(self, document: &SourceDocument, _config: &Config) -> bool {
        match self {
            Self::Schema => schema::applicable(document),
            Self::SemanticHtml => semantic_html::applicable(document),
            Self::Html => html::applicable(document),
            Self::JsonState => json_state::applicable(document),
        }
    }

    /// Run one full extraction pass, yielding this scraper's raw records.
    pub fn run(self, document: &SourceDocument, config: &Config) -> Result<Vec<RawArticle>, Error> {
        Ok(match self {
            Self::Schema => schema::scrape(document),
            Self::SemanticHtml => semantic_html::scrape(document),
            Self::Html => html::scrape(document, &config.scraper.html),
            Self::JsonState => json_state::scrape(document),
        })
    }
}

/// Enabled, applicable scrapers for this document, in priority order.
/// An empty result is the distinguishable no-scraper condition.
pub fn select(document: &SourceDocument, config: &Config) -> Result<Vec<ScraperKind>, Error> {
    let kinds: Vec<ScraperKind> = ScraperKind::ALL
        .into_iter()
        .filter(|kind| kind.enabled(config) && kind.applicable(document, config))
        .collect();

    if kinds.is_empty() {
        return Err(Error::NoScraperFound {
            url: document.url().clone(),
        });
    }
    Ok(kinds)
}
