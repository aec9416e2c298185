//! Orchestration of one extraction call: select scrapers, fan them out
//! across blocking workers, join in priority order, wrap, dedup, clean.

use tracing::{debug, warn};

use crate::article::Article;
use crate::cleanup;
use crate::config::Config;
use crate::dedup;
use crate::document::SourceDocument;
use crate::error::Error;
use crate::scrapers;

/// Detect articles in the document. Returns the cleaned, deduplicated set
/// in scraper priority order.
///
/// A document no scraper applies to yields an empty set and a warning; an
/// invalid configuration or a failing scraper is an error. One failing
/// scraper aborts the whole call rather than silently degrading the feed.
pub async fn articles(document: &SourceDocument, config: &Config) -> Result<Vec<Article>, Error> {
    config.validate()?;

    let kinds = match scrapers::select(document, config) {
        Ok(kinds) => kinds,
        Err(Error::NoScraperFound { url }) => {
            warn!(%url, "no applicable scraper, returning empty article set");
            return Ok(Vec::new());
        }
        Err(err) => return Err(err),
    };

    // The parsed DOM is not Send; workers share the raw body and parse
    // their own tree. Scrapers never share mutable state, so the only
    // synchronization is the join below.
    let mut handles = Vec::with_capacity(kinds.len());
    for kind in kinds {
        let document = document.clone();
        let config = config.clone();
        handles.push((
            kind,
            tokio::task::spawn_blocking(move || kind.run(&document, &config)),
        ));
    }

    // Joining in the fixed priority order keeps first-seen-wins dedup
    // deterministic no matter how the workers were scheduled.
    let mut combined = Vec::new();
    for (kind, handle) in handles {
        let joined = handle.await.map_err(|err| Error::ScraperAborted {
            scraper: kind.name(),
            message: err.to_string(),
        })?;
        let records = joined?;
        debug!(
            scraper = kind.name(),
            records = records.len(),
            "scraper finished"
        );
        for raw in records {
            let article = Article::new(raw, kind.name());
            if article.valid() {
                combined.push(article);
            } else {
                debug!(scraper = kind.name(), "skipping invalid candidate record");
            }
        }
    }

    let merged = dedup::by_url(combined);
    Ok(cleanup::run(merged, &config.cleanup, document.url()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use url::Url;

    fn document(html: &str) -> SourceDocument {
        SourceDocument::new(
            Url::parse("https://example.com/").unwrap(),
            HeaderMap::new(),
            html.to_string(),
        )
    }

    #[tokio::test]
    async fn test_invalid_config_fails_before_scraping() {
        let mut config = Config::default();
        config.scraper.html.minimum_selector_frequency = 0;
        let result = articles(&document("<html></html>"), &config).await;
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[tokio::test]
    async fn test_invalid_candidates_are_skipped() {
        // the second article has no link, so it cannot become valid
        let doc = document(
            r#"<html><body>
                <article id="a1"><h2>Valid Article Title</h2><a href="/a1">go</a></article>
                <article id="a2"></article>
            </body></html>"#,
        );
        let found = articles(&doc, &Config::default()).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id(), Some("a1"));
    }
}
