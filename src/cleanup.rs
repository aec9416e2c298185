//! Cleanup pipeline: ordered filters and normalizers applied to the
//! deduplicated article set. Normalization runs first so the filters see
//! clean text; then noise is dropped by domain and by title length.

use url::Url;

use crate::article::Article;
use crate::config::CleanupSettings;
use crate::text;

pub fn run(articles: Vec<Article>, settings: &CleanupSettings, source: &Url) -> Vec<Article> {
    let articles = normalize(articles);
    let articles = if settings.keep_different_domain {
        articles
    } else {
        same_domain_only(articles, source)
    };
    min_title_words(articles, settings.min_words_title)
}

/// Strip comment/CDATA markers and squish whitespace in title and
/// description. Rebuilds each article so the frozen fields stay clean.
fn normalize(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .map(|article| {
            let scraper = article.scraper();
            let mut raw = article.raw().clone();
            raw.title = raw
                .title
                .as_deref()
                .map(text::strip_markers)
                .filter(|title| !title.is_empty());
            raw.description = raw
                .description
                .as_deref()
                .map(text::strip_markers)
                .filter(|description| !description.is_empty());
            Article::new(raw, scraper)
        })
        .collect()
}

/// Drop articles pointing at a different host than the source document.
/// Articles without a resolvable URL have no host to compare and are kept.
fn same_domain_only(articles: Vec<Article>, source: &Url) -> Vec<Article> {
    let source_host = source.host_str().map(str::to_string);
    articles
        .into_iter()
        .filter(|article| match article.url() {
            Some(url) => url.host_str().map(str::to_string) == source_host,
            None => true,
        })
        .collect()
}

/// Drop titled articles whose title is shorter than the configured word
/// count. Untitled articles were admitted on their description and pass.
fn min_title_words(articles: Vec<Article>, minimum: usize) -> Vec<Article> {
    articles
        .into_iter()
        .filter(|article| match article.title() {
            Some(title) => text::word_count(title) >= minimum,
            None => true,
        })
        .collect()
}
