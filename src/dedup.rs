//! URL-keyed deduplication of the combined candidate set.

use std::collections::HashSet;

use crate::article::Article;

/// Keep one article per distinct normalized URL. The sequence arrives in
/// scraper priority order, so first seen wins and later duplicates are
/// discarded without field merging. Articles whose URL failed
/// sanitization are never merged; they pass through untouched.
pub fn by_url(articles: Vec<Article>) -> Vec<Article> {
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(articles.len());
    for article in articles {
        let key = article.url().map(|url| url.as_str().to_string());
        match key {
            Some(url) => {
                if seen.insert(url) {
                    kept.push(article);
                }
            }
            None => kept.push(article),
        }
    }
    kept
}
