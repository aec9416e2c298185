//! Semantic-HTML scraper: containers that structurally look like articles,
//! either an `<article>` element or the parent of a heading that also
//! carries a link.

use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;

use crate::article::RawArticle;
use crate::document::SourceDocument;
use crate::scrapers::node;

static ARTICLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("article").unwrap());

pub fn applicable(document: &SourceDocument) -> bool {
    let html = document.parse();
    html.select(&ARTICLE_SELECTOR).next().is_some() || !heading_link_parents(&html).is_empty()
}

pub fn scrape(document: &SourceDocument) -> Vec<RawArticle> {
    let html = document.parse();
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for container in html.select(&ARTICLE_SELECTOR) {
        if seen.insert(container.id()) {
            records.push(node::candidate(container, document));
        }
    }
    for container in heading_link_parents(&html) {
        if seen.insert(container.id()) {
            records.push(node::candidate(container, document));
        }
    }
    records
}

/// Parents of headings that also contain a link, in document order.
fn heading_link_parents(html: &Html) -> Vec<ElementRef<'_>> {
    html.select(&node::HEADING_SELECTOR)
        .filter_map(|heading| heading.parent().and_then(ElementRef::wrap))
        .filter(|parent| {
            parent.value().name() == "a" || parent.select(&node::ANCHOR_SELECTOR).next().is_some()
        })
        .collect()
}
