//! Frequency scraper: discovers repeated item structures statistically.
//!
//! Every element contributes a selector signature (tag plus class list, or
//! `tag#id`); signatures occurring often enough are ranked and the top few
//! are treated as item selectors. The same element reaching the output
//! through more than one signature is expected; URL dedup collapses it
//! downstream.

use scraper::ElementRef;
use std::collections::HashMap;

use crate::article::RawArticle;
use crate::config::HtmlScraperSettings;
use crate::document::SourceDocument;
use crate::scrapers::node;

struct Signature<'a> {
    specificity: usize,
    first_seen: usize,
    elements: Vec<ElementRef<'a>>,
}

/// Always applicable; this is the fallback strategy.
pub fn applicable(_document: &SourceDocument) -> bool {
    true
}

pub fn scrape(document: &SourceDocument, settings: &HtmlScraperSettings) -> Vec<RawArticle> {
    let html = document.parse();

    let mut signatures: HashMap<String, Signature<'_>> = HashMap::new();
    for (position, element) in html
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .enumerate()
    {
        let Some((key, specificity)) = signature(element) else {
            continue;
        };
        signatures
            .entry(key)
            .or_insert_with(|| Signature {
                specificity,
                first_seen: position,
                elements: Vec::new(),
            })
            .elements
            .push(element);
    }

    let mut ranked: Vec<Signature<'_>> = signatures
        .into_values()
        .filter(|sig| sig.elements.len() >= settings.minimum_selector_frequency)
        .collect();
    // highest match count first; ties break by specificity, then by where
    // the signature first appeared in the document
    ranked.sort_by(|a, b| {
        b.elements
            .len()
            .cmp(&a.elements.len())
            .then(b.specificity.cmp(&a.specificity))
            .then(a.first_seen.cmp(&b.first_seen))
    });
    ranked.truncate(settings.use_top_selectors);

    ranked
        .iter()
        .flat_map(|sig| sig.elements.iter())
        .map(|element| node::candidate(*element, document))
        .collect()
}

/// Structural fingerprint of one element: `tag.class1.class2`, or `tag#id`
/// for class-less elements. Bare elements carry no signal and yield none.
fn signature(element: ElementRef<'_>) -> Option<(String, usize)> {
    let value = element.value();
    let classes: Vec<&str> = value.classes().collect();
    if !classes.is_empty() {
        return Some((
            format!("{}.{}", value.name(), classes.join(".")),
            classes.len(),
        ));
    }
    value
        .id()
        .map(|id| (format!("{}#{}", value.name(), id), 1))
}
