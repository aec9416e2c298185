//! Node-local extraction heuristics shared by the semantic and frequency
//! scrapers: given one candidate container element, pull out the fields a
//! raw article record needs.

use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

use crate::article::RawArticle;
use crate::document::SourceDocument;
use crate::text;

pub(crate) static HEADING_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1, h2, h3, h4, h5, h6").unwrap());

pub(crate) static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").unwrap());

static IMAGE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img[src]").unwrap());

/// Extract a raw candidate record from one container element. The record
/// is unvalidated; containers without a usable URL or text die at the
/// Article validity check.
pub fn candidate(container: ElementRef<'_>, document: &SourceDocument) -> RawArticle {
    let url = anchor_href(container).and_then(|href| document.resolve(&href));
    let title = heading_text(container).or_else(|| anchor_text(container));
    let description = container_text(container);
    let image = image_src(container).and_then(|src| document.resolve(&src));
    let id = container
        .value()
        .id()
        .map(str::to_string)
        .or_else(|| url.as_ref().and_then(id_from_url))
        .or_else(|| title.as_deref().map(slug));

    RawArticle {
        id,
        title,
        description,
        url: url.map(String::from),
        image: image.map(String::from),
        ..Default::default()
    }
}

/// Nearest heading text inside the container.
pub fn heading_text(container: ElementRef<'_>) -> Option<String> {
    container
        .select(&HEADING_SELECTOR)
        .map(|heading| text::squish(&heading.text().collect::<String>()))
        .find(|heading| !heading.is_empty())
}

/// First link inside (or on) the container.
pub fn anchor_href(container: ElementRef<'_>) -> Option<String> {
    if container.value().name() == "a"
        && let Some(href) = container.value().attr("href")
    {
        return Some(href.to_string());
    }
    container
        .select(&ANCHOR_SELECTOR)
        .find_map(|anchor| anchor.value().attr("href"))
        .map(str::to_string)
}

fn anchor_text(container: ElementRef<'_>) -> Option<String> {
    let anchor = if container.value().name() == "a" {
        container
    } else {
        container.select(&ANCHOR_SELECTOR).next()?
    };
    let label = text::squish(&anchor.text().collect::<String>());
    if label.is_empty() { None } else { Some(label) }
}

fn image_src(container: ElementRef<'_>) -> Option<String> {
    container
        .select(&IMAGE_SELECTOR)
        .find_map(|image| image.value().attr("src"))
        .map(str::to_string)
}

fn container_text(container: ElementRef<'_>) -> Option<String> {
    let collected = text::squish(&container.text().collect::<String>());
    if collected.is_empty() {
        None
    } else {
        Some(collected)
    }
}

/// Generated id from the path of the resolved item URL.
fn id_from_url(url: &Url) -> Option<String> {
    let path = url.path().trim_matches('/');
    if path.is_empty() {
        None
    } else {
        Some(path.replace('/', "-"))
    }
}

fn slug(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect()
}
