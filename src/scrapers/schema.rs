//! Structured-data scraper: maps schema.org Article-typed objects found in
//! `application/ld+json` blocks to raw records. One malformed block is
//! skipped; the rest of the document still scrapes.

use scraper::Selector;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use crate::article::RawArticle;
use crate::document::SourceDocument;

static LD_JSON_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"script[type="application/ld+json"]"#).unwrap());

const ARTICLE_TYPES: &[&str] = &[
    "Article",
    "NewsArticle",
    "BlogPosting",
    "ScholarlyArticle",
    "Report",
    "SocialMediaPosting",
    "TechArticle",
];

pub fn applicable(document: &SourceDocument) -> bool {
    let html = document.parse();
    html.select(&LD_JSON_SELECTOR).any(|script| {
        serde_json::from_str::<Value>(script.text().collect::<String>().trim())
            .map(|value| contains_article(&value))
            .unwrap_or(false)
    })
}

pub fn scrape(document: &SourceDocument) -> Vec<RawArticle> {
    let html = document.parse();
    let mut records = Vec::new();
    for script in html.select(&LD_JSON_SELECTOR) {
        let block = script.text().collect::<String>();
        match serde_json::from_str::<Value>(block.trim()) {
            Ok(value) => collect(&value, document, &mut records),
            Err(err) => debug!(%err, "skipping malformed ld+json block"),
        }
    }
    records
}

/// Walk the whole value graph: arrays of objects, `@graph` wrappers, and
/// objects nested under any key all count.
fn collect(value: &Value, document: &SourceDocument, records: &mut Vec<RawArticle>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect(item, document, records);
            }
        }
        Value::Object(object) => {
            if is_article_type(value) {
                records.push(to_record(value, document));
            }
            for nested in object.values() {
                if nested.is_object() || nested.is_array() {
                    collect(nested, document, records);
                }
            }
        }
        _ => {}
    }
}

fn contains_article(value: &Value) -> bool {
    match value {
        Value::Array(items) => items.iter().any(contains_article),
        Value::Object(object) => {
            is_article_type(value)
                || object
                    .values()
                    .any(|nested| (nested.is_object() || nested.is_array()) && contains_article(nested))
        }
        _ => false,
    }
}

fn is_article_type(value: &Value) -> bool {
    match value.get("@type") {
        Some(Value::String(kind)) => ARTICLE_TYPES.contains(&kind.as_str()),
        Some(Value::Array(kinds)) => kinds
            .iter()
            .filter_map(Value::as_str)
            .any(|kind| ARTICLE_TYPES.contains(&kind)),
        _ => false,
    }
}

fn to_record(value: &Value, document: &SourceDocument) -> RawArticle {
    let url = string_field(value, "url")
        .or_else(|| string_field(value, "@id"))
        .and_then(|u| document.resolve(&u))
        .map(String::from);
    let id = string_field(value, "@id")
        .or_else(|| url.as_deref().and_then(path_id))
        .or_else(|| string_field(value, "headline"));

    RawArticle {
        id,
        title: string_field(value, "headline").or_else(|| string_field(value, "name")),
        description: string_field(value, "description"),
        url,
        image: image_field(value.get("image")),
        author: author_field(value.get("author")),
        published_at: string_field(value, "datePublished"),
        categories: categories_field(value.get("articleSection")),
        ..Default::default()
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// `image` comes as a bare string, an array, or an `ImageObject`.
fn image_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(src) => Some(src.trim().to_string()),
        Value::Array(items) => image_field(items.first()),
        Value::Object(object) => object
            .get("url")
            .and_then(Value::as_str)
            .map(|src| src.trim().to_string()),
        _ => None,
    }
}

/// `author` comes as a bare string, a Person object, or an array of either.
fn author_field(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(name) => Some(name.trim().to_string()),
        Value::Array(items) => author_field(items.first()),
        Value::Object(object) => object
            .get("name")
            .and_then(Value::as_str)
            .map(|name| name.trim().to_string()),
        _ => None,
    }
}

fn categories_field(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::String(section)) => vec![section.trim().to_string()],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn path_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let path = parsed.path().trim_matches('/');
    if path.is_empty() {
        None
    } else {
        Some(path.replace('/', "-"))
    }
}
