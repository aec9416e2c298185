//! JSON-state scraper: walks the serialized application state that
//! server-rendered sites embed as a data island (`script#__NEXT_DATA__`)
//! and collects objects shaped like articles.

use scraper::Selector;
use serde_json::Value;
use std::sync::LazyLock;
use url::Url;

use crate::article::RawArticle;
use crate::document::SourceDocument;

static STATE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("script#__NEXT_DATA__").unwrap());

const TITLE_KEYS: &[&str] = &["title", "headline", "name"];
const URL_KEYS: &[&str] = &["url", "href", "link", "permalink", "slug"];
const DESCRIPTION_KEYS: &[&str] = &["description", "summary", "excerpt"];
const DATE_KEYS: &[&str] = &["publishedAt", "published_at", "datePublished", "date"];

pub fn applicable(document: &SourceDocument) -> bool {
    state(document).is_some()
}

pub fn scrape(document: &SourceDocument) -> Vec<RawArticle> {
    let mut records = Vec::new();
    if let Some(state) = state(document) {
        walk(&state, document, &mut records);
    }
    records
}

/// The parsed state blob, when present and of recognized shape (a JSON
/// object). Anything else makes this scraper inapplicable.
fn state(document: &SourceDocument) -> Option<Value> {
    let html = document.parse();
    let script = html.select(&STATE_SELECTOR).next()?;
    let body = script.text().collect::<String>();
    serde_json::from_str::<Value>(body.trim())
        .ok()
        .filter(Value::is_object)
}

fn walk(value: &Value, document: &SourceDocument, records: &mut Vec<RawArticle>) {
    match value {
        Value::Array(items) => {
            for item in items {
                walk(item, document, records);
            }
        }
        Value::Object(object) => {
            if let Some(record) = to_record(value, document) {
                records.push(record);
            }
            for nested in object.values() {
                if nested.is_object() || nested.is_array() {
                    walk(nested, document, records);
                }
            }
        }
        _ => {}
    }
}

/// An object is article-shaped when it carries both a title-like and a
/// url-like string. Individual malformed entries yield nothing.
fn to_record(value: &Value, document: &SourceDocument) -> Option<RawArticle> {
    let title = first_string(value, TITLE_KEYS)?;
    let link = first_string(value, URL_KEYS)?;
    let url = document.resolve(&link)?;

    let id = first_string(value, &["id", "guid"])
        .or_else(|| number_field(value, "id"))
        .or_else(|| path_id(&url));

    Some(RawArticle {
        id,
        title: Some(title),
        description: first_string(value, DESCRIPTION_KEYS),
        url: Some(url.to_string()),
        image: image_field(value),
        author: author_field(value),
        published_at: first_string(value, DATE_KEYS),
        categories: categories_field(value),
        ..Default::default()
    })
}

fn first_string(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| {
        value
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    })
}

fn number_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_i64).map(|n| n.to_string())
}

fn image_field(value: &Value) -> Option<String> {
    let image = value.get("image").or_else(|| value.get("thumbnail"))?;
    match image {
        Value::String(src) => Some(src.trim().to_string()),
        Value::Object(object) => object
            .get("url")
            .or_else(|| object.get("src"))
            .and_then(Value::as_str)
            .map(|src| src.trim().to_string()),
        _ => None,
    }
}

fn author_field(value: &Value) -> Option<String> {
    match value.get("author")? {
        Value::String(name) => Some(name.trim().to_string()),
        Value::Object(object) => object
            .get("name")
            .and_then(Value::as_str)
            .map(|name| name.trim().to_string()),
        _ => None,
    }
}

fn categories_field(value: &Value) -> Vec<String> {
    let tags = value.get("tags").or_else(|| value.get("categories"));
    match tags {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(|s| s.trim().to_string())
            .collect(),
        _ => Vec::new(),
    }
}

fn path_id(url: &Url) -> Option<String> {
    let path = url.path().trim_matches('/');
    if path.is_empty() {
        None
    } else {
        Some(path.replace('/', "-"))
    }
}
