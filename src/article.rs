//! Normalized article records.
//!
//! Scrapers emit [`RawArticle`] field sets; the engine wraps each one into
//! an [`Article`], an immutable view that sanitizes and derives fields
//! lazily. Construction never fails: invalid field values degrade to
//! absent, and records that fail the validity rule are skipped upstream.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset};
use once_cell::sync::OnceCell;
use percent_encoding::percent_decode_str;
use regex::Regex;
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::LazyLock;
use url::Url;

use crate::text;

static HREF_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]+)""#).unwrap());
static SRC_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"src="([^"]+)""#).unwrap());

const GUID_SEPARATOR: &str = "|";

/// Unvalidated field set produced by one scraper pass over one document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawArticle {
    pub id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: Option<String>,
    pub image: Option<String>,
    pub author: Option<String>,
    /// Explicit guid-source values, in order. Usually empty; the guid then
    /// derives from `url` and `id`.
    pub guid: Vec<String>,
    pub published_at: Option<String>,
    pub categories: Vec<String>,
    pub enclosure: Option<RawEnclosure>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEnclosure {
    pub url: String,
    pub content_type: Option<String>,
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Enclosure {
    pub url: Url,
    pub content_type: Option<String>,
    pub size: Option<u64>,
}

/// Immutable article record. The backing fields are frozen at
/// construction; derived fields are computed once on first access.
#[derive(Debug, Clone)]
pub struct Article {
    raw: RawArticle,
    scraper: &'static str,
    url: OnceCell<Option<Url>>,
    image: OnceCell<Option<Url>>,
    description: OnceCell<Option<String>>,
    guid: OnceCell<String>,
    published_at: OnceCell<Option<DateTime<FixedOffset>>>,
    categories: OnceCell<Vec<String>>,
    enclosure: OnceCell<Option<Enclosure>>,
}

impl Article {
    pub fn new(raw: RawArticle, scraper: &'static str) -> Self {
        Self {
            raw,
            scraper,
            url: OnceCell::new(),
            image: OnceCell::new(),
            description: OnceCell::new(),
            guid: OnceCell::new(),
            published_at: OnceCell::new(),
            categories: OnceCell::new(),
            enclosure: OnceCell::new(),
        }
    }

    /// An article is usable when it has a URL, an id, and at least one of
    /// title or description.
    pub fn valid(&self) -> bool {
        let present = |field: &Option<String>| {
            field
                .as_deref()
                .map(|value| !value.trim().is_empty())
                .unwrap_or(false)
        };
        present(&self.raw.url)
            && present(&self.raw.id)
            && (present(&self.raw.title) || present(&self.raw.description))
    }

    /// Name of the scraper strategy that proposed this article.
    pub fn scraper(&self) -> &'static str {
        self.scraper
    }

    /// The frozen backing fields, as emitted by the scraper.
    pub fn raw(&self) -> &RawArticle {
        &self.raw
    }

    pub fn id(&self) -> Option<&str> {
        nonempty(&self.raw.id)
    }

    pub fn title(&self) -> Option<&str> {
        nonempty(&self.raw.title)
    }

    pub fn author(&self) -> Option<&str> {
        nonempty(&self.raw.author)
    }

    /// Sanitized absolute URL; invalid values become `None`, never an error.
    pub fn url(&self) -> Option<&Url> {
        self.url
            .get_or_init(|| sanitize_url(self.raw.url.as_deref().unwrap_or("")))
            .as_ref()
    }

    pub fn image(&self) -> Option<&Url> {
        self.image
            .get_or_init(|| sanitize_url(self.raw.image.as_deref().unwrap_or("")))
            .as_ref()
    }

    /// Description with markup sanitized and absolutized, whitespace
    /// normalized, and a duplicated leading headline stripped.
    pub fn description(&self) -> Option<&str> {
        self.description
            .get_or_init(|| self.derive_description())
            .as_deref()
    }

    /// Short stable token for feed readers. Equal input fields always
    /// produce an equal guid.
    pub fn guid(&self) -> &str {
        self.guid.get_or_init(|| self.derive_guid())
    }

    pub fn published_at(&self) -> Option<&DateTime<FixedOffset>> {
        self.published_at
            .get_or_init(|| {
                self.raw
                    .published_at
                    .as_deref()
                    .and_then(parse_datetime)
            })
            .as_ref()
    }

    /// Trimmed, empty-free, order-preserving deduplicated categories.
    pub fn categories(&self) -> &[String] {
        self.categories.get_or_init(|| {
            let mut seen = HashSet::new();
            let mut out = Vec::new();
            for category in &self.raw.categories {
                let trimmed = text::squish(category);
                if !trimmed.is_empty() && seen.insert(trimmed.clone()) {
                    out.push(trimmed);
                }
            }
            out
        })
    }

    /// Explicit enclosure when given, otherwise one synthesized from the
    /// image URL.
    pub fn enclosure(&self) -> Option<&Enclosure> {
        self.enclosure
            .get_or_init(|| self.derive_enclosure())
            .as_ref()
    }

    fn derive_description(&self) -> Option<String> {
        let raw = self.raw.description.as_deref()?.trim();
        if raw.is_empty() {
            return None;
        }

        let mut value = if text::contains_markup(raw) {
            let clean = ammonia::Builder::default().clean(raw).to_string();
            match self.url() {
                Some(base) => resolve_links(&clean, base),
                None => clean,
            }
            .trim()
            .to_string()
        } else {
            text::squish(raw)
        };

        // A description that repeats the headline up front is the headline
        // plus noise; keep the remainder only.
        if let Some(title) = self.title()
            && let Some(position) = value.find(title)
            && position < value.len() / 2
        {
            value = value[position + title.len()..].trim_start().to_string();
        }

        if value.is_empty() { None } else { Some(value) }
    }

    fn derive_guid(&self) -> String {
        let explicit: Vec<&str> = self
            .raw
            .guid
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect();

        let seed = if explicit.is_empty() {
            let url = self.raw.url.as_deref().unwrap_or("").trim();
            let id = self.raw.id.as_deref().unwrap_or("").trim();
            format!("{url}{GUID_SEPARATOR}{id}")
        } else {
            explicit.join(GUID_SEPARATOR)
        };

        checksum_base36(&seed)
    }

    fn derive_enclosure(&self) -> Option<Enclosure> {
        if let Some(raw) = &self.raw.enclosure {
            let url = sanitize_url(&raw.url)?;
            let content_type = raw.content_type.clone().or_else(|| content_type_for(&url));
            return Some(Enclosure {
                content_type,
                size: raw.size,
                url,
            });
        }

        let image = self.image()?.clone();
        Some(Enclosure {
            content_type: content_type_for(&image),
            size: None,
            url: image,
        })
    }
}

impl Serialize for Article {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Article", 11)?;
        state.serialize_field("id", &self.id())?;
        state.serialize_field("title", &self.title())?;
        state.serialize_field("description", &self.description())?;
        state.serialize_field("url", &self.url().map(Url::as_str))?;
        state.serialize_field("image", &self.image().map(Url::as_str))?;
        state.serialize_field("author", &self.author())?;
        state.serialize_field("guid", &self.guid())?;
        state.serialize_field(
            "published_at",
            &self.published_at().map(DateTime::to_rfc3339),
        )?;
        state.serialize_field("categories", &self.categories())?;
        state.serialize_field("enclosure", &self.enclosure())?;
        state.serialize_field("scraper", &self.scraper)?;
        state.end()
    }
}

fn nonempty(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

/// Squish whitespace out of the value, normalize percent-encoding, and
/// parse. Anything that does not come out as an absolute http(s) URL is
/// absent.
fn sanitize_url(value: &str) -> Option<Url> {
    let squished: String = value.split_whitespace().collect();
    if squished.is_empty() {
        return None;
    }
    // Decoding first lets the parser re-encode canonically, so `%7Ex` and
    // `~x` sanitize to the same URL. Hosts go through IDNA inside the
    // parser.
    let decoded = match percent_decode_str(&squished).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => squished,
    };
    Url::parse(&decoded)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
}

/// Resolve relative href/src attributes inside sanitized description HTML.
fn resolve_links(html: &str, base_url: &Url) -> String {
    let html = HREF_REGEX.replace_all(html, |caps: &regex::Captures| {
        match base_url.join(&caps[1]) {
            Ok(absolute) => format!(r#"href="{absolute}""#),
            Err(_) => caps[0].to_string(),
        }
    });
    let html = SRC_REGEX.replace_all(&html, |caps: &regex::Captures| {
        match base_url.join(&caps[1]) {
            Ok(absolute) => format!(r#"src="{absolute}""#),
            Err(_) => caps[0].to_string(),
        }
    });
    html.into_owned()
}

/// 32-bit checksum of the seed, rendered in base-36.
fn checksum_base36(seed: &str) -> String {
    let digest = md5::compute(seed.as_bytes());
    let word = u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]]);
    to_base36(word)
}

fn to_base36(mut value: u32) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if value == 0 {
        return "0".into();
    }
    let mut out = String::new();
    while value > 0 {
        out.insert(0, char::from(DIGITS[(value % 36) as usize]));
        value /= 36;
    }
    out
}

fn parse_datetime(value: &str) -> Option<DateTime<FixedOffset>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc2822(value) {
        return Some(parsed);
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|datetime| datetime.and_utc().fixed_offset())
}

fn content_type_for(url: &Url) -> Option<String> {
    let path = url.path().to_ascii_lowercase();
    let extension = path.rsplit_once('.').map(|(_, ext)| ext)?;
    let content_type = match extension {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        "mp3" => "audio/mpeg",
        "m4a" => "audio/mp4",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "pdf" => "application/pdf",
        _ => return None,
    };
    Some(content_type.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(raw: RawArticle) -> Article {
        Article::new(raw, "semantic_html")
    }

    fn minimal() -> RawArticle {
        RawArticle {
            id: Some("article-1".into()),
            title: Some("Article 1 Title".into()),
            url: Some("https://example.com/article1".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_validity_requires_url_id_and_text() {
        assert!(article(minimal()).valid());

        let mut no_url = minimal();
        no_url.url = Some("   ".into());
        assert!(!article(no_url).valid());

        let mut no_id = minimal();
        no_id.id = None;
        assert!(!article(no_id).valid());

        let mut no_text = minimal();
        no_text.title = None;
        assert!(!article(no_text).valid());

        let mut description_only = minimal();
        description_only.title = None;
        description_only.description = Some("Still something to say".into());
        assert!(article(description_only).valid());
    }

    #[test]
    fn test_url_sanitization() {
        let mut raw = minimal();
        raw.url = Some("  https://example.com/a b/c  ".into());
        let a = article(raw);
        // internal whitespace is squished out before parsing
        assert_eq!(a.url().unwrap().as_str(), "https://example.com/ab/c");

        let mut bad = minimal();
        bad.url = Some("not a url".into());
        assert!(article(bad).url().is_none());

        let mut scheme = minimal();
        scheme.url = Some("javascript:alert(1)".into());
        assert!(article(scheme).url().is_none());
    }

    #[test]
    fn test_url_percent_normalization() {
        let mut encoded = minimal();
        encoded.url = Some("https://example.com/%7Euser".into());
        let mut plain = minimal();
        plain.url = Some("https://example.com/~user".into());
        assert_eq!(
            article(encoded).url().unwrap().as_str(),
            article(plain).url().unwrap().as_str()
        );
    }

    #[test]
    fn test_idna_host_normalization() {
        let mut raw = minimal();
        raw.url = Some("https://bücher.example/a".into());
        assert_eq!(
            article(raw).url().unwrap().host_str(),
            Some("xn--bcher-kva.example")
        );
    }

    #[test]
    fn test_guid_is_deterministic() {
        let a = article(minimal());
        let first = a.guid().to_string();
        assert_eq!(a.guid(), first);

        let b = article(minimal());
        assert_eq!(b.guid(), first);
    }

    #[test]
    fn test_guid_same_url_and_id_same_guid() {
        let mut other = minimal();
        other.title = Some("A different headline entirely".into());
        assert_eq!(article(minimal()).guid(), article(other).guid());
    }

    #[test]
    fn test_guid_uses_explicit_sources_when_given() {
        let mut raw = minimal();
        raw.guid = vec!["  ".into(), "abc".into(), "def".into()];
        let with_sources = article(raw).guid().to_string();
        assert_ne!(with_sources, article(minimal()).guid());

        let mut same = minimal();
        same.guid = vec!["abc".into(), "".into(), "def".into()];
        assert_eq!(article(same).guid(), with_sources);
    }

    #[test]
    fn test_guid_is_base36() {
        let a = article(minimal());
        assert!(!a.guid().is_empty());
        assert!(a.guid().len() <= 7);
        assert!(
            a.guid()
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_to_base36() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(123), "3f");
    }

    #[test]
    fn test_plain_description_is_squished() {
        let mut raw = minimal();
        raw.description = Some("  some   spaced\n\ntext ".into());
        assert_eq!(article(raw).description(), Some("some spaced text"));
    }

    #[test]
    fn test_markup_description_is_sanitized_and_absolutized() {
        let mut raw = minimal();
        raw.description =
            Some(r#"<p>Read <a href="/more">more</a></p><script>alert(1)</script>"#.into());
        let a = article(raw);
        let description = a.description().unwrap();
        assert!(!description.contains("<script"));
        assert!(description.contains(r#"href="https://example.com/more""#));
    }

    #[test]
    fn test_description_strips_duplicated_headline() {
        let mut raw = minimal();
        raw.description = Some("Article 1 Title and then the actual summary of it".into());
        assert_eq!(
            article(raw).description(),
            Some("and then the actual summary of it")
        );
    }

    #[test]
    fn test_description_keeps_late_title_mention() {
        let mut raw = minimal();
        raw.description =
            Some("A long enough lead-in sentence that only later mentions Article 1 Title".into());
        let a = article(raw);
        assert!(a.description().unwrap().starts_with("A long enough"));
    }

    #[test]
    fn test_categories_deduplicated_and_trimmed() {
        let mut raw = minimal();
        raw.categories = vec![
            " News ".into(),
            "Tech".into(),
            "News".into(),
            "  ".into(),
            "Tech".into(),
        ];
        assert_eq!(article(raw).categories(), ["News", "Tech"]);
    }

    #[test]
    fn test_enclosure_synthesized_from_image() {
        let mut raw = minimal();
        raw.image = Some("https://example.com/cover.jpg".into());
        let a = article(raw);
        let enclosure = a.enclosure().unwrap();
        assert_eq!(enclosure.url.as_str(), "https://example.com/cover.jpg");
        assert_eq!(enclosure.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(enclosure.size, None);
    }

    #[test]
    fn test_explicit_enclosure_wins_over_image() {
        let mut raw = minimal();
        raw.image = Some("https://example.com/cover.jpg".into());
        raw.enclosure = Some(RawEnclosure {
            url: "https://example.com/episode.mp3".into(),
            content_type: None,
            size: Some(123),
        });
        let a = article(raw);
        let enclosure = a.enclosure().unwrap();
        assert_eq!(enclosure.url.as_str(), "https://example.com/episode.mp3");
        assert_eq!(enclosure.content_type.as_deref(), Some("audio/mpeg"));
        assert_eq!(enclosure.size, Some(123));
    }

    #[test]
    fn test_no_enclosure_without_image() {
        assert!(article(minimal()).enclosure().is_none());
    }

    #[test]
    fn test_published_at_parsing() {
        let mut rfc3339 = minimal();
        rfc3339.published_at = Some("2026-08-06T10:30:00+02:00".into());
        assert!(article(rfc3339).published_at().is_some());

        let mut rfc2822 = minimal();
        rfc2822.published_at = Some("Thu, 06 Aug 2026 10:30:00 +0200".into());
        assert!(article(rfc2822).published_at().is_some());

        let mut date_only = minimal();
        date_only.published_at = Some("2026-08-06".into());
        assert!(article(date_only).published_at().is_some());

        let mut junk = minimal();
        junk.published_at = Some("yesterday-ish".into());
        assert!(article(junk).published_at().is_none());
    }

    #[test]
    fn test_serializes_derived_view() {
        let mut raw = minimal();
        raw.image = Some("https://example.com/cover.png".into());
        let value = serde_json::to_value(article(raw)).unwrap();
        assert_eq!(value["title"], "Article 1 Title");
        assert_eq!(value["url"], "https://example.com/article1");
        assert_eq!(value["scraper"], "semantic_html");
        assert_eq!(value["enclosure"]["content_type"], "image/png");
        assert!(value["guid"].is_string());
    }
}
