//! gleaner turns an arbitrary HTML document into a normalized list of
//! articles (candidate feed items) without site-specific configuration.
//!
//! Independent heuristic scrapers each propose candidates from the
//! document: structured data ([`scrapers::schema`]), semantic markup
//! ([`scrapers::semantic_html`]), statistical clustering of repeated
//! structures ([`scrapers::html`]), and embedded state blobs
//! ([`scrapers::json_state`]). The engine runs every applicable one
//! concurrently and reconciles their overlapping proposals through URL
//! deduplication and a cleanup pipeline.
//!
//! ```no_run
//! # async fn demo() -> Result<(), gleaner::Error> {
//! use gleaner::{Config, SourceDocument};
//! use reqwest::header::HeaderMap;
//! use url::Url;
//!
//! let url = Url::parse("https://example.com/news").unwrap();
//! let html = "<html>...</html>".to_string();
//! let document = SourceDocument::new(url, HeaderMap::new(), html);
//!
//! let articles = gleaner::articles(&document, &Config::default()).await?;
//! for article in &articles {
//!     println!("{} -> {:?}", article.guid(), article.title());
//! }
//! # Ok(())
//! # }
//! ```

pub mod article;
pub mod cleanup;
pub mod config;
pub mod dedup;
pub mod document;
pub mod engine;
pub mod error;
pub mod scrapers;
pub mod text;

pub use article::{Article, Enclosure, RawArticle, RawEnclosure};
pub use config::Config;
pub use document::SourceDocument;
pub use engine::articles;
pub use error::Error;
pub use scrapers::ScraperKind;
