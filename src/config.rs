//! Scraper and cleanup configuration.
//!
//! Every key is optional and defaulted; unknown or mistyped keys are
//! rejected when deserializing, so a config that survives
//! [`Config::from_value`] is safe to hand to the engine.

use serde::Deserialize;

use crate::error::Error;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub scraper: ScraperSettings,
    pub cleanup: CleanupSettings,
}

impl Config {
    /// Boundary entry point: deserialize and validate an untyped config
    /// value. Fails before any scraping can start.
    pub fn from_value(value: serde_json::Value) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_value(value).map_err(|err| Error::InvalidConfig(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.scraper.html.minimum_selector_frequency == 0 {
            return Err(Error::InvalidConfig(
                "scraper.html.minimum_selector_frequency must be at least 1".into(),
            ));
        }
        if self.scraper.html.use_top_selectors == 0 {
            return Err(Error::InvalidConfig(
                "scraper.html.use_top_selectors must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ScraperSettings {
    pub schema: Toggle,
    pub semantic_html: Toggle,
    pub html: HtmlScraperSettings,
    pub json_state: Toggle,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Toggle {
    pub enabled: bool,
}

impl Default for Toggle {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct HtmlScraperSettings {
    pub enabled: bool,
    /// Minimum number of matches a selector signature needs before its
    /// elements are considered candidate articles.
    pub minimum_selector_frequency: usize,
    /// How many of the highest-frequency signatures to extract from.
    pub use_top_selectors: usize,
}

impl Default for HtmlScraperSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            minimum_selector_frequency: 2,
            use_top_selectors: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct CleanupSettings {
    /// When false, drop articles whose URL host differs from the source
    /// document's host.
    pub keep_different_domain: bool,
    /// Drop titled articles with fewer words than this in the title.
    pub min_words_title: usize,
}

impl Default for CleanupSettings {
    fn default() -> Self {
        Self {
            keep_different_domain: true,
            min_words_title: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.scraper.schema.enabled);
        assert!(config.scraper.semantic_html.enabled);
        assert!(config.scraper.html.enabled);
        assert!(config.scraper.json_state.enabled);
        assert_eq!(config.scraper.html.minimum_selector_frequency, 2);
        assert_eq!(config.scraper.html.use_top_selectors, 5);
        assert!(config.cleanup.keep_different_domain);
        assert_eq!(config.cleanup.min_words_title, 3);
    }

    #[test]
    fn test_from_value_empty_object_matches_defaults() {
        let config = Config::from_value(json!({})).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_from_value_partial_override() {
        let config = Config::from_value(json!({
            "scraper": { "html": { "minimum_selector_frequency": 4 } },
            "cleanup": { "min_words_title": 5 }
        }))
        .unwrap();
        assert_eq!(config.scraper.html.minimum_selector_frequency, 4);
        assert_eq!(config.scraper.html.use_top_selectors, 5);
        assert_eq!(config.cleanup.min_words_title, 5);
    }

    #[test]
    fn test_unknown_top_level_key_rejected() {
        assert!(Config::from_value(json!({ "scrapers": {} })).is_err());
    }

    #[test]
    fn test_unknown_nested_key_rejected() {
        let result = Config::from_value(json!({
            "scraper": { "html": { "use_top_selector": 3 } }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_mistyped_value_rejected() {
        let result = Config::from_value(json!({
            "cleanup": { "keep_different_domain": "yes" }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_frequency_rejected() {
        let result = Config::from_value(json!({
            "scraper": { "html": { "minimum_selector_frequency": 0 } }
        }));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_top_selectors_rejected() {
        let result = Config::from_value(json!({
            "scraper": { "html": { "use_top_selectors": 0 } }
        }));
        assert!(matches!(result, Err(Error::InvalidConfig(_))));
    }
}
