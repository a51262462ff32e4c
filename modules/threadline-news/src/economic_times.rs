use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::traits::ArticleSource;

const BASE_URL: &str = "https://economictimes.indiatimes.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Economic Times adapter. Both the topic listing and the article page
/// embed JSON-LD (`ItemList` and `NewsArticle`), so extraction is two
/// structured-data lookups with no rendered-DOM step.
pub struct EconomicTimes {
    http: reqwest::Client,
    base_url: String,
}

impl EconomicTimes {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        Ok(self.http.get(url).send().await?.error_for_status()?.text().await?)
    }
}

impl Default for EconomicTimes {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleSource for EconomicTimes {
    fn publisher(&self) -> &'static str {
        "The Economic Times"
    }

    async fn get_article(&self, topic: &str) -> Result<Option<String>> {
        let listing_url = format!("{}/topic/{}", self.base_url, topic.replace(' ', "-"));
        let listing_html = self.fetch(&listing_url).await?;

        let article_url = match first_listed_url(&listing_html) {
            Some(url) => url,
            None => {
                debug!(topic, "No ItemList entry on topic page");
                return Ok(None);
            }
        };

        debug!(url = article_url.as_str(), "Scraping article");
        let article_html = self.fetch(&article_url).await?;
        match article_body(&article_html) {
            Some(body) => Ok(Some(body)),
            None => {
                warn!(url = article_url.as_str(), "NewsArticle schema not found");
                Ok(None)
            }
        }
    }
}

/// First JSON-LD script on the page whose body contains `marker`, parsed
/// as JSON.
fn ld_json_block(html: &str, marker: &str) -> Option<serde_json::Value> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

    for script in document.select(&selector) {
        let body = script.text().collect::<String>();
        if !body.contains(marker) {
            continue;
        }
        match serde_json::from_str(&body) {
            Ok(value) => return Some(value),
            Err(e) => {
                warn!(marker, error = %e, "Malformed JSON-LD block");
                return None;
            }
        }
    }
    None
}

/// URL of the first entry in the topic page's `ItemList`.
fn first_listed_url(html: &str) -> Option<String> {
    let data = ld_json_block(html, "ItemList")?;
    data.get("itemListElement")?
        .get(0)?
        .get("url")?
        .as_str()
        .map(String::from)
}

/// `articleBody` of the page's `NewsArticle` JSON-LD.
fn article_body(html: &str) -> Option<String> {
    let data = ld_json_block(html, "NewsArticle")?;
    data.get("articleBody")?.as_str().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_yields_first_item_url() {
        let html = r#"<html><head>
            <script type="application/ld+json">
              {"@type": "ItemList", "itemListElement": [
                {"name": "First story", "url": "https://example.com/first"},
                {"name": "Second story", "url": "https://example.com/second"}
              ]}
            </script>
        </head></html>"#;
        assert_eq!(
            first_listed_url(html).as_deref(),
            Some("https://example.com/first")
        );
    }

    #[test]
    fn article_page_yields_body() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type": "WebPage"}</script>
            <script type="application/ld+json">
              {"@type": "NewsArticle", "articleBody": "Full article text."}
            </script>
        </head></html>"#;
        assert_eq!(article_body(html).as_deref(), Some("Full article text."));
    }

    #[test]
    fn malformed_ld_json_is_absorbed() {
        let html = r#"<script type="application/ld+json">{"@type": "ItemList", </script>"#;
        assert!(first_listed_url(html).is_none());
    }

    #[test]
    fn missing_schema_yields_none() {
        assert!(article_body("<html><body>plain page</body></html>").is_none());
    }
}
