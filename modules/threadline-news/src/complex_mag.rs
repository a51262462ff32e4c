use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};

use crate::traits::ArticleSource;

const BASE_URL: &str = "https://www.complex.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// The search page assigns its InstantSearch state to a well-known
/// symbol; the JSON object that follows this marker holds the hits.
const RESULTS_MARKER: &str = r#"window[Symbol.for("InstantSearchInitialResults")] = "#;

/// Complex adapter. Search results live in a JS assignment embedded in
/// the page, so extraction is a marker find plus a brace-matching scan
/// rather than a DOM query.
pub struct Complex {
    http: reqwest::Client,
    base_url: String,
}

impl Complex {
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

impl Default for Complex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleSource for Complex {
    fn publisher(&self) -> &'static str {
        "Complex"
    }

    async fn get_article(&self, topic: &str) -> Result<Option<String>> {
        let search_url = format!(
            "{}/search?q={}&sortBy=trending",
            self.base_url,
            topic.replace(' ', "+")
        );
        let search_html = self.fetch(&search_url).await?;

        let article_url = match first_hit_url(&search_html) {
            Some(url) => url,
            None => {
                debug!(topic, "No search hits in InstantSearch state");
                return Ok(None);
            }
        };

        debug!(url = article_url.as_str(), "Scraping article");
        let article_html = self.fetch(&article_url).await?;
        match article_text(&article_html) {
            Some(text) => Ok(Some(text)),
            None => {
                warn!(url = article_url.as_str(), "Article container not found");
                Ok(None)
            }
        }
    }
}

/// Slice out the JSON object assigned to the InstantSearch symbol:
/// locate the marker, then scan braces to the matching close. Quotes are
/// tracked so braces inside string values do not unbalance the scan.
fn embedded_results_json(html: &str) -> Option<&str> {
    let start = html.find(RESULTS_MARKER)?;
    let json_start = start + html[start..].find('{')?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in html[json_start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&html[json_start..json_start + idx + 1]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Canonical URL of the first search hit.
fn first_hit_url(html: &str) -> Option<String> {
    let raw = embedded_results_json(html)?;
    let data: serde_json::Value = match serde_json::from_str(raw) {
        Ok(data) => data,
        Err(e) => {
            warn!(error = %e, "Malformed InstantSearch JSON");
            return None;
        }
    };

    data.get("prd_content")?
        .get("results")?
        .get(0)?
        .get("hits")?
        .get(0)?
        .get("canonicalURL")?
        .as_str()
        .map(String::from)
}

/// Text of the main article container.
fn article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("div.sc-9fb0b2ca-12.gwKiPo").unwrap();
    let container = document.select(&selector).next()?;
    let text = container.text().collect::<Vec<_>>().join(" ");
    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn search_page(json: &str) -> String {
        format!(
            r#"<html><script>window[Symbol.for("InstantSearchInitialResults")] = {json};</script></html>"#
        )
    }

    #[test]
    fn brace_scan_extracts_the_assigned_object() {
        let html = search_page(r#"{"a": {"b": "value with } brace"}, "c": 1}"#);
        assert_eq!(
            embedded_results_json(&html),
            Some(r#"{"a": {"b": "value with } brace"}, "c": 1}"#)
        );
    }

    #[test]
    fn missing_marker_yields_none() {
        assert!(embedded_results_json("<html>no state here</html>").is_none());
    }

    #[test]
    fn unbalanced_braces_yield_none() {
        let html = search_page(r#"{"a": {"b": 1}"#);
        assert!(embedded_results_json(&html).is_none());
    }

    #[test]
    fn first_hit_canonical_url_is_extracted() {
        let html = search_page(
            r#"{"prd_content": {"results": [{"hits": [
                {"canonicalURL": "https://www.complex.com/article-one"},
                {"canonicalURL": "https://www.complex.com/article-two"}
            ]}]}}"#,
        );
        assert_eq!(
            first_hit_url(&html).as_deref(),
            Some("https://www.complex.com/article-one")
        );
    }

    #[test]
    fn zero_hits_yield_none() {
        let html = search_page(r#"{"prd_content": {"results": [{"hits": []}]}}"#);
        assert!(first_hit_url(&html).is_none());
    }

    #[test]
    fn article_container_text_is_joined() {
        let html = r#"<div class="sc-9fb0b2ca-12 gwKiPo"><p>First.</p><p>Second.</p></div>"#;
        assert_eq!(article_text(html).as_deref(), Some("First. Second."));
    }
}
