use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use tracing::{debug, warn};
use url::Url;

use browserless_client::BrowserlessClient;

use crate::traits::ArticleSource;

const BASE_URL: &str = "https://www.nytimes.com";

/// Article body container on a rendered article page. The page hydrates
/// this client-side, hence the headless-browser step.
const ARTICLE_BODY_SELECTOR: &str = "div.css-53u6y8";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// New York Times adapter. The search page is plain HTML, but article
/// bodies only exist after script execution, so the article fetch goes
/// through browserless with a wait on the body container.
pub struct NewYorkTimes {
    http: reqwest::Client,
    browser: BrowserlessClient,
    base_url: String,
}

impl NewYorkTimes {
    pub fn new(browser: BrowserlessClient) -> Self {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            browser,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl ArticleSource for NewYorkTimes {
    fn publisher(&self) -> &'static str {
        "The New York Times"
    }

    async fn get_article(&self, topic: &str) -> Result<Option<String>> {
        let search_url = format!(
            "{}/search?dropmab=false&lang=en&query={}&sort=best",
            self.base_url,
            topic.replace(' ', "+")
        );
        let search_html = self
            .http
            .get(&search_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let article_url = match first_search_result(&search_html, &self.base_url) {
            Some(url) => url,
            None => {
                debug!(topic, "No search results");
                return Ok(None);
            }
        };

        debug!(url = article_url.as_str(), "Rendering article");
        let rendered = self
            .browser
            .content_after_selector(&article_url, ARTICLE_BODY_SELECTOR)
            .await?;

        match article_text(&rendered) {
            Some(text) => Ok(Some(text)),
            None => {
                warn!(url = article_url.as_str(), "Article body missing after render");
                Ok(None)
            }
        }
    }
}

/// Absolute URL of the first result card on the search page.
fn first_search_result(html: &str, base_url: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.css-1i8vfl5").unwrap();
    let link_selector = Selector::parse("a[href]").unwrap();

    let card = document.select(&card_selector).next()?;
    let href = card
        .select(&link_selector)
        .next()?
        .value()
        .attr("href")?;

    let base = Url::parse(base_url).ok()?;
    base.join(href).ok().map(String::from)
}

/// Text of the rendered article body container.
fn article_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let selector = Selector::parse(ARTICLE_BODY_SELECTOR).unwrap();
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

    #[test]
    fn first_result_href_is_resolved_against_the_base() {
        let html = r#"
            <div class="css-1i8vfl5">
              <h4 class="css-nsjm9t">Headline one</h4>
              <a href="/2025/08/01/us/story-one.html">read</a>
            </div>
            <div class="css-1i8vfl5">
              <a href="/2025/08/02/us/story-two.html">read</a>
            </div>"#;
        assert_eq!(
            first_search_result(html, "https://www.nytimes.com").as_deref(),
            Some("https://www.nytimes.com/2025/08/01/us/story-one.html")
        );
    }

    #[test]
    fn no_result_cards_yield_none() {
        assert!(first_search_result("<html></html>", "https://www.nytimes.com").is_none());
    }

    #[test]
    fn rendered_body_text_is_extracted() {
        let html = r#"<div class="css-53u6y8"><p>Lede.</p><p>Body.</p></div>"#;
        assert_eq!(article_text(html).as_deref(), Some("Lede. Body."));
    }

    #[test]
    fn missing_body_container_yields_none() {
        assert!(article_text("<div class='other'>text</div>").is_none());
    }
}
