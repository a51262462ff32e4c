use std::time::Duration;

use anyhow::Result;
use scraper::{Html, Selector};
use tracing::debug;

const BASE_URL: &str = "https://news.google.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One result card from the news index: headline plus the publisher
/// attribution line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsIndexEntry {
    pub title: String,
    pub publisher: String,
}

/// Google News search index. Used to discover whether a watched
/// publisher has coverage for a topic before committing to a site
/// scrape.
pub struct GoogleNewsIndex {
    http: reqwest::Client,
    base_url: String,
}

impl GoogleNewsIndex {
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

    /// Search the index and return result cards in page order.
    pub async fn search(&self, query: &str) -> Result<Vec<NewsIndexEntry>> {
        let url = format!(
            "{}/search?q={}&hl=en-US&gl=US&ceid=US%3Aen",
            self.base_url,
            query.replace(' ', "+")
        );
        debug!(url = url.as_str(), "Searching news index");

        let html = self.http.get(&url).send().await?.error_for_status()?.text().await?;
        Ok(parse_index(&html))
    }
}

impl Default for GoogleNewsIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl crate::traits::NewsIndex for GoogleNewsIndex {
    async fn search(&self, query: &str) -> Result<Vec<NewsIndexEntry>> {
        GoogleNewsIndex::search(self, query).await
    }
}

fn parse_index(html: &str) -> Vec<NewsIndexEntry> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse("div.B6pJDd").unwrap();
    let title_selector = Selector::parse("a.JtKRv").unwrap();
    let publisher_selector = Selector::parse("div.vr1PYe").unwrap();

    let mut entries = Vec::new();
    for card in document.select(&card_selector) {
        let title = card
            .select(&title_selector)
            .next()
            .map(|el| el.text().collect::<String>());
        let publisher = card
            .select(&publisher_selector)
            .next()
            .map(|el| el.text().collect::<String>());

        if let (Some(title), Some(publisher)) = (title, publisher) {
            entries.push(NewsIndexEntry {
                title: title.trim().to_string(),
                publisher: publisher.trim().to_string(),
            });
        }
    }
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_HTML: &str = r#"
        <html><body>
          <div class="B6pJDd">
            <a class="JtKRv" href="./articles/one">Housing fight heads to court</a>
            <div class="vr1PYe">The New York Times</div>
          </div>
          <div class="B6pJDd">
            <a class="JtKRv" href="./articles/two">Markets rally on rate cut</a>
            <div class="vr1PYe">The Economic Times</div>
          </div>
          <div class="B6pJDd">
            <a class="JtKRv" href="./articles/three">Card with no publisher line</a>
          </div>
        </body></html>"#;

    #[test]
    fn index_cards_parse_in_page_order() {
        let entries = parse_index(INDEX_HTML);
        assert_eq!(
            entries,
            vec![
                NewsIndexEntry {
                    title: "Housing fight heads to court".into(),
                    publisher: "The New York Times".into(),
                },
                NewsIndexEntry {
                    title: "Markets rally on rate cut".into(),
                    publisher: "The Economic Times".into(),
                },
            ]
        );
    }

    #[test]
    fn empty_page_parses_to_no_entries() {
        assert!(parse_index("<html><body></body></html>").is_empty());
    }
}
