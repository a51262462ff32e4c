use serde::Serialize;
use tracing::{debug, info, warn};

use crate::traits::{ArticleSource, NewsIndex};

/// An article pulled from a watched publisher for a topic.
#[derive(Debug, Clone, Serialize)]
pub struct ScrapedArticle {
    pub source: String,
    pub title: String,
    pub topic: String,
    pub content: String,
}

/// Runs topic scrapes across a fixed set of watched publishers.
///
/// For each publisher, the news index is asked for "topic publisher";
/// the site adapter is only invoked when the top index result is
/// actually attributed to that publisher. Every failure is logged and
/// skipped — one bad site never sinks the sweep.
pub struct Watchlist {
    index: Box<dyn NewsIndex>,
    sources: Vec<Box<dyn ArticleSource>>,
}

impl Watchlist {
    pub fn new(index: Box<dyn NewsIndex>, sources: Vec<Box<dyn ArticleSource>>) -> Self {
        Self { index, sources }
    }

    pub async fn scrape(&self, topic: &str) -> Vec<ScrapedArticle> {
        let mut articles = Vec::new();

        for source in &self.sources {
            let publisher = source.publisher();
            let query = format!("{topic} {publisher}");

            let results = match self.index.search(&query).await {
                Ok(results) => results,
                Err(e) => {
                    warn!(publisher, error = %e, "News index search failed");
                    continue;
                }
            };

            let entry = match results.first() {
                Some(entry) => entry,
                None => {
                    debug!(publisher, topic, "No index coverage");
                    continue;
                }
            };

            if entry.publisher != publisher {
                debug!(
                    publisher,
                    found = entry.publisher.as_str(),
                    "Top result attributed elsewhere, skipping"
                );
                continue;
            }

            match source.get_article(topic).await {
                Ok(Some(content)) => {
                    info!(publisher, title = entry.title.as_str(), "Scraped article");
                    articles.push(ScrapedArticle {
                        source: publisher.to_string(),
                        title: entry.title.clone(),
                        topic: topic.to_string(),
                        content,
                    });
                }
                Ok(None) => {
                    warn!(publisher, title = entry.title.as_str(), "Failed to scrape article");
                }
                Err(e) => {
                    warn!(publisher, error = %e, "Article scrape errored");
                }
            }
        }

        info!(topic, count = articles.len(), "Watchlist sweep complete");
        articles
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use anyhow::{bail, Result};
    use async_trait::async_trait;

    use crate::google::NewsIndexEntry;

    struct MockIndex {
        results: HashMap<String, Vec<NewsIndexEntry>>,
    }

    impl MockIndex {
        fn new() -> Self {
            Self {
                results: HashMap::new(),
            }
        }

        fn on_query(mut self, query: &str, entries: Vec<NewsIndexEntry>) -> Self {
            self.results.insert(query.to_string(), entries);
            self
        }
    }

    #[async_trait]
    impl NewsIndex for MockIndex {
        async fn search(&self, query: &str) -> Result<Vec<NewsIndexEntry>> {
            match self.results.get(query) {
                Some(entries) => Ok(entries.clone()),
                None => bail!("MockIndex: no results registered for {query:?}"),
            }
        }
    }

    struct FixedSource {
        publisher: &'static str,
        article: Option<&'static str>,
    }

    #[async_trait]
    impl ArticleSource for FixedSource {
        fn publisher(&self) -> &'static str {
            self.publisher
        }

        async fn get_article(&self, _topic: &str) -> Result<Option<String>> {
            Ok(self.article.map(String::from))
        }
    }

    fn entry(title: &str, publisher: &str) -> NewsIndexEntry {
        NewsIndexEntry {
            title: title.into(),
            publisher: publisher.into(),
        }
    }

    #[tokio::test]
    async fn matching_publisher_is_scraped() {
        let index = MockIndex::new().on_query(
            "housing Complex",
            vec![entry("Sneaker market cools", "Complex")],
        );
        let watchlist = Watchlist::new(
            Box::new(index),
            vec![Box::new(FixedSource {
                publisher: "Complex",
                article: Some("article body"),
            })],
        );

        let articles = watchlist.scrape("housing").await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, "Complex");
        assert_eq!(articles[0].title, "Sneaker market cools");
        assert_eq!(articles[0].topic, "housing");
        assert_eq!(articles[0].content, "article body");
    }

    #[tokio::test]
    async fn mismatched_attribution_skips_the_site() {
        let index = MockIndex::new().on_query(
            "housing Complex",
            vec![entry("Syndicated elsewhere", "Some Blog")],
        );
        let watchlist = Watchlist::new(
            Box::new(index),
            vec![Box::new(FixedSource {
                publisher: "Complex",
                article: Some("should not be fetched"),
            })],
        );

        assert!(watchlist.scrape("housing").await.is_empty());
    }

    #[tokio::test]
    async fn index_failure_and_empty_scrape_are_absorbed() {
        // First source: index errors (nothing registered). Second:
        // coverage exists but the adapter finds no article. Third:
        // healthy. Only the third produces output.
        let index = MockIndex::new()
            .on_query(
                "rates The Economic Times",
                vec![entry("Rates hold", "The Economic Times")],
            )
            .on_query(
                "rates The New York Times",
                vec![entry("Fed watch", "The New York Times")],
            );
        let watchlist = Watchlist::new(
            Box::new(index),
            vec![
                Box::new(FixedSource {
                    publisher: "Complex",
                    article: Some("unreachable"),
                }),
                Box::new(FixedSource {
                    publisher: "The Economic Times",
                    article: None,
                }),
                Box::new(FixedSource {
                    publisher: "The New York Times",
                    article: Some("fed story"),
                }),
            ],
        );

        let articles = watchlist.scrape("rates").await;
        assert_eq!(articles.len(), 1);
        assert_eq!(articles[0].source, "The New York Times");
    }
}
