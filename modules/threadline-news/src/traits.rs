use anyhow::Result;
use async_trait::async_trait;

use crate::google::NewsIndexEntry;

/// Search index over news coverage, queried before committing to a
/// site scrape. Implemented by [`GoogleNewsIndex`](crate::GoogleNewsIndex);
/// mocked in watchlist tests.
#[async_trait]
pub trait NewsIndex: Send + Sync {
    async fn search(&self, query: &str) -> Result<Vec<NewsIndexEntry>>;
}

/// One news site. Maps a topic to zero-or-one article body.
///
/// Adapters absorb their own parse and network failures: `Ok(None)`
/// means "nothing usable found", and callers only see an `Err` for
/// failures worth logging upstream. No adapter shares state with
/// another; each one is a self-contained fetch-and-extract.
#[async_trait]
pub trait ArticleSource: Send + Sync {
    /// Publisher name as it appears in the news index (exact match).
    fn publisher(&self) -> &'static str;

    /// Fetch the best-matching article body for a topic.
    async fn get_article(&self, topic: &str) -> Result<Option<String>>;
}
