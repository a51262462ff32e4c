// Trait boundary between the walker and the platform client.
//
// The walker only needs three lookups; putting them behind a trait keeps
// the session/login machinery out of the core and lets tests run against
// a HashMap-backed mock with no network.

use anyhow::Result;
use async_trait::async_trait;

use twitter_client::{SearchProduct, Tweet, TwitterClient};

#[async_trait]
pub trait PostFetcher: Send + Sync {
    /// Fetch a single post by id.
    async fn get_post(&self, id: &str) -> Result<Tweet>;

    /// Fetch a post's replies in platform order.
    async fn get_replies(&self, id: &str) -> Result<Vec<Tweet>>;

    /// Run a topic search, platform "top" ranking.
    async fn search_posts(&self, query: &str) -> Result<Vec<Tweet>>;
}

#[async_trait]
impl PostFetcher for TwitterClient {
    async fn get_post(&self, id: &str) -> Result<Tweet> {
        Ok(self.get_tweet(id).await?)
    }

    async fn get_replies(&self, id: &str) -> Result<Vec<Tweet>> {
        Ok(TwitterClient::get_replies(self, id).await?)
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Tweet>> {
        Ok(self.search_tweets(query, SearchProduct::Top).await?)
    }
}
