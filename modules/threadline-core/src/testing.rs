// Test mocks for the walker's trait boundary.
//
// MockPostFetcher is HashMap-backed and counts post fetches per id, so
// tests can assert that guarded expansions make no network calls.

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use twitter_client::{Tweet, TweetAuthor};

use crate::traits::PostFetcher;

/// Build a tweet with the given id, author id and text. Author name and
/// handle are derived from the author id.
pub fn tweet(id: &str, author_id: &str, text: &str) -> Tweet {
    Tweet {
        id: id.to_string(),
        text: text.to_string(),
        author: TweetAuthor {
            id: author_id.to_string(),
            name: format!("user-{author_id}"),
            screen_name: format!("user_{author_id}"),
        },
    }
}

/// HashMap-based post fetcher. Errors for unregistered ids.
/// Builder pattern: `.on_post()`, `.on_replies()`, `.on_search()`.
#[derive(Default)]
pub struct MockPostFetcher {
    posts: HashMap<String, Tweet>,
    replies: HashMap<String, Vec<Tweet>>,
    searches: HashMap<String, Vec<Tweet>>,
    post_fetches: Mutex<HashMap<String, usize>>,
}

impl MockPostFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_post(mut self, post: Tweet) -> Self {
        self.posts.insert(post.id.clone(), post);
        self
    }

    pub fn on_replies(mut self, id: &str, replies: Vec<Tweet>) -> Self {
        self.replies.insert(id.to_string(), replies);
        self
    }

    pub fn on_search(mut self, query: &str, results: Vec<Tweet>) -> Self {
        self.searches.insert(query.to_string(), results);
        self
    }

    /// How many times `get_post` was called for this id.
    pub fn post_fetches(&self, id: &str) -> usize {
        self.post_fetches
            .lock()
            .expect("counter lock poisoned")
            .get(id)
            .copied()
            .unwrap_or(0)
    }

    /// Total `get_post` calls across all ids.
    pub fn total_post_fetches(&self) -> usize {
        self.post_fetches
            .lock()
            .expect("counter lock poisoned")
            .values()
            .sum()
    }
}

#[async_trait]
impl PostFetcher for MockPostFetcher {
    async fn get_post(&self, id: &str) -> Result<Tweet> {
        *self
            .post_fetches
            .lock()
            .expect("counter lock poisoned")
            .entry(id.to_string())
            .or_insert(0) += 1;

        match self.posts.get(id) {
            Some(post) => Ok(post.clone()),
            None => bail!("MockPostFetcher: no post registered for {id}"),
        }
    }

    async fn get_replies(&self, id: &str) -> Result<Vec<Tweet>> {
        Ok(self.replies.get(id).cloned().unwrap_or_default())
    }

    async fn search_posts(&self, query: &str) -> Result<Vec<Tweet>> {
        match self.searches.get(query) {
            Some(results) => Ok(results.clone()),
            None => bail!("MockPostFetcher: no search registered for {query:?}"),
        }
    }
}
