use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use threadline_common::{Thread, ThreadNode, ThreadlineError};
use threadline_core::{PostFetcher, ThreadWalker, VisitedLedger, WalkerConfig};
use twitter_client::{SearchProduct, Tweet};

use crate::AppState;

/// Content signal that a post opens a multi-post thread.
const THREAD_START_MARKER: &str = "\u{1f9f5}";

/// How many raw results to return when no thread starter is found.
const FALLBACK_TOP_TWEETS: usize = 3;

#[derive(Deserialize)]
pub struct SearchParams {
    pub topic: String,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub topic: String,
    pub threads: Vec<Thread>,
    pub top_tweets: Option<Vec<Thread>>,
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> impl IntoResponse {
    let topic = params.topic;
    info!(topic = topic.as_str(), "Searching for threads");

    // The upstream search is the only failure that surfaces to the
    // caller; everything below it degrades per branch.
    let tweets = match state.twitter.search_tweets(&topic, SearchProduct::Top).await {
        Ok(tweets) => tweets,
        Err(e) => {
            error!(topic = topic.as_str(), error = %e, "Tweet search failed");
            let err = ThreadlineError::Upstream(e.to_string());
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": err.to_string()})),
            )
                .into_response();
        }
    };

    info!(topic = topic.as_str(), count = tweets.len(), "Search returned tweets");

    let starters = thread_starters(&tweets);
    if starters.is_empty() {
        info!(topic = topic.as_str(), "No thread starters, returning top tweets");
        return Json(SearchResponse {
            topic,
            threads: Vec::new(),
            top_tweets: Some(fallback_top_tweets(&tweets)),
        })
        .into_response();
    }

    info!(topic = topic.as_str(), starters = starters.len(), "Expanding threads");

    // One ledger per request: walks within this search dedup against
    // each other, never against earlier requests.
    let ledger = Arc::new(VisitedLedger::new());
    let fetcher: Arc<dyn PostFetcher> = state.twitter.clone();
    let walker = ThreadWalker::new(
        fetcher,
        ledger,
        WalkerConfig {
            max_depth: state.config.max_thread_depth,
            ..WalkerConfig::default()
        },
    );

    let walks = starters
        .iter()
        .map(|tweet| walker.expand(&tweet.id, Some(&tweet.text), 0));
    let chains = futures::future::join_all(walks).await;

    let threads: Vec<Thread> = chains
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(idx, node)| Thread {
            thread_id: (idx + 1) as i64,
            tweets: node,
        })
        .collect();

    info!(topic = topic.as_str(), threads = threads.len(), "Thread expansion complete");

    Json(SearchResponse {
        topic,
        threads,
        top_tweets: None,
    })
    .into_response()
}

fn thread_starters(tweets: &[Tweet]) -> Vec<&Tweet> {
    tweets
        .iter()
        .filter(|tweet| tweet.text.contains(THREAD_START_MARKER))
        .collect()
}

/// Wrap the top raw results as single-node chains.
fn fallback_top_tweets(tweets: &[Tweet]) -> Vec<Thread> {
    tweets
        .iter()
        .take(FALLBACK_TOP_TWEETS)
        .enumerate()
        .map(|(idx, tweet)| Thread {
            thread_id: (idx + 1) as i64,
            tweets: ThreadNode::leaf(&tweet.id, &tweet.text),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use threadline_core::testing::tweet;

    #[test]
    fn starters_are_filtered_by_marker() {
        let tweets = vec![
            tweet("1", "a", "no marker here"),
            tweet("2", "b", "a thread \u{1f9f5} begins"),
            tweet("3", "c", "also nothing"),
        ];
        let starters = thread_starters(&tweets);
        assert_eq!(starters.len(), 1);
        assert_eq!(starters[0].id, "2");
    }

    #[test]
    fn fallback_wraps_at_most_three_leaves() {
        let tweets: Vec<_> = (0..5)
            .map(|i| tweet(&i.to_string(), "a", &format!("tweet {i}")))
            .collect();
        let top = fallback_top_tweets(&tweets);
        assert_eq!(top.len(), 3);
        assert_eq!(top[0].thread_id, 1);
        assert_eq!(top[2].tweets.id, "2");
        assert!(top.iter().all(|t| t.tweets.child.is_none()));
    }
}
