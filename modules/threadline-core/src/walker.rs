use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use rand::Rng;
use tracing::{debug, warn};

use threadline_common::ThreadNode;

use crate::ledger::VisitedLedger;
use crate::traits::PostFetcher;

/// Default recursion bound. A self-thread longer than this is reported
/// truncated, never failed.
const DEFAULT_MAX_DEPTH: usize = 100;

/// How many replies (in platform order) are considered per level before
/// the same-author filter. Bounds reply-list processing per expansion.
const DEFAULT_REPLY_SCAN_LIMIT: usize = 15;

/// Default pause before each expansion's network work. The platform
/// throttles or bans sessions that fetch reply trees at full speed.
const DEFAULT_COURTESY_DELAY: Duration = Duration::from_millis(1000);

/// Random extra delay added on top of the courtesy pause.
const JITTER_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct WalkerConfig {
    pub max_depth: usize,
    pub reply_scan_limit: usize,
    pub courtesy_delay: Duration,
}

impl Default for WalkerConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            reply_scan_limit: DEFAULT_REPLY_SCAN_LIMIT,
            courtesy_delay: DEFAULT_COURTESY_DELAY,
        }
    }
}

/// Reconstructs a self-thread chain from a seed post.
///
/// Multiple walkers (or multiple top-level calls on one walker) may run
/// concurrently over the same ledger; within one chain, each level is
/// strictly sequential because it depends on the previous level's chosen
/// child.
pub struct ThreadWalker {
    fetcher: Arc<dyn PostFetcher>,
    ledger: Arc<VisitedLedger>,
    config: WalkerConfig,
}

impl ThreadWalker {
    pub fn new(
        fetcher: Arc<dyn PostFetcher>,
        ledger: Arc<VisitedLedger>,
        config: WalkerConfig,
    ) -> Self {
        Self {
            fetcher,
            ledger,
            config,
        }
    }

    /// Expand the reply tree rooted at `post_id` into a chain of
    /// same-author continuations.
    ///
    /// `seed_text` replaces the fetched text for this node when the
    /// caller already holds it (search results carry the full text).
    /// Returns `None` when the branch is pruned: depth bound hit, id
    /// already expanded, or the post fetch failed.
    pub async fn expand(
        &self,
        post_id: &str,
        seed_text: Option<&str>,
        depth: usize,
    ) -> Option<ThreadNode> {
        self.expand_inner(post_id.to_string(), seed_text.map(String::from), depth)
            .await
    }

    // Depth and ledger guards run before the courtesy pause: a rejected
    // call makes no network request and pays no delay.
    fn expand_inner(
        &self,
        post_id: String,
        seed_text: Option<String>,
        depth: usize,
    ) -> BoxFuture<'_, Option<ThreadNode>> {
        async move {
            if depth > self.config.max_depth {
                debug!(post_id, depth, "Depth limit reached, truncating chain");
                return None;
            }

            if !self.ledger.try_claim(&post_id) {
                debug!(post_id, "Post already expanded, skipping");
                return None;
            }

            self.courtesy_pause().await;

            let post = match self.fetcher.get_post(&post_id).await {
                Ok(post) => post,
                Err(e) => {
                    warn!(post_id, error = %e, "Failed to fetch post, pruning branch");
                    return None;
                }
            };

            // A failed reply lookup ends the chain at this node rather
            // than discarding the node itself.
            let replies = match self.fetcher.get_replies(&post_id).await {
                Ok(replies) => replies,
                Err(e) => {
                    warn!(post_id, error = %e, "Failed to fetch replies");
                    Vec::new()
                }
            };

            let continuation = replies
                .iter()
                .take(self.config.reply_scan_limit)
                .find(|reply| reply.author.id == post.author.id);

            let child = match continuation {
                Some(reply) => self
                    .expand_inner(reply.id.clone(), Some(reply.text.clone()), depth + 1)
                    .await
                    .map(Box::new),
                None => None,
            };

            Some(ThreadNode {
                id: post.id,
                text: seed_text.unwrap_or(post.text),
                child,
            })
        }
        .boxed()
    }

    async fn courtesy_pause(&self) {
        if self.config.courtesy_delay.is_zero() {
            return;
        }
        let jitter = Duration::from_millis(rand::rng().random_range(0..JITTER_MS));
        tokio::time::sleep(self.config.courtesy_delay + jitter).await;
    }
}
