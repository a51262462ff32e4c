use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetAuthor {
    pub id: String,
    pub name: String,
    pub screen_name: String,
}

/// A tweet as returned by the platform. Replies are embedded in
/// platform order (chronological-or-relevance, not guaranteed stable
/// across polls).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tweet {
    pub id: String,
    pub text: String,
    pub author: TweetAuthor,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RepliesResponse {
    #[serde(default)]
    pub replies: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResults {
    #[serde(default)]
    pub statuses: Vec<Tweet>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginResponse {
    pub auth_token: String,
    pub csrf_token: String,
}

/// Opaque session blob persisted between runs. The core only ever loads
/// and saves it whole.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCookies {
    pub auth_token: String,
    pub csrf_token: String,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

/// Search result ranking requested from the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProduct {
    Top,
    Latest,
}

impl SearchProduct {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SearchProduct::Top => "top",
            SearchProduct::Latest => "latest",
        }
    }
}
