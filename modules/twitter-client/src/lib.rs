pub mod auth;
pub mod error;
pub mod types;

pub use auth::{establish_session, load_cookies, save_cookies, Credentials, LoginState};
pub use error::{Result, TwitterError};
pub use types::{SearchProduct, SessionCookies, Tweet, TweetAuthor};

use std::sync::RwLock;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use tracing::debug;

use types::{LoginResponse, RepliesResponse, SearchResults};

const BASE_URL: &str = "https://api.x.com/1.1";

/// Request timeout. The platform stalls rather than refuses when it is
/// throttling, so this has to be generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(45);

/// Cookie-session client for the X/Twitter web API.
///
/// Holds the session tokens obtained from login (or a restored cookie
/// blob) and attaches them to every request. Cheap to share behind an
/// `Arc`; all methods take `&self`.
pub struct TwitterClient {
    http: reqwest::Client,
    base_url: String,
    session: RwLock<Option<SessionCookies>>,
}

impl TwitterClient {
    pub fn new() -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            "User-Agent",
            HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64)"),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("Origin", HeaderValue::from_static("https://x.com"));
        headers.insert("Referer", HeaderValue::from_static("https://x.com/"));
        headers.insert("DNT", HeaderValue::from_static("1"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http,
            base_url: BASE_URL.to_string(),
            session: RwLock::new(None),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Restore a previously saved session blob.
    pub fn set_cookies(&self, cookies: SessionCookies) {
        *self.session.write().expect("session lock poisoned") = Some(cookies);
    }

    /// Current session blob, if authenticated.
    pub fn cookies(&self) -> Option<SessionCookies> {
        self.session.read().expect("session lock poisoned").clone()
    }

    fn session_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        let guard = self.session.read().expect("session lock poisoned");
        let cookies = guard
            .as_ref()
            .ok_or_else(|| TwitterError::Auth("no active session".to_string()))?;
        let cookie_line = format!("auth_token={}; ct0={}", cookies.auth_token, cookies.csrf_token);
        headers.insert(
            "Cookie",
            HeaderValue::from_str(&cookie_line)
                .map_err(|e| TwitterError::Auth(format!("invalid cookie value: {e}")))?,
        );
        headers.insert(
            "x-csrf-token",
            HeaderValue::from_str(&cookies.csrf_token)
                .map_err(|e| TwitterError::Auth(format!("invalid csrf token: {e}")))?,
        );
        Ok(headers)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let resp = self
            .http
            .get(url)
            .headers(self.session_headers()?)
            .send()
            .await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(TwitterError::NotFound(url.to_string()));
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            let body = resp.text().await.unwrap_or_default();
            return Err(TwitterError::Auth(body));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(TwitterError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Fetch a single tweet by id.
    pub async fn get_tweet(&self, tweet_id: &str) -> Result<Tweet> {
        debug!(tweet_id, "Fetching tweet");
        let url = format!("{}/statuses/show.json?id={}", self.base_url, tweet_id);
        match self.get_json(&url).await {
            Err(TwitterError::NotFound(_)) => Err(TwitterError::NotFound(tweet_id.to_string())),
            other => other,
        }
    }

    /// Fetch the replies to a tweet, in platform order.
    pub async fn get_replies(&self, tweet_id: &str) -> Result<Vec<Tweet>> {
        debug!(tweet_id, "Fetching replies");
        let url = format!("{}/statuses/replies.json?id={}", self.base_url, tweet_id);
        let resp: RepliesResponse = match self.get_json(&url).await {
            Err(TwitterError::NotFound(_)) => {
                return Err(TwitterError::NotFound(tweet_id.to_string()))
            }
            other => other?,
        };
        Ok(resp.replies)
    }

    /// Run a tweet search and return results in platform ranking order.
    pub async fn search_tweets(&self, query: &str, product: SearchProduct) -> Result<Vec<Tweet>> {
        debug!(query, product = product.as_str(), "Searching tweets");
        let url = format!(
            "{}/search/tweets.json?q={}&result_type={}",
            self.base_url,
            urlencode(query),
            product.as_str()
        );
        let results: SearchResults = self.get_json(&url).await?;
        Ok(results.statuses)
    }

    /// Validate the current session by fetching the logged-in account.
    pub async fn me(&self) -> Result<TweetAuthor> {
        let url = format!("{}/account/verify_credentials.json", self.base_url);
        self.get_json(&url).await
    }

    /// Authenticate with credentials. On success the session tokens are
    /// stored on the client and returned for persistence.
    pub async fn login(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<SessionCookies> {
        let url = format!("{}/account/login.json", self.base_url);
        let body = serde_json::json!({
            "username": username,
            "email": email,
            "password": password,
        });

        let resp = self.http.post(&url).json(&body).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TwitterError::Auth(format!(
                "login rejected (status {}): {message}",
                status.as_u16()
            )));
        }

        let login: LoginResponse = resp.json().await?;
        let cookies = SessionCookies {
            auth_token: login.auth_token,
            csrf_token: login.csrf_token,
            saved_at: Some(chrono::Utc::now()),
        };
        self.set_cookies(cookies.clone());
        Ok(cookies)
    }
}

impl Default for TwitterClient {
    fn default() -> Self {
        Self::new()
    }
}

fn urlencode(s: &str) -> String {
    url::form_urlencoded::byte_serialize(s.as_bytes()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urlencode_escapes_query_characters() {
        assert_eq!(urlencode("rust lang"), "rust+lang");
        assert_eq!(urlencode("c++ & rust"), "c%2B%2B+%26+rust");
    }

    #[test]
    fn session_headers_require_login() {
        let client = TwitterClient::new();
        assert!(matches!(
            client.session_headers(),
            Err(TwitterError::Auth(_))
        ));

        client.set_cookies(SessionCookies {
            auth_token: "tok".into(),
            csrf_token: "csrf".into(),
            saved_at: None,
        });
        let headers = client.session_headers().unwrap();
        assert_eq!(headers.get("Cookie").unwrap(), "auth_token=tok; ct0=csrf");
        assert_eq!(headers.get("x-csrf-token").unwrap(), "csrf");
    }
}
