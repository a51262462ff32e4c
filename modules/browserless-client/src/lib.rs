pub mod error;

pub use error::{BrowserlessError, Result};

use std::time::Duration;

use tracing::debug;

/// Navigation timeout passed to the browser. Script-heavy article pages
/// routinely take 10s+ to settle.
const GOTO_TIMEOUT_MS: u64 = 30_000;

pub struct BrowserlessClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl BrowserlessClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    fn endpoint(&self) -> String {
        let mut endpoint = format!("{}/content", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }
        endpoint
    }

    async fn post_content(&self, body: serde_json::Value) -> Result<String> {
        let resp = self
            .client
            .post(self.endpoint())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(BrowserlessError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(resp.text().await?)
    }

    /// Fetch fully-rendered HTML content for a URL via the Browserless
    /// /content endpoint.
    pub async fn content(&self, url: &str) -> Result<String> {
        debug!(url, "Rendering page");
        self.post_content(serde_json::json!({
            "url": url,
            "gotoOptions": { "timeout": GOTO_TIMEOUT_MS },
        }))
        .await
    }

    /// Like [`content`](Self::content), but block until `selector`
    /// appears in the DOM. Needed for pages that hydrate their article
    /// body client-side after load.
    pub async fn content_after_selector(&self, url: &str, selector: &str) -> Result<String> {
        debug!(url, selector, "Rendering page, waiting for selector");
        self.post_content(serde_json::json!({
            "url": url,
            "gotoOptions": { "timeout": GOTO_TIMEOUT_MS },
            "waitForSelector": { "selector": selector, "timeout": GOTO_TIMEOUT_MS },
        }))
        .await
    }
}
