// Session bootstrap: cookie restore, then credential login with retries.
//
// The login loop is an explicit state machine so the retry policy is
// visible in one place instead of threaded through control flow.

use std::path::Path;
use std::time::Duration;

use tracing::{error, info, warn};

use crate::error::{Result, TwitterError};
use crate::types::SessionCookies;
use crate::TwitterClient;

pub const MAX_LOGIN_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginState {
    Unauthenticated,
    /// Attempt number, starting at 1.
    Attempting(u32),
    Authenticated,
    Failed,
}

#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Exponential backoff between login attempts: 2s, 4s, 8s...
fn backoff_after(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Transition out of a failed attempt: retry or give up.
fn after_failed_attempt(attempt: u32, max_attempts: u32) -> LoginState {
    if attempt < max_attempts {
        LoginState::Attempting(attempt + 1)
    } else {
        LoginState::Failed
    }
}

/// Restore a saved session blob and validate it against the platform.
/// Returns false (never an error) when the file is missing, unreadable,
/// or the session it holds is no longer accepted.
pub async fn load_cookies(client: &TwitterClient, path: &str) -> bool {
    if !Path::new(path).exists() {
        info!(path, "No cookies file found");
        return false;
    }

    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path, error = %e, "Failed to read cookies file");
            return false;
        }
    };

    let cookies: SessionCookies = match serde_json::from_str(&raw) {
        Ok(c) => c,
        Err(e) => {
            warn!(path, error = %e, "Failed to parse cookies file");
            return false;
        }
    };

    client.set_cookies(cookies);
    match client.me().await {
        Ok(account) => {
            info!(
                name = account.name.as_str(),
                screen_name = account.screen_name.as_str(),
                "Restored session from cookies"
            );
            true
        }
        Err(e) => {
            warn!(path, error = %e, "Saved session rejected by platform");
            false
        }
    }
}

/// Persist the client's current session blob.
pub async fn save_cookies(client: &TwitterClient, path: &str) -> Result<()> {
    let cookies = client
        .cookies()
        .ok_or_else(|| TwitterError::Auth("no session to save".to_string()))?;
    let raw = serde_json::to_string_pretty(&cookies)?;
    tokio::fs::write(path, raw)
        .await
        .map_err(|e| TwitterError::Auth(format!("failed to write {path}: {e}")))?;
    info!(path, "Session cookies saved");
    Ok(())
}

/// Establish an authenticated session: restore cookies if possible,
/// otherwise log in with up to [`MAX_LOGIN_ATTEMPTS`] attempts and
/// exponential backoff. A `Failed` terminal state is returned as an
/// `Auth` error — callers must refuse to serve unauthenticated.
pub async fn establish_session(
    client: &TwitterClient,
    credentials: &Credentials,
    cookies_path: &str,
) -> Result<()> {
    let mut state = LoginState::Unauthenticated;

    loop {
        state = match state {
            LoginState::Unauthenticated => {
                if load_cookies(client, cookies_path).await {
                    LoginState::Authenticated
                } else {
                    LoginState::Attempting(1)
                }
            }
            LoginState::Attempting(attempt) => {
                info!(attempt, "Logging in to Twitter");
                match client
                    .login(
                        &credentials.username,
                        &credentials.email,
                        &credentials.password,
                    )
                    .await
                {
                    Ok(_) => {
                        if let Err(e) = save_cookies(client, cookies_path).await {
                            warn!(error = %e, "Login succeeded but cookies were not saved");
                        }
                        LoginState::Authenticated
                    }
                    Err(e) => {
                        warn!(attempt, error = %e, "Login attempt failed");
                        let next = after_failed_attempt(attempt, MAX_LOGIN_ATTEMPTS);
                        if let LoginState::Attempting(_) = next {
                            tokio::time::sleep(backoff_after(attempt)).await;
                        }
                        next
                    }
                }
            }
            LoginState::Authenticated => {
                info!("Session established");
                return Ok(());
            }
            LoginState::Failed => {
                error!(
                    attempts = MAX_LOGIN_ATTEMPTS,
                    "All login attempts exhausted"
                );
                return Err(TwitterError::Auth(format!(
                    "login failed after {MAX_LOGIN_ATTEMPTS} attempts"
                )));
            }
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_doubles_per_attempt() {
        assert_eq!(backoff_after(1), Duration::from_secs(2));
        assert_eq!(backoff_after(2), Duration::from_secs(4));
        assert_eq!(backoff_after(3), Duration::from_secs(8));
    }

    #[test]
    fn failed_attempts_retry_until_the_cap() {
        assert_eq!(after_failed_attempt(1, 3), LoginState::Attempting(2));
        assert_eq!(after_failed_attempt(2, 3), LoginState::Attempting(3));
        assert_eq!(after_failed_attempt(3, 3), LoginState::Failed);
    }
}
