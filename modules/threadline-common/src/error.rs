use thiserror::Error;

/// Failure classes that outlive a single network call.
///
/// Fetch and parse failures never appear here: each leaf client catches
/// its own and degrades to an absent/empty result plus a log line. What
/// remains is the startup-fatal auth class and the one class that
/// surfaces to API callers.
#[derive(Error, Debug)]
pub enum ThreadlineError {
    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Upstream search error: {0}")]
    Upstream(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
