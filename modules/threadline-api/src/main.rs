use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::OpenRouter;
use browserless_client::BrowserlessClient;
use threadline_common::{Config, ThreadlineError};
use threadline_core::KeywordExtractor;
use threadline_news::{Complex, EconomicTimes, GoogleNewsIndex, NewYorkTimes, Watchlist};
use twitter_client::{establish_session, Credentials, TwitterClient};

mod rest;

pub struct AppState {
    pub twitter: Arc<TwitterClient>,
    pub keywords: KeywordExtractor,
    pub watchlist: Watchlist,
    /// Client for the keyword callback POST.
    pub http: reqwest::Client,
    pub config: Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("threadline=info".parse()?))
        .init();

    info!("Starting threadline API...");

    let config = Config::from_env();

    // The session is established once, before the listener binds. A
    // terminal login failure means the process refuses to serve rather
    // than run unauthenticated.
    let twitter = Arc::new(TwitterClient::new());
    let credentials = Credentials {
        username: config.twitter_username.clone(),
        email: config.twitter_email.clone(),
        password: config.twitter_password.clone(),
    };
    establish_session(&twitter, &credentials, &config.cookies_file)
        .await
        .map_err(|e| ThreadlineError::Auth(e.to_string()))?;

    let llm = OpenRouter::new(&config.openrouter_api_key).with_app_name("threadline");
    let keywords = KeywordExtractor::new(llm, &config.keyword_model);

    let browser = BrowserlessClient::new(
        &config.browserless_url,
        config.browserless_token.as_deref(),
    );
    let watchlist = Watchlist::new(
        Box::new(GoogleNewsIndex::new()),
        vec![
            Box::new(NewYorkTimes::new(browser)),
            Box::new(EconomicTimes::new()),
            Box::new(Complex::new()),
        ],
    );

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(10))
        .build()?;

    let addr = format!("{}:{}", config.api_host, config.api_port);

    let state = Arc::new(AppState {
        twitter,
        keywords,
        watchlist,
        http,
        config,
    });

    let app = Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        // REST API
        .route("/search", post(rest::search))
        .route("/queue-keywords", post(rest::queue_keywords))
        .route("/articles", post(rest::articles))
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!(addr = addr.as_str(), "Listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
