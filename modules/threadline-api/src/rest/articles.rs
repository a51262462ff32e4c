use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use tracing::info;

use crate::AppState;

#[derive(Deserialize)]
pub struct ArticlesParams {
    pub topic: String,
}

/// Run the watchlist sweep for a topic. Site failures are absorbed by
/// the adapters, so this always answers with whatever was scraped —
/// possibly an empty list.
pub async fn articles(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ArticlesParams>,
) -> Json<serde_json::Value> {
    info!(topic = params.topic.as_str(), "Scraping watchlist articles");

    let articles = state.watchlist.scrape(&params.topic).await;

    Json(serde_json::json!({
        "topic": params.topic,
        "articles": articles,
    }))
}
