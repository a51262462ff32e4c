use std::sync::Arc;

use axum::{
    extract::State,
    response::Json,
};
use serde::Deserialize;
use tracing::{error, info};

use crate::AppState;

#[derive(Deserialize)]
pub struct TopicRequest {
    pub topic: String,
}

/// Accept a keyword job and return immediately; extraction and the
/// callback POST run after the response, fire-and-forget.
pub async fn queue_keywords(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TopicRequest>,
) -> Json<serde_json::Value> {
    let topic = body.topic;
    info!(topic = topic.as_str(), "Queued keyword generation");

    let message = format!("Keywords generation scheduled for topic '{topic}'.");

    tokio::spawn(process_and_callback(state, topic));

    Json(serde_json::json!({ "message": message }))
}

async fn process_and_callback(state: Arc<AppState>, topic: String) {
    let keywords = state.keywords.extract(&topic).await;
    info!(
        topic = topic.as_str(),
        count = keywords.len(),
        "Keyword extraction finished"
    );

    let payload = serde_json::json!({ "topic": topic, "keywords": keywords });
    let result = state
        .http
        .post(&state.config.callback_url)
        .json(&payload)
        .send()
        .await
        .and_then(|resp| resp.error_for_status());

    match result {
        Ok(_) => info!(
            topic = topic.as_str(),
            callback = state.config.callback_url.as_str(),
            "Keyword callback delivered"
        ),
        // The original caller already got its response; nothing to
        // surface, only to log.
        Err(e) => error!(
            topic = topic.as_str(),
            callback = state.config.callback_url.as_str(),
            error = %e,
            "Keyword callback failed"
        ),
    }
}
