use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::json;

use crate::error::AppError;
use crate::intake;
use crate::models::SignatureRequest;
use crate::server::AppState;

pub async fn stats_handler(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let stats = intake::campaign_stats(&state.pool, Utc::now()).await?;
    Ok(Json(stats))
}

pub async fn signature_handler(
    State(state): State<AppState>,
    Json(payload): Json<SignatureRequest>,
) -> Result<impl IntoResponse, AppError> {
    let name = payload.name.unwrap_or_default();
    let email = payload.email.unwrap_or_default();
    intake::submit_signature(&state.pool, &name, &email).await?;

    Ok(Json(json!({ "success": true })))
}

pub async fn health_handler() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "gaia-commons-petition",
    }))
}
