use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use ns_core::{Error, ResponseEnvelope, SummaryRequest, TtsRequest, TtsResponse};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::error::ApiError;
use crate::AppState;

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn summarize(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<ResponseEnvelope>, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let envelope = state.orchestrator.handle_summarize(request).await?;
    Ok(Json(envelope))
}

pub async fn text_to_speech(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<TtsRequest>, JsonRejection>,
) -> Result<Json<TtsResponse>, ApiError> {
    let Json(request) = payload.map_err(invalid_body)?;
    let response = state.orchestrator.handle_tts(request).await?;
    Ok(Json(response))
}

fn invalid_body(rejection: JsonRejection) -> ApiError {
    ApiError(Error::Validation(format!("Invalid request body: {}", rejection.body_text())))
}
