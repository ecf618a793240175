//! AI pass-through endpoints: chat, scheduling, focus coaching

use crate::services::focus_coach::FocusCycle;
use crate::services::scheduler::{SchedulePlan, ScheduleError, ScheduleEvent};
use crate::services::AiError;
use crate::api::ApiJson;
use crate::{ApiError, ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

/// Provider failures are 502; details stay in the log
fn upstream(feature: &'static str, err: AiError) -> ApiError {
    tracing::warn!(feature, error = %err, "AI request failed");
    ApiError::BadGateway(format!("{} is unavailable; try again", feature))
}

/// POST /api/chat body
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

/// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ChatRequest>,
) -> ApiResult<Json<ChatResponse>> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message is required".to_string()));
    }

    let reply = state
        .assistant
        .reply(&payload.message)
        .await
        .map_err(|e| upstream("chat", e))?;

    Ok(Json(ChatResponse { reply }))
}

/// POST /api/schedule body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRequest {
    pub events: Vec<ScheduleEvent>,
    /// Present: adjust these sessions instead of proposing new ones
    #[serde(default)]
    pub scheduled_sessions: Option<Vec<serde_json::Value>>,
}

/// POST /api/schedule
pub async fn schedule(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<ScheduleRequest>,
) -> ApiResult<Json<SchedulePlan>> {
    let result = match &payload.scheduled_sessions {
        Some(scheduled) => state.scheduler.adjust(&payload.events, scheduled).await,
        None => state.scheduler.schedule(&payload.events).await,
    };

    match result {
        Ok(plan) => Ok(Json(plan)),
        Err(ScheduleError::InvalidEvent(msg)) => Err(ApiError::BadRequest(msg)),
        Err(ScheduleError::Ai(e)) => Err(upstream("scheduler", e)),
    }
}

/// POST /api/focus/adjust body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusAdjustRequest {
    pub feedback: String,
    #[serde(flatten)]
    pub current: FocusCycle,
}

/// POST /api/focus/adjust
pub async fn adjust_focus(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<FocusAdjustRequest>,
) -> ApiResult<Json<FocusCycle>> {
    if payload.feedback.trim().is_empty() {
        return Err(ApiError::BadRequest("feedback is required".to_string()));
    }
    if payload.current.work_duration_secs == 0 || payload.current.break_duration_secs == 0 {
        return Err(ApiError::BadRequest(
            "durations must be greater than zero".to_string(),
        ));
    }

    let adjusted = state
        .focus_coach
        .adjust(&payload.feedback, payload.current)
        .await
        .map_err(|e| upstream("focus coach", e))?;

    Ok(Json(adjusted))
}

pub fn assistant_routes() -> Router<AppState> {
    Router::new()
        .route("/api/chat", post(chat))
        .route("/api/schedule", post(schedule))
        .route("/api/focus/adjust", post(adjust_focus))
}
