//! Study session endpoints

use crate::api::ApiJson;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use sb_common::db::StudySession;
use sb_common::time::parse_timestamp;
use serde::Deserialize;
use tracing::info;

/// POST /api/sessions body
#[derive(Debug, Deserialize)]
pub struct CreateSessionRequest {
    pub user_id: i64,
    /// RFC 3339
    pub start_time: String,
    /// RFC 3339
    pub end_time: String,
    pub subject: String,
}

/// POST /api/sessions
///
/// **Errors:**
/// - 400 Bad Request: unparseable timestamp, `end_time < start_time`,
///   blank subject, malformed body, or unknown user (foreign key)
pub async fn create_session(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateSessionRequest>,
) -> ApiResult<Json<StudySession>> {
    let start = parse_timestamp(&payload.start_time)
        .map_err(|_| ApiError::BadRequest(format!("invalid start_time '{}'", payload.start_time)))?;
    let end = parse_timestamp(&payload.end_time)
        .map_err(|_| ApiError::BadRequest(format!("invalid end_time '{}'", payload.end_time)))?;

    if end < start {
        return Err(ApiError::BadRequest(
            "end_time must not be before start_time".to_string(),
        ));
    }
    if payload.subject.trim().is_empty() {
        return Err(ApiError::BadRequest("subject is required".to_string()));
    }

    let session = crate::db::sessions::insert_session(
        &state.db,
        payload.user_id,
        &start,
        &end,
        payload.subject.trim(),
    )
    .await?;

    info!(
        user_id = session.user_id,
        session_id = session.id,
        hours = session.duration_hours(),
        "Study session recorded"
    );

    Ok(Json(session))
}

/// GET /api/sessions/:user_id
pub async fn list_sessions(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<StudySession>>> {
    let sessions = crate::db::sessions::list_sessions_for_user(&state.db, user_id).await?;
    Ok(Json(sessions))
}

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", post(create_session))
        .route("/api/sessions/:user_id", get(list_sessions))
}
