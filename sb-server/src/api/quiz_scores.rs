//! Quiz score endpoints

use crate::api::ApiJson;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use sb_common::db::{is_valid_quiz_score, QuizScore};
use sb_common::time::parse_timestamp;
use serde::Deserialize;
use tracing::info;

/// POST /api/quiz-scores body
#[derive(Debug, Deserialize)]
pub struct CreateScoreRequest {
    pub user_id: i64,
    pub subject: String,
    pub score: f64,
    /// RFC 3339
    pub date: String,
}

/// POST /api/quiz-scores
///
/// **Errors:**
/// - 400 Bad Request: score outside [0, 100], unparseable date,
///   blank subject, malformed body, or unknown user (foreign key)
pub async fn create_score(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateScoreRequest>,
) -> ApiResult<Json<QuizScore>> {
    if !is_valid_quiz_score(payload.score) {
        return Err(ApiError::BadRequest(format!(
            "score {} must be between 0 and 100",
            payload.score
        )));
    }
    let date = parse_timestamp(&payload.date)
        .map_err(|_| ApiError::BadRequest(format!("invalid date '{}'", payload.date)))?;

    if payload.subject.trim().is_empty() {
        return Err(ApiError::BadRequest("subject is required".to_string()));
    }

    let score = crate::db::quiz_scores::insert_score(
        &state.db,
        payload.user_id,
        payload.subject.trim(),
        payload.score,
        &date,
    )
    .await?;

    info!(user_id = score.user_id, score = score.score, "Quiz score recorded");

    Ok(Json(score))
}

/// GET /api/quiz-scores/:user_id
pub async fn list_scores(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<Vec<QuizScore>>> {
    let scores = crate::db::quiz_scores::list_scores_for_user(&state.db, user_id).await?;
    Ok(Json(scores))
}

pub fn quiz_score_routes() -> Router<AppState> {
    Router::new()
        .route("/api/quiz-scores", post(create_score))
        .route("/api/quiz-scores/:user_id", get(list_scores))
}
