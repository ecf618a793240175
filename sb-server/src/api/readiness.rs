//! Readiness endpoint

use crate::services::readiness::ReadinessResult;
use crate::{ApiError, ApiResult, AppState};
use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

/// GET /api/readiness/:user_id
///
/// Recomputed on every call. Any pipeline failure is a 502 carrying only
/// the generic retry message; the classified error goes to the log.
pub async fn get_readiness(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> ApiResult<Json<ReadinessResult>> {
    match state.readiness.compute_readiness(user_id).await {
        Ok(result) => {
            tracing::info!(user_id, refined_score = result.refined_score, "Readiness computed");
            Ok(Json(result))
        }
        Err(e) => {
            tracing::error!(
                user_id,
                stage = ?e.failed_during(),
                error = %e,
                "Readiness calculation failed"
            );
            Err(ApiError::BadGateway(e.user_message().to_string()))
        }
    }
}

pub fn readiness_routes() -> Router<AppState> {
    Router::new().route("/api/readiness/:user_id", get(get_readiness))
}
