//! User registration

use crate::api::ApiJson;
use crate::{ApiError, ApiResult, AppState};
use axum::{extract::State, routing::post, Json, Router};
use sb_common::db::User;
use serde::Deserialize;
use tracing::info;

/// POST /api/users body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// POST /api/users
///
/// **Errors:**
/// - 400 Bad Request: malformed body, blank username or password,
///   email without `@`
/// - 409 Conflict: username already taken (UNIQUE constraint)
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<CreateUserRequest>,
) -> ApiResult<Json<User>> {
    let username = payload.username.trim();

    if username.is_empty() {
        return Err(ApiError::BadRequest("username is required".to_string()));
    }
    if payload.password.is_empty() {
        return Err(ApiError::BadRequest("password is required".to_string()));
    }
    if !payload.email.contains('@') {
        return Err(ApiError::BadRequest(format!(
            "'{}' is not an email address",
            payload.email
        )));
    }

    let user =
        crate::db::users::create_user(&state.db, username, payload.email.trim(), &payload.password)
            .await?;

    info!(user_id = user.id, username = %user.username, "User created");

    Ok(Json(user))
}

pub fn user_routes() -> Router<AppState> {
    Router::new().route("/api/users", post(create_user))
}
