//! sb-server library interface
//!
//! Exposes the router and state so integration tests can drive the API
//! in-process.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use services::{
    ChatAssistant, FocusCoach, LanguageModel, ReadinessOrchestrator, RefinementClient,
    SqliteReadinessStore, StudyScheduler,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    pub readiness: Arc<ReadinessOrchestrator>,
    pub scheduler: StudyScheduler,
    pub focus_coach: FocusCoach,
    pub assistant: ChatAssistant,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Wire every service to one pool and one language model
    pub fn new(db: SqlitePool, llm: Arc<dyn LanguageModel>) -> Self {
        let store = Arc::new(SqliteReadinessStore::new(db.clone()));
        let readiness = ReadinessOrchestrator::new(store, RefinementClient::new(llm.clone()));

        Self {
            db,
            readiness: Arc::new(readiness),
            scheduler: StudyScheduler::new(llm.clone()),
            focus_coach: FocusCoach::new(llm.clone()),
            assistant: ChatAssistant::new(llm),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::user_routes())
        .merge(api::session_routes())
        .merge(api::quiz_score_routes())
        .merge(api::readiness_routes())
        .merge(api::assistant_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
