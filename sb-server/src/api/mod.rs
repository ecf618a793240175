//! HTTP API handlers for sb-server

pub mod assistant;
pub mod health;
pub mod json;
pub mod quiz_scores;
pub mod readiness;
pub mod sessions;
pub mod users;

pub use assistant::assistant_routes;
pub use health::health_routes;
pub use json::ApiJson;
pub use quiz_scores::quiz_score_routes;
pub use readiness::readiness_routes;
pub use sessions::session_routes;
pub use users::user_routes;
