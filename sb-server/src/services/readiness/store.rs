//! Read side of the session/score store as seen by the readiness pipeline

use async_trait::async_trait;
use sb_common::db::{QuizScore, StudySession};
use sqlx::SqlitePool;
use thiserror::Error;

/// A store read failed (connectivity, query, or undecodable row)
#[derive(Debug, Error)]
#[error("Failed to fetch {what} for user {user_id}: {source}")]
pub struct StoreError {
    pub what: &'static str,
    pub user_id: i64,
    #[source]
    pub source: sb_common::Error,
}

impl StoreError {
    pub fn new(what: &'static str, user_id: i64, source: sb_common::Error) -> Self {
        Self {
            what,
            user_id,
            source,
        }
    }
}

/// Per-user reads needed by the readiness pipeline
#[async_trait]
pub trait ReadinessStore: Send + Sync {
    /// Sessions ordered by `start_time` descending; empty if none
    async fn get_sessions(&self, user_id: i64) -> Result<Vec<StudySession>, StoreError>;

    /// Scores ordered by `date` descending; empty if none
    async fn get_scores(&self, user_id: i64) -> Result<Vec<QuizScore>, StoreError>;
}

/// SQLite-backed store
#[derive(Clone)]
pub struct SqliteReadinessStore {
    db: SqlitePool,
}

impl SqliteReadinessStore {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReadinessStore for SqliteReadinessStore {
    async fn get_sessions(&self, user_id: i64) -> Result<Vec<StudySession>, StoreError> {
        crate::db::sessions::list_sessions_for_user(&self.db, user_id)
            .await
            .map_err(|e| StoreError::new("study sessions", user_id, e))
    }

    async fn get_scores(&self, user_id: i64) -> Result<Vec<QuizScore>, StoreError> {
        crate::db::quiz_scores::list_scores_for_user(&self.db, user_id)
            .await
            .map_err(|e| StoreError::new("quiz scores", user_id, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sb_common::db::init_memory_database;
    use sb_common::time::parse_timestamp;

    #[tokio::test]
    async fn test_unknown_user_yields_empty_lists() {
        let pool = init_memory_database().await.unwrap();
        let store = SqliteReadinessStore::new(pool);

        assert!(store.get_sessions(42).await.unwrap().is_empty());
        assert!(store.get_scores(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_through_to_tables() {
        let pool = init_memory_database().await.unwrap();
        let user = crate::db::users::create_user(&pool, "u", "u@example.com", "pw")
            .await
            .unwrap();
        crate::db::quiz_scores::insert_score(
            &pool,
            user.id,
            "Math",
            80.0,
            &parse_timestamp("2023-05-01T13:00:00Z").unwrap(),
        )
        .await
        .unwrap();

        let store = SqliteReadinessStore::new(pool);
        let scores = store.get_scores(user.id).await.unwrap();
        assert_eq!(scores.len(), 1);
        assert_eq!(scores[0].score, 80.0);
    }

    #[tokio::test]
    async fn test_closed_pool_is_store_error() {
        let pool = init_memory_database().await.unwrap();
        pool.close().await;

        let store = SqliteReadinessStore::new(pool);
        let err = store.get_sessions(1).await.unwrap_err();
        assert_eq!(err.what, "study sessions");
        assert_eq!(err.user_id, 1);
    }
}
