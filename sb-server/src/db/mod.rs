//! Database access for sb-server
//!
//! Plain CRUD over the shared SQLite pool. Timestamps are written in the
//! normalized RFC 3339 form from `sb_common::time::format_timestamp`, so
//! ordering by the TEXT columns is chronological.

pub mod quiz_scores;
pub mod sessions;
pub mod users;

use sb_common::Result;
use sqlx::SqlitePool;
use std::path::Path;

/// Open the database file and make sure the schema exists
pub async fn init_database_pool(db_path: &Path) -> Result<SqlitePool> {
    tracing::debug!("Connecting to database: {}", db_path.display());
    sb_common::db::init_database(db_path).await
}

/// Which constraint a failed write ran into
enum Violation {
    Unique,
    ForeignKey,
}

fn violation(err: &sqlx::Error) -> Option<Violation> {
    match err {
        sqlx::Error::Database(db) if db.is_unique_violation() => Some(Violation::Unique),
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => Some(Violation::ForeignKey),
        _ => None,
    }
}

/// Insert failure on a row owned by `user_id`: an unknown user is invalid input
fn owned_row_error(err: sqlx::Error, user_id: i64) -> sb_common::Error {
    match violation(&err) {
        Some(Violation::ForeignKey) => {
            sb_common::Error::InvalidInput(format!("unknown user {}", user_id))
        }
        _ => sb_common::Error::Database(err),
    }
}
