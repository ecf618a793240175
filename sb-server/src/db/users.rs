//! User database operations

use sb_common::db::User;
use sb_common::password::hash_password;
use sb_common::time::{format_timestamp, now, parse_timestamp};
use sb_common::{Error, Result};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Insert a user, storing only a salted hash of the password
pub async fn create_user(
    pool: &SqlitePool,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User> {
    let stored = hash_password(password);
    let created_at = format_timestamp(&now());

    let row = sqlx::query(
        r#"
        INSERT INTO users (username, email, password_hash, password_salt, created_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, username, email, created_at
        "#,
    )
    .bind(username)
    .bind(email)
    .bind(&stored.hash)
    .bind(&stored.salt)
    .bind(&created_at)
    .fetch_one(pool)
    .await
    .map_err(|e| match super::violation(&e) {
        Some(super::Violation::Unique) => {
            Error::Conflict(format!("username '{}' is already taken", username))
        }
        _ => Error::Database(e),
    })?;

    user_from_row(&row)
}

fn user_from_row(row: &SqliteRow) -> Result<User> {
    let created_at: String = row.try_get("created_at")?;

    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        created_at: parse_timestamp(&created_at)?,
    })
}
