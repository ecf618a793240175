//! Quiz score database operations

use chrono::{DateTime, Utc};
use sb_common::db::QuizScore;
use sb_common::time::{format_timestamp, parse_timestamp};
use sb_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Save a quiz score (the table CHECK also enforces 0..=100)
pub async fn insert_score(
    pool: &SqlitePool,
    user_id: i64,
    subject: &str,
    score: f64,
    date: &DateTime<Utc>,
) -> Result<QuizScore> {
    let row = sqlx::query(
        r#"
        INSERT INTO quiz_scores (user_id, subject, score, date)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, subject, score, date
        "#,
    )
    .bind(user_id)
    .bind(subject)
    .bind(score)
    .bind(format_timestamp(date))
    .fetch_one(pool)
    .await
    .map_err(|e| super::owned_row_error(e, user_id))?;

    score_from_row(&row)
}

/// All quiz scores for a user, most recent `date` first
pub async fn list_scores_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<QuizScore>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, subject, score, date
        FROM quiz_scores
        WHERE user_id = ?
        ORDER BY date DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(score_from_row).collect()
}

fn score_from_row(row: &SqliteRow) -> Result<QuizScore> {
    let date: String = row.try_get("date")?;

    Ok(QuizScore {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        subject: row.try_get("subject")?,
        score: row.try_get("score")?,
        date: parse_timestamp(&date)?,
    })
}
