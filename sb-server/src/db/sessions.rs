//! Study session database operations

use chrono::{DateTime, Utc};
use sb_common::db::StudySession;
use sb_common::time::{format_timestamp, parse_timestamp};
use sb_common::Result;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

/// Save a study session
///
/// No ordering check on the timestamps here; the API layer rejects
/// `end_time < start_time` before calling.
pub async fn insert_session(
    pool: &SqlitePool,
    user_id: i64,
    start_time: &DateTime<Utc>,
    end_time: &DateTime<Utc>,
    subject: &str,
) -> Result<StudySession> {
    let row = sqlx::query(
        r#"
        INSERT INTO study_sessions (user_id, start_time, end_time, subject)
        VALUES (?, ?, ?, ?)
        RETURNING id, user_id, start_time, end_time, subject
        "#,
    )
    .bind(user_id)
    .bind(format_timestamp(start_time))
    .bind(format_timestamp(end_time))
    .bind(subject)
    .fetch_one(pool)
    .await
    .map_err(|e| super::owned_row_error(e, user_id))?;

    session_from_row(&row)
}

/// All sessions for a user, most recent `start_time` first
pub async fn list_sessions_for_user(pool: &SqlitePool, user_id: i64) -> Result<Vec<StudySession>> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, start_time, end_time, subject
        FROM study_sessions
        WHERE user_id = ?
        ORDER BY start_time DESC, id DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    rows.iter().map(session_from_row).collect()
}

fn session_from_row(row: &SqliteRow) -> Result<StudySession> {
    let start_time: String = row.try_get("start_time")?;
    let end_time: String = row.try_get("end_time")?;

    Ok(StudySession {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        start_time: parse_timestamp(&start_time)?,
        end_time: parse_timestamp(&end_time)?,
        subject: row.try_get("subject")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::users::create_user;
    use sb_common::db::init_memory_database;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_list_ordered_desc() {
        let pool = init_memory_database().await.unwrap();
        let user = create_user(&pool, "u", "u@example.com", "pw").await.unwrap();

        insert_session(&pool, user.id, &ts("2023-05-01T10:00:00Z"), &ts("2023-05-01T11:00:00Z"), "Math")
            .await
            .unwrap();
        insert_session(&pool, user.id, &ts("2023-05-03T10:00:00Z"), &ts("2023-05-03T12:00:00Z"), "Physics")
            .await
            .unwrap();
        insert_session(&pool, user.id, &ts("2023-05-02T10:00:00Z"), &ts("2023-05-02T10:30:00Z"), "Chemistry")
            .await
            .unwrap();

        let sessions = list_sessions_for_user(&pool, user.id).await.unwrap();
        let subjects: Vec<&str> = sessions.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Physics", "Chemistry", "Math"]);
    }

    #[tokio::test]
    async fn test_list_only_own_sessions() {
        let pool = init_memory_database().await.unwrap();
        let alice = create_user(&pool, "alice", "a@example.com", "pw").await.unwrap();
        let bob = create_user(&pool, "bob", "b@example.com", "pw").await.unwrap();

        insert_session(&pool, alice.id, &ts("2023-05-01T10:00:00Z"), &ts("2023-05-01T11:00:00Z"), "Math")
            .await
            .unwrap();

        assert_eq!(list_sessions_for_user(&pool, alice.id).await.unwrap().len(), 1);
        assert!(list_sessions_for_user(&pool, bob.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_offset_timestamps_normalized() {
        let pool = init_memory_database().await.unwrap();
        let user = create_user(&pool, "u", "u@example.com", "pw").await.unwrap();

        let session = insert_session(
            &pool,
            user.id,
            &ts("2023-05-01T12:00:00+02:00"),
            &ts("2023-05-01T13:00:00+02:00"),
            "Math",
        )
        .await
        .unwrap();

        assert_eq!(session.start_time, ts("2023-05-01T10:00:00Z"));
        assert!((session.duration_hours() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_sub_second_timestamps_roundtrip() {
        let pool = init_memory_database().await.unwrap();
        let user = create_user(&pool, "u", "u@example.com", "pw").await.unwrap();
        let start = ts("2023-05-01T10:00:00.750Z");
        let end = ts("2023-05-01T10:00:01.250Z");

        let saved = insert_session(&pool, user.id, &start, &end, "Math").await.unwrap();
        assert_eq!(saved.start_time, start);
        assert_eq!(saved.end_time, end);

        let listed = list_sessions_for_user(&pool, user.id).await.unwrap();
        assert_eq!(listed[0].start_time, start);
        assert_eq!(listed[0].end_time, end);
        assert!((listed[0].duration_hours() - 0.5 / 3600.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_sub_second_ordering_is_chronological() {
        let pool = init_memory_database().await.unwrap();
        let user = create_user(&pool, "u", "u@example.com", "pw").await.unwrap();

        insert_session(&pool, user.id, &ts("2023-05-01T10:00:00.900Z"), &ts("2023-05-01T11:00:00Z"), "Later")
            .await
            .unwrap();
        insert_session(&pool, user.id, &ts("2023-05-01T10:00:00Z"), &ts("2023-05-01T11:00:00Z"), "Earlier")
            .await
            .unwrap();

        let sessions = list_sessions_for_user(&pool, user.id).await.unwrap();
        let subjects: Vec<&str> = sessions.iter().map(|s| s.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Later", "Earlier"]);
    }

    #[tokio::test]
    async fn test_unknown_user_is_invalid_input() {
        let pool = init_memory_database().await.unwrap();

        let result = insert_session(&pool, 999, &ts("2023-05-01T10:00:00Z"), &ts("2023-05-01T11:00:00Z"), "Math").await;
        assert!(matches!(result, Err(sb_common::Error::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_malformed_stored_timestamp_is_error() {
        let pool = init_memory_database().await.unwrap();
        let user = create_user(&pool, "u", "u@example.com", "pw").await.unwrap();

        sqlx::query("INSERT INTO study_sessions (user_id, start_time, end_time, subject) VALUES (?, 'garbage', '2023-05-01T11:00:00Z', 'Math')")
            .bind(user.id)
            .execute(&pool)
            .await
            .unwrap();

        let result = list_sessions_for_user(&pool, user.id).await;
        assert!(matches!(result, Err(sb_common::Error::InvalidData(_))));
    }
}
