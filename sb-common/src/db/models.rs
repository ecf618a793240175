//! Database models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Registered user (password material is never part of this type)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// One block of study time
///
/// Duration is derived from `end_time - start_time` and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub user_id: i64,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub subject: String,
}

impl StudySession {
    /// Session length in fractional hours (negative if the row is inverted)
    pub fn duration_hours(&self) -> f64 {
        crate::time::hours_between(&self.start_time, &self.end_time)
    }
}

/// One quiz result, score in [0, 100]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizScore {
    pub id: i64,
    pub user_id: i64,
    pub subject: String,
    pub score: f64,
    pub date: DateTime<Utc>,
}

/// Inclusive bounds of a quiz score
pub const MIN_QUIZ_SCORE: f64 = 0.0;
pub const MAX_QUIZ_SCORE: f64 = 100.0;

/// Whether a score lies in [0, 100] (NaN is rejected)
pub fn is_valid_quiz_score(score: f64) -> bool {
    (MIN_QUIZ_SCORE..=MAX_QUIZ_SCORE).contains(&score)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::parse_timestamp;

    #[test]
    fn test_session_duration_hours() {
        let session = StudySession {
            id: 1,
            user_id: 1,
            start_time: parse_timestamp("2023-05-01T10:00:00Z").unwrap(),
            end_time: parse_timestamp("2023-05-01T11:30:00Z").unwrap(),
            subject: "Mathematics".to_string(),
        };
        assert!((session.duration_hours() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_quiz_score_bounds() {
        assert!(is_valid_quiz_score(0.0));
        assert!(is_valid_quiz_score(100.0));
        assert!(is_valid_quiz_score(85.5));
        assert!(!is_valid_quiz_score(-0.1));
        assert!(!is_valid_quiz_score(100.1));
        assert!(!is_valid_quiz_score(f64::NAN));
    }

    #[test]
    fn test_session_serializes_rfc3339() {
        let session = StudySession {
            id: 7,
            user_id: 3,
            start_time: parse_timestamp("2023-05-01T10:00:00Z").unwrap(),
            end_time: parse_timestamp("2023-05-01T11:00:00Z").unwrap(),
            subject: "Physics".to_string(),
        };
        let json = serde_json::to_value(&session).unwrap();
        assert_eq!(json["start_time"], "2023-05-01T10:00:00Z");
        assert_eq!(json["user_id"], 3);
    }
}
