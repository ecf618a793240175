//! Initial readiness score
//!
//! Pure and total: no I/O, no validation, never NaN for typed inputs.
//!
//! ```text
//! study  = min(total_hours / 10, 1.0)
//! quiz   = mean(scores) / 100        (0 when there are no scores)
//! score  = (study * 0.5 + quiz * 0.5) * 100
//! ```

use sb_common::db::{QuizScore, StudySession};

/// Cumulative study hours at which the study component saturates
pub const FULL_CREDIT_STUDY_HOURS: f64 = 10.0;

/// Weight of the study-time component
pub const STUDY_WEIGHT: f64 = 0.5;

/// Weight of the quiz component
pub const QUIZ_WEIGHT: f64 = 0.5;

/// Sum of session durations in hours
///
/// Inverted sessions contribute negative hours; callers validate upstream.
pub fn total_study_hours(sessions: &[StudySession]) -> f64 {
    sessions.iter().map(StudySession::duration_hours).sum()
}

/// Study-time component, saturating at 1.0 after [`FULL_CREDIT_STUDY_HOURS`]
pub fn study_time_component(total_hours: f64) -> f64 {
    (total_hours / FULL_CREDIT_STUDY_HOURS).min(1.0)
}

/// Arithmetic mean of quiz scores, defined as 0 for an empty list
pub fn average_quiz_score(scores: &[QuizScore]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().map(|s| s.score).sum::<f64>() / scores.len() as f64
}

/// Deterministic initial readiness estimate in [0, 100] for valid inputs
pub fn calculate_initial_score(sessions: &[StudySession], scores: &[QuizScore]) -> f64 {
    let study = study_time_component(total_study_hours(sessions));
    let quiz = average_quiz_score(scores) / 100.0;

    (study * STUDY_WEIGHT + quiz * QUIZ_WEIGHT) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration, Utc};
    use sb_common::time::parse_timestamp;

    fn ts(s: &str) -> DateTime<Utc> {
        parse_timestamp(s).unwrap()
    }

    fn session_hours(hours: f64) -> StudySession {
        let start = ts("2023-05-01T08:00:00Z");
        StudySession {
            id: 1,
            user_id: 1,
            start_time: start,
            end_time: start + Duration::milliseconds((hours * 3_600_000.0) as i64),
            subject: "Math".to_string(),
        }
    }

    fn score(value: f64) -> QuizScore {
        QuizScore {
            id: 1,
            user_id: 1,
            subject: "Math".to_string(),
            score: value,
            date: ts("2023-05-01T13:00:00Z"),
        }
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_two_hours_and_eighty_percent_is_fifty() {
        let sessions = vec![StudySession {
            id: 1,
            user_id: 1,
            start_time: ts("2023-05-01T10:00:00Z"),
            end_time: ts("2023-05-01T12:00:00Z"),
            subject: "Math".to_string(),
        }];
        let scores = vec![score(80.0)];

        assert!(approx(total_study_hours(&sessions), 2.0));
        assert!(approx(study_time_component(2.0), 0.2));
        assert!(approx(average_quiz_score(&scores), 80.0));
        assert!(approx(calculate_initial_score(&sessions, &scores), 50.0));
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(calculate_initial_score(&[], &[]), 0.0);
    }

    #[test]
    fn test_empty_scores_uses_study_component_only() {
        let sessions = vec![session_hours(4.0)];
        let result = calculate_initial_score(&sessions, &[]);

        assert!(!result.is_nan());
        assert!(approx(result, 20.0));
    }

    #[test]
    fn test_study_component_saturates_at_ten_hours() {
        assert!(approx(study_time_component(10.0), 1.0));
        assert!(approx(study_time_component(10.5), 1.0));
        assert!(approx(study_time_component(250.0), 1.0));
        assert!(study_time_component(9.99) < 1.0);
    }

    #[test]
    fn test_study_component_monotonic() {
        let mut previous = study_time_component(0.0);
        for step in 1..=300 {
            let hours = step as f64 * 0.05;
            let current = study_time_component(hours);
            assert!(current >= previous, "not monotonic at {} hours", hours);
            previous = current;
        }
    }

    #[test]
    fn test_sessions_accumulate_before_saturation() {
        let sessions: Vec<StudySession> = (0..6).map(|_| session_hours(2.0)).collect();
        assert!(approx(total_study_hours(&sessions), 12.0));
        assert!(approx(calculate_initial_score(&sessions, &[]), 50.0));
    }

    #[test]
    fn test_output_bounded_for_valid_inputs() {
        let hour_grid = [0.0, 0.5, 3.0, 9.9, 10.0, 40.0];
        let score_sets: Vec<Vec<f64>> = vec![
            vec![],
            vec![0.0],
            vec![100.0],
            vec![100.0, 100.0, 100.0],
            vec![0.0, 100.0],
            vec![12.5, 99.9, 47.0, 63.2],
        ];

        for hours in hour_grid {
            for set in &score_sets {
                let sessions = vec![session_hours(hours)];
                let scores: Vec<QuizScore> = set.iter().copied().map(score).collect();
                let result = calculate_initial_score(&sessions, &scores);
                assert!(
                    (0.0..=100.0).contains(&result),
                    "out of range: {} for {} hours, scores {:?}",
                    result,
                    hours,
                    set
                );
            }
        }

        let max_sessions = vec![session_hours(10.0)];
        let max_scores = vec![score(100.0)];
        assert!(approx(calculate_initial_score(&max_sessions, &max_scores), 100.0));
    }

    #[test]
    fn test_inverted_session_not_validated() {
        let mut inverted = session_hours(2.0);
        std::mem::swap(&mut inverted.start_time, &mut inverted.end_time);

        assert!(approx(total_study_hours(&[inverted]), -2.0));
    }
}
