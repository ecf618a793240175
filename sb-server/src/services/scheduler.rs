//! AI study scheduler
//!
//! Two modes: propose study sessions around a list of calendar events, or
//! adjust an already-proposed set after the events changed. The model answers
//! in a different shape for each; both are normalised to [`SchedulePlan`].

use crate::services::anthropic_client::{AiError, LanguageModel};
use crate::services::reply_parser::parse_structured_reply;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SCHEDULE_SYSTEM_PROMPT: &str = "You are an AI assistant that helps schedule study sessions. Please consider conflicts and suggest alternative times if needed.";
const ADJUST_SYSTEM_PROMPT: &str =
    "You are an AI assistant that helps adjust study schedules dynamically.";

/// A fixed calendar commitment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ScheduleEvent {
    /// Non-empty title, `end >= start`
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("event title must not be empty".to_string());
        }
        if self.end < self.start {
            return Err(format!("event '{}' ends before it starts", self.title));
        }
        Ok(())
    }
}

/// Normalised scheduler output
///
/// Sessions are passed through as the model shaped them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchedulePlan {
    pub sessions: Vec<serde_json::Value>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScheduleReply {
    sessions: Vec<serde_json::Value>,
    #[serde(default)]
    conflicts: Option<NoteText>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjustReply {
    adjusted_sessions: Vec<serde_json::Value>,
    #[serde(default)]
    adjustments: Option<NoteText>,
}

/// Notes arrive as a string or as arbitrary JSON; either is kept as text
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NoteText {
    Text(String),
    Other(serde_json::Value),
}

impl NoteText {
    fn into_string(self) -> Option<String> {
        match self {
            NoteText::Text(s) if s.trim().is_empty() => None,
            NoteText::Text(s) => Some(s),
            NoteText::Other(serde_json::Value::Null) => None,
            NoteText::Other(v) => Some(v.to_string()),
        }
    }
}

/// Scheduler errors
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Invalid event: {0}")]
    InvalidEvent(String),

    #[error(transparent)]
    Ai(#[from] AiError),
}

#[derive(Clone)]
pub struct StudyScheduler {
    llm: Arc<dyn LanguageModel>,
}

impl StudyScheduler {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Propose study sessions around `events`
    pub async fn schedule(&self, events: &[ScheduleEvent]) -> Result<SchedulePlan, ScheduleError> {
        validate_events(events)?;
        let events_json = to_json(events)?;

        let prompt = format!(
            "Please schedule study sessions around these events: {events_json}. \
             If there are conflicts, suggest alternative times. Return your response as a \
             JSON object with a 'sessions' array and an optional 'conflicts' string."
        );

        let text = self.llm.complete(SCHEDULE_SYSTEM_PROMPT, &prompt).await?;
        let reply: ScheduleReply = parse_structured_reply(&text)?;

        tracing::info!(sessions = reply.sessions.len(), "Scheduled study sessions");

        Ok(SchedulePlan {
            sessions: reply.sessions,
            notes: reply.conflicts.and_then(NoteText::into_string),
        })
    }

    /// Rework `scheduled` in light of `events`
    pub async fn adjust(
        &self,
        events: &[ScheduleEvent],
        scheduled: &[serde_json::Value],
    ) -> Result<SchedulePlan, ScheduleError> {
        validate_events(events)?;
        let events_json = to_json(events)?;
        let scheduled_json = to_json(scheduled)?;

        let prompt = format!(
            "Please adjust the study sessions based on these events: {events_json} and these \
             scheduled sessions: {scheduled_json}. Consider any new conflicts or opportunities \
             for optimization. Return your response as a JSON object with an \
             'adjustedSessions' array and an optional 'adjustments' string."
        );

        let text = self.llm.complete(ADJUST_SYSTEM_PROMPT, &prompt).await?;
        let reply: AdjustReply = parse_structured_reply(&text)?;

        tracing::info!(sessions = reply.adjusted_sessions.len(), "Adjusted study sessions");

        Ok(SchedulePlan {
            sessions: reply.adjusted_sessions,
            notes: reply.adjustments.and_then(NoteText::into_string),
        })
    }
}

fn validate_events(events: &[ScheduleEvent]) -> Result<(), ScheduleError> {
    events
        .iter()
        .try_for_each(|e| e.validate().map_err(ScheduleError::InvalidEvent))
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, AiError> {
    serde_json::to_string(value).map_err(|e| AiError::Protocol(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use sb_common::time::parse_timestamp;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedModel {
        reply: String,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl LanguageModel for CannedModel {
        async fn complete(&self, _system: &str, _prompt: &str) -> Result<String, AiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.reply.clone())
        }
    }

    fn canned(reply: &str) -> Arc<CannedModel> {
        Arc::new(CannedModel {
            reply: reply.to_string(),
            calls: AtomicUsize::new(0),
        })
    }

    fn event(title: &str, start: &str, end: &str) -> ScheduleEvent {
        ScheduleEvent {
            title: title.to_string(),
            start: parse_timestamp(start).unwrap(),
            end: parse_timestamp(end).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_schedule_normalises_conflicts() {
        let model = canned(
            r#"{"sessions": [{"subject": "Math", "start": "2023-05-01T14:00:00Z"}], "conflicts": "Lecture overlaps lunch"}"#,
        );
        let scheduler = StudyScheduler::new(model);

        let plan = scheduler
            .schedule(&[event("Lecture", "2023-05-01T10:00:00Z", "2023-05-01T12:00:00Z")])
            .await
            .unwrap();

        assert_eq!(plan.sessions.len(), 1);
        assert_eq!(plan.notes.as_deref(), Some("Lecture overlaps lunch"));
    }

    #[tokio::test]
    async fn test_adjust_normalises_adjusted_sessions() {
        let model = canned(
            "Here you go:\n```json\n{\"adjustedSessions\": [{\"subject\": \"Physics\"}, {\"subject\": \"Math\"}]}\n```",
        );
        let scheduler = StudyScheduler::new(model);

        let plan = scheduler
            .adjust(
                &[event("Exam", "2023-05-02T09:00:00Z", "2023-05-02T11:00:00Z")],
                &[serde_json::json!({"subject": "Math"})],
            )
            .await
            .unwrap();

        assert_eq!(plan.sessions.len(), 2);
        assert_eq!(plan.notes, None);
    }

    #[tokio::test]
    async fn test_structured_notes_kept_as_text() {
        let model = canned(r#"{"sessions": [], "conflicts": ["a", "b"]}"#);
        let plan = StudyScheduler::new(model).schedule(&[]).await.unwrap();
        assert_eq!(plan.notes.as_deref(), Some(r#"["a","b"]"#));
    }

    #[tokio::test]
    async fn test_inverted_event_rejected_before_model_call() {
        let model = canned(r#"{"sessions": []}"#);
        let scheduler = StudyScheduler::new(model.clone());

        let err = scheduler
            .schedule(&[event("Backwards", "2023-05-01T12:00:00Z", "2023-05-01T10:00:00Z")])
            .await
            .unwrap_err();

        assert!(matches!(err, ScheduleError::InvalidEvent(_)));
        assert_eq!(model.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_blank_title_rejected() {
        let model = canned(r#"{"sessions": []}"#);
        let err = StudyScheduler::new(model)
            .schedule(&[event("  ", "2023-05-01T10:00:00Z", "2023-05-01T11:00:00Z")])
            .await
            .unwrap_err();
        assert!(matches!(err, ScheduleError::InvalidEvent(_)));
    }

    #[tokio::test]
    async fn test_wrong_shape_is_protocol_error() {
        let model = canned(r#"{"adjustedSessions": []}"#);
        let err = StudyScheduler::new(model).schedule(&[]).await.unwrap_err();
        assert!(matches!(err, ScheduleError::Ai(AiError::Protocol(_))));
    }
}
