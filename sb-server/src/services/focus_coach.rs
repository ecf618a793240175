//! Pomodoro cycle adjustment from free-text user feedback

use crate::services::anthropic_client::{AiError, LanguageModel};
use crate::services::reply_parser::parse_structured_reply;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SYSTEM_PROMPT: &str =
    "You are an AI assistant that helps adjust focus sessions based on user feedback.";

/// Work/break cycle in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusCycle {
    pub work_duration_secs: u32,
    pub break_duration_secs: u32,
}

impl Default for FocusCycle {
    /// 25 minutes of work, 5 of rest
    fn default() -> Self {
        Self {
            work_duration_secs: 25 * 60,
            break_duration_secs: 5 * 60,
        }
    }
}

/// Either field may be absent when the model sees no reason to change it
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjustmentReply {
    #[serde(default)]
    adjusted_work_duration: Option<f64>,
    #[serde(default)]
    adjusted_break_duration: Option<f64>,
}

#[derive(Clone)]
pub struct FocusCoach {
    llm: Arc<dyn LanguageModel>,
}

impl FocusCoach {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Ask for a new cycle; fields the model leaves out keep their current value
    pub async fn adjust(&self, feedback: &str, current: FocusCycle) -> Result<FocusCycle, AiError> {
        let prompt = format!(
            "Please suggest adjustments to the focus session based on this feedback: {feedback}. \
             Current work duration: {}, break duration: {}. Durations are in seconds. \
             Return your response as a JSON object with optional 'adjustedWorkDuration' and \
             'adjustedBreakDuration' properties.",
            current.work_duration_secs, current.break_duration_secs
        );

        let text = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;
        let reply: AdjustmentReply = parse_structured_reply(&text)?;

        let adjusted = FocusCycle {
            work_duration_secs: apply(reply.adjusted_work_duration, current.work_duration_secs)?,
            break_duration_secs: apply(
                reply.adjusted_break_duration,
                current.break_duration_secs,
            )?,
        };

        if adjusted != current {
            tracing::info!(
                work_from = current.work_duration_secs,
                work_to = adjusted.work_duration_secs,
                break_from = current.break_duration_secs,
                break_to = adjusted.break_duration_secs,
                "Adjusting focus cycle"
            );
        }

        Ok(adjusted)
    }
}

/// Any positive finite value is accepted; sub-second values round up to 1 s
fn apply(proposed: Option<f64>, current: u32) -> Result<u32, AiError> {
    match proposed {
        None => Ok(current),
        Some(secs) if secs.is_finite() && secs > 0.0 && secs <= u32::MAX as f64 => {
            Ok((secs.round() as u32).max(1))
        }
        Some(secs) => Err(AiError::Protocol(format!("unusable duration {}", secs))),
    }
}
