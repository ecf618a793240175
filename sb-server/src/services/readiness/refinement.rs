//! AI refinement of the initial readiness score

use crate::services::anthropic_client::{AiError, LanguageModel};
use crate::services::reply_parser::parse_structured_reply;
use sb_common::db::{QuizScore, StudySession};
use serde::Deserialize;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are an AI assistant that helps refine readiness scores and provide personalized feedback for students.";

/// Parsed model reply; both fields are required
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RefinementReply {
    #[serde(rename = "refinedScore")]
    pub refined_score: f64,
    pub feedback: String,
}

/// Asks the language model to refine a score and explain it
#[derive(Clone)]
pub struct RefinementClient {
    llm: Arc<dyn LanguageModel>,
}

impl RefinementClient {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// One call, no retry
    ///
    /// Transport failures come back as-is; anything the model says that does
    /// not carry a numeric `refinedScore` in [0, 100] and a string `feedback`
    /// is [`AiError::Protocol`].
    pub async fn refine(
        &self,
        initial_score: f64,
        sessions: &[StudySession],
        scores: &[QuizScore],
    ) -> Result<RefinementReply, AiError> {
        let prompt = build_prompt(initial_score, sessions, scores)?;
        let text = self.llm.complete(SYSTEM_PROMPT, &prompt).await?;

        let reply: RefinementReply = parse_structured_reply(&text)?;

        if !(0.0..=100.0).contains(&reply.refined_score) {
            return Err(AiError::Protocol(format!(
                "refinedScore {} outside 0..=100",
                reply.refined_score
            )));
        }

        Ok(reply)
    }
}

fn build_prompt(
    initial_score: f64,
    sessions: &[StudySession],
    scores: &[QuizScore],
) -> Result<String, AiError> {
    let sessions_json =
        serde_json::to_string(sessions).map_err(|e| AiError::Protocol(e.to_string()))?;
    let scores_json =
        serde_json::to_string(scores).map_err(|e| AiError::Protocol(e.to_string()))?;

    Ok(format!(
        "Given an initial readiness score of {initial_score}, study sessions: {sessions_json}, \
         and quiz scores: {scores_json}, please refine the readiness score and provide \
         personalized feedback. Consider factors such as study consistency, performance \
         trends, and subject coverage. Return your response as a JSON object with \
         'refinedScore' and 'feedback' properties."
    ))
}
