//! Readiness pipeline
//!
//! # State Progression
//! IDLE → FETCHING → COMPUTING → REFINING → DONE
//!
//! Any fetch or refine failure moves to FAILED and no partial result is
//! returned. Fetches run concurrently; refinement waits on both.

use super::calculator::calculate_initial_score;
use super::refinement::RefinementClient;
use super::store::{ReadinessStore, StoreError};
use crate::services::anthropic_client::AiError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

/// The only text users see when the pipeline fails
pub const READINESS_FAILURE_MESSAGE: &str = "readiness could not be calculated; try again";

/// Pipeline state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ReadinessStage {
    Idle,
    /// Sessions and scores being read
    Fetching,
    /// Initial score calculation
    Computing,
    /// Waiting on the language model
    Refining,
    Done,
    Failed,
}

/// Final readiness assessment (never persisted)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadinessResult {
    pub refined_score: f64,
    pub feedback: String,
}

/// Terminal pipeline failures; none are retried
#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Provider unreachable, timed out, refused, or not configured
    #[error("AI refinement unavailable: {0}")]
    AiUnavailable(String),

    /// Provider answered with something that is not a usable refinement
    #[error("AI refinement reply malformed: {0}")]
    AiProtocol(String),
}

impl From<AiError> for ReadinessError {
    fn from(err: AiError) -> Self {
        match err {
            AiError::Protocol(msg) => ReadinessError::AiProtocol(msg),
            other => ReadinessError::AiUnavailable(other.to_string()),
        }
    }
}

impl ReadinessError {
    /// Stage that was active when the error occurred
    pub fn failed_during(&self) -> ReadinessStage {
        match self {
            ReadinessError::Store(_) => ReadinessStage::Fetching,
            ReadinessError::AiUnavailable(_) | ReadinessError::AiProtocol(_) => {
                ReadinessStage::Refining
            }
        }
    }

    /// User-facing text; internal detail stays in the logs
    pub fn user_message(&self) -> &'static str {
        READINESS_FAILURE_MESSAGE
    }
}

/// Runs store reads, calculation, and refinement for one user
pub struct ReadinessOrchestrator {
    store: Arc<dyn ReadinessStore>,
    refiner: RefinementClient,
}

impl ReadinessOrchestrator {
    pub fn new(store: Arc<dyn ReadinessStore>, refiner: RefinementClient) -> Self {
        Self { store, refiner }
    }

    pub async fn compute_readiness(&self, user_id: i64) -> Result<ReadinessResult, ReadinessError> {
        self.compute_readiness_observed(user_id, |_| {}).await
    }

    /// Same as [`compute_readiness`](Self::compute_readiness), reporting each
    /// stage transition to `observer`
    pub async fn compute_readiness_observed<F>(
        &self,
        user_id: i64,
        mut observer: F,
    ) -> Result<ReadinessResult, ReadinessError>
    where
        F: FnMut(ReadinessStage) + Send,
    {
        let mut transition = |stage: ReadinessStage| {
            tracing::debug!(user_id, stage = ?stage, "Readiness stage");
            observer(stage);
        };

        transition(ReadinessStage::Idle);

        let result = self.run(user_id, &mut transition).await;

        match &result {
            Ok(_) => transition(ReadinessStage::Done),
            Err(e) => {
                tracing::debug!(user_id, failed_during = ?e.failed_during(), "Readiness failed");
                transition(ReadinessStage::Failed);
            }
        }

        result
    }

    async fn run(
        &self,
        user_id: i64,
        transition: &mut (dyn FnMut(ReadinessStage) + Send),
    ) -> Result<ReadinessResult, ReadinessError> {
        transition(ReadinessStage::Fetching);
        let (sessions, scores) = tokio::try_join!(
            self.store.get_sessions(user_id),
            self.store.get_scores(user_id)
        )?;

        transition(ReadinessStage::Computing);
        let initial_score = calculate_initial_score(&sessions, &scores);
        tracing::debug!(
            user_id,
            sessions = sessions.len(),
            scores = scores.len(),
            initial_score,
            "Initial readiness computed"
        );

        transition(ReadinessStage::Refining);
        let reply = self.refiner.refine(initial_score, &sessions, &scores).await?;

        Ok(ReadinessResult {
            refined_score: reply.refined_score,
            feedback: reply.feedback,
        })
    }
}
