//! Exam readiness scoring
//!
//! store reads → initial calculation → AI refinement → result

pub mod calculator;
pub mod orchestrator;
pub mod refinement;
pub mod store;

pub use calculator::calculate_initial_score;
pub use orchestrator::{
    ReadinessError, ReadinessOrchestrator, ReadinessResult, ReadinessStage,
    READINESS_FAILURE_MESSAGE,
};
pub use refinement::{RefinementClient, RefinementReply};
pub use store::{ReadinessStore, SqliteReadinessStore, StoreError};
