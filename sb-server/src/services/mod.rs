//! Service modules
//!
//! Every AI feature talks to the provider through [`LanguageModel`]; the
//! readiness pipeline additionally reads the store through [`ReadinessStore`].

pub mod anthropic_client;
pub mod assistant;
pub mod focus_coach;
pub mod readiness;
pub mod reply_parser;
pub mod scheduler;

pub use anthropic_client::{AiError, AnthropicClient, LanguageModel};
pub use assistant::ChatAssistant;
pub use focus_coach::{FocusCoach, FocusCycle};
pub use readiness::{
    ReadinessError, ReadinessOrchestrator, ReadinessResult, ReadinessStage, ReadinessStore,
    RefinementClient, SqliteReadinessStore, StoreError, READINESS_FAILURE_MESSAGE,
};
pub use scheduler::{SchedulePlan, ScheduleError, ScheduleEvent, StudyScheduler};
