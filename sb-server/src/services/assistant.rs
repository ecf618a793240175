//! General-purpose chat pass-through

use crate::services::anthropic_client::{AiError, LanguageModel};
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are a helpful AI assistant.";

#[derive(Clone)]
pub struct ChatAssistant {
    llm: Arc<dyn LanguageModel>,
}

impl ChatAssistant {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    /// Single request/response, no conversation memory
    pub async fn reply(&self, message: &str) -> Result<String, AiError> {
        self.llm.complete(SYSTEM_PROMPT, message).await
    }
}
