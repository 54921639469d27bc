use serde::Serialize;
use thiserror::Error;

/// The assistant's answer, passed through from the model untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssistantReply {
    pub task: &'static str,
    pub reply: String,
}

#[derive(Debug, Error)]
pub enum AiError {
    #[error("invalid assistant input: {0}")]
    InvalidInput(String),

    /// The model endpoint failed or returned something unusable.
    #[error("assistant backend failed: {0}")]
    Upstream(String),

    #[error("assistant backend is not configured")]
    NotConfigured,
}
