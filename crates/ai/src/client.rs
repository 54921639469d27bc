use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::result::AiError;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A chat-completion backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send the full message list and return the reply text.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiError>;
}

#[async_trait]
impl<C> LlmClient for Arc<C>
where
    C: LlmClient + ?Sized,
{
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, AiError> {
        (**self).complete(messages).await
    }
}

/// Stands in when no model endpoint is configured; every call fails with
/// [`AiError::NotConfigured`].
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredClient;

#[async_trait]
impl LlmClient for UnconfiguredClient {
    async fn complete(&self, _messages: &[ChatMessage]) -> Result<String, AiError> {
        Err(AiError::NotConfigured)
    }
}
