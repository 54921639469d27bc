use barstock_inventory::InventoryItem;

use crate::client::LlmClient;
use crate::result::{AiError, AssistantReply};
use crate::task::AssistantTask;

/// Runs assistant tasks against an [`LlmClient`].
///
/// No retries: a backend failure is surfaced to the caller as-is.
#[derive(Debug, Clone)]
pub struct Assistant<C> {
    client: C,
}

impl<C: LlmClient> Assistant<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub async fn run(&self, task: &AssistantTask, items: &[InventoryItem]) -> Result<AssistantReply, AiError> {
        let messages = task.messages(items)?;
        tracing::debug!(task = task.name(), messages = messages.len(), "sending assistant request");

        let reply = self.client.complete(&messages).await.map_err(|e| {
            tracing::warn!(task = task.name(), error = %e, "assistant request failed");
            e
        })?;

        Ok(AssistantReply {
            task: task.name(),
            reply,
        })
    }
}
