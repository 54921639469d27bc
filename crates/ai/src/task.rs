use barstock_inventory::InventoryItem;

use crate::client::ChatMessage;
use crate::prompt::{build_messages, inventory_summary};
use crate::result::AiError;

/// One assistant request.
///
/// Every task sends the same system prompt and inventory summary; they differ
/// only in the user-side instruction (and chat carries prior turns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssistantTask {
    Chat { message: String, history: Vec<ChatMessage> },
    Predictions,
    ShoppingList,
    Insights,
}

impl AssistantTask {
    pub fn name(&self) -> &'static str {
        match self {
            AssistantTask::Chat { .. } => "chat",
            AssistantTask::Predictions => "predictions",
            AssistantTask::ShoppingList => "shopping_list",
            AssistantTask::Insights => "insights",
        }
    }

    fn instruction(&self) -> &str {
        match self {
            AssistantTask::Chat { message, .. } => message,
            AssistantTask::Predictions => {
                "Predict which items are likely to run out first and roughly when, based on \
                 current stock against each item's threshold. List the top risks first."
            }
            AssistantTask::ShoppingList => {
                "Draft a purchasing list for the next supplier order: what to buy, how much, \
                 and which items can wait. Group by category."
            }
            AssistantTask::Insights => {
                "Give three to five short operational insights about this inventory: imbalances, \
                 overstock, categories at risk, and anything the manager should check today."
            }
        }
    }

    /// Full message list for the model.
    pub fn messages(&self, items: &[InventoryItem]) -> Result<Vec<ChatMessage>, AiError> {
        if let AssistantTask::Chat { message, .. } = self {
            if message.trim().is_empty() {
                return Err(AiError::InvalidInput("message is required".to_string()));
            }
        }

        let history: &[ChatMessage] = match self {
            AssistantTask::Chat { history, .. } => history,
            _ => &[],
        };
        Ok(build_messages(&inventory_summary(items), history, self.instruction()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ChatRole;

    #[test]
    fn blank_chat_message_is_rejected() {
        let task = AssistantTask::Chat {
            message: "   ".into(),
            history: vec![],
        };
        assert!(matches!(task.messages(&[]), Err(AiError::InvalidInput(_))));
    }

    #[test]
    fn fixed_tasks_send_system_plus_instruction() {
        let messages = AssistantTask::Insights.messages(&[]).unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::System);
        assert!(messages[1].content.starts_with("Give three to five"));
    }
}
