//! Prompt assembly: fixed system prompt + inventory summary + capped history.

use barstock_inventory::{AlertCounts, InventoryItem, ItemFilter, classify_table};

use crate::client::{ChatMessage, ChatRole};

/// Prior turns forwarded to the model (most recent kept).
pub const MAX_HISTORY_TURNS: usize = 10;

pub const SYSTEM_PROMPT: &str = "You are the inventory assistant for a hospitality venue. \
Answer questions about current stock levels, low-stock alerts and reordering using only \
the inventory data provided. Be concise and practical, use product names exactly as \
listed, and say so when the data does not answer the question.";

/// Plain-text snapshot of the inventory for the model's context window.
pub fn inventory_summary(items: &[InventoryItem]) -> String {
    let counts = AlertCounts::tally(items);
    let mut out = format!(
        "Inventory snapshot: {} item(s). Alerts: {} urgent, {} normal, {} info. Healthy: {} good, {} optimal.\n",
        counts.total, counts.urgent, counts.normal, counts.info, counts.good, counts.optimal
    );

    for row in classify_table(items, &ItemFilter::default()) {
        out.push_str(&format!(
            "- {} ({}): {} units, threshold {}, priority {}, status {}\n",
            row.item.name,
            row.item.category,
            row.item.stock,
            row.effective_threshold,
            row.effective_priority,
            row.status
        ));
    }
    out
}

/// System prompt, summary, the last [`MAX_HISTORY_TURNS`] turns, then the new
/// user message.
pub fn build_messages(summary: &str, history: &[ChatMessage], user_message: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(history.len().min(MAX_HISTORY_TURNS) + 2);
    messages.push(ChatMessage::system(format!("{SYSTEM_PROMPT}\n\n{summary}")));

    let skip = history.len().saturating_sub(MAX_HISTORY_TURNS);
    messages.extend(
        history
            .iter()
            .skip(skip)
            // Callers cannot smuggle extra system instructions in via history.
            .filter(|m| m.role != ChatRole::System)
            .cloned(),
    );

    messages.push(ChatMessage::user(user_message));
    messages
}
