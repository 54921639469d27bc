//! `barstock-ai`
//!
//! **Responsibility:** the inventory assistant boundary.
//!
//! - It reads inventory, it never mutates it.
//! - It builds prompts and forwards them through [`LlmClient`]; the model's
//!   answer is returned verbatim.
//! - Transport lives behind the trait so the hosted proxy can be swapped
//!   (or stubbed in tests) without touching prompt logic.

pub mod assistant;
pub mod client;
pub mod prompt;
pub mod result;
pub mod task;

pub use assistant::Assistant;
pub use client::{ChatMessage, ChatRole, LlmClient, UnconfiguredClient};
pub use prompt::{MAX_HISTORY_TURNS, SYSTEM_PROMPT, build_messages, inventory_summary};
pub use result::{AiError, AssistantReply};
pub use task::AssistantTask;
