use core::str::FromStr;

use serde::{Deserialize, Serialize};

use barstock_core::DomainError;

/// Qualitative urgency tag that decides which alert tier a low item falls into.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl core::fmt::Display for Priority {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            _ => Err(DomainError::validation("priority must be one of: high, medium, low")),
        }
    }
}

/// Resolved `{priority, threshold}` pair the classifier works from.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityConfig {
    pub priority: Priority,
    pub threshold: i64,
}

/// Fallback when neither the item nor its category says otherwise.
pub const DEFAULT_PRIORITY_CONFIG: PriorityConfig = PriorityConfig {
    priority: Priority::Medium,
    threshold: 3,
};

/// Per-category defaults (matched case-insensitively).
pub fn category_default(category: &str) -> PriorityConfig {
    let (priority, threshold) = match category.trim().to_lowercase().as_str() {
        "spirits" => (Priority::High, 3),
        "beer" => (Priority::High, 6),
        "wine" => (Priority::Medium, 4),
        "mixers" => (Priority::Medium, 5),
        "garnishes" => (Priority::Low, 2),
        "supplies" => (Priority::Low, 5),
        _ => return DEFAULT_PRIORITY_CONFIG,
    };
    PriorityConfig { priority, threshold }
}

/// Resolve an item's effective config: own fields first, then the category
/// table. Each field falls back on its own.
pub fn resolve(category: &str, priority: Option<Priority>, threshold: Option<i64>) -> PriorityConfig {
    let fallback = category_default(category);
    PriorityConfig {
        priority: priority.unwrap_or(fallback.priority),
        threshold: threshold.unwrap_or(fallback.threshold),
    }
}
