//! Stock status classification.
//!
//! A total decision table over `(stock, threshold, priority)`:
//! 1. `stock <= threshold` → tier decided by priority (URGENT/NORMAL/INFO)
//! 2. `stock <= threshold * 2` → GOOD
//! 3. otherwise → OPTIMAL

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use barstock_core::DomainError;

use crate::item::InventoryItem;
use crate::priority::{Priority, PriorityConfig};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockStatus {
    Urgent,
    Normal,
    Info,
    Good,
    Optimal,
}

impl StockStatus {
    /// Sort rank: lower sorts first.
    pub fn rank(&self) -> u8 {
        match self {
            StockStatus::Urgent => 0,
            StockStatus::Normal => 1,
            StockStatus::Info => 2,
            StockStatus::Good => 3,
            StockStatus::Optimal => 4,
        }
    }

    /// Whether an item in this status produces an alert.
    pub fn needs_attention(&self) -> bool {
        matches!(self, StockStatus::Urgent | StockStatus::Normal | StockStatus::Info)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::Urgent => "URGENT",
            StockStatus::Normal => "NORMAL",
            StockStatus::Info => "INFO",
            StockStatus::Good => "GOOD",
            StockStatus::Optimal => "OPTIMAL",
        }
    }
}

impl core::fmt::Display for StockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StockStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "URGENT" => Ok(StockStatus::Urgent),
            "NORMAL" => Ok(StockStatus::Normal),
            "INFO" => Ok(StockStatus::Info),
            "GOOD" => Ok(StockStatus::Good),
            "OPTIMAL" => Ok(StockStatus::Optimal),
            _ => Err(DomainError::validation(
                "status must be one of: urgent, normal, info, good, optimal",
            )),
        }
    }
}

pub fn classify(stock: i64, config: PriorityConfig) -> StockStatus {
    if stock <= config.threshold {
        return match config.priority {
            Priority::High => StockStatus::Urgent,
            Priority::Medium => StockStatus::Normal,
            Priority::Low => StockStatus::Info,
        };
    }
    if stock <= config.threshold.saturating_mul(2) {
        StockStatus::Good
    } else {
        StockStatus::Optimal
    }
}

pub fn classify_item(item: &InventoryItem) -> StockStatus {
    classify(item.stock, item.priority_config())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cfg(priority: Priority, threshold: i64) -> PriorityConfig {
        PriorityConfig { priority, threshold }
    }

    fn any_priority() -> impl Strategy<Value = Priority> {
        prop_oneof![Just(Priority::High), Just(Priority::Medium), Just(Priority::Low)]
    }

    #[test]
    fn boundaries_are_inclusive() {
        assert_eq!(classify(3, cfg(Priority::High, 3)), StockStatus::Urgent);
        assert_eq!(classify(4, cfg(Priority::High, 3)), StockStatus::Good);
        assert_eq!(classify(6, cfg(Priority::High, 3)), StockStatus::Good);
        assert_eq!(classify(7, cfg(Priority::High, 3)), StockStatus::Optimal);
    }

    #[test]
    fn zero_threshold_only_flags_empty_stock() {
        assert_eq!(classify(0, cfg(Priority::Low, 0)), StockStatus::Info);
        assert_eq!(classify(1, cfg(Priority::Low, 0)), StockStatus::Optimal);
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("urgent".parse::<StockStatus>().unwrap(), StockStatus::Urgent);
        assert_eq!("Optimal".parse::<StockStatus>().unwrap(), StockStatus::Optimal);
        assert!("critical".parse::<StockStatus>().is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 1000,
            ..ProptestConfig::default()
        })]

        #[test]
        fn at_or_below_threshold_tier_follows_priority(
            threshold in 0i64..10_000,
            below in 0i64..10_000,
            priority in any_priority(),
        ) {
            let stock = threshold - below.min(threshold);
            let expected = match priority {
                Priority::High => StockStatus::Urgent,
                Priority::Medium => StockStatus::Normal,
                Priority::Low => StockStatus::Info,
            };
            prop_assert_eq!(classify(stock, cfg(priority, threshold)), expected);
        }

        #[test]
        fn between_threshold_and_double_is_good(
            threshold in 1i64..10_000,
            offset in 1i64..10_000,
            priority in any_priority(),
        ) {
            let stock = threshold + 1 + (offset % threshold);
            prop_assume!(stock <= threshold * 2);
            prop_assert_eq!(classify(stock, cfg(priority, threshold)), StockStatus::Good);
        }

        #[test]
        fn above_double_threshold_is_optimal(
            threshold in 0i64..10_000,
            extra in 1i64..10_000,
            priority in any_priority(),
        ) {
            let stock = threshold * 2 + extra;
            prop_assert_eq!(classify(stock, cfg(priority, threshold)), StockStatus::Optimal);
        }

        #[test]
        fn classification_is_deterministic(
            stock in 0i64..100_000,
            threshold in 0i64..100_000,
            priority in any_priority(),
        ) {
            let c = cfg(priority, threshold);
            prop_assert_eq!(classify(stock, c), classify(stock, c));
        }
    }
}
