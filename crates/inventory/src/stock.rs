use serde::{Deserialize, Serialize};

use barstock_core::{DomainError, DomainResult};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockAction {
    Add,
    Subtract,
}

/// Stock delta request: `{quantity, action}`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockChange {
    pub quantity: i64,
    pub action: StockAction,
}

/// Compute the stock level after `change`. Pure; callers write the result.
pub fn apply_stock_change(current: i64, change: StockChange) -> DomainResult<i64> {
    if change.quantity <= 0 {
        return Err(DomainError::validation("quantity must be greater than zero"));
    }

    let next = match change.action {
        StockAction::Add => current.checked_add(change.quantity),
        StockAction::Subtract => current.checked_sub(change.quantity),
    }
    .ok_or_else(|| DomainError::validation("quantity out of range"))?;

    if next < 0 {
        return Err(DomainError::invariant(format!(
            "insufficient stock: cannot subtract {} from {}",
            change.quantity, current
        )));
    }
    Ok(next)
}
