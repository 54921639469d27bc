use serde::Serialize;

use crate::Role;

/// A gated action class.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Adjust stock counts. Any authenticated user.
    ModifyStock,
    /// Create/edit/delete products and manage the POS link. Manager or admin.
    ManageProducts,
    /// Change priorities and alert thresholds. Admin only.
    ManagePriorities,
}

impl Capability {
    pub fn allows(&self, role: Role) -> bool {
        match self {
            Capability::ModifyStock => true,
            Capability::ManageProducts => role >= Role::Manager,
            Capability::ManagePriorities => role == Role::Admin,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::ModifyStock => "modify_stock",
            Capability::ManageProducts => "manage_products",
            Capability::ManagePriorities => "manage_priorities",
        }
    }
}

/// The permission flags a client uses to show or hide actions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Permissions {
    pub can_modify_stock: bool,
    pub can_manage_products: bool,
    pub can_manage_priorities: bool,
}

impl Permissions {
    pub fn for_role(role: Role) -> Self {
        Self {
            can_modify_stock: Capability::ModifyStock.allows(role),
            can_manage_products: Capability::ManageProducts.allows(role),
            can_manage_priorities: Capability::ManagePriorities.allows(role),
        }
    }
}
