use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Capability, Permissions, Role};

/// An authenticated caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub email: String,
    pub role: Role,
}

impl Principal {
    pub fn new(email: impl Into<String>, role: Role) -> Self {
        Self {
            email: email.into(),
            role,
        }
    }

    pub fn permissions(&self) -> Permissions {
        Permissions::for_role(self.role)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("forbidden")]
    Forbidden { required: Capability, role: Role },
}

/// Check a principal against a capability.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn authorize(principal: &Principal, required: Capability) -> Result<(), AuthzError> {
    if required.allows(principal.role) {
        Ok(())
    } else {
        tracing::debug!(
            email = %principal.email,
            role = %principal.role,
            required = required.as_str(),
            "authorization denied"
        );
        Err(AuthzError::Forbidden {
            required,
            role: principal.role,
        })
    }
}
