//! Route-level capability checks.
//!
//! Handlers call [`require`] before touching any service, so a forbidden
//! request never reaches the store.

use barstock_auth::{Capability, authorize};

use crate::app::errors::ApiError;
use crate::context::PrincipalContext;

pub fn require(principal: &PrincipalContext, capability: Capability) -> Result<(), ApiError> {
    authorize(principal.principal(), capability).map_err(|e| {
        tracing::info!(
            email = principal.email(),
            role = principal.role().as_str(),
            required = capability.as_str(),
            "request denied"
        );
        ApiError::from(e)
    })
}
