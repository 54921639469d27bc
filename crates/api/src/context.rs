use barstock_auth::{Permissions, Principal, Role};

/// The authenticated caller for a request, inserted by the auth middleware.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrincipalContext {
    principal: Principal,
}

impl PrincipalContext {
    pub fn new(principal: Principal) -> Self {
        Self { principal }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    /// Actor recorded in `updatedBy`.
    pub fn email(&self) -> &str {
        &self.principal.email
    }

    pub fn role(&self) -> Role {
        self.principal.role
    }

    pub fn permissions(&self) -> Permissions {
        self.principal.permissions()
    }
}
