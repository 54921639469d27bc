//! `barstock-auth` — authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage: the user
//! directory is a trait, tokens are validated behind [`JwtValidator`], and
//! permission checks are pure functions of a [`Role`].

pub mod authorize;
pub mod claims;
pub mod directory;
pub mod jwt;
pub mod permissions;
pub mod roles;

pub use authorize::{AuthzError, Principal, authorize};
pub use claims::{JwtClaims, TokenValidationError, validate_claims};
pub use directory::{
    AuthError, CredentialError, DirectoryParseError, StaticUserDirectory, UserDirectory, UserRecord, authenticate,
};
pub use jwt::{Hs256JwtValidator, JwtError, JwtValidator};
pub use permissions::{Capability, Permissions};
pub use roles::Role;
