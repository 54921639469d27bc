//! Email → role lookup.
//!
//! Identity lives outside this system; [`UserDirectory`] is the seam where a
//! real identity provider plugs in. [`StaticUserDirectory`] is the built-in
//! table used for single-venue deployments and tests.

use std::collections::HashMap;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use serde::Serialize;
use thiserror::Error;

use crate::{Principal, Role};

/// A known user. The password is kept only as an Argon2 PHC string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub email: String,
    pub role: Role,
    pub display_name: String,
    #[serde(skip)]
    password_hash: String,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CredentialError {
    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("invalid password hash: {0}")]
    InvalidHash(String),
}

impl UserRecord {
    /// Hash `password` with a fresh salt.
    pub fn new(email: &str, role: Role, password: &str) -> Result<Self, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| CredentialError::Hash(e.to_string()))?
            .to_string();
        Ok(Self::from_parts(email, role, hash))
    }

    /// Use an existing PHC string (`$argon2id$...`) as the stored hash.
    pub fn with_password_hash(email: &str, role: Role, phc: &str) -> Result<Self, CredentialError> {
        PasswordHash::new(phc).map_err(|e| CredentialError::InvalidHash(e.to_string()))?;
        Ok(Self::from_parts(email, role, phc.to_string()))
    }

    fn from_parts(email: &str, role: Role, password_hash: String) -> Self {
        let email = normalize_email(email);
        let display_name = email.split('@').next().unwrap_or_default().to_string();
        Self {
            email,
            role,
            display_name,
            password_hash,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    fn password_matches(&self, password: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.password_hash) else {
            tracing::warn!(email = %self.email, "stored password hash is unreadable");
            return false;
        };
        Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok()
    }

    pub fn principal(&self) -> Principal {
        Principal::new(self.email.clone(), self.role)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub trait UserDirectory: Send + Sync {
    /// Look up a user by email (case-insensitive).
    fn find(&self, email: &str) -> Option<UserRecord>;
}

/// In-memory email → user table.
#[derive(Debug, Clone, Default)]
pub struct StaticUserDirectory {
    users: HashMap<String, UserRecord>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DirectoryParseError {
    #[error("user entry '{0}' must look like email:role:password")]
    Malformed(String),

    #[error(transparent)]
    Role(#[from] crate::roles::UnknownRole),

    #[error(transparent)]
    Credential(#[from] CredentialError),
}

impl StaticUserDirectory {
    pub fn new(users: impl IntoIterator<Item = UserRecord>) -> Self {
        Self {
            users: users.into_iter().map(|u| (u.email.clone(), u)).collect(),
        }
    }

    /// Parse `email:role:password` entries separated by `;`. A password that
    /// starts with `$argon2` is taken as an already-hashed PHC string.
    pub fn parse(entries: &str) -> Result<Self, DirectoryParseError> {
        let mut users = Vec::new();
        for entry in entries.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let mut parts = entry.splitn(3, ':');
            let (Some(email), Some(role), Some(password)) = (parts.next(), parts.next(), parts.next()) else {
                return Err(DirectoryParseError::Malformed(entry.to_string()));
            };
            if email.trim().is_empty() || password.is_empty() {
                return Err(DirectoryParseError::Malformed(entry.to_string()));
            }
            let role: Role = role.parse()?;
            let user = if password.starts_with("$argon2") {
                UserRecord::with_password_hash(email, role, password)?
            } else {
                UserRecord::new(email, role, password)?
            };
            users.push(user);
        }
        Ok(Self::new(users))
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl UserDirectory for StaticUserDirectory {
    fn find(&self, email: &str) -> Option<UserRecord> {
        self.users.get(&normalize_email(email)).cloned()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("email and password are required")]
    MissingCredentials,

    #[error("invalid email or password")]
    InvalidCredentials,
}

/// Verify credentials against a directory.
pub fn authenticate<D: UserDirectory + ?Sized>(
    directory: &D,
    email: &str,
    password: &str,
) -> Result<UserRecord, AuthError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(AuthError::MissingCredentials);
    }
    match directory.find(email) {
        Some(user) if user.password_matches(password) => Ok(user),
        _ => Err(AuthError::InvalidCredentials),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn directory() -> StaticUserDirectory {
        StaticUserDirectory::parse("Admin@Venue.test:admin:s3cret; staff@venue.test:staff:pour").unwrap()
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let dir = directory();
        assert_eq!(dir.find("admin@venue.test").unwrap().role, Role::Admin);
        assert_eq!(dir.find("  STAFF@venue.test ").unwrap().role, Role::Staff);
        assert!(dir.find("nobody@venue.test").is_none());
    }

    #[test]
    fn authenticate_checks_password() {
        let dir = directory();
        assert_eq!(authenticate(&dir, "admin@venue.test", "s3cret").unwrap().email, "admin@venue.test");
        assert_eq!(
            authenticate(&dir, "admin@venue.test", "wrong"),
            Err(AuthError::InvalidCredentials)
        );
        assert_eq!(authenticate(&dir, "", "x"), Err(AuthError::MissingCredentials));
    }

    #[test]
    fn passwords_may_contain_colons() {
        let dir = StaticUserDirectory::parse("m@v.test:manager:a:b:c").unwrap();
        assert!(authenticate(&dir, "m@v.test", "a:b:c").is_ok());
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(matches!(
            StaticUserDirectory::parse("m@v.test:manager"),
            Err(DirectoryParseError::Malformed(_))
        ));
        assert!(matches!(
            StaticUserDirectory::parse("m@v.test:owner:pw"),
            Err(DirectoryParseError::Role(_))
        ));
    }

    #[test]
    fn display_name_defaults_to_local_part() {
        let user = UserRecord::new("head.bartender@venue.test", Role::Staff, "pw").unwrap();
        assert_eq!(user.display_name, "head.bartender");
    }

    #[test]
    fn stored_hash_is_salted_phc() {
        let a = UserRecord::new("a@venue.test", Role::Staff, "pour").unwrap();
        let b = UserRecord::new("b@venue.test", Role::Staff, "pour").unwrap();
        assert!(a.password_hash.starts_with("$argon2id$"));
        assert_ne!(a.password_hash, b.password_hash);
        assert!(!a.password_hash.contains("pour"));
    }

    #[test]
    fn accepts_prehashed_entries() {
        let hashed = UserRecord::new("x@venue.test", Role::Manager, "tonic").unwrap().password_hash;
        let dir = StaticUserDirectory::parse(&format!("m@venue.test:manager:{hashed}")).unwrap();
        assert!(authenticate(&dir, "m@venue.test", "tonic").is_ok());
        assert_eq!(
            authenticate(&dir, "m@venue.test", &hashed),
            Err(AuthError::InvalidCredentials)
        );
    }

    #[test]
    fn rejects_garbled_hash() {
        assert!(matches!(
            StaticUserDirectory::parse("m@venue.test:manager:$argon2id$v=19$!!"),
            Err(DirectoryParseError::Credential(CredentialError::InvalidHash(_)))
        ));
    }
}
