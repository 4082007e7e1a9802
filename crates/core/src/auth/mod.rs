//! Authentication helpers and user roles.
//!
//! This module provides:
//! - Password hashing with Argon2id for the user factory
//! - The authenticated actor every stock operation requires
//! - User role definitions

mod actor;
mod password;

pub use actor::Actor;
pub use password::{PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// Role of a user within the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Full access, manages users.
    Admin,
    /// Manages the catalog and edits stock levels.
    Staff,
    /// Checks out and returns material.
    Borrower,
}

impl UserRole {
    /// Returns true if this role can create material and edit stock levels.
    #[must_use]
    pub const fn can_manage_catalog(&self) -> bool {
        matches!(self, Self::Admin | Self::Staff)
    }

    /// Returns the role as stored in the database and in token claims.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Borrower => "borrower",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "staff" => Ok(Self::Staff),
            "borrower" => Ok(Self::Borrower),
            other => Err(format!("unknown role: {other}")),
        }
    }
}
