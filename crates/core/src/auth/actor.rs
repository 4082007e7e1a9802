//! The authenticated caller of a stock operation.

use avstock_shared::types::UserId;

use crate::auth::UserRole;
use crate::reconciliation::InventoryError;

/// An authenticated user performing an operation.
///
/// Checkout, return and the read operations take an `&Actor`, so an
/// operation cannot be reached without an identity. The only way to build
/// one is [`Actor::from_identity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    user_id: UserId,
    role: UserRole,
}

impl Actor {
    /// Builds an actor from the identity handed over by the authentication layer.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Unauthenticated` when no identity is present.
    pub fn from_identity(identity: Option<(UserId, UserRole)>) -> Result<Self, InventoryError> {
        identity
            .map(|(user_id, role)| Self { user_id, role })
            .ok_or(InventoryError::Unauthenticated)
    }

    /// The user behind this actor.
    #[must_use]
    pub const fn user_id(&self) -> UserId {
        self.user_id
    }

    /// The role granted by the token.
    #[must_use]
    pub const fn role(&self) -> UserRole {
        self.role
    }

    /// Returns an error unless the actor may manage the catalog.
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Forbidden` for borrowers.
    pub fn require_catalog_access(&self) -> Result<(), InventoryError> {
        if self.role.can_manage_catalog() {
            Ok(())
        } else {
            Err(InventoryError::Forbidden)
        }
    }
}
