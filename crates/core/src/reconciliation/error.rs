//! Error taxonomy for checkout, return and stock operations.
//!
//! Every failure a caller can observe from the stock ledger or the debt
//! reconciliation is one of these variants. Each carries a stable error code,
//! an HTTP status, and whether the operation may be retried as-is.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during stock and debt operations.
#[derive(Debug, Error)]
pub enum InventoryError {
    // ========== Validation Errors ==========
    /// Quantity must be a positive whole number (or non-negative for stock edits).
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i32),

    /// Not enough stock on hand for the requested checkout.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Quantity requested.
        requested: i32,
        /// Quantity on hand.
        available: i32,
    },

    /// Returned quantity exceeds what is owed.
    #[error("Cannot return {requested}: only {outstanding} outstanding")]
    OverReturn {
        /// Quantity the caller tried to return.
        requested: i32,
        /// Quantity still owed (or checked out).
        outstanding: i32,
    },

    /// Idempotency key is blank or too long, or was already used by this
    /// user for a checkout of a different material or quantity.
    #[error("Invalid idempotency key")]
    InvalidIdempotencyKey,

    /// Debt transition attempted from a state that does not allow it.
    #[error("Cannot {action} a debt in state {from}")]
    InvalidTransition {
        /// The current debt state.
        from: &'static str,
        /// The attempted action.
        action: &'static str,
    },

    // ========== Lookup Errors ==========
    /// No open debt with this ID belongs to the caller.
    #[error("Open debt not found: {0}")]
    DebtNotFound(Uuid),

    /// Material not found.
    #[error("Material not found: {0}")]
    MaterialNotFound(Uuid),

    // ========== Identity Errors ==========
    /// No authenticated identity, or the user is unknown or inactive.
    #[error("Authentication required")]
    Unauthenticated,

    /// The caller's role does not allow the operation.
    #[error("Operation not allowed for this role")]
    Forbidden,

    // ========== Concurrency Errors ==========
    /// Lock or serialization failure on the material/debt pair.
    #[error("Concurrent modification detected, please retry")]
    ConcurrencyConflict,

    // ========== Infrastructure Errors ==========
    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl InventoryError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidQuantity(_) => "INVALID_QUANTITY",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::OverReturn { .. } => "OVER_RETURN",
            Self::InvalidIdempotencyKey => "INVALID_IDEMPOTENCY_KEY",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::DebtNotFound(_) => "DEBT_NOT_FOUND",
            Self::MaterialNotFound(_) => "MATERIAL_NOT_FOUND",
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            // 400 Bad Request - validation errors
            Self::InvalidQuantity(_)
            | Self::InsufficientStock { .. }
            | Self::OverReturn { .. }
            | Self::InvalidIdempotencyKey
            | Self::InvalidTransition { .. } => 400,

            // 401 Unauthorized
            Self::Unauthenticated => 401,

            // 403 Forbidden
            Self::Forbidden => 403,

            // 404 Not Found
            Self::DebtNotFound(_) | Self::MaterialNotFound(_) => 404,

            // 409 Conflict - concurrency errors
            Self::ConcurrencyConflict => 409,

            // 500 Internal Server Error
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns true if this error is retryable.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyConflict)
    }
}
