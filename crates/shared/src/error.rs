//! Errors shared by the catalog, user and HTTP layers.
//!
//! Checkout and return failures have their own taxonomy in
//! `avstock_core::reconciliation::InventoryError`.

use thiserror::Error;

/// Failure outside the stock reconciliation rules.
#[derive(Debug, Error)]
pub enum AppError {
    /// Caller has no valid identity.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// Caller's role does not allow the operation.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Referenced row does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Input rejected before reaching the database.
    #[error("invalid input: {0}")]
    Validation(String),

    /// Uniqueness clash or lost race.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Query or connection failure.
    #[error("database error: {0}")]
    Database(String),

    /// Anything else that should not happen.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP status for the response.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Unauthenticated(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Conflict(_) => 409,
            Self::Database(_) | Self::Internal(_) => 500,
        }
    }

    /// Stable machine-readable code for the `error` field.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Unauthenticated(_) => "UNAUTHENTICATED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// True when the message must stay in the logs, not in the response.
    #[must_use]
    pub const fn is_internal(&self) -> bool {
        self.status_code() >= 500
    }
}
