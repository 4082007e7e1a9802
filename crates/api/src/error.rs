//! Mapping of domain and repository errors to JSON responses.
//!
//! Every error body has the shape `{"error": CODE, "message": text}`.
//! Infrastructure failures are logged and reported with a generic message.

use avstock_core::reconciliation::InventoryError;
use avstock_db::repositories::{CatalogError, MaterialError};
use avstock_shared::AppError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

const INTERNAL_MESSAGE: &str = "An error occurred";

/// Builds a JSON error response.
pub fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into()
        })),
    )
        .into_response()
}

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

/// Maps a checkout/return/stock error to a response.
pub fn inventory_error_response(e: &InventoryError) -> Response {
    let status = status(e.http_status_code());
    if status.is_server_error() {
        error!(error = %e, "Stock operation failed");
        return error_response(status, e.error_code(), INTERNAL_MESSAGE);
    }
    error_response(status, e.error_code(), e.to_string())
}

/// Maps an application error to a response.
pub fn app_error_response(e: &AppError) -> Response {
    let status = status(e.status_code());
    if e.is_internal() {
        error!(error = %e, "Request failed");
        return error_response(status, e.error_code(), INTERNAL_MESSAGE);
    }
    error_response(status, e.error_code(), e.to_string())
}

/// Maps request-body validation failures to a 400 response.
pub fn validation_response(errors: &ValidationErrors) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "VALIDATION_ERROR",
            "message": "Request validation failed",
            "fields": errors.field_errors().keys().collect::<Vec<_>>()
        })),
    )
        .into_response()
}

/// Converts a material repository error into an application error.
pub fn material_app_error(e: MaterialError) -> AppError {
    match e {
        MaterialError::NotFound(id) => AppError::NotFound(format!("Material {id}")),
        MaterialError::DuplicateReference(_) => AppError::Conflict(e.to_string()),
        MaterialError::UnknownType(_)
        | MaterialError::UnknownSupplier(_)
        | MaterialError::EmptyField(_) => AppError::Validation(e.to_string()),
        MaterialError::Stock(inner) => inventory_app_error(inner),
        MaterialError::Database(db) => AppError::Database(db.to_string()),
    }
}

/// Converts a catalog repository error into an application error.
pub fn catalog_app_error(e: CatalogError) -> AppError {
    match e {
        CatalogError::EmptyName => AppError::Validation(e.to_string()),
        CatalogError::DuplicateName(_) => AppError::Conflict(e.to_string()),
        CatalogError::Database(db) => AppError::Database(db.to_string()),
    }
}

/// Converts a stock error into an application error.
pub fn inventory_app_error(e: InventoryError) -> AppError {
    match e {
        InventoryError::Unauthenticated => AppError::Unauthenticated(e.to_string()),
        InventoryError::Forbidden => AppError::Forbidden(e.to_string()),
        InventoryError::DebtNotFound(_) | InventoryError::MaterialNotFound(_) => {
            AppError::NotFound(e.to_string())
        }
        InventoryError::ConcurrencyConflict => AppError::Conflict(e.to_string()),
        InventoryError::Database(msg) => AppError::Database(msg),
        InventoryError::Internal(msg) => AppError::Internal(msg),
        InventoryError::InvalidQuantity(_)
        | InventoryError::InsufficientStock { .. }
        | InventoryError::OverReturn { .. }
        | InventoryError::InvalidIdempotencyKey
        | InventoryError::InvalidTransition { .. } => AppError::Validation(e.to_string()),
    }
}
