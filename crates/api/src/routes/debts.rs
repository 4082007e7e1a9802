//! Open debt listing and return routes.

use avstock_db::ReconciliationRepository;
use avstock_shared::types::DebtId;
use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::AppState;
use crate::error::inventory_error_response;
use crate::middleware::auth::{AuthUser, actor};

/// Creates the debts router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/debts", get(list_open_debts))
        .route("/debts/{id}/return", post(return_material))
}

/// Request body for a return.
#[derive(Debug, Deserialize)]
pub struct ReturnRequest {
    pub quantity: i32,
}

/// GET /debts - The caller's open debts, earliest due date first.
async fn list_open_debts(State(state): State<AppState>, auth: Option<AuthUser>) -> Response {
    let actor = match actor(auth.as_ref()) {
        Ok(a) => a,
        Err(e) => return inventory_error_response(&e),
    };

    let repo = ReconciliationRepository::new((*state.db).clone(), state.inventory);
    match repo.list_open_debts(&actor).await {
        Ok(debts) => (StatusCode::OK, Json(json!({ "data": debts }))).into_response(),
        Err(e) => inventory_error_response(&e),
    }
}

/// POST `/debts/{id}/return` - Return a quantity against an open debt.
async fn return_material(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReturnRequest>,
) -> Response {
    let actor = match actor(auth.as_ref()) {
        Ok(a) => a,
        Err(e) => return inventory_error_response(&e),
    };

    let repo = ReconciliationRepository::new((*state.db).clone(), state.inventory);
    match repo
        .return_material(&actor, DebtId::from_uuid(id), payload.quantity)
        .await
    {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => inventory_error_response(&e),
    }
}
