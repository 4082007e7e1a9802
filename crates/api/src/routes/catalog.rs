//! Material type and supplier routes.

use avstock_db::CatalogRepository;
use avstock_db::repositories::CreateSupplierInput;
use avstock_shared::AppError;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use super::{active_actor, catalog_actor};
use crate::AppState;
use crate::error::{app_error_response, catalog_app_error, validation_response};
use crate::middleware::auth::AuthUser;

/// Creates the catalog router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/material-types",
            get(list_material_types).post(create_material_type),
        )
        .route("/suppliers", get(list_suppliers).post(create_supplier))
}

/// Request body for a material type.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaterialTypeRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
}

/// Request body for a supplier.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[validate(length(min = 1, max = 150))]
    pub name: String,
    #[validate(email)]
    pub contact_email: Option<String>,
    #[validate(length(max = 50))]
    pub phone: Option<String>,
}

/// GET /material-types - All material types by name.
async fn list_material_types(State(state): State<AppState>, auth: Option<AuthUser>) -> Response {
    if let Err(response) = active_actor(&state, auth.as_ref()).await {
        return response;
    }

    match CatalogRepository::new((*state.db).clone())
        .list_material_types()
        .await
    {
        Ok(types) => (StatusCode::OK, Json(json!({ "data": types }))).into_response(),
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// POST /material-types - Create a material type.
async fn create_material_type(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Json(payload): Json<CreateMaterialTypeRequest>,
) -> Response {
    if let Err(response) = catalog_actor(&state, auth.as_ref()).await {
        return response;
    }
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }

    match CatalogRepository::new((*state.db).clone())
        .create_material_type(&payload.name)
        .await
    {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => app_error_response(&catalog_app_error(e)),
    }
}

/// GET /suppliers - All suppliers by name.
async fn list_suppliers(State(state): State<AppState>, auth: Option<AuthUser>) -> Response {
    if let Err(response) = active_actor(&state, auth.as_ref()).await {
        return response;
    }

    match CatalogRepository::new((*state.db).clone())
        .list_suppliers()
        .await
    {
        Ok(suppliers) => (StatusCode::OK, Json(json!({ "data": suppliers }))).into_response(),
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// POST /suppliers - Create a supplier.
async fn create_supplier(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Json(payload): Json<CreateSupplierRequest>,
) -> Response {
    if let Err(response) = catalog_actor(&state, auth.as_ref()).await {
        return response;
    }
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }

    let input = CreateSupplierInput {
        name: payload.name,
        contact_email: payload.contact_email,
        phone: payload.phone,
    };
    match CatalogRepository::new((*state.db).clone())
        .create_supplier(input)
        .await
    {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => app_error_response(&catalog_app_error(e)),
    }
}
