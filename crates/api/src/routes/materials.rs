//! Material catalog, checkout and history routes.

use avstock_core::audit::IdempotencyKey;
use avstock_core::reconciliation::InventoryError;
use avstock_db::entities::materials;
use avstock_db::repositories::{CreateMaterialInput, UpdateMaterialInput};
use avstock_db::{MaterialRepository, ReconciliationRepository};
use avstock_shared::AppError;
use avstock_shared::types::{MaterialId, PageRequest, PageResponse};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;
use validator::Validate;

use super::{active_actor, catalog_actor};
use crate::AppState;
use crate::error::{app_error_response, inventory_error_response, material_app_error, validation_response};
use crate::middleware::auth::{AuthUser, actor};

/// Header carrying the client's idempotency key for checkout.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// Creates the materials router (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/materials", get(list_materials).post(create_material))
        .route("/materials/{id}", get(get_material).patch(update_material))
        .route("/materials/{id}/checkout", post(checkout))
        .route("/materials/{id}/history", get(history))
}

/// Request body for registering a material.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateMaterialRequest {
    #[validate(length(min = 1, max = 50))]
    pub reference_code: String,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(range(min = 0))]
    pub quantity: i32,
    pub material_type_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
}

/// Request body for an administrative edit.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateMaterialRequest {
    #[validate(length(min = 1, max = 50))]
    pub reference_code: Option<String>,
    #[validate(length(min = 1, max = 255))]
    pub name: Option<String>,
    pub quantity: Option<i32>,
    pub material_type_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub serial_number: Option<String>,
}

/// Request body for checkout.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub quantity: i32,
}

fn material_json(m: &materials::Model) -> Value {
    json!({
        "id": m.id,
        "reference_code": m.reference_code,
        "name": m.name,
        "quantity": m.quantity,
        "checked_out": m.checked_out,
        "material_type_id": m.material_type_id,
        "supplier_id": m.supplier_id,
        "purchase_date": m.purchase_date,
        "serial_number": m.serial_number,
        "created_by": m.created_by,
        "created_at": m.created_at,
        "updated_at": m.updated_at
    })
}

/// Reads the optional idempotency key header.
fn idempotency_key(headers: &HeaderMap) -> Result<Option<IdempotencyKey>, InventoryError> {
    headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| InventoryError::InvalidIdempotencyKey)
                .and_then(IdempotencyKey::parse)
        })
        .transpose()
}

/// GET /materials - Paginated material list.
async fn list_materials(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Query(page): Query<PageRequest>,
) -> Response {
    if let Err(response) = active_actor(&state, auth.as_ref()).await {
        return response;
    }

    let page = page.clamped();
    let repo = MaterialRepository::new((*state.db).clone());
    match repo.list(&page).await {
        Ok(result) => {
            let data = result.materials.iter().map(material_json).collect();
            let body = PageResponse::new(data, page, result.total);
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// POST /materials - Register a material; the caller becomes its creator.
async fn create_material(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Json(payload): Json<CreateMaterialRequest>,
) -> Response {
    let actor = match catalog_actor(&state, auth.as_ref()).await {
        Ok(a) => a,
        Err(response) => return response,
    };
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }

    let repo = MaterialRepository::new((*state.db).clone());
    let input = CreateMaterialInput {
        reference_code: payload.reference_code,
        name: payload.name,
        quantity: payload.quantity,
        material_type_id: payload.material_type_id,
        supplier_id: payload.supplier_id,
        purchase_date: payload.purchase_date,
        serial_number: payload.serial_number,
        created_by: actor.user_id().into_inner(),
    };

    match repo.create(input).await {
        Ok(material) => {
            tracing::info!(
                material_id = %material.id,
                reference_code = %material.reference_code,
                created_by = %actor.user_id(),
                "Material created"
            );
            (StatusCode::CREATED, Json(material_json(&material))).into_response()
        }
        Err(e) => app_error_response(&material_app_error(e)),
    }
}

/// GET `/materials/{id}` - Material detail.
async fn get_material(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Response {
    if let Err(response) = active_actor(&state, auth.as_ref()).await {
        return response;
    }

    let repo = MaterialRepository::new((*state.db).clone());
    match repo.find_by_id(id).await {
        Ok(Some(material)) => (StatusCode::OK, Json(material_json(&material))).into_response(),
        Ok(None) => inventory_error_response(&InventoryError::MaterialNotFound(id)),
        Err(e) => app_error_response(&AppError::Database(e.to_string())),
    }
}

/// PATCH `/materials/{id}` - Administrative edit.
async fn update_material(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMaterialRequest>,
) -> Response {
    if let Err(response) = catalog_actor(&state, auth.as_ref()).await {
        return response;
    }
    if let Err(errors) = payload.validate() {
        return validation_response(&errors);
    }

    let repo = MaterialRepository::new((*state.db).clone());
    let input = UpdateMaterialInput {
        reference_code: payload.reference_code,
        name: payload.name,
        quantity: payload.quantity,
        material_type_id: payload.material_type_id,
        supplier_id: payload.supplier_id,
        purchase_date: payload.purchase_date,
        serial_number: payload.serial_number,
    };

    match repo.update(id, input).await {
        Ok(material) => (StatusCode::OK, Json(material_json(&material))).into_response(),
        Err(e) => app_error_response(&material_app_error(e)),
    }
}

/// POST `/materials/{id}/checkout` - Check out a quantity.
///
/// An `Idempotency-Key` header makes the request safe to retry: a replay
/// answers 200 with the original receipt instead of 201.
async fn checkout(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(payload): Json<CheckoutRequest>,
) -> Response {
    let actor = match actor(auth.as_ref()) {
        Ok(a) => a,
        Err(e) => return inventory_error_response(&e),
    };
    let key = match idempotency_key(&headers) {
        Ok(k) => k,
        Err(e) => return inventory_error_response(&e),
    };

    let repo = ReconciliationRepository::new((*state.db).clone(), state.inventory);
    match repo
        .checkout(&actor, MaterialId::from_uuid(id), payload.quantity, key.as_ref())
        .await
    {
        Ok(receipt) => {
            let status = if receipt.replayed {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, Json(receipt)).into_response()
        }
        Err(e) => inventory_error_response(&e),
    }
}

/// GET `/materials/{id}/history` - Checkout log, newest first.
async fn history(
    State(state): State<AppState>,
    auth: Option<AuthUser>,
    Path(id): Path<Uuid>,
) -> Response {
    let actor = match actor(auth.as_ref()) {
        Ok(a) => a,
        Err(e) => return inventory_error_response(&e),
    };

    let repo = ReconciliationRepository::new((*state.db).clone(), state.inventory);
    match repo.material_history(&actor, MaterialId::from_uuid(id)).await {
        Ok(entries) => (StatusCode::OK, Json(json!({ "data": entries }))).into_response(),
        Err(e) => inventory_error_response(&e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_idempotency_key_header() {
        let mut headers = HeaderMap::new();
        assert!(idempotency_key(&headers).unwrap().is_none());

        headers.insert(IDEMPOTENCY_KEY_HEADER, HeaderValue::from_static(" abc-123 "));
        assert_eq!(
            idempotency_key(&headers).unwrap().map(|k| k.as_str().to_string()),
            Some("abc-123".to_string())
        );

        headers.insert(IDEMPOTENCY_KEY_HEADER, HeaderValue::from_static("  "));
        assert!(matches!(
            idempotency_key(&headers),
            Err(InventoryError::InvalidIdempotencyKey)
        ));
    }

    #[test]
    fn test_create_request_validation() {
        let valid = CreateMaterialRequest {
            reference_code: "CAM-01".to_string(),
            name: "Camera A".to_string(),
            quantity: 5,
            material_type_id: None,
            supplier_id: None,
            purchase_date: None,
            serial_number: None,
        };
        assert!(valid.validate().is_ok());

        let invalid = CreateMaterialRequest {
            reference_code: String::new(),
            quantity: -1,
            ..valid
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("reference_code"));
        assert!(fields.contains_key("quantity"));
    }

    #[test]
    fn test_update_request_allows_empty_patch() {
        assert!(UpdateMaterialRequest::default().validate().is_ok());
    }
}
