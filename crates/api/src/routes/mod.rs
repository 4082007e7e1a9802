//! API route definitions.

use avstock_core::auth::{Actor, UserRole};
use avstock_core::reconciliation::InventoryError;
use avstock_db::UserRepository;
use avstock_db::entities::users;
use avstock_shared::AppError;
use axum::{Router, middleware, response::Response};

use crate::AppState;
use crate::error::{app_error_response, inventory_error_response};
use crate::middleware::auth::{AuthUser, actor, auth_middleware};

pub mod catalog;
pub mod debts;
pub mod health;
pub mod materials;

/// Creates the API router with the authentication middleware applied.
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let authenticated_routes = Router::new()
        .merge(materials::routes())
        .merge(debts::routes())
        .merge(catalog::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(authenticated_routes)
}

/// Checks the stored account behind a token; the row wins over the claims.
fn stored_access(user: Option<&users::Model>, needs_catalog: bool) -> Result<(), InventoryError> {
    let Some(user) = user.filter(|u| u.is_active) else {
        return Err(InventoryError::Unauthenticated);
    };
    if needs_catalog {
        let role = user
            .role
            .parse::<UserRole>()
            .map_err(|_| InventoryError::Forbidden)?;
        if !role.can_manage_catalog() {
            return Err(InventoryError::Forbidden);
        }
    }
    Ok(())
}

async fn load_checked(state: &AppState, actor: Actor, needs_catalog: bool) -> Result<Actor, Response> {
    let user = UserRepository::new((*state.db).clone())
        .find_by_id(actor.user_id().into_inner())
        .await
        .map_err(|e| app_error_response(&AppError::Database(e.to_string())))?;

    stored_access(user.as_ref(), needs_catalog).map_err(|e| inventory_error_response(&e))?;
    Ok(actor)
}

/// Resolves the caller of a read route: the token must be valid and the
/// account must still be active.
pub(crate) async fn active_actor(
    state: &AppState,
    auth: Option<&AuthUser>,
) -> Result<Actor, Response> {
    let actor = actor(auth).map_err(|e| inventory_error_response(&e))?;
    load_checked(state, actor, false).await
}

/// Resolves the caller of a catalog write: both the token role and the
/// stored role must allow catalog management, and the account must still
/// be active.
pub(crate) async fn catalog_actor(
    state: &AppState,
    auth: Option<&AuthUser>,
) -> Result<Actor, Response> {
    let actor = actor(auth).map_err(|e| inventory_error_response(&e))?;
    actor
        .require_catalog_access()
        .map_err(|e| inventory_error_response(&e))?;
    load_checked(state, actor, true).await
}
