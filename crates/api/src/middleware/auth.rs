//! Authentication middleware for API routes.
//!
//! The middleware only validates what is presented: a request without an
//! `Authorization` header passes through with no identity, and the operation
//! it reaches decides that it needs one. A header that is present but fails
//! validation is rejected here with 401.

use std::convert::Infallible;

use avstock_core::auth::{Actor, UserRole};
use avstock_core::reconciliation::InventoryError;
use avstock_shared::types::UserId;
use avstock_shared::{Claims, JwtError};
use axum::{
    Json,
    extract::{OptionalFromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

fn unauthorized(error: &str, message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({ "error": error, "message": message })),
    )
        .into_response()
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Passes requests without an Authorization header through untouched
/// 2. Extracts the Bearer token and validates it with the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(header) = request.headers().get(AUTHORIZATION) else {
        return next.run(request).await;
    };

    let Some(token) = header.to_str().ok().and_then(extract_bearer_token) else {
        return unauthorized(
            "invalid_token",
            "Authorization header must carry a Bearer token",
        );
    };

    match state.jwt_service.verify(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(JwtError::Expired) => unauthorized("token_expired", "Token has expired"),
        Err(_) => unauthorized("invalid_token", "Invalid or malformed token"),
    }
}

/// Extractor for authenticated user claims.
///
/// Handlers of stock operations take `Option<AuthUser>` and turn it into an
/// [`Actor`], so a missing identity becomes the operation's own
/// `Unauthenticated` error.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Returns the user ID from the claims.
    #[must_use]
    pub fn user_id(&self) -> uuid::Uuid {
        self.0.user_id()
    }

    /// Returns the user's role, if the token carries a known one.
    #[must_use]
    pub fn role(&self) -> Option<UserRole> {
        self.0.role.parse().ok()
    }

    /// Returns the identity carried by the token.
    #[must_use]
    pub fn identity(&self) -> Option<(UserId, UserRole)> {
        self.role()
            .map(|role| (UserId::from_uuid(self.user_id()), role))
    }
}

/// Builds the actor for an operation from an optional identity.
///
/// # Errors
///
/// Returns `Unauthenticated` if there is no identity or its role is unknown.
pub fn actor(auth: Option<&AuthUser>) -> Result<Actor, InventoryError> {
    Actor::from_identity(auth.and_then(AuthUser::identity))
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Claims>().cloned().map(AuthUser))
    }
}
