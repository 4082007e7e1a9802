//! HS256 access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;
use uuid::Uuid;

use crate::auth::Claims;

/// Signing settings for access tokens.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret.
    pub secret: String,
    /// Lifetime of issued tokens, in minutes.
    pub access_token_expires_minutes: i64,
}

/// Why a token could not be issued or accepted.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Signing failed.
    #[error("could not issue token: {0}")]
    Issue(String),

    /// Bad signature, bad encoding or missing claims.
    #[error("invalid token: {0}")]
    Invalid(String),

    /// Signature is fine but `exp` has passed.
    #[error("token has expired")]
    Expired,
}

/// Issues and verifies access tokens with one shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("ttl_minutes", &self.ttl.num_minutes())
            .finish_non_exhaustive()
    }
}

impl JwtService {
    /// Builds the service; the secret is not kept in readable form.
    #[must_use]
    pub fn new(config: JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            ttl: Duration::minutes(config.access_token_expires_minutes),
        }
    }

    /// Issues a token for `user_id` with `role`, valid from now.
    ///
    /// Only the development seeder and tests mint tokens here.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Issue` if signing fails.
    pub fn issue(&self, user_id: Uuid, role: &str) -> Result<String, JwtError> {
        let claims = Claims::new(user_id, role, Utc::now(), self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| JwtError::Issue(e.to_string()))
    }

    /// Verifies a token and returns its claims.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` for an expired token and
    /// `JwtError::Invalid` for anything else that fails verification.
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        match decode::<Claims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(data.claims),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => Err(JwtError::Expired),
            Err(e) => Err(JwtError::Invalid(e.to_string())),
        }
    }
}
