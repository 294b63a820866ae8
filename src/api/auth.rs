//! Caller identity checks.
//!
//! Callers authenticate with a JWT in the `x-auth-token` header. The
//! token carries the user id under the `user.id` claim and an expiry.

use axum::http::HeaderMap;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AttestorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub user: ClaimsUser,
    pub exp: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimsUser {
    pub id: String,
}

/// Authenticated caller.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

/// Validates the identity token on a request and returns the caller.
///
/// Rejects requests without a token, with an expired token, or with a
/// token signed under a different secret.
pub fn authenticate(headers: &HeaderMap, jwt_secret: &str) -> Result<AuthUser, AttestorError> {
    let token = headers
        .get("x-auth-token")
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            AttestorError::UnauthorizedError("No token, authorization denied".to_string())
        })?;

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| AttestorError::UnauthorizedError("Token is not valid".to_string()))?;

    Ok(AuthUser {
        id: data.claims.user.id,
    })
}
