//! Bearer token authentication and scope authorization
//!
//! Tokens are RS256 JWTs issued by an Auth0-style identity provider. Signing keys
//! are resolved by key id from the provider's JSON Web Key Set.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod jwks;
pub mod verifier;

pub use jwks::{Jwk, Jwks, JwksCache};
pub use verifier::{extract_bearer_token, TokenVerifier};

/// Authentication and authorization failures
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header is missing")]
    MissingHeader,

    #[error("Invalid header: {0}")]
    MalformedHeader(&'static str),

    #[error("Invalid header: Use an RS256 signed JWT Access Token")]
    UnsupportedAlgorithm,

    #[error("Invalid header: Unable to find appropriate key")]
    KeyNotFound,

    #[error("Token is expired")]
    Expired,

    #[error("Invalid claims, please check the audience and issuer")]
    InvalidClaims,

    #[error("Invalid header: Unable to parse authentication token.")]
    Unparseable,

    #[error("Permission not found for this resource")]
    Forbidden,

    #[error("Key set unavailable: {0}")]
    KeySetUnavailable(String),
}

/// Verified access token claims
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    /// Space separated permission strings
    #[serde(default)]
    pub scope: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: Option<i64>,
    #[serde(default)]
    pub iss: Option<String>,
    /// Either a single audience or a list of audiences
    #[serde(default)]
    pub aud: Option<serde_json::Value>,
}

impl Claims {
    /// Exact membership test of `required` in the whitespace-split `scope` claim.
    /// A token without a `scope` claim has no permissions.
    pub fn has_scope(&self, required: &str) -> bool {
        self.scope
            .as_deref()
            .map(|scope| scope.split_whitespace().any(|s| s == required))
            .unwrap_or(false)
    }
}

/// Fail with [`AuthError::Forbidden`] unless `claims` grant `required`
pub fn require_scope(claims: &Claims, required: &str) -> Result<(), AuthError> {
    if claims.has_scope(required) {
        Ok(())
    } else {
        tracing::warn!(
            subject = claims.sub.as_deref().unwrap_or("-"),
            required,
            "Token lacks required scope"
        );
        Err(AuthError::Forbidden)
    }
}

/// Permission strings checked by the route handlers
pub mod scopes {
    pub const READ_RESTAURANTS: &str = "read:restaurants";
    pub const CREATE_RESTAURANTS: &str = "create:restaurants";
    pub const UPDATE_RESTAURANTS: &str = "update:restaurants";
    pub const DELETE_RESTAURANTS: &str = "delete:restaurants";

    pub const READ_REVIEWS: &str = "read:reviews";
    pub const CREATE_REVIEWS: &str = "create:reviews";
    pub const UPDATE_REVIEWS: &str = "update:reviews";
    pub const DELETE_REVIEWS: &str = "delete:reviews";
}
