use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};

use crate::app::AppState;
use crate::auth::{extract_bearer_token, AuthError, Claims};
use crate::error::ApiError;

/// JWT authentication as an extractor: a handler taking [`Claims`] only runs for
/// a request carrying a valid bearer token.
///
/// Extraction happens after routing has matched both path and method, so
/// unknown paths (404) and disallowed methods (405) are answered without
/// looking at the `Authorization` header.
#[async_trait]
impl FromRequestParts<AppState> for Claims {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let parts = &*parts;
        let token = extract_bearer_token(&parts.headers)
            .map_err(|e| reject(parts, e))?
            .to_owned();

        let claims = state
            .verifier
            .verify(&token)
            .await
            .map_err(|e| reject(parts, e))?;

        tracing::debug!(
            subject = claims.sub.as_deref().unwrap_or("-"),
            "Authenticated request to {}",
            parts.uri.path()
        );
        Ok(claims)
    }
}

fn reject(parts: &Parts, err: AuthError) -> ApiError {
    tracing::warn!(
        method = %parts.method,
        path = parts.uri.path(),
        "Authentication failed: {}",
        err
    );
    err.into()
}
