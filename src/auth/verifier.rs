use axum::http::{header::AUTHORIZATION, HeaderMap};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, Validation};

use super::{AuthError, Claims, JwksCache};
use crate::config::AuthConfig;

/// Extract the token from an `Authorization: Bearer <token>` header
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedHeader("Authorization header must be Bearer token"))?;

    let parts: Vec<&str> = value.split_whitespace().collect();
    match parts.as_slice() {
        [] => Err(AuthError::MissingHeader),
        [scheme, ..] if !scheme.eq_ignore_ascii_case("bearer") => Err(AuthError::MalformedHeader(
            "Authorization header must start with Bearer",
        )),
        [_] => Err(AuthError::MalformedHeader("Token not found")),
        [_, token] => Ok(*token),
        _ => Err(AuthError::MalformedHeader("Authorization header must be Bearer token")),
    }
}

/// Verifies RS256 access tokens against the issuer's key set
pub struct TokenVerifier {
    keys: JwksCache,
    audience: String,
    issuer: String,
}

impl TokenVerifier {
    pub fn new(keys: JwksCache, audience: impl Into<String>, issuer: impl Into<String>) -> Self {
        Self {
            keys,
            audience: audience.into(),
            issuer: issuer.into(),
        }
    }

    /// Verifier backed by the configured identity provider's key endpoint
    pub fn from_config(config: &AuthConfig) -> Result<Self, AuthError> {
        let keys = JwksCache::new(
            config.jwks_url(),
            std::time::Duration::from_secs(config.jwks_cache_ttl_secs),
            std::time::Duration::from_secs(config.jwks_timeout_secs),
        )?
        .with_min_refresh_interval(std::time::Duration::from_secs(config.jwks_min_refresh_secs));
        Ok(Self::new(keys, &config.audience, config.issuer()))
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// Verify signature, expiry, audience and issuer; return the decoded claims
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::UnsupportedAlgorithm)?;
        if matches!(header.alg, Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512) {
            return Err(AuthError::UnsupportedAlgorithm);
        }

        let kid = header.kid.ok_or(AuthError::KeyNotFound)?;
        let jwk = self.keys.get_key(&kid).await?;
        let decoding_key = jwk.to_decoding_key()?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);

        let data = decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::Expired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims,
            ErrorKind::MissingRequiredClaim(claim) if claim == "aud" || claim == "iss" => {
                AuthError::InvalidClaims
            }
            _ => AuthError::Unparseable,
        })?;

        Ok(data.claims)
    }
}
