//! Token fixtures shared by unit tests

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};

use crate::auth::{Jwks, JwksCache, TokenVerifier};

pub const KID: &str = "test-key-1";
pub const DOMAIN: &str = "espresso.test";
pub const AUDIENCE: &str = "api.espresso.test";
pub const SUBJECT: &str = "auth0|barista";

const PRIVATE_KEY_PEM: &str = include_str!("../../tests/fixtures/rsa_private.pem");
const JWKS_JSON: &str = include_str!("../../tests/fixtures/jwks.json");

pub fn jwks() -> Jwks {
    serde_json::from_str(JWKS_JSON).expect("fixture key set")
}

pub fn issuer() -> String {
    format!("https://{}/", DOMAIN)
}

pub fn verifier() -> TokenVerifier {
    TokenVerifier::new(JwksCache::from_jwks(jwks()), AUDIENCE, issuer())
}

/// Claim set accepted by [`verifier`], valid for one hour
pub fn claims(scope: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "sub": SUBJECT,
        "scope": scope,
        "iss": issuer(),
        "aud": AUDIENCE,
        "iat": now,
        "exp": now + 3600,
    })
}

pub fn sign(claims: &Value, kid: Option<&str>) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = kid.map(str::to_string);
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("fixture private key");
    encode(&header, claims, &key).expect("sign token")
}

pub fn token(scope: &str) -> String {
    sign(&claims(scope), Some(KID))
}
