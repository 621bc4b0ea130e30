#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;

use espresso_api::auth::{JwksCache, TokenVerifier};
use espresso_api::database::{DataStore, MemoryStore};
use espresso_api::{app, AppState};

pub const KID: &str = "test-key-1";
pub const AUDIENCE: &str = "api.espresso.test";
pub const ISSUER: &str = "https://espresso.test/";

pub const ALL_SCOPES: &str = "read:restaurants create:restaurants update:restaurants \
     delete:restaurants read:reviews create:reviews update:reviews delete:reviews";

const PRIVATE_KEY_PEM: &str = include_str!("../fixtures/rsa_private.pem");
const JWKS_JSON: &str = include_str!("../fixtures/jwks.json");

/// The full router over a store and the fixture key set
pub struct TestApp {
    pub router: Router,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub text: String,
}

impl TestResponse {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.text)
            .unwrap_or_else(|e| panic!("response is not JSON ({}): {}", e, self.text))
    }
}

impl TestApp {
    /// Router over an empty in-memory store
    pub fn new() -> Result<Self> {
        Self::with_store(MemoryStore::new_shared())
    }

    pub fn with_store(store: Arc<dyn DataStore>) -> Result<Self> {
        let keys = JwksCache::from_json(JWKS_JSON).context("fixture key set")?;
        let verifier = TokenVerifier::new(keys, AUDIENCE, ISSUER);
        Ok(Self {
            router: app(AppState::new(store, verifier)),
        })
    }

    pub async fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<TestResponse> {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.send(builder.body(body)?).await
    }

    pub async fn send(&self, request: Request<Body>) -> Result<TestResponse> {
        let response = self.router.clone().oneshot(request).await?;
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await?;
        Ok(TestResponse {
            status,
            headers,
            text: String::from_utf8(bytes.to_vec())?,
        })
    }

    /// Request authorized with every scope the API knows
    pub async fn call(&self, method: Method, path: &str, body: Option<Value>) -> Result<TestResponse> {
        let token = token(ALL_SCOPES);
        self.request(method, path, Some(&token), body).await
    }

    pub async fn create_restaurant(&self, body: Value) -> Result<i64> {
        let res = self.call(Method::POST, "/restaurants/create", Some(body)).await?;
        assert_eq!(res.status, StatusCode::OK, "create restaurant failed: {}", res.text);
        res.json()["id"].as_i64().context("missing id")
    }

    pub async fn create_review(&self, restaurant_id: i64, author: &str) -> Result<i64> {
        let body = json!({
            "author": author,
            "date": "2021-01-15",
            "rating": 4,
            "comment": "Solid espresso",
            "restaurant_id": restaurant_id,
        });
        let res = self.call(Method::POST, "/reviews/create", Some(body)).await?;
        assert_eq!(res.status, StatusCode::OK, "create review failed: {}", res.text);
        res.json()["id"].as_i64().context("missing id")
    }
}

pub fn claims(scope: &str) -> Value {
    let now = chrono::Utc::now().timestamp();
    json!({
        "sub": "auth0|barista",
        "scope": scope,
        "iss": ISSUER,
        "aud": AUDIENCE,
        "iat": now,
        "exp": now + 3600,
    })
}

pub fn sign(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KID.to_string());
    let key = EncodingKey::from_rsa_pem(PRIVATE_KEY_PEM.as_bytes()).expect("fixture private key");
    encode(&header, claims, &key).expect("sign token")
}

pub fn token(scope: &str) -> String {
    sign(&claims(scope))
}

/// Assert the uniform error envelope and return its message
pub fn assert_error(res: &TestResponse, status: StatusCode) -> String {
    assert_eq!(res.status, status, "unexpected status, body: {}", res.text);
    let body = res.json();
    assert_eq!(body["success"], false, "error body: {}", body);
    assert!(body["code"].is_string(), "error code missing: {}", body);
    body["message"].as_str().unwrap_or_default().to_string()
}
