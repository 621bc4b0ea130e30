//! JWKS (JSON Web Key Set) key resolution
//!
//! Keys are fetched from the identity provider and cached by key id. A cached
//! set older than the TTL is re-fetched before use, and a key-id miss against a
//! set older than the minimum refresh interval forces one more fetch before
//! giving up. This lets a rotated signing key be picked up without waiting for
//! the TTL. Fetches are serialized, so concurrent callers share one.

use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};

use super::AuthError;

/// A single JSON Web Key
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type (only "RSA" is usable here)
    pub kty: String,

    #[serde(default)]
    pub kid: Option<String>,

    #[serde(default, rename = "use")]
    pub key_use: Option<String>,

    #[serde(default)]
    pub alg: Option<String>,

    /// RSA modulus (base64url encoded)
    #[serde(default)]
    pub n: Option<String>,

    /// RSA exponent (base64url encoded)
    #[serde(default)]
    pub e: Option<String>,
}

impl Jwk {
    pub fn to_decoding_key(&self) -> Result<DecodingKey, AuthError> {
        if self.kty != "RSA" {
            return Err(AuthError::Unparseable);
        }
        let (Some(n), Some(e)) = (self.n.as_deref(), self.e.as_deref()) else {
            return Err(AuthError::Unparseable);
        };
        DecodingKey::from_rsa_components(n, e).map_err(|_| AuthError::Unparseable)
    }
}

/// JSON Web Key Set as served at `/.well-known/jwks.json`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

struct CacheState {
    keys: HashMap<String, Jwk>,
    fetched_at: Option<Instant>,
}

impl CacheState {
    fn replace(&mut self, jwks: Jwks) {
        self.keys = index_by_kid(jwks);
        self.fetched_at = Some(Instant::now());
    }

    /// True unless the set was fetched less than `age` ago
    fn older_than(&self, age: Duration) -> bool {
        self.fetched_at.map_or(true, |at| at.elapsed() >= age)
    }
}

fn index_by_kid(jwks: Jwks) -> HashMap<String, Jwk> {
    jwks.keys
        .into_iter()
        .filter_map(|k| k.kid.clone().map(|kid| (kid, k)))
        .collect()
}

/// Minimum spacing of key-id-miss refreshes unless configured otherwise
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Time-bounded cache of an issuer's signing keys
pub struct JwksCache {
    /// Remote endpoint; `None` for a fixed key set that never refreshes
    endpoint: Option<String>,
    client: reqwest::Client,
    ttl: Duration,
    /// A key-id miss only refreshes a set at least this old
    min_refresh_interval: Duration,
    state: RwLock<CacheState>,
    /// Held for the duration of an upstream fetch so concurrent callers share one
    refresh_lock: Mutex<()>,
}

impl JwksCache {
    /// Cache backed by a remote endpoint. Nothing is fetched until first use.
    pub fn new(endpoint: impl Into<String>, ttl: Duration, timeout: Duration) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        Ok(Self {
            endpoint: Some(endpoint.into()),
            client,
            ttl,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            state: RwLock::new(CacheState {
                keys: HashMap::new(),
                fetched_at: None,
            }),
            refresh_lock: Mutex::new(()),
        })
    }

    /// Fixed key set, used for tests and offline development
    pub fn from_jwks(jwks: Jwks) -> Self {
        Self {
            endpoint: None,
            client: reqwest::Client::new(),
            ttl: Duration::MAX,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            state: RwLock::new(CacheState {
                keys: index_by_kid(jwks),
                fetched_at: Some(Instant::now()),
            }),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, AuthError> {
        let jwks: Jwks = serde_json::from_str(json)
            .map_err(|e| AuthError::KeySetUnavailable(format!("invalid key set: {}", e)))?;
        Ok(Self::from_jwks(jwks))
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Resolve the key with id `kid`, fetching or refreshing the set as needed
    pub async fn get_key(&self, kid: &str) -> Result<Jwk, AuthError> {
        if self.endpoint.is_none() {
            return self.lookup(kid).await.ok_or(AuthError::KeyNotFound);
        }

        let ttl = self.ttl;
        let mut refreshed = false;
        if self.state.read().await.older_than(ttl) {
            refreshed = self.refresh_if(|state| state.older_than(ttl)).await?;
        }

        if let Some(key) = self.lookup(kid).await {
            return Ok(key);
        }
        if refreshed {
            return Err(AuthError::KeyNotFound);
        }

        let min_age = self.min_refresh_interval;
        let refreshed = self
            .refresh_if(|state| !state.keys.contains_key(kid) && state.older_than(min_age))
            .await?;
        if refreshed {
            tracing::debug!(kid, "Key id was not cached, refreshed key set");
        }
        self.lookup(kid).await.ok_or(AuthError::KeyNotFound)
    }

    async fn lookup(&self, kid: &str) -> Option<Jwk> {
        self.state.read().await.keys.get(kid).cloned()
    }

    /// Fetch a fresh set if `needed` still holds once the refresh lock is held.
    /// Returns whether a fetch happened.
    async fn refresh_if<F>(&self, needed: F) -> Result<bool, AuthError>
    where
        F: Fn(&CacheState) -> bool,
    {
        let Some(endpoint) = &self.endpoint else {
            return Ok(false);
        };

        let _guard = self.refresh_lock.lock().await;
        if !needed(&*self.state.read().await) {
            return Ok(false);
        }

        let jwks = self.fetch(endpoint).await?;
        tracing::debug!(endpoint = %endpoint, keys = jwks.keys.len(), "Fetched key set");
        self.state.write().await.replace(jwks);
        Ok(true)
    }

    async fn fetch(&self, endpoint: &str) -> Result<Jwks, AuthError> {
        let response = self
            .client
            .get(endpoint)
            .send()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::KeySetUnavailable(format!(
                "HTTP {} from {}",
                response.status(),
                endpoint
            )));
        }

        response
            .json::<Jwks>()
            .await
            .map_err(|e| AuthError::KeySetUnavailable(e.to_string()))
    }
}
