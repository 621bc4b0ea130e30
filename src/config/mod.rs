use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while assembling configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {0} is missing; please set {0} and restart")]
    Missing(&'static str),

    #[error("Environment variable {name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub host: String,
    pub database_name: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Identity provider domain, e.g. `espresso-dev.us.auth0.com`
    pub domain: String,
    /// Expected `aud` claim
    pub audience: String,
    /// Seconds a fetched key set stays fresh. Zero re-fetches on every request.
    pub jwks_cache_ttl_secs: u64,
    pub jwks_timeout_secs: u64,
    /// Minimum age of the key set before an unknown key id may trigger a refetch
    pub jwks_min_refresh_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub enable_cors: bool,
}

impl AuthConfig {
    pub fn issuer(&self) -> String {
        format!("https://{}/", self.domain)
    }

    pub fn jwks_url(&self) -> String {
        format!("https://{}/.well-known/jwks.json", self.domain)
    }
}

impl DatabaseConfig {
    /// Build a postgres connection URL, percent-encoding the credentials
    pub fn connection_string(&self) -> Result<String, ConfigError> {
        let mut url = url::Url::parse(&format!("postgres://{}", self.host)).map_err(|_| {
            ConfigError::Invalid {
                name: "ESPRESSO_DB_HOST",
                value: self.host.clone(),
            }
        })?;

        let invalid_credentials = |_| ConfigError::Invalid {
            name: "ESPRESSO_DB_USER",
            value: self.user.clone(),
        };
        url.set_username(&self.user).map_err(invalid_credentials)?;
        url.set_password(Some(&self.password)).map_err(invalid_credentials)?;
        url.set_path(&format!("/{}", self.database_name));
        Ok(url.into())
    }
}

impl AppConfig {
    /// Load configuration from process environment.
    ///
    /// Database credentials and the identity provider settings are required;
    /// tuning knobs fall back to per-environment defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`AppConfig::from_env`] but reads variables through `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        let (max_connections, connection_timeout, jwks_cache_ttl_secs) = match environment {
            Environment::Development => (5, 30, 60),
            Environment::Staging => (10, 10, 600),
            Environment::Production => (20, 5, 600),
        };

        let mut config = Self {
            environment,
            database: DatabaseConfig {
                user: required("ESPRESSO_DB_USER")?,
                password: required("ESPRESSO_DB_PASSWORD")?,
                host: required("ESPRESSO_DB_HOST")?,
                database_name: required("ESPRESSO_DB_DATABASE_NAME")?,
                max_connections,
                connection_timeout,
            },
            auth: AuthConfig {
                domain: required("AUTH0_DOMAIN")?,
                audience: required("API_IDENTIFIER")?,
                jwks_cache_ttl_secs,
                jwks_timeout_secs: 10,
                jwks_min_refresh_secs: 30,
            },
            security: SecurityConfig {
                enable_cors: true,
            },
        };

        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            config.database.max_connections = parse_var("DATABASE_MAX_CONNECTIONS", v)?;
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            config.database.connection_timeout = parse_var("DATABASE_CONNECTION_TIMEOUT", v)?;
        }
        if let Some(v) = lookup("AUTH_JWKS_CACHE_TTL_SECS") {
            config.auth.jwks_cache_ttl_secs = parse_var("AUTH_JWKS_CACHE_TTL_SECS", v)?;
        }
        if let Some(v) = lookup("AUTH_JWKS_TIMEOUT_SECS") {
            config.auth.jwks_timeout_secs = parse_var("AUTH_JWKS_TIMEOUT_SECS", v)?;
        }
        if let Some(v) = lookup("AUTH_JWKS_MIN_REFRESH_SECS") {
            config.auth.jwks_min_refresh_secs = parse_var("AUTH_JWKS_MIN_REFRESH_SECS", v)?;
        }
        if let Some(v) = lookup("SECURITY_ENABLE_CORS") {
            config.security.enable_cors = parse_var("SECURITY_ENABLE_CORS", v)?;
        }

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
