//! Application settings loaded from environment variables.

use std::env;
use std::time::Duration;

use super::constants::{
    DEFAULT_DATABASE_URL, DEFAULT_ECONOMY_BASE_URL, DEFAULT_FETCH_BASE_DELAY_MS,
    DEFAULT_FETCH_MAX_ATTEMPTS, DEFAULT_PROVIDER_DEADLINE_SECONDS,
    DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECONDS, DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT,
    DEFAULT_SESSION_TTL_SECONDS, DEFAULT_THUMBNAILS_BASE_URL,
};
use crate::domain::IdentityStrategy;

/// Where session tokens are kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionBackend {
    Memory,
    Redis,
}

/// Outbound provider settings.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub economy_base_url: String,
    pub thumbnails_base_url: String,
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub request_timeout: Duration,
    pub deadline: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            economy_base_url: DEFAULT_ECONOMY_BASE_URL.to_string(),
            thumbnails_base_url: DEFAULT_THUMBNAILS_BASE_URL.to_string(),
            max_attempts: DEFAULT_FETCH_MAX_ATTEMPTS,
            base_delay: Duration::from_millis(DEFAULT_FETCH_BASE_DELAY_MS),
            request_timeout: Duration::from_secs(DEFAULT_PROVIDER_REQUEST_TIMEOUT_SECONDS),
            deadline: Duration::from_secs(DEFAULT_PROVIDER_DEADLINE_SECONDS),
        }
    }
}

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub redis_url: Option<String>,
    pub session_backend: SessionBackend,
    pub session_ttl_seconds: u64,
    pub cookie_secure: bool,
    pub trust_proxy: bool,
    pub identity_strategy: IdentityStrategy,
    pub provider: ProviderConfig,
    pub server_host: String,
    pub server_port: u16,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("session_backend", &self.session_backend)
            .field("session_ttl_seconds", &self.session_ttl_seconds)
            .field("cookie_secure", &self.cookie_secure)
            .field("trust_proxy", &self.trust_proxy)
            .field("identity_strategy", &self.identity_strategy)
            .field("provider", &self.provider)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            redis_url: None,
            session_backend: SessionBackend::Memory,
            session_ttl_seconds: DEFAULT_SESSION_TTL_SECONDS,
            cookie_secure: false,
            trust_proxy: false,
            identity_strategy: IdentityStrategy::ClientIp,
            provider: ProviderConfig::default(),
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Unset or unparsable values fall back to the defaults in `constants`.
    /// Sessions go to Redis whenever `REDIS_URL` is set, unless
    /// `SESSION_STORE=memory` says otherwise.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let redis_url = env::var("REDIS_URL").ok().filter(|v| !v.is_empty());

        let session_backend = match env::var("SESSION_STORE").ok().as_deref() {
            Some("memory") => SessionBackend::Memory,
            Some("redis") => SessionBackend::Redis,
            Some(other) => {
                tracing::warn!(value = %other, "Unknown SESSION_STORE, picking from REDIS_URL");
                Self::default_session_backend(&redis_url)
            }
            None => Self::default_session_backend(&redis_url),
        };

        let identity_strategy = env::var("IDENTITY_STRATEGY")
            .ok()
            .and_then(|v| {
                let parsed = IdentityStrategy::parse(&v);
                if parsed.is_none() {
                    tracing::warn!(value = %v, "Unknown IDENTITY_STRATEGY, using client-ip");
                }
                parsed
            })
            .unwrap_or(IdentityStrategy::ClientIp);

        let defaults = ProviderConfig::default();
        let provider = ProviderConfig {
            economy_base_url: env::var("ROBLOX_ECONOMY_URL")
                .unwrap_or(defaults.economy_base_url),
            thumbnails_base_url: env::var("ROBLOX_THUMBNAILS_URL")
                .unwrap_or(defaults.thumbnails_base_url),
            max_attempts: parse_env("PROVIDER_MAX_ATTEMPTS")
                .filter(|v| *v > 0)
                .unwrap_or(defaults.max_attempts),
            base_delay: parse_env("PROVIDER_BASE_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.base_delay),
            request_timeout: parse_env("PROVIDER_REQUEST_TIMEOUT_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            deadline: parse_env("PROVIDER_DEADLINE_SECONDS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.deadline),
        };

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            redis_url,
            session_backend,
            session_ttl_seconds: parse_env("SESSION_TTL_SECONDS")
                .unwrap_or(DEFAULT_SESSION_TTL_SECONDS),
            cookie_secure: parse_env("COOKIE_SECURE").unwrap_or(false),
            trust_proxy: parse_env("TRUST_PROXY").unwrap_or(false),
            identity_strategy,
            provider,
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: parse_env("SERVER_PORT").unwrap_or(DEFAULT_SERVER_PORT),
        }
    }

    fn default_session_backend(redis_url: &Option<String>) -> SessionBackend {
        if redis_url.is_some() {
            SessionBackend::Redis
        } else {
            SessionBackend::Memory
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_connection_strings() {
        let config = Config {
            database_url: "postgres://user:hunter2@db/catalog".to_string(),
            redis_url: Some("redis://:hunter2@cache".to_string()),
            ..Config::default()
        };

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_provider_defaults() {
        let provider = ProviderConfig::default();
        assert_eq!(provider.max_attempts, 3);
        assert_eq!(provider.base_delay, Duration::from_secs(1));
        assert!(provider.deadline > provider.request_timeout);
    }

    #[test]
    fn test_session_backend_follows_redis_url() {
        assert_eq!(
            Config::default_session_backend(&Some("redis://localhost".into())),
            SessionBackend::Redis
        );
        assert_eq!(Config::default_session_backend(&None), SessionBackend::Memory);
    }
}
