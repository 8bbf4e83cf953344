//! Logical server registry.
//!
//! Commands may address a backend by logical name (`--server staging`);
//! the registry resolves that name to a configured base URL and credentials
//! and caches one [`McpClient`] per name. Get-or-create is the only mutation,
//! and client construction is idempotent, so the cache needs no further
//! coordination in this single-threaded design.
//!
//! Resolution precedence is pinned: an explicit name always wins; without
//! one the default server is used; an unknown explicit name is an error and
//! is never silently rewritten to the default.

use std::collections::HashMap;

use crate::client::McpClient;
use crate::error::{Error, Result};

/// Name of the server seeded from the environment.
pub const DEFAULT_SERVER: &str = "local";

/// Environment variable overriding the default server's base URL.
pub const SERVER_URL_ENV: &str = "AUTOMATOR_SERVER_URL";

/// Environment variable carrying the default server's API key.
pub const API_KEY_ENV: &str = "AUTOMATOR_API_KEY";

const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Connection settings for one logical server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ServerConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }
}

/// Maps logical server names to configs and caches one client per name.
///
/// Constructed once in `main` and passed by reference; there is no global
/// registry, which keeps the client layer testable.
#[derive(Debug, Default)]
pub struct ServerRegistry {
    servers: HashMap<String, ServerConfig>,
    clients: HashMap<String, McpClient>,
}

impl ServerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry with the `local` server seeded from the environment
    /// (`AUTOMATOR_SERVER_URL`, `AUTOMATOR_API_KEY`). `base_url_override`
    /// takes precedence over the environment when given (CLI flag).
    pub fn from_env(base_url_override: Option<&str>) -> Self {
        let base_url = base_url_override
            .map(str::to_string)
            .or_else(|| std::env::var(SERVER_URL_ENV).ok())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let mut config = ServerConfig::new(base_url);
        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.is_empty() {
                config = config.with_api_key(key);
            }
        }

        let mut registry = Self::new();
        registry.insert(DEFAULT_SERVER, config);
        registry
    }

    /// Register (or replace) a logical server. Replacing a config drops any
    /// cached client so the next resolve picks up the new settings.
    pub fn insert(&mut self, name: impl Into<String>, config: ServerConfig) {
        let name = name.into();
        self.clients.remove(&name);
        self.servers.insert(name, config);
    }

    /// Registered logical names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.servers.keys().map(String::as_str)
    }

    /// Resolve a logical name to a client, creating and caching it on first
    /// use. `None` selects the default server.
    pub fn resolve(&mut self, name: Option<&str>) -> Result<&McpClient> {
        let name = name.unwrap_or(DEFAULT_SERVER);

        let config = self
            .servers
            .get(name)
            .ok_or_else(|| Error::UnknownServer(name.to_string()))?;

        if !self.clients.contains_key(name) {
            let mut builder = McpClient::builder().base_url(&config.base_url);
            if let Some(ref key) = config.api_key {
                builder = builder.api_key(key);
            }
            let client = builder.build()?;
            self.clients.insert(name.to_string(), client);
        }

        // Present right after the insert above; lookup cannot fail.
        self.clients
            .get(name)
            .ok_or_else(|| Error::UnknownServer(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with_local() -> ServerRegistry {
        let mut registry = ServerRegistry::new();
        registry.insert(DEFAULT_SERVER, ServerConfig::new("http://localhost:8000"));
        registry
    }

    #[test]
    fn test_default_resolution() {
        let mut registry = registry_with_local();
        let client = registry.resolve(None).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut registry = registry_with_local();
        let first = registry.resolve(None).unwrap().base_url().clone();
        let second = registry.resolve(Some(DEFAULT_SERVER)).unwrap();
        assert_eq!(&first, second.base_url());
        assert_eq!(registry.clients.len(), 1);
    }

    #[test]
    fn test_explicit_name_wins_over_default() {
        let mut registry = registry_with_local();
        registry.insert(
            "staging",
            ServerConfig::new("http://staging:8000").with_api_key("k"),
        );

        let client = registry.resolve(Some("staging")).unwrap();
        assert_eq!(client.base_url().as_str(), "http://staging:8000/");
    }

    #[test]
    fn test_unknown_name_is_an_error_not_a_fallback() {
        let mut registry = registry_with_local();
        let err = registry.resolve(Some("nope")).unwrap_err();
        assert!(matches!(err, Error::UnknownServer(name) if name == "nope"));
    }

    #[test]
    fn test_reinsert_invalidates_cached_client() {
        let mut registry = registry_with_local();
        registry.resolve(None).unwrap();

        registry.insert(DEFAULT_SERVER, ServerConfig::new("http://other:9000"));
        let client = registry.resolve(None).unwrap();
        assert_eq!(client.base_url().as_str(), "http://other:9000/");
    }
}
