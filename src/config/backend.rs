//! Per-backend connection configuration.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;

use super::URL_SUFFIX;
use crate::error::Result;

/// Explicit key/value source, shaped like the process environment.
pub type EnvSource = HashMap<String, String>;

/// Raw connection configuration for one backend.
///
/// Nothing is validated here; [`BackendConfig::resolve`] decides whether the
/// backend is usable.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend endpoint, without scheme (e.g. `localhost:5432/db`).
    pub url: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Connection parameters of a configured backend.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionParams {
    pub url: String,
    /// Empty when not configured.
    pub user: String,
    /// Empty when not configured.
    pub password: String,
}

impl fmt::Debug for ConnectionParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionParams")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Outcome of resolving a [`BackendConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Available(ConnectionParams),
    Unavailable { reason: String },
}

impl BackendConfig {
    /// Load from the process environment under `prefix`.
    pub fn load(prefix: &str) -> Result<Self> {
        Self::build(config::Environment::with_prefix(prefix))
    }

    /// Load from an explicit key/value source under `prefix`.
    pub fn from_source(prefix: &str, source: &EnvSource) -> Result<Self> {
        Self::build(config::Environment::with_prefix(prefix).source(Some(source.clone())))
    }

    fn build(environment: config::Environment) -> Result<Self> {
        let config = config::Config::builder()
            .add_source(environment)
            .build()?;
        Ok(config.try_deserialize()?)
    }

    /// Decide whether the backend can be used.
    ///
    /// Only the URL is checked. Missing credentials are passed through as
    /// empty strings.
    pub fn resolve(&self, display_name: &str, prefix: &str) -> Resolution {
        match self.url.as_deref() {
            Some(url) if !url.is_empty() => Resolution::Available(ConnectionParams {
                url: url.to_string(),
                user: self.user.clone().unwrap_or_default(),
                password: self.password.clone().unwrap_or_default(),
            }),
            _ => Resolution::Unavailable {
                reason: format!(
                    "{} not found, set {}_{}",
                    display_name, prefix, URL_SUFFIX
                ),
            },
        }
    }
}
