//! Backend configuration.
//!
//! Each backend reads three environment-style keys under its own prefix:
//! `<PREFIX>_URL`, `<PREFIX>_USER` and `<PREFIX>_PASSWORD`. An absent or
//! empty URL means the backend is not available in this environment.

mod backend;

pub use backend::{BackendConfig, ConnectionParams, EnvSource, Resolution};

/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "QUIRKS_LOG";

/// Suffix of the backend endpoint key.
pub const URL_SUFFIX: &str = "URL";
