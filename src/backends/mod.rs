//! Backend quirks implementations.
//!
//! Adding a backend means adding a module here and a line to
//! [`registered_backends`]; the shared suite is untouched.

use tracing::debug;

use crate::config::EnvSource;
use crate::error::Result;
use crate::quirks::SqlValidationQuirks;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "postgres")]
pub use postgres::PostgresQuirks;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteQuirks;

/// Every compiled-in backend, configured from `source`.
///
/// Unconfigured backends are still returned; they report themselves
/// unavailable when the suite tries to open them.
pub fn registered_backends(source: &EnvSource) -> Result<Vec<Box<dyn SqlValidationQuirks>>> {
    let mut backends: Vec<Box<dyn SqlValidationQuirks>> = Vec::new();

    #[cfg(feature = "postgres")]
    backends.push(Box::new(PostgresQuirks::from_source(source)?));

    #[cfg(feature = "sqlite")]
    backends.push(Box::new(SqliteQuirks::from_source(source)?));

    debug!(
        backends = ?backends.iter().map(|b| b.backend_name()).collect::<Vec<_>>(),
        "Registered backends"
    );
    Ok(backends)
}

/// [`registered_backends`] read from the process environment.
pub fn registered_backends_from_env() -> Result<Vec<Box<dyn SqlValidationQuirks>>> {
    registered_backends(&std::env::vars().collect())
}
