//! SQLite quirks.
//!
//! SQLite keeps identifiers as declared, names the primary database `main`
//! and has no native timestamp type; the suite stores timestamps with the
//! millisecond precision of `strftime('%f')`.

use std::str::FromStr;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info};

use crate::config::{BackendConfig, ConnectionParams, EnvSource, Resolution};
use crate::convert::SqlToArrowConverter;
use crate::database::{drop_table_statement, Database, DatabasePool};
use crate::error::{QuirksError, Result};
use crate::quirks::{CleanupOutcome, SqlValidationQuirks};
use crate::sql_quirks::SqlQuirks;
use crate::types::{ArrowTypeId, TimeUnit};

/// Configuration key prefix.
pub const SQLITE_ENV_PREFIX: &str = "ADBC_SQLITE";
/// Database file path.
pub const SQLITE_URL_ENV_VAR: &str = "ADBC_SQLITE_URL";

pub const SQLITE_DEFAULT_CATALOG: &str = "main";

const BACKEND_NAME: &str = "sqlite";
const DISPLAY_NAME: &str = "SQLite";
const MAX_CONNECTIONS: u32 = 5;

/// True for paths that open a private in-memory database per connection.
///
/// Tables would be invisible to the pool's other connections and to the
/// cleanup connection, so such paths are rejected.
pub fn is_in_memory(path: &str) -> bool {
    path == ":memory:" || path.starts_with("file::memory:") || path.contains("mode=memory")
}

/// Connection URL for a database file, created on first use.
pub fn driver_url(params: &ConnectionParams) -> String {
    format!("sqlite:{}?mode=rwc", params.url)
}

/// SQLite implementation of [`SqlValidationQuirks`].
///
/// User and password keys are read but ignored.
#[derive(Debug, Clone, Default)]
pub struct SqliteQuirks {
    config: BackendConfig,
}

impl SqliteQuirks {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    /// Quirks for a database file at `path`.
    pub fn with_path(path: impl Into<String>) -> Self {
        Self::new(BackendConfig {
            url: Some(path.into()),
            ..Default::default()
        })
    }

    pub fn from_env() -> Result<Self> {
        Ok(Self::new(BackendConfig::load(SQLITE_ENV_PREFIX)?))
    }

    pub fn from_source(source: &EnvSource) -> Result<Self> {
        Ok(Self::new(BackendConfig::from_source(
            SQLITE_ENV_PREFIX,
            source,
        )?))
    }

    pub fn resolve(&self) -> Resolution {
        self.config.resolve(DISPLAY_NAME, SQLITE_ENV_PREFIX)
    }

    fn params(&self) -> Result<ConnectionParams> {
        match self.resolve() {
            Resolution::Available(params) if is_in_memory(&params.url) => {
                Err(QuirksError::Config(config::ConfigError::Message(format!(
                    "{} must name a database file, not {:?}",
                    SQLITE_URL_ENV_VAR, params.url
                ))))
            }
            Resolution::Available(params) => Ok(params),
            Resolution::Unavailable { reason } => Err(QuirksError::Unavailable {
                backend: BACKEND_NAME,
                reason,
            }),
        }
    }

    pub fn connection_string(&self) -> Result<String> {
        Ok(driver_url(&self.params()?))
    }

    fn sqlite_sql_quirks() -> SqlQuirks {
        SqlQuirks::builder()
            .override_type_id(ArrowTypeId::Utf8, "TEXT")
            .override_type_id(ArrowTypeId::LargeUtf8, "TEXT")
            .override_type_id(ArrowTypeId::Binary, "BLOB")
            .override_type_id(ArrowTypeId::LargeBinary, "BLOB")
            .override_type_id(ArrowTypeId::FixedSizeBinary, "BLOB")
            .override_type_id(ArrowTypeId::FloatingPoint, "REAL")
            .build()
    }

    async fn drop_with_fresh_connection(params: &ConnectionParams, name: &str) -> CleanupOutcome {
        let statement = match drop_table_statement(name) {
            Ok(statement) => statement,
            Err(e) => {
                return CleanupOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        // Cleanup never creates the file it is asked to clean.
        let options = match SqliteConnectOptions::from_str(&format!("sqlite:{}", params.url)) {
            Ok(options) => options.create_if_missing(false),
            Err(e) => {
                return CleanupOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        let mut connection = match options.connect().await {
            Ok(connection) => connection,
            Err(e) => {
                return CleanupOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };

        let outcome = match sqlx::query(&statement).execute(&mut connection).await {
            Ok(_) => CleanupOutcome::Dropped,
            Err(e) => CleanupOutcome::Failed {
                reason: e.to_string(),
            },
        };

        if let Err(e) = connection.close().await {
            debug!(error = %e, "Error closing cleanup connection");
        }
        outcome
    }
}

#[async_trait]
impl SqlValidationQuirks for SqliteQuirks {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn init_database(&self) -> Result<Database> {
        let params = self.params()?;
        info!(backend = BACKEND_NAME, path = %params.url, "Opening");

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(&driver_url(&params))
            .await?;

        Ok(Database::new(
            BACKEND_NAME,
            params,
            Self::sqlite_sql_quirks(),
            SqlToArrowConverter::Sqlite,
            DatabasePool::Sqlite(pool),
        ))
    }

    async fn cleanup_table(&self, name: &str) -> CleanupOutcome {
        match self.params() {
            Ok(params) => Self::drop_with_fresh_connection(&params, name).await,
            Err(QuirksError::Unavailable { reason, .. }) => CleanupOutcome::Skipped { reason },
            Err(e) => CleanupOutcome::Failed {
                reason: e.to_string(),
            },
        }
    }

    fn default_catalog(&self) -> String {
        SQLITE_DEFAULT_CATALOG.to_string()
    }

    fn case_fold_table_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn case_fold_column_name(&self, name: &str) -> String {
        name.to_string()
    }

    fn default_timestamp_unit(&self) -> TimeUnit {
        TimeUnit::Millisecond
    }

    fn sql_quirks(&self) -> SqlQuirks {
        Self::sqlite_sql_quirks()
    }
}
