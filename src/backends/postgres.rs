//! PostgreSQL quirks.
//!
//! PostgreSQL folds unquoted identifiers to lower case, stores timestamps
//! with microsecond precision and provisions a `postgres` database by
//! default. `TEXT` is preferred over the default `VARCHAR` for strings.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Connection, PgConnection};
use tracing::{debug, info};

use crate::config::{BackendConfig, ConnectionParams, EnvSource, Resolution};
use crate::convert::SqlToArrowConverter;
use crate::database::{drop_table_statement, Database, DatabasePool};
use crate::error::{QuirksError, Result};
use crate::quirks::{CleanupOutcome, SqlValidationQuirks};
use crate::sql_quirks::SqlQuirks;
use crate::types::{ArrowTypeId, TimeUnit};

/// Configuration key prefix.
pub const POSTGRESQL_ENV_PREFIX: &str = "ADBC_JDBC_POSTGRESQL";
/// Backend endpoint, e.g. `localhost:5432/postgres`.
pub const POSTGRESQL_URL_ENV_VAR: &str = "ADBC_JDBC_POSTGRESQL_URL";
pub const POSTGRESQL_USER_ENV_VAR: &str = "ADBC_JDBC_POSTGRESQL_USER";
pub const POSTGRESQL_PASSWORD_ENV_VAR: &str = "ADBC_JDBC_POSTGRESQL_PASSWORD";

/// Catalog reported for unqualified objects.
///
/// Assumes the default `postgres` database. See
/// [`PostgresQuirks::catalog_from_config`] for the value derived from the
/// configured URL.
pub const POSTGRESQL_DEFAULT_CATALOG: &str = "postgres";

const BACKEND_NAME: &str = "postgresql";
const DISPLAY_NAME: &str = "PostgreSQL";
const MAX_CONNECTIONS: u32 = 5;

/// Build the JDBC-style connection string.
///
/// Credentials are embedded verbatim, so this string is meant for logs and
/// external test tooling. Use [`driver_url`] to connect.
pub fn make_jdbc_url(params: &ConnectionParams) -> String {
    format!(
        "jdbc:postgresql://{}?user={}&password={}",
        params.url, params.user, params.password
    )
}

/// Connection URL understood by the sqlx PostgreSQL driver.
pub fn driver_url(params: &ConnectionParams) -> String {
    format!(
        "postgresql://{}?user={}&password={}",
        params.url,
        urlencoding::encode(&params.user),
        urlencoding::encode(&params.password)
    )
}

/// PostgreSQL implementation of [`SqlValidationQuirks`].
#[derive(Debug, Clone, Default)]
pub struct PostgresQuirks {
    config: BackendConfig,
}

impl PostgresQuirks {
    pub fn new(config: BackendConfig) -> Self {
        Self { config }
    }

    /// Read `ADBC_JDBC_POSTGRESQL_{URL,USER,PASSWORD}` from the environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(BackendConfig::load(POSTGRESQL_ENV_PREFIX)?))
    }

    /// Read the same keys from an explicit source.
    pub fn from_source(source: &EnvSource) -> Result<Self> {
        Ok(Self::new(BackendConfig::from_source(
            POSTGRESQL_ENV_PREFIX,
            source,
        )?))
    }

    pub fn resolve(&self) -> Resolution {
        self.config.resolve(DISPLAY_NAME, POSTGRESQL_ENV_PREFIX)
    }

    fn params(&self) -> Result<ConnectionParams> {
        match self.resolve() {
            Resolution::Available(params) => Ok(params),
            Resolution::Unavailable { reason } => Err(QuirksError::Unavailable {
                backend: BACKEND_NAME,
                reason,
            }),
        }
    }

    /// JDBC-style connection string for the configured backend.
    pub fn connection_string(&self) -> Result<String> {
        Ok(make_jdbc_url(&self.params()?))
    }

    /// Database name from the configured URL path, if any.
    pub fn catalog_from_config(&self) -> Option<String> {
        let url = self.config.url.as_deref()?;
        let (_, path) = url.split_once('/')?;
        let database = path.split('?').next().unwrap_or_default();
        (!database.is_empty()).then(|| database.to_string())
    }

    fn postgres_sql_quirks() -> SqlQuirks {
        SqlQuirks::builder()
            .override_type_id(ArrowTypeId::Utf8, "TEXT")
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

        let mut connection = match PgConnection::connect(&driver_url(params)).await {
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
impl SqlValidationQuirks for PostgresQuirks {
    fn backend_name(&self) -> &'static str {
        BACKEND_NAME
    }

    async fn init_database(&self) -> Result<Database> {
        let params = self.params()?;
        info!(backend = BACKEND_NAME, url = %params.url, "Connecting");

        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(&driver_url(&params))
            .await?;

        Ok(Database::new(
            BACKEND_NAME,
            params,
            Self::postgres_sql_quirks(),
            SqlToArrowConverter::Postgresql,
            DatabasePool::Postgres(pool),
        ))
    }

    async fn cleanup_table(&self, name: &str) -> CleanupOutcome {
        match self.resolve() {
            Resolution::Available(params) => Self::drop_with_fresh_connection(&params, name).await,
            Resolution::Unavailable { reason } => CleanupOutcome::Skipped { reason },
        }
    }

    fn default_catalog(&self) -> String {
        POSTGRESQL_DEFAULT_CATALOG.to_string()
    }

    fn case_fold_table_name(&self, name: &str) -> String {
        name.to_lowercase()
    }

    fn case_fold_column_name(&self, name: &str) -> String {
        name.to_lowercase()
    }

    fn default_timestamp_unit(&self) -> TimeUnit {
        TimeUnit::Microsecond
    }

    fn sql_quirks(&self) -> SqlQuirks {
        Self::postgres_sql_quirks()
    }
}
