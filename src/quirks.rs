//! The backend quirks contract.
//!
//! A validation suite is written once against [`SqlValidationQuirks`]. Every
//! behavior that legitimately differs between backends is answered here:
//! how to open a database, how to spell column types, how unquoted
//! identifiers are folded, which catalog unqualified objects live in, the
//! native timestamp precision, and how to clean up after a test.

use std::fmt;

use async_trait::async_trait;

use crate::database::Database;
use crate::error::Result;
use crate::sql_quirks::SqlQuirks;
use crate::types::{ArrowType, TimeUnit};

/// Result of a best-effort table cleanup.
///
/// Cleanup runs during teardown and must never mask the outcome of the test
/// that ran before it, so failures are reported as a value, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupOutcome {
    /// The table was dropped.
    Dropped,
    /// The backend is not configured, nothing to clean.
    Skipped { reason: String },
    /// Connecting or dropping failed, e.g. because the table never existed.
    Failed { reason: String },
}

impl CleanupOutcome {
    pub fn is_dropped(&self) -> bool {
        matches!(self, CleanupOutcome::Dropped)
    }
}

impl fmt::Display for CleanupOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CleanupOutcome::Dropped => f.write_str("dropped"),
            CleanupOutcome::Skipped { reason } => write!(f, "skipped: {}", reason),
            CleanupOutcome::Failed { reason } => write!(f, "failed: {}", reason),
        }
    }
}

/// Backend-specific answers required by the shared validation suite.
///
/// Implementations are stateless after construction and safe to call
/// concurrently, as long as callers use distinct table names.
///
/// Implementations:
/// - `PostgresQuirks`: PostgreSQL (feature `postgres`)
/// - `SqliteQuirks`: SQLite (feature `sqlite`)
#[async_trait]
pub trait SqlValidationQuirks: Send + Sync {
    /// Short backend identifier used in logs and outcomes.
    fn backend_name(&self) -> &'static str;

    /// Open a database handle.
    ///
    /// Returns [`QuirksError::Unavailable`](crate::QuirksError::Unavailable)
    /// when the backend is not configured, and
    /// [`QuirksError::Connection`](crate::QuirksError::Connection) when it is
    /// configured but unreachable.
    async fn init_database(&self) -> Result<Database>;

    /// Drop a table created by a test. Never fails.
    async fn cleanup_table(&self, name: &str) -> CleanupOutcome;

    /// Catalog the suite should expect for unqualified objects.
    fn default_catalog(&self) -> String;

    /// Fold an unquoted table name the way the backend stores it.
    fn case_fold_table_name(&self, name: &str) -> String;

    /// Fold an unquoted column name the way the backend stores it.
    fn case_fold_column_name(&self, name: &str) -> String;

    /// Native precision of timestamp columns.
    fn default_timestamp_unit(&self) -> TimeUnit;

    /// SQL generation quirks, including the Arrow-to-SQL type name mapping.
    fn sql_quirks(&self) -> SqlQuirks;

    /// SQL type name used in DDL for `arrow_type`.
    fn arrow_to_sql_type_name(&self, arrow_type: &ArrowType) -> Result<String> {
        self.sql_quirks().arrow_to_sql_type_name(arrow_type)
    }
}
