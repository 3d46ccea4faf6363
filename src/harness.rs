//! Per-backend test driver.
//!
//! Wraps one test body with the quirks lifecycle: open the database, run,
//! close the handle and clean up the named tables. The result distinguishes
//! a skipped backend from a failed one.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use tracing::{info, warn};

use crate::database::Database;
use crate::error::QuirksError;
use crate::quirks::{CleanupOutcome, SqlValidationQuirks};

/// Error type returned by test bodies.
pub type TestError = Box<dyn std::error::Error + Send + Sync>;

/// Result of running one test body against one backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendOutcome {
    Passed,
    /// The backend is not configured in this environment.
    Skipped { reason: String },
    Failed { error: String },
}

impl BackendOutcome {
    pub fn is_passed(&self) -> bool {
        matches!(self, BackendOutcome::Passed)
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, BackendOutcome::Skipped { .. })
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BackendOutcome::Failed { .. })
    }
}

impl fmt::Display for BackendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendOutcome::Passed => f.write_str("PASSED"),
            BackendOutcome::Skipped { reason } => write!(f, "SKIPPED ({})", reason),
            BackendOutcome::Failed { error } => write!(f, "FAILED ({})", error),
        }
    }
}

/// Run `test` against the backend described by `quirks`.
///
/// `tables` are cleaned up after the test whatever its result, including a
/// panic in the test body, which is reported as [`BackendOutcome::Failed`].
/// Cleanup failures are logged and never change the outcome.
pub async fn run_backend<F, Fut>(
    quirks: &dyn SqlValidationQuirks,
    tables: &[&str],
    test: F,
) -> BackendOutcome
where
    F: FnOnce(Database) -> Fut,
    Fut: Future<Output = Result<(), TestError>>,
{
    let backend = quirks.backend_name();

    let database = match quirks.init_database().await {
        Ok(database) => database,
        Err(QuirksError::Unavailable { reason, .. }) => {
            info!(backend, %reason, "Backend skipped");
            return BackendOutcome::Skipped { reason };
        }
        Err(e) => {
            warn!(backend, error = %e, "Backend failed to initialize");
            return BackendOutcome::Failed {
                error: e.to_string(),
            };
        }
    };

    let result = AssertUnwindSafe(test(database.clone())).catch_unwind().await;
    database.close().await;

    for table in tables {
        match quirks.cleanup_table(table).await {
            CleanupOutcome::Dropped => info!(backend, table, "Cleaned up table"),
            outcome => warn!(backend, table, %outcome, "Table cleanup did not drop"),
        }
    }

    match result {
        Ok(Ok(())) => BackendOutcome::Passed,
        Ok(Err(e)) => BackendOutcome::Failed {
            error: e.to_string(),
        },
        Err(payload) => {
            let error = panic_message(payload.as_ref());
            warn!(backend, %error, "Test body panicked");
            BackendOutcome::Failed { error }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "test body panicked".to_string()
    }
}
