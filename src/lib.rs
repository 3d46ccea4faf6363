//! Backend quirks for cross-backend SQL validation.
//!
//! One validation suite, many database backends. Every behavior that
//! differs between backends is answered by a [`SqlValidationQuirks`]
//! implementation so the suite itself never special-cases a backend.

pub mod backends;
pub mod config;
pub mod convert;
pub mod database;
pub mod error;
pub mod harness;
pub mod quirks;
pub mod sql_quirks;
pub mod types;
pub mod utils;

pub use config::{BackendConfig, ConnectionParams, EnvSource, Resolution};
pub use database::{Column, Database};
pub use error::{QuirksError, Result};
pub use harness::{run_backend, BackendOutcome};
pub use quirks::{CleanupOutcome, SqlValidationQuirks};
pub use sql_quirks::{SqlQuirks, DEFAULT_ARROW_TYPE_TO_SQL_TYPE_NAME_MAPPING};
pub use types::{ArrowType, ArrowTypeId, Field, TimeUnit};
