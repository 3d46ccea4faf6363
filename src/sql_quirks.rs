//! Arrow-to-SQL type name mapping.
//!
//! Every backend answers "which SQL type do I declare for this Arrow type"
//! through [`SqlQuirks`]. A backend registers overrides for the types it
//! spells differently and defers everything else to a fallback, by default
//! [`DEFAULT_ARROW_TYPE_TO_SQL_TYPE_NAME_MAPPING`].

use std::fmt;
use std::sync::Arc;

use crate::error::{QuirksError, Result};
use crate::types::{ArrowType, ArrowTypeId};

/// Override consulted before the fallback. `None` defers.
pub type TypeNameOverride = Arc<dyn Fn(&ArrowType) -> Option<String> + Send + Sync>;

/// Fallback mapping consulted when no override answers.
pub type TypeNameFallback = fn(&ArrowType) -> Result<String>;

/// The shared default table.
pub const DEFAULT_ARROW_TYPE_TO_SQL_TYPE_NAME_MAPPING: TypeNameFallback =
    default_arrow_type_to_sql_type_name;

/// Default SQL type name for an Arrow type.
///
/// Uses standard SQL spellings, except binary data, which is declared as
/// `BYTEA` so the statement runs on PostgreSQL. Nested types and durations
/// have no portable column type and return [`QuirksError::UnsupportedType`].
pub fn default_arrow_type_to_sql_type_name(arrow_type: &ArrowType) -> Result<String> {
    let name = match arrow_type {
        ArrowType::Boolean => "BOOLEAN".to_string(),
        ArrowType::Int8 | ArrowType::Int16 | ArrowType::UInt8 => "SMALLINT".to_string(),
        ArrowType::Int32 | ArrowType::UInt16 => "INTEGER".to_string(),
        ArrowType::Int64 | ArrowType::UInt32 => "BIGINT".to_string(),
        ArrowType::UInt64 => "NUMERIC(20, 0)".to_string(),
        ArrowType::Float16 | ArrowType::Float32 => "REAL".to_string(),
        ArrowType::Float64 => "DOUBLE PRECISION".to_string(),
        ArrowType::Utf8 | ArrowType::LargeUtf8 => "VARCHAR".to_string(),
        // PostgreSQL has no VARBINARY/BINARY(n); every registered backend takes BYTEA.
        ArrowType::Binary | ArrowType::LargeBinary | ArrowType::FixedSizeBinary(_) => {
            "BYTEA".to_string()
        }
        ArrowType::Date32 | ArrowType::Date64 => "DATE".to_string(),
        ArrowType::Time32(_) | ArrowType::Time64(_) => "TIME".to_string(),
        ArrowType::Timestamp(_, None) => "TIMESTAMP".to_string(),
        ArrowType::Timestamp(_, Some(_)) => "TIMESTAMP WITH TIME ZONE".to_string(),
        ArrowType::Interval(_) => "INTERVAL".to_string(),
        ArrowType::Decimal128(precision, scale) | ArrowType::Decimal256(precision, scale) => {
            format!("DECIMAL({}, {})", precision, scale)
        }
        ArrowType::Null
        | ArrowType::Duration(_)
        | ArrowType::List(_)
        | ArrowType::LargeList(_)
        | ArrowType::FixedSizeList(_, _)
        | ArrowType::Struct(_)
        | ArrowType::Map(_, _)
        | ArrowType::Union(_) => {
            return Err(QuirksError::UnsupportedType(arrow_type.type_id()));
        }
    };
    Ok(name)
}

/// Backend-specific SQL generation quirks.
///
/// Cheap to clone; overrides are shared.
#[derive(Clone)]
pub struct SqlQuirks {
    overrides: Vec<TypeNameOverride>,
    fallback: TypeNameFallback,
}

impl SqlQuirks {
    pub fn builder() -> SqlQuirksBuilder {
        SqlQuirksBuilder::default()
    }

    /// Map an Arrow type to the SQL type name used in DDL.
    ///
    /// Overrides are consulted in registration order; the first answer wins.
    pub fn arrow_to_sql_type_name(&self, arrow_type: &ArrowType) -> Result<String> {
        for mapping in &self.overrides {
            if let Some(name) = mapping(arrow_type) {
                return Ok(name);
            }
        }
        (self.fallback)(arrow_type)
    }
}

impl Default for SqlQuirks {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for SqlQuirks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqlQuirks")
            .field("overrides", &self.overrides.len())
            .finish()
    }
}

/// Builder for [`SqlQuirks`].
pub struct SqlQuirksBuilder {
    overrides: Vec<TypeNameOverride>,
    fallback: TypeNameFallback,
}

impl Default for SqlQuirksBuilder {
    fn default() -> Self {
        Self {
            overrides: Vec::new(),
            fallback: DEFAULT_ARROW_TYPE_TO_SQL_TYPE_NAME_MAPPING,
        }
    }
}

impl SqlQuirksBuilder {
    /// Spell every type of the given family as `sql_type_name`.
    pub fn override_type_id(self, type_id: ArrowTypeId, sql_type_name: &str) -> Self {
        let sql_type_name = sql_type_name.to_string();
        self.arrow_to_sql_type_name_mapping(move |arrow_type| {
            (arrow_type.type_id() == type_id).then(|| sql_type_name.clone())
        })
    }

    /// Register an override function. Return `None` to defer to later
    /// overrides and finally the fallback.
    pub fn arrow_to_sql_type_name_mapping<F>(mut self, mapping: F) -> Self
    where
        F: Fn(&ArrowType) -> Option<String> + Send + Sync + 'static,
    {
        self.overrides.push(Arc::new(mapping));
        self
    }

    /// Replace the fallback table.
    pub fn fallback(mut self, fallback: TypeNameFallback) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn build(self) -> SqlQuirks {
        SqlQuirks {
            overrides: self.overrides,
            fallback: self.fallback,
        }
    }
}
