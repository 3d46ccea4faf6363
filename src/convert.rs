//! SQL type name to Arrow type conversion for catalog metadata.

use crate::types::{ArrowType, IntervalUnit, TimeUnit};

/// Reverse converter used when a backend reports column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlToArrowConverter {
    /// PostgreSQL `information_schema.columns.data_type` spellings.
    Postgresql,
    /// SQLite declared types, resolved by column affinity.
    Sqlite,
}

impl SqlToArrowConverter {
    /// Convert a reported SQL type name. Returns `None` for types with no
    /// Arrow counterpart.
    pub fn convert(&self, sql_type: &str) -> Option<ArrowType> {
        let normalized = sql_type.trim().to_ascii_lowercase();
        match self {
            SqlToArrowConverter::Postgresql => postgresql_to_arrow(&normalized),
            SqlToArrowConverter::Sqlite => Some(sqlite_to_arrow(&normalized)),
        }
    }
}

fn postgresql_to_arrow(sql_type: &str) -> Option<ArrowType> {
    let arrow_type = match sql_type {
        "boolean" => ArrowType::Boolean,
        "smallint" => ArrowType::Int16,
        "integer" => ArrowType::Int32,
        "bigint" => ArrowType::Int64,
        "real" => ArrowType::Float32,
        "double precision" => ArrowType::Float64,
        "text" | "character varying" | "character" | "name" => ArrowType::Utf8,
        "bytea" => ArrowType::Binary,
        "date" => ArrowType::Date32,
        "time without time zone" => ArrowType::Time64(TimeUnit::Microsecond),
        "timestamp without time zone" => ArrowType::Timestamp(TimeUnit::Microsecond, None),
        "timestamp with time zone" => {
            ArrowType::Timestamp(TimeUnit::Microsecond, Some("UTC".to_string()))
        }
        "interval" => ArrowType::Interval(IntervalUnit::MonthDayNano),
        // Unconstrained numeric; information_schema reports precision separately.
        "numeric" => ArrowType::Decimal128(38, 10),
        _ => return None,
    };
    Some(arrow_type)
}

/// SQLite affinity rules: the first matching substring decides.
fn sqlite_to_arrow(sql_type: &str) -> ArrowType {
    if sql_type.starts_with("bool") {
        ArrowType::Boolean
    } else if sql_type.contains("int") {
        ArrowType::Int64
    } else if sql_type.contains("char") || sql_type.contains("clob") || sql_type.contains("text")
    {
        ArrowType::Utf8
    } else if sql_type.is_empty() || sql_type.contains("blob") {
        ArrowType::Binary
    } else {
        // REAL and NUMERIC affinity both surface as doubles.
        ArrowType::Float64
    }
}
