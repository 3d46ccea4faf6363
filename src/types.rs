//! Columnar type identifiers.
//!
//! A small model of the Arrow type system: enough to describe the columns a
//! validation suite creates and to name the backend-native precision of
//! temporal columns.

use std::fmt;

/// Temporal resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Second,
    Millisecond,
    Microsecond,
    Nanosecond,
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeUnit::Second => "s",
            TimeUnit::Millisecond => "ms",
            TimeUnit::Microsecond => "us",
            TimeUnit::Nanosecond => "ns",
        };
        f.write_str(name)
    }
}

/// Calendar interval layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    YearMonth,
    DayTime,
    MonthDayNano,
}

/// Coarse type identifier, one per logical type family.
///
/// Type-name overrides are keyed on this rather than on the full
/// [`ArrowType`], so one override covers every width/unit of a family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArrowTypeId {
    Null,
    Struct,
    List,
    LargeList,
    FixedSizeList,
    Union,
    Map,
    Int,
    FloatingPoint,
    Utf8,
    LargeUtf8,
    Binary,
    LargeBinary,
    FixedSizeBinary,
    Bool,
    Decimal,
    Date,
    Time,
    Timestamp,
    Interval,
    Duration,
}

impl ArrowTypeId {
    /// Every type identifier.
    pub const ALL: [ArrowTypeId; 21] = [
        ArrowTypeId::Null,
        ArrowTypeId::Struct,
        ArrowTypeId::List,
        ArrowTypeId::LargeList,
        ArrowTypeId::FixedSizeList,
        ArrowTypeId::Union,
        ArrowTypeId::Map,
        ArrowTypeId::Int,
        ArrowTypeId::FloatingPoint,
        ArrowTypeId::Utf8,
        ArrowTypeId::LargeUtf8,
        ArrowTypeId::Binary,
        ArrowTypeId::LargeBinary,
        ArrowTypeId::FixedSizeBinary,
        ArrowTypeId::Bool,
        ArrowTypeId::Decimal,
        ArrowTypeId::Date,
        ArrowTypeId::Time,
        ArrowTypeId::Timestamp,
        ArrowTypeId::Interval,
        ArrowTypeId::Duration,
    ];

    /// Nested types have no scalar column representation in plain SQL.
    pub fn is_nested(&self) -> bool {
        matches!(
            self,
            ArrowTypeId::Struct
                | ArrowTypeId::List
                | ArrowTypeId::LargeList
                | ArrowTypeId::FixedSizeList
                | ArrowTypeId::Union
                | ArrowTypeId::Map
        )
    }
}

impl fmt::Display for ArrowTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// A concrete columnar type, including width, unit and precision parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArrowType {
    Null,
    Boolean,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float16,
    Float32,
    Float64,
    Utf8,
    LargeUtf8,
    Binary,
    LargeBinary,
    FixedSizeBinary(i32),
    Date32,
    Date64,
    Time32(TimeUnit),
    Time64(TimeUnit),
    /// Unit plus optional time zone name.
    Timestamp(TimeUnit, Option<String>),
    Duration(TimeUnit),
    Interval(IntervalUnit),
    /// Precision, scale.
    Decimal128(u8, i8),
    Decimal256(u8, i8),
    List(Box<ArrowType>),
    LargeList(Box<ArrowType>),
    FixedSizeList(Box<ArrowType>, i32),
    Struct(Vec<Field>),
    /// Key type, value type.
    Map(Box<ArrowType>, Box<ArrowType>),
    Union(Vec<Field>),
}

impl ArrowType {
    pub fn type_id(&self) -> ArrowTypeId {
        match self {
            ArrowType::Null => ArrowTypeId::Null,
            ArrowType::Boolean => ArrowTypeId::Bool,
            ArrowType::Int8
            | ArrowType::Int16
            | ArrowType::Int32
            | ArrowType::Int64
            | ArrowType::UInt8
            | ArrowType::UInt16
            | ArrowType::UInt32
            | ArrowType::UInt64 => ArrowTypeId::Int,
            ArrowType::Float16 | ArrowType::Float32 | ArrowType::Float64 => {
                ArrowTypeId::FloatingPoint
            }
            ArrowType::Utf8 => ArrowTypeId::Utf8,
            ArrowType::LargeUtf8 => ArrowTypeId::LargeUtf8,
            ArrowType::Binary => ArrowTypeId::Binary,
            ArrowType::LargeBinary => ArrowTypeId::LargeBinary,
            ArrowType::FixedSizeBinary(_) => ArrowTypeId::FixedSizeBinary,
            ArrowType::Date32 | ArrowType::Date64 => ArrowTypeId::Date,
            ArrowType::Time32(_) | ArrowType::Time64(_) => ArrowTypeId::Time,
            ArrowType::Timestamp(_, _) => ArrowTypeId::Timestamp,
            ArrowType::Duration(_) => ArrowTypeId::Duration,
            ArrowType::Interval(_) => ArrowTypeId::Interval,
            ArrowType::Decimal128(_, _) | ArrowType::Decimal256(_, _) => ArrowTypeId::Decimal,
            ArrowType::List(_) => ArrowTypeId::List,
            ArrowType::LargeList(_) => ArrowTypeId::LargeList,
            ArrowType::FixedSizeList(_, _) => ArrowTypeId::FixedSizeList,
            ArrowType::Struct(_) => ArrowTypeId::Struct,
            ArrowType::Map(_, _) => ArrowTypeId::Map,
            ArrowType::Union(_) => ArrowTypeId::Union,
        }
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    pub name: String,
    pub data_type: ArrowType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: ArrowType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}
