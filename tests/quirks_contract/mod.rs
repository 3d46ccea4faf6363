//! Shared quirks contract tests.
//!
//! These tests verify the contract of the SqlValidationQuirks trait.
//! Each backend test binary runs them against its own implementation.

use validation_quirks::types::IntervalUnit;
use validation_quirks::{
    ArrowType, CleanupOutcome, Field, QuirksError, SqlValidationQuirks, TimeUnit,
};

/// One concrete type per scalar type identifier.
pub fn scalar_types() -> Vec<ArrowType> {
    vec![
        ArrowType::Boolean,
        ArrowType::Int8,
        ArrowType::Int16,
        ArrowType::Int32,
        ArrowType::Int64,
        ArrowType::UInt8,
        ArrowType::UInt16,
        ArrowType::UInt32,
        ArrowType::UInt64,
        ArrowType::Float16,
        ArrowType::Float32,
        ArrowType::Float64,
        ArrowType::Utf8,
        ArrowType::LargeUtf8,
        ArrowType::Binary,
        ArrowType::LargeBinary,
        ArrowType::FixedSizeBinary(8),
        ArrowType::Date32,
        ArrowType::Date64,
        ArrowType::Time32(TimeUnit::Second),
        ArrowType::Time64(TimeUnit::Nanosecond),
        ArrowType::Timestamp(TimeUnit::Microsecond, None),
        ArrowType::Timestamp(TimeUnit::Microsecond, Some("UTC".to_string())),
        ArrowType::Interval(IntervalUnit::DayTime),
        ArrowType::Decimal128(18, 4),
        ArrowType::Decimal256(40, 0),
    ]
}

// =============================================================================
// Static answers
// =============================================================================

pub fn test_type_mapping_is_total<Q: SqlValidationQuirks>(quirks: &Q) {
    for ty in scalar_types() {
        let name = quirks
            .arrow_to_sql_type_name(&ty)
            .unwrap_or_else(|e| panic!("{:?} has no SQL type name: {}", ty, e));
        assert!(!name.is_empty(), "{:?} mapped to an empty name", ty);
    }
}

pub fn test_nested_types_are_unsupported<Q: SqlValidationQuirks>(quirks: &Q) {
    let nested = ArrowType::Struct(vec![Field::new("a", ArrowType::Int32, true)]);
    match quirks.arrow_to_sql_type_name(&nested) {
        Err(QuirksError::UnsupportedType(_)) => {}
        other => panic!("expected UnsupportedType, got {:?}", other),
    }
}

pub fn test_case_folding_is_idempotent<Q: SqlValidationQuirks>(quirks: &Q) {
    for name in ["Users", "ID", "already_lower", "MiXeD_123"] {
        let table = quirks.case_fold_table_name(name);
        assert_eq!(quirks.case_fold_table_name(&table), table);

        let column = quirks.case_fold_column_name(name);
        assert_eq!(quirks.case_fold_column_name(&column), column);
    }
}

pub fn test_fixed_answers_are_stable<Q: SqlValidationQuirks>(quirks: &Q) {
    let unit = quirks.default_timestamp_unit();
    let catalog = quirks.default_catalog();
    for _ in 0..3 {
        assert_eq!(quirks.default_timestamp_unit(), unit);
        assert_eq!(quirks.default_catalog(), catalog);
    }
    assert!(!catalog.is_empty(), "default catalog must not be empty");
}

// =============================================================================
// Live backend
// =============================================================================

pub async fn test_created_table_reports_folded_names<Q: SqlValidationQuirks>(quirks: &Q) {
    let table = "ContractFolding";
    let db = quirks.init_database().await.expect("backend should be available");

    db.create_table(
        table,
        &[
            Field::new("ID", ArrowType::Int64, false),
            Field::new("DisplayName", ArrowType::Utf8, true),
        ],
    )
    .await
    .expect("create table should succeed");

    let folded = quirks.case_fold_table_name(table);
    let tables = db.list_tables().await.expect("list tables should succeed");
    assert!(
        tables.contains(&folded),
        "expected {} in {:?}",
        folded,
        tables
    );

    let columns = db.list_columns(&folded).await.expect("list columns should succeed");
    let names: Vec<_> = columns.iter().map(|c| c.name.clone()).collect();
    assert_eq!(
        names,
        vec![
            quirks.case_fold_column_name("ID"),
            quirks.case_fold_column_name("DisplayName"),
        ]
    );
    assert_eq!(columns[0].arrow_type, Some(ArrowType::Int64));
    assert_eq!(columns[1].arrow_type, Some(ArrowType::Utf8));

    db.close().await;
    assert!(quirks.cleanup_table(table).await.is_dropped());
}

pub async fn test_cleanup_drops_table<Q: SqlValidationQuirks>(quirks: &Q) {
    let table = "contract_cleanup";
    let db = quirks.init_database().await.expect("backend should be available");
    db.create_table(table, &[Field::new("v", ArrowType::Int32, true)])
        .await
        .expect("create table should succeed");

    let outcome = quirks.cleanup_table(table).await;
    assert_eq!(outcome, CleanupOutcome::Dropped);

    let tables = db.list_tables().await.expect("list tables should succeed");
    assert!(!tables.contains(&quirks.case_fold_table_name(table)));
    db.close().await;
}

pub async fn test_cleanup_missing_table_is_not_an_error<Q: SqlValidationQuirks>(quirks: &Q) {
    // Make sure the backend is reachable so the failure is about the table.
    let db = quirks.init_database().await.expect("backend should be available");
    db.close().await;

    let outcome = quirks.cleanup_table("contract_never_created").await;
    assert!(
        matches!(outcome, CleanupOutcome::Failed { .. }),
        "got {}",
        outcome
    );
}

pub async fn test_cleanup_is_repeatable<Q: SqlValidationQuirks>(quirks: &Q) {
    let table = "contract_repeat";
    let db = quirks.init_database().await.expect("backend should be available");
    db.create_table(table, &[Field::new("v", ArrowType::Boolean, true)])
        .await
        .expect("create table should succeed");
    db.close().await;

    assert!(quirks.cleanup_table(table).await.is_dropped());
    assert!(!quirks.cleanup_table(table).await.is_dropped());
    assert!(!quirks.cleanup_table(table).await.is_dropped());
}

pub async fn test_every_scalar_type_is_creatable<Q: SqlValidationQuirks>(quirks: &Q) {
    let table = "contract_all_types";
    let fields: Vec<_> = scalar_types()
        .into_iter()
        .enumerate()
        .map(|(i, ty)| Field::new(format!("c{}", i), ty, true))
        .collect();

    let db = quirks.init_database().await.expect("backend should be available");
    db.create_table(table, &fields)
        .await
        .unwrap_or_else(|e| panic!("DDL for every scalar type should run: {}", e));

    let columns = db
        .list_columns(&quirks.case_fold_table_name(table))
        .await
        .expect("list columns should succeed");
    assert_eq!(columns.len(), fields.len());
    db.close().await;

    assert!(quirks.cleanup_table(table).await.is_dropped());
}

pub async fn test_timestamp_column_uses_default_unit<Q: SqlValidationQuirks>(quirks: &Q) {
    let table = "contract_timestamps";
    let db = quirks.init_database().await.expect("backend should be available");
    let unit = quirks.default_timestamp_unit();
    db.create_table(
        table,
        &[Field::new("at", ArrowType::Timestamp(unit, None), true)],
    )
    .await
    .expect("timestamp column in the native unit should be creatable");
    db.close().await;
    quirks.cleanup_table(table).await;
}

// =============================================================================
// Test runner macro
// =============================================================================

/// Run all quirks contract tests against a configured implementation.
#[macro_export]
macro_rules! run_quirks_contract_tests {
    ($quirks:expr) => {
        use $crate::quirks_contract::*;

        test_type_mapping_is_total($quirks);
        println!("  test_type_mapping_is_total: PASSED");

        test_nested_types_are_unsupported($quirks);
        println!("  test_nested_types_are_unsupported: PASSED");

        test_case_folding_is_idempotent($quirks);
        println!("  test_case_folding_is_idempotent: PASSED");

        test_fixed_answers_are_stable($quirks);
        println!("  test_fixed_answers_are_stable: PASSED");

        test_created_table_reports_folded_names($quirks).await;
        println!("  test_created_table_reports_folded_names: PASSED");

        test_cleanup_drops_table($quirks).await;
        println!("  test_cleanup_drops_table: PASSED");

        test_cleanup_missing_table_is_not_an_error($quirks).await;
        println!("  test_cleanup_missing_table_is_not_an_error: PASSED");

        test_cleanup_is_repeatable($quirks).await;
        println!("  test_cleanup_is_repeatable: PASSED");

        test_every_scalar_type_is_creatable($quirks).await;
        println!("  test_every_scalar_type_is_creatable: PASSED");

        test_timestamp_column_uses_default_unit($quirks).await;
        println!("  test_timestamp_column_uses_default_unit: PASSED");
    };
}
