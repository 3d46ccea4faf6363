//! PostgreSQL quirks contract tests using testcontainers.
//!
//! Run with: cargo test --test quirks_postgres --features postgres -- --nocapture
//!
//! These tests spin up PostgreSQL in a container using testcontainers-rs and
//! point the quirks at it through the same keys CI uses.

mod quirks_contract;

use std::time::Duration;

use serial_test::serial;
use testcontainers::{
    core::{IntoContainerPort, WaitFor},
    runners::AsyncRunner,
    GenericImage, ImageExt,
};
use validation_quirks::backends::postgres::{
    PostgresQuirks, POSTGRESQL_PASSWORD_ENV_VAR, POSTGRESQL_URL_ENV_VAR, POSTGRESQL_USER_ENV_VAR,
};
use validation_quirks::database::DatabasePool;
use validation_quirks::harness::TestError;
use validation_quirks::utils::init_tracing;
use validation_quirks::{run_backend, ArrowType, EnvSource, Field, SqlValidationQuirks, TimeUnit};

const PG_ROLE: &str = "quirks";
const PG_DATABASE: &str = "postgres";
const PG_READY: &str = "database system is ready to accept connections";

/// A throwaway PostgreSQL 16 plus quirks pointed at its mapped port.
async fn start_postgres() -> (testcontainers::ContainerAsync<GenericImage>, PostgresQuirks) {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(5432.tcp())
        .with_wait_for(WaitFor::message_on_stdout(PG_READY))
        .with_env_var("POSTGRES_USER", PG_ROLE)
        .with_env_var("POSTGRES_PASSWORD", PG_ROLE)
        .with_env_var("POSTGRES_DB", PG_DATABASE)
        .with_startup_timeout(Duration::from_secs(60))
        .start()
        .await
        .expect("postgres container should start");

    // The ready line is also printed by the init-time server.
    tokio::time::sleep(Duration::from_secs(1)).await;

    let endpoint = format!(
        "{}:{}/{}",
        container.get_host().await.expect("container host"),
        container.get_host_port_ipv4(5432).await.expect("mapped port"),
        PG_DATABASE
    );
    println!("PostgreSQL quirks target: {}", endpoint);

    let source: EnvSource = [
        (POSTGRESQL_URL_ENV_VAR, endpoint),
        (POSTGRESQL_USER_ENV_VAR, PG_ROLE.to_string()),
        (POSTGRESQL_PASSWORD_ENV_VAR, PG_ROLE.to_string()),
    ]
    .into_iter()
    .map(|(key, value)| (key.to_string(), value))
    .collect();

    let quirks = PostgresQuirks::from_source(&source).expect("container config should load");
    (container, quirks)
}

#[tokio::test]
async fn test_postgres_quirks_contract() {
    init_tracing();
    println!("=== PostgreSQL Quirks Contract Tests ===");
    println!("Starting PostgreSQL container...");

    let (_container, quirks) = start_postgres().await;

    println!("Running contract tests...");
    run_quirks_contract_tests!(&quirks);

    println!("=== All PostgreSQL Quirks Contract tests PASSED ===");
    // Container is dropped here, stopping PostgreSQL
}

#[tokio::test]
async fn test_postgres_lower_cases_unquoted_identifiers() {
    let (_container, quirks) = start_postgres().await;

    let db = quirks.init_database().await.unwrap();
    db.create_table(
        "Users",
        &[
            Field::new("ID", ArrowType::Int64, false),
            Field::new("Name", ArrowType::Utf8, true),
            Field::new(
                "CreatedAt",
                ArrowType::Timestamp(TimeUnit::Microsecond, None),
                true,
            ),
        ],
    )
    .await
    .unwrap();

    assert!(db.list_tables().await.unwrap().contains(&"users".to_string()));
    assert!(db.list_columns("Users").await.unwrap().is_empty());

    let columns = db.list_columns("users").await.unwrap();
    let names: Vec<_> = columns.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "createdat"]);
    assert_eq!(columns[1].sql_type, "text");
    assert_eq!(
        columns[2].arrow_type,
        Some(ArrowType::Timestamp(quirks.default_timestamp_unit(), None))
    );
    db.close().await;

    assert!(quirks.cleanup_table("Users").await.is_dropped());
}

#[tokio::test]
async fn test_postgres_default_catalog_matches_current_database() {
    let (_container, quirks) = start_postgres().await;

    let db = quirks.init_database().await.unwrap();
    let DatabasePool::Postgres(pool) = db.pool() else {
        panic!("expected a PostgreSQL pool");
    };
    let current: String = sqlx::query_scalar("SELECT current_database()::text")
        .fetch_one(pool)
        .await
        .unwrap();
    db.close().await;

    assert_eq!(current, quirks.default_catalog());
    assert_eq!(quirks.catalog_from_config(), Some(current));
}

#[tokio::test]
#[serial]
async fn test_postgres_skipped_when_url_is_empty() {
    std::env::set_var(POSTGRESQL_URL_ENV_VAR, "");
    let quirks = PostgresQuirks::from_env().unwrap();
    std::env::remove_var(POSTGRESQL_URL_ENV_VAR);

    let outcome = run_backend(&quirks, &["never_created"], |_db| async {
        Ok::<(), TestError>(())
    })
    .await;
    assert!(outcome.is_skipped(), "got {}", outcome);
}

#[tokio::test]
#[serial]
async fn test_postgres_connection_string_from_env() {
    std::env::set_var(POSTGRESQL_URL_ENV_VAR, "localhost:5432/db");
    std::env::set_var(POSTGRESQL_USER_ENV_VAR, "admin");
    std::env::set_var(POSTGRESQL_PASSWORD_ENV_VAR, "secret");
    let quirks = PostgresQuirks::from_env().unwrap();
    std::env::remove_var(POSTGRESQL_URL_ENV_VAR);
    std::env::remove_var(POSTGRESQL_USER_ENV_VAR);
    std::env::remove_var(POSTGRESQL_PASSWORD_ENV_VAR);

    assert_eq!(
        quirks.connection_string().unwrap(),
        "jdbc:postgresql://localhost:5432/db?user=admin&password=secret"
    );
}
