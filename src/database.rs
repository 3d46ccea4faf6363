//! Database handle returned by `init_database`.
//!
//! The handle owns a small sqlx pool plus the quirks needed to generate DDL
//! and read back catalog metadata. The suite owns the handle for the length
//! of a test and releases it with [`Database::close`] or by dropping it.

use sea_query::{Expr, Iden, Order, Query};
use sqlx::Row;
use tracing::debug;

use crate::config::ConnectionParams;
use crate::convert::SqlToArrowConverter;
use crate::error::{QuirksError, Result};
use crate::sql_quirks::SqlQuirks;
use crate::types::{ArrowType, Field};

#[cfg(not(any(feature = "postgres", feature = "sqlite")))]
compile_error!("enable at least one backend feature: postgres, sqlite");

/// `information_schema` identifiers (PostgreSQL).
#[cfg(feature = "postgres")]
#[derive(Iden)]
enum InformationSchema {
    #[iden = "information_schema"]
    Schema,
    Tables,
    Columns,
    TableSchema,
    TableName,
    ColumnName,
    DataType,
    OrdinalPosition,
}

/// `sqlite_master` identifiers.
#[cfg(feature = "sqlite")]
#[derive(Iden)]
enum SqliteMaster {
    Table,
    Name,
    Type,
}

/// Backend connection pool.
#[derive(Debug, Clone)]
pub enum DatabasePool {
    #[cfg(feature = "postgres")]
    Postgres(sqlx::PgPool),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlx::SqlitePool),
}

/// Column as reported by the backend catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Type name exactly as the catalog reports it.
    pub sql_type: String,
    /// `None` when the reported type has no Arrow counterpart.
    pub arrow_type: Option<ArrowType>,
}

/// Opaque handle to an open backend database.
#[derive(Debug, Clone)]
pub struct Database {
    backend: &'static str,
    params: ConnectionParams,
    sql_quirks: SqlQuirks,
    converter: SqlToArrowConverter,
    pool: DatabasePool,
}

impl Database {
    pub fn new(
        backend: &'static str,
        params: ConnectionParams,
        sql_quirks: SqlQuirks,
        converter: SqlToArrowConverter,
        pool: DatabasePool,
    ) -> Self {
        Self {
            backend,
            params,
            sql_quirks,
            converter,
            pool,
        }
    }

    pub fn backend(&self) -> &'static str {
        self.backend
    }

    pub fn params(&self) -> &ConnectionParams {
        &self.params
    }

    pub fn sql_quirks(&self) -> &SqlQuirks {
        &self.sql_quirks
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Execute a single statement, returning the number of rows affected.
    pub async fn execute(&self, sql: &str) -> Result<u64> {
        debug!(backend = self.backend, sql, "Executing statement");
        let rows = match &self.pool {
            #[cfg(feature = "postgres")]
            DatabasePool::Postgres(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
            #[cfg(feature = "sqlite")]
            DatabasePool::Sqlite(pool) => sqlx::query(sql).execute(pool).await?.rows_affected(),
        };
        Ok(rows)
    }

    /// Create a table with unquoted identifiers, so the backend applies its
    /// own case folding.
    pub async fn create_table(&self, name: &str, fields: &[Field]) -> Result<()> {
        let ddl = create_table_statement(&self.sql_quirks, name, fields)?;
        self.execute(&ddl).await?;
        Ok(())
    }

    /// Drop a table. Unlike cleanup, failures are returned.
    pub async fn drop_table(&self, name: &str) -> Result<()> {
        let ddl = drop_table_statement(name)?;
        self.execute(&ddl).await?;
        Ok(())
    }

    /// Names of the tables visible in the default schema, sorted.
    pub async fn list_tables(&self) -> Result<Vec<String>> {
        let names = match &self.pool {
            #[cfg(feature = "postgres")]
            DatabasePool::Postgres(pool) => {
                let query = Query::select()
                    .expr(
                        Expr::col(InformationSchema::TableName)
                            .cast_as(sea_query::Alias::new("text")),
                    )
                    .from((InformationSchema::Schema, InformationSchema::Tables))
                    .and_where(
                        Expr::col(InformationSchema::TableSchema)
                            .eq(Expr::cust("current_schema()")),
                    )
                    .order_by(InformationSchema::TableName, Order::Asc)
                    .to_string(sea_query::PostgresQueryBuilder);

                sqlx::query(&query)
                    .fetch_all(pool)
                    .await?
                    .iter()
                    .map(|row| row.try_get::<String, _>(0))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
            #[cfg(feature = "sqlite")]
            DatabasePool::Sqlite(pool) => {
                let query = Query::select()
                    .column(SqliteMaster::Name)
                    .from(SqliteMaster::Table)
                    .and_where(Expr::col(SqliteMaster::Type).eq("table"))
                    .and_where(Expr::col(SqliteMaster::Name).not_like("sqlite_%"))
                    .order_by(SqliteMaster::Name, Order::Asc)
                    .to_string(sea_query::SqliteQueryBuilder);

                sqlx::query(&query)
                    .fetch_all(pool)
                    .await?
                    .iter()
                    .map(|row| row.try_get::<String, _>(0))
                    .collect::<std::result::Result<Vec<_>, _>>()?
            }
        };
        Ok(names)
    }

    /// Columns of `table` in declaration order. Empty if the table does not
    /// exist.
    ///
    /// `table` is matched exactly, so pass the case-folded name.
    pub async fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        let raw: Vec<(String, String)> = match &self.pool {
            #[cfg(feature = "postgres")]
            DatabasePool::Postgres(pool) => {
                let query = Query::select()
                    .expr(
                        Expr::col(InformationSchema::ColumnName)
                            .cast_as(sea_query::Alias::new("text")),
                    )
                    .expr(
                        Expr::col(InformationSchema::DataType)
                            .cast_as(sea_query::Alias::new("text")),
                    )
                    .from((InformationSchema::Schema, InformationSchema::Columns))
                    .and_where(
                        Expr::col(InformationSchema::TableSchema)
                            .eq(Expr::cust("current_schema()")),
                    )
                    .and_where(Expr::col(InformationSchema::TableName).eq(table))
                    .order_by(InformationSchema::OrdinalPosition, Order::Asc)
                    .to_string(sea_query::PostgresQueryBuilder);

                sqlx::query(&query)
                    .fetch_all(pool)
                    .await?
                    .iter()
                    .map(|row| Ok((row.try_get(0)?, row.try_get(1)?)))
                    .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?
            }
            #[cfg(feature = "sqlite")]
            DatabasePool::Sqlite(pool) => {
                // pragma_table_info is a table-valued function, out of reach
                // of the query builder.
                sqlx::query("SELECT name, type FROM pragma_table_info(?1) ORDER BY cid")
                    .bind(table)
                    .fetch_all(pool)
                    .await?
                    .iter()
                    .map(|row| Ok((row.try_get(0)?, row.try_get(1)?)))
                    .collect::<std::result::Result<Vec<_>, sqlx::Error>>()?
            }
        };

        Ok(raw
            .into_iter()
            .map(|(name, sql_type)| Column {
                arrow_type: self.converter.convert(&sql_type),
                name,
                sql_type,
            })
            .collect())
    }

    /// Close every connection of the handle, including clones.
    pub async fn close(&self) {
        debug!(backend = self.backend, "Closing database");
        match &self.pool {
            #[cfg(feature = "postgres")]
            DatabasePool::Postgres(pool) => pool.close().await,
            #[cfg(feature = "sqlite")]
            DatabasePool::Sqlite(pool) => pool.close().await,
        }
    }
}

fn check_identifier(name: &str) -> Result<&str> {
    if name.trim().is_empty() {
        return Err(QuirksError::InvalidIdentifier(name.to_string()));
    }
    Ok(name)
}

/// `CREATE TABLE` with unquoted identifiers and quirks-mapped column types.
pub fn create_table_statement(
    sql_quirks: &SqlQuirks,
    name: &str,
    fields: &[Field],
) -> Result<String> {
    let name = check_identifier(name)?;
    let columns = fields
        .iter()
        .map(|field| {
            let column = check_identifier(&field.name)?;
            let sql_type = sql_quirks.arrow_to_sql_type_name(&field.data_type)?;
            let not_null = if field.nullable { "" } else { " NOT NULL" };
            Ok(format!("{} {}{}", column, sql_type, not_null))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(format!("CREATE TABLE {} ({})", name, columns.join(", ")))
}

/// `DROP TABLE` with an unquoted identifier.
pub fn drop_table_statement(name: &str) -> Result<String> {
    Ok(format!("DROP TABLE {}", check_identifier(name)?))
}
