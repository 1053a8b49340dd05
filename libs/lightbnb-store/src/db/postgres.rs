//! PostgreSQL implementation of the store gateway

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column, Executor, Row, TypeInfo};
use std::time::Duration;
use tokio::time::Instant;

use super::gateway::{with_deadline, BindValue, Record, Statement, StoreGateway};
use crate::config::DatabaseConfig;
use crate::Result;

/// Gateway over a shared `sqlx` connection pool. Cloning shares the pool.
#[derive(Debug, Clone)]
pub struct PostgresGateway {
    pool: PgPool,
}

impl PostgresGateway {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool using the database settings.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let pool = pool_options(config).connect(&config.url).await?;
        tracing::info!(
            max_connections = config.pool_max_size,
            "Connected to database"
        );
        Ok(Self { pool })
    }

    /// Like [`connect`](Self::connect), but no connection is opened until first use.
    pub fn connect_lazy(config: &DatabaseConfig) -> Result<Self> {
        let pool = pool_options(config).connect_lazy(&config.url)?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    let statement_timeout_seconds = config.statement_timeout_seconds;
    PgPoolOptions::new()
        .min_connections(config.pool_min_size)
        .max_connections(config.pool_max_size.max(1))
        .acquire_timeout(Duration::from_secs(config.pool_timeout_seconds))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                if statement_timeout_seconds > 0 {
                    conn.execute(
                        format!("SET statement_timeout = '{}s'", statement_timeout_seconds)
                            .as_str(),
                    )
                    .await?;
                }
                Ok(())
            })
        })
}

#[async_trait]
impl StoreGateway for PostgresGateway {
    async fn execute(
        &self,
        statement: &Statement,
        deadline: Option<Instant>,
    ) -> Result<Vec<Record>> {
        let mut query = sqlx::query(&statement.sql);
        for value in &statement.binds {
            query = match value {
                BindValue::Text(v) => query.bind(v.as_str()),
                BindValue::Int(v) => query.bind(*v),
                BindValue::Float(v) => query.bind(*v),
            };
        }

        let rows = with_deadline(deadline, statement, async {
            query.fetch_all(&self.pool).await.map_err(|e| {
                tracing::warn!(error = %e, statement = statement.summary(), "Statement failed");
                crate::Error::Database(e)
            })
        })
        .await?;

        tracing::trace!(
            statement = statement.summary(),
            binds = statement.binds.len(),
            rows = rows.len(),
            "Statement executed"
        );

        rows.iter().map(row_to_record).collect()
    }
}

fn row_to_record(row: &PgRow) -> Result<Record> {
    let mut record = Record::new();
    for column in row.columns() {
        let value = column_value(row, column.ordinal(), column.name(), column.type_info().name())?;
        record.insert(column.name().to_string(), value);
    }
    Ok(record)
}

/// Decode one column by its Postgres type name. NULL becomes JSON null; types
/// without a typed arm are read as text.
fn column_value(row: &PgRow, idx: usize, name: &str, type_name: &str) -> Result<JsonValue> {
    let value = match type_name {
        "INT2" => row.try_get::<Option<i16>, _>(idx)?.map(JsonValue::from),
        "INT4" => row.try_get::<Option<i32>, _>(idx)?.map(JsonValue::from),
        "INT8" => row.try_get::<Option<i64>, _>(idx)?.map(JsonValue::from),
        "FLOAT4" => row.try_get::<Option<f32>, _>(idx)?.map(JsonValue::from),
        "FLOAT8" => row.try_get::<Option<f64>, _>(idx)?.map(JsonValue::from),
        "NUMERIC" => match row.try_get::<Option<Decimal>, _>(idx)? {
            Some(d) => Some(d.to_f64().map(JsonValue::from).ok_or_else(|| {
                crate::Error::Decode(format!("column {name}: NUMERIC {d} does not fit f64"))
            })?),
            None => None,
        },
        "BOOL" => row.try_get::<Option<bool>, _>(idx)?.map(JsonValue::from),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(idx)?
            .map(|d| JsonValue::from(d.to_string())),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(idx)?
            .map(|d| JsonValue::from(d.to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(idx)?
            .map(|d| JsonValue::from(d.to_rfc3339())),
        "JSON" | "JSONB" => row.try_get::<Option<JsonValue>, _>(idx)?,
        _ => row
            .try_get_unchecked::<Option<String>, _>(idx)
            .map_err(|e| {
                crate::Error::Decode(format!("column {name} ({type_name}) as text: {e}"))
            })?
            .map(JsonValue::from),
    };
    Ok(value.unwrap_or(JsonValue::Null))
}
