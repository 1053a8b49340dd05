pub mod builders;
pub mod fixtures;
pub mod shared;

use anyhow::Context as _;
use futures::FutureExt as _;
use lightbnb_store::config::DatabaseConfig;
use lightbnb_store::db::PostgresGateway;
use sqlx::Connection as _;
use url::Url;
use uuid::Uuid;

pub use builders::*;
pub use fixtures::*;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// A per-test database schema with the LightBnB tables and a gateway bound to it.
pub struct TestDb {
    pub gateway: PostgresGateway,
    schema: String,
    admin_database_url: String,
}

impl TestDb {
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        let admin_database_url = database_url.to_string();

        let schema = format!("test_{}", Uuid::new_v4().simple());
        let mut admin_conn = sqlx::PgConnection::connect(&admin_database_url)
            .await
            .context("connect admin db for schema create")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{}""#, schema))
            .execute(&mut admin_conn)
            .await
            .context("create test schema")?;

        // Small per-test pools; tests run in parallel, each with its own schema.
        let config = DatabaseConfig {
            url: with_search_path(&admin_database_url, &schema)?,
            pool_min_size: 0,
            pool_max_size: 2,
            pool_timeout_seconds: 30,
            statement_timeout_seconds: 30,
            ..DatabaseConfig::default()
        };
        let gateway = PostgresGateway::connect(&config)
            .await
            .context("connect test pool")?;

        sqlx::raw_sql(SCHEMA_SQL)
            .execute(gateway.pool())
            .await
            .context("create LightBnB tables")?;

        Ok(Self {
            gateway,
            schema,
            admin_database_url,
        })
    }

    pub async fn cleanup(self) -> anyhow::Result<()> {
        self.gateway.close().await;

        let mut admin_conn = sqlx::PgConnection::connect(&self.admin_database_url)
            .await
            .context("connect admin db for schema drop")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, self.schema))
            .execute(&mut admin_conn)
            .await
            .context("drop test schema")?;

        Ok(())
    }
}

/// Run `f` against a fresh schema, dropping it afterwards even if `f` panics.
pub async fn with_test_db<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> FnOnce(
        &'a TestDb,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = anyhow::Result<()>> + 'a>,
    >,
{
    let shared = shared::shared().await?;
    let db = TestDb::new(&shared.database_url)
        .await
        .context("set up test schema (is the test database reachable?)")?;

    let result = std::panic::AssertUnwindSafe(f(&db)).catch_unwind().await;
    let cleanup_result = db.cleanup().await;

    if let Err(e) = cleanup_result {
        eprintln!("test schema cleanup failed: {e:?}");
    }

    match result {
        Ok(r) => r,
        Err(panic) => std::panic::resume_unwind(panic),
    }
}

fn with_search_path(database_url: &str, schema: &str) -> anyhow::Result<String> {
    let mut url = Url::parse(database_url).context("parse database URL")?;
    url.query_pairs_mut()
        .append_pair("options", &format!("-c search_path={}", schema));
    Ok(url.to_string())
}
