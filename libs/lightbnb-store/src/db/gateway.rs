//! Store gateway: the seam between the repositories and the database
//!
//! Repositories build a [`Statement`] (SQL text with 1-based `$n` placeholders
//! plus positional [`BindValue`]s) and hand it to a [`StoreGateway`]. The gateway
//! returns one [`Record`] per row, keyed by column name.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::future::Future;
use tokio::time::Instant;

use crate::Result;

/// A row as returned by the gateway: column name to value.
pub type Record = Map<String, JsonValue>;

/// Bind values for positional placeholders.
#[derive(Debug, Clone, PartialEq)]
pub enum BindValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<String> for BindValue {
    fn from(value: String) -> Self {
        BindValue::Text(value)
    }
}

impl From<&str> for BindValue {
    fn from(value: &str) -> Self {
        BindValue::Text(value.to_string())
    }
}

impl From<i64> for BindValue {
    fn from(value: i64) -> Self {
        BindValue::Int(value)
    }
}

impl From<i32> for BindValue {
    fn from(value: i32) -> Self {
        BindValue::Int(i64::from(value))
    }
}

impl From<u32> for BindValue {
    fn from(value: u32) -> Self {
        BindValue::Int(i64::from(value))
    }
}

impl From<f64> for BindValue {
    fn from(value: f64) -> Self {
        BindValue::Float(value)
    }
}

impl From<crate::money::Cents> for BindValue {
    fn from(value: crate::money::Cents) -> Self {
        BindValue::Int(value.minor_units())
    }
}

/// SQL text plus its positional binds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Statement {
    pub sql: String,
    pub binds: Vec<BindValue>,
}

impl Statement {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            binds: Vec::new(),
        }
    }

    /// Builder-style bind, for fixed statements whose placeholders are written inline.
    pub fn bind(mut self, value: impl Into<BindValue>) -> Self {
        self.binds.push(value.into());
        self
    }

    /// Append a bind and return its 1-based placeholder index.
    pub fn push_bind(&mut self, value: impl Into<BindValue>) -> usize {
        self.binds.push(value.into());
        self.binds.len()
    }

    pub fn push_sql(&mut self, fragment: &str) {
        self.sql.push_str(fragment);
    }

    /// First line of the SQL, for log and error messages.
    pub fn summary(&self) -> &str {
        self.sql
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("")
    }
}

/// Executes statements against the store.
///
/// Implementations must be safe to share across concurrent callers; pooling is
/// their concern. A `deadline` bounds how long the caller is willing to wait.
#[async_trait]
pub trait StoreGateway: Send + Sync {
    async fn execute(&self, statement: &Statement, deadline: Option<Instant>)
        -> Result<Vec<Record>>;
}

#[async_trait]
impl<G: StoreGateway + ?Sized> StoreGateway for std::sync::Arc<G> {
    async fn execute(
        &self,
        statement: &Statement,
        deadline: Option<Instant>,
    ) -> Result<Vec<Record>> {
        (**self).execute(statement, deadline).await
    }
}

/// Run `fut`, failing with [`Error::Timeout`](crate::Error::Timeout) once `deadline` passes.
pub async fn with_deadline<T, F>(
    deadline: Option<Instant>,
    statement: &Statement,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    let Some(deadline) = deadline else {
        return fut.await;
    };

    match tokio::time::timeout_at(deadline, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(statement = statement.summary(), "Statement deadline elapsed");
            Err(crate::Error::Timeout {
                statement: statement.summary().to_string(),
            })
        }
    }
}

/// Decode every record into `T`.
pub(crate) fn decode_records<T: DeserializeOwned>(records: Vec<Record>) -> Result<Vec<T>> {
    records.into_iter().map(decode_record).collect()
}

pub(crate) fn decode_record<T: DeserializeOwned>(record: Record) -> Result<T> {
    Ok(serde_json::from_value(JsonValue::Object(record))?)
}

/// Decode the first record, if any.
pub(crate) fn decode_first<T: DeserializeOwned>(records: Vec<Record>) -> Result<Option<T>> {
    records.into_iter().next().map(decode_record).transpose()
}
