//! Statement logging through `tracing`.
//!
//! [`TracingClient`] wraps any [`GenericClient`] and emits one event before each
//! statement and one after it, under the `lightbnb_db.sql` target:
//!
//! ```ignore
//! let client = TracingClient::new(db.client().await?)
//!     .slow_query_threshold(Duration::from_millis(250));
//! let listings = properties::get_all_properties(&client, &filter, None).await?;
//! ```

use crate::client::GenericClient;
use crate::error::StoreResult;
use std::future::Future;
use std::time::{Duration, Instant};
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

/// The kind of SQL statement being executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryType {
    Select,
    Insert,
    Update,
    Delete,
    Other,
}

impl QueryType {
    /// Detect the statement kind from its leading keyword.
    pub fn from_sql(sql: &str) -> Self {
        let trimmed = sql.trim_start_matches(|c: char| c.is_whitespace() || c == '(');
        let keyword = trimmed
            .split(|c: char| !c.is_ascii_alphabetic())
            .next()
            .unwrap_or("");

        if keyword.eq_ignore_ascii_case("SELECT") {
            QueryType::Select
        } else if keyword.eq_ignore_ascii_case("INSERT") {
            QueryType::Insert
        } else if keyword.eq_ignore_ascii_case("UPDATE") {
            QueryType::Update
        } else if keyword.eq_ignore_ascii_case("DELETE") {
            QueryType::Delete
        } else {
            QueryType::Other
        }
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 character.
pub(crate) fn truncate_sql_bytes(sql: &str, max: usize) -> &str {
    if sql.len() <= max {
        return sql;
    }
    let mut end = max;
    while !sql.is_char_boundary(end) {
        end -= 1;
    }
    &sql[..end]
}

/// A `GenericClient` that logs every statement it forwards.
pub struct TracingClient<C> {
    client: C,
    max_sql_length: Option<usize>,
    slow_query_threshold: Option<Duration>,
}

impl<C: GenericClient> TracingClient<C> {
    /// Wrap a client with default settings (SQL truncated at 200 bytes, no slow-query warning).
    pub fn new(client: C) -> Self {
        Self {
            client,
            max_sql_length: Some(200),
            slow_query_threshold: None,
        }
    }

    /// Set maximum SQL length to log.
    pub fn max_sql_length(mut self, len: usize) -> Self {
        self.max_sql_length = Some(len);
        self
    }

    /// Log full SQL text.
    pub fn no_truncate(mut self) -> Self {
        self.max_sql_length = None;
        self
    }

    /// Emit a `warn` event for statements slower than `threshold`.
    pub fn slow_query_threshold(mut self, threshold: Duration) -> Self {
        self.slow_query_threshold = Some(threshold);
        self
    }

    /// Get a reference to the inner client.
    pub fn inner(&self) -> &C {
        &self.client
    }

    /// Get the inner client, consuming this wrapper.
    pub fn into_inner(self) -> C {
        self.client
    }

    fn display_sql(&self, sql: &str) -> String {
        match self.max_sql_length {
            Some(max) if sql.len() > max => format!("{}...", truncate_sql_bytes(sql, max)),
            _ => sql.to_string(),
        }
    }

    async fn observe<T, F>(
        &self,
        tag: Option<&str>,
        sql: &str,
        param_count: usize,
        fut: F,
        row_count: fn(&T) -> u64,
    ) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let query_type = QueryType::from_sql(sql);
        let tag = tag.unwrap_or("-");
        let shown = self.display_sql(sql);
        tracing::debug!(
            target: "lightbnb_db.sql",
            query_type = ?query_type,
            tag,
            param_count,
            sql = %shown,
            "executing"
        );

        let start = Instant::now();
        let result = fut.await;
        let elapsed = start.elapsed();
        let elapsed_ms = elapsed.as_secs_f64() * 1000.0;

        match &result {
            Ok(value) => {
                let rows = row_count(value);
                tracing::debug!(
                    target: "lightbnb_db.sql",
                    query_type = ?query_type,
                    tag,
                    rows,
                    elapsed_ms,
                    "completed"
                );
                if self.slow_query_threshold.is_some_and(|t| elapsed > t) {
                    tracing::warn!(
                        target: "lightbnb_db.sql",
                        tag,
                        elapsed_ms,
                        sql = %shown,
                        "slow query"
                    );
                }
            }
            Err(error) => {
                tracing::warn!(
                    target: "lightbnb_db.sql",
                    query_type = ?query_type,
                    tag,
                    elapsed_ms,
                    sql = %shown,
                    %error,
                    "query failed"
                );
            }
        }
        result
    }
}

#[allow(clippy::ptr_arg)]
fn rows_len(rows: &Vec<Row>) -> u64 {
    rows.len() as u64
}

fn affected(n: &u64) -> u64 {
    *n
}

impl<C: GenericClient> GenericClient for TracingClient<C> {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<Vec<Row>> {
        self.observe(None, sql, params.len(), self.client.query(sql, params), rows_len)
            .await
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StoreResult<Vec<Row>> {
        let fut = self.client.query_tagged(tag, sql, params);
        self.observe(Some(tag), sql, params.len(), fut, rows_len)
            .await
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<u64> {
        self.observe(None, sql, params.len(), self.client.execute(sql, params), affected)
            .await
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StoreResult<u64> {
        let fut = self.client.execute_tagged(tag, sql, params);
        self.observe(Some(tag), sql, params.len(), fut, affected)
            .await
    }
}
