//! In-memory `GenericClient` double for unit tests.

use crate::client::GenericClient;
use crate::error::{StoreError, StoreResult};
use std::sync::Mutex;
use tokio_postgres::Row;
use tokio_postgres::types::ToSql;

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Recorded {
    pub tag: Option<String>,
    pub sql: String,
    /// `Debug` rendering of each bound value, in bind order.
    pub params: Vec<String>,
}

/// Records every statement and answers with zero rows, or fails every call
/// when built with [`RecordingClient::failing`].
#[derive(Default)]
pub(crate) struct RecordingClient {
    calls: Mutex<Vec<Recorded>>,
    fail: bool,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<Recorded> {
        self.calls.lock().unwrap().clone()
    }

    pub fn only_call(&self) -> Recorded {
        let calls = self.calls();
        assert_eq!(calls.len(), 1, "expected exactly one statement, got {calls:?}");
        calls.into_iter().next().unwrap()
    }

    fn record(&self, tag: Option<&str>, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<()> {
        self.calls.lock().unwrap().push(Recorded {
            tag: tag.map(str::to_string),
            sql: sql.to_string(),
            params: params.iter().map(|p| format!("{p:?}")).collect(),
        });
        if self.fail {
            return Err(StoreError::Connection("connection refused".to_string()));
        }
        Ok(())
    }
}

impl GenericClient for RecordingClient {
    async fn query(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<Vec<Row>> {
        self.record(None, sql, params)?;
        Ok(Vec::new())
    }

    async fn query_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StoreResult<Vec<Row>> {
        self.record(Some(tag), sql, params)?;
        Ok(Vec::new())
    }

    async fn execute(&self, sql: &str, params: &[&(dyn ToSql + Sync)]) -> StoreResult<u64> {
        self.record(None, sql, params)?;
        Ok(0)
    }

    async fn execute_tagged(
        &self,
        tag: &str,
        sql: &str,
        params: &[&(dyn ToSql + Sync)],
    ) -> StoreResult<u64> {
        self.record(Some(tag), sql, params)?;
        Ok(0)
    }
}
