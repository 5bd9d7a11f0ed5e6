//! Row mapping traits

use crate::error::{StoreError, StoreResult};
use tokio_postgres::Row;

/// Trait for converting a database row into a Rust struct.
///
/// ```ignore
/// impl FromRow for User {
///     fn from_row(row: &Row) -> StoreResult<Self> {
///         Ok(Self {
///             id: row.try_get_column("id")?,
///             name: row.try_get_column("name")?,
///             // ...
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized {
    /// Convert a database row into Self
    fn from_row(row: &Row) -> StoreResult<Self>;
}

/// Extension trait for Row to provide typed access
pub trait RowExt {
    /// Try to get a column value, returning `StoreError::Decode` on failure
    fn try_get_column<T>(&self, column: &str) -> StoreResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>;
}

impl RowExt for Row {
    fn try_get_column<T>(&self, column: &str) -> StoreResult<T>
    where
        T: for<'a> tokio_postgres::types::FromSql<'a>,
    {
        self.try_get(column)
            .map_err(|e| StoreError::decode(column, e.to_string()))
    }
}
