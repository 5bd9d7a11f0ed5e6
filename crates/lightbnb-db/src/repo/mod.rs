//! Repository operations, one module per table.
//!
//! Every function takes the connection as its first argument and performs a
//! single round trip. "Nothing matched" comes back as `Ok(None)` or an empty
//! `Vec`; an `Err` always means the statement failed.

pub mod properties;
pub mod reservations;
pub mod users;


use crate::error::{StoreError, StoreResult};

/// Row limit applied when the caller does not give one.
pub const DEFAULT_LIMIT: i64 = 10;

pub(crate) fn resolve_limit(limit: Option<i64>) -> StoreResult<i64> {
    match limit {
        None => Ok(DEFAULT_LIMIT),
        Some(n) if n < 0 => Err(StoreError::validation(format!(
            "limit must be >= 0, got {n}"
        ))),
        Some(n) => Ok(n),
    }
}
