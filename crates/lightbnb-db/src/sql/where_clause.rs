use super::builder::Sql;
use tokio_postgres::types::ToSql;

/// Accumulates row-level predicates onto an [`Sql`] builder.
///
/// Keeps its own count of applied predicates; that count alone decides
/// whether the next predicate opens the clause with `WHERE` or joins it
/// with `AND`.
pub struct WhereClause<'a> {
    sql: &'a mut Sql,
    applied: usize,
}

impl<'a> WhereClause<'a> {
    pub(super) fn new(sql: &'a mut Sql) -> Self {
        Self { sql, applied: 0 }
    }

    /// Append `<lhs><placeholder>` bound to `value`.
    ///
    /// `lhs` is trusted SQL such as `"properties.city ILIKE "`.
    pub fn and_bind<T>(&mut self, lhs: &str, value: T) -> &mut Self
    where
        T: ToSql + Sync + Send + 'static,
    {
        self.open_or_join();
        self.sql.push(lhs).push_bind(value);
        self
    }

    /// Append a predicate with no bound value.
    pub fn and_raw(&mut self, predicate: &str) -> &mut Self {
        self.open_or_join();
        self.sql.push(predicate);
        self
    }

    /// How many predicates have been applied so far.
    pub fn applied(&self) -> usize {
        self.applied
    }

    /// Whether no predicate has been applied.
    pub fn is_empty(&self) -> bool {
        self.applied == 0
    }

    fn open_or_join(&mut self) {
        self.sql
            .push(if self.applied == 0 { " WHERE " } else { " AND " });
        self.applied += 1;
    }
}
