//! Dynamic SQL builder.
//!
//! - [`query()`] is for statements that are fixed up front with `$1, $2...`
//!   already written in.
//! - [`sql()`] is for statements composed piece by piece: fragments and bound
//!   values are stored separately and placeholders are numbered when the SQL is
//!   rendered, so numbering always follows bind order.
//!
//! ```ignore
//! use lightbnb_db::sql;
//!
//! let mut q = sql("SELECT id, title FROM properties");
//! let mut filters = q.where_clause();
//! if let Some(city) = city {
//!     filters.and_bind("city ILIKE ", format!("%{city}%"));
//! }
//! q.push(" ORDER BY cost_per_night").limit(10);
//! ```

#[macro_use]
mod exec_macros;

mod builder;
mod query;
mod where_clause;


pub use builder::Sql;
pub use query::Query;
pub use where_clause::WhereClause;

/// Build a SQL query from a pre-numbered SQL string (`$1, $2, ...`).
pub fn query(initial_sql: impl Into<String>) -> Query {
    Query::new(initial_sql)
}

/// Start building a SQL statement.
pub fn sql(initial_sql: impl Into<String>) -> Sql {
    Sql::new(initial_sql)
}

/// Count `$n` placeholders in rendered SQL, skipping quoted literals.
pub fn count_placeholders(sql: &str) -> usize {
    let bytes = sql.as_bytes();
    let mut count = 0;
    let mut in_literal = false;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\'' => in_literal = !in_literal,
            b'$' if !in_literal && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) => {
                count += 1;
                i += 1;
                while bytes.get(i).is_some_and(u8::is_ascii_digit) {
                    i += 1;
                }
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    count
}
