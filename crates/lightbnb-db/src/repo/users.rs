//! User lookups and registration.

use crate::client::GenericClient;
use crate::error::StoreResult;
use crate::model::{NewUser, User};
use crate::sql::query;

const USER_COLUMNS: &str = "id, name, email, password";

/// Find a user by exact email address.
pub async fn get_user_with_email(
    conn: &impl GenericClient,
    email: &str,
) -> StoreResult<Option<User>> {
    query(format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
        .tag("users.by_email")
        .bind(email.to_string())
        .fetch_opt_as(conn)
        .await
}

/// Find a user by id.
pub async fn get_user_with_id(conn: &impl GenericClient, id: i32) -> StoreResult<Option<User>> {
    query(format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
        .tag("users.by_id")
        .bind(id)
        .fetch_opt_as(conn)
        .await
}

/// Insert a user and return the stored row, generated id included.
///
/// A duplicate email surfaces as [`StoreError::UniqueViolation`](crate::StoreError::UniqueViolation).
pub async fn add_user(conn: &impl GenericClient, user: &NewUser) -> StoreResult<User> {
    query(format!(
        "INSERT INTO users (name, email, password) VALUES ($1, $2, $3) RETURNING {USER_COLUMNS}"
    ))
    .tag("users.insert")
    .bind(user.name.clone())
    .bind(user.email.clone())
    .bind(user.password.clone())
    .fetch_one_as(conn)
    .await
}
