//! # lightbnb-db
//!
//! PostgreSQL data-access layer for LightBnB: users, properties and
//! reservations.
//!
//! - **Explicit connection handle**: build a [`Database`] at startup and pass a
//!   client to every operation; nothing is global.
//! - **Ordered parameters**: dynamic statements go through [`Sql`], which numbers
//!   `$n` placeholders from bind order.
//! - **Distinct outcomes**: "no row" is `Ok(None)` / an empty `Vec`, failures are
//!   a [`StoreError`].
//!
//! ```ignore
//! use lightbnb_db::{Database, DbConfig, PropertyFilter, properties, users};
//!
//! let db = Database::connect(&DbConfig::load("lightbnb.toml")?)?;
//! db.ping().await?;
//!
//! let client = db.client().await?;
//! let user = users::get_user_with_email(&client, "tristanjacobs@gmail.com").await?;
//!
//! let filter = PropertyFilter::new().city("Vancouver").minimum_rating(4.0);
//! let listings = properties::get_all_properties(&client, &filter, None).await?;
//!
//! db.close();
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod pool;
pub mod repo;
pub mod row;
pub mod sql;

#[cfg(test)]
pub(crate) mod test_support;

pub use client::GenericClient;
pub use config::DbConfig;
pub use error::{StoreError, StoreResult};
pub use model::{
    NewProperty, NewUser, Property, PropertyListing, Reservation, ReservationListing, User,
    to_minor_units,
};
pub use monitor::{QueryType, TracingClient};
pub use pool::{Database, create_pool};
pub use repo::properties::PropertyFilter;
pub use repo::{DEFAULT_LIMIT, properties, reservations, users};
pub use row::{FromRow, RowExt};
pub use sql::{Query, Sql, WhereClause, query, sql};
