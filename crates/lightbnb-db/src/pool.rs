//! Connection pool lifecycle.

use crate::client::GenericClient;
use crate::config::DbConfig;
use crate::error::{StoreError, StoreResult};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use tokio_postgres::NoTls;

/// The shared, long-lived database handle.
///
/// Build one at startup with [`Database::connect`], hand it (or clients checked
/// out of it) to whatever serves requests, and call [`Database::close`] on
/// shutdown. Cloning is cheap and shares the same pool.
///
/// ```ignore
/// let db = Database::connect(&DbConfig::default())?;
/// db.ping().await?;
/// let client = db.client().await?;
/// let user = lightbnb_db::users::get_user_with_email(&client, "a@b.c").await?;
/// db.close();
/// ```
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Create the pool. No connection is opened until the first checkout.
    pub fn connect(config: &DbConfig) -> StoreResult<Self> {
        let pool = create_pool(config)?;
        tracing::info!(
            target: "lightbnb_db",
            host = %config.host,
            port = config.port,
            dbname = %config.dbname,
            max_pool_size = config.max_pool_size,
            "database pool created"
        );
        Ok(Self { pool })
    }

    /// Wrap a pool built elsewhere.
    pub fn from_pool(pool: Pool) -> Self {
        Self { pool }
    }

    /// Check out a pooled client.
    pub async fn client(&self) -> StoreResult<deadpool_postgres::Client> {
        Ok(self.pool.get().await?)
    }

    /// Round-trip a trivial statement to prove the database is reachable.
    pub async fn ping(&self) -> StoreResult<()> {
        let client = self.client().await?;
        client.query_one_tagged("db.ping", "SELECT 1", &[]).await?;
        Ok(())
    }

    /// Access the underlying pool.
    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    /// Close the pool. Checked-out clients are dropped when returned.
    pub fn close(&self) {
        self.pool.close();
        tracing::info!(target: "lightbnb_db", "database pool closed");
    }

    /// Whether [`Database::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.pool.is_closed()
    }
}

/// Build a `deadpool-postgres` pool from connection parameters.
pub fn create_pool(config: &DbConfig) -> StoreResult<Pool> {
    let manager_config = ManagerConfig {
        recycling_method: RecyclingMethod::Fast,
    };
    let mgr = Manager::from_config(config.pg_config(), NoTls, manager_config);
    Pool::builder(mgr)
        .max_size(config.max_pool_size)
        .build()
        .map_err(|e| StoreError::Pool(e.to_string()))
}
