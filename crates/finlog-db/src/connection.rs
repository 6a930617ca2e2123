use finlog_core::{Error, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::OnceCell;

use crate::error::database_error;
use crate::schema;

/// Default number of pooled connections
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Shared SQLite pool with a lazily run, once-per-process schema bootstrap.
///
/// Clones share the pool and the bootstrap state.
#[derive(Debug, Clone)]
pub struct Database {
	pool: SqlitePool,
	ready: Arc<OnceCell<()>>,
}

impl Database {
	/// Open a pool for `url`, creating the file if needed.
	///
	/// No statement runs until the first call to [`Database::pool`].
	pub async fn connect(url: &str) -> Result<Self> {
		Self::connect_with(url, DEFAULT_MAX_CONNECTIONS).await
	}

	pub async fn connect_with(url: &str, max_connections: u32) -> Result<Self> {
		let options = SqliteConnectOptions::from_str(url)
			.map_err(|e| Error::Database(format!("invalid database url: {e}")))?
			.create_if_missing(true)
			.foreign_keys(true);
		let pool = SqlitePoolOptions::new()
			.max_connections(max_connections)
			.connect_with(options)
			.await
			.map_err(database_error)?;
		tracing::info!(max_connections, "database pool opened");
		Ok(Self::from_pool(pool))
	}

	/// Wrap an existing pool
	pub fn from_pool(pool: SqlitePool) -> Self {
		Self {
			pool,
			ready: Arc::new(OnceCell::new()),
		}
	}

	/// Run the schema bootstrap if it has not completed yet.
	///
	/// Concurrent callers wait for the single in-flight run; a failed run is
	/// retried by the next caller.
	pub async fn ensure_schema(&self) -> Result<()> {
		self.ready
			.get_or_try_init(|| schema::bootstrap(&self.pool))
			.await
			.map(|_| ())
	}

	/// The pool, with the schema guaranteed to exist
	pub async fn pool(&self) -> Result<&SqlitePool> {
		self.ensure_schema().await?;
		Ok(&self.pool)
	}

	pub async fn close(&self) {
		self.pool.close().await;
	}
}
