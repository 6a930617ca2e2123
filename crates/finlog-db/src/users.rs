//! Admin accounts

use async_trait::async_trait;
use finlog_auth::CredentialStore;
use finlog_core::models::AdminUser;
use finlog_core::{Error, Result};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::connection::Database;
use crate::error::{database_error, format_timestamp, now, parse_timestamp};

fn user_from_row(row: &SqliteRow) -> Result<AdminUser> {
	let created_at: String = row.try_get("created_at").map_err(database_error)?;
	Ok(AdminUser {
		id: row.try_get("id").map_err(database_error)?,
		username: row.try_get("username").map_err(database_error)?,
		password_hash: row.try_get("password_hash").map_err(database_error)?,
		display_name: row.try_get("display_name").map_err(database_error)?,
		created_at: parse_timestamp("created_at", &created_at)?,
	})
}

/// `admin_users` table access
#[derive(Debug, Clone)]
pub struct AdminUserRepository {
	db: Database,
}

impl AdminUserRepository {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	pub async fn count(&self) -> Result<i64> {
		let pool = self.db.pool().await?;
		sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM admin_users")
			.fetch_one(pool)
			.await
			.map_err(database_error)
	}

	pub async fn get(&self, id: i64) -> Result<AdminUser> {
		let pool = self.db.pool().await?;
		let row = sqlx::query("SELECT * FROM admin_users WHERE id = ?")
			.bind(id)
			.fetch_optional(pool)
			.await
			.map_err(database_error)?;
		match row {
			Some(row) => user_from_row(&row),
			None => Err(Error::NotFound("User not found".to_string())),
		}
	}

	pub async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
		let pool = self.db.pool().await?;
		let row = sqlx::query("SELECT * FROM admin_users WHERE username = ?")
			.bind(username)
			.fetch_optional(pool)
			.await
			.map_err(database_error)?;
		row.as_ref().map(user_from_row).transpose()
	}

	/// Insert an account; `password_hash` must already be hashed
	pub async fn create(
		&self,
		username: &str,
		password_hash: &str,
		display_name: &str,
	) -> Result<AdminUser> {
		let pool = self.db.pool().await?;
		let result = sqlx::query(
			"INSERT INTO admin_users (username, password_hash, display_name, created_at) VALUES (?, ?, ?, ?)",
		)
		.bind(username)
		.bind(password_hash)
		.bind(display_name)
		.bind(format_timestamp(now()))
		.execute(pool)
		.await
		.map_err(database_error)?;
		self.get(result.last_insert_rowid()).await
	}

	/// Provision the default admin when no account exists.
	///
	/// `hash` is only called when a row may be inserted. Returns whether a
	/// row was inserted; a concurrent run inserting the same username is
	/// ignored.
	pub async fn ensure_default_admin<F>(
		&self,
		username: &str,
		display_name: &str,
		hash: F,
	) -> Result<bool>
	where
		F: FnOnce() -> Result<String>,
	{
		if self.count().await? > 0 {
			return Ok(false);
		}
		let password_hash = hash()?;
		let pool = self.db.pool().await?;
		let result = sqlx::query(
			"INSERT OR IGNORE INTO admin_users (username, password_hash, display_name, created_at) VALUES (?, ?, ?, ?)",
		)
		.bind(username)
		.bind(password_hash)
		.bind(display_name)
		.bind(format_timestamp(now()))
		.execute(pool)
		.await
		.map_err(database_error)?;

		let inserted = result.rows_affected() > 0;
		if inserted {
			tracing::warn!(username, "default admin account created; change its password");
		}
		Ok(inserted)
	}
}

#[async_trait]
impl CredentialStore for AdminUserRepository {
	async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
		AdminUserRepository::find_by_username(self, username).await
	}
}
