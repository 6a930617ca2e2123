//! Key/value site settings

use finlog_core::Result;
use finlog_core::models::Setting;
use sqlx::Row;

use crate::connection::Database;
use crate::error::{database_error, format_timestamp, now, parse_timestamp};

const UPSERT: &str = "INSERT INTO settings (key, value, updated_at) VALUES (?, ?, ?)
	ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at";

/// `settings` table access
#[derive(Debug, Clone)]
pub struct SettingsRepository {
	db: Database,
}

impl SettingsRepository {
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// Every setting, by key
	pub async fn all(&self) -> Result<Vec<Setting>> {
		let pool = self.db.pool().await?;
		let rows = sqlx::query("SELECT key, value, updated_at FROM settings ORDER BY key")
			.fetch_all(pool)
			.await
			.map_err(database_error)?;
		rows.iter()
			.map(|row| -> Result<Setting> {
				let updated_at: String = row.try_get("updated_at").map_err(database_error)?;
				Ok(Setting {
					key: row.try_get("key").map_err(database_error)?,
					value: row.try_get("value").map_err(database_error)?,
					updated_at: parse_timestamp("updated_at", &updated_at)?,
				})
			})
			.collect()
	}

	pub async fn get(&self, key: &str) -> Result<Option<String>> {
		let pool = self.db.pool().await?;
		sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
			.bind(key)
			.fetch_optional(pool)
			.await
			.map_err(database_error)
	}

	/// Whether a boolean-ish setting is on; a missing key counts as `default`
	pub async fn is_enabled(&self, key: &str, default: bool) -> Result<bool> {
		Ok(match self.get(key).await? {
			Some(value) => !matches!(value.trim().to_ascii_lowercase().as_str(), "false" | "0" | "off" | "no"),
			None => default,
		})
	}

	pub async fn set(&self, key: &str, value: &str) -> Result<()> {
		let pool = self.db.pool().await?;
		sqlx::query(UPSERT)
			.bind(key)
			.bind(value)
			.bind(format_timestamp(now()))
			.execute(pool)
			.await
			.map_err(database_error)?;
		Ok(())
	}

	/// Upsert several settings in one transaction
	pub async fn set_many(&self, values: &[(String, String)]) -> Result<()> {
		let pool = self.db.pool().await?;
		let stamp = format_timestamp(now());
		let mut tx = pool.begin().await.map_err(database_error)?;
		for (key, value) in values {
			sqlx::query(UPSERT)
				.bind(key)
				.bind(value)
				.bind(&stamp)
				.execute(&mut *tx)
				.await
				.map_err(database_error)?;
		}
		tx.commit().await.map_err(database_error)?;
		tracing::info!(count = values.len(), "settings updated");
		Ok(())
	}
}
