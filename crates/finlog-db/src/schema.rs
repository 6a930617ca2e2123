//! Table definitions and seed rows.
//!
//! Every statement is safe to run repeatedly, so concurrent first requests
//! in separate processes cannot trip over each other.

use finlog_core::Result;
use sqlx::SqlitePool;

use crate::error::{database_error, format_timestamp, now};

/// Seeded `site_title` value
pub const DEFAULT_SITE_TITLE: &str = "재테크 노트";

/// Setting key that gates auto-ingestion
pub const AUTO_POST_ENABLED: &str = "auto_post_enabled";

/// Setting key for the site title
pub const SITE_TITLE: &str = "site_title";

const CREATE_STATEMENTS: [&str; 6] = [
	"CREATE TABLE IF NOT EXISTS admin_users (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		username TEXT NOT NULL UNIQUE,
		password_hash TEXT NOT NULL,
		display_name TEXT NOT NULL,
		created_at TEXT NOT NULL
	)",
	"CREATE TABLE IF NOT EXISTS posts (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		title TEXT NOT NULL,
		slug TEXT NOT NULL UNIQUE,
		description TEXT NOT NULL DEFAULT '',
		content TEXT NOT NULL,
		date TEXT NOT NULL,
		base_date TEXT,
		tags TEXT NOT NULL DEFAULT '[]',
		series TEXT,
		views INTEGER NOT NULL DEFAULT 0,
		status TEXT NOT NULL DEFAULT 'draft',
		auto_generated INTEGER NOT NULL DEFAULT 0,
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL,
		published_at TEXT
	)",
	"CREATE INDEX IF NOT EXISTS idx_posts_status_date ON posts (status, date)",
	"CREATE TABLE IF NOT EXISTS settings (
		key TEXT PRIMARY KEY,
		value TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)",
	"CREATE TABLE IF NOT EXISTS post_topics (
		id INTEGER PRIMARY KEY AUTOINCREMENT,
		title TEXT NOT NULL,
		description TEXT NOT NULL DEFAULT '',
		tags TEXT NOT NULL DEFAULT '[]',
		series TEXT,
		priority TEXT NOT NULL DEFAULT 'normal',
		status TEXT NOT NULL DEFAULT 'backlog',
		notes TEXT NOT NULL DEFAULT '',
		created_at TEXT NOT NULL,
		updated_at TEXT NOT NULL
	)",
	"CREATE INDEX IF NOT EXISTS idx_post_topics_status ON post_topics (status)",
];

/// Create missing tables and seed default settings
pub async fn bootstrap(pool: &SqlitePool) -> Result<()> {
	for statement in CREATE_STATEMENTS {
		sqlx::query(statement)
			.execute(pool)
			.await
			.map_err(database_error)?;
	}

	let stamp = format_timestamp(now());
	for (key, value) in [(SITE_TITLE, DEFAULT_SITE_TITLE), (AUTO_POST_ENABLED, "true")] {
		sqlx::query("INSERT OR IGNORE INTO settings (key, value, updated_at) VALUES (?, ?, ?)")
			.bind(key)
			.bind(value)
			.bind(&stamp)
			.execute(pool)
			.await
			.map_err(database_error)?;
	}

	tracing::debug!("database schema ready");
	Ok(())
}
