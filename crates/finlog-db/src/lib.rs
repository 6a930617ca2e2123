//! # finlog-db
//!
//! SQLite persistence through `sqlx`. A [`Database`] wraps the pool and runs
//! the schema bootstrap lazily, once per process, before the first query;
//! every bootstrap statement is idempotent (`CREATE TABLE IF NOT EXISTS`,
//! `INSERT OR IGNORE`).
//!
//! Tags are stored as a JSON array string and parsed leniently. Dates are
//! `YYYY-MM-DD`, timestamps RFC 3339 UTC.

pub mod connection;
pub mod error;
pub mod posts;
pub mod schema;
pub mod settings;
pub mod topics;
pub mod users;

pub use connection::Database;
pub use error::database_error;
pub use posts::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PostFilter, PostPage, PostRepository};
pub use schema::{AUTO_POST_ENABLED, SITE_TITLE};
pub use settings::SettingsRepository;
pub use topics::TopicRepository;
pub use users::AdminUserRepository;
