//! # finlog
//!
//! Backend of a personal finance blog. Articles come from two places: MDX
//! files under a content directory and posts stored in SQLite. Readers see
//! one merged catalog where a file always wins over a database post with
//! the same slug. A single admin manages database posts and a topic backlog
//! through a JSON API guarded by a stateless signed session cookie, and an
//! external generator can submit posts for review.
//!
//! ## Crates
//!
//! - [`core`] - errors and domain records
//! - [`conf`] - layered settings
//! - [`http`] - request/response, middleware, router and server
//! - [`auth`] - session tokens, password hashing, admin guard
//! - [`db`] - SQLite repositories and schema bootstrap
//! - [`content`] - frontmatter, file source and the content resolver
//! - [`cms`] - lifecycle, generation and the HTTP views
//!
//! ## Quick Example
//!
//! ```rust,no_run
//! use finlog::prelude::*;
//!
//! # async fn run() -> finlog::core::Result<()> {
//! let settings = SettingsBuilder::new().env_prefix(ENV_PREFIX).build()?;
//! let db = Database::connect(&settings.database_url).await?;
//! let state = AppState::new(settings, db)?;
//! state.bootstrap().await?;
//!
//! let posts = state.resolver.list_all().await?;
//! println!("{} public posts", posts.len());
//! # Ok(())
//! # }
//! ```

pub use finlog_auth as auth;
pub use finlog_cms as cms;
pub use finlog_conf as conf;
pub use finlog_content as content;
pub use finlog_core as core;
pub use finlog_db as db;
pub use finlog_http as http;

/// Commonly used items
pub mod prelude {
	pub use finlog_cms::{AppState, GenerateMode, PublishAction, build_app, slugify};
	pub use finlog_conf::{ENV_PREFIX, Settings, SettingsBuilder};
	pub use finlog_content::{ContentPost, ContentResolver, PostSource};
	pub use finlog_core::models::{Post, PostStatus, Topic, TopicStatus};
	pub use finlog_core::{Error, Result};
	pub use finlog_db::Database;
	pub use finlog_http::{Handler, HttpServer, Request, Response};
}
