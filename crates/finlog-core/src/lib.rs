//! # finlog-core
//!
//! Shared building blocks for the finlog workspace:
//!
//! - [`exception`] - the error taxonomy every layer converts into, with its HTTP mapping
//! - [`models`] - posts, topics, admin users and settings as stored records
//! - [`tags`] - the JSON-array tag column codec
//!
//! ```text
//! finlog-core
//! ├── exception - Error, Result, status mapping
//! ├── models    - Post, Topic, AdminUser, Setting and their status enums
//! └── tags      - defensive tag (de)serialisation
//! ```

pub mod exception;
pub mod models;
pub mod tags;

pub use exception::{Error, Result};

/// Convenient re-exports of commonly used items
pub mod prelude {
	pub use crate::exception::{Error, Result};
	pub use crate::models::{
		AdminUser, NewPost, NewTopic, Post, PostStatus, PostUpdate, Setting, Topic, TopicPriority,
		TopicStatus, TopicUpdate,
	};
}
