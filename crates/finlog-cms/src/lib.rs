//! # finlog-cms
//!
//! The application layer of finlog: post lifecycle actions, slug derivation,
//! topic to post generation, cache invalidation and every HTTP view.
//!
//! ```text
//! finlog-cms
//! ├── slug         - slugify + collision suffixes
//! ├── lifecycle    - publish / unpublish
//! ├── generate     - topic → post skeleton
//! ├── revalidate   - best-effort cache invalidation
//! ├── serializers  - typed request/response bodies
//! ├── state        - AppState shared by views
//! ├── views        - handlers per API area
//! └── urls         - route table and middleware stack
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use finlog_cms::{AppState, build_app};
//! use finlog_conf::Settings;
//! use finlog_db::Database;
//! use finlog_http::{HttpServer, shutdown_signal};
//!
//! # async fn run() -> finlog_core::Result<()> {
//! let settings = Settings::default();
//! let db = Database::connect(&settings.database_url).await?;
//! let state = AppState::new(settings, db)?;
//! state.bootstrap().await?;
//!
//! let app = build_app(&state)?;
//! HttpServer::new(app)
//!     .listen_with_shutdown("127.0.0.1:3000".parse().unwrap(), shutdown_signal())
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod generate;
pub mod lifecycle;
pub mod revalidate;
pub mod serializers;
pub mod slug;
pub mod state;
pub mod urls;
pub mod views;

pub use generate::{GenerateMode, Generated, PostGenerator, render_template};
pub use lifecycle::{PostLifecycle, PublishAction};
pub use revalidate::{CacheInvalidator, HOME_PATH, HttpInvalidator, NoopInvalidator, notify};
pub use slug::{MAX_SLUG_ATTEMPTS, MAX_SLUG_CHARS, slugify, unique_slug};
pub use state::AppState;
pub use urls::{build_app, router};
