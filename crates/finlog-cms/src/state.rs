//! Shared application state handed to every view

use finlog_auth::{Argon2Hasher, Authenticator, PasswordHasher, SessionSigner};
use finlog_conf::Settings;
use finlog_content::{ContentResolver, MdxSource};
use finlog_core::Result;
use finlog_db::{AdminUserRepository, Database, PostRepository, SettingsRepository, TopicRepository};
use std::sync::Arc;

use crate::generate::PostGenerator;
use crate::lifecycle::PostLifecycle;
use crate::revalidate::{CacheInvalidator, HttpInvalidator, NoopInvalidator};

/// Everything a request handler needs, cheap to clone
#[derive(Clone)]
pub struct AppState {
	pub settings: Arc<Settings>,
	pub db: Database,
	pub posts: PostRepository,
	pub topics: TopicRepository,
	pub users: AdminUserRepository,
	pub site_settings: SettingsRepository,
	pub resolver: ContentResolver,
	pub signer: Arc<SessionSigner>,
	pub authenticator: Authenticator,
	pub hasher: Arc<dyn PasswordHasher>,
	pub invalidator: Arc<dyn CacheInvalidator>,
	pub lifecycle: PostLifecycle,
	pub generator: PostGenerator,
}

impl AppState {
	/// Wire the state from settings; the invalidator follows `revalidate_url`.
	pub fn new(settings: Settings, db: Database) -> Result<Self> {
		let invalidator: Arc<dyn CacheInvalidator> = match settings.revalidate_url.as_deref() {
			Some(url) if !url.trim().is_empty() => Arc::new(HttpInvalidator::new(
				url.trim(),
				settings.revalidate_secret.clone(),
			)?),
			_ => Arc::new(NoopInvalidator),
		};
		Ok(Self::with_invalidator(settings, db, invalidator))
	}

	pub fn with_invalidator(
		settings: Settings,
		db: Database,
		invalidator: Arc<dyn CacheInvalidator>,
	) -> Self {
		let posts = PostRepository::new(db.clone());
		let topics = TopicRepository::new(db.clone());
		let users = AdminUserRepository::new(db.clone());
		let site_settings = SettingsRepository::new(db.clone());
		let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());

		let resolver = ContentResolver::new(
			MdxSource::new(settings.content_dir.clone()),
			Arc::new(posts.clone()),
		);
		let signer = Arc::new(SessionSigner::new(settings.session_secret_bytes()));
		let authenticator = Authenticator::new(Arc::new(users.clone()), hasher.clone());
		let lifecycle = PostLifecycle::new(posts.clone(), invalidator.clone());
		let generator = PostGenerator::new(posts.clone(), topics.clone(), invalidator.clone());

		Self {
			settings: Arc::new(settings),
			db,
			posts,
			topics,
			users,
			site_settings,
			resolver,
			signer,
			authenticator,
			hasher,
			invalidator,
			lifecycle,
			generator,
		}
	}

	/// Create the schema and provision the default admin if none exists.
	pub async fn bootstrap(&self) -> Result<()> {
		self.db.ensure_schema().await?;
		let hasher = self.hasher.clone();
		let password = self.settings.admin_password.clone();
		self.users
			.ensure_default_admin(
				&self.settings.admin_username,
				&self.settings.admin_display_name,
				move || hasher.hash(&password),
			)
			.await?;
		Ok(())
	}

	/// Whether session cookies carry the `Secure` flag
	pub fn secure_cookies(&self) -> bool {
		self.settings.production
	}
}
