//! Username/password authentication against a credential store

use async_trait::async_trait;
use finlog_core::models::AdminUser;
use finlog_core::{Error, Result};
use std::sync::{Arc, OnceLock};

use crate::hasher::PasswordHasher;

/// The one message every credential failure produces
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

/// Password hashed once and checked against when the username is unknown
const DUMMY_PASSWORD: &str = "finlog-unknown-user";

/// Lookup of admin accounts by username
#[async_trait]
pub trait CredentialStore: Send + Sync {
	async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>>;
}

/// Checks credentials without revealing which part was wrong
#[derive(Clone)]
pub struct Authenticator {
	store: Arc<dyn CredentialStore>,
	hasher: Arc<dyn PasswordHasher>,
	dummy_hash: Arc<OnceLock<Option<String>>>,
}

impl Authenticator {
	pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
		Self {
			store,
			hasher,
			dummy_hash: Arc::new(OnceLock::new()),
		}
	}

	/// Return the matching user, or a 401 with [`INVALID_CREDENTIALS`].
	///
	/// Hash verification runs on the blocking pool. An unknown username is
	/// still checked against a dummy hash so both failures cost the same.
	pub async fn authenticate(&self, username: &str, password: &str) -> Result<AdminUser> {
		let Some(user) = self.store.find_by_username(username).await? else {
			let hasher = self.hasher.clone();
			let dummy_hash = self.dummy_hash.clone();
			let password = password.to_string();
			tokio::task::spawn_blocking(move || {
				let hash = dummy_hash.get_or_init(|| hasher.hash(DUMMY_PASSWORD).ok());
				if let Some(hash) = hash {
					let _ = hasher.verify(&password, hash);
				}
			})
			.await
			.map_err(|e| Error::Internal(format!("password verification task failed: {e}")))?;

			tracing::info!(username, "login failed: unknown user");
			return Err(Error::Authentication(INVALID_CREDENTIALS.to_string()));
		};

		let hasher = self.hasher.clone();
		let password = password.to_string();
		let hash = user.password_hash.clone();
		let verified = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
			.await
			.map_err(|e| Error::Internal(format!("password verification task failed: {e}")))?;

		match verified {
			Ok(true) => Ok(user),
			Ok(false) => {
				tracing::info!(username, "login failed: wrong password");
				Err(Error::Authentication(INVALID_CREDENTIALS.to_string()))
			}
			Err(err) => {
				tracing::error!(username, error = %err, "login failed: unreadable password hash");
				Err(Error::Authentication(INVALID_CREDENTIALS.to_string()))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::hasher::Argon2Hasher;
	use chrono::Utc;
	use rstest::*;
	use std::sync::atomic::{AtomicUsize, Ordering};

	/// Argon2 with a count of `verify` calls
	#[derive(Default)]
	struct CountingHasher {
		inner: Argon2Hasher,
		verifications: AtomicUsize,
	}

	impl PasswordHasher for CountingHasher {
		fn hash(&self, password: &str) -> std::result::Result<String, Error> {
			self.inner.hash(password)
		}

		fn verify(&self, password: &str, hash: &str) -> std::result::Result<bool, Error> {
			self.verifications.fetch_add(1, Ordering::SeqCst);
			self.inner.verify(password, hash)
		}
	}

	struct OneUser(AdminUser);

	#[async_trait]
	impl CredentialStore for OneUser {
		async fn find_by_username(&self, username: &str) -> Result<Option<AdminUser>> {
			Ok((self.0.username == username).then(|| self.0.clone()))
		}
	}

	#[fixture]
	fn authenticator() -> Authenticator {
		let hasher = Argon2Hasher::new();
		let user = AdminUser {
			id: 1,
			username: "admin".into(),
			password_hash: hasher.hash("admin1234").unwrap(),
			display_name: "관리자".into(),
			created_at: Utc::now(),
		};
		Authenticator::new(Arc::new(OneUser(user)), Arc::new(hasher))
	}

	#[rstest]
	#[tokio::test]
	async fn test_valid_credentials(authenticator: Authenticator) {
		let user = authenticator.authenticate("admin", "admin1234").await.unwrap();
		assert_eq!(user.display_name, "관리자");
	}

	#[rstest]
	#[case("admin", "wrong")]
	#[case("nobody", "admin1234")]
	#[tokio::test]
	async fn test_failures_are_indistinguishable(
		authenticator: Authenticator,
		#[case] username: &str,
		#[case] password: &str,
	) {
		let err = authenticator
			.authenticate(username, password)
			.await
			.unwrap_err();
		assert_eq!(err.status_code(), 401);
		assert_eq!(err.public_message(), INVALID_CREDENTIALS);
	}

	#[rstest]
	#[tokio::test]
	async fn test_unknown_user_still_verifies_a_hash() {
		let hasher = Arc::new(CountingHasher::default());
		let user = AdminUser {
			id: 1,
			username: "admin".into(),
			password_hash: hasher.hash("admin1234").unwrap(),
			display_name: "관리자".into(),
			created_at: Utc::now(),
		};
		let authenticator = Authenticator::new(Arc::new(OneUser(user)), hasher.clone());

		authenticator.authenticate("nobody", "x").await.unwrap_err();
		assert_eq!(hasher.verifications.load(Ordering::SeqCst), 1);
		authenticator.authenticate("admin", "x").await.unwrap_err();
		assert_eq!(hasher.verifications.load(Ordering::SeqCst), 2);
		authenticator.authenticate("ghost", "y").await.unwrap_err();
		assert_eq!(hasher.verifications.load(Ordering::SeqCst), 3);
	}
}
