use finlog_core::Error;

/// Password hasher trait
///
/// # Examples
///
/// ```
/// use finlog_auth::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("admin1234").unwrap();
///
/// assert!(hasher.verify("admin1234", &hash).unwrap());
/// assert!(!hasher.verify("admin12345", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hash a plaintext password into a self-describing string
	fn hash(&self, password: &str) -> Result<String, Error>;

	/// `Ok(false)` on mismatch; `Err` only when `hash` cannot be parsed
	fn verify(&self, password: &str, hash: &str) -> Result<bool, Error>;
}

/// Argon2id password hasher with a random 16-byte salt per hash
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String, Error> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHasher as _, SaltString},
		};
		use rand::RngCore;

		let mut salt_bytes = [0u8; 16];
		rand::thread_rng().fill_bytes(&mut salt_bytes);
		let salt =
			SaltString::encode_b64(&salt_bytes).map_err(|e| Error::Internal(e.to_string()))?;

		Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map(|hash| hash.to_string())
			.map_err(|e| Error::Internal(e.to_string()))
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool, Error> {
		use argon2::{
			Argon2,
			password_hash::{PasswordHash, PasswordVerifier},
		};

		let parsed_hash = PasswordHash::new(hash)
			.map_err(|e| Error::Internal(format!("stored password hash is invalid: {e}")))?;

		Ok(Argon2::default()
			.verify_password(password.as_bytes(), &parsed_hash)
			.is_ok())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_hashes_are_salted() {
		let hasher = Argon2Hasher::new();
		let first = hasher.hash("same").unwrap();
		let second = hasher.hash("same").unwrap();

		assert_ne!(first, second);
		assert!(first.starts_with("$argon2id$"));
		assert!(hasher.verify("same", &second).unwrap());
	}

	#[rstest]
	fn test_garbage_hash_is_an_error() {
		let hasher = Argon2Hasher::new();
		assert!(hasher.verify("x", "plaintext-password").is_err());
	}
}
