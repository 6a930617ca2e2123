//! Stateless session tokens
//!
//! A token is `base64url(json payload) + "." + hex(HMAC-SHA256(secret, base64 part))`.
//! Nothing is stored server side; every request re-verifies the signature
//! and the expiry.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Duration, Utc};
use finlog_core::Error;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error as ThisError;

type HmacSha256 = Hmac<Sha256>;

/// Lifetime of an issued session, in days
pub const SESSION_TTL_DAYS: i64 = 7;

/// Lifetime of an issued session
pub fn session_ttl() -> Duration {
	Duration::days(SESSION_TTL_DAYS)
}

/// What a session token vouches for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionPayload {
	pub user_id: i64,
	pub display_name: String,
	/// Expiry as milliseconds since the Unix epoch
	pub expires_at: i64,
}

impl SessionPayload {
	pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
		now.timestamp_millis() > self.expires_at
	}
}

/// Why a token was rejected
#[derive(Debug, ThisError, PartialEq, Eq)]
pub enum TokenError {
	#[error("token is malformed")]
	Malformed,
	#[error("token signature does not match")]
	BadSignature,
	#[error("token payload is invalid: {0}")]
	Payload(String),
	#[error("token has expired")]
	Expired,
	#[error("signing key rejected")]
	Key,
}

impl From<TokenError> for Error {
	fn from(err: TokenError) -> Self {
		tracing::debug!(error = %err, "session token rejected");
		Error::Authentication("Unauthorized".to_string())
	}
}

/// Issues and verifies session tokens with one secret
#[derive(Clone)]
pub struct SessionSigner {
	key: Vec<u8>,
}

impl std::fmt::Debug for SessionSigner {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SessionSigner").finish_non_exhaustive()
	}
}

impl SessionSigner {
	pub fn new(secret: impl AsRef<[u8]>) -> Self {
		Self {
			key: secret.as_ref().to_vec(),
		}
	}

	fn mac(&self, data: &[u8]) -> Result<String, TokenError> {
		let mut mac = HmacSha256::new_from_slice(&self.key).map_err(|_| TokenError::Key)?;
		mac.update(data);
		Ok(hex::encode(mac.finalize().into_bytes()))
	}

	/// Issue a token for a user, valid for [`SESSION_TTL_DAYS`] from now
	///
	/// # Examples
	///
	/// ```
	/// use finlog_auth::SessionSigner;
	///
	/// let signer = SessionSigner::new("a-secret-that-is-long-enough-for-hmac");
	/// let (token, payload) = signer.issue(1, "관리자").unwrap();
	/// assert_eq!(signer.verify(&token).unwrap(), payload);
	/// ```
	pub fn issue(
		&self,
		user_id: i64,
		display_name: &str,
	) -> Result<(String, SessionPayload), TokenError> {
		self.issue_at(user_id, display_name, Utc::now())
	}

	pub fn issue_at(
		&self,
		user_id: i64,
		display_name: &str,
		now: DateTime<Utc>,
	) -> Result<(String, SessionPayload), TokenError> {
		let payload = SessionPayload {
			user_id,
			display_name: display_name.to_string(),
			expires_at: (now + session_ttl()).timestamp_millis(),
		};
		let token = self.sign(&payload)?;
		Ok((token, payload))
	}

	/// Encode and sign a payload as-is
	pub fn sign(&self, payload: &SessionPayload) -> Result<String, TokenError> {
		let json = serde_json::to_vec(payload).map_err(|e| TokenError::Payload(e.to_string()))?;
		let encoded = URL_SAFE_NO_PAD.encode(json);
		let signature = self.mac(encoded.as_bytes())?;
		Ok(format!("{encoded}.{signature}"))
	}

	/// Verify a token against the current time
	pub fn verify(&self, token: &str) -> Result<SessionPayload, TokenError> {
		self.verify_at(token, Utc::now())
	}

	pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<SessionPayload, TokenError> {
		let (encoded, signature) = token.split_once('.').ok_or(TokenError::Malformed)?;
		if encoded.is_empty() || signature.is_empty() {
			return Err(TokenError::Malformed);
		}

		let expected = self.mac(encoded.as_bytes())?;
		if !bool::from(expected.as_bytes().ct_eq(signature.as_bytes())) {
			return Err(TokenError::BadSignature);
		}

		let json = URL_SAFE_NO_PAD
			.decode(encoded)
			.map_err(|e| TokenError::Payload(e.to_string()))?;
		let payload: SessionPayload =
			serde_json::from_slice(&json).map_err(|e| TokenError::Payload(e.to_string()))?;

		if payload.is_expired_at(now) {
			return Err(TokenError::Expired);
		}
		Ok(payload)
	}
}
