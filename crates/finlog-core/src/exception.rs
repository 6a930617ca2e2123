//! Error taxonomy shared by every finlog crate.
//!
//! Each variant maps onto exactly one HTTP status. Client-facing variants
//! carry a message that is safe to return verbatim; server-side variants are
//! reported as a generic message and their detail only reaches the logs.

use thiserror::Error;

/// Message returned to clients for every 5xx error.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// finlog error type
#[derive(Error, Debug)]
pub enum Error {
	/// Missing or malformed input (400)
	#[error("Validation error: {0}")]
	Validation(String),

	/// Missing, invalid or expired credentials (401)
	#[error("Authentication failed: {0}")]
	Authentication(String),

	/// Authenticated but not allowed, or feature switched off (403)
	#[error("Forbidden: {0}")]
	Forbidden(String),

	/// Unknown id or slug (404)
	#[error("Not found: {0}")]
	NotFound(String),

	/// Uniqueness could not be satisfied (409)
	#[error("Conflict: {0}")]
	Conflict(String),

	/// Request body over the server limit (413)
	#[error("Payload too large: {0}")]
	PayloadTooLarge(String),

	/// Database failure (500)
	#[error("Database error: {0}")]
	Database(String),

	/// Encoding or decoding failure on the server side (500)
	#[error("Serialization error: {0}")]
	Serialization(String),

	/// Filesystem failure (500)
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// Anything else (500)
	#[error("Internal error: {0}")]
	Internal(String),
}

impl Error {
	/// HTTP status code for this error.
	///
	/// # Examples
	///
	/// ```
	/// use finlog_core::Error;
	///
	/// assert_eq!(Error::Validation("x".into()).status_code(), 400);
	/// assert_eq!(Error::Conflict("x".into()).status_code(), 409);
	/// assert_eq!(Error::Database("x".into()).status_code(), 500);
	/// ```
	pub fn status_code(&self) -> u16 {
		match self {
			Error::Validation(_) => 400,
			Error::Authentication(_) => 401,
			Error::Forbidden(_) => 403,
			Error::NotFound(_) => 404,
			Error::Conflict(_) => 409,
			Error::PayloadTooLarge(_) => 413,
			Error::Database(_) | Error::Serialization(_) | Error::Io(_) | Error::Internal(_) => 500,
		}
	}

	/// Whether the error is the server's fault.
	pub fn is_server_error(&self) -> bool {
		self.status_code() >= 500
	}

	/// Message that may be shown to the caller.
	///
	/// Server errors collapse to [`INTERNAL_ERROR_MESSAGE`].
	pub fn public_message(&self) -> String {
		match self {
			Error::Validation(msg)
			| Error::Authentication(msg)
			| Error::Forbidden(msg)
			| Error::NotFound(msg)
			| Error::Conflict(msg)
			| Error::PayloadTooLarge(msg) => msg.clone(),
			_ => INTERNAL_ERROR_MESSAGE.to_string(),
		}
	}
}

impl From<serde_json::Error> for Error {
	fn from(err: serde_json::Error) -> Self {
		Error::Serialization(err.to_string())
	}
}

/// Result type for finlog operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case(Error::Validation("bad".into()), 400)]
	#[case(Error::Authentication("no".into()), 401)]
	#[case(Error::Forbidden("off".into()), 403)]
	#[case(Error::NotFound("gone".into()), 404)]
	#[case(Error::Conflict("taken".into()), 409)]
	#[case(Error::PayloadTooLarge("big".into()), 413)]
	#[case(Error::Database("locked".into()), 500)]
	#[case(Error::Internal("boom".into()), 500)]
	fn test_status_mapping(#[case] error: Error, #[case] status: u16) {
		assert_eq!(error.status_code(), status);
	}

	#[rstest]
	fn test_client_errors_keep_their_message() {
		let err = Error::NotFound("Post not found".into());
		assert_eq!(err.public_message(), "Post not found");
		assert!(!err.is_server_error());
	}

	#[rstest]
	fn test_server_errors_hide_detail() {
		let err = Error::Database("no such table: posts".into());
		assert_eq!(err.public_message(), INTERNAL_ERROR_MESSAGE);
		assert!(err.is_server_error());
	}

	#[rstest]
	fn test_json_error_is_serialization() {
		let err: Error = serde_json::from_str::<serde_json::Value>("{")
			.unwrap_err()
			.into();
		assert!(matches!(err, Error::Serialization(_)));
	}
}
