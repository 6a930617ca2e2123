use bytes::Bytes;
use finlog_core::{Error, Result};
use hyper::header::{CONTENT_TYPE, HeaderName, HeaderValue, SET_COOKIE};
use hyper::{HeaderMap, StatusCode};
use serde::Serialize;

use crate::cookie::Cookie;

/// HTTP Response representation
#[derive(Debug)]
pub struct Response {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Bytes,
}

impl Response {
	/// Create a new Response with the given status code
	///
	/// # Examples
	///
	/// ```
	/// use finlog_http::{Response, StatusCode};
	///
	/// let response = Response::new(StatusCode::OK);
	/// assert_eq!(response.status, StatusCode::OK);
	/// assert!(response.body.is_empty());
	/// ```
	pub fn new(status: StatusCode) -> Self {
		Self {
			status,
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}

	pub fn ok() -> Self {
		Self::new(StatusCode::OK)
	}

	pub fn created() -> Self {
		Self::new(StatusCode::CREATED)
	}

	pub fn no_content() -> Self {
		Self::new(StatusCode::NO_CONTENT)
	}

	pub fn method_not_allowed() -> Self {
		Self::new(StatusCode::METHOD_NOT_ALLOWED)
	}

	/// Build the response for an error.
	///
	/// The body is `{"error": <public message>}`; server errors never expose
	/// their internal detail.
	///
	/// # Examples
	///
	/// ```
	/// use finlog_http::{Error, Response, StatusCode};
	///
	/// let response = Response::from_error(&Error::Database("disk I/O error".into()));
	/// assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
	/// assert_eq!(&response.body[..], br#"{"error":"Internal server error"}"#);
	/// ```
	pub fn from_error(error: &Error) -> Self {
		let status =
			StatusCode::from_u16(error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
		let body = serde_json::json!({ "error": error.public_message() });
		let mut response = Self::new(status);
		response.body = Bytes::from(body.to_string());
		response
			.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		response
	}

	/// Set a header, replacing previous values. Invalid names or values are dropped.
	pub fn with_header(mut self, name: &str, value: &str) -> Self {
		match (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			(Ok(name), Ok(value)) => {
				self.headers.insert(name, value);
			}
			_ => tracing::warn!(header = name, "dropping invalid response header"),
		}
		self
	}

	/// Append a `Set-Cookie` header
	pub fn with_cookie(mut self, cookie: &Cookie) -> Self {
		match HeaderValue::from_str(&cookie.to_header_value()) {
			Ok(value) => {
				self.headers.append(SET_COOKIE, value);
			}
			Err(_) => tracing::warn!(cookie = %cookie.name, "dropping invalid cookie"),
		}
		self
	}

	/// Set a raw body
	pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Serialize `data` as the JSON body
	///
	/// # Examples
	///
	/// ```
	/// use finlog_http::Response;
	///
	/// let response = Response::created().with_json(&serde_json::json!({"id": 1})).unwrap();
	/// assert_eq!(response.headers["content-type"], "application/json");
	/// ```
	pub fn with_json<T: Serialize>(mut self, data: &T) -> Result<Self> {
		let body = serde_json::to_vec(data)?;
		self.body = Bytes::from(body);
		self.headers
			.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
		Ok(self)
	}

	/// Parse the body as JSON
	pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
		Ok(serde_json::from_slice(&self.body)?)
	}
}
