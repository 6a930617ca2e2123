//! Buffered HTTP request

use bytes::Bytes;
use finlog_core::{Error, Result};
use hyper::header::{AUTHORIZATION, COOKIE, HeaderName, HeaderValue};
use hyper::{HeaderMap, Method, Uri, Version};
use percent_encoding::percent_decode_str;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::cookie::parse_cookies;
use crate::extensions::Extensions;

/// HTTP Request representation
#[derive(Debug)]
pub struct Request {
	pub method: Method,
	pub uri: Uri,
	pub version: Version,
	pub headers: HeaderMap,
	pub body: Bytes,
	/// Filled in by the router from `{name}` segments
	pub path_params: HashMap<String, String>,
	/// Raw (still percent-encoded) query pairs
	pub query_params: HashMap<String, String>,
	pub extensions: Extensions,
	pub remote_addr: Option<SocketAddr>,
}

impl Request {
	/// Create a request from its parts
	pub fn new(method: Method, uri: Uri, version: Version, headers: HeaderMap, body: Bytes) -> Self {
		let query_params = Self::parse_query_params(&uri);
		Self {
			method,
			uri,
			version,
			headers,
			body,
			path_params: HashMap::new(),
			query_params,
			extensions: Extensions::new(),
			remote_addr: None,
		}
	}

	/// Start building a request
	///
	/// # Examples
	///
	/// ```
	/// use finlog_http::{Method, Request};
	///
	/// let request = Request::builder()
	///     .method(Method::GET)
	///     .uri("/api/posts?tag=%EB%8C%80%EC%B6%9C")
	///     .build()
	///     .unwrap();
	///
	/// assert_eq!(request.path(), "/api/posts");
	/// assert_eq!(request.query("tag").as_deref(), Some("대출"));
	/// ```
	pub fn builder() -> RequestBuilder {
		RequestBuilder::default()
	}

	fn parse_query_params(uri: &Uri) -> HashMap<String, String> {
		uri.query()
			.map(|q| {
				q.split('&')
					.filter(|pair| !pair.is_empty())
					.filter_map(|pair| {
						// Split on first '=' only to preserve '=' in values
						let mut parts = pair.splitn(2, '=');
						Some((
							parts.next()?.to_string(),
							parts.next().unwrap_or("").to_string(),
						))
					})
					.collect()
			})
			.unwrap_or_default()
	}

	fn decode_component(raw: &str) -> String {
		let spaced = raw.replace('+', " ");
		percent_decode_str(&spaced).decode_utf8_lossy().into_owned()
	}

	/// Get the request path
	pub fn path(&self) -> &str {
		self.uri.path()
	}

	/// A URL-decoded query parameter
	pub fn query(&self, key: &str) -> Option<String> {
		self.query_params
			.iter()
			.find(|(k, _)| Self::decode_component(k) == key)
			.map(|(_, v)| Self::decode_component(v))
	}

	/// A query parameter parsed into `T`; blank values count as absent.
	pub fn query_as<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
		match self.query(key) {
			Some(raw) if !raw.trim().is_empty() => raw
				.trim()
				.parse::<T>()
				.map(Some)
				.map_err(|_| Error::Validation(format!("Invalid query parameter: {key}"))),
			_ => Ok(None),
		}
	}

	/// Set a path parameter (used by the router)
	pub fn set_path_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
		self.path_params.insert(key.into(), value.into());
	}

	/// A path parameter captured by the router
	pub fn path_param(&self, key: &str) -> Result<&str> {
		self.path_params
			.get(key)
			.map(String::as_str)
			.ok_or_else(|| Error::Internal(format!("Route has no path parameter '{key}'")))
	}

	/// A path parameter parsed into `T`; unparsable values are a 400.
	pub fn path_param_as<T: FromStr>(&self, key: &str) -> Result<T> {
		self.path_param(key)?
			.parse::<T>()
			.map_err(|_| Error::Validation(format!("Invalid {key}")))
	}

	/// A header value as text
	pub fn header(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|v| v.to_str().ok())
	}

	/// A cookie value from the `Cookie` header(s)
	pub fn cookie(&self, name: &str) -> Option<String> {
		self.headers
			.get_all(COOKIE)
			.iter()
			.filter_map(|v| v.to_str().ok())
			.find_map(|header| parse_cookies(header).remove(name))
	}

	/// The token of an `Authorization: Bearer <token>` header
	pub fn bearer_token(&self) -> Option<&str> {
		self.headers
			.get(AUTHORIZATION)
			.and_then(|v| v.to_str().ok())
			.and_then(|v| v.strip_prefix("Bearer "))
	}

	/// Deserialize the body as JSON.
	///
	/// An empty or malformed body is a client error.
	pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
		if self.body.is_empty() {
			return Err(Error::Validation("Request body is required".to_string()));
		}
		serde_json::from_slice(&self.body)
			.map_err(|e| Error::Validation(format!("Invalid JSON body: {e}")))
	}
}

/// Builder for [`Request`], mostly used by tests
#[derive(Debug)]
pub struct RequestBuilder {
	method: Method,
	uri: String,
	headers: HeaderMap,
	body: Bytes,
}

impl Default for RequestBuilder {
	fn default() -> Self {
		Self {
			method: Method::GET,
			uri: "/".to_string(),
			headers: HeaderMap::new(),
			body: Bytes::new(),
		}
	}
}

impl RequestBuilder {
	pub fn method(mut self, method: Method) -> Self {
		self.method = method;
		self
	}

	pub fn uri(mut self, uri: impl Into<String>) -> Self {
		self.uri = uri.into();
		self
	}

	/// Append a header; invalid names or values are ignored
	pub fn header(mut self, name: &str, value: &str) -> Self {
		if let (Ok(name), Ok(value)) = (
			HeaderName::from_bytes(name.as_bytes()),
			HeaderValue::from_str(value),
		) {
			self.headers.append(name, value);
		}
		self
	}

	pub fn body(mut self, body: impl Into<Bytes>) -> Self {
		self.body = body.into();
		self
	}

	/// Serialize `value` as the JSON body
	pub fn json<T: Serialize>(mut self, value: &T) -> Self {
		self.body = serde_json::to_vec(value).map(Bytes::from).unwrap_or_default();
		self.header("content-type", "application/json")
	}

	pub fn build(self) -> Result<Request> {
		let uri: Uri = self
			.uri
			.parse()
			.map_err(|e| Error::Validation(format!("Invalid URI: {e}")))?;
		Ok(Request::new(
			self.method,
			uri,
			Version::HTTP_11,
			self.headers,
			self.body,
		))
	}
}
