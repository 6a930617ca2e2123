//! Path-pattern routing
//!
//! Patterns use `{name}` placeholders for single path segments:
//! `/api/admin/posts/{id}/publish`. A trailing slash on the request path
//! is tolerated.

use async_trait::async_trait;
use finlog_core::{Error, Result};
use hyper::Method;
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::sync::Arc;

use crate::handler::Handler;
use crate::request::Request;
use crate::response::Response;

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 512;

/// A compiled route pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
	pattern: String,
	regex: regex::Regex,
	param_names: Vec<String>,
}

impl PathPattern {
	/// Compile a pattern.
	///
	/// # Examples
	///
	/// ```
	/// use finlog_http::PathPattern;
	///
	/// let pattern = PathPattern::new("/api/posts/{slug}").unwrap();
	/// let params = pattern.matches("/api/posts/%EA%B8%88%EB%A6%AC").unwrap();
	/// assert_eq!(params["slug"], "금리");
	/// assert!(pattern.matches("/api/posts/a/b").is_none());
	/// ```
	pub fn new(pattern: &str) -> std::result::Result<Self, String> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(format!(
				"Pattern length {} exceeds maximum allowed length of {} bytes",
				pattern.len(),
				MAX_PATTERN_LENGTH
			));
		}
		if !pattern.starts_with('/') {
			return Err(format!("Pattern must start with '/': {pattern}"));
		}

		let (regex_str, param_names) = Self::compile_pattern(pattern)?;
		let regex = regex::Regex::new(&regex_str)
			.map_err(|e| format!("Failed to compile pattern regex: {e}"))?;

		Ok(Self {
			pattern: pattern.to_string(),
			regex,
			param_names,
		})
	}

	fn compile_pattern(pattern: &str) -> std::result::Result<(String, Vec<String>), String> {
		let mut regex_str = String::from("^");
		let mut param_names = Vec::new();
		let mut literal = String::new();
		let mut chars = pattern.trim_end_matches('/').chars();

		while let Some(c) = chars.next() {
			if c != '{' {
				literal.push(c);
				continue;
			}
			regex_str.push_str(&regex::escape(&literal));
			literal.clear();

			let mut name = String::new();
			loop {
				match chars.next() {
					Some('}') => break,
					Some(ch) if ch.is_ascii_alphanumeric() || ch == '_' => name.push(ch),
					Some(ch) => return Err(format!("Invalid character '{ch}' in parameter name")),
					None => return Err(format!("Unclosed parameter in pattern: {pattern}")),
				}
			}
			if name.is_empty() {
				return Err(format!("Empty parameter name in pattern: {pattern}"));
			}
			if param_names.contains(&name) {
				return Err(format!("Duplicate parameter '{name}' in pattern"));
			}
			regex_str.push_str("([^/]+)");
			param_names.push(name);
		}
		regex_str.push_str(&regex::escape(&literal));
		regex_str.push_str("/?$");

		Ok((regex_str, param_names))
	}

	/// The pattern as written
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Match a path, returning the decoded parameters
	pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
		let captures = self.regex.captures(path)?;
		let params = self
			.param_names
			.iter()
			.enumerate()
			.filter_map(|(i, name)| {
				let raw = captures.get(i + 1)?.as_str();
				let value = percent_decode_str(raw).decode_utf8_lossy().into_owned();
				Some((name.clone(), value))
			})
			.collect();
		Some(params)
	}
}

struct Route {
	method: Method,
	pattern: PathPattern,
	handler: Arc<dyn Handler>,
}

/// Dispatches requests to handlers by method and path.
///
/// Routes are tried in registration order. A path that matches some route
/// but not its method yields `405 Method Not Allowed` with an `Allow` header.
#[derive(Default)]
pub struct Router {
	routes: Vec<Route>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a handler
	pub fn route(mut self, method: Method, path: &str, handler: Arc<dyn Handler>) -> Result<Self> {
		let pattern = PathPattern::new(path).map_err(Error::Internal)?;
		self.routes.push(Route {
			method,
			pattern,
			handler,
		});
		Ok(self)
	}

	pub fn get(self, path: &str, handler: Arc<dyn Handler>) -> Result<Self> {
		self.route(Method::GET, path, handler)
	}

	pub fn post(self, path: &str, handler: Arc<dyn Handler>) -> Result<Self> {
		self.route(Method::POST, path, handler)
	}

	pub fn put(self, path: &str, handler: Arc<dyn Handler>) -> Result<Self> {
		self.route(Method::PUT, path, handler)
	}

	pub fn delete(self, path: &str, handler: Arc<dyn Handler>) -> Result<Self> {
		self.route(Method::DELETE, path, handler)
	}

	pub fn len(&self) -> usize {
		self.routes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.routes.is_empty()
	}
}

#[async_trait]
impl Handler for Router {
	async fn handle(&self, mut request: Request) -> Result<Response> {
		let mut allowed: Vec<&str> = Vec::new();

		for route in &self.routes {
			let Some(params) = route.pattern.matches(request.path()) else {
				continue;
			};
			if route.method != request.method {
				if !allowed.contains(&route.method.as_str()) {
					allowed.push(route.method.as_str());
				}
				continue;
			}
			for (key, value) in params {
				request.set_path_param(key, value);
			}
			return route.handler.handle(request).await;
		}

		if allowed.is_empty() {
			return Err(Error::NotFound("Not found".to_string()));
		}
		Response::method_not_allowed()
			.with_header("allow", &allowed.join(", "))
			.with_json(&serde_json::json!({ "error": "Method not allowed" }))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/api/posts", "/api/posts", true)]
	#[case("/api/posts", "/api/posts/", true)]
	#[case("/api/posts", "/api/posts/x", false)]
	#[case("/api/admin/posts/{id}/publish", "/api/admin/posts/7/publish", true)]
	#[case("/api/admin/posts/{id}/publish", "/api/admin/posts//publish", false)]
	#[case("/healthz", "/healthzz", false)]
	fn test_pattern_matching(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
		let pattern = PathPattern::new(pattern).unwrap();
		assert_eq!(pattern.matches(path).is_some(), expected);
	}

	#[rstest]
	fn test_literal_segments_are_escaped() {
		let pattern = PathPattern::new("/files/a.b").unwrap();
		assert!(pattern.matches("/files/a.b").is_some());
		assert!(pattern.matches("/files/aXb").is_none());
	}

	#[rstest]
	#[case("no-slash")]
	#[case("/posts/{slug")]
	#[case("/posts/{}")]
	#[case("/posts/{a}/{a}")]
	#[case("/posts/{sl-ug}")]
	fn test_invalid_patterns(#[case] pattern: &str) {
		assert!(PathPattern::new(pattern).is_err());
	}
}
