//! Cookie parsing and `Set-Cookie` rendering

use std::collections::HashMap;

/// Parse a `Cookie` header into name/value pairs.
///
/// # Examples
///
/// ```
/// use finlog_http::parse_cookies;
///
/// let cookies = parse_cookies("a=1; b=two=2");
/// assert_eq!(cookies["a"], "1");
/// assert_eq!(cookies["b"], "two=2");
/// ```
pub fn parse_cookies(header: &str) -> HashMap<String, String> {
	header
		.split(';')
		.filter_map(|pair| {
			let (name, value) = pair.trim().split_once('=')?;
			let name = name.trim();
			if name.is_empty() {
				return None;
			}
			Some((name.to_string(), value.trim().trim_matches('"').to_string()))
		})
		.collect()
}

/// `SameSite` attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSite {
	Strict,
	Lax,
	None,
}

impl SameSite {
	fn as_str(&self) -> &'static str {
		match self {
			SameSite::Strict => "Strict",
			SameSite::Lax => "Lax",
			SameSite::None => "None",
		}
	}
}

/// A cookie to be sent in a `Set-Cookie` header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cookie {
	pub name: String,
	pub value: String,
	pub path: Option<String>,
	pub max_age: Option<i64>,
	/// Pre-formatted HTTP date
	pub expires: Option<String>,
	pub http_only: bool,
	pub secure: bool,
	pub same_site: Option<SameSite>,
}

impl Cookie {
	/// A cookie with no attributes
	pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			value: value.into(),
			path: None,
			max_age: None,
			expires: None,
			http_only: false,
			secure: false,
			same_site: None,
		}
	}

	pub fn path(mut self, path: impl Into<String>) -> Self {
		self.path = Some(path.into());
		self
	}

	pub fn max_age(mut self, seconds: i64) -> Self {
		self.max_age = Some(seconds);
		self
	}

	pub fn expires(mut self, http_date: impl Into<String>) -> Self {
		self.expires = Some(http_date.into());
		self
	}

	pub fn http_only(mut self, http_only: bool) -> Self {
		self.http_only = http_only;
		self
	}

	pub fn secure(mut self, secure: bool) -> Self {
		self.secure = secure;
		self
	}

	pub fn same_site(mut self, same_site: SameSite) -> Self {
		self.same_site = Some(same_site);
		self
	}

	/// Render as a `Set-Cookie` header value
	///
	/// # Examples
	///
	/// ```
	/// use finlog_http::{Cookie, SameSite};
	///
	/// let cookie = Cookie::new("sid", "abc")
	///     .path("/")
	///     .http_only(true)
	///     .same_site(SameSite::Lax);
	/// assert_eq!(cookie.to_header_value(), "sid=abc; Path=/; HttpOnly; SameSite=Lax");
	/// ```
	pub fn to_header_value(&self) -> String {
		let mut out = format!("{}={}", self.name, self.value);
		if let Some(path) = &self.path {
			out.push_str(&format!("; Path={path}"));
		}
		if let Some(max_age) = self.max_age {
			out.push_str(&format!("; Max-Age={max_age}"));
		}
		if let Some(expires) = &self.expires {
			out.push_str(&format!("; Expires={expires}"));
		}
		if self.http_only {
			out.push_str("; HttpOnly");
		}
		if self.secure {
			out.push_str("; Secure");
		}
		if let Some(same_site) = self.same_site {
			out.push_str(&format!("; SameSite={}", same_site.as_str()));
		}
		out
	}
}
