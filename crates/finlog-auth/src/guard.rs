use async_trait::async_trait;
use finlog_core::{Error, Result};
use finlog_http::{Handler, Middleware, Request, Response};
use std::sync::Arc;

use crate::session::SESSION_COOKIE;
use crate::token::SessionSigner;

/// Requires a valid session cookie on every path under a prefix.
///
/// On success the verified [`SessionPayload`](crate::SessionPayload) is put in
/// the request extensions. Exempt paths pass through untouched.
pub struct AdminGuard {
	signer: Arc<SessionSigner>,
	prefix: String,
	exempt: Vec<String>,
}

impl AdminGuard {
	/// Guard `/api/admin/`, letting login and logout through
	pub fn new(signer: Arc<SessionSigner>) -> Self {
		Self {
			signer,
			prefix: "/api/admin/".to_string(),
			exempt: vec![
				"/api/admin/auth/login".to_string(),
				"/api/admin/auth/logout".to_string(),
			],
		}
	}

	pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
		self.prefix = prefix.into();
		self
	}

	pub fn exempt(mut self, path: impl Into<String>) -> Self {
		self.exempt.push(path.into());
		self
	}
}

#[async_trait]
impl Middleware for AdminGuard {
	async fn process(&self, request: Request, next: Arc<dyn Handler>) -> Result<Response> {
		let token = request
			.cookie(SESSION_COOKIE)
			.ok_or_else(|| Error::Authentication("Unauthorized".to_string()))?;
		let payload = self.signer.verify(&token)?;
		request.extensions.insert(payload);
		next.handle(request).await
	}

	fn should_continue(&self, request: &Request) -> bool {
		let path = request.path().trim_end_matches('/');
		path.starts_with(self.prefix.trim_end_matches('/'))
			&& !self.exempt.iter().any(|p| p.trim_end_matches('/') == path)
	}
}
