//! Session cookie and current-user helpers

use finlog_core::{Error, Result};
use finlog_http::{Cookie, Request, SameSite};

use crate::token::{SESSION_TTL_DAYS, SessionPayload};

/// Name of the admin session cookie
pub const SESSION_COOKIE: &str = "admin_session";

/// Cookie carrying a freshly issued token
pub fn session_cookie(token: &str, secure: bool) -> Cookie {
	Cookie::new(SESSION_COOKIE, token)
		.path("/")
		.max_age(SESSION_TTL_DAYS * 24 * 60 * 60)
		.http_only(true)
		.secure(secure)
		.same_site(SameSite::Lax)
}

/// Already-expired cookie that overwrites the session on logout
pub fn clear_session_cookie(secure: bool) -> Cookie {
	Cookie::new(SESSION_COOKIE, "")
		.path("/")
		.max_age(0)
		.expires("Thu, 01 Jan 1970 00:00:00 GMT")
		.http_only(true)
		.secure(secure)
		.same_site(SameSite::Lax)
}

/// The session verified by [`AdminGuard`](crate::AdminGuard) for this request
pub fn current_session(request: &Request) -> Result<SessionPayload> {
	request
		.extensions
		.get::<SessionPayload>()
		.ok_or_else(|| Error::Authentication("Unauthorized".to_string()))
}
