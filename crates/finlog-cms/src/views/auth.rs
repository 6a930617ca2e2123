//! Admin login, logout and current user

use finlog_auth::{clear_session_cookie, current_session, session_cookie};
use finlog_core::{Error, Result};
use finlog_http::{Request, Response};
use serde_json::json;

use crate::serializers::{LoginRequest, UserSummary};
use crate::state::AppState;

/// `POST /api/admin/auth/login`
pub async fn login(state: AppState, request: Request) -> Result<Response> {
	let body: LoginRequest = request.json()?;
	body.validate()?;

	let user = state
		.authenticator
		.authenticate(body.username.trim(), &body.password)
		.await?;
	let (token, payload) = state
		.signer
		.issue(user.id, &user.display_name)
		.map_err(|e| Error::Internal(format!("failed to issue session token: {e}")))?;
	tracing::info!(user_id = user.id, expires_at = payload.expires_at, "admin logged in");

	Response::ok()
		.with_cookie(&session_cookie(&token, state.secure_cookies()))
		.with_json(&json!({ "success": true, "user": UserSummary::from(&user) }))
}

/// `POST /api/admin/auth/logout`
///
/// Overwrites the cookie with an expired one. The token itself stays valid
/// until it expires.
pub async fn logout(state: AppState, _request: Request) -> Result<Response> {
	Response::ok()
		.with_cookie(&clear_session_cookie(state.secure_cookies()))
		.with_json(&json!({ "success": true }))
}

/// `GET /api/admin/auth/me`
pub async fn me(state: AppState, request: Request) -> Result<Response> {
	let session = current_session(&request)?;
	let user = match state.users.get(session.user_id).await {
		Ok(user) => user,
		Err(Error::NotFound(_)) => {
			return Err(Error::Authentication("Unauthorized".to_string()));
		}
		Err(err) => return Err(err),
	};
	Response::ok().with_json(&json!({ "user": UserSummary::from(&user) }))
}
