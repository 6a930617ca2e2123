//! AdminGuard behaviour inside a middleware chain

use chrono::{Duration, Utc};
use finlog_auth::{AdminGuard, SESSION_COOKIE, SessionSigner, current_session};
use finlog_http::{
	ErrorResponder, Handler, MiddlewareChain, Request, Response, Router, StatusCode, handler_fn,
};
use rstest::*;
use std::sync::Arc;

const SECRET: &str = "guard-test-secret-guard-test-secret";

#[fixture]
fn signer() -> Arc<SessionSigner> {
	Arc::new(SessionSigner::new(SECRET))
}

fn app(signer: Arc<SessionSigner>) -> MiddlewareChain {
	let whoami = handler_fn(|req: Request| async move {
		let session = current_session(&req)?;
		Response::ok().with_json(&serde_json::json!({ "displayName": session.display_name }))
	});
	let open = handler_fn(|_req| async { Ok(Response::no_content()) });

	let router = Router::new()
		.get("/api/admin/auth/me", whoami)
		.unwrap()
		.post("/api/admin/auth/login", open.clone())
		.unwrap()
		.get("/api/posts", open)
		.unwrap();

	MiddlewareChain::new(Arc::new(router))
		.with_middleware(Arc::new(ErrorResponder))
		.with_middleware(Arc::new(AdminGuard::new(signer)))
}

fn get(uri: &str, cookie: Option<&str>) -> Request {
	let mut builder = Request::builder().uri(uri);
	if let Some(token) = cookie {
		builder = builder.header("cookie", &format!("{SESSION_COOKIE}={token}"));
	}
	builder.build().unwrap()
}

#[rstest]
#[tokio::test]
async fn test_valid_session_reaches_handler(signer: Arc<SessionSigner>) {
	let (token, _) = signer.issue(1, "관리자").unwrap();
	let response = app(signer)
		.handle(get("/api/admin/auth/me", Some(&token)))
		.await
		.unwrap();

	assert_eq!(response.status, StatusCode::OK);
	let body: serde_json::Value = response.json().unwrap();
	assert_eq!(body["displayName"], "관리자");
}

#[rstest]
#[tokio::test]
async fn test_missing_cookie_is_401(signer: Arc<SessionSigner>) {
	let response = app(signer)
		.handle(get("/api/admin/auth/me", None))
		.await
		.unwrap();
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn test_expired_session_is_401(signer: Arc<SessionSigner>) {
	let (token, _) = signer
		.issue_at(1, "관리자", Utc::now() - Duration::days(8))
		.unwrap();
	let response = app(signer)
		.handle(get("/api/admin/auth/me", Some(&token)))
		.await
		.unwrap();
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn test_foreign_signature_is_401(signer: Arc<SessionSigner>) {
	let (token, _) = SessionSigner::new("some-other-secret-some-other-secret")
		.issue(1, "관리자")
		.unwrap();
	let response = app(signer)
		.handle(get("/api/admin/auth/me", Some(&token)))
		.await
		.unwrap();
	assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[tokio::test]
async fn test_login_and_public_paths_skip_guard(signer: Arc<SessionSigner>) {
	let app = app(signer);

	let login = Request::builder()
		.method(finlog_http::Method::POST)
		.uri("/api/admin/auth/login")
		.build()
		.unwrap();
	assert_eq!(app.handle(login).await.unwrap().status, StatusCode::NO_CONTENT);

	let public = app.handle(get("/api/posts", None)).await.unwrap();
	assert_eq!(public.status, StatusCode::NO_CONTENT);
}
