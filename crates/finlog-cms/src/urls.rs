//! Route table and middleware stack

use finlog_auth::AdminGuard;
use finlog_core::Result;
use finlog_http::{
	ErrorResponder, Handler, MiddlewareChain, Request, RequestLogging, Response, Router, handler_fn,
};
use std::future::Future;
use std::sync::Arc;

use crate::state::AppState;
use crate::views::{auth, auto_post, health, posts, public, settings, topics};

/// Bind a view function to a clone of the state
fn view<F, Fut>(state: &AppState, f: F) -> Arc<dyn Handler>
where
	F: Fn(AppState, Request) -> Fut + Send + Sync + 'static,
	Fut: Future<Output = Result<Response>> + Send + 'static,
{
	let state = state.clone();
	handler_fn(move |request| f(state.clone(), request))
}

/// Every route of the service
pub fn router(state: &AppState) -> Result<Router> {
	Router::new()
		.get("/healthz", view(state, health::health))?
		// Public catalog
		.get("/api/posts", view(state, public::list))?
		.get("/api/posts/{slug}", view(state, public::detail))?
		.post("/api/posts/{slug}/views", view(state, public::record_view))?
		.get("/api/slugs", view(state, public::slugs))?
		.get("/api/tags", view(state, public::tags))?
		.get("/api/series/{name}", view(state, public::series))?
		// Ingestion
		.post("/api/auto-post", view(state, auto_post::ingest))?
		// Admin session
		.post("/api/admin/auth/login", view(state, auth::login))?
		.post("/api/admin/auth/logout", view(state, auth::logout))?
		.get("/api/admin/auth/me", view(state, auth::me))?
		// Admin posts
		.get("/api/admin/posts", view(state, posts::list))?
		.post("/api/admin/posts", view(state, posts::create))?
		.get("/api/admin/posts/{id}", view(state, posts::detail))?
		.put("/api/admin/posts/{id}", view(state, posts::update))?
		.delete("/api/admin/posts/{id}", view(state, posts::delete))?
		.post("/api/admin/posts/{id}/publish", view(state, posts::publish))?
		// Admin topics
		.get("/api/admin/topics", view(state, topics::list))?
		.post("/api/admin/topics", view(state, topics::create))?
		.get("/api/admin/topics/{id}", view(state, topics::detail))?
		.put("/api/admin/topics/{id}", view(state, topics::update))?
		.delete("/api/admin/topics/{id}", view(state, topics::delete))?
		.post("/api/admin/topics/{id}/generate", view(state, topics::generate))?
		// Admin settings
		.get("/api/admin/settings", view(state, settings::list))?
		.put("/api/admin/settings", view(state, settings::update))
}

/// The full application: routes wrapped in logging, error mapping and the admin guard.
///
/// Requests under `/api/admin/` other than login and logout need a valid
/// session cookie.
pub fn build_app(state: &AppState) -> Result<Arc<dyn Handler>> {
	let router = router(state)?;
	let chain = MiddlewareChain::new(Arc::new(router))
		.with_middleware(Arc::new(RequestLogging::new()))
		.with_middleware(Arc::new(ErrorResponder))
		.with_middleware(Arc::new(AdminGuard::new(state.signer.clone())));
	Ok(Arc::new(chain))
}
