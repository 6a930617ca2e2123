//! Admin post CRUD and the publish action

use chrono::Utc;
use finlog_core::models::PostStatus;
use finlog_core::{Error, Result};
use finlog_db::PostFilter;
use finlog_http::{Request, Response};
use serde_json::json;

use crate::lifecycle::PublishAction;
use crate::serializers::{CreatePostRequest, PublishRequest, UpdatePostRequest};
use crate::slug::{slugify, unique_slug};
use crate::state::AppState;

/// `GET /api/admin/posts?status=&series=&search=&page=&limit=`
pub async fn list(state: AppState, request: Request) -> Result<Response> {
	let filter = PostFilter {
		status: request.query_as::<PostStatus>("status")?,
		series: request.query("series").filter(|s| !s.trim().is_empty()),
		search: request.query("search").filter(|s| !s.trim().is_empty()),
		page: request.query_as("page")?,
		limit: request.query_as("limit")?,
	};
	let page = state.posts.list(&filter).await?;
	Response::ok().with_json(&page)
}

/// `POST /api/admin/posts`
///
/// A blank slug is derived from the title and made unique.
pub async fn create(state: AppState, request: Request) -> Result<Response> {
	let body: CreatePostRequest = request.json()?;
	let slug = match body.slug() {
		Some(slug) => slug,
		None => {
			let base = slugify(&body.title()?);
			if base.is_empty() {
				return Err(Error::Validation(
					"slug is required when the title has no usable characters".to_string(),
				));
			}
			unique_slug(&base, |candidate| {
				let posts = state.posts.clone();
				async move { posts.slug_exists(&candidate).await }
			})
			.await?
		}
	};

	let new = body.into_new_post(slug, Utc::now().date_naive())?;
	let post = state.posts.create(&new).await?;
	tracing::info!(id = post.id, slug = %post.slug, status = %post.status, "post created");
	Response::created().with_json(&json!({ "post": post }))
}

/// `GET /api/admin/posts/{id}`
pub async fn detail(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	let post = state.posts.get(id).await?;
	Response::ok().with_json(&json!({ "post": post }))
}

/// `PUT /api/admin/posts/{id}`
pub async fn update(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	let body: UpdatePostRequest = request.json()?;
	let post = state.posts.update(id, &body.into_update()?).await?;
	tracing::info!(id, slug = %post.slug, "post updated");
	Response::ok().with_json(&json!({ "post": post }))
}

/// `DELETE /api/admin/posts/{id}`
pub async fn delete(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	state.posts.delete(id).await?;
	tracing::info!(id, "post deleted");
	Response::ok().with_json(&json!({ "success": true }))
}

/// `POST /api/admin/posts/{id}/publish` with `{"action": "publish" | "unpublish"}`
pub async fn publish(state: AppState, request: Request) -> Result<Response> {
	let id: i64 = request.path_param_as("id")?;
	let body: PublishRequest = request.json()?;
	let action: PublishAction = body.action.parse()?;
	let post = state.lifecycle.apply(id, action).await?;
	Response::ok().with_json(&json!({ "success": true, "post": post }))
}
